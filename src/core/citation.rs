//! Keyword highlighting, citation links and reports for answers.

use super::model::conversation::{SourceCitation, SourceStatistics};
use regex::{Captures, Regex};
use std::{
    collections::{BTreeSet, HashSet},
    fmt::Write,
    sync::LazyLock,
};

/// Words never considered keywords.
pub const STOP_WORDS: &[&str] = &[
    "what", "when", "where", "who", "why", "how", "is", "are", "was", "were", "the", "a", "an",
    "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "from", "up", "about",
    "into", "through", "during", "before", "after", "above", "below", "between", "among", "can",
    "could", "should", "would", "will", "shall", "may", "might", "must", "do", "does", "did",
    "have", "has", "had", "be", "been", "being",
];

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("valid word regex"));

static CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[Ss]ource\s+(\d+)\b").expect("valid citation regex"));

/// Extract the words of `question` worth highlighting.
/// Keywords are lowercase, longer than 2 characters, not [stop words][STOP_WORDS]
/// and in order of appearance without duplicates.
pub fn extract_keywords(question: &str) -> Vec<String> {
    let question = question.to_lowercase();
    let mut seen = HashSet::new();

    WORD.find_iter(&question)
        .map(|word| word.as_str())
        .filter(|word| word.chars().count() > 2 && !STOP_WORDS.contains(word))
        .filter(|word| seen.insert(*word))
        .map(String::from)
        .collect()
}

/// Wrap case insensitive occurrences of `keywords` in `<mark>` tags.
pub fn highlight_html(text: &str, keywords: &[String]) -> String {
    highlight(text, keywords, "<mark>", "</mark>")
}

/// Wrap case insensitive occurrences of `keywords` in bold markers.
pub fn highlight_markdown(text: &str, keywords: &[String]) -> String {
    highlight(text, keywords, "**", "**")
}

/// Longer keywords take precedence, so "learning" wins over "learn" at the same position.
/// The text is scanned once, highlights are never nested.
fn highlight(text: &str, keywords: &[String], open: &str, close: &str) -> String {
    let mut keywords = keywords
        .iter()
        .filter(|k| !k.is_empty())
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>();

    if keywords.is_empty() {
        return text.to_string();
    }

    keywords.sort_by_key(|k| std::cmp::Reverse(k.len()));

    let Ok(pattern) = Regex::new(&format!("(?i)(?:{})", keywords.join("|"))) else {
        return text.to_string();
    };

    pattern
        .replace_all(text, |caps: &Captures| format!("{open}{}{close}", &caps[0]))
        .into_owned()
}

/// Turn references such as "Source 2" into links to the source's anchor.
/// Only references to one of the `num_sources` retrieved sources are linked.
pub fn link_citations(answer: &str, num_sources: usize) -> String {
    if num_sources == 0 {
        return answer.to_string();
    }

    CITATION
        .replace_all(answer, |caps: &Captures| {
            match caps[1].parse::<usize>() {
                Ok(n) if (1..=num_sources).contains(&n) => format!("[Source {n}](#source-{n})"),
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Render the sources as Markdown, highlighting the keywords of `question` in their content.
pub fn format_sources(sources: &[SourceCitation], question: &str) -> String {
    if sources.is_empty() {
        return "No sources found.".to_string();
    }

    let keywords = extract_keywords(question);

    let mut out = String::new();

    for source in sources {
        let SourceCitation {
            source_id,
            filename,
            chunk_id,
            relevance_score,
            content,
        } = source;

        let _ = writeln!(out, "<a id=\"source-{source_id}\"></a>");
        let _ = writeln!(out, "#### Source {source_id}: {filename}");
        let _ = writeln!(out, "Chunk {chunk_id} | Relevance: {relevance_score:.3}");
        let _ = writeln!(out);
        for line in highlight_markdown(content, &keywords).lines() {
            let _ = writeln!(out, "> {line}");
        }
        let _ = writeln!(out);
    }

    out
}

/// Create a Markdown report of a single question and answer.
///
/// * `generated_on`: Timestamp displayed in the report.
pub fn create_report(
    question: &str,
    answer: &str,
    sources: &[SourceCitation],
    generated_on: &str,
) -> String {
    let mut lines = vec![
        "# Document Q&A Report".to_string(),
        format!("**Generated on:** {generated_on}"),
        String::new(),
        "## Question".to_string(),
        question.to_string(),
        String::new(),
        "## Answer".to_string(),
        answer.to_string(),
        String::new(),
        "## Sources".to_string(),
    ];

    if sources.is_empty() {
        lines.push("No sources available.".to_string());
    }

    for source in sources {
        lines.extend([
            format!("### Source {}: {}", source.source_id, source.filename),
            format!("- **Chunk:** {}", source.chunk_id),
            format!("- **Relevance Score:** {:.3}", source.relevance_score),
            format!("- **Content:** {}", source.content),
            String::new(),
        ]);
    }

    lines.join("\n")
}

/// Aggregate the sources of an answer. `None` for no sources.
pub fn source_statistics(sources: &[SourceCitation]) -> Option<SourceStatistics> {
    if sources.is_empty() {
        return None;
    }

    let files_used = sources
        .iter()
        .map(|s| s.filename.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>();

    let scores = sources.iter().map(|s| s.relevance_score);

    Some(SourceStatistics {
        total_sources: sources.len(),
        unique_files: files_used.len(),
        files_used,
        average_relevance: scores.clone().sum::<f32>() / sources.len() as f32,
        max_relevance: scores.clone().fold(f32::MIN, f32::max),
        min_relevance: scores.fold(f32::MAX, f32::min),
    })
}
