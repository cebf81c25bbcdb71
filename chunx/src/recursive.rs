use super::ChunkerError;
use std::{collections::VecDeque, ops::Range};
use tracing::debug;

const RECURSIVE_DEFAULT_SIZE: usize = 1000;
const RECURSIVE_DEFAULT_OVERLAP: usize = 200;

/// Default separators for the [recursive chunker][RecursiveWindow].
pub const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", " ", ""];

/// A chunker based on langchain's `RecursiveCharacterTextSplitter`.
///
/// The input is split with the first separator found in it. Splits smaller than `size`
/// are merged back together into chunks of at most `size` characters, splits that are
/// too large get split again with the next separator in the chain. An empty separator
/// splits into single characters.
///
/// Separators are kept at the start of the split that follows them, so every chunk is
/// a contiguous slice of the input. When a chunk is emitted, splits are dropped from its
/// front until at most `overlap` characters remain and those are carried over into the
/// next chunk.
#[derive(Debug, Clone)]
pub struct RecursiveWindow {
    pub size: usize,
    pub overlap: usize,
    pub separators: Vec<String>,
}

impl RecursiveWindow {
    /// Create a new `RecursiveWindow` chunker with the [default separators][DEFAULT_SEPARATORS].
    /// Errors if `overlap` is greater than `size`.
    pub fn new(size: usize, overlap: usize) -> Result<Self, ChunkerError> {
        Self::with_separators(size, overlap, DEFAULT_SEPARATORS)
    }

    pub fn with_separators(
        size: usize,
        overlap: usize,
        separators: &[&str],
    ) -> Result<Self, ChunkerError> {
        let this = Self {
            size,
            overlap,
            separators: separators.iter().map(|s| s.to_string()).collect(),
        };
        this.validate()?;
        Ok(this)
    }

    fn validate(&self) -> Result<(), ChunkerError> {
        if self.size == 0 {
            return Err(ChunkerError::Config(
                "size must be greater than 0".to_string(),
            ));
        }
        if self.overlap > self.size {
            return Err(ChunkerError::Config(format!(
                "overlap ({}) must not be greater than size ({})",
                self.overlap, self.size
            )));
        }
        Ok(())
    }

    pub fn chunk<'a>(&self, input: &'a str) -> Result<Vec<&'a str>, ChunkerError> {
        self.validate()?;

        let mut ranges = vec![];
        self.split(input, 0..input.len(), &self.separators, &mut ranges);

        let chunks = ranges
            .into_iter()
            .map(|range| &input[range])
            .collect::<Vec<_>>();

        if !chunks.is_empty() {
            debug!(
                "Chunked {} chunks, avg chunk size: {}",
                chunks.len(),
                chunks.iter().fold(0, |acc, el| acc + el.len()) / chunks.len()
            );
        }

        Ok(chunks)
    }

    /// Split `input[range]` using the first applicable separator and push the resulting
    /// chunk ranges into `out`.
    fn split(
        &self,
        input: &str,
        range: Range<usize>,
        separators: &[String],
        out: &mut Vec<Range<usize>>,
    ) {
        let text = &input[range.clone()];

        // Use the first separator present in the text, falling back to the last one.
        let mut position = separators.len().saturating_sub(1);
        for (i, separator) in separators.iter().enumerate() {
            if separator.is_empty() || text.contains(separator.as_str()) {
                position = i;
                break;
            }
        }

        let separator = separators.get(position).map(String::as_str).unwrap_or("");
        let remaining = separators.get(position + 1..).unwrap_or_default();

        let mut merge_buffer = vec![];

        for piece in split_keep_start(text, separator) {
            let piece = range.start + piece.start..range.start + piece.end;

            if char_len(&input[piece.clone()]) < self.size {
                merge_buffer.push(piece);
                continue;
            }

            if !merge_buffer.is_empty() {
                self.merge(input, &merge_buffer, out);
                merge_buffer.clear();
            }

            if remaining.is_empty() {
                push_trimmed(input, piece, out);
            } else {
                self.split(input, piece, remaining, out);
            }
        }

        if !merge_buffer.is_empty() {
            self.merge(input, &merge_buffer, out);
        }
    }

    /// Merge adjacent pieces into chunks of at most `size` characters.
    fn merge(&self, input: &str, pieces: &[Range<usize>], out: &mut Vec<Range<usize>>) {
        // (range, char length)
        let mut window: VecDeque<(Range<usize>, usize)> = VecDeque::new();
        let mut total = 0;

        for piece in pieces {
            let len = char_len(&input[piece.clone()]);

            if total + len > self.size {
                if let (Some((first, _)), Some((last, _))) = (window.front(), window.back()) {
                    push_trimmed(input, first.start..last.end, out);
                }

                while total > self.overlap || (total + len > self.size && total > 0) {
                    let Some((_, dropped)) = window.pop_front() else {
                        break;
                    };
                    total -= dropped;
                }
            }

            window.push_back((piece.clone(), len));
            total += len;
        }

        if let (Some((first, _)), Some((last, _))) = (window.front(), window.back()) {
            push_trimmed(input, first.start..last.end, out);
        }
    }
}

impl Default for RecursiveWindow {
    fn default() -> Self {
        Self {
            size: RECURSIVE_DEFAULT_SIZE,
            overlap: RECURSIVE_DEFAULT_OVERLAP,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Split `text` on `separator`, keeping the separator at the start of the following piece.
/// Returns ranges relative to `text`. Empty pieces are omitted.
fn split_keep_start(text: &str, separator: &str) -> Vec<Range<usize>> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, ch)| i..i + ch.len_utf8())
            .collect();
    }

    let mut pieces = vec![];
    let mut last = 0;

    for (i, _) in text.match_indices(separator) {
        if i > last {
            pieces.push(last..i);
        }
        last = i;
    }

    if last < text.len() {
        pieces.push(last..text.len());
    }

    pieces
}

/// Push the whitespace trimmed `range` if anything is left of it.
fn push_trimmed(input: &str, range: Range<usize>, out: &mut Vec<Range<usize>>) {
    let text = &input[range.clone()];
    let start = range.start + (text.len() - text.trim_start().len());
    let end = range.start + text.trim_end().len();
    if start < end {
        out.push(start..end);
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = r#"
What I Worked On

February 2021

Before college the two main things I worked on, outside of school, were writing and programming. I didn't write essays. I wrote what beginning writers were supposed to write then, and probably still are: short stories. My stories were awful. They had hardly any plot, just characters with strong feelings, which I imagined made them deep.

The first programs I tried writing were on the IBM 1401 that our school district used for what was then called "data processing." This was in 9th grade, so I was 13 or 14. The school district's 1401 happened to be in the basement of our junior high school, and my friend Rich Draves and I got permission to use it.
"#;

    #[test]
    fn recursive_respects_size() {
        let chunker = RecursiveWindow::new(100, 20).unwrap();
        let chunks = chunker.chunk(INPUT).unwrap();

        assert!(chunks.len() > 1);
        for chunk in chunks {
            assert!(chunk.chars().count() <= 100, "{chunk}");
            assert!(INPUT.contains(chunk));
            assert_eq!(chunk, chunk.trim());
        }
    }

    #[test]
    fn recursive_splits_paragraphs() {
        let p1 = "The quick brown fox jumps over the lazy dog.";
        let p2 = "Pack my box with five dozen liquor jugs.";
        let p3 = "How vexingly quick daft zebras jump.";
        let input = format!("{p1}\n\n{p2}\n\n{p3}");

        let chunker = RecursiveWindow::new(50, 0).unwrap();
        let chunks = chunker.chunk(&input).unwrap();

        assert_eq!(vec![p1, p2, p3], chunks);
    }

    #[test]
    fn recursive_overlaps() {
        let input = "aaa bbb ccc ddd eee";
        let chunker = RecursiveWindow::new(8, 4).unwrap();
        let chunks = chunker.chunk(input).unwrap();

        assert_eq!(vec!["aaa bbb", "bbb ccc", "ccc ddd", "ddd eee"], chunks);
    }

    #[test]
    fn recursive_falls_back_to_chars() {
        let input = "abcdefghij";
        let chunker = RecursiveWindow::new(4, 0).unwrap();
        let chunks = chunker.chunk(input).unwrap();

        assert_eq!(vec!["abcd", "efgh", "ij"], chunks);
    }

    #[test]
    fn recursive_small_input() {
        let chunker = RecursiveWindow::default();
        let chunks = chunker.chunk("  Hello world  ").unwrap();
        assert_eq!(vec!["Hello world"], chunks);
    }

    #[test]
    fn recursive_empty_input() {
        let chunker = RecursiveWindow::default();
        assert!(chunker.chunk("").unwrap().is_empty());
        assert!(chunker.chunk(" \n\n ").unwrap().is_empty());
    }

    #[test]
    fn recursive_multibyte() {
        let input = "ééé ééé ééé";
        let chunker = RecursiveWindow::new(3, 0).unwrap();
        let chunks = chunker.chunk(input).unwrap();

        assert!(!chunks.is_empty());
        for chunk in chunks {
            assert!(chunk.chars().count() <= 3);
            assert!(input.contains(chunk));
        }
    }

    #[test]
    fn recursive_chunks_are_input_slices() {
        let chunker = RecursiveWindow::new(80, 10).unwrap();
        let chunks = chunker.chunk(INPUT).unwrap();

        let mut last = 0;
        for chunk in chunks {
            let offset = crate::offset_of(INPUT, chunk).unwrap();
            assert!(offset >= last);
            assert_eq!(chunk, &INPUT[offset..offset + chunk.len()]);
            last = offset;
        }
    }

    #[test]
    fn recursive_rejects_overlap() {
        assert!(RecursiveWindow::new(10, 11).is_err());
        assert!(RecursiveWindow::new(0, 0).is_err());
    }

    #[test]
    fn split_keeps_separator_in_front() {
        let text = "a\n\nb\n\nc";
        let pieces = split_keep_start(text, "\n\n")
            .into_iter()
            .map(|r| &text[r])
            .collect::<Vec<_>>();
        assert_eq!(vec!["a", "\n\nb", "\n\nc"], pieces);
    }
}
