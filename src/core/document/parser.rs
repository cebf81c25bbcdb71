use crate::{core::model::document::DocumentType, error::DocQaError, map_err};
use pdf::PdfParser;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use text::TextParser;
use validify::{schema_err, schema_validation, Validate, ValidationErrors};

pub mod pdf;
pub mod text;

/// General parsing configuration for documents.
/// A text element is parser specific, for PDFs it is a page
/// and for text files it is a line.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
#[validate(Self::validate_schema)]
pub struct ParseConfig {
    /// Skip the first amount of text elements.
    pub start: usize,

    /// Skip the last amount of text elements.
    pub end: usize,

    /// If true, parsers should treat the (start)[Self::start]
    /// and (end)[Self::end] parameters as a 1-based inclusive range
    /// instead of just skipping the elements.
    pub range: bool,

    /// Lines matching any of these are omitted from the output.
    #[serde(with = "serde_regex")]
    #[schema(value_type = Vec<String>, default = json!([]))]
    pub filters: Vec<Regex>,
}

impl ParseConfig {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            ..Default::default()
        }
    }

    /// Set the parser to use a range of elements instead of just skipping.
    pub fn use_range(mut self) -> Self {
        self.range = true;
        self
    }

    /// Add a filter to the parser.
    /// Each line will be checked for the regex and will be omitted if it matches.
    ///
    /// * `re`: The expression to match for.
    pub fn with_filter(mut self, re: &str) -> Result<Self, DocQaError> {
        self.filters.push(map_err!(Regex::new(re)));
        Ok(self)
    }

    /// Returns the 1-based inclusive bounds of the elements to keep
    /// out of `total` elements. The range is empty when `from > to`.
    pub fn bounds(&self, total: usize) -> (usize, usize) {
        if self.range {
            (self.start, self.end.min(total))
        } else {
            (self.start + 1, total.saturating_sub(self.end))
        }
    }

    /// Write `line` to `out` unless it matches one of the filters.
    fn write_line(&self, out: &mut String, line: &str) {
        if self.filters.iter().any(|filter| filter.is_match(line)) {
            return;
        }
        let _ = writeln!(out, "{line}");
    }

    #[schema_validation]
    fn validate_schema(&self) -> Result<(), ValidationErrors> {
        if self.range && self.end <= self.start {
            schema_err!(
                "range=true;start>=end",
                "end must be greater than start when using range"
            );
        }
        if self.range && self.start == 0 {
            schema_err!("range=true;start=0", "start cannot be 0 when using range");
        }
    }
}

/// Enumeration of all supported parser types.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Parser {
    Text(TextParser),
    Pdf(PdfParser),
}

impl Parser {
    /// Returns a configured parser for a document.
    pub fn new_from(ty: DocumentType, config: ParseConfig) -> Result<Self, DocQaError> {
        map_err!(config.validate());
        Ok(match ty {
            DocumentType::Text(_) => Self::Text(TextParser::new(config)),
            DocumentType::Pdf => Self::Pdf(PdfParser::new(config)),
        })
    }

    pub fn parse(&self, input: &[u8]) -> Result<String, DocQaError> {
        match self {
            Self::Text(p) => p.parse(input),
            Self::Pdf(p) => p.parse(input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::document::TextDocumentType;

    #[test]
    fn bounds_skip() {
        let config = ParseConfig::new(1, 2);
        assert_eq!((2, 8), config.bounds(10));

        let config = ParseConfig::new(0, 0);
        assert_eq!((1, 10), config.bounds(10));

        let config = ParseConfig::new(5, 6);
        let (from, to) = config.bounds(10);
        assert!(from > to);
    }

    #[test]
    fn bounds_range() {
        let config = ParseConfig::new(2, 4).use_range();
        assert_eq!((2, 4), config.bounds(10));
        assert_eq!((2, 3), config.bounds(3));
    }

    #[test]
    fn range_validation() {
        assert!(ParseConfig::new(0, 4).use_range().validate().is_err());
        assert!(ParseConfig::new(4, 4).use_range().validate().is_err());
        assert!(ParseConfig::new(1, 4).use_range().validate().is_ok());
        assert!(ParseConfig::new(4, 4).validate().is_ok());

        let parser = Parser::new_from(
            DocumentType::Text(TextDocumentType::Txt),
            ParseConfig::new(3, 1).use_range(),
        );
        assert!(parser.is_err());
    }

    #[test]
    fn filter_from_invalid_regex() {
        assert!(ParseConfig::default().with_filter("(").is_err());
    }
}
