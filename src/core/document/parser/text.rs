use super::ParseConfig;
use crate::error::DocQaError;
use serde::{Deserialize, Serialize};

/// Parses anything readable as a string. Invalid UTF-8 sequences are replaced.
/// Text elements are lines.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextParser {
    config: ParseConfig,
}

impl TextParser {
    pub fn new(config: ParseConfig) -> Self {
        Self { config }
    }
}

impl TextParser {
    pub fn parse(&self, input: &[u8]) -> Result<String, DocQaError> {
        let input = String::from_utf8_lossy(input);

        let config = &self.config;

        if !config.range && config.start == 0 && config.end == 0 && config.filters.is_empty() {
            return Ok(input.to_string());
        }

        let lines = input.lines().collect::<Vec<_>>();
        let (from, to) = config.bounds(lines.len());

        let mut out = String::with_capacity(input.len());

        for (i, line) in lines.iter().enumerate() {
            let line_num = i + 1;
            if line_num < from || line_num > to {
                continue;
            }
            config.write_line(&mut out, line);
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_parser_passthrough() {
        let input = "Hello\n\nWorld\n";
        let parsed = TextParser::default().parse(input.as_bytes()).unwrap();
        assert_eq!(input, parsed);
    }

    #[test]
    fn text_parser_lossy() {
        let parsed = TextParser::default().parse(&[b'a', 0xFF, b'b']).unwrap();
        assert_eq!("a\u{FFFD}b", parsed);
    }

    #[test]
    fn text_parser_skips_and_filters() {
        let input = "header\nkeep me\nCONFIDENTIAL\nme too\nfooter";
        let config = ParseConfig::new(1, 1).with_filter("^CONFIDENTIAL$").unwrap();
        let parsed = TextParser::new(config).parse(input.as_bytes()).unwrap();
        assert_eq!("keep me\nme too\n", parsed);
    }

    #[test]
    fn text_parser_range() {
        let input = "one\ntwo\nthree\nfour";
        let parsed = TextParser::new(ParseConfig::new(2, 3).use_range())
            .parse(input.as_bytes())
            .unwrap();
        assert_eq!("two\nthree\n", parsed);
    }
}
