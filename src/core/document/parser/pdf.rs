use super::ParseConfig;
use crate::{error::DocQaError, map_err};
use lopdf::Object;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// Parses PDFs. Text elements are pages.
/// Configuration:
/// * `start`/`end`: The amount of pages to skip from the front and back, or
///   the page range to parse when `range` is set.
/// * `filters`: Line based, i.e. lines matching a filter will be skipped.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PdfParser {
    config: ParseConfig,
}

impl PdfParser {
    pub fn new(config: ParseConfig) -> Self {
        Self { config }
    }
}

impl PdfParser {
    pub fn parse(&self, input: &[u8]) -> Result<String, DocQaError> {
        let start = Instant::now();

        let mut input = map_err!(lopdf::Document::load_mem(input));

        // Filter unwanted objects.
        input.objects.retain(filter_object);

        let pages = input.get_pages();
        let (from, to) = self.config.bounds(pages.len());

        let mut out = String::new();

        for page_num in pages.keys().copied() {
            let page = page_num as usize;
            if page < from || page > to {
                continue;
            }

            let text = map_err!(input.extract_text(&[page_num]));

            for line in text.lines() {
                let line = line.trim();

                // Skip page numbers in output.
                if line.is_empty() || line == page_num.to_string() {
                    continue;
                }

                self.config.write_line(&mut out, line);
            }
        }

        debug!(
            "Finished processing PDF, {} page(s), took {}ms",
            pages.len(),
            Instant::now().duration_since(start).as_millis()
        );

        Ok(out)
    }
}

static IGNORE: &[&str] = &[
    "Length",
    "BBox",
    "FormType",
    "Matrix",
    "XObject",
    "Subtype",
    "Filter",
    "ColorSpace",
    "Width",
    "Height",
    "BitsPerComponent",
    "Length1",
    "Length2",
    "Length3",
    "PTEX.FileName",
    "PTEX.PageNumber",
    "PTEX.InfoDict",
    "FontDescriptor",
    "ExtGState",
    "Annot",
];

/// Filters unwanted properties in an object and
/// returns whether to keep it or not.
///
/// * `object`: PDF object.
fn filter_object(_: &(u32, u16), object: &mut Object) -> bool {
    if IGNORE.contains(&object.type_name().unwrap_or_default()) {
        return false;
    }

    if let Object::Dictionary(d) = object {
        d.remove(b"Producer");
        d.remove(b"ModDate");
        d.remove(b"Creator");
        d.remove(b"ProcSet");
        d.remove(b"XObject");
        d.remove(b"Annots");
        if d.is_empty() {
            return false;
        }
    }

    true
}
