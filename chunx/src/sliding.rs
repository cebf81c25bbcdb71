use super::ChunkerError;
use tracing::debug;

const SLIDING_WINDOW_DEFAULT_SIZE: usize = 1000;
const SLIDING_WINDOW_DEFAULT_OVERLAP: usize = 200;

/// The most basic of chunkers.
///
/// Every chunk is `size` characters long (the last one may be shorter) and
/// starts `size - overlap` characters after the previous one.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    pub size: usize,
    pub overlap: usize,
}

impl SlidingWindow {
    /// Create a new `SlidingWindow` chunker.
    /// Errors if `overlap` is not less than `size`.
    pub fn new(size: usize, overlap: usize) -> Result<Self, ChunkerError> {
        if size == 0 {
            return Err(ChunkerError::Config(
                "size must be greater than 0".to_string(),
            ));
        }
        if overlap >= size {
            return Err(ChunkerError::Config(
                "overlap must be less than size".to_string(),
            ));
        }
        Ok(Self { size, overlap })
    }
}

impl Default for SlidingWindow {
    fn default() -> Self {
        Self {
            size: SLIDING_WINDOW_DEFAULT_SIZE,
            overlap: SLIDING_WINDOW_DEFAULT_OVERLAP,
        }
    }
}

impl SlidingWindow {
    pub fn chunk<'a>(&self, input: &'a str) -> Result<Vec<&'a str>, ChunkerError> {
        let SlidingWindow { size, overlap } = *self;

        if overlap >= size {
            return Err(ChunkerError::Config(
                "overlap must be less than size".to_string(),
            ));
        }

        let input = input.trim();

        if input.is_empty() {
            return Ok(vec![]);
        }

        // Byte offsets of every char, plus the end of input
        let bounds = input
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(input.len()))
            .collect::<Vec<_>>();

        let total_chars = bounds.len() - 1;

        // Return whole input if it fits
        if total_chars <= size {
            return Ok(vec![input]);
        }

        let step = size - overlap;
        let mut chunks = vec![];
        let mut start = 0;

        loop {
            let end = (start + size).min(total_chars);
            chunks.push(&input[bounds[start]..bounds[end]]);

            if end == total_chars {
                break;
            }

            start += step;
        }

        debug!(
            "Chunked {} chunks, avg chunk size: {}",
            chunks.len(),
            chunks.iter().fold(0, |acc, el| acc + el.len()) / chunks.len()
        );

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sliding_window_works() {
        let input = "abcdefghij";
        let window = SlidingWindow::new(4, 2).unwrap();
        let chunks = window.chunk(input).unwrap();

        assert_eq!(vec!["abcd", "cdef", "efgh", "ghij"], chunks);
    }

    #[test]
    fn sliding_window_no_overlap() {
        let input = "Sticks and stones may break my bones";
        let window = SlidingWindow::new(10, 0).unwrap();
        let chunks = window.chunk(input).unwrap();

        assert_eq!(&input[0..10], chunks[0]);
        assert_eq!(&input[10..20], chunks[1]);
        assert_eq!(&input[20..30], chunks[2]);
        assert_eq!(&input[30..], chunks[3]);
    }

    #[test]
    fn sliding_window_counts_chars() {
        let input = "ééééé";
        let window = SlidingWindow::new(2, 0).unwrap();
        let chunks = window.chunk(input).unwrap();

        assert_eq!(vec!["éé", "éé", "é"], chunks);
    }

    #[test]
    fn sliding_window_empty() {
        let input = "   ";
        let window = SlidingWindow::new(1, 0).unwrap();
        let chunks = window.chunk(input).unwrap();

        assert!(chunks.is_empty());
    }

    #[test]
    fn sliding_window_small_input() {
        let input = "Foobar";
        let window = SlidingWindow::new(30, 20).unwrap();
        let chunks = window.chunk(input).unwrap();

        assert_eq!(vec![input], chunks);
    }

    #[test]
    fn sliding_window_rejects_overlap() {
        assert!(SlidingWindow::new(10, 10).is_err());
        assert!(SlidingWindow::new(0, 0).is_err());
    }
}
