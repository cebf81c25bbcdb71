pub mod recursive;
pub mod sliding;

pub use recursive::RecursiveWindow;
pub use sliding::SlidingWindow;

#[derive(Debug, thiserror::Error)]
pub enum ChunkerError {
    #[error("{0}")]
    Config(String),
}

/// Returns the byte offset of `chunk` in `input` if `chunk` is a slice
/// obtained from `input`.
///
/// Every chunker in this crate returns slices of its input, so this is how
/// callers locate a chunk in the original text.
pub fn offset_of(input: &str, chunk: &str) -> Option<usize> {
    let base = input.as_ptr() as usize;
    let ptr = chunk.as_ptr() as usize;

    if ptr < base || ptr + chunk.len() > base + input.len() {
        return None;
    }

    Some(ptr - base)
}
