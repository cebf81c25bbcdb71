#[cfg(feature = "fe-local")]
pub mod fastembed;

pub mod mistral;
