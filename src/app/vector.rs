/// In memory exact search index.
pub mod flat;
