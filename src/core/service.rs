pub mod document;
pub mod qa;
pub mod session;
pub mod vector;
