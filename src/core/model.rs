pub mod conversation;
pub mod document;
pub mod index;
pub mod session;
