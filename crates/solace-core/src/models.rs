pub mod client;
pub mod document;
pub mod name;
pub mod note;
