pub mod error;
pub mod prompt;
pub mod question;
pub mod store;
