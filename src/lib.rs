// Tokenized chess knowledge and the selectors that consume it
pub mod board;
pub mod chess_openings;
pub mod engine;
pub mod error;
pub mod package;
pub mod pattern;
pub mod search;
pub mod selector;
pub mod tokenizer;

pub use error::{Error, Result};
