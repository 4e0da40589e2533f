pub mod anthropic;
pub mod gemini;
pub mod query;

pub use query::*;
