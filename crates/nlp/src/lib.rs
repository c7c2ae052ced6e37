//! Linguistic side of textgraph
//!
//! This crate turns parsed sentences into graph-ready extraction results:
//! - NlpClient: HTTP client for the external parsing worker
//! - resolver: recognizer spans → typed entity drafts
//! - relations: three extraction strategies + dedup → relation candidates

pub mod client;
pub mod error;
pub mod parse;
pub mod relations;
pub mod resolver;
pub mod text;

pub use client::NlpClient;
pub use error::{NlpError, Result};
pub use parse::{EntitySpan, ParsedSentence, Token};
pub use relations::extract;
pub use resolver::resolve_spans;
pub use text::clean_text;
