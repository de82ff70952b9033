//! Knowledge-index retrieval implementations
//!
//! The index itself is built elsewhere; these clients only query it. The
//! HTTP client talks to a vector-search service, the in-memory retriever
//! serves tests and offline runs from seeded passages.

mod http;
mod in_memory;

pub use http::HttpRetrievalService;
pub use in_memory::{InMemoryRetriever, Passage};
