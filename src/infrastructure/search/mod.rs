//! Web-search service implementations

mod tavily;

pub use tavily::TavilySearch;
