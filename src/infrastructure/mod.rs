//! Infrastructure layer - collaborator implementations

pub mod http_client;
pub mod llm;
pub mod observability;
pub mod retrieval;
pub mod search;

pub use http_client::{HttpClient, HttpClientTrait};
pub use llm::OpenAiProvider;
pub use retrieval::{HttpRetrievalService, InMemoryRetriever, Passage};
pub use search::TavilySearch;
