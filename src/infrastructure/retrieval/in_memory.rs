use async_trait::async_trait;

use crate::domain::{Evidence, EvidenceProvider, PipelineError, ProviderRole, Query};

/// A seeded passage the in-memory retriever can serve
#[derive(Debug, Clone)]
pub struct Passage {
    pub id: String,
    pub content: String,
}

impl Passage {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

/// In-memory retriever ranking passages by keyword overlap
///
/// A stand-in for the vector-search service when no endpoint is configured.
/// Scoring counts distinct query terms appearing in a passage; ties keep
/// seed order, passages without any overlap are never returned.
#[derive(Debug)]
pub struct InMemoryRetriever {
    passages: Vec<Passage>,
    top_k: usize,
}

impl InMemoryRetriever {
    pub fn new(passages: Vec<Passage>, top_k: usize) -> Self {
        Self { passages, top_k }
    }

    fn score(query_terms: &[String], content: &str) -> usize {
        let haystack = content.to_lowercase();
        query_terms
            .iter()
            .filter(|term| haystack.contains(term.as_str()))
            .count()
    }
}

#[async_trait]
impl EvidenceProvider for InMemoryRetriever {
    fn role(&self) -> ProviderRole {
        ProviderRole::Retrieval
    }

    async fn provide(&self, query: &Query) -> Result<Vec<Evidence>, PipelineError> {
        let mut terms: Vec<String> = query
            .as_str()
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|term| term.len() > 2)
            .map(str::to_string)
            .collect();
        terms.sort();
        terms.dedup();

        let mut scored: Vec<(usize, usize, &Passage)> = self
            .passages
            .iter()
            .enumerate()
            .map(|(position, passage)| (Self::score(&terms, &passage.content), position, passage))
            .filter(|(score, _, _)| *score > 0)
            .collect();

        // Highest overlap first, seed order breaks ties
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        Ok(scored
            .into_iter()
            .take(self.top_k)
            .map(|(_, _, passage)| Evidence::from_index(&passage.id, &passage.content))
            .collect())
    }
}
