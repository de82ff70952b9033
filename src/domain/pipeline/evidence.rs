use serde::{Deserialize, Serialize};

use super::BinaryGrade;

/// Where a piece of evidence came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum EvidenceSource {
    /// A chunk from the knowledge index, identified by document id
    Index(String),
    /// A live search result, identified by URL
    Web(String),
}

impl EvidenceSource {
    pub fn identifier(&self) -> &str {
        match self {
            Self::Index(id) | Self::Web(id) => id,
        }
    }
}

/// A retrieved or searched text fragment used as context for generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub content: String,
    pub source: EvidenceSource,
    /// Relevance grade assigned by the document grader, if graded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance: Option<BinaryGrade>,
}

impl Evidence {
    pub fn from_index(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: EvidenceSource::Index(id.into()),
            relevance: None,
        }
    }

    pub fn from_web(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: EvidenceSource::Web(url.into()),
            relevance: None,
        }
    }

    pub fn with_relevance(mut self, grade: BinaryGrade) -> Self {
        self.relevance = Some(grade);
        self
    }

    /// Join evidence into a single context blob
    ///
    /// Items keep provider order and are separated by blank lines, each block
    /// headed by its source identifier so generated claims can be attributed.
    pub fn join_context(items: &[Evidence]) -> String {
        items
            .iter()
            .map(|item| format!("[{}]\n{}", item.source.identifier(), item.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
