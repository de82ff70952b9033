use serde::{Deserialize, Serialize};

use crate::domain::classifier::ClassLabel;

/// Which evidence path a question should take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteDecision {
    /// The curated knowledge index covers the question's topic
    KnowledgeBase,
    /// Anything outside the index's topics goes to live web search
    LiveSearch,
}

impl RouteDecision {
    pub fn is_knowledge_base(&self) -> bool {
        matches!(self, Self::KnowledgeBase)
    }

    pub fn is_live_search(&self) -> bool {
        matches!(self, Self::LiveSearch)
    }
}

impl ClassLabel for RouteDecision {
    fn variants() -> &'static [Self] {
        &[Self::KnowledgeBase, Self::LiveSearch]
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::KnowledgeBase => "knowledge_base",
            Self::LiveSearch => "live_search",
        }
    }
}

/// Binary verdict emitted by the yes/no graders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryGrade {
    Yes,
    No,
}

impl BinaryGrade {
    pub fn is_yes(&self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl ClassLabel for BinaryGrade {
    fn variants() -> &'static [Self] {
        &[Self::Yes, Self::No]
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

/// Final verdict of the output validation cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerVerdict {
    /// Grounded in the evidence and addresses the question
    Useful,
    /// Contains claims the evidence does not support
    Unsupported,
    /// Grounded but does not address the question
    Irrelevant,
}

impl AnswerVerdict {
    pub fn is_useful(&self) -> bool {
        matches!(self, Self::Useful)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Useful => "useful",
            Self::Unsupported => "unsupported",
            Self::Irrelevant => "irrelevant",
        }
    }
}

impl std::fmt::Display for AnswerVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
