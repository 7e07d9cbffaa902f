//! Item references
//!
//! The engine never looks inside the things it schedules. A reviewable item is
//! identified by an opaque `(owner, kind, id)` triple that is only ever
//! compared, hashed and printed.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

// ============================================================================
// ITEM KIND
// ============================================================================

/// Kinds of items that can be scheduled or tracked for decay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A logged problem or learning entry
    Entry,
    /// A reusable solution pattern
    Pattern,
    /// A standalone flashcard
    Flashcard,
    /// A concept extracted from entries
    Concept,
    /// A node of the knowledge graph
    KnowledgeNode,
}

impl ItemKind {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Entry => "entry",
            ItemKind::Pattern => "pattern",
            ItemKind::Flashcard => "flashcard",
            ItemKind::Concept => "concept",
            ItemKind::KnowledgeNode => "knowledge_node",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ItemKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "entry" => Ok(ItemKind::Entry),
            "pattern" => Ok(ItemKind::Pattern),
            "flashcard" => Ok(ItemKind::Flashcard),
            "concept" => Ok(ItemKind::Concept),
            "knowledge_node" | "knowledgenode" => Ok(ItemKind::KnowledgeNode),
            _ => Err(EngineError::InvalidItemRef(format!("unknown item kind: {}", s))),
        }
    }
}

// ============================================================================
// ITEM REFERENCE
// ============================================================================

/// Identity of a reviewable item
///
/// Text form is `owner:kind:id`. The owner and id are opaque and may not
/// contain `:`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRef {
    /// Owner of the item (user id)
    pub owner_id: String,
    /// What kind of thing is referenced
    pub kind: ItemKind,
    /// Id of the referenced entity within its kind
    pub item_id: String,
}

impl ItemRef {
    /// Create a new item reference
    pub fn new(owner_id: impl Into<String>, kind: ItemKind, item_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            kind,
            item_id: item_id.into(),
        }
    }
}

impl std::fmt::Display for ItemRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.owner_id, self.kind, self.item_id)
    }
}

impl std::str::FromStr for ItemRef {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(kind), Some(id), None) if !owner.is_empty() && !id.is_empty() => {
                Ok(ItemRef::new(owner, kind.parse()?, id))
            }
            _ => Err(EngineError::InvalidItemRef(format!(
                "expected owner:kind:id, got '{}'",
                s
            ))),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
