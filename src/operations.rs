//! The eight operation kinds a class can expose, and lookup indexes over them.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// HTTP verb of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpVerb {
    Delete,
    Get,
    Post,
    Put,
}

impl HttpVerb {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpVerb::Delete => "delete",
            HttpVerb::Get => "get",
            HttpVerb::Post => "post",
            HttpVerb::Put => "put",
        }
    }
}

/// Whether an operation acts on one resource or on a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    Singular,
    Plural,
}

/// An exposable operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    DeleteByKey,
    GetAll,
    GetByKey,
    PostBulk,
    PostSingle,
    PutBulk,
    PutByKey,
    SearchByPost,
}

impl OperationType {
    /// All operation types, in declaration order.
    pub const ALL: [OperationType; 8] = [
        OperationType::DeleteByKey,
        OperationType::GetAll,
        OperationType::GetByKey,
        OperationType::PostBulk,
        OperationType::PostSingle,
        OperationType::PutBulk,
        OperationType::PutByKey,
        OperationType::SearchByPost,
    ];

    pub fn verb(self) -> HttpVerb {
        match self {
            OperationType::DeleteByKey => HttpVerb::Delete,
            OperationType::GetAll | OperationType::GetByKey => HttpVerb::Get,
            OperationType::PostBulk | OperationType::PostSingle | OperationType::SearchByPost => {
                HttpVerb::Post
            }
            OperationType::PutBulk | OperationType::PutByKey => HttpVerb::Put,
        }
    }

    pub fn cardinality(self) -> Cardinality {
        match self {
            OperationType::DeleteByKey
            | OperationType::GetByKey
            | OperationType::PostSingle
            | OperationType::PutByKey => Cardinality::Singular,
            OperationType::GetAll
            | OperationType::PostBulk
            | OperationType::PutBulk
            | OperationType::SearchByPost => Cardinality::Plural,
        }
    }

    /// Name part of the label.
    fn name(self) -> &'static str {
        match self {
            OperationType::DeleteByKey | OperationType::GetByKey | OperationType::PutByKey => {
                "by_key"
            }
            OperationType::GetAll => "all",
            OperationType::PostBulk | OperationType::PutBulk => "bulk",
            OperationType::PostSingle => "single",
            OperationType::SearchByPost => "search",
        }
    }

    /// Configuration label, `<verb>_<name>` (e.g. `get_by_key`, `post_search`).
    pub fn label(self) -> String {
        format!("{}_{}", self.verb().as_str(), self.name())
    }

    /// Settings key, as in [`PathsConfig`](crate::PathsConfig) and serialized
    /// output (e.g. `search_by_post`). Accepted as a label alias.
    pub fn key(self) -> &'static str {
        match self {
            OperationType::DeleteByKey => "delete_by_key",
            OperationType::GetAll => "get_all",
            OperationType::GetByKey => "get_by_key",
            OperationType::PostBulk => "post_bulk",
            OperationType::PostSingle => "post_single",
            OperationType::PutBulk => "put_bulk",
            OperationType::PutByKey => "put_by_key",
            OperationType::SearchByPost => "search_by_post",
        }
    }

    /// Operations addressed by key (`/{collection}/{key}`).
    pub fn is_by_key(self) -> bool {
        self.name() == "by_key"
    }

    /// Operations addressed by the bulk suffix.
    pub fn is_bulk(self) -> bool {
        self.name() == "bulk"
    }

    /// Look up an operation by label. Case-insensitive.
    pub fn from_label(label: &str) -> Option<Self> {
        OperationRegistry::global().by_label(label)
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Indexes over [`OperationType`] by verb, cardinality and label.
#[derive(Debug)]
pub struct OperationRegistry {
    by_verb: BTreeMap<HttpVerb, BTreeSet<OperationType>>,
    by_cardinality: BTreeMap<Cardinality, BTreeSet<OperationType>>,
    by_label: BTreeMap<String, OperationType>,
    labels: BTreeSet<String>,
}

static REGISTRY: OnceLock<OperationRegistry> = OnceLock::new();

impl OperationRegistry {
    fn build() -> Self {
        let mut by_verb: BTreeMap<HttpVerb, BTreeSet<OperationType>> = BTreeMap::new();
        let mut by_cardinality: BTreeMap<Cardinality, BTreeSet<OperationType>> = BTreeMap::new();
        let mut by_label = BTreeMap::new();
        let mut labels = BTreeSet::new();

        for op in OperationType::ALL {
            by_verb.entry(op.verb()).or_default().insert(op);
            by_cardinality.entry(op.cardinality()).or_default().insert(op);
            by_label.insert(op.key().to_string(), op);
            by_label.insert(op.label(), op);
            labels.insert(op.label());
        }

        Self {
            by_verb,
            by_cardinality,
            by_label,
            labels,
        }
    }

    /// The process-wide registry, built on first use.
    pub fn global() -> &'static OperationRegistry {
        REGISTRY.get_or_init(Self::build)
    }

    /// Operations using a verb. Empty when none do.
    pub fn by_verb(&self, verb: HttpVerb) -> BTreeSet<OperationType> {
        self.by_verb.get(&verb).cloned().unwrap_or_default()
    }

    /// Operations of a cardinality.
    pub fn by_cardinality(&self, cardinality: Cardinality) -> BTreeSet<OperationType> {
        self.by_cardinality
            .get(&cardinality)
            .cloned()
            .unwrap_or_default()
    }

    /// Operation for a label or settings key, ignoring case and surrounding
    /// whitespace.
    pub fn by_label(&self, label: &str) -> Option<OperationType> {
        self.by_label.get(&label.trim().to_lowercase()).copied()
    }

    /// All canonical labels, sorted.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}
