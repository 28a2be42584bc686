use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

/// Category identifier.
///
/// The lookup endpoint reports numeric ids while the taxonomy listing may
/// use coded ids such as `IAB-596`; both decode into this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryId {
    Numeric(i64),
    Code(String),
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{}", id),
            Self::Code(code) => f.write_str(code),
        }
    }
}

impl From<i64> for CategoryId {
    fn from(id: i64) -> Self {
        Self::Numeric(id)
    }
}

impl From<&str> for CategoryId {
    fn from(code: &str) -> Self {
        Self::Code(code.to_string())
    }
}

impl From<String> for CategoryId {
    fn from(code: String) -> Self {
        Self::Code(code)
    }
}

/// A predicted category for a domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Probability in `0.0..=1.0` that the category applies.
    pub confidence: f64,
}

/// Autonomous system hosting the website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutonomousSystem {
    pub asn: i64,
    /// Website of the AS operator.
    pub domain: String,
    pub name: String,
    pub route: String,
    #[serde(rename = "type")]
    pub as_type: String,
}

/// Categorization result for a single domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainCategories {
    pub domain_name: String,
    pub categories: Vec<Category>,
    /// Whether the website answered during crawling.
    pub website_responded: bool,
    #[serde(rename = "as", skip_serializing_if = "Option::is_none")]
    pub autonomous_system: Option<AutonomousSystem>,
    /// Creation date of the WHOIS record (ISO 8601). Absent if no record was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
}

impl DomainCategories {
    /// Parse `created_date`, if present and well-formed.
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        self.created_date
            .as_deref()
            .and_then(|date| DateTime::parse_from_rfc3339(date).ok())
    }

    /// The category with the highest confidence.
    pub fn top_category(&self) -> Option<&Category> {
        self.categories
            .iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }
}

/// An entry of the category taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryItem {
    pub id: CategoryId,
    pub name: String,
    /// Id of the parent entry in the same taxonomy, `None` for top-level entries.
    #[serde(default)]
    pub parent: Option<CategoryId>,
}

/// Indexed view over the category taxonomy.
///
/// Keeps the order the server returned. Parents are resolved by id, so a
/// taxonomy may contain several roots.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    items: IndexMap<CategoryId, CategoryItem>,
}

impl Taxonomy {
    /// Index `items` by id. When an id repeats, the first entry is kept and
    /// later ones are dropped.
    pub fn new(items: Vec<CategoryItem>) -> Self {
        let mut index = IndexMap::with_capacity(items.len());
        for item in items {
            index.entry(item.id.clone()).or_insert(item);
        }
        Self { items: index }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &CategoryId) -> Option<&CategoryItem> {
        self.items.get(id)
    }

    /// Parent entry, `None` for roots and for parents missing from the listing.
    pub fn parent_of(&self, id: &CategoryId) -> Option<&CategoryItem> {
        self.get(id)?.parent.as_ref().and_then(|parent| self.get(parent))
    }

    pub fn children_of<'a>(
        &'a self,
        id: &'a CategoryId,
    ) -> impl Iterator<Item = &'a CategoryItem> + 'a {
        self.items
            .values()
            .filter(move |item| item.parent.as_ref() == Some(id))
    }

    /// Entries without a parent reference.
    pub fn roots(&self) -> impl Iterator<Item = &CategoryItem> {
        self.items.values().filter(|item| item.parent.is_none())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryItem> {
        self.items.values()
    }
}

impl From<Vec<CategoryItem>> for Taxonomy {
    fn from(items: Vec<CategoryItem>) -> Self {
        Self::new(items)
    }
}

/// HTTP response with the body drained into memory.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    /// Exact bytes sent by the server.
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
