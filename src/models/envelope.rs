use serde::{Deserialize, Serialize};

/// Paginated list response: `{data, meta, links}`
///
/// `data` keeps the server's order; nothing on the client re-sorts it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: PageMeta,
    #[serde(default)]
    pub links: PageLinks,
    /// Distinct master data types, offered as a filter
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    /// Candidate parents, offered as a filter
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<ParentRef>,
}

impl<T> Default for Envelope<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            meta: PageMeta::default(),
            links: PageLinks::default(),
            types: Vec::new(),
            parents: Vec::new(),
        }
    }
}

impl<T> Envelope<T> {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default = "first_page")]
    pub current_page: u32,
    #[serde(default = "first_page")]
    pub last_page: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub from: Option<u64>,
    #[serde(default)]
    pub to: Option<u64>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

fn first_page() -> u32 {
    1
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            current_page: 1,
            last_page: 1,
            total: 0,
            from: None,
            to: None,
            per_page: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub last: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    pub id: u64,
    pub name: String,
}
