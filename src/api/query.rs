use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::TablePreset;
use crate::types::SortDirection;

/// Query state of a list page: `page, per_page, search, sort, dir` plus filters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    pub page: u32,
    pub per_page: u32,
    pub search: String,
    pub sort: String,
    pub dir: SortDirection,
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    pub fn from_preset(preset: &TablePreset) -> Self {
        Self {
            page: 1,
            per_page: preset.per_page,
            search: String::new(),
            sort: preset.sort.to_string(),
            dir: preset.dir,
            filters: BTreeMap::new(),
        }
    }

    /// Query-string pairs in the order the backend documents them; unset filters are omitted
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("per_page".to_string(), self.per_page.to_string()),
            ("search".to_string(), self.search.clone()),
            ("sort".to_string(), self.sort.clone()),
            ("dir".to_string(), self.dir.as_str().to_string()),
        ];
        for (key, value) in &self.filters {
            if !value.is_empty() {
                pairs.push((key.clone(), value.clone()));
            }
        }
        pairs
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
            search: String::new(),
            sort: "id".to_string(),
            dir: SortDirection::Desc,
            filters: BTreeMap::new(),
        }
    }
}
