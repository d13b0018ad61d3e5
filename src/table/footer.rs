use serde::Serialize;

use crate::models::{PageMeta, ResourceKind};

/// Most page-number buttons shown at once
pub const PAGE_WINDOW: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableFooter {
    pub showing: String,
    pub page_label: String,
    pub pages: Vec<u32>,
}

impl TableFooter {
    pub fn new(kind: ResourceKind, meta: &PageMeta) -> Self {
        Self {
            showing: format!(
                "Showing {} to {} of {} {}",
                meta.from.unwrap_or(0),
                meta.to.unwrap_or(0),
                meta.total,
                kind.plural()
            ),
            page_label: format!("Page {} of {}", meta.current_page.max(1), meta.last_page.max(1)),
            pages: page_window(meta.current_page, meta.last_page),
        }
    }
}

/// Up to `PAGE_WINDOW` page numbers, keeping `current` in view
pub fn page_window(current: u32, last: u32) -> Vec<u32> {
    let last = last.max(1);
    let current = current.clamp(1, last);
    if last <= PAGE_WINDOW {
        return (1..=last).collect();
    }
    let half = PAGE_WINDOW / 2;
    let start = current.saturating_sub(half).max(1).min(last - PAGE_WINDOW + 1);
    (start..start + PAGE_WINDOW).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footer_text_defaults_missing_bounds_to_zero() {
        let meta = PageMeta {
            total: 0,
            ..PageMeta::default()
        };
        let footer = TableFooter::new(ResourceKind::Users, &meta);
        assert_eq!(footer.showing, "Showing 0 to 0 of 0 users");
        assert_eq!(footer.page_label, "Page 1 of 1");
        assert_eq!(footer.pages, vec![1]);
    }

    #[test]
    fn window_never_exceeds_ten_pages() {
        assert_eq!(page_window(1, 25), (1..=10).collect::<Vec<_>>());
        assert_eq!(page_window(12, 25), (7..=16).collect::<Vec<_>>());
        assert_eq!(page_window(25, 25), (16..=25).collect::<Vec<_>>());
        assert_eq!(page_window(3, 4), vec![1, 2, 3, 4]);
    }
}
