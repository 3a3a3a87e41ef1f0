//! Shared query parameter types for API handlers.

use pairlabel_core::listing::{AnnotatedFilter, LabelFilter, ListingQuery, SortOrder};
use serde::Deserialize;

/// `GET /videos` query string.
///
/// Accepts both `snake_case` and the `camelCase` names older clients send.
#[derive(Debug, Default, Deserialize)]
pub struct ListVideosParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    #[serde(alias = "labelFilter")]
    pub label_filter: Option<String>,
    #[serde(alias = "annotatedFilter")]
    pub annotated_filter: Option<AnnotatedFilter>,
    pub sort: Option<SortOrder>,
}

impl ListVideosParams {
    /// Resolve into a listing query; `default_page_size` applies when no
    /// `limit` was given. Range clamping happens in the listing engine.
    pub fn into_query(self, default_page_size: u32) -> ListingQuery {
        ListingQuery {
            search: self.search.unwrap_or_default(),
            label: LabelFilter::from_param(self.label_filter.as_deref()),
            annotated: self.annotated_filter.unwrap_or_default(),
            sort: self.sort.unwrap_or_default(),
            page: self.page.unwrap_or(1),
            page_size: self.limit.unwrap_or(default_page_size),
        }
    }
}

/// `?force=true` for operations that can bypass a cache.
#[derive(Debug, Default, Deserialize)]
pub struct ForceParams {
    #[serde(default)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let q = ListVideosParams::default().into_query(20);
        assert_eq!(q.page, 1);
        assert_eq!(q.page_size, 20);
        assert_eq!(q.label, LabelFilter::All);
        assert_eq!(q.annotated, AnnotatedFilter::All);
        assert_eq!(q.sort, SortOrder::Canonical);
    }

    #[test]
    fn explicit_values_pass_through() {
        let q = ListVideosParams {
            page: Some(3),
            limit: Some(5),
            search: Some("S0001".into()),
            label_filter: Some("naturalistic".into()),
            annotated_filter: Some(AnnotatedFilter::NotAnnotated),
            sort: Some(SortOrder::RecentlyLabeled),
        }
        .into_query(20);
        assert_eq!(q.page, 3);
        assert_eq!(q.page_size, 5);
        assert_eq!(q.search, "S0001");
        assert_eq!(q.label, LabelFilter::Only("naturalistic".into()));
    }
}
