//! Filtering, sorting and pagination of the interaction catalog.
//!
//! All functions are pure over in-memory snapshots. Filters combine with
//! logical AND. Sidebar counts are always taken over the whole catalog so
//! they do not move when the user narrows the view.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::annotation::Annotation;
use crate::grouping::Interaction;
use crate::types::Timestamp;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound on a requested page size.
pub const MAX_PAGE_SIZE: u32 = 100;

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Match on the interaction's category tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LabelFilter {
    #[default]
    All,
    Only(String),
}

impl LabelFilter {
    /// `None`, empty and `"all"` mean no filtering.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some("all") => Self::All,
            Some(label) => Self::Only(label.to_string()),
        }
    }

    fn matches(&self, label: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == label,
        }
    }
}

/// Match on whether any annotation exists for the video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnnotatedFilter {
    #[default]
    All,
    Annotated,
    NotAnnotated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum SortOrder {
    /// Ascending `(vendor, session, interaction)`.
    #[default]
    #[serde(rename = "default")]
    Canonical,
    /// Annotated videos first, newest annotation first.
    #[serde(rename = "recent")]
    RecentlyLabeled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    /// Case-insensitive substring of the video id; empty matches everything.
    pub search: String,
    pub label: LabelFilter,
    pub annotated: AnnotatedFilter,
    pub sort: SortOrder,
    /// 1-based. Zero is treated as 1.
    pub page: u32,
    /// Clamped to `1..=MAX_PAGE_SIZE`.
    pub page_size: u32,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            label: LabelFilter::All,
            annotated: AnnotatedFilter::All,
            sort: SortOrder::Canonical,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Bucket sizes over the unfiltered catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCounts {
    pub total: usize,
    pub annotated: usize,
    pub not_annotated: usize,
    pub by_label: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage<T> {
    pub items: Vec<T>,
    /// Number of items matching the filters, across all pages.
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub filter_counts: FilterCounts,
    /// Sorted ids of every catalog video that has at least one annotation.
    pub annotated_video_ids: Vec<String>,
}

impl<T> ListingPage<T> {
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> ListingPage<U> {
        ListingPage {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            filter_counts: self.filter_counts,
            annotated_video_ids: self.annotated_video_ids,
        }
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// `ceil(total / page_size)`; zero when there is nothing to show.
pub fn total_pages(total: usize, page_size: u32) -> u32 {
    let size = page_size.max(1) as usize;
    total.div_ceil(size) as u32
}

/// The slice for a 1-based page. Pages past the end are empty.
pub fn page_window<T>(items: &[T], page: u32, page_size: u32) -> &[T] {
    let size = page_size.max(1) as usize;
    let skip = (page.max(1) as usize - 1).saturating_mul(size);
    if skip >= items.len() {
        return &[];
    }
    let end = (skip + size).min(items.len());
    &items[skip..end]
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Newest `created_at` per video across all reviewers.
fn latest_annotation_times(annotations: &[Annotation]) -> HashMap<&str, Timestamp> {
    let mut latest: HashMap<&str, Timestamp> = HashMap::new();
    for a in annotations {
        latest
            .entry(a.video_id.as_str())
            .and_modify(|t| *t = (*t).max(a.created_at))
            .or_insert(a.created_at);
    }
    latest
}

pub fn filter_counts(interactions: &[Interaction], annotated: &HashSet<&str>) -> FilterCounts {
    let mut by_label = BTreeMap::new();
    let mut annotated_count = 0;
    for i in interactions {
        *by_label.entry(i.label.clone()).or_insert(0) += 1;
        if annotated.contains(i.video_id.as_str()) {
            annotated_count += 1;
        }
    }

    FilterCounts {
        total: interactions.len(),
        annotated: annotated_count,
        not_annotated: interactions.len() - annotated_count,
        by_label,
    }
}

/// Sort in place by the requested order.
pub fn sort_interactions(
    items: &mut [&Interaction],
    order: SortOrder,
    latest: &HashMap<&str, Timestamp>,
) {
    match order {
        SortOrder::Canonical => {
            items.sort_by_key(|i| (i.vendor_id, i.session_id, i.interaction_id));
        }
        SortOrder::RecentlyLabeled => {
            // Stable sort: unannotated videos keep their relative order.
            items.sort_by(|a, b| {
                let ta = latest.get(a.video_id.as_str());
                let tb = latest.get(b.video_id.as_str());
                match (ta, tb) {
                    (Some(x), Some(y)) => y.cmp(x),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                }
            });
        }
    }
}

/// Filter, sort and paginate the catalog.
pub fn list_interactions(
    interactions: &[Interaction],
    annotations: &[Annotation],
    query: &ListingQuery,
) -> ListingPage<Interaction> {
    let latest = latest_annotation_times(annotations);
    let annotated: HashSet<&str> = latest.keys().copied().collect();
    let needle = query.search.trim().to_lowercase();

    let mut matching: Vec<&Interaction> = interactions
        .iter()
        .filter(|i| needle.is_empty() || i.video_id.to_lowercase().contains(&needle))
        .filter(|i| query.label.matches(&i.label))
        .filter(|i| {
            let has = annotated.contains(i.video_id.as_str());
            match query.annotated {
                AnnotatedFilter::All => true,
                AnnotatedFilter::Annotated => has,
                AnnotatedFilter::NotAnnotated => !has,
            }
        })
        .collect();

    sort_interactions(&mut matching, query.sort, &latest);

    let page = query.page.max(1);
    let page_size = query.page_size.clamp(1, MAX_PAGE_SIZE);
    let items = page_window(&matching, page, page_size)
        .iter()
        .map(|i| (*i).clone())
        .collect();

    let mut annotated_video_ids: Vec<String> = interactions
        .iter()
        .filter(|i| annotated.contains(i.video_id.as_str()))
        .map(|i| i.video_id.clone())
        .collect();
    annotated_video_ids.sort();

    ListingPage {
        items,
        total: matching.len(),
        page,
        page_size,
        total_pages: total_pages(matching.len(), page_size),
        filter_counts: filter_counts(interactions, &annotated),
        annotated_video_ids,
    }
}
