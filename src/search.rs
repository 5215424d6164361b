//! Project search: filtering and pagination for the public project listing.
//!
//! The backend returns the full project list; filters and pages are applied
//! here so the listing, the pager and the JSON search endpoint share one set
//! of rules.

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::{Paginated, Project};

pub const DEFAULT_PER_PAGE: usize = 6;
pub const MAX_PER_PAGE: usize = 50;

/// ProjectSearch
///
/// Query parameters accepted by `/projects` and `/api/search/projects`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub struct ProjectSearch {
    /// Case-insensitive text matched against title, description and technologies.
    pub query: Option<String>,
    /// Category name or slug.
    pub category: Option<String>,
    /// Exact technology name.
    pub technology: Option<String>,
    /// 1-based page number.
    pub page: Option<usize>,
    /// Page size, clamped to 1..=50.
    pub per_page: Option<usize>,
}

/// PageSlice
///
/// One page of a filtered list, with what the pager needs.
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct PageSlice<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ProjectSearch {
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> usize {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }

    pub fn query(&self) -> Option<&str> {
        non_blank(&self.query)
    }

    pub fn category(&self) -> Option<&str> {
        non_blank(&self.category)
    }

    pub fn technology(&self) -> Option<&str> {
        non_blank(&self.technology)
    }

    pub fn is_filtered(&self) -> bool {
        self.query().is_some() || self.category().is_some() || self.technology().is_some()
    }

    /// Whether a single project passes every active filter.
    pub fn matches(&self, project: &Project) -> bool {
        if let Some(query) = self.query() {
            let needle = query.to_lowercase();
            let hit = project.title.to_lowercase().contains(&needle)
                || project.description.to_lowercase().contains(&needle)
                || project
                    .technologies
                    .iter()
                    .any(|tech| tech.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(category) = self.category() {
            let Some(project_category) = &project.category else {
                return false;
            };
            let by_name = project_category.name.eq_ignore_ascii_case(category);
            let by_slug = project_category
                .slug
                .as_deref()
                .is_some_and(|slug| slug.eq_ignore_ascii_case(category));
            if !by_name && !by_slug {
                return false;
            }
        }

        if let Some(technology) = self.technology() {
            if !project
                .technologies
                .iter()
                .any(|tech| tech.eq_ignore_ascii_case(technology))
            {
                return false;
            }
        }

        true
    }

    pub fn filter(&self, projects: Vec<Project>) -> Vec<Project> {
        projects.into_iter().filter(|p| self.matches(p)).collect()
    }

    /// Cuts the requested page out of `items`, clamping the page into range.
    pub fn paginate<T>(&self, items: Vec<T>) -> PageSlice<T> {
        paginate(items, self.page(), self.per_page())
    }

    /// Query string reproducing these filters on another page, for pager links.
    pub fn to_query_string(&self, page: usize) -> String {
        let mut pairs = Vec::new();
        if let Some(query) = self.query() {
            pairs.push(("query", query.to_string()));
        }
        if let Some(category) = self.category() {
            pairs.push(("category", category.to_string()));
        }
        if let Some(technology) = self.technology() {
            pairs.push(("technology", technology.to_string()));
        }
        if self.per_page.is_some() {
            pairs.push(("per_page", self.per_page().to_string()));
        }
        pairs.push(("page", page.to_string()));

        pairs
            .into_iter()
            .map(|(key, value)| format!("{key}={}", utf8_percent_encode(&value, NON_ALPHANUMERIC)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Number of pages needed for `total` items; an empty list still has one page.
pub fn total_pages(total: usize, per_page: usize) -> usize {
    total.div_ceil(per_page.max(1)).max(1)
}

pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> PageSlice<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_pages(total_items, per_page);
    let page = page.clamp(1, total_pages);

    let items: Vec<T> = items
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    PageSlice {
        items,
        page,
        per_page,
        total_items,
        total_pages,
        has_prev: page > 1,
        has_next: page < total_pages,
    }
}

/// A page the backend already cut keeps its numbers; only the pager fields
/// are derived.
impl<T> From<Paginated<T>> for PageSlice<T> {
    fn from(page: Paginated<T>) -> Self {
        let per_page = page.per_page.max(1);
        let total_pages = total_pages(page.total, per_page);
        let current = page.page.clamp(1, total_pages);
        PageSlice {
            items: page.items,
            page: current,
            per_page,
            total_items: page.total,
            total_pages,
            has_prev: current > 1,
            has_next: current < total_pages,
        }
    }
}

/// page_window
///
/// Page numbers for the pager: at most `width` consecutive pages containing
/// `current`, centred where possible and never outside `1..=total`.
pub fn page_window(current: usize, total: usize, width: usize) -> Vec<usize> {
    let total = total.max(1);
    let width = width.clamp(1, total);
    let current = current.clamp(1, total);

    let half = width / 2;
    let mut start = current.saturating_sub(half).max(1);
    if start + width - 1 > total {
        start = total + 1 - width;
    }
    (start..start + width).collect()
}
