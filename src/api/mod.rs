use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    error::ApiError,
    models::{
        AuthResponse, Blog, ContactMessage, ContactSubmission, Credentials, CvShowcase, ListQuery,
        Paginated, PasswordChangeForm, Project, ProjectCategory, SignupForm, UserProfile,
    },
};

pub mod http;
pub mod mock;
pub mod payload;

pub use http::HttpPortfolioApi;
pub use mock::MockPortfolioApi;
pub use payload::{FilePart, FormPayload};

/// Result alias for backend calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Upper bound on pages fetched when collecting a whole list.
pub const MAX_LIST_PAGES: usize = 100;

/// The query for the page after `received`, or `None` once the collected
/// items cover the backend's total.
pub fn next_page<T>(
    query: &ListQuery,
    received: &Paginated<T>,
    collected: usize,
) -> Option<ListQuery> {
    let requested = query.page.unwrap_or(1);
    if received.items.is_empty() || collected >= received.total || requested >= MAX_LIST_PAGES {
        return None;
    }
    Some(ListQuery {
        page: Some(requested + 1),
        limit: query.limit.or(Some(received.per_page)),
        ..query.clone()
    })
}

/// PortfolioApi
///
/// Contract for everything the site needs from the content backend. Handlers
/// only see this trait, so the real REST client (`HttpPortfolioApi`) and the
/// in-memory sample backend (`MockPortfolioApi`) are interchangeable.
///
/// Methods taking a `token` are dashboard operations and send it as a bearer
/// token. A rejected token surfaces as `ApiError::Unauthorized`.
#[async_trait]
pub trait PortfolioApi: Send + Sync {
    // --- Auth ---
    async fn login(&self, credentials: &Credentials) -> ApiResult<AuthResponse>;
    async fn signup(&self, form: &SignupForm) -> ApiResult<AuthResponse>;

    // --- Blogs ---
    async fn list_blogs(&self, query: &ListQuery) -> ApiResult<Paginated<Blog>>;
    async fn get_blog(&self, id: &str) -> ApiResult<Blog>;
    async fn create_blog(&self, token: &str, payload: FormPayload) -> ApiResult<Blog>;
    async fn update_blog(&self, token: &str, id: &str, payload: FormPayload) -> ApiResult<Blog>;
    async fn delete_blog(&self, token: &str, id: &str) -> ApiResult<()>;

    // --- Projects ---
    async fn list_projects(&self, query: &ListQuery) -> ApiResult<Paginated<Project>>;
    async fn get_project(&self, id: &str) -> ApiResult<Project>;
    async fn list_categories(&self) -> ApiResult<Vec<ProjectCategory>>;
    async fn create_project(&self, token: &str, payload: FormPayload) -> ApiResult<Project>;
    async fn update_project(&self, token: &str, id: &str, payload: FormPayload)
    -> ApiResult<Project>;
    async fn delete_project(&self, token: &str, id: &str) -> ApiResult<()>;

    // --- CV Showcase ---
    // A backend without a showcase yet answers 404, which becomes `None`.
    async fn get_cv_showcase(&self) -> ApiResult<Option<CvShowcase>>;
    async fn save_cv_showcase(&self, token: &str, payload: FormPayload) -> ApiResult<CvShowcase>;

    // --- Contact ---
    async fn submit_contact(&self, submission: &ContactSubmission) -> ApiResult<()>;
    async fn list_messages(
        &self,
        token: &str,
        query: &ListQuery,
    ) -> ApiResult<Paginated<ContactMessage>>;
    async fn mark_message_read(&self, token: &str, id: &str) -> ApiResult<()>;
    async fn delete_message(&self, token: &str, id: &str) -> ApiResult<()>;

    // --- Security / Settings ---
    async fn get_profile(&self, token: &str) -> ApiResult<UserProfile>;
    async fn update_profile(&self, token: &str, payload: FormPayload) -> ApiResult<UserProfile>;
    async fn change_password(&self, token: &str, form: &PasswordChangeForm) -> ApiResult<()>;

    // --- Whole Lists ---
    // Follow the backend's paging until `total` items are in hand, for pages
    // that filter or count across the full collection.

    async fn all_blogs(&self, query: &ListQuery) -> ApiResult<Vec<Blog>> {
        let mut query = query.clone();
        let mut items = Vec::new();
        loop {
            let page = self.list_blogs(&query).await?;
            let next = next_page(&query, &page, items.len() + page.items.len());
            items.extend(page.items);
            match next {
                Some(following) => query = following,
                None => return Ok(items),
            }
        }
    }

    async fn all_projects(&self, query: &ListQuery) -> ApiResult<Vec<Project>> {
        let mut query = query.clone();
        let mut items = Vec::new();
        loop {
            let page = self.list_projects(&query).await?;
            let next = next_page(&query, &page, items.len() + page.items.len());
            items.extend(page.items);
            match next {
                Some(following) => query = following,
                None => return Ok(items),
            }
        }
    }

    async fn all_messages(&self, token: &str, query: &ListQuery) -> ApiResult<Vec<ContactMessage>> {
        let mut query = query.clone();
        let mut items = Vec::new();
        loop {
            let page = self.list_messages(token, &query).await?;
            let next = next_page(&query, &page, items.len() + page.items.len());
            items.extend(page.items);
            match next {
                Some(following) => query = following,
                None => return Ok(items),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn received(count: usize, total: usize, per_page: usize) -> Paginated<u32> {
        Paginated {
            items: (0..count as u32).collect(),
            total,
            page: 1,
            per_page,
        }
    }

    #[test]
    fn paging_continues_until_total_is_reached() {
        let query = ListQuery {
            search: Some("rust".into()),
            ..Default::default()
        };
        let next = next_page(&query, &received(6, 20, 6), 6).unwrap();
        assert_eq!(next.page, Some(2));
        assert_eq!(next.limit, Some(6));
        assert_eq!(next.search.as_deref(), Some("rust"));

        assert_eq!(next_page(&next, &received(6, 20, 6), 20), None);
    }

    #[test]
    fn paging_stops_on_short_or_runaway_lists() {
        assert_eq!(next_page(&ListQuery::default(), &received(0, 20, 6), 6), None);
        let last = ListQuery {
            page: Some(MAX_LIST_PAGES),
            ..Default::default()
        };
        assert_eq!(next_page(&last, &received(6, 10_000, 6), 600), None);
    }
}

/// ApiState
///
/// The concrete type used to share backend access across the application state.
pub type ApiState = Arc<dyn PortfolioApi>;
