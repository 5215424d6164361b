use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use serde::Deserialize;

use super::PageContext;
use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{Blog, ListQuery, Project},
    search::{self, ProjectSearch},
    views::site,
};

/// Number of featured projects and latest posts on the home page.
const HOME_ITEMS: usize = 3;
const BLOGS_PER_PAGE: usize = 6;

/// BlogFilter
///
/// Query parameters accepted by `/blogs`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BlogFilter {
    pub search: Option<String>,
    pub tag: Option<String>,
    pub page: Option<usize>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Featured projects first; a portfolio with nothing featured shows its
/// first projects instead.
pub fn featured(projects: Vec<Project>, count: usize) -> Vec<Project> {
    let (mut featured, rest): (Vec<Project>, Vec<Project>) =
        projects.into_iter().partition(|p| p.featured);
    if featured.is_empty() {
        featured = rest;
    }
    featured.truncate(count);
    featured
}

fn published(blogs: Vec<Blog>) -> Vec<Blog> {
    blogs.into_iter().filter(|b| b.published).collect()
}

/// home
///
/// [Public Route] Hero (CV headline and quote), featured projects and the
/// latest published posts.
pub async fn home(ctx: PageContext, State(state): State<AppState>) -> AppResult<Response> {
    let projects = state.api.all_projects(&ListQuery::default()).await?;
    let blogs = state.api.all_blogs(&ListQuery::default()).await?;
    let cv = state.api.get_cv_showcase().await?;

    let mut latest = published(blogs);
    latest.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    latest.truncate(HOME_ITEMS);

    let body = site::home(&featured(projects, HOME_ITEMS), &latest, cv.as_ref());
    Ok(ctx.site("", body))
}

pub async fn about(ctx: PageContext, State(state): State<AppState>) -> AppResult<Response> {
    let cv = state.api.get_cv_showcase().await?;
    let body = site::about(&ctx.config.site_title, cv.as_ref());
    Ok(ctx.site("About", body))
}

/// projects
///
/// [Public Route] Project listing with text, category and technology filters.
/// Filtering and paging happen here so pager links and the JSON search
/// endpoint agree.
pub async fn projects(
    ctx: PageContext,
    State(state): State<AppState>,
    Query(search): Query<ProjectSearch>,
) -> AppResult<Response> {
    let projects = state.api.all_projects(&ListQuery::default()).await?;
    let categories = state.api.list_categories().await?;
    let slice = search.paginate(search.filter(projects));
    tracing::debug!(
        total = slice.total_items,
        page = slice.page,
        filtered = search.is_filtered(),
        "Rendering project listing"
    );
    Ok(ctx.site("Projects", site::projects(&slice, &search, &categories)))
}

pub async fn project_detail(
    ctx: PageContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let project = state.api.get_project(&id).await?;
    let title = project.title.clone();
    Ok(ctx.site(&title, site::project_detail(&project)))
}

/// blogs
///
/// [Public Route] Published posts, newest first, with search and tag filters
/// forwarded to the backend.
pub async fn blogs(
    ctx: PageContext,
    State(state): State<AppState>,
    Query(filter): Query<BlogFilter>,
) -> AppResult<Response> {
    let search = non_blank(filter.search);
    let tag = non_blank(filter.tag);
    let query = ListQuery {
        search: search.clone(),
        tag: tag.clone(),
        ..Default::default()
    };
    let mut posts = published(state.api.all_blogs(&query).await?);
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let slice = search::paginate(posts, filter.page.unwrap_or(1), BLOGS_PER_PAGE);
    let body = site::blogs(&slice, search.as_deref(), tag.as_deref());
    Ok(ctx.site("Blog", body))
}

/// blog_detail
///
/// Unpublished drafts are only visible to a signed-in administrator.
pub async fn blog_detail(
    ctx: PageContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let blog = state.api.get_blog(&id).await?;
    if !blog.published && !ctx.signed_in {
        return Err(AppError::NotFound("Post".to_string()));
    }
    let title = blog.title.clone();
    Ok(ctx.site(&title, site::blog_detail(&blog)))
}

pub async fn cv(ctx: PageContext, State(state): State<AppState>) -> AppResult<Response> {
    let cv = state.api.get_cv_showcase().await?;
    Ok(ctx.site("CV", site::cv(cv.as_ref())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str, featured: bool) -> Project {
        Project {
            id: id.to_string(),
            featured,
            ..Default::default()
        }
    }

    #[test]
    fn featured_projects_come_first() {
        let picked = featured(
            vec![project("a", false), project("b", true), project("c", true)],
            3,
        );
        let ids: Vec<_> = picked.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn without_featured_projects_the_first_ones_are_shown() {
        let picked = featured((0..5).map(|i| project(&i.to_string(), false)).collect(), 3);
        assert_eq!(picked.len(), 3);
        assert_eq!(picked[0].id, "0");
    }
}
