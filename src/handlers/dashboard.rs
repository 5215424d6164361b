//! Dashboard handlers.
//!
//! Every handler takes a [`Session`]; a missing session or a token the
//! backend rejects ends in a forced logout. Other backend failures re-render
//! the form with the visitor's input and an error banner.

use axum::{
    Form,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Response,
};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;

use super::{PageContext, form_status, read_form, redirect_with, session::check_new_password};
use crate::{
    AppState,
    api::{
        FilePart, FormPayload,
        payload::{BlogDraft, CvDraft, ProfileDraft, ProjectDraft},
    },
    auth::Session,
    error::{ApiError, AppError, AppResult},
    models::{ListQuery, Notification, PasswordChangeForm},
    search::{self, PageSlice},
    views::{dashboard, layout::Nav},
};

pub const DASHBOARD_PER_PAGE: usize = 10;

/// ListFilter
///
/// Query parameters accepted by the dashboard tables.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListFilter {
    pub search: Option<String>,
    pub page: Option<usize>,
}

impl ListFilter {
    fn search(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }
}

fn enc(id: &str) -> String {
    utf8_percent_encode(id, NON_ALPHANUMERIC).to_string()
}

/// Splits a backend failure into what a form can show. A rejected token is
/// passed on so it becomes a forced logout.
fn form_failure(err: ApiError, what: &str) -> AppResult<(StatusCode, String)> {
    if matches!(err, ApiError::Unauthorized) {
        return Err(AppError::Api(err));
    }
    tracing::warn!(error = %err, "Saving {what} failed");
    Ok((form_status(&err), err.user_message()))
}

fn take_file(files: &mut Vec<FilePart>, field: &str) -> Option<FilePart> {
    let index = files.iter().position(|f| f.field == field)?;
    Some(files.remove(index))
}

/// Redirect after a delete. A 401 still logs out; any other failure becomes
/// an error toast on the list page.
fn after_delete(result: Result<(), ApiError>, list: &str, done: String) -> AppResult<Response> {
    match result {
        Ok(()) => Ok(redirect_with(list, Notification::success(done))),
        Err(ApiError::Unauthorized) => Err(AppError::Unauthorized),
        Err(ApiError::NotFound) => Ok(redirect_with(
            list,
            Notification::info("That item was already removed."),
        )),
        Err(err) => {
            tracing::warn!(error = %err, "Delete failed");
            Ok(redirect_with(list, Notification::error(err.user_message())))
        }
    }
}

// --- Overview ---

/// overview
///
/// [Dashboard Route] Greeting plus content counts.
pub async fn overview(
    ctx: PageContext,
    session: Session,
    State(state): State<AppState>,
) -> AppResult<Response> {
    let profile = state.api.get_profile(&session.token).await?;
    let blogs = state.api.list_blogs(&ListQuery::default()).await?;
    let projects = state.api.list_projects(&ListQuery::default()).await?;
    let messages = state
        .api
        .all_messages(&session.token, &ListQuery::default())
        .await?;

    let counts = dashboard::Overview {
        blogs: blogs.total,
        projects: projects.total,
        messages: messages.len(),
        unread: messages.iter().filter(|m| !m.read).count(),
    };
    Ok(ctx.dashboard("Overview", dashboard::overview(&profile, &counts)))
}

// --- Blogs ---

pub async fn blogs(
    ctx: PageContext,
    _session: Session,
    State(state): State<AppState>,
    Query(filter): Query<ListFilter>,
) -> AppResult<Response> {
    let search = filter.search();
    let query = ListQuery {
        search: search.clone(),
        ..Default::default()
    };
    let mut posts = state.api.all_blogs(&query).await?;
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let slice = search::paginate(posts, filter.page(), DASHBOARD_PER_PAGE);
    Ok(ctx.dashboard("Blogs", dashboard::blogs(&slice, search.as_deref(), None)))
}

pub async fn blog_new(ctx: PageContext, _session: Session) -> Response {
    let body = dashboard::blog_form("/dashboard/blogs/new", &BlogDraft::default(), &None, false, None);
    ctx.dashboard("New post", body)
}

/// Parses the editor form. Returns the draft, the cover upload and whether
/// the author asked for a preview instead of saving.
fn blog_submission(mut form: FormPayload) -> (BlogDraft, Option<FilePart>, bool) {
    let preview = form.get("intent") == Some("preview");
    let draft = BlogDraft::from_form(&form);
    let mut files = form.take_files();
    (draft, take_file(&mut files, "cover_image"), preview)
}

/// blog_create
///
/// [Dashboard Route] Creates a post from the multipart editor form, or
/// re-renders it with a Markdown preview.
pub async fn blog_create(
    ctx: PageContext,
    session: Session,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Response> {
    let (draft, cover, preview) = blog_submission(read_form(multipart).await?);
    let action = "/dashboard/blogs/new";

    if preview {
        return Ok(ctx.dashboard("New post", dashboard::blog_form(action, &draft, &None, true, None)));
    }
    if let Err(message) = draft.validate() {
        let body = dashboard::blog_form(action, &draft, &None, false, Some(&message));
        return Ok(ctx.render(StatusCode::UNPROCESSABLE_ENTITY, "New post", Nav::Dashboard, body));
    }

    match state.api.create_blog(&session.token, draft.to_payload(cover)).await {
        Ok(blog) => {
            tracing::info!(id = %blog.id, "Blog post created");
            Ok(redirect_with(
                "/dashboard/blogs",
                Notification::success(format!("Post \"{}\" created.", blog.title)),
            ))
        }
        Err(err) => {
            let (status, message) = form_failure(err, "post")?;
            let body = dashboard::blog_form(action, &draft, &None, false, Some(&message));
            Ok(ctx.render(status, "New post", Nav::Dashboard, body))
        }
    }
}

pub async fn blog_edit(
    ctx: PageContext,
    _session: Session,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let blog = state.api.get_blog(&id).await?;
    let action = format!("/dashboard/blogs/{}/edit", enc(&id));
    let body = dashboard::blog_form(&action, &BlogDraft::from_blog(&blog), &blog.cover_image, false, None);
    Ok(ctx.dashboard("Edit post", body))
}

pub async fn blog_update(
    ctx: PageContext,
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Response> {
    let (draft, cover, preview) = blog_submission(read_form(multipart).await?);
    let action = format!("/dashboard/blogs/{}/edit", enc(&id));
    let current = state.api.get_blog(&id).await?.cover_image;

    if preview {
        let body = dashboard::blog_form(&action, &draft, &current, true, None);
        return Ok(ctx.dashboard("Edit post", body));
    }
    if let Err(message) = draft.validate() {
        let body = dashboard::blog_form(&action, &draft, &current, false, Some(&message));
        return Ok(ctx.render(StatusCode::UNPROCESSABLE_ENTITY, "Edit post", Nav::Dashboard, body));
    }

    match state
        .api
        .update_blog(&session.token, &id, draft.to_payload(cover))
        .await
    {
        Ok(blog) => {
            tracing::info!(id = %blog.id, "Blog post updated");
            Ok(redirect_with(
                "/dashboard/blogs",
                Notification::success(format!("Post \"{}\" saved.", blog.title)),
            ))
        }
        Err(err) => {
            let (status, message) = form_failure(err, "post")?;
            let body = dashboard::blog_form(&action, &draft, &current, false, Some(&message));
            Ok(ctx.render(status, "Edit post", Nav::Dashboard, body))
        }
    }
}

pub async fn blog_confirm_delete(
    ctx: PageContext,
    _session: Session,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let blog = state.api.get_blog(&id).await?;
    let action = format!("/dashboard/blogs/{}/delete", enc(&id));
    let body = dashboard::confirm_delete("post", &blog.title, &action, "/dashboard/blogs");
    Ok(ctx.dashboard("Delete post", body))
}

pub async fn blog_delete(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let result = state.api.delete_blog(&session.token, &id).await;
    after_delete(result, "/dashboard/blogs", "Post deleted.".to_string())
}

// --- Projects ---

pub async fn projects(
    ctx: PageContext,
    _session: Session,
    State(state): State<AppState>,
    Query(filter): Query<ListFilter>,
) -> AppResult<Response> {
    let search = filter.search();
    let query = ListQuery {
        search: search.clone(),
        ..Default::default()
    };
    let items = state.api.all_projects(&query).await?;
    let slice = search::paginate(items, filter.page(), DASHBOARD_PER_PAGE);
    Ok(ctx.dashboard("Projects", dashboard::projects(&slice, search.as_deref(), None)))
}

fn project_submission(mut form: FormPayload) -> (ProjectDraft, Option<FilePart>) {
    let draft = ProjectDraft::from_form(&form);
    let mut files = form.take_files();
    (draft, take_file(&mut files, "cover_image"))
}

pub async fn project_new(
    ctx: PageContext,
    _session: Session,
    State(state): State<AppState>,
) -> AppResult<Response> {
    let categories = state.api.list_categories().await?;
    let body = dashboard::project_form(
        "/dashboard/projects/new",
        &ProjectDraft::default(),
        &categories,
        &None,
        None,
    );
    Ok(ctx.dashboard("New project", body))
}

/// project_create
///
/// [Dashboard Route] Creates a project. Technologies arrive as one comma
/// separated field and go to the backend as repeated fields.
pub async fn project_create(
    ctx: PageContext,
    session: Session,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Response> {
    let (draft, cover) = project_submission(read_form(multipart).await?);
    let categories = state.api.list_categories().await?;
    let action = "/dashboard/projects/new";

    if let Err(message) = draft.validate() {
        let body = dashboard::project_form(action, &draft, &categories, &None, Some(&message));
        return Ok(ctx.render(StatusCode::UNPROCESSABLE_ENTITY, "New project", Nav::Dashboard, body));
    }

    match state
        .api
        .create_project(&session.token, draft.to_payload(cover))
        .await
    {
        Ok(project) => {
            tracing::info!(id = %project.id, "Project created");
            Ok(redirect_with(
                "/dashboard/projects",
                Notification::success(format!("Project \"{}\" created.", project.title)),
            ))
        }
        Err(err) => {
            let (status, message) = form_failure(err, "project")?;
            let body = dashboard::project_form(action, &draft, &categories, &None, Some(&message));
            Ok(ctx.render(status, "New project", Nav::Dashboard, body))
        }
    }
}

pub async fn project_edit(
    ctx: PageContext,
    _session: Session,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let project = state.api.get_project(&id).await?;
    let categories = state.api.list_categories().await?;
    let action = format!("/dashboard/projects/{}/edit", enc(&id));
    let body = dashboard::project_form(
        &action,
        &ProjectDraft::from_project(&project),
        &categories,
        &project.cover_image,
        None,
    );
    Ok(ctx.dashboard("Edit project", body))
}

pub async fn project_update(
    ctx: PageContext,
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Response> {
    let (draft, cover) = project_submission(read_form(multipart).await?);
    let current = state.api.get_project(&id).await?.cover_image;
    let categories = state.api.list_categories().await?;
    let action = format!("/dashboard/projects/{}/edit", enc(&id));

    if let Err(message) = draft.validate() {
        let body = dashboard::project_form(&action, &draft, &categories, &current, Some(&message));
        return Ok(ctx.render(StatusCode::UNPROCESSABLE_ENTITY, "Edit project", Nav::Dashboard, body));
    }

    match state
        .api
        .update_project(&session.token, &id, draft.to_payload(cover))
        .await
    {
        Ok(project) => {
            tracing::info!(id = %project.id, "Project updated");
            Ok(redirect_with(
                "/dashboard/projects",
                Notification::success(format!("Project \"{}\" saved.", project.title)),
            ))
        }
        Err(err) => {
            let (status, message) = form_failure(err, "project")?;
            let body = dashboard::project_form(&action, &draft, &categories, &current, Some(&message));
            Ok(ctx.render(status, "Edit project", Nav::Dashboard, body))
        }
    }
}

pub async fn project_confirm_delete(
    ctx: PageContext,
    _session: Session,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let project = state.api.get_project(&id).await?;
    let action = format!("/dashboard/projects/{}/delete", enc(&id));
    let body = dashboard::confirm_delete("project", &project.title, &action, "/dashboard/projects");
    Ok(ctx.dashboard("Delete project", body))
}

pub async fn project_delete(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let result = state.api.delete_project(&session.token, &id).await;
    after_delete(result, "/dashboard/projects", "Project deleted.".to_string())
}

// --- Messages ---

/// messages
///
/// [Dashboard Route] The contact inbox. Paging is done by the backend.
pub async fn messages(
    ctx: PageContext,
    session: Session,
    State(state): State<AppState>,
    Query(filter): Query<ListFilter>,
) -> AppResult<Response> {
    let search = filter.search();
    let query = ListQuery {
        search: search.clone(),
        page: Some(filter.page()),
        limit: Some(DASHBOARD_PER_PAGE),
        ..Default::default()
    };
    let page = state.api.list_messages(&session.token, &query).await?;
    let slice = PageSlice::from(page);
    Ok(ctx.dashboard("Messages", dashboard::messages(&slice, search.as_deref())))
}

pub async fn message_read(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    match state.api.mark_message_read(&session.token, &id).await {
        Ok(()) => Ok(redirect_with(
            "/dashboard/messages",
            Notification::success("Message marked as read."),
        )),
        Err(ApiError::Unauthorized) => Err(AppError::Unauthorized),
        Err(err) => {
            tracing::warn!(error = %err, "Marking message as read failed");
            Ok(redirect_with(
                "/dashboard/messages",
                Notification::error(err.user_message()),
            ))
        }
    }
}

pub async fn message_confirm_delete(
    ctx: PageContext,
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let inbox = state
        .api
        .all_messages(&session.token, &ListQuery::default())
        .await?;
    let message = inbox
        .into_iter()
        .find(|m| m.id == id)
        .ok_or_else(|| AppError::NotFound("Message".to_string()))?;
    let label = format!("Message from {}", message.name);
    let action = format!("/dashboard/messages/{}/delete", enc(&id));
    let body = dashboard::confirm_delete("message", &label, &action, "/dashboard/messages");
    Ok(ctx.dashboard("Delete message", body))
}

pub async fn message_delete(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let result = state.api.delete_message(&session.token, &id).await;
    after_delete(result, "/dashboard/messages", "Message deleted.".to_string())
}

// --- Settings ---

pub async fn settings(
    ctx: PageContext,
    session: Session,
    State(state): State<AppState>,
) -> AppResult<Response> {
    let profile = state.api.get_profile(&session.token).await?;
    let body = dashboard::settings(
        &ProfileDraft::from_profile(&profile),
        &profile.avatar_url,
        None,
        None,
    );
    Ok(ctx.dashboard("Settings", body))
}

/// settings_update
///
/// [Dashboard Route] Saves the profile form, including an optional avatar.
pub async fn settings_update(
    ctx: PageContext,
    session: Session,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Response> {
    let mut form = read_form(multipart).await?;
    let draft = ProfileDraft::from_form(&form);
    let mut files = form.take_files();
    let avatar = take_file(&mut files, "avatar");
    let current = state.api.get_profile(&session.token).await?.avatar_url;

    if let Err(message) = draft.validate() {
        let body = dashboard::settings(&draft, &current, Some(&message), None);
        return Ok(ctx.render(StatusCode::UNPROCESSABLE_ENTITY, "Settings", Nav::Dashboard, body));
    }

    match state
        .api
        .update_profile(&session.token, draft.to_payload(avatar))
        .await
    {
        Ok(_) => Ok(redirect_with(
            "/dashboard/settings",
            Notification::success("Profile updated."),
        )),
        Err(err) => {
            let (status, message) = form_failure(err, "profile")?;
            let body = dashboard::settings(&draft, &current, Some(&message), None);
            Ok(ctx.render(status, "Settings", Nav::Dashboard, body))
        }
    }
}

/// change_password
///
/// [Dashboard Route] The confirmation must match before the backend is asked.
pub async fn change_password(
    ctx: PageContext,
    session: Session,
    State(state): State<AppState>,
    Form(form): Form<PasswordChangeForm>,
) -> AppResult<Response> {
    let checked = if form.current_password.is_empty() {
        Err("Current password is required.".to_string())
    } else {
        check_new_password(&form.new_password, &form.confirm_password)
    };

    let failure = match checked {
        Err(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
        Ok(()) => match state.api.change_password(&session.token, &form).await {
            Ok(()) => {
                tracing::info!("Password changed");
                return Ok(redirect_with(
                    "/dashboard/settings",
                    Notification::success("Password changed."),
                ));
            }
            Err(err) => form_failure(err, "password")?,
        },
    };

    let profile = state.api.get_profile(&session.token).await?;
    let body = dashboard::settings(
        &ProfileDraft::from_profile(&profile),
        &profile.avatar_url,
        None,
        Some(&failure.1),
    );
    Ok(ctx.render(failure.0, "Settings", Nav::Dashboard, body))
}

// --- CV Showcase ---

pub async fn cv(
    ctx: PageContext,
    _session: Session,
    State(state): State<AppState>,
) -> AppResult<Response> {
    let cv = state.api.get_cv_showcase().await?;
    let draft = cv.as_ref().map(CvDraft::from_showcase).unwrap_or_default();
    let attachments = cv.map(|cv| cv.attachments).unwrap_or_default();
    Ok(ctx.dashboard("CV showcase", dashboard::cv_form(&draft, &attachments, None)))
}

/// cv_save
///
/// [Dashboard Route] Saves the showcase. New attachments are added to the
/// ones already stored.
pub async fn cv_save(
    ctx: PageContext,
    session: Session,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Response> {
    let mut form = read_form(multipart).await?;
    let draft = CvDraft::from_form(&form);
    let attachments: Vec<FilePart> = form
        .take_files()
        .into_iter()
        .filter(|f| f.field == "attachments")
        .collect();
    let stored = state
        .api
        .get_cv_showcase()
        .await?
        .map(|cv| cv.attachments)
        .unwrap_or_default();

    if let Err(message) = draft.validate() {
        let body = dashboard::cv_form(&draft, &stored, Some(&message));
        return Ok(ctx.render(StatusCode::UNPROCESSABLE_ENTITY, "CV showcase", Nav::Dashboard, body));
    }

    match state
        .api
        .save_cv_showcase(&session.token, draft.to_payload(attachments))
        .await
    {
        Ok(_) => Ok(redirect_with("/dashboard/cv", Notification::success("CV saved."))),
        Err(err) => {
            let (status, message) = form_failure(err, "CV")?;
            let body = dashboard::cv_form(&draft, &stored, Some(&message));
            Ok(ctx.render(status, "CV showcase", Nav::Dashboard, body))
        }
    }
}
