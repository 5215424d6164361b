//! Request handlers, grouped by area.
//!
//! HTML handlers render through [`PageContext`], which picks up the pending
//! flash notification and knows whether the visitor is signed in. Mutations
//! finish with [`redirect_with`] so the toast shows on the next page.

use axum::{
    extract::{FromRef, FromRequestParts, Multipart, multipart::MultipartError},
    http::{HeaderValue, StatusCode, header, request::Parts},
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    api::{FilePart, FormPayload},
    auth,
    config::AppConfig,
    error::{ApiError, AppError, AppResult},
    flash,
    models::Notification,
    routes::dashboard::MAX_UPLOAD_BYTES,
    views::layout::{Nav, Page},
};

pub mod api;
pub mod contact;
pub mod dashboard;
pub mod session;
pub mod site;

/// PageContext
///
/// Per-request rendering context: site configuration, sign-in state and the
/// flash notification to show (if any).
#[derive(Debug, Clone)]
pub struct PageContext {
    pub config: AppConfig,
    pub signed_in: bool,
    pub notification: Option<Notification>,
    flash_pending: bool,
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);
        let signed_in = auth::live_token(&parts.headers, &config).is_some();
        let flash_pending = auth::read_cookie(&parts.headers, flash::FLASH_COOKIE).is_some();
        Ok(Self {
            notification: flash::take(&parts.headers),
            signed_in,
            flash_pending,
            config,
        })
    }
}

impl PageContext {
    pub fn site(self, title: &str, body: String) -> Response {
        self.render(StatusCode::OK, title, Nav::Site, body)
    }

    pub fn dashboard(self, title: &str, body: String) -> Response {
        self.render(StatusCode::OK, title, Nav::Dashboard, body)
    }

    /// Renders the layout around `body` and consumes the flash cookie.
    pub fn render(self, status: StatusCode, title: &str, nav: Nav, body: String) -> Response {
        let html = Page::new(&self.config.site_title, title, nav, body)
            .signed_in(self.signed_in || nav == Nav::Dashboard)
            .notification(self.notification)
            .render();
        let mut response = (status, Html(html)).into_response();
        if self.flash_pending {
            append_cookie(&mut response, &flash::clear());
        }
        response
    }
}

pub(crate) fn append_cookie(response: &mut Response, cookie: &str) {
    if let Ok(value) = HeaderValue::from_str(cookie) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
}

/// Status for a form re-rendered after a backend failure: the backend's own
/// 4xx answers are the visitor's to fix, anything else is upstream trouble.
pub fn form_status(err: &ApiError) -> StatusCode {
    match err {
        ApiError::Status { status, .. } if (400..500).contains(status) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ApiError::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    }
}

/// 303 redirect carrying a toast for the next page.
pub fn redirect_with(to: &str, notification: Notification) -> Response {
    let mut response = Redirect::to(to).into_response();
    append_cookie(&mut response, &flash::cookie_for(&notification));
    response
}

/// read_form
///
/// Collects a `multipart/form-data` body into a [`FormPayload`]. Parts with a
/// filename become file parts; everything else is a text field.
pub async fn read_form(mut multipart: Multipart) -> AppResult<FormPayload> {
    let mut payload = FormPayload::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| form_error(e, "Malformed form data"))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(filename) => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| form_error(e, "Upload failed"))?;
                payload.push_file(FilePart {
                    field: name,
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            None => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| form_error(e, "Malformed form data"))?;
                payload.push_text(&name, text);
            }
        }
    }
    Ok(payload)
}

/// Hitting the body limit surfaces mid-stream as a multipart error carrying 413.
fn form_error(err: MultipartError, context: &str) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!(limit = MAX_UPLOAD_BYTES, "Rejected oversized form body");
        AppError::PayloadTooLarge {
            limit: MAX_UPLOAD_BYTES,
        }
    } else {
        AppError::Validation(format!("{context}: {err}"))
    }
}
