use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

// --- Content Entities (Mirrored from the Backend) ---

/// Blog
///
/// A blog post as returned by `/api/blog`. The body is Markdown authored in the
/// dashboard editor.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Blog {
    #[serde(alias = "_id", deserialize_with = "id_from_any")]
    pub id: String,
    pub title: String,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub content: String,
    #[serde(alias = "coverImage")]
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub published: bool,
    #[serde(alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(alias = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Project
///
/// A portfolio project listing from `/api/projects`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, ToSchema)]
#[serde(default)]
pub struct Project {
    #[serde(alias = "_id", deserialize_with = "id_from_any")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: Option<String>,
    pub category: Option<ProjectCategory>,
    pub technologies: Vec<String>,
    #[serde(alias = "coverImage")]
    pub cover_image: Option<String>,
    #[serde(alias = "repoUrl")]
    pub repo_url: Option<String>,
    #[serde(alias = "liveUrl")]
    pub live_url: Option<String>,
    pub featured: bool,
    #[serde(alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// ProjectCategory
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, ToSchema)]
#[serde(default)]
pub struct ProjectCategory {
    #[serde(alias = "_id", deserialize_with = "id_from_any")]
    pub id: String,
    pub name: String,
    pub slug: Option<String>,
}

/// CvShowcase
///
/// The curated resume-like page: headline, quote, skills and downloadable attachments.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CvShowcase {
    #[serde(alias = "_id", deserialize_with = "opt_id_from_any")]
    pub id: Option<String>,
    pub headline: String,
    pub quote: Option<String>,
    pub summary: Option<String>,
    pub skills: Vec<Skill>,
    pub attachments: Vec<Attachment>,
}

/// Skill
///
/// `level` is a percentage when the backend provides one.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Skill {
    pub name: String,
    #[serde(deserialize_with = "level_from_any")]
    pub level: Option<u8>,
}

/// Attachment
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Attachment {
    #[serde(alias = "_id", deserialize_with = "opt_id_from_any")]
    pub id: Option<String>,
    pub name: String,
    pub url: String,
    #[serde(alias = "mimeType")]
    pub mime_type: Option<String>,
}

/// ContactMessage
///
/// A message left through the public contact wizard, listed in the dashboard inbox.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ContactMessage {
    #[serde(alias = "_id", deserialize_with = "id_from_any")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub read: bool,
    #[serde(alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// UserProfile
///
/// The signed-in administrator, served by `/api/security/profile`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct UserProfile {
    #[serde(alias = "_id", deserialize_with = "id_from_any")]
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    #[serde(alias = "displayName")]
    pub display_name: Option<String>,
    #[serde(alias = "avatarUrl")]
    pub avatar_url: Option<String>,
}

/// AuthResponse
///
/// Result of `/auth/login` and `/auth/signup`. Some backends name the token
/// `access_token`, both are accepted.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthResponse {
    #[serde(alias = "access_token", alias = "accessToken")]
    pub token: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

// --- Notifications ---

/// NotificationKind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// Notification
///
/// A toast shown once on the next rendered page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            message: message.into(),
        }
    }
}

// --- List Envelope ---

/// Paginated
///
/// A page of results. The backend either wraps lists in an envelope
/// (`items`/`data`, `total`, `page`, `limit`) or returns a bare array; both
/// deserialize into this type.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

impl<T> Paginated<T> {
    /// Wraps a complete list as a single page.
    pub fn single(items: Vec<T>) -> Self {
        let total = items.len();
        Self {
            items,
            total,
            page: 1,
            per_page: total.max(1),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PaginatedWire<T> {
    Bare(Vec<T>),
    Envelope {
        #[serde(alias = "data", alias = "results")]
        items: Vec<T>,
        #[serde(default, alias = "count", alias = "totalItems")]
        total: Option<usize>,
        #[serde(default, alias = "currentPage")]
        page: Option<usize>,
        #[serde(default, alias = "limit", alias = "perPage")]
        per_page: Option<usize>,
    },
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Paginated<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match PaginatedWire::deserialize(deserializer)? {
            PaginatedWire::Bare(items) => Paginated::single(items),
            PaginatedWire::Envelope {
                items,
                total,
                page,
                per_page,
            } => {
                let per_page = per_page.unwrap_or(items.len()).max(1);
                Paginated {
                    total: total.unwrap_or(items.len()),
                    page: page.unwrap_or(1).max(1),
                    per_page,
                    items,
                }
            }
        })
    }
}

// --- Request Payloads ---

/// ListQuery
///
/// Query-string filters forwarded to backend list endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Credentials
///
/// Sign-in form payload, posted to `/auth/login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// SignupForm
///
/// Sign-up form payload. `confirm_password` never leaves this server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupForm {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing)]
    pub confirm_password: String,
}

/// PasswordChangeForm
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PasswordChangeForm {
    pub current_password: String,
    pub new_password: String,
    #[serde(default, skip_serializing)]
    pub confirm_password: String,
}

/// ContactSubmission
///
/// The completed contact wizard, posted to `/api/contact`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

// --- Serde Helpers ---

#[derive(Deserialize)]
#[serde(untagged)]
enum AnyId {
    Text(String),
    Int(i64),
}

impl From<AnyId> for String {
    fn from(id: AnyId) -> String {
        match id {
            AnyId::Text(text) => text,
            AnyId::Int(n) => n.to_string(),
        }
    }
}

/// Backends disagree on numeric vs string identifiers; both become `String`.
fn id_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    AnyId::deserialize(deserializer).map(String::from)
}

fn opt_id_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<AnyId>::deserialize(deserializer).map(|id| id.map(String::from))
}

/// Skill levels are percentages; anything outside 0..=100 is clamped.
fn level_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
    Option::<f64>::deserialize(deserializer)
        .map(|level| level.filter(|l| l.is_finite()).map(|l| l.round().clamp(0.0, 100.0) as u8))
}
