//! In-memory backend with static sample content.
//!
//! Lets the site run without the REST backend (`API_MODE=mock`) and backs the
//! test suite. Data lives for the life of the process.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::RwLock;

use super::{
    ApiResult, FormPayload, PortfolioApi,
    payload::{BlogDraft, CvDraft, ProfileDraft, ProjectDraft},
};
use crate::{
    error::ApiError,
    models::{
        Attachment, AuthResponse, Blog, ContactMessage, ContactSubmission, Credentials,
        CvShowcase, ListQuery, Paginated, PasswordChangeForm, Project, ProjectCategory, Skill,
        SignupForm, UserProfile,
    },
    search,
};

/// Token handed out by `login`/`signup` and the only one accepted afterwards.
pub const MOCK_TOKEN: &str = "mock-token";
pub const MOCK_PASSWORD: &str = "password";

#[derive(Debug, Default)]
struct MockData {
    blogs: Vec<Blog>,
    projects: Vec<Project>,
    categories: Vec<ProjectCategory>,
    cv: Option<CvShowcase>,
    messages: Vec<ContactMessage>,
    profile: UserProfile,
    password: String,
    next_id: u64,
}

impl MockData {
    fn next_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }
}

/// MockPortfolioApi
pub struct MockPortfolioApi {
    data: RwLock<MockData>,
    /// When true, every call fails as if the backend were down.
    pub should_fail: bool,
}

impl Default for MockPortfolioApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPortfolioApi {
    /// Backend seeded with the sample portfolio.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(sample_data()),
            should_fail: false,
        }
    }

    /// Backend with no content at all.
    pub fn empty() -> Self {
        Self {
            data: RwLock::new(MockData {
                profile: sample_profile(),
                password: MOCK_PASSWORD.to_string(),
                next_id: 100,
                ..Default::default()
            }),
            should_fail: false,
        }
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }

    fn available(&self) -> ApiResult<()> {
        if self.should_fail {
            return Err(ApiError::Status {
                status: 503,
                message: "Mock backend unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn authorize(&self, token: &str) -> ApiResult<()> {
        self.available()?;
        if token != MOCK_TOKEN {
            return Err(ApiError::Unauthorized);
        }
        Ok(())
    }
}

fn rejected(message: String) -> ApiError {
    ApiError::Status {
        status: 422,
        message,
    }
}

fn upload_url(payload: &FormPayload, field: &str) -> Option<String> {
    payload
        .file(field)
        .map(|file| format!("/uploads/{}", file.filename))
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn page_of<T>(items: Vec<T>, query: &ListQuery) -> Paginated<T> {
    let total = items.len();
    let per_page = query.limit.unwrap_or(total.max(1));
    let slice = search::paginate(items, query.page.unwrap_or(1), per_page);
    Paginated {
        items: slice.items,
        total,
        page: slice.page,
        per_page: slice.per_page,
    }
}

#[async_trait]
impl PortfolioApi for MockPortfolioApi {
    async fn login(&self, credentials: &Credentials) -> ApiResult<AuthResponse> {
        self.available()?;
        let data = self.data.read().await;
        if credentials.username.trim() != data.profile.username || credentials.password != data.password {
            return Err(ApiError::Unauthorized);
        }
        Ok(AuthResponse {
            token: MOCK_TOKEN.to_string(),
            user: Some(data.profile.clone()),
        })
    }

    async fn signup(&self, form: &SignupForm) -> ApiResult<AuthResponse> {
        self.available()?;
        let mut data = self.data.write().await;
        if form.username.trim().is_empty() || form.password.is_empty() {
            return Err(rejected("Username and password are required.".to_string()));
        }
        if form.username.trim() == data.profile.username {
            return Err(ApiError::Status {
                status: 409,
                message: "Username is already taken.".to_string(),
            });
        }
        // The mock holds a single account; signing up replaces it.
        let id = data.next_id();
        data.profile = UserProfile {
            id,
            username: form.username.trim().to_string(),
            email: Some(form.email.trim().to_string()).filter(|e| !e.is_empty()),
            ..Default::default()
        };
        data.password = form.password.clone();
        Ok(AuthResponse {
            token: MOCK_TOKEN.to_string(),
            user: Some(data.profile.clone()),
        })
    }

    async fn list_blogs(&self, query: &ListQuery) -> ApiResult<Paginated<Blog>> {
        self.available()?;
        let data = self.data.read().await;
        let blogs: Vec<Blog> = data
            .blogs
            .iter()
            .filter(|blog| match query.search.as_deref() {
                Some(q) => contains(&blog.title, q) || contains(&blog.content, q),
                None => true,
            })
            .filter(|blog| match query.tag.as_deref() {
                Some(tag) => blog.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)),
                None => true,
            })
            .cloned()
            .collect();
        Ok(page_of(blogs, query))
    }

    async fn get_blog(&self, id: &str) -> ApiResult<Blog> {
        self.available()?;
        let data = self.data.read().await;
        data.blogs
            .iter()
            .find(|b| b.id == id || b.slug.as_deref() == Some(id))
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn create_blog(&self, token: &str, payload: FormPayload) -> ApiResult<Blog> {
        self.authorize(token)?;
        let draft = BlogDraft::from_form(&payload);
        draft.validate().map_err(rejected)?;

        let mut data = self.data.write().await;
        let now = Utc::now();
        let blog = Blog {
            id: data.next_id(),
            slug: Some(slugify(&draft.title)),
            title: draft.title,
            summary: draft.summary,
            content: draft.content,
            cover_image: upload_url(&payload, "cover_image"),
            tags: draft.tags,
            published: draft.published,
            created_at: Some(now),
            updated_at: Some(now),
        };
        data.blogs.insert(0, blog.clone());
        Ok(blog)
    }

    async fn update_blog(&self, token: &str, id: &str, payload: FormPayload) -> ApiResult<Blog> {
        self.authorize(token)?;
        let draft = BlogDraft::from_form(&payload);
        draft.validate().map_err(rejected)?;

        let mut data = self.data.write().await;
        let blog = data
            .blogs
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(ApiError::NotFound)?;
        blog.title = draft.title;
        blog.summary = draft.summary;
        blog.content = draft.content;
        blog.tags = draft.tags;
        blog.published = draft.published;
        if let Some(url) = upload_url(&payload, "cover_image") {
            blog.cover_image = Some(url);
        }
        blog.updated_at = Some(Utc::now());
        Ok(blog.clone())
    }

    async fn delete_blog(&self, token: &str, id: &str) -> ApiResult<()> {
        self.authorize(token)?;
        let mut data = self.data.write().await;
        let before = data.blogs.len();
        data.blogs.retain(|b| b.id != id);
        if data.blogs.len() == before {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }

    async fn list_projects(&self, query: &ListQuery) -> ApiResult<Paginated<Project>> {
        self.available()?;
        let data = self.data.read().await;
        let projects: Vec<Project> = data
            .projects
            .iter()
            .filter(|p| match query.search.as_deref() {
                Some(q) => contains(&p.title, q) || contains(&p.description, q),
                None => true,
            })
            .filter(|p| match query.category.as_deref() {
                Some(category) => p.category.as_ref().is_some_and(|c| {
                    c.id == category || c.name.eq_ignore_ascii_case(category)
                }),
                None => true,
            })
            .cloned()
            .collect();
        Ok(page_of(projects, query))
    }

    async fn get_project(&self, id: &str) -> ApiResult<Project> {
        self.available()?;
        let data = self.data.read().await;
        data.projects
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn list_categories(&self) -> ApiResult<Vec<ProjectCategory>> {
        self.available()?;
        Ok(self.data.read().await.categories.clone())
    }

    async fn create_project(&self, token: &str, payload: FormPayload) -> ApiResult<Project> {
        self.authorize(token)?;
        let draft = ProjectDraft::from_form(&payload);
        draft.validate().map_err(rejected)?;

        let mut data = self.data.write().await;
        let category = lookup_category(&data.categories, draft.category_id.as_deref());
        let project = Project {
            id: data.next_id(),
            title: draft.title,
            description: draft.description,
            content: draft.content,
            category,
            technologies: draft.technologies,
            cover_image: upload_url(&payload, "cover_image"),
            repo_url: draft.repo_url,
            live_url: draft.live_url,
            featured: draft.featured,
            created_at: Some(Utc::now()),
        };
        data.projects.insert(0, project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        token: &str,
        id: &str,
        payload: FormPayload,
    ) -> ApiResult<Project> {
        self.authorize(token)?;
        let draft = ProjectDraft::from_form(&payload);
        draft.validate().map_err(rejected)?;

        let mut data = self.data.write().await;
        let category = lookup_category(&data.categories, draft.category_id.as_deref());
        let project = data
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ApiError::NotFound)?;
        project.title = draft.title;
        project.description = draft.description;
        project.content = draft.content;
        project.category = category;
        project.technologies = draft.technologies;
        project.repo_url = draft.repo_url;
        project.live_url = draft.live_url;
        project.featured = draft.featured;
        if let Some(url) = upload_url(&payload, "cover_image") {
            project.cover_image = Some(url);
        }
        Ok(project.clone())
    }

    async fn delete_project(&self, token: &str, id: &str) -> ApiResult<()> {
        self.authorize(token)?;
        let mut data = self.data.write().await;
        let before = data.projects.len();
        data.projects.retain(|p| p.id != id);
        if data.projects.len() == before {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }

    async fn get_cv_showcase(&self) -> ApiResult<Option<CvShowcase>> {
        self.available()?;
        Ok(self.data.read().await.cv.clone())
    }

    async fn save_cv_showcase(&self, token: &str, payload: FormPayload) -> ApiResult<CvShowcase> {
        self.authorize(token)?;
        let draft = CvDraft::from_form(&payload);
        draft.validate().map_err(rejected)?;

        let mut data = self.data.write().await;
        let mut attachments = data
            .cv
            .as_ref()
            .map(|cv| cv.attachments.clone())
            .unwrap_or_default();
        for file in payload.files_named("attachments") {
            attachments.push(Attachment {
                id: None,
                name: file.filename.clone(),
                url: format!("/uploads/{}", file.filename),
                mime_type: file.content_type.clone(),
            });
        }
        let cv = CvShowcase {
            id: Some("cv".to_string()),
            headline: draft.headline,
            quote: draft.quote,
            summary: draft.summary,
            skills: draft.skills,
            attachments,
        };
        data.cv = Some(cv.clone());
        Ok(cv)
    }

    async fn submit_contact(&self, submission: &ContactSubmission) -> ApiResult<()> {
        self.available()?;
        let mut data = self.data.write().await;
        let message = ContactMessage {
            id: data.next_id(),
            name: submission.name.clone(),
            email: submission.email.clone(),
            message: submission.message.clone(),
            read: false,
            created_at: Some(Utc::now()),
        };
        data.messages.insert(0, message);
        Ok(())
    }

    async fn list_messages(
        &self,
        token: &str,
        query: &ListQuery,
    ) -> ApiResult<Paginated<ContactMessage>> {
        self.authorize(token)?;
        let data = self.data.read().await;
        let messages: Vec<ContactMessage> = data
            .messages
            .iter()
            .filter(|m| match query.search.as_deref() {
                Some(q) => contains(&m.name, q) || contains(&m.email, q) || contains(&m.message, q),
                None => true,
            })
            .cloned()
            .collect();
        Ok(page_of(messages, query))
    }

    async fn mark_message_read(&self, token: &str, id: &str) -> ApiResult<()> {
        self.authorize(token)?;
        let mut data = self.data.write().await;
        let message = data
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(ApiError::NotFound)?;
        message.read = true;
        Ok(())
    }

    async fn delete_message(&self, token: &str, id: &str) -> ApiResult<()> {
        self.authorize(token)?;
        let mut data = self.data.write().await;
        let before = data.messages.len();
        data.messages.retain(|m| m.id != id);
        if data.messages.len() == before {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }

    async fn get_profile(&self, token: &str) -> ApiResult<UserProfile> {
        self.authorize(token)?;
        Ok(self.data.read().await.profile.clone())
    }

    async fn update_profile(&self, token: &str, payload: FormPayload) -> ApiResult<UserProfile> {
        self.authorize(token)?;
        let draft = ProfileDraft::from_form(&payload);
        draft.validate().map_err(rejected)?;

        let mut data = self.data.write().await;
        data.profile.username = draft.username;
        data.profile.email = draft.email;
        data.profile.display_name = draft.display_name;
        if let Some(url) = upload_url(&payload, "avatar") {
            data.profile.avatar_url = Some(url);
        }
        Ok(data.profile.clone())
    }

    async fn change_password(&self, token: &str, form: &PasswordChangeForm) -> ApiResult<()> {
        self.authorize(token)?;
        let mut data = self.data.write().await;
        if form.current_password != data.password {
            return Err(ApiError::Status {
                status: 400,
                message: "Current password is incorrect.".to_string(),
            });
        }
        data.password = form.new_password.clone();
        Ok(())
    }
}

fn lookup_category(categories: &[ProjectCategory], id: Option<&str>) -> Option<ProjectCategory> {
    let id = id?;
    categories.iter().find(|c| c.id == id).cloned()
}

/// Lowercase, ASCII alphanumerics joined by single dashes.
pub fn slugify(title: &str) -> String {
    title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

// --- Sample Content ---

fn sample_profile() -> UserProfile {
    UserProfile {
        id: "1".to_string(),
        username: "admin".to_string(),
        email: Some("admin@example.com".to_string()),
        display_name: Some("Site Owner".to_string()),
        avatar_url: None,
    }
}

fn sample_data() -> MockData {
    let date = |y, m, d| Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).single();

    let systems = ProjectCategory {
        id: "c1".to_string(),
        name: "Systems".to_string(),
        slug: Some("systems".to_string()),
    };
    let web = ProjectCategory {
        id: "c2".to_string(),
        name: "Web Apps".to_string(),
        slug: Some("web-apps".to_string()),
    };
    let tools = ProjectCategory {
        id: "c3".to_string(),
        name: "Tooling".to_string(),
        slug: Some("tooling".to_string()),
    };

    let project = |id: &str,
                   title: &str,
                   description: &str,
                   category: &ProjectCategory,
                   techs: &[&str],
                   featured: bool| Project {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        content: Some(format!("## {title}\n\n{description}")),
        category: Some(category.clone()),
        technologies: techs.iter().map(|t| t.to_string()).collect(),
        cover_image: None,
        repo_url: Some(format!("https://github.com/example/{}", slugify(title))),
        live_url: None,
        featured,
        created_at: date(2024, 3, 1),
    };

    let projects = vec![
        project("p1", "Log Shipper", "Tails files and ships structured logs over TCP.", &systems, &["Rust", "Tokio"], true),
        project("p2", "Recipe Box", "A small web app for collecting and scaling recipes.", &web, &["TypeScript", "React"], true),
        project("p3", "Snippet CLI", "Command-line snippet manager with fuzzy search.", &tools, &["Rust", "Clap"], false),
        project("p4", "Status Board", "Dashboard that polls services and shows uptime.", &web, &["Rust", "Axum"], true),
        project("p5", "Key-Value Store", "Append-only storage engine with compaction.", &systems, &["Rust"], false),
        project("p6", "Invoice Generator", "Turns time entries into PDF invoices.", &tools, &["Python"], false),
        project("p7", "Chat Relay", "WebSocket relay with rooms and presence.", &web, &["Go", "WebSocket"], false),
    ];

    let blog = |id: &str, title: &str, tags: &[&str], published: bool, day| Blog {
        id: id.to_string(),
        title: title.to_string(),
        slug: Some(slugify(title)),
        summary: Some(format!("Notes on {}.", title.to_lowercase())),
        content: format!("# {title}\n\nThis post covers **{}** in practice.\n\n- one\n- two", title.to_lowercase()),
        cover_image: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        published,
        created_at: date(2024, 5, day),
        updated_at: date(2024, 5, day),
    };

    let blogs = vec![
        blog("b1", "Error Handling Without Tears", &["rust", "errors"], true, 20),
        blog("b2", "Shipping a Portfolio Site", &["web"], true, 12),
        blog("b3", "Async Streams", &["rust", "async"], true, 5),
        blog("b4", "Draft Thoughts on Testing", &["testing"], false, 2),
    ];

    let cv = CvShowcase {
        id: Some("cv".to_string()),
        headline: "Software engineer building reliable systems".to_string(),
        quote: Some("Make it work, make it right, make it fast.".to_string()),
        summary: Some("Ten years of backend and infrastructure work.".to_string()),
        skills: vec![
            Skill { name: "Rust".to_string(), level: Some(90) },
            Skill { name: "PostgreSQL".to_string(), level: Some(80) },
            Skill { name: "TypeScript".to_string(), level: Some(70) },
        ],
        attachments: vec![Attachment {
            id: Some("a1".to_string()),
            name: "resume.pdf".to_string(),
            url: "/uploads/resume.pdf".to_string(),
            mime_type: Some("application/pdf".to_string()),
        }],
    };

    let messages = vec![ContactMessage {
        id: "m1".to_string(),
        name: "Grace".to_string(),
        email: "grace@example.com".to_string(),
        message: "Loved the log shipper write-up. Are you available for a chat?".to_string(),
        read: false,
        created_at: date(2024, 6, 1),
    }];

    MockData {
        blogs,
        projects,
        categories: vec![systems, web, tools],
        cv: Some(cv),
        messages,
        profile: sample_profile(),
        password: MOCK_PASSWORD.to_string(),
        next_id: 100,
    }
}
