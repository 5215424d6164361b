//! Multipart payload assembly for dashboard create/update calls.
//!
//! Dashboard forms arrive as `multipart/form-data`; they are parsed into a
//! draft (for validation and for re-rendering on error) and the draft is turned
//! back into a `FormPayload` that goes to the backend as multipart.

use crate::{
    error::ApiError,
    models::{Blog, CvShowcase, Project, Skill, UserProfile},
};

/// FilePart
///
/// An uploaded file forwarded as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FilePart {
    /// Browsers post an empty part for a file input left blank.
    pub fn is_empty(&self) -> bool {
        self.filename.trim().is_empty() || self.bytes.is_empty()
    }
}

/// FormPayload
///
/// Ordered text fields (repeated keys allowed) plus file parts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPayload {
    fields: Vec<(String, String)>,
    files: Vec<FilePart>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, key: &str, value: impl Into<String>) -> Self {
        self.push_text(key, value);
        self
    }

    pub fn push_text(&mut self, key: &str, value: impl Into<String>) {
        self.fields.push((key.to_string(), value.into()));
    }

    /// Adds a file part; empty parts are dropped so an update without a new
    /// upload keeps the stored file.
    pub fn push_file(&mut self, file: FilePart) {
        if !file.is_empty() {
            self.files.push(file);
        }
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn files(&self) -> &[FilePart] {
        &self.files
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn file(&self, field: &str) -> Option<&FilePart> {
        self.files.iter().find(|f| f.field == field)
    }

    pub fn files_named(&self, field: &str) -> Vec<&FilePart> {
        self.files.iter().filter(|f| f.field == field).collect()
    }

    /// Takes the file parts out, leaving the text fields.
    pub fn take_files(&mut self) -> Vec<FilePart> {
        std::mem::take(&mut self.files)
    }

    fn string(&self, key: &str) -> String {
        self.get(key).map(str::trim).unwrap_or_default().to_string()
    }

    fn optional(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn flag(&self, key: &str) -> bool {
        self.get_all(key)
            .iter()
            .any(|v| matches!(v.trim(), "on" | "true" | "1"))
    }

    /// All values for a list field. Each value may itself be comma separated,
    /// so a single text input and repeated wire fields parse the same way.
    fn list(&self, key: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for value in self.get_all(key) {
            for item in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                if !out.iter().any(|seen| seen.eq_ignore_ascii_case(item)) {
                    out.push(item.to_string());
                }
            }
        }
        out
    }

    /// Converts into a `reqwest` multipart body.
    pub fn into_multipart(self) -> Result<reqwest::multipart::Form, ApiError> {
        let mut form = reqwest::multipart::Form::new();
        for (key, value) in self.fields {
            form = form.text(key, value);
        }
        for file in self.files {
            let mut part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.filename);
            if let Some(content_type) = file.content_type {
                part = part.mime_str(&content_type)?;
            }
            form = form.part(file.field, part);
        }
        Ok(form)
    }
}

// --- Drafts ---

fn require(value: &str, label: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{label} is required."))
    } else {
        Ok(())
    }
}

fn check_url(value: &Option<String>, label: &str) -> Result<(), String> {
    match value {
        Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
            Err(format!("{label} must start with http:// or https://."))
        }
        _ => Ok(()),
    }
}

/// BlogDraft
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogDraft {
    pub title: String,
    pub summary: Option<String>,
    pub content: String,
    pub tags: Vec<String>,
    pub published: bool,
}

impl BlogDraft {
    pub fn from_form(form: &FormPayload) -> Self {
        Self {
            title: form.string("title"),
            summary: form.optional("summary"),
            content: form.get("content").unwrap_or_default().to_string(),
            tags: form.list("tags"),
            published: form.flag("published"),
        }
    }

    pub fn from_blog(blog: &Blog) -> Self {
        Self {
            title: blog.title.clone(),
            summary: blog.summary.clone(),
            content: blog.content.clone(),
            tags: blog.tags.clone(),
            published: blog.published,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        require(&self.title, "Title")?;
        require(&self.content, "Content")
    }

    pub fn to_payload(&self, cover_image: Option<FilePart>) -> FormPayload {
        let mut payload = FormPayload::new()
            .text("title", &self.title)
            .text("content", &self.content)
            .text("published", self.published.to_string());
        if let Some(summary) = &self.summary {
            payload.push_text("summary", summary);
        }
        for tag in &self.tags {
            payload.push_text("tags", tag);
        }
        if let Some(file) = cover_image {
            payload.push_file(FilePart {
                field: "cover_image".to_string(),
                ..file
            });
        }
        payload
    }
}

/// ProjectDraft
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub content: Option<String>,
    pub category_id: Option<String>,
    pub technologies: Vec<String>,
    pub repo_url: Option<String>,
    pub live_url: Option<String>,
    pub featured: bool,
}

impl ProjectDraft {
    pub fn from_form(form: &FormPayload) -> Self {
        Self {
            title: form.string("title"),
            description: form.string("description"),
            content: form.optional("content"),
            category_id: form.optional("category"),
            technologies: form.list("technologies"),
            repo_url: form.optional("repo_url"),
            live_url: form.optional("live_url"),
            featured: form.flag("featured"),
        }
    }

    pub fn from_project(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            content: project.content.clone(),
            category_id: project.category.as_ref().map(|c| c.id.clone()),
            technologies: project.technologies.clone(),
            repo_url: project.repo_url.clone(),
            live_url: project.live_url.clone(),
            featured: project.featured,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        require(&self.title, "Title")?;
        require(&self.description, "Description")?;
        check_url(&self.repo_url, "Repository URL")?;
        check_url(&self.live_url, "Live URL")
    }

    pub fn to_payload(&self, cover_image: Option<FilePart>) -> FormPayload {
        let mut payload = FormPayload::new()
            .text("title", &self.title)
            .text("description", &self.description)
            .text("featured", self.featured.to_string());
        let optional = [
            ("content", &self.content),
            ("category", &self.category_id),
            ("repo_url", &self.repo_url),
            ("live_url", &self.live_url),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                payload.push_text(key, value);
            }
        }
        for tech in &self.technologies {
            payload.push_text("technologies", tech);
        }
        if let Some(file) = cover_image {
            payload.push_file(FilePart {
                field: "cover_image".to_string(),
                ..file
            });
        }
        payload
    }
}

/// CvDraft
///
/// Skills are edited as one `Name: level` per line and sent as a JSON array,
/// since multipart cannot nest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CvDraft {
    pub headline: String,
    pub quote: Option<String>,
    pub summary: Option<String>,
    pub skills: Vec<Skill>,
}

impl CvDraft {
    pub fn from_form(form: &FormPayload) -> Self {
        Self {
            headline: form.string("headline"),
            quote: form.optional("quote"),
            summary: form.optional("summary"),
            skills: form.get("skills").map(parse_skills).unwrap_or_default(),
        }
    }

    pub fn from_showcase(cv: &CvShowcase) -> Self {
        Self {
            headline: cv.headline.clone(),
            quote: cv.quote.clone(),
            summary: cv.summary.clone(),
            skills: cv.skills.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        require(&self.headline, "Headline")
    }

    /// Skills in the textarea format.
    pub fn skills_text(&self) -> String {
        self.skills
            .iter()
            .map(|skill| match skill.level {
                Some(level) => format!("{}: {}", skill.name, level),
                None => skill.name.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_payload(&self, attachments: Vec<FilePart>) -> FormPayload {
        let skills = serde_json::to_string(&self.skills).unwrap_or_else(|_| "[]".to_string());
        let mut payload = FormPayload::new()
            .text("headline", &self.headline)
            .text("skills", skills);
        if let Some(quote) = &self.quote {
            payload.push_text("quote", quote);
        }
        if let Some(summary) = &self.summary {
            payload.push_text("summary", summary);
        }
        for file in attachments {
            payload.push_file(FilePart {
                field: "attachments".to_string(),
                ..file
            });
        }
        payload
    }
}

/// parse_skills
///
/// Accepts either the JSON wire form or the textarea form
/// (`Rust: 90`, `Go`, one per line). Levels above 100 are capped.
pub fn parse_skills(raw: &str) -> Vec<Skill> {
    if let Ok(skills) = serde_json::from_str::<Vec<Skill>>(raw) {
        return skills;
    }
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.rsplit_once(':') {
            Some((name, level)) => match level.trim().trim_end_matches('%').parse::<u16>() {
                Ok(level) => Skill {
                    name: name.trim().to_string(),
                    level: Some(level.min(100) as u8),
                },
                Err(_) => Skill {
                    name: line.to_string(),
                    level: None,
                },
            },
            None => Skill {
                name: line.to_string(),
                level: None,
            },
        })
        .collect()
}

/// ProfileDraft
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDraft {
    pub username: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl ProfileDraft {
    pub fn from_form(form: &FormPayload) -> Self {
        Self {
            username: form.string("username"),
            email: form.optional("email"),
            display_name: form.optional("display_name"),
        }
    }

    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            username: profile.username.clone(),
            email: profile.email.clone(),
            display_name: profile.display_name.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        require(&self.username, "Username")?;
        match &self.email {
            Some(email) if !crate::contact::looks_like_email(email) => {
                Err("Email address is not valid.".to_string())
            }
            _ => Ok(()),
        }
    }

    pub fn to_payload(&self, avatar: Option<FilePart>) -> FormPayload {
        let mut payload = FormPayload::new().text("username", &self.username);
        if let Some(email) = &self.email {
            payload.push_text("email", email);
        }
        if let Some(display_name) = &self.display_name {
            payload.push_text("display_name", display_name);
        }
        if let Some(file) = avatar {
            payload.push_file(FilePart {
                field: "avatar".to_string(),
                ..file
            });
        }
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(field: &str, name: &str, bytes: &[u8]) -> FilePart {
        FilePart {
            field: field.to_string(),
            filename: name.to_string(),
            content_type: Some("image/png".to_string()),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn empty_file_inputs_are_dropped() {
        let mut payload = FormPayload::new();
        payload.push_file(file("cover_image", "", b""));
        payload.push_file(file("cover_image", "a.png", b""));
        assert!(payload.files().is_empty());
        payload.push_file(file("cover_image", "a.png", b"png"));
        assert_eq!(payload.files().len(), 1);
    }

    #[test]
    fn blog_form_parses_tags_and_checkbox() {
        let form = FormPayload::new()
            .text("title", "  Hello  ")
            .text("content", "Body")
            .text("tags", "rust, web ,Rust,, axum")
            .text("published", "on");
        let draft = BlogDraft::from_form(&form);
        assert_eq!(draft.title, "Hello");
        assert_eq!(draft.tags, vec!["rust", "web", "axum"]);
        assert!(draft.published);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn blog_payload_repeats_tags_and_renames_cover() {
        let draft = BlogDraft {
            title: "T".into(),
            content: "C".into(),
            tags: vec!["a".into(), "b".into()],
            ..Default::default()
        };
        let payload = draft.to_payload(Some(file("cover", "c.png", b"x")));
        assert_eq!(payload.get_all("tags"), vec!["a", "b"]);
        assert_eq!(payload.get("published"), Some("false"));
        assert!(payload.file("cover_image").is_some());

        // The wire payload parses back into the same draft.
        assert_eq!(BlogDraft::from_form(&payload), draft);
    }

    #[test]
    fn blog_requires_title_and_content() {
        let draft = BlogDraft {
            title: "T".into(),
            ..Default::default()
        };
        assert_eq!(draft.validate(), Err("Content is required.".to_string()));
    }

    #[test]
    fn project_rejects_non_http_links() {
        let form = FormPayload::new()
            .text("title", "P")
            .text("description", "D")
            .text("repo_url", "javascript:alert(1)");
        let draft = ProjectDraft::from_form(&form);
        assert!(draft.validate().is_err());
    }

    #[test]
    fn skills_parse_from_textarea_and_json() {
        let skills = parse_skills("Rust: 90\nGo\n\nSQL: 150%");
        assert_eq!(
            skills,
            vec![
                Skill { name: "Rust".into(), level: Some(90) },
                Skill { name: "Go".into(), level: None },
                Skill { name: "SQL".into(), level: Some(100) },
            ]
        );
        let json = serde_json::to_string(&skills).unwrap();
        assert_eq!(parse_skills(&json), skills);
    }

    #[test]
    fn json_skill_levels_are_clamped() {
        assert_eq!(
            parse_skills(r#"[{"name":"Rust","level":200},{"name":"Zig","level":300},{"name":"Go","level":-5}]"#),
            vec![
                Skill { name: "Rust".into(), level: Some(100) },
                Skill { name: "Zig".into(), level: Some(100) },
                Skill { name: "Go".into(), level: Some(0) },
            ]
        );
        let cv: CvShowcase =
            serde_json::from_str(r#"{"headline":"H","skills":[{"name":"Rust","level":250},{"name":"SQL","level":null}]}"#)
                .unwrap();
        assert_eq!(cv.skills[0].level, Some(100));
        assert_eq!(cv.skills[1].level, None);
    }

    #[test]
    fn cv_payload_carries_attachments() {
        let draft = CvDraft {
            headline: "Engineer".into(),
            skills: vec![Skill { name: "Rust".into(), level: Some(80) }],
            ..Default::default()
        };
        assert_eq!(draft.skills_text(), "Rust: 80");
        let payload = draft.to_payload(vec![file("files", "cv.pdf", b"%PDF")]);
        assert_eq!(payload.files_named("attachments").len(), 1);
        assert_eq!(CvDraft::from_form(&payload), draft);
    }

    #[test]
    fn multipart_conversion_accepts_content_types() {
        let mut payload = FormPayload::new().text("title", "T");
        payload.push_file(file("cover_image", "c.png", b"x"));
        assert!(payload.into_multipart().is_ok());
    }
}
