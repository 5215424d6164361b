//! Dashboard pages: content tables, editors and settings.

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use super::{banner, checkbox, esc, format_date, pager, safe_url, text_field, textarea};
use crate::{
    api::payload::{BlogDraft, CvDraft, ProfileDraft, ProjectDraft},
    markdown,
    models::{Attachment, Blog, ContactMessage, Project, ProjectCategory, UserProfile},
    search::PageSlice,
};

fn enc(id: &str) -> String {
    utf8_percent_encode(id, NON_ALPHANUMERIC).to_string()
}

/// Counts shown on the overview page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overview {
    pub blogs: usize,
    pub projects: usize,
    pub messages: usize,
    pub unread: usize,
}

pub fn overview(profile: &UserProfile, counts: &Overview) -> String {
    let name = profile.display_name.as_deref().unwrap_or(&profile.username);
    format!(
        r#"<section><h1>Welcome back, {name}</h1>
<div class="stats">
<a class="stat" href="/dashboard/blogs"><strong>{blogs}</strong> blog posts</a>
<a class="stat" href="/dashboard/projects"><strong>{projects}</strong> projects</a>
<a class="stat" href="/dashboard/messages"><strong>{unread}</strong> unread of {messages} messages</a>
</div>
<p><a class="button" href="/dashboard/blogs/new">Write a post</a> <a class="button" href="/dashboard/projects/new">Add a project</a></p></section>"#,
        name = esc(name),
        blogs = counts.blogs,
        projects = counts.projects,
        unread = counts.unread,
        messages = counts.messages,
    )
}

fn search_form(action: &str, search: Option<&str>) -> String {
    format!(
        r#"<form class="filters" method="get" action="{action}"><input type="search" name="search" placeholder="Search" value="{}"><button type="submit">Search</button></form>"#,
        esc(search.unwrap_or_default())
    )
}

fn list_link(base: &str, search: Option<&str>, page: usize) -> String {
    let mut href = format!("{base}?page={page}");
    if let Some(search) = search {
        href.push_str(&format!("&search={}", enc(search)));
    }
    esc(&href)
}

pub fn blogs(slice: &PageSlice<Blog>, search: Option<&str>, error: Option<&str>) -> String {
    let mut html = format!(
        r#"<section><div class="header-row"><h1>Blogs</h1><a class="button" href="/dashboard/blogs/new">New post</a></div>{}{}"#,
        banner(error),
        search_form("/dashboard/blogs", search)
    );
    html.push_str("<table><thead><tr><th>Title</th><th>Status</th><th>Created</th><th></th></tr></thead><tbody>");
    if slice.items.is_empty() {
        html.push_str(r#"<tr><td colspan="4" class="empty">No posts yet.</td></tr>"#);
    }
    for blog in &slice.items {
        html.push_str(&format!(
            r#"<tr><td>{title}</td><td>{status}</td><td>{date}</td><td class="actions"><a href="/dashboard/blogs/{id}/edit">Edit</a> <a href="/dashboard/blogs/{id}/delete">Delete</a></td></tr>"#,
            title = esc(&blog.title),
            status = if blog.published { "Published" } else { "Draft" },
            date = format_date(&blog.created_at),
            id = enc(&blog.id),
        ));
    }
    html.push_str("</tbody></table>");
    html.push_str(&pager(slice, |page| list_link("/dashboard/blogs", search, page)));
    html.push_str("</section>");
    html
}

fn current_image(url: &Option<String>) -> String {
    url.as_deref()
        .and_then(safe_url)
        .map(|src| format!(r#"<p class="current"><img src="{src}" alt="" width="160"> Current image</p>"#))
        .unwrap_or_default()
}

/// Blog editor. `preview` holds the rendered body when the author asked for one.
pub fn blog_form(
    action: &str,
    draft: &BlogDraft,
    cover_image: &Option<String>,
    preview: bool,
    error: Option<&str>,
) -> String {
    let heading = if action.ends_with("/new") { "New post" } else { "Edit post" };
    let preview_html = if preview {
        format!(
            r#"<section class="preview"><h2>Preview</h2><div class="body">{}</div></section>"#,
            markdown::render(&draft.content)
        )
    } else {
        String::new()
    };
    format!(
        r#"<section><h1>{heading}</h1>{banner}
<form method="post" action="{action}" enctype="multipart/form-data">
{title}{summary}
<label>Content (Markdown)<textarea name="content" rows="18">{content}</textarea></label>
{tags}{published}
{current}<label>Cover image<input type="file" name="cover_image" accept="image/*"></label>
<div class="actions"><button type="submit" name="intent" value="preview">Preview</button><button type="submit" name="intent" value="save">Save</button> <a href="/dashboard/blogs">Cancel</a></div>
</form>{preview_html}</section>"#,
        banner = banner(error),
        action = esc(action),
        title = text_field("title", "Title", &draft.title, true),
        summary = text_field("summary", "Summary", draft.summary.as_deref().unwrap_or_default(), false),
        content = esc(&draft.content),
        tags = text_field("tags", "Tags (comma separated)", &draft.tags.join(", "), false),
        published = checkbox("published", "Published", draft.published),
        current = current_image(cover_image),
    )
}

pub fn projects(slice: &PageSlice<Project>, search: Option<&str>, error: Option<&str>) -> String {
    let mut html = format!(
        r#"<section><div class="header-row"><h1>Projects</h1><a class="button" href="/dashboard/projects/new">New project</a></div>{}{}"#,
        banner(error),
        search_form("/dashboard/projects", search)
    );
    html.push_str("<table><thead><tr><th>Title</th><th>Category</th><th>Featured</th><th></th></tr></thead><tbody>");
    if slice.items.is_empty() {
        html.push_str(r#"<tr><td colspan="4" class="empty">No projects yet.</td></tr>"#);
    }
    for project in &slice.items {
        html.push_str(&format!(
            r#"<tr><td>{title}</td><td>{category}</td><td>{featured}</td><td class="actions"><a href="/dashboard/projects/{id}/edit">Edit</a> <a href="/dashboard/projects/{id}/delete">Delete</a></td></tr>"#,
            title = esc(&project.title),
            category = esc(project.category.as_ref().map(|c| c.name.as_str()).unwrap_or("None")),
            featured = if project.featured { "Yes" } else { "No" },
            id = enc(&project.id),
        ));
    }
    html.push_str("</tbody></table>");
    html.push_str(&pager(slice, |page| list_link("/dashboard/projects", search, page)));
    html.push_str("</section>");
    html
}

pub fn project_form(
    action: &str,
    draft: &ProjectDraft,
    categories: &[ProjectCategory],
    cover_image: &Option<String>,
    error: Option<&str>,
) -> String {
    let heading = if action.ends_with("/new") { "New project" } else { "Edit project" };
    let mut options = String::from(r#"<option value="">No category</option>"#);
    for category in categories {
        let selected = draft.category_id.as_deref() == Some(category.id.as_str());
        options.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            esc(&category.id),
            if selected { " selected" } else { "" },
            esc(&category.name)
        ));
    }
    format!(
        r#"<section><h1>{heading}</h1>{banner}
<form method="post" action="{action}" enctype="multipart/form-data">
{title}{description}{content}
<label>Category<select name="category">{options}</select></label>
{technologies}{repo}{live}{featured}
{current}<label>Cover image<input type="file" name="cover_image" accept="image/*"></label>
<div class="actions"><button type="submit">Save</button> <a href="/dashboard/projects">Cancel</a></div>
</form></section>"#,
        banner = banner(error),
        action = esc(action),
        title = text_field("title", "Title", &draft.title, true),
        description = textarea("description", "Short description", &draft.description, 3),
        content = textarea("content", "Details (Markdown)", draft.content.as_deref().unwrap_or_default(), 12),
        technologies = text_field("technologies", "Technologies (comma separated)", &draft.technologies.join(", "), false),
        repo = text_field("repo_url", "Repository URL", draft.repo_url.as_deref().unwrap_or_default(), false),
        live = text_field("live_url", "Live URL", draft.live_url.as_deref().unwrap_or_default(), false),
        featured = checkbox("featured", "Featured on the home page", draft.featured),
        current = current_image(cover_image),
    )
}

pub fn messages(slice: &PageSlice<ContactMessage>, search: Option<&str>) -> String {
    let mut html = format!(
        "<section><h1>Messages</h1>{}",
        search_form("/dashboard/messages", search)
    );
    if slice.items.is_empty() {
        html.push_str(r#"<p class="empty">The inbox is empty.</p>"#);
    }
    html.push_str(r#"<ul class="inbox">"#);
    for message in &slice.items {
        let mark_read = if message.read {
            String::new()
        } else {
            format!(
                r#"<form method="post" action="/dashboard/messages/{}/read" class="inline"><button type="submit">Mark as read</button></form>"#,
                enc(&message.id)
            )
        };
        html.push_str(&format!(
            r#"<li class="{class}"><header><strong>{name}</strong> &lt;<a href="mailto:{email}">{email}</a>&gt; <time>{date}</time></header><p>{body}</p><div class="actions">{mark_read} <a href="/dashboard/messages/{id}/delete">Delete</a></div></li>"#,
            class = if message.read { "read" } else { "unread" },
            name = esc(&message.name),
            email = esc(&message.email),
            date = format_date(&message.created_at),
            body = esc(&message.message).replace('\n', "<br>"),
            id = enc(&message.id),
        ));
    }
    html.push_str("</ul>");
    html.push_str(&pager(slice, |page| list_link("/dashboard/messages", search, page)));
    html.push_str("</section>");
    html
}

pub fn settings(
    draft: &ProfileDraft,
    avatar_url: &Option<String>,
    profile_error: Option<&str>,
    password_error: Option<&str>,
) -> String {
    format!(
        r#"<section><h1>Settings</h1>
<h2>Profile</h2>{profile_banner}
<form method="post" action="/dashboard/settings" enctype="multipart/form-data">
{username}{display_name}{email}
{current}<label>Avatar<input type="file" name="avatar" accept="image/*"></label>
<div class="actions"><button type="submit">Save profile</button></div>
</form>
<h2>Password</h2>{password_banner}
<form method="post" action="/dashboard/settings/password">
<label>Current password<input type="password" name="current_password" autocomplete="current-password" required></label>
<label>New password<input type="password" name="new_password" autocomplete="new-password" required></label>
<label>Confirm new password<input type="password" name="confirm_password" autocomplete="new-password" required></label>
<div class="actions"><button type="submit">Change password</button></div>
</form></section>"#,
        profile_banner = banner(profile_error),
        password_banner = banner(password_error),
        username = text_field("username", "Username", &draft.username, true),
        display_name = text_field("display_name", "Display name", draft.display_name.as_deref().unwrap_or_default(), false),
        email = text_field("email", "Email", draft.email.as_deref().unwrap_or_default(), false),
        current = current_image(avatar_url),
    )
}

pub fn cv_form(draft: &CvDraft, attachments: &[Attachment], error: Option<&str>) -> String {
    let existing: String = attachments
        .iter()
        .map(|a| match safe_url(&a.url) {
            Some(url) => format!(r#"<li><a href="{url}">{}</a></li>"#, esc(&a.name)),
            None => format!("<li>{}</li>", esc(&a.name)),
        })
        .collect();
    let existing = if existing.is_empty() {
        String::new()
    } else {
        format!(r#"<p>Current attachments:</p><ul>{existing}</ul>"#)
    };
    format!(
        r#"<section><h1>CV showcase</h1>{banner}
<form method="post" action="/dashboard/cv" enctype="multipart/form-data">
{headline}{quote}{summary}
{skills}
{existing}<label>Add attachments<input type="file" name="attachments" multiple></label>
<div class="actions"><button type="submit">Save CV</button> <a href="/cv">View</a></div>
</form></section>"#,
        banner = banner(error),
        headline = text_field("headline", "Headline", &draft.headline, true),
        quote = text_field("quote", "Quote", draft.quote.as_deref().unwrap_or_default(), false),
        summary = textarea("summary", "Summary (Markdown)", draft.summary.as_deref().unwrap_or_default(), 8),
        skills = textarea("skills", "Skills (one per line, e.g. Rust: 90)", &draft.skills_text(), 8),
    )
}

/// The delete confirmation dialog, as a page.
pub fn confirm_delete(kind: &str, name: &str, action: &str, cancel: &str) -> String {
    format!(
        r#"<section class="confirm"><h1>Delete {kind}?</h1>
<p>“{name}” will be permanently removed. This cannot be undone.</p>
<form method="post" action="{action}"><button type="submit" class="danger">Delete</button> <a href="{cancel}">Cancel</a></form></section>"#,
        kind = esc(kind),
        name = esc(name),
        action = esc(action),
        cancel = esc(cancel),
    )
}
