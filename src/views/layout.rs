use axum::http::StatusCode;

use super::esc;
use crate::models::{Notification, NotificationKind};

/// Which navigation the page carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Site,
    Dashboard,
}

/// Page
///
/// Everything the shared layout needs around a page body.
#[derive(Debug, Clone)]
pub struct Page {
    pub site_title: String,
    pub title: String,
    pub nav: Nav,
    pub signed_in: bool,
    pub notification: Option<Notification>,
    pub body: String,
}

impl Page {
    pub fn new(site_title: &str, title: &str, nav: Nav, body: String) -> Self {
        Self {
            site_title: site_title.to_string(),
            title: title.to_string(),
            nav,
            signed_in: nav == Nav::Dashboard,
            notification: None,
            body,
        }
    }

    pub fn signed_in(mut self, signed_in: bool) -> Self {
        self.signed_in = signed_in;
        self
    }

    pub fn notification(mut self, notification: Option<Notification>) -> Self {
        self.notification = notification;
        self
    }

    pub fn render(&self) -> String {
        let full_title = if self.title.is_empty() {
            esc(&self.site_title)
        } else {
            format!("{} | {}", esc(&self.title), esc(&self.site_title))
        };
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{full_title}</title>
<link rel="stylesheet" href="/static/site.css">
</head>
<body class="{body_class}">
<header>{nav}</header>
{toast}
<main>
{body}
</main>
<footer><p>&copy; {site}</p></footer>
</body>
</html>"#,
            body_class = match self.nav {
                Nav::Site => "site",
                Nav::Dashboard => "dashboard",
            },
            nav = self.nav_html(),
            toast = toast(self.notification.as_ref()),
            body = self.body,
            site = esc(&self.site_title),
        )
    }

    fn nav_html(&self) -> String {
        let links: &[(&str, &str)] = match self.nav {
            Nav::Site => &[
                ("/", "Home"),
                ("/about", "About"),
                ("/projects", "Projects"),
                ("/blogs", "Blog"),
                ("/cv", "CV"),
                ("/contact", "Contact"),
            ],
            Nav::Dashboard => &[
                ("/dashboard", "Overview"),
                ("/dashboard/blogs", "Blogs"),
                ("/dashboard/projects", "Projects"),
                ("/dashboard/messages", "Messages"),
                ("/dashboard/cv", "CV"),
                ("/dashboard/settings", "Settings"),
                ("/", "View site"),
            ],
        };
        let mut html = format!(
            r#"<nav><a class="brand" href="/">{}</a><ul>"#,
            esc(&self.site_title)
        );
        for (href, label) in links {
            html.push_str(&format!(r#"<li><a href="{href}">{label}</a></li>"#));
        }
        html.push_str("</ul>");
        if self.signed_in {
            if self.nav == Nav::Site {
                html.push_str(r#"<a href="/dashboard">Dashboard</a>"#);
            }
            html.push_str(
                r#"<form method="post" action="/logout" class="inline"><button type="submit">Sign out</button></form>"#,
            );
        } else {
            html.push_str(r#"<a href="/signin">Sign in</a>"#);
        }
        html.push_str("</nav>");
        html
    }
}

/// The toast region for a pending notification.
pub fn toast(notification: Option<&Notification>) -> String {
    match notification {
        Some(n) => {
            let kind = match n.kind {
                NotificationKind::Success => "success",
                NotificationKind::Error => "error",
                NotificationKind::Info => "info",
            };
            format!(
                r#"<div class="toast toast-{kind}" role="status">{}</div>"#,
                esc(&n.message)
            )
        }
        None => String::new(),
    }
}

/// Standalone error page used by `AppError`.
pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"<section class="error-page"><h1>{} {}</h1>{}<p><a href="/">Back to the home page</a></p></section>"#,
        status.as_u16(),
        esc(status.canonical_reason().unwrap_or("Error")),
        super::banner(Some(message)),
    );
    Page::new("Portfolio", "Error", Nav::Site, body).render()
}
