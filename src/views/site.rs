//! Public site pages.

use super::{banner, esc, format_date, pager, safe_url};
use crate::{
    contact::{ContactWizard, Step},
    markdown,
    models::{Blog, CvShowcase, Project, ProjectCategory},
    search::{PageSlice, ProjectSearch},
};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

fn cover(url: &Option<String>, alt: &str) -> String {
    url.as_deref()
        .and_then(safe_url)
        .map(|src| format!(r#"<img class="cover" src="{src}" alt="{}">"#, esc(alt)))
        .unwrap_or_default()
}

fn tech_badges(technologies: &[String]) -> String {
    technologies
        .iter()
        .map(|t| format!(r#"<span class="badge">{}</span>"#, esc(t)))
        .collect()
}

fn project_card(project: &Project) -> String {
    format!(
        r#"<article class="card">{cover}<h3><a href="/projects/{id}">{title}</a></h3><p>{description}</p><div class="badges">{badges}</div></article>"#,
        cover = cover(&project.cover_image, &project.title),
        id = utf8_percent_encode(&project.id, NON_ALPHANUMERIC),
        title = esc(&project.title),
        description = esc(&project.description),
        badges = tech_badges(&project.technologies),
    )
}

fn blog_card(blog: &Blog) -> String {
    let summary = blog
        .summary
        .clone()
        .unwrap_or_else(|| markdown::excerpt(&blog.content, 180));
    format!(
        r#"<article class="card">{cover}<h3><a href="/blogs/{id}">{title}</a></h3><time>{date}</time><p>{summary}</p></article>"#,
        cover = cover(&blog.cover_image, &blog.title),
        id = utf8_percent_encode(&blog.id, NON_ALPHANUMERIC),
        title = esc(&blog.title),
        date = format_date(&blog.created_at),
        summary = esc(&summary),
    )
}

pub fn home(featured: &[Project], latest: &[Blog], cv: Option<&CvShowcase>) -> String {
    let mut html = String::from(r#"<section class="hero">"#);
    match cv {
        Some(cv) => {
            html.push_str(&format!("<h1>{}</h1>", esc(&cv.headline)));
            if let Some(quote) = &cv.quote {
                html.push_str(&format!("<blockquote>{}</blockquote>", esc(quote)));
            }
        }
        None => html.push_str("<h1>Welcome</h1>"),
    }
    html.push_str(r#"<p><a class="button" href="/projects">See my work</a> <a class="button" href="/contact">Get in touch</a></p></section>"#);

    html.push_str(r#"<section><h2>Featured projects</h2><div class="grid">"#);
    if featured.is_empty() {
        html.push_str("<p>No projects yet.</p>");
    }
    for project in featured {
        html.push_str(&project_card(project));
    }
    html.push_str("</div></section>");

    html.push_str(r#"<section><h2>Latest writing</h2><div class="grid">"#);
    if latest.is_empty() {
        html.push_str("<p>No posts yet.</p>");
    }
    for blog in latest {
        html.push_str(&blog_card(blog));
    }
    html.push_str("</div></section>");
    html
}

pub fn about(site_title: &str, cv: Option<&CvShowcase>) -> String {
    let mut html = format!("<section><h1>About {}</h1>", esc(site_title));
    match cv.and_then(|cv| cv.summary.as_deref()) {
        Some(summary) => html.push_str(&markdown::render(summary)),
        None => html.push_str("<p>More about me coming soon.</p>"),
    }
    html.push_str(r#"<p><a href="/cv">Read the full CV</a> or <a href="/contact">send a message</a>.</p></section>"#);
    html
}

pub fn projects(
    slice: &PageSlice<Project>,
    search: &ProjectSearch,
    categories: &[ProjectCategory],
) -> String {
    let mut options = String::from(r#"<option value="">All categories</option>"#);
    for category in categories {
        let value = category.slug.as_deref().unwrap_or(&category.name);
        let selected = search
            .category()
            .is_some_and(|c| c.eq_ignore_ascii_case(value) || c.eq_ignore_ascii_case(&category.name));
        options.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            esc(value),
            if selected { " selected" } else { "" },
            esc(&category.name)
        ));
    }

    let mut html = format!(
        r#"<section><h1>Projects</h1>
<form class="filters" method="get" action="/projects">
<input type="search" name="query" placeholder="Search projects" value="{query}">
<select name="category">{options}</select>
<input type="text" name="technology" placeholder="Technology" value="{technology}">
<button type="submit">Filter</button>{reset}
</form>
<p class="count">{count}</p><div class="grid">"#,
        query = esc(search.query().unwrap_or_default()),
        technology = esc(search.technology().unwrap_or_default()),
        reset = if search.is_filtered() {
            r#" <a href="/projects">Reset</a>"#
        } else {
            ""
        },
        count = match slice.total_items {
            1 => "1 project".to_string(),
            n => format!("{n} projects"),
        },
    );
    if slice.items.is_empty() {
        html.push_str(r#"<p class="empty">No projects match these filters.</p>"#);
    }
    for project in &slice.items {
        html.push_str(&project_card(project));
    }
    html.push_str("</div>");
    html.push_str(&pager(slice, |page| {
        esc(&format!("/projects?{}", search.to_query_string(page)))
    }));
    html.push_str("</section>");
    html
}

pub fn project_detail(project: &Project) -> String {
    let mut links = String::new();
    if let Some(url) = project.repo_url.as_deref().and_then(safe_url) {
        links.push_str(&format!(r#"<a href="{url}" rel="noopener">Source</a> "#));
    }
    if let Some(url) = project.live_url.as_deref().and_then(safe_url) {
        links.push_str(&format!(r#"<a href="{url}" rel="noopener">Live</a>"#));
    }
    let category = project
        .category
        .as_ref()
        .map(|c| format!(r#"<p class="category">{}</p>"#, esc(&c.name)))
        .unwrap_or_default();
    let body = project
        .content
        .as_deref()
        .map(markdown::render)
        .unwrap_or_else(|| format!("<p>{}</p>", esc(&project.description)));

    format!(
        r#"<article class="detail">{cover}<h1>{title}</h1>{category}<div class="badges">{badges}</div><div class="body">{body}</div><p class="links">{links}</p><p><a href="/projects">All projects</a></p></article>"#,
        cover = cover(&project.cover_image, &project.title),
        title = esc(&project.title),
        badges = tech_badges(&project.technologies),
    )
}

pub fn blogs(slice: &PageSlice<Blog>, search: Option<&str>, tag: Option<&str>) -> String {
    let mut html = format!(
        r#"<section><h1>Blog</h1>
<form class="filters" method="get" action="/blogs">
<input type="search" name="search" placeholder="Search posts" value="{}">
<button type="submit">Search</button>
</form>"#,
        esc(search.unwrap_or_default())
    );
    if let Some(tag) = tag {
        html.push_str(&format!(
            r#"<p>Tagged <strong>{}</strong> · <a href="/blogs">clear</a></p>"#,
            esc(tag)
        ));
    }
    html.push_str(r#"<div class="grid">"#);
    if slice.items.is_empty() {
        html.push_str(r#"<p class="empty">No posts found.</p>"#);
    }
    for blog in &slice.items {
        html.push_str(&blog_card(blog));
    }
    html.push_str("</div>");
    html.push_str(&pager(slice, |page| {
        let mut query = format!("page={page}");
        if let Some(search) = search {
            query.push_str(&format!("&search={}", utf8_percent_encode(search, NON_ALPHANUMERIC)));
        }
        if let Some(tag) = tag {
            query.push_str(&format!("&tag={}", utf8_percent_encode(tag, NON_ALPHANUMERIC)));
        }
        esc(&format!("/blogs?{query}"))
    }));
    html.push_str("</section>");
    html
}

pub fn blog_detail(blog: &Blog) -> String {
    let tags: String = blog
        .tags
        .iter()
        .map(|tag| {
            format!(
                r#"<a class="badge" href="/blogs?tag={}">{}</a>"#,
                utf8_percent_encode(tag, NON_ALPHANUMERIC),
                esc(tag)
            )
        })
        .collect();
    format!(
        r#"<article class="detail">{cover}<h1>{title}</h1><time>{date}</time><div class="badges">{tags}</div><div class="body">{body}</div><p><a href="/blogs">All posts</a></p></article>"#,
        cover = cover(&blog.cover_image, &blog.title),
        title = esc(&blog.title),
        date = format_date(&blog.created_at),
        body = markdown::render(&blog.content),
    )
}

pub fn cv(cv: Option<&CvShowcase>) -> String {
    let Some(cv) = cv else {
        return r#"<section><h1>CV</h1><p class="empty">The CV showcase has not been published yet.</p></section>"#.to_string();
    };

    let mut html = format!(r#"<section class="cv"><h1>{}</h1>"#, esc(&cv.headline));
    if let Some(quote) = &cv.quote {
        html.push_str(&format!("<blockquote>{}</blockquote>", esc(quote)));
    }
    if let Some(summary) = &cv.summary {
        html.push_str(&markdown::render(summary));
    }
    if !cv.skills.is_empty() {
        html.push_str(r#"<h2>Skills</h2><ul class="skills">"#);
        for skill in &cv.skills {
            match skill.level {
                Some(level) => html.push_str(&format!(
                    r#"<li>{} <meter min="0" max="100" value="{level}">{level}%</meter></li>"#,
                    esc(&skill.name)
                )),
                None => html.push_str(&format!("<li>{}</li>", esc(&skill.name))),
            }
        }
        html.push_str("</ul>");
    }
    let attachments: Vec<String> = cv
        .attachments
        .iter()
        .filter_map(|a| {
            safe_url(&a.url).map(|url| format!(r#"<li><a href="{url}" download>{}</a></li>"#, esc(&a.name)))
        })
        .collect();
    if !attachments.is_empty() {
        html.push_str(&format!("<h2>Downloads</h2><ul>{}</ul>", attachments.concat()));
    }
    html.push_str("</section>");
    html
}

fn hidden(name: &str, value: &str) -> String {
    format!(r#"<input type="hidden" name="{name}" value="{}">"#, esc(value))
}

/// One step of the contact wizard. Values from other steps ride along as
/// hidden fields.
pub fn contact(wizard: &ContactWizard, error: Option<&str>) -> String {
    if wizard.step == Step::Submitted {
        return format!(
            r#"<section class="contact"><h1>Thanks, {}!</h1><p>Your message is on its way. I'll reply to {} soon.</p><p><a href="/">Back home</a></p></section>"#,
            esc(&wizard.name),
            esc(&wizard.email)
        );
    }

    let progress = format!(
        r#"<ol class="steps">{}</ol>"#,
        [Step::Name, Step::Email, Step::Message]
            .iter()
            .map(|step| {
                let class = if *step == wizard.step { " class=\"current\"" } else { "" };
                format!("<li{class}>{}</li>", step.label())
            })
            .collect::<String>()
    );

    let (field, carried) = match wizard.step {
        Step::Name => (
            format!(
                r#"<label>Your name<input type="text" name="name" value="{}" autofocus required></label>"#,
                esc(&wizard.name)
            ),
            hidden("email", &wizard.email) + &hidden("message", &wizard.message),
        ),
        Step::Email => (
            format!(
                r#"<label>Your email<input type="email" name="email" value="{}" autofocus required></label>"#,
                esc(&wizard.email)
            ),
            hidden("name", &wizard.name) + &hidden("message", &wizard.message),
        ),
        _ => (
            format!(
                r#"<label>Your message<textarea name="message" rows="6" autofocus required>{}</textarea></label>"#,
                esc(&wizard.message)
            ),
            hidden("name", &wizard.name) + &hidden("email", &wizard.email),
        ),
    };

    let step_value = serde_json::to_value(wizard.step)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();
    let back = if wizard.step == Step::Name {
        String::new()
    } else {
        r#"<button type="submit" name="action" value="back" formnovalidate>Back</button>"#.to_string()
    };
    let next_label = if wizard.step == Step::Message { "Send" } else { "Next" };

    format!(
        r#"<section class="contact"><h1>Contact</h1>{progress}<p>Step {n} of 3</p>{banner}
<form method="post" action="/contact">{step}{carried}{field}
<div class="actions">{back}<button type="submit" name="action" value="next">{next_label}</button></div>
</form></section>"#,
        n = wizard.step.number(),
        banner = banner(error),
        step = hidden("step", &step_value),
    )
}
