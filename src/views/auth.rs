//! Sign-in and sign-up pages.

use super::{banner, esc};

fn next_field(next: Option<&str>) -> String {
    next.map(|n| format!(r#"<input type="hidden" name="next" value="{}">"#, esc(n)))
        .unwrap_or_default()
}

pub fn signin(username: &str, next: Option<&str>, error: Option<&str>) -> String {
    format!(
        r#"<section class="auth"><h1>Sign in</h1>{banner}
<form method="post" action="/signin">{next}
<label>Username<input type="text" name="username" value="{username}" autocomplete="username" required></label>
<label>Password<input type="password" name="password" autocomplete="current-password" required></label>
<button type="submit">Sign in</button>
</form>
<p>No account yet? <a href="/signup">Create one</a>.</p></section>"#,
        banner = banner(error),
        next = next_field(next),
        username = esc(username),
    )
}

pub fn signup(username: &str, email: &str, error: Option<&str>) -> String {
    format!(
        r#"<section class="auth"><h1>Create an account</h1>{banner}
<form method="post" action="/signup">
<label>Username<input type="text" name="username" value="{username}" autocomplete="username" required></label>
<label>Email<input type="email" name="email" value="{email}" autocomplete="email"></label>
<label>Password<input type="password" name="password" autocomplete="new-password" required></label>
<label>Confirm password<input type="password" name="confirm_password" autocomplete="new-password" required></label>
<button type="submit">Sign up</button>
</form>
<p>Already registered? <a href="/signin">Sign in</a>.</p></section>"#,
        banner = banner(error),
        username = esc(username),
        email = esc(email),
    )
}
