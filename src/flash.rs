//! One-shot toast notifications carried across a redirect.
//!
//! A handler that redirects after a mutation sets the `flash` cookie; the
//! next page render shows the toast and clears it.

use axum::http::HeaderMap;
use percent_encoding::{NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::{auth, models::Notification};

pub const FLASH_COOKIE: &str = "flash";

/// `Set-Cookie` value carrying a notification for the next page.
pub fn cookie_for(notification: &Notification) -> String {
    let json = serde_json::to_string(notification).unwrap_or_default();
    format!(
        "{FLASH_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age=60",
        utf8_percent_encode(&json, NON_ALPHANUMERIC)
    )
}

/// `Set-Cookie` value consuming the flash.
pub fn clear() -> String {
    auth::clear_cookie(FLASH_COOKIE)
}

/// Reads the pending notification, ignoring anything malformed.
pub fn take(headers: &HeaderMap) -> Option<Notification> {
    let raw = auth::read_cookie(headers, FLASH_COOKIE)?;
    let json = percent_decode_str(&raw).decode_utf8().ok()?;
    serde_json::from_str(&json).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header};

    fn request_headers(set_cookie: &str) -> HeaderMap {
        let pair = set_cookie.split(';').next().unwrap().to_string();
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(&pair).unwrap());
        headers
    }

    #[test]
    fn notification_survives_the_cookie() {
        let sent = Notification::success("Blog \"Hello; world\" saved");
        let headers = request_headers(&cookie_for(&sent));
        assert_eq!(take(&headers), Some(sent));
    }

    #[test]
    fn malformed_flash_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("flash=%7Bnot-json"));
        assert_eq!(take(&headers), None);
    }

    #[test]
    fn clearing_expires_immediately() {
        assert!(clear().contains("Max-Age=0"));
    }
}
