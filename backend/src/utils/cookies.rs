//! `Set-Cookie` construction and parsing for the session cookie.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    Lax,
    Strict,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieOptions {
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookieOptions {
    /// Session cookies are always `SameSite=Strict`; `Secure` only in production.
    pub fn session(production: bool) -> Self {
        Self {
            secure: production,
            same_site: SameSite::Strict,
        }
    }
}

pub const SESSION_COOKIE_NAME: &str = "token";
pub const SESSION_COOKIE_PATH: &str = "/";

pub fn build_session_cookie(value: &str, max_age: Duration, options: CookieOptions) -> String {
    cookie_string(value, max_age.as_secs(), options)
}

/// Expires the session cookie immediately.
pub fn build_clear_cookie(options: CookieOptions) -> String {
    cookie_string("", 0, options)
}

fn cookie_string(value: &str, max_age_secs: u64, options: CookieOptions) -> String {
    let mut cookie = format!(
        "{}={}; Path={}; Max-Age={}; HttpOnly; SameSite={}",
        SESSION_COOKIE_NAME,
        value,
        SESSION_COOKIE_PATH,
        max_age_secs,
        same_site_value(options.same_site)
    );
    if options.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn extract_cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').map(str::trim).find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key.trim() == name).then(|| value.trim().to_string())
    })
}

fn same_site_value(same_site: SameSite) -> &'static str {
    match same_site {
        SameSite::Lax => "Lax",
        SameSite::Strict => "Strict",
        SameSite::None => "None",
    }
}
