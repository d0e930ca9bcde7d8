use std::collections::HashMap;
use std::sync::Mutex;

use http::{header::COOKIE, Request};
use tower_cookies::cookie::{time::OffsetDateTime, SameSite};
use tower_cookies::{Cookie, Cookies};

/// Attributes applied when a cookie is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieAttributes {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    pub path: &'static str,
    pub expires: OffsetDateTime,
}

/// Read/write access to the cookies of one request/response pair.
pub trait CookieStore {
    /// Returns the cookie value, if the cookie is present.
    fn get(&self, name: &str) -> Option<String>;
    fn set(&self, name: &str, value: String, attributes: &CookieAttributes);
    /// Tells the client to drop the cookie. Repeating it changes nothing.
    fn delete(&self, name: &str);
}

/// Read-only access to the cookies a client sent with a request.
pub trait RequestCookies {
    fn cookie(&self, name: &str) -> Option<String>;
}

/// Builds the `Set-Cookie` representation for `name=value` with `attributes`.
pub fn build_cookie(name: &str, value: String, attributes: &CookieAttributes) -> Cookie<'static> {
    let mut cookie = Cookie::new(name.to_string(), value);
    cookie.set_http_only(attributes.http_only);
    cookie.set_secure(attributes.secure);
    cookie.set_same_site(attributes.same_site);
    cookie.set_path(attributes.path);
    cookie.set_expires(attributes.expires);
    cookie
}

/// An already-expired cookie that overwrites `name` on the client.
pub fn removal_cookie(name: &str) -> Cookie<'static> {
    let mut cookie = Cookie::new(name.to_string(), "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

impl CookieStore for Cookies {
    fn get(&self, name: &str) -> Option<String> {
        Cookies::get(self, name).map(|c| c.value().to_string())
    }

    fn set(&self, name: &str, value: String, attributes: &CookieAttributes) {
        self.add(build_cookie(name, value, attributes));
    }

    // `Cookies::remove` stays silent when the request did not carry the
    // cookie, so the removal is always sent as a regular Set-Cookie.
    fn delete(&self, name: &str) {
        self.add(removal_cookie(name));
    }
}

impl<B> RequestCookies for Request<B> {
    fn cookie(&self, name: &str) -> Option<String> {
        self.headers()
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(|parsed| parsed.ok())
            .find(|c| c.name() == name)
            .map(|c| c.value().to_string())
    }
}

/// A cookie jar held in memory, used where no HTTP framework owns the cookies
/// (background jobs, tests, CLI tooling).
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    cookies: Mutex<HashMap<String, Cookie<'static>>>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the full cookie including the attributes it was written with.
    pub fn cookie(&self, name: &str) -> Option<Cookie<'static>> {
        self.lock().get(name).cloned()
    }

    /// Stores a raw value without attributes, as if the client had sent it.
    pub fn insert_raw(&self, name: &str, value: &str) {
        self.lock()
            .insert(name.to_string(), Cookie::new(name.to_string(), value.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Cookie<'static>>> {
        // a poisoned jar still holds consistent cookie data
        self.cookies.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CookieStore for MemoryCookieJar {
    fn get(&self, name: &str) -> Option<String> {
        self.lock().get(name).map(|c| c.value().to_string())
    }

    fn set(&self, name: &str, value: String, attributes: &CookieAttributes) {
        self.lock()
            .insert(name.to_string(), build_cookie(name, value, attributes));
    }

    fn delete(&self, name: &str) {
        self.lock().remove(name);
    }
}
