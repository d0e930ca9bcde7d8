use chrono::{Duration, Utc};
use http::{header::COOKIE, Request};
use tower_cookies::cookie::SameSite;

use session_gate::{
    AppEnv, Config, CookieStore, MemoryCookieJar, SessionLookup, SessionManager, SESSION_COOKIE,
};
use session_gate::crypto::token::TokenRejection;

const SECRET: &[u8] = b"test_secret_key_for_testing_purposes_only";

fn manager(secure: bool) -> SessionManager {
    SessionManager::with_settings(SECRET, secure, Duration::days(7))
}

fn request_with_cookie(value: &str) -> Request<()> {
    Request::builder()
        .header(COOKIE, format!("{}={}", SESSION_COOKIE, value))
        .body(())
        .unwrap()
}

#[test]
fn create_then_read_returns_payload() {
    let sessions = manager(false);
    let jar = MemoryCookieJar::new();

    sessions.create(&jar, "user-123", "test@example.com").unwrap();
    let session = sessions.read(&jar).expect("session should be readable");

    assert_eq!(session.user_id(), "user-123");
    assert_eq!(session.email(), "test@example.com");

    let remaining = session.expires_at() - Utc::now();
    assert!(remaining > Duration::days(7) - Duration::minutes(1));
    assert!(remaining <= Duration::days(7));
}

#[test]
fn cookie_attributes_in_development() {
    let sessions = manager(false);
    let jar = MemoryCookieJar::new();

    sessions.create(&jar, "user-123", "test@example.com").unwrap();
    let cookie = jar.cookie(SESSION_COOKIE).unwrap();

    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(false));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(cookie.path(), Some("/"));

    let session = sessions.read(&jar).unwrap();
    let expires = cookie.expires_datetime().unwrap();
    assert_eq!(expires.unix_timestamp(), session.expires_at().timestamp());
}

#[test]
fn cookie_is_secure_in_production() {
    let sessions = manager(true);
    let jar = MemoryCookieJar::new();

    sessions.create(&jar, "user-123", "test@example.com").unwrap();
    let cookie = jar.cookie(SESSION_COOKIE).unwrap();

    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
}

#[test]
fn manager_follows_config_environment() {
    let config = Config::from_lookup(|key| match key {
        "APP_ENV" => Some("production".to_string()),
        "JWT_SECRET" => Some("prod-secret".to_string()),
        _ => None,
    })
    .unwrap();
    assert_eq!(config.app_env, AppEnv::Production);

    let sessions = SessionManager::new(&config).unwrap();
    let jar = MemoryCookieJar::new();
    sessions.create(&jar, "user-123", "test@example.com").unwrap();

    assert_eq!(jar.cookie(SESSION_COOKIE).unwrap().secure(), Some(true));
}

#[test]
fn new_session_replaces_previous_token() {
    let sessions = manager(false);
    let jar = MemoryCookieJar::new();

    sessions.create(&jar, "user-1", "one@example.com").unwrap();
    sessions.create(&jar, "user-2", "two@example.com").unwrap();

    assert_eq!(sessions.read(&jar).unwrap().user_id(), "user-2");
}

#[test]
fn read_without_cookie_is_none() {
    let jar = MemoryCookieJar::new();
    assert!(manager(false).read(&jar).is_none());
}

#[test]
fn read_with_empty_cookie_is_none() {
    let sessions = manager(false);
    let jar = MemoryCookieJar::new();
    jar.insert_raw(SESSION_COOKIE, "");

    assert!(sessions.read(&jar).is_none());
    assert_eq!(sessions.inspect(Some("")), SessionLookup::Absent);
}

#[test]
fn read_with_garbage_cookie_is_none() {
    let sessions = manager(false);
    let jar = MemoryCookieJar::new();
    jar.insert_raw(SESSION_COOKIE, "invalid-token");

    assert!(sessions.read(&jar).is_none());
    assert_eq!(
        sessions.inspect(Some("invalid-token")),
        SessionLookup::Invalid(TokenRejection::Malformed)
    );
}

#[test]
fn read_with_expired_token_is_none() {
    let sessions = manager(false);
    let jar = MemoryCookieJar::new();

    sessions
        .create_at(&jar, "user-123", "test@example.com", Utc::now() - Duration::days(8))
        .unwrap();

    assert!(sessions.read(&jar).is_none());
    let token = CookieStore::get(&jar, SESSION_COOKIE).unwrap();
    assert_eq!(
        sessions.inspect(Some(&token)),
        SessionLookup::Invalid(TokenRejection::Expired)
    );
}

#[test]
fn read_with_token_from_other_secret_is_none() {
    let foreign = SessionManager::with_settings(b"another-secret", false, Duration::days(7));
    let jar = MemoryCookieJar::new();
    foreign.create(&jar, "user-123", "test@example.com").unwrap();

    let sessions = manager(false);
    assert!(sessions.read(&jar).is_none());

    let token = CookieStore::get(&jar, SESSION_COOKIE).unwrap();
    assert_eq!(
        sessions.inspect(Some(&token)),
        SessionLookup::Invalid(TokenRejection::BadSignature)
    );
}

#[test]
fn verify_from_request_accepts_valid_cookie() {
    let sessions = manager(false);
    let jar = MemoryCookieJar::new();
    sessions.create(&jar, "user-123", "test@example.com").unwrap();
    let token = CookieStore::get(&jar, SESSION_COOKIE).unwrap();

    let session = sessions
        .verify_from_request(&request_with_cookie(&token))
        .expect("request should carry a valid session");

    assert_eq!(session.user_id(), "user-123");
    assert_eq!(session.email(), "test@example.com");
}

#[test]
fn verify_from_request_rejects_missing_and_invalid_cookies() {
    let sessions = manager(false);

    let bare = Request::builder().body(()).unwrap();
    assert!(sessions.verify_from_request(&bare).is_none());
    assert!(sessions.verify_from_request(&request_with_cookie("")).is_none());
    assert!(sessions.verify_from_request(&request_with_cookie("invalid-token")).is_none());
}

#[test]
fn verify_from_request_rejects_expired_token() {
    let sessions = manager(false);
    let jar = MemoryCookieJar::new();
    sessions
        .create_at(&jar, "user-123", "test@example.com", Utc::now() - Duration::days(8))
        .unwrap();
    let token = CookieStore::get(&jar, SESSION_COOKIE).unwrap();

    assert!(sessions.verify_from_request(&request_with_cookie(&token)).is_none());
}

#[test]
fn verify_from_request_rejects_token_from_other_secret() {
    let foreign = SessionManager::with_settings(b"another-secret", false, Duration::days(7));
    let jar = MemoryCookieJar::new();
    foreign.create(&jar, "user-123", "test@example.com").unwrap();
    let token = CookieStore::get(&jar, SESSION_COOKIE).unwrap();

    assert!(manager(false).verify_from_request(&request_with_cookie(&token)).is_none());
}

#[test]
fn out_of_range_duration_is_an_error_not_a_panic() {
    let mut config = Config::from_lookup(|_| None).unwrap();
    config.session_duration_days = 1_000_000_000_000;
    assert!(SessionManager::new(&config).is_err());

    let sessions = SessionManager::with_settings(SECRET, false, Duration::MAX);
    let jar = MemoryCookieJar::new();

    assert!(sessions.create(&jar, "user-123", "test@example.com").is_err());
    assert!(jar.is_empty());
}

#[test]
fn delete_clears_session_and_is_idempotent() {
    let sessions = manager(false);
    let jar = MemoryCookieJar::new();

    sessions.create(&jar, "user-123", "test@example.com").unwrap();
    sessions.delete(&jar);
    assert!(sessions.read(&jar).is_none());

    sessions.delete(&jar);
    assert!(jar.is_empty());
    assert!(sessions.read(&jar).is_none());
}

#[test]
fn delete_on_empty_jar_is_fine() {
    let jar = MemoryCookieJar::new();
    manager(false).delete(&jar);
    assert!(jar.is_empty());
}

#[test]
fn concurrent_creates_are_independent() {
    let sessions = manager(false);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let sessions = sessions.clone();
            std::thread::spawn(move || {
                let jar = MemoryCookieJar::new();
                let user_id = format!("user-{}", i);
                sessions.create(&jar, &user_id, "test@example.com").unwrap();
                (user_id, sessions.read(&jar).map(|s| s.user_id().to_string()))
            })
        })
        .collect();

    for handle in handles {
        let (expected, read) = handle.join().unwrap();
        assert_eq!(read, Some(expected));
    }
}

#[test]
fn full_session_lifecycle() {
    let sessions = manager(false);
    let jar = MemoryCookieJar::new();

    sessions.create(&jar, "user-123", "test@example.com").unwrap();
    assert!(CookieStore::get(&jar, SESSION_COOKIE).is_some());

    let session = sessions.read(&jar).unwrap();
    assert_eq!(session.user_id(), "user-123");
    assert_eq!(session.email(), "test@example.com");
    assert!(session.expires_at() > Utc::now());

    sessions.delete(&jar);
    assert!(sessions.read(&jar).is_none());
}
