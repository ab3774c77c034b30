//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::dev::ServiceResponse;
use chrono::{DateTime, TimeZone, Utc};

use crate::inbound::http::state::{HttpState, Repositories};
use crate::outbound::memory::InMemoryStore;
use crate::test_support::MutableClock;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Fixed starting instant for handler tests.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid fixed instant")
}

/// Real services over a fresh in-memory store and a controllable clock.
pub fn in_memory_state() -> (HttpState, Arc<InMemoryStore>, Arc<MutableClock>) {
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(MutableClock::new(test_now()));
    let state = HttpState::from_repositories(
        Repositories {
            polls: store.clone(),
            categories: store.clone(),
            votes: store.clone(),
            accounts: store.clone(),
        },
        clock.clone(),
    );
    (state, store, clock)
}

/// The `session` cookie set by a response.
pub fn session_cookie(res: &ServiceResponse) -> actix_web::cookie::Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(actix_web::cookie::Cookie::into_owned)
        .expect("session cookie set")
}
