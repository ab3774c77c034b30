//! Selects the storage adapter behind every HTTP port.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use polls::inbound::http::state::{HttpState, Repositories};
use polls::outbound::memory::InMemoryStore;
use polls::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselCategoryRepository, DieselPollRepository,
    DieselVoteRepository,
};

use super::ServerConfig;

/// Diesel repositories when a pool is configured, the in-memory store
/// otherwise.
fn build_state_with_clock(pool: Option<&DbPool>, clock: Arc<dyn Clock>) -> HttpState {
    match pool {
        Some(pool) => {
            info!("serving polls from PostgreSQL");
            HttpState::from_repositories(
                Repositories {
                    polls: Arc::new(DieselPollRepository::new(pool.clone())),
                    categories: Arc::new(DieselCategoryRepository::new(pool.clone())),
                    votes: Arc::new(DieselVoteRepository::new(pool.clone())),
                    accounts: Arc::new(DieselAccountRepository::new(pool.clone())),
                },
                clock,
            )
        }
        None => {
            info!("no database configured; serving polls from memory");
            let store = Arc::new(InMemoryStore::new());
            HttpState::from_repositories(
                Repositories {
                    polls: Arc::clone(&store),
                    categories: Arc::clone(&store),
                    votes: Arc::clone(&store),
                    accounts: store,
                },
                clock,
            )
        }
    }
}

/// Build the shared handler state for the configured storage.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    web::Data::new(build_state_with_clock(
        config.db_pool.as_ref(),
        Arc::new(DefaultClock),
    ))
}
