//! Builders for HTTP state backed by the configured user store.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use contacts_backend::domain::UserMutationService;
use contacts_backend::domain::ports::{UserCommand, UserQuery, UserRepository};
use contacts_backend::inbound::http::state::HttpState;
use contacts_backend::outbound::memory::InMemoryUserRepository;
use contacts_backend::outbound::persistence::DieselUserRepository;

use super::ServerConfig;

/// Share one pipeline between the command and query ports.
fn service_pair<R>(repo: R) -> (Arc<dyn UserCommand>, Arc<dyn UserQuery>)
where
    R: UserRepository + 'static,
{
    let service = Arc::new(UserMutationService::new(Arc::new(repo)));
    let command: Arc<dyn UserCommand> = service.clone();
    let query: Arc<dyn UserQuery> = service;
    (command, query)
}

/// Build HTTP state, using PostgreSQL when a pool is configured and the
/// in-memory store otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let (users, users_query) = match &config.db_pool {
        Some(pool) => {
            info!(store = "postgres", "user store selected");
            service_pair(DieselUserRepository::new(pool.clone(), clock))
        }
        None => {
            info!(store = "memory", "user store selected");
            service_pair(InMemoryUserRepository::new(clock))
        }
    };
    web::Data::new(HttpState::new(users, users_query))
}
