//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AccountRepository, CategoryCommand, CategoryRepository, FixtureCategoryCommand,
    FixtureLoginService, FixturePollLifecycleCommand, FixturePollQuery,
    FixtureRegistrationCommand, FixtureVotingCommand, LoginService, PollLifecycleCommand,
    PollQuery, PollRepository, RegistrationCommand, VoteRepository, VotingCommand,
};
use crate::domain::{
    AccountService, CategoryService, PollLifecycleService, PollQueryService, VotingService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationCommand>,
    pub lifecycle: Arc<dyn PollLifecycleCommand>,
    pub voting: Arc<dyn VotingCommand>,
    pub polls: Arc<dyn PollQuery>,
    pub categories: Arc<dyn CategoryCommand>,
}

impl Default for HttpState {
    fn default() -> Self {
        Self {
            login: Arc::new(FixtureLoginService),
            registration: Arc::new(FixtureRegistrationCommand),
            lifecycle: Arc::new(FixturePollLifecycleCommand),
            voting: Arc::new(FixtureVotingCommand),
            polls: Arc::new(FixturePollQuery),
            categories: Arc::new(FixtureCategoryCommand),
        }
    }
}

/// Driven ports the domain services are assembled from.
pub struct Repositories<P, C, V, A> {
    pub polls: Arc<P>,
    pub categories: Arc<C>,
    pub votes: Arc<V>,
    pub accounts: Arc<A>,
}

impl<P, C, V, A> Clone for Repositories<P, C, V, A> {
    fn clone(&self) -> Self {
        Self {
            polls: Arc::clone(&self.polls),
            categories: Arc::clone(&self.categories),
            votes: Arc::clone(&self.votes),
            accounts: Arc::clone(&self.accounts),
        }
    }
}

impl HttpState {
    /// Wire every domain service over one set of repositories and a clock.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use polls::inbound::http::state::{HttpState, Repositories};
    /// use polls::outbound::memory::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let state = HttpState::from_repositories(
    ///     Repositories {
    ///         polls: store.clone(),
    ///         categories: store.clone(),
    ///         votes: store.clone(),
    ///         accounts: store,
    ///     },
    ///     Arc::new(DefaultClock),
    /// );
    /// let _voting = state.voting.clone();
    /// ```
    pub fn from_repositories<P, C, V, A>(
        repositories: Repositories<P, C, V, A>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        P: PollRepository + 'static,
        C: CategoryRepository + 'static,
        V: VoteRepository + 'static,
        A: AccountRepository + 'static,
    {
        let Repositories {
            polls,
            categories,
            votes,
            accounts,
        } = repositories;
        let accounts = Arc::new(AccountService::new(accounts, Arc::clone(&clock)));
        Self {
            login: accounts.clone(),
            registration: accounts,
            lifecycle: Arc::new(PollLifecycleService::new(
                Arc::clone(&polls),
                Arc::clone(&categories),
                Arc::clone(&clock),
            )),
            voting: Arc::new(VotingService::new(
                Arc::clone(&polls),
                Arc::clone(&votes),
                Arc::clone(&clock),
            )),
            polls: Arc::new(PollQueryService::new(
                polls,
                Arc::clone(&categories),
                votes,
                Arc::clone(&clock),
            )),
            categories: Arc::new(CategoryService::new(categories, clock)),
        }
    }
}
