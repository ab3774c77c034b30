//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters.
//! Driving ports (`*Command`, `*Query`, `LoginService`) are implemented by
//! domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod category_command;
mod category_repository;
mod login_service;
mod poll_lifecycle_command;
mod poll_query;
mod poll_repository;
mod registration_command;
mod vote_repository;
mod voting_command;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{
    AccountRepository, AccountRepositoryError, FixtureAccountRepository,
};
#[cfg(test)]
pub use category_command::MockCategoryCommand;
pub use category_command::{CategoryCommand, CreateCategoryRequest, FixtureCategoryCommand};
#[cfg(test)]
pub use category_repository::MockCategoryRepository;
pub use category_repository::{
    CategoryRepository, CategoryRepositoryError, FixtureCategoryRepository,
};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FixtureLoginService, LOGIN_FAILED_MESSAGE, LoginService};
#[cfg(test)]
pub use poll_lifecycle_command::MockPollLifecycleCommand;
pub use poll_lifecycle_command::{
    CreateQuestionRequest, CreateQuestionResponse, DeleteQuestionRequest, EditQuestionRequest,
    FixturePollLifecycleCommand, PollLifecycleCommand,
};
#[cfg(test)]
pub use poll_query::MockPollQuery;
pub use poll_query::{FixturePollQuery, PollQuery};
#[cfg(test)]
pub use poll_repository::MockPollRepository;
pub use poll_repository::{FixturePollRepository, PollRepository, PollRepositoryError};
#[cfg(test)]
pub use registration_command::MockRegistrationCommand;
pub use registration_command::{
    FixtureRegistrationCommand, RegisterRequest, RegisterResponse, RegistrationCommand,
};
#[cfg(test)]
pub use vote_repository::MockVoteRepository;
pub use vote_repository::{FixtureVoteRepository, VoteRepository, VoteRepositoryError};
#[cfg(test)]
pub use voting_command::MockVotingCommand;
pub use voting_command::{CastVoteRequest, CastVoteResponse, FixtureVotingCommand, VotingCommand};
