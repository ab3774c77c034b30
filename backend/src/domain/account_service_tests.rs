//! Tests for registration and login.

use std::sync::Arc;

use chrono::Utc;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockAccountRepository;
use crate::domain::{EmailAddress, ErrorCode, HashCost, Username};
use crate::test_support::MutableClock;

#[fixture]
fn request() -> RegisterRequest {
    RegisterRequest {
        username: "voter1".to_owned(),
        email: "voter1@example.org".to_owned(),
        password: "password1".to_owned(),
        password_confirmation: "password1".to_owned(),
    }
}

fn make_service(repo: MockAccountRepository) -> AccountService<MockAccountRepository> {
    AccountService::new(Arc::new(repo), Arc::new(MutableClock::new(Utc::now())))
        .with_hash_cost(HashCost::MINIMAL)
}

fn stored_account(username: &str, password: &str) -> Account {
    Account {
        id: UserId::random(),
        username: Username::new(username).expect("valid username"),
        email: EmailAddress::new(format!("{username}@example.org")).expect("valid email"),
        password_hash: PasswordHash::derive(password, HashCost::MINIMAL).expect("hash"),
        created_at: Utc::now(),
    }
}

fn error_codes(err: &Error) -> Vec<String> {
    err.details()
        .and_then(|details| details["errors"].as_array())
        .map(|errors| {
            errors
                .iter()
                .map(|entry| {
                    let field = entry["field"].as_str().unwrap_or_default();
                    let code = entry["code"].as_str().unwrap_or_default();
                    format!("{field}:{code}")
                })
                .collect()
        })
        .unwrap_or_default()
}

#[rstest]
#[tokio::test]
async fn registers_and_stores_a_salted_hash(request: RegisterRequest) {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_username().times(1).return_once(|_| Ok(None));
    repo.expect_find_by_email().times(1).return_once(|_| Ok(None));
    repo.expect_insert_account()
        .withf(|account: &Account| {
            account.username.as_str() == "voter1"
                && account.password_hash.verify("password1")
                && !account.password_hash.to_stored().contains("password1")
        })
        .times(1)
        .return_once(|_| Ok(()));

    let response = make_service(repo)
        .register(request)
        .await
        .expect("registration succeeds");
    assert_eq!(response.username, "voter1");
}

#[rstest]
#[tokio::test]
async fn reports_every_failure_together(mut request: RegisterRequest) {
    request.username = "taken".to_owned();
    request.password = "short".to_owned();
    request.password_confirmation = "other".to_owned();
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_username()
        .times(1)
        .return_once(|_| Ok(Some(stored_account("taken_name", "irrelevant"))));
    repo.expect_find_by_email().never();
    repo.expect_insert_account().never();

    let err = make_service(repo)
        .register(request)
        .await
        .expect_err("invalid registration");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        error_codes(&err),
        [
            "username:unique",
            "username:too_short",
            "password:too_short",
            "passwordConfirmation:mismatch",
        ]
    );
}

#[rstest]
#[tokio::test]
async fn duplicate_email_is_reported(request: RegisterRequest) {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_username().times(1).return_once(|_| Ok(None));
    repo.expect_find_by_email()
        .times(1)
        .return_once(|_| Ok(Some(stored_account("someone", "irrelevant"))));
    repo.expect_insert_account().never();

    let err = make_service(repo)
        .register(request)
        .await
        .expect_err("email taken");

    assert_eq!(error_codes(&err), ["email:unique"]);
}

#[rstest]
#[tokio::test]
async fn insert_race_maps_to_a_field_error(request: RegisterRequest) {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_username().times(1).return_once(|_| Ok(None));
    repo.expect_find_by_email().times(1).return_once(|_| Ok(None));
    repo.expect_insert_account()
        .times(1)
        .return_once(|_| Err(AccountRepositoryError::DuplicateUsername));

    let err = make_service(repo)
        .register(request)
        .await
        .expect_err("lost race");

    assert_eq!(error_codes(&err), ["username:unique"]);
}

#[rstest]
#[case("voter1", "password1", true)]
#[case("voter1", "password2", false)]
#[tokio::test]
async fn login_checks_the_stored_hash(
    #[case] username: &str,
    #[case] password: &str,
    #[case] should_succeed: bool,
) {
    let account = stored_account("voter1", "password1");
    let expected_id = account.id;
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_username()
        .times(1)
        .return_once(move |_| Ok(Some(account)));

    let creds = LoginCredentials::try_from_parts(username, password).expect("shape");
    let result = make_service(repo).authenticate(&creds).await;

    match (should_succeed, result) {
        (true, Ok(id)) => assert_eq!(id, expected_id),
        (false, Err(err)) => {
            assert_eq!(err.code(), ErrorCode::Unauthorized);
            assert_eq!(err.message(), "Wrong username or password!");
        }
        (expected, other) => panic!("should_succeed={expected}, got {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn login_with_unknown_user_is_unauthorized() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_username().times(1).return_once(|_| Ok(None));

    let creds = LoginCredentials::try_from_parts("ghost_user", "password1").expect("shape");
    let err = make_service(repo)
        .authenticate(&creds)
        .await
        .expect_err("unknown user");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "Wrong username or password!");
}

#[rstest]
#[tokio::test]
async fn unknown_users_are_checked_against_one_decoy_hash() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_username().times(2).returning(|_| Ok(None));
    let service = make_service(repo);
    let creds = LoginCredentials::try_from_parts("ghost_user", DECOY_PASSWORD).expect("shape");

    for _ in 0..2 {
        let err = service.authenticate(&creds).await.expect_err("unknown user");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    let decoy = service.decoy.get().expect("decoy derived on first miss");
    assert!(decoy.verify(DECOY_PASSWORD));
    assert!(decoy.to_stored().starts_with("$argon2id$"));
}

#[rstest]
#[tokio::test(flavor = "current_thread")]
async fn hashing_work_leaves_the_async_worker() {
    let worker = std::thread::current().id();
    let ran_on = run_blocking(|| std::thread::current().id())
        .await
        .expect("blocking task completes");
    assert_ne!(ran_on, worker);
}
