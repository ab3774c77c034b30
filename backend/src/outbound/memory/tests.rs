//! Tests for the in-memory store.

use std::sync::Arc;

use chrono::{Duration, TimeZone};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::polls::{CategoryName, PollDraft, parse_choice_entries};
use crate::domain::{EmailAddress, HashCost, PasswordHash, Username};

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn category(name: &str, created_at: DateTime<Utc>) -> Category {
    Category::new(
        Uuid::new_v4(),
        CategoryName::new(name).expect("valid"),
        None,
        created_at,
    )
}

fn poll_in(category: &Category, publish_at: DateTime<Utc>) -> Poll {
    Poll::from_draft(PollDraft {
        category_id: category.id(),
        owner: UserId::random(),
        text: QuestionText::new("Best season?").expect("valid"),
        choice_texts: parse_choice_entries(["Spring", "Autumn"]).expect("valid"),
        publish_at,
    })
}

fn vote_for(poll: &Poll, choice_index: usize, voter: UserId) -> Vote {
    Vote {
        id: Uuid::new_v4(),
        question_id: poll.question().id(),
        choice_id: poll.choices()[choice_index].id(),
        voter,
        cast_at: at(12),
    }
}

#[fixture]
fn games() -> Category {
    category("Games", at(1))
}

async fn store_with(category: &Category) -> InMemoryStore {
    let store = InMemoryStore::new();
    store
        .insert_category(category)
        .await
        .expect("category stored");
    store
}

#[rstest]
#[tokio::test]
async fn poll_requires_an_existing_category(games: Category) {
    let store = InMemoryStore::new();
    let err = store
        .insert_poll(&poll_in(&games, at(2)))
        .await
        .expect_err("unknown category");
    assert_eq!(err, PollRepositoryError::category_not_found(games.id()));
}

#[rstest]
#[tokio::test]
async fn published_listing_is_newest_first_and_hides_future(games: Category) {
    let store = store_with(&games).await;
    let older = poll_in(&games, at(2));
    let newer = poll_in(&games, at(5));
    let future = poll_in(&games, at(5) + Duration::days(30));
    for poll in [&older, &newer, &future] {
        store.insert_poll(poll).await.expect("poll stored");
    }

    let listed = store.list_published(at(6)).await.expect("listing");
    let ids: Vec<_> = listed.iter().map(Question::id).collect();
    assert_eq!(ids, [newer.question().id(), older.question().id()]);
}

#[rstest]
#[tokio::test]
async fn category_listing_filters_by_name(games: Category) {
    let sports = category("Sports", at(1));
    let store = store_with(&games).await;
    store.insert_category(&sports).await.expect("stored");
    let in_games = poll_in(&games, at(2));
    store.insert_poll(&in_games).await.expect("stored");
    store
        .insert_poll(&poll_in(&sports, at(2)))
        .await
        .expect("stored");

    let listed = store
        .list_published_in_category("Games", at(3))
        .await
        .expect("listing");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id(), in_games.question().id());

    let missing = store
        .list_published_in_category("Nope", at(3))
        .await
        .expect("listing");
    assert!(missing.is_empty());
}

#[rstest]
#[tokio::test]
async fn category_listing_is_newest_first_and_hides_future(games: Category) {
    let now = at(12);
    let store = store_with(&games).await;
    let month_old = poll_in(&games, now - Duration::days(30));
    let recent = poll_in(&games, now - Duration::days(5));
    let scheduled = poll_in(&games, now + Duration::days(5));
    for poll in [&month_old, &recent, &scheduled] {
        store.insert_poll(poll).await.expect("stored");
    }

    let listed = store
        .list_published_in_category("Games", now)
        .await
        .expect("listing");
    let ids: Vec<_> = listed.iter().map(Question::id).collect();
    assert_eq!(ids, [recent.question().id(), month_old.question().id()]);
}

#[rstest]
#[tokio::test]
async fn second_vote_by_the_same_voter_is_rejected(games: Category) {
    let store = store_with(&games).await;
    let poll = poll_in(&games, at(2));
    store.insert_poll(&poll).await.expect("stored");
    let voter = UserId::random();

    let tally = store
        .record_vote(&vote_for(&poll, 0, voter))
        .await
        .expect("first vote");
    assert_eq!(tally, 1);

    let err = store
        .record_vote(&vote_for(&poll, 1, voter))
        .await
        .expect_err("second vote");
    assert_eq!(err, VoteRepositoryError::already_voted(poll.question().id()));

    let stored = store
        .find_poll(&poll.question().id())
        .await
        .expect("lookup")
        .expect("present");
    assert_eq!(stored.total_votes(), 1);
    assert!(
        store
            .has_voted(&poll.question().id(), &voter)
            .await
            .expect("lookup")
    );
}

#[rstest]
#[tokio::test]
async fn vote_for_a_choice_of_another_question_is_rejected(games: Category) {
    let store = store_with(&games).await;
    let first = poll_in(&games, at(2));
    let second = poll_in(&games, at(2));
    store.insert_poll(&first).await.expect("stored");
    store.insert_poll(&second).await.expect("stored");

    let mut vote = vote_for(&first, 0, UserId::random());
    vote.choice_id = second.choices()[0].id();

    let err = store.record_vote(&vote).await.expect_err("foreign choice");
    assert_eq!(err, VoteRepositoryError::choice_not_found(vote.choice_id));
}

#[rstest]
#[tokio::test]
async fn concurrent_votes_are_all_counted(games: Category) {
    let store = Arc::new(store_with(&games).await);
    let poll = poll_in(&games, at(2));
    store.insert_poll(&poll).await.expect("stored");

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let store = Arc::clone(&store);
            let vote = vote_for(&poll, 1, UserId::random());
            tokio::spawn(async move { store.record_vote(&vote).await })
        })
        .collect();
    for handle in handles {
        handle.await.expect("task joins").expect("vote recorded");
    }

    let stored = store
        .find_poll(&poll.question().id())
        .await
        .expect("lookup")
        .expect("present");
    assert_eq!(stored.choices()[1].votes(), 20);
    assert_eq!(stored.choices()[0].votes(), 0);
}

#[rstest]
#[tokio::test]
async fn delete_removes_the_question_and_its_votes(games: Category) {
    let store = store_with(&games).await;
    let poll = poll_in(&games, at(2));
    let question_id = poll.question().id();
    let voter = UserId::random();
    store.insert_poll(&poll).await.expect("stored");
    store
        .record_vote(&vote_for(&poll, 0, voter))
        .await
        .expect("vote");

    assert!(store.delete_poll(&question_id).await.expect("delete"));
    assert!(!store.delete_poll(&question_id).await.expect("delete"));
    assert!(!store.has_voted(&question_id, &voter).await.expect("lookup"));
}

#[rstest]
#[tokio::test]
async fn update_text_reports_missing_questions(games: Category) {
    let store = store_with(&games).await;
    let poll = poll_in(&games, at(2));
    store.insert_poll(&poll).await.expect("stored");
    let text = QuestionText::new("Best month?").expect("valid");

    assert!(
        store
            .update_question_text(&poll.question().id(), &text)
            .await
            .expect("update")
    );
    assert!(
        !store
            .update_question_text(&Uuid::new_v4(), &text)
            .await
            .expect("update")
    );
}

#[rstest]
#[tokio::test]
async fn categories_are_newest_first_and_unique() {
    let store = InMemoryStore::new();
    let older = category("Games", at(1));
    let newer = category("Sports", at(2));
    let same_time = category("Art", at(2));
    for c in [&older, &newer, &same_time] {
        store.insert_category(c).await.expect("stored");
    }

    let names: Vec<_> = store
        .list_categories()
        .await
        .expect("listing")
        .iter()
        .map(|c| c.name().as_str().to_owned())
        .collect();
    assert_eq!(names, ["Art", "Sports", "Games"]);

    let err = store
        .insert_category(&category("Games", at(3)))
        .await
        .expect_err("duplicate");
    assert_eq!(err, CategoryRepositoryError::duplicate_name("Games"));
}

#[rstest]
#[case("Games", true)]
#[case("games", false)]
#[case("Sports", false)]
#[tokio::test]
async fn categories_are_found_by_exact_name(
    games: Category,
    #[case] name: &str,
    #[case] found: bool,
) {
    let store = store_with(&games).await;
    let name = CategoryName::new(name).expect("valid");
    let hit = store.find_category_by_name(&name).await.expect("lookup");
    assert_eq!(hit.map(|c| c.id()), found.then(|| games.id()));
}

#[rstest]
#[tokio::test]
async fn accounts_are_unique_by_username_and_email() {
    let store = InMemoryStore::new();
    let account = |username: &str, email: &str| Account {
        id: UserId::random(),
        username: Username::new(username).expect("valid"),
        email: EmailAddress::new(email).expect("valid"),
        password_hash: PasswordHash::derive("password1", HashCost::MINIMAL).expect("hash"),
        created_at: at(1),
    };
    store
        .insert_account(&account("voter1", "voter1@example.org"))
        .await
        .expect("stored");

    assert_eq!(
        store
            .insert_account(&account("voter1", "other@example.org"))
            .await,
        Err(AccountRepositoryError::DuplicateUsername)
    );
    assert_eq!(
        store
            .insert_account(&account("voter2", "voter1@example.org"))
            .await,
        Err(AccountRepositoryError::DuplicateEmail)
    );
    let found = store
        .find_by_email("voter1@example.org")
        .await
        .expect("lookup")
        .expect("present");
    assert_eq!(found.username.as_str(), "voter1");
}
