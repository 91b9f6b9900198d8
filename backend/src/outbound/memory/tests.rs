//! Repository contract and end-to-end pipeline behaviour over the in-memory
//! store.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MutationStatus, UserCommand, UserQuery};
use crate::domain::validation::FieldMap;
use crate::domain::{
    EMAIL_MAX_CHARS, EMAIL_TAKEN_MESSAGE, MutationResult, NAME_MAX_CHARS, UserMutationService,
};

struct FixtureClock {
    utc_now: Mutex<DateTime<Utc>>,
}

impl FixtureClock {
    fn starting_at(utc_now: DateTime<Utc>) -> Self {
        Self {
            utc_now: Mutex::new(utc_now),
        }
    }

    fn advance(&self, delta: TimeDelta) {
        let mut now = self.utc_now.lock().expect("clock lock");
        *now += delta;
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.utc_now.lock().expect("clock lock")
    }
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 3, 29, 11, 56, 8)
        .single()
        .expect("valid timestamp")
}

#[fixture]
fn clock() -> Arc<FixtureClock> {
    Arc::new(FixtureClock::starting_at(start()))
}

#[fixture]
fn repo(clock: Arc<FixtureClock>) -> InMemoryUserRepository {
    InMemoryUserRepository::new(clock)
}

#[fixture]
fn service() -> UserMutationService<InMemoryUserRepository> {
    UserMutationService::new(Arc::new(InMemoryUserRepository::new(Arc::new(
        FixtureClock::starting_at(start()),
    ))))
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        first_name: "A".to_owned(),
        last_name: "B".to_owned(),
        email: email.to_owned(),
    }
}

fn object(value: Value) -> FieldMap {
    match value {
        Value::Object(map) => map,
        other => panic!("expected JSON object, got {other}"),
    }
}

fn valid_input() -> FieldMap {
    object(json!({ "first_name": "A", "last_name": "B", "email": "a@b.com" }))
}

async fn created_id(service: &UserMutationService<InMemoryUserRepository>) -> UserId {
    match service.create(&valid_input()).await.expect("create") {
        MutationResult::Created(user) => user.id(),
        other => panic!("expected created user, got {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn insert_assigns_sequential_ids_and_timestamps(repo: InMemoryUserRepository) {
    let first = repo.insert(&new_user("a@b.com")).await.expect("insert");
    let second = repo.insert(&new_user("c@d.com")).await.expect("insert");

    assert_eq!(first.id(), UserId::new(1));
    assert_eq!(second.id(), UserId::new(2));
    assert_eq!(first.created_at(), start());
    assert_eq!(first.updated_at(), start());
    assert_eq!(repo.len(), 2);
}

#[rstest]
#[tokio::test]
async fn duplicate_email_leaves_store_unchanged(repo: InMemoryUserRepository) {
    repo.insert(&new_user("a@b.com")).await.expect("insert");

    let err = repo
        .insert(&new_user("a@b.com"))
        .await
        .expect_err("duplicate email");

    assert_eq!(err, UserPersistenceError::email_taken("a@b.com"));
    assert_eq!(repo.len(), 1);
}

#[rstest]
#[tokio::test]
async fn email_uniqueness_is_case_sensitive(repo: InMemoryUserRepository) {
    repo.insert(&new_user("a@b.com")).await.expect("insert");
    repo.insert(&new_user("A@B.com"))
        .await
        .expect("different case is a different email");
}

#[rstest]
#[tokio::test]
async fn update_refreshes_updated_at_only(clock: Arc<FixtureClock>) {
    let repo = InMemoryUserRepository::new(clock.clone());
    let mut user = repo.insert(&new_user("a@b.com")).await.expect("insert");
    clock.advance(TimeDelta::minutes(3));

    user.set_first_name("Z");
    let stored = repo.update(&user).await.expect("update");

    assert_eq!(stored.first_name(), "Z");
    assert_eq!(stored.created_at(), start());
    assert_eq!(stored.updated_at(), start() + TimeDelta::minutes(3));
}

#[rstest]
#[tokio::test]
async fn update_rejects_email_owned_by_another_row(repo: InMemoryUserRepository) {
    repo.insert(&new_user("a@b.com")).await.expect("insert");
    let mut second = repo.insert(&new_user("c@d.com")).await.expect("insert");

    second.set_email("a@b.com");
    let err = repo.update(&second).await.expect_err("email taken");

    assert!(matches!(err, UserPersistenceError::EmailTaken { .. }));
    let stored = repo.find_by_id(second.id()).await.expect("still stored");
    assert_eq!(stored.email(), "c@d.com");
}

#[rstest]
#[tokio::test]
async fn update_keeping_own_email_is_not_a_conflict(repo: InMemoryUserRepository) {
    let user = repo.insert(&new_user("a@b.com")).await.expect("insert");
    repo.update(&user).await.expect("own email is fine");
}

#[rstest]
#[tokio::test]
async fn removed_rows_report_not_found(repo: InMemoryUserRepository) {
    let user = repo.insert(&new_user("a@b.com")).await.expect("insert");
    repo.delete(&user).await.expect("delete");

    assert_eq!(
        repo.find_by_id(user.id()).await,
        Err(UserPersistenceError::not_found(1_i32))
    );
    assert_eq!(
        repo.delete(&user).await,
        Err(UserPersistenceError::not_found(1_i32))
    );
    assert_eq!(
        repo.update(&user).await,
        Err(UserPersistenceError::not_found(1_i32))
    );
    assert!(repo.is_empty());
}

#[rstest]
#[tokio::test]
async fn ids_are_not_reused_after_delete(repo: InMemoryUserRepository) {
    let first = repo.insert(&new_user("a@b.com")).await.expect("insert");
    repo.delete(&first).await.expect("delete");
    let next = repo.insert(&new_user("a@b.com")).await.expect("insert");
    assert_eq!(next.id(), UserId::new(2));
}

#[rstest]
#[tokio::test]
async fn create_on_empty_store_assigns_id_and_keeps_email(
    service: UserMutationService<InMemoryUserRepository>,
) {
    let result = service.create(&valid_input()).await.expect("create");

    assert_eq!(result.status(), MutationStatus::Success);
    let user = result.user().expect("created user");
    assert_eq!(user.id(), UserId::new(1));
    assert_eq!(user.email(), "a@b.com");
}

#[rstest]
#[tokio::test]
async fn second_create_with_same_email_conflicts(
    service: UserMutationService<InMemoryUserRepository>,
) {
    service.create(&valid_input()).await.expect("first create");

    let result = service.create(&valid_input()).await.expect("second create");

    assert_eq!(result.status(), MutationStatus::Conflict);
    assert!(result.errors().iter().any(|e| e == EMAIL_TAKEN_MESSAGE));
}

#[rstest]
#[tokio::test]
async fn whitespace_update_leaves_field_unchanged(
    service: UserMutationService<InMemoryUserRepository>,
) {
    let id = created_id(&service).await;

    let result = service
        .update(id, &object(json!({ "first_name": "  " })))
        .await
        .expect("update");

    assert_eq!(result.status(), MutationStatus::Success);
    assert_eq!(result.user().expect("updated").first_name(), "A");
}

#[rstest]
#[tokio::test]
async fn empty_update_is_a_successful_no_op(
    service: UserMutationService<InMemoryUserRepository>,
) {
    let id = created_id(&service).await;

    let result = service.update(id, &FieldMap::new()).await.expect("update");

    let user = result.user().expect("updated");
    assert_eq!(result.status(), MutationStatus::Success);
    assert_eq!(
        (user.first_name(), user.last_name(), user.email()),
        ("A", "B", "a@b.com")
    );
}

#[rstest]
#[tokio::test]
async fn update_to_taken_email_conflicts(service: UserMutationService<InMemoryUserRepository>) {
    created_id(&service).await;
    let other = match service
        .create(&object(
            json!({ "first_name": "C", "last_name": "D", "email": "c@d.com" }),
        ))
        .await
        .expect("create")
    {
        MutationResult::Created(user) => user.id(),
        other => panic!("expected created user, got {other:?}"),
    };

    let result = service
        .update(other, &object(json!({ "email": "a@b.com" })))
        .await
        .expect("update");

    assert_eq!(result.status(), MutationStatus::Conflict);
    assert_eq!(result.errors(), [EMAIL_TAKEN_MESSAGE]);
}

#[rstest]
#[tokio::test]
async fn delete_of_unknown_id_is_not_found_and_stays_not_found(
    service: UserMutationService<InMemoryUserRepository>,
) {
    let missing = UserId::new(404);

    assert_eq!(
        service.delete(missing).await.expect("delete"),
        MutationResult::NotFound
    );
    assert_eq!(
        service.fetch(missing).await.expect("fetch"),
        MutationResult::NotFound
    );
}

#[rstest]
#[tokio::test]
async fn deleting_twice_reports_not_found(service: UserMutationService<InMemoryUserRepository>) {
    let id = created_id(&service).await;

    assert_eq!(
        service.delete(id).await.expect("delete"),
        MutationResult::Deleted
    );
    assert_eq!(
        service.delete(id).await.expect("delete again"),
        MutationResult::NotFound
    );
    assert_eq!(
        service.fetch(id).await.expect("fetch"),
        MutationResult::NotFound
    );
}

#[rstest]
#[tokio::test]
async fn non_text_values_report_the_same_message_on_create_and_update(
    service: UserMutationService<InMemoryUserRepository>,
) {
    let id = created_id(&service).await;

    let created = service
        .create(&object(
            json!({ "first_name": 5, "last_name": "B", "email": "c@d.com" }),
        ))
        .await
        .expect("create");
    let updated = service
        .update(id, &object(json!({ "first_name": 5 })))
        .await
        .expect("update");

    assert_eq!(created.status(), MutationStatus::ValidationFailure);
    assert_eq!(updated.status(), MutationStatus::ValidationFailure);
    assert_eq!(created.errors(), ["first_name is required"]);
    assert_eq!(updated.errors(), created.errors());
}

#[rstest]
#[tokio::test]
async fn overlong_values_are_rejected_like_the_postgres_schema(
    service: UserMutationService<InMemoryUserRepository>,
) {
    let id = created_id(&service).await;

    let created = service
        .create(&object(json!({
            "first_name": "A".repeat(NAME_MAX_CHARS + 1),
            "last_name": "B",
            "email": "c@d.com",
        })))
        .await
        .expect("create");
    let updated = service
        .update(id, &object(json!({ "email": "x".repeat(EMAIL_MAX_CHARS + 1) })))
        .await
        .expect("update");

    assert_eq!(created.status(), MutationStatus::ValidationFailure);
    assert_eq!(created.errors(), ["first_name is too long"]);
    assert_eq!(updated.status(), MutationStatus::ValidationFailure);
    assert_eq!(updated.errors(), ["email is too long"]);
    let stored = service.fetch(id).await.expect("fetch");
    assert_eq!(stored.user().expect("still stored").email(), "a@b.com");
}

#[rstest]
#[tokio::test]
async fn names_at_the_column_width_are_accepted(repo: InMemoryUserRepository) {
    let user = repo
        .insert(&NewUser {
            first_name: "A".repeat(NAME_MAX_CHARS),
            last_name: "B".repeat(NAME_MAX_CHARS),
            email: format!("{}@b.com", "a".repeat(EMAIL_MAX_CHARS - 6)),
        })
        .await
        .expect("widths at the limit fit");
    assert_eq!(user.email().chars().count(), EMAIL_MAX_CHARS);
}
