//! User creation, lookups and updates.

mod common;

use score_keeper::config::DbConfig;
use score_keeper::{Constraint, Entity, Error, Id, Invalid, NewUser, Store, UserPatch};

use common::{setup_store, setup_store_with, user};

#[test]
fn test_create_user() {
    let (_db, store) = setup_store();
    let created = store.create_user(NewUser::new("alice", "a@x.com")).expect("Create failed");
    assert_eq!(created.user_name, "alice");
    assert_eq!(created.email, "a@x.com");

    let found = store.user(created.id).expect("Lookup failed");
    assert_eq!(found.id, created.id);
    assert_eq!(found.created_at, created.created_at);
}

#[test]
fn test_duplicate_email_fails() {
    let (_db, store) = setup_store();
    store.create_user(NewUser::new("alice", "a@x.com")).expect("First create failed");
    let err = store.create_user(NewUser::new("bob", "a@x.com")).unwrap_err();
    assert!(matches!(err, Error::ConstraintViolation(Constraint::UserEmail)), "{err:?}");
}

#[test]
fn test_duplicate_user_name_fails() {
    let (_db, store) = setup_store();
    store.create_user(NewUser::new("alice", "a@x.com")).expect("First create failed");
    let err = store.create_user(NewUser::new("alice", "other@x.com")).unwrap_err();
    assert!(matches!(err, Error::ConstraintViolation(Constraint::UserName)), "{err:?}");
}

#[test]
fn test_uniqueness_ignores_ascii_case() {
    let (_db, store) = setup_store();
    store.create_user(NewUser::new("alice", "a@x.com")).expect("First create failed");
    let err = store.create_user(NewUser::new("bob", "A@X.com")).unwrap_err();
    assert!(matches!(err, Error::ConstraintViolation(Constraint::UserEmail)));

    let found = store.user_by_email("A@x.COM").expect("Query failed");
    assert_eq!(found.map(|u| u.user_name), Some("alice".to_owned()));
}

#[test]
fn test_failed_create_leaves_nothing_behind() {
    let (_db, store) = setup_store();
    store.create_user(NewUser::new("alice", "a@x.com")).expect("First create failed");
    store.create_user(NewUser::new("bob", "a@x.com")).unwrap_err();
    assert_eq!(store.counts().expect("Counts failed").users, 1);
    assert!(store.user_by_user_name("bob").expect("Query failed").is_none());
}

#[test]
fn test_create_user_validates_fields() {
    let (_db, store) = setup_store();
    let err = store.create_user(NewUser::new("", "a@x.com")).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation { entity: Entity::User, field: "userName", invalid: Invalid::Empty }
    ));

    let long_email = format!("{}@x.com", "a".repeat(200));
    let err = store.create_user(NewUser::new("alice", long_email)).unwrap_err();
    assert!(matches!(err, Error::Validation { field: "email", invalid: Invalid::TooLong { max: 200 }, .. }));

    assert_eq!(store.counts().expect("Counts failed").users, 0);
}

#[test]
fn test_lookup_by_unique_fields() {
    let (_db, store) = setup_store();
    let carol = user(&store, "carol");

    let by_name = store.user_by_user_name("carol").expect("Query failed");
    assert_eq!(by_name.map(|u| u.id), Some(carol.id));
    let by_email = store.user_by_email("carol@x.com").expect("Query failed");
    assert_eq!(by_email.map(|u| u.id), Some(carol.id));

    assert!(store.user_by_user_name("nobody").expect("Query failed").is_none());
}

#[test]
fn test_unknown_id_is_not_found() {
    let (_db, store) = setup_store();
    let id = Id::new();
    let err = store.user(id).unwrap_err();
    assert!(matches!(err, Error::NotFound { entity: Entity::User, id: missing } if missing == id));
}

#[test]
fn test_update_user_changes_only_supplied_fields() {
    let (_db, store) = setup_store();
    let dave = user(&store, "dave");

    let patch = UserPatch { email: Some("dave@y.com".to_owned()), ..UserPatch::default() };
    let updated = store.update_user(dave.id, patch).expect("Update failed");
    assert_eq!(updated.email, "dave@y.com");
    assert_eq!(updated.user_name, "dave");
    assert_eq!(updated.created_at, dave.created_at);

    let stored = store.user(dave.id).expect("Lookup failed");
    assert_eq!(stored, updated);
}

#[test]
fn test_update_user_rejects_created_at() {
    let (_db, store) = setup_store();
    let eve = user(&store, "eve");

    let patch = UserPatch {
        created_at: Some(eve.created_at - chrono::Duration::days(1)),
        user_name: Some("evelyn".to_owned()),
        ..UserPatch::default()
    };
    let err = store.update_user(eve.id, patch).unwrap_err();
    assert!(matches!(
        err,
        Error::ImmutableFieldViolation { entity: Entity::User, field: "createdAt" }
    ));
    assert_eq!(store.user(eve.id).expect("Lookup failed").user_name, "eve");
}

#[test]
fn test_update_user_to_taken_email_fails() {
    let (_db, store) = setup_store();
    user(&store, "frank");
    let grace = user(&store, "grace");

    let patch: UserPatch = serde_json::from_str(r#"{"email":"frank@x.com"}"#).expect("Bad patch");
    let err = store.update_user(grace.id, patch).unwrap_err();
    assert!(matches!(err, Error::ConstraintViolation(Constraint::UserEmail)));
    assert_eq!(store.user(grace.id).expect("Lookup failed").email, "grace@x.com");
}

#[test]
fn test_list_users_paginates_oldest_first() {
    let (_db, store) = setup_store_with(|c| c.page_size = 2);
    for name in ["alpha", "beta", "gamma"] {
        user(&store, name);
    }

    let first = store.users(1).expect("List failed");
    assert_eq!(first.per_page, store.page_size());
    assert_eq!(first.total, 3);
    assert_eq!(first.page_count(), 2);
    let names: Vec<_> = first.items.iter().map(|u| u.user_name.as_str()).collect();
    assert_eq!(names, ["alpha", "beta"]);

    let second = store.users(2).expect("List failed");
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].user_name, "gamma");

    assert!(matches!(store.users(0), Err(Error::InvalidPage(0))));
}

#[test]
fn test_page_past_any_offset_is_invalid() {
    let (_db, store) = setup_store();
    user(&store, "alpha");

    assert!(matches!(store.users(i64::MAX), Err(Error::InvalidPage(i64::MAX))));
    assert!(matches!(store.users(i64::MIN), Err(Error::InvalidPage(i64::MIN))));

    let far = store.users(i64::MAX / store.page_size()).expect("List failed");
    assert!(far.items.is_empty());
    assert_eq!(far.total, 0);
}

#[test]
fn test_in_memory_store_shares_one_database() {
    let mut config = DbConfig::new(":memory:");
    config.pool_size = 8;
    let store = Store::connect(&config).expect("Failed to connect");
    store.run_migrations().expect("Migrations failed");

    let alice = user(&store, "alice");
    assert_eq!(store.user(alice.id).expect("Lookup failed"), alice);
    assert_eq!(store.counts().expect("Counts failed").users, 1);
}
