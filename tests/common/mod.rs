//! Shared setup: a migrated store on a throwaway database file.
#![allow(dead_code)]

use diesel::{Connection, SqliteConnection};
use score_keeper::config::DbConfig;
use score_keeper::{Game, NewGame, NewPlayer, NewUser, Player, Store, User};
use tempfile::TempDir;

/// The directory must stay in scope to keep the database alive.
pub fn setup_store() -> (TempDir, Store) {
    setup_store_with(|_| {})
}

pub fn setup_store_with(tweak: impl FnOnce(&mut DbConfig)) -> (TempDir, Store) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("scores.db");
    let mut config = DbConfig::new(path.to_str().expect("Invalid path"));
    tweak(&mut config);

    let store = Store::connect(&config).expect("Failed to connect");
    store.run_migrations().expect("Migrations failed");
    (dir, store)
}

/// A connection of its own to the store's database, for bulk fixtures.
pub fn raw_connection(dir: &TempDir) -> SqliteConnection {
    let path = dir.path().join("scores.db");
    SqliteConnection::establish(path.to_str().expect("Invalid path")).expect("Failed to connect")
}

pub fn user(store: &Store, name: &str) -> User {
    store
        .create_user(NewUser::new(name, format!("{name}@x.com")))
        .expect("Create user failed")
}

pub fn game(store: &Store, owner: &User, name: &str) -> Game {
    store.create_game(NewGame::new(name, owner.id)).expect("Create game failed")
}

pub fn player(store: &Store, owner: &User, name: &str) -> Player {
    store.create_player(NewPlayer::new(name, owner.id)).expect("Create player failed")
}
