/*!
 * Transactional access to the score keeper tables
 *
 * Every write runs inside one `BEGIN IMMEDIATE` transaction, so the existence
 * checks, the write itself and any cascade are a single unit of work that
 * other writers queue behind. Uniqueness is left to the engine's indexes.
 */

use std::time::Duration;

use diesel::{
    connection::SimpleConnection,
    prelude::*,
    r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection},
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{debug, info, instrument};

use crate::config::DbConfig;
use crate::error::{Error, Result};
use crate::models::Counts;
use crate::schema::{game_players, games, players, users};

mod game;
mod membership;
mod player;
mod user;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;
pub type SqlitePooledConn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Per-connection settings; sqlite forgets pragmas between connections.
#[derive(Debug, Clone, Copy)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON;",
            self.busy_timeout.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url == ":memory:" || database_url.contains("mode=memory")
}

#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
    page_size: i64,
}

impl Store {
    /// Opens the pool. An in-memory database lives and dies with its
    /// connection, so it gets a single connection that is never recycled.
    #[instrument(skip(config), fields(database_url = %config.database_url), err)]
    pub fn connect(config: &DbConfig) -> Result<Self> {
        let in_memory = is_in_memory(&config.database_url);
        let pool_size = if in_memory { 1 } else { config.pool_size.max(1) };
        let mut builder = Pool::<ConnectionManager<SqliteConnection>>::builder().max_size(pool_size);
        if in_memory {
            builder = builder.min_idle(Some(1)).idle_timeout(None).max_lifetime(None);
        }
        let manager = ConnectionManager::<SqliteConnection>::new(&config.database_url);
        let pool = builder
            .connection_customizer(Box::new(ConnectionOptions {
                busy_timeout: Duration::from_millis(config.busy_timeout_ms),
            }))
            .build(manager)?;
        info!(pool_size, "Connected to sqlite");
        Ok(Self { pool, page_size: config.page_size.max(1) })
    }

    /// Applies pending migrations, returning the versions that ran.
    #[instrument(skip(self), err)]
    pub fn run_migrations(&self) -> Result<Vec<String>> {
        let mut conn = self.conn()?;
        let conn: &mut SqliteConnection = &mut conn;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| Error::Migration(e.to_string()))?
            .into_iter()
            .map(|version| version.to_string())
            .collect::<Vec<_>>();
        info!(count = applied.len(), "Applied migrations");
        Ok(applied)
    }

    #[instrument(skip(self), err)]
    pub fn counts(&self) -> Result<Counts> {
        self.read(|conn| {
            Ok(Counts {
                users: users::table.count().get_result(conn)?,
                games: games::table.count().get_result(conn)?,
                players: players::table.count().get_result(conn)?,
                game_players: game_players::table.count().get_result(conn)?,
            })
        })
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    fn conn(&self) -> Result<SqlitePooledConn> {
        Ok(self.pool.get()?)
    }

    /// Runs `f` in a deferred transaction, so multi-statement reads share a snapshot.
    fn read<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T>,
    {
        let mut conn = self.conn()?;
        let conn: &mut SqliteConnection = &mut conn;
        conn.transaction(f)
    }

    /// Runs `f` holding the database write lock from the first statement on.
    fn write<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T>,
    {
        let mut conn = self.conn()?;
        let conn: &mut SqliteConnection = &mut conn;
        let res = conn.immediate_transaction(f);
        if let Err(ref e) = res {
            debug!("Rolled back: {e}");
        }
        res
    }

    /// Pages start at 1 and must start at an offset that fits in an i64.
    fn check_page(&self, page: i64) -> Result<()> {
        if page < 1 || (page - 1).checked_mul(self.page_size).is_none() {
            return Err(Error::InvalidPage(page));
        }
        Ok(())
    }
}
