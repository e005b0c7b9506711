/*!
 * Errors that can be returned by store operations
 */

use std::error::Error as StdError;
use std::fmt::{Display, Formatter, Result as FmtResult};

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::id::Id;

pub type Result<T> = std::result::Result<T, Error>;

/// Kind of row an error is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Game,
    Player,
    GamePlayer,
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::User => "user",
            Self::Game => "game",
            Self::Player => "player",
            Self::GamePlayer => "game player",
        })
    }
}

/// Unique index that rejected a write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    UserEmail,
    UserName,
    /// `(game_id, player_id)` on game players
    Membership,
    /// Anything the engine reported that we do not know by name
    Other(String),
}

impl Constraint {
    /// Sqlite does not report index names, only `UNIQUE constraint failed: table.col, ...`
    fn from_message(message: &str) -> Self {
        if message.contains("users.email") {
            Self::UserEmail
        } else if message.contains("users.user_name") {
            Self::UserName
        } else if message.contains("game_players.game_id") {
            Self::Membership
        } else {
            Self::Other(message.to_owned())
        }
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::UserEmail => f.write_str("email is already taken"),
            Self::UserName => f.write_str("user name is already taken"),
            Self::Membership => f.write_str("player already joined this game"),
            Self::Other(message) => f.write_str(message),
        }
    }
}

/// What is wrong with a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalid {
    Empty,
    TooLong { max: usize },
}

#[derive(Debug)]
pub enum Error {
    NotFound { entity: Entity, id: Id },
    ConstraintViolation(Constraint),
    ImmutableFieldViolation { entity: Entity, field: &'static str },
    Validation { entity: Entity, field: &'static str, invalid: Invalid },
    InvalidPage(i64),
    Db(DieselError),
    Pool(diesel::r2d2::PoolError),
    Migration(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::NotFound { entity, id } => write!(f, "{} {} not found", entity, id),
            Self::ConstraintViolation(constraint) => write!(f, "constraint violation: {}", constraint),
            Self::ImmutableFieldViolation { entity, field } => {
                write!(f, "{} field `{}` cannot be modified", entity, field)
            }
            Self::Validation { entity, field, invalid: Invalid::Empty } => {
                write!(f, "{} field `{}` is required", entity, field)
            }
            Self::Validation { entity, field, invalid: Invalid::TooLong { max } } => {
                write!(f, "{} field `{}` is longer than {} characters", entity, field, max)
            }
            Self::InvalidPage(page) => write!(f, "invalid page {}", page),
            Self::Migration(e) => write!(f, "migration failed: {}", e),
            Self::Db(e) => write!(f, "{}", e),
            Self::Pool(e) => write!(f, "{}", e),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Db(e) => Some(e),
            Self::Pool(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DieselError> for Error {
    fn from(e: DieselError) -> Error {
        match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info) => {
                Error::ConstraintViolation(Constraint::from_message(info.message()))
            }
            e => Error::Db(e),
        }
    }
}

impl From<diesel::r2d2::PoolError> for Error {
    fn from(e: diesel::r2d2::PoolError) -> Error {
        Error::Pool(e)
    }
}
