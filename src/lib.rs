/*!
 * Users, their games and players, and per-game scores, persisted in SQLite.
 *
 * Everything goes through [`Store`], which keeps the relations intact:
 * unique user emails and names, one seat per player and game, and deletes
 * that take everything a row owns down with it.
 */

pub mod config;
pub mod error;
mod extensions;
pub mod id;
pub mod models;
pub mod paginate;
pub mod patch;
mod schema;
pub mod store;
mod validate;

pub use error::{Constraint, Entity, Error, Invalid, Result};
pub use id::Id;
pub use models::{
    CascadeReport, Counts, Game, GamePlayer, GameStatus, NewGame, NewGamePlayer, NewPlayer,
    NewUser, Player, User,
};
pub use paginate::Page;
pub use patch::{GamePatch, GamePlayerPatch, PlayerPatch, UserPatch};
pub use store::Store;
pub use validate::{EMAIL_MAX, GAME_NAME_MAX, PLAYER_NAME_MAX, USER_NAME_MAX};
