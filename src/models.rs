/*!
 * DB models for the score keeper
 */

use chrono::{NaiveDateTime, Utc};
use diesel::{
    backend::Backend,
    deserialize::{self, FromSql, FromSqlRow},
    expression::AsExpression,
    prelude::*,
    serialize::{self, IsNull, Output, ToSql},
    sql_types::Integer,
    sqlite::Sqlite,
};
use serde_derive::{Deserialize, Serialize};

use crate::error::{Entity, Result};
use crate::extensions::QueryResultExt;
use crate::id::Id;
use crate::schema::{game_players, games, players, users};
use crate::validate::{self, EMAIL_MAX, GAME_NAME_MAX, PLAYER_NAME_MAX, USER_NAME_MAX};

/// Timestamps are stored as naive UTC.
pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[derive(Queryable, Selectable, Insertable, AsChangeset, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = users)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Id,
    pub user_name: String,
    pub email: String,
    pub created_at: NaiveDateTime,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub user_name: String,
    pub email: String,
}

impl NewUser {
    pub fn new(user_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self { user_name: user_name.into(), email: email.into() }
    }

    pub(crate) fn into_user(self) -> Result<User> {
        validate::required(Entity::User, "userName", &self.user_name, USER_NAME_MAX)?;
        validate::required(Entity::User, "email", &self.email, EMAIL_MAX)?;
        Ok(User { id: Id::new(), user_name: self.user_name, email: self.email, created_at: now() })
    }
}

impl User {
    pub(crate) fn find(conn: &mut SqliteConnection, id: Id) -> Result<User> {
        users::table.find(id).first::<User>(conn).found(Entity::User, id)
    }
}

/// Lifecycle of a game. Transitions are not policed here.
#[derive(
    AsExpression, FromSqlRow, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default,
)]
#[diesel(sql_type = Integer)]
pub enum GameStatus {
    #[default]
    InProgress = 0,
    Completed = 1,
    Cancelled = 2,
}

impl ToSql<Integer, Sqlite> for GameStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(*self as i32);
        Ok(IsNull::No)
    }
}

impl FromSql<Integer, Sqlite> for GameStatus {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        match <i32 as FromSql<Integer, Sqlite>>::from_sql(bytes)? {
            0 => Ok(Self::InProgress),
            1 => Ok(Self::Completed),
            2 => Ok(Self::Cancelled),
            n => Err(format!("unknown game status {}", n).into()),
        }
    }
}

#[derive(Queryable, Selectable, Insertable, AsChangeset, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = games, treat_none_as_null = true)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: Id,
    pub name: String,
    pub user_id: Id,
    pub status: GameStatus,
    pub created_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewGame {
    pub name: String,
    pub user_id: Id,
    #[serde(default)]
    pub status: GameStatus,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
}

impl NewGame {
    pub fn new(name: impl Into<String>, user_id: Id) -> Self {
        Self { name: name.into(), user_id, status: GameStatus::default(), completed_at: None }
    }

    pub(crate) fn into_game(self) -> Result<Game> {
        validate::required(Entity::Game, "name", &self.name, GAME_NAME_MAX)?;
        Ok(Game {
            id: Id::new(),
            name: self.name,
            user_id: self.user_id,
            status: self.status,
            created_at: now(),
            completed_at: self.completed_at,
        })
    }
}

impl Game {
    pub(crate) fn find(conn: &mut SqliteConnection, id: Id) -> Result<Game> {
        games::table.find(id).first::<Game>(conn).found(Entity::Game, id)
    }
}

/// A named identity a user brings into any number of their games.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = players)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: Id,
    pub name: String,
    pub user_id: Id,
    pub created_at: NaiveDateTime,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewPlayer {
    pub name: String,
    pub user_id: Id,
}

impl NewPlayer {
    pub fn new(name: impl Into<String>, user_id: Id) -> Self {
        Self { name: name.into(), user_id }
    }

    pub(crate) fn into_player(self) -> Result<Player> {
        validate::required(Entity::Player, "name", &self.name, PLAYER_NAME_MAX)?;
        Ok(Player { id: Id::new(), name: self.name, user_id: self.user_id, created_at: now() })
    }
}

impl Player {
    pub(crate) fn find(conn: &mut SqliteConnection, id: Id) -> Result<Player> {
        players::table.find(id).first::<Player>(conn).found(Entity::Player, id)
    }
}

/// One player's seat and running score in one game.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = game_players)]
#[serde(rename_all = "camelCase")]
pub struct GamePlayer {
    pub id: Id,
    pub game_id: Id,
    pub player_id: Id,
    pub score: i32,
    pub joined_at: NaiveDateTime,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewGamePlayer {
    pub game_id: Id,
    pub player_id: Id,
    #[serde(default)]
    pub score: i32,
}

impl NewGamePlayer {
    pub fn new(game_id: Id, player_id: Id) -> Self {
        Self { game_id, player_id, score: 0 }
    }

    pub(crate) fn into_game_player(self) -> GamePlayer {
        GamePlayer {
            id: Id::new(),
            game_id: self.game_id,
            player_id: self.player_id,
            score: self.score,
            joined_at: now(),
        }
    }
}

impl GamePlayer {
    pub(crate) fn find(conn: &mut SqliteConnection, id: Id) -> Result<GamePlayer> {
        game_players::table.find(id).first::<GamePlayer>(conn).found(Entity::GamePlayer, id)
    }
}

/// Rows removed by a delete, per table
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CascadeReport {
    pub users: usize,
    pub games: usize,
    pub players: usize,
    pub game_players: usize,
}

/// Rows per table
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Counts {
    pub users: i64,
    pub games: i64,
    pub players: i64,
    pub game_players: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Invalid};

    #[test]
    fn new_game_defaults_to_in_progress() {
        let game = NewGame::new("Night1", Id::new()).into_game().unwrap();
        assert_eq!(game.status, GameStatus::InProgress);
        assert_eq!(game.completed_at, None);
    }

    #[test]
    fn new_game_player_starts_at_zero() {
        let body = format!(r#"{{"gameId":"{}","playerId":"{}"}}"#, Id::new(), Id::new());
        let new: NewGamePlayer = serde_json::from_str(&body).unwrap();
        assert_eq!(new.into_game_player().score, 0);
    }

    #[test]
    fn new_user_requires_email() {
        let err = NewUser::new("alice", " ").into_user().unwrap_err();
        assert!(matches!(
            err,
            Error::Validation { entity: Entity::User, field: "email", invalid: Invalid::Empty }
        ));
    }

    #[test]
    fn player_name_is_capped_at_100() {
        let err = NewPlayer::new("p".repeat(101), Id::new()).into_player().unwrap_err();
        assert!(matches!(err, Error::Validation { invalid: Invalid::TooLong { max: 100 }, .. }));
    }

    #[test]
    fn status_serializes_by_name() {
        assert_eq!(serde_json::to_string(&GameStatus::Cancelled).unwrap(), "\"Cancelled\"");
    }
}
