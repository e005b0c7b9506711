/*!
 * Partial updates
 *
 * Every column is optional so a caller can deserialize a partial body as-is.
 * Creation-time fields are accepted only when they repeat the stored value.
 */

use chrono::NaiveDateTime;
use serde_derive::Deserialize;

use crate::error::{Entity, Result};
use crate::id::Id;
use crate::models::{Game, GamePlayer, GameStatus, Player, User};
use crate::validate::{self, EMAIL_MAX, GAME_NAME_MAX, PLAYER_NAME_MAX, USER_NAME_MAX};

/// Keeps `"field": null` apart from an absent field.
fn explicit_null<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    <Option<T> as serde::Deserialize>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserPatch {
    pub id: Option<Id>,
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.user_name.is_none()
            && self.email.is_none()
            && self.created_at.is_none()
    }

    pub(crate) fn apply(self, user: &mut User) -> Result<()> {
        validate::unchanged(Entity::User, "id", self.id, &user.id)?;
        validate::unchanged(Entity::User, "createdAt", self.created_at, &user.created_at)?;
        if let Some(user_name) = self.user_name {
            validate::required(Entity::User, "userName", &user_name, USER_NAME_MAX)?;
            user.user_name = user_name;
        }
        if let Some(email) = self.email {
            validate::required(Entity::User, "email", &email, EMAIL_MAX)?;
            user.email = email;
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GamePatch {
    pub id: Option<Id>,
    pub name: Option<String>,
    pub user_id: Option<Id>,
    pub status: Option<GameStatus>,
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub completed_at: Option<Option<NaiveDateTime>>,
}

impl GamePatch {
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.name.is_none()
            && self.user_id.is_none()
            && self.status.is_none()
            && self.created_at.is_none()
            && self.completed_at.is_none()
    }

    pub(crate) fn apply(self, game: &mut Game) -> Result<()> {
        validate::unchanged(Entity::Game, "id", self.id, &game.id)?;
        validate::unchanged(Entity::Game, "createdAt", self.created_at, &game.created_at)?;
        if let Some(name) = self.name {
            validate::required(Entity::Game, "name", &name, GAME_NAME_MAX)?;
            game.name = name;
        }
        if let Some(user_id) = self.user_id {
            game.user_id = user_id;
        }
        if let Some(status) = self.status {
            game.status = status;
        }
        if let Some(completed_at) = self.completed_at {
            game.completed_at = completed_at;
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PlayerPatch {
    pub id: Option<Id>,
    pub name: Option<String>,
    pub user_id: Option<Id>,
    pub created_at: Option<NaiveDateTime>,
}

impl PlayerPatch {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none() && self.user_id.is_none() && self.created_at.is_none()
    }

    pub(crate) fn apply(self, player: &mut Player) -> Result<()> {
        validate::unchanged(Entity::Player, "id", self.id, &player.id)?;
        validate::unchanged(Entity::Player, "createdAt", self.created_at, &player.created_at)?;
        if let Some(name) = self.name {
            validate::required(Entity::Player, "name", &name, PLAYER_NAME_MAX)?;
            player.name = name;
        }
        if let Some(user_id) = self.user_id {
            player.user_id = user_id;
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GamePlayerPatch {
    pub id: Option<Id>,
    pub game_id: Option<Id>,
    pub player_id: Option<Id>,
    pub score: Option<i32>,
    pub joined_at: Option<NaiveDateTime>,
}

impl GamePlayerPatch {
    pub fn score(score: i32) -> Self {
        Self { score: Some(score), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.game_id.is_none()
            && self.player_id.is_none()
            && self.score.is_none()
            && self.joined_at.is_none()
    }

    pub(crate) fn apply(self, seat: &mut GamePlayer) -> Result<()> {
        validate::unchanged(Entity::GamePlayer, "id", self.id, &seat.id)?;
        validate::unchanged(Entity::GamePlayer, "joinedAt", self.joined_at, &seat.joined_at)?;
        if let Some(game_id) = self.game_id {
            seat.game_id = game_id;
        }
        if let Some(player_id) = self.player_id {
            seat.player_id = player_id;
        }
        if let Some(score) = self.score {
            seat.score = score;
        }
        Ok(())
    }
}
