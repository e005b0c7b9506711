use diesel::prelude::*;
use tracing::{debug, info, instrument};

use super::Store;
use crate::error::Result;
use crate::id::Id;
use crate::models::{CascadeReport, NewUser, User};
use crate::paginate::{Page, Paginate};
use crate::patch::UserPatch;
use crate::schema::{game_players, games, players, users};

impl Store {
    /// Fails with a constraint violation when the email or user name is taken.
    #[instrument(skip(self, new), fields(user_name = %new.user_name), err)]
    pub fn create_user(&self, new: NewUser) -> Result<User> {
        let user = new.into_user()?;
        self.write(|conn| {
            diesel::insert_into(users::table).values(&user).execute(conn)?;
            Ok(())
        })?;
        info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    #[instrument(skip(self), err)]
    pub fn user(&self, id: Id) -> Result<User> {
        self.read(|conn| User::find(conn, id))
    }

    /// Case-insensitive, like the unique index behind it.
    #[instrument(skip(self), err)]
    pub fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.read(|conn| {
            Ok(users::table.filter(users::email.eq(email)).first::<User>(conn).optional()?)
        })
    }

    #[instrument(skip(self), err)]
    pub fn user_by_user_name(&self, user_name: &str) -> Result<Option<User>> {
        self.read(|conn| {
            Ok(users::table
                .filter(users::user_name.eq(user_name))
                .first::<User>(conn)
                .optional()?)
        })
    }

    /// Oldest first.
    #[instrument(skip(self), err)]
    pub fn users(&self, page: i64) -> Result<Page<User>> {
        self.check_page(page)?;
        let per_page = self.page_size();
        self.read(|conn| {
            Ok(users::table
                .order((users::created_at.asc(), users::id.asc()))
                .paginate(page)
                .per_page(per_page)
                .load_page::<User>(conn)?)
        })
    }

    #[instrument(skip(self, patch), err)]
    pub fn update_user(&self, id: Id, patch: UserPatch) -> Result<User> {
        self.write(|conn| {
            let mut user = User::find(conn, id)?;
            if patch.is_empty() {
                return Ok(user);
            }
            patch.apply(&mut user)?;
            diesel::update(users::table.find(id)).set(&user).execute(conn)?;
            debug!(user_id = %id, "Updated user");
            Ok(user)
        })
    }

    /// Removes the user, their games and players, and every seat in those.
    #[instrument(skip(self), err)]
    pub fn delete_user(&self, id: Id) -> Result<CascadeReport> {
        let report = self.write(|conn| {
            User::find(conn, id)?;

            let owned_games = games::table.filter(games::user_id.eq(id)).select(games::id);
            let owned_players = players::table.filter(players::user_id.eq(id)).select(players::id);

            let removed_seats = diesel::delete(
                game_players::table.filter(
                    game_players::game_id
                        .eq_any(owned_games)
                        .or(game_players::player_id.eq_any(owned_players)),
                ),
            )
            .execute(conn)?;
            let removed_games =
                diesel::delete(games::table.filter(games::user_id.eq(id))).execute(conn)?;
            let removed_players =
                diesel::delete(players::table.filter(players::user_id.eq(id))).execute(conn)?;
            let removed_users = diesel::delete(users::table.find(id)).execute(conn)?;

            Ok(CascadeReport {
                users: removed_users,
                games: removed_games,
                players: removed_players,
                game_players: removed_seats,
            })
        })?;
        info!(user_id = %id, ?report, "Deleted user");
        Ok(report)
    }
}
