use diesel::prelude::*;
use tracing::{debug, info, instrument};

use super::Store;
use crate::error::Result;
use crate::id::Id;
use crate::models::{CascadeReport, NewPlayer, Player, User};
use crate::paginate::{Page, Paginate};
use crate::patch::PlayerPatch;
use crate::schema::{game_players, players};

impl Store {
    #[instrument(skip(self, new), fields(user_id = %new.user_id), err)]
    pub fn create_player(&self, new: NewPlayer) -> Result<Player> {
        let player = new.into_player()?;
        self.write(|conn| {
            User::find(conn, player.user_id)?;
            diesel::insert_into(players::table).values(&player).execute(conn)?;
            Ok(())
        })?;
        info!(player_id = %player.id, "Created player");
        Ok(player)
    }

    #[instrument(skip(self), err)]
    pub fn player(&self, id: Id) -> Result<Player> {
        self.read(|conn| Player::find(conn, id))
    }

    #[instrument(skip(self), err)]
    pub fn players_of_user(&self, user_id: Id, page: i64) -> Result<Page<Player>> {
        self.check_page(page)?;
        let per_page = self.page_size();
        self.read(|conn| {
            User::find(conn, user_id)?;
            Ok(players::table
                .filter(players::user_id.eq(user_id))
                .order((players::created_at.asc(), players::id.asc()))
                .paginate(page)
                .per_page(per_page)
                .load_page::<Player>(conn)?)
        })
    }

    #[instrument(skip(self, patch), err)]
    pub fn update_player(&self, id: Id, patch: PlayerPatch) -> Result<Player> {
        self.write(|conn| {
            let mut player = Player::find(conn, id)?;
            if patch.is_empty() {
                return Ok(player);
            }
            let owner = player.user_id;
            patch.apply(&mut player)?;
            if player.user_id != owner {
                User::find(conn, player.user_id)?;
            }
            diesel::update(players::table.find(id)).set(&player).execute(conn)?;
            debug!(player_id = %id, "Updated player");
            Ok(player)
        })
    }

    /// Removes the player and all of their seats.
    #[instrument(skip(self), err)]
    pub fn delete_player(&self, id: Id) -> Result<CascadeReport> {
        let report = self.write(|conn| {
            Player::find(conn, id)?;
            let removed_seats =
                diesel::delete(game_players::table.filter(game_players::player_id.eq(id)))
                    .execute(conn)?;
            let removed_players = diesel::delete(players::table.find(id)).execute(conn)?;
            Ok(CascadeReport {
                players: removed_players,
                game_players: removed_seats,
                ..Default::default()
            })
        })?;
        info!(player_id = %id, ?report, "Deleted player");
        Ok(report)
    }
}
