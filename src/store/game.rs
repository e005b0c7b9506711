use diesel::prelude::*;
use tracing::{debug, info, instrument};

use super::Store;
use crate::error::Result;
use crate::id::Id;
use crate::models::{CascadeReport, Game, NewGame, User};
use crate::paginate::{Page, Paginate};
use crate::patch::GamePatch;
use crate::schema::{game_players, games};

impl Store {
    /// The owning user must exist.
    #[instrument(skip(self, new), fields(user_id = %new.user_id), err)]
    pub fn create_game(&self, new: NewGame) -> Result<Game> {
        let game = new.into_game()?;
        self.write(|conn| {
            User::find(conn, game.user_id)?;
            diesel::insert_into(games::table).values(&game).execute(conn)?;
            Ok(())
        })?;
        info!(game_id = %game.id, "Created game");
        Ok(game)
    }

    #[instrument(skip(self), err)]
    pub fn game(&self, id: Id) -> Result<Game> {
        self.read(|conn| Game::find(conn, id))
    }

    /// Oldest first.
    #[instrument(skip(self), err)]
    pub fn games_of_user(&self, user_id: Id, page: i64) -> Result<Page<Game>> {
        self.check_page(page)?;
        let per_page = self.page_size();
        self.read(|conn| {
            User::find(conn, user_id)?;
            Ok(games::table
                .filter(games::user_id.eq(user_id))
                .order((games::created_at.asc(), games::id.asc()))
                .paginate(page)
                .per_page(per_page)
                .load_page::<Game>(conn)?)
        })
    }

    /// Status and `completed_at` are set as given, with no transition rules.
    #[instrument(skip(self, patch), err)]
    pub fn update_game(&self, id: Id, patch: GamePatch) -> Result<Game> {
        self.write(|conn| {
            let mut game = Game::find(conn, id)?;
            if patch.is_empty() {
                return Ok(game);
            }
            let owner = game.user_id;
            patch.apply(&mut game)?;
            if game.user_id != owner {
                User::find(conn, game.user_id)?;
            }
            diesel::update(games::table.find(id)).set(&game).execute(conn)?;
            debug!(game_id = %id, status = ?game.status, "Updated game");
            Ok(game)
        })
    }

    /// Removes the game and every seat in it.
    #[instrument(skip(self), err)]
    pub fn delete_game(&self, id: Id) -> Result<CascadeReport> {
        let report = self.write(|conn| {
            Game::find(conn, id)?;
            let removed_seats =
                diesel::delete(game_players::table.filter(game_players::game_id.eq(id)))
                    .execute(conn)?;
            let removed_games = diesel::delete(games::table.find(id)).execute(conn)?;
            Ok(CascadeReport { games: removed_games, game_players: removed_seats, ..Default::default() })
        })?;
        info!(game_id = %id, ?report, "Deleted game");
        Ok(report)
    }
}
