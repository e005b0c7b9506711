//! Game players: which player sits in which game, and their score there

use diesel::prelude::*;
use tracing::{debug, info, instrument};

use super::Store;
use crate::error::Result;
use crate::id::Id;
use crate::models::{CascadeReport, Game, GamePlayer, NewGamePlayer, Player};
use crate::patch::GamePlayerPatch;
use crate::schema::game_players;

impl Store {
    /// Seats a player in a game. A second seat for the same pair is a
    /// constraint violation.
    #[instrument(skip(self, new), fields(game_id = %new.game_id, player_id = %new.player_id), err)]
    pub fn join_game(&self, new: NewGamePlayer) -> Result<GamePlayer> {
        let seat = new.into_game_player();
        self.write(|conn| {
            Game::find(conn, seat.game_id)?;
            Player::find(conn, seat.player_id)?;
            diesel::insert_into(game_players::table).values(&seat).execute(conn)?;
            Ok(())
        })?;
        info!(game_player_id = %seat.id, "Player joined game");
        Ok(seat)
    }

    #[instrument(skip(self), err)]
    pub fn game_player(&self, id: Id) -> Result<GamePlayer> {
        self.read(|conn| GamePlayer::find(conn, id))
    }

    #[instrument(skip(self), err)]
    pub fn membership(&self, game_id: Id, player_id: Id) -> Result<Option<GamePlayer>> {
        self.read(|conn| {
            Ok(game_players::table
                .filter(game_players::game_id.eq(game_id))
                .filter(game_players::player_id.eq(player_id))
                .first::<GamePlayer>(conn)
                .optional()?)
        })
    }

    /// Seats of a game, in joining order.
    #[instrument(skip(self), err)]
    pub fn players_in_game(&self, game_id: Id) -> Result<Vec<GamePlayer>> {
        self.read(|conn| {
            Game::find(conn, game_id)?;
            Ok(game_players::table
                .filter(game_players::game_id.eq(game_id))
                .order((game_players::joined_at.asc(), game_players::id.asc()))
                .load::<GamePlayer>(conn)?)
        })
    }

    /// Seats of a player across games, in joining order.
    #[instrument(skip(self), err)]
    pub fn games_of_player(&self, player_id: Id) -> Result<Vec<GamePlayer>> {
        self.read(|conn| {
            Player::find(conn, player_id)?;
            Ok(game_players::table
                .filter(game_players::player_id.eq(player_id))
                .order((game_players::joined_at.asc(), game_players::id.asc()))
                .load::<GamePlayer>(conn)?)
        })
    }

    /// Scores are stored as given, negative included.
    #[instrument(skip(self, patch), err)]
    pub fn update_game_player(&self, id: Id, patch: GamePlayerPatch) -> Result<GamePlayer> {
        self.write(|conn| {
            let mut seat = GamePlayer::find(conn, id)?;
            if patch.is_empty() {
                return Ok(seat);
            }
            let (game_id, player_id) = (seat.game_id, seat.player_id);
            patch.apply(&mut seat)?;
            if seat.game_id != game_id {
                Game::find(conn, seat.game_id)?;
            }
            if seat.player_id != player_id {
                Player::find(conn, seat.player_id)?;
            }
            diesel::update(game_players::table.find(id)).set(&seat).execute(conn)?;
            debug!(game_player_id = %id, score = seat.score, "Updated game player");
            Ok(seat)
        })
    }

    #[instrument(skip(self), err)]
    pub fn delete_game_player(&self, id: Id) -> Result<CascadeReport> {
        let report = self.write(|conn| {
            GamePlayer::find(conn, id)?;
            let removed_seats = diesel::delete(game_players::table.find(id)).execute(conn)?;
            Ok(CascadeReport { game_players: removed_seats, ..Default::default() })
        })?;
        info!(game_player_id = %id, "Removed player from game");
        Ok(report)
    }
}
