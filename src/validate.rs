//! Field rules shared by creation and patches

use crate::error::{Entity, Error, Invalid, Result};

pub const USER_NAME_MAX: usize = 200;
pub const EMAIL_MAX: usize = 200;
pub const GAME_NAME_MAX: usize = 200;
pub const PLAYER_NAME_MAX: usize = 100;

/// A required text field: not blank, at most `max` characters.
pub(crate) fn required(entity: Entity, field: &'static str, value: &str, max: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation { entity, field, invalid: Invalid::Empty });
    }
    if value.chars().count() > max {
        return Err(Error::Validation { entity, field, invalid: Invalid::TooLong { max } });
    }
    Ok(())
}

/// Creation-time fields may be echoed back in a patch but never changed.
pub(crate) fn unchanged<T: PartialEq>(
    entity: Entity,
    field: &'static str,
    supplied: Option<T>,
    current: &T,
) -> Result<()> {
    match supplied {
        Some(value) if value != *current => Err(Error::ImmutableFieldViolation { entity, field }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_is_empty() {
        for value in ["", "   ", "\t\n"] {
            let err = required(Entity::User, "userName", value, USER_NAME_MAX).unwrap_err();
            assert!(matches!(err, Error::Validation { field: "userName", invalid: Invalid::Empty, .. }));
        }
    }

    #[test]
    fn length_counts_characters() {
        let accented = "é".repeat(PLAYER_NAME_MAX);
        assert!(accented.len() > PLAYER_NAME_MAX);
        assert!(required(Entity::Player, "name", &accented, PLAYER_NAME_MAX).is_ok());

        let long = "x".repeat(PLAYER_NAME_MAX + 1);
        let err = required(Entity::Player, "name", &long, PLAYER_NAME_MAX).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation { entity: Entity::Player, invalid: Invalid::TooLong { max: PLAYER_NAME_MAX }, .. }
        ));
    }

    #[test]
    fn echoed_value_is_not_a_change() {
        assert!(unchanged(Entity::Game, "createdAt", Some(3), &3).is_ok());
        assert!(unchanged::<i32>(Entity::Game, "createdAt", None, &3).is_ok());
        let err = unchanged(Entity::Game, "createdAt", Some(4), &3).unwrap_err();
        assert!(matches!(err, Error::ImmutableFieldViolation { entity: Entity::Game, field: "createdAt" }));
    }
}
