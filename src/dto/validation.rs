//! Validation helpers for DTOs.

use std::collections::HashSet;

use validator::ValidationError;

use crate::dto::setup::{MatchConfigInput, MatchSetupInput};

/// Highest number of sets a match may be played over.
const MAX_SETS: u32 = 5;

/// Validates that a display name has at least one visible character.
///
/// # Examples
///
/// ```ignore
/// validate_display_name("Ana") // Ok
/// validate_display_name("   ") // Err - blank
/// ```
pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("display_name_blank");
        err.message = Some("Player name must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Validates that every team/position slot is taken exactly once and ids are unique.
pub fn validate_roster(input: &MatchSetupInput) -> Result<(), ValidationError> {
    let slots = input
        .players
        .iter()
        .map(|player| (player.team, player.position))
        .collect::<HashSet<_>>();
    if slots.len() != input.players.len() {
        let mut err = ValidationError::new("roster_slots");
        err.message = Some("Each team needs one drive and one reves player".into());
        return Err(err);
    }

    let ids = input
        .players
        .iter()
        .map(|player| player.id.as_str())
        .collect::<HashSet<_>>();
    if ids.len() != input.players.len() {
        let mut err = ValidationError::new("roster_ids");
        err.message = Some("Player ids must be unique".into());
        return Err(err);
    }

    Ok(())
}

/// Validates that a match is best of an odd number of sets, at most [`MAX_SETS`].
pub fn validate_number_of_sets(config: &MatchConfigInput) -> Result<(), ValidationError> {
    let sets = config.number_of_sets;
    if sets == 0 || sets > MAX_SETS || sets % 2 == 0 {
        let mut err = ValidationError::new("number_of_sets");
        err.message = Some(format!("Number of sets must be 1, 3 or 5 (got {sets})").into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_display_name() {
        assert!(validate_display_name("Ana").is_ok());
        assert!(validate_display_name(" Bea ").is_ok());
        assert!(validate_display_name("").is_err());
        assert!(validate_display_name(" \t").is_err());
    }
}
