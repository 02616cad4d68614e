use rand::Rng;

use crate::events::EventType;

/// Contest season token.
pub const SEASON_TOKEN: &str = "S1";
/// Static year token.
pub const YEAR_TOKEN: &str = "25";

/// `S1` + event letter + `25` + a zero-padded number in 001..=999,
/// e.g. `S1D25042`. Collisions are not checked.
pub fn generate_participant_id<R: Rng + ?Sized>(event_type: EventType, rng: &mut R) -> String {
    let number: u32 = rng.gen_range(1..=999);
    format!("{SEASON_TOKEN}{}{YEAR_TOKEN}{number:03}", event_type.code())
}
