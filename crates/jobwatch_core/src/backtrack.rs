use crate::{PhaseCode, CREATED_RANK};

/// Rank of the furthest phase a failed job reached, taken from the most
/// recent intermediate event in its history. `CREATED_RANK` when no such
/// event was ever recorded.
pub fn last_completed_rank<S: AsRef<str>>(history: &[S]) -> u32 {
    history
        .iter()
        .rev()
        .filter_map(|code| PhaseCode::from_code(code.as_ref()))
        .filter(|phase| !phase.is_terminal())
        .find_map(PhaseCode::rank)
        .unwrap_or(CREATED_RANK)
}
