//! Who goes first.
//!
//! Each player's dice are reduced to a key: the smallest initiative value
//! of every die that counts, sorted ascending. The lowest key wins,
//! compared lexicographically. A player with no counting dice never wins
//! unless nobody has any. Full ties are broken by the game RNG.

use crate::core::{GameRng, PlayerId, PlayerMap};
use crate::dice::{Die, Skill};

/// Initiative key of one player's dice.
#[must_use]
pub fn initiative_key(dice: &[Die]) -> Vec<i32> {
    let mut key: Vec<i32> = dice
        .iter()
        .filter_map(|d| d.initiative_values().iter().copied().min())
        .collect();
    key.sort_unstable();
    key
}

/// Whether key `a` strictly beats key `b`.
#[must_use]
pub fn beats(a: &[i32], b: &[i32]) -> bool {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => false,
        (false, true) => true,
        (false, false) => a < b,
    }
}

/// Pick the initiative winner among `players`.
pub fn determine_winner(keys: &PlayerMap<Vec<i32>>, rng: &mut GameRng) -> PlayerId {
    let best: Vec<PlayerId> = keys
        .iter()
        .filter(|(_, key)| !keys.values().any(|other| beats(other, key)))
        .map(|(p, _)| p)
        .collect();

    match best.len() {
        0 => PlayerId::new(0),
        1 => best[0],
        n => rng.choose_index(n).map_or(best[0], |i| best[i]),
    }
}

/// Whether `player` has anything to do in the initiative reaction window.
#[must_use]
pub fn can_react(dice: &[Die], chance_used: bool) -> bool {
    dice.iter().any(|d| {
        let focus = d.has_skill(Skill::Focus) && d.value().is_some_and(|v| v > d.min());
        let chance = !chance_used && d.has_skill(Skill::Chance);
        focus || chance
    })
}
