//! Round scores, in tenths of a point.
//!
//! A player scores the full size of every die they captured and half the
//! size of every die they still hold.

use crate::core::{PlayerId, PlayerMap};
use crate::dice::Die;

/// Score of one player's dice.
#[must_use]
pub fn score_times_ten(active: &[Die], captured: &[Die]) -> i32 {
    active
        .iter()
        .chain(captured)
        .map(Die::score_value_times_ten)
        .sum()
}

/// Winner of a round: the unique highest score among players who did not
/// surrender.
#[must_use]
pub fn round_winner(scores: &PlayerMap<i32>, surrendered: Option<PlayerId>) -> Option<PlayerId> {
    let contenders: Vec<(PlayerId, i32)> = scores
        .iter()
        .filter(|(p, _)| Some(*p) != surrendered)
        .map(|(p, s)| (p, *s))
        .collect();
    let best = contenders.iter().map(|(_, s)| *s).max()?;
    let mut top = contenders.iter().filter(|(_, s)| *s == best);
    match (top.next(), top.next()) {
        (Some((p, _)), None) => Some(*p),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DieId;
    use crate::dice::Sides;

    fn die(sides: u32, captured: bool) -> Die {
        let mut d = Die::new(DieId::new(0), PlayerId::new(0), Sides::Single(sides));
        d.captured = captured;
        d
    }

    #[test]
    fn test_score() {
        let active = [die(6, false), die(10, false)];
        let captured = [die(4, true)];
        assert_eq!(score_times_ten(&active, &captured), 30 + 50 + 40);
    }

    #[test]
    fn test_round_winner() {
        let scores = PlayerMap::from_vec(vec![90, 30]).unwrap();
        assert_eq!(round_winner(&scores, None), Some(PlayerId::new(0)));
        assert_eq!(round_winner(&scores, Some(PlayerId::new(0))), Some(PlayerId::new(1)));

        let tied = PlayerMap::from_vec(vec![40, 40]).unwrap();
        assert_eq!(round_winner(&tied, None), None);
    }
}
