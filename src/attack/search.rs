//! Does any legal attack of a given type exist?
//!
//! Multi-die attacks are found by enumerating subsets of the eligible
//! dice. The enumeration is capped at `max_search_dice` dice per side; a
//! larger pool falls back to a subset-sum check that may report an attack
//! the full rules would reject, but never misses one.

use std::collections::BTreeSet;

use smallvec::SmallVec;

use super::{AttackType, Selection};
use crate::core::PlayerId;
use crate::dice::{Die, DieValues, Skill};
use crate::game::Game;

/// Index subset of a die pool.
pub type Subset = SmallVec<[usize; 8]>;

/// Every non-empty subset of the first `limit` entries of `pool`.
pub fn subsets(pool: &[usize], limit: usize) -> impl Iterator<Item = Subset> + '_ {
    let n = pool.len().min(limit).min(usize::BITS as usize - 1);
    (1usize..(1 << n)).map(move |mask| {
        (0..n)
            .filter(|bit| mask & (1 << bit) != 0)
            .map(|bit| pool[bit])
            .collect()
    })
}

/// Every sum reachable by picking one value from each of a non-empty
/// subset of `sets`.
pub fn subset_sums(sets: impl IntoIterator<Item = DieValues>) -> BTreeSet<i32> {
    let mut sums = BTreeSet::new();
    for set in sets {
        let extended: Vec<i32> = sums
            .iter()
            .flat_map(|s| set.iter().map(move |v| s + v))
            .chain(set.iter().copied())
            .collect();
        sums.extend(extended);
    }
    sums
}

fn eligible_attackers(dice: &[Die]) -> Vec<usize> {
    dice.iter()
        .enumerate()
        .filter(|(_, d)| d.valid_attack() && !d.dizzy)
        .map(|(i, _)| i)
        .collect()
}

fn eligible_targets(dice: &[Die]) -> Vec<usize> {
    dice.iter()
        .enumerate()
        .filter(|(_, d)| d.valid_target())
        .map(|(i, _)| i)
        .collect()
}

impl AttackType {
    /// Whether the player to move has at least one legal attack of this
    /// type. With `include_optional` false, skill attacks involving warrior
    /// dice are ignored.
    #[must_use]
    pub fn find_attack(self, game: &Game, include_optional: bool) -> bool {
        if !self.captures() {
            return true;
        }
        let player = game.active_player();
        let own = game.active_dice(player);
        let attackers = eligible_attackers(own);
        if attackers.is_empty() {
            return false;
        }
        let limit = game.config().max_search_dice;

        let opponents: Vec<PlayerId> = game.opponents_with_dice(player).collect();
        opponents.into_iter().any(|opponent| {
            let theirs = game.active_dice(opponent);
            let targets = eligible_targets(theirs);
            self.search(own, &attackers, theirs, &targets, limit, include_optional)
        })
    }

    fn search(
        self,
        own: &[Die],
        attackers: &[usize],
        theirs: &[Die],
        targets: &[usize],
        limit: usize,
        include_optional: bool,
    ) -> bool {
        let valid = |att: &[usize], def: &[usize]| {
            Selection::from_indices(own, att, theirs, def)
                .is_ok_and(|selection| self.validate_attack(&selection).is_ok())
        };

        match self {
            AttackType::Power | AttackType::Shadow | AttackType::Trip => attackers
                .iter()
                .any(|&a| targets.iter().any(|&t| valid(&[a], &[t]))),
            AttackType::Skill => {
                let pool: Vec<usize> = attackers
                    .iter()
                    .copied()
                    .filter(|&i| include_optional || !own[i].has_skill(Skill::Warrior))
                    .collect();
                if subsets(&pool, limit).any(|att| targets.iter().any(|&t| valid(&att, &[t]))) {
                    return true;
                }
                pool.len() > limit && self.skill_sum_reachable(own, &pool, theirs, targets)
            }
            AttackType::Speed | AttackType::Berserk => {
                if attackers
                    .iter()
                    .any(|&a| subsets(targets, limit).any(|def| valid(&[a], &def)))
                {
                    return true;
                }
                targets.len() > limit && self.target_sum_reachable(own, attackers, theirs, targets)
            }
            AttackType::Pass | AttackType::Surrender => true,
        }
    }

    /// Whether some subset of `pool` could sum to a target's value. Fire
    /// dice count as able to close any gap.
    fn skill_sum_reachable(self, own: &[Die], pool: &[usize], theirs: &[Die], targets: &[usize]) -> bool {
        if own.iter().any(|d| d.has_skill(Skill::Fire)) {
            return true;
        }
        let sums = subset_sums(pool.iter().map(|&i| own[i].attack_values(self)));
        targets
            .iter()
            .map(|&t| &theirs[t])
            .filter(|d| !d.has_skill(Skill::Warrior))
            .any(|d| d.defense_values(self).iter().any(|v| sums.contains(v)))
    }

    /// Whether some subset of `targets` could sum to a qualified attacker's
    /// value.
    fn target_sum_reachable(self, own: &[Die], attackers: &[usize], theirs: &[Die], targets: &[usize]) -> bool {
        let required = if self == AttackType::Speed { Skill::Speed } else { Skill::Berserk };
        let sums = subset_sums(
            targets
                .iter()
                .map(|&t| &theirs[t])
                .filter(|d| !d.has_skill(Skill::Warrior) && !d.has_skill(Skill::Stealth))
                .map(|d| d.defense_values(self)),
        );
        attackers
            .iter()
            .map(|&a| &own[a])
            .filter(|d| d.has_skill(required) && !d.has_skill(Skill::Warrior) && !d.has_skill(Skill::Stealth))
            .any(|d| d.attack_values(self).iter().any(|v| sums.contains(v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsets() {
        let all: Vec<Subset> = subsets(&[4, 7, 9], 8).collect();
        assert_eq!(all.len(), 7);
        assert!(all.iter().any(|s| s.as_slice() == [4, 9]));
        assert!(all.iter().any(|s| s.as_slice() == [4, 7, 9]));
    }

    #[test]
    fn test_subset_limit() {
        assert_eq!(subsets(&[0, 1, 2, 3, 4], 2).count(), 3);
        assert_eq!(subsets(&[], 8).count(), 0);
    }

    #[test]
    fn test_subset_sums() {
        let sets: Vec<DieValues> = vec![DieValues::from_slice(&[2]), DieValues::from_slice(&[3, 5])];
        let sums: Vec<i32> = subset_sums(sets).into_iter().collect();
        assert_eq!(sums, vec![2, 3, 5, 7]);
        assert!(subset_sums(Vec::<DieValues>::new()).is_empty());
    }
}
