//! Property tests for dice and whole games.

use proptest::prelude::*;

use dice_duel::core::{DieId, GameRng, PlayerId};
use dice_duel::dice::{Die, Sides, Skill};
use dice_duel::{ActionRequest, AttackType, Game, GameBuilder, Phase};

fn any_sides() -> impl Strategy<Value = Sides> {
    prop_oneof![
        (1u32..=99).prop_map(Sides::Single),
        (1u32..=30, 1u32..=30).prop_map(|(a, b)| Sides::Twin(a, b)),
    ]
}

fn any_skill() -> impl Strategy<Value = Skill> {
    (0..Skill::ALL.len()).prop_map(|i| Skill::ALL[i])
}

fn assert_faces_in_range(game: &Game) {
    for player in game.player_ids() {
        for die in game.active_dice(player) {
            let value = die.value().expect("dice in play are rolled");
            assert!(
                (die.min()..=die.max()).contains(&value),
                "{} shows {} outside {}..={}",
                die,
                value,
                die.min(),
                die.max()
            );
        }
    }
}

proptest! {
    /// A plain die always lands inside its range.
    #[test]
    fn roll_stays_in_range(sides in any_sides(), seed in any::<u64>(), rolls in 1usize..20) {
        let mut rng = GameRng::new(seed);
        let mut die = Die::new(DieId::new(0), PlayerId::new(0), sides);
        for _ in 0..rolls {
            die.roll(false, &mut rng);
            let value = die.value().unwrap();
            prop_assert!(value >= die.min() && value <= die.max());
        }
    }

    /// Konstant dice keep their first roll.
    #[test]
    fn konstant_value_is_locked(n in 1u32..=99, seed in any::<u64>()) {
        let mut rng = GameRng::new(seed);
        let mut die = Die::with_skills(DieId::new(0), PlayerId::new(0), Sides::Single(n), [Skill::Konstant]);
        die.roll(false, &mut rng);
        let first = die.value();
        for _ in 0..5 {
            die.roll(true, &mut rng);
            prop_assert_eq!(die.value(), first);
        }
    }

    /// Mighty dice never shrink and weak dice never grow, whatever size
    /// the recipe gave them.
    #[test]
    fn mighty_and_weak_move_one_way(n in 1u32..=99, seed in any::<u64>()) {
        let mut rng = GameRng::new(seed);
        let mut mighty = Die::with_skills(DieId::new(0), PlayerId::new(0), Sides::Single(n), [Skill::Mighty]);
        let mut weak = Die::with_skills(DieId::new(1), PlayerId::new(0), Sides::Single(n), [Skill::Weak]);
        mighty.roll(false, &mut rng);
        weak.roll(false, &mut rng);

        mighty.roll(true, &mut rng);
        weak.roll(true, &mut rng);
        prop_assert!(mighty.max() >= n as i32, "mighty d{} became {}", n, mighty.max());
        prop_assert!(weak.max() <= n as i32 && weak.max() >= 1);
        if n >= 30 {
            prop_assert_eq!(mighty.max(), n as i32);
        }
    }

    /// Splitting partitions the size, larger half first.
    #[test]
    fn split_partitions_size(n in 1u32..=99, value_seed in any::<u64>()) {
        let mut rng = GameRng::new(value_seed);
        let mut die = Die::new(DieId::new(0), PlayerId::new(0), Sides::Single(n));
        die.roll(false, &mut rng);

        let other = die.split(DieId::new(1));
        prop_assert!(die.max() >= other.max());
        if n > 1 {
            prop_assert_eq!(die.max() + other.max(), n as i32);
        } else {
            prop_assert_eq!((die.max(), other.max()), (1, 1));
        }
        for d in [&die, &other] {
            let v = d.value().unwrap();
            prop_assert!(v >= d.min() && v <= d.max());
        }
    }

    /// Adding then removing a skill leaves the others alone.
    #[test]
    fn skill_add_remove(existing in prop::collection::vec(any_skill(), 0..4), extra in any_skill()) {
        let mut die = Die::with_skills(DieId::new(0), PlayerId::new(0), Sides::Single(6), existing.clone());
        let had = die.has_skill(extra);

        prop_assert_eq!(die.add_skill(extra), !had);
        prop_assert!(die.has_skill(extra));
        prop_assert!(die.remove_skill(extra));
        prop_assert!(!die.has_skill(extra));
        prop_assert!(!die.remove_skill(extra));

        for skill in existing.into_iter().filter(|&s| s != extra) {
            prop_assert!(die.has_skill(skill));
        }
    }

    /// No sequence of actions creates or destroys dice within a round or
    /// leaves a die showing an impossible face.
    #[test]
    fn random_play_conserves_dice(
        seed in any::<u64>(),
        moves in prop::collection::vec((0usize..8, 0u32..32, 0u32..32), 1..60),
    ) {
        let mut game = GameBuilder::new()
            .button("Left", "z12 B10 s8 4 6 F8")
            .button("Right", "t6 k10 12 20 H4 h6")
            .seed(seed)
            .build()
            .unwrap();
        let total = game.total_dice();

        for (attack_idx, att_mask, def_mask) in moves {
            if game.is_over() {
                break;
            }
            let player = game.active_player();
            let request = match game.phase() {
                Phase::AwaitAction => {
                    let attack = AttackType::ALL[attack_idx];
                    let pick = |mask: u32, len: usize| -> Vec<i64> {
                        (0..len).filter(|i| mask & (1 << i) != 0).map(|i| i as i64).collect()
                    };
                    let opponent = player.next(2);
                    ActionRequest::new(player, "submitTurn")
                        .with("attackType", attack.name())
                        .with("attackerIdx", pick(att_mask, game.active_dice(player).len()))
                        .with("defenderIdx", pick(def_mask, game.active_dice(opponent).len()))
                }
                Phase::AdjustFire => ActionRequest::new(player, "adjustFire")
                    .with("action", "cancel")
                    .with("round", game.round())
                    .with("timestamp", game.timestamp()),
                other => panic!("unexpected waiting state {}", other),
            };

            let before = game.timestamp();
            let result = game.process(&request);
            prop_assert!(result.ok || game.timestamp() == before);
            prop_assert!(!result.message.contains("Internal error"), "{}", result.message);

            prop_assert_eq!(game.total_dice(), total);
            if !game.is_over() {
                assert_faces_in_range(&game);
            }
        }
    }
}
