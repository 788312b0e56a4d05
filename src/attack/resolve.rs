use crate::core::{DieId, PlayerId};
use crate::error::EngineError;
use crate::game::Game;

use super::{AttackPlan, AttackType};

/// What an executed attack did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaptureOutcome {
    pub success: bool,
    pub captured: Vec<DieId>,
}

impl AttackType {
    /// Carry out a validated attack.
    ///
    /// Defenders are marked captured and moved to the attacking player's
    /// captured dice. Attackers then run their capture hooks, reroll, and
    /// are marked as having attacked. A trip attack rerolls both dice first
    /// and only captures if the attacker comes out at least as high.
    pub fn resolve_capture(self, game: &mut Game, plan: &AttackPlan) -> Result<CaptureOutcome, EngineError> {
        if !self.captures() {
            return Ok(CaptureOutcome::default());
        }
        if self == AttackType::Trip {
            return resolve_trip(game, plan);
        }

        let captured = take_defenders(game, plan)?;
        for &id in &plan.attackers {
            let idx = index_of(game, plan.attacker_player, id)?;
            let (dice, rng) = game.dice_and_rng(plan.attacker_player);
            let die = &mut dice[idx];
            die.capture(self, &plan.attackers, &plan.defenders);
            die.roll(true, rng);
            die.has_attacked = true;
        }

        Ok(CaptureOutcome {
            success: true,
            captured,
        })
    }
}

fn resolve_trip(game: &mut Game, plan: &AttackPlan) -> Result<CaptureOutcome, EngineError> {
    let (&att_id, &def_id) = match (plan.attackers.as_slice(), plan.defenders.as_slice()) {
        ([a], [d]) => (a, d),
        _ => return Err(EngineError::internal("trip attack must be one die against one")),
    };

    let att_idx = index_of(game, plan.attacker_player, att_id)?;
    let (dice, rng) = game.dice_and_rng(plan.attacker_player);
    dice[att_idx].roll(true, rng);
    dice[att_idx].has_attacked = true;
    let att_value = dice[att_idx].value();

    let def_idx = index_of(game, plan.defender_player, def_id)?;
    let (dice, rng) = game.dice_and_rng(plan.defender_player);
    dice[def_idx].roll(true, rng);
    let def_value = dice[def_idx].value();

    if att_value < def_value {
        return Ok(CaptureOutcome::default());
    }

    let captured = take_defenders(game, plan)?;
    let (dice, _) = game.dice_and_rng(plan.attacker_player);
    dice[att_idx].capture(AttackType::Trip, &plan.attackers, &plan.defenders);
    Ok(CaptureOutcome {
        success: true,
        captured,
    })
}

fn index_of(game: &Game, player: PlayerId, id: DieId) -> Result<usize, EngineError> {
    game.die_index(player, id)
        .ok_or_else(|| EngineError::internal(format!("{} is not among {}'s active dice", id, player)))
}

/// Move every defender into the attacking player's captured dice.
fn take_defenders(game: &mut Game, plan: &AttackPlan) -> Result<Vec<DieId>, EngineError> {
    let mut captured = Vec::with_capacity(plan.defenders.len());
    for &id in &plan.defenders {
        let idx = index_of(game, plan.defender_player, id)?;
        let mut die = game.active[plan.defender_player].remove(idx);
        die.be_captured(plan.attack, &plan.attackers, &plan.defenders);
        die.owner = plan.attacker_player;
        game.captured[plan.attacker_player].push(die);
        captured.push(id);
    }
    Ok(captured)
}
