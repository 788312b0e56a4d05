//! Player actions and the engine boundary.
//!
//! [`Game::process`] is the only entry point the outer API layer needs. It
//! parses the request, applies it to a copy of the game, and swaps the copy
//! in only when every step succeeded. Rule violations come back as
//! declined results; anything unexpected is logged and reported as a
//! generic internal failure.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, error, info};

use super::initiative::{beats, initiative_key};
use super::log::LogEntry;
use super::phase::Phase;
use super::state::{Game, PendingAttack};
use crate::attack::{AttackError, AttackPlan, AttackType, Selection, Verdict};
use crate::attack::rules::fire_fits;
use crate::core::{
    Action, ActionData, ActionRequest, ActionResult, DieId, Fence, FireAdjustment, InitiativeReaction, PlayerId,
    PlayerMap,
};
use crate::dice::{Die, Skill};
use crate::error::EngineError;

impl Game {
    /// Handle one request from the outer API layer.
    pub fn process(&mut self, request: &ActionRequest) -> ActionResult {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.apply(request)))
            .unwrap_or_else(|_| Err(EngineError::internal("panic while applying action")));

        match outcome {
            Ok(data) => ActionResult::success(data, format!("{} accepted.", request.action)),
            Err(err) if err.kind().is_internal() => {
                error!(game = %self.id, action = %request.action, player = %request.player, error = %err, "internal fault");
                ActionResult::failure("Internal error")
            }
            Err(err) => {
                debug!(game = %self.id, action = %request.action, player = %request.player, kind = err.kind().as_str(), reason = %err, "action declined");
                ActionResult::failure(err.to_string())
            }
        }
    }

    /// Parse and apply a request. On error the game is left untouched.
    pub fn apply(&mut self, request: &ActionRequest) -> Result<ActionData, EngineError> {
        let (action, fence) = Action::from_request(request)?;
        let mut next = self.clone();
        let captured = next.apply_action(request.player, action, fence)?;
        *self = next;
        Ok(ActionData {
            phase: self.phase,
            round: self.round,
            timestamp: self.timestamp,
            captured,
        })
    }

    /// Apply a typed action in place. Callers that need all-or-nothing
    /// behaviour go through [`Game::apply`].
    pub(crate) fn apply_action(
        &mut self,
        player: PlayerId,
        action: Action,
        fence: Fence,
    ) -> Result<Vec<DieId>, EngineError> {
        self.check_fence(fence)?;
        if player.index() >= self.player_count() {
            return Err(EngineError::malformed(format!("{} is not seated in this game.", player)));
        }
        self.check_turn(player, &action)?;

        let captured = match action {
            Action::SubmitTurn {
                attack,
                attackers,
                defenders,
                defender_player,
            } => self.submit_turn(player, attack, &attackers, &defenders, defender_player)?,
            Action::ReactToInitiative(reaction) => {
                self.react_to_initiative(player, reaction)?;
                Vec::new()
            }
            Action::AdjustFire(adjustment) => self.adjust_fire(player, adjustment)?,
            Action::ReactToAuxiliary { add } => {
                self.react_to_auxiliary(player, add)?;
                Vec::new()
            }
            Action::ReactToReserve { add } => {
                self.react_to_reserve(player, add)?;
                Vec::new()
            }
        };

        self.timestamp += 1;
        self.advance()?;
        Ok(captured)
    }

    fn check_fence(&self, fence: Fence) -> Result<(), EngineError> {
        if let Some(submitted) = fence.timestamp {
            if submitted != self.timestamp {
                return Err(EngineError::Conflict {
                    expected: self.timestamp,
                    submitted,
                });
            }
        }
        if let Some(submitted) = fence.round {
            if submitted != self.round {
                return Err(EngineError::StaleRound {
                    expected: self.round,
                    submitted,
                });
            }
        }
        Ok(())
    }

    fn check_turn(&self, player: PlayerId, action: &Action) -> Result<(), EngineError> {
        let (phase, allowed) = match action {
            Action::SubmitTurn { .. } => (Phase::AwaitAction, player == self.active_player),
            Action::AdjustFire(_) => (Phase::AdjustFire, player == self.active_player),
            Action::ReactToInitiative(_) => (Phase::ReactToInitiative, self.reactor == Some(player)),
            Action::ReactToReserve { .. } => (Phase::ReactToReserve, self.reactor == Some(player)),
            Action::ReactToAuxiliary { .. } => (Phase::ReactToAuxiliary, !self.responded[player]),
        };
        if self.phase != phase {
            return Err(EngineError::IllegalState {
                action: action.verb(),
                phase: self.phase,
            });
        }
        if !allowed {
            return Err(EngineError::validation("It is not your turn to act."));
        }
        Ok(())
    }

    // === submitTurn ===

    fn submit_turn(
        &mut self,
        player: PlayerId,
        attack: AttackType,
        attackers: &[usize],
        defenders: &[usize],
        defender_player: Option<PlayerId>,
    ) -> Result<Vec<DieId>, EngineError> {
        let target = self.target_player(player, attack, defender_player)?;

        let (verdict, plan) = {
            let selection = Selection::from_indices(&self.active[player], attackers, &self.active[target], defenders)?;
            let verdict = attack.validate_attack(&selection)?;
            let plan = AttackPlan {
                attack,
                attacker_player: player,
                attackers: selection.attacker_ids(),
                defender_player: target,
                defenders: selection.defender_ids(),
            };
            (verdict, plan)
        };

        match attack {
            AttackType::Pass => {
                if self.any_attack_possible(false) {
                    return Err(EngineError::validation("You must attack if possible."));
                }
                self.consecutive_passes += 1;
                self.record(Some(player), LogEntry::Pass);
                self.enter(Phase::Attack);
                Ok(Vec::new())
            }
            AttackType::Surrender => {
                self.surrendered = Some(player);
                self.record(Some(player), LogEntry::Surrender);
                info!(game = %self.id, player = %player, "surrendered");
                self.enter(Phase::Attack);
                Ok(Vec::new())
            }
            _ => match verdict {
                Verdict::Valid => self.execute(player, &plan),
                Verdict::NeedsFire { shortfall } => {
                    debug!(game = %self.id, attack = %attack, shortfall, "waiting for fire dice");
                    self.pending = Some(PendingAttack { plan, shortfall });
                    self.enter(Phase::AdjustFire);
                    Ok(Vec::new())
                }
            },
        }
    }

    /// Resolve a validated attack and log it.
    fn execute(&mut self, player: PlayerId, plan: &AttackPlan) -> Result<Vec<DieId>, EngineError> {
        let outcome = plan.attack.resolve_capture(self, plan)?;
        self.consecutive_passes = 0;
        info!(
            game = %self.id,
            attack = %plan.attack,
            attacker = %player,
            defender = %plan.defender_player,
            success = outcome.success,
            captured = outcome.captured.len(),
            "attack resolved"
        );
        self.record(
            Some(player),
            LogEntry::Attack {
                attack: plan.attack,
                attackers: plan.attackers.clone(),
                defenders: plan.defenders.clone(),
                defender_player: plan.defender_player,
                success: outcome.success,
            },
        );
        self.enter(Phase::Attack);
        Ok(outcome.captured)
    }

    fn target_player(
        &self,
        player: PlayerId,
        attack: AttackType,
        requested: Option<PlayerId>,
    ) -> Result<PlayerId, EngineError> {
        match requested {
            Some(target) if target.index() >= self.player_count() => Err(EngineError::malformed(format!(
                "{} is not seated in this game.",
                target
            ))),
            Some(target) if target == player => Err(EngineError::validation("You cannot attack your own dice.")),
            Some(target) => Ok(target),
            None if !attack.captures() => Ok(player.next(self.player_count())),
            None => {
                let mut opponents = self.opponents_with_dice(player);
                match (opponents.next(), opponents.next()) {
                    (Some(target), None) => Ok(target),
                    _ => Err(EngineError::malformed("Parameter 'defenderPlayer' is required here.")),
                }
            }
        }
    }

    /// Whether the player to move has any capturing attack.
    #[must_use]
    pub fn any_attack_possible(&self, include_optional: bool) -> bool {
        AttackType::CAPTURING
            .into_iter()
            .any(|attack| attack.find_attack(self, include_optional))
    }

    // === adjustFire ===

    fn adjust_fire(&mut self, player: PlayerId, adjustment: FireAdjustment) -> Result<Vec<DieId>, EngineError> {
        let pending = self
            .pending
            .take()
            .ok_or_else(|| EngineError::internal("ADJUST_FIRE without a pending attack"))?;

        match adjustment {
            FireAdjustment::Cancel => {
                self.record(Some(player), LogEntry::FireCancelled);
                self.enter(Phase::AwaitAction);
                Ok(Vec::new())
            }
            FireAdjustment::Turndown { dice, values } => {
                let plan = pending.plan;
                let mut total = 0;
                let mut ids = Vec::with_capacity(dice.len());
                for (i, (&idx, &value)) in dice.iter().zip(&values).enumerate() {
                    if dice[..i].contains(&idx) {
                        return Err(EngineError::malformed(format!("Die index {} is repeated.", idx)));
                    }
                    let die = self.active[player]
                        .get(idx)
                        .ok_or_else(|| EngineError::malformed(format!("Die index {} is out of range.", idx)))?;
                    if !die.has_skill(Skill::Fire) || plan.attackers.contains(&die.id) {
                        return Err(AttackError::NotFireDie.into());
                    }
                    let current = die.value().unwrap_or(die.min());
                    if value >= current || value < die.min() {
                        return Err(AttackError::BadTurndown.into());
                    }
                    total += current - value;
                    ids.push(die.id);
                }

                if !self.fire_total_fits(&plan, total)? {
                    return Err(AttackError::FireMismatch.into());
                }

                for (&idx, &value) in dice.iter().zip(&values) {
                    self.active[player][idx].set_value(value)?;
                }
                self.record(Some(player), LogEntry::FireAdjusted { dice: ids, values });
                self.execute(player, &plan)
            }
        }
    }

    /// Whether turning fire dice down by `total` makes the planned attack
    /// succeed.
    fn fire_total_fits(&self, plan: &AttackPlan, total: i32) -> Result<bool, EngineError> {
        let lookup = |player: PlayerId, ids: &[DieId]| -> Result<Vec<&Die>, EngineError> {
            ids.iter()
                .map(|id| {
                    self.active[player]
                        .iter()
                        .find(|d| d.id == *id)
                        .ok_or_else(|| EngineError::internal(format!("pending attack refers to missing {}", id)))
                })
                .collect()
        };
        let attackers = lookup(plan.attacker_player, &plan.attackers)?;
        let defenders = lookup(plan.defender_player, &plan.defenders)?;
        Ok(fire_fits(plan.attack, &attackers, &defenders, total))
    }

    // === reactToInitiative ===

    fn react_to_initiative(&mut self, player: PlayerId, reaction: InitiativeReaction) -> Result<(), EngineError> {
        match reaction {
            InitiativeReaction::Decline => {
                self.responded[player] = true;
                self.record(Some(player), LogEntry::DeclinedReaction);
                self.reactor = self.next_initiative_reactor();
                if self.reactor.is_none() {
                    self.enter(Phase::StartTurn);
                }
                Ok(())
            }
            InitiativeReaction::Chance { die } => {
                if self.chance_used[player] {
                    return Err(EngineError::validation("You have already rerolled a chance die this round."));
                }
                let (dice, rng) = self.dice_and_rng(player);
                let target = dice
                    .get_mut(die)
                    .ok_or_else(|| EngineError::malformed(format!("Die index {} is out of range.", die)))?;
                if !target.has_skill(Skill::Chance) {
                    return Err(EngineError::validation("Only chance dice can be rerolled."));
                }
                target.roll(false, rng);
                let (id, value) = (target.id, target.value().unwrap_or_default());
                self.chance_used[player] = true;
                self.record(Some(player), LogEntry::Chance { die: id, value });
                self.reopen_initiative();
                Ok(())
            }
            InitiativeReaction::Focus { dice, values } => {
                let mut ids = Vec::with_capacity(dice.len());
                for (i, (&idx, &value)) in dice.iter().zip(&values).enumerate() {
                    if dice[..i].contains(&idx) {
                        return Err(EngineError::malformed(format!("Die index {} is repeated.", idx)));
                    }
                    let die = self.active[player]
                        .get_mut(idx)
                        .ok_or_else(|| EngineError::malformed(format!("Die index {} is out of range.", idx)))?;
                    if !die.has_skill(Skill::Focus) {
                        return Err(EngineError::validation("Only focus dice can be turned down."));
                    }
                    if die.value().is_some_and(|v| value >= v) {
                        return Err(EngineError::validation("Focus dice can only be turned down."));
                    }
                    die.set_value(value)?;
                    die.dizzy = true;
                    ids.push(die.id);
                }

                let mine = initiative_key(&self.active[player]);
                let theirs = initiative_key(&self.active[self.active_player]);
                if !beats(&mine, &theirs) {
                    return Err(EngineError::validation(
                        "Focus dice must be turned down far enough to win initiative.",
                    ));
                }
                self.record(Some(player), LogEntry::Focus { dice: ids, values });
                self.reopen_initiative();
                Ok(())
            }
        }
    }

    /// After a successful reaction everyone may react again.
    fn reopen_initiative(&mut self) {
        self.responded = PlayerMap::with_default(self.player_count());
        self.enter(Phase::DetermineInitiative);
    }

    // === reactToAuxiliary ===

    fn react_to_auxiliary(&mut self, player: PlayerId, add: Option<usize>) -> Result<(), EngineError> {
        if let Some(idx) = add {
            if idx >= self.auxiliary[player].len() {
                return Err(EngineError::malformed(format!("Auxiliary die index {} is out of range.", idx)));
            }
        }
        self.auxiliary_picks[player] = add;
        self.responded[player] = true;
        self.record(Some(player), LogEntry::AuxiliaryChosen { die: add });

        if self.responded.values().all(|&r| r) {
            let everyone_in = self
                .player_ids()
                .all(|p| self.auxiliary[p].is_empty() || self.auxiliary_picks[p].is_some());
            if everyone_in {
                for p in PlayerId::all(self.player_count()) {
                    if let Some(idx) = self.auxiliary_picks[p] {
                        let mut template = self.auxiliary[p][idx].clone();
                        template.skills.retain(|&s| s != Skill::Auxiliary);
                        self.loadouts[p].push(template);
                    }
                }
            }
            debug!(game = %self.id, kept = everyone_in, "auxiliary dice decided");
            self.auxiliary_decided = true;
            self.enter(Phase::StartRound);
        }
        Ok(())
    }

    // === reactToReserve ===

    fn react_to_reserve(&mut self, player: PlayerId, add: Option<usize>) -> Result<(), EngineError> {
        if let Some(idx) = add {
            if idx >= self.reserves[player].len() {
                return Err(EngineError::malformed(format!("Reserve die index {} is out of range.", idx)));
            }
            let mut template = self.reserves[player].remove(idx);
            template.skills.retain(|&s| s != Skill::Reserve);
            self.loadouts[player].push(template);
        }
        self.responded[player] = true;
        self.record(Some(player), LogEntry::ReserveChosen { die: add });

        self.reactor = self.next_reserve_reactor();
        if self.reactor.is_none() {
            self.enter(Phase::StartRound);
        }
        Ok(())
    }
}
