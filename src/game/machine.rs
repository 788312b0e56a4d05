//! Automatic state transitions.
//!
//! Player actions move the game into a new state and then call
//! [`Game::advance`], which keeps stepping through states that need no
//! input until it reaches one that waits for a player (or END_GAME).

use tracing::info;

use super::initiative::{can_react, determine_winner, initiative_key};
use super::log::LogEntry;
use super::phase::Phase;
use super::scoring::{round_winner, score_times_ten};
use super::state::Game;
use crate::core::{PlayerId, PlayerMap};
use crate::error::EngineError;

/// Upper bound on automatic transitions per action. Far above anything a
/// legal sequence needs.
const MAX_TRANSITIONS: usize = 64;

impl Game {
    /// Step through automatic states until the game waits for input.
    pub(crate) fn advance(&mut self) -> Result<(), EngineError> {
        for _ in 0..MAX_TRANSITIONS {
            if self.phase.awaits_player() || self.phase.is_terminal() {
                return Ok(());
            }
            let next = match self.phase {
                Phase::StartRound => self.start_round(),
                Phase::DetermineInitiative => self.settle_initiative(),
                Phase::StartTurn => Phase::AwaitAction,
                Phase::Attack => Phase::EndTurn,
                Phase::EndTurn => self.end_turn(),
                Phase::EndRound => self.end_round(),
                other => {
                    return Err(EngineError::internal(format!("no automatic transition out of {}", other)));
                }
            };
            self.enter(next);
        }
        Err(EngineError::internal("state machine did not settle"))
    }

    fn start_round(&mut self) -> Phase {
        if !self.auxiliary_decided {
            if self.auxiliary.values().any(|a| !a.is_empty()) {
                // Players without auxiliary dice have nothing to decide.
                for (player, offered) in self.auxiliary.iter() {
                    self.responded[player] = offered.is_empty();
                }
                self.auxiliary_picks = PlayerMap::with_default(self.player_count());
                return Phase::ReactToAuxiliary;
            }
            self.auxiliary_decided = true;
        }

        self.round += 1;
        self.turn = 0;
        self.consecutive_passes = 0;
        self.surrendered = None;
        self.pending = None;
        self.round_losers.clear();
        self.reactor = None;
        self.chance_used = PlayerMap::with_default(self.player_count());
        self.responded = PlayerMap::with_default(self.player_count());

        for player in PlayerId::all(self.player_count()) {
            let templates = self.loadouts[player].clone();
            let mut dice = Vec::with_capacity(templates.len());
            for template in &templates {
                let id = self.allocate_die_id();
                let mut die = template.instantiate(id, player);
                die.roll(false, &mut self.rng);
                dice.push(die);
            }
            self.active[player] = dice;
            self.captured[player].clear();
        }
        info!(game = %self.id, round = self.round, "round started");
        Phase::DetermineInitiative
    }

    /// Compute the initiative winner and open a reaction window if a
    /// loser can still change the outcome.
    fn settle_initiative(&mut self) -> Phase {
        let keys = PlayerMap::new(self.player_count(), |p| initiative_key(&self.active[p]));
        let winner = determine_winner(&keys, &mut self.rng);
        self.active_player = winner;
        self.record(None, LogEntry::Initiative { winner });

        self.reactor = self.next_initiative_reactor();
        match self.reactor {
            Some(_) => Phase::ReactToInitiative,
            None => Phase::StartTurn,
        }
    }

    pub(crate) fn next_initiative_reactor(&self) -> Option<PlayerId> {
        self.player_ids().find(|&p| {
            p != self.active_player && !self.responded[p] && can_react(&self.active[p], self.chance_used[p])
        })
    }

    pub(crate) fn round_is_over(&self) -> bool {
        self.surrendered.is_some()
            || self.active.values().any(Vec::is_empty)
            || self.consecutive_passes >= self.player_count()
    }

    fn end_turn(&mut self) -> Phase {
        if self.round_is_over() {
            return Phase::EndRound;
        }
        self.turn += 1;
        self.active_player = self.active_player.next(self.player_count());
        Phase::StartTurn
    }

    fn end_round(&mut self) -> Phase {
        let scores = PlayerMap::new(self.player_count(), |p| {
            score_times_ten(&self.active[p], &self.captured[p])
        });
        let winner = round_winner(&scores, self.surrendered);
        if let Some(w) = winner {
            self.wins[w] += 1;
        }
        info!(game = %self.id, round = self.round, winner = ?winner, scores = ?scores.values().collect::<Vec<_>>(), "round over");
        self.record(
            None,
            LogEntry::RoundEnd {
                winner,
                scores: scores.values().copied().collect(),
            },
        );

        if let Some(w) = winner.filter(|&w| self.wins[w] >= self.config.max_wins) {
            self.winner = Some(w);
            self.record(None, LogEntry::GameEnd { winner: Some(w) });
            info!(game = %self.id, winner = %w, "game over");
            return Phase::EndGame;
        }

        self.round_losers = match winner {
            Some(w) => self.player_ids().filter(|&p| p != w).collect(),
            None => Vec::new(),
        };
        self.responded = PlayerMap::with_default(self.player_count());
        self.reactor = self.next_reserve_reactor();
        match self.reactor {
            Some(_) => Phase::ReactToReserve,
            None => Phase::StartRound,
        }
    }

    pub(crate) fn next_reserve_reactor(&self) -> Option<PlayerId> {
        self.round_losers
            .iter()
            .copied()
            .find(|&p| !self.responded[p] && !self.reserves[p].is_empty())
    }
}
