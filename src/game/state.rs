//! The game: every die of every player, plus round and turn bookkeeping.
//!
//! ## Ownership
//!
//! Each player has two die collections. `active` holds the dice a player
//! is playing with this round; `captured` holds dice the player has taken
//! from opponents. A die is in exactly one collection at a time and is
//! moved, never copied, when captured.
//!
//! ## Persistence
//!
//! `Game` is plain data. Serializing it (see [`Game::to_bytes`]) captures
//! everything needed to resume, including the RNG position, so a loaded
//! game continues exactly as the in-memory one would have.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::log::{LogEntry, LogRecord};
use super::phase::Phase;
use crate::attack::AttackPlan;
use crate::button::{Button, DieTemplate};
use crate::core::{DieId, GameConfig, GameId, GameRng, PlayerId, PlayerMap};
use crate::dice::Die;
use crate::error::EngineError;

/// An attack parked in ADJUST_FIRE until its fire dice are turned down.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAttack {
    pub plan: AttackPlan,
    pub shortfall: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Game {
    pub(crate) id: GameId,
    pub(crate) config: GameConfig,
    pub(crate) buttons: PlayerMap<Button>,

    /// Templates dealt at each round start.
    pub(crate) loadouts: PlayerMap<Vec<DieTemplate>>,
    /// Reserve dice not yet added.
    pub(crate) reserves: PlayerMap<Vec<DieTemplate>>,
    /// Auxiliary dice on offer before the first round.
    pub(crate) auxiliary: PlayerMap<Vec<DieTemplate>>,
    pub(crate) auxiliary_picks: PlayerMap<Option<usize>>,
    pub(crate) auxiliary_decided: bool,

    pub(crate) active: PlayerMap<Vec<Die>>,
    pub(crate) captured: PlayerMap<Vec<Die>>,

    pub(crate) phase: Phase,
    pub(crate) round: u32,
    pub(crate) turn: u32,
    pub(crate) active_player: PlayerId,
    /// Player allowed to act in a single-player reaction window.
    pub(crate) reactor: Option<PlayerId>,
    /// Who has answered the current reaction window.
    pub(crate) responded: PlayerMap<bool>,
    pub(crate) chance_used: PlayerMap<bool>,
    pub(crate) consecutive_passes: usize,
    pub(crate) surrendered: Option<PlayerId>,
    pub(crate) round_losers: Vec<PlayerId>,
    pub(crate) pending: Option<PendingAttack>,

    pub(crate) wins: PlayerMap<u32>,
    pub(crate) winner: Option<PlayerId>,

    /// Logical clock; advances once per committed action.
    pub(crate) timestamp: u64,
    pub(crate) next_die_id: DieId,
    pub(crate) rng: GameRng,
    pub(crate) log: Vector<LogRecord>,
}

fn seats<T>(data: Vec<T>) -> Result<PlayerMap<T>, EngineError> {
    PlayerMap::from_vec(data).ok_or_else(|| EngineError::malformed("A game seats between 1 and 255 players."))
}

impl Game {
    /// Seat the buttons. Fails unless there are between 1 and 255 of them.
    pub(crate) fn new(id: GameId, config: GameConfig, buttons: Vec<Button>) -> Result<Self, EngineError> {
        let player_count = buttons.len();
        let loadouts = seats(
            buttons
                .iter()
                .map(|b| b.starting_dice().cloned().collect())
                .collect(),
        )?;
        let reserves = seats(buttons.iter().map(|b| b.reserve_dice().cloned().collect()).collect())?;
        let auxiliary = seats(
            buttons
                .iter()
                .map(|b| b.auxiliary_dice().cloned().collect())
                .collect(),
        )?;
        let rng = GameRng::new(config.seed);

        Ok(Self {
            id,
            config,
            buttons: seats(buttons)?,
            loadouts,
            reserves,
            auxiliary,
            auxiliary_picks: PlayerMap::with_default(player_count),
            auxiliary_decided: false,
            active: PlayerMap::with_default(player_count),
            captured: PlayerMap::with_default(player_count),
            phase: Phase::StartRound,
            round: 0,
            turn: 0,
            active_player: PlayerId::new(0),
            reactor: None,
            responded: PlayerMap::with_default(player_count),
            chance_used: PlayerMap::with_default(player_count),
            consecutive_passes: 0,
            surrendered: None,
            round_losers: Vec::new(),
            pending: None,
            wins: PlayerMap::with_default(player_count),
            winner: None,
            timestamp: 0,
            next_die_id: DieId::new(0),
            rng,
            log: Vector::new(),
        })
    }

    // === Accessors ===

    #[must_use]
    pub fn id(&self) -> GameId {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.config.player_count
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.config.player_count)
    }

    #[must_use]
    pub fn button(&self, player: PlayerId) -> &Button {
        &self.buttons[player]
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Turns taken so far this round.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Player whose turn it is (or who won initiative).
    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.active_player
    }

    /// Player allowed to answer the current reaction window, if the window
    /// belongs to one player.
    #[must_use]
    pub fn reactor(&self) -> Option<PlayerId> {
        self.reactor
    }

    #[must_use]
    pub fn active_dice(&self, player: PlayerId) -> &[Die] {
        &self.active[player]
    }

    #[must_use]
    pub fn captured_dice(&self, player: PlayerId) -> &[Die] {
        &self.captured[player]
    }

    #[must_use]
    pub fn reserve_dice(&self, player: PlayerId) -> &[DieTemplate] {
        &self.reserves[player]
    }

    #[must_use]
    pub fn auxiliary_dice(&self, player: PlayerId) -> &[DieTemplate] {
        &self.auxiliary[player]
    }

    /// Templates `player` is dealt at round start.
    #[must_use]
    pub fn loadout(&self, player: PlayerId) -> &[DieTemplate] {
        &self.loadouts[player]
    }

    #[must_use]
    pub fn wins(&self, player: PlayerId) -> u32 {
        self.wins[player]
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    #[must_use]
    pub fn pending_attack(&self) -> Option<&PendingAttack> {
        self.pending.as_ref()
    }

    #[must_use]
    pub fn chance_used(&self, player: PlayerId) -> bool {
        self.chance_used[player]
    }

    #[must_use]
    pub fn log(&self) -> &Vector<LogRecord> {
        &self.log
    }

    /// Dice in every collection of every player.
    #[must_use]
    pub fn total_dice(&self) -> usize {
        self.active.values().map(Vec::len).sum::<usize>() + self.captured.values().map(Vec::len).sum::<usize>()
    }

    /// Find a die anywhere in play.
    #[must_use]
    pub fn find_die(&self, id: DieId) -> Option<&Die> {
        self.active
            .values()
            .chain(self.captured.values())
            .flat_map(|dice| dice.iter())
            .find(|d| d.id == id)
    }

    /// Opponents of `player` that still have active dice.
    pub fn opponents_with_dice(&self, player: PlayerId) -> impl Iterator<Item = PlayerId> + '_ {
        self.player_ids()
            .filter(move |&p| p != player && !self.active[p].is_empty())
    }

    /// Force the face of one of `player`'s active dice.
    ///
    /// For scripted setups. Does not advance the timestamp.
    pub fn set_die_value(&mut self, player: PlayerId, index: usize, value: i32) -> Result<(), EngineError> {
        if !self.active.contains(player) {
            return Err(EngineError::malformed(format!("{} is not in this game.", player)));
        }
        let die = self.active[player]
            .get_mut(index)
            .ok_or_else(|| EngineError::malformed(format!("{} has no die at index {}.", player, index)))?;
        die.set_value(value)?;
        Ok(())
    }

    // === Crate-internal mutation ===

    pub(crate) fn allocate_die_id(&mut self) -> DieId {
        let id = self.next_die_id;
        self.next_die_id = id.next();
        id
    }

    pub(crate) fn die_index(&self, player: PlayerId, id: DieId) -> Option<usize> {
        self.active[player].iter().position(|d| d.id == id)
    }

    /// One player's active dice together with the RNG.
    pub(crate) fn dice_and_rng(&mut self, player: PlayerId) -> (&mut Vec<Die>, &mut GameRng) {
        (&mut self.active[player], &mut self.rng)
    }

    pub(crate) fn record(&mut self, player: Option<PlayerId>, entry: LogEntry) {
        self.log.push_back(LogRecord {
            timestamp: self.timestamp,
            round: self.round,
            player,
            entry,
        });
    }

    /// Move to `phase` and notify every active die.
    pub(crate) fn enter(&mut self, phase: Phase) {
        debug!(game = %self.id, from = %self.phase, to = %phase, player = %self.active_player, "state transition");
        self.phase = phase;
        let player = self.active_player;
        for dice in self.active.values_mut() {
            for die in dice.iter_mut() {
                die.run_hooks_at_game_state(phase, player);
            }
        }
    }
}
