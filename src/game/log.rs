//! Append-only action log.

use serde::{Deserialize, Serialize};

use crate::attack::AttackType;
use crate::core::{DieId, PlayerId};

/// What happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogEntry {
    Initiative {
        winner: PlayerId,
    },
    Focus {
        dice: Vec<DieId>,
        values: Vec<i32>,
    },
    Chance {
        die: DieId,
        value: i32,
    },
    DeclinedReaction,
    Attack {
        attack: AttackType,
        attackers: Vec<DieId>,
        defenders: Vec<DieId>,
        defender_player: PlayerId,
        success: bool,
    },
    FireAdjusted {
        dice: Vec<DieId>,
        values: Vec<i32>,
    },
    FireCancelled,
    Pass,
    Surrender,
    AuxiliaryChosen {
        die: Option<usize>,
    },
    ReserveChosen {
        die: Option<usize>,
    },
    /// Round result; scores are in tenths of a point.
    RoundEnd {
        winner: Option<PlayerId>,
        scores: Vec<i32>,
    },
    GameEnd {
        winner: Option<PlayerId>,
    },
}

/// One log line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Game timestamp the entry was committed at.
    pub timestamp: u64,
    pub round: u32,
    /// Acting player, if a player acted.
    pub player: Option<PlayerId>,
    pub entry: LogEntry,
}
