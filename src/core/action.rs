//! Action envelope: what the outer API hands the engine, and what it gets
//! back.
//!
//! Requests are deliberately flat: an action name plus named parameters.
//! [`Action::from_request`] turns them into a typed [`Action`]; any
//! structural problem is reported as [`EngineError::Malformed`] before the
//! game is touched.
//!
//! ```
//! use dice_duel::core::{Action, ActionRequest, PlayerId};
//! use dice_duel::attack::AttackType;
//!
//! let request = ActionRequest::new(PlayerId::new(0), "submitTurn")
//!     .with("attackType", "Power")
//!     .with("attackerIdx", vec![0])
//!     .with("defenderIdx", vec![1]);
//!
//! let (action, _fence) = Action::from_request(&request).unwrap();
//! assert!(matches!(action, Action::SubmitTurn { attack: AttackType::Power, .. }));
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::entity::DieId;
use super::player::PlayerId;
use crate::attack::AttackType;
use crate::error::EngineError;
use crate::game::Phase;

/// Value of a request parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamValue {
    Int(i64),
    IntList(Vec<i64>),
    Text(String),
}

impl ParamValue {
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// A single int is accepted where a list is expected.
    #[must_use]
    pub fn as_int_list(&self) -> Option<Vec<i64>> {
        match self {
            ParamValue::IntList(v) => Some(v.clone()),
            ParamValue::Int(v) => Some(vec![*v]),
            ParamValue::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<u64> for ParamValue {
    fn from(v: u64) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<Vec<i64>> for ParamValue {
    fn from(v: Vec<i64>) -> Self {
        ParamValue::IntList(v)
    }
}

impl From<Vec<i32>> for ParamValue {
    fn from(v: Vec<i32>) -> Self {
        ParamValue::IntList(v.into_iter().map(i64::from).collect())
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

/// Flat parameter map of a request.
pub type Params = FxHashMap<String, ParamValue>;

/// A request from the outer API layer.
///
/// `player` is the acting seat, supplied explicitly by the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub player: PlayerId,
    pub action: String,
    #[serde(default)]
    pub params: Params,
}

impl ActionRequest {
    #[must_use]
    pub fn new(player: PlayerId, action: impl Into<String>) -> Self {
        Self {
            player,
            action: action.into(),
            params: Params::default(),
        }
    }

    /// Add a parameter (builder pattern).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    fn require_text(&self, name: &str) -> Result<&str, EngineError> {
        self.param(name)
            .and_then(ParamValue::as_text)
            .ok_or_else(|| EngineError::malformed(format!("Missing or invalid parameter '{}'.", name)))
    }

    fn optional_int(&self, name: &str) -> Result<Option<i64>, EngineError> {
        match self.param(name) {
            None => Ok(None),
            Some(value) => value
                .as_int()
                .map(Some)
                .ok_or_else(|| EngineError::malformed(format!("Parameter '{}' must be an integer.", name))),
        }
    }

    fn index_list(&self, name: &str) -> Result<Vec<usize>, EngineError> {
        let Some(value) = self.param(name) else {
            return Ok(Vec::new());
        };
        let list = value
            .as_int_list()
            .ok_or_else(|| EngineError::malformed(format!("Parameter '{}' must be a list of integers.", name)))?;
        list.into_iter()
            .map(|i| {
                usize::try_from(i)
                    .map_err(|_| EngineError::malformed(format!("Parameter '{}' contains a negative index.", name)))
            })
            .collect()
    }

    fn value_list(&self, name: &str) -> Result<Vec<i32>, EngineError> {
        let Some(value) = self.param(name) else {
            return Ok(Vec::new());
        };
        let list = value
            .as_int_list()
            .ok_or_else(|| EngineError::malformed(format!("Parameter '{}' must be a list of integers.", name)))?;
        list.into_iter()
            .map(|v| {
                i32::try_from(v).map_err(|_| EngineError::malformed(format!("Parameter '{}' is out of range.", name)))
            })
            .collect()
    }
}

/// Snapshot a request claims to have been computed against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fence {
    pub round: Option<u32>,
    pub timestamp: Option<u64>,
}

/// How the player losing initiative responds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InitiativeReaction {
    /// Turn focus dice down to the given values.
    Focus { dice: Vec<usize>, values: Vec<i32> },
    /// Reroll one chance die.
    Chance { die: usize },
    Decline,
}

/// How the attacker settles a pending fire-assisted attack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FireAdjustment {
    /// Turn fire dice down to the given values.
    Turndown { dice: Vec<usize>, values: Vec<i32> },
    Cancel,
}

/// Typed action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Attack, pass or surrender. Attacker indices refer to the acting
    /// player's active dice, defender indices to `defender_player`'s.
    SubmitTurn {
        attack: AttackType,
        attackers: Vec<usize>,
        defenders: Vec<usize>,
        defender_player: Option<PlayerId>,
    },
    ReactToInitiative(InitiativeReaction),
    AdjustFire(FireAdjustment),
    /// `Some(idx)` keeps that auxiliary die; `None` declines.
    ReactToAuxiliary { add: Option<usize> },
    /// `Some(idx)` adds that reserve die; `None` declines.
    ReactToReserve { add: Option<usize> },
}

impl Action {
    /// Short verb used in logs and state-mismatch messages.
    #[must_use]
    pub fn verb(&self) -> &'static str {
        match self {
            Action::SubmitTurn { .. } => "submit a turn",
            Action::ReactToInitiative(_) => "react to initiative",
            Action::AdjustFire(_) => "adjust fire dice",
            Action::ReactToAuxiliary { .. } => "choose auxiliary dice",
            Action::ReactToReserve { .. } => "choose reserve dice",
        }
    }

    /// Parse a request into a typed action and its fence.
    pub fn from_request(request: &ActionRequest) -> Result<(Action, Fence), EngineError> {
        let round = request
            .optional_int("round")?
            .map(|r| u32::try_from(r).map_err(|_| EngineError::malformed("Parameter 'round' is out of range.")))
            .transpose()?;
        let timestamp = request
            .optional_int("timestamp")?
            .map(|t| u64::try_from(t).map_err(|_| EngineError::malformed("Parameter 'timestamp' is out of range.")))
            .transpose()?;
        let fence = Fence { round, timestamp };

        let action = match request.action.as_str() {
            "submitTurn" => {
                let attack: AttackType = request.require_text("attackType")?.parse()?;
                let defender_player = request
                    .optional_int("defenderPlayer")?
                    .map(|p| {
                        u8::try_from(p)
                            .map(PlayerId::new)
                            .map_err(|_| EngineError::malformed("Parameter 'defenderPlayer' is out of range."))
                    })
                    .transpose()?;
                Action::SubmitTurn {
                    attack,
                    attackers: request.index_list("attackerIdx")?,
                    defenders: request.index_list("defenderIdx")?,
                    defender_player,
                }
            }
            "reactToInitiative" => {
                require_fence(&fence)?;
                let reaction = match request.require_text("action")? {
                    "focus" => {
                        let dice = request.index_list("dieIdx")?;
                        let values = request.value_list("dieValue")?;
                        if dice.is_empty() || dice.len() != values.len() {
                            return Err(EngineError::malformed(
                                "Focus needs one value for each selected die.",
                            ));
                        }
                        InitiativeReaction::Focus { dice, values }
                    }
                    "chance" => {
                        let dice = request.index_list("dieIdx")?;
                        if dice.len() != 1 {
                            return Err(EngineError::malformed("Exactly one chance die must be selected."));
                        }
                        InitiativeReaction::Chance { die: dice[0] }
                    }
                    "decline" => InitiativeReaction::Decline,
                    other => {
                        return Err(EngineError::malformed(format!("Unknown initiative reaction '{}'.", other)))
                    }
                };
                Action::ReactToInitiative(reaction)
            }
            "adjustFire" => {
                require_fence(&fence)?;
                let adjustment = match request.require_text("action")? {
                    "turndown" => {
                        let dice = request.index_list("dieIdx")?;
                        let values = request.value_list("dieValue")?;
                        if dice.is_empty() || dice.len() != values.len() {
                            return Err(EngineError::malformed(
                                "Fire turndown needs one value for each selected die.",
                            ));
                        }
                        FireAdjustment::Turndown { dice, values }
                    }
                    "cancel" => FireAdjustment::Cancel,
                    other => return Err(EngineError::malformed(format!("Unknown fire adjustment '{}'.", other))),
                };
                Action::AdjustFire(adjustment)
            }
            "reactToAuxiliary" => Action::ReactToAuxiliary {
                add: parse_add_or_decline(request)?,
            },
            "reactToReserve" => Action::ReactToReserve {
                add: parse_add_or_decline(request)?,
            },
            other => return Err(EngineError::malformed(format!("Unknown action '{}'.", other))),
        };

        Ok((action, fence))
    }
}

fn require_fence(fence: &Fence) -> Result<(), EngineError> {
    if fence.round.is_none() || fence.timestamp.is_none() {
        return Err(EngineError::malformed(
            "This action requires 'round' and 'timestamp' parameters.",
        ));
    }
    Ok(())
}

fn parse_add_or_decline(request: &ActionRequest) -> Result<Option<usize>, EngineError> {
    match request.require_text("action")? {
        "add" => {
            let dice = request.index_list("dieIdx")?;
            if dice.len() != 1 {
                return Err(EngineError::malformed("Exactly one die must be selected."));
            }
            Ok(Some(dice[0]))
        }
        "decline" => Ok(None),
        other => Err(EngineError::malformed(format!("Unknown choice '{}'.", other))),
    }
}

/// Payload of a successful action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionData {
    /// State the game came to rest in.
    pub phase: Phase,
    pub round: u32,
    /// Logical timestamp after the action; fences later reactions.
    pub timestamp: u64,
    /// Dice captured by this action, if any.
    pub captured: Vec<DieId>,
}

/// Result handed back to the outer API layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub ok: bool,
    pub data: Option<ActionData>,
    pub message: String,
}

impl ActionResult {
    #[must_use]
    pub fn success(data: ActionData, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            data: Some(data),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            message: message.into(),
        }
    }
}
