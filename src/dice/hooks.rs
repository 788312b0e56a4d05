//! Skill hook registry.
//!
//! Skill behavior is looked up in a static table keyed by
//! `(Skill, HookEvent)`. Each die keeps a [`HookList`]: for every event, the
//! skills on that die that have a handler for it. The list is maintained in
//! lock-step with the die's skill set, so dispatch never has to scan skills
//! that do not care about an event.
//!
//! Handlers come in two flavours. [`Handler::Mutate`] may change the die it
//! runs on (resize it, lock its value, drop a skill). [`Handler::Inspect`]
//! only reads the die and edits the value set carried in [`HookArgs`].
//! Neither kind can reach other dice; cross-die effects go through the
//! game's capture and assist paths.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::die::Die;
use super::skill::Skill;
use crate::attack::AttackType;
use crate::core::{DieId, GameRng, PlayerId};
use crate::game::Phase;

/// Candidate values a die offers for one comparison.
///
/// Any element may be used; callers must not treat the first one as
/// canonical.
pub type DieValues = SmallVec<[i32; 4]>;

/// Lifecycle events at which skills may run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HookEvent {
    /// Before a new value is drawn. Resizing skills act here.
    PreRoll,
    /// After the value is drawn.
    PostRoll,
    AttackValues,
    DefenseValues,
    InitiativeValues,
    AssistValues,
    /// On an attacking die after a successful capture.
    Capture,
    /// On a defending die as it is captured.
    BeCaptured,
    /// On every state-machine transition.
    GameState,
}

/// Event-specific arguments passed to handlers.
pub enum HookArgs<'a> {
    Roll {
        successful_attack: bool,
        rng: &'a mut GameRng,
    },
    Values {
        attack: Option<AttackType>,
        values: &'a mut DieValues,
    },
    Assist {
        attack: AttackType,
        attackers: &'a [DieId],
        defenders: &'a [DieId],
        values: &'a mut DieValues,
    },
    Capture {
        attack: AttackType,
        attackers: &'a [DieId],
        defenders: &'a [DieId],
    },
    GameState {
        phase: Phase,
        player: PlayerId,
    },
}

/// A skill's code for one event.
#[derive(Clone, Copy)]
pub enum Handler {
    Mutate(fn(&mut Die, &mut HookArgs<'_>)),
    Inspect(fn(&Die, &mut HookArgs<'_>)),
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Handler::Mutate(_) => f.write_str("Handler::Mutate"),
            Handler::Inspect(_) => f.write_str("Handler::Inspect"),
        }
    }
}

/// Look up the handler `skill` registers for `event`.
#[must_use]
pub fn handler(skill: Skill, event: HookEvent) -> Option<Handler> {
    skill
        .hooks()
        .iter()
        .find(|(e, _)| *e == event)
        .map(|(_, h)| *h)
}

/// Per-die index of which skills run at which event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookList {
    by_event: BTreeMap<HookEvent, SmallVec<[Skill; 4]>>,
}

impl HookList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every event `skill` declares. Registering twice is a no-op.
    pub fn register(&mut self, skill: Skill) {
        for (event, _) in skill.hooks() {
            let list = self.by_event.entry(*event).or_default();
            if !list.contains(&skill) {
                list.push(skill);
            }
        }
    }

    /// Drop `skill` from every event, removing events left empty.
    pub fn unregister(&mut self, skill: Skill) {
        self.by_event.retain(|_, list| {
            list.retain(|s| *s != skill);
            !list.is_empty()
        });
    }

    /// Skills registered for `event`, in registration order.
    #[must_use]
    pub fn skills_for(&self, event: HookEvent) -> &[Skill] {
        self.by_event.get(&event).map(|l| l.as_slice()).unwrap_or(&[])
    }

    /// Number of events with at least one registered skill.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.by_event.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_event.is_empty()
    }
}
