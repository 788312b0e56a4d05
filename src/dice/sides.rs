//! Die sizes: single and twin dice, size ladders, splitting.

use serde::{Deserialize, Serialize};

use crate::core::GameRng;

/// Largest die size a recipe may name.
pub const MAX_SIDES: u32 = 99;

/// Standard size ladder used by growing and shrinking dice.
pub const SIZE_LADDER: &[u32] = &[1, 2, 4, 6, 8, 10, 12, 16, 20, 30];

/// Sizes a mood die may take after a triggered reroll.
pub const MOOD_SIZES: &[u32] = &[1, 2, 4, 6, 8, 10, 12, 20, 30];

/// Sizes a mad die may take after a triggered reroll.
pub const MAD_SIZES: &[u32] = &[2, 4, 6, 8, 10, 12, 14, 16, 18, 20, 22, 24, 26, 28, 30];

/// Physical make-up of a die.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sides {
    /// One die with faces 1..=n.
    Single(u32),
    /// Two dice rolled and summed.
    Twin(u32, u32),
}

impl Sides {
    /// Smallest reachable value.
    #[must_use]
    pub fn min(self) -> i32 {
        match self {
            Sides::Single(_) => 1,
            Sides::Twin(..) => 2,
        }
    }

    /// Largest reachable value.
    #[must_use]
    pub fn max(self) -> i32 {
        match self {
            Sides::Single(n) => n as i32,
            Sides::Twin(a, b) => (a + b) as i32,
        }
    }

    pub fn roll(self, rng: &mut GameRng) -> i32 {
        match self {
            Sides::Single(n) => rng.roll(1, n as i32),
            Sides::Twin(a, b) => rng.roll(1, a as i32) + rng.roll(1, b as i32),
        }
    }

    /// Partition into two halves, larger half first. A 1-sided component
    /// stays 1-sided in both halves.
    #[must_use]
    pub fn split(self) -> (Sides, Sides) {
        match self {
            Sides::Single(n) => {
                let (a, b) = split_size(n);
                (Sides::Single(a), Sides::Single(b))
            }
            Sides::Twin(x, y) => {
                let (x1, x2) = split_size(x);
                let (y1, y2) = split_size(y);
                (Sides::Twin(x1, y1), Sides::Twin(x2, y2))
            }
        }
    }

    /// Apply `f` to every component.
    #[must_use]
    pub fn map(self, f: impl Fn(u32) -> u32) -> Sides {
        match self {
            Sides::Single(n) => Sides::Single(f(n)),
            Sides::Twin(a, b) => Sides::Twin(f(a), f(b)),
        }
    }

    /// Recipe notation: `6` or `(4,6)`.
    #[must_use]
    pub fn notation(self) -> String {
        match self {
            Sides::Single(n) => n.to_string(),
            Sides::Twin(a, b) => format!("({},{})", a, b),
        }
    }
}

impl std::fmt::Display for Sides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.notation())
    }
}

fn split_size(n: u32) -> (u32, u32) {
    if n <= 1 {
        return (1, 1);
    }
    (n.div_ceil(2), n / 2)
}

/// Next size up the ladder. Sizes at or above the top stay as they are.
#[must_use]
pub fn grow_size(n: u32) -> u32 {
    SIZE_LADDER.iter().copied().find(|&s| s > n).unwrap_or(n)
}

/// Next size down the ladder; sizes below the bottom clamp to it.
#[must_use]
pub fn shrink_size(n: u32) -> u32 {
    SIZE_LADDER
        .iter()
        .rev()
        .copied()
        .find(|&s| s < n)
        .unwrap_or(SIZE_LADDER[0])
}
