//! Energy and damage bookkeeping
//!
//! Every movable entity carries an [`Energy`] value in `0..=100`. Damage
//! saturates at zero and zero is terminal: nothing in the game heals.
//!
//! # Rust Learning Notes
//!
//! This module demonstrates:
//! - **Newtypes**: `Energy` wraps a `u8` so the 0..=100 range is enforced in
//!   one place instead of at every call site
//! - **Saturating arithmetic**: `saturating_sub` never underflows

use std::fmt;

/// Health of an entity, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Energy(u8);

impl Energy {
    pub const MAX: u8 = 100;
    pub const FULL: Energy = Energy(Energy::MAX);
    pub const EMPTY: Energy = Energy(0);

    /// Clamps `value` into range.
    pub fn new(value: u8) -> Self {
        Energy(value.min(Energy::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Energy after taking `amount` damage, floored at zero.
    pub fn after_damage(self, amount: u8) -> Energy {
        Energy(self.0.saturating_sub(amount))
    }

    pub fn is_depleted(self) -> bool {
        self.0 == 0
    }

    /// Status bar percentage.
    pub fn percentage(self) -> u8 {
        self.0
    }
}

impl Default for Energy {
    fn default() -> Self {
        Energy::FULL
    }
}

impl fmt::Display for Energy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Energy::MAX)
    }
}

/// Result of a damaging hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Energy dropped but is still positive
    Hurt,
    /// This hit brought energy to zero
    Killed,
    /// Already dead; nothing changed
    AlreadyDead,
}
