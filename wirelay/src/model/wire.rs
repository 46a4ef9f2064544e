//! Derived wire records.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::UnitId;

/// Type of a single wire pulled through a conduit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireType {
    Neutral,
    ProtectiveEarth,
    PowerLine,
    ControlLine,
}

impl WireType {
    /// Sheath colour used on drawings.
    pub fn color(&self) -> &'static str {
        match self {
            WireType::Neutral => "blue",
            WireType::ProtectiveEarth => "green-yellow",
            WireType::PowerLine => "red",
            WireType::ControlLine => "orange",
        }
    }

    /// Protective earth never carries operating current.
    pub fn carries_current(&self) -> bool {
        !matches!(self, WireType::ProtectiveEarth)
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireType::Neutral => write!(f, "N"),
            WireType::ProtectiveEarth => write!(f, "PE"),
            WireType::PowerLine => write!(f, "L-power"),
            WireType::ControlLine => write!(f, "L-control"),
        }
    }
}

/// One wire inside a conduit, produced by the wiring engine.
///
/// Wires are immutable once a computation completes; recomputation discards
/// and regenerates every wire of the circuit. There is deliberately no random
/// identity here so that two runs over an unchanged graph produce identical
/// records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    pub wire_type: WireType,

    /// Owning unit; `None` only for the base neutral / protective-earth pair,
    /// which belongs to the circuit itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<UnitId>,

    /// Current estimate in amperes, summed from downstream device ratings.
    /// Display-only; never feeds back into topology.
    #[serde(default)]
    pub current: f64,
}

impl Wire {
    pub fn new(wire_type: WireType, unit: Option<UnitId>) -> Self {
        Self {
            wire_type,
            unit,
            current: 0.0,
        }
    }

    /// Base wires belong to the circuit, not to any unit.
    pub fn is_base(&self) -> bool {
        self.unit.is_none()
    }
}
