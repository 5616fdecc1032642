pub mod client;
pub mod henrygd;

pub use client::{ApiError, ApiResult, NcaaApi};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Domain types, independent of the henrygd wire format
// ---------------------------------------------------------------------------

/// One team's announced bracket position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub team: String,
    pub seed: u8,
    pub region: String,
}

impl FieldEntry {
    pub fn new(team: impl Into<String>, seed: u8, region: impl Into<String>) -> Self {
        Self { team: team.into(), seed, region: region.into() }
    }
}

/// Bracket round inferred from a henrygd `bracketPositionId` hundreds digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WireRound {
    FirstFour,
    First,
    Later(u32),
}

impl WireRound {
    pub fn from_position(bracket_position_id: u32) -> Self {
        match bracket_position_id / 100 {
            1 => WireRound::FirstFour,
            2 => WireRound::First,
            n => WireRound::Later(n),
        }
    }
}
