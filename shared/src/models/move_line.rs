//! Stock move line models
//!
//! Move lines are created and planned by an external system; the engine
//! only selects pending ones and marks them done.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a move line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MoveLineState {
    Waiting,
    /// Ready to be executed by an operator
    Assigned,
    Done,
    Cancelled,
}

impl MoveLineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveLineState::Waiting => "waiting",
            MoveLineState::Assigned => "assigned",
            MoveLineState::Done => "done",
            MoveLineState::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for MoveLineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A demanded movement of product quantity between two locations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoveLine {
    pub id: Uuid,
    /// Transfer document this line belongs to
    pub picking_id: Option<Uuid>,
    pub product_id: Uuid,
    pub lot_id: Option<Uuid>,
    pub demanded_qty: Decimal,
    pub done_qty: Decimal,
    pub state: MoveLineState,
    /// Source location
    pub location_id: Uuid,
    /// Destination location
    pub location_dest_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl MoveLine {
    pub fn new(
        product_id: Uuid,
        demanded_qty: Decimal,
        location_id: Uuid,
        location_dest_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            picking_id: None,
            product_id,
            lot_id: None,
            demanded_qty,
            done_qty: Decimal::ZERO,
            state: MoveLineState::Assigned,
            location_id,
            location_dest_id,
            created_at: Utc::now(),
        }
    }
}
