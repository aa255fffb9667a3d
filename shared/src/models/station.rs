//! Operator station models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prompt shown on a freshly opened operator screen
pub const DEFAULT_OPERATION_DESCR: &str = "Scan next PID";

/// Working mode of an operator station
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StationMode {
    Pick,
    Put,
    Inventory,
}

impl StationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StationMode::Pick => "pick",
            StationMode::Put => "put",
            StationMode::Inventory => "inventory",
        }
    }
}

impl std::fmt::Display for StationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An operator workstation bound to one storage subtree and one mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub id: Uuid,
    pub name: String,
    /// Physical bus/network address of the lift hardware
    pub address: Option<String>,
    pub mode: StationMode,
    /// Root of the storage subtree this station works against: source
    /// side for Pick operations, destination side for Put operations
    pub location_id: Uuid,
    /// At most one move line is being worked on at a time
    pub current_move_line_id: Option<Uuid>,
    pub operation_descr: String,
    pub created_at: DateTime<Utc>,
}

impl Station {
    pub fn new(name: impl Into<String>, mode: StationMode, location_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            address: None,
            mode,
            location_id,
            current_move_line_id: None,
            operation_descr: DEFAULT_OPERATION_DESCR.to_string(),
            created_at: Utc::now(),
        }
    }
}
