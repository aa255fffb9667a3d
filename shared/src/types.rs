//! Common types exchanged with the consuming interfaces

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::MoveLine;

/// Message attached to the queue-cleared celebration
pub const QUEUE_CLEARED_MESSAGE: &str = "Congrats, you cleared the queue!";

/// Opaque rendering directive returned to the consuming UI
///
/// The engine never renders anything itself; it hands one of these back
/// and the host interface decides what to do with it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum UiDirective {
    /// Open a form view for one record
    OpenForm {
        model: String,
        record_id: Uuid,
        fullscreen: bool,
    },
    /// Open a modal dialog for one record
    OpenModal {
        model: String,
        record_id: Uuid,
        title: String,
    },
    /// Celebratory completion effect
    Celebration { message: String },
}

/// Result of advancing a station after completing its current task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum WorkOutcome {
    /// Another move line is pending and has been selected
    NextTask(MoveLine),
    /// Nothing left to do for this station
    QueueCleared,
}

impl WorkOutcome {
    /// Directive the UI should render for this outcome, if any
    pub fn directive(&self) -> Option<UiDirective> {
        match self {
            WorkOutcome::NextTask(_) => None,
            WorkOutcome::QueueCleared => Some(UiDirective::Celebration {
                message: QUEUE_CLEARED_MESSAGE.to_string(),
            }),
        }
    }
}
