//! Storage location tree models
//!
//! Locations form a strict hierarchy inside a vertical lift:
//! View -> Shuttle -> Tray -> Cell. A location's role in that chain is
//! derived from its parent, never entered by hand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default X-axis prefix for generated cell names
pub const DEFAULT_X_PREFIX: &str = "x";
/// Default Y-axis prefix for generated cell names
pub const DEFAULT_Y_PREFIX: &str = "y";
/// Default zero-padding width for cell name coordinates
pub const DEFAULT_XY_PADDING: usize = 2;

/// Role of a location inside the vertical-lift hierarchy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LiftKind {
    View,
    Shuttle,
    Tray,
    Cell,
}

impl LiftKind {
    /// Child kind in the fixed View -> Shuttle -> Tray -> Cell chain
    pub fn child(self) -> Option<LiftKind> {
        match self {
            LiftKind::View => Some(LiftKind::Shuttle),
            LiftKind::Shuttle => Some(LiftKind::Tray),
            LiftKind::Tray => Some(LiftKind::Cell),
            LiftKind::Cell => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LiftKind::View => "view",
            LiftKind::Shuttle => "shuttle",
            LiftKind::Tray => "tray",
            LiftKind::Cell => "cell",
        }
    }
}

impl std::fmt::Display for LiftKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A node in the storage location tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    /// Marks the root of a vertical-lift subtree
    pub is_lift_view: bool,
    /// Derived from the parent chain; `None` outside a lift subtree
    pub kind: Option<LiftKind>,
    pub tray_type_id: Option<Uuid>,
    /// 1-based cell column; 0 when the location is not a cell
    pub posx: u32,
    /// 1-based cell row; 0 when the location is not a cell
    pub posy: u32,
    /// Depth coordinate shared by a tray and its cells
    pub posz: u32,
    pub active: bool,
    pub company_id: Option<Uuid>,
    pub x_prefix: String,
    pub y_prefix: String,
    pub xy_padding: usize,
    /// Put the Y token before the X token in generated cell names
    pub y_first: bool,
    pub created_at: DateTime<Utc>,
}

impl Location {
    /// Create a location with default naming settings and no coordinates
    pub fn new(name: impl Into<String>, parent_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            parent_id,
            is_lift_view: false,
            kind: None,
            tray_type_id: None,
            posx: 0,
            posy: 0,
            posz: 0,
            active: true,
            company_id: None,
            x_prefix: DEFAULT_X_PREFIX.to_string(),
            y_prefix: DEFAULT_Y_PREFIX.to_string(),
            xy_padding: DEFAULT_XY_PADDING,
            y_first: false,
            created_at: Utc::now(),
        }
    }

    /// Name for the cell at the given 1-based coordinates
    ///
    /// Concatenates the X and Y tokens, each zero-padded to `xy_padding`,
    /// Y token first when `y_first` is set.
    pub fn cell_name(&self, col: u32, row: u32) -> String {
        let (first_prefix, second_prefix, first, second) = if self.y_first {
            (&self.y_prefix, &self.x_prefix, row, col)
        } else {
            (&self.x_prefix, &self.y_prefix, col, row)
        };
        format!(
            "{}{:0width$}{}{:0width$}",
            first_prefix,
            first,
            second_prefix,
            second,
            width = self.xy_padding
        )
    }
}
