//! Tray type and occupancy grid models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A template defining a tray's row/column cell layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrayType {
    pub id: Uuid,
    pub name: String,
    /// Short code shown on tray labels (e.g., "2x3")
    pub code: String,
    pub rows: u32,
    pub cols: u32,
}

impl TrayType {
    /// All-empty rows x cols base pattern
    pub fn base_matrix(&self) -> Vec<Vec<u8>> {
        vec![vec![0u8; self.cols as usize]; self.rows as usize]
    }

    pub fn cell_count(&self) -> u32 {
        self.rows * self.cols
    }
}

/// Derived occupancy grid for a tray; regenerated on demand, never stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrayMatrix {
    /// Zero-based `[x, y]` of the selected cell; empty when viewing the tray
    pub selected: Vec<u32>,
    /// 0 = empty cell, 1 = cell holding stock, row-major
    pub cells: Vec<Vec<u8>>,
}
