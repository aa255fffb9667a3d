//! Task selection workflow for operator stations
//!
//! A station is bound to one storage subtree and one mode; this service
//! finds its next pending move line, completes the current one, and
//! reports pending-work counters. Only the Pick workflow is implemented;
//! Put and Inventory fail explicitly instead of guessing at behavior.

use uuid::Uuid;

use shared::models::{MoveLine, MoveLineState, Station, StationMode};
use shared::types::{UiDirective, WorkOutcome};
use shared::validation::validate_quantity;

use crate::error::{AppError, AppResult};
use crate::store::{LocationScope, MoveLineFilter, StockStore};

/// Task selector service over a stock store
#[derive(Clone)]
pub struct StationService<S> {
    store: S,
}

impl<S: StockStore> StationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Filter matching the pending work of one station
    ///
    /// Pick stations look at move lines sourced under their subtree, Put
    /// stations at lines destined for it. Inventory counting has no
    /// pending-move filter yet and fails closed rather than matching
    /// nothing silently.
    pub fn pending_moves_filter(&self, station: &Station) -> AppResult<MoveLineFilter> {
        let scope = Self::mode_scope(station.mode, vec![station.location_id])?;
        Ok(MoveLineFilter {
            state: MoveLineState::Assigned,
            scope,
        })
    }

    fn mode_scope(mode: StationMode, roots: Vec<Uuid>) -> AppResult<LocationScope> {
        match mode {
            StationMode::Pick => Ok(LocationScope::SourceUnder(roots)),
            StationMode::Put => Ok(LocationScope::DestUnder(roots)),
            StationMode::Inventory => Err(AppError::NotImplemented(
                "Inventory mode has no pending-move filter".to_string(),
            )),
        }
    }

    /// Number of pending move lines for one station
    pub async fn count_pending(&self, station_id: Uuid) -> AppResult<u64> {
        let station = self.store.get_station(station_id).await?;
        let filter = self.pending_moves_filter(&station)?;
        self.store.count_move_lines(&filter).await
    }

    /// Pending move lines across every station sharing the given mode
    pub async fn count_pending_all(&self, mode: StationMode) -> AppResult<u64> {
        let stations = self.store.stations_by_mode(mode).await?;
        let roots: Vec<Uuid> = stations.iter().map(|station| station.location_id).collect();
        let filter = MoveLineFilter {
            state: MoveLineState::Assigned,
            scope: Self::mode_scope(mode, roots)?,
        };
        self.store.count_move_lines(&filter).await
    }

    /// Assign the next pending move line to the station
    ///
    /// Eligible lines are taken in creation order (oldest first); the
    /// current-line pointer is cleared when nothing is pending.
    pub async fn select_next(&self, station_id: Uuid) -> AppResult<Option<MoveLine>> {
        let mut station = self.store.get_station(station_id).await?;
        let filter = self.pending_moves_filter(&station)?;
        let next = self.store.find_move_lines(&filter).await?.into_iter().next();
        station.current_move_line_id = next.as_ref().map(|line| line.id);
        self.store.update_station(station).await?;
        match &next {
            Some(line) => {
                tracing::info!(station = %station_id, move_line = %line.id, "selected next move line");
            }
            None => {
                tracing::debug!(station = %station_id, "no pending move line");
            }
        }
        Ok(next)
    }

    /// Complete the station's current move line
    ///
    /// Pick: the demanded quantity is confirmed as done and the movement
    /// is finalized. Put and Inventory are not implemented.
    pub async fn complete_current(&self, station_id: Uuid) -> AppResult<MoveLine> {
        let station = self.store.get_station(station_id).await?;
        let line_id = station.current_move_line_id.ok_or_else(|| {
            AppError::InvalidStateTransition(format!(
                "station {} has no current move line",
                station.name
            ))
        })?;
        match station.mode {
            StationMode::Pick => {
                let mut line = self.store.get_move_line(line_id).await?;
                if line.state != MoveLineState::Assigned {
                    return Err(AppError::InvalidStateTransition(format!(
                        "move line {} is {} and cannot be completed",
                        line.id, line.state
                    )));
                }
                validate_quantity(line.demanded_qty).map_err(|message| AppError::Validation {
                    field: "demanded_qty".to_string(),
                    message: message.to_string(),
                })?;
                line.done_qty = line.demanded_qty;
                line.state = MoveLineState::Done;
                self.store.update_move_line(line.clone()).await?;
                tracing::info!(move_line = %line.id, qty = %line.done_qty, "completed pick");
                Ok(line)
            }
            StationMode::Put => Err(AppError::NotImplemented(
                "Put workflow not implemented".to_string(),
            )),
            StationMode::Inventory => Err(AppError::NotImplemented(
                "Inventory workflow not implemented".to_string(),
            )),
        }
    }

    /// Complete the current move line, then advance to the next one
    ///
    /// Returns [`WorkOutcome::QueueCleared`] once the station has nothing
    /// left to do, so the caller can celebrate instead of redrawing the
    /// work screen.
    pub async fn process_and_advance(&self, station_id: Uuid) -> AppResult<WorkOutcome> {
        self.complete_current(station_id).await?;
        match self.select_next(station_id).await? {
            Some(line) => Ok(WorkOutcome::NextTask(line)),
            None => {
                tracing::info!(station = %station_id, "queue cleared");
                Ok(WorkOutcome::QueueCleared)
            }
        }
    }

    /// Barcode dispatch is not wired up yet; reports the scanned value
    pub async fn scan_barcode(&self, station_id: Uuid, barcode: &str) -> AppResult<()> {
        let _ = self.store.get_station(station_id).await?;
        Err(AppError::NotImplemented(format!(
            "Scanned barcode: {barcode}"
        )))
    }

    /// Switch the station's working mode
    ///
    /// The current move line belongs to the previous mode's filter, so
    /// the pointer is cleared until the next selection.
    pub async fn switch_mode(&self, station_id: Uuid, mode: StationMode) -> AppResult<()> {
        let mut station = self.store.get_station(station_id).await?;
        if station.mode == mode {
            return Ok(());
        }
        station.mode = mode;
        station.current_move_line_id = None;
        self.store.update_station(station).await
    }

    /// Select the next task and open the fullscreen operator screen
    pub async fn open_screen(&self, station_id: Uuid) -> AppResult<UiDirective> {
        self.select_next(station_id).await?;
        Ok(UiDirective::OpenForm {
            model: "station".to_string(),
            record_id: station_id,
            fullscreen: true,
        })
    }

    /// Open the station menu dialog
    pub async fn open_menu(&self, station_id: Uuid) -> AppResult<UiDirective> {
        let station = self.store.get_station(station_id).await?;
        Ok(UiDirective::OpenModal {
            model: "station".to_string(),
            record_id: station.id,
            title: "Menu".to_string(),
        })
    }
}
