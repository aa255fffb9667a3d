//! Store abstraction over the external persistence collaborator
//!
//! The engine never owns persistence: it issues typed queries and
//! structured filters against a store provided by the host platform.
//! [`MemoryStore`] is the in-process reference implementation used by
//! the tests.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use uuid::Uuid;

use shared::models::{Location, MoveLine, MoveLineState, Station, StationMode, StockQuant, TrayType};

use crate::error::AppResult;

/// Scope of a move-line query relative to location subtrees
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationScope {
    /// Source location lies under any of the given subtree roots
    SourceUnder(Vec<Uuid>),
    /// Destination location lies under any of the given subtree roots
    DestUnder(Vec<Uuid>),
}

/// Structured filter handed to the store when querying move lines
#[derive(Debug, Clone)]
pub struct MoveLineFilter {
    pub state: MoveLineState,
    pub scope: LocationScope,
}

/// Typed record store with tree queries, the collaborator described by
/// the host platform's persistence layer
#[async_trait]
pub trait StockStore: Send + Sync {
    // --- locations ---
    async fn insert_location(&self, location: Location) -> AppResult<Location>;
    async fn get_location(&self, id: Uuid) -> AppResult<Location>;
    async fn update_location(&self, location: Location) -> AppResult<()>;
    /// Active direct children of a location
    async fn child_locations(&self, parent_id: Uuid) -> AppResult<Vec<Location>>;
    /// The location itself plus all of its active descendants
    async fn location_descendants(&self, root_id: Uuid) -> AppResult<Vec<Location>>;

    // --- tray types ---
    async fn insert_tray_type(&self, tray_type: TrayType) -> AppResult<TrayType>;
    async fn get_tray_type(&self, id: Uuid) -> AppResult<TrayType>;

    // --- stations ---
    async fn insert_station(&self, station: Station) -> AppResult<Station>;
    async fn get_station(&self, id: Uuid) -> AppResult<Station>;
    async fn update_station(&self, station: Station) -> AppResult<()>;
    async fn stations_by_mode(&self, mode: StationMode) -> AppResult<Vec<Station>>;

    // --- move lines ---
    async fn insert_move_line(&self, line: MoveLine) -> AppResult<MoveLine>;
    async fn get_move_line(&self, id: Uuid) -> AppResult<MoveLine>;
    async fn update_move_line(&self, line: MoveLine) -> AppResult<()>;
    /// Matching move lines in creation order (oldest first, id as tie-break)
    async fn find_move_lines(&self, filter: &MoveLineFilter) -> AppResult<Vec<MoveLine>>;
    async fn count_move_lines(&self, filter: &MoveLineFilter) -> AppResult<u64>;

    // --- quants ---
    async fn insert_quant(&self, quant: StockQuant) -> AppResult<StockQuant>;
    async fn quants_at(&self, location_id: Uuid) -> AppResult<Vec<StockQuant>>;
}
