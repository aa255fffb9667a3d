//! In-memory store used by tests and as the collaborator reference

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use shared::models::{Location, MoveLine, Station, StationMode, StockQuant, TrayType};

use crate::error::{AppError, AppResult};

use super::{LocationScope, MoveLineFilter, StockStore};

#[derive(Debug, Default)]
struct StoreInner {
    locations: HashMap<Uuid, Location>,
    tray_types: HashMap<Uuid, TrayType>,
    stations: HashMap<Uuid, Station>,
    move_lines: HashMap<Uuid, MoveLine>,
    quants: HashMap<Uuid, StockQuant>,
}

impl StoreInner {
    /// Ids of `root` and all of its active descendants
    fn descendant_ids(&self, root_id: Uuid) -> HashSet<Uuid> {
        let mut members = HashSet::new();
        let mut queue = vec![root_id];
        while let Some(current) = queue.pop() {
            if !members.insert(current) {
                continue;
            }
            for location in self.locations.values() {
                if location.parent_id == Some(current) && location.active {
                    queue.push(location.id);
                }
            }
        }
        members
    }

    fn matches(&self, line: &MoveLine, filter: &MoveLineFilter) -> bool {
        if line.state != filter.state {
            return false;
        }
        let (roots, target) = match &filter.scope {
            LocationScope::SourceUnder(roots) => (roots, line.location_id),
            LocationScope::DestUnder(roots) => (roots, line.location_dest_id),
        };
        roots
            .iter()
            .any(|root| self.descendant_ids(*root).contains(&target))
    }

    fn find(&self, filter: &MoveLineFilter) -> Vec<MoveLine> {
        let mut lines: Vec<MoveLine> = self
            .move_lines
            .values()
            .filter(|line| self.matches(line, filter))
            .cloned()
            .collect();
        // Creation order, ids as deterministic tie-break
        lines.sort_by_key(|line| (line.created_at, line.id));
        lines
    }
}

/// Shared in-memory store; cloning yields handles to the same data
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StockStore for MemoryStore {
    async fn insert_location(&self, location: Location) -> AppResult<Location> {
        let mut guard = self.inner.write().unwrap();
        guard.locations.insert(location.id, location.clone());
        Ok(location)
    }

    async fn get_location(&self, id: Uuid) -> AppResult<Location> {
        let guard = self.inner.read().unwrap();
        guard
            .locations
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Location".to_string()))
    }

    async fn update_location(&self, location: Location) -> AppResult<()> {
        let mut guard = self.inner.write().unwrap();
        if !guard.locations.contains_key(&location.id) {
            return Err(AppError::NotFound("Location".to_string()));
        }
        guard.locations.insert(location.id, location);
        Ok(())
    }

    async fn child_locations(&self, parent_id: Uuid) -> AppResult<Vec<Location>> {
        let guard = self.inner.read().unwrap();
        let mut children: Vec<Location> = guard
            .locations
            .values()
            .filter(|location| location.parent_id == Some(parent_id) && location.active)
            .cloned()
            .collect();
        children.sort_by_key(|location| (location.created_at, location.id));
        Ok(children)
    }

    async fn location_descendants(&self, root_id: Uuid) -> AppResult<Vec<Location>> {
        let guard = self.inner.read().unwrap();
        if !guard.locations.contains_key(&root_id) {
            return Err(AppError::NotFound("Location".to_string()));
        }
        let ids = guard.descendant_ids(root_id);
        let mut members: Vec<Location> = ids
            .into_iter()
            .filter_map(|id| guard.locations.get(&id).cloned())
            .collect();
        members.sort_by_key(|location| (location.created_at, location.id));
        Ok(members)
    }

    async fn insert_tray_type(&self, tray_type: TrayType) -> AppResult<TrayType> {
        let mut guard = self.inner.write().unwrap();
        guard.tray_types.insert(tray_type.id, tray_type.clone());
        Ok(tray_type)
    }

    async fn get_tray_type(&self, id: Uuid) -> AppResult<TrayType> {
        let guard = self.inner.read().unwrap();
        guard
            .tray_types
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Tray type".to_string()))
    }

    async fn insert_station(&self, station: Station) -> AppResult<Station> {
        let mut guard = self.inner.write().unwrap();
        guard.stations.insert(station.id, station.clone());
        Ok(station)
    }

    async fn get_station(&self, id: Uuid) -> AppResult<Station> {
        let guard = self.inner.read().unwrap();
        guard
            .stations
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Station".to_string()))
    }

    async fn update_station(&self, station: Station) -> AppResult<()> {
        let mut guard = self.inner.write().unwrap();
        if !guard.stations.contains_key(&station.id) {
            return Err(AppError::NotFound("Station".to_string()));
        }
        guard.stations.insert(station.id, station);
        Ok(())
    }

    async fn stations_by_mode(&self, mode: StationMode) -> AppResult<Vec<Station>> {
        let guard = self.inner.read().unwrap();
        let mut stations: Vec<Station> = guard
            .stations
            .values()
            .filter(|station| station.mode == mode)
            .cloned()
            .collect();
        stations.sort_by_key(|station| (station.created_at, station.id));
        Ok(stations)
    }

    async fn insert_move_line(&self, line: MoveLine) -> AppResult<MoveLine> {
        let mut guard = self.inner.write().unwrap();
        guard.move_lines.insert(line.id, line.clone());
        Ok(line)
    }

    async fn get_move_line(&self, id: Uuid) -> AppResult<MoveLine> {
        let guard = self.inner.read().unwrap();
        guard
            .move_lines
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Move line".to_string()))
    }

    async fn update_move_line(&self, line: MoveLine) -> AppResult<()> {
        let mut guard = self.inner.write().unwrap();
        if !guard.move_lines.contains_key(&line.id) {
            return Err(AppError::NotFound("Move line".to_string()));
        }
        guard.move_lines.insert(line.id, line);
        Ok(())
    }

    async fn find_move_lines(&self, filter: &MoveLineFilter) -> AppResult<Vec<MoveLine>> {
        let guard = self.inner.read().unwrap();
        Ok(guard.find(filter))
    }

    async fn count_move_lines(&self, filter: &MoveLineFilter) -> AppResult<u64> {
        let guard = self.inner.read().unwrap();
        Ok(guard.find(filter).len() as u64)
    }

    async fn insert_quant(&self, quant: StockQuant) -> AppResult<StockQuant> {
        let mut guard = self.inner.write().unwrap();
        guard.quants.insert(quant.id, quant.clone());
        Ok(quant)
    }

    async fn quants_at(&self, location_id: Uuid) -> AppResult<Vec<StockQuant>> {
        let guard = self.inner.read().unwrap();
        Ok(guard
            .quants
            .values()
            .filter(|quant| quant.location_id == location_id)
            .cloned()
            .collect())
    }
}
