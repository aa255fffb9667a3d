//! Tray geometry: location kinds, cell generation, occupancy grids
//!
//! Maintains the View -> Shuttle -> Tray -> Cell hierarchy, regenerates a
//! tray's cells when its tray type changes, and builds the occupancy grid
//! the operator screen renders.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use shared::models::{LiftKind, Location, StockQuant, TrayMatrix, TrayType};
use shared::types::UiDirective;
use shared::validation::{
    validate_axis_prefix, validate_cell_coords, validate_tray_dimensions, validate_xy_padding,
};

use crate::config::NamingConfig;
use crate::error::{AppError, AppResult};
use crate::store::StockStore;

/// Input for creating a location
#[derive(Debug, Clone, Deserialize)]
pub struct NewLocation {
    pub name: String,
    pub parent_id: Option<Uuid>,
    /// Marks the root of a vertical-lift subtree
    pub is_lift_view: bool,
    pub tray_type_id: Option<Uuid>,
    pub posz: u32,
    pub company_id: Option<Uuid>,
}

impl NewLocation {
    pub fn child_of(name: impl Into<String>, parent_id: Uuid) -> Self {
        Self {
            name: name.into(),
            parent_id: Some(parent_id),
            is_lift_view: false,
            tray_type_id: None,
            posz: 0,
            company_id: None,
        }
    }

    pub fn view(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_id: None,
            is_lift_view: true,
            tray_type_id: None,
            posz: 0,
            company_id: None,
        }
    }
}

/// Input for creating a tray type
#[derive(Debug, Clone, Deserialize)]
pub struct NewTrayType {
    pub name: String,
    pub code: String,
    pub rows: u32,
    pub cols: u32,
}

/// Tray geometry service over a stock store
#[derive(Clone)]
pub struct LocationService<S> {
    store: S,
    naming: NamingConfig,
}

impl<S: StockStore> LocationService<S> {
    pub fn new(store: S, naming: NamingConfig) -> Self {
        Self { store, naming }
    }

    /// Kind derived from the explicit view flag or the parent's kind
    fn derive_kind(is_lift_view: bool, parent_kind: Option<LiftKind>) -> Option<LiftKind> {
        if is_lift_view {
            Some(LiftKind::View)
        } else {
            parent_kind.and_then(LiftKind::child)
        }
    }

    /// Create a location; trays with a tray type get their cells generated
    pub async fn create_location(&self, input: NewLocation) -> AppResult<Location> {
        validate_axis_prefix(&self.naming.x_prefix)
            .and_then(|_| validate_axis_prefix(&self.naming.y_prefix))
            .and_then(|_| validate_xy_padding(self.naming.xy_padding))
            .map_err(|message| AppError::Configuration(message.to_string()))?;

        let parent_kind = match input.parent_id {
            Some(parent_id) => self.store.get_location(parent_id).await?.kind,
            None => None,
        };
        if let Some(tray_type_id) = input.tray_type_id {
            // fail before inserting anything
            self.store.get_tray_type(tray_type_id).await?;
        }

        let mut location = Location::new(input.name, input.parent_id);
        location.is_lift_view = input.is_lift_view;
        location.kind = Self::derive_kind(input.is_lift_view, parent_kind);
        location.tray_type_id = input.tray_type_id;
        location.posz = input.posz;
        location.company_id = input.company_id;
        location.x_prefix = self.naming.x_prefix.clone();
        location.y_prefix = self.naming.y_prefix.clone();
        location.xy_padding = self.naming.xy_padding;
        location.y_first = self.naming.y_first;

        let location = self.store.insert_location(location).await?;
        tracing::debug!(location = %location.id, kind = ?location.kind, "created location");
        if location.kind == Some(LiftKind::Tray) && location.tray_type_id.is_some() {
            self.regenerate_cells(location.id).await?;
        }
        Ok(location)
    }

    /// Create a tray type after validating its layout
    pub async fn create_tray_type(&self, input: NewTrayType) -> AppResult<TrayType> {
        validate_tray_dimensions(input.rows, input.cols).map_err(|message| {
            AppError::Validation {
                field: "rows/cols".to_string(),
                message: message.to_string(),
            }
        })?;
        let tray_type = TrayType {
            id: Uuid::new_v4(),
            name: input.name,
            code: input.code,
            rows: input.rows,
            cols: input.cols,
        };
        self.store.insert_tray_type(tray_type).await
    }

    /// Move a location under a new parent, re-deriving kinds top-down
    pub async fn reparent(
        &self,
        location_id: Uuid,
        new_parent_id: Option<Uuid>,
    ) -> AppResult<Location> {
        let mut location = self.store.get_location(location_id).await?;
        let parent_kind = match new_parent_id {
            Some(parent_id) => self.store.get_location(parent_id).await?.kind,
            None => None,
        };
        location.parent_id = new_parent_id;
        location.kind = Self::derive_kind(location.is_lift_view, parent_kind);
        self.store.update_location(location.clone()).await?;
        self.refresh_child_kinds(&location).await?;
        Ok(location)
    }

    /// Recompute derived kinds below a location, breadth-first
    async fn refresh_child_kinds(&self, root: &Location) -> AppResult<()> {
        let mut queue = vec![(root.id, root.kind)];
        while let Some((parent_id, parent_kind)) = queue.pop() {
            for mut child in self.store.child_locations(parent_id).await? {
                let kind = Self::derive_kind(child.is_lift_view, parent_kind);
                if kind != child.kind {
                    child.kind = kind;
                    self.store.update_location(child.clone()).await?;
                }
                queue.push((child.id, kind));
            }
        }
        Ok(())
    }

    fn quants_hold_stock(quants: &[StockQuant]) -> bool {
        quants.iter().any(|quant| quant.quantity > Decimal::ZERO)
    }

    async fn cell_contains_stock(&self, location: &Location) -> AppResult<bool> {
        if location.kind != Some(LiftKind::Cell) {
            return Ok(false);
        }
        let quants = self.store.quants_at(location.id).await?;
        Ok(Self::quants_hold_stock(&quants))
    }

    /// True when a cell location holds any positive stock quantity
    pub async fn contains_stock(&self, location_id: Uuid) -> AppResult<bool> {
        let location = self.store.get_location(location_id).await?;
        self.cell_contains_stock(&location).await
    }

    /// Assign or clear a tray's tray type, regenerating its cells
    pub async fn set_tray_type(
        &self,
        tray_id: Uuid,
        tray_type_id: Option<Uuid>,
    ) -> AppResult<()> {
        let mut tray = self.store.get_location(tray_id).await?;
        if tray.kind != Some(LiftKind::Tray) {
            return Err(AppError::Validation {
                field: "tray_type_id".to_string(),
                message: format!("location {} is not a tray", tray.name),
            });
        }
        if tray.tray_type_id == tray_type_id {
            return Ok(());
        }
        if let Some(id) = tray_type_id {
            self.store.get_tray_type(id).await?;
        }
        tray.tray_type_id = tray_type_id;
        self.store.update_location(tray).await?;
        self.regenerate_cells(tray_id).await
    }

    /// Push a new depth coordinate down to the tray's cells
    pub async fn set_depth(&self, tray_id: Uuid, posz: u32) -> AppResult<()> {
        let mut tray = self.store.get_location(tray_id).await?;
        tray.posz = posz;
        self.store.update_location(tray.clone()).await?;
        if tray.kind == Some(LiftKind::Tray) {
            for mut cell in self.store.child_locations(tray_id).await? {
                cell.posz = posz;
                self.store.update_location(cell).await?;
            }
        }
        Ok(())
    }

    /// Replace a tray's cells after its tray type changed
    ///
    /// Existing cells are archived before new ones are created; a stocked
    /// cell blocks the whole operation with no partial effect.
    pub async fn regenerate_cells(&self, tray_id: Uuid) -> AppResult<()> {
        let tray = self.store.get_location(tray_id).await?;
        if tray.kind != Some(LiftKind::Tray) {
            return Ok(());
        }

        match self.deactivate_children(&tray).await {
            Ok(()) => {}
            Err(AppError::Validation { .. }) => {
                // contextual message for the tray-type change
                return Err(AppError::Conflict {
                    resource: "location".to_string(),
                    message: "Vertical lift trays cannot be modified when they contain products"
                        .to_string(),
                });
            }
            Err(err) => return Err(err),
        }

        let Some(tray_type_id) = tray.tray_type_id else {
            return Ok(());
        };
        let tray_type = self.store.get_tray_type(tray_type_id).await?;
        for row in 1..=tray_type.rows {
            for col in 1..=tray_type.cols {
                let mut cell = Location::new(tray.cell_name(col, row), Some(tray.id));
                cell.kind = Some(LiftKind::Cell);
                cell.posx = col;
                cell.posy = row;
                cell.posz = tray.posz;
                cell.company_id = tray.company_id;
                cell.x_prefix = tray.x_prefix.clone();
                cell.y_prefix = tray.y_prefix.clone();
                cell.xy_padding = tray.xy_padding;
                cell.y_first = tray.y_first;
                self.store.insert_location(cell).await?;
            }
        }
        tracing::debug!(
            tray = %tray.id,
            rows = tray_type.rows,
            cols = tray_type.cols,
            "regenerated tray cells"
        );
        Ok(())
    }

    /// Archive all direct children of a tray; guards run before any write
    async fn deactivate_children(&self, tray: &Location) -> AppResult<()> {
        let children = self.store.child_locations(tray.id).await?;
        for child in &children {
            self.guard_deactivation(child).await?;
        }
        for mut child in children {
            child.active = false;
            self.store.update_location(child).await?;
        }
        Ok(())
    }

    /// Reject deactivation while any gathered member still holds stock
    ///
    /// Cells check themselves; trays, shuttles, and views check their
    /// whole subtree.
    async fn guard_deactivation(&self, location: &Location) -> AppResult<()> {
        let Some(kind) = location.kind else {
            return Ok(());
        };
        let members = match kind {
            LiftKind::Cell => vec![location.clone()],
            _ => self.gather_subtree(location).await?,
        };
        for member in &members {
            if self.cell_contains_stock(member).await? {
                return Err(AppError::Validation {
                    field: "active".to_string(),
                    message: format!(
                        "Vertical lift locations cannot be archived when they contain products \
                         (cell {} holds stock)",
                        member.name
                    ),
                });
            }
        }
        Ok(())
    }

    async fn gather_subtree(&self, location: &Location) -> AppResult<Vec<Location>> {
        let mut members = self.store.location_descendants(location.id).await?;
        // an already-archived root is excluded from descendant queries
        if !members.iter().any(|member| member.id == location.id) {
            members.push(location.clone());
        }
        Ok(members)
    }

    /// Archive a location after the stock guard passes
    pub async fn deactivate(&self, location_id: Uuid) -> AppResult<()> {
        let location = self.store.get_location(location_id).await?;
        self.guard_deactivation(&location).await?;
        let targets = match location.kind {
            Some(LiftKind::Cell) | None => vec![location.clone()],
            Some(_) => self.gather_subtree(&location).await?,
        };
        for mut target in targets {
            target.active = false;
            self.store.update_location(target).await?;
        }
        tracing::info!(location = %location.id, "archived location subtree");
        Ok(())
    }

    /// Occupancy grid for a tray, or for the tray owning a cell
    ///
    /// Starts from the tray type's all-empty base pattern and marks every
    /// stocked child cell. `selected` carries the cell's own zero-based
    /// coordinates when queried on a cell, and stays empty on a tray.
    pub async fn tray_matrix(&self, location_id: Uuid) -> AppResult<TrayMatrix> {
        let location = self.store.get_location(location_id).await?;
        let tray = self.owning_tray(&location).await?;
        let tray_type_id = tray.tray_type_id.ok_or_else(|| AppError::Validation {
            field: "tray_type_id".to_string(),
            message: format!("tray {} has no tray type", tray.name),
        })?;
        let tray_type = self.store.get_tray_type(tray_type_id).await?;

        let mut cells = tray_type.base_matrix();
        for cell in self.store.child_locations(tray.id).await? {
            // children without grid coordinates (or outside the current
            // layout) never appear on the grid
            if validate_cell_coords(&tray_type, cell.posx, cell.posy).is_err() {
                continue;
            }
            if self.cell_contains_stock(&cell).await? {
                cells[cell.posy as usize - 1][cell.posx as usize - 1] = 1;
            }
        }
        let selected = if location.kind == Some(LiftKind::Cell)
            && validate_cell_coords(&tray_type, location.posx, location.posy).is_ok()
        {
            vec![location.posx - 1, location.posy - 1]
        } else {
            Vec::new()
        };
        Ok(TrayMatrix { selected, cells })
    }

    /// Resolve a zero-based grid click to the underlying cell's form view
    pub async fn cell_from_click(
        &self,
        location_id: Uuid,
        coord_x: u32,
        coord_y: u32,
    ) -> AppResult<UiDirective> {
        let location = self.store.get_location(location_id).await?;
        let tray = self.owning_tray(&location).await?;
        if let Some(tray_type_id) = tray.tray_type_id {
            let tray_type = self.store.get_tray_type(tray_type_id).await?;
            validate_cell_coords(&tray_type, coord_x + 1, coord_y + 1)
                .map_err(|_| AppError::NotFound("Cell".to_string()))?;
        }
        // positions arrive counting from 0 but are stored counting from 1
        let cell = self
            .store
            .child_locations(tray.id)
            .await?
            .into_iter()
            .find(|cell| cell.posx == coord_x + 1 && cell.posy == coord_y + 1)
            .ok_or_else(|| AppError::NotFound("Cell".to_string()))?;
        Ok(UiDirective::OpenForm {
            model: "location".to_string(),
            record_id: cell.id,
            fullscreen: false,
        })
    }

    /// The tray itself, or a cell's parent tray
    async fn owning_tray(&self, location: &Location) -> AppResult<Location> {
        match location.kind {
            Some(LiftKind::Tray) => Ok(location.clone()),
            Some(LiftKind::Cell) => {
                let parent_id = location
                    .parent_id
                    .ok_or_else(|| AppError::NotFound("Tray".to_string()))?;
                self.store.get_location(parent_id).await
            }
            _ => Err(AppError::Validation {
                field: "kind".to_string(),
                message: format!(
                    "tray geometry is only defined for tray and cell locations, not {}",
                    location.name
                ),
            }),
        }
    }
}
