//! Operator station workflow tests
//!
//! Covers pending-work filters and counters, creation-order task
//! selection, the pick completion flow, and the explicit failures for
//! the workflows that are not implemented.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::models::{Location, MoveLine, Station, StationMode};
use shared::types::{UiDirective, WorkOutcome, QUEUE_CLEARED_MESSAGE};
use vertical_lift_engine::config::NamingConfig;
use vertical_lift_engine::error::AppError;
use vertical_lift_engine::services::location::{NewLocation, NewTrayType};
use vertical_lift_engine::services::{LocationService, StationService};
use vertical_lift_engine::store::{MemoryStore, StockStore};

struct Lift {
    view: Location,
    cells: Vec<Location>,
}

fn services() -> (StationService<MemoryStore>, LocationService<MemoryStore>, MemoryStore) {
    let store = MemoryStore::new();
    let stations = StationService::new(store.clone());
    let locations = LocationService::new(store.clone(), NamingConfig::default());
    (stations, locations, store)
}

/// One complete lift: view -> shuttle -> 1x2 tray with two cells
async fn seed_lift(
    locations: &LocationService<MemoryStore>,
    store: &MemoryStore,
    label: &str,
) -> Lift {
    let view = locations
        .create_location(NewLocation::view(format!("{label} lift")))
        .await
        .unwrap();
    let shuttle = locations
        .create_location(NewLocation::child_of(format!("{label} shuttle"), view.id))
        .await
        .unwrap();
    let tray_type = locations
        .create_tray_type(NewTrayType {
            name: format!("{label} tray 1x2"),
            code: format!("{label}-1x2"),
            rows: 1,
            cols: 2,
        })
        .await
        .unwrap();
    let mut input = NewLocation::child_of(format!("{label} tray"), shuttle.id);
    input.tray_type_id = Some(tray_type.id);
    let tray = locations.create_location(input).await.unwrap();
    let cells = store.child_locations(tray.id).await.unwrap();
    Lift { view, cells }
}

/// A plain location outside any lift, used as the other end of a move
async fn seed_staging(store: &MemoryStore) -> Location {
    store
        .insert_location(Location::new("Staging", None))
        .await
        .unwrap()
}

/// Insert an assigned move line created `age_secs` seconds ago
async fn seed_line(
    store: &MemoryStore,
    source: Uuid,
    dest: Uuid,
    age_secs: i64,
) -> MoveLine {
    let mut line = MoveLine::new(Uuid::new_v4(), Decimal::from(5), source, dest);
    line.created_at = Utc::now() - Duration::seconds(age_secs);
    store.insert_move_line(line).await.unwrap()
}

async fn seed_station(
    store: &MemoryStore,
    name: &str,
    mode: StationMode,
    location_id: Uuid,
) -> Station {
    store
        .insert_station(Station::new(name, mode, location_id))
        .await
        .unwrap()
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[tokio::test]
    async fn test_pick_filter_scoped_to_station_subtree() {
        let (stations, locations, store) = services();
        let lift_a = seed_lift(&locations, &store, "A").await;
        let lift_b = seed_lift(&locations, &store, "B").await;
        let staging = seed_staging(&store).await;

        let in_scope = seed_line(&store, lift_a.cells[0].id, staging.id, 10).await;
        seed_line(&store, lift_b.cells[0].id, staging.id, 10).await;

        let station = seed_station(&store, "Station A", StationMode::Pick, lift_a.view.id).await;

        assert_eq!(stations.count_pending(station.id).await.unwrap(), 1);
        let next = stations.select_next(station.id).await.unwrap().unwrap();
        assert_eq!(next.id, in_scope.id);
    }

    #[tokio::test]
    async fn test_put_filter_matches_destination() {
        let (stations, locations, store) = services();
        let lift = seed_lift(&locations, &store, "A").await;
        let staging = seed_staging(&store).await;

        // inbound to the lift, not outbound from it
        seed_line(&store, staging.id, lift.cells[0].id, 10).await;

        let put = seed_station(&store, "Put station", StationMode::Put, lift.view.id).await;
        let pick = seed_station(&store, "Pick station", StationMode::Pick, lift.view.id).await;

        assert_eq!(stations.count_pending(put.id).await.unwrap(), 1);
        assert_eq!(stations.count_pending(pick.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_count_pending_all_covers_every_station() {
        let (stations, locations, store) = services();
        let lift_a = seed_lift(&locations, &store, "A").await;
        let lift_b = seed_lift(&locations, &store, "B").await;
        let staging = seed_staging(&store).await;

        seed_line(&store, lift_a.cells[0].id, staging.id, 10).await;
        seed_line(&store, lift_b.cells[0].id, staging.id, 10).await;

        let station_a = seed_station(&store, "A", StationMode::Pick, lift_a.view.id).await;
        seed_station(&store, "B", StationMode::Pick, lift_b.view.id).await;

        let own = stations.count_pending(station_a.id).await.unwrap();
        let all = stations.count_pending_all(StationMode::Pick).await.unwrap();
        assert_eq!(own, 1);
        assert_eq!(all, 2);
    }

    #[tokio::test]
    async fn test_select_next_takes_oldest_line_first() {
        let (stations, locations, store) = services();
        let lift = seed_lift(&locations, &store, "A").await;
        let staging = seed_staging(&store).await;

        // inserted newest first to rule out insertion-order luck
        seed_line(&store, lift.cells[0].id, staging.id, 10).await;
        let oldest = seed_line(&store, lift.cells[1].id, staging.id, 300).await;

        let station = seed_station(&store, "A", StationMode::Pick, lift.view.id).await;
        let next = stations.select_next(station.id).await.unwrap().unwrap();
        assert_eq!(next.id, oldest.id);

        let station = store.get_station(station.id).await.unwrap();
        assert_eq!(station.current_move_line_id, Some(oldest.id));
    }

    #[tokio::test]
    async fn test_pick_flow_completes_and_clears_queue() {
        let (stations, locations, store) = services();
        let lift = seed_lift(&locations, &store, "A").await;
        let staging = seed_staging(&store).await;
        let line = seed_line(&store, lift.cells[0].id, staging.id, 10).await;
        let station = seed_station(&store, "A", StationMode::Pick, lift.view.id).await;

        let directive = stations.open_screen(station.id).await.unwrap();
        assert!(matches!(
            directive,
            UiDirective::OpenForm {
                fullscreen: true,
                ..
            }
        ));

        let outcome = stations.process_and_advance(station.id).await.unwrap();
        assert!(matches!(outcome, WorkOutcome::QueueCleared));
        match outcome.directive() {
            Some(UiDirective::Celebration { message }) => {
                assert_eq!(message, QUEUE_CLEARED_MESSAGE);
            }
            other => panic!("expected celebration, got {:?}", other),
        }

        let line = store.get_move_line(line.id).await.unwrap();
        assert_eq!(line.state, shared::models::MoveLineState::Done);
        assert_eq!(line.done_qty, Decimal::from(5));

        let station = store.get_station(station.id).await.unwrap();
        assert_eq!(station.current_move_line_id, None);
        assert_eq!(stations.count_pending(station.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_process_and_advance_moves_to_next_task() {
        let (stations, locations, store) = services();
        let lift = seed_lift(&locations, &store, "A").await;
        let staging = seed_staging(&store).await;
        seed_line(&store, lift.cells[0].id, staging.id, 300).await;
        let second = seed_line(&store, lift.cells[1].id, staging.id, 10).await;
        let station = seed_station(&store, "A", StationMode::Pick, lift.view.id).await;

        stations.select_next(station.id).await.unwrap();
        let outcome = stations.process_and_advance(station.id).await.unwrap();
        match outcome {
            WorkOutcome::NextTask(line) => assert_eq!(line.id, second.id),
            WorkOutcome::QueueCleared => panic!("expected a next task"),
        }

        let station = store.get_station(station.id).await.unwrap();
        assert_eq!(station.current_move_line_id, Some(second.id));
    }

    #[tokio::test]
    async fn test_complete_without_current_line_fails() {
        let (stations, locations, store) = services();
        let lift = seed_lift(&locations, &store, "A").await;
        let station = seed_station(&store, "A", StationMode::Pick, lift.view.id).await;

        let err = stations.complete_current(station.id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidStateTransition(_)));
    }

    #[tokio::test]
    async fn test_completed_line_cannot_be_completed_twice() {
        let (stations, locations, store) = services();
        let lift = seed_lift(&locations, &store, "A").await;
        let staging = seed_staging(&store).await;
        seed_line(&store, lift.cells[0].id, staging.id, 10).await;
        let station = seed_station(&store, "A", StationMode::Pick, lift.view.id).await;

        stations.select_next(station.id).await.unwrap();
        stations.complete_current(station.id).await.unwrap();
        // the pointer still references the now-done line
        let err = stations.complete_current(station.id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidStateTransition(_)));
    }

    #[tokio::test]
    async fn test_put_completion_not_implemented() {
        let (stations, locations, store) = services();
        let lift = seed_lift(&locations, &store, "A").await;
        let staging = seed_staging(&store).await;
        let line = seed_line(&store, staging.id, lift.cells[0].id, 10).await;
        let station = seed_station(&store, "Put", StationMode::Put, lift.view.id).await;

        let selected = stations.select_next(station.id).await.unwrap().unwrap();
        assert_eq!(selected.id, line.id);

        let err = stations.complete_current(station.id).await.unwrap_err();
        assert_eq!(err.code(), "NOT_IMPLEMENTED");
    }

    #[tokio::test]
    async fn test_inventory_mode_fails_closed() {
        let (stations, locations, store) = services();
        let lift = seed_lift(&locations, &store, "A").await;
        let station = seed_station(&store, "Inv", StationMode::Inventory, lift.view.id).await;

        let err = stations.count_pending(station.id).await.unwrap_err();
        assert_eq!(err.code(), "NOT_IMPLEMENTED");
        let err = stations.select_next(station.id).await.unwrap_err();
        assert_eq!(err.code(), "NOT_IMPLEMENTED");
    }

    #[tokio::test]
    async fn test_scan_barcode_reports_scanned_value() {
        let (stations, locations, store) = services();
        let lift = seed_lift(&locations, &store, "A").await;
        let station = seed_station(&store, "A", StationMode::Pick, lift.view.id).await;

        let err = stations
            .scan_barcode(station.id, "4006381333931")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_IMPLEMENTED");
        assert!(err.to_string().contains("4006381333931"));
    }

    #[tokio::test]
    async fn test_switch_mode_clears_current_line() {
        let (stations, locations, store) = services();
        let lift = seed_lift(&locations, &store, "A").await;
        let staging = seed_staging(&store).await;
        seed_line(&store, lift.cells[0].id, staging.id, 10).await;
        let station = seed_station(&store, "A", StationMode::Pick, lift.view.id).await;

        stations.select_next(station.id).await.unwrap();
        stations
            .switch_mode(station.id, StationMode::Put)
            .await
            .unwrap();

        let station = store.get_station(station.id).await.unwrap();
        assert_eq!(station.mode, StationMode::Put);
        assert_eq!(station.current_move_line_id, None);
    }

    #[tokio::test]
    async fn test_switch_mode_to_same_mode_keeps_current_line() {
        let (stations, locations, store) = services();
        let lift = seed_lift(&locations, &store, "A").await;
        let staging = seed_staging(&store).await;
        let line = seed_line(&store, lift.cells[0].id, staging.id, 10).await;
        let station = seed_station(&store, "A", StationMode::Pick, lift.view.id).await;

        stations.select_next(station.id).await.unwrap();
        stations
            .switch_mode(station.id, StationMode::Pick)
            .await
            .unwrap();

        let station = store.get_station(station.id).await.unwrap();
        assert_eq!(station.current_move_line_id, Some(line.id));
    }

    #[tokio::test]
    async fn test_open_menu_directive() {
        let (stations, locations, store) = services();
        let lift = seed_lift(&locations, &store, "A").await;
        let station = seed_station(&store, "A", StationMode::Pick, lift.view.id).await;

        let directive = stations.open_menu(station.id).await.unwrap();
        match directive {
            UiDirective::OpenModal {
                record_id, title, ..
            } => {
                assert_eq!(record_id, station.id);
                assert_eq!(title, "Menu");
            }
            other => panic!("expected open_modal, got {:?}", other),
        }
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        /// A station never counts more than the mode-wide total, and both
        /// counters see exactly the lines placed under their subtrees
        #[test]
        fn prop_pending_counters_agree(in_scope in 0usize..5, out_of_scope in 0usize..5) {
            tokio_test::block_on(async {
                let (stations, locations, store) = services();
                let lift_a = seed_lift(&locations, &store, "A").await;
                let lift_b = seed_lift(&locations, &store, "B").await;
                let staging = seed_staging(&store).await;

                for _ in 0..in_scope {
                    seed_line(&store, lift_a.cells[0].id, staging.id, 10).await;
                }
                for _ in 0..out_of_scope {
                    seed_line(&store, lift_b.cells[0].id, staging.id, 10).await;
                }

                let station = seed_station(&store, "A", StationMode::Pick, lift_a.view.id).await;
                seed_station(&store, "B", StationMode::Pick, lift_b.view.id).await;

                let own = stations.count_pending(station.id).await.unwrap();
                let all = stations.count_pending_all(StationMode::Pick).await.unwrap();
                assert_eq!(own, in_scope as u64);
                assert_eq!(all, (in_scope + out_of_scope) as u64);
                assert!(own <= all);
            });
        }

        /// Completing a pick always confirms exactly the demanded quantity
        #[test]
        fn prop_pick_confirms_demanded_quantity(qty in 1u32..10_000) {
            tokio_test::block_on(async {
                let (stations, locations, store) = services();
                let lift = seed_lift(&locations, &store, "A").await;
                let staging = seed_staging(&store).await;

                let mut line = MoveLine::new(
                    Uuid::new_v4(),
                    Decimal::from(qty),
                    lift.cells[0].id,
                    staging.id,
                );
                line.created_at = Utc::now() - Duration::seconds(10);
                let line = store.insert_move_line(line).await.unwrap();

                let station = seed_station(&store, "A", StationMode::Pick, lift.view.id).await;
                stations.select_next(station.id).await.unwrap();
                let done = stations.complete_current(station.id).await.unwrap();
                assert_eq!(done.id, line.id);
                assert_eq!(done.done_qty, Decimal::from(qty));
            });
        }
    }
}
