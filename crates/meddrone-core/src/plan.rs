//! Top-level planning entry point: assignment, routing, cost roll-up.

use crate::assign::assign_fleet;
use crate::config::PlannerConfig;
use crate::models::{DispatchRecord, DronePath, PlanResult, ReferenceData};
use crate::router::route_dispatches;

/// Plan one batch of dispatches against the given reference data.
///
/// Stateless and total: malformed or missing reference data degrades to
/// fallback defaults, unreachable goals degrade to partial routes, and
/// an empty batch short-circuits to the zero result. The function never
/// fails.
pub fn plan(
    dispatches: &[DispatchRecord],
    reference: &ReferenceData,
    config: &PlannerConfig,
) -> PlanResult {
    if dispatches.is_empty() {
        return PlanResult::empty();
    }

    let fleet = assign_fleet(dispatches, reference, config);

    let mut total_cost = 0.0;
    let mut total_moves: u32 = 0;
    let mut drone_paths = Vec::new();

    for point_plan in &fleet {
        let base = point_plan.service_point.location;
        for assignment in &point_plan.assignments {
            let route = route_dispatches(
                base,
                &assignment.dispatches,
                &reference.restricted_areas,
                config,
            );

            let capability = &assignment.slot.capability;
            let cost = capability.cost_initial
                + f64::from(route.moves) * capability.cost_per_move
                + capability.cost_final;

            tracing::debug!(
                drone_id = %assignment.slot.drone_id,
                deliveries = assignment.dispatches.len(),
                moves = route.moves,
                cost,
                "routed drone"
            );

            total_cost += cost;
            total_moves += route.moves;
            drone_paths.push(DronePath {
                drone_id: assignment.slot.drone_id.clone(),
                service_point: base,
                deliveries: route.deliveries,
                path: route.path,
                total_moves: route.moves,
            });
        }
    }

    tracing::info!(
        dispatches = dispatches.len(),
        drones = drone_paths.len(),
        total_moves,
        total_cost,
        "planned dispatch batch"
    );

    PlanResult {
        total_cost,
        total_moves,
        drone_paths,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Capability, Coordinate, Drone, Requirements, ServicePoint};

    fn c(lng: f64, lat: f64) -> Coordinate {
        Coordinate::new(lng, lat)
    }

    fn reference_with_one_drone() -> ReferenceData {
        ReferenceData {
            drones: vec![Drone {
                id: "d1".into(),
                name: "Falcon".into(),
                capability: Some(Capability {
                    cooling: true,
                    heating: false,
                    capacity: 10.0,
                    max_moves: 100_000,
                    cost_per_move: 0.001,
                    cost_initial: 0.1,
                    cost_final: 0.1,
                    availability: Vec::new(),
                }),
            }],
            service_points: vec![ServicePoint {
                id: 1,
                name: "base".into(),
                location: c(0.0, 0.0),
            }],
            restricted_areas: Vec::new(),
            availability: Vec::new(),
        }
    }

    fn dispatch(id: i64, pickup: Coordinate, delivery: Coordinate) -> DispatchRecord {
        DispatchRecord {
            id,
            date: None,
            time: None,
            pickup_name: None,
            pickup_location: Some(pickup),
            delivery_location: Some(delivery),
            requirements: None,
        }
    }

    #[test]
    fn empty_batch_yields_zero_result() {
        let result = plan(
            &[],
            &reference_with_one_drone(),
            &PlannerConfig::default(),
        );
        assert_eq!(result.total_cost, 0.0);
        assert_eq!(result.total_moves, 0);
        assert!(result.drone_paths.is_empty());
    }

    #[test]
    fn single_dispatch_produces_one_drone_path_with_cost() {
        let reference = reference_with_one_drone();
        let result = plan(
            &[dispatch(1, c(0.001, 0.0), c(0.001, 0.001))],
            &reference,
            &PlannerConfig::default(),
        );

        assert_eq!(result.drone_paths.len(), 1);
        let drone = &result.drone_paths[0];
        assert_eq!(drone.drone_id, "d1");
        assert_eq!(drone.service_point, c(0.0, 0.0));
        assert_eq!(drone.deliveries.len(), 1);
        assert_eq!(drone.deliveries[0].delivery_id, 1);
        assert_eq!(result.total_moves, drone.total_moves);

        let expected = 0.1 + f64::from(drone.total_moves) * 0.001 + 0.1;
        assert!((result.total_cost - expected).abs() < 1e-9);
    }

    #[test]
    fn conflicting_time_slots_route_to_two_drone_ids() {
        let mut reference = reference_with_one_drone();
        reference.drones.push(Drone {
            id: "d2".into(),
            name: "Osprey".into(),
            capability: reference.drones[0].capability.clone(),
        });

        let mut a = dispatch(1, c(0.001, 0.0), c(0.001, 0.001));
        let mut b = dispatch(2, c(0.002, 0.0), c(0.002, 0.001));
        a.date = Some("2025-02-03".into());
        a.time = Some("09:30".into());
        b.date = Some("2025-02-03".into());
        b.time = Some("09:30".into());

        let result = plan(&[a, b], &reference, &PlannerConfig::default());
        assert_eq!(result.drone_paths.len(), 2);
        assert_ne!(result.drone_paths[0].drone_id, result.drone_paths[1].drone_id);
    }

    #[test]
    fn missing_reference_data_degrades_to_defaults() {
        let config = PlannerConfig::default();
        let base = config.fallback_location;
        let near = c(base.lng + 0.001, base.lat);
        let result = plan(
            &[dispatch(1, near, near)],
            &ReferenceData::default(),
            &config,
        );

        assert_eq!(result.drone_paths.len(), 1);
        let drone = &result.drone_paths[0];
        assert_eq!(drone.service_point, base);
        // Virtual slot carries the configured default cost figures.
        let expected = config.default_cost_initial
            + f64::from(drone.total_moves) * config.default_cost_per_move
            + config.default_cost_final;
        assert!((result.total_cost - expected).abs() < 1e-9);
    }

    #[test]
    fn cooling_dispatch_never_lands_on_heating_only_drone() {
        let mut reference = reference_with_one_drone();
        if let Some(cap) = reference.drones[0].capability.as_mut() {
            cap.cooling = false;
            cap.heating = true;
        }
        let mut d = dispatch(1, c(0.001, 0.0), c(0.001, 0.001));
        d.requirements = Some(Requirements {
            capacity: 1.0,
            cooling: Some(true),
            heating: None,
            max_cost: None,
        });

        let result = plan(&[d], &reference, &PlannerConfig::default());
        assert_eq!(result.drone_paths.len(), 1);
        assert_ne!(result.drone_paths[0].drone_id, "d1");
    }
}
