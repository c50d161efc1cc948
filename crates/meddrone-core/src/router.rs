//! Dispatch router: orders a drone's dispatches and stitches the
//! individual pickup/delivery legs into one continuous flight.

use crate::config::PlannerConfig;
use crate::geo::distance;
use crate::models::{Coordinate, DeliveryPath, DispatchRecord, RestrictedArea};
use crate::pathfind::find_path;

/// A drone's routed batch: per-delivery flight segments for reporting,
/// the combined end-to-end path for rendering, and the real move count.
#[derive(Debug, Clone)]
pub struct DroneRoute {
    pub deliveries: Vec<DeliveryPath>,
    pub path: Vec<Coordinate>,
    pub moves: u32,
}

/// Greedy nearest-neighbor ordering: from the current position, always
/// serve the dispatch whose pickup is closest, then advance to its
/// delivery location. Dispatches without a pickup keep their input
/// order at the tail.
pub fn order_by_nearest_pickup(
    dispatches: &[DispatchRecord],
    start: Coordinate,
) -> Vec<DispatchRecord> {
    if dispatches.len() <= 1 {
        return dispatches.to_vec();
    }

    let mut remaining: Vec<DispatchRecord> = dispatches.to_vec();
    let mut ordered = Vec::with_capacity(dispatches.len());
    let mut current = start;

    while !remaining.is_empty() {
        let mut nearest: Option<(usize, f64)> = None;
        for (i, dispatch) in remaining.iter().enumerate() {
            let Some(pickup) = dispatch.pickup_location else {
                continue;
            };
            let d = distance(current, pickup);
            if nearest.map_or(true, |(_, best)| d < best) {
                nearest = Some((i, d));
            }
        }

        match nearest {
            Some((i, _)) => {
                let dispatch = remaining.remove(i);
                if let Some(delivery) = dispatch.delivery_location {
                    current = delivery;
                }
                ordered.push(dispatch);
            }
            None => {
                // No dispatch left with a pickup location.
                ordered.append(&mut remaining);
            }
        }
    }

    ordered
}

/// Route one drone through its assigned dispatches.
///
/// For each dispatch in nearest-neighbor order, flies current→pickup
/// and pickup→delivery, appends a hover duplicate marking the drop,
/// then after the last dispatch returns to the service point. The
/// hover duplicate is a zero-length marker and is not counted as a
/// move unless configured otherwise.
pub fn route_dispatches(
    service_point: Coordinate,
    dispatches: &[DispatchRecord],
    zones: &[RestrictedArea],
    config: &PlannerConfig,
) -> DroneRoute {
    let ordered = order_by_nearest_pickup(dispatches, service_point);

    let mut deliveries = Vec::with_capacity(ordered.len());
    let mut combined: Vec<Coordinate> = Vec::new();
    let mut moves: u32 = 0;
    let mut current = service_point;

    for dispatch in &ordered {
        let pickup = dispatch.pickup_location.unwrap_or(config.fallback_location);
        let delivery = dispatch
            .delivery_location
            .unwrap_or(config.fallback_location);

        let to_pickup = find_path(current, pickup, zones, config);
        let to_delivery = find_path(pickup, delivery, zones, config);

        let mut segment = to_pickup;
        append_leg(&mut segment, &to_delivery);

        moves += segment_moves(&segment);

        // Hover: duplicate the drop point to mark delivery completion.
        if let Some(&last) = segment.last() {
            segment.push(last);
            if config.count_hover_as_move {
                moves += 1;
            }
        }

        append_leg(&mut combined, &segment);
        deliveries.push(DeliveryPath {
            delivery_id: dispatch.id,
            flight_path: segment,
        });

        current = delivery;
    }

    if !ordered.is_empty() && current != service_point {
        let return_leg = find_path(current, service_point, zones, config);
        moves += segment_moves(&return_leg);
        append_leg(&mut combined, &return_leg);
    }

    DroneRoute {
        deliveries,
        path: combined,
        moves,
    }
}

/// Append `leg` to `path` without duplicating the junction point.
fn append_leg(path: &mut Vec<Coordinate>, leg: &[Coordinate]) {
    let skip_first = matches!((path.last(), leg.first()), (Some(a), Some(b)) if a == b);
    let start = usize::from(skip_first);
    path.extend_from_slice(&leg[start.min(leg.len())..]);
}

/// A sequence of N points represents N-1 moves.
fn segment_moves(segment: &[Coordinate]) -> u32 {
    segment.len().saturating_sub(1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{is_close, STEP_LENGTH};

    fn c(lng: f64, lat: f64) -> Coordinate {
        Coordinate::new(lng, lat)
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
    fn nearest_neighbor_orders_by_pickup_from_current_position() {
        let base = c(0.0, 0.0);
        let far = dispatch(1, c(0.01, 0.0), c(0.02, 0.0));
        let near = dispatch(2, c(0.001, 0.0), c(0.019, 0.0));
        // After delivering `near` at 0.019, `far`'s pickup at 0.01 is
        // chosen over nothing else; order should be near, far.
        let ordered = order_by_nearest_pickup(&[far.clone(), near.clone()], base);
        assert_eq!(ordered[0].id, 2);
        assert_eq!(ordered[1].id, 1);
    }

    #[test]
    fn single_dispatch_route_has_hover_and_returns_to_base() {
        let base = c(0.0, 0.0);
        let pickup = c(0.002, 0.0);
        let delivery = c(0.002, 0.002);
        let route = route_dispatches(
            base,
            &[dispatch(7, pickup, delivery)],
            &[],
            &PlannerConfig::default(),
        );

        assert_eq!(route.deliveries.len(), 1);
        let flight = &route.deliveries[0].flight_path;
        // Hover duplicate at the end of the delivery segment.
        assert!(flight.len() >= 2);
        assert_eq!(flight[flight.len() - 1], flight[flight.len() - 2]);
        assert!(is_close(flight[flight.len() - 1], delivery));

        // Combined path starts at base and ends back near it.
        assert_eq!(route.path[0], base);
        assert!(is_close(*route.path.last().unwrap(), base));
    }

    #[test]
    fn hover_is_not_counted_as_a_move_by_default() {
        let base = c(0.0, 0.0);
        let pickup = c(0.002, 0.0);
        let delivery = c(0.002, 0.002);
        let record = dispatch(7, pickup, delivery);

        let config = PlannerConfig::default();
        let without = route_dispatches(base, std::slice::from_ref(&record), &[], &config);

        let mut counting = config.clone();
        counting.count_hover_as_move = true;
        let with = route_dispatches(base, &[record], &[], &counting);

        assert_eq!(with.moves, without.moves + 1);
    }

    #[test]
    fn move_count_matches_real_steps_not_hover_markers() {
        let base = c(0.0, 0.0);
        let pickup = c(STEP_LENGTH * 10.0, 0.0);
        let delivery = c(STEP_LENGTH * 10.0, STEP_LENGTH * 10.0);
        let route = route_dispatches(
            base,
            &[dispatch(1, pickup, delivery)],
            &[],
            &PlannerConfig::default(),
        );

        // The only zero-length pair in the combined path is the hover
        // marker; junctions between legs are deduplicated.
        let zero_length = route
            .path
            .windows(2)
            .filter(|pair| pair[0] == pair[1])
            .count();
        assert_eq!(zero_length, 1);
        assert!(route.moves > 0);
        // The hover marker is not part of the move count: total path
        // transitions exceed `moves` by exactly the hover.
        assert!(route.path.len() as u32 >= route.moves);
    }

    #[test]
    fn empty_batch_routes_to_empty_route() {
        let route = route_dispatches(c(0.0, 0.0), &[], &[], &PlannerConfig::default());
        assert!(route.deliveries.is_empty());
        assert!(route.path.is_empty());
        assert_eq!(route.moves, 0);
    }
}
