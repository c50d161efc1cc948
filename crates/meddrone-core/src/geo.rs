//! Planar geometry in coordinate-degree space.
//!
//! The planner treats (lng, lat) as a flat 2D plane: distances are
//! Euclidean in degrees, not geodesic. At delivery scale (step length
//! 0.00015°, ~16 m) the distortion is irrelevant and the arithmetic
//! stays exactly reproducible.

use crate::models::Coordinate;

/// Length of one drone move, in degrees.
pub const STEP_LENGTH: f64 = 0.00015;

/// Two points closer than this are "the same place" for the planner.
/// Deliberately equal to [`STEP_LENGTH`]: "close enough" and "one step
/// away" coincide.
pub const CLOSE_THRESHOLD: f64 = 0.00015;

/// The 16 legal headings, degrees counter-clockwise from East.
pub const COMPASS: [f64; 16] = [
    0.0, 22.5, 45.0, 67.5, 90.0, 112.5, 135.0, 157.5, 180.0, 202.5, 225.0, 247.5, 270.0, 292.5,
    315.0, 337.5,
];

/// Euclidean distance in degree space.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let dlng = a.lng - b.lng;
    let dlat = a.lat - b.lat;
    (dlng * dlng + dlat * dlat).sqrt()
}

pub fn is_close(a: Coordinate, b: Coordinate) -> bool {
    distance(a, b) < CLOSE_THRESHOLD
}

/// The position one step from `p` along `angle_deg` (0° = East, 90° = North).
pub fn step(p: Coordinate, angle_deg: f64) -> Coordinate {
    let theta = angle_deg.to_radians();
    Coordinate {
        lng: p.lng + STEP_LENGTH * theta.cos(),
        lat: p.lat + STEP_LENGTH * theta.sin(),
    }
}

/// Heading from `from` to `to` in degrees counter-clockwise from East,
/// normalized to [0, 360).
pub fn heading(from: Coordinate, to: Coordinate) -> f64 {
    let deg = (to.lat - from.lat).atan2(to.lng - from.lng).to_degrees();
    deg.rem_euclid(360.0)
}

/// The compass direction closest to `angle_deg` (absolute angular difference).
pub fn nearest_compass(angle_deg: f64) -> f64 {
    let mut best = COMPASS[0];
    let mut best_diff = f64::INFINITY;
    for &dir in &COMPASS {
        let diff = angular_difference(dir, angle_deg);
        if diff < best_diff {
            best_diff = diff;
            best = dir;
        }
    }
    best
}

/// Smallest absolute difference between two headings, in [0, 180].
pub fn angular_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    diff.min(360.0 - diff)
}

/// Grid key for node deduplication: coordinates rounded to 6 decimal
/// digits (~0.11 m) so floating-point jitter collapses into one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridKey {
    lng_e6: i64,
    lat_e6: i64,
}

pub fn grid_key(p: Coordinate) -> GridKey {
    GridKey {
        lng_e6: (p.lng * 1e6).round() as i64,
        lat_e6: (p.lat * 1e6).round() as i64,
    }
}

/// Even-odd ray-casting containment test.
///
/// Handles both explicitly closed rings (first == last; the duplicated
/// closing vertex is skipped) and open vertex lists (wraps the last
/// edge around).
pub fn point_in_polygon(p: Coordinate, ring: &[Coordinate]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let closed = ring.first() == ring.last();
    let n = if closed { ring.len() - 1 } else { ring.len() };
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let vi = ring[i];
        let vj = ring[j];
        let crosses = (vi.lat > p.lat) != (vj.lat > p.lat)
            && p.lng < (vj.lng - vi.lng) * (p.lat - vi.lat) / (vj.lat - vi.lat) + vi.lng;
        if crosses {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn orientation(p: Coordinate, q: Coordinate, r: Coordinate) -> f64 {
    (r.lng - p.lng) * (q.lat - p.lat) - (q.lng - p.lng) * (r.lat - p.lat)
}

fn on_segment(a: Coordinate, b: Coordinate, p: Coordinate) -> bool {
    a.lng.min(b.lng) <= p.lng
        && p.lng <= a.lng.max(b.lng)
        && a.lat.min(b.lat) <= p.lat
        && p.lat <= a.lat.max(b.lat)
}

/// Segment intersection test; touching endpoints count as intersecting.
pub fn segments_intersect(a: Coordinate, b: Coordinate, c: Coordinate, d: Coordinate) -> bool {
    let o1 = orientation(c, d, a);
    let o2 = orientation(c, d, b);
    let o3 = orientation(a, b, c);
    let o4 = orientation(a, b, d);

    if ((o1 > 0.0 && o2 < 0.0) || (o1 < 0.0 && o2 > 0.0))
        && ((o3 > 0.0 && o4 < 0.0) || (o3 < 0.0 && o4 > 0.0))
    {
        return true;
    }

    // Collinear touches.
    (o1 == 0.0 && on_segment(c, d, a))
        || (o2 == 0.0 && on_segment(c, d, b))
        || (o3 == 0.0 && on_segment(a, b, c))
        || (o4 == 0.0 && on_segment(a, b, d))
}

/// True if the segment crosses any edge of the ring or either endpoint
/// lies inside it.
pub fn segment_crosses_polygon(from: Coordinate, to: Coordinate, ring: &[Coordinate]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let closed = ring.first() == ring.last();
    let n = if closed { ring.len() - 1 } else { ring.len() };
    for i in 0..n {
        let edge_start = ring[i];
        let edge_end = ring[(i + 1) % ring.len()];
        if segments_intersect(from, to, edge_start, edge_end) {
            return true;
        }
    }
    point_in_polygon(from, ring) || point_in_polygon(to, ring)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lng: f64, lat: f64) -> Coordinate {
        Coordinate::new(lng, lat)
    }

    fn unit_square() -> Vec<Coordinate> {
        vec![
            c(0.0, 0.0),
            c(1.0, 0.0),
            c(1.0, 1.0),
            c(0.0, 1.0),
            c(0.0, 0.0),
        ]
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = c(-3.186874, 55.944494);
        assert_eq!(distance(p, p), 0.0);
        assert!(is_close(p, p));
    }

    #[test]
    fn distance_is_pythagorean() {
        assert!((distance(c(0.0, 0.0), c(3.0, 4.0)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn step_moves_exactly_one_step_length() {
        let p = c(-3.19, 55.94);
        for &angle in &COMPASS {
            let next = step(p, angle);
            // Adding the offset to a ~56° latitude costs a few ulps.
            assert!((distance(p, next) - STEP_LENGTH).abs() < 1e-12);
        }
    }

    #[test]
    fn step_east_and_north_components() {
        let p = c(0.0, 0.0);
        let east = step(p, 0.0);
        assert!((east.lng - STEP_LENGTH).abs() < 1e-18);
        assert!(east.lat.abs() < 1e-18);

        let north = step(p, 90.0);
        assert!(north.lng.abs() < 1e-18);
        assert!((north.lat - STEP_LENGTH).abs() < 1e-18);
    }

    #[test]
    fn nearest_compass_snaps_to_closest_heading() {
        assert_eq!(nearest_compass(10.0), 0.0);
        assert_eq!(nearest_compass(12.0), 22.5);
        assert_eq!(nearest_compass(359.0), 0.0);
        assert_eq!(nearest_compass(181.0), 180.0);
    }

    #[test]
    fn point_in_polygon_basic() {
        let ring = unit_square();
        assert!(point_in_polygon(c(0.5, 0.5), &ring));
        assert!(!point_in_polygon(c(1.5, 0.5), &ring));
        assert!(!point_in_polygon(c(-0.5, 0.5), &ring));
    }

    #[test]
    fn point_in_polygon_invariant_under_ring_rotation() {
        let ring = unit_square();
        // Same square, starting from a different vertex.
        let rotated = vec![
            c(1.0, 0.0),
            c(1.0, 1.0),
            c(0.0, 1.0),
            c(0.0, 0.0),
            c(1.0, 0.0),
        ];
        for p in [c(0.5, 0.5), c(2.0, 2.0), c(0.25, 0.9), c(-1.0, 0.0)] {
            assert_eq!(point_in_polygon(p, &ring), point_in_polygon(p, &rotated));
        }
    }

    #[test]
    fn segments_intersect_crossing_and_touching() {
        assert!(segments_intersect(
            c(0.0, 0.0),
            c(1.0, 1.0),
            c(0.0, 1.0),
            c(1.0, 0.0)
        ));
        // Shared endpoint counts.
        assert!(segments_intersect(
            c(0.0, 0.0),
            c(1.0, 0.0),
            c(1.0, 0.0),
            c(2.0, 0.0)
        ));
        // Parallel, disjoint.
        assert!(!segments_intersect(
            c(0.0, 0.0),
            c(1.0, 0.0),
            c(0.0, 1.0),
            c(1.0, 1.0)
        ));
    }

    #[test]
    fn segment_crossing_polygon_edge_detected() {
        let ring = unit_square();
        assert!(segment_crosses_polygon(c(-0.5, 0.5), c(1.5, 0.5), &ring));
        assert!(!segment_crosses_polygon(c(-0.5, 2.0), c(1.5, 2.0), &ring));
    }

    #[test]
    fn segment_ending_inside_polygon_detected() {
        let ring = unit_square();
        // Fully interior segment crosses no edge but ends inside.
        assert!(segment_crosses_polygon(c(0.4, 0.4), c(0.6, 0.6), &ring));
    }

    #[test]
    fn grid_key_collapses_jitter() {
        let a = c(-3.1868740000001, 55.9444939999999);
        let b = c(-3.186874, 55.944494);
        assert_eq!(grid_key(a), grid_key(b));
    }
}
