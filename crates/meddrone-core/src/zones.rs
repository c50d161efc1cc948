//! No-fly-zone oracle.

use crate::geo::segment_crosses_polygon;
use crate::models::{Coordinate, RestrictedArea};

/// True iff the move from `from` to `to` would cross into, through, or
/// out of any restricted polygon. There is no partial credit and no
/// zone priority: any hit rejects the move.
pub fn blocked(from: Coordinate, to: Coordinate, zones: &[RestrictedArea]) -> bool {
    zones
        .iter()
        .any(|zone| segment_crosses_polygon(from, to, &zone.vertices))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(name: &str) -> RestrictedArea {
        RestrictedArea {
            id: Some(1),
            name: name.to_string(),
            vertices: vec![
                Coordinate::new(0.0, 0.0),
                Coordinate::new(1.0, 0.0),
                Coordinate::new(1.0, 1.0),
                Coordinate::new(0.0, 1.0),
                Coordinate::new(0.0, 0.0),
            ],
        }
    }

    #[test]
    fn move_through_zone_is_blocked() {
        let zones = vec![square("campus")];
        assert!(blocked(
            Coordinate::new(-0.5, 0.5),
            Coordinate::new(1.5, 0.5),
            &zones
        ));
    }

    #[test]
    fn move_landing_inside_zone_is_blocked() {
        let zones = vec![square("campus")];
        assert!(blocked(
            Coordinate::new(-0.5, 0.5),
            Coordinate::new(0.5, 0.5),
            &zones
        ));
    }

    #[test]
    fn clear_move_is_not_blocked() {
        let zones = vec![square("campus")];
        assert!(!blocked(
            Coordinate::new(-0.5, 2.0),
            Coordinate::new(1.5, 2.0),
            &zones
        ));
        assert!(!blocked(
            Coordinate::new(-0.5, 2.0),
            Coordinate::new(1.5, 2.0),
            &[]
        ));
    }
}
