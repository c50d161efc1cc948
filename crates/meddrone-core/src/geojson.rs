//! GeoJSON view of a plan: one LineString Feature per drone.

use crate::models::PlanResult;
use serde_json::json;

/// Render the combined flight paths as a GeoJSON FeatureCollection.
/// Drones whose combined path is empty are omitted; each feature
/// carries the drone id as a property.
pub fn to_feature_collection(result: &PlanResult) -> String {
    let features: Vec<serde_json::Value> = result
        .drone_paths
        .iter()
        .filter(|drone| !drone.path.is_empty())
        .map(|drone| {
            let coordinates: Vec<[f64; 2]> =
                drone.path.iter().map(|p| [p.lng, p.lat]).collect();
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "LineString",
                    "coordinates": coordinates,
                },
                "properties": {
                    "droneId": drone.drone_id,
                },
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
    .to_string()
}
