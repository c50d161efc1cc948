//! Domain models for the delivery planner.
//!
//! Field names follow the wire format of the external reference-data
//! service (camelCase), so these types double as the fetch/response DTOs.

use serde::{Deserialize, Serialize};

/// A longitude/latitude pair in degrees.
///
/// Equality is exact; use [`crate::geo::is_close`] for the epsilon-tolerant
/// comparison the planner works with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lng: f64,
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// True iff both components are inside the valid geographic ranges.
    pub fn in_range(&self) -> bool {
        (-180.0..=180.0).contains(&self.lng) && (-90.0..=90.0).contains(&self.lat)
    }
}

/// A named polygon used as an allowed area (contains-test at the caller).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    #[serde(default)]
    pub name: String,
    /// Closed ring: first vertex equals the last, at least 4 entries.
    #[serde(default)]
    pub vertices: Vec<Coordinate>,
}

impl Region {
    /// A ring is valid when it has at least 4 vertices and is closed.
    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= 4 && self.vertices.first() == self.vertices.last()
    }

    /// True iff `point` lies inside the region's ring.
    pub fn contains(&self, point: Coordinate) -> bool {
        crate::geo::point_in_polygon(point, &self.vertices)
    }
}

/// A no-fly zone: a closed polygon flight paths must not cross or end inside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestrictedArea {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vertices: Vec<Coordinate>,
}

impl RestrictedArea {
    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= 4 && self.vertices.first() == self.vertices.last()
    }
}

/// One weekly availability window ("monday" 08:00-17:30).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityWindow {
    pub day_of_week: String,
    pub from: String,
    pub until: String,
}

/// What a drone can carry and what it costs to fly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capability {
    #[serde(default)]
    pub cooling: bool,
    #[serde(default)]
    pub heating: bool,
    #[serde(default)]
    pub capacity: f64,
    #[serde(default)]
    pub max_moves: u32,
    #[serde(default)]
    pub cost_per_move: f64,
    #[serde(default)]
    pub cost_initial: f64,
    #[serde(default)]
    pub cost_final: f64,
    #[serde(default)]
    pub availability: Vec<AvailabilityWindow>,
}

/// An entry in the drone catalogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drone {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub capability: Option<Capability>,
}

/// A drone's home base; every route starts and ends here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicePoint {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub location: Coordinate,
}

/// Which drones operate out of a service point, with their weekly windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePointDrones {
    pub service_point_id: i64,
    #[serde(default)]
    pub drones: Vec<DroneAtServicePoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneAtServicePoint {
    pub id: String,
    #[serde(default)]
    pub availability: Vec<AvailabilityWindow>,
}

/// Constraints a dispatch places on the drone that serves it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirements {
    #[serde(default)]
    pub capacity: f64,
    #[serde(default)]
    pub cooling: Option<bool>,
    #[serde(default)]
    pub heating: Option<bool>,
    #[serde(default)]
    pub max_cost: Option<f64>,
}

impl Requirements {
    pub fn requires_cooling(&self) -> bool {
        self.cooling.unwrap_or(false)
    }

    pub fn requires_heating(&self) -> bool {
        self.heating.unwrap_or(false)
    }
}

/// One medical delivery request: pick up at one point, deliver at another.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRecord {
    pub id: i64,
    /// ISO date ("2025-01-15"); dispatches without one are unscheduled.
    #[serde(default)]
    pub date: Option<String>,
    /// Wall-clock time ("14:30").
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub pickup_name: Option<String>,
    #[serde(default)]
    pub pickup_location: Option<Coordinate>,
    #[serde(default, alias = "delivery")]
    pub delivery_location: Option<Coordinate>,
    #[serde(default)]
    pub requirements: Option<Requirements>,
}

/// Reference data fetched fresh for each planning invocation.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub drones: Vec<Drone>,
    pub service_points: Vec<ServicePoint>,
    pub restricted_areas: Vec<RestrictedArea>,
    pub availability: Vec<ServicePointDrones>,
}

/// Flight path for a single delivery within a drone's route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPath {
    pub delivery_id: i64,
    pub flight_path: Vec<Coordinate>,
}

/// One drone's complete route for the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DronePath {
    pub drone_id: String,
    pub service_point: Coordinate,
    pub deliveries: Vec<DeliveryPath>,
    /// The stitched end-to-end path including the return to base.
    pub path: Vec<Coordinate>,
    pub total_moves: u32,
}

/// Result of planning one batch of dispatches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResult {
    pub total_cost: f64,
    pub total_moves: u32,
    pub drone_paths: Vec<DronePath>,
}

impl PlanResult {
    /// The zero-cost, zero-move result for an empty batch.
    pub fn empty() -> Self {
        Self {
            total_cost: 0.0,
            total_moves: 0,
            drone_paths: Vec::new(),
        }
    }
}
