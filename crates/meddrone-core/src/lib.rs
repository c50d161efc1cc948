//! Planning engine for medical drone deliveries.
//!
//! Plans routes for a fleet of drones that pick up and deliver medical
//! items between service points and delivery coordinates, avoiding
//! restricted polygons and respecting per-drone capability, capacity,
//! move-budget and availability constraints, while aggregating
//! operating cost. The engine is stateless: every call works on its
//! own copies of the fetched reference data.

pub mod assign;
pub mod config;
pub mod geo;
pub mod geojson;
pub mod models;
pub mod pathfind;
pub mod plan;
pub mod router;
pub mod zones;

pub use config::PlannerConfig;
pub use geojson::to_feature_collection;
pub use models::{
    AvailabilityWindow, Capability, Coordinate, DeliveryPath, DispatchRecord, Drone, DronePath,
    PlanResult, ReferenceData, Region, Requirements, RestrictedArea, ServicePoint,
    ServicePointDrones,
};
pub use plan::plan;
