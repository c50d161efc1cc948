//! Fleet assignment: group dispatches by nearest service point, then
//! greedily first-fit them onto the drones stationed there.
//!
//! The assignment is deliberately order-dependent and never
//! backtracks; dispatches are processed in input order and take the
//! first drone that satisfies every constraint.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

use crate::config::PlannerConfig;
use crate::geo::distance;
use crate::models::{
    AvailabilityWindow, Capability, DispatchRecord, Drone, ReferenceData, Requirements,
    ServicePoint,
};
use crate::pathfind::estimate_round_trip_moves;

/// A drone slot that can take deliveries: either a real catalogue
/// drone stationed at the service point, or a virtual slot synthesized
/// when no real drone qualified.
#[derive(Debug, Clone)]
pub struct DroneSlot {
    pub drone_id: String,
    pub capability: Capability,
    pub virtual_slot: bool,
    /// Windows the drone is flyable in at this service point.
    availability: Vec<AvailabilityWindow>,
    /// Estimated moves already committed against `max_moves`.
    committed_moves: u32,
    /// (date, time) slots already taken by assigned dispatches.
    taken_slots: Vec<(String, String)>,
}

/// Dispatches grouped under one service point with their drone slots.
#[derive(Debug, Clone)]
pub struct ServicePointPlan {
    pub service_point: ServicePoint,
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Clone)]
pub struct Assignment {
    pub slot: DroneSlot,
    pub dispatches: Vec<DispatchRecord>,
}

/// Assign every dispatch in the batch to a drone.
pub fn assign_fleet(
    dispatches: &[DispatchRecord],
    reference: &ReferenceData,
    config: &PlannerConfig,
) -> Vec<ServicePointPlan> {
    let groups = group_by_service_point(dispatches, reference, config);

    groups
        .into_iter()
        .map(|(service_point, group)| {
            let assignments = assign_at_point(&service_point, &group, reference, config);
            ServicePointPlan {
                service_point,
                assignments,
            }
        })
        .collect()
}

/// Nearest-service-point grouping by delivery location. Dispatches with
/// no delivery location are measured from the fallback coordinate.
/// Groups preserve the batch's input order and appear in service-point
/// catalogue order.
fn group_by_service_point(
    dispatches: &[DispatchRecord],
    reference: &ReferenceData,
    config: &PlannerConfig,
) -> Vec<(ServicePoint, Vec<DispatchRecord>)> {
    let points: Vec<ServicePoint> = if reference.service_points.is_empty() {
        vec![ServicePoint {
            id: 0,
            name: "fallback".to_string(),
            location: config.fallback_location,
        }]
    } else {
        reference.service_points.clone()
    };

    let mut groups: Vec<(ServicePoint, Vec<DispatchRecord>)> =
        points.iter().map(|p| (p.clone(), Vec::new())).collect();

    for dispatch in dispatches {
        let at = dispatch
            .delivery_location
            .unwrap_or(config.fallback_location);
        let mut best = 0usize;
        let mut best_dist = f64::INFINITY;
        for (i, point) in points.iter().enumerate() {
            let d = distance(at, point.location);
            if d < best_dist {
                best_dist = d;
                best = i;
            }
        }
        groups[best].1.push(dispatch.clone());
    }

    groups.retain(|(_, group)| !group.is_empty());
    groups
}

/// Greedy first-fit assignment of one service point's dispatches onto
/// its drones.
fn assign_at_point(
    service_point: &ServicePoint,
    dispatches: &[DispatchRecord],
    reference: &ReferenceData,
    config: &PlannerConfig,
) -> Vec<Assignment> {
    let mut slots = candidate_slots(service_point, reference);
    let mut assigned: Vec<Vec<DispatchRecord>> = vec![Vec::new(); slots.len()];
    let mut virtual_counter = 0usize;

    for dispatch in dispatches {
        let requirements = dispatch.requirements.clone().unwrap_or_default();
        let estimated = estimate_round_trip_moves(
            service_point.location,
            dispatch
                .delivery_location
                .unwrap_or(config.fallback_location),
        );

        let fit = slots
            .iter()
            .position(|slot| slot_accepts(slot, dispatch, &requirements, estimated));

        let index = match fit {
            Some(i) => i,
            None => {
                virtual_counter += 1;
                slots.push(virtual_slot(
                    service_point,
                    virtual_counter,
                    &requirements,
                    config,
                ));
                assigned.push(Vec::new());
                slots.len() - 1
            }
        };

        commit(&mut slots[index], dispatch, estimated);
        assigned[index].push(dispatch.clone());
    }

    slots
        .into_iter()
        .zip(assigned)
        .filter(|(_, dispatches)| !dispatches.is_empty())
        .map(|(slot, dispatches)| Assignment { slot, dispatches })
        .collect()
}

/// The drones stationed at a service point, joined with the catalogue
/// for capabilities, in availability-record order. When no availability
/// data exists at all, the whole catalogue is a candidate everywhere.
fn candidate_slots(service_point: &ServicePoint, reference: &ReferenceData) -> Vec<DroneSlot> {
    let find_capability = |id: &str| {
        reference
            .drones
            .iter()
            .find(|d| d.id == id)
            .and_then(|d| d.capability.clone())
    };

    if reference.availability.is_empty() {
        return reference
            .drones
            .iter()
            .filter_map(|drone: &Drone| {
                let capability = drone.capability.clone()?;
                let availability = capability.availability.clone();
                Some(DroneSlot {
                    drone_id: drone.id.clone(),
                    capability,
                    virtual_slot: false,
                    availability,
                    committed_moves: 0,
                    taken_slots: Vec::new(),
                })
            })
            .collect();
    }

    reference
        .availability
        .iter()
        .filter(|record| record.service_point_id == service_point.id)
        .flat_map(|record| record.drones.iter())
        .filter_map(|entry| {
            let capability = find_capability(&entry.id)?;
            let availability = if entry.availability.is_empty() {
                capability.availability.clone()
            } else {
                entry.availability.clone()
            };
            Some(DroneSlot {
                drone_id: entry.id.clone(),
                capability,
                virtual_slot: false,
                availability,
                committed_moves: 0,
                taken_slots: Vec::new(),
            })
        })
        .collect()
}

/// All constraints a slot must satisfy to take a dispatch.
fn slot_accepts(
    slot: &DroneSlot,
    dispatch: &DispatchRecord,
    requirements: &Requirements,
    estimated_moves: u32,
) -> bool {
    // A dispatch cannot demand cooling and heating at once in this
    // single-drone-at-a-time model.
    if requirements.requires_cooling() && requirements.requires_heating() {
        return false;
    }
    if requirements.requires_cooling() && !slot.capability.cooling {
        return false;
    }
    if requirements.requires_heating() && !slot.capability.heating {
        return false;
    }
    // Capacity is per delivery, not cumulative: drop-off happens before
    // the next pickup.
    if requirements.capacity > slot.capability.capacity {
        return false;
    }
    if slot
        .committed_moves
        .checked_add(estimated_moves)
        .map_or(true, |total| total > slot.capability.max_moves)
    {
        return false;
    }
    if let (Some(date), Some(time)) = (&dispatch.date, &dispatch.time) {
        if slot
            .taken_slots
            .iter()
            .any(|(d, t)| d == date && t == time)
        {
            return false;
        }
        if !available_at(&slot.availability, date, time) {
            return false;
        }
    }
    true
}

fn commit(slot: &mut DroneSlot, dispatch: &DispatchRecord, estimated_moves: u32) {
    slot.committed_moves = slot.committed_moves.saturating_add(estimated_moves);
    if let (Some(date), Some(time)) = (&dispatch.date, &dispatch.time) {
        slot.taken_slots.push((date.clone(), time.clone()));
    }
}

/// Synthesize a slot that satisfies exactly the dispatch that caused
/// it, with the configured default cost figures and no move budget.
fn virtual_slot(
    service_point: &ServicePoint,
    ordinal: usize,
    requirements: &Requirements,
    config: &PlannerConfig,
) -> DroneSlot {
    DroneSlot {
        drone_id: format!("virtual-{}-{}", service_point.id, ordinal),
        capability: Capability {
            cooling: requirements.requires_cooling(),
            heating: requirements.requires_heating(),
            capacity: requirements.capacity,
            max_moves: u32::MAX,
            cost_per_move: config.default_cost_per_move,
            cost_initial: config.default_cost_initial,
            cost_final: config.default_cost_final,
            availability: Vec::new(),
        },
        virtual_slot: true,
        availability: Vec::new(),
        committed_moves: 0,
        taken_slots: Vec::new(),
    }
}

/// Weekly-window availability check. Missing windows mean the drone is
/// always flyable; unparseable dates or times are treated leniently as
/// available, matching the reference data service's behavior.
fn available_at(windows: &[AvailabilityWindow], date: &str, time: &str) -> bool {
    if windows.is_empty() {
        return true;
    }
    let Ok(date) = date.parse::<NaiveDate>() else {
        return true;
    };
    let Ok(time) = parse_time(time) else {
        return true;
    };
    let weekday = weekday_name(date.weekday());

    for window in windows {
        if !window.day_of_week.eq_ignore_ascii_case(weekday) {
            continue;
        }
        let (Ok(from), Ok(until)) = (parse_time(&window.from), parse_time(&window.until)) else {
            continue;
        };
        if time >= from && time <= until {
            return true;
        }
    }

    // A schedule that never covers the slot, including one that never
    // mentions the day, means the drone does not fly then.
    false
}

fn parse_time(value: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S").or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}
