//! Turn solved decisions back into equipment and a per-outlet audit trail.
//!
//! Every segment loss is recomputed from the building data and the chosen
//! equipment, without looking at the solver's level variables. The sum gives
//! a "balance" level that must agree with the model's own outlet level; the
//! difference is reported per outlet and its maximum in the summary.

use std::collections::BTreeMap;

use riser_core::{Building, Catalog, TapModel};
use tracing::{debug, warn};

use super::formulation::RiserPoint;
use super::solution::{
    ApartmentSplitter, Design, DesignSummary, FloorTap, OutletRecord, TrunkChoice,
};
use super::solver::SolvedModel;
use crate::error::{DesignError, DesignResult};

/// Largest accepted gap between the balance level and the model level.
pub const BALANCE_TOLERANCE_DB: f64 = 1e-3;

/// Slack on the band check for solver round-off.
const LEVEL_TOLERANCE_DB: f64 = 1e-6;

/// Index of the selected model, i.e. the first binary above one half.
fn selected(values: &[f64]) -> Option<usize> {
    values.iter().position(|&v| v > 0.5)
}

fn missing(what: String) -> DesignError {
    DesignError::Solver(format!("solved model has no value for {what}"))
}

fn chosen_tap<'a>(
    catalog: &'a Catalog,
    solved: &SolvedModel,
    floor: u32,
) -> DesignResult<&'a TapModel> {
    let values = solved
        .assignment
        .taps
        .get(&floor)
        .ok_or_else(|| missing(format!("the taps of floor {floor}")))?;
    selected(values)
        .and_then(|i| catalog.taps.get(i))
        .ok_or_else(|| DesignError::Solver(format!("no tap model selected on floor {floor}")))
}

/// Read equipment choices and rebuild every outlet's loss budget.
pub fn decode(building: &Building, solved: &SolvedModel) -> DesignResult<Design> {
    let params = &building.params;
    let catalog = &building.catalog;
    let layout = &solved.layout;
    let a = &solved.assignment;

    let trunk_model = selected(&a.trunk)
        .and_then(|i| catalog.splitters.get(i))
        .ok_or_else(|| DesignError::Solver("no trunk splitter model selected".into()))?;
    let trunk = TrunkChoice {
        floor: layout.trunk_floor,
        model: trunk_model.id.clone(),
        outputs: trunk_model.outputs,
        insertion_loss_db: trunk_model.insertion_loss_db,
    };

    let mut floor_taps = Vec::new();
    for floor in building.floors_desc() {
        let block = layout
            .block_of(floor)
            .ok_or_else(|| missing(format!("the block of floor {floor}")))?;
        let tap = chosen_tap(catalog, solved, floor)?;
        floor_taps.push(FloorTap {
            floor,
            block: block.index,
            model: tap.id.clone(),
            outputs: tap.outputs,
            tap_loss_db: tap.tap_loss_db,
            through_loss_db: tap.through_loss_db,
        });
    }

    let mut apartment_splitters = BTreeMap::new();
    for (apt, apartment) in building.occupied_apartments() {
        let used = a
            .splitter_used
            .get(&apt)
            .copied()
            .ok_or_else(|| missing(format!("the splitter flag of {apt}")))?;
        let model = if used > 0.5 {
            let values = a
                .splitters
                .get(&apt)
                .ok_or_else(|| missing(format!("the splitters of {apt}")))?;
            let model = selected(values)
                .and_then(|i| catalog.splitters.get(i))
                .ok_or_else(|| {
                    DesignError::Solver(format!("{apt} uses a splitter but none is selected"))
                })?;
            Some(model)
        } else {
            None
        };
        apartment_splitters.insert(
            apt,
            ApartmentSplitter {
                apartment: apt,
                outlets: apartment.outlets,
                model: model.map(|m| m.id.clone()),
                insertion_loss_db: model.map_or(0.0, |m| m.insertion_loss_db),
            },
        );
    }

    let antenna_cable_loss_db = params.cable_loss(layout.antenna_to_trunk_m);
    let union_loss = params.union_loss();

    let mut outlets = Vec::new();
    for key in building.outlets() {
        let apt = key.apartment_key();
        let block = layout
            .block_of(key.floor)
            .ok_or_else(|| missing(format!("the block of {key}")))?;

        let feeder_m = layout.feeder_length_m(block);
        let feeder_cable_loss_db = params.cable_loss(feeder_m);

        let hops = key.floor.abs_diff(block.entry_floor);
        let riser_m = layout.riser_length_m(block, key.floor);
        let riser_connectors = hops * params.connectors_per_union;
        let riser_connector_loss_db = f64::from(riser_connectors) * params.connector_loss_db;
        let mut riser_through_loss_db = 0.0;
        for passed in block.floors_passed_before(key.floor) {
            riser_through_loss_db += chosen_tap(catalog, solved, passed)?.through_loss_db;
        }

        let level_at = |floor: u32| {
            a.riser_levels
                .get(&RiserPoint {
                    block: block.index,
                    floor,
                })
                .copied()
                .ok_or_else(|| missing(format!("the riser level of floor {floor}")))
        };
        let riser_loss_model_db = level_at(block.entry_floor)? - level_at(key.floor)?;

        let tap = chosen_tap(catalog, solved, key.floor)?;
        let tap_to_splitter_m = building.tap_to_splitter_m(apt)?;
        let outlet_cable_m = building.outlet_cable_m(key)?;
        let (splitter_model, splitter_loss_db) = apartment_splitters
            .get(&apt)
            .map_or((None, 0.0), |s| (s.model.clone(), s.insertion_loss_db));

        let tap_to_splitter_loss_db = params.cable_loss(tap_to_splitter_m);
        let apartment_connector_loss_db = params.apartment_connector_loss();
        let outlet_cable_loss_db = params.cable_loss(outlet_cable_m);
        let riser_cable_loss_db = params.cable_loss(riser_m);

        let total_loss_db = antenna_cable_loss_db
            + union_loss
            + trunk.insertion_loss_db
            + feeder_cable_loss_db
            + union_loss
            + riser_through_loss_db
            + riser_cable_loss_db
            + riser_connector_loss_db
            + tap.tap_loss_db
            + tap_to_splitter_loss_db
            + apartment_connector_loss_db
            + splitter_loss_db
            + outlet_cable_loss_db
            + params.outlet_connection_loss_db;
        let balance_level_dbuv = params.input_power_dbuv - total_loss_db;

        let level_dbuv = a
            .outlet_levels
            .get(&key)
            .copied()
            .ok_or_else(|| missing(format!("the level of {key}")))?;
        let balance_error_db = (balance_level_dbuv - level_dbuv).abs();
        if balance_error_db > BALANCE_TOLERANCE_DB {
            warn!(
                "Balance mismatch at {}: summed losses give {:.4} dBµV, model gives {:.4} dBµV",
                key.label(),
                balance_level_dbuv,
                level_dbuv
            );
        }

        let compliant = level_dbuv >= params.min_level_dbuv - LEVEL_TOLERANCE_DB
            && level_dbuv <= params.max_level_dbuv + LEVEL_TOLERANCE_DB;

        outlets.push(OutletRecord {
            outlet: key,
            label: key.label(),
            block: block.index,
            entry_floor: block.entry_floor,
            direction: block.direction,
            trunk_floor: layout.trunk_floor,
            trunk_model: trunk.model.clone(),
            trunk_outputs: trunk.outputs,
            trunk_loss_db: trunk.insertion_loss_db,
            antenna_to_trunk_m: layout.antenna_to_trunk_m,
            antenna_cable_loss_db,
            antenna_connector_loss_db: union_loss,
            feeder_m,
            feeder_cable_loss_db,
            feeder_connector_loss_db: union_loss,
            riser_m,
            riser_cable_loss_db,
            riser_connectors,
            riser_connector_loss_db,
            riser_through_loss_db,
            riser_loss_model_db,
            tap_model: tap.id.clone(),
            tap_loss_db: tap.tap_loss_db,
            tap_to_splitter_m,
            tap_to_splitter_loss_db,
            apartment_connector_loss_db,
            splitter_model,
            splitter_loss_db,
            outlet_cable_m,
            outlet_cable_loss_db,
            outlet_connection_loss_db: params.outlet_connection_loss_db,
            total_distance_m: layout.antenna_to_trunk_m
                + feeder_m
                + riser_m
                + tap_to_splitter_m
                + outlet_cable_m,
            total_loss_db,
            input_power_dbuv: params.input_power_dbuv,
            balance_level_dbuv,
            level_dbuv,
            balance_error_db,
            deviation_db: level_dbuv - params.target_level_dbuv,
            compliant,
        });
    }

    let summary = summarize(solved, &outlets);
    debug!(
        "Decoded design: {} outlets, worst balance error {:.2e} dB",
        summary.outlets, summary.max_balance_error_db
    );

    Ok(Design {
        summary,
        trunk,
        blocks: layout.blocks.clone(),
        floor_taps,
        apartment_splitters: apartment_splitters.into_values().collect(),
        outlets,
    })
}

fn summarize(solved: &SolvedModel, outlets: &[OutletRecord]) -> DesignSummary {
    let levels: Vec<f64> = outlets.iter().map(|o| o.level_dbuv).collect();
    let min = levels.iter().copied().reduce(f64::min);
    let max = levels.iter().copied().reduce(f64::max);
    let mean = (!levels.is_empty()).then(|| levels.iter().sum::<f64>() / levels.len() as f64);
    let max_balance_error_db = outlets
        .iter()
        .map(|o| o.balance_error_db)
        .fold(0.0, f64::max);

    DesignSummary {
        status: solved.status,
        outlets: outlets.len(),
        compliant_outlets: outlets.iter().filter(|o| o.compliant).count(),
        min_level_dbuv: min,
        mean_level_dbuv: mean,
        max_level_dbuv: max,
        total_deviation_db: solved.objective,
        max_balance_error_db,
        balanced: max_balance_error_db <= BALANCE_TOLERANCE_DB,
        solve_seconds: solved.solve_time.as_secs_f64(),
    }
}
