//! Post-design reports: bill of materials, per-floor summary and
//! per-frequency levels.

use std::collections::BTreeMap;

use riser_core::{Building, DesignParams, OutletKey, APARTMENT_CONNECTORS};
use serde::{Deserialize, Serialize};

use crate::milp::Design;

/// Bill of materials for an installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    /// Total coaxial cable
    pub cable_m: f64,
    /// F connectors
    pub connectors: u32,
    /// Wall outlets (TUs)
    pub outlets: usize,
    /// Model id → units (trunk splitter, taps and apartment splitters)
    pub equipment: BTreeMap<String, u32>,
}

/// Outlet levels on one floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorSummary {
    pub floor: u32,
    pub block: usize,
    pub tap_model: String,
    pub outlets: usize,
    pub min_level_dbuv: Option<f64>,
    pub max_level_dbuv: Option<f64>,
    pub mean_level_dbuv: Option<f64>,
}

/// An outlet's losses and level recomputed at 470 MHz and 698 MHz.
///
/// Non-cable losses are taken as frequency independent: they are the total
/// loss at the reference attenuation minus the cable share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRow {
    pub outlet: OutletKey,
    pub label: String,
    pub distance_m: f64,
    /// Approximate connectors between head-end and outlet
    pub connectors: u32,
    pub connector_loss_db: f64,
    pub fixed_loss_db: f64,
    pub cable_loss_ref_db: f64,
    pub cable_loss_470mhz_db: f64,
    pub cable_loss_698mhz_db: f64,
    pub total_loss_ref_db: f64,
    pub total_loss_470mhz_db: f64,
    pub total_loss_698mhz_db: f64,
    pub level_ref_dbuv: f64,
    pub level_470mhz_dbuv: f64,
    pub level_698mhz_dbuv: f64,
}

/// All reports for one design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingReport {
    pub inventory: Inventory,
    pub floors: Vec<FloorSummary>,
    pub frequencies: Vec<FrequencyRow>,
}

pub fn build_report(building: &Building, design: &Design) -> BuildingReport {
    BuildingReport {
        inventory: inventory(building, design),
        floors: floor_summaries(design),
        frequencies: frequency_rows(&building.params, design),
    }
}

/// Count cable, connectors and equipment.
///
/// Shared runs (head-end to trunk, one feeder per block, riser hops) are
/// counted once; apartment runs once per apartment and outlet runs once per
/// outlet.
pub fn inventory(building: &Building, design: &Design) -> Inventory {
    let params = &building.params;
    let per_union = params.connectors_per_union;
    let num_blocks = design.blocks.len() as u32;

    let trunk_floor = design.trunk.floor;
    let antenna_m = (f64::from(params.floors) - f64::from(trunk_floor) + 1.0)
        * params.inter_floor_length_m
        + params.headend_run_m;

    let mut feeders_m = 0.0;
    let mut riser_m = 0.0;
    let mut riser_connectors = 0;
    for block in &design.blocks {
        feeders_m += params.feeder_min_length_m
            + f64::from(block.entry_floor.abs_diff(trunk_floor)) * params.inter_floor_length_m;
        let hops = block.floors.len().saturating_sub(1) as u32;
        riser_m += f64::from(hops) * params.inter_floor_length_m;
        riser_connectors += hops * per_union;
    }

    let mut apartment_runs_m = 0.0;
    let mut apartments_served = 0;
    let mut splitter_inputs = 0;
    let mut splitter_outputs = 0;
    for (apt, apartment) in building.occupied_apartments() {
        apartment_runs_m += building.tap_to_splitter_m(apt).unwrap_or(0.0);
        apartments_served += 1;
        if design
            .splitter_in(apt)
            .is_some_and(|s| s.model.is_some())
        {
            splitter_inputs += 1;
            splitter_outputs += apartment.outlets;
        }
    }
    let outlet_runs_m: f64 = design.outlets.iter().map(|o| o.outlet_cable_m).sum();

    let connectors = (1 + num_blocks)
        + num_blocks * per_union
        + riser_connectors
        + apartments_served
        + splitter_inputs
        + splitter_outputs
        + design.outlets.len() as u32;

    let mut equipment = BTreeMap::new();
    *equipment.entry(design.trunk.model.clone()).or_insert(0) += 1;
    for tap in &design.floor_taps {
        *equipment.entry(tap.model.clone()).or_insert(0) += 1;
    }
    for splitter in &design.apartment_splitters {
        if let Some(model) = &splitter.model {
            *equipment.entry(model.clone()).or_insert(0) += 1;
        }
    }

    Inventory {
        cable_m: antenna_m + feeders_m + riser_m + apartment_runs_m + outlet_runs_m,
        connectors,
        outlets: design.outlets.len(),
        equipment,
    }
}

/// Per-floor tap and level statistics, top floor first.
pub fn floor_summaries(design: &Design) -> Vec<FloorSummary> {
    design
        .floor_taps
        .iter()
        .map(|tap| {
            let levels: Vec<f64> = design
                .outlets
                .iter()
                .filter(|o| o.outlet.floor == tap.floor)
                .map(|o| o.level_dbuv)
                .collect();
            FloorSummary {
                floor: tap.floor,
                block: tap.block,
                tap_model: tap.model.clone(),
                outlets: levels.len(),
                min_level_dbuv: levels.iter().copied().reduce(f64::min),
                max_level_dbuv: levels.iter().copied().reduce(f64::max),
                mean_level_dbuv: (!levels.is_empty())
                    .then(|| levels.iter().sum::<f64>() / levels.len() as f64),
            }
        })
        .collect()
}

/// Recompute every outlet at the two band-edge frequencies.
pub fn frequency_rows(params: &DesignParams, design: &Design) -> Vec<FrequencyRow> {
    let per_union = params.connectors_per_union;
    design
        .outlets
        .iter()
        .map(|o| {
            let distance_m = o.total_distance_m;
            let cable_loss_ref_db = distance_m * params.cable_loss_db_per_m;
            let fixed_loss_db = o.total_loss_db - cable_loss_ref_db;
            let cable_loss_470mhz_db = distance_m * params.cable_loss_470mhz_db_per_m;
            let cable_loss_698mhz_db = distance_m * params.cable_loss_698mhz_db_per_m;
            let total_loss_470mhz_db = fixed_loss_db + cable_loss_470mhz_db;
            let total_loss_698mhz_db = fixed_loss_db + cable_loss_698mhz_db;

            let hops = o.outlet.floor.abs_diff(o.entry_floor);
            let connectors = 2 * per_union + hops * per_union + APARTMENT_CONNECTORS;

            FrequencyRow {
                outlet: o.outlet,
                label: o.label.clone(),
                distance_m,
                connectors,
                connector_loss_db: f64::from(connectors) * params.connector_loss_db,
                fixed_loss_db,
                cable_loss_ref_db,
                cable_loss_470mhz_db,
                cable_loss_698mhz_db,
                total_loss_ref_db: o.total_loss_db,
                total_loss_470mhz_db,
                total_loss_698mhz_db,
                level_ref_dbuv: o.level_dbuv,
                level_470mhz_dbuv: params.input_power_dbuv - total_loss_470mhz_db,
                level_698mhz_dbuv: params.input_power_dbuv - total_loss_698mhz_db,
            }
        })
        .collect()
}
