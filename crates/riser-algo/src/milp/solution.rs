//! Decoded design: chosen equipment and the per-outlet audit trail.

use riser_core::{ApartmentKey, OutletKey};
use serde::{Deserialize, Serialize};

use super::solver::SolveStatus;
use crate::topology::{Direction, RiserBlock};

/// The trunk splitter feeding every block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrunkChoice {
    pub floor: u32,
    pub model: String,
    pub outputs: u32,
    pub insertion_loss_db: f64,
}

/// Tap chosen for a floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorTap {
    pub floor: u32,
    pub block: usize,
    pub model: String,
    pub outputs: u32,
    pub tap_loss_db: f64,
    pub through_loss_db: f64,
}

/// Splitter chosen for an apartment, if it needs one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApartmentSplitter {
    pub apartment: ApartmentKey,
    pub outlets: u32,
    pub model: Option<String>,
    pub insertion_loss_db: f64,
}

/// Complete loss breakdown for one outlet.
///
/// Lengths are in meters, losses in dB and levels in dBµV. `level_dbuv` is
/// the solver's own level variable; `balance_level_dbuv` is the input power
/// minus every segment loss summed independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutletRecord {
    pub outlet: OutletKey,
    pub label: String,
    pub block: usize,
    pub entry_floor: u32,
    pub direction: Direction,

    pub trunk_floor: u32,
    pub trunk_model: String,
    pub trunk_outputs: u32,
    pub trunk_loss_db: f64,
    pub antenna_to_trunk_m: f64,
    pub antenna_cable_loss_db: f64,
    pub antenna_connector_loss_db: f64,

    pub feeder_m: f64,
    pub feeder_cable_loss_db: f64,
    pub feeder_connector_loss_db: f64,

    pub riser_m: f64,
    pub riser_cable_loss_db: f64,
    pub riser_connectors: u32,
    pub riser_connector_loss_db: f64,
    /// Σ through-loss of the taps passed between the entry and this floor
    pub riser_through_loss_db: f64,
    /// Entry level minus floor level, read from the solved model
    pub riser_loss_model_db: f64,

    pub tap_model: String,
    pub tap_loss_db: f64,
    pub tap_to_splitter_m: f64,
    pub tap_to_splitter_loss_db: f64,
    pub apartment_connector_loss_db: f64,
    pub splitter_model: Option<String>,
    pub splitter_loss_db: f64,
    pub outlet_cable_m: f64,
    pub outlet_cable_loss_db: f64,
    pub outlet_connection_loss_db: f64,

    /// Cable from the head-end to this outlet
    pub total_distance_m: f64,
    pub total_loss_db: f64,
    pub input_power_dbuv: f64,
    pub balance_level_dbuv: f64,
    pub level_dbuv: f64,
    pub balance_error_db: f64,
    pub deviation_db: f64,
    pub compliant: bool,
}

/// Headline figures of a design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSummary {
    pub status: SolveStatus,
    pub outlets: usize,
    pub compliant_outlets: usize,
    pub min_level_dbuv: Option<f64>,
    pub mean_level_dbuv: Option<f64>,
    pub max_level_dbuv: Option<f64>,
    /// Objective value: Σ |level − target|
    pub total_deviation_db: f64,
    pub max_balance_error_db: f64,
    /// Every outlet's balance level matches the model level
    pub balanced: bool,
    pub solve_seconds: f64,
}

/// A solved and decoded riser network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Design {
    pub summary: DesignSummary,
    pub trunk: TrunkChoice,
    pub blocks: Vec<RiserBlock>,
    pub floor_taps: Vec<FloorTap>,
    pub apartment_splitters: Vec<ApartmentSplitter>,
    pub outlets: Vec<OutletRecord>,
}

impl Design {
    pub fn tap_on(&self, floor: u32) -> Option<&FloorTap> {
        self.floor_taps.iter().find(|t| t.floor == floor)
    }

    pub fn splitter_in(&self, apartment: ApartmentKey) -> Option<&ApartmentSplitter> {
        self.apartment_splitters
            .iter()
            .find(|s| s.apartment == apartment)
    }

    pub fn outlet(&self, key: OutletKey) -> Option<&OutletRecord> {
        self.outlets.iter().find(|o| o.outlet == key)
    }

    /// One line per design, suitable for logs.
    pub fn headline(&self) -> String {
        let s = &self.summary;
        match (s.min_level_dbuv, s.max_level_dbuv) {
            (Some(min), Some(max)) => format!(
                "{}: {} outlets ({} compliant), levels {:.2}..{:.2} dBµV, deviation {:.2} dB, trunk {}",
                s.status, s.outlets, s.compliant_outlets, min, max, s.total_deviation_db, self.trunk.model
            ),
            _ => format!("{}: no outlets, trunk {}", s.status, self.trunk.model),
        }
    }
}
