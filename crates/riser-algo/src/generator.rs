//! Synthetic test buildings.
//!
//! The same seed always yields the same building, so generated inputs can
//! be used as regression fixtures.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use riser_core::{ApartmentRow, BuildingInput, Catalog, DesignParams, OutletRow};

pub const DEFAULT_SEED: u64 = 11;

/// Ranges and levels used for a synthetic building.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub floors: u32,
    pub apartments_per_floor: u32,
    pub seed: u64,
    pub outlets: (u32, u32),
    pub tap_to_splitter_m: (u32, u32),
    pub outlet_cable_m: (u32, u32),
}

impl GeneratorConfig {
    pub fn new(floors: u32, apartments_per_floor: u32) -> Self {
        Self {
            floors,
            apartments_per_floor,
            seed: DEFAULT_SEED,
            outlets: (1, 5),
            tap_to_splitter_m: (5, 15),
            outlet_cable_m: (5, 20),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Generate a building with random outlet counts and cable lengths.
///
/// Levels follow a typical installation brief: 110 dBµV at the head-end,
/// a 48–69 dBµV band around a 58 dBµV target, 7 m from the head-end to
/// the top floor and 3 m minimum feeders.
pub fn generate(config: &GeneratorConfig) -> BuildingInput {
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut params = DesignParams::new(config.floors, config.apartments_per_floor)
        .with_levels(48.0, 58.0, 69.0);
    params.input_power_dbuv = 110.0;
    params.headend_run_m = 7.0;
    params.feeder_min_length_m = 3.0;

    let mut apartments = Vec::new();
    let mut outlets = Vec::new();
    for floor in (1..=config.floors).rev() {
        for apartment in 1..=config.apartments_per_floor {
            let count = rng.gen_range(config.outlets.0..=config.outlets.1);
            let run = rng.gen_range(config.tap_to_splitter_m.0..=config.tap_to_splitter_m.1);
            apartments.push(ApartmentRow {
                floor,
                apartment,
                outlets: count,
                tap_to_splitter_m: Some(f64::from(run)),
            });
        }
    }
    for row in &apartments {
        for outlet in 1..=row.outlets {
            let cable = rng.gen_range(config.outlet_cable_m.0..=config.outlet_cable_m.1);
            outlets.push(OutletRow {
                floor: row.floor,
                apartment: row.apartment,
                outlet,
                cable_m: f64::from(cable),
            });
        }
    }

    BuildingInput {
        params,
        apartments,
        outlets,
        catalog: Catalog::reference(),
    }
}
