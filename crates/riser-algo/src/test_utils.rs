//! Building fixtures shared by unit and integration tests.

use riser_core::{ApartmentRow, Building, BuildingInput, Catalog, DesignParams, OutletRow};

/// Every apartment gets `outlets` outlets, `run_m` of tap-to-splitter cable
/// and `cable_m` per outlet.
pub fn uniform_input(
    params: DesignParams,
    outlets: u32,
    run_m: f64,
    cable_m: f64,
) -> BuildingInput {
    let mut apartments = Vec::new();
    let mut outlet_rows = Vec::new();
    for floor in (1..=params.floors).rev() {
        for apartment in 1..=params.apartments_per_floor {
            apartments.push(ApartmentRow {
                floor,
                apartment,
                outlets,
                tap_to_splitter_m: Some(run_m),
            });
            for outlet in 1..=outlets {
                outlet_rows.push(OutletRow {
                    floor,
                    apartment,
                    outlet,
                    cable_m,
                });
            }
        }
    }
    BuildingInput {
        params,
        apartments,
        outlets: outlet_rows,
        catalog: Catalog::reference(),
    }
}

/// Validated [`uniform_input`] with the reference catalog.
pub fn uniform_building(
    params: DesignParams,
    outlets: u32,
    run_m: f64,
    cable_m: f64,
) -> riser_core::RiserResult<Building> {
    Building::from_input(uniform_input(params, outlets, run_m, cable_m))
}
