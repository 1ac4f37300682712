//! Building input records and the validated [`Building`].
//!
//! [`BuildingInput`] mirrors the on-disk layout (TOML or JSON) as plain rows.
//! [`Building::from_input`] turns it into keyed tables and enforces the
//! preconditions of the optimizer:
//!
//! - every declared outlet has a cable length,
//! - every apartment with at least one outlet has a tap-to-splitter length,
//! - keys fall inside the building and appear at most once.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{RiserError, RiserResult};
use crate::keys::{ApartmentKey, OutletKey};
use crate::params::DesignParams;

/// One row of the per-apartment table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApartmentRow {
    pub floor: u32,
    pub apartment: u32,
    /// Outlets (TUs) required in this apartment
    pub outlets: u32,
    /// Cable from the floor tap to the apartment splitter location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tap_to_splitter_m: Option<f64>,
}

/// One row of the per-outlet table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutletRow {
    pub floor: u32,
    pub apartment: u32,
    pub outlet: u32,
    /// Cable from the apartment splitter (or tap) to the outlet
    pub cable_m: f64,
}

/// Raw building description as read from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildingInput {
    pub params: DesignParams,
    #[serde(default)]
    pub apartments: Vec<ApartmentRow>,
    #[serde(default)]
    pub outlets: Vec<OutletRow>,
    pub catalog: Catalog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputFormat {
    Toml,
    Json,
}

fn format_for(path: &Path) -> RiserResult<InputFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(InputFormat::Toml),
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(InputFormat::Json),
        _ => Err(RiserError::Config(format!(
            "cannot infer format of '{}'; use a .toml or .json extension",
            path.display()
        ))),
    }
}

impl BuildingInput {
    /// Read a building description, choosing the parser from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> RiserResult<Self> {
        let path = path.as_ref();
        let format = format_for(path)?;
        let text = fs::read_to_string(path)?;
        match format {
            InputFormat::Toml => Ok(toml::from_str(&text)?),
            InputFormat::Json => Ok(serde_json::from_str(&text)?),
        }
    }

    /// Write the description in the format implied by the extension.
    pub fn to_path(&self, path: impl AsRef<Path>) -> RiserResult<()> {
        let path = path.as_ref();
        let text = match format_for(path)? {
            InputFormat::Toml => toml::to_string_pretty(self)?,
            InputFormat::Json => serde_json::to_string_pretty(self)?,
        };
        fs::write(path, text)?;
        Ok(())
    }
}

/// Per-apartment requirements after validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Apartment {
    pub outlets: u32,
    /// Present whenever `outlets > 0`
    pub tap_to_splitter_m: Option<f64>,
}

impl Apartment {
    /// Apartments with more than one outlet need their own splitter.
    #[inline]
    pub fn needs_splitter(&self) -> bool {
        self.outlets > 1
    }
}

/// A validated building: parameters, catalog and keyed cable tables.
#[derive(Debug, Clone)]
pub struct Building {
    pub params: DesignParams,
    pub catalog: Catalog,
    apartments: BTreeMap<ApartmentKey, Apartment>,
    outlet_cables: BTreeMap<OutletKey, f64>,
}

impl Building {
    /// Validate raw rows and build keyed tables.
    pub fn from_input(input: BuildingInput) -> RiserResult<Self> {
        let BuildingInput {
            params,
            apartments: apartment_rows,
            outlets: outlet_rows,
            catalog,
        } = input;

        params.validate()?;
        catalog.validate()?;

        let mut apartments = BTreeMap::new();
        for row in apartment_rows {
            let key = ApartmentKey::new(row.floor, row.apartment);
            check_in_building(&params, key)?;
            if let Some(len) = row.tap_to_splitter_m {
                check_length(len, || format!("tap-to-splitter length of {key}"))?;
            }
            let apartment = Apartment {
                outlets: row.outlets,
                tap_to_splitter_m: row.tap_to_splitter_m,
            };
            if apartments.insert(key, apartment).is_some() {
                return Err(RiserError::Validation(format!("apartment {key} listed twice")));
            }
        }

        let mut outlet_cables = BTreeMap::new();
        for row in outlet_rows {
            let key = OutletKey::new(row.floor, row.apartment, row.outlet);
            let declared = apartments
                .get(&key.apartment_key())
                .map_or(0, |a: &Apartment| a.outlets);
            if key.outlet == 0 || key.outlet > declared {
                return Err(RiserError::Validation(format!(
                    "outlet {key} is not declared (apartment has {declared} outlets)"
                )));
            }
            check_length(row.cable_m, || format!("cable length of outlet {key}"))?;
            if outlet_cables.insert(key, row.cable_m).is_some() {
                return Err(RiserError::Validation(format!("outlet {key} listed twice")));
            }
        }

        for (key, apartment) in &apartments {
            if apartment.outlets == 0 {
                continue;
            }
            for outlet in 1..=apartment.outlets {
                let outlet_key = key.outlet(outlet);
                if !outlet_cables.contains_key(&outlet_key) {
                    return Err(RiserError::MissingOutletCable(outlet_key));
                }
            }
            if apartment.tap_to_splitter_m.is_none() {
                return Err(RiserError::MissingApartmentCable(*key));
            }
        }

        Ok(Self {
            params,
            catalog,
            apartments,
            outlet_cables,
        })
    }

    /// Load and validate in one step.
    pub fn from_path(path: impl AsRef<Path>) -> RiserResult<Self> {
        Self::from_input(BuildingInput::from_path(path)?)
    }

    /// Floors from the top of the building down.
    pub fn floors_desc(&self) -> impl Iterator<Item = u32> {
        (1..=self.params.floors).rev()
    }

    /// Every apartment slot of the building, top floor first.
    ///
    /// Slots without a row in the apartment table are included; they
    /// simply have no outlets.
    pub fn apartment_slots(&self) -> Vec<ApartmentKey> {
        let per_floor = self.params.apartments_per_floor;
        self.floors_desc()
            .flat_map(|floor| (1..=per_floor).map(move |apt| ApartmentKey::new(floor, apt)))
            .collect()
    }

    /// Apartment requirements, if the slot was declared.
    pub fn apartment(&self, key: ApartmentKey) -> Option<&Apartment> {
        self.apartments.get(&key)
    }

    /// Required outlets in an apartment (0 when undeclared).
    pub fn outlet_count(&self, key: ApartmentKey) -> u32 {
        self.apartments.get(&key).map_or(0, |a| a.outlets)
    }

    /// Cable from tap to splitter location for an apartment with outlets.
    pub fn tap_to_splitter_m(&self, key: ApartmentKey) -> RiserResult<f64> {
        self.apartments
            .get(&key)
            .and_then(|a| a.tap_to_splitter_m)
            .ok_or(RiserError::MissingApartmentCable(key))
    }

    /// Cable from splitter to outlet.
    pub fn outlet_cable_m(&self, key: OutletKey) -> RiserResult<f64> {
        self.outlet_cables
            .get(&key)
            .copied()
            .ok_or(RiserError::MissingOutletCable(key))
    }

    /// Every outlet in top-down order: floors descending, then apartment
    /// and outlet index ascending.
    pub fn outlets(&self) -> Vec<OutletKey> {
        self.apartment_slots()
            .into_iter()
            .flat_map(|apt| (1..=self.outlet_count(apt)).map(move |tu| apt.outlet(tu)))
            .collect()
    }

    pub fn num_outlets(&self) -> usize {
        self.outlet_cables.len()
    }

    /// Apartments that actually host outlets.
    pub fn occupied_apartments(&self) -> impl Iterator<Item = (ApartmentKey, &Apartment)> {
        self.apartments
            .iter()
            .filter(|(_, a)| a.outlets > 0)
            .map(|(k, a)| (*k, a))
    }
}

fn check_in_building(params: &DesignParams, key: ApartmentKey) -> RiserResult<()> {
    if key.floor == 0 || key.floor > params.floors {
        return Err(RiserError::Validation(format!(
            "apartment {key} is outside floors 1..={}",
            params.floors
        )));
    }
    if key.apartment == 0 || key.apartment > params.apartments_per_floor {
        return Err(RiserError::Validation(format!(
            "apartment {key} is outside apartments 1..={}",
            params.apartments_per_floor
        )));
    }
    Ok(())
}

fn check_length(value: f64, what: impl FnOnce() -> String) -> RiserResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RiserError::Validation(format!(
            "{} must be a finite non-negative number, got {value}",
            what()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> BuildingInput {
        BuildingInput {
            params: DesignParams::new(2, 2),
            apartments: vec![
                ApartmentRow {
                    floor: 2,
                    apartment: 1,
                    outlets: 2,
                    tap_to_splitter_m: Some(8.0),
                },
                ApartmentRow {
                    floor: 1,
                    apartment: 2,
                    outlets: 1,
                    tap_to_splitter_m: Some(6.0),
                },
            ],
            outlets: vec![
                OutletRow {
                    floor: 2,
                    apartment: 1,
                    outlet: 1,
                    cable_m: 10.0,
                },
                OutletRow {
                    floor: 2,
                    apartment: 1,
                    outlet: 2,
                    cable_m: 12.0,
                },
                OutletRow {
                    floor: 1,
                    apartment: 2,
                    outlet: 1,
                    cable_m: 7.0,
                },
            ],
            catalog: Catalog::reference(),
        }
    }

    #[test]
    fn test_outlets_are_top_down() {
        let building = Building::from_input(sample_input()).expect("valid building");
        assert_eq!(
            building.outlets(),
            vec![
                OutletKey::new(2, 1, 1),
                OutletKey::new(2, 1, 2),
                OutletKey::new(1, 2, 1),
            ]
        );
        assert_eq!(building.num_outlets(), 3);
        assert_eq!(building.apartment_slots().len(), 4);
        assert_eq!(building.outlet_count(ApartmentKey::new(1, 1)), 0);
    }

    #[test]
    fn test_missing_outlet_cable_is_named() {
        let mut input = sample_input();
        input.outlets.remove(1);
        let err = Building::from_input(input).unwrap_err();
        match err {
            RiserError::MissingOutletCable(key) => assert_eq!(key, OutletKey::new(2, 1, 2)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_apartment_cable_is_named() {
        let mut input = sample_input();
        input.apartments[1].tap_to_splitter_m = None;
        let err = Building::from_input(input).unwrap_err();
        match err {
            RiserError::MissingApartmentCable(key) => assert_eq!(key, ApartmentKey::new(1, 2)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_apartment_needs_no_lengths() {
        let mut input = sample_input();
        input.apartments.push(ApartmentRow {
            floor: 1,
            apartment: 1,
            outlets: 0,
            tap_to_splitter_m: None,
        });
        assert!(Building::from_input(input).is_ok());
    }

    #[test]
    fn test_undeclared_outlet_rejected() {
        let mut input = sample_input();
        input.outlets.push(OutletRow {
            floor: 1,
            apartment: 2,
            outlet: 2,
            cable_m: 3.0,
        });
        assert!(matches!(
            Building::from_input(input),
            Err(RiserError::Validation(_))
        ));
    }

    #[test]
    fn test_apartment_outside_building_rejected() {
        let mut input = sample_input();
        input.apartments[0].floor = 3;
        assert!(Building::from_input(input).is_err());
    }

    #[test]
    fn test_duplicate_apartment_rejected() {
        let mut input = sample_input();
        let dup = input.apartments[0].clone();
        input.apartments.push(dup);
        assert!(Building::from_input(input).is_err());
    }
}
