//! General design parameters.
//!
//! Every recognised option is a field of [`DesignParams`] with its default
//! spelled out below. Unknown keys in an input file are rejected by serde
//! rather than silently ignored.

use serde::{Deserialize, Serialize};

use crate::error::{RiserError, RiserResult};

/// Connectors counted inside each apartment run (tap output, splitter
/// input and the two ends of the wall-box jumper).
pub const APARTMENT_CONNECTORS: u32 = 4;

/// Building-wide parameters of the loss budget.
///
/// Levels are in dBµV, attenuations in dB (or dB/m) and lengths in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesignParams {
    /// Number of floors (1 = ground floor, `floors` = top floor)
    pub floors: u32,
    /// Apartments on every floor
    pub apartments_per_floor: u32,
    /// Level delivered by the head-end amplifier
    #[serde(default = "default_input_power")]
    pub input_power_dbuv: f64,
    /// Lowest admissible outlet level
    #[serde(default = "default_min_level")]
    pub min_level_dbuv: f64,
    /// Highest admissible outlet level
    #[serde(default = "default_max_level")]
    pub max_level_dbuv: f64,
    /// Outlet level the optimizer steers toward
    #[serde(default = "default_target_level")]
    pub target_level_dbuv: f64,
    /// Reference cable attenuation used by the optimizer
    #[serde(default = "default_cable_loss")]
    pub cable_loss_db_per_m: f64,
    /// Cable attenuation at 470 MHz (reporting only)
    #[serde(default = "default_cable_loss_470")]
    pub cable_loss_470mhz_db_per_m: f64,
    /// Cable attenuation at 698 MHz (reporting only)
    #[serde(default = "default_cable_loss_698")]
    pub cable_loss_698mhz_db_per_m: f64,
    /// Loss of a single F connector
    #[serde(default = "default_connector_loss")]
    pub connector_loss_db: f64,
    /// Connectors at every cable union (feeder ends, riser hops, trunk run)
    #[serde(default = "default_connectors_per_union")]
    pub connectors_per_union: u32,
    /// Loss of the outlet's own connection
    #[serde(default = "default_outlet_connection_loss")]
    pub outlet_connection_loss_db: f64,
    /// Riser cable between two consecutive floors
    #[serde(default = "default_inter_floor_length")]
    pub inter_floor_length_m: f64,
    /// Minimum feeder length from the trunk splitter to a block entry
    #[serde(default = "default_feeder_min_length")]
    pub feeder_min_length_m: f64,
    /// Cable from the head-end amplifier down to the top floor
    #[serde(default = "default_headend_run")]
    pub headend_run_m: f64,
    /// Floor hosting the trunk splitter; defaults to the building midpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trunk_floor: Option<u32>,
}

fn default_input_power() -> f64 {
    110.0
}

fn default_min_level() -> f64 {
    47.0
}

fn default_max_level() -> f64 {
    70.0
}

fn default_target_level() -> f64 {
    60.0
}

fn default_cable_loss() -> f64 {
    0.2
}

fn default_cable_loss_470() -> f64 {
    0.127
}

fn default_cable_loss_698() -> f64 {
    0.1558
}

fn default_connector_loss() -> f64 {
    0.2
}

fn default_connectors_per_union() -> u32 {
    2
}

fn default_outlet_connection_loss() -> f64 {
    1.0
}

fn default_inter_floor_length() -> f64 {
    3.0
}

fn default_feeder_min_length() -> f64 {
    3.0
}

fn default_headend_run() -> f64 {
    5.0
}

impl DesignParams {
    /// Parameters for a building with every optional value at its default.
    pub fn new(floors: u32, apartments_per_floor: u32) -> Self {
        Self {
            floors,
            apartments_per_floor,
            input_power_dbuv: default_input_power(),
            min_level_dbuv: default_min_level(),
            max_level_dbuv: default_max_level(),
            target_level_dbuv: default_target_level(),
            cable_loss_db_per_m: default_cable_loss(),
            cable_loss_470mhz_db_per_m: default_cable_loss_470(),
            cable_loss_698mhz_db_per_m: default_cable_loss_698(),
            connector_loss_db: default_connector_loss(),
            connectors_per_union: default_connectors_per_union(),
            outlet_connection_loss_db: default_outlet_connection_loss(),
            inter_floor_length_m: default_inter_floor_length(),
            feeder_min_length_m: default_feeder_min_length(),
            headend_run_m: default_headend_run(),
            trunk_floor: None,
        }
    }

    /// Set the admissible band and target level
    pub fn with_levels(mut self, min: f64, target: f64, max: f64) -> Self {
        self.min_level_dbuv = min;
        self.target_level_dbuv = target;
        self.max_level_dbuv = max;
        self
    }

    /// Pin the trunk splitter to a floor
    pub fn with_trunk_floor(mut self, floor: u32) -> Self {
        self.trunk_floor = Some(floor);
        self
    }

    /// Floor of the trunk splitter.
    ///
    /// Without an explicit value this is `floors / 2` rounded half-to-even,
    /// so a single-storey building places the trunk below floor 1.
    pub fn trunk_floor(&self) -> u32 {
        self.trunk_floor
            .unwrap_or_else(|| (f64::from(self.floors) / 2.0).round_ties_even() as u32)
    }

    /// Attenuation of `length_m` meters of cable at the reference frequency.
    #[inline]
    pub fn cable_loss(&self, length_m: f64) -> f64 {
        length_m * self.cable_loss_db_per_m
    }

    /// Loss of one cable union (`connectors_per_union` connectors).
    #[inline]
    pub fn union_loss(&self) -> f64 {
        f64::from(self.connectors_per_union) * self.connector_loss_db
    }

    /// Fixed connector loss inside an apartment run.
    #[inline]
    pub fn apartment_connector_loss(&self) -> f64 {
        f64::from(APARTMENT_CONNECTORS) * self.connector_loss_db
    }

    /// Check ranges that would make the loss budget meaningless.
    pub fn validate(&self) -> RiserResult<()> {
        if self.floors == 0 {
            return Err(RiserError::Validation("building must have at least one floor".into()));
        }
        if self.apartments_per_floor == 0 {
            return Err(RiserError::Validation(
                "building must have at least one apartment per floor".into(),
            ));
        }
        if self.min_level_dbuv > self.max_level_dbuv {
            return Err(RiserError::Validation(format!(
                "minimum level {} dBµV exceeds maximum level {} dBµV",
                self.min_level_dbuv, self.max_level_dbuv
            )));
        }

        let non_negative = [
            ("cable_loss_db_per_m", self.cable_loss_db_per_m),
            ("cable_loss_470mhz_db_per_m", self.cable_loss_470mhz_db_per_m),
            ("cable_loss_698mhz_db_per_m", self.cable_loss_698mhz_db_per_m),
            ("connector_loss_db", self.connector_loss_db),
            ("outlet_connection_loss_db", self.outlet_connection_loss_db),
            ("inter_floor_length_m", self.inter_floor_length_m),
            ("feeder_min_length_m", self.feeder_min_length_m),
            ("headend_run_m", self.headend_run_m),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(RiserError::Validation(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }

        let levels = [
            ("input_power_dbuv", self.input_power_dbuv),
            ("min_level_dbuv", self.min_level_dbuv),
            ("max_level_dbuv", self.max_level_dbuv),
            ("target_level_dbuv", self.target_level_dbuv),
        ];
        for (name, value) in levels {
            if !value.is_finite() {
                return Err(RiserError::Validation(format!("{name} must be finite")));
            }
        }

        if self.trunk_floor() > self.floors {
            return Err(RiserError::Validation(format!(
                "trunk floor {} is above the top floor {}",
                self.trunk_floor(),
                self.floors
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_toml() {
        let params: DesignParams = toml::from_str("floors = 10\napartments_per_floor = 4\n")
            .expect("minimal params parse");

        assert_eq!(params, DesignParams::new(10, 4));
        assert_eq!(params.input_power_dbuv, 110.0);
        assert_eq!(params.connectors_per_union, 2);
        assert_eq!(params.trunk_floor(), 5);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let parsed: Result<DesignParams, _> =
            toml::from_str("floors = 3\napartments_per_floor = 1\nmystery = 1\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_trunk_floor_rounds_half_to_even() {
        assert_eq!(DesignParams::new(5, 1).trunk_floor(), 2);
        assert_eq!(DesignParams::new(7, 1).trunk_floor(), 4);
        assert_eq!(DesignParams::new(1, 1).trunk_floor(), 0);
        assert_eq!(DesignParams::new(7, 1).with_trunk_floor(1).trunk_floor(), 1);
    }

    #[test]
    fn test_loss_helpers() {
        let params = DesignParams::new(4, 2);
        assert!((params.cable_loss(10.0) - 2.0).abs() < 1e-12);
        assert!((params.union_loss() - 0.4).abs() < 1e-12);
        assert!((params.apartment_connector_loss() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_inverted_band() {
        let params = DesignParams::new(4, 2).with_levels(70.0, 60.0, 47.0);
        assert!(matches!(params.validate(), Err(RiserError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_trunk_above_roof() {
        let params = DesignParams::new(4, 2).with_trunk_floor(9);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_attenuation() {
        let mut params = DesignParams::new(4, 2);
        params.connector_loss_db = -0.1;
        assert!(params.validate().is_err());
    }
}
