//! Equipment catalog: floor taps and splitters.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{RiserError, RiserResult};

/// A floor tap (derivador).
///
/// The tap hands `tap_loss_db` worth of attenuated signal to each of its
/// `outputs` and passes the rest down the riser with `through_loss_db`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TapModel {
    pub id: String,
    pub tap_loss_db: f64,
    pub through_loss_db: f64,
    pub outputs: u32,
}

impl TapModel {
    pub fn new(id: impl Into<String>, tap_loss_db: f64, through_loss_db: f64, outputs: u32) -> Self {
        Self {
            id: id.into(),
            tap_loss_db,
            through_loss_db,
            outputs,
        }
    }
}

/// A splitter (repartidor), used at the trunk and inside apartments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitterModel {
    pub id: String,
    pub insertion_loss_db: f64,
    pub outputs: u32,
}

impl SplitterModel {
    pub fn new(id: impl Into<String>, insertion_loss_db: f64, outputs: u32) -> Self {
        Self {
            id: id.into(),
            insertion_loss_db,
            outputs,
        }
    }
}

/// Tap and splitter models available to the optimizer.
///
/// Order matters only for reproducibility: decision variables are created
/// per model in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    #[serde(default)]
    pub taps: Vec<TapModel>,
    #[serde(default)]
    pub splitters: Vec<SplitterModel>,
}

impl Catalog {
    pub fn new(taps: Vec<TapModel>, splitters: Vec<SplitterModel>) -> Self {
        Self { taps, splitters }
    }

    /// Tap and splitter lines commonly stocked for residential installs.
    pub fn reference() -> Self {
        let taps = vec![
            TapModel::new("TLV519325", 24.0, 1.5, 2),
            TapModel::new("TLV519324", 20.0, 1.5, 2),
            TapModel::new("TLV519323", 16.0, 2.0, 2),
            TapModel::new("TLV519322", 12.0, 2.3, 2),
            TapModel::new("TLV519345", 23.2, 2.3, 4),
            TapModel::new("TLV519344", 20.5, 2.2, 4),
            TapModel::new("TLV519343", 17.0, 2.5, 4),
            TapModel::new("TLV519342", 13.0, 2.5, 4),
            TapModel::new("TLV519365", 24.0, 2.0, 6),
            TapModel::new("TLV519364", 20.0, 3.0, 6),
            TapModel::new("TLV519363", 17.0, 5.0, 6),
            TapModel::new("TLV519385", 24.5, 2.2, 8),
            TapModel::new("TLV519384", 20.0, 4.5, 8),
            TapModel::new("TLV519383", 17.5, 5.5, 8),
        ];
        let splitters = vec![
            SplitterModel::new("TLV453003", 4.0, 2),
            SplitterModel::new("TLV519502", 5.0, 2),
            SplitterModel::new("TLV519503", 8.0, 3),
            SplitterModel::new("TLV519504", 9.0, 4),
            SplitterModel::new("TLV519505", 11.0, 5),
            SplitterModel::new("TLV519506", 12.0, 6),
            SplitterModel::new("TLV519508", 15.0, 8),
        ];
        Self { taps, splitters }
    }

    pub fn tap(&self, id: &str) -> Option<&TapModel> {
        self.taps.iter().find(|t| t.id == id)
    }

    pub fn splitter(&self, id: &str) -> Option<&SplitterModel> {
        self.splitters.iter().find(|s| s.id == id)
    }

    /// Largest fan-out offered by any splitter model.
    pub fn max_splitter_outputs(&self) -> u32 {
        self.splitters.iter().map(|s| s.outputs).max().unwrap_or(0)
    }

    /// Largest fan-out offered by any tap model.
    pub fn max_tap_outputs(&self) -> u32 {
        self.taps.iter().map(|t| t.outputs).max().unwrap_or(0)
    }

    /// Reject empty tables, duplicate ids and negative losses.
    pub fn validate(&self) -> RiserResult<()> {
        if self.taps.is_empty() {
            return Err(RiserError::Validation("catalog has no tap models".into()));
        }
        if self.splitters.is_empty() {
            return Err(RiserError::Validation("catalog has no splitter models".into()));
        }

        let mut seen = HashSet::new();
        for tap in &self.taps {
            if !seen.insert(tap.id.as_str()) {
                return Err(RiserError::Validation(format!("duplicate tap model '{}'", tap.id)));
            }
            if !(tap.tap_loss_db >= 0.0 && tap.through_loss_db >= 0.0) {
                return Err(RiserError::Validation(format!(
                    "tap model '{}' has a negative or undefined loss",
                    tap.id
                )));
            }
        }

        seen.clear();
        for splitter in &self.splitters {
            if !seen.insert(splitter.id.as_str()) {
                return Err(RiserError::Validation(format!(
                    "duplicate splitter model '{}'",
                    splitter.id
                )));
            }
            if !(splitter.insertion_loss_db >= 0.0) {
                return Err(RiserError::Validation(format!(
                    "splitter model '{}' has a negative or undefined insertion loss",
                    splitter.id
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_catalog_is_valid() {
        let catalog = Catalog::reference();
        catalog.validate().expect("reference catalog validates");
        assert_eq!(catalog.taps.len(), 14);
        assert_eq!(catalog.splitters.len(), 7);
        assert_eq!(catalog.max_tap_outputs(), 8);
        assert_eq!(catalog.max_splitter_outputs(), 8);
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = Catalog::reference();
        let tap = catalog.tap("TLV519343").expect("tap present");
        assert_eq!(tap.outputs, 4);
        assert!(catalog.splitter("nope").is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let catalog = Catalog::new(
            vec![TapModel::new("T1", 10.0, 1.0, 2), TapModel::new("T1", 12.0, 1.0, 2)],
            vec![SplitterModel::new("S1", 4.0, 2)],
        );
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_empty_splitters_rejected() {
        let catalog = Catalog::new(vec![TapModel::new("T1", 10.0, 1.0, 2)], vec![]);
        assert!(catalog.validate().is_err());
    }
}
