//! Composite identifiers for apartments and outlets.
//!
//! Apartments are addressed by `(floor, apartment)` and outlets by
//! `(floor, apartment, outlet)`. Both derive a lexicographic ordering so they
//! can key `BTreeMap`s deterministically.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Apartment identifier: floor number and 1-based apartment number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApartmentKey {
    pub floor: u32,
    pub apartment: u32,
}

impl ApartmentKey {
    #[inline]
    pub fn new(floor: u32, apartment: u32) -> Self {
        Self { floor, apartment }
    }

    /// Key of the `outlet`-th outlet in this apartment.
    #[inline]
    pub fn outlet(&self, outlet: u32) -> OutletKey {
        OutletKey::new(self.floor, self.apartment, outlet)
    }
}

impl fmt::Display for ApartmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(floor {}, apartment {})", self.floor, self.apartment)
    }
}

/// Outlet (TU) identifier: floor, apartment and 1-based outlet index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OutletKey {
    pub floor: u32,
    pub apartment: u32,
    pub outlet: u32,
}

impl OutletKey {
    #[inline]
    pub fn new(floor: u32, apartment: u32, outlet: u32) -> Self {
        Self {
            floor,
            apartment,
            outlet,
        }
    }

    #[inline]
    pub fn apartment_key(&self) -> ApartmentKey {
        ApartmentKey::new(self.floor, self.apartment)
    }

    /// Short label used in reports, e.g. `P03A2TU1`.
    pub fn label(&self) -> String {
        format!("P{:02}A{}TU{}", self.floor, self.apartment, self.outlet)
    }
}

impl fmt::Display for OutletKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(floor {}, apartment {}, outlet {})",
            self.floor, self.apartment, self.outlet
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_outlet_ordering_is_lexicographic() {
        let keys: BTreeSet<OutletKey> = [
            OutletKey::new(2, 1, 1),
            OutletKey::new(1, 2, 1),
            OutletKey::new(1, 1, 2),
            OutletKey::new(1, 1, 1),
        ]
        .into_iter()
        .collect();

        let ordered: Vec<_> = keys.into_iter().collect();
        assert_eq!(ordered[0], OutletKey::new(1, 1, 1));
        assert_eq!(ordered[1], OutletKey::new(1, 1, 2));
        assert_eq!(ordered[2], OutletKey::new(1, 2, 1));
        assert_eq!(ordered[3], OutletKey::new(2, 1, 1));
    }

    #[test]
    fn test_label_format() {
        assert_eq!(OutletKey::new(3, 2, 1).label(), "P03A2TU1");
        assert_eq!(OutletKey::new(12, 4, 5).label(), "P12A4TU5");
    }

    #[test]
    fn test_apartment_roundtrip() {
        let apt = ApartmentKey::new(7, 3);
        assert_eq!(apt.outlet(2).apartment_key(), apt);
    }
}
