//! # riser-core: building data for coaxial riser design
//!
//! Holds everything the optimizer consumes, independent of any solver:
//!
//! - [`DesignParams`]: building-wide loss-budget parameters with defaults
//! - [`Catalog`]: tap and splitter models
//! - [`BuildingInput`]: the raw TOML/JSON description (rows + catalog)
//! - [`Building`]: the validated, keyed form used to build the model
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use riser_core::{Building, BuildingInput};
//!
//! let input = BuildingInput::from_path("building.toml")?;
//! let building = Building::from_input(input)?;
//! println!("{} outlets", building.num_outlets());
//! # Ok::<(), riser_core::RiserError>(())
//! ```

pub mod building;
pub mod catalog;
pub mod error;
pub mod keys;
pub mod params;

pub use building::{Apartment, ApartmentRow, Building, BuildingInput, OutletRow};
pub use catalog::{Catalog, SplitterModel, TapModel};
pub use error::{RiserError, RiserResult};
pub use keys::{ApartmentKey, OutletKey};
pub use params::{DesignParams, APARTMENT_CONNECTORS};
