//! # riser-algo: coaxial riser network design
//!
//! Chooses a trunk splitter, one tap per floor and a splitter per apartment
//! so that every TV outlet lands inside the admissible level band, as close
//! as possible to the target level.
//!
//! ## Pipeline
//!
//! | Step | Function | Output |
//! |------|----------|--------|
//! | Partition floors into riser blocks | [`topology::plan_risers`] | [`RiserBlock`]s |
//! | Build the MILP | [`milp::build_model`] | [`Formulation`] |
//! | Solve with HiGHS | [`milp::solve`] | [`SolvedModel`] |
//! | Decode equipment and loss budgets | [`milp::decode`] | [`Design`] |
//! | Reports | [`report::build_report`] | [`BuildingReport`] |
//!
//! [`design_network`] runs the first four steps.
//!
//! ## Example
//!
//! ```no_run
//! use riser_algo::{design_network, DesignOptions};
//! use riser_core::Building;
//!
//! let building = Building::from_path("building.toml")?;
//! let design = design_network(&building, &DesignOptions::default())?;
//! println!("{}", design.headline());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod generator;
pub mod milp;
pub mod pipeline;
pub mod report;
pub mod test_utils;
pub mod topology;

pub use error::{DesignError, DesignResult};
pub use generator::{generate, GeneratorConfig};
pub use milp::{
    build_model, decode, solve, Design, DesignSummary, Formulation, OutletRecord, SolveStatus,
    SolvedModel, SolverConfig,
};
pub use pipeline::{check_status, design_network, DesignOptions};
pub use report::{build_report, BuildingReport, FloorSummary, FrequencyRow, Inventory};
pub use topology::{entry_and_direction, partition, plan_risers, Block, Direction, RiserBlock, TopologyError};
