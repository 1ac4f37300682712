//! Riser network design as a Mixed-Integer Linear Program.
//!
//! ## Problem Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  COAXIAL RISER DESIGN                                                    │
//! │  ────────────────────                                                    │
//! │                                                                          │
//! │  Given:                                                                  │
//! │    • Floors grouped into riser blocks fed by one trunk splitter         │
//! │    • Outlets per apartment and every cable length                       │
//! │    • A catalog of taps and splitters                                    │
//! │                                                                          │
//! │  Decide:                                                                 │
//! │    • Trunk splitter model (binary per model)                            │
//! │    • Tap model on every floor (binary per floor × model)                │
//! │    • Splitter model in every apartment (binary per apartment × model)   │
//! │                                                                          │
//! │  Minimize:                                                               │
//! │    Σ |outlet level − target level|                                      │
//! │                                                                          │
//! │  Subject to:                                                             │
//! │    • Loss propagation from the head-end to every outlet                 │
//! │    • Every outlet level inside [minimum, maximum]                       │
//! │    • Equipment fan-out covers the downstream connections                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## MILP Formulation
//!
//! With `t_j`, `x_{p,d}`, `y_{a,r}` and `u_a` the trunk, tap, apartment
//! splitter and "splitter used" binaries:
//!
//! ```text
//! minimize    Σ_o (e_o + s_o)
//!
//! subject to:
//!   Σ_j t_j = 1,  t_j = 0 if outputs_j < #blocks                 Trunk
//!   Σ_d x_{p,d} = 1,  x_{p,d} = 0 if outputs_d < apartments      Taps
//!   u_a = [n_a > 1],  Σ_r y_{a,r} = u_a,
//!       y_{a,r} = 0 if outputs_r < n_a                           Apartment splitters
//!   U = α·L_ant + k·c + Σ_j t_j·ins_j                            Common upstream loss
//!   L_{b,entry} = P_in − U − α·L_feed(b) − k·c                   Block entry
//!   L_{b,next}  = L_{b,prev} − Σ_d x_{prev,d}·thr_d − α·h − k·c  Riser hop
//!   N_o = L_{b,p} − Σ_d x_{p,d}·tap_d − α·l_a − 4c
//!         − Σ_r y_{a,r}·ins_r − α·l_o − c_tu                     Outlet level
//!   N_min ≤ N_o ≤ N_max                                          Band
//!   N_o − N_target = e_o − s_o,  e_o, s_o ≥ 0                    Deviation
//!   L, N ≥ 0
//! ```
//!
//! where `α` is the cable attenuation per meter, `c` the connector loss,
//! `k` the connectors per union and `h` the inter-floor length.
//!
//! The pipeline is split in three steps that hand explicit values to each
//! other: [`build_model`] returns a [`Formulation`] with every variable
//! handle, [`solve`] turns it into a [`SolvedModel`] holding evaluated
//! decisions, and [`decode`] reads those into a [`Design`].

mod decode;
mod formulation;
mod solution;
mod solver;

pub use decode::{decode, BALANCE_TOLERANCE_DB};
pub use formulation::{build_model, Decisions, Formulation, NetworkLayout, RiserPoint};
pub use solution::{
    ApartmentSplitter, Design, DesignSummary, FloorTap, OutletRecord, TrunkChoice,
};
pub use solver::{solve, Assignment, SolveStatus, SolvedModel, SolverConfig};

#[cfg(not(feature = "solver-highs"))]
compile_error!("riser-algo needs a MILP backend; enable the `solver-highs` feature");
