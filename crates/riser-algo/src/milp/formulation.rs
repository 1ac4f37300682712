//! Construction of the riser MILP.

use std::collections::BTreeMap;

use good_lp::{constraint, variable, variables, Constraint, Expression, ProblemVariables, Variable};
use riser_core::{ApartmentKey, Building, DesignParams, OutletKey, RiserError};
use tracing::debug;

use crate::error::{DesignError, DesignResult};
use crate::topology::{plan_risers, RiserBlock, TopologyError};

/// A riser level variable: block index and floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RiserPoint {
    pub block: usize,
    pub floor: u32,
}

/// Every decision of the model, keyed the way the decoder reads them.
///
/// Built with `T = Variable` and evaluated into `T = f64` once solved.
/// Catalog-indexed vectors follow the catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct Decisions<T> {
    /// One entry per splitter model
    pub trunk: Vec<T>,
    /// Floor → one entry per tap model
    pub taps: BTreeMap<u32, Vec<T>>,
    /// Apartment → "uses a splitter"
    pub splitter_used: BTreeMap<ApartmentKey, T>,
    /// Apartment → one entry per splitter model
    pub splitters: BTreeMap<ApartmentKey, Vec<T>>,
    /// Signal level entering each floor of each block
    pub riser_levels: BTreeMap<RiserPoint, T>,
    /// Final outlet level
    pub outlet_levels: BTreeMap<OutletKey, T>,
    /// Positive deviation above target
    pub excess: BTreeMap<OutletKey, T>,
    /// Deviation below target
    pub shortfall: BTreeMap<OutletKey, T>,
}

impl<T> Decisions<T> {
    /// Apply `f` to every decision, preserving keys.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Decisions<U> {
        Decisions {
            trunk: self.trunk.iter().map(&mut f).collect(),
            taps: self
                .taps
                .iter()
                .map(|(k, v)| (*k, v.iter().map(&mut f).collect()))
                .collect(),
            splitter_used: self.splitter_used.iter().map(|(k, v)| (*k, f(v))).collect(),
            splitters: self
                .splitters
                .iter()
                .map(|(k, v)| (*k, v.iter().map(&mut f).collect()))
                .collect(),
            riser_levels: self.riser_levels.iter().map(|(k, v)| (*k, f(v))).collect(),
            outlet_levels: self.outlet_levels.iter().map(|(k, v)| (*k, f(v))).collect(),
            excess: self.excess.iter().map(|(k, v)| (*k, f(v))).collect(),
            shortfall: self.shortfall.iter().map(|(k, v)| (*k, f(v))).collect(),
        }
    }

    /// Number of binary decisions (trunk, taps, splitters and usage flags).
    pub fn num_binaries(&self) -> usize {
        self.trunk.len()
            + self.taps.values().map(Vec::len).sum::<usize>()
            + self.splitter_used.len()
            + self.splitters.values().map(Vec::len).sum::<usize>()
    }

    /// Number of continuous decisions (levels and deviations).
    pub fn num_continuous(&self) -> usize {
        self.riser_levels.len() + self.outlet_levels.len() + self.excess.len() + self.shortfall.len()
    }
}

/// Geometry shared by the model builder and the decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkLayout {
    pub trunk_floor: u32,
    pub blocks: Vec<RiserBlock>,
    /// Cable from the head-end down to the trunk splitter
    pub antenna_to_trunk_m: f64,
    inter_floor_length_m: f64,
    feeder_min_length_m: f64,
}

impl NetworkLayout {
    pub fn new(params: &DesignParams) -> Result<Self, TopologyError> {
        let trunk_floor = params.trunk_floor();
        let blocks = plan_risers(params.floors, trunk_floor)?;
        let floors_above_trunk = f64::from(params.floors) - f64::from(trunk_floor) + 1.0;
        Ok(Self {
            trunk_floor,
            blocks,
            antenna_to_trunk_m: floors_above_trunk * params.inter_floor_length_m
                + params.headend_run_m,
            inter_floor_length_m: params.inter_floor_length_m,
            feeder_min_length_m: params.feeder_min_length_m,
        })
    }

    /// Block serving `floor`.
    pub fn block_of(&self, floor: u32) -> Option<&RiserBlock> {
        self.blocks.iter().find(|b| b.contains(floor))
    }

    /// Feeder from the trunk splitter to the block's entry floor.
    pub fn feeder_length_m(&self, block: &RiserBlock) -> f64 {
        let vertical = f64::from(block.entry_floor.abs_diff(self.trunk_floor));
        self.feeder_min_length_m + vertical * self.inter_floor_length_m
    }

    /// Riser cable between the block entry and `floor`.
    pub fn riser_length_m(&self, block: &RiserBlock, floor: u32) -> f64 {
        f64::from(floor.abs_diff(block.entry_floor)) * self.inter_floor_length_m
    }
}

/// A built but unsolved model.
pub struct Formulation {
    pub variables: ProblemVariables,
    pub objective: Expression,
    pub constraints: Vec<Constraint>,
    pub decisions: Decisions<Variable>,
    pub layout: NetworkLayout,
}

fn weighted(vars: &[Variable], weights: impl Iterator<Item = f64>) -> Expression {
    let mut expr = Expression::from(0.0);
    for (var, weight) in vars.iter().zip(weights) {
        expr += weight * *var;
    }
    expr
}

fn one_hot(vars: &[Variable]) -> Expression {
    weighted(vars, std::iter::repeat(1.0))
}

/// Build every variable, constraint and the objective for `building`.
pub fn build_model(building: &Building) -> DesignResult<Formulation> {
    let params = &building.params;
    let catalog = &building.catalog;
    let layout = NetworkLayout::new(params)?;
    let num_blocks = layout.blocks.len() as u32;

    let mut vars = variables!();
    let mut constraints: Vec<Constraint> = Vec::new();

    // Trunk splitter
    let trunk: Vec<Variable> = catalog
        .splitters
        .iter()
        .map(|_| vars.add(variable().binary()))
        .collect();
    constraints.push(constraint!(one_hot(&trunk) == 1.0));
    for (var, model) in trunk.iter().zip(&catalog.splitters) {
        if model.outputs < num_blocks {
            constraints.push(constraint!(*var == 0.0));
        }
    }

    // One tap per floor
    let mut taps = BTreeMap::new();
    for floor in building.floors_desc() {
        let floor_taps: Vec<Variable> = catalog
            .taps
            .iter()
            .map(|_| vars.add(variable().binary()))
            .collect();
        constraints.push(constraint!(one_hot(&floor_taps) == 1.0));
        for (var, model) in floor_taps.iter().zip(&catalog.taps) {
            if model.outputs < params.apartments_per_floor {
                constraints.push(constraint!(*var == 0.0));
            }
        }
        taps.insert(floor, floor_taps);
    }

    // Apartment splitters
    let mut splitter_used = BTreeMap::new();
    let mut splitters = BTreeMap::new();
    for apt in building.apartment_slots() {
        let outlets = building.outlet_count(apt);
        let used = vars.add(variable().binary());
        let models: Vec<Variable> = catalog
            .splitters
            .iter()
            .map(|_| vars.add(variable().binary()))
            .collect();

        if outlets <= 1 {
            constraints.push(constraint!(used == 0.0));
            for var in &models {
                constraints.push(constraint!(*var == 0.0));
            }
        } else {
            constraints.push(constraint!(used == 1.0));
            constraints.push(constraint!(one_hot(&models) == used));
            for (var, model) in models.iter().zip(&catalog.splitters) {
                if model.outputs < outlets {
                    constraints.push(constraint!(*var == 0.0));
                }
            }
        }
        splitter_used.insert(apt, used);
        splitters.insert(apt, models);
    }

    // Head-end to trunk, shared by every block
    let mut upstream_loss =
        Expression::from(params.cable_loss(layout.antenna_to_trunk_m) + params.union_loss());
    upstream_loss += weighted(&trunk, catalog.splitters.iter().map(|s| s.insertion_loss_db));

    let hop_loss = params.cable_loss(params.inter_floor_length_m) + params.union_loss();

    let mut riser_levels = BTreeMap::new();
    for block in &layout.blocks {
        let order = block.propagation_order();
        let levels: Vec<Variable> = order
            .iter()
            .map(|&floor| {
                let level = vars.add(variable().min(0.0));
                riser_levels.insert(
                    RiserPoint {
                        block: block.index,
                        floor,
                    },
                    level,
                );
                level
            })
            .collect();

        let feeder_loss =
            params.cable_loss(layout.feeder_length_m(block)) + params.union_loss();
        let entry_level = Expression::from(params.input_power_dbuv - feeder_loss) - upstream_loss.clone();
        let entry = levels[0];
        constraints.push(constraint!(entry == entry_level));

        for (hop, pair) in order.windows(2).enumerate() {
            let through = weighted(
                &taps[&pair[0]],
                catalog.taps.iter().map(|t| t.through_loss_db),
            );
            let (prev, next) = (levels[hop], levels[hop + 1]);
            let propagated = Expression::from(prev) - through - hop_loss;
            constraints.push(constraint!(next == propagated));
        }
    }

    // Outlet levels, band and deviation
    let mut outlet_levels = BTreeMap::new();
    let mut excess = BTreeMap::new();
    let mut shortfall = BTreeMap::new();
    let mut objective = Expression::from(0.0);

    for key in building.outlets() {
        let apt = key.apartment_key();
        let block = layout.block_of(key.floor).ok_or_else(|| {
            DesignError::Input(RiserError::Validation(format!(
                "outlet {key} is on a floor outside every riser block"
            )))
        })?;
        let riser = riser_levels[&RiserPoint {
            block: block.index,
            floor: key.floor,
        }];

        let fixed_loss = params.cable_loss(building.tap_to_splitter_m(apt)?)
            + params.apartment_connector_loss()
            + params.cable_loss(building.outlet_cable_m(key)?)
            + params.outlet_connection_loss_db;
        let tap_loss = weighted(&taps[&key.floor], catalog.taps.iter().map(|t| t.tap_loss_db));
        let splitter_loss = weighted(
            &splitters[&apt],
            catalog.splitters.iter().map(|s| s.insertion_loss_db),
        );

        let level = vars.add(variable().min(0.0));
        let received = Expression::from(riser) - tap_loss - splitter_loss - fixed_loss;
        constraints.push(constraint!(level == received));
        constraints.push(constraint!(level >= params.min_level_dbuv));
        constraints.push(constraint!(level <= params.max_level_dbuv));

        let above = vars.add(variable().min(0.0));
        let below = vars.add(variable().min(0.0));
        let deviation = Expression::from(level) - params.target_level_dbuv;
        constraints.push(constraint!(deviation == above - below));
        objective += above;
        objective += below;

        outlet_levels.insert(key, level);
        excess.insert(key, above);
        shortfall.insert(key, below);
    }

    let decisions = Decisions {
        trunk,
        taps,
        splitter_used,
        splitters,
        riser_levels,
        outlet_levels,
        excess,
        shortfall,
    };

    debug!(
        "Built riser MILP: {} blocks, {} binaries, {} continuous, {} constraints",
        layout.blocks.len(),
        decisions.num_binaries(),
        decisions.num_continuous(),
        constraints.len()
    );

    Ok(Formulation {
        variables: vars,
        objective,
        constraints,
        decisions,
        layout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::uniform_building;

    fn building(floors: u32, outlets: u32) -> Building {
        uniform_building(DesignParams::new(floors, 1), outlets, 5.0, 4.0).expect("valid building")
    }

    #[test]
    fn test_layout_lengths() {
        let params = DesignParams::new(10, 2);
        let layout = NetworkLayout::new(&params).expect("layout");
        assert_eq!(layout.trunk_floor, 5);
        // (10 - 5 + 1) * 3 + 5
        assert!((layout.antenna_to_trunk_m - 23.0).abs() < 1e-12);

        let top = &layout.blocks[0];
        assert_eq!(top.entry_floor, 6);
        assert!((layout.feeder_length_m(top) - 6.0).abs() < 1e-12);
        assert!((layout.riser_length_m(top, 9) - 9.0).abs() < 1e-12);
        assert_eq!(layout.block_of(2).map(|b| b.index), Some(1));
    }

    #[test]
    fn test_decision_counts() {
        let b = building(3, 2);
        let formulation = build_model(&b).expect("model builds");
        let d = &formulation.decisions;

        assert_eq!(d.trunk.len(), 7);
        assert_eq!(d.taps.len(), 3);
        assert!(d.taps.values().all(|v| v.len() == 14));
        assert_eq!(d.splitter_used.len(), 3);
        assert_eq!(d.riser_levels.len(), 3);
        assert_eq!(d.outlet_levels.len(), 6);
        assert_eq!(d.num_binaries(), 7 + 3 * 14 + 3 + 3 * 7);
        assert_eq!(d.num_continuous(), 3 + 6 * 3);
    }

    #[test]
    fn test_map_preserves_keys() {
        let b = building(2, 1);
        let formulation = build_model(&b).expect("model builds");
        let zeros = formulation.decisions.map(|_| 0.0_f64);
        assert_eq!(
            zeros.outlet_levels.keys().collect::<Vec<_>>(),
            formulation.decisions.outlet_levels.keys().collect::<Vec<_>>()
        );
        assert_eq!(zeros.trunk, vec![0.0; 7]);
    }
}
