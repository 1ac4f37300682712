//! Vertical topology: floors grouped into riser blocks.
//!
//! The building is fed from a single trunk splitter. Each output of that
//! splitter drives one vertical riser ("block") of 3–5 consecutive floors.
//! A feeder enters the block at the floor closest to the trunk and the
//! signal then propagates floor by floor away from it:
//!
//! ```text
//!   floor 9  ┐
//!   floor 8  │ block 0 (up)      entry = 7, trunk lies below the block
//!   floor 7  ┘
//!   floor 6  ┐
//!   floor 5  │ block 1 (down) ◄── trunk splitter on floor 5
//!   floor 4  ┘                   entry = 6
//!   floor 3  ┐
//!   floor 2  │ block 2 (down)    entry = 3
//!   floor 1  ┘
//! ```
//!
//! A block lying entirely above the trunk floor is entered at its lowest
//! floor and propagates upward.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest riser block (unless the whole building is smaller)
pub const MIN_BLOCK_FLOORS: u32 = 3;
/// Largest riser block
pub const MAX_BLOCK_FLOORS: u32 = 5;
/// Buildings up to this height are served by a single block
pub const SINGLE_BLOCK_MAX_FLOORS: u32 = 6;

/// Error type for floor partitioning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// Nothing to partition
    #[error("building has no floors")]
    NoFloors,

    /// No even split keeps every block between 3 and 5 floors
    #[error("{0} floors cannot be split into blocks of 3 to 5 floors")]
    NoValidSplit(u32),
}

/// Direction in which the signal travels inside a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Entered at the lowest floor, propagates toward the roof
    Up,
    /// Entered at the highest floor, propagates toward the ground
    Down,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// A contiguous run of floors, highest floor first.
///
/// Never empty: [`partition`] only builds blocks of at least one floor and
/// fails with [`TopologyError::NoFloors`] otherwise. `top` and `bottom`
/// rely on this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub floors: Vec<u32>,
}

impl Block {
    pub fn top(&self) -> u32 {
        self.floors.first().copied().unwrap_or(0)
    }

    pub fn bottom(&self) -> u32 {
        self.floors.last().copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.floors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floors.is_empty()
    }

    pub fn contains(&self, floor: u32) -> bool {
        self.floors.contains(&floor)
    }
}

/// Split `floor_count` floors into riser blocks, top block first.
///
/// Up to six floors form a single block. Taller buildings try every block
/// count whose even split keeps sizes in `[3, 5]` and keep the one with the
/// lowest size variance; the smallest block count wins ties.
pub fn partition(floor_count: u32) -> Result<Vec<Block>, TopologyError> {
    if floor_count == 0 {
        return Err(TopologyError::NoFloors);
    }
    if floor_count <= SINGLE_BLOCK_MAX_FLOORS {
        return Ok(vec![Block {
            floors: (1..=floor_count).rev().collect(),
        }]);
    }

    let min_blocks = floor_count.div_ceil(MAX_BLOCK_FLOORS);
    let max_blocks = floor_count / MIN_BLOCK_FLOORS;

    let mut best: Option<(f64, Vec<u32>)> = None;
    for nb in min_blocks..=max_blocks {
        let sizes = even_split(floor_count, nb);
        if !sizes
            .iter()
            .all(|s| (MIN_BLOCK_FLOORS..=MAX_BLOCK_FLOORS).contains(s))
        {
            continue;
        }
        let variance = population_variance(&sizes);
        if best.as_ref().map_or(true, |(v, _)| variance < *v) {
            best = Some((variance, sizes));
        }
    }

    let (_, sizes) = best.ok_or(TopologyError::NoValidSplit(floor_count))?;

    let mut next = floor_count;
    let blocks = sizes
        .into_iter()
        .map(|size| {
            let floors: Vec<u32> = (next + 1 - size..=next).rev().collect();
            next -= size;
            Block { floors }
        })
        .collect();
    Ok(blocks)
}

/// Sizes differing by at most one, larger sizes first.
fn even_split(n: u32, parts: u32) -> Vec<u32> {
    let base = n / parts;
    let extra = n % parts;
    (0..parts)
        .map(|i| if i < extra { base + 1 } else { base })
        .collect()
}

fn population_variance(sizes: &[u32]) -> f64 {
    let n = sizes.len() as f64;
    let mean = sizes.iter().map(|&s| f64::from(s)).sum::<f64>() / n;
    sizes
        .iter()
        .map(|&s| (f64::from(s) - mean).powi(2))
        .sum::<f64>()
        / n
}

/// Entry floor and propagation direction of a block for a given trunk floor.
///
/// Only a trunk strictly below the block makes it propagate upward.
pub fn entry_and_direction(block: &Block, trunk_floor: u32) -> (u32, Direction) {
    if trunk_floor < block.bottom() {
        (block.bottom(), Direction::Up)
    } else {
        (block.top(), Direction::Down)
    }
}

/// A block together with how the signal reaches and traverses it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiserBlock {
    pub index: usize,
    pub floors: Vec<u32>,
    pub entry_floor: u32,
    pub direction: Direction,
}

impl RiserBlock {
    /// Floors in the order the signal visits them, entry floor first.
    pub fn propagation_order(&self) -> Vec<u32> {
        match self.direction {
            Direction::Down => self.floors.clone(),
            Direction::Up => self.floors.iter().rev().copied().collect(),
        }
    }

    /// Floors strictly between the entry and `floor`, plus the entry itself.
    ///
    /// These are the floors whose taps the signal passes through before
    /// reaching `floor`.
    pub fn floors_passed_before(&self, floor: u32) -> Vec<u32> {
        self.propagation_order()
            .into_iter()
            .take_while(|&f| f != floor)
            .collect()
    }

    pub fn contains(&self, floor: u32) -> bool {
        self.floors.contains(&floor)
    }
}

/// Partition the building and orient every block toward the trunk.
pub fn plan_risers(floor_count: u32, trunk_floor: u32) -> Result<Vec<RiserBlock>, TopologyError> {
    let blocks = partition(floor_count)?;
    Ok(blocks
        .into_iter()
        .enumerate()
        .map(|(index, block)| {
            let (entry_floor, direction) = entry_and_direction(&block, trunk_floor);
            RiserBlock {
                index,
                floors: block.floors,
                entry_floor,
                direction,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(n: u32) -> Vec<usize> {
        partition(n)
            .expect("partition")
            .iter()
            .map(Block::len)
            .collect()
    }

    #[test]
    fn test_small_buildings_form_one_block() {
        assert_eq!(sizes(1), vec![1]);
        assert_eq!(sizes(5), vec![5]);
        assert_eq!(sizes(6), vec![6]);
        let blocks = partition(5).expect("partition");
        assert_eq!(blocks[0].floors, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_fifteen_floors_prefer_fewer_blocks() {
        assert_eq!(sizes(15), vec![5, 5, 5]);
    }

    #[test]
    fn test_uneven_split_puts_larger_blocks_on_top() {
        // 7 floors: only two blocks fit, 4 + 3
        let blocks = partition(7).expect("partition");
        assert_eq!(blocks[0].floors, vec![7, 6, 5, 4]);
        assert_eq!(blocks[1].floors, vec![3, 2, 1]);
    }

    #[test]
    fn test_exact_divisor_beats_uneven_split() {
        // 12 floors: three blocks of 4 beat four blocks of 3 on block count
        assert_eq!(sizes(12), vec![4, 4, 4]);
        // 9 floors: [5,4] (var 0.25) loses to [3,3,3] (var 0)
        assert_eq!(sizes(9), vec![3, 3, 3]);
    }

    #[test]
    fn test_zero_floors_rejected() {
        assert_eq!(partition(0), Err(TopologyError::NoFloors));
    }

    #[test]
    fn test_blocks_are_never_empty() {
        for n in 1..=60 {
            let blocks = partition(n).expect("partition");
            for block in &blocks {
                assert!(!block.is_empty(), "{n} floors produced an empty block");
                assert!(block.top() >= block.bottom());
                assert!(block.bottom() >= 1);
            }
        }
    }

    #[test]
    fn test_direction_rule() {
        let block = Block {
            floors: vec![9, 8, 7],
        };
        assert_eq!(entry_and_direction(&block, 5), (7, Direction::Up));
        assert_eq!(entry_and_direction(&block, 7), (9, Direction::Down));
        assert_eq!(entry_and_direction(&block, 8), (9, Direction::Down));
        assert_eq!(entry_and_direction(&block, 12), (9, Direction::Down));
    }

    #[test]
    fn test_plan_orients_blocks() {
        let plan = plan_risers(15, 8).expect("plan");
        assert_eq!(plan.len(), 3);
        assert_eq!(plan[0].direction, Direction::Up);
        assert_eq!(plan[0].entry_floor, 11);
        assert_eq!(plan[1].direction, Direction::Down);
        assert_eq!(plan[1].entry_floor, 10);
        assert_eq!(plan[2].entry_floor, 5);
        assert_eq!(plan[0].propagation_order(), vec![11, 12, 13, 14, 15]);
    }

    #[test]
    fn test_floors_passed_before() {
        let plan = plan_risers(15, 8).expect("plan");
        assert_eq!(plan[0].floors_passed_before(13), vec![11, 12]);
        assert!(plan[0].floors_passed_before(11).is_empty());
        assert_eq!(plan[2].floors_passed_before(3), vec![5, 4]);
    }
}
