//! Property tests for floor partitioning and block orientation

use proptest::prelude::*;
use riser_algo::{entry_and_direction, partition, plan_risers, Direction};

proptest! {
    #[test]
    fn partition_covers_every_floor_once(n in 1u32..=120) {
        let blocks = partition(n).expect("partition");
        let mut floors: Vec<u32> = blocks.iter().flat_map(|b| b.floors.clone()).collect();
        // Top-down carving yields a strictly descending sequence
        prop_assert!(floors.windows(2).all(|w| w[0] == w[1] + 1));
        floors.sort_unstable();
        prop_assert_eq!(floors, (1..=n).collect::<Vec<_>>());
    }

    #[test]
    fn partition_block_sizes_in_range(n in 7u32..=120) {
        let blocks = partition(n).expect("partition");
        prop_assert!(blocks.iter().all(|b| (3..=5).contains(&b.len())));
        let max = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
        let min = blocks.iter().map(|b| b.len()).min().unwrap_or(0);
        prop_assert!(max - min <= 1);
        // Larger blocks sit above smaller ones
        prop_assert!(blocks.windows(2).all(|w| w[0].len() >= w[1].len()));
    }

    #[test]
    fn small_buildings_are_one_block(n in 1u32..=6) {
        let blocks = partition(n).expect("partition");
        prop_assert_eq!(blocks.len(), 1);
        prop_assert_eq!(blocks[0].len(), n as usize);
    }

    #[test]
    fn direction_is_up_iff_trunk_below_block(n in 1u32..=60, trunk in 0u32..=60) {
        for block in partition(n).expect("partition") {
            let (entry, direction) = entry_and_direction(&block, trunk);
            let up = trunk < block.bottom();
            prop_assert_eq!(direction == Direction::Up, up);
            prop_assert_eq!(entry, if up { block.bottom() } else { block.top() });
        }
    }

    #[test]
    fn propagation_starts_at_entry(n in 1u32..=60, trunk in 0u32..=60) {
        for block in plan_risers(n, trunk).expect("plan") {
            let order = block.propagation_order();
            prop_assert_eq!(order[0], block.entry_floor);
            prop_assert_eq!(order.len(), block.floors.len());
        }
    }
}

#[test]
fn five_floors_form_one_block() {
    let blocks = partition(5).expect("partition");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].floors, vec![5, 4, 3, 2, 1]);
}

#[test]
fn fifteen_floors_form_three_blocks_of_five() {
    let blocks = partition(15).expect("partition");
    let sizes: Vec<usize> = blocks.iter().map(|b| b.len()).collect();
    assert_eq!(sizes, vec![5, 5, 5]);
    assert_eq!(blocks[0].floors, vec![15, 14, 13, 12, 11]);
    assert_eq!(blocks[2].floors, vec![5, 4, 3, 2, 1]);
}
