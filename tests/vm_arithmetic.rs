//! VM arithmetic smoke test, exercised through the public engine API via the
//! `test-util` seam rather than re-deriving `vm::execute` (that is covered
//! at the unit level inside the crate itself).

#![cfg(feature = "test-util")]

use bff_core::{Config, Engine, SeedingMode, Topology};

fn two_cell_config(instruction_limit: u32) -> Config {
    Config {
        grid_width: 2,
        grid_height: 1,
        tape_size: 8,
        mutation_rate_ppm: 0,
        instruction_limit,
        topology: Topology::Global,
        seeding_mode: SeedingMode::Random,
        seed: 1,
    }
}

#[test]
fn three_increments_leave_a_count_of_three() {
    let mut engine = Engine::new(two_cell_config(32)).unwrap();
    engine.poke_cell(0, 0, &[b'+', b'+', b'+', 0, 0, 0, 0, 0]);
    engine.poke_cell(1, 0, &[0; 8]);

    let outcome = engine.force_interaction(0, 0, 1, 0);

    assert_eq!(outcome.complexity, 3);
    assert_eq!(outcome.copies, 0);
    assert_eq!(outcome.neighbor_writes, 0);
    assert_eq!(engine.cell_at(0, 0)[0], 3);
}

#[test]
fn copy_into_the_neighbor_half_is_effective_replication() {
    let mut engine = Engine::new(two_cell_config(64)).unwrap();
    // T=8, 2T=16, cell A occupies working-tape indices 0..8, cell B 8..16.
    // '+' sets the source byte, then 8x '}' walks h1 from 0 to 8 (the
    // neighbor half boundary, spilling across the cell split), then '.'
    // copies h0 (still 0) into h1 (now 8).
    let mut cell_a = vec![b'+'];
    cell_a.extend(std::iter::repeat(b'}').take(7));
    let mut cell_b = vec![b'}', b'.'];
    cell_b.resize(8, 0);
    engine.poke_cell(0, 0, &cell_a);
    engine.poke_cell(1, 0, &cell_b);

    let outcome = engine.force_interaction(0, 0, 1, 0);

    assert_eq!(outcome.copies, 1);
    assert_eq!(outcome.neighbor_writes, 1);
    assert_eq!(engine.cell_at(0, 0)[0], 1);
    assert_eq!(engine.cell_at(1, 0)[0], 1);
}

#[test]
fn budget_never_exceeds_the_configured_instruction_limit() {
    let mut engine = Engine::new(two_cell_config(37)).unwrap();
    // Infinite loop: the condition byte is incremented forever and never
    // returns to zero.
    engine.poke_cell(0, 0, &[1, b'[', b'+', b']', 0, 0, 0, 0]);
    engine.poke_cell(1, 0, &[0; 8]);

    let outcome = engine.force_interaction(0, 0, 1, 0);

    assert!(outcome.complexity <= 37);
}
