//! Mutation expectation: over many epochs, the fraction of grid bytes
//! disturbed by the mutation pass tracks `W*H*T*mutation_rate` per epoch.

use bff_core::{Config, Engine, SeedingMode, Topology};

// Global topology never aborts an attempt, so `cell_count` attempts always
// completes exactly one epoch (and thus exactly one mutation pass); the
// spatial self-pick abort would otherwise make the attempt-to-epoch mapping
// seed-dependent.
fn config(mutation_rate_ppm: u32, seed: u32) -> Config {
    Config {
        grid_width: 32,
        grid_height: 32,
        tape_size: 64,
        mutation_rate_ppm,
        instruction_limit: 64,
        topology: Topology::Global,
        seeding_mode: SeedingMode::Random,
        seed,
    }
}

#[test]
fn mutated_byte_count_stays_within_the_expected_band_across_many_epochs() {
    // E[M] per epoch = W*H*T*mutation_rate = 32*32*64*0.01 = 655.36.
    let mutation_config = config(10_000, 7);
    let control_config = config(0, 7);

    let mut mutated = Engine::new(mutation_config).unwrap();
    let mut control = Engine::new(control_config).unwrap();

    let cell_count = mutated.config().grid_width * mutated.config().grid_height;
    // Run exactly one epoch's worth of interactions on both, using the same
    // seed and topology so the interaction *pattern* is identical and any
    // byte divergence is attributable to the mutation pass alone.
    mutated.step(cell_count);
    control.step(cell_count);

    let differing = mutated
        .grid_bytes()
        .iter()
        .zip(control.grid_bytes())
        .filter(|(a, b)| a != b)
        .count();

    assert!(
        (300..=1200).contains(&differing),
        "expected roughly 655 differing bytes, got {differing}"
    );
}

#[test]
fn zero_mutation_rate_never_perturbs_the_grid_beyond_interactions() {
    let mutation_config = config(0, 11);
    let control_config = config(0, 11);

    let mut mutated = Engine::new(mutation_config).unwrap();
    let mut control = Engine::new(control_config).unwrap();

    mutated.step(2_048);
    control.step(2_048);

    assert_eq!(mutated.grid_bytes(), control.grid_bytes());
}
