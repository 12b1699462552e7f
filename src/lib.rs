// SPDX-License-Identifier: Apache-2.0

//! Deterministic simulation core for a BFF ("Brainfuck-derivative")
//! artificial-life engine.
//!
//! A population of fixed-length byte tapes lives on a toroidal grid. Each
//! interaction samples a pair of cells, concatenates their tapes, runs a
//! small byte-addressed virtual machine over the result, and writes the
//! outcome back. Epoch boundaries apply a mutation pass and roll up
//! statistics — entropy, replication rate, a periodic species census — into
//! a compressed history.
//!
//! The crate exposes one entry point, [`Engine`], and is otherwise a pure,
//! single-threaded function of `(config, seed, step counts)`: identical
//! inputs produce bit-identical grids and statistics.
//!
//! Rendering, report generation, and the interactive control loop are left
//! to the host; this crate hands back raw grid bytes, a fixed RGBA palette,
//! and plain statistics structs for them to consume.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(unused_must_use)]

mod census;
mod config;
mod engine;
mod grid;
mod history;
mod interaction;
mod palette;
mod prng;
mod stats;
mod vm;

pub use census::{Census, SpeciesEntry, TOP_K};
pub use config::{Config, ConfigError, SeedingMode, Topology};
pub use engine::Engine;
pub use history::History;
pub use palette::{color_for_byte, palette_bytes, Opcode};
pub use stats::StatsSnapshot;
pub use vm::VmOutcome;

#[cfg(feature = "serde")]
pub use history::{from_cbor, to_cbor};
