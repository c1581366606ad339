// src/fuzz/mod.rs
// =============================================================================
// This module runs the probe loop.
//
// generate -> skip if known -> probe -> record (+ notify when valid) -> wait
//
// It owns no I/O of its own: the identifier source, the probe strategy and
// the notifier are passed in, and the link store is read at the start and
// written once at the end.
// =============================================================================

mod run;

pub use run::{run, RunSummary};
