// src/store/mod.rs
// =============================================================================
// This module persists the sets of URLs seen across runs.
//
// Two flat text files, one URL per line:
// - tested links: every URL ever probed, whatever the outcome
// - valid links: URLs confirmed to be live forms
//
// Both are read fully at start-up and rewritten wholesale at the end of a run.
// =============================================================================

mod links;

pub use links::{load, save, LinkSet};
