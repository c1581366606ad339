// src/generator/mod.rs
// =============================================================================
// This module produces candidate form identifiers and the URLs built from them.
//
// A candidate is a constant prefix plus a fixed number of random letters and
// digits (e.g. "SV_a8Kd02LmQz9TxYb"), appended to the survey host's base URL.
// Nothing here checks for uniqueness: the run loop deduplicates against the
// link store instead.
// =============================================================================

mod id;

pub use id::{candidate_url, IdGenerator, RandomIds};
