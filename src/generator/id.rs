// src/generator/id.rs
// =============================================================================
// Random identifier generation.
//
// The IdGenerator trait is the seam the run loop depends on. RandomIds is the
// only production implementation; tests substitute a scripted source so they
// know in advance which URLs a run will probe.
// =============================================================================

use rand::distributions::{Alphanumeric, DistString};
use rand::rngs::ThreadRng;
use rand::Rng;

/// A source of candidate form identifiers
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Identifiers of the shape `<prefix><length random [A-Za-z0-9] chars>`
pub struct RandomIds<R: Rng = ThreadRng> {
    rng: R,
    prefix: String,
    length: usize,
}

impl RandomIds<ThreadRng> {
    pub fn new(prefix: impl Into<String>, length: usize) -> Self {
        Self::with_rng(rand::thread_rng(), prefix, length)
    }
}

impl<R: Rng> RandomIds<R> {
    /// Uses the given RNG, e.g. a seeded StdRng for reproducible sequences
    pub fn with_rng(rng: R, prefix: impl Into<String>, length: usize) -> Self {
        Self {
            rng,
            prefix: prefix.into(),
            length,
        }
    }
}

impl<R: Rng> IdGenerator for RandomIds<R> {
    fn next_id(&mut self) -> String {
        let mut id = String::with_capacity(self.prefix.len() + self.length);
        id.push_str(&self.prefix);
        Alphanumeric.append_string(&mut self.rng, &mut id, self.length);
        id
    }
}

/// Joins the base URL and an identifier into the candidate URL
///
/// The base is used verbatim when it already ends with '/', otherwise a
/// single separator is inserted.
///
/// Example:
///   ("https://host/jfe/form/", "SV_abc") -> "https://host/jfe/form/SV_abc"
///   ("http://127.0.0.1:8080", "SV_abc")  -> "http://127.0.0.1:8080/SV_abc"
pub fn candidate_url(base_url: &str, id: &str) -> String {
    if base_url.ends_with('/') {
        format!("{}{}", base_url, id)
    } else {
        format!("{}/{}", base_url, id)
    }
}
