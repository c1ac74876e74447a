//! Deterministic random number generation
//!
//! Uses the xorshift64* algorithm. The only consumer is the rotation
//! planner (RANDOM and opted-in SHUFFLE modes); the permutation is
//! drawn once at tour-generation time and pinned into the Tour records,
//! never recomputed afterward.
//!
//! CRITICAL: all randomness in the engine MUST go through this module.

mod xorshift;

pub use xorshift::RngManager;
