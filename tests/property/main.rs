//! Property-based and exhaustive soundness tests.
//!
//! Run with: `cargo test --test property`

mod engine_laws;
mod join_soundness;
mod overlap_optimality;
