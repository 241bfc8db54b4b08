//! Bootstrap, incremental insertion, the stochastic locator, and edge
//! flipping for the TIN (spec.md §4.4).
//!
//! This crate owns the `Tin` struct — the vertex arena, edge pool, kernel,
//! and the mutable cursor state (`search_edge`, `bootstrapped`, `locked`)
//! that every higher layer (`tin-constraints`, `tin-refine`, the `tin`
//! facade) builds on. Those higher crates reach into `Tin`'s public fields
//! directly rather than going through an opaque handle — the whole
//! workspace is one mutation domain per spec.md §5 ("single-threaded for
//! any mutation"), so there is no encapsulation boundary to protect between
//! these crates, only between the TIN and external callers (the `tin`
//! facade draws that line).

pub mod bootstrap;
pub mod bounds;
pub mod config;
pub mod flip;
pub mod ghost;
pub mod hull;
pub mod insert;
pub mod locate;
pub mod navigator;
pub mod stats;
pub mod tin;

pub use bounds::Bounds;
pub use config::{TinConfig, VertexMergeRule};
pub use insert::InsertOutcome;
pub use locate::LocateResult;
pub use navigator::Navigator;
pub use stats::{EngineStats, WalkStats};
pub use tin::Tin;
