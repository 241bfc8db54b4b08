//! Error kinds surfaced across the TIN engine's API boundary (spec.md §6/§7).
//!
//! These are *kinds*, not a taxonomy of internal failure sites: every crate
//! in the workspace returns `Result<_, TinError>` and maps its own
//! lower-level failures onto one of the variants below before they cross a
//! public function boundary, the way the teacher's crates settle on
//! `anyhow::Result` at their own boundaries. A library crate exposing a
//! fixed, matchable error set is the idiomatic case for `thiserror` rather
//! than `anyhow`; the teacher's own dependency graph carries `thiserror`
//! alongside `anyhow` for exactly this library-vs-application split.

use thiserror::Error;

/// Errors surfaced across the TIN engine's API boundary.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TinError {
    #[error("vertex coordinates are not finite: ({x}, {y})")]
    InvalidVertex { x: f64, y: f64 },

    #[error("vertex coincides with an existing vertex and no merge rule resolved it")]
    DuplicateVertex,

    #[error("forced edge crosses an already-constrained edge")]
    CrossingConstraint,

    #[error("polygon constraint ring is not closed (first vertex != last vertex)")]
    UnclosedPolygon,

    #[error("polygon constraint ring has fewer than three distinct vertices")]
    DegenerateConstraint,

    #[error("bootstrap vertices are collinear within threshold; need a non-collinear triple")]
    CollinearBootstrap,

    #[error("mutation attempted while the TIN is locked")]
    TinLocked,

    #[error("packed constraint index {value} exceeds the {bits}-bit field range")]
    IndexOutOfRange { value: i64, bits: u8 },

    #[error("operation requires a bootstrapped TIN")]
    NotBootstrapped,
}

pub type TinResult<T> = Result<T, TinError>;
