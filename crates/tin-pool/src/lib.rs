//! Paged quad-edge allocator (spec.md §4.2).
//!
//! This crate owns only the *storage* of directed-edge records: allocation,
//! freeing, splitting, and iteration. It knows nothing about rings, pinwheels,
//! or the packed constraint bit layout — those live one layer up in
//! `tin-topology`, which is why `EdgeRecord::constraint` here is an opaque
//! `u32`.

pub mod edge_id;
pub mod edge_record;
pub mod pool;

pub use edge_id::EdgeId;
pub use edge_record::EdgeRecord;
pub use pool::EdgePool;
