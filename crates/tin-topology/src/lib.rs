//! Quad-edge navigation and the packed constraint bit layout (spec.md §4.3).
//!
//! A thin layer over [`tin_pool::EdgePool`]: everything here is a free
//! function taking `&EdgePool`/`&mut EdgePool` (plus `&VertexArena` where a
//! coordinate is needed), rather than a wrapper type, since the pool and the
//! vertex arena are owned together one level up by `tin-engine`'s `Tin`.

pub mod bits;
pub mod nav;

pub use bits::{MAX_LINE_INDEX, MAX_REGION_INDEX};
pub use nav::{allocate_edge, base_ref, destination, dual, face_triangle, face_vertices, forward,
    length, length_sq, origin, pinwheel, reverse, splice_before, Pinwheel};
