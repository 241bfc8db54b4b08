//! The vertex record and the stable-index arena that owns it.
//!
//! `spec.md` §3 requires vertices to compare by reference identity rather
//! than coordinate equality. An arena + stable integer index (`VertexId`)
//! gives us that for free: two vertices with identical coordinates but
//! different `VertexId`s are different logical vertices, and the arena never
//! reuses an id once assigned (unlike the edge pool, which does reuse edge
//! indices — vertices are never freed individually, only cleared in bulk).

use bitflags::bitflags;

bitflags! {
    /// Packed status bits carried by every [`Vertex`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct VertexStatus: u8 {
        /// Inserted by the implementation (e.g. a Ruppert Steiner point),
        /// not supplied by the caller.
        const SYNTHETIC = 0b0001;
        /// Vertex participates in at least one constraint (linear or region).
        const CONSTRAINT_MEMBER = 0b0010;
        /// Vertex was withheld from the triangulation (reserved for callers
        /// that stage vertices for conditional inclusion).
        const WITHHELD = 0b0100;
        /// The ghost/null sentinel endpoint used to close the outer face.
        const NULL = 0b1000;
    }
}

/// Stable index into a [`VertexArena`]. `NULL` is the sentinel referring to
/// [`NULL_VERTEX`], the ghost endpoint of hull edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub i32);

impl VertexId {
    pub const NULL: VertexId = VertexId(-1);

    #[inline]
    pub fn is_null(self) -> bool {
        self == Self::NULL
    }

    #[inline]
    pub fn index(self) -> Option<usize> {
        if self.is_null() {
            None
        } else {
            Some(self.0 as usize)
        }
    }
}

/// Cheap one-byte classification of how a vertex entered the mesh
/// (spec.md §4.6 `vdata[v]`'s `{INPUT, MIDPOINT, OFFCENTER, CIRCUMCENTER}`
/// tag). Stored directly in [`Vertex::aux`] so every crate can read it
/// without depending on `tin-refine`; the richer per-vertex metadata
/// (originating corner, shell index) that only Ruppert refinement itself
/// needs lives in that crate's own side map instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum VertexKindTag {
    #[default]
    Input = 0,
    Midpoint = 1,
    OffCenter = 2,
    Circumcenter = 3,
}

impl VertexKindTag {
    pub fn from_aux(aux: u8) -> Self {
        match aux {
            1 => VertexKindTag::Midpoint,
            2 => VertexKindTag::OffCenter,
            3 => VertexKindTag::Circumcenter,
            _ => VertexKindTag::Input,
        }
    }
}

/// An immutable vertex record: `(x, y, z, index, status, aux)` per spec.md §3.
///
/// `aux` is an 8-bit scratch field available to higher layers (the Ruppert
/// refiner uses it to tag a vertex's [`VertexKindTag`] cheaply without
/// a side table, though the richer per-vertex Ruppert metadata — originating
/// corner, shell index — lives in `tin-refine`'s own map since it doesn't fit
/// in a single byte).
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub z: f32,
    pub index: i32,
    pub status: VertexStatus,
    pub aux: u8,
}

impl PartialEq for Vertex {
    /// Value equality, provided for tests and diagnostics. Callers
    /// establishing logical identity must compare [`VertexId`]s instead —
    /// two distinct vertices may legitimately share coordinates (e.g. during
    /// merge-rule evaluation, before the merge decision is made).
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y && self.z == other.z && self.index == other.index
    }
}

/// The ghost vertex. Singleton by construction: every `NULL_VERTEX` value is
/// bit-identical, and [`VertexId::NULL`] is the only id that ever resolves to it.
pub const NULL_VERTEX: Vertex = Vertex {
    x: f64::NAN,
    y: f64::NAN,
    z: f32::NAN,
    index: -1,
    status: VertexStatus::NULL,
    aux: 0,
};

impl Vertex {
    pub fn new(x: f64, y: f64, z: f32, index: i32) -> Self {
        Self {
            x,
            y,
            z,
            index,
            status: VertexStatus::empty(),
            aux: 0,
        }
    }

    pub fn is_null(&self) -> bool {
        self.status.contains(VertexStatus::NULL)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn with_synthetic(mut self) -> Self {
        self.status |= VertexStatus::SYNTHETIC;
        self
    }
}

/// Append-only arena of vertices, indexed by [`VertexId`].
///
/// Unlike [`tin_pool`](../tin_pool/index.html)'s edge pool, vertices are
/// never individually freed: the incremental algorithm never removes a
/// vertex once inserted, so a plain growable `Vec` with no free-list is the
/// right shape (the teacher's own text buffer likewise reaches for the
/// simplest backing collection that satisfies its access pattern, a
/// `ropey::Rope`, rather than pre-emptively generalizing).
#[derive(Debug, Default)]
pub struct VertexArena {
    vertices: Vec<Vertex>,
}

impl VertexArena {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
        }
    }

    pub fn push(&mut self, mut v: Vertex) -> VertexId {
        let id = VertexId(self.vertices.len() as i32);
        v.index = id.0;
        self.vertices.push(v);
        id
    }

    #[inline]
    pub fn get(&self, id: VertexId) -> &Vertex {
        match id.index() {
            Some(i) => &self.vertices[i],
            None => &NULL_VERTEX,
        }
    }

    #[inline]
    pub fn get_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
        id.index().map(|i| &mut self.vertices[i])
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId(i as i32), v))
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }
}
