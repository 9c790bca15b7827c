//! Typed element ids.
//!
//! Records refer to each other through [`VertexId`], [`HalfEdgeId`] and
//! [`FaceId`], thin wrappers over a `u16` or `u32`. The all-ones bit pattern
//! means "no element": a boundary half-edge stores it as its twin, an isolated
//! vertex as its outgoing half-edge. A mesh over `I` therefore holds at most
//! [`MeshIndex::LIMIT`] elements of each kind, and going past that is a
//! [`CapacityExceeded`](crate::MeshError::CapacityExceeded) error in the
//! builder rather than a wrapped id.
//!
//! Directed edges pack two indices into a `u64` key, which is why nothing
//! wider than `u32` is offered.

use std::fmt;
use std::hash::Hash;

/// Unsigned storage for element ids.
pub trait MeshIndex: Copy + Eq + Ord + Hash + fmt::Debug + Send + Sync + 'static {
    /// The reserved "no element" value.
    const INVALID: Self;

    /// Number of addressable elements. Every valid index is below this.
    const LIMIT: usize;

    /// Narrow `v`, or `None` if it is `LIMIT` or more.
    fn try_from_usize(v: usize) -> Option<Self>;

    /// Widen to `usize`.
    fn to_usize(self) -> usize;
}

macro_rules! mesh_index {
    ($($t:ty),*) => {$(
        impl MeshIndex for $t {
            const INVALID: Self = <$t>::MAX;
            const LIMIT: usize = <$t>::MAX as usize;

            #[inline]
            fn try_from_usize(v: usize) -> Option<Self> {
                if v < Self::LIMIT {
                    Some(v as $t)
                } else {
                    None
                }
            }

            #[inline]
            fn to_usize(self) -> usize {
                self as usize
            }
        }
    )*};
}

mesh_index!(u16, u32);

/// Id of a [`Vertex`](super::Vertex).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId<I: MeshIndex = u32>(I);

/// Id of a [`HalfEdge`](super::HalfEdge).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HalfEdgeId<I: MeshIndex = u32>(I);

/// Id of a [`Face`](super::Face).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId<I: MeshIndex = u32>(I);

macro_rules! element_id {
    ($name:ident, $tag:literal) => {
        impl<I: MeshIndex> $name<I> {
            /// Id for buffer position `index`.
            ///
            /// A position that `I` cannot address becomes the invalid id.
            /// Use [`try_new`](Self::try_new) where that must be caught.
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(I::try_from_usize(index).unwrap_or(I::INVALID))
            }

            /// Id for buffer position `index`, if `I` can address it.
            #[inline]
            pub fn try_new(index: usize) -> Option<Self> {
                I::try_from_usize(index).map(Self)
            }

            /// The "no element" id.
            #[inline]
            pub fn invalid() -> Self {
                Self(I::INVALID)
            }

            /// Buffer position. Meaningless for the invalid id.
            #[inline]
            pub fn index(self) -> usize {
                self.0.to_usize()
            }

            /// Check if this names an element at all.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != I::INVALID
            }

            /// Check that this id names an element of a buffer of `len`.
            #[inline]
            pub fn is_within(self, len: usize) -> bool {
                self.is_valid() && self.index() < len
            }
        }

        impl<I: MeshIndex> fmt::Debug for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.is_valid() {
                    true => write!(f, "{}({})", $tag, self.index()),
                    false => write!(f, "{}(-)", $tag),
                }
            }
        }

        impl<I: MeshIndex> Default for $name<I> {
            fn default() -> Self {
                Self::invalid()
            }
        }
    };
}

element_id!(VertexId, "V");
element_id!(HalfEdgeId, "HE");
element_id!(FaceId, "F");
