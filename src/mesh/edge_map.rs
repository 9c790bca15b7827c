//! Directed-edge hash map used to pair half-edges with their twins.
//!
//! During construction every half-edge is recorded under the packed key of the
//! directed edge it traverses. Once all faces are in, the twin of the half-edge
//! stored under `(a, b)` is whatever is stored under `(b, a)`.
//!
//! [`EdgeHashMap`] is a fixed-capacity open-addressing table with linear
//! probing, tuned for [`EdgeKey`]s. It never deletes individual entries, so an
//! empty slot always terminates a probe sequence.
//!
//! # Capacity
//!
//! The capacity is rounded up to a power of two so that wrap-around is a
//! bitmask. The table does not resize on its own: once every slot is occupied,
//! new keys are rejected ([`EdgeHashMap::try_add`] returns `false`,
//! [`EdgeHashMap::insert`] returns [`Insert::Overflow`]). Callers that cannot
//! bound the number of directed edges up front can call
//! [`EdgeHashMap::grow`] explicitly.
//!
//! # Concurrency
//!
//! All mutation goes through `&mut self`; a map has a single writer at a time.
//! Concurrent construction is done with one builder (and one map) per mesh.

use std::fmt;

use super::index::{HalfEdgeId, MeshIndex, VertexId};

/// Fractional golden ratio, `2^32 / phi`.
const HASH_MULTIPLIER: u32 = 0x9E37_79B9;

/// Load factor above which a growable map doubles its capacity.
pub const MAX_LOAD_FACTOR: f64 = 0.75;

/// A directed edge packed into 64 bits: origin in the high half, destination
/// in the low half.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EdgeKey(u64);

impl EdgeKey {
    /// Pack the directed edge `origin -> dest`.
    #[inline]
    pub fn new<I: MeshIndex>(origin: VertexId<I>, dest: VertexId<I>) -> Self {
        Self::from_indices(origin.index(), dest.index())
    }

    /// Pack the directed edge `origin -> dest` from raw indices.
    #[inline]
    pub fn from_indices(origin: usize, dest: usize) -> Self {
        Self(((origin as u64) << 32) | (dest as u64 & 0xFFFF_FFFF))
    }

    /// The key of the oppositely directed edge.
    #[inline]
    pub fn reversed(self) -> Self {
        Self(self.0.rotate_left(32))
    }

    /// Origin vertex index.
    #[inline]
    pub fn origin(self) -> usize {
        (self.0 >> 32) as usize
    }

    /// Destination vertex index.
    #[inline]
    pub fn dest(self) -> usize {
        (self.0 & 0xFFFF_FFFF) as usize
    }

    /// The packed representation.
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }

    /// Fold the halves together and scramble with a multiplicative hash.
    #[inline]
    pub fn hash32(self) -> u32 {
        let folded = ((self.0 >> 32) as u32) ^ (self.0 as u32);
        folded.wrapping_mul(HASH_MULTIPLIER)
    }
}

impl fmt::Debug for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E({}->{})", self.origin(), self.dest())
    }
}

/// Outcome of [`EdgeHashMap::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insert<I: MeshIndex = u32> {
    /// The key was new and now occupies a slot.
    Inserted,
    /// The key was present; its previous value was replaced.
    Replaced(HalfEdgeId<I>),
    /// Every slot is taken by another key. Nothing was stored.
    Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Empty,
    Occupied,
}

enum Probe {
    Found(usize),
    Vacant(usize),
    Full,
}

/// Fixed-capacity open-addressing map from [`EdgeKey`] to half-edge index.
#[derive(Clone)]
pub struct EdgeHashMap<I: MeshIndex = u32> {
    keys: Vec<u64>,
    values: Vec<HalfEdgeId<I>>,
    states: Vec<SlotState>,
    mask: usize,
    len: usize,
}

impl<I: MeshIndex> EdgeHashMap<I> {
    /// Create a map with room for at least `capacity` keys.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1).next_power_of_two();
        Self {
            keys: vec![0; capacity],
            values: vec![HalfEdgeId::invalid(); capacity],
            states: vec![SlotState::Empty; capacity],
            mask: capacity - 1,
            len: 0,
        }
    }

    /// Number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.states.len()
    }

    /// Number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if no key is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Fraction of occupied slots.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    #[inline]
    fn home_slot(&self, key: EdgeKey) -> usize {
        key.hash32() as usize & self.mask
    }

    fn probe(&self, key: EdgeKey) -> Probe {
        let home = self.home_slot(key);
        let mut slot = home;
        loop {
            match self.states[slot] {
                SlotState::Empty => return Probe::Vacant(slot),
                SlotState::Occupied if self.keys[slot] == key.raw() => return Probe::Found(slot),
                SlotState::Occupied => {}
            }
            slot = (slot + 1) & self.mask;
            if slot == home {
                return Probe::Full;
            }
        }
    }

    fn occupy(&mut self, slot: usize, key: EdgeKey, value: HalfEdgeId<I>) {
        self.keys[slot] = key.raw();
        self.values[slot] = value;
        self.states[slot] = SlotState::Occupied;
        self.len += 1;
    }

    /// Add `key` if it is not present yet.
    ///
    /// Returns `false` if the key already exists (its value is left untouched)
    /// or if the table is full.
    pub fn try_add(&mut self, key: EdgeKey, value: HalfEdgeId<I>) -> bool {
        match self.probe(key) {
            Probe::Vacant(slot) => {
                self.occupy(slot, key, value);
                true
            }
            Probe::Found(_) | Probe::Full => false,
        }
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn insert(&mut self, key: EdgeKey, value: HalfEdgeId<I>) -> Insert<I> {
        match self.probe(key) {
            Probe::Vacant(slot) => {
                self.occupy(slot, key, value);
                Insert::Inserted
            }
            Probe::Found(slot) => {
                let previous = std::mem::replace(&mut self.values[slot], value);
                Insert::Replaced(previous)
            }
            Probe::Full => Insert::Overflow,
        }
    }

    /// Look up the half-edge stored under `key`.
    pub fn get(&self, key: EdgeKey) -> Option<HalfEdgeId<I>> {
        match self.probe(key) {
            Probe::Found(slot) => Some(self.values[slot]),
            Probe::Vacant(_) | Probe::Full => None,
        }
    }

    /// Check if `key` is stored.
    pub fn contains_key(&self, key: EdgeKey) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over the stored entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (EdgeKey, HalfEdgeId<I>)> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(|&(_, &state)| state == SlotState::Occupied)
            .map(|(slot, _)| (EdgeKey(self.keys[slot]), self.values[slot]))
    }

    /// Forget every entry. The slots are kept.
    pub fn clear(&mut self) {
        self.states.fill(SlotState::Empty);
        self.len = 0;
    }

    /// Double the capacity and re-insert every entry.
    pub fn grow(&mut self) {
        let mut grown = Self::new(self.capacity() * 2);
        for (key, value) in self.iter() {
            let added = grown.try_add(key, value);
            debug_assert!(added, "{:?} lost while growing the edge map", key);
        }
        *self = grown;
    }
}

impl<I: MeshIndex> fmt::Debug for EdgeHashMap<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeHashMap")
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}
