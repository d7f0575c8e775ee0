//! Chunked pools backing the term generator.
//!
//! Every pool grows by appending a fresh chunk of the same size. Existing
//! chunks are never reallocated, so an index handed out once keeps
//! addressing the same element until it is released.

/// Index value that never names a pool element.
pub(crate) const NIL: u32 = u32::MAX;

const CHUNK_SHIFT: u32 = 8;
const CHUNK_LEN: usize = 1 << CHUNK_SHIFT;
const CHUNK_MASK: usize = CHUNK_LEN - 1;

#[inline]
fn split(index: u32) -> (usize, usize) {
    let index = index as usize;
    (index >> CHUNK_SHIFT, index & CHUNK_MASK)
}

/// A growable pool of `T` with a free-index stack.
pub(crate) struct ChunkedPool<T> {
    chunks: Vec<Vec<T>>,
    free: Vec<u32>,
}

impl<T> ChunkedPool<T> {
    /// Creates a pool with room for roughly `capacity` elements.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut chunks = Vec::with_capacity(capacity.div_ceil(CHUNK_LEN).max(1));
        chunks.push(Vec::with_capacity(CHUNK_LEN));
        Self {
            chunks,
            free: Vec::new(),
        }
    }

    /// Stores `value`, reusing a released slot when one is available.
    pub(crate) fn alloc(&mut self, value: T) -> u32 {
        if let Some(index) = self.free.pop() {
            *self.get_mut(index) = value;
            return index;
        }

        if self.chunks.last().map_or(true, |c| c.len() == CHUNK_LEN) {
            self.chunks.push(Vec::with_capacity(CHUNK_LEN));
        }
        let chunk = self.chunks.len() - 1;
        let offset = self.chunks[chunk].len();
        let index = (chunk << CHUNK_SHIFT) | offset;
        assert!(index < NIL as usize, "chunked pool exhausted its index space");

        self.chunks[chunk].push(value);
        index as u32
    }

    /// Returns a slot to the free stack. Its contents stay until reused.
    pub(crate) fn release(&mut self, index: u32) {
        debug_assert!(index != NIL);
        self.free.push(index);
    }

    #[inline]
    pub(crate) fn get(&self, index: u32) -> &T {
        let (chunk, offset) = split(index);
        &self.chunks[chunk][offset]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, index: u32) -> &mut T {
        let (chunk, offset) = split(index);
        &mut self.chunks[chunk][offset]
    }

    /// Number of elements currently handed out.
    pub(crate) fn live(&self) -> usize {
        let stored: usize = self.chunks.iter().map(Vec::len).sum();
        stored - self.free.len()
    }
}

/// A growable pool of fixed-width exponent vectors.
///
/// Each slot holds `words` packed `u64`s; a chunk holds `CHUNK_LEN` slots.
pub(crate) struct ExponentPool {
    words: usize,
    chunks: Vec<Box<[u64]>>,
    free: Vec<u32>,
    next: usize,
}

impl ExponentPool {
    /// Creates a pool of `words`-word slots with room for about `capacity` of them.
    pub(crate) fn with_capacity(words: usize, capacity: usize) -> Self {
        debug_assert!(words > 0);
        Self {
            words,
            chunks: Vec::with_capacity(capacity.div_ceil(CHUNK_LEN).max(1)),
            free: Vec::new(),
            next: 0,
        }
    }

    /// Hands out a slot. A reused slot still holds its previous words.
    pub(crate) fn alloc(&mut self) -> u32 {
        if let Some(index) = self.free.pop() {
            return index;
        }

        let index = self.next;
        assert!(index < NIL as usize, "exponent pool exhausted its index space");
        if index >> CHUNK_SHIFT == self.chunks.len() {
            self.chunks
                .push(vec![0; self.words * CHUNK_LEN].into_boxed_slice());
        }
        self.next += 1;
        index as u32
    }

    pub(crate) fn release(&mut self, index: u32) {
        debug_assert!(index != NIL);
        self.free.push(index);
    }

    #[inline]
    pub(crate) fn slot(&self, index: u32) -> &[u64] {
        let (chunk, offset) = split(index);
        let start = offset * self.words;
        &self.chunks[chunk][start..start + self.words]
    }

    #[inline]
    pub(crate) fn slot_mut(&mut self, index: u32) -> &mut [u64] {
        let (chunk, offset) = split(index);
        let start = offset * self.words;
        &mut self.chunks[chunk][start..start + self.words]
    }

    /// Number of slots currently handed out.
    pub(crate) fn live(&self) -> usize {
        self.next - self.free.len()
    }
}
