use std::marker::PhantomData;

use bytemuck::Pod;

/// Reasons an arena request can be refused.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ArenaError {
    #[error("arena request of {requested} bytes exceeds the {remaining} bytes remaining")]
    OutOfCapacity { requested: usize, remaining: usize },

    #[error("zero-sized types cannot be arena allocated")]
    ZeroSized,
}

/// Handle to `len` contiguous `T`s inside an [`Arena`].
///
/// Handles are plain offsets, so they can be stored across frames and
/// resolved again with [`Arena::get`] / [`Arena::get_mut`].
pub struct Block<T> {
    offset: usize,
    len: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Block<T> {
    /// Byte offset of the first element from the arena base.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte offset one past the last element.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.len * std::mem::size_of::<T>()
    }
}

impl<T> Clone for Block<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Block<T> {}

impl<T> PartialEq for Block<T> {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset && self.len == other.len
    }
}

impl<T> Eq for Block<T> {}

impl<T> std::fmt::Debug for Block<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Block")
            .field("type", &std::any::type_name::<T>())
            .field("offset", &self.offset)
            .field("len", &self.len)
            .finish()
    }
}

/// Bump allocator over a fixed byte region.
///
/// The offset only moves forward, so blocks are disjoint, contiguous (up to
/// alignment padding) and ordered by request. The region itself is borrowed
/// for `'m` and never grows or moves, which keeps every handed-out offset
/// valid and aligned for the life of the arena.
pub struct Arena<'m> {
    region: &'m mut [u8],
    offset: usize,
}

/// Saved arena offset, see [`Arena::mark`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ArenaMark(usize);

impl<'m> Arena<'m> {
    pub fn new(region: &'m mut [u8]) -> Self {
        Self { region, offset: 0 }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.region.len()
    }

    /// Bytes consumed so far, alignment padding included.
    #[inline]
    pub fn used(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.region.len() - self.offset
    }

    /// Reserves `count` elements of `T`.
    ///
    /// The block is not cleared: it holds zeros on first use of the region and
    /// whatever was last written there after a rewind. Any bit pattern is a
    /// valid `T`, so callers overwrite what they read or use
    /// [`Arena::alloc_zeroed`].
    ///
    /// # Panics
    /// Panics when the request does not fit. Region sizes are fixed at
    /// startup from known bounds, so running out is a bug in the caller.
    pub fn alloc<T: Pod>(&mut self, count: usize) -> Block<T> {
        match self.try_alloc(count) {
            Ok(block) => block,
            Err(err) => panic!("arena exhausted: {err}"),
        }
    }

    /// Checked form of [`Arena::alloc`]. A refused request leaves the arena untouched.
    pub fn try_alloc<T: Pod>(&mut self, count: usize) -> Result<Block<T>, ArenaError> {
        let elem = std::mem::size_of::<T>();
        if elem == 0 {
            return Err(ArenaError::ZeroSized);
        }

        let remaining = self.remaining();
        let padding = self.region[self.offset..]
            .as_ptr()
            .align_offset(std::mem::align_of::<T>());
        let needed = elem
            .checked_mul(count)
            .and_then(|bytes| bytes.checked_add(padding))
            .filter(|&needed| needed <= remaining)
            .ok_or(ArenaError::OutOfCapacity {
                requested: elem.saturating_mul(count),
                remaining,
            })?;

        let start = self.offset + padding;
        self.offset += needed;

        Ok(Block {
            offset: start,
            len: count,
            _marker: PhantomData,
        })
    }

    /// [`Arena::alloc`] followed by clearing the block. Costs a write per byte.
    pub fn alloc_zeroed<T: Pod>(&mut self, count: usize) -> Block<T> {
        let block = self.alloc::<T>(count);
        bytemuck::fill_zeroes(self.get_mut(block));
        block
    }

    /// Reserves a single element initialized to `value`.
    pub fn push<T: Pod>(&mut self, value: T) -> Block<T> {
        let block = self.alloc::<T>(1);
        self.get_mut(block)[0] = value;
        block
    }

    /// Resolves a handle previously returned by this arena.
    ///
    /// # Panics
    /// Panics if the handle lies outside the region.
    pub fn get<T: Pod>(&self, block: Block<T>) -> &[T] {
        bytemuck::cast_slice(&self.region[block.offset..block.end()])
    }

    pub fn get_mut<T: Pod>(&mut self, block: Block<T>) -> &mut [T] {
        debug_assert!(block.end() <= self.offset, "block past the arena offset");
        bytemuck::cast_slice_mut(&mut self.region[block.offset..block.end()])
    }

    /// First element of a handle, for single-value blocks.
    pub fn value_mut<T: Pod>(&mut self, block: Block<T>) -> &mut T {
        &mut self.get_mut(block)[0]
    }

    /// Current offset, to be restored later with [`Arena::reset_to`].
    #[inline]
    pub fn mark(&self) -> ArenaMark {
        ArenaMark(self.offset)
    }

    /// Rewinds to `mark`. Handles allocated after the mark become stale.
    pub fn reset_to(&mut self, mark: ArenaMark) {
        debug_assert!(mark.0 <= self.offset, "reset mark is ahead of the arena");
        self.offset = mark.0.min(self.offset);
    }

    /// Rewinds to the start of the region.
    pub fn reset(&mut self) {
        self.offset = 0;
    }
}

impl std::fmt::Debug for Arena<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.capacity())
            .field("used", &self.offset)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_are_disjoint_contiguous_and_ordered() {
        let mut region = vec![0u8; 256];
        let mut arena = Arena::new(&mut region);

        let a = arena.alloc::<u8>(10);
        let b = arena.alloc::<u8>(20);
        let c = arena.alloc::<u8>(30);

        assert_eq!(a.offset(), 0);
        assert_eq!(b.offset(), a.end());
        assert_eq!(c.offset(), b.end());
        assert_eq!(arena.used(), 60);
        assert_eq!(arena.remaining(), 196);

        arena.get_mut(a).fill(1);
        arena.get_mut(b).fill(2);
        arena.get_mut(c).fill(3);
        assert!(arena.get(a).iter().all(|&x| x == 1));
        assert!(arena.get(b).iter().all(|&x| x == 2));
        assert!(arena.get(c).iter().all(|&x| x == 3));
    }

    #[test]
    fn typed_blocks_are_aligned() {
        let mut region = vec![0u64; 16];
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut region[..]);
        let mut arena = Arena::new(bytes);

        let _odd = arena.alloc::<u8>(3);
        let words = arena.alloc::<u32>(4);
        assert_eq!(words.offset() % std::mem::align_of::<u32>(), 0);
        assert_eq!(arena.get(words).len(), 4);
        // 3 bytes + 1 byte padding + 16 bytes payload
        assert_eq!(arena.used(), 20);
    }

    #[test]
    fn exact_fit_succeeds() {
        let mut region = vec![0u8; 32];
        let mut arena = Arena::new(&mut region);
        assert_eq!(arena.alloc::<u8>(32).len(), 32);
        assert_eq!(arena.remaining(), 0);
    }

    #[test]
    fn oversized_request_is_refused_without_moving_offset() {
        let mut region = vec![0u8; 64];
        let mut arena = Arena::new(&mut region);
        let first = arena.alloc::<u8>(40);

        let err = arena.try_alloc::<u8>(25).unwrap_err();
        assert_eq!(
            err,
            ArenaError::OutOfCapacity {
                requested: 25,
                remaining: 24
            }
        );
        assert_eq!(arena.used(), 40);

        let rest = arena.alloc::<u8>(24);
        assert_eq!(rest.offset(), first.end());
    }

    #[test]
    fn overflowing_count_is_refused() {
        let mut region = vec![0u8; 64];
        let mut arena = Arena::new(&mut region);
        assert!(matches!(
            arena.try_alloc::<u64>(usize::MAX),
            Err(ArenaError::OutOfCapacity { .. })
        ));
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn zero_sized_types_are_refused() {
        let mut region = vec![0u8; 8];
        let mut arena = Arena::new(&mut region);
        assert_eq!(arena.try_alloc::<()>(1).unwrap_err(), ArenaError::ZeroSized);
    }

    #[test]
    #[should_panic(expected = "arena exhausted")]
    fn alloc_past_capacity_panics() {
        let mut region = vec![0u8; 8];
        let mut arena = Arena::new(&mut region);
        let _ = arena.alloc::<u8>(9);
    }

    #[test]
    fn alloc_does_not_touch_block_contents() {
        let mut region = vec![0xabu8; 1 << 16];
        let mut arena = Arena::new(&mut region);
        let big = arena.alloc::<u8>(1 << 16);
        assert_eq!(arena.remaining(), 0);
        assert!(arena.get(big).iter().all(|&b| b == 0xab));
    }

    #[test]
    fn push_stores_value() {
        let mut region = vec![0u32; 4];
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut region[..]);
        let mut arena = Arena::new(bytes);
        let value = arena.push(0xdead_beef_u32);
        assert_eq!(*arena.value_mut(value), 0xdead_beef);
        *arena.value_mut(value) += 1;
        assert_eq!(arena.get(value), &[0xdead_bef0]);
    }

    #[test]
    fn reset_to_mark_reclaims_without_clearing() {
        let mut region = vec![0u32; 16];
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut region[..]);
        let mut arena = Arena::new(bytes);
        let kept = arena.push(7u32);
        let mark = arena.mark();

        let tmp = arena.alloc::<u8>(32);
        arena.get_mut(tmp).fill(0xff);
        arena.reset_to(mark);
        assert_eq!(arena.used(), 4);

        let again = arena.alloc::<u8>(32);
        assert_eq!(again.offset(), tmp.offset());
        assert!(arena.get(again).iter().all(|&b| b == 0xff));
        assert_eq!(arena.get(kept), &[7]);

        arena.reset_to(mark);
        let cleared = arena.alloc_zeroed::<u8>(32);
        assert_eq!(cleared.offset(), tmp.offset());
        assert!(arena.get(cleared).iter().all(|&b| b == 0));

        arena.reset();
        assert_eq!(arena.used(), 0);
    }
}
