//! The allocator façade and its free-space management core.
//!
//! Blocks are identified by their payload offset into the arena. A block
//! occupies `[bp - WORD, bp + size - WORD)`: header tag, payload, footer
//! tag. While free, the first two payload words hold the prev/next links
//! of its size-class bin; while allocated they belong to the caller.
//!
//! The arena front carries an alignment padding word and an allocated
//! zero-payload prologue; an allocated zero-size epilogue header sits at
//! the arena end and is re-planted on every growth. The sentinels
//! terminate backward and forward traversal, so coalescing never has to
//! special-case the arena edges.

use getset::CopyGetters;
use segalloc_arena::{
  Arena,
  ArenaError,
};

use crate::{
  classes::{
    bin_for,
    is_catch_all,
  },
  config::{
    CHUNK_MIN,
    DEFAULT_LIMIT,
    DWORD,
    MIN_BLOCK,
    NBINS,
    NIL,
    START,
    WORD,
  },
  layout::{
    adjusted_size,
    pack,
    tag_allocated,
    tag_size,
  },
};

#[derive(Debug)]
pub enum HeapError {
  Arena(ArenaError),
}

pub type HeapResult<T> = Result<T, HeapError>;

/// Operation counters, maintained by the public entry points.
#[derive(Debug, Default, Clone, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct HeapStats {
  allocations: u64,
  frees: u64,
  resizes: u64,
  grows: u64,
}

/// A single-threaded segregated-fit heap over a grow-only [`Arena`].
///
/// All state lives in this value: the arena extent and the bin head
/// table. Callers needing concurrent access must serialize every call
/// externally; there is no internal locking.
pub struct Heap {
  pub(crate) arena: Arena,
  pub(crate) bins: [usize; NBINS],
  stats: HeapStats,
}

impl Heap {
  /// Creates a heap reserving `limit` bytes of address space and plants
  /// the prologue and epilogue sentinels. The limit caps how far the
  /// arena can ever grow.
  pub fn new(limit: usize) -> HeapResult<Self> {
    let mut arena = Arena::new(limit).map_err(HeapError::Arena)?;
    arena.grow(START).map_err(HeapError::Arena)?;

    arena.set_word(0, 0);
    arena.set_word(WORD, pack(DWORD, true));
    arena.set_word(2 * WORD, pack(DWORD, true));
    arena.set_word(3 * WORD, pack(0, true));

    Ok(Self {
      arena,
      bins: [NIL; NBINS],
      stats: HeapStats::default(),
    })
  }

  pub fn with_default_limit() -> HeapResult<Self> {
    Self::new(DEFAULT_LIMIT)
  }

  // ---- block accessors ------------------------------------------------

  pub(crate) fn size_at(&self, bp: usize) -> usize {
    tag_size(self.arena.word(bp - WORD))
  }

  pub(crate) fn allocated_at(&self, bp: usize) -> bool {
    tag_allocated(self.arena.word(bp - WORD))
  }

  pub(crate) fn footer_of(&self, bp: usize) -> usize {
    self.arena.word(bp + self.size_at(bp) - DWORD)
  }

  pub(crate) fn next_block(&self, bp: usize) -> usize {
    bp + self.size_at(bp)
  }

  pub(crate) fn prev_block(&self, bp: usize) -> usize {
    bp - tag_size(self.arena.word(bp - DWORD))
  }

  /// Writes matching header and footer tags. Kept symmetric for
  /// allocated blocks as well, which keeps coalescing free of
  /// header-only special cases.
  fn write_tags(&mut self, bp: usize, size: usize, allocated: bool) {
    let tag = pack(size, allocated);
    self.arena.set_word(bp - WORD, tag);
    self.arena.set_word(bp + size - DWORD, tag);
  }

  // ---- coalescer ------------------------------------------------------

  /// Merges `bp` (free, not in any bin) with free neighbors, unhooking
  /// them from their bins. The merged block is returned unregistered;
  /// registering it is the caller's job.
  fn coalesce(&mut self, bp: usize) -> usize {
    let prev_allocated = self.allocated_at(self.prev_block(bp));
    let next = self.next_block(bp);
    let next_allocated = self.allocated_at(next);
    let mut size = self.size_at(bp);

    match (prev_allocated, next_allocated) {
      (true, true) => bp,
      (true, false) => {
        self.bin_remove(next);
        size += self.size_at(next);
        self.write_tags(bp, size, false);
        bp
      }
      (false, true) => {
        let prev = self.prev_block(bp);
        self.bin_remove(prev);
        size += self.size_at(prev);
        self.write_tags(prev, size, false);
        prev
      }
      (false, false) => {
        let prev = self.prev_block(bp);
        self.bin_remove(prev);
        self.bin_remove(next);
        size += self.size_at(prev) + self.size_at(next);
        self.write_tags(prev, size, false);
        prev
      }
    }
  }

  // ---- splitter -------------------------------------------------------

  /// Carves a leading portion of `needed` bytes out of `bp` (free, not
  /// currently binned). A remainder below the minimum block size stays
  /// attached; otherwise it becomes a free block in its own bin. The
  /// leading portion is returned still tagged free.
  fn split(&mut self, bp: usize, needed: usize) -> usize {
    let total = self.size_at(bp);
    debug_assert!(!self.allocated_at(bp));
    debug_assert!(needed <= total && needed % DWORD == 0);

    if total - needed < MIN_BLOCK {
      return bp;
    }

    self.write_tags(bp, needed, false);
    let rest = bp + needed;
    self.write_tags(rest, total - needed, false);
    self.bin_insert(rest);
    bp
  }

  // ---- fit search -----------------------------------------------------

  /// First-fit across the bins from the request's own class upward,
  /// best-fit inside the unbounded catch-all. A hit is unhooked from its
  /// bin and split down to `asize` before being returned.
  fn find_fit(&mut self, asize: usize) -> Option<usize> {
    for bin in bin_for(asize)..NBINS {
      let found = if is_catch_all(bin) {
        self.best_fit_in(bin, asize)
      } else {
        self.first_fit_in(bin, asize)
      };

      if let Some(bp) = found {
        self.bin_remove(bp);
        return Some(self.split(bp, asize));
      }
    }
    None
  }

  fn first_fit_in(&self, bin: usize, asize: usize) -> Option<usize> {
    let mut bp = self.bins[bin];
    while bp != NIL {
      if self.size_at(bp) >= asize {
        return Some(bp);
      }
      bp = self.link_next(bp);
    }
    None
  }

  /// Smallest adequate block, first-encountered on ties.
  fn best_fit_in(&self, bin: usize, asize: usize) -> Option<usize> {
    let mut best = None;
    let mut best_size = usize::MAX;
    let mut bp = self.bins[bin];
    while bp != NIL {
      let size = self.size_at(bp);
      if size >= asize && size < best_size {
        best = Some(bp);
        best_size = size;
      }
      bp = self.link_next(bp);
    }
    best
  }

  // ---- arena growth ---------------------------------------------------

  /// Grows the arena by `bytes`, turning the old epilogue header into
  /// the header of a fresh free block and planting a new epilogue at the
  /// end. The new block is coalesced with a free arena tail and returned
  /// unregistered.
  fn extend(&mut self, bytes: usize) -> Option<usize> {
    debug_assert!(bytes % DWORD == 0);
    let bp = self.arena.grow(bytes).ok()?;

    self.write_tags(bp, bytes, false);
    self.arena.set_word(bp + bytes - WORD, pack(0, true));
    self.stats.grows += 1;

    Some(self.coalesce(bp))
  }

  fn place(&mut self, bp: usize) {
    let size = self.size_at(bp);
    self.write_tags(bp, size, true);
  }

  // ---- public API -----------------------------------------------------

  /// Allocates a block with at least `size` usable bytes, payload
  /// aligned to the double word. Returns the payload offset, or `None`
  /// for a zero-size request or when the arena cannot grow any further.
  /// A failed allocation changes no heap state.
  pub fn allocate(&mut self, size: usize) -> Option<usize> {
    if size == 0 {
      return None;
    }
    let asize = adjusted_size(size)?;

    let bp = match self.find_fit(asize) {
      Some(bp) => bp,
      None => {
        let grown = self.extend(asize.max(CHUNK_MIN))?;
        self.split(grown, asize)
      }
    };

    self.place(bp);
    self.stats.allocations += 1;
    Some(bp)
  }

  /// Returns a block to the heap, merging it with free neighbors. `None`
  /// is a no-op.
  pub fn free(&mut self, block: Option<usize>) {
    let Some(bp) = block else { return };
    debug_assert!(self.allocated_at(bp));

    let size = self.size_at(bp);
    self.write_tags(bp, size, false);
    let merged = self.coalesce(bp);
    self.bin_insert(merged);
    self.stats.frees += 1;
  }

  /// Changes a block's usable size, in place when possible.
  ///
  /// `resize(None, n)` is `allocate(n)`; `resize(p, 0)` frees `p` and
  /// returns `None`. A shrink splits off the tail when the remainder is
  /// a valid block; a grow first tries to absorb a free following block
  /// before falling back to allocate-copy-free. On allocation failure
  /// the original block is untouched and `None` is returned.
  pub fn resize(&mut self, block: Option<usize>, new_size: usize) -> Option<usize> {
    let Some(bp) = block else {
      return self.allocate(new_size);
    };
    if new_size == 0 {
      self.free(Some(bp));
      return None;
    }

    self.stats.resizes += 1;
    let asize = adjusted_size(new_size)?;
    let size = self.size_at(bp);

    if asize <= size {
      if size - asize >= MIN_BLOCK {
        self.write_tags(bp, asize, true);
        let rest = bp + asize;
        self.write_tags(rest, size - asize, false);
        let merged = self.coalesce(rest);
        self.bin_insert(merged);
      }
      // Remainder under the minimum: keep the slack, same address.
      return Some(bp);
    }

    let next = self.next_block(bp);
    if !self.allocated_at(next) && size + self.size_at(next) >= asize {
      self.bin_remove(next);
      let total = size + self.size_at(next);
      self.write_tags(bp, total, false);
      let lead = self.split(bp, asize);
      self.place(lead);
      return Some(lead);
    }

    let new_bp = self.allocate(new_size)?;
    let copy = core::cmp::min(size - DWORD, new_size);
    self.arena.copy_within(bp..bp + copy, new_bp);
    self.free(Some(bp));
    Some(new_bp)
  }

  // ---- payload views --------------------------------------------------

  pub fn usable_size(&self, bp: usize) -> usize {
    self.size_at(bp) - DWORD
  }

  pub fn payload(&self, bp: usize) -> &[u8] {
    self.arena.bytes(bp..bp + self.usable_size(bp))
  }

  pub fn payload_mut(&mut self, bp: usize) -> &mut [u8] {
    let end = bp + self.usable_size(bp);
    self.arena.bytes_mut(bp..end)
  }

  pub fn stats(&self) -> &HeapStats {
    &self.stats
  }

  /// Base address of the arena, for callers translating offsets to raw
  /// pointers at an FFI boundary.
  pub fn base_ptr(&self) -> *const u8 {
    self.arena.as_ptr()
  }

  pub fn base_mut_ptr(&mut self) -> *mut u8 {
    self.arena.as_mut_ptr()
  }
}
