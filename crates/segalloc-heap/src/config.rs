use segalloc_sys::align::word_width;

pub const WORD: usize = word_width();

/// Alignment unit; every block size and payload address is a multiple of it.
pub const DWORD: usize = 2 * WORD;

/// Header + footer + the two free-list link words.
pub const MIN_BLOCK: usize = 2 * DWORD;

/// Empty link / empty bin marker. Offset 0 is the padding word in front of
/// the prologue, so no real payload ever lives there.
pub const NIL: usize = 0;

/// Payload offset of the first real block (past padding word + prologue).
pub const START: usize = 4 * WORD;

/// Smallest amount the arena is grown by at a time.
pub const CHUNK_MIN: usize = 4096;

/// Bins 0..DIRECT_BINS are direct-mapped: one DWORD-sized class each.
pub const DIRECT_BINS: usize = 32;
pub const DIRECT_MAX: usize = DIRECT_BINS * DWORD;

/// Upper size thresholds of the widening range bins, coarser toward the
/// top. The exact breakpoints are tuning, not contract; only the shape
/// (direct small classes, widening ranges, one catch-all) matters.
pub const LADDER: [usize; 8] = [
  2 * DIRECT_MAX,
  4 * DIRECT_MAX,
  8 * DIRECT_MAX,
  16 * DIRECT_MAX,
  32 * DIRECT_MAX,
  128 * DIRECT_MAX,
  512 * DIRECT_MAX,
  2048 * DIRECT_MAX,
];

pub const NBINS: usize = DIRECT_BINS + LADDER.len() + 1;

/// Default address-space reservation for a heap.
pub const DEFAULT_LIMIT: usize = 256 * 1024 * 1024;
