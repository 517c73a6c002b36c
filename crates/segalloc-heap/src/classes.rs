//! Segregated size-class index.
//!
//! Sizes up to [`DIRECT_MAX`] map one alignment quantum per bin; above
//! that a ladder of widening ranges takes over, ending in a single
//! catch-all bin for everything past the last threshold. A size sitting
//! exactly on a threshold belongs to the lower (tighter) bin.

use crate::config::{
  DIRECT_BINS,
  DIRECT_MAX,
  DWORD,
  LADDER,
  MIN_BLOCK,
  NBINS,
};

pub fn bin_for(size: usize) -> usize {
  debug_assert!(size >= MIN_BLOCK && size % DWORD == 0);

  if size <= DIRECT_MAX {
    return size / DWORD - 1;
  }

  for (i, &threshold) in LADDER.iter().enumerate() {
    if size <= threshold {
      return DIRECT_BINS + i;
    }
  }

  NBINS - 1
}

pub const fn is_catch_all(bin: usize) -> bool {
  bin == NBINS - 1
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_direct_mapping() {
    assert_eq!(bin_for(MIN_BLOCK), MIN_BLOCK / DWORD - 1);
    for quanta in 2..=DIRECT_BINS {
      assert_eq!(bin_for(quanta * DWORD), quanta - 1);
    }
  }

  #[test]
  fn test_threshold_belongs_to_lower_bin() {
    assert_eq!(bin_for(DIRECT_MAX), DIRECT_BINS - 1);
    assert_eq!(bin_for(DIRECT_MAX + DWORD), DIRECT_BINS);

    for (i, &threshold) in LADDER.iter().enumerate() {
      assert_eq!(bin_for(threshold), DIRECT_BINS + i);
      assert_eq!(bin_for(threshold + DWORD), DIRECT_BINS + i + 1);
    }
  }

  #[test]
  fn test_catch_all() {
    let last = LADDER[LADDER.len() - 1];
    assert!(is_catch_all(bin_for(last + DWORD)));
    assert!(is_catch_all(bin_for(last * 16)));
    assert!(!is_catch_all(bin_for(last)));
  }

  #[test]
  fn test_mapping_is_monotonic() {
    let mut previous = 0;
    let mut size = MIN_BLOCK;
    while size <= LADDER[LADDER.len() - 1] + DWORD {
      let bin = bin_for(size);
      assert!(bin >= previous);
      assert!(bin < NBINS);
      previous = bin;
      size += DWORD;
    }
  }
}
