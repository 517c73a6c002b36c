//! Boundary-tag encoding.
//!
//! A tag packs a block's total size (a multiple of [`DWORD`], so its low
//! bits are free) with the allocated flag in bit 0. Every block carries
//! the tag twice, as a header one word before the payload and as a footer
//! in the last word of the block; the footer is what makes backward
//! traversal during coalescing possible.

use segalloc_sys::align::align_up;

use crate::config::{
  DWORD,
  MIN_BLOCK,
};

const ALLOC_BIT: usize = 0x1;

pub const fn pack(size: usize, allocated: bool) -> usize {
  size | allocated as usize
}

pub const fn tag_size(tag: usize) -> usize {
  tag & !(DWORD - 1)
}

pub const fn tag_allocated(tag: usize) -> bool {
  tag & ALLOC_BIT != 0
}

/// Total block size for a payload request: payload plus a double word of
/// tag overhead, rounded up to the alignment unit, never under the
/// minimum block. `None` on arithmetic overflow.
pub fn adjusted_size(request: usize) -> Option<usize> {
  let total = request.checked_add(DWORD)?;
  let total = align_up(total, DWORD)?;
  Some(if total < MIN_BLOCK { MIN_BLOCK } else { total })
}
