#![cfg_attr(not(test), no_std)]

use core::ops::Range;

use getset::CopyGetters;
use segalloc_sys::{
  GLOBAL_SYSTEM,
  align::{
    page_align,
    word_width,
  },
  system::{
    SysError,
    SysOption,
  },
};

const WORD: usize = word_width();

#[derive(Debug)]
pub enum ArenaError {
  Sys(SysError),
  Exhausted { requested: usize, available: usize },
  Overflow,
}

pub type ArenaResult<T> = Result<T, ArenaError>;

/// One contiguous, grow-only backing region.
///
/// The full reservation is mapped inaccessible up front, so the region
/// never relocates; `grow` commits pages as the used prefix advances.
/// All access goes through offset-based, bounds-checked accessors.
#[derive(CopyGetters)]
pub struct Arena {
  slice: &'static mut [u8],
  /// Bytes handed out to the caller so far.
  #[getset(get_copy = "pub")]
  len: usize,
  /// Bytes readable/writable (page granular, `>= len`).
  #[getset(get_copy = "pub")]
  committed: usize,
}

impl Arena {
  /// Reserves `limit` bytes of address space without committing any.
  pub fn new(limit: usize) -> ArenaResult<Self> {
    let limit = page_align(limit).ok_or(ArenaError::Overflow)?;
    let slice =
      unsafe { GLOBAL_SYSTEM.map(limit, SysOption::Reserve) }.map_err(ArenaError::Sys)?;

    Ok(Self {
      slice,
      len: 0,
      committed: 0,
    })
  }

  pub fn limit(&self) -> usize {
    self.slice.len()
  }

  /// Extends the used prefix by `additional` bytes, committing pages as
  /// needed, and returns the offset where the new region starts. On
  /// failure nothing is committed and `len` is unchanged.
  pub fn grow(&mut self, additional: usize) -> ArenaResult<usize> {
    let new_len = self.len.checked_add(additional).ok_or(ArenaError::Overflow)?;
    if new_len > self.slice.len() {
      return Err(ArenaError::Exhausted {
        requested: additional,
        available: self.slice.len() - self.len,
      });
    }

    let target = page_align(new_len).ok_or(ArenaError::Overflow)?;
    if target > self.committed {
      unsafe { GLOBAL_SYSTEM.modify(&self.slice[self.committed..target], SysOption::Commit) }
        .map_err(ArenaError::Sys)?;
      self.committed = target;
    }

    let old_len = self.len;
    self.len = new_len;
    Ok(old_len)
  }

  fn check(&self, range: &Range<usize>) {
    assert!(
      range.start <= range.end && range.end <= self.len,
      "arena access out of bounds: {}..{} (len {})",
      range.start,
      range.end,
      self.len
    );
  }

  pub fn word(&self, offset: usize) -> usize {
    let range = offset..offset + WORD;
    self.check(&range);
    let mut buf = [0u8; WORD];
    buf.copy_from_slice(&self.slice[range]);
    usize::from_ne_bytes(buf)
  }

  pub fn set_word(&mut self, offset: usize, value: usize) {
    let range = offset..offset + WORD;
    self.check(&range);
    self.slice[range].copy_from_slice(&value.to_ne_bytes());
  }

  pub fn bytes(&self, range: Range<usize>) -> &[u8] {
    self.check(&range);
    &self.slice[range]
  }

  pub fn bytes_mut(&mut self, range: Range<usize>) -> &mut [u8] {
    self.check(&range);
    &mut self.slice[range]
  }

  /// Copies `src` to `dest`; the ranges may overlap.
  pub fn copy_within(&mut self, src: Range<usize>, dest: usize) {
    self.check(&src);
    self.check(&(dest..dest + src.len()));
    self.slice.copy_within(src, dest);
  }

  pub fn as_ptr(&self) -> *const u8 {
    self.slice.as_ptr()
  }

  pub fn as_mut_ptr(&mut self) -> *mut u8 {
    self.slice.as_mut_ptr()
  }
}

impl Drop for Arena {
  fn drop(&mut self) {
    let _ = unsafe { GLOBAL_SYSTEM.unmap(self.slice) };
  }
}

#[cfg(test)]
mod tests;
