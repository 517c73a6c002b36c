#[cfg(any(target_os = "linux", target_os = "macos"))]
use crate::unix::UNIX_SYSTEM;

#[derive(Debug, PartialEq)]
pub enum SysError {
  Unsupported,
  OutOfMemory,
  InvalidArgument,
}

/// How a mapping (or part of one) should be treated by the system.
///
/// `Reserve` claims address space without backing it (no read/write
/// access); `Commit` makes it readable and writable.
#[derive(Debug, Clone, Copy)]
pub enum SysOption {
  Reserve,
  Commit,
}

pub type SysResult<T> = Result<T, SysError>;

/// Low-level system memory management trait.
///
/// # Safety
///
/// Implementors must ensure that:
/// - `map` returns valid, page-aligned memory that is accessible exactly
///   according to the requested `SysOption`
/// - `modify` and `unmap` only operate on memory previously returned by
///   `map` on this system
/// - Memory is not accessed after `unmap` is called
pub unsafe trait System
where
  Self: Send + Sync,
{
  /// Maps `size` bytes of address space.
  ///
  /// # Safety
  ///
  /// Caller must ensure `size` is page-aligned, and must not touch
  /// reserved memory before committing it via `modify`.
  unsafe fn map<'mem>(&self, size: usize, options: SysOption) -> SysResult<&'mem mut [u8]> {
    _ = (size, options);
    Err(SysError::Unsupported)
  }

  /// Changes the protection of a previously mapped range.
  ///
  /// # Safety
  ///
  /// Caller must ensure `slice` is a page-aligned range inside a mapping
  /// previously returned by `map` and still valid.
  unsafe fn modify(&self, slice: &[u8], options: SysOption) -> SysResult<()> {
    _ = (slice, options);
    Err(SysError::Unsupported)
  }

  /// Unmaps a mapping previously returned by `map`.
  ///
  /// # Safety
  ///
  /// Caller must ensure `slice` is the full mapping, is still valid, and
  /// will not be accessed after this call.
  unsafe fn unmap(&self, slice: &[u8]) -> SysResult<()> {
    _ = slice;
    Err(SysError::Unsupported)
  }
}

pub struct UnsupportedSystem {}
unsafe impl System for UnsupportedSystem {}

#[cfg(any(target_os = "linux", target_os = "macos"))]
pub static GLOBAL_SYSTEM: &dyn System = &UNIX_SYSTEM;

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
pub static GLOBAL_SYSTEM: &dyn System = &UnsupportedSystem {};

#[cfg(test)]
mod tests {
  use super::*;
  use crate::align::{
    is_aligned,
    page_size,
  };

  #[test]
  fn test_map_commit() {
    let ps = page_size();
    let slice = unsafe { GLOBAL_SYSTEM.map(ps, SysOption::Commit) }.expect("map failed");
    assert_eq!(slice.len(), ps);
    assert_eq!(is_aligned(slice.as_ptr() as usize, ps), Some(true));

    slice[0] = 0xAB;
    slice[ps - 1] = 0xCD;
    assert_eq!(slice[0], 0xAB);
    assert_eq!(slice[ps - 1], 0xCD);

    unsafe { GLOBAL_SYSTEM.unmap(slice) }.expect("unmap failed");
  }

  #[test]
  fn test_reserve_then_commit() {
    let ps = page_size();
    let slice = unsafe { GLOBAL_SYSTEM.map(ps * 4, SysOption::Reserve) }.expect("map failed");

    unsafe { GLOBAL_SYSTEM.modify(&slice[..ps], SysOption::Commit) }.expect("commit failed");
    slice[0] = 0x42;
    assert_eq!(slice[0], 0x42);

    unsafe { GLOBAL_SYSTEM.unmap(slice) }.expect("unmap failed");
  }

  #[test]
  fn test_unaligned_map_rejected() {
    let result = unsafe { GLOBAL_SYSTEM.map(page_size() + 1, SysOption::Commit) };
    assert!(matches!(result, Err(SysError::InvalidArgument)));
  }
}
