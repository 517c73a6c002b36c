#[cfg(any(target_os = "linux", target_os = "macos"))]
use crate::{
  align::{
    is_aligned,
    page_size,
  },
  system::{
    SysError,
    SysOption,
    SysResult,
    System,
  },
};

pub struct UnixSystem {}

#[cfg(any(target_os = "linux", target_os = "macos"))]
pub static UNIX_SYSTEM: UnixSystem = UnixSystem {};

#[cfg(any(target_os = "linux", target_os = "macos"))]
impl UnixSystem {
  const fn prot_as(options: SysOption) -> i32 {
    match options {
      SysOption::Reserve => libc::PROT_NONE,
      SysOption::Commit => libc::PROT_READ | libc::PROT_WRITE,
    }
  }

  const fn flags() -> i32 {
    libc::MAP_PRIVATE | libc::MAP_ANONYMOUS
  }

  const fn as_c(slice: &[u8]) -> *mut libc::c_void {
    slice.as_ptr() as *mut libc::c_void
  }

  fn page_aligned(slice: &[u8]) -> bool {
    is_aligned(slice.as_ptr() as usize, page_size()) == Some(true)
      && is_aligned(slice.len(), page_size()) == Some(true)
  }
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
unsafe impl System for UnixSystem {
  unsafe fn map<'mem>(&self, size: usize, options: SysOption) -> SysResult<&'mem mut [u8]> {
    if is_aligned(size, page_size()) != Some(true) {
      return Err(SysError::InvalidArgument);
    }

    let prot = Self::prot_as(options);
    let ptr = unsafe { libc::mmap(core::ptr::null_mut(), size, prot, Self::flags(), -1, 0) };

    if ptr == libc::MAP_FAILED {
      return Err(SysError::OutOfMemory);
    }

    let slice = unsafe { core::slice::from_raw_parts_mut(ptr as *mut u8, size) };
    Ok(slice)
  }

  unsafe fn modify(&self, slice: &[u8], options: SysOption) -> SysResult<()> {
    if !Self::page_aligned(slice) {
      return Err(SysError::InvalidArgument);
    }

    let prot = Self::prot_as(options);
    let result = unsafe { libc::mprotect(Self::as_c(slice), slice.len(), prot) };
    if result == 0 {
      Ok(())
    } else {
      Err(SysError::OutOfMemory)
    }
  }

  unsafe fn unmap(&self, slice: &[u8]) -> SysResult<()> {
    let result = unsafe { libc::munmap(Self::as_c(slice), slice.len()) };
    if result == 0 {
      Ok(())
    } else {
      Err(SysError::InvalidArgument)
    }
  }
}
