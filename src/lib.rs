#![cfg_attr(not(test), no_std)]

use core::{
  alloc::{
    GlobalAlloc,
    Layout,
  },
  ptr,
};

use segalloc_sys::align::min_align;
use spin::Mutex;

pub use segalloc_arena::{
  Arena,
  ArenaError,
  ArenaResult,
};
pub use segalloc_heap::{
  Heap,
  HeapError,
  HeapResult,
  HeapStats,
  Violation,
};

pub mod prelude {
  pub use segalloc_heap::{
    Heap,
    HeapError,
    HeapResult,
    HeapStats,
    Violation,
  };
  pub use segalloc_sys::prelude::*;

  pub use super::LockedHeap;
}

/// A [`Heap`] behind a spin lock, lazily set up on first use.
///
/// The heap itself is single-threaded by design; this wrapper is the
/// one-lock-around-every-call serialization expected of concurrent
/// callers, and doubles as a [`GlobalAlloc`].
pub struct LockedHeap {
  inner: Mutex<Option<Heap>>,
}

impl LockedHeap {
  pub const fn empty() -> Self {
    Self {
      inner: Mutex::new(None),
    }
  }

  fn with_heap<R>(&self, f: impl FnOnce(&mut Heap) -> Option<R>) -> Option<R> {
    let mut guard = self.inner.lock();
    if guard.is_none() {
      *guard = Heap::with_default_limit().ok();
    }
    guard.as_mut().and_then(f)
  }

  /// Allocates `size` usable bytes, returning a raw payload pointer or
  /// null on exhaustion (and for `size == 0`).
  pub fn allocate(&self, size: usize) -> *mut u8 {
    self
      .with_heap(|heap| {
        let bp = heap.allocate(size)?;
        Some(unsafe { heap.base_mut_ptr().add(bp) })
      })
      .unwrap_or(ptr::null_mut())
  }

  /// Frees a pointer previously returned by this heap. Null is a no-op.
  ///
  /// # Safety
  ///
  /// `ptr` must be null or a live pointer obtained from [`Self::allocate`]
  /// or [`Self::resize`] on this same value.
  pub unsafe fn release(&self, ptr: *mut u8) {
    if ptr.is_null() {
      return;
    }
    let _ = self.with_heap(|heap| {
      let offset = ptr as usize - heap.base_ptr() as usize;
      heap.free(Some(offset));
      Some(())
    });
  }

  /// Resizes an allocation, with malloc-style null/zero semantics.
  ///
  /// # Safety
  ///
  /// `ptr` must be null or a live pointer obtained from this value.
  pub unsafe fn resize(&self, ptr: *mut u8, new_size: usize) -> *mut u8 {
    self
      .with_heap(|heap| {
        let block = if ptr.is_null() {
          None
        } else {
          Some(ptr as usize - heap.base_ptr() as usize)
        };
        let bp = heap.resize(block, new_size)?;
        Some(unsafe { heap.base_mut_ptr().add(bp) })
      })
      .unwrap_or(ptr::null_mut())
  }

  /// Usable bytes behind a live pointer.
  ///
  /// # Safety
  ///
  /// `ptr` must be a live pointer obtained from this value.
  pub unsafe fn usable_size(&self, ptr: *mut u8) -> usize {
    self
      .with_heap(|heap| {
        let offset = ptr as usize - heap.base_ptr() as usize;
        Some(heap.usable_size(offset))
      })
      .unwrap_or(0)
  }

  /// Runs the heap's consistency audit.
  pub fn check(&self) -> bool {
    self.with_heap(|heap| Some(heap.check())).unwrap_or(false)
  }
}

unsafe impl GlobalAlloc for LockedHeap {
  unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
    // Payloads are double-word aligned; stricter layouts are refused.
    if layout.align() > min_align() {
      return ptr::null_mut();
    }
    self.allocate(layout.size())
  }

  unsafe fn dealloc(&self, ptr: *mut u8, _layout: Layout) {
    unsafe { self.release(ptr) };
  }

  unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
    if layout.align() > min_align() {
      return ptr::null_mut();
    }
    unsafe { self.resize(ptr, new_size) }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_locked_heap_round_trip() {
    let heap = LockedHeap::empty();

    let ptr = heap.allocate(100);
    assert!(!ptr.is_null());
    assert_eq!(ptr as usize % min_align(), 0);
    assert!(unsafe { heap.usable_size(ptr) } >= 100);

    unsafe {
      ptr.write_bytes(0x7E, 100);
      assert_eq!(*ptr.add(99), 0x7E);
      heap.release(ptr);
    }
    assert!(heap.check());
  }

  #[test]
  fn test_locked_heap_resize_semantics() {
    let heap = LockedHeap::empty();

    let from_null = unsafe { heap.resize(ptr::null_mut(), 64) };
    assert!(!from_null.is_null());

    let to_zero = unsafe { heap.resize(from_null, 0) };
    assert!(to_zero.is_null());
    assert!(heap.check());
  }

  #[test]
  fn test_global_alloc_refuses_wide_alignment() {
    let heap = LockedHeap::empty();
    let layout = Layout::from_size_align(64, min_align() * 4).unwrap();
    assert!(unsafe { heap.alloc(layout) }.is_null());
  }

  #[test]
  fn test_global_alloc_round_trip() {
    let heap = LockedHeap::empty();
    let layout = Layout::from_size_align(256, 8).unwrap();

    let ptr = unsafe { heap.alloc(layout) };
    assert!(!ptr.is_null());
    let grown = unsafe { heap.realloc(ptr, layout, 512) };
    assert!(!grown.is_null());
    unsafe { heap.dealloc(grown, layout) };
    assert!(heap.check());
  }
}
