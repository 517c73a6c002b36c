#![no_std]

pub use segalloc::prelude::*;
use core::ptr;

mod handler;

static HEAP: LockedHeap = LockedHeap::empty();

#[unsafe(no_mangle)]
pub extern "C" fn sa_page_size() -> usize {
  page_size()
}

/// Runs the heap consistency audit; nonzero means consistent.
#[unsafe(no_mangle)]
pub extern "C" fn sa_heap_check() -> i32 {
  HEAP.check() as i32
}

#[unsafe(no_mangle)]
pub extern "C" fn malloc(size: usize) -> *mut u8 {
  HEAP.allocate(size)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn free(ptr: *mut u8) {
  unsafe { HEAP.release(ptr) };
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn realloc(ptr: *mut u8, size: usize) -> *mut u8 {
  unsafe { HEAP.resize(ptr, size) }
}

#[unsafe(no_mangle)]
pub extern "C" fn calloc(num: usize, size: usize) -> *mut u8 {
  let Some(total) = num.checked_mul(size) else {
    return ptr::null_mut();
  };

  let ptr = HEAP.allocate(total);
  if !ptr.is_null() {
    unsafe { ptr.write_bytes(0, total) };
  }
  ptr
}

#[unsafe(no_mangle)]
pub extern "C" fn aligned_alloc(align: usize, size: usize) -> *mut u8 {
  // Every payload is double-word aligned; anything stricter is refused.
  if align > min_align() || !align.is_power_of_two() {
    return ptr::null_mut();
  }
  HEAP.allocate(size)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn malloc_usable_size(ptr: *mut u8) -> usize {
  if ptr.is_null() {
    return 0;
  }
  unsafe { HEAP.usable_size(ptr) }
}
