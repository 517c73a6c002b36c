#![allow(dead_code)]

/// Aborting panic handler for the `no_std` C ABI build. Writes what it
/// can to fd 2 without allocating; a panicking allocator cannot be asked
/// for memory to format its own report.
#[cfg(not(test))]
#[panic_handler]
pub fn panic_handler(info: &core::panic::PanicInfo) -> ! {
  fn put(bytes: &[u8]) {
    unsafe {
      libc::write(libc::STDERR_FILENO, bytes.as_ptr() as *const libc::c_void, bytes.len());
    }
  }

  put(b"segalloc panic");
  if let Some(message) = info.message().as_str() {
    put(b": ");
    put(message.as_bytes());
  }
  if let Some(location) = info.location() {
    put(b" at ");
    put(location.file().as_bytes());
  }
  put(b"\n");

  unsafe { libc::abort() }
}
