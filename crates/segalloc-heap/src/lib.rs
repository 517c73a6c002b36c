#![cfg_attr(not(test), no_std)]

pub mod check;
pub mod classes;
pub mod config;
mod freelist;
pub mod heap;
pub mod layout;

pub use check::Violation;
pub use heap::{
  Heap,
  HeapError,
  HeapResult,
  HeapStats,
};
