#![cfg_attr(not(test), no_std)]

pub mod align;
pub mod system;
pub mod unix;

pub use system::GLOBAL_SYSTEM;

pub mod prelude {
  pub use super::{
    GLOBAL_SYSTEM,
    align::{
      align_down,
      align_up,
      is_aligned,
      min_align,
      page_align,
      page_size,
      word_width,
    },
    system::{
      SysError,
      SysOption,
      SysResult,
      System,
    },
  };
}
