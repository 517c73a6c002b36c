//! On-demand invariant auditor.
//!
//! Read-only: it reports the first violation found and repairs nothing.
//! Two sweeps cover both directions of the free-list/heap relationship:
//! every listed block must be a well-formed free block in the right bin
//! with allocated neighbors, and every block tagged free in the arena
//! must be reachable from its bin. List traversal always follows the
//! designated next link.

use crate::{
  classes::bin_for,
  config::{
    DWORD,
    MIN_BLOCK,
    NBINS,
    NIL,
    START,
    WORD,
  },
  heap::Heap,
  layout::pack,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
  /// A bin links to an offset that is not a plausible block.
  OutOfBounds { block: usize },
  /// A listed block is tagged allocated.
  ListedNotFree { block: usize },
  /// A free block's header and footer disagree.
  TagMismatch { block: usize },
  /// Two address-adjacent blocks are both free (a coalesce escaped).
  AdjacentFree { block: usize },
  /// A free block sits in a bin its size does not map to.
  WrongBin { block: usize, expected: usize, actual: usize },
  /// A block tagged free is reachable from no bin.
  Unlisted { block: usize },
}

impl Heap {
  /// Single pass/fail signal over [`Heap::audit`].
  pub fn check(&self) -> bool {
    self.audit().is_ok()
  }

  /// Walks every bin and then the whole arena in address order,
  /// reporting the first invariant violation.
  pub fn audit(&self) -> Result<(), Violation> {
    for bin in 0..NBINS {
      let mut bp = self.bins[bin];
      while bp != NIL {
        self.audit_listed(bin, bp)?;
        bp = self.link_next(bp);
      }
    }

    let mut bp = START;
    loop {
      let size = self.size_at(bp);
      if size == 0 {
        break;
      }
      if !self.allocated_at(bp) {
        self.audit_free_block(bp)?;
      }
      bp = bp + size;
    }

    Ok(())
  }

  fn plausible(&self, bp: usize) -> bool {
    bp >= START
      && bp % DWORD == 0
      && bp + WORD <= self.arena.len()
      && self.size_at(bp) >= MIN_BLOCK
      && bp + self.size_at(bp) <= self.arena.len()
  }

  fn audit_listed(&self, bin: usize, bp: usize) -> Result<(), Violation> {
    if !self.plausible(bp) {
      return Err(Violation::OutOfBounds { block: bp });
    }
    if self.allocated_at(bp) {
      return Err(Violation::ListedNotFree { block: bp });
    }

    let size = self.size_at(bp);
    if self.footer_of(bp) != pack(size, false) {
      return Err(Violation::TagMismatch { block: bp });
    }
    if !self.allocated_at(self.prev_block(bp)) || !self.allocated_at(self.next_block(bp)) {
      return Err(Violation::AdjacentFree { block: bp });
    }

    let expected = bin_for(size);
    if expected != bin {
      return Err(Violation::WrongBin {
        block: bp,
        expected,
        actual: bin,
      });
    }

    Ok(())
  }

  fn audit_free_block(&self, bp: usize) -> Result<(), Violation> {
    let size = self.size_at(bp);
    if self.footer_of(bp) != pack(size, false) {
      return Err(Violation::TagMismatch { block: bp });
    }
    if !self.allocated_at(self.next_block(bp)) {
      return Err(Violation::AdjacentFree { block: bp });
    }
    if !self.bin_contains(bin_for(size), bp) {
      return Err(Violation::Unlisted { block: bp });
    }
    Ok(())
  }

  fn bin_contains(&self, bin: usize, target: usize) -> bool {
    let mut bp = self.bins[bin];
    while bp != NIL {
      if bp == target {
        return true;
      }
      bp = self.link_next(bp);
    }
    false
  }
}
