//! Intrusive per-bin free lists.
//!
//! While a block is free its first two payload words are its bin links:
//! prev at `bp`, next at `bp + WORD`, both arena offsets with [`NIL`]
//! meaning end-of-list. Heads are plain offsets in the heap's bin table.
//! Insertion pushes at the head; removal unlinks through the block's own
//! links and only touches the head slot when the victim was the head.

use crate::{
  classes::bin_for,
  config::{
    NIL,
    WORD,
  },
  heap::Heap,
};

impl Heap {
  pub(crate) fn link_prev(&self, bp: usize) -> usize {
    self.arena.word(bp)
  }

  pub(crate) fn link_next(&self, bp: usize) -> usize {
    self.arena.word(bp + WORD)
  }

  fn set_link_prev(&mut self, bp: usize, target: usize) {
    self.arena.set_word(bp, target);
  }

  fn set_link_next(&mut self, bp: usize, target: usize) {
    self.arena.set_word(bp + WORD, target);
  }

  /// Pushes a free block at the head of the bin its size maps to.
  pub(crate) fn bin_insert(&mut self, bp: usize) {
    debug_assert!(!self.allocated_at(bp));

    let bin = bin_for(self.size_at(bp));
    let head = self.bins[bin];

    self.set_link_prev(bp, NIL);
    self.set_link_next(bp, head);
    if head != NIL {
      self.set_link_prev(head, bp);
    }
    self.bins[bin] = bp;
  }

  /// Unlinks a free block from its bin. Must run before the block's size
  /// tag changes, since the head slot is found through the size.
  pub(crate) fn bin_remove(&mut self, bp: usize) {
    let prev = self.link_prev(bp);
    let next = self.link_next(bp);

    if prev != NIL {
      self.set_link_next(prev, next);
    } else {
      self.bins[bin_for(self.size_at(bp))] = next;
    }

    if next != NIL {
      self.set_link_prev(next, prev);
    }
  }
}
