use super::*;
use segalloc_sys::align::page_size;

#[test]
fn test_new_arena_is_empty() {
  let arena = Arena::new(page_size() * 8).expect("reserve failed");
  assert_eq!(arena.len(), 0);
  assert_eq!(arena.committed(), 0);
  assert_eq!(arena.limit(), page_size() * 8);
}

#[test]
fn test_grow_returns_old_len() {
  let mut arena = Arena::new(page_size() * 8).expect("reserve failed");

  assert_eq!(arena.grow(64).expect("grow failed"), 0);
  assert_eq!(arena.len(), 64);
  assert_eq!(arena.grow(100).expect("grow failed"), 64);
  assert_eq!(arena.len(), 164);
}

#[test]
fn test_grow_commits_page_granular() {
  let ps = page_size();
  let mut arena = Arena::new(ps * 8).expect("reserve failed");

  arena.grow(1).expect("grow failed");
  assert_eq!(arena.committed(), ps);

  arena.grow(ps - 1).expect("grow failed");
  assert_eq!(arena.committed(), ps);

  arena.grow(1).expect("grow failed");
  assert_eq!(arena.committed(), ps * 2);
}

#[test]
fn test_grow_exhaustion_leaves_state() {
  let ps = page_size();
  let mut arena = Arena::new(ps).expect("reserve failed");

  arena.grow(ps).expect("grow failed");
  let result = arena.grow(1);
  assert!(matches!(
    result,
    Err(ArenaError::Exhausted {
      requested: 1,
      available: 0
    })
  ));
  assert_eq!(arena.len(), ps);
}

#[test]
fn test_word_round_trip() {
  let mut arena = Arena::new(page_size()).expect("reserve failed");
  arena.grow(64).expect("grow failed");

  arena.set_word(0, 0xDEAD_BEEF);
  arena.set_word(WORD, usize::MAX);
  assert_eq!(arena.word(0), 0xDEAD_BEEF);
  assert_eq!(arena.word(WORD), usize::MAX);
}

#[test]
fn test_bytes_and_copy_within() {
  let mut arena = Arena::new(page_size()).expect("reserve failed");
  arena.grow(64).expect("grow failed");

  arena.bytes_mut(0..4).copy_from_slice(b"abcd");
  arena.copy_within(0..4, 32);
  assert_eq!(arena.bytes(32..36), b"abcd");

  // Overlapping copy behaves like memmove.
  arena.copy_within(32..36, 34);
  assert_eq!(arena.bytes(34..38), b"abcd");
}

#[test]
#[should_panic(expected = "arena access out of bounds")]
fn test_access_past_len_panics() {
  let mut arena = Arena::new(page_size()).expect("reserve failed");
  arena.grow(16).expect("grow failed");
  arena.word(16);
}

#[test]
fn test_addresses_stable_across_growth() {
  let ps = page_size();
  let mut arena = Arena::new(ps * 16).expect("reserve failed");
  arena.grow(32).expect("grow failed");

  let base = arena.as_ptr();
  arena.set_word(0, 7);
  for _ in 0..15 {
    arena.grow(ps).expect("grow failed");
  }

  assert_eq!(arena.as_ptr(), base);
  assert_eq!(arena.word(0), 7);
}
