//! Sets of example indices.
//!
//! Positive and negative examples are referred to by their index in their
//! class. Concepts, subsets and covers all manipulate sets of such indices,
//! [`IdxSet`][set] is a bit set for them.
//!
//! [set]: struct.IdxSet.html (IdxSet struct)

use std::fmt ;

/// Number of bits in a word.
const WORD: usize = 64 ;

/// A set of indices.
///
/// Never stores trailing empty words, so that structural equality and hashing
/// coincide with set equality.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdxSet {
  words: Vec<u64>,
}

impl IdxSet {
  /// Empty set.
  #[inline]
  pub fn new() -> Self {
    IdxSet { words: vec![] }
  }

  /// Set of all indices strictly lower than `n`.
  pub fn full(n: usize) -> Self {
    let mut words = vec![ ! 0u64 ; n / WORD ] ;
    if n % WORD != 0 {
      words.push( (1u64 << (n % WORD)) - 1 )
    }
    IdxSet { words }
  }

  /// Removes trailing empty words.
  #[inline]
  fn normalize(& mut self) {
    while self.words.last() == Some(& 0) {
      self.words.pop() ;
    }
  }

  /// Inserts an index, returns true if it was not there.
  pub fn insert(& mut self, idx: usize) -> bool {
    let (w, b) = (idx / WORD, idx % WORD) ;
    if w >= self.words.len() {
      self.words.resize(w + 1, 0)
    }
    let was_there = self.words[w] & (1 << b) != 0 ;
    self.words[w] |= 1 << b ;
    ! was_there
  }

  /// Removes an index, returns true if it was there.
  pub fn remove(& mut self, idx: usize) -> bool {
    let (w, b) = (idx / WORD, idx % WORD) ;
    if w >= self.words.len() {
      return false
    }
    let was_there = self.words[w] & (1 << b) != 0 ;
    self.words[w] &= ! (1 << b) ;
    self.normalize() ;
    was_there
  }

  /// Membership.
  #[inline]
  pub fn contains(& self, idx: usize) -> bool {
    let (w, b) = (idx / WORD, idx % WORD) ;
    w < self.words.len() && self.words[w] & (1 << b) != 0
  }

  /// Number of indices.
  pub fn len(& self) -> usize {
    self.words.iter().map(|w| w.count_ones() as usize).sum()
  }

  /// True if empty.
  #[inline]
  pub fn is_empty(& self) -> bool {
    self.words.is_empty()
  }

  /// Removes everything.
  #[inline]
  pub fn clear(& mut self) {
    self.words.clear()
  }

  /// Adds all the indices of `other`.
  pub fn union_with(& mut self, other: & Self) {
    if other.words.len() > self.words.len() {
      self.words.resize(other.words.len(), 0)
    }
    for (w, o) in self.words.iter_mut().zip( other.words.iter() ) {
      * w |= * o
    }
  }

  /// Only keeps the indices also in `other`.
  pub fn intersect_with(& mut self, other: & Self) {
    self.words.truncate( other.words.len() ) ;
    for (w, o) in self.words.iter_mut().zip( other.words.iter() ) {
      * w &= * o
    }
    self.normalize()
  }

  /// Removes the indices of `other`.
  pub fn difference_with(& mut self, other: & Self) {
    for (w, o) in self.words.iter_mut().zip( other.words.iter() ) {
      * w &= ! * o
    }
    self.normalize()
  }

  /// Union.
  pub fn union(& self, other: & Self) -> Self {
    let mut res = self.clone() ;
    res.union_with(other) ;
    res
  }

  /// Intersection.
  pub fn intersection(& self, other: & Self) -> Self {
    let mut res = self.clone() ;
    res.intersect_with(other) ;
    res
  }

  /// Difference.
  pub fn difference(& self, other: & Self) -> Self {
    let mut res = self.clone() ;
    res.difference_with(other) ;
    res
  }

  /// Size of the intersection, without building it.
  pub fn intersection_len(& self, other: & Self) -> usize {
    self.words.iter().zip( other.words.iter() ).map(
      |(w, o)| (w & o).count_ones() as usize
    ).sum()
  }

  /// True if the intersection is empty.
  pub fn is_disjoint(& self, other: & Self) -> bool {
    self.words.iter().zip( other.words.iter() ).all(
      |(w, o)| w & o == 0
    )
  }

  /// True if all the indices of `self` are in `other`.
  pub fn is_subset(& self, other: & Self) -> bool {
    self.words.len() <= other.words.len() && self.words.iter().zip(
      other.words.iter()
    ).all(
      |(w, o)| w & ! o == 0
    )
  }

  /// Iterator over the indices, in increasing order.
  pub fn iter(& self) -> Iter {
    Iter { words: & self.words, word: 0, current: self.words.first().cloned().unwrap_or(0) }
  }
}

impl fmt::Debug for IdxSet {
  fn fmt(& self, fmt: & mut fmt::Formatter) -> fmt::Result {
    fmt.debug_set().entries( self.iter() ).finish()
  }
}
impl fmt::Display for IdxSet {
  fn fmt(& self, fmt: & mut fmt::Formatter) -> fmt::Result {
    write!(fmt, "{{") ? ;
    for (count, idx) in self.iter().enumerate() {
      if count > 0 {
        write!(fmt, ",") ?
      }
      write!(fmt, " {}", idx) ?
    }
    write!(fmt, " }}")
  }
}

impl ::std::iter::FromIterator<usize> for IdxSet {
  fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
    let mut set = IdxSet::new() ;
    for idx in iter {
      set.insert(idx) ;
    }
    set
  }
}
impl Extend<usize> for IdxSet {
  fn extend<I: IntoIterator<Item = usize>>(& mut self, iter: I) {
    for idx in iter {
      self.insert(idx) ;
    }
  }
}
impl<'a> IntoIterator for & 'a IdxSet {
  type Item = usize ;
  type IntoIter = Iter<'a> ;
  fn into_iter(self) -> Iter<'a> { self.iter() }
}

/// Iterator over the indices of a set.
pub struct Iter<'a> {
  words: & 'a [u64],
  word: usize,
  current: u64,
}
impl<'a> Iterator for Iter<'a> {
  type Item = usize ;
  fn next(& mut self) -> Option<usize> {
    loop {
      if self.current != 0 {
        let bit = self.current.trailing_zeros() as usize ;
        self.current &= self.current - 1 ;
        return Some(self.word * WORD + bit)
      }
      self.word += 1 ;
      if self.word >= self.words.len() {
        return None
      }
      self.current = self.words[self.word]
    }
  }
}
