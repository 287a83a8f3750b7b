//! Necessity tracking for a family of subsets.
//!
//! A subset is *necessary* if it is the only one covering some index. The
//! registry maintains, for each index, how many subsets cover it and, while
//! exactly one does, which one. The indices a subset covers alone form its
//! *exclusive* set, stored only while non-empty: being in the exclusive map
//! is what being necessary means.
//!
//! When an index goes back to being covered by a single subset, the registry
//! needs to find that subset. It first looks at the few most recently added
//! subsets, then falls back on either a full scan or, in the enhanced
//! variant, per-index sets of covering subsets.

use std::collections::VecDeque ;
use std::hash::Hash ;

use crate::common::* ;
use crate::common::consts::scp::RECENT_BUFFER ;

/// Necessity registry over subsets identified by keys of type `K`.
#[derive(Clone)]
pub struct SubsetRegistry<K: Clone + Eq + Hash> {
  /// Elements of the subsets tracked.
  subsets: HashMap<K, IdxSet>,
  /// Number of subsets covering each index.
  coverage: Vec<usize>,
  /// Subset covering each index, when there is exactly one.
  sole: Vec<Option<K>>,
  /// Non-empty exclusive sets of the necessary subsets.
  exclusive: HashMap<K, IdxSet>,
  /// Most recently added subsets, most recent last.
  recent: VecDeque<K>,
  /// Covering subsets for each index, enhanced variant only.
  covering: Option< Vec< HashSet<K> > >,
}

impl<K: Clone + Eq + Hash> SubsetRegistry<K> {
  /// Basic registry.
  pub fn new() -> Self {
    SubsetRegistry {
      subsets: HashMap::new(),
      coverage: vec![],
      sole: vec![],
      exclusive: HashMap::new(),
      recent: VecDeque::with_capacity(RECENT_BUFFER + 1),
      covering: None,
    }
  }

  /// Enhanced registry, keeps the covering subsets of each index.
  pub fn enhanced() -> Self {
    let mut slf = Self::new() ;
    slf.covering = Some( vec![] ) ;
    slf
  }

  /// Registry, enhanced if `enhanced`.
  pub fn of_kind(enhanced: bool) -> Self {
    if enhanced { Self::enhanced() } else { Self::new() }
  }

  /// True if enhanced.
  pub fn is_enhanced(& self) -> bool {
    self.covering.is_some()
  }

  /// Makes sure the per-index structures can handle `idx`.
  fn reserve(& mut self, idx: usize) {
    if idx >= self.coverage.len() {
      self.coverage.resize(idx + 1, 0) ;
      self.sole.resize(idx + 1, None) ;
      if let Some(covering) = self.covering.as_mut() {
        covering.resize(idx + 1, HashSet::new())
      }
    }
  }

  /// Removes an index from the exclusive set of a subset, evicting the set
  /// if it becomes empty.
  fn unclaim(& mut self, key: & K, idx: usize) {
    let now_empty = if let Some(excl) = self.exclusive.get_mut(key) {
      excl.remove(idx) ;
      excl.is_empty()
    } else { false } ;
    if now_empty {
      self.exclusive.remove(key) ;
    }
  }

  /// Adds an index to the exclusive set of a subset.
  fn claim(& mut self, key: K, idx: usize) {
    self.exclusive.entry( key.clone() ).or_insert_with(
      IdxSet::new
    ).insert(idx) ;
    self.sole[idx] = Some(key)
  }

  /// Finds the only subset covering `idx`.
  fn find_covering(& self, idx: usize) -> Option<K> {
    for key in self.recent.iter().rev() {
      if self.subsets.get(key).map(|s| s.contains(idx)).unwrap_or(false) {
        return Some( key.clone() )
      }
    }
    if let Some(covering) = self.covering.as_ref() {
      covering[idx].iter().next().cloned()
    } else {
      self.subsets.iter().find(
        |& (_, elems)| elems.contains(idx)
      ).map(|(key, _)| key.clone())
    }
  }

  /// Adds a subset. Returns false and does nothing if the key is already
  /// tracked.
  pub fn add(& mut self, key: K, elems: IdxSet) -> bool {
    if self.subsets.contains_key(& key) {
      return false
    }
    for idx in elems.iter() {
      self.reserve(idx) ;
      self.coverage[idx] += 1 ;
      if let Some(covering) = self.covering.as_mut() {
        covering[idx].insert( key.clone() ) ;
      }
      match self.coverage[idx] {
        1 => self.claim(key.clone(), idx),
        2 => if let Some(other) = self.sole[idx].take() {
          self.unclaim(& other, idx)
        },
        _ => (),
      }
    }
    self.subsets.insert(key.clone(), elems) ;
    self.recent.push_back(key) ;
    if self.recent.len() > RECENT_BUFFER {
      self.recent.pop_front() ;
    }
    true
  }

  /// Removes a subset, returns its elements. Does nothing if the key is not
  /// tracked.
  pub fn remove(& mut self, key: & K) -> Option<IdxSet> {
    let elems = self.subsets.remove(key) ? ;
    self.exclusive.remove(key) ;
    self.recent.retain(|k| k != key) ;
    for idx in elems.iter() {
      self.coverage[idx] -= 1 ;
      if let Some(covering) = self.covering.as_mut() {
        covering[idx].remove(key) ;
      }
      match self.coverage[idx] {
        0 => self.sole[idx] = None,
        1 => if let Some(other) = self.find_covering(idx) {
          self.claim(other, idx)
        },
        _ => (),
      }
    }
    Some(elems)
  }

  /// True if the key is tracked.
  #[inline]
  pub fn contains(& self, key: & K) -> bool {
    self.subsets.contains_key(key)
  }

  /// Elements of a tracked subset.
  #[inline]
  pub fn elems(& self, key: & K) -> Option<& IdxSet> {
    self.subsets.get(key)
  }

  /// Exclusive set of a subset, `None` if it is not necessary.
  #[inline]
  pub fn exclusive(& self, key: & K) -> Option<& IdxSet> {
    self.exclusive.get(key)
  }

  /// True if the subset is necessary.
  #[inline]
  pub fn is_necessary(& self, key: & K) -> bool {
    self.exclusive.contains_key(key)
  }

  /// Number of subsets covering an index.
  #[inline]
  pub fn coverage(& self, idx: usize) -> usize {
    self.coverage.get(idx).cloned().unwrap_or(0)
  }

  /// Indices covered by at least one subset.
  pub fn covered(& self) -> IdxSet {
    self.coverage.iter().enumerate().filter(
      |& (_, count)| * count > 0
    ).map(|(idx, _)| idx).collect()
  }

  /// Number of indices lower than `universe` no subset covers.
  pub fn uncovered_count(& self, universe: usize) -> usize {
    (0 .. universe).filter(|idx| self.coverage(* idx) == 0).count()
  }

  /// The necessary subsets.
  pub fn necessary_subsets(& self) -> Vec<K> {
    self.exclusive.keys().cloned().collect()
  }

  /// The subsets which are not necessary.
  pub fn non_necessary_subsets(& self) -> Vec<K> {
    self.subsets.keys().filter(
      |key| ! self.exclusive.contains_key(key)
    ).cloned().collect()
  }

  /// All the subsets.
  pub fn keys(& self) -> impl Iterator<Item = & K> {
    self.subsets.keys()
  }

  /// Currently necessary subsets that would stop being necessary if
  /// `candidate` was added.
  pub fn would_become_redundant(& self, candidate: & IdxSet) -> Vec<K> {
    self.exclusive.iter().filter(
      |& (_, excl)| excl.is_subset(candidate)
    ).map(|(key, _)| key.clone()).collect()
  }

  /// Number of indices of `set` it would contribute on its own.
  ///
  /// An index counts if it is in `uncovered`, or if it is not in `covered`
  /// and no tracked subset other than the one with elements `set` covers it.
  pub fn exclusive_coverage_count(
    & self, set: & IdxSet, covered: & IdxSet, uncovered: & IdxSet
  ) -> usize {
    let tracked = self.subsets.values().any(|elems| elems == set) ;
    set.iter().filter(
      |idx| uncovered.contains(* idx) || (
        ! covered.contains(* idx) && {
          let others = self.coverage(* idx) - if tracked { 1 } else { 0 } ;
          others == 0
        }
      )
    ).count()
  }

  /// Number of necessary subsets.
  #[inline]
  pub fn count_necessary(& self) -> usize {
    self.exclusive.len()
  }

  /// Number of subsets.
  #[inline]
  pub fn count_total(& self) -> usize {
    self.subsets.len()
  }

  /// True if there is no subset.
  #[inline]
  pub fn is_empty(& self) -> bool {
    self.subsets.is_empty()
  }

  /// Checks the internal invariants, for debugging and tests.
  ///
  /// Every index is either in exactly one exclusive set and covered once, or
  /// in none and covered zero or at least two times.
  pub fn check(& self) -> Res<()> {
    let mut coverage = vec![ 0 ; self.coverage.len() ] ;
    for elems in self.subsets.values() {
      for idx in elems.iter() {
        coverage[idx] += 1
      }
    }
    if coverage != self.coverage {
      bail!("inconsistent coverage counts")
    }
    let mut claimed = vec![ 0 ; self.coverage.len() ] ;
    for (key, excl) in & self.exclusive {
      if excl.is_empty() {
        bail!("empty exclusive set")
      }
      let elems = self.subsets.get(key).ok_or_else(
        || Error::from("exclusive set of an untracked subset")
      ) ? ;
      if ! excl.is_subset(elems) {
        bail!("exclusive set is not a subset of its subset")
      }
      for idx in excl.iter() {
        claimed[idx] += 1
      }
    }
    for (idx, count) in coverage.iter().enumerate() {
      let legal = match (* count, claimed[idx]) {
        (1, 1) => self.sole[idx].as_ref().map(
          |key| self.exclusive.get(key).map(
            |excl| excl.contains(idx)
          ).unwrap_or(false)
        ).unwrap_or(false),
        (count, 0) => count != 1 && self.sole[idx].is_none(),
        _ => false,
      } ;
      if ! legal {
        bail!(
          "index {} is covered {} times and claimed {} times",
          idx, count, claimed[idx]
        )
      }
    }
    Ok(())
  }
}

impl<K: Clone + Eq + Hash> Default for SubsetRegistry<K> {
  fn default() -> Self { Self::new() }
}
