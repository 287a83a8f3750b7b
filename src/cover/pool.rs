//! Bounded retention of concept subsets.
//!
//! A pool retains concepts along with their subsets. With a negative minimum
//! it retains everything. With a non-negative minimum `min` its capacity is
//!
//! ```text
//! max(min, round((necessary + uncovered) * FACTOR))
//! ```
//!
//! where `necessary` is the number of necessary subsets and `uncovered` the
//! number of elements no subset covers. Over capacity, the non-necessary
//! subset with the lowest utility per cost is evicted, utility being the sum
//! over its elements of `1 / coverage`. Once something was evicted the pool
//! is not *exhaustive* anymore: some admitted concepts are not in it.

use crate::common::* ;
use crate::common::consts::{ pool::FACTOR, cost::FREQ_EXPONENT } ;
use crate::concept::{ Concept, ConceptMap } ;
use crate::cover::{ Subset, SubsetRegistry } ;

/// Bounded pool of concept subsets.
#[derive(Clone)]
pub struct Pool {
  /// Minimum retention, negative for unbounded.
  min: isize,
  /// Number of elements.
  universe: usize,
  /// Subsets of the concepts retained.
  subsets: ConceptMap<Subset>,
  /// Concepts by elements and cost indices, if indexed.
  by_sets: Option< HashMap<(IdxSet, IdxSet), Concept> >,
  /// Necessity of the subsets.
  registry: SubsetRegistry<Concept>,
  /// False if something was evicted.
  exhaustive: bool,
}

impl Pool {
  /// Constructor.
  ///
  /// If `indexed`, equal subsets are detected with a map instead of a scan.
  pub fn new(min: isize, universe: usize, indexed: bool, enhanced: bool) -> Self {
    Pool {
      min, universe,
      subsets: ConceptMap::with_capacity(107),
      by_sets: if indexed { Some( HashMap::new() ) } else { None },
      registry: SubsetRegistry::of_kind(enhanced),
      exhaustive: true,
    }
  }

  /// Empty pool with the same settings.
  pub fn empty_copy(& self) -> Self {
    Pool::new(
      self.min, self.universe, self.by_sets.is_some(),
      self.registry.is_enhanced()
    )
  }

  /// Number of concepts retained.
  #[inline]
  pub fn len(& self) -> usize { self.subsets.len() }
  /// True if the pool is empty.
  #[inline]
  pub fn is_empty(& self) -> bool { self.subsets.is_empty() }
  /// True if the concept is retained.
  #[inline]
  pub fn contains(& self, concept: & Concept) -> bool {
    self.subsets.contains_key(concept)
  }
  /// True if no admitted concept was evicted.
  #[inline]
  pub fn is_exhaustive(& self) -> bool { self.exhaustive }
  /// Number of elements.
  #[inline]
  pub fn universe(& self) -> usize { self.universe }
  /// True if bounded.
  #[inline]
  pub fn is_bounded(& self) -> bool { self.min >= 0 }

  /// Subset of a concept.
  #[inline]
  pub fn subset(& self, concept: & Concept) -> Option<& Subset> {
    self.subsets.get(concept)
  }
  /// Concepts retained.
  pub fn concepts(& self) -> impl Iterator<Item = & Concept> {
    self.subsets.keys()
  }
  /// Concepts and subsets retained.
  pub fn iter(& self) -> impl Iterator<Item = (& Concept, & Subset)> {
    self.subsets.iter()
  }
  /// Necessity registry.
  #[inline]
  pub fn registry(& self) -> & SubsetRegistry<Concept> { & self.registry }

  /// Number of elements no subset covers.
  pub fn uncovered_count(& self) -> usize {
    self.registry.uncovered_count(self.universe)
  }

  /// Capacity, `None` if unbounded.
  pub fn capacity(& self) -> Option<usize> {
    if self.min < 0 {
      return None
    }
    let scaled = (
      (self.registry.count_necessary() + self.uncovered_count()) as f64
      * FACTOR
    ).round() as usize ;
    Some( ::std::cmp::max(self.min as usize, scaled) )
  }

  /// Retained concept with the same elements and cost indices.
  fn equal_subset(& self, subset: & Subset) -> Option<Concept> {
    if let Some(by_sets) = self.by_sets.as_ref() {
      by_sets.get(
        & ( subset.elems.clone(), subset.cost_idxs.clone() )
      ).cloned()
    } else {
      self.subsets.iter().find(
        |& (_, s)| s.elems == subset.elems && s.cost_idxs == subset.cost_idxs
      ).map(|(c, _)| c.clone())
    }
  }

  /// Inserts a concept. Returns true if it is retained.
  ///
  /// A concept whose subset is equal to a retained one is rejected, unless
  /// it is strictly cheaper in which case it replaces it.
  pub fn insert(& mut self, concept: Concept, subset: Subset) -> bool {
    if self.contains(& concept) {
      return false
    }
    if let Some(other) = self.equal_subset(& subset) {
      let other_cost = self.subsets.get(& other).map(
        |s| s.cost
      ).unwrap_or(::std::f64::INFINITY) ;
      if subset.cost >= other_cost {
        return false
      }
      self.remove(& other) ;
    }

    self.registry.add( concept.clone(), subset.elems.clone() ) ;
    if let Some(by_sets) = self.by_sets.as_mut() {
      by_sets.insert(
        ( subset.elems.clone(), subset.cost_idxs.clone() ), concept.clone()
      ) ;
    }
    self.subsets.insert( concept.clone(), subset ) ;

    let mut retained = true ;
    while let Some(capacity) = self.capacity() {
      if self.len() <= capacity {
        break
      }
      if let Some(worst) = self.worst() {
        if worst == concept {
          retained = false
        }
        self.remove(& worst) ;
        self.exhaustive = false
      } else {
        break
      }
    }
    retained
  }

  /// Non-necessary concept with the lowest utility per cost.
  fn worst(& self) -> Option<Concept> {
    let mut worst: Option<(& Concept, f64)> = None ;
    for (concept, subset) in self.subsets.iter() {
      if self.registry.is_necessary(concept) {
        continue
      }
      let utility: f64 = subset.elems.iter().map(
        |idx| 1.0 / (
          self.registry.coverage(idx) as f64
        ).powf(FREQ_EXPONENT)
      ).sum() ;
      let value = utility / subset.cost.max(::std::f64::MIN_POSITIVE) ;
      let is_worse = worst.map(|(_, v)| value < v).unwrap_or(true) ;
      if is_worse {
        worst = Some( (concept, value) )
      }
    }
    worst.map(|(concept, _)| concept.clone())
  }

  /// Removes a concept, returns its subset.
  pub fn remove(& mut self, concept: & Concept) -> Option<Subset> {
    let subset = self.subsets.remove(concept) ? ;
    self.registry.remove(concept) ;
    if let Some(by_sets) = self.by_sets.as_mut() {
      by_sets.remove(
        & ( subset.elems.clone(), subset.cost_idxs.clone() )
      ) ;
    }
    Some(subset)
  }

  /// Marks the pool as not exhaustive.
  pub fn set_not_exhaustive(& mut self) {
    self.exhaustive = false
  }
}


#[cfg(test)]
mod test {
  use super::* ;
  use crate::concept::{ Factory, TablePred } ;

  fn set(idxs: & [usize]) -> IdxSet {
    idxs.iter().cloned().collect()
  }

  fn concepts(count: usize) -> Vec<Concept> {
    let fact = Factory::of_counts(4, 4) ;
    (0 .. count).map(
      |i| fact.lit(
        TablePred::new(format!("p_{}", i), 1.0, set(& []), set(& [])).share(),
        false
      )
    ).collect()
  }

  #[test]
  fn unbounded() {
    let cs = concepts(3) ;
    let mut pool = Pool::new(-1, 4, true, false) ;
    assert!( pool.insert( cs[0].clone(), Subset::new(set(& [0, 1]), 1.0) ) ) ;
    assert!( ! pool.insert( cs[0].clone(), Subset::new(set(& [0, 1]), 1.0) ) ) ;
    assert!( pool.insert( cs[1].clone(), Subset::new(set(& [1]), 1.0) ) ) ;
    assert!( pool.insert( cs[2].clone(), Subset::new(set(& [2]), 1.0) ) ) ;
    assert_eq!( pool.len(), 3 ) ;
    assert!( pool.is_exhaustive() ) ;
    assert_eq!( pool.capacity(), None )
  }

  #[test]
  fn equal_subsets() {
    for indexed in vec![true, false] {
      let cs = concepts(3) ;
      let mut pool = Pool::new(-1, 4, indexed, false) ;
      assert!( pool.insert( cs[0].clone(), Subset::new(set(& [0, 1]), 2.0) ) ) ;
      // Same subset, not cheaper.
      assert!( ! pool.insert( cs[1].clone(), Subset::new(set(& [0, 1]), 2.0) ) ) ;
      // Same subset, cheaper.
      assert!( pool.insert( cs[2].clone(), Subset::new(set(& [0, 1]), 1.0) ) ) ;
      assert_eq!( pool.len(), 1 ) ;
      assert!( pool.contains(& cs[2]) && ! pool.contains(& cs[0]) ) ;
      pool.registry().check().unwrap()
    }
  }

  #[test]
  fn bounded_eviction() {
    let cs = concepts(3) ;
    // Capacity is max(1, round((necessary + uncovered) * 5)).
    let mut pool = Pool::new(1, 1, true, false) ;
    assert!( pool.insert( cs[0].clone(), Subset::new(set(& [0]), 1.0) ) ) ;
    assert_eq!( pool.capacity(), Some(5) ) ;
    // Nothing is necessary once two subsets cover element 0, the capacity
    // drops to the minimum and the more expensive subset goes.
    assert!(
      ! pool.insert(
        cs[1].clone(), Subset::with_cost_idxs(set(& [0]), set(& [1]), 2.0)
      )
    ) ;
    assert_eq!( pool.len(), 1 ) ;
    assert!( pool.contains(& cs[0]) ) ;
    assert!( ! pool.is_exhaustive() ) ;
    // A cheaper one replaces the retained one.
    assert!( pool.insert( cs[2].clone(), Subset::new(set(& [0]), 0.5) ) ) ;
    assert_eq!( pool.len(), 1 ) ;
    assert!( pool.contains(& cs[2]) ) ;
    pool.registry().check().unwrap()
  }
}
