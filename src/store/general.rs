//! General side of a store: round regeneration, index costs, and concept
//! synthesis.

use crate::common::* ;
use crate::common::consts::cost::FREQ_EXPONENT ;
use crate::concept::Concept ;
use crate::cover::{ Pool, Subset, CostModel, Problem } ;

use super::ConceptStore ;

/// Number of attempts at perturbing the quality before giving up.
const PERTURBATION_TRIES: usize = 100 ;

/// Indices of zero quality.
fn zero_quality(quality: & [f64]) -> IdxSet {
  quality.iter().enumerate().filter(
    |& (_, q)| * q <= 0.0
  ).map(|(idx, _)| idx).collect()
}

impl ConceptStore {
  /// Rebuilds the general pool relative to the specialized pool.
  pub(super) fn rebuild_general(& mut self, carry_over: bool) {
    let quality = self.special_quality() ;
    self.unhandled = zero_quality(& quality) ;
    self.quality = quality ;

    let mut pool = Pool::new(
      self.conf.general_min, self.flavor.opposite_count(& self.fact),
      self.conf.indexed(), self.conf.enhanced()
    ) ;
    let old = self.general.take() ;
    if carry_over {
      if let Some(old) = old {
        for concept in old.concepts() {
          if ! self.is_useless(concept, & self.unhandled) {
            pool.insert( concept.clone(), self.general_subset(concept) ) ;
          }
        }
        if ! old.is_exhaustive() {
          pool.set_not_exhaustive()
        }
      }
    }
    self.general = Some(pool)
  }

  /// Quality of the last regeneration.
  #[inline]
  pub fn quality(& self) -> & [f64] { & self.quality }

  /// Cost of each target index for some quality.
  ///
  /// An index of positive quality `q` costs `1 / q`. An index of zero
  /// quality costs the sum of the other costs times the cost factor, or `1`
  /// if all qualities are zero.
  pub fn index_costs(& self, quality: & [f64]) -> Vec<f64> {
    let handled: f64 = quality.iter().filter(|q| ** q > 0.0).map(
      |q| 1.0 / q.powf(FREQ_EXPONENT)
    ).sum() ;
    let unhandled = if handled == 0.0 {
      1.0
    } else {
      handled * self.cost_factor
    } ;
    quality.iter().map(
      |q| if * q > 0.0 { 1.0 / q.powf(FREQ_EXPONENT) } else { unhandled }
    ).collect()
  }

  /// Some quality where zero qualities are raised to `1` with some
  /// probability.
  ///
  /// A perturbation raising all zero qualities is retried.
  fn perturbed_quality(
    & mut self, quality: Vec<f64>, probability: f64
  ) -> Vec<f64> {
    let probability = probability.min(1.0) ;
    if ! (probability > 0.0) {
      return quality
    }
    for _ in 0 .. PERTURBATION_TRIES {
      let mut perturbed = quality.clone() ;
      let (mut changed, mut unchanged) = (0, 0) ;
      for q in perturbed.iter_mut() {
        if * q <= 0.0 {
          if self.rng.gen_bool(probability) {
            * q = 1.0 ;
            changed += 1
          } else {
            unchanged += 1
          }
        }
      }
      if changed == 0 || unchanged > 0 {
        return perturbed
      }
    }
    quality
  }

  /// Synthesizes a specialized concept from the general pool.
  ///
  /// Also returns the variants of the result with one more sub-concept if
  /// `variants`.
  fn synth(
    & mut self, iters: usize, known: Option<& Concept>, perturbation: f64,
    variants: bool,
  ) -> Option< (Concept, Vec<Concept>) > {
    if self.general.is_none() {
      return None
    }
    // Concepts admitted since the last regeneration count.
    let quality = self.special_quality() ;
    let quality = self.perturbed_quality(quality, perturbation) ;
    let unhandled = zero_quality(& quality) ;

    let mut concepts = vec![] ;
    let mut subsets: Vec<Subset> = vec![] ;
    if let Some(general) = self.general.as_ref() {
      for (concept, subset) in general.iter() {
        if ! self.is_useless(concept, & unhandled) {
          concepts.push( concept.clone() ) ;
          subsets.push( subset.clone() )
        }
      }
    }
    let known: Option< Vec<usize> > = known.map(
      |known| known.sub_concepts().iter().map(
        |sub| if let Some(idx) = concepts.iter().position(|c| c == sub) {
          idx
        } else {
          concepts.push( sub.clone() ) ;
          subsets.push( self.general_subset(sub) ) ;
          concepts.len() - 1
        }
      ).collect()
    ) ;

    let model = CostModel::quotient( self.index_costs(& quality) ) ;
    let target = IdxSet::full( self.flavor.opposite_count(& self.fact) ) ;
    let problem = Problem::new(& subsets, target, & model)
      .limit(self.conf.max_literals)
      .optimize(false)
      .enhanced( self.conf.enhanced() ) ;
    let cover = problem.solve(
      iters, known.as_ref().map(|idxs| & idxs[..]), & mut self.rng
    ) ? ;

    let conj = self.flavor.synth_is_conj() ;
    let parts: Vec<Concept> = cover.iter().map(
      |idx| concepts[* idx].clone()
    ).collect() ;
    let concept = self.fact.combine( conj, parts.clone() ) ;
    if ! concept.is_meaningful() || ! self.flavor.is_special(& concept) {
      return None
    }

    let mut others = vec![] ;
    if variants {
      for (idx, extra) in concepts.iter().enumerate() {
        if cover.contains(& idx) {
          continue
        }
        let mut subs = parts.clone() ;
        subs.push( extra.clone() ) ;
        let variant = self.fact.combine(conj, subs) ;
        if variant.is_meaningful() {
          others.push(variant)
        }
      }
    }
    Some( (concept, others) )
  }

  /// Synthesizes a specialized concept from the general pool.
  ///
  /// Zero qualities are perturbed with probability `perturbation`. The
  /// sub-concepts of `known`, if any, seed the search. Returns `None` if
  /// the round has not started or the general pool cannot produce a
  /// meaningful specialized concept.
  pub fn synthesize(
    & mut self, iters: usize, known: Option<& Concept>, perturbation: f64
  ) -> Option<Concept> {
    self.synth(iters, known, perturbation, false).map(|(concept, _)| concept)
  }

  /// Synthesized concept and its variants with one more sub-concept.
  pub fn created_concepts(
    & mut self, iters: usize, perturbation: f64
  ) -> Vec<Concept> {
    match self.synth(iters, None, perturbation, true) {
      Some( (concept, mut others) ) => {
        others.insert(0, concept) ;
        others
      },
      None => vec![],
    }
  }
}


#[cfg(test)]
mod test {
  use crate::store::test::* ;

  #[test]
  fn costs() {
    let (fact, _) = sample() ;
    let mut store = store(& fact, Flavor::Correct, -1, -1) ;
    assert_eq!( store.index_costs(& [0.0, 0.0]), vec![1.0, 1.0] ) ;
    assert_eq!(
      store.index_costs(& [1.0, 2.0, 0.0]), vec![1.0, 0.5, 1.5]
    ) ;
    store.set_cost_factor(2.0) ;
    assert_eq!(
      store.index_costs(& [1.0, 2.0, 0.0]), vec![1.0, 0.5, 3.0]
    )
  }

  #[test]
  fn no_synthesis_before_the_round() {
    let (fact, preds) = sample() ;
    let mut store = store(& fact, Flavor::Correct, -1, -1) ;
    // General, dropped since there is no general pool yet.
    assert!( ! store.admit_pred( preds["g_1"].clone(), false ) ) ;
    assert_eq!( store.synthesize(3, None, 0.0), None ) ;
    assert!( ! store.all_general_contained() )
  }

  #[test]
  fn synthesis() {
    let (fact, preds) = sample() ;
    let mut store = store(& fact, Flavor::Correct, -1, -1) ;
    store.regenerate_general(false) ;
    assert!( store.all_general_contained() ) ;
    assert!( store.admit_pred( preds["g_1"].clone(), false ) ) ;
    assert!( store.admit_pred( preds["g_2"].clone(), false ) ) ;
    // Excludes no negative.
    assert!( ! store.admit_pred( preds["c"].clone(), false ) ) ;
    assert_eq!( store.general_count(), 2 ) ;

    let concept = store.synthesize(3, None, 0.0).unwrap() ;
    assert!( concept.is_correct() ) ;
    assert!( concept.is_conj() ) ;
    assert_eq!( concept.sub_count(), 2 ) ;
    assert_eq!( concept.pos().len(), 3 ) ;

    let created = store.created_concepts(3, 0.0) ;
    assert_eq!( created[0], concept ) ;
    for concept in & created {
      assert!( concept.is_correct() )
    }
  }

  #[test]
  fn regeneration_filters_useless_concepts() {
    let (fact, preds) = sample() ;
    let mut store = store(& fact, Flavor::Correct, -1, -1) ;
    store.regenerate_general(false) ;
    assert!( store.last_errors() ) ;
    store.admit_pred( preds["g_2"].clone(), false ) ;
    store.admit_pred( preds["g_3"].clone(), false ) ;
    assert_eq!( store.general_count(), 2 ) ;
    // Positives 0, 1, and 2 are handled, `g_3` only covers positive 2.
    store.admit_pred( preds["a"].clone(), false ) ;
    store.admit_pred( preds["b"].clone(), false ) ;
    store.regenerate_general(true) ;
    assert_eq!( store.general_concepts().len(), 1 ) ;
    assert!( store.last_errors() ) ;
    // Useless concepts are not admitted either.
    assert!( ! store.admit_pred( preds["g_3"].clone(), false ) )
  }

  #[test]
  fn complete_synthesis() {
    let (fact, preds) = sample() ;
    let mut store = store(& fact, Flavor::Complete, -1, -1) ;
    store.regenerate_general(false) ;
    // Correct for the correct flavor, general here.
    store.admit_pred( preds["a"].clone(), false ) ;
    store.admit_pred( preds["b"].clone(), false ) ;
    store.admit_pred( preds["e"].clone(), false ) ;
    let concept = store.synthesize(3, None, 0.0).unwrap() ;
    assert!( concept.is_complete() ) ;
    assert!( concept.is_disj() ) ;
    assert_eq!( concept.sub_count(), 3 )
  }
}
