//! Specialized side of a store: quality of the handling of the target
//! examples, and formula selection.

use crate::common::* ;
use crate::concept::Concept ;
use crate::cover::{ Subset, CostModel, Problem } ;

use super::ConceptStore ;

impl ConceptStore {
  /// Quality of the handling of each target index by the specialized pool.
  ///
  /// Each specialized concept adds `max / complexity` to the quality of the
  /// indices it handles, `max` being the highest complexity in the pool.
  pub fn special_quality(& self) -> Vec<f64> {
    let mut quality = vec![ 0.0 ; self.flavor.target_count(& self.fact) ] ;
    let max = self.special.concepts().map(
      |concept| concept.complexity()
    ).fold(0.0, f64::max) ;
    for (concept, subset) in self.special.iter() {
      let inc = quot( max, concept.complexity() ) ;
      for idx in subset.elems.iter() {
        if let Some(q) = quality.get_mut(idx) {
          * q += inc
        }
      }
    }
    quality
  }

  /// Subsets of the specialized pool, with the concepts of `known` added if
  /// not already there.
  ///
  /// Returns the concepts, their subsets, and the indices of the concepts
  /// of `known`.
  fn special_family(
    & self, known: Option<& Concept>
  ) -> (Vec<Concept>, Vec<Subset>, Option< Vec<usize> >) {
    let mut concepts = Vec::with_capacity( self.special.len() ) ;
    let mut subsets = Vec::with_capacity( self.special.len() ) ;
    for (concept, subset) in self.special.iter() {
      concepts.push( concept.clone() ) ;
      subsets.push( subset.clone() )
    }
    let known = known.map(
      |known| known.sub_concepts().iter().map(
        |sub| if let Some(idx) = concepts.iter().position(|c| c == sub) {
          idx
        } else {
          concepts.push( sub.clone() ) ;
          subsets.push( self.special_subset(sub) ) ;
          concepts.len() - 1
        }
      ).collect()
    ) ;
    (concepts, subsets, known)
  }

  /// Best formula over the specialized pool.
  ///
  /// Covers as much of the target as the specialized pool handles, with
  /// local optimizations. Never worse than `known`, if any.
  pub fn best_formula(
    & mut self, iters: usize, known: Option<& Concept>
  ) -> Concept {
    let (concepts, subsets, known_idxs) = self.special_family(known) ;
    let mut target = IdxSet::new() ;
    for subset in & subsets {
      target.union_with(& subset.elems)
    }

    let model = CostModel::Sum ;
    let problem = Problem::new(& subsets, target, & model)
      .optimize(true)
      .enhanced( self.conf.enhanced() ) ;

    let formula = match problem.solve(
      iters, known_idxs.as_ref().map(|idxs| & idxs[..]), & mut self.rng
    ) {
      Some(cover) => self.fact.combine(
        self.flavor.formula_is_conj(),
        cover.into_iter().map(|idx| concepts[idx].clone()).collect()
      ),
      None => self.flavor.empty_formula(& self.fact),
    } ;

    match known {
      Some(known) if ! formula.is_better(known) => known.clone(),
      _ => formula,
    }
  }
}


#[cfg(test)]
mod test {
  use crate::store::test::* ;

  #[test]
  fn quality() {
    let (fact, preds) = sample() ;
    let mut store = store(& fact, Flavor::Correct, -1, -1) ;
    // `a` covers positives 0 and 1, correct, complexity 1.
    assert!( store.admit_pred( preds["a"].clone(), false ) ) ;
    // `b` covers positive 2, correct, complexity 2.
    assert!( store.admit_pred( preds["b"].clone(), false ) ) ;
    let quality = store.special_quality() ;
    assert_eq!( quality, vec![2.0, 2.0, 1.0, 0.0] )
  }

  #[test]
  fn formula_covers_what_can_be() {
    let (fact, preds) = sample() ;
    let mut store = store(& fact, Flavor::Correct, -1, -1) ;
    let empty = store.best_formula(3, None) ;
    assert_eq!( empty, fact.empty_disj() ) ;

    store.admit_pred( preds["a"].clone(), false ) ;
    store.admit_pred( preds["b"].clone(), false ) ;
    let formula = store.best_formula(3, None) ;
    assert!( formula.is_correct() ) ;
    assert_eq!( formula.wrong_pos().len(), 1 ) ;
    assert_eq!( formula.sub_count(), 2 ) ;

    // Not worse than a known formula.
    let again = store.best_formula(3, Some(& formula)) ;
    assert!( ! formula.is_better(& again) )
  }

  #[test]
  fn complete_formulas_are_conjunctions() {
    let (fact, preds) = sample() ;
    let mut store = store(& fact, Flavor::Complete, -1, -1) ;
    // `!d` holds on all positives and excludes negative 0.
    assert!( store.admit_pred( preds["d"].clone(), true ) ) ;
    let formula = store.best_formula(3, None) ;
    assert!( formula.is_complete() ) ;
    assert!( formula.right_neg().contains(0) ) ;
    assert_eq!( formula.literal_count(), 1 )
  }
}
