//! Optimization pass.
//!
//! Tries to replace each sub-concept of a concept or formula by a better
//! alternative. Candidates come either from the predicate generators
//! (`Left`), or from concepts already known (`Right`) when those are known
//! to be all the admissible ones.

use crate::common::* ;
use crate::concept::{ Concept, Gen } ;
use crate::store::ConceptStore ;

/// Source of candidates.
pub type Candidates<'a> = Either< & 'a [Gen], Vec<Concept> > ;

/// Candidates for general concepts: the general pool if it holds every
/// admitted general concept, the generators otherwise.
pub fn general_candidates<'a>(
  store: & ConceptStore, gens: & 'a [Gen]
) -> Candidates<'a> {
  if store.all_general_contained() {
    Either::Right( store.general_concepts() )
  } else {
    Either::Left(gens)
  }
}

/// Candidates for specialized concepts: the specialized pool if it holds
/// every admitted specialized concept, the generators otherwise.
pub fn special_candidates<'a>(
  store: & ConceptStore, gens: & 'a [Gen]
) -> Candidates<'a> {
  if store.all_special_contained() {
    Either::Right( store.special_concepts() )
  } else {
    Either::Left(gens)
  }
}

/// Concepts of some candidates.
///
/// Literals of the generators are built by `store`, from its specialized
/// predicates if `special` and its general ones otherwise. The concepts of
/// the corresponding pool of `store` come after them.
fn concepts_of(
  store: & ConceptStore, candidates: Candidates, special: bool
) -> Vec<Concept> {
  match candidates {
    Either::Right(concepts) => concepts,
    Either::Left(gens) => {
      let flavor = store.flavor() ;
      let mut concepts = vec![] ;
      for gen in gens {
        let lists = if special {
          flavor.special_preds(& ** gen)
        } else {
          flavor.general_preds(& ** gen)
        } ;
        for (preds, inverted) in lists {
          for pred in preds {
            if let Some(lit) = store.literal(pred, inverted) {
              concepts.push(lit)
            }
          }
        }
      }
      let pool = if special {
        store.special_concepts()
      } else {
        store.general_concepts()
      } ;
      for concept in pool {
        if ! concepts.contains(& concept) {
          concepts.push(concept)
        }
      }
      concepts
    },
  }
}


/// Optimizes the sub-concepts of a synthesized specialized concept.
///
/// Each sub-concept can be replaced by a general candidate that is simpler
/// or makes fewer errors, as long as it does not reintroduce the errors the
/// other sub-concepts leave. The result is never worse than `concept`.
pub fn optimize_special(
  store: & ConceptStore, candidates: Candidates, concept: & Concept,
  lconf: & LearnConf, rng: & mut Rand,
) -> Res<Concept> {
  if concept.is_lit() {
    return Ok( concept.clone() )
  }
  let fact = store.factory().clone() ;
  let mut scratch = store.empty_copy(
    store.conf().with_mins(lconf.opt_special_min, -1),
    store.formula_complexity(), sub_rng(rng)
  ) ;
  scratch.admit_all( store.special_concepts() ) ;
  scratch.regenerate_general(false) ;
  scratch.admit_all( concept.sub_concepts().iter().cloned() ) ;

  let candidates = concepts_of(store, candidates, false) ;
  for sub in concept.sub_concepts() {
    let reduced = fact.remove(concept, sub) ? ;
    for candidate in & candidates {
      scratch.admit_replacement(
        candidate.clone(), reduced.wrong_pos(), reduced.neg(),
        sub.complexity(), sub.wrong_pos().len(), sub.neg().len(),
      ) ;
    }
  }
  log_debug! {
    "  optimizing {} over {} general concepts",
    concept.get(), scratch.general_count()
  }

  match scratch.synthesize(lconf.opt_special_scp_iters, Some(concept), 0.0) {
    Some(optimized) => if optimized.is_better(concept) {
      log_debug! { "  -> {}", optimized.get() }
      Ok(optimized)
    } else {
      Ok( concept.clone() )
    },
    None => Ok( concept.clone() ),
  }
}


/// Optimizes a formula until it does not improve anymore.
///
/// Each pass admits, for each sub-concept, the specialized candidates that
/// repair the errors removing this sub-concept reintroduces. The result is
/// never worse than `formula`.
pub fn optimize_final(
  store: & ConceptStore, candidates: Candidates, formula: & Concept,
  lconf: & LearnConf, rng: & mut Rand,
) -> Res<Concept> {
  let fact = store.factory().clone() ;
  let candidates = concepts_of(store, candidates, true) ;
  let mut best = formula.clone() ;
  let mut pass = 0 ;

  while ! best.is_lit() && ! best.sub_concepts().is_empty() {
    pass += 1 ;
    let mut scratch = store.empty_copy(
      store.conf().with_mins(-1, lconf.opt_final_min),
      store.formula_complexity(), sub_rng(rng)
    ) ;
    scratch.admit_all( best.sub_concepts().iter().cloned() ) ;

    for sub in best.sub_concepts() {
      let reduced = fact.remove(& best, sub) ? ;
      let red_pos = reduced.wrong_pos().difference( best.wrong_pos() ) ;
      let red_neg = reduced.neg().difference( best.neg() ) ;
      for candidate in & candidates {
        scratch.admit_reduced( candidate.clone(), & red_pos, & red_neg ) ;
      }
    }

    let optimized = scratch.best_formula(lconf.opt_final_scp_iters, Some(& best)) ;
    if optimized.is_better(& best) {
      log_info! {
        "final optimization, pass {}: {} error(s), complexity {}",
        pass, optimized.errors(), optimized.complexity()
      }
      best = optimized
    } else {
      break
    }
  }

  Ok(best)
}


#[cfg(test)]
mod test {
  use super::* ;
  use crate::concept::{ PredList, Pred } ;
  use crate::store::test::{ halves, sample, store, Flavor, TablePred } ;

  fn set(idxs: & [usize]) -> IdxSet {
    idxs.iter().cloned().collect()
  }

  #[test]
  fn final_optimization() {
    let (fact, preds) = sample() ;
    // Correct, covers positives 0 and 1, expensive.
    let h = TablePred::new("h", 5.0, set(& [0, 1]), set(& [])).share() ;
    let mut list: Vec<Pred> = preds.values().cloned().collect() ;
    list.push( h.clone() ) ;
    list.sort_by_key(|pred| pred.to_string()) ;
    let gens: Vec<Gen> = vec![ Arc::new( PredList::new(& * fact, list) ) ] ;

    let formula = fact.disj(
      vec![
        fact.lit(h, false),
        fact.lit( preds["b"].clone(), false ),
        fact.lit( preds["e"].clone(), false ),
      ]
    ) ;
    assert_eq!( formula.errors(), 0 ) ;

    let store = store(& fact, Flavor::Correct, -1, -1) ;
    let lconf = LearnConf::default() ;
    let mut rng = mk_rng(consts::SEED, false) ;
    let optimized = optimize_final(
      & store, Either::Left(& gens), & formula, & lconf, & mut rng
    ).unwrap() ;
    assert!( optimized.is_better(& formula) ) ;
    assert_eq!( optimized.errors(), 0 ) ;

    let again = optimize_final(
      & store, Either::Left(& gens), & optimized, & lconf, & mut rng
    ).unwrap() ;
    assert!( ! optimized.is_better(& again) ) ;

    // Nothing to optimize in the empty formula.
    let empty = fact.empty_disj() ;
    let same = optimize_final(
      & store, Either::Right( vec![] ), & empty, & lconf, & mut rng
    ).unwrap() ;
    assert_eq!( same, empty )
  }

  #[test]
  fn final_optimization_uses_pool_concepts() {
    let (fact, mut preds) = halves() ;
    let (h, l, r) = ( preds[0].clone(), preds[1].clone(), preds[2].clone() ) ;
    // Correct, covers positives 2 and 3, expensive.
    let x = TablePred::new("x", 10.0, set(& [2, 3]), set(& [])).share() ;
    preds.push( x.clone() ) ;
    let gens: Vec<Gen> = vec![ Arc::new( PredList::new(& * fact, preds) ) ] ;

    let left = fact.conj( vec![ fact.lit(h.clone(), false), fact.lit(l, false) ] ) ;
    let right = fact.conj( vec![ fact.lit(h, false), fact.lit(r, false) ] ) ;
    let mut store = store(& fact, Flavor::Correct, -1, -1) ;
    assert!( store.admit( left.clone() ) ) ;
    assert!( store.admit( right.clone() ) ) ;

    let formula = fact.disj( vec![ left.clone(), fact.lit(x, false) ] ) ;
    assert_eq!( formula.errors(), 0 ) ;
    let lconf = LearnConf::default() ;
    let mut rng = mk_rng(consts::SEED, false) ;
    // `h & r` is no generator literal, only the specialized pool has it.
    let optimized = optimize_final(
      & store, Either::Left(& gens), & formula, & lconf, & mut rng
    ).unwrap() ;
    assert_eq!( optimized.errors(), 0 ) ;
    assert!( optimized.is_better(& formula) ) ;
    assert!( optimized.sub_concepts().contains(& right) )
  }

  #[test]
  fn sub_concept_optimization() {
    let (fact, preds) = sample() ;
    // Same examples as `g_1`, simpler.
    let k = TablePred::new("k", 0.5, set(& [0, 1, 2, 3]), set(& [0, 1])).share() ;
    let concept = fact.conj(
      vec![
        fact.lit( preds["g_1"].clone(), false ),
        fact.lit( preds["g_2"].clone(), false ),
      ]
    ) ;
    assert!( concept.is_correct() ) ;

    let store = store(& fact, Flavor::Correct, -1, -1) ;
    let lconf = LearnConf::default() ;
    let mut rng = mk_rng(consts::SEED, false) ;
    let candidates = vec![ fact.lit(k, false) ] ;
    let optimized = optimize_special(
      & store, Either::Right(candidates), & concept, & lconf, & mut rng
    ).unwrap() ;
    assert!( optimized.is_correct() ) ;
    assert!( optimized.complexity() < concept.complexity() ) ;
    assert_eq!( optimized.pos(), concept.pos() ) ;

    // Literals are left alone.
    let a = fact.lit( preds["a"].clone(), false ) ;
    let same = optimize_special(
      & store, Either::Right( vec![] ), & a, & lconf, & mut rng
    ).unwrap() ;
    assert_eq!( same, a )
  }
}
