//! Work units: one generation step, the middle and inner loops.

use crate::common::* ;
use crate::concept::{ Concept, ConceptSet, Gen } ;
use crate::store::{ ConceptStore, Flavor } ;
use crate::optim ;

use super::{ Partial, SharedConcepts } ;

/// A generation step, computable independently of other units.
pub struct WorkUnit {
  /// Index of the unit in its batch.
  pub idx: usize,
  /// Predicate generators.
  pub gens: Arc< Vec<Gen> >,
  /// Search settings.
  pub conf: LearnConf,
  /// Snapshot of the store of the outer loop.
  pub store: ConceptStore,
  /// Best correct formula so far.
  pub best_correct: Concept,
  /// Best complete formula so far.
  pub best_complete: Concept,
  /// Best formula of the outer loop, if any.
  pub outer_best: Option<Concept>,
  /// Probability of perturbing the synthesis.
  pub perturbation: f64,
  /// Random generator of the unit, the store has its own.
  pub rng: Rand,
}

impl WorkUnit {
  /// Flavor of the unit.
  pub fn flavor(& self) -> Flavor {
    self.store.flavor()
  }

  /// True if the best formula of the flavor is both correct and complete.
  fn is_perfect(& self) -> bool {
    let best = match self.flavor() {
      Flavor::Correct => & self.best_correct,
      Flavor::Complete => & self.best_complete,
    } ;
    best.is_correct() && best.is_complete()
  }

  /// Rebuilds the general pool for a middle iteration.
  ///
  /// General predicates are admitted again if the pool is empty or may
  /// lack concepts, or if the specialized pool reached (or lost) the
  /// ability to handle every target index since the last regeneration. In
  /// this last case the old general concepts are dropped.
  fn regenerate(& mut self) {
    let flipped = self.store.general_pool().is_some() && (
      self.store.last_errors() != (
        self.store.special_pool().uncovered_count() > 0
      )
    ) ;
    let stale = self.store.general_count() == 0 ||
      ! self.store.all_general_contained() || flipped ;
    self.store.regenerate_general(! flipped) ;
    if stale {
      let gens = self.gens.clone() ;
      let mut admitted = false ;
      for gen in gens.iter() {
        admitted = self.store.admit_general_preds(& ** gen) || admitted
      }
      log_debug! {
        "  general predicates admitted: {}, {}",
        admitted, self.store.stats()
      }
    }
  }

  /// Inner loop. Returns true if a new specialized concept was retained.
  fn inner(
    & mut self, shared: & SharedConcepts, poller: & mut super::Poller,
    created: & mut ConceptSet,
  ) -> Res<bool> {
    let mut budget = Budget::new(self.conf.inner_iters) ;
    let mut improved = true ;
    let mut some_improvement = false ;
    let harvest = self.conf.extra_concepts && self.is_perfect() ;

    while budget.next(improved) {
      improved = false ;
      for concept in poller.poll(shared) ? {
        self.store.admit(concept) ;
      }

      let mut found = if harvest {
        self.store.created_concepts(
          self.conf.synth_scp_iters, self.perturbation
        )
      } else {
        self.store.synthesize(
          self.conf.synth_scp_iters, None, self.perturbation
        ).into_iter().collect()
      } ;
      if found.is_empty() {
        log_debug! { "  no concept synthesized" }
        break
      }
      let synthesized = found.remove(0) ;

      let concept = if self.conf.opt_special_min != 0 {
        let candidates = optim::general_candidates(& self.store, & self.gens) ;
        optim::optimize_special(
          & self.store, candidates, & synthesized, & self.conf, & mut self.rng
        ) ?
      } else {
        synthesized
      } ;

      if self.store.admit( concept.clone() ) {
        log_debug! { "  new concept {}", concept.get() }
        shared.add( concept.clone() ) ? ;
        created.insert(concept) ;
        improved = true ;
        some_improvement = true
      }
      for extra in found {
        if self.store.admit( extra.clone() ) {
          shared.add( extra.clone() ) ? ;
          created.insert(extra) ;
        }
      }
    }

    Ok(some_improvement)
  }

  /// Runs the unit.
  pub fn compute(mut self, shared: & SharedConcepts) -> Res<Partial> {
    log_info! {
      "unit {}: {} step, perturbation {}",
      self.idx, self.flavor(), self.perturbation
    }
    let mut poller = shared.poller() ;
    let mut created = ConceptSet::new() ;
    let mut best = self.outer_best.clone() ;
    let mut budget = Budget::new(self.conf.middle_iters) ;
    let mut improved = true ;

    while budget.next(improved) {
      log_info! { "  middle iteration {}", budget.done() }
      self.regenerate() ;
      let new_concepts = self.inner(shared, & mut poller, & mut created) ? ;

      let formula = self.store.best_formula(
        self.conf.formula_scp_iters, best.as_ref()
      ) ;
      let better = best.as_ref().map(
        |best| formula.is_better(best)
      ).unwrap_or(true) ;
      if better {
        log_info! {
          "  formula: {} error(s), complexity {}",
          formula.errors(), formula.complexity()
        }
        best = Some(formula)
      }
      improved = new_concepts || better
    }

    let formula = match best {
      Some(formula) => formula,
      None => self.store.best_formula(self.conf.formula_scp_iters, None),
    } ;
    Ok( Partial::new(created, formula, improved) )
  }
}


#[cfg(test)]
mod test {
  use super::* ;
  use crate::concept::{ PredList, Pred } ;
  use crate::store::test::{ halves, sample, store } ;

  #[test]
  fn one_step() {
    let (fact, preds) = sample() ;
    let mut list: Vec<Pred> = preds.values().cloned().collect() ;
    list.sort_by_key(|pred| pred.to_string()) ;
    let gens: Vec<Gen> = vec![ Arc::new( PredList::new(& * fact, list) ) ] ;

    let unit = WorkUnit {
      idx: 0,
      gens: Arc::new(gens),
      conf: LearnConf::default(),
      store: store(& fact, Flavor::Correct, -1, -1),
      best_correct: fact.empty_disj(),
      best_complete: fact.empty_conj(),
      outer_best: None,
      perturbation: 0.0,
      rng: mk_rng(3, false),
    } ;
    let shared = SharedConcepts::new() ;
    let partial = unit.compute(& shared).unwrap() ;
    assert!( partial.formula.is_correct() ) ;
    assert_eq!( partial.concepts.len(), shared.len().unwrap() ) ;
    for concept in partial.concepts.iter() {
      assert!( concept.is_correct() )
    }
  }

  #[test]
  fn one_step_retains_several_concepts() {
    let (fact, preds) = halves() ;
    let gens: Vec<Gen> = vec![ Arc::new( PredList::new(& * fact, preds) ) ] ;

    let unit = WorkUnit {
      idx: 0,
      gens: Arc::new(gens),
      conf: LearnConf::default(),
      store: store(& fact, Flavor::Correct, -1, -1),
      best_correct: fact.empty_disj(),
      best_complete: fact.empty_conj(),
      outer_best: None,
      perturbation: 0.0,
      rng: mk_rng(5, false),
    } ;
    let shared = SharedConcepts::new() ;
    let partial = unit.compute(& shared).unwrap() ;
    // One middle iteration, both halves come from its inner loop.
    assert!( partial.concepts.len() >= 2 ) ;
    assert_eq!( partial.formula.errors(), 0 ) ;
    assert!( partial.improvable )
  }
}
