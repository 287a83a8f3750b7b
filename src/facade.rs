//! Orchestration of the search.
//!
//! A [`Facade`][facade] learns correct formulas (disjunctions of correct
//! concepts), complete formulas (conjunctions of complete concepts), or
//! both, over the examples of a [`Factory`][fact]. Its best formulas only
//! ever improve, whatever sequence of learning calls it goes through.
//!
//! Each flavor runs a fixed number of overall iterations. An overall
//! iteration
//!
//! - seeds a fresh store with a random part of the best formula so far,
//! - runs the outer loop, which admits the specialized predicates and then
//!   runs generation steps (middle and inner loops, possibly split into
//!   sub-problems) while they improve, raising the cost factor when stuck,
//! - tries to repair the remaining errors one example at a time,
//! - computes and optimizes a final formula.
//!
//! [facade]: struct.Facade.html (Facade struct)
//! [fact]: ../concept/struct.Factory.html (Factory struct)

use crate::common::* ;
use crate::concept::{ Concept, Fact, Gen } ;
use crate::store::{ ConceptStore, Flavor, StoreConf } ;
use crate::parallel::{ self, Executor, Sequential, Threaded, WorkUnit } ;
use crate::optim ;


/// Best formulas of both flavors.
#[derive(Clone)]
pub struct Bests {
  /// Best correct formula.
  pub correct: Concept,
  /// Best complete formula.
  pub complete: Concept,
}
impl Bests {
  /// Empty formulas.
  pub fn new(fact: & Fact) -> Self {
    Bests {
      correct: Flavor::Correct.empty_formula(fact),
      complete: Flavor::Complete.empty_formula(fact),
    }
  }

  /// Best formula of a flavor.
  pub fn get(& self, flavor: Flavor) -> & Concept {
    match flavor {
      Flavor::Correct => & self.correct,
      Flavor::Complete => & self.complete,
    }
  }

  /// Replaces the best formula of a flavor if `formula` is better.
  pub fn improve(& mut self, flavor: Flavor, formula: Concept) -> bool {
    let best = match flavor {
      Flavor::Correct => & mut self.correct,
      Flavor::Complete => & mut self.complete,
    } ;
    if formula.is_better(best) {
      * best = formula ;
      true
    } else {
      false
    }
  }
}


/// Efficiency of a concept: examples it handles right per unit of
/// complexity.
pub fn efficiency(concept: & Concept) -> f64 {
  quot(
    ( concept.pos().len() + concept.right_neg().len() ) as f64,
    concept.complexity()
  )
}

/// Most efficient concept, the first one on ties.
pub fn most_efficient<'a, I>(concepts: I) -> Option<Concept>
where I: IntoIterator<Item = & 'a Concept> {
  let mut best: Option<(& Concept, f64)> = None ;
  for concept in concepts {
    let eff = efficiency(concept) ;
    match best {
      Some( (_, best_eff) ) if best_eff >= eff => (),
      _ => best = Some( (concept, eff) ),
    }
  }
  best.map( |(concept, _)| concept.clone() )
}


/// Learns formulas.
pub struct Facade {
  fact: Fact,
  gens: Arc< Vec<Gen> >,
  conf: LearnConf,
  executor: Box<dyn Executor>,
  rng: Rand,
  bests: Bests,
  _profiler: Profiler,
}

impl Facade {
  /// Constructor.
  ///
  /// Sub-problems run in threads if there is more than one of them. Fails if
  /// the configuration is illegal.
  pub fn new(fact: Fact, gens: Vec<Gen>, lconf: LearnConf) -> Res<Self> {
    let executor: Box<dyn Executor> = if lconf.sub_problems > 1 {
      Box::new(Threaded)
    } else {
      Box::new(Sequential)
    } ;
    Self::with_executor(fact, gens, lconf, executor)
  }

  /// Constructor with a specific executor.
  pub fn with_executor(
    fact: Fact, gens: Vec<Gen>, lconf: LearnConf, executor: Box<dyn Executor>
  ) -> Res<Self> {
    lconf.check() ? ;
    let rng = mk_rng(lconf.seed, lconf.random) ;
    let bests = Bests::new(& fact) ;
    log_debug! {
      "facade: {} positive(s), {} negative(s), {} generator(s), {} executor",
      fact.pos_count(), fact.neg_count(), gens.len(), executor.description()
    }
    Ok(
      Facade {
        fact, gens: Arc::new(gens), conf: lconf, executor, rng, bests,
        _profiler: Profiler::new(),
      }
    )
  }

  /// Configuration.
  pub fn conf(& self) -> & LearnConf { & self.conf }
  /// Factory.
  pub fn factory(& self) -> & Fact { & self.fact }

  /// Best correct formula so far.
  pub fn best_correct(& self) -> & Concept { & self.bests.correct }
  /// Best complete formula so far.
  pub fn best_complete(& self) -> & Concept { & self.bests.complete }
  /// Best formula so far, the correct one on ties.
  pub fn best_formula(& self) -> & Concept {
    if self.bests.complete.is_better(& self.bests.correct) {
      & self.bests.complete
    } else {
      & self.bests.correct
    }
  }

  /// Learns correct formulas, returns the best one.
  pub fn learn_correct(& mut self) -> Res<Concept> {
    self.learn_flavor(Flavor::Correct)
  }
  /// Learns complete formulas, returns the best one.
  pub fn learn_complete(& mut self) -> Res<Concept> {
    self.learn_flavor(Flavor::Complete)
  }
  /// Learns the formulas of a target, returns the best formula overall.
  pub fn learn(& mut self, target: Target) -> Res<Concept> {
    if target.correct() {
      self.learn_correct() ? ;
    }
    if target.complete() {
      self.learn_complete() ? ;
    }
    Ok( self.best_formula().clone() )
  }

  /// Prints the profiling information, if asked.
  pub fn print_stats(self) {
    print_stats("search", self._profiler)
  }


  /// Random part of some concepts, strictly smaller if they are not empty.
  fn selection(& mut self, concepts: & [Concept]) -> Vec<Concept> {
    let mut selection = vec![] ;
    if concepts.is_empty() {
      return selection
    }
    loop {
      selection.clear() ;
      let prob: f64 = self.rng.gen() ;
      for concept in concepts {
        if self.rng.gen::<f64>() < prob {
          selection.push( concept.clone() )
        }
      }
      if selection.len() < concepts.len() {
        return selection
      }
    }
  }

  /// Overall loop of a flavor.
  fn learn_flavor(& mut self, flavor: Flavor) -> Res<Concept> {
    profile! { self tick flavor.label() }
    let mut bests = self.bests.clone() ;
    let mut cost_factor = self.conf.cost_factor_init ;
    let mut formula_complexity = self.conf.init_complexity ;

    for overall in 0 .. self.conf.overall_iters {
      log_info! {
        "{} formulas, overall iteration {}/{}",
        conf.emph( flavor.to_string() ), overall + 1, self.conf.overall_iters
      }

      let subs = bests.get(flavor).sub_concepts().to_vec() ;
      let seed = self.selection(& subs) ;
      let rng = sub_rng(& mut self.rng) ;
      let mut store = ConceptStore::new(
        flavor, self.fact.clone(), StoreConf::of_learn_conf(& self.conf),
        formula_complexity, cost_factor, rng,
      ) ;
      store.admit_all(seed) ;
      if overall > 0 {
        log_debug! {
          "  restarting from {} concept(s), {}",
          store.special_count(), store.stats()
        }
      }

      profile! { self tick flavor.label(), "outer" }
      let res = self.outer(& mut store, bests) ;
      profile! { self mark flavor.label(), "outer" }
      bests = res ? ;
      cost_factor = store.cost_factor() ;

      profile! { self tick flavor.label(), "repair" }
      let res = self.repair(& mut store, bests) ;
      profile! { self mark flavor.label(), "repair" }
      bests = res ? ;

      log_info! { "  final {} formula", flavor }
      let formula = store.best_formula(self.conf.final_scp_iters, None) ;
      bests.improve(flavor, formula) ;

      profile! { self tick flavor.label(), "optimization" }
      let candidates = optim::special_candidates(& store, & self.gens) ;
      let res = optim::optimize_final(
        & store, candidates, bests.get(flavor), & self.conf, & mut self.rng
      ) ;
      profile! { self mark flavor.label(), "optimization" }
      let optimized = res ? ;
      bests.improve(flavor, optimized) ;

      formula_complexity = bests.get(flavor).complexity() ;
      log_info! {
        "  best {} formula: {} error(s), complexity {}",
        flavor, bests.get(flavor).errors(), formula_complexity
      }
      // Keep what was learned so far if a later iteration fails.
      self.bests = bests.clone()
    }

    profile! { self mark flavor.label() }
    Ok( self.bests.get(flavor).clone() )
  }

  /// Outer loop.
  fn outer(& mut self, store: & mut ConceptStore, mut bests: Bests) -> Res<Bests> {
    let flavor = store.flavor() ;
    let mut budget = Budget::new(self.conf.outer_iters) ;
    let mut best: Option<Concept> = None ;
    let mut last: Option<Concept> = None ;
    let mut improved = true ;
    let mut improvable = true ;

    while budget.next(improved) {
      log_info! { "  outer iteration {}", budget.done() }

      let mut admitted = false ;
      if self.conf.special_min != 0 && (
        store.special_count() == 0 || ! store.all_special_contained()
      ) {
        for gen in self.gens.iter() {
          admitted = store.admit_special_preds(& ** gen) || admitted
        }
        log_debug! {
          "  specialized predicates admitted: {}, {}", admitted, store.stats()
        }
      }
      improved = admitted ;

      if improvable || admitted {
        let (new_bests, step_improvable) = self.step(
          store, bests, best.as_ref()
        ) ? ;
        bests = new_bests ;
        improvable = step_improvable ;
        improved = improved || improvable
      }

      let exhausted = budget.is_exhausted() ;
      if (
        improved && self.conf.outer_iters >= 0 && ! exhausted
      ) || (
        exhausted && last.is_none()
      ) {
        let formula = store.best_formula(self.conf.formula_scp_iters, None) ;
        improved = best.as_ref().map(
          |best| formula.is_better(best)
        ).unwrap_or(true) ;
        if improved {
          best = Some( formula.clone() )
        }
        log_info! {
          "  formula: {} error(s), complexity {}, improvement: {}",
          formula.errors(), formula.complexity(), improved
        }
        last = Some(formula) ;
        if let Some(best) = best.as_ref() {
          bests.improve( flavor, best.clone() ) ;
        }
      }

      if ! improved && ! flavor.target_errors( bests.get(flavor) ).is_empty() {
        let cost_factor = store.cost_factor() ;
        if cost_factor < self.conf.cost_factor_cap {
          let cost_factor = (
            cost_factor * self.conf.cost_factor_step
          ).min(self.conf.cost_factor_cap) ;
          log_info! { "  raising the cost factor to {}", cost_factor }
          profile! { self "cost factor escalations" => add 1 }
          store.set_cost_factor(cost_factor) ;
          improved = true ;
          improvable = true
        } else {
          log_info! { "  cost factor cannot be raised anymore" }
        }
      }
    }

    Ok(bests)
  }

  /// Generation step: middle and inner loops, split in sub-problems.
  ///
  /// Returns the updated bests and whether another step might improve.
  fn step(
    & mut self, store: & mut ConceptStore, mut bests: Bests,
    outer_best: Option<& Concept>,
  ) -> Res<(Bests, bool)> {
    if self.conf.general_min == 0 {
      log_debug! { "  no middle iteration" }
      return Ok( (bests, false) )
    }

    let count = self.conf.sub_problems ;
    let perturbation = if count == 1 { 0.0 } else { self.conf.perturbation } ;
    let mut units = Vec::with_capacity(count) ;
    for idx in 0 .. count {
      let store_rng = sub_rng(& mut self.rng) ;
      units.push(
        WorkUnit {
          idx,
          gens: self.gens.clone(),
          conf: self.conf.clone(),
          store: store.shallow_copy(store_rng),
          best_correct: bests.correct.clone(),
          best_complete: bests.complete.clone(),
          outer_best: outer_best.cloned(),
          perturbation,
          rng: sub_rng(& mut self.rng),
        }
      )
    }
    profile! { self "sub-problems" => add count }

    let partials = profile! {
      self wrap { self.executor.execute(units) } "step"
    } ? ;
    let merged = match parallel::merge(partials) {
      Some(merged) => merged,
      None => return Ok( (bests, false) ),
    } ;

    let new_concepts = merged.concepts.len() ;
    store.admit_all( merged.concepts.iter().cloned() ) ;
    profile! { self "concepts synthesized" => add new_concepts }
    bests.improve(store.flavor(), merged.formula) ;
    log_debug! {
      "  step: {} new concept(s), improvable: {}, {}",
      new_concepts, merged.improvable, store.stats()
    }
    Ok( (bests, merged.improvable) )
  }

  /// Tries to repair the errors of the best formula one example at a time.
  fn repair(& mut self, store: & mut ConceptStore, mut bests: Bests) -> Res<Bests> {
    let flavor = store.flavor() ;
    let errors = flavor.target_errors( bests.get(flavor) ).clone() ;
    if errors.is_empty() {
      return Ok(bests)
    }
    if self.example_concept(store, None)?.is_none() {
      return Ok(bests)
    }

    log_info! { "  repairing {} error(s)", errors.len() }
    for idx in errors.iter() {
      if ! flavor.target_errors( bests.get(flavor) ).contains(idx) {
        continue
      }
      if let Some(concept) = self.example_concept(store, Some(idx)) ? {
        log_debug! { "  example #{}: {}", idx, concept.get() }
        store.admit(concept) ;
        profile! { self "repair concepts" => add 1 }
        let formula = store.best_formula(self.conf.formula_scp_iters, None) ;
        bests.improve(flavor, formula) ;
      }
    }
    Ok(bests)
  }

  /// Synthesizes a specialized concept handling a target index, if any.
  ///
  /// The concept is built in a scratch store from the general predicates, or
  /// from the general concepts of `store` if it holds all of them.
  fn example_concept(
    & mut self, store: & ConceptStore, idx: Option<usize>
  ) -> Res< Option<Concept> > {
    let flavor = store.flavor() ;
    let (pos, neg) = match flavor {
      Flavor::Correct => (idx, None),
      Flavor::Complete => (None, idx),
    } ;
    let mut scratch = store.empty_copy(
      * store.conf(), store.formula_complexity(), sub_rng(& mut self.rng)
    ) ;
    scratch.admit_all( store.special_concepts() ) ;
    scratch.regenerate_general(true) ;

    if store.general_count() == 0 || ! store.all_general_contained() {
      for gen in self.gens.iter() {
        for (preds, inverted) in flavor.general_preds(& ** gen) {
          for pred in preds {
            scratch.admit_pred_for(pred, inverted, pos, neg) ;
          }
        }
      }
    } else {
      for concept in store.general_concepts() {
        scratch.admit_for(concept, pos, neg) ;
      }
    }

    let concept = match scratch.synthesize(
      self.conf.synth_scp_iters, None, 0.0
    ) {
      Some(concept) => concept,
      None => return Ok(None),
    } ;
    if self.conf.opt_special_min == 0 {
      return Ok( Some(concept) )
    }
    let candidates = optim::general_candidates(& scratch, & self.gens) ;
    optim::optimize_special(
      & scratch, candidates, & concept, & self.conf, & mut self.rng
    ).map(Some)
  }

  /// Most efficient specialized concept handling a target index.
  fn efficient(
    & mut self, flavor: Flavor, idx: Option<usize>
  ) -> Res< Option<Concept> > {
    let rng = sub_rng(& mut self.rng) ;
    let mut store = ConceptStore::new(
      flavor, self.fact.clone(), StoreConf::of_learn_conf(& self.conf),
      self.conf.init_complexity, self.conf.cost_factor_init, rng,
    ) ;

    // Synthesized concepts are meaningful, they handle some target index.
    if let Some(concept) = self.example_concept(& store, idx) ? {
      store.admit(concept) ;
    }

    let (pos, neg) = match flavor {
      Flavor::Correct => (idx, None),
      Flavor::Complete => (None, idx),
    } ;
    for gen in self.gens.iter() {
      for (preds, inverted) in flavor.special_preds(& ** gen) {
        for pred in preds {
          store.admit_pred_for(pred, inverted, pos, neg) ;
        }
      }
    }

    Ok( most_efficient( store.special_concepts().iter() ) )
  }

  /// Most efficient correct concept covering positive `pos`.
  pub fn efficient_correct_concept(
    & mut self, pos: Option<usize>
  ) -> Res< Option<Concept> > {
    self.efficient(Flavor::Correct, pos)
  }

  /// Most efficient complete concept excluding negative `neg`.
  pub fn efficient_complete_concept(
    & mut self, neg: Option<usize>
  ) -> Res< Option<Concept> > {
    self.efficient(Flavor::Complete, neg)
  }

  /// Most efficient of the correct concept covering `pos` and the complete
  /// concept excluding `neg`, the correct one on ties.
  pub fn efficient_concept(
    & mut self, pos: Option<usize>, neg: Option<usize>
  ) -> Res< Option<Concept> > {
    let correct = self.efficient_correct_concept(pos) ? ;
    let complete = self.efficient_complete_concept(neg) ? ;
    let eff = |concept: & Option<Concept>| concept.as_ref().map(
      efficiency
    ).unwrap_or(0.0) ;
    if eff(& correct) >= eff(& complete) {
      Ok(correct)
    } else {
      Ok(complete)
    }
  }
}


#[cfg(test)]
mod test {
  use super::* ;
  use crate::concept::{ PredList, Pred } ;
  use crate::store::test::{ halves, sample } ;

  fn facade(lconf: LearnConf) -> Facade {
    let (fact, preds) = sample() ;
    let mut list: Vec<Pred> = preds.values().cloned().collect() ;
    list.sort_by_key(|pred| pred.to_string()) ;
    let gens: Vec<Gen> = vec![ Arc::new( PredList::new(& * fact, list) ) ] ;
    Facade::new(fact, gens, lconf).unwrap()
  }

  #[test]
  fn illegal_configuration() {
    let (fact, _) = sample() ;
    let mut lconf = LearnConf::default() ;
    lconf.sub_problems = 0 ;
    match Facade::new(fact, vec![], lconf) {
      Err(e) => assert!( e.is_invalid_conf() ),
      Ok(_) => panic!("facade accepted zero sub-problems"),
    }
  }

  #[test]
  fn learning_both() {
    let mut facade = facade( LearnConf::default() ) ;
    let best = facade.learn(Target::Both).unwrap() ;
    let correct = facade.best_correct().clone() ;
    let complete = facade.best_complete().clone() ;
    assert!( correct.is_correct() && correct.is_disj() ) ;
    assert!( complete.is_complete() && complete.is_conj() ) ;
    // `a | b | e | !c` is correct and complete.
    assert_eq!( correct.errors(), 0 ) ;
    assert!( ! complete.is_better(& best) && ! correct.is_better(& best) )
  }

  #[test]
  fn bests_never_regress() {
    let mut lconf = LearnConf::default() ;
    lconf.overall_iters = 2 ;
    let mut facade = facade(lconf) ;
    let mut correct = facade.best_correct().clone() ;
    let mut complete = facade.best_complete().clone() ;
    for target in & [ Target::Complete, Target::Correct, Target::Both ] {
      facade.learn(* target).unwrap() ;
      assert!( ! correct.is_better( facade.best_correct() ) ) ;
      assert!( ! complete.is_better( facade.best_complete() ) ) ;
      correct = facade.best_correct().clone() ;
      complete = facade.best_complete().clone()
    }
  }

  #[test]
  fn restart_selection() {
    let mut facade = facade( LearnConf::default() ) ;
    let (fact, preds) = sample() ;
    let subs: Vec<Concept> = vec!["a", "b", "e"].into_iter().map(
      |name| fact.lit( preds[name].clone(), false )
    ).collect() ;
    for _ in 0 .. 20 {
      let selection = facade.selection(& subs) ;
      assert!( selection.len() < subs.len() ) ;
      for concept in & selection {
        assert!( subs.contains(concept) )
      }
    }
    assert!( facade.selection(& []).is_empty() )
  }

  #[test]
  fn one_step_synthesizes_several_concepts() {
    let (fact, preds) = halves() ;
    let gens: Vec<Gen> = vec![ Arc::new( PredList::new(& * fact, preds) ) ] ;
    let mut facade = Facade::new(
      fact.clone(), gens, LearnConf::default()
    ).unwrap() ;
    let mut store = ConceptStore::new(
      Flavor::Correct, fact.clone(),
      StoreConf::of_learn_conf(& LearnConf::default()), 0.0, 1.0,
      mk_rng(0, false),
    ) ;
    let (bests, _) = facade.step(& mut store, Bests::new(& fact), None).unwrap() ;
    assert!( store.special_count() >= 2 ) ;
    assert_eq!( bests.correct.errors(), 0 ) ;
    assert_eq!( bests.correct.sub_count(), 2 )
  }

  #[test]
  fn efficient_concepts() {
    let mut facade = facade( LearnConf::default() ) ;
    // Positive 2 is only covered by `b` among the correct literals.
    let correct = facade.efficient_correct_concept( Some(2) ).unwrap().unwrap() ;
    assert!( correct.is_correct() ) ;
    assert!( correct.pos().contains(2) ) ;

    let complete = facade.efficient_complete_concept( Some(0) ).unwrap() ;
    if let Some(complete) = complete {
      assert!( complete.is_complete() ) ;
      assert!( ! complete.neg().contains(0) )
    }

    let best = facade.efficient_concept( Some(0), Some(1) ).unwrap().unwrap() ;
    assert!( best.is_correct() || best.is_complete() )
  }
}
