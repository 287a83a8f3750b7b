//! Concept selection.
//!
//! A [`ConceptStore`][store] curates two pools of concepts for one
//! [`Flavor`][flavor]:
//!
//! - the *specialized* pool of correct (resp. complete) concepts, from which
//!   formulas are assembled ;
//! - the *general* pool of candidate concepts, combined by the greedy
//!   heuristic into new specialized concepts.
//!
//! The general pool is built for a *round*, relative to how well the
//! specialized pool handles each example at the time. It does not exist
//! until the first [`regenerate_general`][regen], and admitting a general
//! concept before that is a no-op.
//!
//! [store]: struct.ConceptStore.html (ConceptStore struct)
//! [flavor]: enum.Flavor.html (Flavor enum)
//! [regen]: struct.ConceptStore.html#method.regenerate_general
//! (regenerate_general function)

use std::fmt ;

use crate::common::* ;
use crate::concept::{ Concept, Fact, Pred, Preds, PredGen } ;
use crate::cover::{ Pool, Subset } ;

mod special ;
mod general ;


/// Orientation of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
  /// Builds disjunctions of correct concepts, each a conjunction of general
  /// concepts.
  Correct,
  /// Builds conjunctions of complete concepts, each a disjunction of general
  /// concepts.
  Complete,
}

impl Flavor {
  /// Both flavors.
  pub fn all() -> [Flavor ; 2] {
    [ Flavor::Correct, Flavor::Complete ]
  }

  /// Name of the flavor.
  pub fn label(self) -> & 'static str {
    match self {
      Flavor::Correct => "correct",
      Flavor::Complete => "complete",
    }
  }

  /// True for concepts of the specialized pool.
  pub fn is_special(self, concept: & Concept) -> bool {
    match self {
      Flavor::Correct => concept.is_correct(),
      Flavor::Complete => concept.is_complete(),
    }
  }

  /// Target indices a concept handles: the positives it covers (correct), or
  /// the negatives it excludes (complete).
  pub fn handled(self, concept: & Concept) -> & IdxSet {
    match self {
      Flavor::Correct => concept.pos(),
      Flavor::Complete => concept.right_neg(),
    }
  }
  /// Target indices a concept gets wrong.
  pub fn target_errors(self, concept: & Concept) -> & IdxSet {
    match self {
      Flavor::Correct => concept.wrong_pos(),
      Flavor::Complete => concept.neg(),
    }
  }
  /// Opposite indices a concept handles: the negatives it excludes
  /// (correct), or the positives it covers (complete).
  pub fn opposite_handled(self, concept: & Concept) -> & IdxSet {
    match self {
      Flavor::Correct => concept.right_neg(),
      Flavor::Complete => concept.pos(),
    }
  }
  /// Opposite indices a concept gets wrong.
  pub fn opposite_errors(self, concept: & Concept) -> & IdxSet {
    match self {
      Flavor::Correct => concept.neg(),
      Flavor::Complete => concept.wrong_pos(),
    }
  }

  /// Number of target indices.
  pub fn target_count(self, fact: & Fact) -> usize {
    match self {
      Flavor::Correct => fact.pos_count(),
      Flavor::Complete => fact.neg_count(),
    }
  }
  /// Number of opposite indices.
  pub fn opposite_count(self, fact: & Fact) -> usize {
    match self {
      Flavor::Correct => fact.neg_count(),
      Flavor::Complete => fact.pos_count(),
    }
  }

  /// True if formulas are conjunctions.
  pub fn formula_is_conj(self) -> bool {
    self == Flavor::Complete
  }
  /// True if synthesized concepts are conjunctions.
  pub fn synth_is_conj(self) -> bool {
    self == Flavor::Correct
  }

  /// Empty formula: holds on nothing (correct), or on everything
  /// (complete).
  pub fn empty_formula(self, fact: & Fact) -> Concept {
    fact.combine( self.formula_is_conj(), vec![] )
  }

  /// Predicates yielding specialized literals, with their inversion flag.
  pub fn special_preds<'a>(
    self, preds: & 'a dyn PredGen
  ) -> Vec< (Preds<'a>, bool) > {
    match self {
      Flavor::Correct => vec![
        (preds.correct_pos(), false), (preds.complete_neg(), true)
      ],
      Flavor::Complete => vec![
        (preds.complete_pos(), false), (preds.correct_neg(), true)
      ],
    }
  }

  /// Predicates yielding general literals, with their inversion flag.
  pub fn general_preds<'a>(
    self, preds: & 'a dyn PredGen
  ) -> Vec< (Preds<'a>, bool) > {
    match self {
      Flavor::Correct => vec![
        (preds.complete_pos(), false), (preds.correct_neg(), true),
        (preds.general_pos(), false), (preds.general_neg(), true),
      ],
      Flavor::Complete => vec![
        (preds.correct_pos(), false), (preds.complete_neg(), true),
        (preds.general_pos(), false), (preds.general_neg(), true),
      ],
    }
  }
}

impl fmt::Display for Flavor {
  fn fmt(& self, fmt: & mut fmt::Formatter) -> fmt::Result {
    write!(fmt, "{}", self.label())
  }
}


/// Settings of a store.
#[derive(Debug, Clone, Copy)]
pub struct StoreConf {
  /// Minimum retention of the general pool.
  pub general_min: isize,
  /// Minimum retention of the specialized pool.
  pub special_min: isize,
  /// Maximum number of literals of synthesized concepts, `0` for no limit.
  pub max_literals: usize,
  /// Memory efficiency level.
  pub mem_efficiency: usize,
  /// Uses boolean-value predicates inverted.
  pub neg_bool_preds: bool,
}
impl StoreConf {
  /// Settings of the main store of a search.
  pub fn of_learn_conf(lconf: & LearnConf) -> Self {
    StoreConf {
      general_min: lconf.general_min,
      special_min: lconf.special_min,
      max_literals: lconf.max_literals,
      mem_efficiency: lconf.mem_efficiency,
      neg_bool_preds: lconf.neg_bool_preds,
    }
  }
  /// Same settings with other pool minimums.
  pub fn with_mins(mut self, general_min: isize, special_min: isize) -> Self {
    self.general_min = general_min ;
    self.special_min = special_min ;
    self
  }
  /// True if pools index their subsets.
  fn indexed(& self) -> bool {
    self.mem_efficiency == 0
  }
  /// True if registries are enhanced.
  fn enhanced(& self) -> bool {
    self.mem_efficiency >= 2
  }
}


/// Concept selection.
#[derive(Clone)]
pub struct ConceptStore {
  flavor: Flavor,
  fact: Fact,
  conf: StoreConf,
  /// Specialized concepts.
  special: Pool,
  /// General concepts, only once the round started.
  general: Option<Pool>,
  /// Quality of the handling of each target index by the specialized pool,
  /// when the general pool was last built.
  quality: Vec<f64>,
  /// Target indices of zero quality.
  unhandled: IdxSet,
  /// Factor of the cost of unhandled indices.
  cost_factor: f64,
  /// False if the general pool may lack concepts admitted to earlier pools.
  general_possible: bool,
  /// True if the specialized pool left target indices uncovered when the
  /// general pool was last built.
  last_errors: bool,
  /// Estimated complexity of a whole formula.
  formula_complexity: f64,
  rng: Rand,
}

impl ConceptStore {
  /// Constructor.
  pub fn new(
    flavor: Flavor, fact: Fact, store_conf: StoreConf,
    formula_complexity: f64, cost_factor: f64, rng: Rand,
  ) -> Self {
    let special = Pool::new(
      store_conf.special_min, flavor.target_count(& fact),
      store_conf.indexed(), store_conf.enhanced()
    ) ;
    ConceptStore {
      flavor, fact, conf: store_conf, special, general: None,
      quality: vec![], unhandled: IdxSet::new(),
      cost_factor, general_possible: false, last_errors: true,
      formula_complexity, rng,
    }
  }

  /// Copy sharing the concepts, with its own random generator.
  pub fn shallow_copy(& self, rng: Rand) -> Self {
    let mut copy = self.clone() ;
    copy.rng = rng ;
    copy
  }

  /// Empty store with the same flavor and cost factor, and other settings.
  pub fn empty_copy(
    & self, store_conf: StoreConf, formula_complexity: f64, rng: Rand
  ) -> Self {
    ConceptStore::new(
      self.flavor, self.fact.clone(), store_conf,
      formula_complexity, self.cost_factor, rng
    )
  }

  /// Estimated complexity of a whole formula.
  #[inline]
  pub fn formula_complexity(& self) -> f64 { self.formula_complexity }

  /// Flavor.
  #[inline]
  pub fn flavor(& self) -> Flavor { self.flavor }
  /// Factory.
  #[inline]
  pub fn factory(& self) -> & Fact { & self.fact }
  /// Settings.
  #[inline]
  pub fn conf(& self) -> & StoreConf { & self.conf }
  /// Cost factor.
  #[inline]
  pub fn cost_factor(& self) -> f64 { self.cost_factor }
  /// Random generator.
  #[inline]
  pub fn rng(& mut self) -> & mut Rand { & mut self.rng }

  /// Specialized pool.
  #[inline]
  pub fn special_pool(& self) -> & Pool { & self.special }
  /// General pool, if the round started.
  #[inline]
  pub fn general_pool(& self) -> Option<& Pool> { self.general.as_ref() }

  /// Specialized concepts.
  pub fn special_concepts(& self) -> Vec<Concept> {
    self.special.concepts().cloned().collect()
  }
  /// General concepts.
  pub fn general_concepts(& self) -> Vec<Concept> {
    self.general.as_ref().map(
      |pool| pool.concepts().cloned().collect()
    ).unwrap_or_else(Vec::new)
  }
  /// Number of specialized concepts.
  #[inline]
  pub fn special_count(& self) -> usize { self.special.len() }
  /// Number of general concepts.
  #[inline]
  pub fn general_count(& self) -> usize {
    self.general.as_ref().map(|pool| pool.len()).unwrap_or(0)
  }
  /// True if the concept is in one of the pools.
  pub fn contains(& self, concept: & Concept) -> bool {
    self.special.contains(concept) || self.general.as_ref().map(
      |pool| pool.contains(concept)
    ).unwrap_or(false)
  }

  /// True if the specialized pool holds every specialized concept admitted.
  pub fn all_special_contained(& self) -> bool {
    self.special.is_exhaustive()
  }
  /// True if the general pool holds every general concept admitted since
  /// the last regeneration.
  pub fn all_general_contained(& self) -> bool {
    self.general_possible && self.general.as_ref().map(
      |pool| pool.is_exhaustive()
    ).unwrap_or(false)
  }
  /// True if the specialized pool left target indices uncovered when the
  /// general pool was last built.
  #[inline]
  pub fn last_errors(& self) -> bool { self.last_errors }

  /// Specialized subset of a concept.
  fn special_subset(& self, concept: & Concept) -> Subset {
    let mut cost = concept.complexity() ;
    let max = self.conf.max_literals ;
    if max > 0 && concept.sub_count() > max {
      cost += self.formula_complexity * (concept.sub_count() - max) as f64
    }
    Subset::new( self.flavor.handled(concept).clone(), cost )
  }

  /// General subset of a concept.
  fn general_subset(& self, concept: & Concept) -> Subset {
    Subset::with_cost_idxs(
      self.flavor.opposite_handled(concept).clone(),
      self.flavor.target_errors(concept).clone(),
      concept.complexity(),
    )
  }

  /// True if a general concept handles none of the unhandled target
  /// indices, when there are some.
  fn is_useless(& self, concept: & Concept, unhandled: & IdxSet) -> bool {
    ! unhandled.is_empty() && self.flavor.handled(concept).is_disjoint(unhandled)
  }

  /// Admits a concept.
  ///
  /// Meaningful specialized concepts go to the specialized pool, other
  /// meaningful concepts to the general pool if it exists and they are not
  /// useless. Returns true if the concept was retained.
  pub fn admit(& mut self, concept: Concept) -> bool {
    if ! concept.is_meaningful() {
      return false
    }
    if self.flavor.is_special(& concept) {
      let subset = self.special_subset(& concept) ;
      self.special.insert(concept, subset)
    } else if self.general.is_some() {
      if self.is_useless(& concept, & self.unhandled) {
        return false
      }
      let subset = self.general_subset(& concept) ;
      if let Some(general) = self.general.as_mut() {
        general.insert(concept, subset)
      } else { false }
    } else {
      false
    }
  }

  /// Admits some concepts, returns true if at least one was retained.
  pub fn admit_all<I>(& mut self, concepts: I) -> bool
  where I: IntoIterator<Item = Concept> {
    let mut admitted = false ;
    for concept in concepts {
      admitted = self.admit(concept) || admitted
    }
    admitted
  }

  /// Literal of a predicate, `None` for an inverted boolean-value
  /// predicate unless configured otherwise.
  pub fn literal(& self, pred: Pred, inverted: bool) -> Option<Concept> {
    if inverted && pred.is_bool_value() && ! self.conf.neg_bool_preds {
      None
    } else {
      Some( self.fact.lit(pred, inverted) )
    }
  }

  /// Admits a predicate as a literal.
  pub fn admit_pred(& mut self, pred: Pred, inverted: bool) -> bool {
    match self.literal(pred, inverted) {
      Some(lit) => self.admit(lit),
      None => false,
    }
  }

  /// Admits a predicate as a literal, see [`admit_for`][for].
  ///
  /// [for]: #method.admit_for (admit_for function)
  pub fn admit_pred_for(
    & mut self, pred: Pred, inverted: bool,
    pos: Option<usize>, neg: Option<usize>,
  ) -> bool {
    match self.literal(pred, inverted) {
      Some(lit) => self.admit_for(lit, pos, neg),
      None => false,
    }
  }

  /// Admits some predicates as literals.
  pub fn admit_preds(& mut self, preds: Preds, inverted: bool) -> bool {
    let mut admitted = false ;
    for pred in preds {
      admitted = self.admit_pred(pred, inverted) || admitted
    }
    admitted
  }

  /// Admits the predicates yielding specialized literals.
  pub fn admit_special_preds(& mut self, preds: & dyn PredGen) -> bool {
    let mut admitted = false ;
    for (preds, inverted) in self.flavor.special_preds(preds) {
      admitted = self.admit_preds(preds, inverted) || admitted
    }
    admitted
  }

  /// Admits the predicates yielding general literals.
  pub fn admit_general_preds(& mut self, preds: & dyn PredGen) -> bool {
    let mut admitted = false ;
    for (preds, inverted) in self.flavor.general_preds(preds) {
      admitted = self.admit_preds(preds, inverted) || admitted
    }
    admitted
  }

  /// Admits a concept if it covers positive `pos` and does not cover
  /// negative `neg`, for those given.
  pub fn admit_for(
    & mut self, concept: Concept, pos: Option<usize>, neg: Option<usize>
  ) -> bool {
    let pos_ok = pos.map(|pos| concept.pos().contains(pos)).unwrap_or(true) ;
    let neg_ok = neg.map(|neg| ! concept.neg().contains(neg)).unwrap_or(true) ;
    pos_ok && neg_ok && self.admit(concept)
  }

  /// Admits a specialized concept if it repairs the errors some formula
  /// reintroduces: it covers all of `red_pos` (correct), or excludes all of
  /// `red_neg` (complete).
  pub fn admit_reduced(
    & mut self, concept: Concept, red_pos: & IdxSet, red_neg: & IdxSet
  ) -> bool {
    let legal = match self.flavor {
      Flavor::Correct => concept.is_correct() &&
        concept.wrong_pos().is_disjoint(red_pos),
      Flavor::Complete => concept.is_complete() &&
        concept.neg().is_disjoint(red_neg),
    } ;
    legal && self.admit(concept)
  }

  /// Admits a candidate replacement for a sub-concept of a synthesized
  /// concept.
  ///
  /// The candidate must not reintroduce the opposite errors of the reduced
  /// concept, and be less complex or make fewer target errors than the
  /// sub-concept it replaces.
  pub fn admit_replacement(
    & mut self, concept: Concept, red_pos: & IdxSet, red_neg: & IdxSet,
    complexity: f64, pos_errors: usize, neg_errors: usize,
  ) -> bool {
    let legal = match self.flavor {
      Flavor::Correct => (
        concept.complexity() < complexity ||
        concept.wrong_pos().len() < pos_errors
      ) && concept.neg().is_disjoint(red_neg),
      Flavor::Complete => (
        concept.complexity() < complexity ||
        concept.neg().len() < neg_errors
      ) && concept.wrong_pos().is_disjoint(red_pos),
    } ;
    legal && self.admit(concept)
  }

  /// Sets the cost factor and rebuilds the general pool with its concepts,
  /// if there is one.
  pub fn set_cost_factor(& mut self, cost_factor: f64) {
    self.cost_factor = cost_factor ;
    let exhaustive = match self.general.as_ref() {
      Some(general) => general.is_exhaustive(),
      // No round yet.
      None => return,
    } ;
    self.general_possible = self.general_possible && exhaustive ;
    self.rebuild_general(true)
  }

  /// Starts a new round: rebuilds the general pool relative to the current
  /// specialized pool, carrying the current general concepts over if asked.
  pub fn regenerate_general(& mut self, carry_over: bool) {
    self.general_possible = true ;
    self.last_errors = self.special.uncovered_count() > 0 ;
    self.rebuild_general(carry_over)
  }

  /// One-line statistics.
  pub fn stats(& self) -> String {
    format!(
      "{} store: {} specialized ({}), {} general ({}), cost factor {}",
      self.flavor,
      self.special.len(),
      if self.special.is_exhaustive() { "exhaustive" } else { "bounded" },
      self.general_count(),
      match self.general.as_ref() {
        None => "none",
        Some(pool) if pool.is_exhaustive() => "exhaustive",
        Some(_) => "bounded",
      },
      self.cost_factor,
    )
  }
}
