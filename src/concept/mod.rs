//! Concepts: literals, conjunctions and disjunctions.
//!
//! Concepts are hash consed by a [`Factory`][fact] attached to a dataset.
//! Two structurally equal concepts (same predicate and inversion, or same
//! kind and same sub-concepts) are the same [`Concept`][conc], so equality
//! and hashing are constant time and concepts are freely shared across pools
//! and threads. A concept is never mutated, removing a sub-concept from a
//! formula yields a new concept.
//!
//! Each concept knows on which examples it holds. A concept *covers* a
//! positive example if it holds on it, it *excludes* a negative example if it
//! does not hold on it.
//!
//! [fact]: struct.Factory.html (Factory struct)
//! [conc]: type.Concept.html (Concept type)

use std::fmt ;
use std::hash::{ Hash, Hasher } ;

use hashconsing::{ HConsed, HConsign } ;

use crate::common::* ;
use crate::common::consts::concept as consts ;

pub mod pred ;

pub use self::pred::{
  Class, Dataset, Predicate, Pred, Preds, PredGen, Gen, TablePred, PredList,
} ;

/// Hash consed concept.
pub type Concept = HConsed<RConcept> ;
/// Set of concepts.
pub type ConceptSet = HConSet<Concept> ;
/// Map from concepts to something.
pub type ConceptMap<T> = HConMap<Concept, T> ;


/// Kind of a concept.
#[derive(Clone)]
pub enum Kind {
  /// Possibly inverted predicate.
  Lit {
    /// Predicate.
    pred: Pred,
    /// Description of the predicate, identifies it.
    desc: String,
    /// Inversion flag.
    inverted: bool,
  },
  /// Conjunction, sub-concepts sorted by uid.
  Conj(Vec<Concept>),
  /// Disjunction, sub-concepts sorted by uid.
  Disj(Vec<Concept>),
}


/// Concept, not hash consed.
#[derive(Clone)]
pub struct RConcept {
  kind: Kind,
  /// Positives it holds on.
  pos: IdxSet,
  /// Negatives it holds on.
  neg: IdxSet,
  /// Positives it does not hold on.
  wrong_pos: IdxSet,
  /// Negatives it does not hold on.
  right_neg: IdxSet,
  /// Number of positives.
  pos_total: usize,
  /// Number of negatives.
  neg_total: usize,
  complexity: f64,
  /// Number of literals, recursively.
  lits: usize,
}

impl PartialEq for RConcept {
  fn eq(& self, other: & Self) -> bool {
    match (& self.kind, & other.kind) {
      (
        Kind::Lit { desc: d_1, inverted: i_1, .. },
        Kind::Lit { desc: d_2, inverted: i_2, .. },
      ) => i_1 == i_2 && d_1 == d_2,
      (Kind::Conj(s_1), Kind::Conj(s_2)) |
      (Kind::Disj(s_1), Kind::Disj(s_2)) => s_1 == s_2,
      _ => false,
    }
  }
}
impl Eq for RConcept {}
impl Hash for RConcept {
  fn hash<H: Hasher>(& self, state: & mut H) {
    match self.kind {
      Kind::Lit { ref desc, inverted, .. } => {
        0u8.hash(state) ;
        desc.hash(state) ;
        inverted.hash(state)
      },
      Kind::Conj(ref subs) => {
        1u8.hash(state) ;
        for sub in subs {
          sub.uid().hash(state)
        }
      },
      Kind::Disj(ref subs) => {
        2u8.hash(state) ;
        for sub in subs {
          sub.uid().hash(state)
        }
      },
    }
  }
}

impl RConcept {
  /// Kind of the concept.
  #[inline]
  pub fn kind(& self) -> & Kind { & self.kind }

  /// Positives the concept holds on (true positives).
  #[inline]
  pub fn pos(& self) -> & IdxSet { & self.pos }
  /// Negatives the concept holds on (false positives).
  #[inline]
  pub fn neg(& self) -> & IdxSet { & self.neg }
  /// Positives the concept does not hold on (false negatives).
  #[inline]
  pub fn wrong_pos(& self) -> & IdxSet { & self.wrong_pos }
  /// Negatives the concept does not hold on (true negatives).
  #[inline]
  pub fn right_neg(& self) -> & IdxSet { & self.right_neg }

  /// Number of positive examples of the dataset.
  #[inline]
  pub fn pos_total(& self) -> usize { self.pos_total }
  /// Number of negative examples of the dataset.
  #[inline]
  pub fn neg_total(& self) -> usize { self.neg_total }

  /// Number of misclassified examples.
  #[inline]
  pub fn errors(& self) -> usize {
    self.wrong_pos.len() + self.neg.len()
  }
  /// Number of correctly classified examples.
  #[inline]
  pub fn rights(& self) -> usize {
    self.pos.len() + self.right_neg.len()
  }

  /// Complexity.
  #[inline]
  pub fn complexity(& self) -> f64 { self.complexity }

  /// Number of literals, recursively.
  #[inline]
  pub fn literal_count(& self) -> usize { self.lits }

  /// Direct sub-concepts, empty for a literal.
  pub fn sub_concepts(& self) -> & [Concept] {
    match self.kind {
      Kind::Lit { .. } => & [],
      Kind::Conj(ref subs) | Kind::Disj(ref subs) => subs,
    }
  }
  /// Number of direct sub-concepts, one for a literal.
  pub fn sub_count(& self) -> usize {
    match self.kind {
      Kind::Lit { .. } => 1,
      Kind::Conj(ref subs) | Kind::Disj(ref subs) => subs.len(),
    }
  }

  /// True if the concept is a literal.
  pub fn is_lit(& self) -> bool {
    match self.kind { Kind::Lit { .. } => true, _ => false }
  }
  /// True if the concept is a conjunction.
  pub fn is_conj(& self) -> bool {
    match self.kind { Kind::Conj(_) => true, _ => false }
  }
  /// True if the concept is a disjunction.
  pub fn is_disj(& self) -> bool {
    match self.kind { Kind::Disj(_) => true, _ => false }
  }

  /// True if the concept holds on no negative example.
  #[inline]
  pub fn is_correct(& self) -> bool { self.neg.is_empty() }
  /// True if the concept holds on all positive examples.
  #[inline]
  pub fn is_complete(& self) -> bool { self.wrong_pos.is_empty() }

  /// True if the concept covers a positive and excludes a negative, when
  /// there are such examples.
  pub fn is_meaningful(& self) -> bool {
    (self.pos_total == 0 || ! self.pos.is_empty()) &&
    (self.neg_total == 0 || ! self.right_neg.is_empty())
  }

  /// Fewer errors, or as many errors and a lower complexity.
  pub fn is_better(& self, other: & Self) -> bool {
    let (e_1, e_2) = (self.errors(), other.errors()) ;
    e_1 < e_2 || (e_1 == e_2 && self.complexity < other.complexity)
  }
  /// Same errors and same complexity.
  pub fn is_equally_good(& self, other: & Self) -> bool {
    self.errors() == other.errors() && self.complexity == other.complexity
  }
}

impl fmt::Display for RConcept {
  fn fmt(& self, fmt: & mut fmt::Formatter) -> fmt::Result {
    let (subs, sep, empty) = match self.kind {
      Kind::Lit { ref desc, inverted, .. } => return if inverted {
        write!(fmt, "!({})", desc)
      } else {
        write!(fmt, "{}", desc)
      },
      Kind::Conj(ref subs) => (subs, " & ", "true"),
      Kind::Disj(ref subs) => (subs, " | ", "false"),
    } ;
    if subs.is_empty() {
      return write!(fmt, "{}", empty)
    }
    write!(fmt, "(") ? ;
    for (count, sub) in subs.iter().enumerate() {
      if count > 0 {
        write!(fmt, "{}", sep) ?
      }
      write!(fmt, "{}", sub.get()) ?
    }
    write!(fmt, ")")
  }
}
impl fmt::Debug for RConcept {
  fn fmt(& self, fmt: & mut fmt::Formatter) -> fmt::Result {
    write!(
      fmt, "{} [errors: {}, complexity: {}]",
      self, self.errors(), self.complexity
    )
  }
}


/// Error raised when a literal is used as a conjunction or disjunction.
fn not_combinable(concept: & Concept) -> Error {
  ErrorKind::NotCombinable( concept.get().to_string() ).into()
}


/// Creates concepts for a dataset.
pub struct Factory {
  pos_count: usize,
  neg_count: usize,
  all_pos: IdxSet,
  all_neg: IdxSet,
  consign: RwLock< HConsign<RConcept> >,
}

/// Shared factory.
pub type Fact = Arc<Factory> ;

impl Dataset for Factory {
  fn pos_count(& self) -> usize { self.pos_count }
  fn neg_count(& self) -> usize { self.neg_count }
}

impl Factory {
  /// Factory for a dataset.
  pub fn new<D: Dataset + ?Sized>(data: & D) -> Fact {
    Self::of_counts( data.pos_count(), data.neg_count() )
  }

  /// Factory for some numbers of positive and negative examples.
  pub fn of_counts(pos_count: usize, neg_count: usize) -> Fact {
    Arc::new(
      Factory {
        pos_count, neg_count,
        all_pos: IdxSet::full(pos_count),
        all_neg: IdxSet::full(neg_count),
        consign: RwLock::new( HConsign::with_capacity(1_000) ),
      }
    )
  }

  /// Number of positive examples.
  #[inline]
  pub fn pos_count(& self) -> usize { self.pos_count }
  /// Number of negative examples.
  #[inline]
  pub fn neg_count(& self) -> usize { self.neg_count }
  /// All positive examples.
  #[inline]
  pub fn all_pos(& self) -> & IdxSet { & self.all_pos }
  /// All negative examples.
  #[inline]
  pub fn all_neg(& self) -> & IdxSet { & self.all_neg }

  /// Hash conses a concept from its kind and the examples it holds on.
  fn mk(
    & self, kind: Kind, pos: IdxSet, neg: IdxSet, complexity: f64, lits: usize
  ) -> Concept {
    let wrong_pos = self.all_pos.difference(& pos) ;
    let right_neg = self.all_neg.difference(& neg) ;
    self.consign.mk(
      RConcept {
        kind, pos, neg, wrong_pos, right_neg,
        pos_total: self.pos_count, neg_total: self.neg_count,
        complexity, lits,
      }
    )
  }

  /// A literal.
  pub fn lit(& self, pred: Pred, inverted: bool) -> Concept {
    let mut pos = IdxSet::new() ;
    for idx in 0 .. self.pos_count {
      if pred.holds(Class::Pos, idx) != inverted {
        pos.insert(idx) ;
      }
    }
    let mut neg = IdxSet::new() ;
    for idx in 0 .. self.neg_count {
      if pred.holds(Class::Neg, idx) != inverted {
        neg.insert(idx) ;
      }
    }
    let complexity = pred.complexity() + if inverted {
      consts::INVERSION
    } else { 0.0 } ;
    let desc = pred.to_string() ;
    self.mk( Kind::Lit { pred, desc, inverted }, pos, neg, complexity, 1 )
  }

  /// Sorts and dedups sub-concepts.
  fn normalize(mut subs: Vec<Concept>) -> Vec<Concept> {
    subs.sort_by_key(|sub| sub.uid()) ;
    subs.dedup() ;
    subs
  }

  /// Complexity and literal count of a combination.
  fn combined_stats(subs: & [Concept]) -> (f64, usize) {
    subs.iter().fold(
      (consts::COMBINATION, 0), |(cmpl, lits), sub| (
        cmpl + sub.complexity(), lits + sub.literal_count()
      )
    )
  }

  /// A conjunction. The empty conjunction holds on everything.
  pub fn conj(& self, subs: Vec<Concept>) -> Concept {
    let subs = Self::normalize(subs) ;
    let (mut pos, mut neg) = ( self.all_pos.clone(), self.all_neg.clone() ) ;
    for sub in & subs {
      pos.intersect_with( sub.pos() ) ;
      neg.intersect_with( sub.neg() )
    }
    let (complexity, lits) = Self::combined_stats(& subs) ;
    self.mk( Kind::Conj(subs), pos, neg, complexity, lits )
  }

  /// A disjunction. The empty disjunction holds on nothing.
  pub fn disj(& self, subs: Vec<Concept>) -> Concept {
    let subs = Self::normalize(subs) ;
    let (mut pos, mut neg) = ( IdxSet::new(), IdxSet::new() ) ;
    for sub in & subs {
      pos.union_with( sub.pos() ) ;
      neg.union_with( sub.neg() )
    }
    let (complexity, lits) = Self::combined_stats(& subs) ;
    self.mk( Kind::Disj(subs), pos, neg, complexity, lits )
  }

  /// Conjunction if `conj`, disjunction otherwise.
  pub fn combine(& self, conj: bool, subs: Vec<Concept>) -> Concept {
    if conj { self.conj(subs) } else { self.disj(subs) }
  }

  /// The empty conjunction.
  pub fn empty_conj(& self) -> Concept { self.conj( vec![] ) }
  /// The empty disjunction.
  pub fn empty_disj(& self) -> Concept { self.disj( vec![] ) }

  /// A formula of the same kind as `formula` with other sub-concepts.
  ///
  /// Fails if `formula` is a literal.
  pub fn with_subs(
    & self, formula: & Concept, subs: Vec<Concept>
  ) -> Res<Concept> {
    match formula.kind() {
      Kind::Conj(_) => Ok( self.conj(subs) ),
      Kind::Disj(_) => Ok( self.disj(subs) ),
      Kind::Lit { .. } => Err( not_combinable(formula) ),
    }
  }

  /// Removes a direct sub-concept from a formula.
  ///
  /// Returns the formula unchanged if `sub` is not one of its sub-concepts.
  pub fn remove(& self, formula: & Concept, sub: & Concept) -> Res<Concept> {
    if formula.is_lit() {
      return Err( not_combinable(formula) )
    }
    let subs = formula.sub_concepts().iter().filter(
      |s| * s != sub
    ).cloned().collect() ;
    self.with_subs(formula, subs)
  }

  /// Adds a direct sub-concept to a formula.
  pub fn add(& self, formula: & Concept, sub: Concept) -> Res<Concept> {
    if formula.is_lit() {
      return Err( not_combinable(formula) )
    }
    let mut subs = formula.sub_concepts().to_vec() ;
    subs.push(sub) ;
    self.with_subs(formula, subs)
  }
}


#[cfg(test)]
mod test {
  use super::* ;

  /// Factory with 3 positives and 3 negatives, and three predicates:
  /// - `a` holds on positives 0 and 1, and on negative 0 ;
  /// - `b` holds on positives 1 and 2 ;
  /// - `c` holds on all positives and negatives 1 and 2.
  fn setup() -> (Fact, Pred, Pred, Pred) {
    let fact = Factory::of_counts(3, 3) ;
    let set = |idxs: & [usize]| idxs.iter().cloned().collect::<IdxSet>() ;
    let a = TablePred::new("a", 2.0, set(& [0, 1]), set(& [0])).share() ;
    let b = TablePred::new("b", 2.0, set(& [1, 2]), set(& [])).share() ;
    let c = TablePred::new("c", 1.0, set(& [0, 1, 2]), set(& [1, 2])).share() ;
    (fact, a, b, c)
  }

  #[test]
  fn literals() {
    let (fact, a, b, c) = setup() ;
    let a = fact.lit(a, false) ;
    assert_eq!( a.errors(), 2 ) ;
    assert_eq!( a.complexity(), 2.0 ) ;
    assert!( ! a.is_correct() && ! a.is_complete() && a.is_meaningful() ) ;
    let b = fact.lit(b, false) ;
    assert!( b.is_correct() ) ;
    let c = fact.lit(c, true) ;
    assert_eq!( c.complexity(), 1.5 ) ;
    assert!( c.pos().is_empty() ) ;
    assert!( ! c.is_correct() && ! c.is_meaningful() ) ;
    assert_eq!( format!("{}", c.get()), "!(c)" )
  }

  #[test]
  fn hash_consing() {
    let (fact, a, b, _) = setup() ;
    let a_1 = fact.lit(a.clone(), false) ;
    let a_2 = fact.lit(a.clone(), false) ;
    assert_eq!( a_1, a_2 ) ;
    assert_ne!( a_1, fact.lit(a, true) ) ;
    let b = fact.lit(b, false) ;
    let d_1 = fact.disj( vec![ a_1.clone(), b.clone() ] ) ;
    let d_2 = fact.disj( vec![ b.clone(), a_2.clone(), b.clone() ] ) ;
    assert_eq!( d_1, d_2 ) ;
    assert_eq!( d_1.sub_count(), 2 ) ;
    assert_ne!( d_1, fact.conj( vec![ a_1, b ] ) )
  }

  #[test]
  fn combinations() {
    let (fact, a, b, c) = setup() ;
    let (a, b, c) = (
      fact.lit(a, false), fact.lit(b, false), fact.lit(c, false)
    ) ;
    let empty_c = fact.empty_conj() ;
    let empty_d = fact.empty_disj() ;
    assert_eq!( empty_c.complexity(), 1.0 ) ;
    assert_eq!( empty_d.complexity(), 1.0 ) ;
    assert!( empty_c.is_complete() && ! empty_c.is_correct() ) ;
    assert!( empty_d.is_correct() && ! empty_d.is_complete() ) ;

    let conj = fact.conj( vec![ a.clone(), c.clone() ] ) ;
    // a & c holds on positives 0, 1 and no negative.
    assert!( conj.is_correct() ) ;
    assert_eq!( conj.pos().len(), 2 ) ;
    assert_eq!( conj.complexity(), 4.0 ) ;
    assert_eq!( conj.literal_count(), 2 ) ;

    let disj = fact.disj( vec![ conj.clone(), b.clone() ] ) ;
    assert!( disj.is_correct() && disj.is_complete() ) ;
    assert_eq!( disj.errors(), 0 ) ;
    assert_eq!( disj.complexity(), 7.0 ) ;
    assert_eq!( disj.literal_count(), 3 ) ;

    let removed = fact.remove(& disj, & b).unwrap() ;
    assert_eq!( removed, fact.disj( vec![ conj.clone() ] ) ) ;
    assert_eq!( removed.errors(), 1 ) ;
    let added = fact.add(& removed, b.clone()).unwrap() ;
    assert_eq!( added, disj ) ;
    assert!( disj.is_better(& removed) ) ;
    assert!( ! removed.is_better(& disj) ) ;
    assert!( disj.is_equally_good(& added) )
  }

  #[test]
  fn literals_are_not_combinable() {
    let (fact, a, b, _) = setup() ;
    let (a, b) = ( fact.lit(a, false), fact.lit(b, false) ) ;
    match fact.remove(& a, & b) {
      Err(e) => match * e.kind() {
        ErrorKind::NotCombinable(_) => (),
        ref e => panic!("unexpected error {}", e),
      },
      Ok(_) => panic!("removing from a literal should fail"),
    }
    assert!( fact.add(& a, b).is_err() )
  }
}
