//! Parallel decomposition of a generation step.
//!
//! A generation step (middle and inner loops) is packaged as a
//! [`WorkUnit`][unit]. An [`Executor`][exec] computes a batch of units and
//! returns one [`Partial`][partial] solution per unit, which are then
//! [merged][merge]. Units of a batch only see each other through a
//! [`SharedConcepts`][shared] store where they broadcast the specialized
//! concepts they find.
//!
//! [unit]: unit/struct.WorkUnit.html (WorkUnit struct)
//! [exec]: exec/trait.Executor.html (Executor trait)
//! [partial]: struct.Partial.html (Partial struct)
//! [merge]: fn.merge.html (merge function)
//! [shared]: shared/struct.SharedConcepts.html (SharedConcepts struct)

use crate::common::* ;
use crate::concept::{ Concept, ConceptSet } ;

pub mod shared ;
pub mod unit ;
pub mod exec ;

pub use self::shared::{ SharedConcepts, Poller } ;
pub use self::unit::WorkUnit ;
pub use self::exec::{ Executor, Sequential, Threaded } ;


/// Partial solution produced by a work unit.
#[derive(Clone)]
pub struct Partial {
  /// New specialized concepts.
  pub concepts: ConceptSet,
  /// Best formula found.
  pub formula: Concept,
  /// True if further improvement might be possible.
  pub improvable: bool,
}

impl Partial {
  /// Constructor.
  pub fn new(concepts: ConceptSet, formula: Concept, improvable: bool) -> Self {
    Partial { concepts, formula, improvable }
  }
}

/// Merges some partial solutions.
///
/// Concepts are unioned, the formula is the best one (the first one on
/// ties), and the result is improvable if any partial solution is. `None`
/// if there are no partial solutions.
pub fn merge<I>(partials: I) -> Option<Partial>
where I: IntoIterator<Item = Partial> {
  let mut partials = partials.into_iter() ;
  let mut merged = partials.next() ? ;
  for partial in partials {
    for concept in partial.concepts.iter() {
      merged.concepts.insert( concept.clone() ) ;
    }
    if partial.formula.is_better(& merged.formula) {
      merged.formula = partial.formula
    }
    merged.improvable = merged.improvable || partial.improvable
  }
  Some(merged)
}


#[cfg(test)]
mod test {
  use super::* ;
  use crate::store::test::{ sample, Flavor } ;

  #[test]
  fn merging() {
    let (fact, preds) = sample() ;
    let lit = |name: & str| fact.lit( preds[name].clone(), false ) ;
    let (a, b, e) = ( lit("a"), lit("b"), lit("e") ) ;

    let mut set_1 = ConceptSet::new() ;
    set_1.insert( a.clone() ) ;
    set_1.insert( b.clone() ) ;
    let mut set_2 = ConceptSet::new() ;
    set_2.insert( b.clone() ) ;
    set_2.insert( e.clone() ) ;

    let worse = fact.disj( vec![ a.clone() ] ) ;
    let better = fact.disj( vec![ a.clone(), b.clone(), e.clone() ] ) ;
    assert!( better.is_better(& worse) ) ;

    let merged = merge(
      vec![
        Partial::new( set_1, worse.clone(), false ),
        Partial::new( set_2, better.clone(), false ),
        Partial::new(
          ConceptSet::new(), Flavor::Correct.empty_formula(& fact), true
        ),
      ]
    ).unwrap() ;
    assert_eq!( merged.concepts.len(), 3 ) ;
    for concept in & [a, b, e] {
      assert!( merged.concepts.contains(concept) )
    }
    assert_eq!( merged.formula, better ) ;
    assert!( merged.improvable ) ;

    assert!( merge( vec![] ).is_none() )
  }
}
