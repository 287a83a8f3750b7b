//! Append-only store of concepts shared by the units of a batch.

use crate::common::* ;
use crate::concept::Concept ;

/// Append-only store of concepts.
///
/// Elements are never removed, so readers only need to remember how many
/// they have seen.
#[derive(Default)]
pub struct SharedConcepts {
  elems: RwLock< Vec<Concept> >,
}

impl SharedConcepts {
  /// Empty store.
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a concept.
  pub fn add(& self, concept: Concept) -> Res<()> {
    self.elems.write().map_err(corrupted_err) ?.push(concept) ;
    Ok(())
  }

  /// Number of concepts.
  pub fn len(& self) -> Res<usize> {
    Ok( self.elems.read().map_err(corrupted_err) ?.len() )
  }

  /// True if empty.
  pub fn is_empty(& self) -> Res<bool> {
    self.len().map(|len| len == 0)
  }

  /// A poller that has not seen anything yet.
  pub fn poller(& self) -> Poller {
    Poller { seen: 0 }
  }
}


/// Reads a shared store incrementally.
#[derive(Debug, Clone, Copy)]
pub struct Poller {
  seen: usize,
}

impl Poller {
  /// Concepts added since the last poll.
  pub fn poll(& mut self, shared: & SharedConcepts) -> Res< Vec<Concept> > {
    let elems = shared.elems.read().map_err(corrupted_err) ? ;
    let new = elems[ self.seen .. ].to_vec() ;
    self.seen = elems.len() ;
    Ok(new)
  }
}


#[cfg(test)]
mod test {
  use super::* ;
  use crate::store::test::sample ;

  #[test]
  fn polling() {
    let (fact, preds) = sample() ;
    let lit = |name: & str| fact.lit( preds[name].clone(), false ) ;
    let shared = SharedConcepts::new() ;
    let mut poller_1 = shared.poller() ;
    assert!( poller_1.poll(& shared).unwrap().is_empty() ) ;

    shared.add( lit("a") ).unwrap() ;
    shared.add( lit("b") ).unwrap() ;
    assert_eq!( poller_1.poll(& shared).unwrap(), vec![ lit("a"), lit("b") ] ) ;
    assert!( poller_1.poll(& shared).unwrap().is_empty() ) ;

    let mut poller_2 = shared.poller() ;
    shared.add( lit("e") ).unwrap() ;
    assert_eq!( poller_1.poll(& shared).unwrap(), vec![ lit("e") ] ) ;
    assert_eq!( poller_2.poll(& shared).unwrap().len(), 3 ) ;
    assert_eq!( shared.len().unwrap(), 3 )
  }
}
