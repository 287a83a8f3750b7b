//! Collaborators the search consumes: examples and predicates.
//!
//! The search never looks at attribute values. It only needs the number of
//! examples of each class and, for each predicate, on which examples it
//! holds.

use std::fmt ;

use crate::common::* ;

/// Class of an example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Class {
  /// Positive example.
  Pos,
  /// Negative example.
  Neg,
}

/// Example dataset.
pub trait Dataset: Send + Sync {
  /// Number of positive examples.
  fn pos_count(& self) -> usize ;
  /// Number of negative examples.
  fn neg_count(& self) -> usize ;
}

/// An elementary test on examples.
///
/// Two predicates with the same `Display` are considered the same predicate.
pub trait Predicate: Send + Sync + fmt::Display {
  /// Complexity of the predicate.
  fn complexity(& self) -> f64 ;
  /// True if the predicate holds on an example.
  fn holds(& self, class: Class, idx: usize) -> bool ;
  /// True if the predicate tests the value of a boolean attribute.
  ///
  /// Such predicates are used inverted only if asked to.
  fn is_bool_value(& self) -> bool { false }
}

/// Shared predicate.
pub type Pred = Arc<dyn Predicate> ;

/// Iterator over predicates.
pub type Preds<'a> = Box<dyn Iterator<Item = Pred> + 'a> ;

/// Predicate generator.
///
/// Each sequence is consumed once per admission pass. The `_neg` sequences
/// yield predicates the search uses inverted.
pub trait PredGen: Send + Sync {
  /// Predicates holding on no negative example.
  fn correct_pos(& self) -> Preds ;
  /// Predicates holding on all positive examples.
  fn complete_pos(& self) -> Preds ;
  /// Predicates holding on no positive example, complete once inverted.
  fn correct_neg(& self) -> Preds ;
  /// Predicates holding on all negative examples, correct once inverted.
  fn complete_neg(& self) -> Preds ;
  /// Predicates holding on some positive examples.
  fn general_pos(& self) -> Preds ;
  /// Predicates not holding on some negative examples, used inverted.
  fn general_neg(& self) -> Preds ;
}


/// Shared predicate generator.
pub type Gen = Arc<dyn PredGen> ;


/// A predicate given by the examples it holds on.
///
/// Mostly useful when the predicates are computed elsewhere.
pub struct TablePred {
  name: String,
  complexity: f64,
  pos: IdxSet,
  neg: IdxSet,
  bool_value: bool,
}
impl TablePred {
  /// Constructor.
  pub fn new<S: Into<String>>(
    name: S, complexity: f64, pos: IdxSet, neg: IdxSet
  ) -> Self {
    TablePred { name: name.into(), complexity, pos, neg, bool_value: false }
  }
  /// Marks the predicate as a boolean-value one.
  pub fn bool_value(mut self) -> Self {
    self.bool_value = true ;
    self
  }
  /// Shared version.
  pub fn share(self) -> Pred {
    Arc::new(self)
  }
}
impl fmt::Display for TablePred {
  fn fmt(& self, fmt: & mut fmt::Formatter) -> fmt::Result {
    write!(fmt, "{}", self.name)
  }
}
impl Predicate for TablePred {
  fn complexity(& self) -> f64 { self.complexity }
  fn holds(& self, class: Class, idx: usize) -> bool {
    match class {
      Class::Pos => self.pos.contains(idx),
      Class::Neg => self.neg.contains(idx),
    }
  }
  fn is_bool_value(& self) -> bool { self.bool_value }
}


/// Predicate generator over a fixed list of predicates.
///
/// Sorts predicates in the six sequences by evaluating them on the examples.
pub struct PredList {
  pos_count: usize,
  neg_count: usize,
  preds: Vec<Pred>,
}
impl PredList {
  /// Constructor.
  pub fn new<D: Dataset + ?Sized>(data: & D, preds: Vec<Pred>) -> Self {
    PredList {
      pos_count: data.pos_count(), neg_count: data.neg_count(), preds
    }
  }

  /// Number of examples of a class the predicate holds on.
  fn count(& self, pred: & Pred, class: Class) -> usize {
    let total = match class {
      Class::Pos => self.pos_count,
      Class::Neg => self.neg_count,
    } ;
    (0 .. total).filter(|idx| pred.holds(class, * idx)).count()
  }

  /// Predicates verifying some condition on their counts.
  fn filter<'a, F>(& 'a self, f: F) -> Preds<'a>
  where F: Fn(usize, usize) -> bool + 'a {
    Box::new(
      self.preds.iter().filter(
        move |pred| f(
          self.count(pred, Class::Pos), self.count(pred, Class::Neg)
        )
      ).cloned()
    )
  }
}
impl PredGen for PredList {
  fn correct_pos(& self) -> Preds {
    self.filter(|pos, neg| pos > 0 && neg == 0)
  }
  fn complete_pos(& self) -> Preds {
    let pos_count = self.pos_count ;
    let neg_count = self.neg_count ;
    self.filter(move |pos, neg| pos == pos_count && neg < neg_count)
  }
  fn correct_neg(& self) -> Preds {
    self.filter(|pos, neg| pos == 0 && neg > 0)
  }
  fn complete_neg(& self) -> Preds {
    let pos_count = self.pos_count ;
    let neg_count = self.neg_count ;
    self.filter(move |pos, neg| neg == neg_count && pos < pos_count)
  }
  fn general_pos(& self) -> Preds {
    self.filter(|pos, neg| pos > 0 && neg > 0)
  }
  fn general_neg(& self) -> Preds {
    let pos_count = self.pos_count ;
    let neg_count = self.neg_count ;
    self.filter(move |pos, neg| neg < neg_count && pos < pos_count && neg > 0)
  }
}
