//! Predicates over the attributes of a table.
//!
//! - an attribute taking only values `0` and `1` yields a boolean-value
//!   predicate, holding when the attribute is `1` ;
//! - any other attribute yields threshold predicates `attr <= t`, one for
//!   each midpoint `t` between two consecutive values of the attribute.
//!
//! Constant attributes yield nothing.

use std::fmt ;

use crate::common::* ;
use crate::common::consts::concept::{ THRESHOLD, BOOL_VALUE } ;
use crate::concept::{ Class, Predicate, Pred } ;

use super::Table ;


/// Examples of each class some test holds on.
fn holding<F>(table: & Table, attr: usize, test: F) -> (IdxSet, IdxSet)
where F: Fn(f64) -> bool {
  let set = |class: Class| -> IdxSet {
    table.column(class, attr).into_iter().enumerate().filter(
      |& (_, val)| test(val)
    ).map(|(idx, _)| idx).collect()
  } ;
  ( set(Class::Pos), set(Class::Neg) )
}


/// `attr <= value`.
pub struct Threshold {
  attr: String,
  value: f64,
  pos: IdxSet,
  neg: IdxSet,
}
impl Threshold {
  /// Threshold predicate on an attribute of a table.
  pub fn new(table: & Table, attr: usize, value: f64) -> Self {
    let (pos, neg) = holding(table, attr, |val| val <= value) ;
    Threshold { attr: table.attrs()[attr].clone(), value, pos, neg }
  }
}
impl fmt::Display for Threshold {
  fn fmt(& self, fmt: & mut fmt::Formatter) -> fmt::Result {
    write!(fmt, "{} <= {}", self.attr, self.value)
  }
}
impl Predicate for Threshold {
  fn complexity(& self) -> f64 { THRESHOLD }
  fn holds(& self, class: Class, idx: usize) -> bool {
    match class {
      Class::Pos => self.pos.contains(idx),
      Class::Neg => self.neg.contains(idx),
    }
  }
}


/// Boolean attribute is `1`.
pub struct BoolValue {
  attr: String,
  pos: IdxSet,
  neg: IdxSet,
}
impl BoolValue {
  /// Boolean-value predicate on an attribute of a table.
  pub fn new(table: & Table, attr: usize) -> Self {
    let (pos, neg) = holding(table, attr, |val| val == 1.0) ;
    BoolValue { attr: table.attrs()[attr].clone(), pos, neg }
  }
}
impl fmt::Display for BoolValue {
  fn fmt(& self, fmt: & mut fmt::Formatter) -> fmt::Result {
    write!(fmt, "{}", self.attr)
  }
}
impl Predicate for BoolValue {
  fn complexity(& self) -> f64 { BOOL_VALUE }
  fn holds(& self, class: Class, idx: usize) -> bool {
    match class {
      Class::Pos => self.pos.contains(idx),
      Class::Neg => self.neg.contains(idx),
    }
  }
  fn is_bool_value(& self) -> bool { true }
}


/// Sorted, deduplicated values of an attribute over all examples.
fn values(table: & Table, attr: usize) -> Vec<f64> {
  let mut vals = table.column(Class::Pos, attr) ;
  vals.extend( table.column(Class::Neg, attr) ) ;
  vals.sort_by(
    |v_1, v_2| v_1.partial_cmp(v_2).unwrap_or(::std::cmp::Ordering::Equal)
  ) ;
  vals.dedup() ;
  vals
}

/// Predicates of a table.
pub fn of_table(table: & Table) -> Vec<Pred> {
  let mut preds: Vec<Pred> = vec![] ;
  for attr in 0 .. table.attrs().len() {
    let vals = values(table, attr) ;
    if vals.len() < 2 {
      continue
    }
    if vals.len() == 2 && vals[0] == 0.0 && vals[1] == 1.0 {
      preds.push( Arc::new( BoolValue::new(table, attr) ) ) ;
      continue
    }
    for pair in vals.windows(2) {
      let mid = (pair[0] + pair[1]) / 2.0 ;
      preds.push( Arc::new( Threshold::new(table, attr, mid) ) )
    }
  }
  log_debug! {
    "{} predicate(s) over {} attribute(s)", preds.len(), table.attrs().len()
  }
  preds
}


#[cfg(test)]
mod test {
  use super::* ;
  use crate::concept::{ PredGen, Dataset } ;

  #[test]
  fn predicates() {
    let table = Table::of_str("\
      x flag c class
      1 0    4 +
      2 1    4 +
      5 0    4 -
      3 1    4 -
    ").unwrap() ;
    let preds = table.preds() ;
    let names: Vec<String> = preds.iter().map(|pred| pred.to_string()).collect() ;
    assert_eq!( names, vec![ "x <= 1.5", "x <= 2.5", "x <= 4", "flag" ] ) ;

    let x_2 = & preds[1] ;
    assert_eq!( x_2.complexity(), THRESHOLD ) ;
    assert!( x_2.holds(Class::Pos, 0) && x_2.holds(Class::Pos, 1) ) ;
    assert!( ! x_2.holds(Class::Neg, 0) && ! x_2.holds(Class::Neg, 1) ) ;
    assert!( ! x_2.is_bool_value() ) ;

    let flag = & preds[3] ;
    assert!( flag.is_bool_value() ) ;
    assert!( flag.holds(Class::Pos, 1) && flag.holds(Class::Neg, 1) ) ;
    assert!( ! flag.holds(Class::Pos, 0) ) ;

    // Thresholds holding on no negative.
    let gen = table.pred_gen() ;
    let correct: Vec<String> = gen.correct_pos().map(
      |pred| pred.to_string()
    ).collect() ;
    assert_eq!( correct, vec![ "x <= 1.5", "x <= 2.5" ] ) ;
    assert_eq!( table.pos_count(), 2 )
  }
}
