//! Weighted set covering.
//!
//! A [`Subset`][sub] is a set of *elements* to cover, a cost, and a set of
//! *cost indices*. The cost indices only matter for quotient cost models,
//! where choosing a subset also loses the indices it gets wrong.
//!
//! - [`registry`][reg] tracks which subsets of a family are necessary ;
//! - [`pool`][pool] retains a bounded family of concept subsets ;
//! - [`greedy`][greedy] is the iterated greedy heuristic.
//!
//! [sub]: struct.Subset.html (Subset struct)
//! [reg]: registry/index.html (registry module)
//! [pool]: pool/index.html (pool module)
//! [greedy]: greedy/index.html (greedy module)

use crate::common::* ;
use crate::common::consts::cost::MAX_FACTOR ;

pub mod registry ;
pub mod pool ;
pub mod greedy ;

pub use self::registry::SubsetRegistry ;
pub use self::pool::Pool ;
pub use self::greedy::Problem ;


/// A subset of a set covering problem.
#[derive(Debug, Clone, PartialEq)]
pub struct Subset {
  /// Elements covered.
  pub elems: IdxSet,
  /// Indices lost by choosing this subset.
  pub cost_idxs: IdxSet,
  /// Own cost.
  pub cost: f64,
}
impl Subset {
  /// Subset without cost indices.
  pub fn new(elems: IdxSet, cost: f64) -> Self {
    Subset { elems, cost_idxs: IdxSet::new(), cost }
  }
  /// Subset with cost indices.
  pub fn with_cost_idxs(elems: IdxSet, cost_idxs: IdxSet, cost: f64) -> Self {
    Subset { elems, cost_idxs, cost }
  }
}


/// How the cost of a family of subsets is computed.
#[derive(Debug, Clone)]
pub enum CostModel {
  /// Sum of the costs of the subsets.
  Sum,
  /// Sum of the costs of the subsets divided by what is left of the total
  /// index cost once the cost indices of the subsets are lost.
  Quotient {
    /// Cost of each index.
    idx_costs: Vec<f64>,
    /// Total index cost, slightly increased.
    max_plus: f64,
  },
}
impl CostModel {
  /// Quotient model from some index costs.
  pub fn quotient(idx_costs: Vec<f64>) -> Self {
    let sum: f64 = idx_costs.iter().sum() ;
    let max_plus = if sum == 0.0 { 1.0 } else { sum * MAX_FACTOR } ;
    CostModel::Quotient { idx_costs, max_plus }
  }

  /// Cost of a family containing just one subset.
  pub fn single(& self, subset: & Subset) -> f64 {
    let mut cost = FamilyCost::new() ;
    cost.add(self, subset) ;
    cost.value(self)
  }

  /// Cost of a family.
  pub fn family<'a, I>(& self, family: I) -> f64
  where I: IntoIterator<Item = & 'a Subset> {
    let mut cost = FamilyCost::new() ;
    for subset in family {
      cost.add(self, subset)
    }
    cost.value(self)
  }

  /// Cost of some indices.
  fn idx_cost(& self, idxs: & IdxSet) -> f64 {
    match * self {
      CostModel::Sum => 0.0,
      CostModel::Quotient { ref idx_costs, .. } => idxs.iter().map(
        |idx| idx_costs.get(idx).cloned().unwrap_or(0.0)
      ).sum(),
    }
  }
}


/// Incremental cost of a family.
#[derive(Debug, Clone, Default)]
pub struct FamilyCost {
  /// Sum of the own costs.
  own: f64,
  /// Union of the cost indices.
  lost: IdxSet,
  /// Cost of `lost`.
  lost_cost: f64,
  /// Number of subsets.
  count: usize,
}
impl FamilyCost {
  /// Empty family.
  pub fn new() -> Self { Self::default() }

  /// Number of subsets.
  #[inline]
  pub fn count(& self) -> usize { self.count }

  /// Adds a subset.
  pub fn add(& mut self, model: & CostModel, subset: & Subset) {
    self.own += subset.cost ;
    self.count += 1 ;
    if let CostModel::Quotient { .. } = * model {
      let new = subset.cost_idxs.difference(& self.lost) ;
      self.lost_cost += model.idx_cost(& new) ;
      self.lost.union_with(& new)
    }
  }

  /// Value of the family.
  pub fn value(& self, model: & CostModel) -> f64 {
    match * model {
      CostModel::Sum => self.own,
      CostModel::Quotient { max_plus, .. } => self.own / (
        max_plus - self.lost_cost
      ),
    }
  }

  /// Value of the family if `subset` was added.
  pub fn value_with(& self, model: & CostModel, subset: & Subset) -> f64 {
    match * model {
      CostModel::Sum => self.own + subset.cost,
      CostModel::Quotient { max_plus, .. } => {
        let new = subset.cost_idxs.difference(& self.lost) ;
        (self.own + subset.cost) / (
          max_plus - self.lost_cost - model.idx_cost(& new)
        )
      },
    }
  }
}
