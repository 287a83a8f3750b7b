//! Iterated enhanced greedy heuristic for weighted set covering.
//!
//! Each iteration starts from a partial cover, completes it with
//! Chvátal-style picks (best newly covered elements per marginal cost),
//! removes redundant subsets and, if asked, tries local improvements. The
//! first iteration starts from the necessary subsets, later ones from a
//! random shrinking of the best cover so far and pick randomly among the
//! near-best candidates.

use rand::seq::SliceRandom ;

use crate::common::* ;
use crate::common::consts::scp::{ MAX_CANDIDATES, REMOVE_PORTION } ;
use crate::cover::{ Subset, CostModel, FamilyCost, SubsetRegistry } ;

/// Marginal costs are never considered lower than this.
const MIN_MARGINAL: f64 = 1e-12 ;
/// Randomized picks choose among the candidates whose ratio is at least this
/// portion of the best ratio.
const NEAR_BEST: f64 = 0.9 ;

/// A weighted set covering problem.
pub struct Problem<'a> {
  /// Family of subsets.
  subsets: & 'a [Subset],
  /// Elements to cover.
  target: IdxSet,
  /// Cost model.
  model: & 'a CostModel,
  /// Maximal number of subsets before covers are penalized, `0` for none.
  limit: usize,
  /// Activates local improvements.
  optimize: bool,
  /// Uses enhanced necessity registries.
  enhanced: bool,
}

impl<'a> Problem<'a> {
  /// Problem for a family, a target and a cost model.
  pub fn new(
    subsets: & 'a [Subset], target: IdxSet, model: & 'a CostModel
  ) -> Self {
    Problem {
      subsets, target, model, limit: 0, optimize: false, enhanced: false
    }
  }
  /// Sets the subset limit, `0` for no limit.
  pub fn limit(mut self, limit: usize) -> Self {
    self.limit = limit ;
    self
  }
  /// (De)activates local improvements.
  pub fn optimize(mut self, optimize: bool) -> Self {
    self.optimize = optimize ;
    self
  }
  /// (De)activates enhanced registries.
  pub fn enhanced(mut self, enhanced: bool) -> Self {
    self.enhanced = enhanced ;
    self
  }

  /// Elements to cover.
  pub fn target(& self) -> & IdxSet { & self.target }

  /// Union of the elements of the family, restricted to the target.
  pub fn coverable(& self) -> IdxSet {
    let mut res = IdxSet::new() ;
    for subset in self.subsets {
      res.union_with(& subset.elems)
    }
    res.intersect_with(& self.target) ;
    res
  }

  /// Computes a cover, as indices of subsets.
  ///
  /// Returns `None` if the family cannot cover the target. The subsets of
  /// `known`, if any, seed the best cover when they cover the target.
  pub fn solve(
    & self, iters: usize, known: Option<& [usize]>, rng: & mut Rand
  ) -> Option< Vec<usize> > {
    if self.target.is_empty() {
      return Some( vec![] )
    }
    if self.coverable() != self.target {
      return None
    }
    let search = Search::new(self, known) ;
    Some( search.run(iters, known, rng) )
  }

  /// Cost of a cover, including the penalty for exceeding the limit.
  pub fn cost(& self, cover: & [usize]) -> f64 {
    Search::new(self, None).cost(cover)
  }
}


/// Data of a run of the heuristic.
struct Search<'p, 'a: 'p> {
  problem: & 'p Problem<'a>,
  /// Elements of each subset, restricted to the target.
  elems: Vec<IdxSet>,
  /// Single cost of each subset.
  singles: Vec<f64>,
  /// Candidates.
  cands: Vec<usize>,
  /// Necessary subsets of the whole family.
  necessary: HashSet<usize>,
  /// Penalty per subset beyond the limit.
  penalty: f64,
}

impl<'p, 'a: 'p> Search<'p, 'a> {
  /// Builds the candidates.
  fn new(problem: & 'p Problem<'a>, known: Option<& [usize]>) -> Self {
    let elems: Vec<_> = problem.subsets.iter().map(
      |s| s.elems.intersection(& problem.target)
    ).collect() ;
    let singles: Vec<_> = problem.subsets.iter().map(
      |s| problem.model.single(s)
    ).collect() ;
    let penalty = if problem.limit > 0 {
      singles.iter().cloned().fold(0.0, f64::max)
    } else { 0.0 } ;

    let mut registry = SubsetRegistry::of_kind(problem.enhanced) ;
    for (idx, elems) in elems.iter().enumerate() {
      if ! elems.is_empty() {
        registry.add( idx, elems.clone() ) ;
      }
    }
    let necessary: HashSet<usize> = registry.necessary_subsets().into_iter().collect() ;

    let mut slf = Search {
      problem, elems, singles, cands: vec![], necessary, penalty
    } ;
    slf.candidates(known) ;
    slf
  }

  /// Ratio of elements per cost of a subset.
  fn ratio(& self, idx: usize) -> f64 {
    self.elems[idx].len() as f64 / self.singles[idx].max(MIN_MARGINAL)
  }

  /// Selects the candidates: the necessary subsets, the known ones, and the
  /// best ones by ratio, adding more if needed to cover the target.
  fn candidates(& mut self, known: Option<& [usize]>) {
    let mut cands: HashSet<usize> = self.necessary.clone() ;
    if let Some(known) = known {
      cands.extend(
        known.iter().cloned().filter(|idx| * idx < self.elems.len())
      )
    }
    let mut by_ratio: Vec<usize> = (0 .. self.elems.len()).filter(
      |idx| ! self.elems[* idx].is_empty() && ! cands.contains(idx)
    ).collect() ;
    by_ratio.sort_by(
      |i_1, i_2| self.ratio(* i_2).partial_cmp(
        & self.ratio(* i_1)
      ).unwrap_or(::std::cmp::Ordering::Equal)
    ) ;
    let room = MAX_CANDIDATES.saturating_sub( cands.len() ) ;
    let (take, rest) = by_ratio.split_at( ::std::cmp::min(room, by_ratio.len()) ) ;
    cands.extend( take.iter().cloned() ) ;

    let mut missing = self.problem.target.clone() ;
    for idx in & cands {
      missing.difference_with(& self.elems[* idx])
    }
    for idx in rest {
      if missing.is_empty() {
        break
      }
      if ! self.elems[* idx].is_disjoint(& missing) {
        missing.difference_with(& self.elems[* idx]) ;
        cands.insert(* idx) ;
      }
    }

    let mut cands: Vec<_> = cands.into_iter().collect() ;
    cands.sort() ;
    self.cands = cands
  }

  /// Cost of a cover.
  fn cost(& self, cover: & [usize]) -> f64 {
    let mut cost = FamilyCost::new() ;
    for idx in cover {
      cost.add(self.problem.model, & self.problem.subsets[* idx])
    }
    cost.value(self.problem.model) + self.excess_penalty( cover.len() )
  }

  /// Penalty for a cover with `count` subsets.
  fn excess_penalty(& self, count: usize) -> f64 {
    if self.problem.limit > 0 && count > self.problem.limit {
      self.penalty * (count - self.problem.limit) as f64
    } else { 0.0 }
  }

  /// True if the cover covers the target.
  fn covers(& self, cover: & [usize]) -> bool {
    let mut missing = self.problem.target.clone() ;
    for idx in cover {
      missing.difference_with(& self.elems[* idx])
    }
    missing.is_empty()
  }

  /// Runs the iterations.
  fn run(
    & self, iters: usize, known: Option<& [usize]>, rng: & mut Rand
  ) -> Vec<usize> {
    let mut base: Vec<usize> = self.necessary.iter().cloned().collect() ;
    base.sort() ;
    if self.covers(& base) {
      return base
    }

    let mut best: Option<(Vec<usize>, f64)> = known.and_then(
      |known| {
        let mut known: Vec<_> = known.iter().cloned().filter(
          |idx| * idx < self.elems.len()
        ).collect() ;
        if self.covers(& known) {
          self.clean(& mut known) ;
          let cost = self.cost(& known) ;
          Some( (known, cost) )
        } else { None }
      }
    ) ;

    for iter in 0 .. ::std::cmp::max(iters, 1) {
      let start = match best {
        Some( (ref cover, _) ) if iter > 0 => self.shrink(cover, rng),
        _ => base.clone(),
      } ;
      let mut cover = self.complete(start, iter > 0, rng) ;
      self.clean(& mut cover) ;
      if self.problem.optimize {
        self.exchange_inferior(& mut cover) ;
        self.add_one(& mut cover)
      }
      let cost = self.cost(& cover) ;
      let better = best.as_ref().map(
        |& (_, best_cost)| cost <= best_cost
      ).unwrap_or(true) ;
      if better {
        best = Some( (cover, cost) )
      }
    }

    let mut cover = best.map(|(cover, _)| cover).unwrap_or(base) ;
    cover.sort() ;
    cover
  }

  /// Completes a partial cover with greedy picks.
  fn complete(
    & self, mut cover: Vec<usize>, randomize: bool, rng: & mut Rand
  ) -> Vec<usize> {
    let model = self.problem.model ;
    let mut in_cover: HashSet<usize> = cover.iter().cloned().collect() ;
    let mut cost = FamilyCost::new() ;
    let mut missing = self.problem.target.clone() ;
    for idx in & cover {
      cost.add(model, & self.problem.subsets[* idx]) ;
      missing.difference_with(& self.elems[* idx])
    }

    while ! missing.is_empty() {
      let current = cost.value(model) + self.excess_penalty( cost.count() ) ;
      let mut scored = Vec::with_capacity( self.cands.len() ) ;
      let mut best_ratio = 0.0 ;
      for & cand in & self.cands {
        if in_cover.contains(& cand) {
          continue
        }
        let gain = self.elems[cand].intersection_len(& missing) ;
        if gain == 0 {
          continue
        }
        let with = cost.value_with(
          model, & self.problem.subsets[cand]
        ) + self.excess_penalty( cost.count() + 1 ) ;
        let ratio = gain as f64 / (with - current).max(MIN_MARGINAL) ;
        if ratio > best_ratio {
          best_ratio = ratio
        }
        scored.push( (cand, ratio) )
      }

      let pick = if randomize {
        let near: Vec<_> = scored.iter().filter(
          |& & (_, ratio)| ratio >= best_ratio * NEAR_BEST
        ).map(|& (cand, _)| cand).collect() ;
        near.choose(rng).cloned()
      } else {
        scored.iter().find(
          |& & (_, ratio)| ratio == best_ratio
        ).map(|& (cand, _)| cand)
      } ;

      if let Some(pick) = pick {
        cost.add(model, & self.problem.subsets[pick]) ;
        missing.difference_with(& self.elems[pick]) ;
        in_cover.insert(pick) ;
        cover.push(pick)
      } else {
        // Unreachable, the candidates cover the target.
        break
      }
    }
    cover
  }

  /// Registry for a cover.
  fn registry(& self, cover: & [usize]) -> SubsetRegistry<usize> {
    let mut registry = SubsetRegistry::of_kind(self.problem.enhanced) ;
    for idx in cover {
      registry.add( * idx, self.elems[* idx].clone() ) ;
    }
    registry
  }

  /// Removes redundant subsets, most expensive first.
  fn clean(& self, cover: & mut Vec<usize>) {
    let mut registry = self.registry(cover) ;
    let mut order = cover.clone() ;
    order.sort_by(
      |i_1, i_2| self.singles[* i_2].partial_cmp(
        & self.singles[* i_1]
      ).unwrap_or(::std::cmp::Ordering::Equal)
    ) ;
    for idx in order {
      if ! registry.is_necessary(& idx) {
        registry.remove(& idx) ;
      }
    }
    cover.retain(|idx| registry.contains(idx))
  }

  /// Replaces subsets by cheaper candidates covering their exclusive
  /// elements.
  fn exchange_inferior(& self, cover: & mut Vec<usize>) {
    let mut registry = self.registry(cover) ;
    let mut idx = 0 ;
    while idx < cover.len() {
      let current = cover[idx] ;
      let exclusive = registry.exclusive(& current).cloned().unwrap_or_default() ;
      let replacement = self.cands.iter().cloned().filter(
        |cand| ! registry.contains(cand) &&
        self.singles[* cand] < self.singles[current] &&
        exclusive.is_subset(& self.elems[* cand])
      ).min_by(
        |c_1, c_2| self.singles[* c_1].partial_cmp(
          & self.singles[* c_2]
        ).unwrap_or(::std::cmp::Ordering::Equal)
      ) ;
      if let Some(cand) = replacement {
        let mut new = cover.clone() ;
        new[idx] = cand ;
        if self.cost(& new) < self.cost(cover) {
          registry.remove(& current) ;
          registry.add( cand, self.elems[cand].clone() ) ;
          * cover = new
        }
      }
      idx += 1
    }
    self.clean(cover)
  }

  /// Adds one candidate and drops what became redundant, keeps the result if
  /// it is cheaper.
  fn add_one(& self, cover: & mut Vec<usize>) {
    let mut cost = self.cost(cover) ;
    for & cand in & self.cands {
      if cover.contains(& cand) {
        continue
      }
      let registry = self.registry(cover) ;
      let freed = registry.would_become_redundant(& self.elems[cand]) ;
      if freed.is_empty() && registry.count_necessary() == cover.len() {
        continue
      }
      let mut new = cover.clone() ;
      new.push(cand) ;
      self.clean(& mut new) ;
      let new_cost = self.cost(& new) ;
      if new_cost < cost {
        * cover = new ;
        cost = new_cost
      }
    }
  }

  /// Randomly removes a portion of the non-necessary subsets of a cover.
  fn shrink(& self, cover: & [usize], rng: & mut Rand) -> Vec<usize> {
    let mut removable: Vec<_> = cover.iter().cloned().filter(
      |idx| ! self.necessary.contains(idx)
    ).collect() ;
    if removable.is_empty() {
      return cover.to_vec()
    }
    let count = ::std::cmp::max(
      1, (removable.len() as f64 * REMOVE_PORTION).round() as usize
    ) ;
    removable.shuffle(rng) ;
    let removed: HashSet<_> = removable.into_iter().take(count).collect() ;
    cover.iter().cloned().filter(|idx| ! removed.contains(idx)).collect()
  }
}
