//! Constants of the crate.

/// Default seed.
pub const SEED: u64 = 1 ;

/// Cost factor applied to the indices no concept handles.
pub mod cost {
  /// Initial cost factor.
  pub const INIT: f64 = 1.0 ;
  /// Multiplier applied when the search is stuck.
  pub const STEP: f64 = 2.0 ;
  /// The cost factor is not raised beyond this value.
  pub const CAP: f64 = 30.0 ;
  /// Slack on the total index cost, keeps quotient denominators positive.
  pub const MAX_FACTOR: f64 = 1.000001 ;
  /// Exponent of the frequency used in utilities.
  pub const FREQ_EXPONENT: f64 = 1.0 ;
}

/// Set covering.
pub mod scp {
  /// Default number of heuristic iterations.
  pub const ITERS: usize = 10 ;
  /// Maximal number of candidates kept by the greedy heuristic.
  pub const MAX_CANDIDATES: usize = 400 ;
  /// Portion of a cover randomly removed before a new greedy iteration.
  pub const REMOVE_PORTION: f64 = 0.3 ;
  /// Number of recently added subsets the registry keeps around.
  pub const RECENT_BUFFER: usize = 2 ;
}

/// Bounded pools.
pub mod pool {
  /// Capacity of a bounded pool, relative to its universe.
  pub const FACTOR: f64 = 5.0 ;
}

/// Concepts.
pub mod concept {
  /// Complexity increment of an inverted literal.
  pub const INVERSION: f64 = 0.5 ;
  /// Complexity of a conjunction or disjunction, on top of its parts.
  pub const COMBINATION: f64 = 1.0 ;
  /// Complexity of a threshold predicate.
  pub const THRESHOLD: f64 = 2.0 ;
  /// Complexity of a boolean-value predicate.
  pub const BOOL_VALUE: f64 = 2.0 ;
}
