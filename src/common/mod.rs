//! Base types and functions.

pub use std::collections::{ HashMap, HashSet } ;
pub use std::io::{ Read, Write } ;
pub use std::sync::{ Arc, RwLock } ;
pub use std::sync::mpsc::{ Receiver, Sender } ;

pub use hashconsing::HashConsign ;
pub use hashconsing::coll::* ;

pub use either::Either ;

pub use rand::{ Rng, RngCore, SeedableRng } ;

pub use crate::errors::* ;

#[macro_use]
pub mod macros ;
pub mod config ;
pub mod consts ;
pub mod idx_set ;
pub mod profiling ;
mod revision ;

pub use self::config::* ;
pub use self::idx_set::IdxSet ;
pub use self::profiling::{ Profiler, CanPrint } ;


lazy_static!{
  /// Global output configuration.
  pub static ref conf: Config = Config::default() ;
  static ref version_string: String = if let Some(
    rev
  ) = self::revision::REVISION {
    format!("{} ({})", crate_version!(), rev)
  } else {
    format!("{}", crate_version!())
  } ;
  /// Version with revision info.
  pub static ref version: & 'static str = & version_string ;
}


// |===| Helpers.

/// Random generator used throughout.
pub type Rand = ::rand_xorshift::XorShiftRng ;

/// Creates the random generator of the search.
///
/// If `random`, the seed is taken from the clock.
pub fn mk_rng(seed: u64, random: bool) -> Rand {
  let seed = if random {
    use std::time::{ SystemTime, UNIX_EPOCH } ;
    SystemTime::now().duration_since(UNIX_EPOCH).map(
      |d| d.as_secs() ^ (d.subsec_nanos() as u64)
    ).unwrap_or(seed)
  } else {
    seed
  } ;
  Rand::seed_from_u64(seed)
}

/// Derives an independent generator from an existing one.
pub fn sub_rng(rng: & mut Rand) -> Rand {
  Rand::seed_from_u64( rng.next_u64() )
}

/// Prints the stats if asked. Does nothing in bench mode.
#[cfg(feature = "bench")]
pub fn print_stats(_: & str, _: Profiler) {}
/// Prints the stats if asked. Does nothing in bench mode.
#[cfg( not(feature = "bench") )]
pub fn print_stats(name: & str, profiler: Profiler) {
  if conf.stats() {
    println!("") ;
    profiler.print(name) ;
    println!("")
  }
}

/// Lock corrupted error.
pub fn corrupted_err<T>(_: T) -> Error {
  "[bug] lock on shared concepts is corrupted...".into()
}

/// Quotient of two floats, zero if the denominator is zero.
#[inline]
pub fn quot(num: f64, den: f64) -> f64 {
  if den == 0.0 { 0.0 } else { num / den }
}


/// Iteration budget.
///
/// - negative `n`: exactly `|n|` iterations ;
/// - zero: iterates as long as the last iteration improved something ;
/// - positive `n`: at most `n` iterations, stops early if an iteration did
///   not improve anything.
///
/// The first iteration always runs.
#[derive(Debug, Clone, Copy)]
pub struct Budget {
  /// Signed iteration count.
  target: isize,
  /// Iterations left, irrelevant when `target` is zero.
  left: usize,
  /// Iterations done.
  done: usize,
}
impl Budget {
  /// Constructor.
  pub fn new(target: isize) -> Self {
    Budget { target, left: target.unsigned_abs(), done: 0 }
  }

  /// Number of iterations done.
  #[inline]
  pub fn done(& self) -> usize { self.done }

  /// True if the budget allows another iteration, given whether the last
  /// iteration improved something. Accounts for the iteration if so.
  pub fn next(& mut self, improved: bool) -> bool {
    let go_on = if self.done == 0 {
      self.target == 0 || self.left > 0
    } else if self.target < 0 {
      self.left > 0
    } else if self.target == 0 {
      improved
    } else {
      improved && self.left > 0
    } ;
    if go_on {
      self.done += 1 ;
      self.left = self.left.saturating_sub(1)
    }
    go_on
  }

  /// True if the budget is a fixed number of iterations that is exhausted.
  pub fn is_exhausted(& self) -> bool {
    self.target != 0 && self.left == 0
  }
}


#[cfg(test)]
mod test {
  use super::Budget ;

  fn run(target: isize, improvements: & [bool]) -> usize {
    let mut budget = Budget::new(target) ;
    let mut improved = true ;
    let mut improvements = improvements.iter() ;
    while budget.next(improved) {
      improved = improvements.next().cloned().unwrap_or(false)
    }
    budget.done()
  }

  #[test]
  fn budgets() {
    assert_eq!( run(-3, & [false, false, false]), 3 ) ;
    assert_eq!( run(0, & [true, true, false]), 3 ) ;
    assert_eq!( run(0, & [false]), 1 ) ;
    assert_eq!( run(2, & [true, true, true]), 2 ) ;
    assert_eq!( run(5, & [true, false]), 2 ) ;
    assert_eq!( run(-1, & []), 1 ) ;
    let mut budget = Budget::new(-1) ;
    assert!( budget.next(false) ) ;
    assert!( budget.is_exhausted() )
  }
}
