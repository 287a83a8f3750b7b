#![doc = r#"Profiling stuff.

In `bench` mode, `Profiler` is a unit structure. Also, all macros are
deactivated, so all profiling is completely removed.
"#]

#[allow(unused_imports)]
use std::time::{ Instant, Duration } ;

use crate::common::* ;

/// Extends duration with a pretty printing.
pub trait DurationExt {
  /// Nice string representation.
  fn to_str(& self) -> String ;
}
impl DurationExt for Duration {
  fn to_str(& self) -> String {
    format!("{}.{:0>9}", self.as_secs(), self.subsec_nanos())
  }
}


/// Maps strings to counters.
pub type Stats = HashMap<String, usize> ;

/// Scopes and their accumulated durations, sorted so that a scope comes
/// right before its sub-scopes.
pub type Timings = Vec< (Vec<& 'static str>, Duration) > ;


/// Profiling structure, only in `not(bench)`.
///
/// Durations are indexed by scopes, which are paths of static strings such as
/// `[ "outer", "middle" ]`. A scope is ticked, then marked, and the time in
/// between accumulates.
///
/// Internally, the structures are wrapped in `RefCell`s so that mutation
/// does not require `& mut self`. A profiler is thus local to a thread.
#[cfg( not(feature = "bench") )]
pub struct Profiler {
  /// Scope-indexed durations, with the instant of the last tick if live.
  map: ::std::cell::RefCell<
    HashMap< Vec<& 'static str>, (Option<Instant>, Duration)>
  >,
  /// Starting tick, for total time.
  start: Instant,
  /// Other statistics.
  stats: ::std::cell::RefCell< Stats >,
}
#[cfg(feature = "bench")]
pub struct Profiler ;
impl Default for Profiler {
  fn default() -> Self { Profiler::new() }
}
impl Profiler {
  /// Constructor.
  #[cfg( not(feature = "bench") )]
  pub fn new() -> Self {
    use std::cell::RefCell ;
    Profiler {
      map: RefCell::new( HashMap::new() ),
      start: Instant::now(),
      stats: RefCell::new( HashMap::new() ),
    }
  }
  /// Constructor.
  #[cfg(feature = "bench")]
  pub fn new() -> Self { Profiler }

  /// Acts on a statistic.
  #[cfg( not(feature = "bench") )]
  pub fn stat_do<F, S>(& self, stat: S, f: F)
  where F: Fn(usize) -> usize, S: Into<String> {
    let stat = stat.into() ;
    let mut map = self.stats.borrow_mut() ;
    let val = map.get(& stat).cloned().unwrap_or(0) ;
    let _ = map.insert(stat, f(val)) ;
    ()
  }

  /// Value of a statistic, zero if it was never touched.
  #[cfg( not(feature = "bench") )]
  pub fn stat(& self, stat: & str) -> usize {
    self.stats.borrow().get(stat).cloned().unwrap_or(0)
  }

  /// Ticks. Ticking a live scope restarts it.
  #[cfg( not(feature = "bench") )]
  pub fn tick(& self, scope: Vec<& 'static str>) {
    debug_assert! { ! scope.is_empty() }
    let mut map = self.map.borrow_mut() ;
    let time = map.entry(scope).or_insert_with(
      || ( None, Duration::from_secs(0) )
    ) ;
    time.0 = Some( Instant::now() )
  }

  /// Registers the time since the last tick.
  ///
  /// Does nothing if the scope is not live.
  #[cfg( not(feature = "bench") )]
  pub fn mark(& self, scope: Vec<& 'static str>) {
    let mut map = self.map.borrow_mut() ;
    if let Some(
      & mut (ref mut tick, ref mut sum)
    ) = map.get_mut(& scope) {
      if let Some(instant) = tick.take() {
        * sum = (* sum) + Instant::now().duration_since(instant)
      }
    } else {
      warn! { "profiling: marking scope {:?} without ticking first", scope }
    }
  }

  /// Time since creation.
  #[cfg( not(feature = "bench") )]
  pub fn total(& self) -> Duration {
    Instant::now().duration_since(self.start)
  }

  /// Extracts the timings and the statistics.
  ///
  /// Scopes still live are closed first.
  #[cfg( not(feature = "bench") )]
  pub fn extract(self) -> (Timings, Stats) {
    let now = Instant::now() ;
    let mut timings: Timings = self.map.into_inner().into_iter().map(
      |(scope, (tick, sum))| {
        let sum = if let Some(instant) = tick {
          sum + now.duration_since(instant)
        } else { sum } ;
        (scope, sum)
      }
    ).collect() ;
    timings.sort_by(|& (ref s_1, _), & (ref s_2, _)| s_1.cmp(s_2)) ;
    ( timings, self.stats.into_inner() )
  }

  /// Prints the timings and the statistics.
  #[cfg( not(feature = "bench") )]
  pub fn print(self, name: & str) {
    let total = self.total() ;
    let (timings, stats) = self.extract() ;
    println!("; |===| {} profiling:", conf.emph(name)) ;
    println!("; total {}s", total.to_str()) ;
    for (scope, time) in timings {
      if let Some(last) = scope.last() {
        println!(
          "; {0: >1$}|- {2}s {3}", "", 2 * scope.len(), time.to_str(), last
        )
      }
    }
    stats.print()
  }
}


/// Provides a debug print function.
pub trait CanPrint {
  /// Debug print (multi-line).
  fn print(& self) ;
}
impl CanPrint for Stats {
  fn print(& self) {
    let mut stats: Vec<_> = self.iter().collect() ;
    stats.sort() ;
    for (stat, count) in stats {
      let stat_len = ::std::cmp::min( 30, stat.len() ) ;
      println!(
        ";   {0: >1$}{2}: {3: >5}",
        "", 30 - stat_len, conf.emph(stat), count
      )
    }
  }
}


#[cfg( all(test, not(feature = "bench")) )]
mod test {
  use super::* ;

  #[test]
  fn ticks_and_stats() {
    let profiler = Profiler::new() ;
    profile! { |profiler| tick "outer" }
    profile! { |profiler| tick "outer", "middle" }
    profile! { |profiler| mark "outer", "middle" }
    profile! { |profiler| mark "outer" }
    profile! { |profiler| "synthesized" => add 3 }
    profile! { |profiler| "synthesized" => add 2 }
    assert_eq!( profiler.stat("synthesized"), 5 ) ;
    assert_eq!( profiler.stat("nothing"), 0 ) ;
    let (timings, stats) = profiler.extract() ;
    let scopes: Vec<_> = timings.into_iter().map(|(s, _)| s).collect() ;
    assert_eq!( scopes, vec![ vec!["outer"], vec!["outer", "middle"] ] ) ;
    assert_eq!( stats.get("synthesized"), Some(& 5) )
  }

  #[test]
  fn wrap_returns_block_value() {
    let profiler = Profiler::new() ;
    let val = profile! { |profiler| wrap { 7 } "block" } ;
    assert_eq!( val, 7 )
  }
}
