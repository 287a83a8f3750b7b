//! Macros.


/// Prints a line prefixed by `; `, one prefix per line of the message.
#[macro_export]
macro_rules! log_line {
  ($($tt:tt)*) => ({
    for line in format!( $($tt)* ).lines() {
      println!("; {}", line)
    }
  }) ;
}


/// Warning, always printed unless in bench mode.
#[macro_export]
#[cfg(not(feature = "bench"))]
macro_rules! warn {
  ($($tt:tt)*) => ({
    let msg = format!( $($tt)* ) ;
    log_line!{ "{} {}", conf.sad("|===| warning:"), msg }
  }) ;
}
#[cfg(feature = "bench")]
macro_rules! warn {
  ($($tt:tt)*) => (()) ;
}


/// Gates something by an `if conf.verbose()`. Inactive in bench mode.
#[macro_export]
#[cfg(not(feature = "bench"))]
macro_rules! if_verb {
  ($($blah:tt)*) => (
    if conf.verbose() {
      $($blah)*
    }
  ) ;
}
#[cfg(feature = "bench")]
macro_rules! if_verb {
  ($($blah:tt)*) => (()) ;
}


/// Logs at info level. Inactive in bench mode.
#[macro_export]
#[cfg(feature = "bench")]
macro_rules! log_info {
  ($($tt:tt)*) => (()) ;
}
#[cfg(not(feature = "bench"))]
macro_rules! log_info {
  ($($tt:tt)*) => (
    if conf.verbose() {
      log_line!{ $($tt)* }
    }
  ) ;
}


/// Logs at debug level. Inactive in bench mode.
#[macro_export]
#[cfg( feature = "bench" )]
macro_rules! log_debug {
  ($($tt:tt)*) => (()) ;
}
#[cfg( not(feature = "bench") )]
macro_rules! log_debug {
  ($($tt:tt)*) => (
    if conf.debug() {
      log_line!{ $($tt)* }
    }
  ) ;
}


/// Profiling macro.
///
/// If passed `self`, assumes `self` has a `_profiler` field.
#[macro_export]
#[cfg( not(feature = "bench") )]
macro_rules! profile {
  ( | $prof:ident | wrap $b:block $( $scope:expr ),+ $(,)* ) => ({
    profile! { | $prof | tick $($scope),+ }
    let res = $b ;
    profile! { | $prof | mark $($scope),+ }
    res
  }) ;
  ( | $prof:ident | $stat:expr => add $e:expr ) => (
    $prof.stat_do( $stat, |val| val + $e )
  ) ;
  ( | $prof:ident | $meth:ident $( $scope:expr ),+ $(,)* ) => (
    $prof.$meth(
      vec![ $($scope),+ ]
    )
  ) ;
  ( $slf:ident wrap $b:block $( $scope:expr ),+ $(,)* ) => ({
    let prof = & $slf._profiler ;
    profile!{ |prof| wrap $b $($scope),+ }
  }) ;
  ( $slf:ident $stat:expr => add $e:expr ) => ({
    let prof = & $slf._profiler ;
    profile!{ |prof| $stat => add $e }
  }) ;
  ( $slf:ident $meth:ident $( $scope:expr ),+ $(,)* ) => ({
    let prof = & $slf._profiler ;
    profile!{ |prof| $meth $($scope),+ }
  }) ;
}
#[cfg(feature = "bench")]
macro_rules! profile {
  ( | $prof:ident | wrap $b:block $( $tt:tt )* ) => ($b) ;
  ( $slf:ident wrap $b:block $( $tt:tt )* ) => ($b) ;
  ( $($tt:tt)* ) => (()) ;
}


/// Asserts something only in debug mode.
///
/// Checks that are too expensive for `debug_assert!` alone go through this,
/// the body is not even compiled in release.
#[macro_export]
macro_rules! debug_check {
  ($($blah:tt)*) => (
    #[cfg(debug_assertions)] {
      $($blah)*
    }
  ) ;
}
