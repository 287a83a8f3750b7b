//! Error types.
//!
//! Running out of candidates is not an error: synthesis and optimization
//! return `None` or fall back on whatever they were given. The errors below
//! are the fatal ones.
//!
//! - [`ErrorKind::InvalidConf`][conf], a configuration value the search
//!   cannot work with, raised when building the configuration or the facade ;
//! - [`ErrorKind::Executor`][exec], a worker of the parallel decomposition
//!   died or disconnected ;
//! - [`ErrorKind::NotCombinable`][comb], a literal showed up where a
//!   conjunction or disjunction is required, this is a bug.
//!
//! [conf]: enum.ErrorKind.html#variant.InvalidConf
//! (InvalidConf variant of the ErrorKind enum)
//! [exec]: enum.ErrorKind.html#variant.Executor
//! (Executor variant of the ErrorKind enum)
//! [comb]: enum.ErrorKind.html#variant.NotCombinable
//! (NotCombinable variant of the ErrorKind enum)

use crate::common::* ;

error_chain!{
  types {
    Error, ErrorKind, ResultExt, Res ;
  }

  foreign_links {
    Io(::std::io::Error) #[doc = "IO error."] ;
  }

  errors {
    #[doc = "Illegal configuration value."]
    InvalidConf(msg: String) {
      description("invalid configuration")
      display("invalid configuration: {}", msg)
    }
    #[doc = "A sub-problem could not be computed."]
    Executor(msg: String) {
      description("executor failure")
      display("executor failure: {}", msg)
    }
    #[doc = "A literal was used as a conjunction or disjunction."]
    NotCombinable(concept: String) {
      description("concept is not combinable")
      display("[bug] concept `{}` is neither a conjunction nor a disjunction", concept)
    }
    #[doc = "Parse error in a dataset."]
    ParseError(line: usize, msg: String) {
      description("parse error")
      display("parse error at line {}: {}", line, msg)
    }
  }
}

impl Error {
  /// True if the kind of the error is [`ErrorKind::InvalidConf`][conf].
  ///
  /// [conf]: enum.ErrorKind.html#variant.InvalidConf
  /// (ErrorKind's InvalidConf variant)
  pub fn is_invalid_conf(& self) -> bool {
    match * self.kind() {
      ErrorKind::InvalidConf(_) => true,
      _ => false,
    }
  }

  /// True if the kind of the error is [`ErrorKind::Executor`][exec].
  ///
  /// [exec]: enum.ErrorKind.html#variant.Executor
  /// (ErrorKind's Executor variant)
  pub fn is_executor(& self) -> bool {
    match * self.kind() {
      ErrorKind::Executor(_) => true,
      _ => false,
    }
  }

  /// True if the kind of the error is a parse error.
  pub fn is_parse_error(& self) -> bool {
    match * self.kind() {
      ErrorKind::ParseError(_, _) => true,
      _ => false,
    }
  }
}


/// Invalid configuration error.
pub fn conf_err<S: Into<String>>(msg: S) -> Error {
  ErrorKind::InvalidConf( msg.into() ).into()
}


/// Prints an error.
pub fn print_err(errs: & Error) {
  println!(
    "({} \"", conf.bad("error")
  ) ;
  for err in errs.iter() {
    for line in format!("{}", err).lines() {
      println!("  {}", line)
    }
  }
  println!("\")")
}
