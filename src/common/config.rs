//! Lascer's configuration.
//!
//! Two layers:
//!
//! - [`Config`][config], process-wide output settings (verbosity, colors,
//!   statistics) behind the global `conf` ;
//! - [`LearnConf`][learn], the values the search itself consumes. Library
//!   users build it directly, the binary reads it from the command line.
//!
//! [config]: struct.Config.html (Config struct)
//! [learn]: struct.LearnConf.html (LearnConf struct)

use std::sync::atomic::{ AtomicBool, AtomicUsize, Ordering } ;

use clap::Arg ;
use ansi_term::{ Colour, Style } ;

use crate::errors::* ;
use crate::common::consts ;

/// Clap `Command` with static lifetimes.
pub type App = ::clap::Command<'static> ;
/// Clap `ArgMatches`.
pub type Matches = ::clap::ArgMatches ;


/// Functions all sub-configurations must have.
pub trait SubConf {
  /// Checks the values are legal.
  fn check(& self) -> Res<()> ;
}


/// Which formulas to learn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
  /// Disjunctions of correct concepts.
  Correct,
  /// Conjunctions of complete concepts.
  Complete,
  /// Both.
  Both,
}
impl Target {
  /// Target from a string.
  pub fn of_str(s: & str) -> Option<Self> {
    match s {
      "correct" | "cor" => Some(Target::Correct),
      "complete" | "com" => Some(Target::Complete),
      "both" => Some(Target::Both),
      _ => None,
    }
  }
  /// True if correct formulas are learned.
  pub fn correct(self) -> bool {
    self != Target::Complete
  }
  /// True if complete formulas are learned.
  pub fn complete(self) -> bool {
    self != Target::Correct
  }
}


/// Search configuration.
///
/// Iteration budgets follow a sign convention: `-n` means exactly `n`
/// iterations, `0` means until there is no improvement, `n` means at most `n`
/// iterations with an early stop when there is no improvement.
///
/// Pool minimums: negative means unbounded. For the general pool, `0`
/// deactivates the middle iteration altogether. For the specialized pool,
/// `0` deactivates the admission of directly specialized predicates. For the
/// optimization pools, `0` deactivates the corresponding optimization.
#[derive(Debug, Clone)]
pub struct LearnConf {
  /// Number of overall iterations.
  pub overall_iters: usize,
  /// Outer iteration budget.
  pub outer_iters: isize,
  /// Middle iteration budget.
  pub middle_iters: isize,
  /// Inner iteration budget.
  pub inner_iters: isize,

  /// Minimum retention of the general pool.
  pub general_min: isize,
  /// Minimum retention of the specialized pool.
  pub special_min: isize,
  /// Minimum retention of the scratch pool optimizing a synthesized concept.
  pub opt_special_min: isize,
  /// Minimum retention of the scratch pool optimizing a final formula.
  pub opt_final_min: isize,

  /// Memory efficiency level, between 0 and 2.
  pub mem_efficiency: usize,
  /// Maximum number of literals per synthesized concept, `0` for no limit.
  pub max_literals: usize,

  /// SCP iterations when synthesizing a specialized concept.
  pub synth_scp_iters: usize,
  /// SCP iterations when computing a formula.
  pub formula_scp_iters: usize,
  /// SCP iterations when optimizing a synthesized concept.
  pub opt_special_scp_iters: usize,
  /// SCP iterations when computing the final formula.
  pub final_scp_iters: usize,
  /// SCP iterations when optimizing the final formula.
  pub opt_final_scp_iters: usize,

  /// Complexity of the formula assumed before the first overall iteration.
  pub init_complexity: f64,
  /// Initial cost factor.
  pub cost_factor_init: f64,
  /// Multiplier applied to the cost factor when stuck.
  pub cost_factor_step: f64,
  /// Cost factor cap.
  pub cost_factor_cap: f64,

  /// Number of local sub-problems.
  pub sub_problems: usize,
  /// Probability an unhandled index is treated as handled in a sub-problem.
  pub perturbation: f64,

  /// Seed.
  pub seed: u64,
  /// If true, seed from the wall clock.
  pub random: bool,
  /// If true, boolean predicates are also used inverted.
  pub neg_bool_preds: bool,
  /// If true, also admit non-optimized concepts once a formula is perfect.
  pub extra_concepts: bool,
}
impl Default for LearnConf {
  fn default() -> Self {
    LearnConf {
      overall_iters: 1,
      outer_iters: -1,
      middle_iters: -1,
      inner_iters: 0,
      general_min: -1,
      special_min: -1,
      opt_special_min: -1,
      opt_final_min: -1,
      mem_efficiency: 0,
      max_literals: 0,
      synth_scp_iters: 15,
      formula_scp_iters: 15,
      opt_special_scp_iters: 20,
      final_scp_iters: 40,
      opt_final_scp_iters: 40,
      init_complexity: 0.0,
      cost_factor_init: consts::cost::INIT,
      cost_factor_step: consts::cost::STEP,
      cost_factor_cap: consts::cost::CAP,
      sub_problems: 1,
      perturbation: 0.3,
      seed: consts::SEED,
      random: false,
      neg_bool_preds: false,
      extra_concepts: false,
    }
  }
}
impl SubConf for LearnConf {
  fn check(& self) -> Res<()> {
    if self.overall_iters == 0 {
      bail!( conf_err("the number of overall iterations must be positive") )
    }
    for & (name, val) in & [
      ("concept synthesis", self.synth_scp_iters),
      ("formula", self.formula_scp_iters),
      ("concept optimization", self.opt_special_scp_iters),
      ("final formula", self.final_scp_iters),
      ("final optimization", self.opt_final_scp_iters),
    ] {
      if val == 0 {
        bail!(
          conf_err(
            format!("the number of {} SCP iterations must be positive", name)
          )
        )
      }
    }
    if self.mem_efficiency > 2 {
      bail!(
        conf_err(
          format!(
            "memory efficiency must be between 0 and 2, got {}",
            self.mem_efficiency
          )
        )
      )
    }
    if self.sub_problems == 0 {
      bail!( conf_err("the number of sub-problems must be positive") )
    }
    if ! (0.0 ..= 1.0).contains(& self.perturbation) {
      bail!(
        conf_err(
          format!(
            "perturbation probability must be between 0 and 1, got {}",
            self.perturbation
          )
        )
      )
    }
    if ! (self.init_complexity >= 0.0) {
      bail!( conf_err("initial complexity must be non-negative") )
    }
    if ! (self.cost_factor_init > 0.0) {
      bail!( conf_err("initial cost factor must be positive") )
    }
    if ! (self.cost_factor_step > 1.0) {
      bail!( conf_err("cost factor step must be greater than one") )
    }
    if self.cost_factor_cap < self.cost_factor_init {
      bail!(
        conf_err("cost factor cap must be at least the initial cost factor")
      )
    }
    Ok(())
  }
}
impl LearnConf {
  /// Checks the configuration and returns it.
  pub fn checked(self) -> Res<Self> {
    self.check() ? ;
    Ok(self)
  }

  /// Adds clap options to a clap `App`.
  pub fn add_args(app: App, mut order: usize) -> App {
    let mut order = || {
      order += 1 ;
      order
    } ;

    app.arg(

      Arg::new("overall").long("overall").help(
        "number of overall iterations"
      ).validator(
        int_validator
      ).value_name(
        "int"
      ).default_value(
        "1"
      ).takes_value(true).number_of_values(1).display_order( order() )

    ).arg(

      Arg::new("outer").long("outer").help(
        "outer iterations: -n exactly n, 0 until stuck, n at most n"
      ).validator(
        sint_validator
      ).value_name(
        "int"
      ).default_value(
        "-1"
      ).allow_hyphen_values(true).takes_value(true).number_of_values(
        1
      ).display_order( order() )

    ).arg(

      Arg::new("middle").long("middle").help(
        "middle iterations: -n exactly n, 0 until stuck, n at most n"
      ).validator(
        sint_validator
      ).value_name(
        "int"
      ).default_value(
        "-1"
      ).allow_hyphen_values(true).takes_value(true).number_of_values(
        1
      ).display_order( order() )

    ).arg(

      Arg::new("inner").long("inner").help(
        "inner iterations: -n exactly n, 0 until stuck, n at most n"
      ).validator(
        sint_validator
      ).value_name(
        "int"
      ).default_value(
        "0"
      ).allow_hyphen_values(true).takes_value(true).number_of_values(
        1
      ).display_order( order() )

    ).arg(

      Arg::new("general_min").long("general_min").help(
        "retention of the general pool, negative for unbounded"
      ).validator(
        sint_validator
      ).value_name(
        "int"
      ).default_value(
        "-1"
      ).allow_hyphen_values(true).takes_value(true).number_of_values(
        1
      ).display_order( order() )

    ).arg(

      Arg::new("special_min").long("special_min").help(
        "retention of the specialized pool, negative for unbounded"
      ).validator(
        sint_validator
      ).value_name(
        "int"
      ).default_value(
        "-1"
      ).allow_hyphen_values(true).takes_value(true).number_of_values(
        1
      ).display_order( order() )

    ).arg(

      Arg::new("opt_special_min").long("opt_special_min").help(
        "retention when optimizing a concept, 0 deactivates"
      ).validator(
        sint_validator
      ).value_name(
        "int"
      ).default_value(
        "-1"
      ).allow_hyphen_values(true).takes_value(true).number_of_values(
        1
      ).display_order( order() )

    ).arg(

      Arg::new("opt_final_min").long("opt_final_min").help(
        "retention when optimizing the final formula, 0 deactivates"
      ).validator(
        sint_validator
      ).value_name(
        "int"
      ).default_value(
        "-1"
      ).allow_hyphen_values(true).takes_value(true).number_of_values(
        1
      ).display_order( order() )

    ).arg(

      Arg::new("mem").long("mem").help(
        "memory efficiency level between 0 and 2"
      ).validator(
        |s| bounded_int_validator(s, 0, 2)
      ).value_name(
        "int"
      ).default_value(
        "0"
      ).takes_value(true).number_of_values(1).display_order( order() )

    ).arg(

      Arg::new("max_lits").long("max_lits").help(
        "maximum number of literals per concept, 0 for no limit"
      ).validator(
        int_validator
      ).value_name(
        "int"
      ).default_value(
        "0"
      ).takes_value(true).number_of_values(1).display_order( order() )

    ).arg(

      Arg::new("synth_scp").long("synth_scp").help(
        "SCP iterations when synthesizing a concept"
      ).validator(
        int_validator
      ).value_name(
        "int"
      ).default_value(
        "15"
      ).takes_value(true).number_of_values(1).display_order(
        order()
      ).hide(true)

    ).arg(

      Arg::new("formula_scp").long("formula_scp").help(
        "SCP iterations when computing a formula"
      ).validator(
        int_validator
      ).value_name(
        "int"
      ).default_value(
        "15"
      ).takes_value(true).number_of_values(1).display_order(
        order()
      ).hide(true)

    ).arg(

      Arg::new("opt_special_scp").long("opt_special_scp").help(
        "SCP iterations when optimizing a concept"
      ).validator(
        int_validator
      ).value_name(
        "int"
      ).default_value(
        "20"
      ).takes_value(true).number_of_values(1).display_order(
        order()
      ).hide(true)

    ).arg(

      Arg::new("final_scp").long("final_scp").help(
        "SCP iterations when computing the final formula"
      ).validator(
        int_validator
      ).value_name(
        "int"
      ).default_value(
        "40"
      ).takes_value(true).number_of_values(1).display_order(
        order()
      ).hide(true)

    ).arg(

      Arg::new("opt_final_scp").long("opt_final_scp").help(
        "SCP iterations when optimizing the final formula"
      ).validator(
        int_validator
      ).value_name(
        "int"
      ).default_value(
        "40"
      ).takes_value(true).number_of_values(1).display_order(
        order()
      ).hide(true)

    ).arg(

      Arg::new("init_complexity").long("init_complexity").help(
        "complexity assumed for the formula before the first iteration"
      ).validator(
        float_validator
      ).value_name(
        "float"
      ).default_value(
        "0"
      ).takes_value(true).number_of_values(1).display_order( order() )

    ).arg(

      Arg::new("cost_factor").long("cost_factor").help(
        "initial cost factor"
      ).validator(
        float_validator
      ).value_name(
        "float"
      ).default_value(
        "1.0"
      ).takes_value(true).number_of_values(1).display_order( order() )

    ).arg(

      Arg::new("cost_step").long("cost_step").help(
        "factor raising the cost factor when the search is stuck"
      ).validator(
        float_validator
      ).value_name(
        "float"
      ).default_value(
        "2.0"
      ).takes_value(true).number_of_values(1).display_order( order() )

    ).arg(

      Arg::new("cost_cap").long("cost_cap").help(
        "maximal cost factor"
      ).validator(
        float_validator
      ).value_name(
        "float"
      ).default_value(
        "30.0"
      ).takes_value(true).number_of_values(1).display_order( order() )

    ).arg(

      Arg::new("sub_problems").long("sub_problems").short('p').help(
        "number of sub-problems computed in parallel"
      ).validator(
        int_validator
      ).value_name(
        "int"
      ).default_value(
        "1"
      ).takes_value(true).number_of_values(1).display_order( order() )

    ).arg(

      Arg::new("perturbation").long("perturbation").help(
        "perturbation probability of parallel sub-problems"
      ).validator(
        float_validator
      ).value_name(
        "float"
      ).default_value(
        "0.3"
      ).takes_value(true).number_of_values(1).display_order( order() )

    ).arg(

      Arg::new("seed").long("seed").help(
        "seed of the random generator"
      ).validator(
        int_validator
      ).value_name(
        "int"
      ).default_value(
        "1"
      ).takes_value(true).number_of_values(1).display_order( order() )

    ).arg(

      Arg::new("random").long("random").help(
        "seed the random generator from the clock"
      ).validator(
        bool_validator
      ).value_name(
        bool_format
      ).default_value(
        "off"
      ).takes_value(true).number_of_values(1).display_order( order() )

    ).arg(

      Arg::new("neg_bool").long("neg_bool").help(
        "also use boolean predicates inverted"
      ).validator(
        bool_validator
      ).value_name(
        bool_format
      ).default_value(
        "off"
      ).takes_value(true).number_of_values(1).display_order( order() )

    ).arg(

      Arg::new("extra_concepts").long("extra_concepts").help(
        "admit non-optimized concepts once a formula is perfect"
      ).validator(
        bool_validator
      ).value_name(
        bool_format
      ).default_value(
        "off"
      ).takes_value(true).number_of_values(1).display_order(
        order()
      ).hide(true)

    )
  }

  /// Creates itself from some matches.
  pub fn new(matches: & Matches) -> Res<Self> {
    let mut slf = LearnConf::default() ;
    slf.overall_iters = int_of_matches(matches, "overall") ? ;
    slf.outer_iters = sint_of_matches(matches, "outer") ? ;
    slf.middle_iters = sint_of_matches(matches, "middle") ? ;
    slf.inner_iters = sint_of_matches(matches, "inner") ? ;
    slf.general_min = sint_of_matches(matches, "general_min") ? ;
    slf.special_min = sint_of_matches(matches, "special_min") ? ;
    slf.opt_special_min = sint_of_matches(matches, "opt_special_min") ? ;
    slf.opt_final_min = sint_of_matches(matches, "opt_final_min") ? ;
    slf.mem_efficiency = int_of_matches(matches, "mem") ? ;
    slf.max_literals = int_of_matches(matches, "max_lits") ? ;
    slf.synth_scp_iters = int_of_matches(matches, "synth_scp") ? ;
    slf.formula_scp_iters = int_of_matches(matches, "formula_scp") ? ;
    slf.opt_special_scp_iters = int_of_matches(matches, "opt_special_scp") ? ;
    slf.final_scp_iters = int_of_matches(matches, "final_scp") ? ;
    slf.opt_final_scp_iters = int_of_matches(matches, "opt_final_scp") ? ;
    slf.init_complexity = float_of_matches(matches, "init_complexity") ? ;
    slf.cost_factor_init = float_of_matches(matches, "cost_factor") ? ;
    slf.cost_factor_step = float_of_matches(matches, "cost_step") ? ;
    slf.cost_factor_cap = float_of_matches(matches, "cost_cap") ? ;
    slf.sub_problems = int_of_matches(matches, "sub_problems") ? ;
    slf.perturbation = float_of_matches(matches, "perturbation") ? ;
    slf.seed = int_of_matches(matches, "seed") ? as u64 ;
    slf.random = bool_of_matches(matches, "random") ? ;
    slf.neg_bool_preds = bool_of_matches(matches, "neg_bool") ? ;
    slf.extra_concepts = bool_of_matches(matches, "extra_concepts") ? ;
    slf.checked()
  }
}


/// Everything the binary reads from the command line.
pub struct Cli {
  /// Input file, stdin if none.
  pub file: Option<String>,
  /// Formulas to learn.
  pub target: Target,
  /// Search configuration.
  pub learn: LearnConf,
}

/// Global configuration.
///
/// Settable after creation so that the binary can update the global `conf`
/// once it has parsed its arguments.
pub struct Config {
  /// Verbosity.
  verb: AtomicUsize,
  /// Statistics flag.
  stats: AtomicBool,
  /// Coloring flag.
  colored: AtomicBool,
  /// Styles used when coloring.
  colored_styles: Styles,
  /// Styles used when not coloring.
  plain_styles: Styles,
}
impl Default for Config {
  fn default() -> Self {
    Config {
      verb: AtomicUsize::new(0),
      stats: AtomicBool::new(false),
      colored: AtomicBool::new(false),
      colored_styles: Styles::new(true),
      plain_styles: Styles::new(false),
    }
  }
}
impl ColorExt for Config {
  fn styles(& self) -> & Styles {
    if self.colored.load(Ordering::Relaxed) {
      & self.colored_styles
    } else {
      & self.plain_styles
    }
  }
}
impl Config {
  /// Verbosity level.
  #[inline]
  pub fn verb(& self) -> usize {
    self.verb.load(Ordering::Relaxed)
  }
  /// True if verbose.
  #[inline]
  pub fn verbose(& self) -> bool {
    self.verb() >= 1
  }
  /// True if in debug mode.
  #[inline]
  pub fn debug(& self) -> bool {
    self.verb() >= 2
  }
  /// True if statistics should be printed.
  #[inline]
  pub fn stats(& self) -> bool {
    self.stats.load(Ordering::Relaxed)
  }

  /// Sets the verbosity.
  pub fn set_verb(& self, verb: usize) {
    self.verb.store(verb, Ordering::Relaxed)
  }
  /// Sets the statistics flag.
  pub fn set_stats(& self, stats: bool) {
    self.stats.store(stats, Ordering::Relaxed)
  }
  /// (De)activates coloring.
  pub fn set_color(& self, colored: bool) {
    self.colored.store(colored, Ordering::Relaxed)
  }

  /// Parses command-line arguments, updates itself and returns what the
  /// binary needs.
  pub fn clap(& self) -> Res<Cli> {
    let mut app = App::new( crate_name!() ) ;
    app = Self::add_args(app, 0) ;
    app = LearnConf::add_args(app, 100) ;

    let matches = app.get_matches() ;

    // Input file.
    let file = matches.value_of("input file").map(|s| s.to_string()) ;

    // Verbosity.
    let mut verb = 0 ;
    for _ in 0..matches.occurrences_of("verb") {
      verb += 1
    }
    for _ in 0..matches.occurrences_of("quiet") {
      if verb > 0 {
        verb -= 1
      }
    }
    self.set_verb(verb) ;

    // Colors.
    let color = ::atty::is(::atty::Stream::Stdout) && bool_of_matches(
      & matches, "color"
    ) ? ;
    self.set_color(color) ;

    // Profiling.
    self.set_stats( bool_of_matches(& matches, "stats") ? ) ;

    let target = matches.value_of("target").and_then(Target::of_str).ok_or_else(
      || conf_err("illegal target")
    ) ? ;

    let learn = LearnConf::new(& matches) ? ;

    Ok( Cli { file, target, learn } )
  }

  /// Adds clap options to a clap App.
  pub fn add_args(app: App, mut order: usize) -> App {
    let mut order = || {
      order += 1 ;
      order
    } ;

    app.author( crate_authors!() ).version(
      * crate::common::version
    ).about(
      "Concept induction by iterated greedy set covering."
    ).arg(

      Arg::new("input file").help(
        "sets the input file to use"
      ).index(1).display_order( order() )

    ).arg(

      Arg::new("verb").short('v').help(
        "increases verbosity"
      ).takes_value(false).multiple_occurrences(true).display_order( order() )

    ).arg(

      Arg::new("quiet").short('q').help(
        "decreases verbosity"
      ).takes_value(false).multiple_occurrences(true).display_order( order() )

    ).arg(

      Arg::new("color").long("color").short('c').help(
        "(de)activates coloring (off if output is not a tty)"
      ).validator(
        bool_validator
      ).value_name(
        bool_format
      ).default_value(
        "on"
      ).takes_value(true).number_of_values(1).display_order( order() )

    ).arg(

      Arg::new("stats").long("stats").short('s').help(
        "reports some statistics at the end of the run"
      ).validator(
        bool_validator
      ).value_name(
        bool_format
      ).default_value(
        "no"
      ).takes_value(true).number_of_values(1).display_order( order() )

    ).arg(

      Arg::new("target").long("target").short('t').help(
        "formulas to learn"
      ).possible_values(
        [ "correct", "complete", "both" ]
      ).default_value(
        "both"
      ).takes_value(true).number_of_values(1).display_order( order() )

    )
  }
}


/// Contains some styles for coloring.
#[derive(Debug, Clone)]
pub struct Styles {
  /// Emphasis style.
  emph: Style,
  /// Happy style.
  hap: Style,
  /// Sad style.
  sad: Style,
  /// Bad style.
  bad: Style,
}
impl Default for Styles {
  fn default() -> Self { Styles::new(true) }
}
impl ColorExt for Styles {
  fn styles(& self) -> & Styles { self }
}
impl Styles {
  /// Creates some styles.
  pub fn new(colored: bool) -> Self {
    Styles {
      emph: if colored {
        Style::new().bold()
      } else { Style::new() },
      hap: if colored {
        Colour::Green.normal().bold()
      } else { Style::new() },
      sad: if colored {
        Colour::Yellow.normal().bold()
      } else { Style::new() },
      bad: if colored {
        Colour::Red.normal().bold()
      } else { Style::new() },
    }
  }
}


/// Can color things.
pub trait ColorExt {
  /// The styles in the colorizer: emph, happy, sad, and bad.
  fn styles(& self) -> & Styles ;
  /// String emphasis.
  #[inline]
  fn emph<S: AsRef<str>>(& self, s: S) -> String {
    format!("{}", self.styles().emph.paint(s.as_ref()))
  }
  /// Happy string.
  #[inline]
  fn happy<S: AsRef<str>>(& self, s: S) -> String {
    format!("{}", self.styles().hap.paint(s.as_ref()))
  }
  /// Sad string.
  #[inline]
  fn sad<S: AsRef<str>>(& self, s: S) -> String {
    format!("{}", self.styles().sad.paint(s.as_ref()))
  }
  /// Bad string.
  #[inline]
  fn bad<S: AsRef<str>>(& self, s: S) -> String {
    format!("{}", self.styles().bad.paint(s.as_ref()))
  }
}


/// Format for booleans.
pub static bool_format: & str = "on/true|no/off/false" ;

/// Boolean of a string.
pub fn bool_of_str(s: & str) -> Option<bool> {
  match s {
    "on" | "true" => Some(true),
    "no" | "off" | "false" => Some(false),
    _ => None,
  }
}

/// Retrieves the value of an argument that has a default.
fn value_of<'a>(matches: & 'a Matches, key: & str) -> Res<& 'a str> {
  matches.value_of(key).ok_or_else(
    || conf_err( format!("no value for argument `{}`", key) )
  )
}

/// Boolean of some matches.
pub fn bool_of_matches(matches: & Matches, key: & str) -> Res<bool> {
  let val = value_of(matches, key) ? ;
  bool_of_str(val).ok_or_else(
    || conf_err( format!("expected a boolean for `{}`, got `{}`", key, val) )
  )
}

/// Integer of some matches.
pub fn int_of_matches(matches: & Matches, key: & str) -> Res<usize> {
  let val = value_of(matches, key) ? ;
  val.parse().map_err(
    |_| conf_err( format!("expected an integer for `{}`, got `{}`", key, val) )
  )
}

/// Signed integer of some matches.
pub fn sint_of_matches(matches: & Matches, key: & str) -> Res<isize> {
  let val = value_of(matches, key) ? ;
  val.parse().map_err(
    |_| conf_err( format!("expected an integer for `{}`, got `{}`", key, val) )
  )
}

/// Float of some matches.
pub fn float_of_matches(matches: & Matches, key: & str) -> Res<f64> {
  let val = value_of(matches, key) ? ;
  val.parse().map_err(
    |_| conf_err( format!("expected a float for `{}`, got `{}`", key, val) )
  )
}

/// Validates integer input.
pub fn int_validator(s: & str) -> Result<(), String> {
  match s.parse::<usize>() {
    Ok(_) => Ok(()),
    Err(_) => Err(
      format!("expected an integer, got `{}`", s)
    ),
  }
}

/// Validates signed integer input.
pub fn sint_validator(s: & str) -> Result<(), String> {
  match s.parse::<isize>() {
    Ok(_) => Ok(()),
    Err(_) => Err(
      format!("expected a signed integer, got `{}`", s)
    ),
  }
}

/// Validates float input.
pub fn float_validator(s: & str) -> Result<(), String> {
  match s.parse::<f64>() {
    Ok(_) => Ok(()),
    Err(_) => Err(
      format!("expected a float, got `{}`", s)
    ),
  }
}

/// Validates integer input between some bounds.
pub fn bounded_int_validator(
  s: & str, lo: usize, hi: usize
) -> Result<(), String> {
  match s.parse::<usize>() {
    Ok(val) => if lo <= val && val <= hi {
      Ok(())
    } else {
      Err(
        format!(
          "expected a value between {} and {}, got `{}`", lo , hi, val
        )
      )
    },
    Err(_) => Err(
      format!("expected an integer, got `{}`", s)
    ),
  }
}

/// Validates boolean input.
pub fn bool_validator(s: & str) -> Result<(), String> {
  if bool_of_str(s).is_some() {
    Ok(())
  } else {
    Err(
      format!("expected `on/true` or `off/false`, got `{}`", s)
    )
  }
}


#[cfg(test)]
mod test {
  use super::* ;

  #[test]
  fn default_is_legal() {
    assert!( LearnConf::default().check().is_ok() )
  }

  #[test]
  fn illegal_values() {
    let mut lconf = LearnConf::default() ;
    lconf.overall_iters = 0 ;
    assert!( lconf.check().unwrap_err().is_invalid_conf() ) ;

    let mut lconf = LearnConf::default() ;
    lconf.final_scp_iters = 0 ;
    assert!( lconf.check().unwrap_err().is_invalid_conf() ) ;

    let mut lconf = LearnConf::default() ;
    lconf.mem_efficiency = 3 ;
    assert!( lconf.check().unwrap_err().is_invalid_conf() ) ;

    let mut lconf = LearnConf::default() ;
    lconf.perturbation = 1.5 ;
    assert!( lconf.check().unwrap_err().is_invalid_conf() ) ;

    let mut lconf = LearnConf::default() ;
    lconf.cost_factor_step = 1.0 ;
    assert!( lconf.check().unwrap_err().is_invalid_conf() ) ;
  }

  fn matches(args: & [& 'static str]) -> Matches {
    let app = LearnConf::add_args( App::new("lascer"), 0 ) ;
    let mut all = vec!["lascer"] ;
    all.extend_from_slice(args) ;
    app.try_get_matches_from(all).unwrap()
  }

  #[test]
  fn cost_factor_options() {
    let lconf = LearnConf::new( & matches(& []) ).unwrap() ;
    assert_eq!( lconf.cost_factor_step, consts::cost::STEP ) ;
    assert_eq!( lconf.cost_factor_cap, consts::cost::CAP ) ;

    let lconf = LearnConf::new(
      & matches(& ["--cost_step", "3.5", "--cost_cap", "50"])
    ).unwrap() ;
    assert_eq!( lconf.cost_factor_step, 3.5 ) ;
    assert_eq!( lconf.cost_factor_cap, 50.0 ) ;

    let err = LearnConf::new(
      & matches(& ["--cost_factor", "4", "--cost_cap", "2"])
    ).unwrap_err() ;
    assert!( err.is_invalid_conf() ) ;
    let err = LearnConf::new( & matches(& ["--cost_step", "0.5"]) ).unwrap_err() ;
    assert!( err.is_invalid_conf() )
  }

  #[test]
  fn targets() {
    assert_eq!( Target::of_str("correct"), Some(Target::Correct) ) ;
    assert_eq!( Target::of_str("both"), Some(Target::Both) ) ;
    assert_eq!( Target::of_str("nope"), None ) ;
    assert!( Target::Both.correct() && Target::Both.complete() ) ;
    assert!( ! Target::Correct.complete() ) ;
  }
}
