//! Lascer learns classification formulas from positive and negative
//! examples by iterated greedy set covering.
//!
//! A formula is either a disjunction of *correct* concepts (conjunctions
//! holding on no negative example), or a conjunction of *complete* concepts
//! (disjunctions holding on every positive example). The search
//! [alternates][facade] between building general concepts from predicates
//! and synthesizing specialized ones from them, each step being a weighted
//! [set covering problem][cover] over concept [pools][store]. The best
//! formula minimizes the number of errors first, and its complexity second.
//!
//! [facade]: facade/index.html (facade module)
//! [cover]: cover/index.html (cover module)
//! [store]: store/index.html (store module)

#![doc(test(attr(deny(warnings))))]

#![allow(non_upper_case_globals)]
#[macro_use]
extern crate lazy_static ;
#[macro_use]
extern crate error_chain ;
#[macro_use]
extern crate clap ;

pub mod errors ;
#[macro_use]
pub mod common ;
pub mod cover ;
pub mod concept ;
pub mod store ;
pub mod optim ;
pub mod parallel ;
pub mod facade ;
pub mod data ;

#[cfg(test)]
mod tests ;

use crate::common::* ;
use crate::concept::{ Concept, Dataset, Factory, Gen } ;
use crate::data::Table ;
use crate::facade::Facade ;


/// Formulas learned on some input.
pub struct Learned {
  /// Best correct formula, if learned.
  pub correct: Option<Concept>,
  /// Best complete formula, if learned.
  pub complete: Option<Concept>,
  /// Best formula overall.
  pub best: Concept,
}

impl Learned {
  /// Prints the formulas.
  pub fn print(& self) {
    let formulas = [
      ("correct", self.correct.as_ref()),
      ("complete", self.complete.as_ref()),
    ] ;
    for & (name, formula) in & formulas {
      if let Some(formula) = formula {
        let errors = formula.errors() ;
        let errors = if errors == 0 {
          conf.happy("0 error")
        } else {
          conf.sad( format!("{} error(s)", errors) )
        } ;
        println!(
          "{} formula ({}, complexity {}):", conf.emph(name), errors,
          formula.complexity()
        ) ;
        println!("  {}", formula.get())
      }
    }
  }
}


/// Parses command-line arguments and works.
pub fn work() -> Res<()> {
  let Cli { file, target, learn } = conf.clap() ? ;

  let learned = if let Some(file_path) = file {
    use std::fs::OpenOptions ;
    let file = OpenOptions::new().read(true).open(& file_path).chain_err(
      || format!("while opening input file `{}`", conf.emph(& file_path))
    ) ? ;
    read_and_work(file, target, learn) ?
  } else {
    let stdin = ::std::io::stdin() ;
    read_and_work(stdin, target, learn) ?
  } ;

  learned.print() ;
  Ok(())
}


/// Reads an attribute table from a `Read`er and learns the formulas of a
/// target.
pub fn read_and_work<R: Read>(
  reader: R, target: Target, learn: LearnConf
) -> Res<Learned> {
  let profiler = Profiler::new() ;

  let table = profile! {
    |profiler| wrap { Table::read(reader) } "parsing"
  } ? ;
  log_info! {
    "{} positive and {} negative example(s) over {} attribute(s)",
    table.pos_count(), table.neg_count(),
    table.attrs().len()
  }

  let fact = Factory::new(& table) ;
  let gens: Vec<Gen> = vec![ Arc::new( table.pred_gen() ) ] ;
  let mut facade = Facade::new(fact, gens, learn) ? ;

  let best = profile! {
    |profiler| wrap { facade.learn(target) } "learning"
  } ? ;

  let learned = Learned {
    correct: if target.correct() {
      Some( facade.best_correct().clone() )
    } else { None },
    complete: if target.complete() {
      Some( facade.best_complete().clone() )
    } else { None },
    best,
  } ;

  facade.print_stats() ;
  print_stats("top", profiler) ;
  Ok(learned)
}
