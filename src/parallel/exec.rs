//! Executors for batches of work units.

use std::sync::mpsc::channel ;

use crate::common::* ;

use super::{ Partial, SharedConcepts, WorkUnit } ;

/// Computes batches of work units.
pub trait Executor {
  /// Computes some units, returns one partial solution per unit in the
  /// order of the units.
  fn execute(& self, units: Vec<WorkUnit>) -> Res< Vec<Partial> > ;
  /// Short description of the executor.
  fn description(& self) -> String ;
}


/// Computes the units one after the other.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential ;

impl Executor for Sequential {
  fn execute(& self, units: Vec<WorkUnit>) -> Res< Vec<Partial> > {
    let shared = SharedConcepts::new() ;
    let mut partials = Vec::with_capacity( units.len() ) ;
    for unit in units {
      partials.push( unit.compute(& shared) ? )
    }
    Ok(partials)
  }
  fn description(& self) -> String {
    "sequential".into()
  }
}


/// Messages from the workers.
enum FromWorker {
  /// A partial solution.
  Done(Partial),
  /// An error.
  Err(Error),
}


/// Computes each unit in its own thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Threaded ;

impl Executor for Threaded {
  fn execute(& self, units: Vec<WorkUnit>) -> Res< Vec<Partial> > {
    let count = units.len() ;
    let shared = Arc::new( SharedConcepts::new() ) ;
    let (sender, receiver) = channel() ;
    let mut handles = Vec::with_capacity(count) ;

    for unit in units {
      let idx = unit.idx ;
      let name = format!("lascer worker #{}", idx) ;
      let sender: Sender<(usize, FromWorker)> = sender.clone() ;
      let shared = shared.clone() ;
      let handle = ::std::thread::Builder::new().name( name.clone() ).spawn(
        move || {
          let msg = match unit.compute(& shared) {
            Ok(partial) => FromWorker::Done(partial),
            Err(e) => FromWorker::Err(e),
          } ;
          // The receiver only hangs up after an error.
          let _ = sender.send( (idx, msg) ) ;
        }
      ).chain_err(
        || format!("while spawning {}", conf.emph(& name))
      ) ? ;
      handles.push(handle)
    }
    drop(sender) ;

    let mut partials: Vec< Option<Partial> > = vec![ None ; count ] ;
    let mut received = 0 ;
    while received < count {
      match receiver.recv() {
        Ok( (idx, FromWorker::Done(partial)) ) => {
          if let Some(slot) = partials.get_mut(idx) {
            * slot = Some(partial)
          }
          received += 1
        },
        Ok( (idx, FromWorker::Err(e)) ) => {
          let res: Res<()> = Err(e) ;
          res.chain_err( || format!("from worker #{}", idx) ) ? ;
        },
        Err(_) => bail!(
          ErrorKind::Executor(
            format!(
              "{} of {} worker(s) died before returning a result",
              count - received, count
            )
          )
        ),
      }
    }

    for handle in handles {
      if handle.join().is_err() {
        bail!( ErrorKind::Executor("a worker panicked".into()) )
      }
    }

    let mut res = Vec::with_capacity(count) ;
    for (idx, partial) in partials.into_iter().enumerate() {
      match partial {
        Some(partial) => res.push(partial),
        None => bail!(
          ErrorKind::Executor(
            format!("no result for worker #{}", idx)
          )
        ),
      }
    }
    Ok(res)
  }
  fn description(& self) -> String {
    "threaded".into()
  }
}
