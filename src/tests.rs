//! Scenario tests over the whole search.

use crate::common::* ;
use crate::concept::{
  Concept, ConceptSet, Fact, Factory, Gen, PredList, Pred, TablePred
} ;
use crate::data::Table ;
use crate::facade::Facade ;
use crate::optim::{ optimize_final, special_candidates } ;
use crate::parallel::{ merge, Partial, Sequential, Threaded } ;
use crate::store::{ ConceptStore, Flavor, StoreConf } ;

/// Positive iff both coordinates are at most `2`.
static square: & str = "\
x y class
1 1 +
2 1 +
1 2 +
2 2 +
3 1 -
1 3 -
3 3 -
4 2 -
" ;

macro_rules! run {
  ($f:expr) => (
    if let Err(e) = $f {
      println!("Error:") ;
      for e in e.iter() {
        let mut pref = "> " ;
        for line in format!("{}", e).lines() {
          println!("{}{}", pref, line) ;
          pref = "  "
        }
      }
      panic!("failure")
    }
  ) ;
}

fn store(fact: & Fact, flavor: Flavor, seed: u64) -> ConceptStore {
  let store_conf = StoreConf::of_learn_conf( & LearnConf::default() ) ;
  ConceptStore::new(
    flavor, fact.clone(), store_conf, 0.0, 1.0, mk_rng(seed, false)
  )
}

/// Random predicates over `pos_count` positives and `neg_count` negatives.
fn random_preds(
  pos_count: usize, neg_count: usize, count: usize, rng: & mut Rand
) -> Vec<Pred> {
  (0 .. count).map(
    |n| {
      let pos: IdxSet = (0 .. pos_count).filter(
        |_| rng.gen_bool(0.4)
      ).collect() ;
      let neg: IdxSet = (0 .. neg_count).filter(
        |_| rng.gen_bool(0.3)
      ).collect() ;
      let cmpl = rng.gen_range(1.0 .. 3.0) ;
      TablePred::new( format!("p_{}", n), cmpl, pos, neg ).share()
    }
  ).collect()
}

/// Random table over two attributes.
fn random_table(rng: & mut Rand, count: usize) -> Table {
  let mut text = "x y class\n".to_string() ;
  for _ in 0 .. count {
    let (x, y) = ( rng.gen_range(0 .. 6), rng.gen_range(0 .. 6) ) ;
    let class = if rng.gen_bool(0.5) { "+" } else { "-" } ;
    text.push_str( & format!("{} {} {}\n", x, y, class) )
  }
  // At least one example of each class.
  text.push_str("0 0 +\n5 5 -\n") ;
  match Table::of_str(& text) {
    Ok(table) => table,
    Err(e) => panic!("illegal random table:\n{}", e),
  }
}

fn facade_of(
  table: & Table, lconf: LearnConf, threaded: bool
) -> Res<Facade> {
  let fact = Factory::new(table) ;
  let gens: Vec<Gen> = vec![ Arc::new( table.pred_gen() ) ] ;
  if threaded {
    Facade::with_executor( fact, gens, lconf, Box::new(Threaded) )
  } else {
    Facade::with_executor( fact, gens, lconf, Box::new(Sequential) )
  }
}


#[test]
fn necessity_of_specialized_concepts() {
  let fact = Factory::of_counts(5, 5) ;
  let lit = |name: & str, pos: & [usize]| fact.lit(
    TablePred::new(
      name, 1.0, pos.iter().cloned().collect(), IdxSet::new()
    ).share(), false
  ) ;
  let (uno, dos, tres) = (
    lit("uno", & [0, 1, 2]), lit("dos", & [2, 3]), lit("tres", & [3, 4])
  ) ;
  let mut store = store(& fact, Flavor::Correct, 0) ;
  store.admit_all( vec![ uno.clone(), dos.clone(), tres.clone() ] ) ;

  let registry = store.special_pool().registry() ;
  registry.check().unwrap() ;
  let (zero_one, four): (IdxSet, IdxSet) = (
    vec![0, 1].into_iter().collect(), Some(4).into_iter().collect()
  ) ;
  assert_eq!( registry.exclusive(& uno), Some(& zero_one) ) ;
  assert_eq!( registry.exclusive(& tres), Some(& four) ) ;
  assert!( ! registry.is_necessary(& dos) ) ;
  assert_eq!( registry.non_necessary_subsets(), vec![ dos.clone() ] ) ;
  for idx in 0 .. 5 {
    let expected = if idx == 2 || idx == 3 { 2 } else { 1 } ;
    assert_eq!( registry.coverage(idx), expected )
  }
}

#[test]
fn necessity_partition_under_admissions() {
  let mut rng = mk_rng(11, false) ;
  for round in 0 .. 10 {
    let fact = Factory::of_counts(8, 4) ;
    let preds = random_preds(8, 4, 15, & mut rng) ;
    let mut store = store(& fact, Flavor::Correct, round) ;
    for pred in preds {
      store.admit_pred(pred, false) ;
      let registry = store.special_pool().registry() ;
      registry.check().unwrap() ;
      for idx in 0 .. 8 {
        let exclusive = store.special_concepts().into_iter().filter(
          |concept| registry.exclusive(concept).map(
            |elems| elems.contains(idx)
          ).unwrap_or(false)
        ).count() ;
        match registry.coverage(idx) {
          1 => assert_eq!( exclusive, 1 ),
          _ => assert_eq!( exclusive, 0 ),
        }
      }
    }
  }
}

#[test]
fn exclusive_literals_are_all_needed() {
  let fact = Factory::of_counts(3, 2) ;
  let lits: Vec<Concept> = (0 .. 3).map(
    |idx| {
      let pos: IdxSet = Some(idx).into_iter().collect() ;
      let pred = TablePred::new(
        format!("p_{}", idx), 1.0, pos, IdxSet::new()
      ).share() ;
      fact.lit(pred, false)
    }
  ).collect() ;
  for iters in 1 .. 5 {
    let mut store = store(& fact, Flavor::Correct, 7) ;
    store.admit_all( lits.iter().cloned() ) ;
    let formula = store.best_formula(iters, None) ;
    assert_eq!( formula.errors(), 0 ) ;
    assert!( formula.is_disj() ) ;
    assert_eq!( formula.sub_count(), 3 ) ;
    for lit in & lits {
      assert!( formula.sub_concepts().contains(lit) )
    }
  }
}

#[test]
fn admission_respects_flavors() {
  let mut rng = mk_rng(42, false) ;
  for round in 0 .. 10 {
    let fact = Factory::of_counts(6, 5) ;
    let preds = random_preds(6, 5, 12, & mut rng) ;
    for flavor in & Flavor::all() {
      let mut store = store(& fact, * flavor, round) ;
      store.regenerate_general(false) ;
      for pred in & preds {
        store.admit_pred( pred.clone(), false ) ;
        store.admit_pred( pred.clone(), true ) ;
      }
      for concept in store.special_concepts() {
        assert!( flavor.is_special(& concept) ) ;
        assert!( concept.is_meaningful() )
      }
      for concept in store.general_concepts() {
        assert!( ! flavor.is_special(& concept) )
      }
    }
  }
}

#[test]
fn admission_is_idempotent() {
  let mut rng = mk_rng(7, false) ;
  let fact = Factory::of_counts(6, 5) ;
  let preds = random_preds(6, 5, 10, & mut rng) ;
  for flavor in & Flavor::all() {
    let mut store = store(& fact, * flavor, 0) ;
    store.regenerate_general(false) ;
    for pred in & preds {
      store.admit_pred( pred.clone(), false ) ;
    }
    let (special, general) = ( store.special_count(), store.general_count() ) ;
    for pred in & preds {
      assert!( ! store.admit_pred( pred.clone(), false ) )
    }
    assert_eq!( store.special_count(), special ) ;
    assert_eq!( store.general_count(), general )
  }
}

#[test]
fn formulas_never_regress() {
  let mut rng = mk_rng(13, false) ;
  let lconf = LearnConf::default() ;
  for round in 0 .. 10 {
    let fact = Factory::of_counts(6, 5) ;
    let preds = random_preds(6, 5, 10, & mut rng) ;
    let gens: Vec<Gen> = vec![
      Arc::new( PredList::new(& * fact, preds.clone()) )
    ] ;
    for flavor in & Flavor::all() {
      let mut store = store(& fact, * flavor, round) ;
      for pred in & preds {
        store.admit_pred( pred.clone(), false ) ;
      }
      let known = store.best_formula(1, None) ;
      for iters in 1 .. 4 {
        let formula = store.best_formula( iters, Some(& known) ) ;
        assert!( ! known.is_better(& formula) )
      }
      let optimized = optimize_final(
        & store, special_candidates(& store, & gens), & known,
        & lconf, & mut rng
      ).unwrap() ;
      assert!( ! known.is_better(& optimized) )
    }
  }
}

#[test]
fn merging_random_partials() {
  let mut rng = mk_rng(3, false) ;
  let fact = Factory::of_counts(6, 5) ;
  let preds = random_preds(6, 5, 12, & mut rng) ;
  let mut store = store(& fact, Flavor::Correct, 0) ;
  for pred in & preds {
    store.admit_pred( pred.clone(), false ) ;
  }
  let concepts = store.special_concepts() ;

  for _ in 0 .. 20 {
    let mut partials = vec![] ;
    for _ in 0 .. rng.gen_range(1 .. 5) {
      let subs: Vec<Concept> = concepts.iter().filter(
        |_| rng.gen_bool(0.5)
      ).cloned().collect() ;
      let mut set = ConceptSet::new() ;
      for concept in & subs {
        set.insert( concept.clone() ) ;
      }
      partials.push(
        Partial::new( set, fact.disj(subs), rng.gen_bool(0.2) )
      )
    }
    let merged = match merge( partials.clone() ) {
      Some(merged) => merged,
      None => panic!("no merge result on non-empty partials"),
    } ;
    for partial in & partials {
      assert!( ! partial.formula.is_better(& merged.formula) ) ;
      for concept in partial.concepts.iter() {
        assert!( merged.concepts.contains(concept) )
      }
    }
    assert_eq!(
      merged.improvable, partials.iter().any(|partial| partial.improvable)
    )
  }
}

#[test]
fn sequential_and_threaded_on_square() {
  run!( sequential_and_threaded() )
}

fn sequential_and_threaded() -> Res<()> {
  let table = Table::of_str(square) ? ;
  for threaded in & [false, true] {
    let lconf = LearnConf { sub_problems: 3, .. LearnConf::default() } ;
    let mut facade = facade_of(& table, lconf, * threaded) ? ;
    let best = facade.learn(Target::Both) ? ;
    if best.errors() != 0 {
      bail!(
        "{} error(s) on a separable table ({})", best.errors(),
        if * threaded { "threaded" } else { "sequential" }
      )
    }
    assert!( facade.best_correct().is_correct() ) ;
    assert!( facade.best_complete().is_complete() )
  }
  Ok(())
}

#[test]
fn learning_on_random_tables_is_monotonic() {
  run!( monotonic() )
}

fn monotonic() -> Res<()> {
  let mut rng = mk_rng(99, false) ;
  for round in 0 .. 4 {
    let table = random_table(& mut rng, 8) ;
    let lconf = LearnConf {
      overall_iters: 1, seed: round, .. LearnConf::default()
    } ;
    let mut facade = facade_of(& table, lconf, false) ? ;
    let fact = facade.factory().clone() ;
    let mut correct = Flavor::Correct.empty_formula(& fact) ;
    let mut complete = Flavor::Complete.empty_formula(& fact) ;
    for _ in 0 .. 3 {
      facade.learn(Target::Both) ? ;
      if correct.is_better( facade.best_correct() ) {
        bail!("best correct formula regressed")
      }
      if complete.is_better( facade.best_complete() ) {
        bail!("best complete formula regressed")
      }
      correct = facade.best_correct().clone() ;
      complete = facade.best_complete().clone()
    }
  }
  Ok(())
}
