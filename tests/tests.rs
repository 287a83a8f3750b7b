//! Top-level tests on the datasets in `rsc`.
#![allow(non_upper_case_globals)]

extern crate lascer;

use std::fs::read_dir;
use std::fs::OpenOptions;
use std::path::Path;

use lascer::common::*;
use lascer::read_and_work;

static separable_files_dir: &str = "rsc/separable";
static noisy_files_dir: &str = "rsc/noisy";
static err_files_dir: &str = "rsc/error";

macro_rules! run {
    ($f:expr) => {
        if let Err(e) = $f {
            println!("Error:");
            for e in e.iter() {
                let mut pref = "> ";
                for line in format!("{}", e).lines() {
                    println!("{}{}", pref, line);
                    pref = "  "
                }
            }
            panic!("failure")
        }
    };
}

#[test]
fn separable() {
    run!(for_files(separable_files_dir, run_separable_on))
}

#[test]
fn separable_correct_only() {
    run!(run_target_on("rsc/separable/square.txt", Target::Correct))
}

#[test]
fn separable_complete_only() {
    run!(run_target_on("rsc/separable/square.txt", Target::Complete))
}

#[test]
fn noisy() {
    run!(for_files(noisy_files_dir, run_noisy_on))
}

#[test]
fn err() {
    run!(for_files(err_files_dir, run_err_on))
}

macro_rules! map_err {
  ($e:expr, $msg:expr) => (
    $e.map_err( |e| format!("{}:\n{}", $msg, e) ) ?
  ) ;
  ($e:expr, $($tt:tt)*) => (
    $e.map_err( |e| format!("{}:\n{}", format!($($tt)*), e) ) ?
  ) ;
}

/// Runs something on all the files of a directory.
fn for_files<F>(dir: &str, f: F) -> Res<()>
where
    F: Fn(&Path) -> Res<()>,
{
    let files = map_err!(read_dir(dir), format!("while reading `{}`", dir));

    for entry in files {
        let entry = map_err!(entry, "while reading entry");
        let file_name = format!("{}", entry.file_name().to_string_lossy());
        if map_err!(
            entry.file_type(),
            "while reading entry (file type of `{}`)",
            file_name
        ).is_file()
        {
            f(&entry.path())?
        }
    }

    Ok(())
}

fn learn_on(path: &Path, target: Target) -> Res<lascer::Learned> {
    println!("looking at `{}`", path.display());
    let file = OpenOptions::new()
        .read(true)
        .open(path)
        .chain_err(|| format!("while opening file {}", path.display()))?;
    read_and_work(file, target, LearnConf::default())
}

fn run_separable_on(path: &Path) -> Res<()> {
    let learned =
        learn_on(path, Target::Both).chain_err(|| "while reading file and learning")?;
    let errors = learned.best.errors();
    if errors != 0 {
        return Err(format!(
            "got {} error(s) on `{}`, expected none",
            errors,
            path.display()
        ).into());
    }
    match (learned.correct, learned.complete) {
        (Some(correct), Some(complete)) => {
            if !correct.is_correct() || !complete.is_complete() {
                return Err(format!("illegal formulas on `{}`", path.display()).into());
            }
        }
        _ => return Err(format!("missing formulas on `{}`", path.display()).into()),
    }
    println!("- is okay");
    Ok(())
}

fn run_target_on<P: AsRef<Path> + ?Sized>(path: &P, target: Target) -> Res<()> {
    let path = path.as_ref();
    let learned = learn_on(path, target)?;
    let formula = match target {
        Target::Correct => {
            if learned.complete.is_some() {
                return Err("learned a complete formula, expected correct only".into());
            }
            learned.correct
        }
        Target::Complete => {
            if learned.correct.is_some() {
                return Err("learned a correct formula, expected complete only".into());
            }
            learned.complete
        }
        Target::Both => Some(learned.best.clone()),
    };
    match formula {
        Some(ref formula) if formula.errors() == 0 && *formula == learned.best => {
            println!("- is okay");
            Ok(())
        }
        Some(formula) => Err(format!(
            "got {} error(s) on `{}`, expected none",
            formula.errors(),
            path.display()
        ).into()),
        None => Err(format!("no formula on `{}`", path.display()).into()),
    }
}

fn run_noisy_on(path: &Path) -> Res<()> {
    let learned = learn_on(path, Target::Both)?;
    if learned.best.errors() == 0 {
        return Err(format!(
            "no error on `{}`, inconsistent examples cannot be separated",
            path.display()
        ).into());
    }
    println!("- is okay");
    Ok(())
}

fn run_err_on(path: &Path) -> Res<()> {
    match learn_on(path, Target::Both) {
        Err(ref e) if e.is_parse_error() => {
            println!("got {}", e);
            Ok(())
        }
        Err(e) => Err(format!(
            "expected parse error on `{}`, got {}",
            path.display(),
            e
        ).into()),
        Ok(_) => Err(format!("expected error on `{}`, got formulas", path.display()).into()),
    }
}
