//! Entry point for the binary.

extern crate lascer ;

use lascer::common::* ;

fn main() {
  // Work and report error if any.
  if let Err(errs) = ::lascer::work() {
    print_err(& errs) ;
    ::std::process::exit(2)
  } else {
    ::std::process::exit(0)
  }
}
