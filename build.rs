//! Records the git revision for `--version`.

use std::process::Command ;

/// File the revision goes to.
const REVISION_FILE: & str = "src/common/revision.rs" ;

/// Hash of the current commit, if in a git repository.
fn revision() -> Option<String> {
  let out = Command::new("git").args(
    & [ "rev-parse", "--short", "HEAD" ]
  ).output().ok() ? ;
  if out.status.success() {
    Some( String::from_utf8_lossy(& out.stdout).trim().to_string() )
  } else {
    None
  }
}

fn main() {
  let revision = match revision() {
    Some(rev) => format!("Some(\"{}\")", rev),
    None => "None".to_string(),
  } ;
  let content = format!(
    "\
//! Stores the current revision.

/// The current revision.
pub const REVISION: Option<& str> = {} ;
", revision
  ) ;
  // Only touch the file when the revision changes, so that cargo does not
  // rebuild for nothing.
  let unchanged = ::std::fs::read_to_string(REVISION_FILE).map(
    |old| old == content
  ).unwrap_or(false) ;
  if ! unchanged {
    if let Err(e) = ::std::fs::write(REVISION_FILE, content) {
      panic!("while writing `{}`: {}", REVISION_FILE, e)
    }
  }
  println!("cargo:rerun-if-changed=.git/HEAD")
}
