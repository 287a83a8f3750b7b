//! Attribute tables: a small dataset format and its predicates.
//!
//! A table is a header line of attribute names followed by `class`, then one
//! line per example with one number per attribute and a class, `+` or `-`.
//! Fields are separated by whitespace, `#` starts a comment.
//!
//! ```text
//! # x and y, positive when x <= 2
//! x   y   class
//! 1   0   +
//! 3   1   -
//! ```
//!
//! The predicates of a table are built by [`Table::preds`][preds], see the
//! [`preds`][mod] module.
//!
//! [preds]: struct.Table.html#method.preds (preds function)
//! [mod]: preds/index.html (preds module)

use crate::common::* ;
use crate::concept::{ Class, Dataset, Pred, PredList } ;

pub mod preds ;

/// Keyword ending the header.
const CLASS_KEY: & str = "class" ;


/// Parse error at some line.
fn parse_err<S: Into<String>>(line: usize, msg: S) -> Error {
  ErrorKind::ParseError( line, msg.into() ).into()
}


/// An attribute table.
#[derive(Debug, Clone)]
pub struct Table {
  /// Attribute names.
  attrs: Vec<String>,
  /// Values of the positive examples.
  pos: Vec< Vec<f64> >,
  /// Values of the negative examples.
  neg: Vec< Vec<f64> >,
}

impl Dataset for Table {
  fn pos_count(& self) -> usize { self.pos.len() }
  fn neg_count(& self) -> usize { self.neg.len() }
}

impl Table {
  /// Attribute names.
  pub fn attrs(& self) -> & [String] { & self.attrs }

  /// Examples of a class.
  pub fn examples(& self, class: Class) -> & [ Vec<f64> ] {
    match class {
      Class::Pos => & self.pos,
      Class::Neg => & self.neg,
    }
  }

  /// Values of an attribute over the examples of a class.
  pub fn column(& self, class: Class, attr: usize) -> Vec<f64> {
    self.examples(class).iter().map(|vals| vals[attr]).collect()
  }

  /// Reads a table.
  pub fn read<R: Read>(mut reader: R) -> Res<Self> {
    let mut text = String::new() ;
    reader.read_to_string(& mut text).chain_err(
      || "while reading attribute table"
    ) ? ;
    Self::of_str(& text)
  }

  /// Parses a table.
  pub fn of_str(text: & str) -> Res<Self> {
    let mut attrs: Option< Vec<String> > = None ;
    let (mut pos, mut neg) = (vec![], vec![]) ;

    for (cnt, line) in text.lines().enumerate() {
      let line_no = cnt + 1 ;
      let line = match line.find('#') {
        Some(idx) => & line[.. idx],
        None => line,
      } ;
      let fields: Vec<& str> = line.split_whitespace().collect() ;
      if fields.is_empty() {
        continue
      }

      let names = match attrs {
        None => {
          attrs = Some( Self::parse_header(line_no, & fields) ? ) ;
          continue
        },
        Some(ref names) => names,
      } ;

      if fields.len() != names.len() + 1 {
        bail!(
          parse_err(
            line_no, format!(
              "expected {} value(s) and a class, found {} field(s)",
              names.len(), fields.len()
            )
          )
        )
      }
      let mut vals = Vec::with_capacity( names.len() ) ;
      for (field, name) in fields.iter().zip( names.iter() ) {
        let val: f64 = field.parse().map_err(
          |_| parse_err(
            line_no, format!(
              "illegal value `{}` for attribute `{}`", field, name
            )
          )
        ) ? ;
        if ! val.is_finite() {
          bail!(
            parse_err(
              line_no, format!("value of attribute `{}` is not finite", name)
            )
          )
        }
        vals.push(val)
      }
      match fields[ names.len() ] {
        "+" => pos.push(vals),
        "-" => neg.push(vals),
        class => bail!(
          parse_err(
            line_no, format!("illegal class `{}`, expected `+` or `-`", class)
          )
        ),
      }
    }

    match attrs {
      Some(attrs) => Ok( Table { attrs, pos, neg } ),
      None => bail!( parse_err(1, "no header, the table is empty") ),
    }
  }

  /// Parses the header.
  fn parse_header(line: usize, fields: & [& str]) -> Res< Vec<String> > {
    let (last, names) = match fields.split_last() {
      Some(split) => split,
      None => bail!( parse_err(line, "empty header") ),
    } ;
    if * last != CLASS_KEY {
      bail!(
        parse_err(
          line, format!("header should end with `{}`", CLASS_KEY)
        )
      )
    }
    let mut attrs: Vec<String> = Vec::with_capacity( names.len() ) ;
    for name in names {
      if * name == CLASS_KEY {
        bail!(
          parse_err(line, format!("`{}` is not a legal attribute", CLASS_KEY))
        )
      }
      if attrs.iter().any(|attr| attr == name) {
        bail!( parse_err(line, format!("attribute `{}` appears twice", name)) )
      }
      attrs.push( name.to_string() )
    }
    Ok(attrs)
  }

  /// Predicates of the table.
  pub fn preds(& self) -> Vec<Pred> {
    preds::of_table(self)
  }

  /// Predicate generator over the predicates of the table.
  pub fn pred_gen(& self) -> PredList {
    PredList::new( self, self.preds() )
  }
}


#[cfg(test)]
mod test {
  use super::* ;

  static sample: & str = "\
# two attributes
x  flag  class
1  0     +
2  1     +   # comment
5  0     -

7  1     -
3  1     -
" ;

  #[test]
  fn parsing() {
    let table = Table::of_str(sample).unwrap() ;
    assert_eq!( table.attrs(), & [ "x".to_string(), "flag".to_string() ] ) ;
    assert_eq!( table.pos_count(), 2 ) ;
    assert_eq!( table.neg_count(), 3 ) ;
    assert_eq!( table.column(Class::Pos, 0), vec![1.0, 2.0] ) ;
    assert_eq!( table.column(Class::Neg, 1), vec![0.0, 1.0, 1.0] ) ;
    let table = Table::read( sample.as_bytes() ).unwrap() ;
    assert_eq!( table.neg_count(), 3 )
  }

  fn error_line(text: & str) -> usize {
    match Table::of_str(text) {
      Err(e) => match * e.kind() {
        ErrorKind::ParseError(line, _) => line,
        ref e => panic!("unexpected error {}", e),
      },
      Ok(_) => panic!("parsing should fail on\n{}", text),
    }
  }

  #[test]
  fn errors() {
    assert_eq!( error_line(""), 1 ) ;
    assert_eq!( error_line("# nothing\n\n"), 1 ) ;
    assert_eq!( error_line("x y\n1 2\n"), 1 ) ;
    assert_eq!( error_line("x x class\n"), 1 ) ;
    assert_eq!( error_line("x class\n1 +\n1 2 +\n"), 3 ) ;
    assert_eq!( error_line("x class\n# c\nz +\n"), 3 ) ;
    assert_eq!( error_line("x class\n1 ?\n"), 2 ) ;
    assert_eq!( error_line("x class\ninf +\n"), 2 )
  }
}
