//! ```
//! use bunkai::prelude::*;
//!
//! // Tokens come from an external morphological analyzer; here the
//! // MeCab-format output is parsed directly.
//! let tokens = parse_analysis(
//!   "行っ\t動詞,自立,*,*,五段・カ行促音便,連用タ接続,行く,イッ,イッ\nた\t助動詞,*,*,*,特殊・タ,基本形,た,タ,タ\nEOS\n",
//! );
//!
//! let units = resolve_sentence(&tokens);
//! assert_eq!(1, units.len());
//! assert_eq!("行った", units[0].surface());
//! assert_eq!("行く", units[0].dictionary_form());
//!
//! let mut known = KnownSets::new();
//! let extraction = extract_kanji_and_vocabulary(&units, &mut known);
//! assert_eq!(vec!['行'], extraction.new_kanji);
//! assert_eq!(vec!["行く".to_string()], extraction.new_vocabulary);
//! ```

#![crate_name = "bunkai"]
#![crate_type = "lib"]
#![crate_type = "rlib"]

pub mod anki;
pub mod batch;
pub mod cards;
pub mod conjugation;
pub mod dictionary;
pub mod extract;
pub mod pathing;
pub mod resolver;
pub mod token;
pub mod tokenizer;
pub mod unit;

pub mod prelude {
  pub use crate::batch::Batch;
  pub use crate::dictionary::{Lexicon, SeedLexicon};
  pub use crate::extract::{extract_kanji_and_vocabulary, KnownSets};
  pub use crate::pathing::Pathing;
  pub use crate::resolver::resolve_sentence;
  pub use crate::token::{Token, TokenClass};
  pub use crate::tokenizer::{parse_analysis, CommandTokenizer, Tokenize};
  pub use crate::unit::ResolvedUnit;
}
