use std::collections::HashSet;

use super::unit::ResolvedUnit;

// Three disjoint CJK ideograph ranges: extension A, the unified block and
// the compatibility block.
const KANJI_RANGES: [(u32, u32); 3] = [(0x3400, 0x4DBF), (0x4E00, 0x9FCB), (0xF900, 0xFA6A)];

pub fn is_kanji(c: char) -> bool {
  let code = c as u32;
  KANJI_RANGES
    .iter()
    .any(|(start, end)| *start <= code && code <= *end)
}

/// The "already known" accumulator carried across a whole batch, spanning
/// many sentences and sources. Owned by the batch orchestrator and threaded
/// through extraction.
#[derive(Clone, Debug, Default)]
pub struct KnownSets {
  pub kanji: HashSet<char>,
  pub vocabulary: HashSet<String>,
}

impl KnownSets {
  pub fn new() -> KnownSets {
    KnownSets::default()
  }
}

/// Unseen material found in one source's resolved units, in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extraction {
  pub new_kanji: Vec<char>,
  pub new_vocabulary: Vec<String>,
}

/// Single pass over one source's resolved units: every character of each
/// unit's dictionary form is tested against the ideograph ranges, unseen
/// matches become new kanji, and unseen kanji-bearing dictionary forms become
/// new vocabulary. `known` is updated in place, so nothing is reported twice
/// within or across sources.
pub fn extract_kanji_and_vocabulary(
  units: &[ResolvedUnit],
  known: &mut KnownSets,
) -> Extraction {
  let mut extraction = Extraction::default();
  for unit in units {
    let form = unit.dictionary_form();
    let mut has_kanji = false;
    for c in form.chars() {
      if !is_kanji(c) {
        continue;
      }
      has_kanji = true;
      if known.kanji.insert(c) {
        extraction.new_kanji.push(c);
      }
    }
    if has_kanji && known.vocabulary.insert(form.to_string()) {
      extraction.new_vocabulary.push(form.to_string());
    }
  }
  extraction
}
