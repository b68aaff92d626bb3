use std::collections::HashMap;
use std::str::FromStr;

use lazy_static::lazy_static;
use thiserror::Error;

/// The four Japanese verb conjugation classes, parsed from the analyzer's
/// conjugation-type feature (e.g. `五段・カ行促音便`, `一段`, `サ変・スル`,
/// `カ変・来ル`).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ConjugationClass {
  Godan,
  Ichidan,
  Suru,
  Kuru,
}

#[derive(Error, Debug)]
pub enum ConjugationErr {
  #[error("unknown conjugation type `{0}`")]
  UnknownConjugationType(String),
}

impl FromStr for ConjugationClass {
  type Err = ConjugationErr;
  fn from_str(label: &str) -> Result<Self, Self::Err> {
    if label.starts_with("五段") {
      Ok(ConjugationClass::Godan)
    } else if label.starts_with("一段") {
      Ok(ConjugationClass::Ichidan)
    } else if label.starts_with("サ変") {
      Ok(ConjugationClass::Suru)
    } else if label.starts_with("カ変") {
      Ok(ConjugationClass::Kuru)
    } else {
      Err(ConjugationErr::UnknownConjugationType(label.to_string()))
    }
  }
}

/// Resolution states of an open verb chain. `IT` is the fused irregular
/// continuative stem (ichidan/suru/kuru), which accepts both T and I
/// continuations. `Generic` is the fallback for unrecognized conjugation
/// types.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum VerbState {
  U,
  I,
  A,
  O,
  T,
  Te,
  Ta,
  IT,
  ImperativeGodan,
  ImperativeIchidan,
  Generic,
}

/// One augmentation-table entry: the gloss attached on a match, its
/// rendering-order flag, an optional form-label override on the phrase and
/// an optional state transition.
#[derive(Clone, Copy, Debug)]
pub struct SuffixEntry {
  pub gloss: &'static str,
  pub precedes_verb: bool,
  pub form: Option<&'static str>,
  pub next: Option<VerbState>,
}

const fn entry(gloss: &'static str, precedes_verb: bool) -> SuffixEntry {
  SuffixEntry {
    gloss,
    precedes_verb,
    form: None,
    next: None,
  }
}

const fn form_entry(
  gloss: &'static str,
  precedes_verb: bool,
  form: &'static str,
) -> SuffixEntry {
  SuffixEntry {
    gloss,
    precedes_verb,
    form: Some(form),
    next: None,
  }
}

const fn transition_entry(
  gloss: &'static str,
  precedes_verb: bool,
  next: VerbState,
) -> SuffixEntry {
  SuffixEntry {
    gloss,
    precedes_verb,
    form: None,
    next: Some(next),
  }
}

type SuffixEntries = &'static [(&'static str, SuffixEntry)];

/// Suffixes attaching to the plain (dictionary) stem.
pub const U_ENTRIES: SuffixEntries = &[
  ("の", entry("Nominalizer", false)),
  ("こと", entry("Nominalizer", false)),
  ("な", entry("Prohibitive (do not)", true)),
  ("まい", entry("Negative Volitional (will not)", true)),
  ("だろう", entry("Conjecture (probably)", true)),
  ("でしょう", entry("Polite Conjecture (probably)", true)),
  ("らしい", entry("Hearsay (apparently)", true)),
  ("そう", entry("Hearsay (I hear that)", true)),
  ("なら", entry("Conditional (if)", true)),
];

/// Suffixes attaching to the continuative (i) stem.
pub const I_ENTRIES: SuffixEntries = &[
  ("ます", form_entry("Polite Form", false, "polite")),
  ("ました", form_entry("Polite Past Form", false, "polite past")),
  ("ません", form_entry("Polite Negative Form", true, "polite negative")),
  ("ましょう", form_entry("Polite Volitional Form (let's)", true, "polite volitional")),
  ("たい", form_entry("Desire Form (want to)", true, "desire")),
  ("たく", form_entry("Desire Form (want to)", true, "desire")),
  ("ながら", entry("Simultaneous Action (while)", true)),
  ("そう", entry("Appearance (looks about to)", true)),
  ("やすい", entry("Ease (easy to)", true)),
  ("にくい", entry("Difficulty (hard to)", true)),
  ("すぎる", entry("Excess (too much)", true)),
  ("なさい", entry("Polite Imperative", false)),
  ("方", entry("Manner (way of doing)", true)),
];

/// Suffixes attaching to the imperfective (a) stem, including the
/// class-specific causative/passive chain. Godan verbs take the bare
/// れる/せる forms, ichidan and the irregulars the られる/させる forms; the
/// keys stay disjoint either way.
pub const A_ENTRIES: SuffixEntries = &[
  ("ない", form_entry("Negative Form (not)", true, "negative")),
  ("なかった", form_entry("Negative Past Form (did not)", true, "negative past")),
  ("なければ", entry("Negative Conditional (if not)", true)),
  ("ず", form_entry("Negative Form (classical)", true, "negative")),
  ("ぬ", form_entry("Negative Form (classical)", true, "negative")),
  ("れる", form_entry("Passive Form", true, "passive")),
  ("られる", form_entry("Passive or Potential Form", true, "passive or potential")),
  ("せる", form_entry("Causative Form (make do)", true, "causative")),
  ("させる", form_entry("Causative Form (make do)", true, "causative")),
  ("せられる", form_entry("Causative-Passive Form (be made to)", true, "causative-passive")),
  ("させられる", form_entry("Causative-Passive Form (be made to)", true, "causative-passive")),
];

/// The volitional stem accepts only the lengthening う; anything else
/// finalizes the phrase bare (see the resolver for the documented drop).
pub const O_ENTRIES: SuffixEntries = &[
  ("う", form_entry("Volitional Form (let's)", true, "volitional")),
];

/// The ambiguous te/ta onset: the continuation decides which side the chain
/// lands on.
pub const T_ENTRIES: SuffixEntries = &[
  ("て", transition_entry("Te Form (connective)", false, VerbState::Te)),
  ("で", transition_entry("Te Form (connective)", false, VerbState::Te)),
  ("た", transition_entry("Past Tense Form", true, VerbState::Ta)),
  ("だ", transition_entry("Past Tense Form", true, VerbState::Ta)),
  ("たら", transition_entry("Conditional Form (if/when)", true, VerbState::Ta)),
  ("だら", transition_entry("Conditional Form (if/when)", true, VerbState::Ta)),
  ("たり", transition_entry("Representative Listing (doing things like)", true, VerbState::Ta)),
  ("だり", transition_entry("Representative Listing (doing things like)", true, VerbState::Ta)),
];

pub const TE_ENTRIES: SuffixEntries = &[
  ("いる", entry("Progressive or Resultant State", false)),
  ("いた", entry("Past Progressive", false)),
  ("います", entry("Polite Progressive", false)),
  ("ある", entry("Resultant State", false)),
  ("おく", entry("Preparation (do in advance)", false)),
  ("しまう", entry("Completion (end up)", false)),
  ("しまった", entry("Completion (ended up)", false)),
  ("ください", entry("Polite Request (please)", false)),
  ("くる", entry("Direction (come to)", false)),
  ("いく", entry("Direction (go on)", false)),
  ("みる", entry("Attempt (try doing)", false)),
  ("も", entry("Concession (even if)", true)),
  ("から", entry("Sequence (after doing)", true)),
];

pub const TA_ENTRIES: SuffixEntries = &[
  ("ら", entry("Conditional Form (if/when)", true)),
  ("り", entry("Representative Listing (doing things like)", true)),
  ("ろう", entry("Conjecture (probably did)", true)),
];

pub const IMPERATIVE_GODAN_ENTRIES: SuffixEntries = &[
  ("ば", form_entry("Conditional Form (if)", true, "conditional")),
  ("よ", entry("Suggestion or Emphasis", false)),
];

pub const IMPERATIVE_ICHIDAN_ENTRIES: SuffixEntries = &[
  ("ば", form_entry("Conditional Form (if)", true, "conditional")),
  ("よ", entry("Suggestion or Emphasis", false)),
];

fn collect(entries: SuffixEntries) -> HashMap<&'static str, SuffixEntry> {
  entries.iter().cloned().collect()
}

lazy_static! {
  static ref U_TABLE: HashMap<&'static str, SuffixEntry> = collect(U_ENTRIES);
  static ref I_TABLE: HashMap<&'static str, SuffixEntry> = collect(I_ENTRIES);
  static ref A_TABLE: HashMap<&'static str, SuffixEntry> = collect(A_ENTRIES);
  static ref O_TABLE: HashMap<&'static str, SuffixEntry> = collect(O_ENTRIES);
  static ref T_TABLE: HashMap<&'static str, SuffixEntry> = collect(T_ENTRIES);
  static ref TE_TABLE: HashMap<&'static str, SuffixEntry> = collect(TE_ENTRIES);
  static ref TA_TABLE: HashMap<&'static str, SuffixEntry> = collect(TA_ENTRIES);
  static ref IMPERATIVE_GODAN_TABLE: HashMap<&'static str, SuffixEntry> =
    collect(IMPERATIVE_GODAN_ENTRIES);
  static ref IMPERATIVE_ICHIDAN_TABLE: HashMap<&'static str, SuffixEntry> =
    collect(IMPERATIVE_ICHIDAN_ENTRIES);
}

impl VerbState {
  /// Exact-match lookup table for this state. `IT` dispatches through T then
  /// I in the resolver and owns no table of its own; `Generic` accepts no
  /// continuation at all.
  pub fn table(&self) -> Option<&'static HashMap<&'static str, SuffixEntry>> {
    match self {
      VerbState::U => Some(&U_TABLE),
      VerbState::I => Some(&I_TABLE),
      VerbState::A => Some(&A_TABLE),
      VerbState::O => Some(&O_TABLE),
      VerbState::T => Some(&T_TABLE),
      VerbState::Te => Some(&TE_TABLE),
      VerbState::Ta => Some(&TA_TABLE),
      VerbState::ImperativeGodan => Some(&IMPERATIVE_GODAN_TABLE),
      VerbState::ImperativeIchidan => Some(&IMPERATIVE_ICHIDAN_TABLE),
      VerbState::IT | VerbState::Generic => None,
    }
  }
  /// Form label given to a phrase finalized in this state with no override.
  pub fn terminal_name(&self) -> &'static str {
    match self {
      VerbState::U => "dictionary",
      VerbState::I | VerbState::IT => "conjunctive i",
      VerbState::A => "imperfective",
      VerbState::O => "volitional",
      VerbState::T => "Te or Ta",
      VerbState::Te => "Te",
      VerbState::Ta => "Ta",
      VerbState::ImperativeGodan | VerbState::ImperativeIchidan => "imperative",
      VerbState::Generic => "",
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const ALL_ENTRIES: [(&str, SuffixEntries); 9] = [
    ("U", U_ENTRIES),
    ("I", I_ENTRIES),
    ("A", A_ENTRIES),
    ("O", O_ENTRIES),
    ("T", T_ENTRIES),
    ("Te", TE_ENTRIES),
    ("Ta", TA_ENTRIES),
    ("ImperativeGodan", IMPERATIVE_GODAN_ENTRIES),
    ("ImperativeIchidan", IMPERATIVE_ICHIDAN_ENTRIES),
  ];

  #[test]
  fn test_tables_have_disjoint_keys() {
    for (name, entries) in ALL_ENTRIES {
      let table = collect(entries);
      assert_eq!(
        entries.len(),
        table.len(),
        "duplicate suffix key in the {} table",
        name
      );
    }
  }

  #[test]
  fn test_conjugation_class_from_str() {
    assert_eq!(
      ConjugationClass::Godan,
      "五段・カ行促音便".parse().unwrap()
    );
    assert_eq!(ConjugationClass::Ichidan, "一段".parse().unwrap());
    assert_eq!(ConjugationClass::Suru, "サ変・スル".parse().unwrap());
    assert_eq!(ConjugationClass::Kuru, "カ変・来ル".parse().unwrap());
    assert!("形容詞・イ段".parse::<ConjugationClass>().is_err());
  }

  #[test]
  fn test_terminal_names() {
    assert_eq!("dictionary", VerbState::U.terminal_name());
    assert_eq!("conjunctive i", VerbState::I.terminal_name());
    assert_eq!("imperfective", VerbState::A.terminal_name());
    assert_eq!("volitional", VerbState::O.terminal_name());
    assert_eq!("Te or Ta", VerbState::T.terminal_name());
    assert_eq!("imperative", VerbState::ImperativeGodan.terminal_name());
    assert_eq!("", VerbState::Generic.terminal_name());
  }

  #[test]
  fn test_transition_entries_point_at_te_and_ta() {
    let table = VerbState::T.table().unwrap();
    assert_eq!(Some(VerbState::Te), table.get("て").unwrap().next);
    assert_eq!(Some(VerbState::Ta), table.get("た").unwrap().next);
  }
}
