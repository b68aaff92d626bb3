/// A resolved non-verb unit, or the base of a verb phrase.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Word {
  pub part_of_speech: String,
  pub dictionary_form: String,
  pub surface: String,
  /// Conjugation-form label; empty for plain words.
  pub form: String,
}

impl Word {
  pub fn new<P, D, S>(part_of_speech: P, dictionary_form: D, surface: S) -> Word
  where
    P: Into<String>,
    D: Into<String>,
    S: Into<String>,
  {
    Word {
      part_of_speech: part_of_speech.into(),
      dictionary_form: dictionary_form.into(),
      surface: surface.into(),
      form: String::new(),
    }
  }
}

/// A grammatical suffix's semantic gloss plus a rendering-order hint:
/// `precedes_verb` is true when the gloss reads before the verb in English
/// ("want to eat"), false when it reads after ("eat politely").
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Augmentation {
  pub gloss: String,
  pub precedes_verb: bool,
}

impl Augmentation {
  pub fn new<G: Into<String>>(gloss: G, precedes_verb: bool) -> Augmentation {
    Augmentation {
      gloss: gloss.into(),
      precedes_verb,
    }
  }
}

/// A verb-conjugation chain under construction or fully resolved: one base
/// word plus the augmentations its suffixes contributed, in reading order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VerbPhrase {
  pub word: Word,
  pub augmentations: Vec<Augmentation>,
  /// Set once a compound-verb continuation has been attached; a chain takes
  /// at most one.
  pub compounded: bool,
}

impl VerbPhrase {
  pub fn new(word: Word) -> VerbPhrase {
    VerbPhrase {
      word,
      augmentations: vec![],
      compounded: false,
    }
  }
  pub fn surface(&self) -> &str {
    &self.word.surface
  }
  /// The dictionary form is fixed at chain start and never rewritten.
  pub fn dictionary_form(&self) -> &str {
    &self.word.dictionary_form
  }
  pub fn extend_surface(&mut self, suffix: &str) {
    self.word.surface.push_str(suffix);
  }
  pub fn augment(&mut self, augmentation: Augmentation) {
    self.augmentations.push(augmentation);
  }
  pub fn set_form(&mut self, form: &str) {
    self.word.form = form.to_string();
  }
  pub fn set_form_if_empty(&mut self, form: &str) {
    if self.word.form.is_empty() {
      self.word.form = form.to_string();
    }
  }
}

/// The atomic output element of sentence resolution.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResolvedUnit {
  Word(Word),
  VerbPhrase(VerbPhrase),
}

impl ResolvedUnit {
  pub fn surface(&self) -> &str {
    match self {
      ResolvedUnit::Word(word) => &word.surface,
      ResolvedUnit::VerbPhrase(phrase) => phrase.surface(),
    }
  }
  pub fn dictionary_form(&self) -> &str {
    match self {
      ResolvedUnit::Word(word) => &word.dictionary_form,
      ResolvedUnit::VerbPhrase(phrase) => phrase.dictionary_form(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_phrase_accumulates_without_touching_dictionary_form() {
    let mut phrase = VerbPhrase::new(Word::new("動詞", "行く", "行っ"));
    phrase.extend_surface("た");
    phrase.augment(Augmentation::new("Past Tense Form", true));
    assert_eq!("行った", phrase.surface());
    assert_eq!("行く", phrase.dictionary_form());
    assert_eq!(1, phrase.augmentations.len());
  }

  #[test]
  fn test_set_form_if_empty_keeps_overrides() {
    let mut phrase = VerbPhrase::new(Word::new("動詞", "食べる", "食べ"));
    phrase.set_form("causative-passive");
    phrase.set_form_if_empty("imperfective");
    assert_eq!("causative-passive", phrase.word.form);
  }

  #[test]
  fn test_unit_accessors() {
    let unit = ResolvedUnit::Word(Word::new("名詞", "猫", "猫"));
    assert_eq!("猫", unit.surface());
    assert_eq!("猫", unit.dictionary_form());
  }
}
