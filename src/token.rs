use thiserror::Error;

/// Feature slot positions, IPADIC layout.
pub const POS_SLOT: usize = 0;
pub const CONJUGATION_TYPE_SLOT: usize = 4;
pub const CONJUGATION_FORM_SLOT: usize = 5;
pub const BASE_FORM_SLOT: usize = 6;

pub const VERB_POS: &str = "動詞";
const SYMBOL_POS: [&str; 2] = ["記号", "補助記号"];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenClass {
  Known,
  Unknown,
  Dummy,
}

#[derive(Error, Debug)]
pub enum TokenErr {
  #[error("token `{surface}` is missing feature slot {slot}")]
  MalformedFeatureVector { surface: String, slot: usize },
}

/// One unit of external morphological analysis: surface text plus the
/// analyzer's feature vector.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
  surface: String,
  class: TokenClass,
  features: Vec<String>,
}

impl Token {
  pub fn new<S, F>(surface: S, class: TokenClass, features: Vec<F>) -> Token
  where
    S: Into<String>,
    F: Into<String>,
  {
    Token {
      surface: surface.into(),
      class,
      features: features.into_iter().map(|f| f.into()).collect(),
    }
  }
  pub fn surface(&self) -> &str {
    &self.surface
  }
  pub fn class(&self) -> TokenClass {
    self.class
  }
  pub fn feature(&self, slot: usize) -> Result<&str, TokenErr> {
    match self.features.get(slot) {
      Some(f) => Ok(f),
      None => Err(TokenErr::MalformedFeatureVector {
        surface: self.surface.clone(),
        slot,
      }),
    }
  }
  pub fn part_of_speech(&self) -> Result<&str, TokenErr> {
    self.feature(POS_SLOT)
  }
  pub fn conjugation_type(&self) -> Result<&str, TokenErr> {
    self.feature(CONJUGATION_TYPE_SLOT)
  }
  pub fn conjugation_form(&self) -> Result<&str, TokenErr> {
    self.feature(CONJUGATION_FORM_SLOT)
  }
  /// The canonical lookup key. Analyzers leave the slot empty (`*`) for
  /// unknown words; the surface stands in.
  pub fn base_form(&self) -> &str {
    match self.features.get(BASE_FORM_SLOT) {
      Some(f) if f != "*" && !f.is_empty() => f,
      _ => &self.surface,
    }
  }
  pub fn is_verb(&self) -> bool {
    self.part_of_speech().map(|p| p == VERB_POS).unwrap_or(false)
  }
  pub fn is_symbol(&self) -> bool {
    self
      .part_of_speech()
      .map(|p| SYMBOL_POS.contains(&p))
      .unwrap_or(false)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ipadic_token(surface: &str, features: &[&str]) -> Token {
    Token::new(surface, TokenClass::Known, features.to_vec())
  }

  #[test]
  fn test_feature_slots() {
    let token = ipadic_token(
      "行っ",
      &["動詞", "自立", "*", "*", "五段・カ行促音便", "連用タ接続", "行く", "イッ", "イッ"],
    );
    assert_eq!("動詞", token.part_of_speech().unwrap());
    assert_eq!("五段・カ行促音便", token.conjugation_type().unwrap());
    assert_eq!("連用タ接続", token.conjugation_form().unwrap());
    assert_eq!("行く", token.base_form());
    assert!(token.is_verb());
    assert!(!token.is_symbol());
  }

  #[test]
  fn test_malformed_feature_vector() {
    let token = Token::new("?", TokenClass::Unknown, Vec::<String>::new());
    match token.part_of_speech() {
      Err(TokenErr::MalformedFeatureVector { surface, slot }) => {
        assert_eq!("?", surface);
        assert_eq!(POS_SLOT, slot);
      }
      other => panic!("unexpected: {:?}", other),
    }
  }

  #[test]
  fn test_base_form_falls_back_to_surface() {
    let token = ipadic_token("ピラル", &["名詞", "一般", "*", "*", "*", "*", "*"]);
    assert_eq!("ピラル", token.base_form());
  }

  #[test]
  fn test_symbol() {
    let token = ipadic_token("。", &["記号", "句点", "*", "*", "*", "*", "。"]);
    assert!(token.is_symbol());
    assert!(!token.is_verb());
  }
}
