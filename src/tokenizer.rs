use std::io::{Error as IOError, Write};
use std::process::{Command, Stdio};
use std::string::FromUtf8Error;

use log::debug;
use thiserror::Error;

use super::token::{Token, TokenClass};

#[derive(Error, Debug)]
pub enum TokenizeErr {
  #[error("{self:?}")]
  IOError(#[from] IOError),
  #[error("{self:?}")]
  FromUtf8Error(#[from] FromUtf8Error),
  #[error("analyzer `{0}` produced no output")]
  EmptyOutputError(String),
}

/// Seam to the external morphological analyzer.
pub trait Tokenize {
  fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeErr>;
}

impl<'a, T: Tokenize + ?Sized> Tokenize for &'a T {
  fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeErr> {
    (**self).tokenize(text)
  }
}

/// Parse MeCab-format analyzer output: one `surface\tfeature,feature,…` line
/// per token, sentences terminated by `EOS`. Lines without a tab are dropped
/// with a diagnostic. Tokens with a short feature vector are marked unknown;
/// the resolver treats their missing slots as malformed.
pub fn parse_analysis(output: &str) -> Vec<Token> {
  let mut tokens = vec![];
  for line in output.lines() {
    let line = line.trim_end();
    if line.is_empty() || line == "EOS" {
      continue;
    }
    let mut parts = line.splitn(2, '\t');
    let surface = parts.next().unwrap_or("");
    let features = match parts.next() {
      Some(features) => features,
      None => {
        debug!("unparseable analyzer line `{}`", line);
        continue;
      }
    };
    let features: Vec<&str> = features.split(',').collect();
    let class = if features.len() > super::token::BASE_FORM_SLOT {
      TokenClass::Known
    } else {
      TokenClass::Unknown
    };
    tokens.push(Token::new(surface, class, features));
  }
  tokens
}

/// Runs a configured external analyzer (MeCab by default), feeding the text
/// over stdin and parsing its stdout.
pub struct CommandTokenizer {
  program: String,
  args: Vec<String>,
}

impl CommandTokenizer {
  pub fn new<S: Into<String>>(program: S, args: Vec<String>) -> CommandTokenizer {
    CommandTokenizer {
      program: program.into(),
      args,
    }
  }
}

impl Default for CommandTokenizer {
  fn default() -> CommandTokenizer {
    CommandTokenizer::new("mecab", vec![])
  }
}

impl Tokenize for CommandTokenizer {
  fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeErr> {
    let mut child = Command::new(&self.program)
      .args(&self.args)
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::null())
      .spawn()?;
    if let Some(stdin) = child.stdin.as_mut() {
      stdin.write_all(text.as_bytes())?;
      stdin.write_all(b"\n")?;
    }
    let output = String::from_utf8(child.wait_with_output()?.stdout)?;
    if output.trim().is_empty() {
      return Err(TokenizeErr::EmptyOutputError(self.program.clone()));
    }
    Ok(parse_analysis(&output))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_analysis() {
    let output = "\
行っ\t動詞,自立,*,*,五段・カ行促音便,連用タ接続,行く,イッ,イッ
た\t助動詞,*,*,*,特殊・タ,基本形,た,タ,タ
EOS
";
    let tokens = parse_analysis(output);
    assert_eq!(2, tokens.len());
    assert_eq!("行っ", tokens[0].surface());
    assert_eq!(TokenClass::Known, tokens[0].class());
    assert_eq!("行く", tokens[0].base_form());
    assert_eq!("助動詞", tokens[1].part_of_speech().unwrap());
  }

  #[test]
  fn test_parse_analysis_marks_short_vectors_unknown() {
    let tokens = parse_analysis("ｷﾀｰ\t感動詞,*,*\nEOS\n");
    assert_eq!(1, tokens.len());
    assert_eq!(TokenClass::Unknown, tokens[0].class());
    // Base form falls back to the surface.
    assert_eq!("ｷﾀｰ", tokens[0].base_form());
  }

  #[test]
  fn test_parse_analysis_skips_untabbed_lines() {
    let tokens = parse_analysis("garbage line\n猫\t名詞,一般,*,*,*,*,猫,ネコ,ネコ\nEOS\n");
    assert_eq!(1, tokens.len());
    assert_eq!("猫", tokens[0].surface());
  }

  #[test]
  fn test_parse_analysis_handles_multiple_sentences() {
    let output = "猫\t名詞,一般,*,*,*,*,猫,ネコ,ネコ\nEOS\n犬\t名詞,一般,*,*,*,*,犬,イヌ,イヌ\nEOS\n";
    assert_eq!(2, parse_analysis(output).len());
  }
}
