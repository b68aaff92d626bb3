use std::fs::{read_to_string, write};
use std::io::Error as IOError;
use std::path::Path;

use thiserror::Error;

use super::dictionary::{KanjiRecord, WordRecord};
use super::extract::is_kanji;
use super::unit::{ResolvedUnit, VerbPhrase};

#[derive(Error, Debug)]
pub enum CardErr {
  #[error("{self:?}")]
  IOError(#[from] IOError),
  #[error("card `{0}` has no Tags line")]
  MissingTagsLineErr(String),
}

/// A flashcard as the Anki importer sees it, re-parsed from a card note.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Flashcard {
  pub front: String,
  pub back: String,
  pub cloze: String,
}

/// Link every ideograph of `text` to its kanji note, leaving other
/// characters in place.
pub fn kanji_links(text: &str, kanji_dir: &Path) -> String {
  let mut out = String::new();
  for c in text.chars() {
    if is_kanji(c) {
      out.push_str(&format!(
        "[{}]({})",
        c,
        kanji_dir.join(format!("{}.md", c)).display()
      ));
    } else {
      out.push(c);
    }
  }
  out
}

/// Link each resolved unit of a sentence to its vocabulary note, keyed by
/// dictionary form.
pub fn unit_links(units: &[ResolvedUnit], words_dir: &Path) -> String {
  units
    .iter()
    .map(|unit| {
      format!(
        "[{}]({})",
        unit.surface(),
        words_dir
          .join(format!("{}.md", unit.dictionary_form()))
          .display()
      )
    })
    .collect::<Vec<String>>()
    .join(" ")
}

/// Render a phrase's augmentations as an English gloss sentence, honoring
/// each gloss's rendering-order flag.
pub fn gloss_line(phrase: &VerbPhrase) -> String {
  let preceding: Vec<&str> = phrase
    .augmentations
    .iter()
    .filter(|a| a.precedes_verb)
    .map(|a| a.gloss.as_str())
    .collect();
  let following: Vec<&str> = phrase
    .augmentations
    .iter()
    .filter(|a| !a.precedes_verb)
    .map(|a| a.gloss.as_str())
    .collect();
  let mut line = if preceding.is_empty() {
    phrase.dictionary_form().to_string()
  } else {
    format!("{} of {}", preceding.join(", "), phrase.dictionary_form())
  };
  if !following.is_empty() {
    line.push_str(", ");
    line.push_str(&following.join(", "));
  }
  line
}

pub fn kanji_card(kanji: char, record: Option<&KanjiRecord>, source: &str) -> String {
  let (keyword, strokes, readings) = match record {
    Some(record) => {
      let mut readings: Vec<&str> = record.on_readings.iter().map(String::as_str).collect();
      readings.extend(record.kun_readings.iter().map(String::as_str));
      (record.keyword.clone(), record.stroke_count, readings.join(", "))
    }
    None => (String::new(), 0, String::new()),
  };
  [
    "TARGET DECK: Kanji".to_string(),
    "START".to_string(),
    "Basic".to_string(),
    format!("{}, {}", kanji, strokes),
    format!("Back: {}", keyword),
    readings,
    format!("Tags: [[{}]]", source),
    String::new(),
    "END".to_string(),
  ]
  .join("\n")
}

pub fn vocabulary_card(
  form: &str,
  records: &[WordRecord],
  phrase: Option<&VerbPhrase>,
  source: &str,
  kanji_dir: &Path,
) -> String {
  let reading = records
    .first()
    .map(|r| r.reading.clone())
    .unwrap_or_default();
  let definitions = records
    .iter()
    .flat_map(|r| r.definitions.iter().cloned())
    .collect::<Vec<String>>()
    .join("; ");
  let mut lines = vec![
    "TARGET DECK: Words".to_string(),
    "START".to_string(),
    "Basic".to_string(),
    kanji_links(form, kanji_dir),
    format!("Back: {}", definitions),
    reading,
  ];
  if let Some(phrase) = phrase {
    if !phrase.word.form.is_empty() {
      lines.push(format!("Form: {}", phrase.word.form));
    }
    if !phrase.augmentations.is_empty() {
      lines.push(gloss_line(phrase));
    }
  }
  lines.push(format!("Tags: [[{}]]", source));
  lines.push(String::new());
  lines.push("END".to_string());
  lines.join("\n")
}

pub fn sentence_card(
  units: &[ResolvedUnit],
  translation: Option<&str>,
  source: &str,
  words_dir: &Path,
) -> String {
  [
    "TARGET DECK: Sentences".to_string(),
    "START".to_string(),
    "Basic".to_string(),
    unit_links(units, words_dir),
    format!("Back: {}", translation.unwrap_or("")),
    format!("Tags: [[{}]]", source),
    String::new(),
    "END".to_string(),
  ]
  .join("\n")
}

pub fn write_card(content: &str, path: &Path) -> Result<(), CardErr> {
  write(path, content)?;
  Ok(())
}

/// Append a source tag to an existing card's Tags line.
pub fn append_tag(path: &Path, source: &str) -> Result<(), CardErr> {
  let content = read_to_string(path)?;
  let mut lines: Vec<String> = content.lines().map(|l| l.to_string()).collect();
  let tags = lines
    .iter_mut()
    .find(|line| line.contains("Tags: "))
    .ok_or_else(|| CardErr::MissingTagsLineErr(path.display().to_string()))?;
  *tags = format!("{} [[{}]]", tags.trim(), source);
  write(path, lines.join("\n"))?;
  Ok(())
}

/// Re-parse card notes into flashcards. Files missing any of the Basic,
/// Back or Tags markers are skipped.
pub fn files_to_flashcards<P: AsRef<Path>>(paths: &[P]) -> Vec<Flashcard> {
  let mut cards = vec![];
  for path in paths {
    let content = match read_to_string(path.as_ref()) {
      Ok(content) => content,
      Err(err) => {
        log::warn!("unreadable card {:?}: {}", path.as_ref(), err);
        continue;
      }
    };
    let lines: Vec<&str> = content.lines().map(|l| l.trim()).collect();
    let front_index = match lines.iter().position(|l| *l == "Basic") {
      Some(i) => i + 1,
      None => continue,
    };
    let back_index = match lines.iter().position(|l| l.starts_with("Back:")) {
      Some(i) => i,
      None => continue,
    };
    let tag_index = match lines.iter().position(|l| l.starts_with("Tags:")) {
      Some(i) => i,
      None => continue,
    };
    if front_index > back_index || back_index > tag_index {
      continue;
    }
    let front = lines[front_index..back_index].join("\n");
    let back = lines[back_index..tag_index]
      .join("\n")
      .replacen("Back: ", "", 1)
      .replacen("Back:", "", 1);
    cards.push(Flashcard {
      front,
      back,
      cloze: String::new(),
    });
  }
  cards
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::unit::{Augmentation, Word};
  use std::env::temp_dir;
  use std::fs;
  use std::path::PathBuf;

  fn kanji_dir() -> PathBuf {
    Path::new("Notes").join("Kanji")
  }

  #[test]
  fn test_kanji_links_leave_kana_alone() {
    let linked = kanji_links("食べる", &kanji_dir());
    assert!(linked.starts_with("[食]("));
    assert!(linked.ends_with("べる"));
    assert!(linked.contains("食.md"));
  }

  #[test]
  fn test_gloss_line_ordering() {
    let mut phrase = VerbPhrase::new(Word::new("動詞", "行く", "行っ"));
    phrase.augment(Augmentation::new("Past Tense Form", true));
    phrase.augment(Augmentation::new("Polite Form", false));
    assert_eq!("Past Tense Form of 行く, Polite Form", gloss_line(&phrase));
  }

  #[test]
  fn test_kanji_card_format() {
    let record = KanjiRecord {
      keyword: "going".to_string(),
      on_readings: vec!["コウ".to_string()],
      kun_readings: vec!["い.く".to_string()],
      stroke_count: 6,
    };
    let card = kanji_card('行', Some(&record), "Test_Source");
    let lines: Vec<&str> = card.lines().collect();
    assert_eq!("TARGET DECK: Kanji", lines[0]);
    assert_eq!("行, 6", lines[3]);
    assert_eq!("Back: going", lines[4]);
    assert_eq!("コウ, い.く", lines[5]);
    assert_eq!("Tags: [[Test_Source]]", lines[6]);
    assert_eq!("END", lines[8]);
  }

  #[test]
  fn test_kanji_card_without_record() {
    let card = kanji_card('謎', None, "src");
    assert!(card.contains("謎, 0"));
    assert!(card.contains("Back: \n"));
  }

  #[test]
  fn test_vocabulary_card_with_phrase() {
    let records = vec![WordRecord {
      definitions: vec!["to go".to_string()],
      reading: "いく".to_string(),
    }];
    let mut phrase = VerbPhrase::new(Word::new("動詞", "行く", "行った"));
    phrase.augment(Augmentation::new("Past Tense Form", true));
    phrase.set_form("Ta");
    let card = vocabulary_card("行く", &records, Some(&phrase), "src", &kanji_dir());
    assert!(card.contains("Back: to go"));
    assert!(card.contains("いく"));
    assert!(card.contains("Form: Ta"));
    assert!(card.contains("Past Tense Form of 行く"));
  }

  #[test]
  fn test_sentence_card_and_reparsing() {
    let dir = temp_dir().join("bunkai_cards_test");
    fs::create_dir_all(&dir).unwrap();
    let units = vec![
      ResolvedUnit::Word(Word::new("名詞", "猫", "猫")),
      ResolvedUnit::Word(Word::new("助詞", "が", "が")),
    ];
    let card = sentence_card(&units, Some("the cat"), "src", Path::new("Words"));
    let path = dir.join("sentence.md");
    write_card(&card, &path).unwrap();

    let cards = files_to_flashcards(&[&path]);
    assert_eq!(1, cards.len());
    assert_eq!("the cat", cards[0].back);
    assert!(cards[0].front.contains("[猫]("));
    fs::remove_dir_all(&dir).unwrap();
  }

  #[test]
  fn test_append_tag() {
    let dir = temp_dir().join("bunkai_tags_test");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("card.md");
    write_card(&kanji_card('猫', None, "first"), &path).unwrap();
    append_tag(&path, "second").unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("Tags: [[first]] [[second]]"));
    fs::remove_dir_all(&dir).unwrap();
  }

  #[test]
  fn test_files_to_flashcards_skips_incomplete_cards() {
    let dir = temp_dir().join("bunkai_incomplete_test");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("broken.md");
    fs::write(&path, "Basic\nfront only\n").unwrap();
    assert!(files_to_flashcards(&[&path]).is_empty());
    fs::remove_dir_all(&dir).unwrap();
  }
}
