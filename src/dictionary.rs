use std::collections::HashMap;
use std::io::Error as IOError;
use std::path::Path;

use csv::Error as CsvError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LexiconErr {
  #[error("{self:?}")]
  IOError(#[from] IOError),
  #[error("{self:?}")]
  CsvError(#[from] CsvError),
  #[error("kanji column of `{0}` is not a single character")]
  BadKanjiColumnErr(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordRecord {
  pub definitions: Vec<String>,
  pub reading: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KanjiRecord {
  pub keyword: String,
  pub on_readings: Vec<String>,
  pub kun_readings: Vec<String>,
  pub stroke_count: u32,
}

/// Seam to the dictionary index. A miss is an empty or absent result, never
/// an error; seed dictionaries are expected to be sparse.
pub trait Lexicon {
  fn lookup_word(&self, base_form: &str) -> Vec<WordRecord>;
  fn lookup_kanji(&self, kanji: char) -> Option<KanjiRecord>;
}

impl<'a, L: Lexicon + ?Sized> Lexicon for &'a L {
  fn lookup_word(&self, base_form: &str) -> Vec<WordRecord> {
    (**self).lookup_word(base_form)
  }
  fn lookup_kanji(&self, kanji: char) -> Option<KanjiRecord> {
    (**self).lookup_kanji(kanji)
  }
}

/// In-memory index built from CSV seed files.
///
/// Word rows: `base_form,reading,definition[,definition…]`.
/// Kanji rows: `kanji,keyword,strokes,on readings,kun readings` with readings
/// space-separated inside their column.
#[derive(Debug, Default)]
pub struct SeedLexicon {
  words: HashMap<String, Vec<WordRecord>>,
  kanji: HashMap<char, KanjiRecord>,
}

impl SeedLexicon {
  pub fn empty() -> SeedLexicon {
    SeedLexicon::default()
  }

  pub fn from_seed_files<P: AsRef<Path>>(
    words_path: Option<P>,
    kanji_path: Option<P>,
  ) -> Result<SeedLexicon, LexiconErr> {
    let mut lexicon = SeedLexicon::empty();
    if let Some(path) = words_path {
      lexicon.read_words(&mut reader(path.as_ref())?)?;
    }
    if let Some(path) = kanji_path {
      lexicon.read_kanji(&mut reader(path.as_ref())?)?;
    }
    Ok(lexicon)
  }

  fn read_words<R: std::io::Read>(&mut self, reader: &mut csv::Reader<R>) -> Result<(), LexiconErr> {
    for record in reader.records() {
      let record = record?;
      let base_form = match record.get(0) {
        Some(f) if !f.is_empty() => f.to_string(),
        _ => continue,
      };
      let reading = record.get(1).unwrap_or("").to_string();
      let definitions = record
        .iter()
        .skip(2)
        .filter(|d| !d.is_empty())
        .map(|d| d.to_string())
        .collect();
      self
        .words
        .entry(base_form)
        .or_insert_with(Vec::new)
        .push(WordRecord {
          definitions,
          reading,
        });
    }
    Ok(())
  }

  fn read_kanji<R: std::io::Read>(&mut self, reader: &mut csv::Reader<R>) -> Result<(), LexiconErr> {
    for record in reader.records() {
      let record = record?;
      let column = record.get(0).unwrap_or("");
      let mut chars = column.chars();
      let kanji = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => return Err(LexiconErr::BadKanjiColumnErr(column.to_string())),
      };
      let keyword = record.get(1).unwrap_or("").to_string();
      let stroke_count = record.get(2).and_then(|s| s.parse().ok()).unwrap_or(0);
      let on_readings = split_readings(record.get(3).unwrap_or(""));
      let kun_readings = split_readings(record.get(4).unwrap_or(""));
      self.kanji.insert(
        kanji,
        KanjiRecord {
          keyword,
          on_readings,
          kun_readings,
          stroke_count,
        },
      );
    }
    Ok(())
  }
}

impl Lexicon for SeedLexicon {
  fn lookup_word(&self, base_form: &str) -> Vec<WordRecord> {
    self.words.get(base_form).cloned().unwrap_or_default()
  }
  fn lookup_kanji(&self, kanji: char) -> Option<KanjiRecord> {
    self.kanji.get(&kanji).cloned()
  }
}

fn reader(path: &Path) -> Result<csv::Reader<std::fs::File>, LexiconErr> {
  Ok(
    csv::ReaderBuilder::new()
      .has_headers(false)
      .flexible(true)
      .from_path(path)?,
  )
}

fn split_readings(column: &str) -> Vec<String> {
  column
    .split_whitespace()
    .map(|r| r.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn build(data: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
      .has_headers(false)
      .flexible(true)
      .from_reader(data.as_bytes())
  }

  fn from_strings(words: &str, kanji: &str) -> SeedLexicon {
    let mut lexicon = SeedLexicon::empty();
    lexicon.read_words(&mut build(words)).unwrap();
    lexicon.read_kanji(&mut build(kanji)).unwrap();
    lexicon
  }

  #[test]
  fn test_word_lookup() {
    let lexicon = from_strings(
      "行く,いく,to go,to move\n食べる,たべる,to eat\n",
      "行,going,6,コウ ギョウ,い.く ゆ.く\n",
    );
    let records = lexicon.lookup_word("行く");
    assert_eq!(1, records.len());
    assert_eq!("いく", records[0].reading);
    assert_eq!(vec!["to go".to_string(), "to move".to_string()], records[0].definitions);
  }

  #[test]
  fn test_lookup_miss_is_empty_not_error() {
    let lexicon = SeedLexicon::empty();
    assert!(lexicon.lookup_word("無い").is_empty());
    assert!(lexicon.lookup_kanji('無').is_none());
  }

  #[test]
  fn test_kanji_lookup() {
    let lexicon = from_strings("", "行,going,6,コウ ギョウ,い.く ゆ.く\n");
    let record = lexicon.lookup_kanji('行').unwrap();
    assert_eq!("going", record.keyword);
    assert_eq!(6, record.stroke_count);
    assert_eq!(vec!["コウ".to_string(), "ギョウ".to_string()], record.on_readings);
    assert_eq!(2, record.kun_readings.len());
  }

  #[test]
  fn test_multicharacter_kanji_column_is_rejected() {
    let mut lexicon = SeedLexicon::empty();
    assert!(lexicon.read_kanji(&mut build("猫猫,cat,11,ビョウ,ねこ\n")).is_err());
  }
}
