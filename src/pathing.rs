use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufReader, BufWriter, Error as IOError, Read, Write};
use std::path::{Path, PathBuf};

use log::info;
use serde_json::{json, Error as SerdeError, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathingErr {
  #[error("{self:?}")]
  IOError(#[from] IOError),
  #[error("{self:?}")]
  SerdeError(#[from] SerdeError),
}

/// Where the note collection lives: the four index files, the per-kind card
/// directories, the CSV output directory and the intake directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pathing {
  pub notes_dir: PathBuf,
  pub content_md: PathBuf,
  pub kanji_md: PathBuf,
  pub sentences_md: PathBuf,
  pub words_md: PathBuf,
  pub content_dir: PathBuf,
  pub kanji_dir: PathBuf,
  pub sentences_dir: PathBuf,
  pub words_dir: PathBuf,
  pub csv_dir: PathBuf,
  pub intake_dir: PathBuf,
}

impl Default for Pathing {
  fn default() -> Pathing {
    Pathing::rooted(Path::new("Notes").join("Japanese Notes"))
  }
}

impl Pathing {
  pub fn rooted<P: Into<PathBuf>>(notes_dir: P) -> Pathing {
    let notes_dir = notes_dir.into();
    Pathing {
      content_md: notes_dir.join("Content.md"),
      kanji_md: notes_dir.join("Kanji.md"),
      sentences_md: notes_dir.join("Sentences.md"),
      words_md: notes_dir.join("Words.md"),
      content_dir: notes_dir.join("Content"),
      kanji_dir: notes_dir.join("Kanji"),
      sentences_dir: notes_dir.join("Sentences"),
      words_dir: notes_dir.join("Words"),
      csv_dir: notes_dir.join("CSV"),
      intake_dir: PathBuf::from("New Content"),
      notes_dir,
    }
  }

  /// Load from a JSON settings file, falling back field by field to the
  /// defaults. A missing file is written out with the default layout so the
  /// user has something to edit.
  pub fn load<P: AsRef<Path>>(path: P) -> Result<Pathing, PathingErr> {
    let path = path.as_ref();
    let mut pathing = Pathing::default();
    let mut buf = String::new();
    match File::open(path) {
      Ok(file) => {
        BufReader::new(file).read_to_string(&mut buf)?;
      }
      Err(_) => {
        info!("no pathing file at {:?}, writing defaults", path);
        pathing.write_default_file(path)?;
        return Ok(pathing);
      }
    }
    let settings: Value = serde_json::from_str(&buf)?;
    let field = |key: &str, slot: &mut PathBuf| {
      if let Some(Value::String(p)) = settings.get(key) {
        if !p.is_empty() {
          *slot = PathBuf::from(p);
        }
      }
    };
    field("notesDir", &mut pathing.notes_dir);
    field("contentMd", &mut pathing.content_md);
    field("kanjiMd", &mut pathing.kanji_md);
    field("sentencesMd", &mut pathing.sentences_md);
    field("wordsMd", &mut pathing.words_md);
    field("contentPath", &mut pathing.content_dir);
    field("kanjiPath", &mut pathing.kanji_dir);
    field("sentencesPath", &mut pathing.sentences_dir);
    field("wordsPath", &mut pathing.words_dir);
    field("csvPath", &mut pathing.csv_dir);
    field("newContent", &mut pathing.intake_dir);
    Ok(pathing)
  }

  fn write_default_file(&self, path: &Path) -> Result<(), PathingErr> {
    let settings = json!({
      "notesDir": self.notes_dir,
      "contentMd": self.content_md,
      "kanjiMd": self.kanji_md,
      "sentencesMd": self.sentences_md,
      "wordsMd": self.words_md,
      "contentPath": self.content_dir,
      "kanjiPath": self.kanji_dir,
      "sentencesPath": self.sentences_dir,
      "wordsPath": self.words_dir,
      "csvPath": self.csv_dir,
      "newContent": self.intake_dir,
    });
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(serde_json::to_string_pretty(&settings)?.as_bytes())?;
    Ok(())
  }

  /// Create the directory layout and empty index files where missing.
  pub fn ensure_layout(&self) -> Result<(), PathingErr> {
    for dir in [
      &self.content_dir,
      &self.kanji_dir,
      &self.sentences_dir,
      &self.words_dir,
      &self.csv_dir,
      &self.intake_dir,
    ]
    .iter()
    {
      create_dir_all(dir)?;
    }
    for file in [
      &self.content_md,
      &self.kanji_md,
      &self.sentences_md,
      &self.words_md,
    ]
    .iter()
    {
      OpenOptions::new().create(true).append(true).open(file)?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::env::temp_dir;
  use std::fs;

  #[test]
  fn test_default_layout() {
    let pathing = Pathing::default();
    assert_eq!(
      Path::new("Notes").join("Japanese Notes").join("Kanji.md"),
      pathing.kanji_md
    );
    assert_eq!(PathBuf::from("New Content"), pathing.intake_dir);
  }

  #[test]
  fn test_load_overrides_and_defaults() {
    let dir = temp_dir().join("bunkai_pathing_test");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("pathing.json");
    fs::write(&path, r#"{"notesDir": "Elsewhere", "csvPath": ""}"#).unwrap();
    let pathing = Pathing::load(&path).unwrap();
    assert_eq!(PathBuf::from("Elsewhere"), pathing.notes_dir);
    // Empty strings fall back to the default.
    assert_eq!(Pathing::default().csv_dir, pathing.csv_dir);
    fs::remove_dir_all(&dir).unwrap();
  }

  #[test]
  fn test_load_missing_file_writes_defaults() {
    let dir = temp_dir().join("bunkai_pathing_missing_test");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("pathing.json");
    let pathing = Pathing::load(&path).unwrap();
    assert_eq!(Pathing::default(), pathing);
    assert!(path.is_file());
    fs::remove_dir_all(&dir).unwrap();
  }
}
