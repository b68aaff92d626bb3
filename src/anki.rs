use std::fs::read_dir;
use std::io::Error as IOError;
use std::path::{Path, PathBuf};

use csv::Error as CsvError;
use log::info;
use thiserror::Error;

use super::cards::{files_to_flashcards, Flashcard};
use super::pathing::Pathing;

#[derive(Error, Debug)]
pub enum CsvExportErr {
  #[error("{self:?}")]
  IOError(#[from] IOError),
  #[error("{self:?}")]
  CsvError(#[from] CsvError),
}

/// Write one Front/Back CSV plus its companion cloze CSV. Cloze rows are
/// only emitted for cards that carry cloze text.
pub fn flashcards_to_csv(
  cards: &[Flashcard],
  csv_path: &Path,
  cloze_path: &Path,
) -> Result<(), CsvExportErr> {
  let mut writer = csv::Writer::from_path(csv_path)?;
  writer.write_record(&["Front", "Back"])?;
  let mut cloze_writer = csv::Writer::from_path(cloze_path)?;
  cloze_writer.write_record(&["Cloze", "Back"])?;
  for card in cards {
    writer.write_record(&[&card.front, &card.back])?;
    if !card.cloze.is_empty() {
      cloze_writer.write_record(&[&card.cloze, &card.back])?;
    }
  }
  writer.flush()?;
  cloze_writer.flush()?;
  Ok(())
}

/// Export every card directory to its Anki import CSV pair.
pub fn make_csvs(pathing: &Pathing) -> Result<(), CsvExportErr> {
  let jobs = [
    (&pathing.sentences_dir, "Sentences"),
    (&pathing.words_dir, "Words"),
    (&pathing.kanji_dir, "Kanji"),
  ];
  for (dir, name) in jobs.iter() {
    let cards = files_to_flashcards(&card_files(dir)?);
    info!("exporting {} {} cards", cards.len(), name);
    flashcards_to_csv(
      &cards,
      &pathing.csv_dir.join(format!("{}.csv", name)),
      &pathing.csv_dir.join(format!("{}_cloze.csv", name)),
    )?;
  }
  Ok(())
}

fn card_files(dir: &Path) -> Result<Vec<PathBuf>, IOError> {
  let mut files = vec![];
  for dir_entry in read_dir(dir)? {
    let path = dir_entry?.path();
    if path.extension().map(|e| e == "md").unwrap_or(false) {
      files.push(path);
    }
  }
  files.sort();
  Ok(files)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::env::temp_dir;
  use std::fs;

  #[test]
  fn test_flashcards_to_csv() {
    let dir = temp_dir().join("bunkai_csv_test");
    fs::create_dir_all(&dir).unwrap();
    let cards = vec![
      Flashcard {
        front: "猫".to_string(),
        back: "cat".to_string(),
        cloze: String::new(),
      },
      Flashcard {
        front: "犬".to_string(),
        back: "dog".to_string(),
        cloze: "{{c1::犬}}".to_string(),
      },
    ];
    let csv_path = dir.join("Words.csv");
    let cloze_path = dir.join("Words_cloze.csv");
    flashcards_to_csv(&cards, &csv_path, &cloze_path).unwrap();

    let csv = fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("Front,Back\n"));
    assert!(csv.contains("猫,cat"));
    assert!(csv.contains("犬,dog"));

    // Only the card with cloze text lands in the cloze file.
    let cloze = fs::read_to_string(&cloze_path).unwrap();
    assert!(cloze.contains("犬"));
    assert!(!cloze.contains("猫"));
    fs::remove_dir_all(&dir).unwrap();
  }

  #[test]
  fn test_card_files_filters_markdown() {
    let dir = temp_dir().join("bunkai_card_files_test");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("a.md"), "").unwrap();
    fs::write(dir.join("b.txt"), "").unwrap();
    let files = card_files(&dir).unwrap();
    assert_eq!(1, files.len());
    assert!(files[0].ends_with("a.md"));
    fs::remove_dir_all(&dir).unwrap();
  }
}
