use std::collections::{HashMap, HashSet};
use std::fs::{read_dir, read_to_string, write, OpenOptions};
use std::io::{Error as IOError, Write};
use std::path::Path;
use std::thread;

use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;
use thiserror::Error;

use super::cards;
use super::dictionary::Lexicon;
use super::extract::{extract_kanji_and_vocabulary, is_kanji, Extraction, KnownSets};
use super::pathing::{Pathing, PathingErr};
use super::resolver::resolve_sentence;
use super::tokenizer::Tokenize;
use super::unit::{ResolvedUnit, VerbPhrase};

#[derive(Error, Debug)]
pub enum BatchErr {
  #[error("{self:?}")]
  IOError(#[from] IOError),
  #[error("{self:?}")]
  PathingErr(#[from] PathingErr),
}

/// Optional collaborator supplying sentence translations. Translation itself
/// is out of scope; absent or failing lookups leave the card back blank.
pub trait Translate: Sync {
  fn translate(&self, sentence: &str) -> Option<String>;
}

const SENTENCE_PUNCTUATION: [char; 10] =
  ['\n', '.', '?', '!', '〪', '。', '〭', '！', '．', '？'];
// Latin letters and digits carry no study value and are stripped at intake.
lazy_static! {
  static ref LATIN: Regex = Regex::new("[A-Za-z0-9]").unwrap();
}

/// One batch run over every intake source, carrying the already-known sets
/// across sources. Resolution is sequential; card rendering fans out per
/// item with a join before the next source begins.
pub struct Batch<'a, T: Tokenize, L: Lexicon + Sync> {
  tokenizer: &'a T,
  lexicon: &'a L,
  pathing: &'a Pathing,
  translator: Option<&'a dyn Translate>,
  known: KnownSets,
  known_sentences: HashSet<String>,
}

impl<'a, T: Tokenize, L: Lexicon + Sync> Batch<'a, T, L> {
  pub fn new(
    tokenizer: &'a T,
    lexicon: &'a L,
    pathing: &'a Pathing,
    translator: Option<&'a dyn Translate>,
  ) -> Result<Batch<'a, T, L>, BatchErr> {
    pathing.ensure_layout()?;
    Ok(Batch {
      tokenizer,
      lexicon,
      pathing,
      translator,
      known: KnownSets {
        kanji: read_index(&pathing.kanji_md)?
          .into_iter()
          .filter_map(|entry| entry.chars().next())
          .collect(),
        vocabulary: read_index(&pathing.words_md)?.into_iter().collect(),
      },
      known_sentences: read_index(&pathing.sentences_md)?.into_iter().collect(),
    })
  }

  pub fn run(&mut self) -> Result<(), BatchErr> {
    let sources = self.intake_sources()?;
    if sources.is_empty() {
      info!(
        "no new sources. place .txt files in {:?} to begin",
        self.pathing.intake_dir
      );
      return Ok(());
    }
    for (name, blob) in sources {
      self.process_source(&name, &blob)?;
    }
    Ok(())
  }

  /// Read every `*.txt` under the intake directory, strip Latin characters,
  /// digits and spaces, and write the cleaned blob as the source's content
  /// note. Unreadable files are skipped.
  fn intake_sources(&self) -> Result<Vec<(String, String)>, BatchErr> {
    let mut sources = vec![];
    for dir_entry in read_dir(&self.pathing.intake_dir)? {
      let path = dir_entry?.path();
      if path.extension().map(|e| e == "txt") != Some(true) {
        continue;
      }
      let name = match path.file_stem().and_then(|s| s.to_str()) {
        Some(stem) => stem.replace(' ', "_"),
        None => continue,
      };
      let text = match read_to_string(&path) {
        Ok(text) => text,
        Err(err) => {
          warn!("unreadable source {:?}: {}", path, err);
          continue;
        }
      };
      let mut blob = String::new();
      for line in text.lines() {
        let cleaned = LATIN.replace_all(line, "").replace(' ', "");
        if !cleaned.is_empty() {
          blob.push_str(&cleaned);
          blob.push('\n');
        }
      }
      let note = self.pathing.content_dir.join(format!("{}.md", name));
      if let Err(err) = write(&note, &blob) {
        warn!("failed to write content note {:?}: {}", note, err);
      }
      sources.push((name, blob));
    }
    sources.sort();
    Ok(sources)
  }

  fn process_source(&mut self, name: &str, blob: &str) -> Result<(), BatchErr> {
    let mut resolved: Vec<(String, Vec<ResolvedUnit>)> = vec![];
    for sentence in split_sentences(blob) {
      if self.known_sentences.contains(&sentence) {
        let path = self.pathing.sentences_dir.join(format!("{}.md", sentence));
        if let Err(err) = cards::append_tag(&path, name) {
          warn!("failed to tag sentence card {:?}: {}", path, err);
        }
        continue;
      }
      match self.tokenizer.tokenize(&sentence) {
        Ok(tokens) => resolved.push((sentence, resolve_sentence(&tokens))),
        Err(err) => warn!("skipping sentence `{}`: {}", sentence, err),
      }
    }

    let all_units: Vec<ResolvedUnit> = resolved
      .iter()
      .flat_map(|(_, units)| units.iter().cloned())
      .collect();
    let seen_kanji: HashSet<char> = all_units
      .iter()
      .flat_map(|unit| unit.dictionary_form().chars())
      .filter(|c| is_kanji(*c))
      .collect();
    let seen_vocabulary: HashSet<String> = all_units
      .iter()
      .map(|unit| unit.dictionary_form().to_string())
      .filter(|form| form.chars().any(is_kanji))
      .collect();
    let extraction = extract_kanji_and_vocabulary(&all_units, &mut self.known);
    let phrases = first_phrases(&all_units);

    self.render_cards(name, &resolved, &extraction, &phrases);
    self.tag_known_items(name, &seen_kanji, &seen_vocabulary, &extraction);
    self.append_indices(name, &resolved, &extraction)?;
    for (sentence, _) in &resolved {
      self.known_sentences.insert(sentence.clone());
    }
    Ok(())
  }

  /// Render fan-out: one task per new kanji, per new vocabulary entry and
  /// per sentence. Every task reads only immutable resolved data and writes
  /// its own file; the scope joins them all before the source is wrapped up.
  /// A failing render is logged and does not abort its siblings.
  fn render_cards(
    &self,
    name: &str,
    resolved: &[(String, Vec<ResolvedUnit>)],
    extraction: &Extraction,
    phrases: &HashMap<String, VerbPhrase>,
  ) {
    let pathing = self.pathing;
    let lexicon = self.lexicon;
    let translator = self.translator;
    thread::scope(|scope| {
      for kanji in &extraction.new_kanji {
        scope.spawn(move || {
          let record = lexicon.lookup_kanji(*kanji);
          let content = cards::kanji_card(*kanji, record.as_ref(), name);
          let path = pathing.kanji_dir.join(format!("{}.md", kanji));
          if let Err(err) = cards::write_card(&content, &path) {
            warn!("failed to write kanji card {:?}: {}", path, err);
          }
        });
      }
      for form in &extraction.new_vocabulary {
        let phrase = phrases.get(form);
        scope.spawn(move || {
          let records = lexicon.lookup_word(form);
          let content =
            cards::vocabulary_card(form, &records, phrase, name, &pathing.kanji_dir);
          let path = pathing.words_dir.join(format!("{}.md", form));
          if let Err(err) = cards::write_card(&content, &path) {
            warn!("failed to write vocabulary card {:?}: {}", path, err);
          }
        });
      }
      for (sentence, units) in resolved {
        scope.spawn(move || {
          let translation = translator.and_then(|t| t.translate(sentence));
          let content =
            cards::sentence_card(units, translation.as_deref(), name, &pathing.words_dir);
          let path = pathing.sentences_dir.join(format!("{}.md", sentence));
          if let Err(err) = cards::write_card(&content, &path) {
            warn!("failed to write sentence card {:?}: {}", path, err);
          }
        });
      }
    });
  }

  /// Items seen again in this source that already have cards get the new
  /// source appended to their tags.
  fn tag_known_items(
    &self,
    name: &str,
    seen_kanji: &HashSet<char>,
    seen_vocabulary: &HashSet<String>,
    extraction: &Extraction,
  ) {
    let new_kanji: HashSet<char> = extraction.new_kanji.iter().cloned().collect();
    for kanji in seen_kanji.difference(&new_kanji) {
      let path = self.pathing.kanji_dir.join(format!("{}.md", kanji));
      if let Err(err) = cards::append_tag(&path, name) {
        warn!("failed to tag kanji card {:?}: {}", path, err);
      }
    }
    let new_vocabulary: HashSet<String> =
      extraction.new_vocabulary.iter().cloned().collect();
    for form in seen_vocabulary.difference(&new_vocabulary) {
      let path = self.pathing.words_dir.join(format!("{}.md", form));
      if let Err(err) = cards::append_tag(&path, name) {
        warn!("failed to tag vocabulary card {:?}: {}", path, err);
      }
    }
  }

  fn append_indices(
    &self,
    name: &str,
    resolved: &[(String, Vec<ResolvedUnit>)],
    extraction: &Extraction,
  ) -> Result<(), BatchErr> {
    append_lines(&self.pathing.content_md, &[format!("[[{}]]", name)])?;
    append_lines(
      &self.pathing.kanji_md,
      &extraction
        .new_kanji
        .iter()
        .map(|k| format!("[[{}]]", k))
        .collect::<Vec<String>>(),
    )?;
    append_lines(
      &self.pathing.words_md,
      &extraction
        .new_vocabulary
        .iter()
        .map(|w| format!("[[{}]]", w))
        .collect::<Vec<String>>(),
    )?;
    let sentence_links: Vec<String> = resolved
      .iter()
      .map(|(sentence, _)| format!("[[{}]]", sentence))
      .collect();
    append_lines(&self.pathing.sentences_md, &sentence_links)?;
    let note = self.pathing.content_dir.join(format!("{}.md", name));
    append_lines(&note, &sentence_links)?;
    Ok(())
  }
}

/// Split a cleaned blob into sentences on the Japanese and Latin
/// end-of-sentence marks. Empty runs are discarded.
pub fn split_sentences(blob: &str) -> Vec<String> {
  blob
    .split(|c| SENTENCE_PUNCTUATION.contains(&c))
    .filter(|s| !s.is_empty())
    .map(|s| s.to_string())
    .collect()
}

fn first_phrases(units: &[ResolvedUnit]) -> HashMap<String, VerbPhrase> {
  let mut phrases = HashMap::new();
  for unit in units {
    if let ResolvedUnit::VerbPhrase(phrase) = unit {
      phrases
        .entry(phrase.dictionary_form().to_string())
        .or_insert_with(|| phrase.clone());
    }
  }
  phrases
}

/// Wiki-link index entries, one per line.
fn read_index(path: &Path) -> Result<Vec<String>, IOError> {
  if !path.is_file() {
    return Ok(vec![]);
  }
  Ok(
    read_to_string(path)?
      .lines()
      .filter_map(|line| {
        let line = line.trim();
        if line.starts_with("[[") && line.ends_with("]]") {
          Some(line[2..line.len() - 2].to_string())
        } else {
          None
        }
      })
      .collect(),
  )
}

fn append_lines(path: &Path, lines: &[String]) -> Result<(), IOError> {
  if lines.is_empty() {
    return Ok(());
  }
  let mut file = OpenOptions::new().create(true).append(true).open(path)?;
  for line in lines {
    writeln!(file, "{}", line)?;
  }
  Ok(())
}
