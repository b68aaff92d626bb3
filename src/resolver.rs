use log::{debug, warn};

use super::conjugation::{ConjugationClass, SuffixEntry, VerbState};
use super::token::{Token, TokenClass};
use super::unit::{Augmentation, ResolvedUnit, VerbPhrase, Word};

const COMPOUND_VERB_GLOSS: &str = "Compound Verb";

/// Sole entry point of the verb-form state machine: a single left-to-right
/// pass over one sentence's tokens, reassembling verb-conjugation chains into
/// `VerbPhrase`s and passing everything else through as `Word`s.
pub fn resolve_sentence(tokens: &[Token]) -> Vec<ResolvedUnit> {
  let mut resolver = SentenceResolver::new();
  let mut units = vec![];
  for token in tokens {
    resolver.feed(token, &mut units);
  }
  resolver.finish(&mut units);
  units
}

struct OpenChain {
  phrase: VerbPhrase,
  state: VerbState,
}

/// At most one chain is open at a time; every opened chain is finalized and
/// pushed before another may open.
struct SentenceResolver {
  open: Option<OpenChain>,
}

impl SentenceResolver {
  fn new() -> SentenceResolver {
    SentenceResolver { open: None }
  }

  fn feed(&mut self, token: &Token, units: &mut Vec<ResolvedUnit>) {
    if token.class() == TokenClass::Dummy {
      return;
    }
    // Finalize-and-reprocess rules feed the causing token back through the
    // no-accumulator path, hence the loop.
    let mut reprocess = true;
    while reprocess {
      reprocess = match self.open.take() {
        Some(chain) => self.continue_chain(chain, token, units),
        None => {
          self.start_or_pass_through(token, units);
          false
        }
      };
    }
  }

  fn finish(&mut self, units: &mut Vec<ResolvedUnit>) {
    if let Some(chain) = self.open.take() {
      units.push(finalize(chain));
    }
  }

  /// No accumulator: symbols vanish, verbs open a chain, everything else is
  /// a pass-through `Word`.
  fn start_or_pass_through(&mut self, token: &Token, units: &mut Vec<ResolvedUnit>) {
    let part_of_speech = match token.part_of_speech() {
      Ok(p) => p.to_string(),
      Err(err) => {
        warn!("skipping token: {}", err);
        return;
      }
    };
    if token.is_symbol() {
      return;
    }
    if token.is_verb() {
      self.open = Some(open_chain(token, part_of_speech));
      return;
    }
    let word = Word::new(part_of_speech, token.base_form(), token.surface());
    units.push(ResolvedUnit::Word(word));
  }

  /// Accumulator open: dispatch on the current state. Returns true when the
  /// causing token must be reprocessed under the no-accumulator rules.
  fn continue_chain(
    &mut self,
    mut chain: OpenChain,
    token: &Token,
    units: &mut Vec<ResolvedUnit>,
  ) -> bool {
    if token.is_symbol() {
      units.push(finalize(chain));
      return false;
    }
    let surface = token.surface();

    if chain.state == VerbState::O {
      // The volitional stem accepts only う. Anything else finalizes the
      // phrase bare and the causing token is dropped outright; the original
      // implementation loses it and we reproduce that, loudly.
      if let Some(entry) = lookup(VerbState::O, surface) {
        apply(&mut chain.phrase, surface, &entry);
        units.push(finalize(chain));
      } else {
        warn!(
          "volitional chain `{}`: dropping continuation `{}`",
          chain.phrase.surface(),
          surface
        );
        units.push(finalize(chain));
      }
      return false;
    }

    let entry = match chain.state {
      VerbState::IT => lookup(VerbState::T, surface).or_else(|| lookup(VerbState::I, surface)),
      state => state.table().and_then(|table| table.get(surface).copied()),
    };

    if let Some(entry) = entry {
      apply(&mut chain.phrase, surface, &entry);
      if let Some(next) = entry.next {
        chain.state = next;
      }
      self.open = Some(chain);
      return false;
    }

    if chain.state == VerbState::T {
      debug!(
        "unresolved te/ta chain `{}` met `{}`",
        chain.phrase.surface(),
        surface
      );
    }

    // Continuative and te-form chains absorb one following verb as a
    // compound; a second one closes the chain and starts a new one.
    if token.is_verb() && accepts_compound(chain.state) {
      if !chain.phrase.compounded {
        chain.phrase.extend_surface(surface);
        chain
          .phrase
          .augment(Augmentation::new(COMPOUND_VERB_GLOSS, false));
        chain.phrase.compounded = true;
        // Further continuations follow the attached verb.
        chain.state = classify(token);
        self.open = Some(chain);
        return false;
      }
      units.push(finalize(chain));
      return true;
    }

    units.push(finalize(chain));
    true
  }
}

fn lookup(state: VerbState, surface: &str) -> Option<SuffixEntry> {
  state.table().and_then(|table| table.get(surface).copied())
}

fn apply(phrase: &mut VerbPhrase, surface: &str, entry: &SuffixEntry) {
  phrase.extend_surface(surface);
  phrase.augment(Augmentation::new(entry.gloss, entry.precedes_verb));
  if let Some(form) = entry.form {
    phrase.set_form(form);
  }
}

fn finalize(chain: OpenChain) -> ResolvedUnit {
  let mut phrase = chain.phrase;
  phrase.set_form_if_empty(chain.state.terminal_name());
  ResolvedUnit::VerbPhrase(phrase)
}

fn accepts_compound(state: VerbState) -> bool {
  matches!(state, VerbState::I | VerbState::IT | VerbState::Te)
}

fn open_chain(token: &Token, part_of_speech: String) -> OpenChain {
  let word = Word::new(part_of_speech, token.base_form(), token.surface());
  OpenChain {
    phrase: VerbPhrase::new(word),
    state: classify(token),
  }
}

/// Classify a verb token's entry state from its conjugation class and form
/// features. Unrecognized conjugation types fall back to the generic state
/// with an empty form label.
fn classify(token: &Token) -> VerbState {
  let class: ConjugationClass = match token.conjugation_type().map(|label| label.parse()) {
    Ok(Ok(class)) => class,
    Ok(Err(err)) => {
      warn!("`{}`: {}", token.surface(), err);
      return VerbState::Generic;
    }
    Err(err) => {
      warn!("{}", err);
      return VerbState::Generic;
    }
  };
  let form = token.conjugation_form().unwrap_or("");
  match class {
    ConjugationClass::Godan => classify_godan(form),
    _ => classify_non_godan(form, token.surface()),
  }
}

fn classify_godan(form: &str) -> VerbState {
  match form {
    "基本形" => VerbState::U,
    "連用形" => VerbState::I,
    "未然形" => VerbState::A,
    "未然ウ接続" => VerbState::O,
    "連用タ接続" => VerbState::T,
    "命令ｅ" | "仮定形" => VerbState::ImperativeGodan,
    _ => VerbState::Generic,
  }
}

/// Ichidan and the two irregular classes keep their stem unchanged across
/// several conjugation rows, so the form label alone is not enough: the
/// trailing character of the surface decides how the chain may continue.
fn classify_non_godan(form: &str, surface: &str) -> VerbState {
  match form {
    "基本形" => VerbState::U,
    "未然形" => VerbState::A,
    "未然ウ接続" => VerbState::O,
    "命令ろ" | "命令よ" | "仮定形" => VerbState::ImperativeIchidan,
    _ => match surface.chars().last() {
      Some('て') | Some('で') => VerbState::Te,
      Some('た') | Some('だ') => VerbState::Ta,
      Some('っ') | Some('ん') => VerbState::T,
      _ => VerbState::IT,
    },
  }
}
