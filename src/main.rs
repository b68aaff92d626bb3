use std::error::Error;
use std::process::exit;

use clap::{crate_version, App, Arg, ArgMatches, SubCommand};

use bunkai::anki::make_csvs;
use bunkai::batch::Batch;
use bunkai::dictionary::SeedLexicon;
use bunkai::pathing::Pathing;
use bunkai::tokenizer::CommandTokenizer;

// Subcommand names
const NOTES_SUB_CMD: &str = "notes";
const CSV_SUB_CMD: &str = "csv";
const RUN_SUB_CMD: &str = "run";

// Argument names
const PATHING_ARG: &str = "pathing";
const ANALYZER_ARG: &str = "analyzer";
const WORDS_SEED_ARG: &str = "words_seed";
const KANJI_SEED_ARG: &str = "kanji_seed";
const VERBOSITY_ARG: &str = "verbosity";

fn unwrap<T, E: Error>(t: Result<T, E>) -> T {
  match t {
    Ok(t) => t,
    Err(e) => {
      eprintln!("{}", e);
      exit(1);
    }
  }
}

fn setup(args: &ArgMatches) -> (Pathing, SeedLexicon, CommandTokenizer) {
  let pathing = unwrap(Pathing::load(
    args.value_of(PATHING_ARG).unwrap_or("pathing.json"),
  ));
  unwrap(pathing.ensure_layout());
  let lexicon = unwrap(SeedLexicon::from_seed_files(
    args.value_of(WORDS_SEED_ARG),
    args.value_of(KANJI_SEED_ARG),
  ));
  let tokenizer = match args.value_of(ANALYZER_ARG) {
    Some(program) => CommandTokenizer::new(program, vec![]),
    None => CommandTokenizer::default(),
  };
  (pathing, lexicon, tokenizer)
}

fn notes(args: &ArgMatches) {
  let (pathing, lexicon, tokenizer) = setup(args);
  let mut batch = unwrap(Batch::new(&tokenizer, &lexicon, &pathing, None));
  unwrap(batch.run());
}

fn csv(args: &ArgMatches) {
  let (pathing, _, _) = setup(args);
  unwrap(make_csvs(&pathing));
}

fn run(args: &ArgMatches) {
  let (pathing, lexicon, tokenizer) = setup(args);
  let mut batch = unwrap(Batch::new(&tokenizer, &lexicon, &pathing, None));
  unwrap(batch.run());
  unwrap(make_csvs(&pathing));
}

fn common_args<'a, 'b>(subcommand: App<'a, 'b>) -> App<'a, 'b> {
  subcommand
    .arg(
      Arg::with_name(PATHING_ARG)
        .short("p")
        .takes_value(true)
        .help("the pathing file in JSON format (default: pathing.json)"),
    )
    .arg(
      Arg::with_name(ANALYZER_ARG)
        .short("t")
        .takes_value(true)
        .help("the external morphological analyzer command (default: mecab)"),
    )
    .arg(
      Arg::with_name(WORDS_SEED_ARG)
        .short("w")
        .takes_value(true)
        .help("CSV seed file for word definitions and readings"),
    )
    .arg(
      Arg::with_name(KANJI_SEED_ARG)
        .short("k")
        .takes_value(true)
        .help("CSV seed file for kanji keywords and readings"),
    )
}

fn main() {
  let notes_subcommand = common_args(
    SubCommand::with_name(NOTES_SUB_CMD)
      .about("Intake new sources and generate study notes")
      .help_message("see `notes -h`"),
  );
  let csv_subcommand = common_args(
    SubCommand::with_name(CSV_SUB_CMD)
      .about("Export existing notes to Anki CSV files")
      .help_message("see `csv -h`"),
  );
  let run_subcommand = common_args(
    SubCommand::with_name(RUN_SUB_CMD)
      .about("Generate notes, then export CSV files")
      .help_message("see `run -h`"),
  );

  let mut app = App::new("Japanese Study Card Generator")
    .version(crate_version!())
    .arg(
      Arg::with_name(VERBOSITY_ARG)
        .short("v")
        .multiple(true)
        .global(true)
        .help("increase log verbosity"),
    )
    .subcommand(notes_subcommand)
    .subcommand(csv_subcommand)
    .subcommand(run_subcommand);
  let matches = app.clone().get_matches();

  stderrlog::new()
    .verbosity(matches.occurrences_of(VERBOSITY_ARG) as usize)
    .init()
    .unwrap();

  match matches.subcommand() {
    (NOTES_SUB_CMD, Some(notes_matches)) => notes(notes_matches),
    (CSV_SUB_CMD, Some(csv_matches)) => csv(csv_matches),
    (RUN_SUB_CMD, Some(run_matches)) => run(run_matches),
    _ => {
      app.print_help().expect("Unable to write help");
      println!();
    }
  }
}
