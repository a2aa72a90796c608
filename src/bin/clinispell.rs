extern crate clap;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};

use clap::{App, Arg, SubCommand};
use rayon::prelude::*;

use clinispell::*;

pub fn common_arguments<'a, 'b>() -> Vec<clap::Arg<'a, 'b>> {
    let mut args: Vec<Arg> = Vec::new();
    args.push(
        Arg::with_name("config")
            .long("config")
            .short("c")
            .help("Configuration file (TOML). Missing sections fall back to built-in defaults.")
            .takes_value(true),
    );
    args.push(
        Arg::with_name("model")
            .long("model")
            .short("m")
            .help("Load a previously trained frequency model instead of training from a corpus")
            .takes_value(true)
            .required_unless("corpus"),
    );
    args.push(
        Arg::with_name("corpus")
            .long("corpus")
            .short("f")
            .help("Prepared training text (plain text). The engine tokenizes it and builds unigram, bigram and trigram tables from scratch; for larger corpora prefer training once and reusing the model file.")
            .takes_value(true)
            .required_unless("model"),
    );
    args.push(
        Arg::with_name("medical-terms")
            .long("medical-terms")
            .short("t")
            .help("Newline-separated lowercase medical terms. Terms in this list receive the configured domain boost during ranking. A missing file is not an error, the engine continues with an empty set.")
            .takes_value(true),
    );
    args
}

fn init_engine(args: &clap::ArgMatches, debug: bool) -> SpellEngine {
    let config = if let Some(path) = args.value_of("config") {
        Config::load_toml(path).expect("Error loading configuration file")
    } else {
        Config::default()
    };
    let mut engine = SpellEngine::new(config, debug).expect("Invalid configuration");
    if let Some(path) = args.value_of("model") {
        engine
            .load_model(path)
            .expect("Error loading frequency model");
    }
    if let Some(path) = args.value_of("corpus") {
        engine
            .read_corpus(path)
            .unwrap_or_else(|e| panic!("Error reading corpus {}: {}", path, e));
    }
    let medical_terms = args
        .value_of("medical-terms")
        .map(|path| path.to_string())
        .unwrap_or_else(|| engine.config.domain.medical_terms_file.clone());
    engine
        .read_medical_terms(&medical_terms)
        .unwrap_or_else(|e| panic!("Error reading medical terms {}: {}", medical_terms, e));
    engine.build().expect("Error building engine");
    engine
}

///Correct lines from an input stream, one JSON result per line. Queries
///are pure after build, so the batch is corrected in parallel.
fn process(engine: &SpellEngine, inputstream: impl Read, model_type: ModelType, pretty: bool) {
    let lines: Vec<String> = BufReader::new(inputstream)
        .lines()
        .filter_map(Result::ok)
        .collect();
    let results: Vec<String> = lines
        .par_iter()
        .map(|line| {
            let result = engine.check_text(line, model_type);
            if pretty {
                serde_json::to_string_pretty(&result)
            } else {
                serde_json::to_string(&result)
            }
            .expect("serializing correction result")
        })
        .collect();
    for output in results {
        println!("{}", output);
    }
}

fn read_test_pairs(filename: &str) -> Vec<(String, String)> {
    let f = File::open(filename)
        .unwrap_or_else(|e| panic!("Error opening test set {}: {}", filename, e));
    BufReader::new(f)
        .lines()
        .filter_map(Result::ok)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut fields = line.splitn(2, '\t');
            let original = fields.next().unwrap_or("").to_string();
            let expected = fields.next().unwrap_or("").to_string();
            (original, expected)
        })
        .collect()
}

fn main() {
    let rootargs = App::new("Clinispell")
        .version("0.1")
        .about("Domain-aware spelling correction for medical text")
        .subcommand(
            SubCommand::with_name("train")
                .about("Train a frequency model from a corpus and write it to disk")
                .args(&common_arguments())
                .arg(
                    Arg::with_name("output")
                        .long("output")
                        .short("o")
                        .help("Where to write the trained model")
                        .takes_value(true)
                        .required(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("check")
                .about("Correct input lines; each line yields one JSON result on stdout")
                .args(&common_arguments())
                .arg(
                    Arg::with_name("model-type")
                        .long("model-type")
                        .short("M")
                        .help("Which n-gram model drives contextual scoring (bigram or trigram; anything else degrades to unigram scoring)")
                        .takes_value(true)
                        .default_value("bigram"),
                )
                .arg(
                    Arg::with_name("pretty")
                        .long("pretty")
                        .help("Pretty-print the JSON output")
                        .required(false),
                )
                .arg(
                    Arg::with_name("files")
                        .help("Input files (use - for standard input)")
                        .takes_value(true)
                        .multiple(true)
                        .required(false),
                ),
        )
        .subcommand(
            SubCommand::with_name("evaluate")
                .about("Evaluate accuracy against a tab-separated test set of misspelled/expected pairs")
                .args(&common_arguments())
                .arg(
                    Arg::with_name("test-set")
                        .long("test-set")
                        .short("T")
                        .help("Tab-separated file with one misspelled<TAB>expected pair per line")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    Arg::with_name("model-type")
                        .long("model-type")
                        .short("M")
                        .help("Which n-gram model drives contextual scoring")
                        .takes_value(true)
                        .default_value("bigram"),
                ),
        )
        .subcommand(
            SubCommand::with_name("stats")
                .about("Print statistics about the trained model as JSON")
                .args(&common_arguments()),
        )
        .arg(
            Arg::with_name("debug")
                .long("debug")
                .short("D")
                .help("Output debug diagnostics to stderr")
                .required(false),
        )
        .get_matches();

    let debug = rootargs.is_present("debug");

    if let Some(args) = rootargs.subcommand_matches("train") {
        eprintln!("Training model...");
        let engine = init_engine(args, debug);
        let output = args.value_of("output").expect("output path is required");
        engine.save_model(output).expect("Error saving model");
        eprintln!(
            "Trained on {} tokens ({} vocabulary entries), model written to {}",
            engine.model.total_tokens(),
            engine.model.vocabulary_size(),
            output
        );
    } else if let Some(args) = rootargs.subcommand_matches("check") {
        eprintln!("Initializing engine...");
        let engine = init_engine(args, debug);
        let model_type = ModelType::from_name(
            args.value_of("model-type").expect("model-type has a default"),
        );
        let pretty = args.is_present("pretty");
        let files: Vec<&str> = if args.is_present("files") {
            args.values_of("files").expect("files are present").collect()
        } else {
            vec!["-"]
        };
        for filename in files {
            match filename {
                "-" | "STDIN" | "stdin" => {
                    eprintln!("(accepting standard input; enter text to check, one per line)");
                    let stdin = io::stdin();
                    process(&engine, stdin, model_type, pretty);
                }
                _ => {
                    let f = File::open(filename)
                        .unwrap_or_else(|e| panic!("Error opening file {}: {}", filename, e));
                    process(&engine, f, model_type, pretty);
                }
            }
        }
    } else if let Some(args) = rootargs.subcommand_matches("evaluate") {
        eprintln!("Initializing engine...");
        let engine = init_engine(args, debug);
        let model_type = ModelType::from_name(
            args.value_of("model-type").expect("model-type has a default"),
        );
        let pairs = read_test_pairs(args.value_of("test-set").expect("test-set is required"));
        let report = engine.evaluate(&pairs, model_type);
        println!(
            "{}",
            serde_json::to_string_pretty(&report).expect("serializing evaluation report")
        );
    } else if let Some(args) = rootargs.subcommand_matches("stats") {
        let engine = init_engine(args, debug);
        println!(
            "{}",
            serde_json::to_string_pretty(&engine.report()).expect("serializing engine report")
        );
    } else {
        eprintln!("No command specified, see --help");
        std::process::exit(1);
    }
}
