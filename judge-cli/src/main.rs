#[macro_use]
extern crate error_chain;
extern crate clap;
extern crate judge;

mod catalog;
mod config;
mod display;
mod launch;

use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use error_chain::ChainedError;

use judge::types::Verdict;

error_chain! {
    types {
        Error, ErrorKind, ResultExt, Result;
    }

    links {
        Judge(::judge::Error, ::judge::ErrorKind);
    }

    errors {
        /// The catalog directory is missing a required file, or the exercise name is unknown.
        ConfigurationError(message: String) {
            description("invalid catalog configuration")
            display("{}", message)
        }
    }
}

fn get_arg_matches() -> clap::ArgMatches<'static> {
    clap::App::new("judge-cli")
        .version("0.1.0")
        .author("Lancern <msrlancern@126.com>")
        .about("Command-line front-end for judging programming exercise submissions.")
        .setting(clap::AppSettings::SubcommandRequiredElseHelp)
        .arg(
            clap::Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("increase logging verbosity (repeatable)"),
        )
        .arg(
            clap::Arg::with_name("quiet")
                .short("q")
                .long("quiet")
                .help("suppress all logging output"),
        )
        .arg(
            clap::Arg::with_name("config")
                .short("c")
                .long("config")
                .takes_value(true)
                .value_name("CONFIG_FILE")
                .help("path to a YAML application configuration file"),
        )
        .subcommand(
            clap::SubCommand::with_name("list")
                .about("List the exercises available in a catalog directory")
                .arg(
                    clap::Arg::with_name("catalog_dir")
                        .takes_value(true)
                        .value_name("CATALOG_DIR")
                        .help("path to the exercise catalog directory (default: config's catalog_dir)"),
                ),
        )
        .subcommand(
            clap::SubCommand::with_name("run")
                .about("Judge a program against one exercise's test suite")
                .arg(
                    clap::Arg::with_name("catalog_dir")
                        .long("catalog-dir")
                        .takes_value(true)
                        .value_name("CATALOG_DIR")
                        .help("path to the exercise catalog directory (default: config's catalog_dir)"),
                )
                .arg(
                    clap::Arg::with_name("exercise")
                        .required(true)
                        .takes_value(true)
                        .value_name("EXERCISE")
                        .help("name of the exercise to judge against"),
                )
                .arg(
                    clap::Arg::with_name("program")
                        .required(true)
                        .takes_value(true)
                        .value_name("PROGRAM")
                        .help("path to the submitted program file"),
                ),
        )
        .get_matches()
}

fn init_logging(matches: &clap::ArgMatches<'_>) {
    let verbosity = matches.occurrences_of("verbose") as usize;
    let quiet = matches.is_present("quiet");

    stderrlog::new()
        .module(module_path!())
        .module("judge")
        .module("sandbox")
        .quiet(quiet)
        .verbosity(verbosity)
        .init()
        .expect("logger must only be initialized once");
}

/// Resolve the catalog directory to use: the `catalog_dir` argument if given, else the
/// application configuration's default.
fn resolve_catalog_dir(matches: &clap::ArgMatches<'_>, config: &config::AppConfig) -> PathBuf {
    match matches.value_of("catalog_dir") {
        Some(dir) => PathBuf::from_str(dir).unwrap(),
        None => config.catalog_dir.clone(),
    }
}

fn do_list(matches: &clap::ArgMatches<'_>, config: &config::AppConfig) -> Result<()> {
    let catalog_dir = resolve_catalog_dir(matches, config);
    let names = catalog::list_exercises(&catalog_dir)?;

    for name in names {
        println!("{}", name);
    }

    Ok(())
}

fn do_run(matches: &clap::ArgMatches<'_>, config: &config::AppConfig) -> Result<()> {
    let catalog_dir = resolve_catalog_dir(matches, config);
    let exercise = matches.value_of("exercise").unwrap();
    let program = matches.value_of("program").unwrap();

    let spec = catalog::load_exercise(&catalog_dir, exercise, config)?;
    let argv = launch::derive_command(program);

    let cancelled = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancelled);
    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
    })
    .expect("failed to install SIGINT handler");

    let mut hook = |batch: &judge::types::BatchResult| {
        let tc = batch.testcases.last().expect("hook fires after a case completes");
        println!("{}", display::render_case(tc));
        println!("{}", display::render_output(tc));
    };

    let result =
        judge::judge_program_cancellable(&argv, &spec, &cancelled, Some(&mut hook))?;

    println!("{}", display::render_summary(&result));

    if result.overall_verdict == Verdict::AnswerCorrect {
        Ok(())
    } else {
        process::exit(1);
    }
}

fn load_config(matches: &clap::ArgMatches<'_>) -> Result<config::AppConfig> {
    match matches.value_of("config") {
        Some(path) => config::load(std::path::Path::new(path)),
        None => Ok(config::AppConfig::default()),
    }
}

fn do_main() -> Result<()> {
    let matches = get_arg_matches();
    init_logging(&matches);
    let config = load_config(&matches)?;

    match matches.subcommand() {
        ("list", Some(list_matches)) => do_list(list_matches, &config),
        ("run", Some(run_matches)) => do_run(run_matches, &config),
        _ => unreachable!(),
    }
}

fn main() {
    if let Err(e) = do_main() {
        eprintln!("error: {}", e.display_chain().to_string());
        process::exit(1);
    }
}
