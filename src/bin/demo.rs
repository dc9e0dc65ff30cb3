//! Sparkle demo: one feature with an `int assert` case, run while the
//! dispatcher logs every completed case through `tracing`.
//!
//! ```text
//! sparkle-demo [--config sparkle.toml] [--tag smoke]...
//! ```

use std::path::{Path, PathBuf};
use std::process;

use clap::{Arg, ArgAction, Command};
use sparkle::{
    logging, Case, EngineConfig, EngineResult, Feature, Runner, TracingLogger, TracingSink,
    CONFIG_FILE_NAME,
};
use tracing::info;

fn build_cli() -> Command {
    Command::new("sparkle-demo")
        .about("Run the Sparkle example feature")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_parser(clap::value_parser!(PathBuf))
                .help("Config file (default: ./sparkle.toml when present)"),
        )
        .arg(
            Arg::new("tag")
                .long("tag")
                .short('t')
                .action(ArgAction::Append)
                .help("Only run cases carrying this tag (repeatable)"),
        )
}

fn demo_feature() -> Feature {
    Feature::new("Test Feature Example")
        .case(
            Case::new("TestCase-1", |node, _| {
                let expected = 2;
                let actual = 1 + 1;
                node.assert_equals(expected, actual, "int assert");
                Ok(())
            })
            .tag("smoke"),
        )
        .case(
            Case::new("TestCase-2", |node, args| {
                node.assert_equals(args[1].clone(), args[0].as_int().unwrap_or_default() * 2, "double");
                Ok(())
            })
            .parameterize(|| vec![vec![1.into(), 2.into()], vec![21.into(), 42.into()]]),
        )
}

fn load_config(explicit: Option<&PathBuf>) -> EngineResult<EngineConfig> {
    match explicit {
        Some(path) => EngineConfig::from_file(path),
        None if Path::new(CONFIG_FILE_NAME).exists() => {
            EngineConfig::from_file(Path::new(CONFIG_FILE_NAME))
        }
        None => Ok(EngineConfig::default()),
    }
}

fn main() {
    let matches = build_cli().get_matches();

    let config = match load_config(matches.get_one::<PathBuf>("config")) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(2);
        }
    };

    if let Err(e) = logging::init(&config.log) {
        eprintln!("{}", e);
        process::exit(2);
    }

    let tags: Vec<String> = matches
        .get_many::<String>("tag")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let runner = Runner::new(config);
    let outcome = match runner.run(&[demo_feature()], &tags, &TracingLogger, TracingSink) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(2);
        }
    };

    let summary = outcome.summary();
    info!(
        target: "sparkle::demo",
        passed = summary.passed,
        failed = summary.failed,
        ignored = summary.ignored,
        "Demo finished"
    );
    println!(
        "{} cases: {} passed, {} failed, {} ignored",
        summary.total(),
        summary.passed,
        summary.failed,
        summary.ignored
    );

    if summary.has_failures() {
        process::exit(1);
    }
}
