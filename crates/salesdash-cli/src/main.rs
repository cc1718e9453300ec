// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result};
use config::Config;
use runtime::{DemoRuntime, HttpRuntime};
use salesdash_app::AppState;
use salesdash_db::Store;
use std::env;
use std::path::{Path, PathBuf};
use tracing::info;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `salesdash --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let log_path = logging::init(config.log_level(), config.log_file())?;
    info!(
        config = %options.config_path.display(),
        log = %log_path.display(),
        demo = options.demo,
        "starting salesdash"
    );

    let mut state = AppState::default();
    if options.demo {
        let store = open_demo_store(&config, options.data_file.as_deref())?;
        if options.check_only {
            return Ok(());
        }
        let mut runtime = DemoRuntime::new(&store, "demo data");
        return salesdash_tui::run_app(&mut state, &mut runtime, config.page_size());
    }

    let client = salesdash_api::Client::new(config.base_url(), config.timeout()?).with_context(
        || {
            format!(
                "invalid [api] config in {}; fix base_url/timeout values",
                options.config_path.display()
            )
        },
    )?;
    if options.check_only {
        return client.ping();
    }

    let mut runtime = HttpRuntime::new(client);
    salesdash_tui::run_app(&mut state, &mut runtime, config.page_size())
}

/// Builds the in-memory store behind `--demo`: an explicit data file wins over
/// `[demo].data_file`, and with neither the store is seeded with generated reps.
fn open_demo_store(config: &Config, data_file: Option<&Path>) -> Result<Store> {
    let store = Store::open_memory()?;
    store.bootstrap()?;

    let data_file = data_file
        .map(Path::to_path_buf)
        .or_else(|| config.demo_data_file());
    match data_file {
        Some(path) => {
            store.import_json(&path)?;
        }
        None => {
            store.seed_demo_data(config.demo_seed(), salesdash_db::DEFAULT_DEMO_SIZE)?;
        }
    }
    Ok(store)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    data_file: Option<PathBuf>,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        data_file: None,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--data" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--data requires a JSON file path"))?;
                options.data_file = Some(PathBuf::from(value.as_ref()));
                options.demo = true;
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("salesdash: sales rep dashboard");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Serve generated data from memory instead of the API");
    println!("  --data <json>            Like --demo, loading {{\"salesReps\": [...]}} from a file");
    println!("  --check                  Validate config and reach the data source, then exit");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, open_demo_store, parse_cli_args};
    use crate::config::Config;
    use anyhow::Result;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/salesdash-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                data_file: None,
                print_config_path: false,
                demo: false,
                print_example: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));

        let error = parse_cli_args(vec!["--data"], default_options_path())
            .expect_err("missing data value should fail");
        assert!(error.to_string().contains("--data requires a JSON file path"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn data_flag_implies_demo() -> Result<()> {
        let options = parse_cli_args(vec!["--data", "dummyData.json"], default_options_path())?;
        assert!(options.demo);
        assert_eq!(options.data_file, Some(PathBuf::from("dummyData.json")));
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--print-config-path", "--print-example-config", "--check", "-h"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(options.show_help);
        assert!(!options.demo);
        Ok(())
    }

    #[test]
    fn demo_store_is_seeded_without_data_file() -> Result<()> {
        let store = open_demo_store(&Config::default(), None)?;
        assert_eq!(
            store.count_sales_reps()?,
            salesdash_db::DEFAULT_DEMO_SIZE as u64
        );
        Ok(())
    }

    #[test]
    fn demo_store_prefers_data_file_argument() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("dummyData.json");
        std::fs::write(
            &path,
            r#"{"salesReps":[{"id":1,"name":"Alice","role":"AE","region":"Europe","skills":[],"deals":[],"clients":[]}]}"#,
        )?;

        let store = open_demo_store(&Config::default(), Some(&path))?;
        assert_eq!(store.count_sales_reps()?, 1);
        Ok(())
    }

    #[test]
    fn demo_store_reports_missing_data_file() {
        let error = open_demo_store(
            &Config::default(),
            Some(&PathBuf::from("/nonexistent/dummyData.json")),
        )
        .err()
        .expect("missing file should fail");
        assert!(format!("{error:#}").contains("dummyData.json"));
    }
}
