use anyhow::Result;
use clap::{Arg, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use salecast_cli::api::server;
use salecast_cli::batch;
use salecast_cli::config::ServerConfig;
use salecast_model::Artifact;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("SALECAST_LOG", "error,salecast=info"))
        .init();

    let matches = Command::new("salecast")
        .version(clap::crate_version!())
        .about("Seasonal sale-prediction inference service")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("serve")
                .about("Load the model artifact and serve /health and /predict over HTTP")
                .arg(
                    Arg::new("config")
                        .help("Path to server configuration file (JSON)")
                        .required(false)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("artifact")
                        .short('a')
                        .long("artifact")
                        .help(
                            "Path to the model artifact. Overrides the artifact_path \
                             specified in the configuration file.",
                        )
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("host")
                        .long("host")
                        .help("Interface to bind. Overrides the configuration file.")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::Hostname),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .help("Port to listen on. Overrides the configuration file.")
                        .value_parser(clap::value_parser!(u16)),
                )
                .arg(
                    Arg::new("workers")
                        .short('w')
                        .long("workers")
                        .help("Number of HTTP worker threads.")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
        .subcommand(
            Command::new("predict")
                .about("Score a JSON file of records offline with the model artifact")
                .arg(
                    Arg::new("artifact")
                        .short('a')
                        .long("artifact")
                        .help("Path to the model artifact")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .help("JSON file holding one record or a list of records")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Path to write predictions (*.csv or *.tsv). Defaults to stdout.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("serve", sub_m)) => handle_serve(sub_m),
        Some(("predict", sub_m)) => handle_predict(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_serve(matches: &ArgMatches) -> Result<()> {
    let config_path: Option<&PathBuf> = matches.get_one("config");
    match config_path {
        Some(path) => eprintln!("[salecast::serve] Using config: {:?}", path),
        None => eprintln!("[salecast::serve] No config file provided; using defaults."),
    }

    let config = ServerConfig::from_arguments(config_path, matches)?;

    if config_path.is_none() {
        let default_json = serde_json::to_string_pretty(&config)?;
        println!("{}", default_json);
    }

    // Load before binding: a bad artifact must keep the service down.
    let artifact = match Artifact::load(&config.artifact_path) {
        Ok(artifact) => artifact,
        Err(e) => {
            log::error!("Failed to load model artifact: {:#}", e);
            eprintln!("[salecast::serve] Failed to load model artifact: {}", e);
            std::process::exit(1)
        }
    };

    actix_web::rt::System::new().block_on(server::run(config, artifact))?;
    Ok(())
}

fn handle_predict(matches: &ArgMatches) -> Result<()> {
    let artifact_path: &PathBuf = matches
        .get_one("artifact")
        .expect("artifact is a required argument");
    let input_path: &PathBuf = matches
        .get_one("input")
        .expect("input is a required argument");
    let output_path: Option<&PathBuf> = matches.get_one("output_file");

    match batch::run_batch(artifact_path, input_path, output_path.map(PathBuf::as_path)) {
        Ok(()) => Ok(()),
        Err(e) => {
            log::error!("Prediction failed: {:#}", e);
            eprintln!("[salecast::predict] Prediction failed: {:#}", e);
            std::process::exit(1)
        }
    }
}
