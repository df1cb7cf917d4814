//! `teps` command line
//!
//! Rebuilds the index, validates the folder, creates and renumbers
//! proposals. Results go to stdout, diagnostics to stderr.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::process::ExitCode;
use tep_registry::{
    GithubPulls, NewTep, PendingSource, Registry, RegistryConfig, StaticPendingSource,
};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod render;

fn cli() -> Command {
    let offline = Arg::new("offline")
        .long("offline")
        .action(ArgAction::SetTrue)
        .help("Do not fetch pending pull requests; their numbers are not considered");
    let update_table = Arg::new("update-table")
        .long("update-table")
        .action(ArgAction::SetTrue)
        .help("Rebuild the index afterwards");

    Command::new("teps")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Manage Tekton Enhancement Proposals")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("teps-folder")
                .long("teps-folder")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("The folder that contains the TEP files"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("YAML configuration file"),
        )
        .arg(
            Arg::new("pending-url")
                .long("pending-url")
                .global(true)
                .help("Endpoint listing open pull requests"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("More log output, repeat for more"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .global(true)
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .help("Only log errors"),
        )
        .subcommand(Command::new("table").about("Regenerate the TEP table in the index file"))
        .subcommand(Command::new("validate").about("Check every TEP and report all defects"))
        .subcommand(
            Command::new("new")
                .about("Create a new TEP with the next free number")
                .arg(
                    Arg::new("title")
                        .short('t')
                        .long("title")
                        .required(true)
                        .help("The title for the TEP in a few words"),
                )
                .arg(
                    Arg::new("author")
                        .short('a')
                        .long("author")
                        .required(true)
                        .action(ArgAction::Append)
                        .help("GitHub handle of an author, repeat for several"),
                )
                .arg(update_table.clone())
                .arg(offline.clone()),
        )
        .subcommand(
            Command::new("renumber")
                .about("Copy a TEP under the next free number, leaving the original in place")
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("TEP file to renumber"),
                )
                .arg(update_table)
                .arg(offline),
        )
}

fn init_tracing(matches: &ArgMatches) -> Result<(), tracing_subscriber::util::TryInitError> {
    let level = if matches.get_flag("quiet") {
        "error"
    } else {
        match matches.get_count("verbose") {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish()
        .try_init()
}

fn load_config(matches: &ArgMatches) -> Result<RegistryConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => RegistryConfig::load(path)?,
        None => RegistryConfig::default(),
    };
    if let Some(folder) = matches.get_one::<PathBuf>("teps-folder") {
        config = config.with_folder(folder);
    }
    if let Some(url) = matches.get_one::<String>("pending-url") {
        config = config.with_pending_url(url);
    }
    Ok(config)
}

fn pending_source(registry: &Registry, args: &ArgMatches) -> Result<Box<dyn PendingSource>> {
    if args.get_flag("offline") {
        tracing::warn!("offline: numbers claimed by open pull requests are not considered");
        return Ok(Box::new(StaticPendingSource::empty()));
    }
    Ok(Box::new(GithubPulls::new(registry.config().pending_url.clone())?))
}

fn table(registry: &Registry) -> Result<()> {
    let index = registry.index()?;
    let template = registry.read_template()?;
    let rendered = render::render_index(&template, &index)?;
    let path = registry.write_index(&rendered)?;
    tracing::info!(rows = index.len(), "index rebuilt");
    println!("{}", path.display());
    Ok(())
}

fn validate(registry: &Registry) -> Result<ExitCode> {
    let errors = registry.validate()?;
    if errors.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }
    for issue in errors.issues() {
        eprintln!("{issue}");
    }
    tracing::error!(issues = errors.len(), "validation failed");
    Ok(ExitCode::FAILURE)
}

fn new(registry: &Registry, args: &ArgMatches) -> Result<()> {
    let title = args
        .get_one::<String>("title")
        .context("--title is required")?;
    let authors: Vec<String> = args
        .get_many::<String>("author")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let source = pending_source(registry, args)?;
    let created = registry.create(&NewTep::new(title, authors), source.as_ref())?;
    println!("{}", created.path.display());

    if args.get_flag("update-table") {
        table(registry)?;
    }
    Ok(())
}

fn renumber(registry: &Registry, args: &ArgMatches) -> Result<()> {
    let filename = args
        .get_one::<PathBuf>("filename")
        .context("a filename is required")?;

    let source = pending_source(registry, args)?;
    let outcome = registry.renumber(filename, source.as_ref())?;
    println!(
        "{} ({}) -> {} ({})",
        outcome.old_path.display(),
        outcome.old_number,
        outcome.new_path.display(),
        outcome.new_number
    );

    if args.get_flag("update-table") {
        table(registry)?;
    }
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<ExitCode> {
    let config = load_config(matches)?;
    let registry = Registry::open(config)?;

    match matches.subcommand() {
        Some(("table", _)) => table(&registry)?,
        Some(("validate", _)) => return validate(&registry),
        Some(("new", args)) => new(&registry, args)?,
        Some(("renumber", args)) => renumber(&registry, args)?,
        _ => unreachable!("subcommand is required"),
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    if let Err(err) = init_tracing(&matches) {
        eprintln!("warning: logging disabled: {err}");
    }

    match run(&matches) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn authors_accumulate() {
        let matches = cli()
            .try_get_matches_from(["teps", "new", "-t", "A title", "-a", "alice", "-a", "bob"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        let authors: Vec<&String> = args.get_many::<String>("author").unwrap().collect();
        assert_eq!(authors, ["alice", "bob"]);
        assert!(!args.get_flag("offline"));
    }

    #[test]
    fn second_subscriber_install_is_reported() {
        let matches = cli().try_get_matches_from(["teps", "validate", "-q"]).unwrap();
        let _ = init_tracing(&matches);
        assert!(init_tracing(&matches).is_err());
    }

    #[test]
    fn global_folder_after_subcommand() {
        let matches = cli()
            .try_get_matches_from(["teps", "validate", "--teps-folder", "teps", "-vv"])
            .unwrap();
        let config = load_config(&matches).unwrap();
        assert_eq!(config.folder, PathBuf::from("teps"));
        assert_eq!(matches.get_count("verbose"), 2);
    }
}
