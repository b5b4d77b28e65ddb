use std::{io::stdout, path::PathBuf};

use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, ArgAction,
    ArgMatches, Command,
};
use miette::Result;

use crate::{
    app_config::Settings, config::Repositories, document::Owners, dry_run::DryRun,
    integrations::github::GitHub,
};

mod app_config;
mod apply;
mod batch;
mod collect;
mod config;
mod document;
mod dry_run;
mod fs;
mod integrations;

const COLLECT: &str = "collect";
const APPLY: &str = "apply";
const DRY_RUN: &str = "dry-run";
const CONFIG: &str = "config";
const FILE: &str = "file";
const RELEASE_BRANCH: &str = "release-branch";

/// Build the command line interface, with one subcommand per pass over the releases document.
#[must_use]
pub fn command() -> Command {
    Command::new(crate_name!())
        .author(crate_authors!())
        .version(crate_version!())
        .about(crate_description!())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new(COLLECT)
                .about("Pull the latest release of every configured repository and all commits since it into a YAML file")
                .arg(dry_run_arg())
                .arg(
                    Arg::new(CONFIG)
                        .short('c')
                        .long(CONFIG)
                        .env("CONFIG")
                        .default_value("config.yml")
                        .value_parser(value_parser!(PathBuf))
                        .help("Path to the file listing repositories by owner"),
                )
                .arg(file_arg("Path to write the releases info to")),
        )
        .subcommand(
            Command::new(APPLY)
                .about("Create a release for every repository in a YAML file generated by `collect` and edited since")
                .arg(dry_run_arg())
                .arg(file_arg("Path to the releases info to apply"))
                .arg(
                    Arg::new(RELEASE_BRANCH)
                        .long(RELEASE_BRANCH)
                        .env("RELEASE_BRANCH")
                        .default_value("master")
                        .help("Branch to create the releases from"),
                ),
        )
}

fn dry_run_arg() -> Arg {
    Arg::new(DRY_RUN)
        .long(DRY_RUN)
        .action(ArgAction::SetTrue)
        .help("Print what would happen instead of writing files or creating releases")
}

fn file_arg(help: &'static str) -> Arg {
    Arg::new(FILE)
        .short('f')
        .long(FILE)
        .env("FILE")
        .default_value("releases.yml")
        .value_parser(value_parser!(PathBuf))
        .help(help)
}

/// Run whichever subcommand `matches` selected.
///
/// ## Errors
/// Anything which stops the selected pass, rendered by `miette`.
pub async fn run(matches: &ArgMatches) -> Result<()> {
    let github = GitHub::new(&Settings::from_env())?;
    let mut stdout = stdout();
    match matches.subcommand() {
        Some((COLLECT, sub_matches)) => {
            let dry_run: DryRun = if dry_run_of(sub_matches) {
                Some(&mut stdout)
            } else {
                None
            };
            let repositories = Repositories::load(path_of(sub_matches, CONFIG))?;
            log::info!(
                "Collecting releases for {} repositories",
                repositories.len()
            );
            let owners = collect::collect_all(&github, &repositories).await?;
            owners.write(path_of(sub_matches, FILE), dry_run)?;
        }
        Some((APPLY, sub_matches)) => {
            let dry_run: DryRun = if dry_run_of(sub_matches) {
                Some(&mut stdout)
            } else {
                None
            };
            let owners = Owners::read(path_of(sub_matches, FILE))?;
            log::info!("Applying releases for {} repositories", owners.len());
            let branch = sub_matches
                .get_one::<String>(RELEASE_BRANCH)
                .map_or("master", String::as_str);
            apply::apply_all(&github, &owners, branch, dry_run).await?;
        }
        _ => unreachable!("clap requires a subcommand"),
    }
    Ok(())
}

fn dry_run_of(matches: &ArgMatches) -> bool {
    matches.get_flag(DRY_RUN)
}

#[allow(clippy::expect_used)] // clap always fills in the default
fn path_of<'a>(matches: &'a ArgMatches, id: &str) -> &'a PathBuf {
    matches
        .get_one::<PathBuf>(id)
        .expect("argument has a default value")
}
