//! Command dispatch: maps parsed arguments onto services

use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::Puzzle;
use crate::cli::args::{Cli, Commands, ConfigCommands, SnailCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Run the selected subcommand against a container built from `settings`.
pub fn execute_command(cli: &Cli, settings: Settings) -> CliResult<()> {
    let container = ServiceContainer::new(settings);
    execute_with(cli, &container)
}

/// Same as [`execute_command`] with an explicit container.
pub fn execute_with(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Solve { puzzle, input }) => {
            cmd_solve(container, Puzzle::from(*puzzle), input.as_ref())
        }
        Some(Commands::Snail { command }) => cmd_snail(container, command),
        Some(Commands::Config { command }) => cmd_config(container, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, try `advent --help`".to_string(),
        )),
    }
}

#[instrument(level = "debug", skip(container))]
fn cmd_solve(container: &ServiceContainer, puzzle: Puzzle, input: Option<&PathBuf>) -> CliResult<()> {
    let path = container.puzzles.resolve_input(puzzle, input.map(PathBuf::as_path));
    debug!("input: {}", path.display());
    let answers = container.puzzles.solve(puzzle, &path)?;

    output::header(&format!("Day {}: {}", puzzle.day(), puzzle));
    output::answer("part 1", &answers.part1);
    output::answer("part 2", &answers.part2);
    Ok(())
}

/// Reject blank number arguments before they reach the parser.
fn require_number(arg: &str, position: usize) -> CliResult<&str> {
    if arg.trim().is_empty() {
        return Err(CliError::InvalidArgs(format!(
            "snail number {} is empty",
            position
        )));
    }
    Ok(arg)
}

fn cmd_snail(container: &ServiceContainer, command: &SnailCommands) -> CliResult<()> {
    let snail = &container.snailfish;
    match command {
        SnailCommands::Add { numbers } => {
            for (i, number) in numbers.iter().enumerate() {
                require_number(number, i + 1)?;
            }
            let sum = snail.add(numbers)?;
            output::info(&sum.total);
            output::action("magnitude", &sum.magnitude);
        }
        SnailCommands::Magnitude { number } => {
            output::info(&snail.magnitude(require_number(number, 1)?)?);
        }
        SnailCommands::Reduce { number } => {
            let (reduced, steps) = snail.reduce(require_number(number, 1)?)?;
            output::info(&reduced);
            debug!("{} reduction steps", steps);
        }
        SnailCommands::Tree { number } => {
            output::info(&snail.tree(require_number(number, 1)?)?);
        }
    }
    Ok(())
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    let settings = &container.settings;
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::warning("no home directory, global config disabled"),
            }
            output::action("local", &local_config_path(&settings.input_dir).display());
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(&settings.input_dir)
            };

            if container.fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            container
                .fs
                .ensure_parent(&path)
                .map_err(|e| InfraError::io(format!("create parent of {}", path.display()), e))?;
            container
                .fs
                .write(&path, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("created", &path.display());
        }
    }
    Ok(())
}
