// File: ./src/cli.rs
//! Command-line arguments and help text.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CliCommand {
    /// The numbered menu.
    #[default]
    Interactive,
    List,
    Summary,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub file: Option<PathBuf>,
    pub command: CliCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    #[error("option '{0}' needs a value")]
    MissingValue(String),
    #[error("unknown argument '{0}'")]
    Unknown(String),
    #[error("only one command may be given (got '{0}' after another)")]
    ExtraCommand(String),
}

/// Parses arguments, excluding the binary name.
pub fn parse_args<I, S>(args: I) -> Result<CliArgs, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out = CliArgs::default();
    let mut command_seen = false;
    let mut iter = args.into_iter().map(Into::into);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" | "help" => {
                out.command = CliCommand::Help;
                return Ok(out);
            }
            "-r" | "--root" => {
                let v = iter.next().ok_or_else(|| CliError::MissingValue(arg.clone()))?;
                out.root = Some(PathBuf::from(v));
            }
            "-f" | "--file" => {
                let v = iter.next().ok_or_else(|| CliError::MissingValue(arg.clone()))?;
                out.file = Some(PathBuf::from(v));
            }
            "list" | "summary" => {
                if command_seen {
                    return Err(CliError::ExtraCommand(arg));
                }
                command_seen = true;
                out.command = if arg == "list" {
                    CliCommand::List
                } else {
                    CliCommand::Summary
                };
            }
            _ => return Err(CliError::Unknown(arg)),
        }
    }
    Ok(out)
}

pub fn print_help(binary_name: &str) {
    println!(
        "ptrack v{} - A small personal productivity tracker",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [--root <path>] [--file <path>]", binary_name);
    println!("    {} list [--file <path>]", binary_name);
    println!("    {} summary [--file <path>]", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("COMMANDS:");
    println!("    (none)                Start the interactive menu");
    println!("    list                  Print all tasks and exit");
    println!("    summary               Print total/completed/pending counts and exit");
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -f, --file <path>     Read and write tasks in this file.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("TASK FILE:");
    println!("    One task per line: <id>,<title>,<DD-MM-YYYY>,<0|1>");
    println!("    Titles may not contain commas.");
}
