mod settings;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inventario_core::{dispatch, ApiResponse, Error, Fields, Gateway, COMMANDS};
use tracing::debug;

#[derive(Parser)]
#[command(name = "inventario", version, about = "Seed and supplier inventory client")]
struct Cli {
    /// API base URL (overrides the config file and INVENTARIO_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Optional settings file
    #[arg(long, default_value = "inventario.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one command, e.g. `run seed.get code=S-01`
    Run {
        /// Registered command name
        name: String,
        /// Field values as key=value
        fields: Vec<String>,
    },
    /// List the registered commands and their fields
    Commands,
    /// Read commands from stdin, one per line; errors do not stop the session
    Shell,
}

fn main() -> ExitCode {
    settings::init_tracing();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    if let Commands::Commands = cli.command {
        print_commands(&mut io::stdout())?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = settings::load(&cli.config, cli.base_url, cli.timeout_secs)
        .context("loading settings")?;
    debug!(base_url = %config.base_url, timeout_secs = config.timeout_secs, "settings loaded");
    let gateway = Gateway::from_config(&config)?;

    match cli.command {
        Commands::Run { name, fields } => {
            let fields = Fields::from_pairs(fields.iter().map(String::as_str))
                .map_err(|token| anyhow::anyhow!("expected key=value, got {token:?}"))?;
            let ok = present(
                dispatch(&gateway, &name, &fields),
                &mut io::stdout(),
                &mut io::stderr(),
            )?;
            Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Commands::Shell => {
            shell(&gateway, io::stdin().lock(), &mut io::stdout(), &mut io::stderr())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Commands => Ok(ExitCode::SUCCESS),
    }
}

fn print_commands(out: &mut impl Write) -> io::Result<()> {
    for command in COMMANDS {
        writeln!(out, "{:<20} {}", command.name, command.summary)?;
        writeln!(out, "{:<20} fields: {}", "", command.fields.join(", "))?;
    }
    Ok(())
}

/// Print a command outcome. Returns whether the command itself succeeded;
/// non-2xx statuses are still printed as results.
fn present(
    result: Result<ApiResponse, Error>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<bool> {
    match result {
        Ok(response) => {
            match serde_json::to_string_pretty(&response) {
                Ok(text) => writeln!(out, "{text}")?,
                Err(_) => writeln!(out, "{response:?}")?,
            }
            Ok(true)
        }
        Err(e) => {
            writeln!(err, "error: {e}")?;
            Ok(false)
        }
    }
}

/// Run one line of shell input. Failures are reported on `err` and never
/// end the session.
fn shell_line(gateway: &Gateway, line: &str, out: &mut impl Write, err: &mut impl Write) -> io::Result<()> {
    let tokens = match split_line(line) {
        Ok(tokens) => tokens,
        Err(msg) => return writeln!(err, "error: {msg}"),
    };
    let Some((name, rest)) = tokens.split_first() else {
        return Ok(());
    };
    match Fields::from_pairs(rest.iter().map(String::as_str)) {
        Ok(fields) => {
            present(dispatch(gateway, name, &fields), out, err)?;
        }
        Err(token) => writeln!(err, "error: expected key=value, got {token:?}")?,
    }
    Ok(())
}

fn shell(
    gateway: &Gateway,
    input: impl BufRead,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<()> {
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        match trimmed {
            "quit" | "exit" => break,
            "help" => print_commands(out)?,
            _ if trimmed.is_empty() || trimmed.starts_with('#') => {}
            _ => shell_line(gateway, trimmed, out, err)?,
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    writeln!(out)
}

/// Split on whitespace, keeping double-quoted runs together:
/// `seed.create name="Sweet corn"` → `["seed.create", "name=Sweet corn"]`.
fn split_line(line: &str) -> Result<Vec<String>, &'static str> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut pending = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                pending = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if pending {
                    tokens.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if in_quotes {
        return Err("unterminated quote");
    }
    if pending {
        tokens.push(current);
    }
    Ok(tokens)
}
