#![warn(missing_docs, clippy::pedantic, clippy::perf)]
//! A terminal front end for mawa.
//!
//! Evaluates the expression given on the command line, or reads command
//! lines from stdin and runs them through a session.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;
use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mawa::calc::Calculator;
use mawa::commands::{Message, Session, Settings};
use mawa::structures::Snowflake;

mod init;
mod structures;
mod terminal;

use terminal::Terminal;

/// mawa: calculator and text commands in the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a configuration file
    #[arg(short, long, env = "MAWA_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level, regardless of RUST_LOG
    #[arg(short, long)]
    debug: bool,

    /// Command prefix (overrides config file)
    #[arg(long)]
    prefix: Option<String>,

    /// An expression to evaluate. Without one, command lines are read from stdin
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    expression: Vec<String>
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let filter = if args.debug {
        EnvFilter::new("mawa=debug,mawa_cli=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("mawa=info,mawa_cli=info"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut settings = init::load_config(args.config.as_deref())
        .context("failed to load configuration")?
        .settings;
    if let Some(prefix) = args.prefix {
        settings.prefix = prefix;
    }

    if args.expression.is_empty() {
        repl(settings)
    } else {
        Ok(evaluate(&settings, &args.expression.join(" ")))
    }
}

/// Evaluates one expression, printing the result or the error.
fn evaluate(settings: &Settings, expr: &str) -> ExitCode {
    let calculator = Calculator::new(settings.limits);
    match calculator.evaluate(expr) {
        Ok(number) => {
            println!("{}", number.format(settings.precision));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Feeds stdin lines to a session as messages until stdin closes.
fn repl(settings: Settings) -> anyhow::Result<ExitCode> {
    info!(prefix = %settings.prefix, "reading commands from stdin");
    let mut session = Session::new(settings);
    let mut terminal = Terminal::new(io::stdout().lock(), io::stderr().lock());
    for (count, line) in io::stdin().lock().lines().enumerate() {
        let line = line.context("failed to read from stdin")?;
        #[allow(clippy::cast_possible_truncation)]
        let increment = (count % 4096) as u16;
        let message = Message::new(Snowflake::from_timestamp(Utc::now(), increment), line);
        if !session.handle(&message, &mut terminal).context("failed to write reply")? {
            debug!(content = %message.content, "not a command");
        }
    }
    Ok(ExitCode::SUCCESS)
}
