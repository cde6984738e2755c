// src/main.rs

use bookmark_outline::app_logic::{self, APP_NAME, ServeSession};
use bookmark_outline::core::{BookmarkIndex, build_outline, render_text};
use clap::{Parser, Subcommand, ValueEnum};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::env;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use time::UtcOffset;

#[derive(Parser, Debug)]
#[command(
    name = "bookmark_outline",
    version,
    about = "Lists @do: and @bookmark: comment markers of a workspace"
)]
struct Cli {
    /// Log verbosity (logs go to stderr)
    #[arg(long, value_enum, global = true, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Also append logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan the workspace once and print every bookmark
    List {
        /// Workspace root (defaults to the current directory)
        #[arg(long)]
        root: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Answer newline-delimited JSON requests on stdin until EOF or shutdown
    Serve {
        /// Workspace root (defaults to the current directory)
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn init_logging(level: LevelFilter, log_file: Option<&Path>) -> io::Result<()> {
    let config = ConfigBuilder::new()
        .set_time_offset(UtcOffset::UTC)
        .set_time_format_rfc3339()
        .build();

    // Stdout carries program output, so terminal logging goes to stderr.
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        let file = File::options().create(true).append(true).open(path)?;
        loggers.push(WriteLogger::new(level, config, file));
    }

    CombinedLogger::init(loggers).map_err(io::Error::other)
}

fn resolve_root(root: Option<PathBuf>) -> io::Result<PathBuf> {
    let root = match root {
        Some(root) => root,
        None => env::current_dir()?,
    };
    let canonical = fs::canonicalize(&root)?;
    if !canonical.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a directory", root.display()),
        ));
    }
    Ok(canonical)
}

fn run_list(root: PathBuf, format: OutputFormat) -> io::Result<()> {
    let mut index = BookmarkIndex::with_core_services(Some(root.clone()), APP_NAME);
    let records = index.query_all();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => out.write_all(render_text(&records, &root).as_bytes())?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &build_outline(&records, &root))?;
            out.write_all(b"\n")?;
        }
    }
    out.flush()
}

fn run_serve(root: PathBuf) -> Result<(), app_logic::ProtocolError> {
    let index = BookmarkIndex::with_core_services(Some(root), APP_NAME);
    let mut session = ServeSession::new(index);
    let stdin = io::stdin();
    let stdout = io::stdout();
    app_logic::run_serve_loop(&mut session, stdin.lock(), stdout.lock())
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::List { root, format } => {
            let root = resolve_root(root)?;
            log::debug!("Workspace root: {root:?}");
            run_list(root, format)?;
        }
        Commands::Serve { root } => {
            let root = resolve_root(root)?;
            log::debug!("Workspace root: {root:?}");
            run_serve(root)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_level.into(), cli.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
