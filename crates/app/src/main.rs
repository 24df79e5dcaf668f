use std::fmt;
use std::time::Duration;

use services::{Clock, DEFAULT_SEARCH_DEBOUNCE, StudyService, app_services};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use ui::{StudyIntent, StudyScreen, StudyVm};

mod command;
mod render;

use command::{Command, HELP, parse_command};
use render::render;

const DEFAULT_DB_URL: &str = "sqlite://lotus.sqlite3";

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidDebounce { raw: String },
    HelpRequested,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidDebounce { raw } => write!(f, "invalid --debounce-ms value: {raw}"),
            ArgsError::HelpRequested => write!(f, "help requested"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

#[derive(Debug, PartialEq, Eq)]
enum Store {
    Sqlite(String),
    Memory,
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    store: Store,
    debounce: Duration,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--memory] [--debounce-ms <n>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --debounce-ms {}", DEFAULT_SEARCH_DEBOUNCE.as_millis());
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LOTUS_DB_URL, LOTUS_SEARCH_DEBOUNCE_MS, RUST_LOG");
}

fn parse_debounce(raw: String) -> Result<Duration, ArgsError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ArgsError::InvalidDebounce { raw })
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut store = Store::Sqlite(
            normalize_sqlite_url(env("LOTUS_DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.into())),
        );
        let mut debounce = match env("LOTUS_SEARCH_DEBOUNCE_MS") {
            Some(raw) => parse_debounce(raw)?,
            None => DEFAULT_SEARCH_DEBOUNCE,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    store = Store::Sqlite(normalize_sqlite_url(value));
                }
                "--memory" => store = Store::Memory,
                "--debounce-ms" => debounce = parse_debounce(require_value(args, "--debounce-ms")?)?,
                "--help" | "-h" => return Err(ArgsError::HelpRequested),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { store, debounce })
    }
}

/// Turn a bare path or `sqlite:` URL into an absolute `sqlite://` URL that
/// creates the file on first use.
fn normalize_sqlite_url(raw: String) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite:file:") {
        return trimmed.to_owned();
    }

    let rest = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    let (path_str, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };

    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };

    match query {
        Some(query) if query.contains("mode=") => {
            format!("sqlite://{}?{query}", absolute.display())
        }
        Some(query) => format!("sqlite://{}?{query}&mode=rwc", absolute.display()),
        None => format!("sqlite://{}?mode=rwc", absolute.display()),
    }
}

fn prepare_sqlite_dir(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = db_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_owned(),
        }
        .into());
    }
    if let Some(parent) = std::path::Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn open_study(store: &Store) -> Result<StudyService, Box<dyn std::error::Error>> {
    let clock = Clock::default_clock();
    match store {
        Store::Memory => {
            tracing::info!("using in-memory storage; nothing survives exit");
            Ok(app_services::open_in_memory(clock).await)
        }
        Store::Sqlite(db_url) => {
            prepare_sqlite_dir(db_url)?;
            tracing::info!(db_url = %db_url, "opening study library");
            Ok(app_services::open_sqlite(db_url, clock).await?)
        }
    }
}

fn show(vm: &StudyVm) {
    println!("\n{}", render(vm));
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = match Args::parse(&mut argv, |key| std::env::var(key).ok()) {
        Ok(args) => args,
        Err(ArgsError::HelpRequested) => {
            print_usage();
            return Ok(());
        }
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            return Err(err.into());
        }
    };

    init_tracing();
    let study = open_study(&args.store).await?;
    let (mut screen, mut settled) = StudyScreen::new(study, args.debounce);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut vm = screen.vm();
    show(&vm);
    println!("(type help for commands)");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line, &vm, screen.is_confirming_delete()) {
                    Command::Quit => break,
                    Command::Help => println!("{HELP}"),
                    Command::Empty => {}
                    Command::Invalid(message) => println!("{message}"),
                    Command::Intent(intent @ StudyIntent::SearchInput(_)) => {
                        vm = screen.dispatch(intent).await;
                    }
                    Command::Intent(intent) => {
                        vm = screen.dispatch(intent).await;
                        show(&vm);
                    }
                }
            }
            Some(term) = settled.recv() => {
                vm = screen.dispatch(StudyIntent::SearchSettled(term)).await;
                show(&vm);
            }
        }
    }

    tracing::debug!("stdin closed; exiting");
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str], env: &[(&str, &str)]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(|arg| (*arg).to_owned());
        Args::parse(&mut iter, |key| {
            env.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value).to_owned())
        })
    }

    #[test]
    fn defaults_apply_without_flags() {
        let args = parse(&[], &[]).unwrap();
        let Store::Sqlite(url) = args.store else {
            panic!("expected sqlite store");
        };
        assert!(url.ends_with("/lotus.sqlite3?mode=rwc"));
        assert_eq!(args.debounce, DEFAULT_SEARCH_DEBOUNCE);
    }

    #[test]
    fn flags_override_environment() {
        let args = parse(
            &["--db", "/tmp/a.sqlite3", "--debounce-ms", "50"],
            &[("LOTUS_DB_URL", "/tmp/b.sqlite3"), ("LOTUS_SEARCH_DEBOUNCE_MS", "10")],
        )
        .unwrap();
        assert_eq!(args.store, Store::Sqlite("sqlite:///tmp/a.sqlite3?mode=rwc".into()));
        assert_eq!(args.debounce, Duration::from_millis(50));

        let args = parse(&[], &[("LOTUS_SEARCH_DEBOUNCE_MS", "10")]).unwrap();
        assert_eq!(args.debounce, Duration::from_millis(10));
    }

    #[test]
    fn memory_flag_selects_in_memory_store() {
        assert_eq!(parse(&["--memory"], &[]).unwrap().store, Store::Memory);
    }

    #[test]
    fn bad_arguments_are_reported() {
        assert_eq!(
            parse(&["--db"], &[]),
            Err(ArgsError::MissingValue { flag: "--db" })
        );
        assert_eq!(
            parse(&["--db", "  "], &[]),
            Err(ArgsError::InvalidDbUrl { raw: "  ".into() })
        );
        assert_eq!(
            parse(&["--debounce-ms", "soon"], &[]),
            Err(ArgsError::InvalidDebounce { raw: "soon".into() })
        );
        assert_eq!(
            parse(&["--bogus"], &[]),
            Err(ArgsError::UnknownArg("--bogus".into()))
        );
        assert_eq!(parse(&["-h"], &[]), Err(ArgsError::HelpRequested));
    }

    #[test]
    fn sqlite_urls_are_normalized() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:file:x?mode=memory&cache=shared".into()),
            "sqlite:file:x?mode=memory&cache=shared"
        );
        assert_eq!(
            normalize_sqlite_url("sqlite:///var/lotus.db".into()),
            "sqlite:///var/lotus.db?mode=rwc"
        );
        assert_eq!(
            normalize_sqlite_url("sqlite:/var/lotus.db?mode=ro".into()),
            "sqlite:///var/lotus.db?mode=ro"
        );

        let relative = normalize_sqlite_url("lotus.sqlite3".into());
        assert!(relative.starts_with("sqlite:///"));
        assert!(relative.ends_with("/lotus.sqlite3?mode=rwc"));
    }
}
