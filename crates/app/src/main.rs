mod config;

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::{Config, print_usage};
use services::{EventOutcome, SessionEvent, SessionPersistence, SessionService};
use storage::repository::Storage;
use wheel_core::Wheel;
use wheel_core::model::{Catalog, Difficulty, Question};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Spin,
    Skip,
    Done,
    Reset,
    Stats,
    List,
    Help,
    Quit,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "spin" | "s" => Some(Self::Spin),
            "skip" | "n" => Some(Self::Skip),
            "done" | "d" => Some(Self::Done),
            "reset" => Some(Self::Reset),
            "stats" => Some(Self::Stats),
            "list" | "l" => Some(Self::List),
            "help" | "?" => Some(Self::Help),
            "quit" | "exit" | "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

fn print_commands() {
    println!("Commands: spin, skip, done, reset, stats, list, help, quit");
}

fn print_question(session: &SessionService, question: &Question) {
    let marker = if session.is_done(question.id()) {
        " [besproken]"
    } else {
        ""
    };
    println!();
    println!(
        "[{}] {}{}",
        question.difficulty().label(),
        question.category(),
        marker
    );
    println!("  {}", question.text());
    if let Some(guidance) = question.guidance() {
        println!("  Begeleiding: {guidance}");
    }
    if let Some(tip) = question.tip() {
        println!("  Tip: {tip}");
    }
}

fn print_stats(session: &SessionService) {
    let stats = session.stats();
    println!(
        "{}: {}  {}: {}  {}: {}",
        Difficulty::Easy.label(),
        stats.easy(),
        Difficulty::Medium.label(),
        stats.medium(),
        Difficulty::Hard.label(),
        stats.hard()
    );
    println!(
        "Totaal gedraaid: {}  Overgeslagen: {}  Besproken: {}  Voltooiingsgraad: {}%",
        stats.total(),
        stats.skipped(),
        session.discussed().len(),
        session.completion_rate()
    );
}

fn print_discussed(session: &SessionService) {
    if session.discussed().is_empty() {
        println!("Nog geen vragen besproken.");
        return;
    }
    for (idx, question) in session.discussed().iter().enumerate() {
        println!(
            "{:>3}. [{}] {}",
            idx + 1,
            question.difficulty().label(),
            question.text()
        );
    }
}

fn load_catalog(config: &Config) -> Result<Catalog, Box<dyn std::error::Error>> {
    match &config.catalog_path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Ok(Catalog::from_json(&raw)?)
        }
        None => Ok(Catalog::builtin()?),
    }
}

/// Open the configured store, falling back to memory so the session can always run.
async fn open_storage(db_url: &str) -> Storage {
    if let Err(err) = prepare_sqlite_file(db_url) {
        warn!(%db_url, error = %err, "session history will not be kept");
        return Storage::in_memory();
    }
    match Storage::sqlite(db_url).await {
        Ok(storage) => storage,
        Err(err) => {
            warn!(%db_url, error = %err, "session history will not be kept");
            Storage::in_memory()
        }
    }
}

async fn dispatch(
    session: &mut SessionService,
    wheel: &mut Wheel,
    rng: &mut StdRng,
    command: Command,
) -> Result<(), services::SessionServiceError> {
    match command {
        Command::Spin => {
            session.handle(SessionEvent::SpinStarted).await?;
            let outcome = wheel.spin(rng);
            println!("Het rad stopt op {}.", outcome.tier.label());
            if let EventOutcome::Drew(question) = session
                .handle(SessionEvent::SpinCompleted(outcome.tier))
                .await?
            {
                print_question(session, &question);
            }
        }
        Command::Skip => {
            if let EventOutcome::Drew(question) = session.handle(SessionEvent::Skip).await? {
                print_question(session, &question);
            }
        }
        Command::Done => {
            if let EventOutcome::MarkedDone { newly_marked } =
                session.handle(SessionEvent::MarkDone).await?
            {
                if newly_marked {
                    println!("Gemarkeerd als besproken.");
                } else {
                    println!("Deze vraag was al besproken.");
                }
            }
        }
        Command::Reset => {
            session.handle(SessionEvent::Reset).await?;
            println!("Sessie gewist.");
        }
        Command::Stats => print_stats(session),
        Command::List => print_discussed(session),
        Command::Help => print_commands(),
        Command::Quit => {}
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse(std::env::args().skip(1), |name| std::env::var(name).ok())
        .map_err(|e| {
            eprintln!("{e}");
            print_usage();
            e
        })?;
    if config.show_help {
        print_usage();
        return Ok(());
    }

    let catalog = Arc::new(load_catalog(&config)?);
    let storage = open_storage(&config.db_url).await;
    let persistence = SessionPersistence::new(storage.kv).with_key(config.storage_key.clone());
    let mut session = SessionService::with_catalog(Arc::clone(&catalog), config.seed, persistence)
        .await?;

    // Keep the wheel's stream apart from the deck shuffles when seeded.
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_os_rng(),
    };
    let mut wheel = Wheel::new();

    info!(
        questions = catalog.len(),
        db_url = %config.db_url,
        key = %config.storage_key,
        restored = session.stats().total(),
        "session ready"
    );
    print_commands();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim().to_ascii_lowercase();
        if input.is_empty() {
            continue;
        }
        let Some(command) = Command::from_arg(&input) else {
            println!("Onbekend commando: {input}");
            print_commands();
            continue;
        };
        if command == Command::Quit {
            break;
        }
        if let Err(err) = dispatch(&mut session, &mut wheel, &mut rng, command).await {
            println!("{err}");
        }
    }

    Ok(())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| config::ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(config::ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("question_wheel=info,services=info,wheel_core=info")),
        )
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
