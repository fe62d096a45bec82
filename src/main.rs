use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use stockfolio::application::handlers::cli_handler::{self, split_line, Command, ShellLine};
use stockfolio::application::services::portfolio_service::Portfolio;
use stockfolio::application::session::Session;
use stockfolio::config::TrackerConfig;
use stockfolio::infrastructure::quote_provider_factory::QuoteProviderFactory;
use stockfolio::persistence::JsonFileRepository;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Track purchased stock positions", long_about = None)]
struct Cli {
    /// JSON file holding the positions (overrides PORTFOLIO_DATA_FILE)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// Model used for quote lookups (overrides QUOTE_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockfolio=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = TrackerConfig::from_env().with_overrides(cli.data_file, cli.model);
    debug!("Configuration: data file {}, model {}", config.data_file.display(), config.quote_model);

    let quotes = QuoteProviderFactory::from_config(&config);
    let repository = JsonFileRepository::new(&config.data_file);
    let portfolio = Portfolio::open(Box::new(repository), quotes);
    if let Some(reason) = portfolio.load_error() {
        warn!("Starting with an empty portfolio: {}", reason);
    }
    let mut session = Session::new(portfolio);

    match cli.command {
        Command::Shell => run_shell(&mut session).await?,
        command => {
            let output = cli_handler::execute(&mut session, command).await?;
            println!("{}", output);
        }
    }

    Ok(())
}

async fn run_shell(session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "Interactive session on {} ({} positions)",
        session.portfolio.location(),
        session.portfolio.len()
    );
    println!("Type a command (add, list, delete, search, stats, export, quote, preview, doctor, debug, clear), 'help' or 'quit'.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("stockfolio> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let words = match split_line(&line) {
            Ok(words) => words,
            Err(e) => {
                println!("✗ {}", e);
                continue;
            }
        };
        match words.first().map(String::as_str) {
            None => continue,
            Some("quit") | Some("exit") => break,
            _ => {}
        }

        let command = match ShellLine::try_parse_from(&words) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                // clap renders help and usage errors itself
                let _ = e.print();
                continue;
            }
        };

        match cli_handler::execute_in_shell(session, command).await {
            Ok(output) => println!("{}", output),
            Err(e) => println!("✗ {}", e),
        }
    }

    info!("Session closed");
    Ok(())
}
