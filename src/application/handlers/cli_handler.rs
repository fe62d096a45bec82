//! Command handlers for the CLI.
//!
//! Each handler runs one command against a [`Session`] and returns the text
//! to print on stdout. Logs go to stderr through `tracing`.

use crate::application::session::Session;
use crate::domain::errors::ExportError;
use crate::domain::services::csv_export::export_file_name;
use crate::domain::services::display::DisplayRow;
use crate::domain::services::portfolio_stats::{total_value_of, PortfolioStats};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::{info, warn};

/// Characters of the quote answer shown by `doctor`.
const DOCTOR_PREVIEW_CHARS: usize = 100;
const DOCTOR_TICKER: &str = "AAPL";

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Record a purchased position
    Add {
        company: String,
        #[arg(long, default_value = "")]
        ticker: String,
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        price: String,
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        quantity: String,
    },
    /// List all positions with portfolio statistics
    List,
    /// Delete the position at a listed (1-based) position
    Delete { position: usize },
    /// Show positions matching a ticker (case-insensitive)
    Search { ticker: String },
    /// Show portfolio statistics
    Stats,
    /// Export positions as CSV to stdout, a file, or a directory
    Export {
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Look up the current quote for a ticker
    Quote { ticker: String },
    /// Compute price * quantity without recording anything
    #[command(allow_negative_numbers = true)]
    Preview { price: String, quantity: String },
    /// Check the backing file and the quote provider
    Doctor,
    /// Start an interactive session
    Shell,
}

/// Commands accepted inside `shell`. Session flags only live as long as the
/// shell, so the commands that change them are not offered one-shot.
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum ShellCommand {
    #[command(flatten)]
    Portfolio(Command),
    /// Toggle the raw JSON view of the records
    Debug,
    /// Reset the entry form
    Clear,
}

/// One line typed in the interactive shell
#[derive(Parser, Debug)]
#[command(name = "", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Tabled)]
struct ListingRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "Added")]
    added: String,
}

impl From<&DisplayRow> for ListingRow {
    fn from(row: &DisplayRow) -> Self {
        Self {
            index: row.index,
            company: row.company.clone(),
            ticker: row.ticker.clone(),
            price: format!("{:.2}", row.unit_price),
            quantity: row.quantity.to_string(),
            value: format!("{:.2}", row.position_value),
            share: format!("{:.1}%", row.percentage),
            added: row.added_at.clone(),
        }
    }
}

/// Run one command and return its printable output.
pub async fn execute(session: &mut Session, command: Command) -> Result<String, ExportError> {
    let output = match command {
        Command::Add {
            company,
            ticker,
            price,
            quantity,
        } => handle_add(session, &company, &ticker, &price, &quantity),
        Command::List => render_listing(session),
        Command::Delete { position } => handle_delete(session, position),
        Command::Search { ticker } => handle_search(session, &ticker),
        Command::Stats => render_stats(&session.portfolio.aggregate()),
        Command::Export { output } => handle_export(session, output.as_deref())?,
        Command::Quote { ticker } => session.portfolio.fetch_quote(&ticker).await,
        Command::Preview { price, quantity } => match session.portfolio.preview_value(&price, &quantity) {
            Some(value) => format!("Total value: {:.2}", value),
            None => "Enter a valid price and quantity to see the total value".to_string(),
        },
        Command::Doctor => handle_doctor(session).await,
        Command::Shell => "Already in an interactive session".to_string(),
    };
    Ok(output)
}

/// Run one command typed inside the shell.
pub async fn execute_in_shell(session: &mut Session, command: ShellCommand) -> Result<String, ExportError> {
    match command {
        ShellCommand::Portfolio(command) => execute(session, command).await,
        ShellCommand::Debug => Ok(handle_debug(session)),
        ShellCommand::Clear => {
            session.clear_form();
            Ok("Form cleared".to_string())
        }
    }
}

fn handle_add(session: &mut Session, company: &str, ticker: &str, price: &str, quantity: &str) -> String {
    let problems = session.portfolio.validate(company, ticker, price, quantity);
    if !problems.is_empty() {
        return problems
            .iter()
            .map(|p| format!("✗ {}", p))
            .collect::<Vec<_>>()
            .join("\n");
    }

    match session.add(company, ticker, price, quantity) {
        Ok(mutation) => {
            let mut lines = Vec::new();
            let name = session
                .last_added
                .as_ref()
                .map(|last| match &last.ticker {
                    Some(ticker) => format!("{} ({})", last.company, ticker),
                    None => last.company.clone(),
                })
                .unwrap_or_default();
            lines.push(format!(
                "✓ Added {} worth {:.2}",
                name,
                mutation.record.recomputed_value()
            ));
            if !mutation.persisted {
                lines.push(format!(
                    "⚠ Could not write {}; the position is kept for this session only",
                    session.portfolio.location()
                ));
            }
            lines.join("\n")
        }
        Err(e) => format!("✗ {}", e),
    }
}

fn handle_delete(session: &mut Session, position: usize) -> String {
    let Some(index) = position.checked_sub(1) else {
        return format!("✗ No position #{}", position);
    };

    match session.portfolio.delete_at(index) {
        Some(mutation) => {
            let mut out = format!(
                "✓ Deleted #{} {}",
                position,
                mutation.record.company_name().unwrap_or("(unnamed)")
            );
            if !mutation.persisted {
                out.push_str(&format!(
                    "\n⚠ Could not write {}; the deletion is kept for this session only",
                    session.portfolio.location()
                ));
            }
            out
        }
        None => format!("✗ No position #{}", position),
    }
}

fn handle_search(session: &Session, ticker: &str) -> String {
    let matches = session.portfolio.find_by_ticker(ticker);
    if matches.is_empty() {
        return format!("No positions found for '{}'", ticker.trim());
    }

    let total = session.portfolio.aggregate().total_value;
    let rows: Vec<ListingRow> = session
        .portfolio
        .records()
        .iter()
        .zip(session.portfolio.rows())
        .filter(|(record, _)| matches.iter().any(|m| std::ptr::eq(*m, *record)))
        .map(|(_, row)| ListingRow::from(&row))
        .collect();
    info!("Search '{}' matched {} positions", ticker.trim(), rows.len());

    let matched_value: f64 = matches.iter().map(|record| total_value_of(record)).sum();
    format!(
        "{}\n{} position(s), {:.2} of {:.2}",
        Table::new(rows).with(Style::modern()),
        matches.len(),
        matched_value,
        total
    )
}

fn render_listing(session: &Session) -> String {
    let mut sections = Vec::new();
    if let Some(reason) = session.portfolio.load_error() {
        sections.push(format!("⚠ Backing file could not be read: {}", reason));
    }

    if session.portfolio.is_empty() {
        sections.push("No positions recorded yet.".to_string());
    } else {
        let rows: Vec<ListingRow> = session.portfolio.rows().iter().map(ListingRow::from).collect();
        sections.push(Table::new(rows).with(Style::modern()).to_string());
        sections.push(render_stats(&session.portfolio.aggregate()));
    }

    if session.show_debug {
        match session.debug_json() {
            Ok(json) => sections.push(json),
            Err(e) => warn!("Could not render debug view: {}", e),
        }
    }

    sections.join("\n")
}

pub fn render_stats(stats: &PortfolioStats) -> String {
    format!(
        "Total value: {:.2}\nPositions: {}\nAverage value: {:.2}\nUnique tickers: {}",
        stats.total_value, stats.position_count, stats.average_value, stats.unique_tickers
    )
}

fn handle_export(session: &Session, output: Option<&Path>) -> Result<String, ExportError> {
    let csv = session.portfolio.export_csv()?;
    let Some(output) = output else {
        return Ok(csv.trim_end_matches('\n').to_string());
    };

    let target = if output.is_dir() {
        output.join(export_file_name(Local::now()))
    } else {
        output.to_path_buf()
    };

    fs::write(&target, csv.as_bytes()).map_err(|source| ExportError::Io {
        path: target.clone(),
        source,
    })?;
    info!("Exported {} positions to {}", session.portfolio.len(), target.display());
    Ok(format!(
        "✓ Exported {} positions to {}",
        session.portfolio.len(),
        target.display()
    ))
}

fn handle_debug(session: &mut Session) -> String {
    if !session.toggle_debug() {
        return "Debug view off".to_string();
    }
    match session.debug_json() {
        Ok(json) => json,
        Err(e) => format!("✗ Could not render records: {}", e),
    }
}

async fn handle_doctor(session: &Session) -> String {
    let mut lines = Vec::new();

    match session.portfolio.save() {
        Ok(()) => lines.push(format!(
            "✓ Backing file {} writable ({} positions)",
            session.portfolio.location(),
            session.portfolio.len()
        )),
        Err(e) => lines.push(format!("✗ Backing file: {}", e)),
    }

    let provider = session.portfolio.quote_provider_name().to_string();
    match session.portfolio.try_fetch_quote(DOCTOR_TICKER).await {
        Ok(answer) => {
            let preview: String = answer.chars().take(DOCTOR_PREVIEW_CHARS).collect();
            let ellipsis = if answer.chars().count() > DOCTOR_PREVIEW_CHARS {
                "..."
            } else {
                ""
            };
            lines.push(format!("✓ Quote provider {}: {}{}", provider, preview, ellipsis));
        }
        Err(e) => lines.push(format!("✗ Quote provider {}: {}", provider, e)),
    }

    lines.join("\n")
}

/// Split an interactive input line into words, honouring double and single
/// quotes so company names may contain spaces.
pub fn split_line(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("unterminated {} quote", q));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
