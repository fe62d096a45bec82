//! End-to-end tests for the record store backed by a real JSON file

use std::fs;
use std::path::Path;
use std::sync::Arc;
use stockfolio::application::services::portfolio_service::Portfolio;
use stockfolio::domain::entities::position::PositionRecord;
use stockfolio::domain::repositories::position_repository::PositionRepository;
use stockfolio::domain::services::csv_export::export_csv;
use stockfolio::domain::services::portfolio_stats::{aggregate, total_value_of};
use stockfolio::domain::services::validation::validate;
use stockfolio::infrastructure::unconfigured_quote_provider::UnconfiguredQuoteProvider;
use stockfolio::persistence::JsonFileRepository;
use tempfile::TempDir;

fn open(path: &Path) -> Portfolio {
    Portfolio::open(
        Box::new(JsonFileRepository::new(path)),
        Arc::new(UnconfiguredQuoteProvider::new("PERPLEXITY_API_KEY not set")),
    )
}

#[test]
fn test_append_survives_a_fresh_session() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("portfolio.json");

    // Given: a position appended in one session
    let mut first = open(&path);
    first.append("Microsoft", "msft", "300.5", "3").unwrap();
    first.append("Apple", "AAPL", "10", "2").unwrap();

    // When: a new session loads the same backing file
    let second = open(&path);

    // Then: the last record matches what was appended
    let last = second.records().last().unwrap();
    assert_eq!(last.company_name(), Some("Apple"));
    assert_eq!(last.ticker_symbol(), Some("AAPL"));
    assert_eq!(last.unit_price_value(), Some(10.0));
    assert_eq!(last.quantity_value(), Some(2.0));
    assert_eq!(last.total_value.as_ref().and_then(|v| v.as_f64()), Some(20.0));
    assert_eq!(second.len(), 2);
}

#[test]
fn test_delete_on_empty_or_out_of_range_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("portfolio.json");

    let mut portfolio = open(&path);
    assert!(portfolio.delete_at(0).is_none());
    assert!(!path.exists());

    portfolio.append("Apple", "AAPL", "10", "2").unwrap();
    let before = fs::read_to_string(&path).unwrap();
    assert!(portfolio.delete_at(5).is_none());
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
    assert_eq!(portfolio.len(), 1);
}

#[test]
fn test_delete_persists_shifted_list() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("portfolio.json");

    let mut portfolio = open(&path);
    portfolio.append("Apple", "AAPL", "10", "2").unwrap();
    portfolio.append("Microsoft", "MSFT", "20", "1").unwrap();

    let removed = portfolio.delete_at(0).unwrap();
    assert_eq!(removed.record.company_name(), Some("Apple"));
    assert!(removed.persisted);

    let reopened = open(&path);
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.records()[0].company_name(), Some("Microsoft"));
}

#[test]
fn test_corrupt_file_starts_empty_and_is_replaced_on_save() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("portfolio.json");
    fs::write(&path, "not json at all").unwrap();

    let mut portfolio = open(&path);
    assert!(portfolio.is_empty());
    assert!(portfolio.load_error().is_some());

    portfolio.append("Apple", "AAPL", "10", "2").unwrap();
    let reopened = open(&path);
    assert_eq!(reopened.len(), 1);
    assert!(reopened.load_error().is_none());
}

#[test]
fn test_aggregate_examples() {
    let stats = aggregate(&[]);
    assert_eq!(stats.total_value, 0.0);
    assert_eq!(stats.position_count, 0);
    assert_eq!(stats.average_value, 0.0);
    assert_eq!(stats.unique_tickers, 0);

    let dir = TempDir::new().unwrap();
    let mut portfolio = open(&dir.path().join("portfolio.json"));
    portfolio.append("Apple", "AAPL", "10", "2").unwrap();
    portfolio.append("Microsoft", "MSFT", "20", "1").unwrap();

    let stats = portfolio.aggregate();
    assert_eq!(stats.total_value, 40.0);
    assert_eq!(stats.position_count, 2);
    assert_eq!(stats.average_value, 20.0);
    assert_eq!(stats.unique_tickers, 2);
}

#[test]
fn test_search_folds_case_and_ignores_blank_query() {
    let dir = TempDir::new().unwrap();
    let mut portfolio = open(&dir.path().join("portfolio.json"));
    portfolio.append("Apple", "AAPL", "10", "2").unwrap();
    portfolio.append("Microsoft", "MSFT", "20", "1").unwrap();

    let found = portfolio.find_by_ticker("aapl");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].company_name(), Some("Apple"));
    assert!(portfolio.find_by_ticker("").is_empty());
}

#[test]
fn test_validation_examples() {
    assert_eq!(validate("", "", "", ""), vec!["company name is required"]);
    assert_eq!(
        validate("X", "Y", "abc", "1"),
        vec!["price must be a valid decimal number"]
    );
}

#[test]
fn test_total_value_recomputed_without_stored_total() {
    let raw = r#"[{"company": "Apple", "ticker": "AAPL", "unitPrice": 12.5, "quantity": 4}]"#;
    let records: Vec<PositionRecord> = serde_json::from_str(raw).unwrap();
    assert_eq!(total_value_of(&records[0]), 50.0);
}

#[test]
fn test_resave_of_loaded_file_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("portfolio.json");

    let mut portfolio = open(&path);
    portfolio.append("Apple", "AAPL", "10", "2").unwrap();
    portfolio.append("Hand, Made \"Co\"", "", "1.25", "8").unwrap();
    let written = fs::read_to_string(&path).unwrap();

    let repo = JsonFileRepository::new(&path);
    let loaded = repo.load().unwrap();
    repo.save(&loaded).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), written);
}

#[test]
fn test_resave_keeps_appended_decimals_exact() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("portfolio.json");

    // Given: appended lots whose totals have long decimal expansions
    let lots = [
        ("924.73628", "1"),
        ("1343.775", "3"),
        ("0.1", "3"),
        ("19.99", "7"),
        ("333.33", "0.3"),
        ("2.675", "1.1"),
    ];
    let mut portfolio = open(&path);
    for (i, (price, quantity)) in lots.iter().enumerate() {
        portfolio
            .append(&format!("Company {}", i), "LOT", price, quantity)
            .unwrap();
    }
    let written = fs::read_to_string(&path).unwrap();

    // When: a fresh repository loads the file and writes it back
    let repo = JsonFileRepository::new(&path);
    let loaded = repo.load().unwrap();
    repo.save(&loaded).unwrap();

    // Then: the bytes are unchanged and every stored total still equals price * quantity
    assert_eq!(fs::read_to_string(&path).unwrap(), written);
    for record in &loaded {
        assert_eq!(
            record.total_value.as_ref().and_then(|v| v.as_f64()),
            Some(record.recomputed_value())
        );
    }
}

#[test]
fn test_null_total_is_recomputed_and_kept_on_resave() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("portfolio.json");
    let original = r#"[
  {
    "company": "A",
    "unitPrice": 10,
    "quantity": 2,
    "totalValue": null,
    "note": "x"
  }
]"#;
    fs::write(&path, original).unwrap();

    let portfolio = open(&path);
    assert_eq!(portfolio.aggregate().total_value, 20.0);
    portfolio.save().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_csv_export_of_hand_written_record() {
    let raw = r#"[{
        "company": "Apple",
        "ticker": "AAPL",
        "unitPrice": 10,
        "quantity": 2,
        "createdAtDisplay": "2025-09-14 10:30:00"
    }]"#;
    let records: Vec<PositionRecord> = serde_json::from_str(raw).unwrap();

    let csv = export_csv(&records).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Company,Ticker,Price,Quantity,Total Value,Date Added");
    assert_eq!(lines[1], "Apple,AAPL,10,2,20.0,2025-09-14 10:30:00");
    assert_eq!(lines.len(), 2);
}

#[test]
fn test_csv_export_quotes_awkward_company_names() {
    let dir = TempDir::new().unwrap();
    let mut portfolio = open(&dir.path().join("portfolio.json"));
    portfolio.append("Hand, Made \"Co\"", "", "1", "1").unwrap();

    let csv = portfolio.export_csv().unwrap();
    let row = csv.lines().nth(1).unwrap();
    assert!(row.starts_with("\"Hand, Made \"\"Co\"\"\",,"), "row: {}", row);
}

#[tokio::test]
async fn test_quote_without_credentials_is_informational() {
    let dir = TempDir::new().unwrap();
    let portfolio = open(&dir.path().join("portfolio.json"));

    assert_eq!(portfolio.fetch_quote("  ").await, "ticker not specified");
    assert_eq!(
        portfolio.fetch_quote("AAPL").await,
        "quote provider not configured: PERPLEXITY_API_KEY not set"
    );
}
