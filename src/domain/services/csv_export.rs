//! CSV export of the record list, in store order.

use crate::domain::entities::position::PositionRecord;
use crate::domain::errors::ExportError;
use crate::domain::services::portfolio_stats::total_value_of;
use crate::domain::value_objects::amount::{format_decimal, Amount};
use chrono::{DateTime, Local};

pub const EXPORT_HEADER: [&str; 6] = [
    "Company",
    "Ticker",
    "Price",
    "Quantity",
    "Total Value",
    "Date Added",
];

/// Render all records as CSV text: a header row, then one row per record.
/// Price and quantity are written as stored; the total column uses
/// [`total_value_of`].
pub fn export_csv(records: &[PositionRecord]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADER)?;

    for record in records {
        let price = stored_or_zero(record.unit_price.as_ref());
        let quantity = stored_or_zero(record.quantity.as_ref());
        let total = format_decimal(total_value_of(record));
        writer.write_record([
            record.company_name().unwrap_or(""),
            record.ticker_symbol().unwrap_or(""),
            price.as_str(),
            quantity.as_str(),
            total.as_str(),
            record.added_at().unwrap_or(""),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(csv::Error::from(e.into_error())))?;
    Ok(String::from_utf8(bytes)?)
}

/// File name used when an export target is a directory.
pub fn export_file_name(now: DateTime<Local>) -> String {
    format!("portfolio_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

fn stored_or_zero(amount: Option<&Amount>) -> String {
    match amount {
        Some(amount) if !amount.is_null() => amount.to_string(),
        _ => "0".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_empty_export_is_header_only() {
        let csv = export_csv(&[]).unwrap();
        assert_eq!(csv, "Company,Ticker,Price,Quantity,Total Value,Date Added\n");
    }

    #[test]
    fn test_single_record_row() {
        let record: PositionRecord = serde_json::from_str(
            r#"{"company":"Apple","ticker":"AAPL","unitPrice":10,"quantity":2,"createdAtDisplay":"2025-09-14 10:30:00"}"#,
        )
        .unwrap();

        let csv = export_csv(&[record]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "Apple,AAPL,10,2,20.0,2025-09-14 10:30:00");
    }

    #[test]
    fn test_fields_with_commas_and_quotes_are_quoted() {
        let record: PositionRecord = serde_json::from_str(
            r#"{"company":"Berkshire, \"B\" shares","ticker":"BRK.B","unitPrice":1.5,"quantity":2}"#,
        )
        .unwrap();

        let csv = export_csv(&[record]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, r#""Berkshire, ""B"" shares",BRK.B,1.5,2,3.0,"#);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let record: PositionRecord =
            serde_json::from_str(r#"{"createdAtIso":"2025-01-01T00:00:00"}"#).unwrap();
        let csv = export_csv(&[record]).unwrap();
        assert_eq!(csv.lines().nth(1).unwrap(), ",,0,0,0.0,2025-01-01T00:00:00");
    }

    #[test]
    fn test_rows_follow_store_order() {
        let records: Vec<PositionRecord> = serde_json::from_str(
            r#"[{"company":"B","unitPrice":1,"quantity":1},{"company":"A","unitPrice":2,"quantity":1}]"#,
        )
        .unwrap();
        let csv = export_csv(&records).unwrap();
        let companies: Vec<&str> = csv
            .lines()
            .skip(1)
            .map(|line| line.split(',').next().unwrap())
            .collect();
        assert_eq!(companies, vec!["B", "A"]);
    }

    #[test]
    fn test_export_file_name() {
        let now = Local.with_ymd_and_hms(2025, 9, 14, 8, 5, 3).unwrap();
        assert_eq!(export_file_name(now), "portfolio_20250914_080503.csv");
    }
}
