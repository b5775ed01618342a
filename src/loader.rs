use crate::error::LoadError;
use crate::types::{col, RawRow, RecordSet, SalesRecord, MISSING_LABEL};
use crate::util::{category, parse_f64_safe, parse_order_date, parse_u32_safe};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct LoadSummary {
    pub total_rows: usize,
    /// Category cells that were empty and grouped under the missing label.
    pub missing_categories: usize,
    pub first_order: Option<NaiveDate>,
    pub last_order: Option<NaiveDate>,
}

/// Load the sales export from disk.
///
/// The load is all-or-nothing: the first row with a malformed date or number
/// aborts it and no partial record set is returned.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<(RecordSet, LoadSummary), LoadError> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading sales data");
    let file = std::fs::File::open(path)?;
    load_from_reader(file)
}

pub fn load_from_reader<R: Read>(reader: R) -> Result<(RecordSet, LoadSummary), LoadError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut records: Vec<SalesRecord> = Vec::new();
    let mut missing_categories = 0usize;

    for (idx, result) in rdr.deserialize::<RawRow>().enumerate() {
        let row_no = idx + 1;
        let row = result?;

        let order_date = parse_order_date(row.order_date.as_deref()).ok_or_else(|| {
            LoadError::InvalidDate {
                row: row_no,
                value: row.order_date.clone().unwrap_or_default(),
            }
        })?;
        let sales = number(row_no, col::SALES, row.sales.as_deref())?;
        let price_each = number(row_no, col::PRICE, row.price_each.as_deref())?;
        let quantity_ordered = parse_u32_safe(row.quantity_ordered.as_deref()).ok_or_else(|| {
            LoadError::InvalidNumber {
                row: row_no,
                column: col::QUANTITY,
                value: row.quantity_ordered.clone().unwrap_or_default(),
            }
        })?;

        let record = SalesRecord {
            order_date,
            product_line: category(row.product_line),
            product_code: category(row.product_code),
            customer_name: category(row.customer_name),
            country: category(row.country),
            deal_size: category(row.deal_size),
            status: category(row.status),
            quantity_ordered,
            price_each,
            sales,
        };
        let missing = [
            &record.product_line,
            &record.product_code,
            &record.customer_name,
            &record.country,
            &record.deal_size,
            &record.status,
        ]
        .iter()
        .filter(|v| v.as_str() == MISSING_LABEL)
        .count();
        if missing > 0 {
            debug!(row = row_no, missing, "row has empty category values");
            missing_categories += missing;
        }
        records.push(record);
    }

    let summary = LoadSummary {
        total_rows: records.len(),
        missing_categories,
        first_order: records.iter().map(|r| r.order_date).min(),
        last_order: records.iter().map(|r| r.order_date).max(),
    };
    if missing_categories > 0 {
        warn!(missing_categories, "empty category values grouped as {MISSING_LABEL}");
    }
    info!(rows = summary.total_rows, "sales data loaded");
    Ok((RecordSet::new(records), summary))
}

fn number(row: usize, column: &'static str, raw: Option<&str>) -> Result<f64, LoadError> {
    parse_f64_safe(raw).ok_or_else(|| LoadError::InvalidNumber {
        row,
        column,
        value: raw.unwrap_or_default().to_string(),
    })
}
