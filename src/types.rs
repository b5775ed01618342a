use crate::util::{format_int, format_number};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tabled::Tabled;

/// Source column names, shared by the row types below and the chart bindings.
pub mod col {
    pub const MONTH: &str = "Month";
    pub const SALES: &str = "SALES";
    pub const QUANTITY: &str = "QUANTITYORDERED";
    pub const PRICE: &str = "PRICEEACH";
    pub const PRODUCT_LINE: &str = "PRODUCTLINE";
    pub const PRODUCT_CODE: &str = "PRODUCTCODE";
    pub const CUSTOMER: &str = "CUSTOMERNAME";
    pub const COUNTRY: &str = "COUNTRY";
    pub const DEAL_SIZE: &str = "DEALSIZE";
    pub const STATUS: &str = "STATUS";
    pub const COUNT: &str = "COUNT";
    pub const ORDER_DATE: &str = "ORDERDATE";
}

/// Label used for a category value that was empty in the source file.
pub const MISSING_LABEL: &str = "(missing)";

#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "ORDERDATE")]
    pub order_date: Option<String>,
    #[serde(rename = "SALES")]
    pub sales: Option<String>,
    #[serde(rename = "QUANTITYORDERED")]
    pub quantity_ordered: Option<String>,
    #[serde(rename = "PRICEEACH")]
    pub price_each: Option<String>,
    #[serde(rename = "PRODUCTLINE")]
    pub product_line: Option<String>,
    #[serde(rename = "PRODUCTCODE")]
    pub product_code: Option<String>,
    #[serde(rename = "CUSTOMERNAME")]
    pub customer_name: Option<String>,
    #[serde(rename = "COUNTRY")]
    pub country: Option<String>,
    #[serde(rename = "DEALSIZE")]
    pub deal_size: Option<String>,
    #[serde(rename = "STATUS")]
    pub status: Option<String>,
}

/// One order line item. `sales` is taken from the file as-is and never
/// recomputed from quantity and price.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub order_date: NaiveDate,
    pub product_line: String,
    pub product_code: String,
    pub customer_name: String,
    pub country: String,
    pub deal_size: String,
    pub status: String,
    pub quantity_ordered: u32,
    pub price_each: f64,
    pub sales: f64,
}

/// Immutable, shareable handle over the loaded records.
///
/// Cloning is cheap; every view borrows the same underlying slice.
#[derive(Debug, Clone)]
pub struct RecordSet {
    records: Arc<[SalesRecord]>,
}

impl RecordSet {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Self {
            records: Arc::from(records),
        }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SalesRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_sales(&self) -> f64 {
        self.records.iter().map(|r| r.sales).sum()
    }
}

impl FromIterator<SalesRecord> for RecordSet {
    fn from_iter<I: IntoIterator<Item = SalesRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a SalesRecord;
    type IntoIter = std::slice::Iter<'a, SalesRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn money(v: &f64) -> String {
    format_number(*v, 2)
}

fn count(v: &u64) -> String {
    format_int(*v)
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct MonthlySalesRow {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "SALES")]
    #[tabled(rename = "SALES", display_with = "money")]
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrend {
    pub rows: Vec<MonthlySalesRow>,
    /// Mean of the monthly totals, drawn as the reference line.
    pub mean_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct ProductSalesRow {
    #[serde(rename = "PRODUCTLINE")]
    #[tabled(rename = "PRODUCTLINE")]
    pub product_line: String,
    #[serde(rename = "SALES")]
    #[tabled(rename = "SALES", display_with = "money")]
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct CustomerRow {
    #[serde(rename = "CUSTOMERNAME")]
    #[tabled(rename = "CUSTOMERNAME")]
    pub customer_name: String,
    #[serde(rename = "QUANTITYORDERED")]
    #[tabled(rename = "QUANTITYORDERED", display_with = "count")]
    pub quantity_ordered: u64,
    #[serde(rename = "SALES")]
    #[tabled(rename = "SALES", display_with = "money")]
    pub sales: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub x: f64,
    pub y: f64,
}

/// Degree-1 least squares fit `y = slope * x + intercept`, evaluated at each
/// distinct x of the input (ascending).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
    pub points: Vec<TrendPoint>,
}

impl TrendLine {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerBehavior {
    pub rows: Vec<CustomerRow>,
    pub mean_quantity: f64,
    pub mean_sales: f64,
    /// `None` when fewer than two distinct quantities exist.
    pub trend: Option<TrendLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct CountrySalesRow {
    #[serde(rename = "COUNTRY")]
    #[tabled(rename = "COUNTRY")]
    pub country: String,
    #[serde(rename = "SALES")]
    #[tabled(rename = "SALES", display_with = "money")]
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceGroup {
    pub deal_size: String,
    /// Every record's unit price in this deal size, in source order.
    pub prices: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct PriceSummaryRow {
    #[serde(rename = "DEALSIZE")]
    #[tabled(rename = "DEALSIZE")]
    pub deal_size: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count", display_with = "count")]
    pub count: u64,
    #[serde(rename = "Min")]
    #[tabled(rename = "Min", display_with = "money")]
    pub min: f64,
    #[serde(rename = "Q1")]
    #[tabled(rename = "Q1", display_with = "money")]
    pub q1: f64,
    #[serde(rename = "Median")]
    #[tabled(rename = "Median", display_with = "money")]
    pub median: f64,
    #[serde(rename = "Q3")]
    #[tabled(rename = "Q3", display_with = "money")]
    pub q3: f64,
    #[serde(rename = "Max")]
    #[tabled(rename = "Max", display_with = "money")]
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceStrategy {
    pub groups: Vec<PriceGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct InventoryRow {
    #[serde(rename = "PRODUCTCODE")]
    #[tabled(rename = "PRODUCTCODE")]
    pub product_code: String,
    #[serde(rename = "PRODUCTLINE")]
    #[tabled(rename = "PRODUCTLINE")]
    pub product_line: String,
    #[serde(rename = "QUANTITYORDERED")]
    #[tabled(rename = "QUANTITYORDERED", display_with = "count")]
    pub quantity_ordered: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct CompetitionRow {
    #[serde(rename = "PRODUCTLINE")]
    #[tabled(rename = "PRODUCTLINE")]
    pub product_line: String,
    #[serde(rename = "SALES")]
    #[tabled(rename = "SALES (mean)", display_with = "money")]
    pub mean_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct DealSalesRow {
    #[serde(rename = "DEALSIZE")]
    #[tabled(rename = "DEALSIZE")]
    pub deal_size: String,
    #[serde(rename = "SALES")]
    #[tabled(rename = "SALES", display_with = "money")]
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct StatusCountRow {
    #[serde(rename = "STATUS")]
    #[tabled(rename = "STATUS")]
    pub status: String,
    #[serde(rename = "COUNT")]
    #[tabled(rename = "COUNT", display_with = "count")]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryPoint {
    pub topic: &'static str,
    pub text: &'static str,
}
