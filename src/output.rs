use crate::dashboard::ReportViews;
use crate::error::{OutputError, ViewError};
use std::fs;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

pub fn write_text(path: &Path, contents: &str) -> Result<(), OutputError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    info!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}

/// Markdown preview of the first `max_rows` rows.
pub fn preview_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", preview_table(rows, max_rows));
}

/// Print every computed view as a short markdown table. Failed views print
/// their error instead.
pub fn preview_views(views: &ReportViews, max_rows: usize) {
    fn show<T: Tabled + Clone>(title: &str, rows: Result<&[T], &ViewError>, max_rows: usize) {
        println!("{}\n", title);
        match rows {
            Ok(rows) => preview_table_rows(rows, max_rows),
            Err(e) => println!("(unavailable: {})\n", e),
        }
    }

    let monthly = views.monthly_trend.as_ref();
    show("1. Monthly Sales Trend", monthly.map(|v| v.rows.as_slice()), max_rows);
    if let Ok(v) = monthly {
        println!("Average monthly sales: {}\n", crate::util::format_number(v.mean_sales, 2));
    }
    show("2. Sales by Product Line", views.product_performance.as_deref(), max_rows);
    let customers = views.customer_behavior.as_ref();
    show("3. Customer Order Quantity vs Sales", customers.map(|v| v.rows.as_slice()), max_rows);
    if let Ok(v) = customers {
        match &v.trend {
            Some(t) => println!("Trend line: SALES = {:.4} * QUANTITYORDERED + {:.2}\n", t.slope, t.intercept),
            None => println!("Trend line: not enough distinct quantities to fit\n"),
        }
    }
    show("4. Global Sales Distribution", views.geographic_distribution.as_deref(), max_rows);
    let price_summary = views.price_strategy.as_ref().map(|p| p.summary());
    show("5. Deal Size vs Unit Price", price_summary.as_deref().map_err(|e| *e), max_rows);
    show("6. Product Order Quantity", views.inventory_heat.as_deref(), max_rows);
    show("7. Product Line Competitiveness", views.market_competition.as_deref(), max_rows);
    show("8. Sales by Deal Size", views.marketing_effect.as_deref(), max_rows);
    show("9. Order Status Breakdown", views.customer_feedback.as_deref(), max_rows);
}
