// Assembles the ten dashboard sections in their fixed order.

use crate::charts::{self, ChartSpec};
use crate::config::ReportConfig;
use crate::error::ViewError;
use crate::types::{
    CompetitionRow, CountrySalesRow, CustomerBehavior, DealSalesRow, InventoryRow, MonthlyTrend,
    PriceStrategy, ProductSalesRow, RecordSet, StatusCountRow, SummaryPoint,
};
use crate::views;
use serde::Serialize;
use std::thread;
use tracing::{debug, warn};

/// Results of every view over one record set. A failed view keeps its error
/// so the dashboard can show a placeholder in its place.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportViews {
    pub monthly_trend: Result<MonthlyTrend, ViewError>,
    pub product_performance: Result<Vec<ProductSalesRow>, ViewError>,
    pub customer_behavior: Result<CustomerBehavior, ViewError>,
    pub geographic_distribution: Result<Vec<CountrySalesRow>, ViewError>,
    pub price_strategy: Result<PriceStrategy, ViewError>,
    pub inventory_heat: Result<Vec<InventoryRow>, ViewError>,
    pub market_competition: Result<Vec<CompetitionRow>, ViewError>,
    pub marketing_effect: Result<Vec<DealSalesRow>, ViewError>,
    pub customer_feedback: Result<Vec<StatusCountRow>, ViewError>,
    pub summary: Vec<SummaryPoint>,
}

impl ReportViews {
    pub fn compute(records: &RecordSet) -> Self {
        Self {
            monthly_trend: views::monthly_trend(records),
            product_performance: views::product_performance(records),
            customer_behavior: views::customer_behavior(records),
            geographic_distribution: views::geographic_distribution(records),
            price_strategy: views::price_strategy(records),
            inventory_heat: views::inventory_heat(records),
            market_competition: views::market_competition(records),
            marketing_effect: views::marketing_effect(records),
            customer_feedback: views::customer_feedback(records),
            summary: views::summary(),
        }
    }

    /// Same result as [`ReportViews::compute`], with each view on its own
    /// scoped thread. Views only read the shared record set.
    pub fn compute_parallel(records: &RecordSet) -> Self {
        thread::scope(|s| {
            let monthly = s.spawn(|| views::monthly_trend(records));
            let product = s.spawn(|| views::product_performance(records));
            let customer = s.spawn(|| views::customer_behavior(records));
            let geo = s.spawn(|| views::geographic_distribution(records));
            let price = s.spawn(|| views::price_strategy(records));
            let inventory = s.spawn(|| views::inventory_heat(records));
            let competition = s.spawn(|| views::market_competition(records));
            let marketing = s.spawn(|| views::marketing_effect(records));
            let feedback = s.spawn(|| views::customer_feedback(records));
            Self {
                monthly_trend: join(monthly),
                product_performance: join(product),
                customer_behavior: join(customer),
                geographic_distribution: join(geo),
                price_strategy: join(price),
                inventory_heat: join(inventory),
                market_competition: join(competition),
                marketing_effect: join(marketing),
                customer_feedback: join(feedback),
                summary: views::summary(),
            }
        })
    }
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
    match handle.join() {
        Ok(v) => v,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SectionBody {
    Chart(Box<ChartSpec>),
    Placeholder { reason: String },
    Narrative { points: Vec<SummaryPoint> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub number: u8,
    pub heading: &'static str,
    pub body: SectionBody,
}

pub const HEADINGS: [&str; 10] = [
    "Sales Trend Analysis",
    "Product Performance Analysis",
    "Customer Behavior Analysis",
    "Geographic Distribution Analysis",
    "Price Strategy Analysis",
    "Inventory Management Analysis",
    "Market Competition Analysis",
    "Marketing Effect Analysis",
    "Customer Feedback Analysis",
    "Summary and Recommendations",
];

fn chart_section<V, F>(number: u8, view: &Result<V, ViewError>, build: F) -> Section
where
    F: FnOnce(&V) -> Result<ChartSpec, ViewError>,
{
    let heading = HEADINGS[usize::from(number) - 1];
    let body = match view.as_ref().map_err(|e| e.clone()).and_then(build) {
        Ok(spec) => {
            debug!(section = number, kind = ?spec.kind, rows = spec.rows.len(), "chart ready");
            SectionBody::Chart(Box::new(spec))
        }
        Err(e) => {
            warn!(section = number, error = %e, "section rendered as placeholder");
            SectionBody::Placeholder {
                reason: e.to_string(),
            }
        }
    };
    Section {
        number,
        heading,
        body,
    }
}

/// The ten sections, in display order. A failed view only affects its own
/// section.
pub fn build_dashboard(views: &ReportViews, config: &ReportConfig) -> Vec<Section> {
    vec![
        chart_section(1, &views.monthly_trend, |v| charts::monthly_trend_chart(v, config)),
        chart_section(2, &views.product_performance, |v| {
            charts::product_performance_chart(v, config)
        }),
        chart_section(3, &views.customer_behavior, |v| charts::customer_behavior_chart(v, config)),
        chart_section(4, &views.geographic_distribution, |v| charts::geographic_chart(v, config)),
        chart_section(5, &views.price_strategy, |v| charts::price_strategy_chart(v, config)),
        chart_section(6, &views.inventory_heat, |v| charts::inventory_chart(v, config)),
        chart_section(7, &views.market_competition, |v| charts::competition_chart(v, config)),
        chart_section(8, &views.marketing_effect, |v| charts::marketing_chart(v, config)),
        chart_section(9, &views.customer_feedback, |v| charts::feedback_chart(v, config)),
        Section {
            number: 10,
            heading: HEADINGS[9],
            body: SectionBody::Narrative {
                points: views.summary.clone(),
            },
        },
    ]
}
