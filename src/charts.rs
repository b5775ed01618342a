// Declarative chart descriptions handed to the renderer.
//
// A `ChartSpec` names the chart kind, which row fields feed which axis,
// a palette hint and a size hint. It carries the view rows as JSON objects
// so the renderer never needs to know the Rust row types.

use crate::config::ReportConfig;
use crate::error::ViewError;
use crate::types::{
    col, CompetitionRow, CountrySalesRow, CustomerBehavior, DealSalesRow, InventoryRow,
    MonthlyTrend, PriceStrategy, ProductSalesRow, StatusCountRow, TrendLine,
};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
    Choropleth,
    Box,
    Heatmap,
    Polar,
    Pie,
}

/// Color hint. Sequential palettes follow the usual ColorBrewer/matplotlib ramps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    Plasma,
    Greens,
    Reds,
    Purples,
    Oranges,
    YlOrRd,
    Single(String),
}

impl Palette {
    pub fn colors(&self) -> Vec<String> {
        let ramp: &[&str] = match self {
            Palette::Plasma => &[
                "#0d0887", "#46039f", "#7201a8", "#9c179e", "#bd3786", "#d8576b", "#ed7953",
                "#fb9f3a", "#fdca26", "#f0f921",
            ],
            Palette::Greens => &[
                "rgb(247,252,245)", "rgb(229,245,224)", "rgb(199,233,192)", "rgb(161,217,155)",
                "rgb(116,196,118)", "rgb(65,171,93)", "rgb(35,139,69)", "rgb(0,109,44)",
                "rgb(0,68,27)",
            ],
            Palette::Reds => &[
                "rgb(255,245,240)", "rgb(254,224,210)", "rgb(252,187,161)", "rgb(252,146,114)",
                "rgb(251,106,74)", "rgb(239,59,44)", "rgb(203,24,29)", "rgb(165,15,21)",
                "rgb(103,0,13)",
            ],
            Palette::Purples => &[
                "rgb(252,251,253)", "rgb(239,237,245)", "rgb(218,218,235)", "rgb(188,189,220)",
                "rgb(158,154,200)", "rgb(128,125,186)", "rgb(106,81,163)", "rgb(84,39,143)",
                "rgb(63,0,125)",
            ],
            Palette::Oranges => &[
                "rgb(255,245,235)", "rgb(254,230,206)", "rgb(253,208,162)", "rgb(253,174,107)",
                "rgb(253,141,60)", "rgb(241,105,19)", "rgb(217,72,1)", "rgb(166,54,3)",
                "rgb(127,39,4)",
            ],
            Palette::YlOrRd => &[
                "rgb(255,255,204)", "rgb(255,237,160)", "rgb(254,217,118)", "rgb(254,178,76)",
                "rgb(253,141,60)", "rgb(252,78,42)", "rgb(227,26,28)", "rgb(189,0,38)",
                "rgb(128,0,38)",
            ],
            Palette::Single(c) => return vec![c.clone()],
        };
        ramp.iter().map(|c| c.to_string()).collect()
    }

    /// `n` discrete colors, cycling through the ramp.
    pub fn cycle(&self, n: usize) -> Vec<String> {
        let colors = self.colors();
        colors.iter().cycle().take(n).cloned().collect()
    }

    /// Continuous colorscale as `[[t, color], ...]` with `t` in `0..=1`.
    pub fn colorscale(&self) -> Vec<(f64, String)> {
        let colors = self.colors();
        let last = colors.len().saturating_sub(1).max(1) as f64;
        colors
            .into_iter()
            .enumerate()
            .map(|(i, c)| (i as f64 / last, c))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bindings {
    pub x: String,
    pub y: Option<String>,
    pub z: Option<String>,
    pub color: Option<String>,
}

impl Bindings {
    fn xy(x: &str, y: &str) -> Self {
        Self {
            x: x.to_string(),
            y: Some(y.to_string()),
            z: None,
            color: None,
        }
    }

    fn colored(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

/// Dashed line at a fixed axis value, e.g. a mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub axis: Axis,
    pub value: f64,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub bindings: Bindings,
    pub palette: Palette,
    pub width: u32,
    pub height: u32,
    pub paper_background: Option<String>,
    pub reference_lines: Vec<ReferenceLine>,
    pub trend_line: Option<TrendLine>,
    pub rows: Vec<Value>,
}

impl ChartSpec {
    fn new(
        kind: ChartKind,
        title: &str,
        bindings: Bindings,
        palette: Palette,
        rows: Vec<Value>,
        config: &ReportConfig,
    ) -> Self {
        Self {
            kind,
            title: title.to_string(),
            bindings,
            palette,
            width: config.chart_width,
            height: config.chart_height,
            paper_background: None,
            reference_lines: Vec::new(),
            trend_line: None,
            rows,
        }
    }

    /// Values of one bound field across all rows, `null` where absent.
    pub fn column(&self, field: &str) -> Vec<Value> {
        self.rows
            .iter()
            .map(|r| r.get(field).cloned().unwrap_or(Value::Null))
            .collect()
    }
}

fn encode<T: Serialize>(view: &'static str, rows: &[T]) -> Result<Vec<Value>, ViewError> {
    rows.iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ViewError::Encode {
            view,
            message: e.to_string(),
        })
}

pub fn monthly_trend_chart(view: &MonthlyTrend, config: &ReportConfig) -> Result<ChartSpec, ViewError> {
    let rows = encode("monthly trend", &view.rows)?;
    let mut spec = ChartSpec::new(
        ChartKind::Line,
        "Monthly Sales Trend",
        Bindings::xy(col::MONTH, col::SALES),
        Palette::Plasma,
        rows,
        config,
    );
    spec.paper_background = Some("lightblue".to_string());
    spec.reference_lines.push(ReferenceLine {
        axis: Axis::Y,
        value: view.mean_sales,
        label: "Average sales".to_string(),
        color: "orange".to_string(),
    });
    Ok(spec)
}

pub fn product_performance_chart(view: &[ProductSalesRow], config: &ReportConfig) -> Result<ChartSpec, ViewError> {
    let rows = encode("product performance", view)?;
    Ok(ChartSpec::new(
        ChartKind::Bar,
        "Sales by Product Line",
        Bindings::xy(col::PRODUCT_LINE, col::SALES).colored(col::PRODUCT_LINE),
        Palette::Greens,
        rows,
        config,
    ))
}

pub fn customer_behavior_chart(view: &CustomerBehavior, config: &ReportConfig) -> Result<ChartSpec, ViewError> {
    let rows = encode("customer behavior", &view.rows)?;
    let mut spec = ChartSpec::new(
        ChartKind::Scatter,
        "Customer Order Quantity vs Sales",
        Bindings::xy(col::QUANTITY, col::SALES).colored(col::CUSTOMER),
        Palette::Reds,
        rows,
        config,
    );
    spec.reference_lines = vec![
        ReferenceLine {
            axis: Axis::Y,
            value: view.mean_sales,
            label: "Average sales".to_string(),
            color: "black".to_string(),
        },
        ReferenceLine {
            axis: Axis::X,
            value: view.mean_quantity,
            label: "Average order quantity".to_string(),
            color: "black".to_string(),
        },
    ];
    spec.trend_line = view.trend.clone();
    Ok(spec)
}

pub fn geographic_chart(view: &[CountrySalesRow], config: &ReportConfig) -> Result<ChartSpec, ViewError> {
    let rows = encode("geographic distribution", view)?;
    Ok(ChartSpec::new(
        ChartKind::Choropleth,
        "Global Sales Distribution",
        Bindings::xy(col::COUNTRY, col::SALES),
        Palette::Purples,
        rows,
        config,
    ))
}

pub fn price_strategy_chart(view: &PriceStrategy, config: &ReportConfig) -> Result<ChartSpec, ViewError> {
    // one row per record so the renderer sees the full distribution
    let rows = view
        .groups
        .iter()
        .flat_map(|g| {
            g.prices.iter().map(move |p| {
                let mut row = Map::new();
                row.insert(col::DEAL_SIZE.to_string(), Value::from(g.deal_size.as_str()));
                row.insert(col::PRICE.to_string(), Value::from(*p));
                Value::Object(row)
            })
        })
        .collect();
    Ok(ChartSpec::new(
        ChartKind::Box,
        "Deal Size vs Unit Price",
        Bindings::xy(col::DEAL_SIZE, col::PRICE).colored(col::DEAL_SIZE),
        Palette::Oranges,
        rows,
        config,
    ))
}

pub fn inventory_chart(view: &[InventoryRow], config: &ReportConfig) -> Result<ChartSpec, ViewError> {
    let rows = encode("inventory heat", view)?;
    let mut bindings = Bindings::xy(col::PRODUCT_CODE, col::PRODUCT_LINE);
    bindings.z = Some(col::QUANTITY.to_string());
    Ok(ChartSpec::new(
        ChartKind::Heatmap,
        "Product Order Quantity Heatmap",
        bindings,
        Palette::YlOrRd,
        rows,
        config,
    ))
}

pub fn competition_chart(view: &[CompetitionRow], config: &ReportConfig) -> Result<ChartSpec, ViewError> {
    let rows = encode("market competition", view)?;
    Ok(ChartSpec::new(
        ChartKind::Polar,
        "Product Line Competitiveness Radar",
        Bindings::xy(col::PRODUCT_LINE, col::SALES),
        Palette::Single("#00BFFF".to_string()),
        rows,
        config,
    ))
}

pub fn marketing_chart(view: &[DealSalesRow], config: &ReportConfig) -> Result<ChartSpec, ViewError> {
    let rows = encode("marketing effect", view)?;
    Ok(ChartSpec::new(
        ChartKind::Bar,
        "Sales by Deal Size",
        Bindings::xy(col::DEAL_SIZE, col::SALES).colored(col::DEAL_SIZE),
        Palette::Greens,
        rows,
        config,
    ))
}

pub fn feedback_chart(view: &[StatusCountRow], config: &ReportConfig) -> Result<ChartSpec, ViewError> {
    let rows = encode("customer feedback", view)?;
    Ok(ChartSpec::new(
        ChartKind::Pie,
        "Order Status Breakdown",
        Bindings::xy(col::STATUS, col::COUNT),
        Palette::Reds,
        rows,
        config,
    ))
}
