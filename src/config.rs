use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "Auto Sales data.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "dashboard_output";

/// Settings for one dashboard session.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
    /// Size hint handed to the renderer for every chart.
    pub chart_width: u32,
    pub chart_height: u32,
    pub page_title: String,
    pub subtitle: String,
    /// Designer and version line shown under the subtitle.
    pub credit: String,
    pub intro: String,
    /// Rows shown per view in console previews.
    pub preview_rows: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            chart_width: 1000,
            chart_height: 500,
            page_title: "Auto Sales Analysis Dashboard".to_string(),
            subtitle: "Sales trends, product performance, customer behavior, markets and marketing effect".to_string(),
            credit: "Design: Aries Yeh | Version: V1.2".to_string(),
            intro: "This interactive dashboard helps you see auto sales trends, product performance, \
                    customer behavior, market distribution and marketing effect as a basis for \
                    business decisions."
                .to_string(),
            preview_rows: 3,
        }
    }
}

impl ReportConfig {
    pub fn html_path(&self) -> PathBuf {
        self.output_dir.join("dashboard.html")
    }
}
