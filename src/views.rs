// The ten report views. Each one is a pure function of the record set: none
// reads another view's output, so they can run in any order or in parallel.
use crate::error::ViewError;
use crate::types::{
    CompetitionRow, CountrySalesRow, CustomerBehavior, CustomerRow, DealSalesRow, InventoryRow,
    MonthlySalesRow, MonthlyTrend, PriceGroup, PriceStrategy, PriceSummaryRow, ProductSalesRow,
    RecordSet, SalesRecord, StatusCountRow, SummaryPoint, TrendLine, TrendPoint,
};
use crate::util::{average, linear_fit, median, month_key, quantile};
use std::cmp::Ordering;
use std::collections::BTreeMap;

fn non_empty(records: &RecordSet, view: &'static str) -> Result<(), ViewError> {
    if records.is_empty() {
        Err(ViewError::EmptyRecordSet { view })
    } else {
        Ok(())
    }
}

/// Sum of sales keyed by a string extracted from each record, ascending by key.
fn sum_sales_by<F>(records: &RecordSet, key: F) -> BTreeMap<String, f64>
where
    F: Fn(&SalesRecord) -> String,
{
    let mut map: BTreeMap<String, f64> = BTreeMap::new();
    for r in records {
        *map.entry(key(r)).or_insert(0.0) += r.sales;
    }
    map
}

/// 1. Monthly sales totals plus the mean of those totals for the reference line.
pub fn monthly_trend(records: &RecordSet) -> Result<MonthlyTrend, ViewError> {
    non_empty(records, "monthly trend")?;
    let rows: Vec<MonthlySalesRow> = sum_sales_by(records, |r| month_key(r.order_date))
        .into_iter()
        .map(|(month, sales)| MonthlySalesRow { month, sales })
        .collect();
    let mean_sales = average(&rows.iter().map(|r| r.sales).collect::<Vec<_>>());
    Ok(MonthlyTrend { rows, mean_sales })
}

/// 2. Total sales per product line.
pub fn product_performance(records: &RecordSet) -> Result<Vec<ProductSalesRow>, ViewError> {
    non_empty(records, "product performance")?;
    Ok(sum_sales_by(records, |r| r.product_line.clone())
        .into_iter()
        .map(|(product_line, sales)| ProductSalesRow { product_line, sales })
        .collect())
}

/// 3. Quantity and sales per customer, axis means, and a least squares trend
/// of sales against quantity.
pub fn customer_behavior(records: &RecordSet) -> Result<CustomerBehavior, ViewError> {
    non_empty(records, "customer behavior")?;
    let mut map: BTreeMap<&str, (u64, f64)> = BTreeMap::new();
    for r in records {
        let e = map.entry(r.customer_name.as_str()).or_insert((0, 0.0));
        e.0 += u64::from(r.quantity_ordered);
        e.1 += r.sales;
    }
    let rows: Vec<CustomerRow> = map
        .into_iter()
        .map(|(name, (quantity, sales))| CustomerRow {
            customer_name: name.to_string(),
            quantity_ordered: quantity,
            sales,
        })
        .collect();

    let pairs: Vec<(f64, f64)> = rows
        .iter()
        .map(|r| (r.quantity_ordered as f64, r.sales))
        .collect();
    let mean_quantity = average(&pairs.iter().map(|p| p.0).collect::<Vec<_>>());
    let mean_sales = average(&pairs.iter().map(|p| p.1).collect::<Vec<_>>());
    let trend = fit_trend(&pairs);
    Ok(CustomerBehavior {
        rows,
        mean_quantity,
        mean_sales,
        trend,
    })
}

fn fit_trend(pairs: &[(f64, f64)]) -> Option<TrendLine> {
    let (slope, intercept) = linear_fit(pairs)?;
    let mut xs: Vec<f64> = pairs.iter().map(|p| p.0).collect();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    xs.dedup();
    let points = xs
        .into_iter()
        .map(|x| TrendPoint {
            x,
            y: slope * x + intercept,
        })
        .collect();
    Some(TrendLine {
        slope,
        intercept,
        points,
    })
}

/// Map country spellings in the sales export onto the names the map renderer
/// recognizes. Unknown names pass through unchanged.
pub fn canonical_country_name(name: &str) -> &str {
    match name {
        "USA" | "US" | "U.S.A." => "United States",
        "UK" | "U.K." | "Great Britain" => "United Kingdom",
        other => other,
    }
}

/// 4. Total sales per country, keyed by the renderer's country names.
pub fn geographic_distribution(records: &RecordSet) -> Result<Vec<CountrySalesRow>, ViewError> {
    non_empty(records, "geographic distribution")?;
    Ok(
        sum_sales_by(records, |r| canonical_country_name(&r.country).to_string())
            .into_iter()
            .map(|(country, sales)| CountrySalesRow { country, sales })
            .collect(),
    )
}

/// 5. Every unit price, grouped by deal size. Nothing is aggregated away; the
/// box plot needs the full distribution.
pub fn price_strategy(records: &RecordSet) -> Result<PriceStrategy, ViewError> {
    non_empty(records, "price strategy")?;
    let mut map: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in records {
        map.entry(r.deal_size.as_str()).or_default().push(r.price_each);
    }
    let groups = map
        .into_iter()
        .map(|(deal_size, prices)| PriceGroup {
            deal_size: deal_size.to_string(),
            prices,
        })
        .collect();
    Ok(PriceStrategy { groups })
}

impl PriceStrategy {
    /// Five-number summary per deal size, for tables and CSV export.
    pub fn summary(&self) -> Vec<PriceSummaryRow> {
        self.groups
            .iter()
            .map(|g| PriceSummaryRow {
                deal_size: g.deal_size.clone(),
                count: g.prices.len() as u64,
                min: g.prices.iter().copied().fold(f64::INFINITY, f64::min),
                q1: quantile(g.prices.clone(), 0.25),
                median: median(g.prices.clone()),
                q3: quantile(g.prices.clone(), 0.75),
                max: g.prices.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            })
            .collect()
    }
}

/// 6. Quantity ordered per (product code, product line) pair.
pub fn inventory_heat(records: &RecordSet) -> Result<Vec<InventoryRow>, ViewError> {
    non_empty(records, "inventory heat")?;
    let mut map: BTreeMap<(&str, &str), u64> = BTreeMap::new();
    for r in records {
        *map.entry((r.product_code.as_str(), r.product_line.as_str()))
            .or_insert(0) += u64::from(r.quantity_ordered);
    }
    Ok(map
        .into_iter()
        .map(|((code, line), quantity)| InventoryRow {
            product_code: code.to_string(),
            product_line: line.to_string(),
            quantity_ordered: quantity,
        })
        .collect())
}

/// 7. Mean sales per product line.
pub fn market_competition(records: &RecordSet) -> Result<Vec<CompetitionRow>, ViewError> {
    non_empty(records, "market competition")?;
    let mut map: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in records {
        map.entry(r.product_line.as_str()).or_default().push(r.sales);
    }
    Ok(map
        .into_iter()
        .map(|(line, sales)| CompetitionRow {
            product_line: line.to_string(),
            mean_sales: average(&sales),
        })
        .collect())
}

/// 8. Total sales per deal size.
pub fn marketing_effect(records: &RecordSet) -> Result<Vec<DealSalesRow>, ViewError> {
    non_empty(records, "marketing effect")?;
    Ok(sum_sales_by(records, |r| r.deal_size.clone())
        .into_iter()
        .map(|(deal_size, sales)| DealSalesRow { deal_size, sales })
        .collect())
}

/// 9. Record count per order status, most frequent first.
pub fn customer_feedback(records: &RecordSet) -> Result<Vec<StatusCountRow>, ViewError> {
    non_empty(records, "customer feedback")?;
    let mut map: BTreeMap<&str, u64> = BTreeMap::new();
    for r in records {
        *map.entry(r.status.as_str()).or_insert(0) += 1;
    }
    let mut rows: Vec<StatusCountRow> = map
        .into_iter()
        .map(|(status, count)| StatusCountRow {
            status: status.to_string(),
            count,
        })
        .collect();
    // stable sort keeps ties in name order
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(rows)
}

/// 10. Hand-written conclusions. Static text, not derived from the other views.
pub fn summary() -> Vec<SummaryPoint> {
    vec![
        SummaryPoint {
            topic: "Sales trend",
            text: "Sales rose through 2019; strengthen promotions toward year end.",
        },
        SummaryPoint {
            topic: "Product performance",
            text: "Classic Cars perform best; raise marketing and stock levels for them.",
        },
        SummaryPoint {
            topic: "Customer behavior",
            text: "Identify high-value customers and target them with personalized marketing.",
        },
        SummaryPoint {
            topic: "Geographic distribution",
            text: "USA and France are the main markets; consider expanding into Japan.",
        },
        SummaryPoint {
            topic: "Price strategy",
            text: "Demand for high unit-price products is stable; small price adjustments can be tested.",
        },
        SummaryPoint {
            topic: "Inventory",
            text: "Keep best sellers well stocked and clear slow-moving items.",
        },
        SummaryPoint {
            topic: "Market competition",
            text: "Classic Cars stay ahead; keep innovating and promoting the line.",
        },
        SummaryPoint {
            topic: "Marketing effect",
            text: "Large deals drive high sales; invest further in B2B marketing.",
        },
        SummaryPoint {
            topic: "Customer feedback",
            text: "Disputed and Cancelled orders are rare, but logistics can still improve.",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(date: (i32, u32, u32), line: &str, customer: &str, deal: &str, qty: u32, price: f64, sales: f64) -> SalesRecord {
        SalesRecord {
            order_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            product_line: line.into(),
            product_code: format!("{line}-code"),
            customer_name: customer.into(),
            country: "USA".into(),
            deal_size: deal.into(),
            status: "Shipped".into(),
            quantity_ordered: qty,
            price_each: price,
            sales,
        }
    }

    #[test]
    fn monthly_scenario() {
        let rs = RecordSet::new(vec![
            rec((2019, 1, 3), "Ships", "A", "Small", 1, 100.0, 100.0),
            rec((2019, 1, 20), "Ships", "A", "Small", 1, 50.0, 50.0),
            rec((2019, 2, 1), "Ships", "A", "Small", 1, 200.0, 200.0),
        ]);
        let trend = monthly_trend(&rs).unwrap();
        assert_eq!(
            trend.rows,
            vec![
                MonthlySalesRow { month: "2019-01".into(), sales: 150.0 },
                MonthlySalesRow { month: "2019-02".into(), sales: 200.0 },
            ]
        );
        assert_eq!(trend.mean_sales, 175.0);
    }

    #[test]
    fn months_sort_chronologically_across_years() {
        let rs = RecordSet::new(vec![
            rec((2020, 1, 1), "Ships", "A", "Small", 1, 1.0, 1.0),
            rec((2019, 12, 1), "Ships", "A", "Small", 1, 1.0, 1.0),
        ]);
        let months: Vec<_> = monthly_trend(&rs).unwrap().rows.into_iter().map(|r| r.month).collect();
        assert_eq!(months, vec!["2019-12", "2020-01"]);
    }

    #[test]
    fn deal_size_scenario() {
        let rs = RecordSet::new(vec![
            rec((2019, 1, 1), "Ships", "A", "Small", 1, 10.0, 100.0),
            rec((2019, 1, 1), "Ships", "B", "Small", 1, 20.0, 40.0),
            rec((2019, 1, 1), "Ships", "C", "Large", 1, 90.0, 900.0),
        ]);
        let effect = marketing_effect(&rs).unwrap();
        assert_eq!(effect.len(), 2);
        let small = effect.iter().find(|r| r.deal_size == "Small").unwrap();
        assert_eq!(small.sales, 140.0);

        let price = price_strategy(&rs).unwrap();
        let names: Vec<_> = price.groups.iter().map(|g| g.deal_size.as_str()).collect();
        assert_eq!(names, vec!["Large", "Small"]);
        assert_eq!(price.groups[1].prices, vec![10.0, 20.0]);
    }

    #[test]
    fn price_summary_is_five_numbers() {
        let rs = RecordSet::new(
            [1.0, 2.0, 3.0, 4.0, 5.0]
                .iter()
                .map(|p| rec((2019, 1, 1), "Ships", "A", "Medium", 1, *p, *p))
                .collect(),
        );
        let summary = price_strategy(&rs).unwrap().summary();
        assert_eq!(summary.len(), 1);
        let s = &summary[0];
        assert_eq!((s.count, s.min, s.q1, s.median, s.q3, s.max), (5, 1.0, 2.0, 3.0, 4.0, 5.0));
    }

    #[test]
    fn customer_trend_passes_through_two_points() {
        let rs = RecordSet::new(vec![
            rec((2019, 1, 1), "Ships", "A", "Small", 10, 1.0, 100.0),
            rec((2019, 1, 1), "Ships", "B", "Small", 30, 1.0, 500.0),
        ]);
        let cb = customer_behavior(&rs).unwrap();
        let trend = cb.trend.unwrap();
        assert!((trend.predict(10.0) - 100.0).abs() < 1e-9);
        assert!((trend.predict(30.0) - 500.0).abs() < 1e-9);
        assert_eq!(trend.points.len(), 2);
        assert_eq!(cb.mean_quantity, 20.0);
        assert_eq!(cb.mean_sales, 300.0);
    }

    #[test]
    fn customer_totals_merge_rows() {
        let rs = RecordSet::new(vec![
            rec((2019, 1, 1), "Ships", "A", "Small", 10, 1.0, 100.0),
            rec((2019, 2, 1), "Planes", "A", "Small", 5, 1.0, 60.0),
        ]);
        let cb = customer_behavior(&rs).unwrap();
        assert_eq!(cb.rows.len(), 1);
        assert_eq!(cb.rows[0].quantity_ordered, 15);
        assert_eq!(cb.rows[0].sales, 160.0);
        assert!(cb.trend.is_none());
    }

    #[test]
    fn inventory_groups_by_code_and_line() {
        let mut a = rec((2019, 1, 1), "Ships", "A", "Small", 10, 1.0, 1.0);
        a.product_code = "S1".into();
        let mut b = a.clone();
        b.quantity_ordered = 5;
        let mut c = a.clone();
        c.product_line = "Planes".into();
        let rows = inventory_heat(&RecordSet::new(vec![a, b, c])).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].product_line, "Planes");
        assert_eq!(rows[1].quantity_ordered, 15);
    }

    #[test]
    fn competition_uses_mean() {
        let rs = RecordSet::new(vec![
            rec((2019, 1, 1), "Ships", "A", "Small", 1, 1.0, 100.0),
            rec((2019, 1, 1), "Ships", "B", "Small", 1, 1.0, 300.0),
        ]);
        assert_eq!(market_competition(&rs).unwrap()[0].mean_sales, 200.0);
    }

    #[test]
    fn feedback_orders_by_count_then_name() {
        let mut rows = Vec::new();
        for status in ["Shipped", "Shipped", "Disputed", "Cancelled", "Shipped"] {
            let mut r = rec((2019, 1, 1), "Ships", "A", "Small", 1, 1.0, 1.0);
            r.status = status.into();
            rows.push(r);
        }
        let fb = customer_feedback(&RecordSet::new(rows)).unwrap();
        let got: Vec<_> = fb.iter().map(|r| (r.status.as_str(), r.count)).collect();
        assert_eq!(got, vec![("Shipped", 3), ("Cancelled", 1), ("Disputed", 1)]);
    }

    #[test]
    fn countries_use_renderer_names() {
        let mut uk = rec((2019, 1, 1), "Ships", "A", "Small", 1, 1.0, 5.0);
        uk.country = "UK".into();
        let us = rec((2019, 1, 1), "Ships", "A", "Small", 1, 1.0, 7.0);
        let rows = geographic_distribution(&RecordSet::new(vec![uk, us])).unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["United Kingdom", "United States"]);
        assert_eq!(canonical_country_name("Japan"), "Japan");
    }

    #[test]
    fn empty_record_set_is_a_view_error() {
        let rs = RecordSet::new(vec![]);
        assert_eq!(
            product_performance(&rs).unwrap_err(),
            ViewError::EmptyRecordSet { view: "product performance" }
        );
        assert!(monthly_trend(&rs).is_err());
        assert!(customer_feedback(&rs).is_err());
        assert_eq!(summary().len(), 9);
    }
}
