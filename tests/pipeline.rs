use auto_sales_report::dashboard::{build_dashboard, ReportViews, SectionBody};
use auto_sales_report::render::render_dashboard;
use auto_sales_report::types::MISSING_LABEL;
use auto_sales_report::{load_records, views, LoadError, RecordSet, ReportConfig, SalesRecord};
use chrono::NaiveDate;
use proptest::prelude::*;
use std::io::Write;

const SAMPLE: &str = "\
ORDERNUMBER,QUANTITYORDERED,PRICEEACH,ORDERLINENUMBER,SALES,ORDERDATE,DAYS_SINCE_LASTORDER,STATUS,PRODUCTLINE,MSRP,PRODUCTCODE,CUSTOMERNAME,PHONE,ADDRESSLINE1,CITY,POSTALCODE,COUNTRY,CONTACTLASTNAME,CONTACTFIRSTNAME,DEALSIZE
10107,30,95.7,2,2871,24/02/2018,828,Shipped,Motorcycles,95,S10_1678,Land of Toys Inc.,2125557818,897 Long Airport Avenue,NYC,10022,USA,Yu,Kwai,Small
10121,34,81.35,5,2765.9,07/05/2018,757,Shipped,Motorcycles,95,S10_1678,Reims Collectables,26.47.1555,59 rue de l'Abbaye,Reims,51100,France,Henriot,Paul,Small
10134,41,94.74,2,3884.34,01/07/2018,703,Shipped,Motorcycles,95,S10_1678,Lyon Souveniers,+33 1 46 62 7555,27 rue du Colonel Pierre Avia,Paris,75508,France,Da Cunha,Daniel,Medium
10145,45,83.26,6,3746.7,25/08/2018,649,Shipped,Motorcycles,95,S10_1678,Toys4GrownUps.com,6265557265,78934 Hillside Dr.,Pasadena,90003,USA,Young,Julie,Medium
10168,36,96.66,1,3479.76,28/10/2018,586,Shipped,Classic Cars,95,S10_1949,Technics Stores Inc.,6505556809,9408 Furth Circle,Burlingame,94217,USA,Hirano,Juri,Medium
10180,29,86.13,9,2497.77,11/11/2018,573,Shipped,Classic Cars,95,S10_1949,Daedalus Designs Imports,20.16.1555,\"184, chaussee de Tournai\",Lille,59000,France,Rance,Martine,Small
10188,48,114.84,1,5512.32,18/11/2018,566,Disputed,Classic Cars,214,S10_1949,Herkku Gifts,+47 2267 3215,\"Drammen 121, PR 744 Sentrum\",Bergen,N 5804,Norway,Oeztan,Veysel,Medium
10201,22,98.57,2,2168.54,01/12/2018,553,Cancelled,Vintage Cars,118,S10_4698,Mini Wheels Co.,6505555787,5557 North Pendale Street,San Francisco,,USA,Murphy,Julie,Small
10211,41,114.84,14,7700.25,15/01/2019,540,Shipped,Vintage Cars,118,S10_4698,Auto Canal Petit,(1) 47.55.6555,\"25, rue Lauriston\",Paris,75016,France,Perrier,Dominique,Large
10223,37,117.48,1,4346.76,20/02/2019,524,Shipped,Vintage Cars,118,S10_4698,\"Australian Collectors, Co.\",03 9520 4555,636 St Kilda Road,Melbourne,3004,Australia,Ferguson,Peter,Medium
";

fn write_sample(body: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(body.as_bytes()).unwrap();
    f
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * (1.0 + a.abs().max(b.abs()))
}

#[test]
fn sample_file_loads_and_all_sections_render() {
    let file = write_sample(SAMPLE);
    let (records, summary) = load_records(file.path()).unwrap();
    assert_eq!(records.len(), 10);
    assert_eq!(summary.first_order, NaiveDate::from_ymd_opt(2018, 2, 24));
    assert_eq!(summary.last_order, NaiveDate::from_ymd_opt(2019, 2, 20));

    let views = ReportViews::compute(&records);
    let countries: Vec<_> = views
        .geographic_distribution
        .as_ref()
        .unwrap()
        .iter()
        .map(|r| r.country.as_str())
        .collect();
    assert_eq!(countries, vec!["Australia", "France", "Norway", "United States"]);

    let cfg = ReportConfig::default();
    let sections = build_dashboard(&views, &cfg);
    assert_eq!(sections.len(), 10);
    assert!(sections[..9].iter().all(|s| matches!(s.body, SectionBody::Chart(_))));
    let html = render_dashboard(&sections, &cfg);
    assert_eq!(html.matches("Plotly.newPlot").count(), 9);
    assert!(html.contains("country names"));
}

#[test]
fn bad_date_anywhere_aborts_the_load() {
    let broken = SAMPLE.replace("15/01/2019", "2019-01-15");
    let file = write_sample(&broken);
    match load_records(file.path()) {
        Err(LoadError::InvalidDate { row, value }) => {
            assert_eq!(row, 9);
            assert_eq!(value, "2019-01-15");
        }
        other => panic!("expected InvalidDate, got {other:?}"),
    }
}

#[test]
fn single_row_works_everywhere_except_trend() {
    let one: String = SAMPLE.lines().take(2).map(|l| format!("{l}\n")).collect();
    let file = write_sample(&one);
    let (records, _) = load_records(file.path()).unwrap();
    let views = ReportViews::compute(&records);
    assert!(views.monthly_trend.is_ok());
    assert!(views.product_performance.is_ok());
    assert!(views.geographic_distribution.is_ok());
    assert!(views.price_strategy.is_ok());
    assert!(views.inventory_heat.is_ok());
    assert!(views.market_competition.is_ok());
    assert!(views.marketing_effect.is_ok());
    assert!(views.customer_feedback.is_ok());
    let customer = views.customer_behavior.unwrap();
    assert_eq!(customer.rows.len(), 1);
    assert!(customer.trend.is_none());
}

#[test]
fn parallel_and_sequential_views_agree() {
    let file = write_sample(SAMPLE);
    let (records, _) = load_records(file.path()).unwrap();
    assert_eq!(ReportViews::compute(&records), ReportViews::compute_parallel(&records));
}

fn record_strategy() -> impl Strategy<Value = SalesRecord> {
    (
        2018i32..2021,
        1u32..13,
        1u32..29,
        prop::sample::select(vec!["Ships", "Planes", "Classic Cars", MISSING_LABEL]),
        prop::sample::select(vec!["Small", "Medium", "Large", MISSING_LABEL]),
        prop::sample::select(vec!["Shipped", "Cancelled", "Disputed", MISSING_LABEL]),
        prop::sample::select(vec!["A", "B", "C", "D", MISSING_LABEL]),
        1u32..100,
        1.0f64..250.0,
        0.0f64..10_000.0,
    )
        .prop_map(|(y, m, d, line, deal, status, customer, qty, price, sales)| SalesRecord {
            order_date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            product_line: line.to_string(),
            product_code: format!("{line}-1"),
            customer_name: customer.to_string(),
            country: "USA".to_string(),
            deal_size: deal.to_string(),
            status: status.to_string(),
            quantity_ordered: qty,
            price_each: price,
            sales,
        })
}

proptest! {
    #[test]
    fn monthly_trend_keeps_every_sale(recs in prop::collection::vec(record_strategy(), 1..60)) {
        let rs = RecordSet::new(recs);
        let trend = views::monthly_trend(&rs).unwrap();
        let total: f64 = trend.rows.iter().map(|r| r.sales).sum();
        prop_assert!(close(total, rs.total_sales()));
    }

    #[test]
    fn feedback_counts_cover_every_record(recs in prop::collection::vec(record_strategy(), 1..60)) {
        let rs = RecordSet::new(recs);
        let counts: u64 = views::customer_feedback(&rs).unwrap().iter().map(|r| r.count).sum();
        prop_assert_eq!(counts, rs.len() as u64);
        let missing = rs.iter().filter(|r| r.status == MISSING_LABEL).count() as u64;
        let reported = views::customer_feedback(&rs)
            .unwrap()
            .iter()
            .find(|r| r.status == MISSING_LABEL)
            .map_or(0, |r| r.count);
        prop_assert_eq!(reported, missing);
    }

    #[test]
    fn product_sums_match_direct_filter(recs in prop::collection::vec(record_strategy(), 1..60)) {
        let rs = RecordSet::new(recs);
        for row in views::product_performance(&rs).unwrap() {
            let direct: f64 = rs.iter().filter(|r| r.product_line == row.product_line).map(|r| r.sales).sum();
            prop_assert!(close(row.sales, direct));
        }
    }

    #[test]
    fn inventory_keeps_every_unit(recs in prop::collection::vec(record_strategy(), 1..60)) {
        let rs = RecordSet::new(recs);
        let total: u64 = views::inventory_heat(&rs).unwrap().iter().map(|r| r.quantity_ordered).sum();
        let direct: u64 = rs.iter().map(|r| u64::from(r.quantity_ordered)).sum();
        prop_assert_eq!(total, direct);
    }

    #[test]
    fn views_are_idempotent(recs in prop::collection::vec(record_strategy(), 1..40)) {
        let rs = RecordSet::new(recs);
        let before = rs.records().to_vec();
        prop_assert_eq!(ReportViews::compute(&rs), ReportViews::compute(&rs));
        prop_assert_eq!(rs.records(), before.as_slice());
    }
}
