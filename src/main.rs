// Entry point and console menu.
//
// - Option [1] loads the sales CSV once and prints a short summary.
// - Option [2] computes the ten views, prints previews and writes the
//   dashboard page.
// After generating, the user can go back to the menu or exit.
use auto_sales_report::output::{self, preview_views};
use auto_sales_report::render::{render_dashboard, render_error_page};
use auto_sales_report::util::{format_int, format_number};
use auto_sales_report::{build_dashboard, load_records, logging, LoadSummary, RecordSet, ReportConfig, ReportViews};
use std::io::{self, Write};
use tracing::{error, info};

/// Loaded data for this session. Loaded once, then reused by every
/// generate pass until the process exits or the file is loaded again.
struct Session {
    config: ReportConfig,
    data: Option<(RecordSet, LoadSummary)>,
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf).unwrap_or(0) == 0 {
        // EOF behaves like asking to quit
        return "N".to_string();
    }
    buf.trim().to_string()
}

/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        match read_line("Back to Report Selection (Y/N): ").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn handle_load(session: &mut Session) {
    match load_records(&session.config.data_path) {
        Ok((records, summary)) => {
            println!(
                "Processing dataset... ({} rows loaded, total sales {})",
                format_int(summary.total_rows as u64),
                format_number(records.total_sales(), 2)
            );
            if let (Some(first), Some(last)) = (summary.first_order, summary.last_order) {
                println!("Orders from {} to {}", first, last);
            }
            if summary.missing_categories > 0 {
                println!(
                    "Note: {} empty category values grouped as their own group.",
                    format_int(summary.missing_categories as u64)
                );
            }
            println!();
            session.data = Some((records, summary));
        }
        Err(e) => {
            error!(error = %e, "load failed");
            eprintln!("Failed to load file: {}\n", e);
            let page = render_error_page(&e.to_string(), &session.config);
            if let Err(e) = output::write_text(&session.config.html_path(), &page) {
                eprintln!("Write error: {}", e);
            }
        }
    }
}

fn handle_generate(session: &Session) {
    let Some((records, _)) = &session.data else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };
    let config = &session.config;

    println!("Generating dashboard...\n");
    let views = ReportViews::compute(records);
    preview_views(&views, config.preview_rows);

    let sections = build_dashboard(&views, config);
    match output::write_text(&config.html_path(), &render_dashboard(&sections, config)) {
        Ok(()) => println!("Dashboard written to {}\n", config.html_path().display()),
        Err(e) => eprintln!("Write error: {}", e),
    }
}

fn main() {
    logging::init();
    let mut session = Session {
        config: ReportConfig::default(),
        data: None,
    };
    info!(data = %session.config.data_path.display(), "session started");

    loop {
        println!("Auto Sales Dashboard:");
        println!("[1] Load the file");
        println!("[2] Generate Dashboard\n");
        match read_line("Enter choice: ").as_str() {
            "1" => handle_load(&mut session),
            "2" => {
                println!();
                handle_generate(&session);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "N" | "n" | "q" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 1 or 2.\n"),
        }
    }
}
