use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use websift_core::export::{self, ExportError, ExportOutcome};
use websift_core::summary::generate_crawl_summary;
use websift_core::SiftConfig;
use websift_scanner::{PageRecord, ProgressCallback, SiteScanner};

/// Normalize the base URL the way the interactive surface does: trim
/// whitespace and the trailing slash.
pub fn normalize_base_url(input: &str) -> String {
    input.trim().trim_end_matches('/').to_string()
}

/// Normalize a user-supplied section into a category path: leading slash,
/// no trailing slash.
pub fn normalize_section(input: &str) -> String {
    let trimmed = input.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

fn print_prompt(msg: &str) -> String {
    print!("{} ", msg.bright_cyan().bold());
    io::stdout().flush().unwrap();
    let mut response = String::new();
    io::stdin().read_line(&mut response).unwrap();
    response.trim().to_string()
}

fn make_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(message);
    spinner
}

pub async fn handle_analyze(sub_matches: &ArgMatches) {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let url = sub_matches.get_one::<Url>("url").unwrap();
    let base = normalize_base_url(url.as_str());
    let config = SiftConfig::default();

    let spinner = make_spinner(format!("Analyzing site structure of {}...", base));

    let scanner = match SiteScanner::connect(
        &base,
        config.fetch_timeout_secs,
        config.probe_timeout_secs,
    )
    .await
    {
        Ok(scanner) => scanner,
        Err(e) => {
            spinner.finish_and_clear();
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    let categories = match scanner.analyze().await {
        Ok(categories) => categories,
        Err(e) => {
            spinner.finish_and_clear();
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    spinner.finish_and_clear();

    if categories.is_empty() {
        println!("No categories found under {}. Check the URL.", base);
        return;
    }

    println!("\n{} section(s) under {}:\n", categories.len(), base);
    for category in &categories {
        println!("  {} {}", "•".green(), category);
    }
    println!(
        "\nRun {} to extract one.",
        format!("websift crawl --url {} --section <PATH>", base).bright_white()
    );
}

pub async fn handle_crawl(sub_matches: &ArgMatches) {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let url = sub_matches.get_one::<Url>("url").unwrap();
    let section = sub_matches.get_one::<String>("section").unwrap();
    let output = sub_matches.get_one::<PathBuf>("output");
    let max_pages = *sub_matches.get_one::<usize>("max-pages").unwrap_or(&100);

    let base = normalize_base_url(url.as_str());
    let category = normalize_section(section);
    let config = SiftConfig {
        max_pages,
        ..SiftConfig::default()
    };

    println!("\n🕸  Crawling {}", base);
    println!("Section:  {}", category);
    println!("Page cap: {}\n", config.max_pages);

    let spinner = make_spinner("Connecting...".to_string());

    let scanner = match SiteScanner::connect(
        &base,
        config.fetch_timeout_secs,
        config.probe_timeout_secs,
    )
    .await
    {
        Ok(scanner) => scanner.with_max_pages(config.max_pages),
        Err(e) => {
            spinner.finish_and_clear();
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    let progress_spinner = spinner.clone();
    let progress: ProgressCallback = Arc::new(move |collected, url| {
        progress_spinner.set_message(format!("{} collected, fetching {}", collected, url));
    });

    let records = scanner.crawl_section(&category, Some(progress)).await;
    spinner.finish_and_clear();

    if records.is_empty() {
        println!("No data found under {}.", category);
        return;
    }

    println!("✓ Crawl complete!\n");
    print!("{}", generate_crawl_summary(&category, &records));
    println!();

    match prompt_export(&records, &category, output) {
        Ok(ExportOutcome::Written(path)) => {
            println!(
                "{} Saved {} records to {}",
                "✓".green().bold(),
                records.len(),
                path.display().to_string().bright_white()
            );
        }
        Ok(ExportOutcome::Cancelled) => {
            println!("{} Export cancelled, nothing written.", "→".blue());
        }
        Err(e) => {
            eprintln!("✗ CSV export failed: {}", e);
            std::process::exit(1);
        }
    }
}

/// Resolve the export destination and write the CSV.
///
/// With an explicit output path nothing is asked. Otherwise the user is
/// offered the suggested filename and may decline, which yields
/// `ExportOutcome::Cancelled` and writes nothing.
pub fn prompt_export(
    records: &[PageRecord],
    category: &str,
    output: Option<&PathBuf>,
) -> Result<ExportOutcome, ExportError> {
    let destination = match output {
        Some(path) => path.clone(),
        None => {
            let confirm = print_prompt(&format!(
                "Export {} records to CSV? [Y/n]:",
                records.len()
            ))
            .to_lowercase();
            if confirm == "n" || confirm == "no" {
                return Ok(ExportOutcome::Cancelled);
            }

            let default_name = export::suggested_filename(category);
            let path_input = print_prompt(&format!("Destination [{}]:", default_name));
            if path_input.is_empty() {
                PathBuf::from(default_name)
            } else {
                export::expand_destination(&path_input)
            }
        }
    };

    export::write_csv(records, &destination)?;
    Ok(ExportOutcome::Written(destination))
}
