//! # Case-Law Browsing CLI
//!
//! ## Purpose
//! Command-line surface over the result-set lifecycle engine: submits a
//! query, applies facet filters, pages through the filtered list with
//! term-highlighted output, and can resolve one case in full and request a
//! summary for it.
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging
//! 3. Submit the query through the search session
//! 4. Apply facet toggles and disclose the requested pages
//! 5. Optionally resolve and summarize one visible case

use clap::{Arg, ArgAction, Command};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use lawsearch_client::{
    api::{ApiClient, SearchMode},
    config::Config,
    detail::{ContentView, DetailSession, DetailState, SummaryState},
    errors::{ClientError, Result},
    highlight::Segment,
    session::SearchSession,
    truncate_for_display,
};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("lawsearch")
        .version("0.1.0")
        .author("Legal Search Team")
        .about("Browse a legal case-law search service: query, filter, inspect, summarize")
        .arg(
            Arg::new("query")
                .value_name("QUERY")
                .help("Free-text search query")
                .required_unless_present("list-facets"),
        )
        .arg(
            Arg::new("list-facets")
                .long("list-facets")
                .help("Print the facet catalog and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .value_name("MODE")
                .help("Search ranking: lexical or semantic")
                .default_value("lexical"),
        )
        .arg(
            Arg::new("year")
                .long("year")
                .value_name("YEAR")
                .help("Restrict to a decision year (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("court")
                .long("court")
                .value_name("COURT")
                .help("Restrict to one court"),
        )
        .arg(
            Arg::new("topic")
                .long("topic")
                .value_name("TOPIC")
                .help("Restrict to one document type / topic"),
        )
        .arg(
            Arg::new("district")
                .long("district")
                .value_name("DISTRICT")
                .help("Restrict to one district"),
        )
        .arg(
            Arg::new("pages")
                .long("pages")
                .value_name("N")
                .help("Extra pages to disclose beyond the first")
                .value_parser(clap::value_parser!(usize))
                .default_value("0"),
        )
        .arg(
            Arg::new("open")
                .long("open")
                .value_name("ROW")
                .help("Resolve the Nth visible result (1-based) in full")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("summarize")
                .long("summarize")
                .help("Request a summary of the opened case")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").expect("has default");
    let config = Config::from_file(config_path)?;

    init_logging(&config)?;
    info!("configuration loaded from {}", config_path);

    if matches.get_flag("list-facets") {
        print_facets(&config);
        return Ok(());
    }

    let client = ApiClient::new(&config)?;
    let mut session = SearchSession::new();

    let query = matches.get_one::<String>("query").expect("required");
    let mode: SearchMode = matches
        .get_one::<String>("mode")
        .expect("has default")
        .parse()?;

    session.submit_with_mode(&client, query, mode).await;

    if let Some(message) = session.error() {
        eprintln!("search failed: {}", message);
        return Ok(());
    }
    if !session.has_searched() {
        eprintln!("nothing to search: query is empty");
        return Ok(());
    }

    if let Some(years) = matches.get_many::<String>("year") {
        for year in years {
            warn_if_unknown("year", year, &config.facets.years);
            session.toggle_year(year);
        }
    }
    if let Some(court) = matches.get_one::<String>("court") {
        warn_if_unknown("court", court, &config.facets.courts);
        session.toggle_court(court);
    }
    if let Some(topic) = matches.get_one::<String>("topic") {
        warn_if_unknown("topic", topic, &config.facets.topics);
        session.toggle_topic(topic);
    }
    if let Some(district) = matches.get_one::<String>("district") {
        warn_if_unknown("district", district, &config.facets.districts);
        session.toggle_district(district);
    }

    let pages = *matches.get_one::<usize>("pages").expect("has default");
    for _ in 0..pages {
        if !session.load_more() {
            break;
        }
    }

    print_results(&session);

    if let Some(row) = matches.get_one::<usize>("open") {
        let case = {
            let view = session.view();
            let idx = row.checked_sub(1).ok_or_else(|| ClientError::Config {
                message: "--open rows are numbered from 1".to_string(),
            })?;
            view.items
                .get(idx)
                .map(|c| (*c).clone())
                .ok_or_else(|| ClientError::Config {
                    message: format!("row {} is not visible", row),
                })?
        };

        let mut detail = DetailSession::new();
        detail.resolve(&client, case).await;
        print_detail(&detail, session.query());

        if matches.get_flag("summarize") {
            detail.summarize(&client).await;
            print_summary(&detail);
        }

        detail.dismiss();
    }

    Ok(())
}

/// Initialize logging from configuration
fn init_logging(config: &Config) -> Result<()> {
    let level: tracing::Level = config.logging.level.parse().map_err(|_| ClientError::Config {
        message: format!("Invalid log level: {}", config.logging.level),
    })?;
    let filter = tracing_subscriber::filter::LevelFilter::from_level(level);

    if config.logging.json_format {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .json()
                    .with_filter(filter),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_filter(filter),
            )
            .init();
    }

    Ok(())
}

/// Warn when a facet value is outside the canonical catalog; it will
/// simply match nothing.
fn warn_if_unknown(facet: &str, value: &str, catalog: &[String]) {
    if !catalog.iter().any(|v| v == value) {
        tracing::warn!("{} '{}' is not in the facet catalog", facet, value);
    }
}

fn print_facets(config: &Config) {
    let catalog = &config.facets;
    println!("years: all, {}", catalog.years.join(", "));
    println!("courts: {}", catalog.courts.join(", "));
    println!("topics: {}", catalog.topics.join(", "));
    println!("districts: {}", catalog.districts.join(", "));
}

/// Render highlighter segments with ANSI emphasis on matches
fn render_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Plain(text) => text.clone(),
            Segment::Matched(text) => format!("\x1b[1;33m{}\x1b[0m", text),
        })
        .collect()
}

fn print_results(session: &SearchSession) {
    let view = session.view();
    println!(
        "{} results for \"{}\" ({} after filters, {} shown)",
        session.total(),
        session.query(),
        view.filtered_count,
        view.items.len()
    );

    for (i, case) in view.items.iter().enumerate() {
        println!();
        println!(
            "{:>3}. {}",
            i + 1,
            render_segments(&session.highlight_field(&case.headline))
        );
        println!(
            "     {}",
            render_segments(&session.highlight_field(&truncate_for_display(&case.chunk, 240)))
        );
        let mut meta = Vec::new();
        if let Some(date) = &case.decision_date {
            meta.push(date.clone());
        }
        if let Some(court) = &case.court {
            meta.push(court.clone());
        }
        if !case.judgement_type.is_empty() {
            meta.push(case.judgement_type.clone());
        }
        if let Some(district) = &case.district {
            meta.push(district.clone());
        }
        if !meta.is_empty() {
            println!("     {}", meta.join(" | "));
        }
    }

    if view.has_more {
        println!();
        println!("(more results available, re-run with --pages)");
    }
}

fn print_detail(detail: &DetailSession, query: &str) {
    let Some(case) = detail.case() else {
        return;
    };

    println!();
    println!("=== {} ===", case.headline);
    if detail.detail_state() == DetailState::ResolvedFallback {
        info!("showing search-hit fields only; full content unavailable");
    }

    match detail.content_view(query) {
        Some(ContentView::External(url)) => println!("document: {}", url),
        Some(ContentView::InlineHtml(html)) => {
            println!("{}", truncate_for_display(html, 2000))
        }
        Some(ContentView::Excerpt(segments)) => println!("{}", render_segments(&segments)),
        None => {}
    }
}

fn print_summary(detail: &DetailSession) {
    println!();
    match detail.summary_state() {
        SummaryState::Summarized => {
            println!("summary:");
            println!("{}", detail.summary().unwrap_or_default());
        }
        SummaryState::SummaryFailed => {
            eprintln!(
                "summarization failed: {}",
                detail.summary_error().unwrap_or("unknown error")
            );
        }
        SummaryState::Summarizing | SummaryState::NoSummary => {}
    }
}
