//! Navigation and script evaluation demonstration.
//!
//! Demonstrates:
//! - Attaching to a running Firefox, or launching one
//! - Navigating the selected tab
//! - Evaluating scripts with inline and long string results
//!
//! Start Firefox with `firefox -start-debugger-server 6000` first, or set
//! `FIREFOX_BIN` to let the demo launch it.
//!
//! Usage:
//!   cargo run --example evaluate
//!   cargo run --example evaluate -- --port 6001
//!   cargo run --example evaluate -- --debug

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;

use anyhow::Context;
use firefox_rdp::{Driver, FirefoxOptions};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Constants
// ============================================================================

const TEST_URL: &str = "https://example.com";

// ============================================================================
// Args
// ============================================================================

/// Command-line arguments.
#[derive(Debug, Clone)]
struct Args {
    debug: bool,
    port: u16,
    binary: Option<PathBuf>,
}

impl Args {
    fn parse() -> anyhow::Result<Self> {
        let args: Vec<String> = std::env::args().collect();

        let port = match args.iter().position(|a| a == "--port") {
            Some(i) => args
                .get(i + 1)
                .context("--port needs a value")?
                .parse()
                .context("--port must be a number")?,
            None => 6000,
        };

        Ok(Self {
            debug: args.iter().any(|a| a == "--debug"),
            port,
            binary: std::env::var_os("FIREFOX_BIN").map(PathBuf::from),
        })
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        "firefox_rdp=debug"
    } else {
        "firefox_rdp=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse()?;
    init_logging(args.debug);

    println!("=== Evaluate ===\n");

    // ========================================================================
    // Setup
    // ========================================================================

    let mut builder = Driver::builder()
        .port(args.port)
        .options(FirefoxOptions::new().with_headless().with_new_instance());
    if let Some(binary) = &args.binary {
        builder = builder.binary(binary);
    }
    let driver = builder.build()?;

    println!("[Setup] Connecting on port {}...", args.port);
    let browser = driver.attach_or_launch().await?;
    match browser.pid() {
        Some(pid) => println!("        ✓ Launched Firefox (pid={pid})\n"),
        None => println!("        ✓ Attached to running Firefox\n"),
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    println!("[1] Navigate to {TEST_URL}");
    browser.navigate_to(TEST_URL).await?;
    let url = browser.session().current_url().await?;
    println!("    Current URL: {url}\n");

    // ========================================================================
    // Inline results
    // ========================================================================

    println!("[2] Evaluate: 2 + 2");
    let sum = browser.evaluate("2 + 2").await?;
    println!("    Result: {sum}\n");

    println!("[3] Evaluate: document.title");
    let title = browser.evaluate("document.title").await?;
    println!("    Result: {title}\n");

    // ========================================================================
    // Long string result
    // ========================================================================

    println!("[4] Evaluate: 'x'.repeat(300000)");
    let long = browser.evaluate("'x'.repeat(300000)").await?;
    println!("    Received {} characters\n", long.chars().count());

    // ========================================================================
    // Script error
    // ========================================================================

    println!("[5] Evaluate: undefinedFunction()");
    match browser.evaluate("undefinedFunction()").await {
        Ok(value) => println!("    Unexpected result: {value}\n"),
        Err(e) => println!("    Error: {e}\n"),
    }

    browser.close().await;
    println!("=== Done ===");
    Ok(())
}
