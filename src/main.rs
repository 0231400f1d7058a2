//! Tomato Clock - a terminal Pomodoro timer
//!
//! Alternates work and rest intervals with a live progress bar:
//! - 25 minutes of focused work by default
//! - 5 minutes of rest by default
//! - optional cycle limit, notifications and pre-rest warning

use std::sync::Arc;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use tomato_clock::cli::{attach_json, Cli, TerminalUi};
use tomato_clock::{ConsoleNotifier, Notifier, PomodoroTimer};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse();

    // Execute the timer run
    if let Err(e) = execute(cli).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Wires up the timer from CLI arguments and runs it to completion.
async fn execute(cli: Cli) -> Result<()> {
    if let Some(shell) = cli.completions {
        generate_completions(shell);
        return Ok(());
    }

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    colored::control::set_override(cli.color);

    let notifier: Option<Arc<dyn Notifier>> = if cli.notify || cli.beep {
        Some(Arc::new(ConsoleNotifier::new(cli.notify, cli.beep)))
    } else {
        None
    };

    let mut timer = PomodoroTimer::new(cli.timer_config(), notifier)?;

    if cli.json {
        attach_json(&mut timer);
    } else {
        TerminalUi::new(cli.ascii, cli.color).attach(&mut timer);
    }

    // Interrupt signals request a cooperative stop on this instance.
    let control = timer.control();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping timer");
            control.stop();
        }
    });

    timer.start().await;
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
