//! Six Degrees - connect two words through a chain of associations
//!
//! Six steps or fewer. Fewer is better.

mod app;
mod config;
mod game;
mod service;
mod storage;
mod tui;

use app::{AppCoordinator, GameSession};
use clap::Parser;
use config::Opts;
use crossterm::event::{self, Event, KeyEventKind};
use service::ServiceWorker;
use std::error::Error;
use std::time::Duration;
use tui::Tui;

/// How long to wait for a key before polling the service again
const TICK_RATE: Duration = Duration::from_millis(100);

fn main() -> Result<(), Box<dyn Error>> {
    let opts = Opts::parse();
    let log_path = opts.init_logging()?;
    log::info!("logging to {}", log_path.display());

    if opts.stats {
        println!("{}", opts.statistics_report()?);
        return Ok(());
    }

    // Build the service before touching the terminal so errors print normally
    let service = opts.build_service()?;
    let worker = ServiceWorker::spawn(service);
    let session = GameSession::with_difficulty(worker, opts.difficulty);
    let mut coordinator = AppCoordinator::new(session);

    // Initialize terminal
    let mut terminal = Tui::new()?;
    terminal.enter()?;

    // Main event loop
    loop {
        terminal.draw(|frame| tui::render(frame, &coordinator))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    coordinator.handle_key(key);
                }
            }
        }

        coordinator.poll();

        if coordinator.should_quit {
            break;
        }
    }

    log::info!("exiting");
    // Terminal cleanup happens automatically via Tui::drop
    Ok(())
}
