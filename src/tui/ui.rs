//! UI rendering using ratatui
//!
//! One screen per session phase:
//! - Loading: waiting for a puzzle
//! - Playing / Submitting: chain, input line, hint box
//! - Results: score, paths, share text
//! - Load Failed: error with retry

use crate::app::{AppCoordinator, Phase};
use crate::game::hint::{HintEngine, HintRecord};
use crate::game::scoring::{share_text, GameResult, ScoreBand};
use crate::game::MAX_CHAIN_LENGTH;
use crate::service::Dispatcher;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Render the screen for the session's current phase
pub fn render<D: Dispatcher>(frame: &mut Frame, coordinator: &AppCoordinator<D>) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_header(frame, layout[0], coordinator);

    let footer = match coordinator.session.phase() {
        Phase::Loading => {
            render_message(frame, layout[1], "Loading puzzle...", Color::Cyan);
            "F1/F2/F3 New game  Esc Quit"
        }
        Phase::LoadFailed => {
            let message = coordinator
                .session
                .error()
                .unwrap_or("Failed to load puzzle. Please try again.");
            render_message(frame, layout[1], message, Color::Red);
            "Enter Retry  1/2/3 Easy/Medium/Hard  Esc Quit"
        }
        Phase::Playing | Phase::Submitting => {
            render_game(frame, layout[1], coordinator);
            "Enter Add  Bksp Undo  ?/Tab Hint  Ctrl-S Submit  F1-F3 New  Esc Quit"
        }
        Phase::Results => {
            if let Some(result) = coordinator.session.result() {
                render_results(frame, layout[1], result, coordinator.session.play_count());
            }
            "Enter Play again  1/2/3 Easy/Medium/Hard  Esc Quit"
        }
    };

    let footer = Paragraph::new(footer)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[2]);
}

/// Render the header: title, puzzle endpoints, difficulty
fn render_header<D: Dispatcher>(frame: &mut Frame, area: Rect, coordinator: &AppCoordinator<D>) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(14), // Title
            Constraint::Min(20),    // Start -> goal
            Constraint::Length(22), // Difficulty / optimal
        ])
        .split(inner);

    let title = Paragraph::new("SIX DEGREES")
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Left);
    frame.render_widget(title, header_layout[0]);

    let session = &coordinator.session;
    let (endpoints, details) = match session.puzzle() {
        Some(puzzle) => (
            format!("{}  →  {}", puzzle.start_word, puzzle.end_word),
            format!(
                "{} · optimal {}",
                session.difficulty(),
                puzzle.optimal_length
            ),
        ),
        None => (
            String::new(),
            format!("{} · {}", session.phase().label(), session.difficulty()),
        ),
    };

    let endpoints = Paragraph::new(endpoints)
        .style(Style::default().fg(Color::Cyan).bold())
        .alignment(Alignment::Center);
    frame.render_widget(endpoints, header_layout[1]);

    let details = Paragraph::new(details)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right);
    frame.render_widget(details, header_layout[2]);
}

/// Render a single centered message
fn render_message(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(3),
            Constraint::Percentage(40),
        ])
        .margin(2)
        .split(area);

    let widget = Paragraph::new(message)
        .style(Style::default().fg(color).bold())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, layout[1]);
}

/// Render the chain, input line, feedback and hint box
fn render_game<D: Dispatcher>(frame: &mut Frame, area: Rect, coordinator: &AppCoordinator<D>) {
    let session = &coordinator.session;
    let hint = session.hints().current();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4),                              // Chain
            Constraint::Length(1),                              // Input line
            Constraint::Length(1),                              // Spacer
            Constraint::Length(2),                              // Feedback
            Constraint::Length(if hint.is_some() { 7 } else { 0 }), // Hint box
            Constraint::Min(0),
        ])
        .split(area);

    // Chain with the goal word dimmed at the end
    if let Some(puzzle) = session.puzzle() {
        let mut spans = vec![Span::styled(
            puzzle.start_word.clone(),
            Style::default().fg(Color::Cyan).bold(),
        )];
        for word in session.chain().words() {
            spans.push(Span::raw(" → "));
            spans.push(Span::styled(word.clone(), Style::default().fg(Color::White).bold()));
        }
        spans.push(Span::styled(" → … → ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            puzzle.end_word.clone(),
            Style::default().fg(Color::DarkGray),
        ));

        let chain = Paragraph::new(vec![
            Line::from(spans),
            Line::from(Span::styled(
                format_step_counter(session.chain().len()),
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title("Chain"),
        );
        frame.render_widget(chain, layout[0]);
    }

    // Input line, prefixed by the word the next one must link to
    let link_from = session
        .puzzle()
        .map(|puzzle| session.chain().tail(&puzzle.start_word))
        .unwrap_or(">");
    let mut input = vec![
        Span::styled(
            format!("{} → ", link_from),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{}_", coordinator.input),
            Style::default().fg(Color::White),
        ),
    ];
    if let Some(label) = session.busy_label() {
        input.push(Span::styled(
            format!("   {}", label),
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(input)), layout[1]);

    // Feedback line: local notice first, then the session's inline error
    if let Some(message) = coordinator.notice.as_deref().or(session.error()) {
        let feedback = Paragraph::new(message)
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true });
        frame.render_widget(feedback, layout[3]);
    } else if session.chain().is_empty() && coordinator.input.is_empty() {
        let tip = Paragraph::new("Type a word linked to the start word and press Enter")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(tip, layout[3]);
    }

    if let Some(record) = hint {
        render_hint(frame, layout[4], record, session.hints());
    }
}

/// Render the hint box
fn render_hint(frame: &mut Frame, area: Rect, record: &HintRecord, engine: &HintEngine) {
    let mut lines = vec![Line::from(Span::styled(
        record.guidance.clone(),
        Style::default().fg(Color::Yellow),
    ))];

    if let Some(masked) = &record.masked_word {
        lines.push(Line::from(Span::styled(
            spaced_mask(masked),
            Style::default().fg(Color::White).bold(),
        )));
    }

    let mut facts = Vec::new();
    if let Some(length) = record.word_length {
        facts.push(format!("{} letters", length));
    }
    if let Some(steps) = record.steps_remaining {
        facts.push(format!(
            "{} step{} to target",
            steps,
            if steps == 1 { "" } else { "s" }
        ));
    }
    facts.push(format!(
        "Level {}  ·  Hints used: {}",
        engine.level(),
        engine.total_used()
    ));
    lines.push(Line::from(Span::styled(
        facts.join("  ·  "),
        Style::default().fg(Color::DarkGray),
    )));

    let hint = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title("Hint (Esc to hide)"),
        );
    frame.render_widget(hint, area);
}

/// Render the results screen
fn render_results(frame: &mut Frame, area: Rect, result: &GameResult, play_count: Option<u64>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Label
            Constraint::Length(1), // Score
            Constraint::Length(1), // Message
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Player path
            Constraint::Length(1), // Optimal path
            Constraint::Length(1), // Play count
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Share text
        ])
        .split(area);

    let color = band_color(&result.band);
    let label = Paragraph::new(result.band.label())
        .style(Style::default().fg(color).bold())
        .alignment(Alignment::Center);
    frame.render_widget(label, layout[0]);

    let score = Paragraph::new(format!("Score: {}", result.score))
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center);
    frame.render_widget(score, layout[1]);

    let message = Paragraph::new(result.band.message())
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center);
    frame.render_widget(message, layout[2]);

    let player_route = format_route(&result.start_word, &result.player_path, &result.end_word);
    let player_line = if result.band.is_connected() {
        format!("Your path:    {} ({} steps)", player_route, result.player_length)
    } else {
        format!("Your chain:   {} (broken)", player_route)
    };
    frame.render_widget(
        Paragraph::new(player_line).style(Style::default().fg(Color::Cyan)),
        layout[4],
    );

    let optimal_line = format!(
        "Optimal path: {} ({} steps)",
        format_route(&result.start_word, &result.optimal_path, &result.end_word),
        result.optimal_length
    );
    frame.render_widget(
        Paragraph::new(optimal_line).style(Style::default().fg(Color::Green)),
        layout[5],
    );

    if let Some(total) = play_count {
        let count = Paragraph::new(format!("{} games played", total))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(count, layout[6]);
    }

    let share = Paragraph::new(share_text(result))
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title("Share"),
        );
    frame.render_widget(share, layout[8]);
}

fn band_color(band: &ScoreBand) -> Color {
    match band {
        ScoreBand::BeatOptimal { .. } => Color::Magenta,
        ScoreBand::MatchedOptimal => Color::Green,
        ScoreBand::Longer { .. } => Color::Yellow,
        ScoreBand::Disconnected { .. } => Color::Red,
    }
}

/// `START → A → B → END`
fn format_route(start: &str, middle: &[String], end: &str) -> String {
    std::iter::once(start)
        .chain(middle.iter().map(String::as_str))
        .chain(std::iter::once(end))
        .collect::<Vec<_>>()
        .join(" → ")
}

fn format_step_counter(used: usize) -> String {
    format!("{} of {} steps used", used, MAX_CHAIN_LENGTH)
}

/// `LI___` -> `L I _ _ _`
fn spaced_mask(masked: &str) -> String {
    masked
        .chars()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
