//! Keyboard coordinator
//!
//! Maps key presses to session commands for each phase:
//! - Playing: type a word, Enter to add, Backspace to edit or undo
//! - Results / Load Failed: pick the next game
//! - Anywhere: F1-F3 for a new game, Esc to quit

use crate::game::Difficulty;
use crate::service::Dispatcher;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::{CommandError, GameSession, Phase};

/// Longest word the input line accepts
pub const MAX_INPUT_LEN: usize = 20;

/// Main application coordinator
pub struct AppCoordinator<D: Dispatcher> {
    /// The game being played
    pub session: GameSession<D>,
    /// Word being typed
    pub input: String,
    /// Local feedback for a refused command (cleared on the next key)
    pub notice: Option<String>,
    /// Whether the application should quit
    pub should_quit: bool,
    /// Word sent for checking, while its verdict is outstanding
    checking: Option<String>,
}

impl<D: Dispatcher> AppCoordinator<D> {
    pub fn new(session: GameSession<D>) -> Self {
        Self {
            session,
            input: String::new(),
            notice: None,
            should_quit: false,
            checking: None,
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Pull in service replies (call regularly)
    pub fn poll(&mut self) {
        let before = self.session.chain().len();
        self.session.poll();
        // The checked word made it into the chain; keep anything typed since
        if self.session.chain().len() > before
            && self.checking.as_deref() == Some(self.input.as_str())
        {
            self.input.clear();
        }
        if !self.session.is_busy() {
            self.checking = None;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.notice = None;

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.quit(),
                KeyCode::Char('s') => {
                    let outcome = self.session.submit_solution();
                    self.report(outcome);
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                if self.session.hints().current().is_some() {
                    self.session.clear_hint();
                } else {
                    self.quit();
                }
            }
            KeyCode::F(n @ 1..=3) => self.new_game(Difficulty::all()[usize::from(n) - 1]),
            _ => match self.session.phase() {
                Phase::Playing | Phase::Submitting => self.playing_key(key.code),
                Phase::Results => self.choice_key(key.code, false),
                Phase::LoadFailed => self.choice_key(key.code, true),
                Phase::Loading => {}
            },
        }
    }

    fn playing_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => {
                let word = self.input.clone();
                let outcome = self.session.add_word(&word);
                if outcome.is_ok() {
                    self.checking = Some(word);
                }
                self.report(outcome);
            }
            KeyCode::Backspace => {
                if self.input.pop().is_none() {
                    let outcome = self.session.remove_last_word();
                    self.report(outcome);
                }
            }
            KeyCode::Tab | KeyCode::Char('?') => {
                let outcome = self.session.get_hint();
                self.report(outcome);
            }
            KeyCode::Char(c) if c.is_ascii_alphabetic() => {
                if self.input.len() < MAX_INPUT_LEN {
                    self.input.push(c.to_ascii_uppercase());
                }
            }
            _ => {}
        }
    }

    /// Results and load-failure screens: 1/2/3 pick a difficulty, Enter
    /// replays (or retries) the current one.
    fn choice_key(&mut self, code: KeyCode, failed: bool) {
        match code {
            KeyCode::Char(c @ '1'..='3') => {
                let index = c as usize - '1' as usize;
                self.new_game(Difficulty::all()[index]);
            }
            KeyCode::Enter if failed => {
                self.input.clear();
                self.session.retry();
            }
            KeyCode::Enter => self.new_game(self.session.difficulty()),
            KeyCode::Char('q') => self.quit(),
            _ => {}
        }
    }

    fn new_game(&mut self, difficulty: Difficulty) {
        self.input.clear();
        self.checking = None;
        self.session.start_new_game(difficulty);
    }

    /// Surface refusals the player can act on; the rest are silent no-ops.
    fn report(&mut self, outcome: Result<(), CommandError>) {
        self.notice = match outcome {
            Err(CommandError::ChainFull) => {
                Some("Maximum chain length (6) reached. Submit or undo a word.".to_string())
            }
            Err(CommandError::HintsExhausted) => {
                Some("The next word is already fully revealed.".to_string())
            }
            _ => None,
        };
    }
}
