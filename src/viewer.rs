//! Interactive viewer - event loop, key dispatch and the search prompt

use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use proofmark::buffer::Buffer;
use proofmark::error::Result;
use proofmark::highlight::{
    EditorEvent, HighlightEngine, MatchMode, QuoteKind, SearchQuery, SearchScope, TagStore,
};
use proofmark::text::{Position, Range, Snapshot};
use proofmark::Config;

use crate::display::Display;
use crate::input::{translate_key, translate_prompt_key, Action, PromptKey};
use crate::terminal::{TermEvent, Terminal};
use crate::window::Window;

/// How long to wait for a key when no recompute is pending
const IDLE_POLL: Duration = Duration::from_millis(500);

/// State of the F7 search prompt
#[derive(Debug, Clone, PartialEq, Eq)]
struct SearchPrompt {
    input: String,
    mode: MatchMode,
    nocase: bool,
    wholeword: bool,
    scope: SearchScope,
    /// Earlier selection offered when nothing is selected now
    previous: Option<Range>,
}

impl SearchPrompt {
    /// Search the selection if there is one, then the previous selection,
    /// otherwise the whole document
    fn new(has_selection: bool, previous: Option<Range>) -> Self {
        let previous = previous.filter(|_| !has_selection);
        let scope = match (has_selection, previous) {
            (true, _) => SearchScope::Selection,
            (false, Some(range)) => SearchScope::PreviousSelection(range),
            (false, None) => SearchScope::WholeDocument,
        };
        Self {
            input: String::new(),
            mode: MatchMode::Exact,
            nocase: false,
            wholeword: false,
            scope,
            previous,
        }
    }

    /// Apply a prompt key; returns false once the prompt is finished
    fn handle(&mut self, key: PromptKey) -> bool {
        match key {
            PromptKey::Char(ch) => self.input.push(ch),
            PromptKey::Backspace => {
                self.input.pop();
            }
            PromptKey::ToggleMode => {
                self.mode = match self.mode {
                    MatchMode::Exact => MatchMode::Regex,
                    MatchMode::Regex => MatchMode::Exact,
                }
            }
            PromptKey::ToggleNocase => self.nocase = !self.nocase,
            PromptKey::ToggleWholeword => self.wholeword = !self.wholeword,
            PromptKey::ToggleScope => {
                self.scope = match (self.scope, self.previous) {
                    (SearchScope::Selection, Some(range)) => SearchScope::PreviousSelection(range),
                    (SearchScope::Selection, None) | (SearchScope::PreviousSelection(_), _) => {
                        SearchScope::WholeDocument
                    }
                    (SearchScope::WholeDocument, _) => SearchScope::Selection,
                }
            }
            PromptKey::Accept | PromptKey::Cancel => return false,
        }
        true
    }

    fn query(&self) -> SearchQuery {
        SearchQuery {
            pattern: self.input.clone(),
            mode: self.mode,
            nocase: self.nocase,
            wholeword: self.wholeword,
        }
    }

    /// Minibuffer text, e.g. "Highlight (regex, nocase, selection): foo"
    fn label(&self) -> String {
        let mut flags = vec![match self.mode {
            MatchMode::Exact => "exact",
            MatchMode::Regex => "regex",
        }];
        if self.nocase {
            flags.push("nocase");
        }
        if self.wholeword {
            flags.push("word");
        }
        flags.push(match self.scope {
            SearchScope::Selection => "selection",
            SearchScope::PreviousSelection(_) => "previous selection",
            SearchScope::WholeDocument => "document",
        });
        format!("Highlight ({}): {}", flags.join(", "), self.input)
    }
}

/// Snapshot of what the window shows
fn snapshot<'a>(buffer: &'a Buffer, window: &Window) -> Snapshot<'a> {
    buffer
        .snapshot(window.cursor())
        .with_selection(window.selection())
        .with_visible(window.visible_lines())
}

pub struct Viewer {
    terminal: Terminal,
    buffer: Buffer,
    window: Window,
    display: Display,
    engine: HighlightEngine,
    tags: TagStore,
    prompt: Option<SearchPrompt>,
    quit: bool,
}

impl Viewer {
    pub fn open(terminal: Terminal, path: &Path, config: Config) -> Result<Self> {
        let buffer = Buffer::from_file(path)?;
        info!(path = %path.display(), lines = buffer.line_count(), "opened file");
        let height = terminal.rows().saturating_sub(2);

        Ok(Self {
            terminal,
            buffer,
            window: Window::new(height),
            display: Display::new(),
            engine: HighlightEngine::new(config),
            tags: TagStore::new(),
            prompt: None,
            quit: false,
        })
    }

    /// Main loop: recompute when due, draw, wait for the next key or deadline
    pub fn run(&mut self) -> Result<()> {
        self.display
            .set_message("F5 surround  F6 align  F3/F4 quotes  F7 highlight  F8 clear  C-q quit");

        while !self.quit {
            self.window.set_height(self.terminal.rows().saturating_sub(2));
            self.window.ensure_cursor_visible();

            let text = snapshot(&self.buffer, &self.window);
            self.engine.tick(&text, &mut self.tags, Instant::now());
            self.display.render(
                &mut self.terminal,
                &self.buffer,
                &self.window,
                &self.tags,
                &self.engine,
            )?;

            let timeout = self
                .engine
                .next_deadline()
                .map_or(IDLE_POLL, |due| due.saturating_duration_since(Instant::now()));
            let key = match self.terminal.poll_event(timeout)? {
                Some(TermEvent::Key(key)) => key,
                Some(TermEvent::Resize { cols, rows }) => {
                    debug!(cols, rows, "terminal resized");
                    self.display.force_redraw();
                    self.engine.notify(EditorEvent::Redraw);
                    continue;
                }
                None => continue,
            };

            if self.prompt.is_some() {
                if let Some(key) = translate_prompt_key(key) {
                    self.handle_prompt_key(key);
                }
            } else if let Some(action) = translate_key(key) {
                self.handle_action(action);
            }
        }
        Ok(())
    }

    fn handle_action(&mut self, action: Action) {
        debug!(?action, "key");
        let event = match action {
            Action::Quit => {
                self.quit = true;
                return;
            }
            Action::Up => self.moved(|w, b| w.move_up(b)),
            Action::Down => self.moved(|w, b| w.move_down(b)),
            Action::Left => self.moved(|w, b| w.move_left(b)),
            Action::Right => self.moved(|w, b| w.move_right(b)),
            Action::PageUp => self.moved(|w, b| w.page_up(b)),
            Action::PageDown => self.moved(|w, b| w.page_down(b)),
            Action::Home => self.moved(|w, _| w.move_to_bol()),
            Action::End => self.moved(|w, b| w.move_to_eol(b)),
            Action::SetMark => {
                self.window.set_mark();
                self.display.set_message("Mark set");
                Some(EditorEvent::CursorMoved)
            }
            Action::ClearMark => {
                self.window.clear_mark();
                self.display.clear_message();
                Some(EditorEvent::CursorMoved)
            }
            Action::Insert(ch) => {
                let cursor = self.window.cursor();
                self.buffer.insert_char(cursor, ch);
                self.window.set_cursor(cursor.next_col());
                Some(EditorEvent::TextChanged)
            }
            Action::Newline => {
                let cursor = self.window.cursor();
                self.buffer.insert_newline(cursor);
                self.window.set_cursor(Position::new(cursor.line + 1, 0));
                Some(EditorEvent::TextChanged)
            }
            Action::Backspace => self.buffer.delete_backward(self.window.cursor()).map(|pos| {
                self.window.set_cursor(pos);
                EditorEvent::TextChanged
            }),
            Action::Delete => self
                .buffer
                .delete_char(self.window.cursor())
                .then_some(EditorEvent::TextChanged),
            Action::ToggleSurround => {
                let on = self.engine.toggle_surround_highlight();
                self.display
                    .set_message(format!("Surround highlighting {}", if on { "on" } else { "off" }));
                None
            }
            Action::ToggleAlignment => {
                let text = snapshot(&self.buffer, &self.window);
                if self.engine.toggle_alignment_highlight(&text) {
                    let column = self.engine.alignment().column().unwrap_or(0);
                    self.display
                        .set_message(format!("Alignment column {}", column + 1));
                } else {
                    self.display.set_message("Alignment column off");
                }
                None
            }
            Action::HighlightQuotes(kind) => {
                self.highlight_quotes(kind);
                None
            }
            Action::PromptSearch => {
                let prompt = SearchPrompt::new(
                    self.window.selection().is_some(),
                    self.window.last_selection(),
                );
                self.display.set_prompt(Some(prompt.label()));
                self.prompt = Some(prompt);
                None
            }
            Action::RemoveHighlights => {
                match self.engine.remove_all_highlights(&mut self.tags) {
                    Ok(count) => self
                        .display
                        .set_message(format!("Removed {} highlights", count)),
                    Err(e) => {
                        warn!(error = %e, "failed to remove highlights");
                        self.display.set_message(format!("Error: {}", e));
                    }
                }
                None
            }
            Action::Redraw => {
                self.display.force_redraw();
                Some(EditorEvent::Redraw)
            }
        };

        if let Some(event) = event {
            self.engine.notify(event);
        }
    }

    /// Run a cursor motion and report it
    fn moved(&mut self, motion: impl FnOnce(&mut Window, &Buffer)) -> Option<EditorEvent> {
        motion(&mut self.window, &self.buffer);
        Some(EditorEvent::CursorMoved)
    }

    fn highlight_quotes(&mut self, kind: QuoteKind) {
        let text = snapshot(&self.buffer, &self.window);
        let count = self.engine.highlight_quotes_in_selection(kind, &text);
        if self.window.selection().is_none() {
            self.display.set_message("No selection (set the mark with C-SPC)");
        } else {
            self.display
                .set_message(format!("{} {} quote marks", count, kind.name()));
        }
    }

    fn handle_prompt_key(&mut self, key: PromptKey) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        if prompt.handle(key) {
            self.display.set_prompt(Some(prompt.label()));
            return;
        }

        let finished = self.prompt.take();
        self.display.set_prompt(None);
        let Some(prompt) = finished.filter(|_| key == PromptKey::Accept) else {
            self.display.set_message("Cancelled");
            return;
        };

        let text = snapshot(&self.buffer, &self.window);
        match self.engine.highlight_matches(&text, prompt.query(), prompt.scope) {
            Ok(count) => self.display.set_message(format!("{} matches", count)),
            Err(e) => self.display.set_message(format!("Error: {}", e)),
        }
    }
}
