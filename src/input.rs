//! Input handling - key translation

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use proofmark::highlight::QuoteKind;

/// A viewer command bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    SetMark,
    ClearMark,
    ToggleSurround,
    ToggleAlignment,
    HighlightQuotes(QuoteKind),
    PromptSearch,
    RemoveHighlights,
    Redraw,
    Insert(char),
    Newline,
    Backspace,
    Delete,
}

/// Keys understood while the search prompt is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKey {
    Char(char),
    Backspace,
    Accept,
    Cancel,
    /// Switch between exact and regex matching
    ToggleMode,
    ToggleNocase,
    ToggleWholeword,
    /// Switch between the selection and the whole document
    ToggleScope,
}

/// Translate a crossterm KeyEvent to a viewer action
pub fn translate_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent {
        code, modifiers, kind, ..
    } = event;

    // Only process key press events; Windows also reports releases
    if kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);

    match code {
        KeyCode::Char(ch) if ctrl => match ch.to_ascii_lowercase() {
            'q' => Some(Action::Quit),
            ' ' | '@' => Some(Action::SetMark),
            ';' => Some(Action::ToggleSurround),
            '0' => Some(Action::RemoveHighlights),
            'l' => Some(Action::Redraw),
            'g' => Some(Action::ClearMark),
            'f' => Some(Action::Right),
            'b' => Some(Action::Left),
            'n' => Some(Action::Down),
            'p' => Some(Action::Up),
            'a' => Some(Action::Home),
            'e' => Some(Action::End),
            'v' => Some(Action::PageDown),
            _ => None,
        },
        KeyCode::Char(ch) => Some(Action::Insert(ch)),
        KeyCode::Enter => Some(Action::Newline),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Delete => Some(Action::Delete),
        KeyCode::Home => Some(Action::Home),
        KeyCode::End => Some(Action::End),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::Up => Some(Action::Up),
        KeyCode::Down => Some(Action::Down),
        KeyCode::Left => Some(Action::Left),
        KeyCode::Right => Some(Action::Right),
        KeyCode::Esc => Some(Action::ClearMark),
        KeyCode::F(3) => Some(Action::HighlightQuotes(QuoteKind::Single)),
        KeyCode::F(4) => Some(Action::HighlightQuotes(QuoteKind::Double)),
        KeyCode::F(5) => Some(Action::ToggleSurround),
        KeyCode::F(6) => Some(Action::ToggleAlignment),
        KeyCode::F(7) => Some(Action::PromptSearch),
        KeyCode::F(8) => Some(Action::RemoveHighlights),
        _ => None,
    }
}

/// Translate a key pressed while the search prompt is open
pub fn translate_prompt_key(event: KeyEvent) -> Option<PromptKey> {
    if event.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);

    match event.code {
        KeyCode::Char(ch) if ctrl => match ch.to_ascii_lowercase() {
            'g' => Some(PromptKey::Cancel),
            'n' => Some(PromptKey::ToggleNocase),
            'w' => Some(PromptKey::ToggleWholeword),
            'a' => Some(PromptKey::ToggleScope),
            _ => None,
        },
        KeyCode::Char(ch) => Some(PromptKey::Char(ch)),
        KeyCode::Tab => Some(PromptKey::ToggleMode),
        KeyCode::Backspace => Some(PromptKey::Backspace),
        KeyCode::Enter => Some(PromptKey::Accept),
        KeyCode::Esc => Some(PromptKey::Cancel),
        _ => None,
    }
}
