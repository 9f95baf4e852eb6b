//! Display rendering

use proofmark::buffer::Buffer;
use proofmark::error::Result;
use proofmark::highlight::{HighlightEngine, Style, TagStore};
use proofmark::text::Range;
use unicode_width::UnicodeWidthChar;

use crate::terminal::Terminal;
use crate::window::Window;

/// Display state
pub struct Display {
    /// Whether a full redraw is needed
    needs_redraw: bool,
    /// Message to show in minibuffer (bottom line)
    message: Option<String>,
    /// Prompt text; while set the cursor sits on the minibuffer
    prompt: Option<String>,
}

impl Display {
    pub fn new() -> Self {
        Self {
            needs_redraw: true,
            message: None,
            prompt: None,
        }
    }

    /// Mark that a full redraw is needed
    pub fn force_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Set a message to display
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    /// Clear the message
    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn set_prompt(&mut self, prompt: Option<String>) {
        self.prompt = prompt;
    }

    /// Render the viewer display
    pub fn render(
        &mut self,
        terminal: &mut Terminal,
        buffer: &Buffer,
        window: &Window,
        tags: &TagStore,
        engine: &HighlightEngine,
    ) -> Result<()> {
        let cols = terminal.cols() as usize;
        let rows = terminal.rows();
        if rows < 3 {
            return Ok(());
        }

        terminal.set_cursor_visible(false)?;
        if self.needs_redraw {
            terminal.clear_screen()?;
        }

        let selection = window.selection();
        for (row_offset, line_idx) in window.visible_lines().enumerate() {
            terminal.move_cursor(row_offset as u16, 0)?;
            match buffer.line(line_idx) {
                Some(line) => {
                    let mut styles = tags.line_styles(line_idx, line.char_count());
                    if let Some(selection) = &selection {
                        overlay_selection(&mut styles, selection, line_idx);
                    }
                    for (text, style) in style_runs(line.text(), &styles, cols) {
                        if style.is_default() {
                            terminal.write_str(&text)?;
                        } else {
                            terminal.apply_style(&style)?;
                            terminal.write_str(&text)?;
                            terminal.reset_attributes()?;
                        }
                    }
                }
                None => {
                    // Empty line indicator (like vim's ~)
                    terminal.set_dim(true)?;
                    terminal.write_str("~")?;
                    terminal.set_dim(false)?;
                }
            }
            terminal.clear_to_eol()?;
        }

        self.render_mode_line(terminal, buffer, window, engine, rows - 2, cols)?;
        self.render_minibuffer(terminal, rows - 1, cols)?;
        self.position_cursor(terminal, buffer, window, rows - 1, cols)?;

        terminal.set_cursor_visible(true)?;
        terminal.flush()?;

        self.needs_redraw = false;
        Ok(())
    }

    /// Render the mode line
    fn render_mode_line(
        &self,
        terminal: &mut Terminal,
        buffer: &Buffer,
        window: &Window,
        engine: &HighlightEngine,
        row: u16,
        cols: usize,
    ) -> Result<()> {
        terminal.move_cursor(row, 0)?;
        terminal.set_reverse(true)?;

        let modified = if buffer.is_modified() { "**" } else { "--" };
        let cursor = window.cursor();
        let surround = if engine.matcher().is_enabled() { "on" } else { "off" };
        let align = match engine.alignment().column() {
            Some(col) => format!(" align:{}", col + 1),
            None => String::new(),
        };
        let live = match engine.live_query() {
            Some(query) => format!(" live:{}", query.pattern),
            None => String::new(),
        };

        let mode_line = format!(
            "{}- proofmark: {} L{} C{} surround:{}{}{} ",
            modified,
            buffer.name(),
            cursor.line + 1,
            cursor.col + 1,
            surround,
            align,
            live,
        );

        // Pad or truncate to fill width
        let width: usize = mode_line.chars().map(|ch| ch.width().unwrap_or(1)).sum();
        let padded = if width < cols {
            format!("{}{}", mode_line, "-".repeat(cols - width))
        } else {
            truncate_to_width(&mode_line, cols)
        };

        terminal.write_str(&padded)?;
        terminal.set_reverse(false)?;
        Ok(())
    }

    /// Render the minibuffer (prompt or message)
    fn render_minibuffer(&self, terminal: &mut Terminal, row: u16, cols: usize) -> Result<()> {
        terminal.move_cursor(row, 0)?;
        if let Some(text) = self.prompt.as_ref().or(self.message.as_ref()) {
            terminal.write_str(&truncate_to_width(text, cols))?;
        }
        terminal.clear_to_eol()?;
        Ok(())
    }

    /// Position the hardware cursor at the correct location
    fn position_cursor(
        &self,
        terminal: &mut Terminal,
        buffer: &Buffer,
        window: &Window,
        minibuffer_row: u16,
        cols: usize,
    ) -> Result<()> {
        let last_col = cols.saturating_sub(1);
        if let Some(prompt) = &self.prompt {
            let width: usize = prompt.chars().map(|ch| ch.width().unwrap_or(1)).sum();
            return terminal.move_cursor(minibuffer_row, width.min(last_col) as u16);
        }

        let cursor = window.cursor();
        let display_col = buffer.line(cursor.line).map_or(0, |line| line.width_to(cursor.col));
        let screen_row = cursor.line.saturating_sub(window.top_line()) as u16;
        terminal.move_cursor(screen_row, display_col.min(last_col) as u16)
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw the selection in reverse video on top of the tag styles
fn overlay_selection(styles: &mut [Style], selection: &Range, line_idx: usize) {
    if let Some((start, end)) = selection.columns_on_line(line_idx, styles.len()) {
        for slot in &mut styles[start..end] {
            *slot = slot.merge(Style::reverse());
        }
    }
}

/// Group consecutive chars of equal style, stopping at `max_width` cells
fn style_runs(text: &str, styles: &[Style], max_width: usize) -> Vec<(String, Style)> {
    let mut runs: Vec<(String, Style)> = Vec::new();
    let mut width = 0;

    for (col, ch) in text.chars().enumerate() {
        let ch_width = ch.width().unwrap_or(1);
        if width + ch_width > max_width {
            break;
        }
        width += ch_width;

        let style = styles.get(col).copied().unwrap_or_default();
        match runs.last_mut() {
            Some((run, run_style)) if *run_style == style => run.push(ch),
            _ => runs.push((ch.to_string(), style)),
        }
    }
    runs
}

/// Truncate a string to fit within a display width
fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut width = 0;

    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(1);
        if width + ch_width > max_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proofmark::highlight::Color;
    use proofmark::text::Position;

    #[test]
    fn test_style_runs_group_by_style() {
        let tagged = Style::bg(Color::Pink);
        let styles = vec![
            Style::default(),
            tagged,
            Style::default(),
            Style::default(),
            tagged,
        ];
        let runs = style_runs("a(bc)", &styles, 80);
        assert_eq!(
            runs,
            vec![
                ("a".to_string(), Style::default()),
                ("(".to_string(), tagged),
                ("bc".to_string(), Style::default()),
                (")".to_string(), tagged),
            ]
        );
    }

    #[test]
    fn test_style_runs_truncate_by_width() {
        let styles = vec![Style::default(); 4];
        let runs = style_runs("日本語x", &styles, 5);
        assert_eq!(runs, vec![("日本".to_string(), Style::default())]);
    }

    #[test]
    fn test_selection_overlay() {
        let mut styles = vec![Style::default(); 5];
        let selection = Range::new(Position::new(0, 3), Position::new(2, 1));
        overlay_selection(&mut styles, &selection, 0);
        assert!(!styles[2].reverse);
        assert!(styles[3].reverse && styles[4].reverse);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("hello", 3), "hel");
        assert_eq!(truncate_to_width("“hi”", 10), "“hi”");
    }
}
