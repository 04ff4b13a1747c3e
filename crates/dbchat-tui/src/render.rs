//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState` by immutable reference and draw to a
//! ratatui frame. Never mutate state or return effects.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::chat::Bubble;
use crate::overlays::Overlay;
use crate::state::{AppState, AskState, TuiState};

/// Width of the thread sidebar.
const SIDEBAR_WIDTH: u16 = 32;

/// Height of the question box (content + borders).
const INPUT_HEIGHT: u16 = 3;

/// Height of the status line below the input.
const STATUS_HEIGHT: u16 = 1;

/// Typing-indicator frames, cycled by `spinner_frame`.
const TYPING_FRAMES: &[&str] = &[".", "..", "..."];

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let state = &app.tui;

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(area);

    render_sidebar(state, frame, columns[0]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(columns[1]);

    render_chat(state, frame, rows[0]);
    render_input(state, frame, rows[1]);
    render_status(state, frame, rows[2]);

    if let Some(overlay) = &app.overlay {
        render_overlay(overlay, frame, area);
    }
}

fn render_sidebar(state: &TuiState, frame: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = thread_rows(state, area.width.saturating_sub(4) as usize)
        .into_iter()
        .map(ListItem::new)
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Threads "));
    frame.render_widget(list, area);
}

/// Builds the sidebar rows: a title line plus a dimmed last-activity line
/// per thread.
fn thread_rows(state: &TuiState, width: usize) -> Vec<Vec<Line<'static>>> {
    state
        .threads
        .threads
        .iter()
        .enumerate()
        .map(|(i, thread)| {
            let is_current = state.threads.current.as_deref() == Some(thread.id.as_str());
            let marker = if is_current { "* " } else { "  " };
            let title = truncate_to_width(thread.display_title(), width);
            let mut style = Style::default();
            if i == state.threads.selected {
                style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
            }
            let stamp = truncate_to_width(&thread.updated_at, width);
            vec![
                Line::styled(format!("{marker}{title}"), style),
                Line::styled(format!("  {stamp}"), style.fg(Color::DarkGray)),
            ]
        })
        .collect()
}

fn render_chat(state: &TuiState, frame: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" dbchat ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let height = inner.height as usize;
    if width == 0 || height == 0 {
        return;
    }

    let mut lines: Vec<Line<'static>> = Vec::new();
    for bubble in &state.chat.bubbles {
        match bubble {
            Bubble::User(text) => {
                push_wrapped(&mut lines, "you> ", text, width, Style::default().fg(Color::Cyan));
            }
            Bubble::Ai { content, streaming } => {
                let mut text = content.clone();
                if *streaming {
                    text.push('▌');
                }
                push_wrapped(&mut lines, "ai>  ", &text, width, Style::default());
            }
            Bubble::Pending => {
                let dots = TYPING_FRAMES[(state.spinner_frame / 4) % TYPING_FRAMES.len()];
                lines.push(Line::from(Span::styled(
                    format!("ai>  {dots}"),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            Bubble::Error(text) => {
                push_wrapped(&mut lines, "ai>  ", text, width, Style::default().fg(Color::Red));
            }
        }
        lines.push(Line::default());
    }

    // Follow the bottom, shifted up by the scroll offset.
    let max_offset = lines.len().saturating_sub(height);
    let offset = max_offset.saturating_sub(state.chat.scroll_offset.min(max_offset));
    let visible: Vec<Line<'static>> = lines.into_iter().skip(offset).take(height).collect();
    frame.render_widget(Paragraph::new(visible), inner);
}

fn render_input(state: &TuiState, frame: &mut Frame, area: Rect) {
    let title = if state.ask.is_busy() {
        " Question (Esc cancels) "
    } else {
        " Question "
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(state.input.text()), inner);

    let cursor_x: usize = state
        .input
        .text()
        .chars()
        .take(state.input.cursor())
        .collect::<String>()
        .width();
    frame.set_cursor_position(Position::new(
        inner.x + (cursor_x as u16).min(inner.width.saturating_sub(1)),
        inner.y,
    ));
}

fn render_status(state: &TuiState, frame: &mut Frame, area: Rect) {
    let text = match (&state.ask, &state.notice) {
        (AskState::Waiting { .. } | AskState::Asking { .. }, _) => {
            "Waiting for answer...".to_string()
        }
        (AskState::Streaming { .. } | AskState::Draining { .. }, _) => "Streaming...".to_string(),
        (_, Some(notice)) => notice.clone(),
        _ => "Enter send | Alt+Enter ask | ^N new | ^R rename | ^D delete | ^C quit".to_string(),
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(Color::DarkGray),
        ))),
        area,
    );
}

fn render_overlay(overlay: &Overlay, frame: &mut Frame, area: Rect) {
    let popup = centered_rect(50, 20, area);
    frame.render_widget(Clear, popup);

    match overlay {
        Overlay::Rename { input, error, .. } => {
            let block = Block::default().borders(Borders::ALL).title(" Rename thread ");
            let inner = block.inner(popup);
            frame.render_widget(block, popup);

            let mut lines = vec![Line::from(input.text().to_string())];
            if let Some(error) = error {
                lines.push(Line::from(Span::styled(
                    error.clone(),
                    Style::default().fg(Color::Red),
                )));
            }
            frame.render_widget(Paragraph::new(lines), inner);
            frame.set_cursor_position(Position::new(
                inner.x + (input.text().width() as u16).min(inner.width.saturating_sub(1)),
                inner.y,
            ));
        }
        Overlay::ConfirmDelete { title, .. } => {
            let block = Block::default().borders(Borders::ALL).title(" Delete thread ");
            let inner = block.inner(popup);
            frame.render_widget(block, popup);
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(format!("Delete \"{title}\"?")),
                    Line::default(),
                    Line::from("Enter/y confirm, Esc/n cancel"),
                ]),
                inner,
            );
        }
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

/// Wraps `text` to `width` display columns, prefixing the first line and
/// indenting continuations to match.
fn push_wrapped(
    lines: &mut Vec<Line<'static>>,
    prefix: &str,
    text: &str,
    width: usize,
    style: Style,
) {
    let indent = " ".repeat(prefix.width());
    let body_width = width.saturating_sub(prefix.width()).max(1);

    for (i, wrapped) in wrap_text(text, body_width).into_iter().enumerate() {
        let head = if i == 0 { prefix } else { indent.as_str() };
        lines.push(Line::from(Span::styled(format!("{head}{wrapped}"), style)));
    }
}

/// Splits text into lines no wider than `width` display columns.
///
/// Breaks on grapheme boundaries, so wide (CJK) characters never straddle
/// a line end. Explicit newlines in the text are respected.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();

    for raw_line in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0;

        for grapheme in raw_line.graphemes(true) {
            let w = grapheme.width();
            if current_width + w > width && !current.is_empty() {
                out.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push_str(grapheme);
            current_width += w;
        }
        out.push(current);
    }

    out
}

/// Truncates to `width` columns with a trailing ellipsis.
fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let w = grapheme.width();
        if used + w + 1 > width {
            break;
        }
        out.push_str(grapheme);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use dbchat_api::ThreadSummary;
    use dbchat_core::config::Config;

    use super::*;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_sidebar_rows_show_title_and_last_activity() {
        let mut state = TuiState::new(Config::default());
        state.threads.set_threads(vec![ThreadSummary {
            id: "t1".to_string(),
            title: Some("Slow queries".to_string()),
            updated_at: "2026-02-03 14:05".to_string(),
        }]);
        state.threads.current = Some("t1".to_string());

        let rows = thread_rows(&state, 28);
        assert_eq!(rows.len(), 1);
        assert_eq!(line_text(&rows[0][0]), "* Slow queries");
        assert_eq!(line_text(&rows[0][1]), "  2026-02-03 14:05");
        assert_eq!(rows[0][1].style.fg, Some(Color::DarkGray));
    }

    #[test]
    fn test_wrap_respects_display_width() {
        let wrapped = wrap_text("abcdef", 3);
        assert_eq!(wrapped, vec!["abc", "def"]);
    }

    #[test]
    fn test_wrap_wide_characters() {
        // Each hangul syllable is two columns wide.
        let wrapped = wrap_text("생성중", 4);
        assert_eq!(wrapped, vec!["생성", "중"]);
    }

    #[test]
    fn test_wrap_keeps_explicit_newlines() {
        let wrapped = wrap_text("a\nb", 10);
        assert_eq!(wrapped, vec!["a", "b"]);
    }

    #[test]
    fn test_wrap_empty_text_yields_one_empty_line() {
        assert_eq!(wrap_text("", 5), vec![""]);
    }
}
