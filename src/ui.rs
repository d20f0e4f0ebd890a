use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Layout, Direction, Constraint, Rect},
    widgets::{Block, Borders, BorderType, List, ListItem, ListState, Paragraph, Wrap, Clear},
    style::{Color, Style, Modifier},
    text::{Line, Span},
};

use crate::app::App;
use crate::input::{DeckField, Hotkey};
use crate::types::DeckInfo;
use crate::ui_core::layout::{card_rect, BoardScale};

const ACCENT: Color = Color::Cyan;
const TAPPED: Color = Color::Yellow;
const DIM: Color = Color::DarkGray;
const ERROR: Color = Color::Red;

// ===============================
// Top-level draw
// ===============================
pub fn draw(f: &mut Frame, app: &App, scale: BoardScale, now: Instant) {
    let chunks = split(f.area());
    header(f, chunks[0], app);
    board(f, chunks[1], app, scale);
    footer(f, chunks[2], app);

    // Overlays render last
    let mode = app.gate().mode();
    if mode.deck_import_open {
        draw_deck_import(f, chunks[1], app);
    }
    if mode.deck_browse_open {
        draw_deck_list(f, app);
    }
    if mode.searching {
        draw_search_bar(f, chunks[1], app);
    }
    if let Some(message) = app.notice_at(now) {
        draw_notice(f, message);
    }
}

/// Region the cards are drawn in. Mouse handling uses the same split.
pub fn board_area(area: Rect) -> Rect {
    split(area)[1]
}

fn split(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(2)])
        .split(area)
}

// ===============================
// Header / Board / Footer
// ===============================
fn header(f: &mut Frame, area: Rect, app: &App) {
    let line = Line::from(vec![
        Span::styled("cardtable", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {} cards on the board", app.board().len())),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn board(f: &mut Frame, area: Rect, app: &App, scale: BoardScale) {
    for card in app.board().cards() {
        let Some(rect) = card_rect(area, scale, card) else {
            continue;
        };
        let mut title = String::new();
        if card.tapped {
            title.push_str("⟳ ");
        }
        if card.locked {
            title.push_str("🔒 ");
        }
        title.push_str(&card.name);
        let title = truncate(&title, rect.width.saturating_sub(2) as usize);

        let (border, style) = if card.tapped {
            (BorderType::Double, Style::default().fg(TAPPED).add_modifier(Modifier::BOLD))
        } else {
            (BorderType::Rounded, Style::default())
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(border)
            .border_style(style);

        f.render_widget(Clear, rect);
        f.render_widget(block, rect);
    }
}

fn footer(f: &mut Frame, area: Rect, app: &App) {
    let mut spans: Vec<Span> = Vec::with_capacity(Hotkey::ALL.len() * 2 + 4);
    for (i, hk) in Hotkey::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" │ "));
        }
        spans.push(Span::styled(hk.key().to_string(), Style::default().fg(ACCENT)));
        spans.push(Span::raw(format!(" {}", hk.label())));
    }
    spans.push(Span::raw(" │ "));
    spans.push(Span::styled("Ctrl+C", Style::default().fg(ACCENT)));
    spans.push(Span::raw(" quit"));

    let remaining = app.decks().remaining();
    if remaining > 0 {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("Cards in deck: {remaining}"),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }

    let w = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::TOP).border_type(BorderType::Plain));
    f.render_widget(w, area);
}

// ===============================
// Overlays
// ===============================
fn draw_search_bar(f: &mut Frame, board: Rect, app: &App) {
    let width = (board.width * 6) / 10;
    let overlay = Rect {
        x: board.x + (board.width.saturating_sub(width)) / 2,
        y: board.y,
        width,
        height: 3.min(board.height),
    };
    f.render_widget(Clear, overlay);

    let query = app.buffers().search.as_str();
    let (text, style) = if query.is_empty() {
        ("Search for card...", Style::default().fg(DIM))
    } else {
        (query, Style::default())
    };
    let w = Paragraph::new(text).style(style).block(
        Block::default()
            .title(" Search (Enter add, Tab random, Esc cancel) ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(ACCENT)),
    );
    f.render_widget(w, overlay);

    if overlay.width > 2 && overlay.height > 1 {
        let typed = query.chars().count().min(overlay.width.saturating_sub(2) as usize) as u16;
        f.set_cursor_position((overlay.x + 1 + typed, overlay.y + 1));
    }
}

fn draw_deck_import(f: &mut Frame, board: Rect, app: &App) {
    let width = (board.width * 4 / 10).max(30).min(board.width);
    let overlay = Rect {
        x: board.x + board.width - width,
        y: board.y,
        width,
        height: board.height,
    };
    f.render_widget(Clear, overlay);

    let container = Block::default()
        .title(" Deck Import (Tab field, Enter submit) ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT));
    let inner = container.inner(overlay);
    f.render_widget(container, overlay);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    let buffers = app.buffers();
    let field_style = |field: DeckField| {
        if buffers.deck_field == field {
            Style::default().fg(ACCENT)
        } else {
            Style::default().fg(DIM)
        }
    };

    let name = Paragraph::new(buffers.deck_name.as_str()).block(
        Block::default()
            .title(" Deck name ")
            .borders(Borders::ALL)
            .border_style(field_style(DeckField::Name)),
    );
    f.render_widget(name, chunks[0]);

    let list_text = if buffers.deck_list.is_empty() {
        "(paste a deck list)"
    } else {
        buffers.deck_list.as_str()
    };
    let list = Paragraph::new(list_text).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(" Deck list ")
            .borders(Borders::ALL)
            .border_style(field_style(DeckField::List)),
    );
    f.render_widget(list, chunks[1]);
}

fn draw_deck_list(f: &mut Frame, app: &App) {
    let decks = app.decks().decks();

    // Centered overlay (60% width, 50% height)
    let area = f.area();
    let width = (area.width * 6) / 10;
    let height = (area.height * 5) / 10;
    let overlay = Rect {
        x: (area.width.saturating_sub(width)) / 2,
        y: (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };
    f.render_widget(Clear, overlay);

    let items: Vec<ListItem> = decks.iter().map(|d| ListItem::new(deck_line(d))).collect();

    let mut st = ListState::default();
    if !decks.is_empty() {
        st.select(Some(app.decks().cursor().min(decks.len() - 1)));
    }
    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .block(
            Block::default()
                .title(format!(" Saved Decks ({}) ↑/↓ Enter ", decks.len()))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT)),
        );
    f.render_stateful_widget(list, overlay, &mut st);
}

fn deck_line(deck: &DeckInfo) -> String {
    let when = deck
        .timestamp()
        .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| deck.date.clone());
    format!("{:24} {}  {} cards", truncate(&deck.deck_name, 24), when, deck.card_count)
}

fn draw_notice(f: &mut Frame, message: &str) {
    // Small box at the top (50% width, 3 lines height)
    let area = f.area();
    let width = (area.width * 5) / 10;
    let overlay = Rect {
        x: (area.width.saturating_sub(width)) / 2,
        y: 1.min(area.height),
        width,
        height: 3.min(area.height),
    };
    f.render_widget(Clear, overlay);

    let text = Paragraph::new(message)
        .style(Style::default().fg(ERROR).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ERROR)),
        );
    f.render_widget(text, overlay);
}

// ===============================
// Helpers
// ===============================
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars <= 1 {
        return s.chars().take(max_chars).collect();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}
