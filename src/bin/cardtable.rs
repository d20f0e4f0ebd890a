// Native binary for cardtable - Terminal UI mode

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste,
        EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::{
    io,
    time::{Duration, Instant},
};

use cardtable::{
    app::{register_handlers, App},
    commands::Command,
    config::load,
    connection::Connection,
    logging, ui,
    ui_core::layout::{drop_position, hit_test, BoardScale},
    util::dblclick::DblClick,
};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

/// A card being dragged: where it was grabbed and which card it was.
struct Drag {
    card_id: i64,
    grab: (u16, u16),
    origin: (u16, u16),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();

    let cfg = load().context("Failed to load configuration")?;
    logging::init(&cfg.log_file, &cfg.log_level)?;
    cfg.log_summary();

    let mut app = App::new(cfg.render_fps, cfg.notice_duration());
    let mut conn: Connection<App> = Connection::new(cfg.socket_endpoint()?);
    register_handlers(&mut conn)?;
    conn.open()?;
    log::info!("board socket: {}", conn.endpoint());

    // terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let scale = BoardScale::new(cfg.px_per_col, cfg.px_per_row);
    let result = run_loop(&mut app, &mut conn, &mut terminal, scale);

    // cleanup
    conn.close();
    conn.join(Duration::from_millis(500)).await;
    execute!(terminal.backend_mut(), DisableBracketedPaste, DisableMouseCapture)?;
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn run_loop(
    app: &mut App,
    conn: &mut Connection<App>,
    terminal: &mut Term,
    scale: BoardScale,
) -> Result<()> {
    let mut last_frame = Instant::now();
    let mut dbl = DblClick::default();
    let mut drag: Option<Drag> = None;

    loop {
        // frame budget (coalesced renders)
        let frame_ms = 1000u32.saturating_div(app.fps().max(1)) as u64;
        let budget = Duration::from_millis(frame_ms.max(1));
        let wait = budget.saturating_sub(last_frame.elapsed());

        // input, then whatever the socket delivered meanwhile
        if event::poll(wait)? {
            match event::read()? {
                Event::Key(k) if k.kind != KeyEventKind::Release => handle_key(app, conn, k),
                Event::Paste(text) => handle_paste(app, &text),
                Event::Mouse(m) => {
                    let size = terminal.size()?;
                    let board = ui::board_area(Rect::new(0, 0, size.width, size.height));
                    handle_mouse(app, conn, m, board, scale, &mut dbl, &mut drag);
                }
                _ => {}
            }
        }
        conn.pump(app);

        if last_frame.elapsed() >= budget {
            let now = Instant::now();
            terminal.draw(|f| ui::draw(f, app, scale, now))?;
            last_frame = now;
        }
        if app.quit_flag() {
            break;
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, conn: &Connection<App>, k: KeyEvent) {
    if k.modifiers.contains(KeyModifiers::CONTROL) {
        if k.code == KeyCode::Char('c') {
            app.request_quit();
        }
        return;
    }

    if app.gate().is_searching() {
        let outcome = match k.code {
            KeyCode::Enter => app.run(Command::SubmitSearch, conn),
            KeyCode::Esc => app.run(Command::CancelSearch, conn),
            KeyCode::Tab => app.run(Command::OpenSearch, conn),
            KeyCode::Backspace => {
                app.buffers_mut().search.pop();
                return;
            }
            KeyCode::Char(c) => {
                app.type_char(c, conn);
                return;
            }
            _ => return,
        };
        log::debug!("search key {:?} -> {outcome:?}", k.code);
        return;
    }

    let mode = app.gate().mode();
    match k.code {
        KeyCode::Char(c) => {
            app.type_char(c, conn);
        }
        KeyCode::Up if mode.deck_browse_open => app.decks_mut().cursor_up(),
        KeyCode::Down if mode.deck_browse_open => app.decks_mut().cursor_down(),
        KeyCode::Enter if mode.deck_browse_open => {
            app.select_highlighted_deck(conn);
        }
        KeyCode::Enter if mode.deck_import_open => {
            app.run(Command::SubmitDeck, conn);
        }
        KeyCode::Tab if mode.deck_import_open => app.buffers_mut().next_deck_field(),
        KeyCode::Backspace if mode.deck_import_open => {
            app.buffers_mut().focused_deck_field_mut().pop();
        }
        KeyCode::Esc => app.dismiss_notice(),
        _ => {}
    }
}

fn handle_paste(app: &mut App, text: &str) {
    if app.gate().is_searching() {
        let line = text.lines().next().unwrap_or("");
        app.buffers_mut().search.push_str(line);
    } else if app.gate().mode().deck_import_open {
        app.buffers_mut().paste_into_deck_form(text);
    }
}

fn handle_mouse(
    app: &mut App,
    conn: &Connection<App>,
    mouse: MouseEvent,
    board: Rect,
    scale: BoardScale,
    dbl: &mut DblClick,
    drag: &mut Option<Drag>,
) {
    let (col, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let cards = app.board().cards();
            let Some(index) = hit_test(board, scale, cards, col, row) else {
                dbl.reset();
                return;
            };
            let card_id = cards[index].id;
            let (card_col, card_row) = scale.to_cells(cards[index].x, cards[index].y);
            if dbl.register(card_id, Instant::now()) {
                *drag = None;
                let outcome = app.run(Command::TapCard { index }, conn);
                log::debug!("double click on card {card_id} -> {outcome:?}");
                return;
            }
            *drag = Some(Drag {
                card_id,
                grab: (
                    col.saturating_sub(board.x + card_col),
                    row.saturating_sub(board.y + card_row),
                ),
                origin: (col, row),
            });
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let Some(d) = drag.take() else {
                return;
            };
            if d.origin == (col, row) {
                return;
            }
            // The board may have been replaced mid-drag
            let Some(index) = app.board().position_of(d.card_id) else {
                log::debug!("dragged card {} no longer on the board", d.card_id);
                return;
            };
            let (x, y) = drop_position(board, scale, col, row, d.grab);
            let outcome = app.run(Command::MoveCard { index, x, y }, conn);
            log::debug!("drop card {} at ({x}, {y}) -> {outcome:?}", d.card_id);
        }
        _ => {}
    }
}
