//! Recordbook - terminal front end for JSON CRUD record APIs
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - controller state machine processing events
//! - Network Layer (Tokio) - async record API calls

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use recordbook_tui::constants::{APP_NAME, APP_VERSION, LOG_FILE_NAME};
use recordbook_tui::messages::ui_events::{key_to_input, KeyInput, Screen};
use recordbook_tui::ui::{form_lines, form_title, ListView};
use recordbook_tui::{
    ApiCommand, ApiDialect, ApiResponse, AppActor, Config, NetworkActor, Overrides, RemoteClient,
    RenderState, UiEvent,
};

#[derive(Parser)]
#[command(name = "recordbook", version, about = "Browse and edit records of a JSON CRUD API")]
struct Cli {
    /// Server root, e.g. http://localhost:3000
    #[arg(long, env = "RECORDBOOK_URL")]
    url: Option<String>,

    /// API flavour spoken by the server
    #[arg(long, value_enum)]
    dialect: Option<ApiDialect>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Config file (defaults to ~/.recordbook/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Delete without asking
    #[arg(long)]
    no_confirm: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print all records as JSON
    List,
    /// Print one record as JSON
    Show { id: i64 },
    /// Delete one record
    Delete { id: i64 },
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.url.clone(),
            dialect: self.dialect,
            timeout_secs: self.timeout,
            no_confirm: self.no_confirm,
        }
    }
}

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref(), &cli.overrides())?;

    match cli.command {
        Some(command) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(io::stderr)
                .init();
            run_command(command, &config).await
        }
        None => run_tui(config).await,
    }
}

/// Headless mode: one call, JSON on stdout
async fn run_command(command: Command, config: &Config) -> anyhow::Result<()> {
    let client = RemoteClient::new(config);

    match command {
        Command::List => {
            let records = client.list().await?;
            let json: Vec<_> = records.iter().map(|r| r.to_json(config.dialect)).collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        Command::Show { id } => {
            let record = client.get(id).await?;
            println!("{}", serde_json::to_string_pretty(&record.to_json(config.dialect))?);
        }
        Command::Delete { id } => {
            client.delete(id).await?;
            println!("Deleted {} #{}", config.dialect.noun(), id);
        }
    }

    Ok(())
}

async fn run_tui(config: Config) -> anyhow::Result<()> {
    // Initialize logging to file
    fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("creating log directory {}", config.log_dir.display()))?;
    let file_appender = tracing_appender::rolling::never(&config.log_dir, LOG_FILE_NAME);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    tracing::info!(base_url = %config.base_url, dialect = config.dialect.as_str(), "Starting");

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<ApiCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<ApiResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(RemoteClient::new(&config), net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(config, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                let focused_kind = current_state.form.as_ref().map(|form| form.focused().kind());
                let input = key_to_input(key, current_state.screen, focused_kind, current_state.show_help);

                // Row actions resolve against the rows the user is looking at
                let event = match input {
                    Some(KeyInput::Row(action)) => ListView::new(
                        &current_state.records,
                        current_state.selected,
                        current_state.dialect,
                    )
                    .intent(action)
                    .map(UiEvent::from),
                    Some(KeyInput::Event(event)) => Some(event),
                    None => None,
                };

                if let Some(event) = event {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let banner_height = if state.error.is_some() || state.status.is_some() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Title bar
            Constraint::Length(banner_height), // Error / status banner
            Constraint::Min(0),                // Table
            Constraint::Length(1),             // Status bar
        ])
        .split(area);

    draw_title_bar(f, state, chunks[0]);
    draw_banner(f, state, chunks[1]);
    draw_table(f, state, chunks[2]);
    draw_status_bar(f, state, chunks[3]);

    if let Some(form) = &state.form {
        let popup_area = centered_rect(70, 85, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(form_title(form, state.dialect))
            .style(Style::default().bg(Color::Black));

        // Keep the focused line visible in short terminals
        let visible = popup_area.height.saturating_sub(2) as usize;
        let scroll = (form.focus_index() + 1).saturating_sub(visible) as u16;

        let body = Paragraph::new(form_lines(form)).block(block).scroll((scroll, 0));
        f.render_widget(Clear, popup_area);
        f.render_widget(body, popup_area);
    }

    if state.screen == Screen::ConfirmDelete {
        if let Some(id) = state.pending_delete {
            draw_confirm_popup(f, state, id, area);
        }
    }

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_title_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", APP_NAME),
            Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
        ),
        Span::raw(" "),
        Span::styled(
            format!("{} [{}]", state.base_url, state.dialect.as_str()),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(format!("  v{}", APP_VERSION), Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(title), area);
}

fn draw_banner(f: &mut Frame, state: &RenderState, area: Rect) {
    let banner = if let Some(error) = &state.error {
        Span::styled(format!(" ✗ {} ", error), Style::default().fg(Color::White).bg(Color::Red))
    } else if let Some(status) = &state.status {
        Span::styled(format!(" ✓ {} ", status), Style::default().fg(Color::Green))
    } else {
        return;
    };
    f.render_widget(Paragraph::new(Line::from(banner)), area);
}

fn draw_table(f: &mut Frame, state: &RenderState, area: Rect) {
    let view = ListView::new(&state.records, state.selected, state.dialect);
    let title = format!("{}s ({})", capitalize(state.dialect.noun()), state.records.len());

    if !state.has_loaded || view.is_empty() {
        let message = if !state.has_loaded && state.is_loading {
            String::from("Loading...")
        } else if !state.has_loaded {
            String::from("Could not load the list. Press 'r' to retry.")
        } else {
            format!("No {}s yet. Press 'a' to create one.", state.dialect.noun())
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", title));
        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let mut table_state = view.table_state();
    f.render_stateful_widget(view.table(title, state.is_loading), area, &mut table_state);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = match state.screen {
        Screen::List if state.is_loading => " Loading... ",
        Screen::List => " a:add | e:edit | d:delete | r:reload | j/k:move | ?:help | q:quit ",
        Screen::Dialog => " Tab/↓:next | Shift+Tab/↑:prev | Space:toggle | Enter:save | Esc:cancel ",
        Screen::ConfirmDelete => " y:delete | n:keep ",
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_confirm_popup(f: &mut Frame, state: &RenderState, id: i64, area: Rect) {
    let popup_area = centered_rect(40, 20, area);

    let title = state
        .records
        .iter()
        .find(|r| r.id == Some(id))
        .map(|r| r.fields.title.clone())
        .unwrap_or_default();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Delete ")
        .style(Style::default().bg(Color::Black));

    let text = format!("Delete {} #{} \"{}\"?\n\n y: delete   n: keep", state.dialect.noun(), id, title);
    let popup = Paragraph::new(text).block(block).wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(popup, popup_area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 RECORDBOOK - Keyboard Shortcuts

 LIST
   j / ↓              Next record
   k / ↑              Previous record
   g / G              First / last record
   a / n              New record
   e / Enter          Edit selected record
   d / Delete         Delete selected record
   r                  Reload list
   x / Esc            Dismiss message

 FORM
   Tab / ↓            Next field
   Shift+Tab / ↑      Previous field
   Space              Toggle checkbox / visibility
   Enter / Ctrl+S     Save
   Esc                Cancel

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
