use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use websift_core::{export, SessionState, SiftConfig};
use websift_scanner::{PageRecord, SiteScanner};

/// Message types for communication between background tasks and the UI
#[derive(Debug)]
enum WorkerMessage {
    /// Analysis finished; the scanner is handed back for reuse by the crawl
    Analyzed {
        scanner: Arc<SiteScanner>,
        categories: Vec<String>,
    },
    /// Analysis aborted with an error
    AnalysisFailed(String),
    /// A crawl is about to fetch a URL
    Fetching { collected: usize, url: String },
    /// Crawl completed with all collected records
    CrawlDone(Vec<PageRecord>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Focus {
    UrlInput,
    Categories,
}

/// Modal layer on top of the normal screen
#[derive(Debug, Clone, PartialEq)]
enum Mode {
    Normal,
    SavePrompt,
    ErrorModal(String),
}

pub struct App {
    config: SiftConfig,
    state: SessionState,
    focus: Focus,
    mode: Mode,
    input: String,
    cursor_position: usize,
    save_input: String,
    save_cursor: usize,
    categories: Vec<String>,
    selected_category: usize,
    records: Vec<PageRecord>,
    crawled_category: Option<String>,
    activity: Vec<String>,
    status: String,
    scanner: Option<Arc<SiteScanner>>,
    should_quit: bool,
    tx: mpsc::UnboundedSender<WorkerMessage>,
    rx: mpsc::UnboundedReceiver<WorkerMessage>,
    handle: Handle,
}

impl App {
    fn new(config: SiftConfig, handle: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let input = config.default_base_url.clone();
        let cursor_position = input.len();

        Self {
            config,
            state: SessionState::Idle,
            focus: Focus::UrlInput,
            mode: Mode::Normal,
            input,
            cursor_position,
            save_input: String::new(),
            save_cursor: 0,
            categories: Vec::new(),
            selected_category: 0,
            records: Vec::new(),
            crawled_category: None,
            activity: Vec::new(),
            status: "Ready. Enter a base URL and press Enter to analyze.".to_string(),
            scanner: None,
            should_quit: false,
            tx,
            rx,
            handle,
        }
    }

    fn log(&mut self, message: impl Into<String>) {
        self.activity.push(message.into());
        // Keep only recent activity to bound memory
        if self.activity.len() > 500 {
            self.activity.drain(0..self.activity.len() - 500);
        }
    }

    /// Process incoming messages from background tasks
    fn process_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                WorkerMessage::Analyzed {
                    scanner,
                    categories,
                } => {
                    self.scanner = Some(scanner);
                    self.selected_category = 0;
                    self.records.clear();
                    self.crawled_category = None;

                    if categories.is_empty() {
                        self.categories = categories;
                        self.state = SessionState::Idle;
                        self.status =
                            "Analysis complete: no categories found. Check the URL.".to_string();
                    } else {
                        self.status = format!(
                            "Analysis complete: {} categories. Select one and press Enter to crawl.",
                            categories.len()
                        );
                        self.categories = categories;
                        self.state = SessionState::Analyzed;
                        self.focus = Focus::Categories;
                    }
                }
                WorkerMessage::AnalysisFailed(message) => {
                    self.state = SessionState::Failed;
                    self.status = "Analysis failed.".to_string();
                    self.mode = Mode::ErrorModal(message);
                }
                WorkerMessage::Fetching { collected, url } => {
                    self.log(format!("[{:>3}] {}", collected, url));
                }
                WorkerMessage::CrawlDone(records) => {
                    if records.is_empty() {
                        self.state = SessionState::Analyzed;
                        self.status = format!(
                            "Crawl complete: no data found under {}.",
                            self.crawled_category.as_deref().unwrap_or("?")
                        );
                    } else {
                        self.status = format!(
                            "Crawl complete: {} pages. Enter a destination to save the CSV.",
                            records.len()
                        );
                        self.records = records;
                        self.state = SessionState::Crawled;
                        self.save_input = export::suggested_filename(
                            self.crawled_category.as_deref().unwrap_or(""),
                        );
                        self.save_cursor = self.save_input.len();
                        self.mode = Mode::SavePrompt;
                    }
                }
            }
        }
    }

    fn start_analysis(&mut self) {
        if !self.state.can_analyze() {
            return;
        }

        let base = self.input.trim().trim_end_matches('/').to_string();
        if base.is_empty() {
            self.mode = Mode::ErrorModal("Enter a base URL first.".to_string());
            return;
        }

        self.state = SessionState::Analyzing;
        self.status = format!("Analyzing site structure of {}...", base);
        self.log(format!("analyze {}", base));

        let tx = self.tx.clone();
        let config = self.config.clone();
        self.handle.spawn(async move {
            let connected = SiteScanner::connect(
                &base,
                config.fetch_timeout_secs,
                config.probe_timeout_secs,
            )
            .await;

            let message = match connected {
                Ok(scanner) => {
                    let scanner = scanner.with_max_pages(config.max_pages);
                    match scanner.analyze().await {
                        Ok(categories) => WorkerMessage::Analyzed {
                            scanner: Arc::new(scanner),
                            categories,
                        },
                        Err(e) => WorkerMessage::AnalysisFailed(e.to_string()),
                    }
                }
                Err(e) => WorkerMessage::AnalysisFailed(e.to_string()),
            };
            let _ = tx.send(message);
        });
    }

    fn start_crawl(&mut self) {
        if !self.state.can_crawl() || self.categories.is_empty() {
            return;
        }
        let Some(scanner) = self.scanner.clone() else {
            return;
        };

        let category = self.categories[self.selected_category].clone();
        self.crawled_category = Some(category.clone());
        self.records.clear();
        self.state = SessionState::Crawling;
        self.status = format!("Crawling pages under {}...", category);
        self.log(format!("crawl {}", category));

        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let progress_tx = tx.clone();
            let progress: websift_scanner::ProgressCallback =
                Arc::new(move |collected, url| {
                    let _ = progress_tx.send(WorkerMessage::Fetching { collected, url });
                });

            let records = scanner.crawl_section(&category, Some(progress)).await;
            let _ = tx.send(WorkerMessage::CrawlDone(records));
        });
    }

    fn finish_save(&mut self) {
        if self.save_input.trim().is_empty() {
            return;
        }

        let destination = export::expand_destination(&self.save_input);
        match export::write_csv(&self.records, &destination) {
            Ok(()) => {
                self.mode = Mode::Normal;
                self.status = format!(
                    "Saved {} records to {}.",
                    self.records.len(),
                    destination.display()
                );
                self.log(format!("saved {}", destination.display()));
            }
            Err(e) => {
                self.status = "CSV export failed.".to_string();
                self.mode = Mode::ErrorModal(format!("CSV write failed: {}", e));
            }
        }
    }

    fn cancel_save(&mut self) {
        self.mode = Mode::Normal;
        self.status = "CSV export cancelled.".to_string();
    }

    fn open_save_prompt(&mut self) {
        if !self.state.can_export() || self.records.is_empty() {
            return;
        }
        self.save_input =
            export::suggested_filename(self.crawled_category.as_deref().unwrap_or(""));
        self.save_cursor = self.save_input.len();
        self.mode = Mode::SavePrompt;
    }
}

/// Run the interactive surface. Blocks until the user quits; background
/// analyze/crawl tasks are spawned on the ambient tokio runtime.
pub fn run(config: SiftConfig) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, Handle::current());

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.process_messages();

        terminal.draw(|f| ui(f, app))?;

        if app.should_quit {
            break;
        }

        // Poll for keyboard events (non-blocking, so worker messages keep
        // draining while the user is idle)
        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }

            match app.mode.clone() {
                Mode::ErrorModal(_) => {
                    if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                        app.mode = Mode::Normal;
                    }
                }
                Mode::SavePrompt => handle_save_prompt_key(app, key.code),
                Mode::Normal => handle_normal_key(app, key.code),
            }
        }
    }

    Ok(())
}

fn handle_save_prompt_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char(c) => {
            app.save_input.insert(app.save_cursor, c);
            app.save_cursor += 1;
        }
        KeyCode::Backspace => {
            if app.save_cursor > 0 {
                app.save_input.remove(app.save_cursor - 1);
                app.save_cursor -= 1;
            }
        }
        KeyCode::Left => {
            app.save_cursor = app.save_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            app.save_cursor = (app.save_cursor + 1).min(app.save_input.len());
        }
        KeyCode::Home => app.save_cursor = 0,
        KeyCode::End => app.save_cursor = app.save_input.len(),
        KeyCode::Enter => app.finish_save(),
        KeyCode::Esc => app.cancel_save(),
        _ => {}
    }
}

fn handle_normal_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            app.should_quit = true;
        }
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::UrlInput => Focus::Categories,
                Focus::Categories => Focus::UrlInput,
            };
        }
        _ => match app.focus {
            Focus::UrlInput => handle_url_input_key(app, code),
            Focus::Categories => handle_category_key(app, code),
        },
    }
}

fn handle_url_input_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char(c) => {
            app.input.insert(app.cursor_position, c);
            app.cursor_position += 1;
        }
        KeyCode::Backspace => {
            if app.cursor_position > 0 {
                app.input.remove(app.cursor_position - 1);
                app.cursor_position -= 1;
            }
        }
        KeyCode::Left => {
            app.cursor_position = app.cursor_position.saturating_sub(1);
        }
        KeyCode::Right => {
            app.cursor_position = (app.cursor_position + 1).min(app.input.len());
        }
        KeyCode::Home => app.cursor_position = 0,
        KeyCode::End => app.cursor_position = app.input.len(),
        KeyCode::Enter => app.start_analysis(),
        KeyCode::Down => app.focus = Focus::Categories,
        _ => {}
    }
}

fn handle_category_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Up => {
            if app.selected_category == 0 && !app.categories.is_empty() {
                app.focus = Focus::UrlInput;
            } else {
                app.selected_category = app.selected_category.saturating_sub(1);
            }
        }
        KeyCode::Down => {
            if !app.categories.is_empty() {
                app.selected_category =
                    (app.selected_category + 1).min(app.categories.len() - 1);
            }
        }
        KeyCode::Home => app.selected_category = 0,
        KeyCode::End => {
            app.selected_category = app.categories.len().saturating_sub(1);
        }
        KeyCode::Enter => app.start_crawl(),
        KeyCode::Char('s') => app.open_save_prompt(),
        _ => {}
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Base URL input
            Constraint::Min(10),   // Main area
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Hints bar
        ])
        .split(f.area());

    render_url_input(f, app, chunks[0]);

    // Split main area into categories (left) and pages + activity (right)
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(chunks[1]);

    render_categories(f, app, main_chunks[0]);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(8)])
        .split(main_chunks[1]);

    render_records(f, app, right_chunks[0]);
    render_activity(f, app, right_chunks[1]);

    render_status(f, app, chunks[2]);
    render_hints(f, app, chunks[3]);

    match &app.mode {
        Mode::SavePrompt => render_save_prompt(f, app),
        Mode::ErrorModal(message) => render_error_modal(f, message),
        Mode::Normal => {}
    }
}

fn render_url_input(f: &mut Frame, app: &App, area: Rect) {
    let border_color = if app.focus == Focus::UrlInput {
        Color::Yellow
    } else {
        Color::DarkGray
    };

    let input = Paragraph::new(app.input.as_str())
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Base URL ")
                .border_style(Style::default().fg(border_color)),
        );
    f.render_widget(input, area);

    if app.focus == Focus::UrlInput && app.mode == Mode::Normal {
        f.set_cursor_position((area.x + 1 + app.cursor_position as u16, area.y + 1));
    }
}

fn render_categories(f: &mut Frame, app: &App, area: Rect) {
    let border_color = if app.focus == Focus::Categories {
        Color::Yellow
    } else {
        Color::Cyan
    };

    let title = format!(" Categories ({}) ", app.categories.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.categories.is_empty() {
        let empty = Paragraph::new("No categories yet. Analyze a site first.")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        f.render_widget(empty, inner);
        return;
    }

    let height = inner.height as usize;
    let scroll_offset = if app.selected_category >= height {
        app.selected_category + 1 - height
    } else {
        0
    };

    let items: Vec<ListItem> = app
        .categories
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(height)
        .map(|(idx, category)| {
            let mut style = Style::default().fg(Color::Green);
            if idx == app.selected_category {
                style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
            }
            ListItem::new(category.clone()).style(style)
        })
        .collect();

    f.render_widget(List::new(items), inner);
}

fn render_records(f: &mut Frame, app: &App, area: Rect) {
    let title = match &app.crawled_category {
        Some(category) => format!(" Pages under {} ({}) ", category, app.records.len()),
        None => " Pages ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.records.is_empty() {
        let hint = if app.state == SessionState::Crawling {
            "Crawling..."
        } else {
            "No pages collected yet."
        };
        let empty = Paragraph::new(hint).style(Style::default().fg(Color::DarkGray));
        f.render_widget(empty, inner);
        return;
    }

    let height = inner.height as usize;
    let skip = app.records.len().saturating_sub(height);

    let items: Vec<ListItem> = app
        .records
        .iter()
        .skip(skip)
        .take(height)
        .map(|record| {
            let line = Line::from(vec![
                Span::styled(
                    format!("[{}] ", record.status),
                    Style::default().fg(Color::Green),
                ),
                Span::raw(record.title.clone()),
                Span::styled(
                    format!("  {}", record.url),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            ListItem::new(line)
        })
        .collect();

    f.render_widget(List::new(items), inner);
}

fn render_activity(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Activity ")
        .border_style(Style::default().fg(Color::Magenta));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let height = inner.height as usize;
    let skip = app.activity.len().saturating_sub(height);

    let items: Vec<ListItem> = app
        .activity
        .iter()
        .skip(skip)
        .take(height)
        .map(|line| ListItem::new(line.clone()).style(Style::default().fg(Color::DarkGray)))
        .collect();

    f.render_widget(List::new(items), inner);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let state_color = match app.state {
        SessionState::Failed => Color::Red,
        SessionState::Analyzing | SessionState::Crawling => Color::Yellow,
        SessionState::Crawled => Color::Green,
        _ => Color::Cyan,
    };

    let status = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", app.state.label()),
            Style::default().fg(Color::Black).bg(state_color),
        ),
        Span::raw(" "),
        Span::raw(app.status.clone()),
    ]));
    f.render_widget(status, area);
}

fn render_hints(f: &mut Frame, app: &App, area: Rect) {
    let key = |label: &str| {
        Span::styled(
            format!(" {} ", label),
            Style::default().fg(Color::Black).bg(Color::Gray),
        )
    };

    let hints = match app.mode {
        Mode::SavePrompt => Line::from(vec![
            key("Enter"),
            Span::raw(" Save  "),
            key("Esc"),
            Span::raw(" Cancel"),
        ]),
        Mode::ErrorModal(_) => Line::from(vec![key("Enter"), Span::raw(" Dismiss")]),
        Mode::Normal => Line::from(vec![
            key("Tab"),
            Span::raw(" Switch  "),
            key("Enter"),
            Span::raw(" Analyze/Crawl  "),
            key("↑/↓"),
            Span::raw(" Select  "),
            key("s"),
            Span::raw(" Save CSV  "),
            key("Esc"),
            Span::raw(" Quit"),
        ]),
    };

    let paragraph = Paragraph::new(hints).style(Style::default().bg(Color::Black).fg(Color::Gray));
    f.render_widget(paragraph, area);
}

fn render_save_prompt(f: &mut Frame, app: &App) {
    let area = centered_rect(60, 5, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Save CSV ")
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled(
            "Destination path:",
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            app.save_input.clone(),
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(
            "Enter to save, Esc to cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(Paragraph::new(lines), inner);

    f.set_cursor_position((inner.x + app.save_cursor as u16, inner.y + 1));
}

fn render_error_modal(f: &mut Frame, message: &str) {
    let area = centered_rect(60, 6, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Error ")
        .border_style(Style::default().fg(Color::Red));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let text = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: true });
    f.render_widget(text, inner);
}

fn centered_rect(width_percent: u16, height: u16, area: Rect) -> Rect {
    let width = area.width * width_percent / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect {
        x,
        y,
        width,
        height: height.min(area.height),
    }
}
