use super::theme::Theme;
use crate::domain::{DateParts, DiaryEntry, filter_entries, sort_newest_first};
use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::tty::IsTty;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::{self, Stdout, stdout};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserResult {
    /// User left the browser
    Exited,
    /// User asked to edit the entry stored at these fields
    EditRequested(DateParts),
}

/// Everything the browser shows, independent of the terminal.
pub struct BrowserState {
    entries: Vec<DiaryEntry>,
    query: String,
    selected: usize,
    show_help: bool,
    theme: Theme,
    outcome: Option<BrowserResult>,
}

impl BrowserState {
    pub fn new(mut entries: Vec<DiaryEntry>, theme: Theme) -> Self {
        sort_newest_first(&mut entries);
        Self {
            entries,
            query: String::new(),
            selected: 0,
            show_help: false,
            theme,
            outcome: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn outcome(&self) -> Option<&BrowserResult> {
        self.outcome.as_ref()
    }

    pub fn visible(&self) -> Vec<DiaryEntry> {
        filter_entries(&self.entries, &self.query)
    }

    pub fn selected_entry(&self) -> Option<DiaryEntry> {
        self.visible().into_iter().nth(self.selected)
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.visible().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, len as isize - 1) as usize;
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _)
            | (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('d'), KeyModifiers::CONTROL) => {
                self.outcome = Some(BrowserResult::Exited);
            }

            // Dark/light switch
            (KeyCode::Char('t'), KeyModifiers::CONTROL) => {
                self.theme = self.theme.toggled();
            }

            // New entry for today
            (KeyCode::Char('n'), KeyModifiers::CONTROL) => {
                self.outcome = Some(BrowserResult::EditRequested(DateParts::today()));
            }

            (KeyCode::F(1), _) => {
                self.show_help = !self.show_help;
            }

            (KeyCode::Up, _) => self.move_selection(-1),
            (KeyCode::Down, _) => self.move_selection(1),
            (KeyCode::PageUp, _) => self.move_selection(-10),
            (KeyCode::PageDown, _) => self.move_selection(10),

            (KeyCode::Enter, _) => {
                if let Some(entry) = self.selected_entry() {
                    self.outcome = Some(BrowserResult::EditRequested(entry.parts()));
                }
            }

            (KeyCode::Backspace, _) => {
                self.query.pop();
                self.selected = 0;
            }
            (KeyCode::Char(c), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
                self.query.push(c);
                self.selected = 0;
            }

            _ => {}
        }
    }
}

pub struct EntryBrowser {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    state: BrowserState,
}

impl EntryBrowser {
    pub fn new(entries: Vec<DiaryEntry>, theme: Theme) -> io::Result<Self> {
        if !IsTty::is_tty(&stdout()) {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "Not running in a TTY, cannot initialize terminal interface",
            ));
        }

        enable_raw_mode()?;

        stdout().execute(EnterAlternateScreen).map_err(|e| {
            let _ = disable_raw_mode();
            io::Error::other(format!("Failed to enter alternate screen: {}", e))
        })?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend).map_err(|e| {
            let _ = disable_raw_mode();
            let _ = stdout().execute(LeaveAlternateScreen);
            io::Error::other(format!("Failed to create terminal: {}", e))
        })?;

        Ok(Self {
            terminal,
            state: BrowserState::new(entries, theme),
        })
    }

    /// Theme in effect when the browser closed, so a toggle survives an edit.
    pub fn theme(&self) -> &Theme {
        self.state.theme()
    }

    pub fn run(&mut self) -> io::Result<BrowserResult> {
        let outcome = loop {
            if let Some(outcome) = self.state.outcome() {
                break outcome.clone();
            }

            let Self { terminal, state } = self;
            terminal.draw(|frame| render(frame, state))?;

            if poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.state.handle_key_event(key);
                    }
                }
            }
        };

        self.cleanup()?;
        Ok(outcome)
    }

    fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        self.terminal.backend_mut().execute(LeaveAlternateScreen)?;
        Ok(())
    }
}

impl Drop for EntryBrowser {
    fn drop(&mut self) {
        // Fallback cleanup if run() bailed early
        let _ = self.cleanup();
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

fn render(frame: &mut Frame, state: &BrowserState) {
    let colors = &state.theme.colors;
    let visible = state.visible();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let search = Paragraph::new(Line::from(vec![
        Span::styled("Search: ", colors.dimmed.to_ratatui()),
        Span::styled(state.query.clone(), colors.search.to_ratatui()),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(colors.border.to_ratatui())
            .title(Span::styled(" diarist ", colors.header.to_ratatui())),
    );
    frame.render_widget(search, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    let items: Vec<ListItem> = visible
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(entry.display_date(), colors.date.to_ratatui()),
                Span::raw("  "),
                Span::styled(
                    first_line(&entry.text).to_string(),
                    colors.normal_text.to_ratatui(),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(colors.border.to_ratatui())
                .title(format!(" Entries ({}) ", visible.len())),
        )
        .highlight_style(colors.selected.to_ratatui_with_modifier(Modifier::BOLD));

    let mut list_state = ListState::default();
    if !visible.is_empty() {
        list_state.select(Some(state.selected));
    }
    frame.render_stateful_widget(list, body[0], &mut list_state);

    let preview = match visible.get(state.selected) {
        Some(entry) => Paragraph::new(entry.text.clone())
            .style(colors.primary.to_ratatui())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(colors.border.to_ratatui())
                    .title(Span::styled(
                        format!(" {} ", entry.display_date()),
                        colors.accent.to_ratatui(),
                    )),
            ),
        None => Paragraph::new(Span::styled(
            if state.query.is_empty() {
                "No entries yet. Ctrl+N writes today's."
            } else {
                "Nothing matches the search."
            },
            colors.dimmed.to_ratatui(),
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(colors.border.to_ratatui()),
        ),
    }
    .wrap(Wrap { trim: false });
    frame.render_widget(preview, body[1]);

    let footer = if state.show_help {
        "Type to search • ↑↓=Select • Enter=Edit • Ctrl+N=Today • Ctrl+T=Theme • F1=Help • Esc=Quit"
            .to_string()
    } else {
        format!("{} theme • F1=Help", state.theme.name)
    };
    frame.render_widget(
        Paragraph::new(Span::styled(footer, colors.help_text.to_ratatui())),
        chunks[2],
    );
}
