use crate::catalog::{Catalog, Creature, SortKey};
use crate::roster::Roster;
use crate::traits::{classify_trait, TraitKind};
use crate::xp::MAX_XP;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use tracing::info;

const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Catalog,
    Team,
}

impl Pane {
    pub fn next(&self) -> Self {
        match self {
            Pane::Catalog => Pane::Team,
            Pane::Team => Pane::Catalog,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Pane::Catalog => "Select Creatures",
            Pane::Team => "Your Team",
        }
    }
}

pub struct App {
    pub catalog: Catalog,
    /// Catalog rows in current sort order
    pub view: Vec<Creature>,
    pub roster: Roster,
    pub catalog_state: TableState,
    pub team_state: TableState,
    pub focus: Pane,
    /// `None` shows the catalog in dataset order
    pub sort_key: Option<SortKey>,
    pub sort_descending: bool,
    pub show_detail: bool,
}

impl App {
    pub fn new(catalog: Catalog) -> Self {
        let mut app = Self {
            catalog,
            view: Vec::new(),
            roster: Roster::new(),
            catalog_state: TableState::default(),
            team_state: TableState::default(),
            focus: Pane::Catalog,
            sort_key: None,
            sort_descending: false,
            show_detail: false,
        };
        app.resort();
        app
    }

    /// Handle one key press. Returns true when the app should quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::BackTab => self.focus = self.focus.next(),
            KeyCode::Char('i') => self.toggle_detail(),
            KeyCode::Char('s') => self.cycle_sort(),
            KeyCode::Char('r') => self.toggle_sort_direction(),
            KeyCode::Enter => match self.focus {
                Pane::Catalog => {
                    self.add_selected();
                }
                Pane::Team => {
                    self.remove_selected();
                }
            },
            KeyCode::Char('+') | KeyCode::Char('a') => {
                self.add_selected();
            }
            KeyCode::Char('-') | KeyCode::Char('d') | KeyCode::Delete => {
                self.remove_selected();
            }
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::PageDown => self.page_down(),
            KeyCode::PageUp => self.page_up(),
            KeyCode::Home => {
                if self.focused_len() > 0 {
                    self.focused_state().select(Some(0));
                }
            }
            KeyCode::End => {
                let len = self.focused_len();
                if len > 0 {
                    self.focused_state().select(Some(len - 1));
                }
            }
            _ => {}
        }
        false
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn selected_creature(&self) -> Option<&Creature> {
        self.catalog_state.selected().and_then(|i| self.view.get(i))
    }

    /// Add the highlighted catalog creature; no-op when the team pane has focus
    pub fn add_selected(&mut self) -> bool {
        if self.focus != Pane::Catalog {
            return false;
        }
        let Some(creature) = self.selected_creature().cloned() else {
            return false;
        };

        let added = self.roster.add(&creature);
        if added && self.team_state.selected().is_none() {
            self.team_state.select(Some(0));
        }
        added
    }

    /// Remove the highlighted team member.
    ///
    /// Removal goes by name, so with duplicates the earliest one leaves
    /// the team even if a later row is highlighted.
    pub fn remove_selected(&mut self) -> bool {
        if self.focus != Pane::Team {
            return false;
        }
        let Some(creature) = self
            .team_state
            .selected()
            .and_then(|i| self.roster.entries().get(i))
            .map(|entry| entry.creature.clone())
        else {
            return false;
        };

        let removed = self.roster.remove(&creature);

        let len = self.roster.len();
        match self.team_state.selected() {
            _ if len == 0 => self.team_state.select(None),
            Some(i) if i >= len => self.team_state.select(Some(len - 1)),
            _ => {}
        }
        removed
    }

    pub fn is_affordable(&self, creature: &Creature) -> bool {
        self.roster.can_add(creature)
    }

    pub fn cycle_sort(&mut self) {
        self.sort_key = SortKey::cycle(self.sort_key);
        self.sort_descending = false;
        self.resort();
    }

    pub fn toggle_sort_direction(&mut self) {
        self.sort_descending = !self.sort_descending;
        self.resort();
    }

    fn resort(&mut self) {
        self.view = self
            .catalog
            .sorted(self.sort_key, self.sort_descending)
            .into_iter()
            .cloned()
            .collect();

        // Reset selection to first item
        if !self.view.is_empty() {
            self.catalog_state.select(Some(0));
        } else {
            self.catalog_state.select(None);
        }
    }

    fn focused_len(&self) -> usize {
        match self.focus {
            Pane::Catalog => self.view.len(),
            Pane::Team => self.roster.len(),
        }
    }

    fn focused_state(&mut self) -> &mut TableState {
        match self.focus {
            Pane::Catalog => &mut self.catalog_state,
            Pane::Team => &mut self.team_state,
        }
    }

    pub fn next(&mut self) {
        let len = self.focused_len();
        if len == 0 {
            return;
        }
        let state = self.focused_state();
        let i = match state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.focused_len();
        if len == 0 {
            return;
        }
        let state = self.focused_state();
        let i = match state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.focused_len();
        if len == 0 {
            return;
        }
        let state = self.focused_state();
        let i = match state.selected() {
            Some(i) => (i + PAGE_SIZE).min(len - 1),
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.focused_len() == 0 {
            return;
        }
        let state = self.focused_state();
        let i = state.selected().map(|i| i.saturating_sub(PAGE_SIZE)).unwrap_or(0);
        state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!(creatures = app.catalog.len(), "starting encounter builder UI");
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.handle_key(key.code) {
                return Ok(());
            }
        }
    }
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with XP counter
            Constraint::Min(0),    // Catalog + team
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[1]);

    if app.show_detail {
        render_detail_panel(f, content_chunks[0], app);
    } else {
        render_catalog(f, content_chunks[0], app);
    }
    render_team(f, content_chunks[1], app);

    render_status_bar(f, chunks[2], app);
}

fn pane_border(app: &App, pane: Pane) -> Style {
    if app.focus == pane {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let remaining = app.roster.remaining_xp();
    let remaining_color = if remaining > 0 { Color::Green } else { Color::Red };

    let spans = vec![
        Span::styled(
            "Encounter Builder",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled("XP Available: ", Style::default().fg(Color::White)),
        Span::styled(
            format!("{} / {}", remaining, MAX_XP),
            Style::default()
                .fg(remaining_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Team: {}", app.roster.len()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Catalog: {}", app.catalog.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn trait_style(kind: TraitKind) -> Style {
    let bg = match kind {
        TraitKind::Alignment => Color::Rgb(0x42, 0x87, 0xf5),
        TraitKind::Size => Color::Rgb(0x47, 0x8c, 0x42),
        TraitKind::Rarity => Color::Rgb(0xc4, 0x55, 0x00),
        TraitKind::Other => Color::Rgb(0x52, 0x2e, 0x2c),
    };
    Style::default().fg(Color::White).bg(bg)
}

fn trait_line(traits: &[String]) -> Line<'_> {
    let mut spans = Vec::with_capacity(traits.len() * 2);
    for (i, name) in traits.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(name.as_str(), trait_style(classify_trait(name))));
    }
    Line::from(spans)
}

fn render_catalog(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Name", "Traits", "Level", "XP Cost", ""].iter().map(|h| {
        let label = if app.sort_key.is_some_and(|key| *h == key.title()) {
            let arrow = if app.sort_descending { " ▼" } else { " ▲" };
            format!("{}{}", h, arrow)
        } else {
            h.to_string()
        };
        Cell::from(label).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let roster = &app.roster;
    let rows: Vec<Row> = app
        .view
        .iter()
        .map(|creature| {
            let affordable = roster.can_add(creature);
            let (marker, marker_style) = if affordable {
                ("+", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            } else {
                ("·", Style::default().fg(Color::DarkGray))
            };
            let row_style = if affordable {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            };

            Row::new(vec![
                Cell::from(truncate(&creature.name, 28)),
                Cell::from(trait_line(creature.trait_list())),
                Cell::from(format!("{:>5}", creature.level)),
                Cell::from(format!("{:>7}", creature.xp_cost())),
                Cell::from(marker).style(marker_style),
            ])
            .style(row_style)
            .height(1)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(30),
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(2),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(pane_border(app, Pane::Catalog))
            .title(format!(" {} ", Pane::Catalog.title())),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.catalog_state);
}

fn render_team(f: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(pane_border(app, Pane::Team))
        .title(format!(" {} ", Pane::Team.title()));

    if app.roster.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Add creatures to your team.",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )),
        ])
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = app
        .roster
        .entries()
        .iter()
        .map(|entry| {
            Row::new(vec![
                Cell::from(truncate(entry.name(), 24)),
                Cell::from(format!("{:>4} XP", entry.xp_cost())),
            ])
            .height(1)
        })
        .collect();

    let table = Table::new(rows, [Constraint::Min(10), Constraint::Length(8)])
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.team_state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let (selected, total) = match app.focus {
        Pane::Catalog => (app.catalog_state.selected(), app.view.len()),
        Pane::Team => (app.team_state.selected(), app.roster.len()),
    };
    let selected = selected.map(|i| i + 1).unwrap_or(0);

    let key = Style::default().fg(Color::Yellow);
    let status_spans = vec![
        Span::styled(
            format!(" {}: {}/{} ", app.focus.title(), selected, total),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | "),
        Span::styled("Enter", key),
        Span::raw(match app.focus {
            Pane::Catalog => " Add | ",
            Pane::Team => " Remove | ",
        }),
        Span::styled("Tab", key),
        Span::raw(" Pane | "),
        Span::styled("s", key),
        Span::raw(format!(
            " Sort ({}) | ",
            app.sort_key.map(|key| key.title()).unwrap_or("file order")
        )),
        Span::styled("r", key),
        Span::raw(" Reverse | "),
        Span::styled("i", key),
        Span::raw(" Info | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Creature Details ");

    let Some(creature) = app.selected_creature() else {
        f.render_widget(Paragraph::new("No creature selected").block(block), area);
        return;
    };

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let affordable = app.is_affordable(creature);

    let mut content = vec![
        Line::from(""),
        Line::from(vec![Span::styled("  Name: ", label), Span::raw(&creature.name)]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Level: ", label),
            Span::raw(creature.level.to_string()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  XP Cost: ", label),
            Span::styled(
                creature.xp_cost().to_string(),
                Style::default().fg(if affordable { Color::Green } else { Color::Red }),
            ),
        ]),
        Line::from(""),
    ];

    let mut traits = vec![Span::styled("  Traits: ", label)];
    traits.extend(trait_line(creature.trait_list()).spans);
    content.push(Line::from(traits));
    content.push(Line::from(""));

    if let Some(link) = &creature.link {
        content.push(Line::from(vec![
            Span::styled("  Source: ", label),
            Span::styled(link.as_str(), Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED)),
        ]));
        content.push(Line::from(""));
    }

    content.push(Line::from(Span::styled(
        "  Press i to close",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )));

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
