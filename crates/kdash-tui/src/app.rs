//! Top-level application state and the main event loop.
//!
//! [`AppState`] is pure: it owns the [`Store`], the filter states and the
//! widget states, and turns [`AppEvent`]s into state changes plus the odd
//! [`Effect`] the shell must carry out (spawning loads). [`App::run`] sets up
//! the terminal, drains loader completions each frame, drives the crossterm
//! event loop, and tears everything down cleanly on exit or panic.

use crate::{
    commands::execute_command,
    event::{self, AppEvent, Keymap},
    theme::Theme,
    widgets::{
        command_bar::{CommandBar, CommandBarState, CommandInput},
        cursor::ListCursor,
        detail::DetailPopup,
        help::HelpPopup,
        query_bar::{QueryBar, QueryBarState},
        record_list::RecordList,
        rows,
        stats_bar::StatsBar,
        tab_bar::TabBar,
    },
};
use chrono::{Local, NaiveDateTime};
use crossterm::{
    event::{self as ct_event, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use kdash_core::{
    config::Config,
    filter::{
        self,
        agenda::{agenda_view, AgendaQuery},
        news::{NewsStep, NewsView},
        DecisionFilter, DecisionView, FilterAction, FilterState,
    },
    locale,
    stats::Periods,
    Category, LoadEvent, Record, RegionState, Store,
};
use kdash_feeds::{FeedSource, Loader};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    Frame, Terminal,
};
use std::{io, time::Duration};
use tokio::sync::mpsc::{error::TryRecvError, UnboundedReceiver};

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

/// The three list panes of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Decisions,
    Agendas,
    News,
}

impl Pane {
    fn next(self) -> Self {
        match self {
            Pane::Decisions => Pane::Agendas,
            Pane::Agendas => Pane::News,
            Pane::News => Pane::Decisions,
        }
    }

    fn index(self) -> usize {
        match self {
            Pane::Decisions => 0,
            Pane::Agendas => 1,
            Pane::News => 2,
        }
    }

    fn search_title(self) -> &'static str {
        match self {
            Pane::Decisions => " Hae päätöksistä ",
            Pane::Agendas => " Hae kokouksista ",
            Pane::News => " Hae uutisista ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Pane(Pane),
    /// Typing into the search field of a pane.
    Query(Pane),
    /// Vim-style `:` command line is active.
    Command,
}

/// Work the event loop must do on behalf of the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Restart every dashboard load.
    Reload,
    /// Fetch a larger page of one news topic.
    RefetchNews { topic: String, limit: usize },
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub store: Store,
    pub filter: FilterState,
    pub agenda: AgendaQuery,
    pub topics: Vec<String>,
    pub topic: usize,
    pub focus: Focus,
    /// Focus state before entering command mode, restored on exit.
    pub prev_focus: Focus,
    pub decisions_query: QueryBarState,
    pub agenda_query: QueryBarState,
    pub news_query: QueryBarState,
    pub decision_cursor: ListCursor,
    pub agenda_cursor: ListCursor,
    pub news_cursor: ListCursor,
    /// Record shown in the detail popup.
    pub detail: Option<Record>,
    pub theme: Theme,
    pub config: Config,
    pub keymap: Keymap,
    pub show_help: bool,
    pub command_bar: CommandBarState,
    pub quit: bool,
    /// Fixed clock for tests; `None` reads local time.
    pub clock: Option<NaiveDateTime>,
}

impl AppState {
    pub fn new(config: Config, theme: Theme) -> Self {
        let store = Store::new(
            &config.news.topics,
            config.news.page_size,
            Periods::from(&config.stats),
        );
        let agenda = AgendaQuery {
            limit: config.dashboard.agenda_limit,
            year_floor: config.dashboard.past_agenda_year_floor,
            ..AgendaQuery::default()
        };
        Self {
            store,
            filter: FilterState::new(config.dashboard.decisions_page_size),
            agenda,
            topics: config.news.topics.clone(),
            topic: 0,
            focus: Focus::Pane(Pane::Decisions),
            prev_focus: Focus::Pane(Pane::Decisions),
            decisions_query: QueryBarState::default(),
            agenda_query: QueryBarState::default(),
            news_query: QueryBarState::default(),
            decision_cursor: ListCursor::default(),
            agenda_cursor: ListCursor::default(),
            news_cursor: ListCursor::default(),
            detail: None,
            keymap: Keymap::from_config(&config.keybindings),
            theme,
            config,
            show_help: false,
            command_bar: CommandBarState::default(),
            quit: false,
            clock: None,
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.unwrap_or_else(|| Local::now().naive_local())
    }

    /// Apply one loader completion.
    pub fn apply_load(&mut self, event: LoadEvent) {
        let now = self.now();
        self.store.apply_at(event, now);
    }

    // -----------------------------------------------------------------------
    // Projections
    // -----------------------------------------------------------------------

    /// The pane that owns keyboard input right now.
    pub fn pane(&self) -> Pane {
        match (self.focus, self.prev_focus) {
            (Focus::Pane(p) | Focus::Query(p), _) => p,
            (Focus::Command, Focus::Pane(p) | Focus::Query(p)) => p,
            (Focus::Command, Focus::Command) => Pane::Decisions,
        }
    }

    pub fn current_topic(&self) -> Option<&str> {
        self.topics.get(self.topic).map(String::as_str)
    }

    pub fn decision_view(&self) -> DecisionView<'_> {
        filter::evaluate(self.store.decision_items(), &self.filter, self.now())
    }

    pub fn agenda_rows(&self) -> Vec<&Record> {
        agenda_view(self.store.records(Category::Agenda), &self.agenda, self.now())
    }

    pub fn news_view(&self) -> Option<NewsView<'_>> {
        let query = self.news_query.query.trim().to_lowercase();
        self.current_topic()
            .and_then(|t| self.store.news(t))
            .map(|feed| feed.view(&query))
    }

    fn row_count(&self, pane: Pane) -> usize {
        match pane {
            Pane::Decisions => self.decision_view().shown.len(),
            Pane::Agendas => self.agenda_rows().len(),
            Pane::News => self.news_view().map_or(0, |v| v.shown.len()),
        }
    }

    fn selected_record(&self, pane: Pane) -> Option<Record> {
        match pane {
            Pane::Decisions => {
                let view = self.decision_view();
                let idx = self.decision_cursor.selected(view.shown.len())?;
                Some(view.shown[idx].record.clone())
            }
            Pane::Agendas => {
                let rows = self.agenda_rows();
                let idx = self.agenda_cursor.selected(rows.len())?;
                Some(rows[idx].clone())
            }
            Pane::News => {
                let view = self.news_view()?;
                let idx = self.news_cursor.selected(view.shown.len())?;
                Some(view.shown[idx].clone())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Mutations used by events and commands
    // -----------------------------------------------------------------------

    pub fn set_decision_filter(&mut self, filter: DecisionFilter) {
        tracing::debug!(%filter, "decision filter");
        self.filter = self.filter.apply(FilterAction::SetFilter(filter));
        self.decision_cursor.reset();
    }

    pub fn select_topic(&mut self, topic: &str) -> Result<(), String> {
        let idx = self
            .topics
            .iter()
            .position(|t| t.eq_ignore_ascii_case(topic))
            .ok_or_else(|| format!("unknown topic: {topic}"))?;
        self.topic = idx;
        self.news_cursor.reset();
        tracing::debug!(topic, "news topic selected");
        Ok(())
    }

    fn next_topic(&mut self) {
        if !self.topics.is_empty() {
            self.topic = (self.topic + 1) % self.topics.len();
            self.news_cursor.reset();
        }
    }

    /// Clear the search field of the current pane.
    pub fn clear_query(&mut self) {
        let pane = self.pane();
        self.query_mut(pane).clear();
        self.query_changed(pane);
    }

    fn query_mut(&mut self, pane: Pane) -> &mut QueryBarState {
        match pane {
            Pane::Decisions => &mut self.decisions_query,
            Pane::Agendas => &mut self.agenda_query,
            Pane::News => &mut self.news_query,
        }
    }

    fn query(&self, pane: Pane) -> &QueryBarState {
        match pane {
            Pane::Decisions => &self.decisions_query,
            Pane::Agendas => &self.agenda_query,
            Pane::News => &self.news_query,
        }
    }

    /// Push the text of a search field into the pane's filter state.
    fn query_changed(&mut self, pane: Pane) {
        match pane {
            Pane::Decisions => {
                let action = if self.decisions_query.is_empty() {
                    FilterAction::ClearQuery
                } else {
                    FilterAction::SetQuery(self.decisions_query.query.clone())
                };
                self.filter = self.filter.apply(action);
                self.decision_cursor.reset();
            }
            Pane::Agendas => {
                self.agenda.search = self.agenda_query.query.trim().to_lowercase();
                self.agenda_cursor.reset();
            }
            Pane::News => self.news_cursor.reset(),
        }
    }

    fn cursor_mut(&mut self, pane: Pane) -> &mut ListCursor {
        match pane {
            Pane::Decisions => &mut self.decision_cursor,
            Pane::Agendas => &mut self.agenda_cursor,
            Pane::News => &mut self.news_cursor,
        }
    }

    fn show_more(&mut self, pane: Pane) -> Option<Effect> {
        match pane {
            Pane::Decisions => {
                self.filter = self.filter.apply(FilterAction::ShowMore);
                None
            }
            Pane::Agendas => None,
            Pane::News => {
                let topic = self.current_topic()?.to_string();
                match self.store.news_mut(&topic)?.show_more() {
                    NewsStep::Render => None,
                    NewsStep::Refetch { limit } => Some(Effect::RefetchNews { topic, limit }),
                }
            }
        }
    }

    fn show_less(&mut self, pane: Pane) {
        if pane != Pane::News {
            return;
        }
        if let Some(topic) = self.current_topic().map(str::to_string) {
            if let Some(feed) = self.store.news_mut(&topic) {
                feed.show_less();
                self.news_cursor.reset();
            }
        }
    }

    // -----------------------------------------------------------------------
    // Event dispatch
    // -----------------------------------------------------------------------

    pub fn handle(&mut self, event: AppEvent) -> Option<Effect> {
        // Help popup intercepts all events; only close keys pass through.
        if self.show_help {
            if matches!(event, AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit) {
                tracing::debug!("help popup closed");
                self.show_help = false;
            }
            return None;
        }

        if self.detail.is_some() {
            if matches!(event, AppEvent::Escape | AppEvent::Enter | AppEvent::Quit) {
                tracing::debug!("detail popup closed");
                self.detail = None;
            }
            return None;
        }

        match self.focus {
            Focus::Command => self.handle_command_bar(event),
            Focus::Query(pane) => {
                self.handle_query_bar(pane, event);
                None
            }
            Focus::Pane(pane) => self.handle_pane(pane, event),
        }
    }

    fn handle_command_bar(&mut self, event: AppEvent) -> Option<Effect> {
        match self.command_bar.handle(&event) {
            CommandInput::Editing => None,
            CommandInput::Cancelled => {
                self.focus = self.prev_focus;
                None
            }
            CommandInput::Submit(cmd) => {
                self.focus = self.prev_focus;
                let effect = execute_command(self, cmd);
                if self.command_bar.error.is_some() {
                    // Keep the bar open so the error stays visible.
                    self.focus = Focus::Command;
                }
                effect
            }
        }
    }

    fn handle_query_bar(&mut self, pane: Pane, event: AppEvent) {
        match event {
            AppEvent::Quit => self.quit = true,
            AppEvent::Escape => {
                tracing::debug!(?pane, "query cleared");
                self.query_mut(pane).clear();
                self.query_changed(pane);
                self.focus = Focus::Pane(pane);
            }
            AppEvent::Enter | AppEvent::FocusNext => {
                self.focus = Focus::Pane(pane);
            }
            other => {
                if self.query_mut(pane).handle(&other) {
                    self.query_changed(pane);
                }
            }
        }
    }

    fn handle_pane(&mut self, pane: Pane, event: AppEvent) -> Option<Effect> {
        match event {
            AppEvent::Char('?') => {
                tracing::debug!("help popup opened");
                self.show_help = true;
            }
            AppEvent::Char(':') => {
                tracing::debug!(prev_focus = ?self.focus, "entering command mode");
                self.prev_focus = self.focus;
                self.command_bar.clear();
                self.focus = Focus::Command;
            }
            AppEvent::Quit => {
                tracing::debug!("quit");
                self.quit = true;
            }
            AppEvent::Escape => {
                if !self.query(pane).is_empty() {
                    self.clear_query();
                }
            }
            AppEvent::FocusNext => {
                let next = pane.next();
                tracing::debug!(from = ?pane, to = ?next, "focus cycle");
                self.focus = Focus::Pane(next);
            }
            AppEvent::QueryFocus => {
                tracing::debug!(?pane, "focus -> query bar");
                self.focus = Focus::Query(pane);
            }
            AppEvent::Nav(_) | AppEvent::ScrollUp | AppEvent::ScrollDown => {
                let len = self.row_count(pane);
                self.cursor_mut(pane).handle(&event, len);
            }
            AppEvent::ShowMore => return self.show_more(pane),
            AppEvent::ShowLess => self.show_less(pane),
            AppEvent::NextFilter => self.set_decision_filter(self.filter.filter.next()),
            AppEvent::NextAgendaFilter => {
                self.agenda.filter = self.agenda.filter.next();
                self.agenda_cursor.reset();
            }
            AppEvent::NextTopic => self.next_topic(),
            AppEvent::Reload => {
                tracing::info!("reload requested");
                self.store.begin_reload();
                return Some(Effect::Reload);
            }
            AppEvent::Enter => {
                self.detail = self.selected_record(pane);
            }
            // Terminal resize is handled automatically by ratatui
            AppEvent::Resize(_, _) | AppEvent::Char(_) | AppEvent::Backspace => {}
        }
        None
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App<S> {
    state: AppState,
    loader: Loader<S>,
    rx: UnboundedReceiver<LoadEvent>,
}

impl<S: FeedSource + 'static> App<S> {
    pub fn new(state: AppState, loader: Loader<S>, rx: UnboundedReceiver<LoadEvent>) -> Self {
        Self { state, loader, rx }
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    ///
    /// Must be called inside a tokio runtime context; the loader spawns its
    /// tasks there.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        self.loader.spawn_dashboard();
        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            self.drain();
            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                let app_event = match ct_event::read()? {
                    Event::Key(key) if key.kind == crossterm::event::KeyEventKind::Press => {
                        let raw = Event::Key(key);
                        // Use insert-mode mapping when a text widget is focused
                        if is_insert_mode(self.state.focus) {
                            event::to_app_event_insert(raw)
                        } else {
                            event::to_app_event(raw, &self.state.keymap)
                        }
                    }
                    Event::Key(_) => None,
                    other => event::to_app_event(other, &self.state.keymap),
                };
                if let Some(ev) = app_event {
                    tracing::debug!(focus = ?self.state.focus, event = ?ev, "key event");
                    if let Some(effect) = self.state.handle(ev) {
                        self.run_effect(effect);
                    }
                }
            }
        }
        Ok(())
    }

    /// Apply every completion that arrived since the last frame.
    fn drain(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.state.apply_load(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("load channel closed");
                    break;
                }
            }
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        tracing::debug!(?effect, "running effect");
        match effect {
            Effect::Reload => {
                self.loader.spawn_dashboard();
            }
            Effect::RefetchNews { topic, limit } => {
                self.loader.spawn_news_refetch(&topic, limit);
            }
        }
    }
}

/// Returns true when the current focus is on a text-input widget, meaning
/// alphabetic keys should produce characters rather than trigger shortcuts.
fn is_insert_mode(focus: Focus) -> bool {
    matches!(focus, Focus::Query(_) | Focus::Command)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Placeholder for the decisions pane, which merges two regions.
fn decisions_placeholder<'a>(state: &'a AppState, view: &DecisionView<'_>) -> Option<&'a str> {
    if !view.is_empty() {
        return None;
    }
    let store = &state.store;
    match (store.region(Category::Decision), store.region(Category::Meeting)) {
        (RegionState::Failed(msg), _) => Some(msg.as_str()),
        (RegionState::Loading, _) | (_, RegionState::Loading) => Some(locale::LOADING_DECISIONS),
        _ if !state.filter.query.is_empty() => Some(locale::NO_RESULTS),
        _ => Some(locale::NO_DECISIONS),
    }
}

fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let theme = &state.theme;

    // Vertical: 1-line tab bar | stats | body | 3-line query bar
    let vert = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(3),
    ])
    .split(area);

    let pct = state.config.ui.side_pane_width_pct.min(90);
    let horiz = Layout::horizontal([Constraint::Fill(1), Constraint::Percentage(pct)])
        .split(vert[2]);
    let side = Layout::vertical([Constraint::Percentage(50), Constraint::Fill(1)]).split(horiz[1]);

    let topic = state.current_topic().unwrap_or_default();
    let labels = [
        format!("Päätökset {}", locale::count_badge(state.store.total_count())),
        "Kokoukset".to_string(),
        format!("Uutiset: {topic}"),
    ];
    let active = match state.focus {
        Focus::Pane(p) => Some(p.index()),
        _ => None,
    };
    frame.render_widget(TabBar::new(&labels, active, theme), vert[0]);
    frame.render_widget(StatsBar::new(state.store.stats(), theme), vert[1]);

    let pane = state.pane();

    // Decisions
    let view = state.decision_view();
    let decision_rows = view
        .shown
        .iter()
        .map(|shown| rows::decision_row(shown, state.config.ui.show_dates, theme))
        .collect();
    let mut footer = Vec::new();
    if view.show_more {
        footer.push(Line::from(Span::styled(
            format!("+ Näytä lisää ({} lisää)", view.hidden()),
            theme.hint,
        )));
    }
    if let (RegionState::Failed(msg), false) = (state.store.region(Category::Meeting), view.is_empty()) {
        footer.push(Line::from(Span::styled(msg.clone(), theme.placeholder)));
    }
    frame.render_widget(
        RecordList::new(
            format!(" Päätökset · {} ", state.filter.filter.label()),
            decision_rows,
            state.decision_cursor,
            state.focus == Focus::Pane(Pane::Decisions),
            theme,
        )
        .placeholder(decisions_placeholder(state, &view))
        .footer(footer),
        horiz[0],
    );

    // Agendas
    let agendas = state.agenda_rows();
    let agenda_placeholder = match state.store.placeholder(Category::Agenda) {
        Some(text) => Some(text),
        None if agendas.is_empty() => Some(locale::NO_MEETINGS),
        None => None,
    };
    frame.render_widget(
        RecordList::new(
            format!(" Kokoukset · {} ", state.agenda.filter.label()),
            agendas.iter().map(|r| rows::agenda_row(r, theme)).collect(),
            state.agenda_cursor,
            state.focus == Focus::Pane(Pane::Agendas),
            theme,
        )
        .placeholder(agenda_placeholder),
        side[0],
    );

    // News
    let news_query = state.news_query.query.trim().to_lowercase();
    let news = state.news_view();
    let (news_rows, news_footer, news_empty): (Vec<Line<'static>>, Vec<Line<'static>>, bool) =
        match &news {
        Some(view) => (
            view.shown
                .iter()
                .map(|r| rows::news_row(r, &news_query, theme))
                .collect(),
            rows::news_footer(view, theme),
            view.is_empty(),
        ),
        None => (Vec::new(), Vec::new(), true),
    };
    let news_placeholder = match state.store.news_region(topic) {
        RegionState::Loading => Some(locale::LOADING),
        RegionState::Failed(msg) => Some(msg.as_str()),
        _ if news_empty && !news_query.is_empty() => Some(locale::NO_RESULTS),
        _ if news_empty => Some(locale::NO_NEWS),
        _ => None,
    };
    frame.render_widget(
        RecordList::new(
            format!(" Uutiset · {topic} "),
            news_rows,
            state.news_cursor,
            state.focus == Focus::Pane(Pane::News),
            theme,
        )
        .placeholder(news_placeholder)
        .footer(news_footer),
        side[1],
    );

    // Search field of the current pane
    let query_focused = matches!(state.focus, Focus::Query(_));
    let query = QueryBar::new(pane.search_title(), state.query(pane), query_focused, theme);
    let (cx, cy) = query.cursor_position(vert[3]);
    frame.render_widget(query, vert[3]);

    if let Some(record) = &state.detail {
        frame.render_widget(DetailPopup::new(record, theme), area);
    }

    if state.show_help {
        frame.render_widget(HelpPopup::new(&state.keymap, theme), area);
    }

    // Command bar overlays the bottom row of the screen
    if state.focus == Focus::Command {
        let cmd_area = Rect {
            y: area.bottom().saturating_sub(1),
            height: 1,
            ..area
        };
        frame.render_widget(CommandBar::new(&state.command_bar, theme), cmd_area);
        let col = state.command_bar.cursor_col(cmd_area);
        frame.set_cursor_position((col, cmd_area.y));
        return;
    }

    if query_focused {
        frame.set_cursor_position((cx, cy));
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
