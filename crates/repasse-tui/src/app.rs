use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use repasse_core::coordinator::{Applied, Coordinator};
use repasse_core::history::HistoryCache;
use repasse_core::model::LookupRequest;
use repasse_core::render::ResultCard;
use repasse_core::service::MunicipalityService;
use repasse_core::session::{SearchTicket, TextChange};

use crate::action::{Action, FocusTarget};
use crate::component::Component;
use crate::components::history_panel::HistoryPanel;
use crate::components::log_panel::LogPanel;
use crate::components::popup::render_message_popup;
use crate::components::query_form::QueryForm;
use crate::components::result_panel::ResultPanel;
use crate::components::search_panel::SearchPanel;
use crate::components::status_bar::StatusBar;
use crate::config::AppConfig;
use crate::event::{self, AppEvent};
use crate::focus::FocusManager;
use crate::keymap::Keymap;
use crate::theme::Theme;
use crate::tui;

/// Main application state.
pub struct App {
    config: AppConfig,
    should_quit: bool,
    coordinator: Coordinator,
    service: Arc<dyn MunicipalityService>,
    keymap: Keymap,
    theme: Theme,
    focus: FocusManager,

    // Components
    search_panel: SearchPanel,
    query_form: QueryForm,
    result_panel: ResultPanel,
    history_panel: HistoryPanel,
    status_bar: StatusBar,
    log_panel: LogPanel,
    validation_message: Option<String>,
    confirm_clear: bool,

    // Layout areas for mouse hit-testing
    search_area: Option<Rect>,
    dropdown_area: Option<Rect>,
    form_area: Option<Rect>,
    history_area: Option<Rect>,

    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(
        config: AppConfig,
        service: Arc<dyn MunicipalityService>,
        history: HistoryCache,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let theme = Theme::load(&config.general.theme);
        let keymap = Keymap::from_config(&config.keybindings);
        let coordinator = Coordinator::new(config.search.to_settings(), history);
        let today = chrono::Local::now().date_naive();

        let mut app = Self {
            should_quit: false,
            coordinator,
            service,
            focus: FocusManager::new(),
            search_panel: SearchPanel::new(theme.clone()),
            query_form: QueryForm::new(theme.clone(), today),
            result_panel: ResultPanel::new(theme.clone()),
            history_panel: HistoryPanel::new(theme.clone()),
            status_bar: StatusBar::new(theme.clone(), &keymap, &config.api.base_url),
            log_panel: LogPanel::new(theme.clone()),
            validation_message: None,
            confirm_clear: false,
            search_area: None,
            dropdown_area: None,
            form_area: None,
            history_area: None,
            keymap,
            theme,
            config,
            action_tx,
            action_rx,
        };

        if app.config.first_launch {
            if let Some(path) = AppConfig::default_path() {
                app.status_bar
                    .set_message(format!("Usando padrões; crie {} para configurar", path.display()));
            }
        }
        app.sync_views();
        app
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        tui::install_panic_hook();
        let mut terminal = tui::init()?;
        let outcome = self.event_loop(&mut terminal);
        tui::restore()?;
        outcome
    }

    fn event_loop(&mut self, terminal: &mut tui::Tui) -> anyhow::Result<()> {
        let tick_rate = self.config.tick_rate();

        loop {
            // Render
            terminal.draw(|frame| self.render(frame))?;

            // Wake up in time for a pending debounce deadline
            let timeout = self
                .coordinator
                .search_due_in(Instant::now())
                .map_or(tick_rate, |due| due.min(tick_rate));

            // Poll for events
            if let Some(app_event) = event::poll_event(timeout) {
                let action = match app_event {
                    AppEvent::Key(key) => self.handle_key(key),
                    AppEvent::Mouse(mouse) => self.handle_mouse(mouse),
                    AppEvent::Paste(text) => self.handle_paste(&text),
                    AppEvent::Resize(w, h) => Action::Resize(w, h),
                    AppEvent::Tick => Action::Tick,
                };
                if !matches!(action, Action::None) {
                    let _ = self.action_tx.send(action);
                }
            }

            // Process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(action);
            }

            self.poll_search();

            if self.should_quit {
                return Ok(());
            }
        }
    }

    fn modal_open(&self) -> bool {
        self.validation_message.is_some() || self.confirm_clear
    }

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        // Popups are modal
        if self.confirm_clear {
            return match key.code {
                KeyCode::Enter | KeyCode::Char('s') | KeyCode::Char('y') => {
                    Action::ConfirmClearHistory
                }
                KeyCode::Esc | KeyCode::Char('n') => Action::ClosePopup,
                _ => Action::None,
            };
        }
        if self.validation_message.is_some() {
            return match key.code {
                KeyCode::Enter | KeyCode::Esc => Action::ClosePopup,
                _ => Action::None,
            };
        }

        let global = self.keymap.resolve(&key);

        if self.log_panel.visible {
            if matches!(global, Action::ToggleLogPanel | Action::Quit) {
                return global;
            }
            return self.log_panel.handle_key_event(key);
        }

        if !matches!(global, Action::None) {
            return global;
        }

        match self.focus.current() {
            FocusTarget::Search => self.search_panel.handle_key_event(key),
            target @ (FocusTarget::PeriodStart | FocusTarget::PeriodEnd | FocusTarget::Submit) => {
                self.query_form.handle_key_event(target, key)
            }
            FocusTarget::History => self.history_panel.handle_key_event(key),
        }
    }

    fn handle_paste(&mut self, text: &str) -> Action {
        if self.modal_open() || self.log_panel.visible {
            return Action::None;
        }
        match self.focus.current() {
            FocusTarget::Search => self.search_panel.paste(text),
            target @ (FocusTarget::PeriodStart | FocusTarget::PeriodEnd) => {
                self.query_form.paste(target, text);
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Action {
        // Popups block mouse events
        if self.modal_open() || self.log_panel.visible {
            return Action::None;
        }

        let pos = Rect::new(mouse.column, mouse.row, 1, 1);
        let over_dropdown = self.dropdown_area.filter(|d| d.intersects(pos));

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                // The dropdown overlays the panels below the field
                if let Some(dropdown) = over_dropdown {
                    return match self.search_panel.suggestion_at(dropdown, mouse.row) {
                        Some(index) => Action::SelectSuggestion(index),
                        None => Action::None,
                    };
                }

                if self.search_area.is_some_and(|a| a.intersects(pos)) {
                    return Action::FocusPanel(FocusTarget::Search);
                }

                if let Some(form) = self.form_area {
                    match QueryForm::target_at(form, pos) {
                        Some(FocusTarget::Submit) => {
                            let _ = self.action_tx.send(Action::FocusPanel(FocusTarget::Submit));
                            return Action::Submit;
                        }
                        Some(target) => return Action::FocusPanel(target),
                        None => {}
                    }
                }

                if let Some(history) = self.history_area {
                    if history.intersects(pos) {
                        let _ = self.action_tx.send(Action::FocusPanel(FocusTarget::History));
                        return match self.history_panel.entry_at(history, mouse.row) {
                            Some(index) => {
                                self.history_panel.select(index);
                                Action::Replay(index)
                            }
                            None => Action::None,
                        };
                    }
                }

                // Anywhere else closes the list without moving focus
                Action::DismissSuggestions
            }
            MouseEventKind::ScrollDown if over_dropdown.is_some() => Action::SuggestionNext,
            MouseEventKind::ScrollUp if over_dropdown.is_some() => Action::SuggestionPrev,
            _ => Action::None,
        }
    }

    fn process_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                info!("quit requested");
                self.should_quit = true;
            }
            Action::Tick => self.query_form.tick(),
            Action::Resize(_, _) | Action::None => {}

            // Focus
            Action::FocusNext => {
                self.focus.next();
                self.on_focus_changed();
            }
            Action::FocusPrev => {
                self.focus.prev();
                self.on_focus_changed();
            }
            Action::FocusPanel(target) => {
                self.focus.set(target);
                self.on_focus_changed();
            }

            // Search
            Action::SearchTextChanged(text) => {
                if self.coordinator.text_changed(text, Instant::now()) == TextChange::TooShort {
                    debug!("search text too short, list closed");
                }
            }
            Action::SuggestionsLoaded { token, outcome } => {
                if let Err(e) = &outcome {
                    warn!("search #{} failed: {}", token, e);
                }
                match self.coordinator.apply_suggestions(token, outcome) {
                    Applied::Shown(n) => {
                        debug!("search #{}: {} suggestions", token, n);
                        // Answer arrived after the user moved on; keep it for refocus
                        if !self.focus.is_focused(FocusTarget::Search) {
                            self.coordinator.dismiss_suggestions();
                        }
                    }
                    Applied::Closed => debug!("search #{}: no suggestions", token),
                    Applied::Stale => debug!("search #{}: stale response dropped", token),
                }
            }
            Action::SuggestionNext => self.coordinator.highlight_next(),
            Action::SuggestionPrev => self.coordinator.highlight_prev(),
            Action::SelectSuggestion(index) => {
                let chosen = self.coordinator.select(index).map(|c| (c.label(), c.code));
                self.report_selection(chosen);
            }
            Action::SelectHighlighted => {
                let chosen = self
                    .coordinator
                    .select_highlighted()
                    .map(|c| (c.label(), c.code));
                self.report_selection(chosen);
            }
            Action::DismissSuggestions => self.coordinator.dismiss_suggestions(),

            // Lookup
            Action::Submit => self.submit(),
            Action::LookupFinished(outcome) => {
                let failure = outcome.as_ref().err().map(|e| e.to_string());
                self.coordinator.finish_submit(outcome);
                match failure {
                    Some(detail) => {
                        let _ = self
                            .action_tx
                            .send(Action::ErrorMessage(format!("Consulta falhou: {}", detail)));
                    }
                    None => {
                        if let Some(result) = self.coordinator.last_displayed() {
                            let msg = format!("Consulta concluída: {}", result.summary());
                            let _ = self.action_tx.send(Action::StatusMessage(msg));
                        }
                    }
                }
            }

            // History
            Action::Replay(index) => {
                if let Some(result) = self.coordinator.replay(index) {
                    let msg = format!("Do histórico: {}", result.summary());
                    self.status_bar.set_message(msg);
                }
            }
            Action::ClearHistory => {
                self.confirm_clear = !self.coordinator.history().is_empty();
            }
            Action::ConfirmClearHistory => {
                self.confirm_clear = false;
                let msg = match self.coordinator.clear_history() {
                    Ok(()) => Action::StatusMessage("Histórico apagado".to_string()),
                    Err(e) => Action::ErrorMessage(format!("Falha ao gravar histórico: {}", e)),
                };
                let _ = self.action_tx.send(msg);
            }

            Action::CopyResult => self.copy_result(),

            // Log panel / popups
            Action::ToggleLogPanel => self.log_panel.toggle(),
            Action::ClosePopup => {
                self.validation_message = None;
                self.confirm_clear = false;
                self.log_panel.hide();
            }

            // Status
            Action::StatusMessage(msg) => {
                self.log_panel.push_info(msg.clone());
                self.status_bar.set_message(msg);
            }
            Action::ErrorMessage(msg) => {
                error!("{}", msg);
                self.log_panel.push_error(msg.clone());
                self.status_bar.set_error(msg);
            }
        }

        self.sync_views();
    }

    fn on_focus_changed(&mut self) {
        if self.focus.is_focused(FocusTarget::Search) {
            self.coordinator.focus_search();
        } else {
            self.coordinator.dismiss_suggestions();
        }
    }

    fn report_selection(&mut self, chosen: Option<(String, u32)>) {
        if let Some((label, code)) = chosen {
            let msg = format!("Selecionado: {} (código {})", label, code);
            let _ = self.action_tx.send(Action::StatusMessage(msg));
        }
    }

    fn submit(&mut self) {
        let outcome = self
            .coordinator
            .begin_submit(self.query_form.start.text(), self.query_form.end.text());
        match outcome {
            Ok(Some(request)) => self.spawn_lookup(request),
            Ok(None) => debug!("lookup already in flight, submit ignored"),
            Err(e) => {
                warn!("submission refused: {}", e);
                self.status_bar.set_error(e.to_string());
                self.validation_message = Some(e.to_string());
            }
        }
    }

    fn copy_result(&mut self) {
        let Some(result) = self.coordinator.last_displayed() else {
            let _ = self
                .action_tx
                .send(Action::StatusMessage("Nenhum resultado para copiar".to_string()));
            return;
        };
        let text = ResultCard::from(result).to_plain_text();
        let summary = result.summary();

        let msg = match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text)) {
            Ok(()) => Action::StatusMessage(format!("Copiado: {}", summary)),
            Err(e) => Action::ErrorMessage(format!("Erro na área de transferência: {}", e)),
        };
        let _ = self.action_tx.send(msg);
    }

    fn poll_search(&mut self) {
        if let Some(ticket) = self.coordinator.poll_search(Instant::now()) {
            self.spawn_search(ticket);
            self.sync_views();
        }
    }

    fn spawn_search(&self, ticket: SearchTicket) {
        debug!("search #{}: {:?}", ticket.token, ticket.term);
        let tx = self.action_tx.clone();
        let service = Arc::clone(&self.service);
        tokio::spawn(async move {
            let outcome = service.search(&ticket.term).await;
            let _ = tx.send(Action::SuggestionsLoaded {
                token: ticket.token,
                outcome,
            });
        });
    }

    fn spawn_lookup(&self, request: LookupRequest) {
        info!(
            "lookup {} ({}) {}..{}",
            request.name(),
            request.code(),
            request.start(),
            request.end()
        );
        let tx = self.action_tx.clone();
        let service = Arc::clone(&self.service);
        tokio::spawn(async move {
            let outcome = service.lookup(&request).await;
            let _ = tx.send(Action::LookupFinished(outcome));
        });
    }

    /// Copy coordinator state into the widgets that draw it.
    fn sync_views(&mut self) {
        self.search_panel.sync(&self.coordinator);
        self.query_form
            .set_submitting(self.coordinator.is_submitting());
        self.result_panel.set_view(self.coordinator.display());

        let history = self.coordinator.history();
        self.history_panel.sync(history);
        self.status_bar.set_history(history.len(), history.capacity());
    }

    fn render(&mut self, frame: &mut Frame) {
        let full = frame.area();
        let focus = self.focus.current();

        let rows = Layout::vertical([
            Constraint::Length(3), // search field
            Constraint::Length(3), // period + button
            Constraint::Min(5),    // result | history
            Constraint::Length(1), // status bar
        ])
        .split(full);
        let body = Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[2]);

        self.search_area = Some(rows[0]);
        self.form_area = Some(rows[1]);
        self.history_area = Some(body[1]);

        self.search_panel
            .render(frame, rows[0], focus == FocusTarget::Search);
        self.query_form.render(frame, rows[1], focus);
        self.result_panel.render(frame, body[0], false);
        self.history_panel
            .render(frame, body[1], focus == FocusTarget::History);
        self.status_bar.render(frame, rows[3], false);

        self.dropdown_area = self.search_panel.dropdown_area(rows[0], full);
        if let Some(area) = self.dropdown_area {
            self.search_panel.render_dropdown(frame, area);
        }

        self.log_panel.render(frame, full);

        if let Some(msg) = &self.validation_message {
            render_message_popup(frame, full, "Atenção", msg, "Enter/Esc: fechar", &self.theme);
        } else if self.confirm_clear {
            let message = format!(
                "Apagar as {} consultas do histórico? Esta ação não pode ser desfeita.",
                self.coordinator.history().len()
            );
            render_message_popup(
                frame,
                full,
                "Apagar histórico",
                &message,
                "s/Enter: apagar  n/Esc: cancelar",
                &self.theme,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use crossterm::event::KeyModifiers;
    use repasse_core::coordinator::ResultView;
    use repasse_core::error::CoreError;
    use repasse_core::model::{Candidate, LookupResult};

    use super::*;

    #[derive(Default)]
    struct FakeService {
        lookups: Mutex<Vec<LookupRequest>>,
    }

    #[async_trait]
    impl MunicipalityService for FakeService {
        async fn search(&self, term: &str) -> Result<Vec<Candidate>, CoreError> {
            Ok([
                Candidate::new(123, "Springfield", "IL"),
                Candidate::new(456, "Springfield", "MO"),
            ]
            .into_iter()
            .filter(|c| c.name.starts_with(term))
            .collect())
        }

        async fn lookup(&self, request: &LookupRequest) -> Result<LookupResult, CoreError> {
            self.lookups.lock().unwrap().push(request.clone());
            Ok(LookupResult {
                entity_label: format!("{} - {}", request.name(), request.region()),
                period_label: "01.01.2024 até 31.01.2024".to_string(),
                fpm: 10.0,
                royalties: 20.0,
                todos: 30.0,
            })
        }
    }

    fn app(service: Arc<FakeService>) -> App {
        let mut config = AppConfig::default();
        config.search.debounce_ms = 0;
        App::new(config, service, HistoryCache::in_memory(25))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Process whatever is queued without waiting.
    fn drain(app: &mut App) {
        while let Ok(action) = app.action_rx.try_recv() {
            app.process_action(action);
        }
    }

    /// Process actions until a spawned search or lookup reports back.
    async fn settle(app: &mut App) {
        loop {
            let action = app.action_rx.recv().await.unwrap();
            let done = matches!(
                action,
                Action::SuggestionsLoaded { .. } | Action::LookupFinished(_)
            );
            app.process_action(action);
            if done {
                break;
            }
        }
        drain(app);
    }

    async fn open_suggestions(app: &mut App) {
        app.process_action(Action::SearchTextChanged("Spring".to_string()));
        app.poll_search();
        settle(app).await;
        assert!(app.coordinator.suggestions().is_open());
    }

    #[tokio::test]
    async fn test_submit_without_selection_is_refused() {
        let service = Arc::new(FakeService::default());
        let mut app = app(service.clone());

        app.process_action(Action::Submit);
        assert!(app.validation_message.is_some());
        assert!(!app.coordinator.is_submitting());
        assert!(service.lookups.lock().unwrap().is_empty());

        // The popup swallows keys until dismissed
        assert!(matches!(app.handle_key(key(KeyCode::Char('a'))), Action::None));
        assert!(matches!(app.handle_key(key(KeyCode::Esc)), Action::ClosePopup));
        app.process_action(Action::ClosePopup);
        assert!(app.validation_message.is_none());
    }

    #[tokio::test]
    async fn test_select_then_submit_adds_history() {
        let service = Arc::new(FakeService::default());
        let mut app = app(service.clone());
        open_suggestions(&mut app).await;

        app.process_action(Action::SelectSuggestion(1));
        assert_eq!(app.coordinator.selection().map(|c| c.code), Some(456));
        assert_eq!(app.search_panel.input.text(), "Springfield - MO");

        app.process_action(Action::Submit);
        assert!(app.coordinator.is_submitting());
        assert!(app.query_form.is_submitting());

        // A second submit while in flight is ignored
        app.process_action(Action::Submit);
        settle(&mut app).await;

        assert_eq!(service.lookups.lock().unwrap().len(), 1);
        assert!(!app.coordinator.is_submitting());
        assert!(matches!(app.coordinator.display(), ResultView::Result(_)));
        assert_eq!(app.coordinator.history().len(), 1);
        assert_eq!(app.history_panel.selected(), Some(0));
    }

    #[tokio::test]
    async fn test_editing_clears_selection() {
        let mut app = app(Arc::new(FakeService::default()));
        open_suggestions(&mut app).await;
        app.process_action(Action::SelectSuggestion(0));
        assert!(app.coordinator.selection().is_some());

        app.focus.set(FocusTarget::Search);
        let action = app.handle_key(key(KeyCode::Backspace));
        app.process_action(action);
        assert!(app.coordinator.selection().is_none());
    }

    #[tokio::test]
    async fn test_outside_click_hides_and_refocus_reopens() {
        let mut app = app(Arc::new(FakeService::default()));
        open_suggestions(&mut app).await;

        app.search_area = Some(Rect::new(0, 0, 80, 3));
        app.dropdown_area = Some(Rect::new(0, 3, 80, 4));

        let action = app.handle_mouse(click(70, 20));
        assert!(matches!(action, Action::DismissSuggestions));
        app.process_action(action);
        assert!(!app.coordinator.suggestions().is_open());

        let action = app.handle_mouse(click(5, 1));
        assert!(matches!(action, Action::FocusPanel(FocusTarget::Search)));
        app.process_action(action);
        assert!(app.coordinator.suggestions().is_open());
    }

    #[tokio::test]
    async fn test_click_on_suggestion_selects_it() {
        let mut app = app(Arc::new(FakeService::default()));
        open_suggestions(&mut app).await;

        let dropdown = Rect::new(0, 3, 80, 4);
        app.dropdown_area = Some(dropdown);
        let action = app.handle_mouse(click(10, 5));
        assert!(matches!(action, Action::SelectSuggestion(1)));
        app.process_action(action);
        assert_eq!(app.coordinator.selection().map(|c| c.code), Some(456));
        assert!(!app.coordinator.suggestions().is_open());
    }

    #[tokio::test]
    async fn test_focus_away_hides_list() {
        let mut app = app(Arc::new(FakeService::default()));
        open_suggestions(&mut app).await;

        app.process_action(Action::FocusNext);
        assert_eq!(app.focus.current(), FocusTarget::PeriodStart);
        assert!(!app.coordinator.suggestions().is_open());

        app.process_action(Action::FocusPanel(FocusTarget::Search));
        assert!(app.coordinator.suggestions().is_open());
    }

    #[tokio::test]
    async fn test_copy_without_result_reports_status() {
        let mut app = app(Arc::new(FakeService::default()));
        app.process_action(Action::CopyResult);
        let queued = app.action_rx.try_recv().unwrap();
        assert!(matches!(queued, Action::StatusMessage(_)));
    }

    #[tokio::test]
    async fn test_replay_and_clear_history() {
        let mut app = app(Arc::new(FakeService::default()));
        open_suggestions(&mut app).await;
        app.process_action(Action::SelectSuggestion(0));
        app.process_action(Action::Submit);
        settle(&mut app).await;

        app.process_action(Action::Replay(0));
        assert!(matches!(app.coordinator.display(), ResultView::Result(r) if r.entity_label == "Springfield - IL"));

        app.process_action(Action::ClearHistory);
        assert!(app.confirm_clear);
        let action = app.handle_key(key(KeyCode::Char('s')));
        assert!(matches!(action, Action::ConfirmClearHistory));
        app.process_action(action);
        drain(&mut app);
        assert!(!app.confirm_clear);
        assert!(app.coordinator.history().is_empty());
        assert_eq!(app.history_panel.selected(), None);
        // The shown result stays copyable
        assert!(app.coordinator.last_displayed().is_some());
    }

    #[tokio::test]
    async fn test_clear_history_needs_confirmation() {
        let mut app = app(Arc::new(FakeService::default()));
        open_suggestions(&mut app).await;
        app.process_action(Action::SelectSuggestion(0));
        app.process_action(Action::Submit);
        settle(&mut app).await;

        app.focus.set(FocusTarget::History);
        let action = app.handle_key(key(KeyCode::Char('x')));
        assert!(matches!(action, Action::ClearHistory));
        app.process_action(action);
        assert!(app.confirm_clear);
        assert_eq!(app.coordinator.history().len(), 1);

        // Other keys and clicks are swallowed while asking
        assert!(matches!(app.handle_key(key(KeyCode::Char('x'))), Action::None));
        assert!(matches!(app.handle_mouse(click(5, 1)), Action::None));

        let action = app.handle_key(key(KeyCode::Esc));
        assert!(matches!(action, Action::ClosePopup));
        app.process_action(action);
        assert!(!app.confirm_clear);
        assert_eq!(app.coordinator.history().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_empty_history_asks_nothing() {
        let mut app = app(Arc::new(FakeService::default()));
        app.process_action(Action::ClearHistory);
        assert!(!app.confirm_clear);
    }

    #[tokio::test]
    async fn test_log_panel_captures_keys() {
        let mut app = app(Arc::new(FakeService::default()));
        app.process_action(Action::ToggleLogPanel);
        assert!(app.log_panel.visible);
        assert!(matches!(app.handle_key(key(KeyCode::Char('a'))), Action::None));
        assert!(matches!(app.handle_key(key(KeyCode::F(7))), Action::ToggleLogPanel));
        assert!(matches!(app.handle_key(key(KeyCode::Esc)), Action::ClosePopup));
    }
}
