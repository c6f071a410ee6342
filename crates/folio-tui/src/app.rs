// Projects page state and key handling
use folio_core::{FeedLoader, FeedState, FeedStatus, PageSession, RepositoryRecord, ThemeMode};
use ratatui::widgets::ListState;
use tracing::{debug, warn};

/// What a key press asks the page to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleTheme,
    Reload,
    Next,
    Previous,
    Open,
    Leave,
}

impl Action {
    pub fn from_key(code: crossterm::event::KeyCode) -> Option<Self> {
        use crossterm::event::KeyCode;

        match code {
            KeyCode::Char('t') => Some(Action::ToggleTheme),
            KeyCode::Char('r') => Some(Action::Reload),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::Next),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::Previous),
            KeyCode::Enter | KeyCode::Char('o') => Some(Action::Open),
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::Leave),
            _ => None,
        }
    }
}

/// Top-level view state. Owns the theme and the current page session.
pub struct App {
    pub should_quit: bool,
    pub theme: ThemeMode,
    pub selected_index: usize,
    pub list_state: ListState,
    pub status_message: Option<String>,
    loader: FeedLoader,
    session: Option<PageSession>,
}

impl App {
    pub fn new(loader: FeedLoader, theme: ThemeMode) -> Self {
        Self {
            should_quit: false,
            theme,
            selected_index: 0,
            list_state: ListState::default(),
            status_message: None,
            loader,
            session: None,
        }
    }

    /// Open the Projects page with a fresh feed. Any earlier session is
    /// dropped, which aborts its fetch.
    pub fn activate(&mut self) {
        self.session = Some(PageSession::activate(self.loader.clone()));
        self.selected_index = 0;
        self.list_state.select(None);
        self.status_message = None;
    }

    pub fn reload(&mut self) {
        debug!("Reloading projects page");
        self.activate();
    }

    /// Leave the page; a fetch still in flight is abandoned
    pub fn leave(&mut self) {
        self.session = None;
        self.should_quit = true;
    }

    /// Pull in a settled feed if one arrived. Returns `true` on change.
    pub fn tick(&mut self) -> bool {
        let changed = self.session.as_mut().is_some_and(PageSession::poll);
        if changed && !self.records().is_empty() {
            self.list_state.select(Some(self.selected_index));
        }
        changed
    }

    pub fn feed(&self) -> Option<&FeedState> {
        self.session.as_ref().map(PageSession::state)
    }

    pub fn status(&self) -> FeedStatus {
        self.feed().map_or(FeedStatus::Loading, FeedState::status)
    }

    pub fn records(&self) -> &[RepositoryRecord] {
        self.feed().and_then(FeedState::records).unwrap_or_default()
    }

    pub fn username(&self) -> &str {
        self.loader.request().username()
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
    }

    pub fn next_record(&mut self) {
        let len = self.records().len();
        if len > 0 {
            self.selected_index = (self.selected_index + 1).min(len - 1);
            self.list_state.select(Some(self.selected_index));
        }
    }

    pub fn previous_record(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.list_state.select(Some(self.selected_index));
        }
    }

    pub fn selected_record(&self) -> Option<&RepositoryRecord> {
        self.records().get(self.selected_index)
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::ToggleTheme => self.toggle_theme(),
            Action::Reload => self.reload(),
            Action::Next => self.next_record(),
            Action::Previous => self.previous_record(),
            Action::Open => self.open_selected(),
            Action::Leave => self.leave(),
        }
    }

    fn open_selected(&mut self) {
        let Some(url) = self.selected_record().map(|r| r.url.clone()) else {
            return;
        };

        match open::that(&url) {
            Ok(()) => self.status_message = Some(format!("Opened {}", url)),
            Err(e) => {
                warn!("Failed to open {}: {}", url, e);
                self.status_message = Some(format!("Could not open {}: {}", url, e));
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use folio_core::{Error, FeedRequest, FeedSource, GitHubError, SourceListing};
    use std::sync::Arc;
    use std::time::Duration;

    pub(crate) fn record(id: u64, name: &str, stars: u32) -> RepositoryRecord {
        RepositoryRecord {
            id,
            name: name.to_string(),
            description: None,
            url: format!("https://github.com/diegosarina/{}", name),
            stars,
            language: Some("Rust".to_string()),
            topics: Vec::new(),
            updated_at: None,
        }
    }

    pub(crate) struct StaticSource(pub Option<Vec<RepositoryRecord>>);

    #[async_trait]
    impl FeedSource for StaticSource {
        async fn list_repositories(
            &self,
            _username: &str,
            _max_count: u32,
        ) -> folio_core::Result<SourceListing> {
            match &self.0 {
                Some(records) => Ok(SourceListing::Records(records.clone())),
                None => Err(Error::GitHub(GitHubError::RequestFailed {
                    status: 503,
                    message: "Service Unavailable".into(),
                })),
            }
        }
    }

    pub(crate) fn app_with(source: StaticSource) -> App {
        let request = FeedRequest::new("diegosarina", 6, ["old-repo"].into_iter().collect())
            .unwrap();
        App::new(FeedLoader::new(Arc::new(source), request), ThemeMode::Dark)
    }

    pub(crate) async fn settle(app: &mut App) {
        for _ in 0..100 {
            if app.tick() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("feed never settled");
    }

    #[tokio::test]
    async fn test_activation_loads_filtered_feed() {
        let mut app = app_with(StaticSource(Some(vec![
            record(1, "a", 0),
            record(2, "old-repo", 3),
            record(3, "b", 1),
        ])));
        assert_eq!(app.status(), FeedStatus::Loading);

        app.activate();
        settle(&mut app).await;

        assert_eq!(app.status(), FeedStatus::Ready);
        let names: Vec<_> = app.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[tokio::test]
    async fn test_failed_feed_has_no_records() {
        let mut app = app_with(StaticSource(None));
        app.activate();
        settle(&mut app).await;

        assert_eq!(app.status(), FeedStatus::Failed);
        assert!(app.records().is_empty());
        assert!(app.selected_record().is_none());
    }

    #[tokio::test]
    async fn test_navigation_stays_in_bounds() {
        let mut app = app_with(StaticSource(Some(vec![record(1, "a", 0), record(2, "b", 0)])));
        app.activate();
        settle(&mut app).await;

        app.apply(Action::Previous);
        assert_eq!(app.selected_index, 0);
        app.apply(Action::Next);
        app.apply(Action::Next);
        assert_eq!(app.selected_index, 1);
        assert_eq!(app.selected_record().map(|r| r.name.as_str()), Some("b"));
    }

    #[tokio::test]
    async fn test_reload_starts_over() {
        let mut app = app_with(StaticSource(Some(vec![record(1, "a", 0), record(2, "b", 0)])));
        app.activate();
        settle(&mut app).await;
        app.apply(Action::Next);

        app.apply(Action::Reload);
        assert_eq!(app.status(), FeedStatus::Loading);
        assert_eq!(app.selected_index, 0);

        settle(&mut app).await;
        assert_eq!(app.status(), FeedStatus::Ready);
    }

    #[test]
    fn test_theme_toggle_and_leave() {
        let mut app = app_with(StaticSource(Some(Vec::new())));
        app.apply(Action::ToggleTheme);
        assert_eq!(app.theme, ThemeMode::Light);

        app.apply(Action::Leave);
        assert!(app.should_quit);
        assert!(app.feed().is_none());
    }

    #[test]
    fn test_key_bindings() {
        use crossterm::event::KeyCode;

        assert_eq!(Action::from_key(KeyCode::Char('t')), Some(Action::ToggleTheme));
        assert_eq!(Action::from_key(KeyCode::Char('j')), Some(Action::Next));
        assert_eq!(Action::from_key(KeyCode::Up), Some(Action::Previous));
        assert_eq!(Action::from_key(KeyCode::Esc), Some(Action::Leave));
        assert_eq!(Action::from_key(KeyCode::Char('x')), None);
    }
}
