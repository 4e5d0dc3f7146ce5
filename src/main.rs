mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    sync::{mpsc::Sender, Arc},
    thread,
    time::{Duration, Instant},
};
use vokab::{
    app_dirs::AppDirs,
    catalog::Catalog,
    config::{Config, ConfigStore, FileConfigStore},
    controller::{LoadTicket, Phase},
    error::LoadError,
    logging,
    runtime::{AppEvent, AppEventSource, CrosstermEventSource, FixedTicker, Runner, Ticker},
    seen_cache::SeenCache,
    storage::FileKeyValueStore,
    word::WordRecord,
    word_store::{DirWordStore, EmbeddedWordStore, WordStore},
    DrillError, SessionController,
};

const TICK_RATE_MS: u64 = 100;

/// vocabulary drill for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Pick a language and level, translate the words you are shown, and get immediate feedback. Words you answer correctly are remembered and skipped next time."
)]
pub struct Cli {
    /// language to practice, as named in the catalog
    #[clap(short = 'l', long)]
    language: Option<String>,

    /// level id or data file within the language
    #[clap(short = 'L', long)]
    level: Option<String>,

    /// start practicing right away (requires language and level)
    #[clap(long)]
    start: bool,

    /// catalog JSON to use instead of the bundled one
    #[clap(short = 'c', long)]
    catalog: Option<PathBuf>,

    /// directory that level data files are read from
    #[clap(short = 'd', long)]
    data_dir: Option<PathBuf>,

    /// milliseconds to show feedback before the next word
    #[clap(long)]
    delay_ms: Option<u64>,

    /// number of correctly answered words to remember
    #[clap(long)]
    cache_limit: Option<usize>,

    /// print the available languages and levels, then exit
    #[clap(long)]
    list: bool,

    /// forget every remembered word before starting
    #[clap(long)]
    reset_cache: bool,
}

impl Cli {
    /// Overlay command line flags on the persisted configuration
    fn apply_to(&self, config: &mut Config) {
        if let Some(ref catalog) = self.catalog {
            config.catalog_path = Some(catalog.clone());
        }
        if let Some(ref data_dir) = self.data_dir {
            config.data_dir = Some(data_dir.clone());
        }
        if let Some(delay_ms) = self.delay_ms {
            config.advance_delay_ms = delay_ms;
        }
        if let Some(cache_limit) = self.cache_limit {
            config.cache_limit = cache_limit;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Picking,
    Practicing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickerFocus {
    Languages,
    Levels,
}

pub struct App {
    pub controller: SessionController,
    pub state: AppState,
    pub focus: PickerFocus,
    pub language_cursor: usize,
    pub level_cursor: usize,
    pub input: String,
    pub alert: Option<String>,
    config: Config,
    config_store: Option<Box<dyn ConfigStore>>,
}

impl App {
    pub fn new(controller: SessionController, config: Config) -> Self {
        Self {
            controller,
            state: AppState::Picking,
            focus: PickerFocus::Languages,
            language_cursor: 0,
            level_cursor: 0,
            input: String::new(),
            alert: None,
            config,
            config_store: None,
        }
    }

    pub fn with_config_store(mut self, store: Box<dyn ConfigStore>) -> Self {
        self.config_store = Some(store);
        self
    }

    pub fn language_names(&self) -> Vec<String> {
        self.controller
            .catalog()
            .language_names()
            .map(str::to_string)
            .collect()
    }

    /// Select a language and level up front (command line or last session)
    pub fn preselect(&mut self, language: Option<&str>, level: Option<&str>) {
        let Some(language) = language else {
            return;
        };
        let Some(position) = self.language_names().iter().position(|n| n == language) else {
            self.alert = Some(format!("Unknown language: {language}"));
            return;
        };
        self.language_cursor = position;
        self.controller.on_language_changed(Some(language));
        self.focus = PickerFocus::Levels;

        let resolved = level.and_then(|key| {
            self.controller
                .available_levels()
                .iter()
                .position(|l| l.data_file == key || l.id == key)
        });
        if let Some(idx) = resolved {
            let data_file = self.controller.available_levels()[idx].data_file.clone();
            self.level_cursor = idx;
            self.controller.on_level_changed(Some(&data_file));
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let (cursor, len) = match self.focus {
            PickerFocus::Languages => (&mut self.language_cursor, self.controller.catalog().languages.len()),
            PickerFocus::Levels => (&mut self.level_cursor, self.controller.available_levels().len()),
        };
        if len == 0 {
            *cursor = 0;
            return;
        }
        *cursor = cursor.saturating_add_signed(delta).min(len - 1);
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            PickerFocus::Languages if self.controller.level_select_enabled() => PickerFocus::Levels,
            _ => PickerFocus::Languages,
        };
    }

    /// Enter on the picker: choose the highlighted language, or the
    /// highlighted level and start.
    pub fn confirm_selection(&mut self, tx: &Sender<AppEvent>) {
        match self.focus {
            PickerFocus::Languages => {
                let names = self.language_names();
                if let Some(name) = names.get(self.language_cursor) {
                    self.controller.on_language_changed(Some(name));
                    self.level_cursor = 0;
                    if self.controller.level_select_enabled() {
                        self.focus = PickerFocus::Levels;
                    }
                }
            }
            PickerFocus::Levels => {
                let data_file = self
                    .controller
                    .available_levels()
                    .get(self.level_cursor)
                    .map(|level| level.data_file.clone());
                if let Some(data_file) = data_file {
                    self.controller.on_level_changed(Some(&data_file));
                    self.start(tx);
                }
            }
        }
    }

    pub fn start(&mut self, tx: &Sender<AppEvent>) {
        match self.controller.on_start() {
            Ok(ticket) => {
                self.alert = None;
                self.input.clear();
                self.state = AppState::Practicing;
                spawn_level_load(self.controller.word_store(), ticket, tx.clone());
            }
            Err(e) => {
                self.alert = Some(self.controller.take_alert().unwrap_or_else(|| e.to_string()));
            }
        }
    }

    pub fn on_level_loaded(&mut self, ticket: LoadTicket, result: Result<Vec<WordRecord>, LoadError>) {
        let language = ticket.language().to_string();
        let level = ticket.data_file().to_string();
        let outcome = self.controller.complete_load(ticket, result);
        self.alert = self.controller.take_alert();

        match outcome {
            Ok(()) => self.remember_selection(language, level),
            Err(e) => {
                if self.alert.is_none() {
                    self.alert = Some(e.to_string());
                }
                if self.controller.phase() == Phase::Idle {
                    self.state = AppState::Picking;
                }
            }
        }
    }

    fn remember_selection(&mut self, language: String, level: String) {
        self.config.last_language = Some(language);
        self.config.last_level = Some(level);
        if let Some(ref store) = self.config_store {
            if let Err(e) = store.save(&self.config) {
                tracing::warn!("failed to save config: {e}");
            }
        }
    }

    pub fn type_char(&mut self, c: char) {
        if self.controller.submit_enabled() {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.controller.submit_enabled() {
            self.input.pop();
        }
    }

    pub fn submit(&mut self) {
        match self.controller.on_enter_key(&self.input) {
            Ok(_) | Err(DrillError::EmptyAnswer) | Err(DrillError::SubmissionUnavailable) => {}
            Err(e) => self.alert = Some(e.to_string()),
        }
    }

    pub fn on_tick(&mut self, now: Instant) -> bool {
        let fired = self.controller.tick(now);
        if fired {
            self.input.clear();
        }
        fired
    }

    pub fn back_to_picker(&mut self) {
        self.state = AppState::Picking;
        self.input.clear();
    }

    pub fn session_over(&self) -> bool {
        matches!(self.controller.phase(), Phase::Complete(_) | Phase::Idle)
    }
}

fn spawn_level_load(store: Arc<dyn WordStore>, ticket: LoadTicket, tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let result = store.load(ticket.data_file());
        if tx.send(AppEvent::LevelLoaded(ticket, result)).is_err() {
            tracing::debug!("event loop gone before level load finished");
        }
    });
}

fn print_catalog(catalog: &Catalog) {
    for (name, descriptor) in &catalog.languages {
        println!("{name}");
        for level in &descriptor.levels {
            println!("  {:<8} {:<20} {}", level.id, level.display_name, level.data_file);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(log_path) = AppDirs::log_path() {
        if let Err(e) = logging::init_file_logging(&log_path) {
            eprintln!("logging disabled: {e}");
        }
    }

    let config_store = FileConfigStore::new();
    let mut config = config_store.load();
    cli.apply_to(&mut config);

    let catalog = match config.catalog_path {
        Some(ref path) => Catalog::from_path(path)?,
        None => Catalog::embedded()?,
    };

    if cli.list {
        print_catalog(&catalog);
        return Ok(());
    }

    let store: Arc<dyn WordStore> = match config.data_dir {
        Some(ref dir) => Arc::new(DirWordStore::new(dir)),
        None => Arc::new(EmbeddedWordStore),
    };
    let mut cache = SeenCache::load(Box::new(FileKeyValueStore::new()), config.cache_limit);
    if cli.reset_cache {
        cache.clear()?;
        tracing::info!("seen-word cache cleared");
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let controller = SessionController::new(catalog, store, cache, config.session_config());
    let language = cli.language.clone().or_else(|| config.last_language.clone());
    let level = cli.level.clone().or_else(|| config.last_level.clone());
    let mut app = App::new(controller, config).with_config_store(Box::new(config_store));
    app.preselect(language.as_deref(), level.as_deref());

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    if cli.start {
        app.start(&runner.sender());
    }

    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: AppEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    let tx = runner.sender();
    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        match runner.step() {
            AppEvent::Tick => {
                if app.on_tick(Instant::now()) {
                    terminal.draw(|f| ui::draw(app, f))?;
                }
            }
            AppEvent::Resize => {
                terminal.draw(|f| ui::draw(app, f))?;
            }
            AppEvent::LevelLoaded(ticket, result) => {
                app.on_level_loaded(ticket, result);
                terminal.draw(|f| ui::draw(app, f))?;
            }
            AppEvent::Key(key) => {
                if !handle_key(app, key, &tx) {
                    break;
                }
                terminal.draw(|f| ui::draw(app, f))?;
            }
        }
    }

    Ok(())
}

/// Returns false when the app should exit
fn handle_key(app: &mut App, key: KeyEvent, tx: &Sender<AppEvent>) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return false;
    }

    match app.state {
        AppState::Picking => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return false,
            KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),
            KeyCode::Tab | KeyCode::Left | KeyCode::Right => app.toggle_focus(),
            KeyCode::Enter => app.confirm_selection(tx),
            KeyCode::Char('s') => {
                if app.controller.start_enabled() {
                    app.start(tx);
                }
            }
            _ => {}
        },
        AppState::Practicing => match key.code {
            KeyCode::Esc => app.back_to_picker(),
            KeyCode::Enter if app.session_over() => app.back_to_picker(),
            KeyCode::Enter => app.submit(),
            KeyCode::Backspace => app.backspace(),
            KeyCode::Char(c) => app.type_char(c),
            _ => {}
        },
    }

    true
}
