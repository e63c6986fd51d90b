use std::path::PathBuf;

use chrono::{Duration, Local, NaiveDate, Utc};
use log::{error, info, warn};
use todomaster_shared::{DateRange, QuickAddDefaults, Tab, Task, TaskCounts};
use uuid::Uuid;

use crate::dashboard::{Dashboard, DashboardError};
use crate::export::{self, ExportFormat};
use crate::filter_page::FilterPage;
use crate::form::TaskForm;
use crate::service::{ServiceError, TaskService};
use crate::settings::{DefaultView, Section, Settings};
use crate::settings_page::SettingsPage;
use crate::storage::LocalStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Filters,
    Settings,
}

/// Where typed characters go on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    QuickAdd,
    Search,
}

/// Destructive actions waiting for a yes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirm {
    Delete { uuid: Uuid, title: String },
    ClearCompleted(usize),
    ClearData,
    ResetSection(Section),
    DiscardSettings,
}

impl Confirm {
    pub fn message(&self) -> String {
        match self {
            Confirm::Delete { title, .. } => format!("Delete \"{title}\"?"),
            Confirm::ClearCompleted(n) => format!("Remove {n} completed task(s)?"),
            Confirm::ClearData => "Clear all local data? This cannot be undone.".to_string(),
            Confirm::ResetSection(section) => format!("Reset {} to defaults?", section.title()),
            Confirm::DiscardSettings => "Discard unsaved settings changes?".to_string(),
        }
    }
}

pub enum Overlay {
    Form(Box<TaskForm>),
    Confirm(Confirm),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub error: bool,
}

pub struct App {
    pub dashboard: Dashboard,
    pub service: TaskService,
    pub storage: LocalStorage,
    pub settings: Settings,
    pub screen: Screen,
    pub overlay: Option<Overlay>,
    pub mode: InputMode,
    pub quick_input: String,
    pub selected: usize,
    pub filter_page: FilterPage,
    pub settings_page: SettingsPage,
    pub status: Option<StatusLine>,
    pub export_dir: PathBuf,
    pub should_quit: bool,
}

impl App {
    pub fn new(service: TaskService, storage: LocalStorage, export_dir: PathBuf) -> Self {
        let settings = Settings::load(&storage);
        let mut dashboard = Dashboard::new(storage.clone());
        match settings.general.default_view {
            DefaultView::All => {}
            DefaultView::Active => dashboard.filter.tab = Tab::Active,
            DefaultView::Today => dashboard.filter.date_range = Some(DateRange::Today),
        }
        Self {
            dashboard,
            service,
            settings_page: SettingsPage::new(&settings),
            settings,
            storage,
            screen: Screen::Dashboard,
            overlay: None,
            mode: InputMode::Normal,
            quick_input: String::new(),
            selected: 0,
            filter_page: FilterPage::default(),
            status: None,
            export_dir,
            should_quit: false,
        }
    }

    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            error: false,
        });
    }

    pub fn fail(&mut self, text: impl Into<String>) {
        let text = text.into();
        error!("{}", text);
        self.status = Some(StatusLine { text, error: true });
    }

    fn report(&mut self, err: DashboardError) {
        match err {
            DashboardError::Remote(ServiceError::Http(err)) => {
                self.fail(format!("Offline, changes kept locally ({err})"))
            }
            err => self.fail(err.to_string()),
        }
    }

    pub async fn refresh(&mut self) {
        match self.dashboard.sync(&self.service).await {
            Ok(count) => self.info(format!("Synced {count} tasks")),
            Err(err) => {
                warn!("Sync failed: {}", err);
                self.report(err);
            }
        }
        self.clamp_selection();
    }

    pub fn counts(&self) -> TaskCounts {
        self.dashboard.counts()
    }

    pub fn visible(&self) -> Vec<&Task> {
        self.dashboard.visible(self.today())
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.visible().get(self.selected).copied()
    }

    pub fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn select_next(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_prev(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn next_tab(&mut self) {
        self.dashboard.filter.tab = self.dashboard.filter.tab.next();
        self.selected = 0;
    }

    fn quick_add_defaults(&self) -> QuickAddDefaults {
        let tasks = &self.settings.tasks;
        QuickAddDefaults {
            priority: tasks.default_priority,
            category: self.settings.default_category(),
            due_date: tasks
                .default_due_date
                .then(|| self.today() + Duration::days(i64::from(tasks.default_due_days))),
        }
    }

    pub async fn submit_quick_add(&mut self) {
        let input = std::mem::take(&mut self.quick_input);
        let defaults = self.quick_add_defaults();
        match self.dashboard.add_quick(&input, &defaults, &self.service).await {
            Ok(_) => self.info("Task added"),
            Err(DashboardError::QuickAdd(err)) => {
                self.quick_input = input;
                self.fail(err.to_string());
            }
            Err(err) => self.report(err),
        }
    }

    pub async fn toggle_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let (uuid, completing) = (task.uuid, !task.is_completed());
        match self.dashboard.toggle(uuid, &self.service).await {
            Ok(()) if completing && self.settings.notifications.completion_celebrations => {
                self.info("Nice work, task completed!")
            }
            Ok(()) => self.status = None,
            Err(err) => self.report(err),
        }
        self.clamp_selection();
    }

    pub fn ask_delete_selected(&mut self) {
        if let Some(task) = self.selected_task() {
            self.overlay = Some(Overlay::Confirm(Confirm::Delete {
                uuid: task.uuid,
                title: task.title.clone(),
            }));
        }
    }

    pub fn ask_clear_completed(&mut self) {
        let completed = self.counts().completed;
        if completed == 0 {
            self.info("No completed tasks to clear");
        } else {
            self.overlay = Some(Overlay::Confirm(Confirm::ClearCompleted(completed)));
        }
    }

    pub async fn toggle_all(&mut self) {
        if let Err(err) = self.dashboard.toggle_all(&self.service).await {
            self.report(err);
        }
    }

    pub fn open_create(&mut self) {
        let form = TaskForm::create(&self.settings, self.today());
        self.overlay = Some(Overlay::Form(Box::new(form)));
    }

    pub fn open_edit(&mut self) {
        if let Some(task) = self.selected_task() {
            let form = TaskForm::edit(task);
            self.overlay = Some(Overlay::Form(Box::new(form)));
        }
    }

    /// Validates the open form; it stays open with errors shown on failure.
    pub async fn save_form(&mut self) {
        let today = self.today();
        let Some(Overlay::Form(form)) = self.overlay.as_mut() else {
            return;
        };
        let Some((task, is_new)) = form.submit(today) else {
            return;
        };
        self.overlay = None;
        match self.dashboard.save_from_form(task, is_new, &self.service).await {
            Ok(_) if is_new => self.info("Task created"),
            Ok(_) => self.info("Task updated"),
            Err(err) => self.report(err),
        }
        self.clamp_selection();
    }

    pub async fn confirm(&mut self) {
        let Some(Overlay::Confirm(confirm)) = self.overlay.take() else {
            return;
        };
        match confirm {
            Confirm::Delete { uuid, .. } => match self.dashboard.delete(uuid, &self.service).await {
                Ok(()) => self.info("Task deleted"),
                Err(err) => self.report(err),
            },
            Confirm::ClearCompleted(_) => match self.dashboard.clear_completed(&self.service).await {
                Ok(n) => self.info(format!("Cleared {n} completed task(s)")),
                Err(err) => self.report(err),
            },
            Confirm::ClearData => self.clear_data(),
            Confirm::ResetSection(_) => {
                if self.settings_page.reset_section() {
                    self.save_settings();
                }
            }
            Confirm::DiscardSettings => {
                self.settings_page.discard(&self.settings);
                self.screen = Screen::Dashboard;
            }
        }
        self.clamp_selection();
    }

    pub fn open_settings(&mut self) {
        self.settings_page = SettingsPage::new(&self.settings);
        self.screen = Screen::Settings;
    }

    pub fn close_settings(&mut self) {
        if self.settings_page.unsaved {
            self.overlay = Some(Overlay::Confirm(Confirm::DiscardSettings));
        } else {
            self.screen = Screen::Dashboard;
        }
    }

    pub fn change_setting(&mut self, forward: bool) {
        if self.settings_page.change(forward) {
            self.save_settings();
        }
    }

    pub fn save_settings(&mut self) {
        let draft = self.settings_page.draft.clone();
        match draft.save(&self.storage) {
            Ok(()) => {
                self.settings = draft;
                self.settings_page.mark_saved();
                info!("Settings saved");
                self.info("Settings saved");
            }
            Err(err) => self.fail(format!("Could not save settings: {err}")),
        }
    }

    pub fn export(&mut self) {
        let format: ExportFormat = self.settings.data.export_format;
        match export::write(&self.export_dir, format, self.dashboard.tasks(), &self.settings, Utc::now()) {
            Ok(path) => self.info(format!("Exported to {}", path.display())),
            Err(err) => self.fail(format!("Export failed: {err}")),
        }
    }

    fn clear_data(&mut self) {
        match self.storage.clear() {
            Ok(()) => {
                self.dashboard.forget();
                self.settings = Settings::default();
                self.settings_page = SettingsPage::new(&self.settings);
                self.selected = 0;
                info!("Local data cleared");
                self.info("All local data cleared");
            }
            Err(err) => self.fail(format!("Could not clear local data: {err}")),
        }
    }

    /// Local storage usage for the data section, in KiB.
    pub fn storage_usage(&self) -> f64 {
        self.storage.usage_kb().unwrap_or_default()
    }
}
