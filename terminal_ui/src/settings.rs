//! User preferences, persisted under [`SETTINGS_KEY`](crate::storage::SETTINGS_KEY).

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use todomaster_shared::{Priority, DEFAULT_CATEGORIES};

use crate::export::ExportFormat;
use crate::storage::{self, LocalStorage, SETTINGS_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    De,
    It,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultView {
    #[default]
    All,
    Active,
    Today,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryFrequency {
    #[default]
    Daily,
    Weekly,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralSettings {
    pub theme: Theme,
    pub language: Language,
    pub default_view: DefaultView,
    pub show_task_count: bool,
    pub auto_save: bool,
    pub compact_view: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            language: Language::En,
            default_view: DefaultView::All,
            show_task_count: true,
            auto_save: true,
            compact_view: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub due_date_reminders: bool,
    pub daily_summary: bool,
    pub completion_celebrations: bool,
    pub desktop_notifications: bool,
    /// `HH:MM`
    pub reminder_time: String,
    pub summary_frequency: SummaryFrequency,
    /// Minutes.
    pub reminder_advance_time: u32,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            due_date_reminders: true,
            daily_summary: false,
            completion_celebrations: true,
            desktop_notifications: true,
            reminder_time: "09:00".to_string(),
            summary_frequency: SummaryFrequency::Daily,
            reminder_advance_time: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskDefaults {
    pub default_priority: Priority,
    /// Empty means no category.
    pub default_category: String,
    pub auto_archive: bool,
    pub default_due_date: bool,
    pub task_templates: bool,
    /// Days after completion before a task is archived.
    pub archive_time: u32,
    pub default_due_days: u32,
}

impl Default for TaskDefaults {
    fn default() -> Self {
        Self {
            default_priority: Priority::Medium,
            default_category: String::new(),
            auto_archive: true,
            default_due_date: false,
            task_templates: false,
            archive_time: 30,
            default_due_days: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataSettings {
    pub export_format: ExportFormat,
    pub auto_backup: bool,
    pub backup_completed: bool,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            export_format: ExportFormat::Json,
            auto_backup: true,
            backup_completed: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShortcutSettings {
    pub keyboard_shortcuts: bool,
    pub show_shortcut_hints: bool,
    pub global_shortcuts: bool,
}

impl Default for ShortcutSettings {
    fn default() -> Self {
        Self {
            keyboard_shortcuts: true,
            show_shortcut_hints: true,
            global_shortcuts: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountSettings {
    pub public_profile: bool,
    pub share_analytics: bool,
    pub email_marketing: bool,
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            public_profile: false,
            share_analytics: true,
            email_marketing: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub notifications: NotificationSettings,
    pub tasks: TaskDefaults,
    pub data: DataSettings,
    pub shortcuts: ShortcutSettings,
    pub account: AccountSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    General,
    Notifications,
    Tasks,
    Data,
    Shortcuts,
    Account,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::General,
        Section::Notifications,
        Section::Tasks,
        Section::Data,
        Section::Shortcuts,
        Section::Account,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::General => "General",
            Section::Notifications => "Notifications",
            Section::Tasks => "Task Defaults",
            Section::Data => "Data Management",
            Section::Shortcuts => "Keyboard Shortcuts",
            Section::Account => "Account",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Section::General => "Theme, language, and display preferences",
            Section::Notifications => "Reminders and notification settings",
            Section::Tasks => "Default values for new tasks",
            Section::Data => "Export, import, and backup options",
            Section::Shortcuts => "Customize keyboard shortcuts",
            Section::Account => "Profile and privacy settings",
        }
    }

    pub fn keys(self) -> &'static [SettingKey] {
        use SettingKey::*;
        match self {
            Section::General => &[Theme, Language, DefaultView, ShowTaskCount, AutoSave, CompactView],
            Section::Notifications => &[
                DueDateReminders,
                DailySummary,
                CompletionCelebrations,
                DesktopNotifications,
                ReminderTime,
                SummaryFrequency,
                ReminderAdvanceTime,
            ],
            Section::Tasks => &[
                DefaultPriority,
                DefaultCategory,
                AutoArchive,
                DefaultDueDate,
                DefaultDueDays,
                TaskTemplates,
                ArchiveTime,
            ],
            Section::Data => &[ExportFormat, AutoBackup, BackupCompleted],
            Section::Shortcuts => &[KeyboardShortcuts, ShowShortcutHints, GlobalShortcuts],
            Section::Account => &[PublicProfile, ShareAnalytics, EmailMarketing],
        }
    }
}

/// Every individually editable preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    Theme,
    Language,
    DefaultView,
    ShowTaskCount,
    AutoSave,
    CompactView,
    DueDateReminders,
    DailySummary,
    CompletionCelebrations,
    DesktopNotifications,
    ReminderTime,
    SummaryFrequency,
    ReminderAdvanceTime,
    DefaultPriority,
    DefaultCategory,
    AutoArchive,
    DefaultDueDate,
    DefaultDueDays,
    TaskTemplates,
    ArchiveTime,
    ExportFormat,
    AutoBackup,
    BackupCompleted,
    KeyboardShortcuts,
    ShowShortcutHints,
    GlobalShortcuts,
    PublicProfile,
    ShareAnalytics,
    EmailMarketing,
}

impl SettingKey {
    pub fn label(self) -> &'static str {
        match self {
            SettingKey::Theme => "Theme",
            SettingKey::Language => "Language",
            SettingKey::DefaultView => "Default view",
            SettingKey::ShowTaskCount => "Show task count",
            SettingKey::AutoSave => "Auto-save",
            SettingKey::CompactView => "Compact view",
            SettingKey::DueDateReminders => "Due date reminders",
            SettingKey::DailySummary => "Daily summary",
            SettingKey::CompletionCelebrations => "Completion celebrations",
            SettingKey::DesktopNotifications => "Desktop notifications",
            SettingKey::ReminderTime => "Reminder time",
            SettingKey::SummaryFrequency => "Summary frequency",
            SettingKey::ReminderAdvanceTime => "Remind in advance",
            SettingKey::DefaultPriority => "Default priority",
            SettingKey::DefaultCategory => "Default category",
            SettingKey::AutoArchive => "Auto-archive completed",
            SettingKey::DefaultDueDate => "Set a default due date",
            SettingKey::DefaultDueDays => "Default due in",
            SettingKey::TaskTemplates => "Task templates",
            SettingKey::ArchiveTime => "Archive after",
            SettingKey::ExportFormat => "Export format",
            SettingKey::AutoBackup => "Automatic backup",
            SettingKey::BackupCompleted => "Include completed tasks",
            SettingKey::KeyboardShortcuts => "Keyboard shortcuts",
            SettingKey::ShowShortcutHints => "Show shortcut hints",
            SettingKey::GlobalShortcuts => "Global shortcuts",
            SettingKey::PublicProfile => "Public profile",
            SettingKey::ShareAnalytics => "Share usage analytics",
            SettingKey::EmailMarketing => "Marketing emails",
        }
    }
}

const REMINDER_TIMES: [&str; 6] = ["08:00", "09:00", "10:00", "12:00", "18:00", "20:00"];
const ADVANCE_MINUTES: [u32; 5] = [5, 15, 30, 60, 1440];
const ARCHIVE_DAYS: [u32; 5] = [1, 7, 30, 90, 365];
const DUE_DAYS: [u32; 5] = [0, 1, 2, 3, 7];

/// Steps through `options`, wrapping at both ends. A value not in the list
/// moves to the first option.
fn cycle<T: PartialEq + Clone>(options: &[T], current: &T, forward: bool) -> T {
    let len = options.len();
    let next = match options.iter().position(|o| o == current) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    options[next].clone()
}

fn yes_no(value: bool) -> String {
    if value { "On" } else { "Off" }.to_string()
}

fn days(n: u32) -> String {
    match n {
        0 => "Same day".to_string(),
        1 => "1 day".to_string(),
        n => format!("{n} days"),
    }
}

fn minutes(n: u32) -> String {
    match n {
        1440 => "1 day before".to_string(),
        60 => "1 hour before".to_string(),
        n => format!("{n} minutes before"),
    }
}

impl Settings {
    /// Saved values layered over the defaults; anything unreadable yields defaults.
    pub fn load(storage: &LocalStorage) -> Self {
        match storage.load::<Value>(SETTINGS_KEY) {
            Ok(Some(saved)) => Self::merged_over_defaults(&saved),
            Ok(None) => Settings::default(),
            Err(err) => {
                warn!("Error loading settings, using defaults: {}", err);
                Settings::default()
            }
        }
    }

    /// Applies saved values one at a time; a value that does not decode keeps
    /// its default without disturbing the others.
    fn merged_over_defaults(saved: &Value) -> Self {
        let defaults = Settings::default();
        let (Some(sections), Ok(mut merged)) = (saved.as_object(), serde_json::to_value(&defaults)) else {
            warn!("Saved settings are not an object, using defaults");
            return defaults;
        };
        for (section, fields) in sections {
            let Some(fields) = fields.as_object() else {
                warn!("Ignoring saved settings section {}", section);
                continue;
            };
            for (key, value) in fields {
                let mut candidate = merged.clone();
                let Some(slot) = candidate.get_mut(section).and_then(Value::as_object_mut) else {
                    continue;
                };
                slot.insert(key.clone(), value.clone());
                match serde_json::from_value::<Settings>(candidate.clone()) {
                    Ok(_) => merged = candidate,
                    Err(err) => warn!("Ignoring saved setting {}.{}: {}", section, key, err),
                }
            }
        }
        serde_json::from_value(merged).unwrap_or(defaults)
    }

    pub fn save(&self, storage: &LocalStorage) -> storage::Result<()> {
        storage.save(SETTINGS_KEY, self)
    }

    pub fn reset_section(&mut self, section: Section) {
        match section {
            Section::General => self.general = GeneralSettings::default(),
            Section::Notifications => self.notifications = NotificationSettings::default(),
            Section::Tasks => self.tasks = TaskDefaults::default(),
            Section::Data => self.data = DataSettings::default(),
            Section::Shortcuts => self.shortcuts = ShortcutSettings::default(),
            Section::Account => self.account = AccountSettings::default(),
        }
    }

    pub fn default_category(&self) -> Option<String> {
        Some(self.tasks.default_category.clone()).filter(|c| !c.is_empty())
    }

    pub fn value_label(&self, key: SettingKey) -> String {
        let g = &self.general;
        let n = &self.notifications;
        let t = &self.tasks;
        match key {
            SettingKey::Theme => format!("{:?}", g.theme),
            SettingKey::Language => match g.language {
                Language::En => "English",
                Language::Es => "Spanish",
                Language::Fr => "French",
                Language::De => "German",
                Language::It => "Italian",
            }
            .to_string(),
            SettingKey::DefaultView => match g.default_view {
                DefaultView::All => "All Tasks",
                DefaultView::Active => "Active Only",
                DefaultView::Today => "Today's Tasks",
            }
            .to_string(),
            SettingKey::ShowTaskCount => yes_no(g.show_task_count),
            SettingKey::AutoSave => yes_no(g.auto_save),
            SettingKey::CompactView => yes_no(g.compact_view),
            SettingKey::DueDateReminders => yes_no(n.due_date_reminders),
            SettingKey::DailySummary => yes_no(n.daily_summary),
            SettingKey::CompletionCelebrations => yes_no(n.completion_celebrations),
            SettingKey::DesktopNotifications => yes_no(n.desktop_notifications),
            SettingKey::ReminderTime => n.reminder_time.clone(),
            SettingKey::SummaryFrequency => format!("{:?}", n.summary_frequency),
            SettingKey::ReminderAdvanceTime => minutes(n.reminder_advance_time),
            SettingKey::DefaultPriority => t.default_priority.label().to_string(),
            SettingKey::DefaultCategory => self.default_category().unwrap_or_else(|| "No Category".into()),
            SettingKey::AutoArchive => yes_no(t.auto_archive),
            SettingKey::DefaultDueDate => yes_no(t.default_due_date),
            SettingKey::DefaultDueDays => days(t.default_due_days),
            SettingKey::TaskTemplates => yes_no(t.task_templates),
            SettingKey::ArchiveTime => days(t.archive_time),
            SettingKey::ExportFormat => self.data.export_format.label().to_string(),
            SettingKey::AutoBackup => yes_no(self.data.auto_backup),
            SettingKey::BackupCompleted => yes_no(self.data.backup_completed),
            SettingKey::KeyboardShortcuts => yes_no(self.shortcuts.keyboard_shortcuts),
            SettingKey::ShowShortcutHints => yes_no(self.shortcuts.show_shortcut_hints),
            SettingKey::GlobalShortcuts => yes_no(self.shortcuts.global_shortcuts),
            SettingKey::PublicProfile => yes_no(self.account.public_profile),
            SettingKey::ShareAnalytics => yes_no(self.account.share_analytics),
            SettingKey::EmailMarketing => yes_no(self.account.email_marketing),
        }
    }

    /// Toggles a switch or steps a choice to its next (or previous) option.
    pub fn cycle(&mut self, key: SettingKey, forward: bool) {
        let g = &mut self.general;
        let n = &mut self.notifications;
        let t = &mut self.tasks;
        match key {
            SettingKey::Theme => g.theme = cycle(&[Theme::Light, Theme::Dark, Theme::Auto], &g.theme, forward),
            SettingKey::Language => {
                use Language::*;
                g.language = cycle(&[En, Es, Fr, De, It], &g.language, forward)
            }
            SettingKey::DefaultView => {
                use DefaultView::*;
                g.default_view = cycle(&[All, Active, Today], &g.default_view, forward)
            }
            SettingKey::ShowTaskCount => g.show_task_count = !g.show_task_count,
            SettingKey::AutoSave => g.auto_save = !g.auto_save,
            SettingKey::CompactView => g.compact_view = !g.compact_view,
            SettingKey::DueDateReminders => n.due_date_reminders = !n.due_date_reminders,
            SettingKey::DailySummary => n.daily_summary = !n.daily_summary,
            SettingKey::CompletionCelebrations => n.completion_celebrations = !n.completion_celebrations,
            SettingKey::DesktopNotifications => n.desktop_notifications = !n.desktop_notifications,
            SettingKey::ReminderTime => {
                let options: Vec<String> = REMINDER_TIMES.iter().map(|s| s.to_string()).collect();
                n.reminder_time = cycle(&options, &n.reminder_time, forward)
            }
            SettingKey::SummaryFrequency => {
                use SummaryFrequency::*;
                n.summary_frequency = cycle(&[Daily, Weekly, Never], &n.summary_frequency, forward)
            }
            SettingKey::ReminderAdvanceTime => {
                n.reminder_advance_time = cycle(&ADVANCE_MINUTES, &n.reminder_advance_time, forward)
            }
            SettingKey::DefaultPriority => t.default_priority = cycle(Priority::ALL, &t.default_priority, forward),
            SettingKey::DefaultCategory => {
                let options: Vec<String> = std::iter::once(String::new())
                    .chain(DEFAULT_CATEGORIES.iter().map(|c| c.to_string()))
                    .collect();
                t.default_category = cycle(&options, &t.default_category, forward)
            }
            SettingKey::AutoArchive => t.auto_archive = !t.auto_archive,
            SettingKey::DefaultDueDate => t.default_due_date = !t.default_due_date,
            SettingKey::DefaultDueDays => t.default_due_days = cycle(&DUE_DAYS, &t.default_due_days, forward),
            SettingKey::TaskTemplates => t.task_templates = !t.task_templates,
            SettingKey::ArchiveTime => t.archive_time = cycle(&ARCHIVE_DAYS, &t.archive_time, forward),
            SettingKey::ExportFormat => {
                self.data.export_format = cycle(&ExportFormat::ALL, &self.data.export_format, forward)
            }
            SettingKey::AutoBackup => self.data.auto_backup = !self.data.auto_backup,
            SettingKey::BackupCompleted => self.data.backup_completed = !self.data.backup_completed,
            SettingKey::KeyboardShortcuts => {
                self.shortcuts.keyboard_shortcuts = !self.shortcuts.keyboard_shortcuts
            }
            SettingKey::ShowShortcutHints => {
                self.shortcuts.show_shortcut_hints = !self.shortcuts.show_shortcut_hints
            }
            SettingKey::GlobalShortcuts => self.shortcuts.global_shortcuts = !self.shortcuts.global_shortcuts,
            SettingKey::PublicProfile => self.account.public_profile = !self.account.public_profile,
            SettingKey::ShareAnalytics => self.account.share_analytics = !self.account.share_analytics,
            SettingKey::EmailMarketing => self.account.email_marketing = !self.account.email_marketing,
        }
    }
}
