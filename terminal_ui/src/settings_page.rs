use crate::settings::{Section, SettingKey, Settings};

/// Edits a working copy of the settings; `unsaved` tracks whether it has
/// drifted from what is stored.
#[derive(Debug, Clone)]
pub struct SettingsPage {
    pub section: usize,
    pub item: usize,
    /// Whether the cursor is in the item list rather than the section list.
    pub in_items: bool,
    pub draft: Settings,
    pub unsaved: bool,
}

impl SettingsPage {
    pub fn new(settings: &Settings) -> Self {
        Self {
            section: 0,
            item: 0,
            in_items: false,
            draft: settings.clone(),
            unsaved: false,
        }
    }

    pub fn current_section(&self) -> Section {
        Section::ALL[self.section % Section::ALL.len()]
    }

    pub fn current_key(&self) -> Option<SettingKey> {
        self.in_items
            .then(|| self.current_section().keys().get(self.item).copied())
            .flatten()
    }

    pub fn down(&mut self) {
        if self.in_items {
            let len = self.current_section().keys().len();
            self.item = (self.item + 1) % len;
        } else {
            self.section = (self.section + 1) % Section::ALL.len();
            self.item = 0;
        }
    }

    pub fn up(&mut self) {
        if self.in_items {
            let len = self.current_section().keys().len();
            self.item = (self.item + len - 1) % len;
        } else {
            let len = Section::ALL.len();
            self.section = (self.section + len - 1) % len;
            self.item = 0;
        }
    }

    pub fn enter_items(&mut self) {
        self.in_items = true;
    }

    pub fn leave_items(&mut self) {
        self.in_items = false;
    }

    /// Changes the focused setting. Returns `true` when the change should be
    /// written straight away because auto-save is on.
    pub fn change(&mut self, forward: bool) -> bool {
        let Some(key) = self.current_key() else {
            return false;
        };
        self.draft.cycle(key, forward);
        self.unsaved = true;
        self.draft.general.auto_save
    }

    /// Restores the current section's defaults; returns `true` like [`change`](Self::change).
    pub fn reset_section(&mut self) -> bool {
        self.draft.reset_section(self.current_section());
        self.unsaved = true;
        self.draft.general.auto_save
    }

    pub fn mark_saved(&mut self) {
        self.unsaved = false;
    }

    pub fn discard(&mut self, saved: &Settings) {
        self.draft = saved.clone();
        self.unsaved = false;
    }
}
