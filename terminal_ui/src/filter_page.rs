//! Cursor state for the advanced filter screen.

use todomaster_shared::{DateRange, Priority, SortSpec, StatusFilter, TaskFilter, DEFAULT_CATEGORIES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterRow {
    Search,
    Tags,
    Status(StatusFilter),
    Priority(Priority),
    Category(&'static str),
    Date(DateRange),
    SortKey,
    SortOrder,
}

impl FilterRow {
    pub fn section(self) -> &'static str {
        match self {
            FilterRow::Search | FilterRow::Tags => "Search",
            FilterRow::Status(_) => "Status",
            FilterRow::Priority(_) => "Priority",
            FilterRow::Category(_) => "Category",
            FilterRow::Date(_) => "Due Date",
            FilterRow::SortKey | FilterRow::SortOrder => "Sort",
        }
    }

    pub fn is_text(self) -> bool {
        matches!(self, FilterRow::Search | FilterRow::Tags)
    }
}

pub fn rows() -> Vec<FilterRow> {
    let mut rows = vec![FilterRow::Search, FilterRow::Tags];
    rows.extend(StatusFilter::ALL.into_iter().map(FilterRow::Status));
    rows.extend(Priority::ALL.iter().rev().copied().map(FilterRow::Priority));
    rows.extend(DEFAULT_CATEGORIES.into_iter().map(FilterRow::Category));
    rows.extend(DateRange::PRESETS.into_iter().map(FilterRow::Date));
    rows.push(FilterRow::SortKey);
    rows.push(FilterRow::SortOrder);
    rows
}

#[derive(Debug, Clone, Default)]
pub struct FilterPage {
    pub cursor: usize,
    /// Typing goes to the focused text row while set.
    pub editing: bool,
    pub tag_input: String,
}

impl FilterPage {
    pub fn current(&self) -> FilterRow {
        let rows = rows();
        rows[self.cursor.min(rows.len() - 1)]
    }

    pub fn down(&mut self) {
        self.cursor = (self.cursor + 1) % rows().len();
    }

    pub fn up(&mut self) {
        let len = rows().len();
        self.cursor = (self.cursor + len - 1) % len;
    }

    /// Toggles the row under the cursor, or starts editing a text row.
    pub fn activate(&mut self, filter: &mut TaskFilter, sort: &mut Option<SortSpec>) {
        match self.current() {
            FilterRow::Search => self.editing = !self.editing,
            FilterRow::Tags => {
                if self.editing {
                    self.commit_tag(filter);
                }
                self.editing = !self.editing;
            }
            FilterRow::Status(status) => filter.toggle_status(status),
            FilterRow::Priority(priority) => filter.toggle_priority(priority),
            FilterRow::Category(category) => filter.toggle_category(category),
            FilterRow::Date(range) => filter.toggle_date_range(range),
            FilterRow::SortKey => {
                let spec = sort.get_or_insert_with(SortSpec::default);
                spec.key = spec.key.next();
            }
            FilterRow::SortOrder => {
                let spec = sort.get_or_insert_with(SortSpec::default);
                spec.order = spec.order.flip();
            }
        }
    }

    pub fn input(&mut self, c: char, filter: &mut TaskFilter) {
        match self.current() {
            FilterRow::Search => filter.query.push(c),
            FilterRow::Tags => self.tag_input.push(c),
            _ => {}
        }
    }

    pub fn backspace(&mut self, filter: &mut TaskFilter) {
        match self.current() {
            FilterRow::Search => {
                filter.query.pop();
            }
            FilterRow::Tags if self.tag_input.is_empty() => {
                filter.tags.pop();
            }
            FilterRow::Tags => {
                self.tag_input.pop();
            }
            _ => {}
        }
    }

    fn commit_tag(&mut self, filter: &mut TaskFilter) {
        let tag = self.tag_input.trim().trim_start_matches('#').to_lowercase();
        if !tag.is_empty() && !filter.tags.contains(&tag) {
            filter.tags.push(tag);
        }
        self.tag_input.clear();
    }

    /// Leaves text entry, keeping whatever was typed.
    pub fn finish_editing(&mut self, filter: &mut TaskFilter) {
        if self.editing && self.current() == FilterRow::Tags {
            self.commit_tag(filter);
        }
        self.editing = false;
    }

    /// Clears every filter and the sort; the tab stays.
    pub fn clear_all(&mut self, filter: &mut TaskFilter, sort: &mut Option<SortSpec>) {
        filter.clear();
        *sort = None;
        self.tag_input.clear();
        self.editing = false;
    }
}

/// Whether a toggle row is currently switched on.
pub fn is_selected(row: FilterRow, filter: &TaskFilter) -> bool {
    match row {
        FilterRow::Status(status) => filter.statuses.contains(&status),
        FilterRow::Priority(priority) => filter.priorities.contains(&priority),
        FilterRow::Category(category) => filter.categories.iter().any(|c| c.eq_ignore_ascii_case(category)),
        FilterRow::Date(range) => filter.date_range == Some(range),
        _ => false,
    }
}

pub fn sort_label(sort: &Option<SortSpec>) -> (&'static str, &'static str) {
    match sort {
        Some(spec) => (spec.key.label(), spec.order.label()),
        None => ("Default order", "-"),
    }
}
