//! Client-side filtering and sorting of a task list.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::task::{ParseEnumError, Priority, Status, Task};

/// The three dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    All,
    Active,
    Completed,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::All, Tab::Active, Tab::Completed];

    pub fn label(self) -> &'static str {
        match self {
            Tab::All => "All",
            Tab::Active => "Active",
            Tab::Completed => "Completed",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Tab::All => Tab::Active,
            Tab::Active => Tab::Completed,
            Tab::Completed => Tab::All,
        }
    }

    fn admits(self, task: &Task) -> bool {
        match self {
            Tab::All => true,
            Tab::Active => !task.is_completed(),
            Tab::Completed => task.is_completed(),
        }
    }
}

impl FromStr for Tab {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Tab::All),
            "active" | "pending" => Ok(Tab::Active),
            "completed" | "done" => Ok(Tab::Completed),
            _ => Err(ParseEnumError::new("tab", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    /// Anything not yet done, in progress included.
    Pending,
    InProgress,
    Completed,
    Overdue,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 4] = [
        StatusFilter::Pending,
        StatusFilter::InProgress,
        StatusFilter::Completed,
        StatusFilter::Overdue,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::Pending => "Pending",
            StatusFilter::InProgress => "In progress",
            StatusFilter::Completed => "Completed",
            StatusFilter::Overdue => "Overdue",
        }
    }

    fn admits(self, task: &Task, today: NaiveDate) -> bool {
        match self {
            StatusFilter::Pending => !task.is_completed(),
            StatusFilter::InProgress => task.status == Status::InProgress,
            StatusFilter::Completed => task.is_completed(),
            StatusFilter::Overdue => task.is_overdue(today),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateRange {
    Today,
    Tomorrow,
    /// Sunday through Saturday of the week containing today.
    ThisWeek,
    Overdue,
    /// Inclusive on both ends; an open end is unbounded.
    Custom {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

impl DateRange {
    pub const PRESETS: [DateRange; 4] = [
        DateRange::Today,
        DateRange::Tomorrow,
        DateRange::ThisWeek,
        DateRange::Overdue,
    ];

    pub fn label(&self) -> String {
        match self {
            DateRange::Today => "Today".to_string(),
            DateRange::Tomorrow => "Tomorrow".to_string(),
            DateRange::ThisWeek => "This week".to_string(),
            DateRange::Overdue => "Overdue".to_string(),
            DateRange::Custom { from, to } => {
                let bound = |d: &Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "…".into());
                format!("{} – {}", bound(from), bound(to))
            }
        }
    }

    fn admits(&self, task: &Task, today: NaiveDate) -> bool {
        let Some(due) = task.due_date else {
            return false;
        };
        match self {
            DateRange::Today => due == today,
            DateRange::Tomorrow => Some(due) == today.succ_opt(),
            DateRange::ThisWeek => {
                let start = today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
                let end = start + Duration::days(6);
                start <= due && due <= end
            }
            DateRange::Overdue => task.is_overdue(today),
            DateRange::Custom { from, to } => {
                from.map_or(true, |from| due >= from) && to.map_or(true, |to| due <= to)
            }
        }
    }
}

impl FromStr for DateRange {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(DateRange::Today),
            "tomorrow" => Ok(DateRange::Tomorrow),
            "this-week" | "week" => Ok(DateRange::ThisWeek),
            "overdue" => Ok(DateRange::Overdue),
            _ => Err(ParseEnumError::new("date range", s)),
        }
    }
}

/// One removable piece of an active filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chip {
    Priority(Priority),
    Category(String),
    Status(StatusFilter),
    DateRange(DateRange),
    Tag(String),
}

impl fmt::Display for Chip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chip::Priority(p) => write!(f, "priority: {p}"),
            Chip::Category(c) => write!(f, "category: {c}"),
            Chip::Status(s) => write!(f, "status: {}", s.label()),
            Chip::DateRange(r) => write!(f, "due: {}", r.label()),
            Chip::Tag(t) => write!(f, "#{t}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    pub tab: Tab,
    pub query: String,
    pub priorities: Vec<Priority>,
    pub categories: Vec<String>,
    pub statuses: Vec<StatusFilter>,
    pub date_range: Option<DateRange>,
    pub tags: Vec<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        self.tab.admits(task)
            && self.matches_query(task)
            && (self.priorities.is_empty() || self.priorities.contains(&task.priority))
            && (self.categories.is_empty() || self.categories.iter().any(|c| task.in_category(c)))
            && (self.statuses.is_empty() || self.statuses.iter().any(|s| s.admits(task, today)))
            && self.date_range.as_ref().map_or(true, |range| range.admits(task, today))
            && (self.tags.is_empty() || self.matches_tags(task))
    }

    pub fn apply<'a>(&self, tasks: &'a [Task], today: NaiveDate) -> Vec<&'a Task> {
        tasks.iter().filter(|task| self.matches(task, today)).collect()
    }

    fn matches_query(&self, task: &Task) -> bool {
        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        task.title.to_lowercase().contains(&query)
            || task.description.to_lowercase().contains(&query)
            || task.tags.iter().any(|tag| tag.to_lowercase().contains(&query))
    }

    fn matches_tags(&self, task: &Task) -> bool {
        task.tags.iter().any(|tag| {
            let tag = tag.to_lowercase();
            self.tags.iter().any(|wanted| tag.contains(&wanted.to_lowercase()))
        })
    }

    /// Whether anything beyond the tab and search box narrows the list.
    pub fn has_advanced(&self) -> bool {
        !self.priorities.is_empty()
            || !self.categories.is_empty()
            || !self.statuses.is_empty()
            || self.date_range.is_some()
            || !self.tags.is_empty()
    }

    pub fn chips(&self) -> Vec<Chip> {
        let mut chips: Vec<Chip> = Vec::new();
        chips.extend(self.statuses.iter().copied().map(Chip::Status));
        chips.extend(self.priorities.iter().copied().map(Chip::Priority));
        chips.extend(self.categories.iter().cloned().map(Chip::Category));
        chips.extend(self.date_range.map(Chip::DateRange));
        chips.extend(self.tags.iter().cloned().map(Chip::Tag));
        chips
    }

    pub fn remove(&mut self, chip: &Chip) {
        match chip {
            Chip::Priority(p) => self.priorities.retain(|x| x != p),
            Chip::Category(c) => self.categories.retain(|x| !x.eq_ignore_ascii_case(c)),
            Chip::Status(s) => self.statuses.retain(|x| x != s),
            Chip::DateRange(_) => self.date_range = None,
            Chip::Tag(t) => self.tags.retain(|x| x != t),
        }
    }

    /// Drops every advanced filter and the search query; the tab is kept.
    pub fn clear(&mut self) {
        *self = TaskFilter {
            tab: self.tab,
            ..TaskFilter::default()
        };
    }

    pub fn toggle_priority(&mut self, priority: Priority) {
        toggle(&mut self.priorities, priority);
    }

    pub fn toggle_category(&mut self, category: &str) {
        if self.categories.iter().any(|c| c.eq_ignore_ascii_case(category)) {
            self.categories.retain(|c| !c.eq_ignore_ascii_case(category));
        } else {
            self.categories.push(category.to_string());
        }
    }

    pub fn toggle_status(&mut self, status: StatusFilter) {
        toggle(&mut self.statuses, status);
    }

    /// Selecting the active range again clears it.
    pub fn toggle_date_range(&mut self, range: DateRange) {
        self.date_range = match self.date_range {
            Some(current) if current == range => None,
            _ => Some(range),
        };
    }
}

fn toggle<T: PartialEq>(values: &mut Vec<T>, value: T) {
    if let Some(index) = values.iter().position(|v| *v == value) {
        values.remove(index);
    } else {
        values.push(value);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    DueDate,
    Priority,
    CreatedDate,
    Alphabetical,
    Category,
    Status,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::DueDate,
        SortKey::Priority,
        SortKey::CreatedDate,
        SortKey::Alphabetical,
        SortKey::Category,
        SortKey::Status,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::DueDate => "Due Date",
            SortKey::Priority => "Priority",
            SortKey::CreatedDate => "Created Date",
            SortKey::Alphabetical => "Alphabetical",
            SortKey::Category => "Category",
            SortKey::Status => "Status",
        }
    }

    pub fn next(self) -> Self {
        let index = SortKey::ALL.iter().position(|k| *k == self).unwrap_or(0);
        SortKey::ALL[(index + 1) % SortKey::ALL.len()]
    }

    /// `None` marks a task with nothing to sort on.
    fn compare(self, a: &Task, b: &Task) -> Option<Ordering> {
        fn both<T: Ord>(a: Option<T>, b: Option<T>) -> Option<Ordering> {
            Some(a?.cmp(&b?))
        }
        match self {
            SortKey::DueDate => both(a.due_date, b.due_date),
            SortKey::Priority => Some(a.priority.cmp(&b.priority)),
            SortKey::CreatedDate => both(a.created_at, b.created_at),
            SortKey::Alphabetical => Some(a.title.to_lowercase().cmp(&b.title.to_lowercase())),
            SortKey::Category => both(
                a.category_name.as_deref().map(str::to_lowercase),
                b.category_name.as_deref().map(str::to_lowercase),
            ),
            SortKey::Status => Some(a.status.cmp(&b.status)),
        }
    }

    fn has_value(self, task: &Task) -> bool {
        match self {
            SortKey::DueDate => task.due_date.is_some(),
            SortKey::CreatedDate => task.created_at.is_some(),
            SortKey::Category => task.category_name.is_some(),
            SortKey::Priority | SortKey::Alphabetical | SortKey::Status => true,
        }
    }
}

impl FromStr for SortKey {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "due" | "due-date" | "duedate" => Ok(SortKey::DueDate),
            "priority" => Ok(SortKey::Priority),
            "created" | "created-date" | "createddate" => Ok(SortKey::CreatedDate),
            "title" | "alphabetical" => Ok(SortKey::Alphabetical),
            "category" => Ok(SortKey::Category),
            "status" => Ok(SortKey::Status),
            _ => Err(ParseEnumError::new("sort key", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn flip(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Asc => "Ascending",
            SortOrder::Desc => "Descending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortSpec {
    /// Stable sort; tasks lacking the sort field trail in either direction.
    pub fn sort(&self, tasks: &mut [&Task]) {
        tasks.sort_by(|a, b| match (self.key.has_value(a), self.key.has_value(b)) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => Ordering::Equal,
            (true, true) => {
                let ordering = self.key.compare(a, b).unwrap_or(Ordering::Equal);
                match self.order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // Wednesday.
    fn today() -> NaiveDate {
        date(2025, 7, 23)
    }

    fn task(title: &str, priority: Priority, category: &str, due: Option<NaiveDate>) -> Task {
        let mut task = Task::new(title);
        task.priority = priority;
        task.category_name = Some(category.to_string());
        task.due_date = due;
        task
    }

    fn sample() -> Vec<Task> {
        let mut proposal = task("Complete project proposal", Priority::High, "Work", Some(date(2025, 7, 25)));
        proposal.description = "Finalize the Q4 proposal for the client".into();
        proposal.tags = vec!["urgent".into(), "client".into()];

        let mut groceries = task("Buy groceries", Priority::Medium, "Shopping", Some(date(2025, 7, 24)));
        groceries.tags = vec!["weekly".into()];

        let mut meeting = task("Schedule team meeting", Priority::Low, "Work", Some(date(2025, 7, 23)));
        meeting.status = Status::Done;

        let mut reports = task("Review quarterly reports", Priority::Urgent, "Work", Some(date(2025, 7, 22)));
        reports.status = Status::InProgress;

        let someday = task("Learn the banjo", Priority::Low, "Learning", None);

        vec![proposal, groceries, meeting, reports, someday]
    }

    fn titles(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn tabs_split_on_completion() {
        let tasks = sample();
        let mut filter = TaskFilter::default();
        assert_eq!(filter.apply(&tasks, today()).len(), 5);

        filter.tab = Tab::Active;
        assert_eq!(filter.apply(&tasks, today()).len(), 4);

        filter.tab = Tab::Completed;
        assert_eq!(titles(&filter.apply(&tasks, today())), vec!["Schedule team meeting"]);
    }

    #[test]
    fn query_searches_title_description_and_tags() {
        let tasks = sample();
        let mut filter = TaskFilter {
            query: "  Q4 ".into(),
            ..TaskFilter::default()
        };
        assert_eq!(titles(&filter.apply(&tasks, today())), vec!["Complete project proposal"]);

        filter.query = "WEEK".into();
        assert_eq!(titles(&filter.apply(&tasks, today())), vec!["Buy groceries"]);
    }

    #[test]
    fn advanced_filters_combine_with_and() {
        let tasks = sample();
        let mut filter = TaskFilter::default();
        filter.toggle_category("work");
        filter.toggle_priority(Priority::High);
        filter.toggle_priority(Priority::Urgent);

        assert_eq!(
            titles(&filter.apply(&tasks, today())),
            vec!["Complete project proposal", "Review quarterly reports"]
        );
    }

    #[test]
    fn statuses_combine_with_or() {
        let tasks = sample();
        let mut filter = TaskFilter::default();
        filter.toggle_status(StatusFilter::Completed);
        filter.toggle_status(StatusFilter::Overdue);

        assert_eq!(
            titles(&filter.apply(&tasks, today())),
            vec!["Schedule team meeting", "Review quarterly reports"]
        );

        filter.clear();
        filter.toggle_status(StatusFilter::InProgress);
        assert_eq!(titles(&filter.apply(&tasks, today())), vec!["Review quarterly reports"]);
    }

    #[test]
    fn date_ranges() {
        let tasks = sample();
        let mut filter = TaskFilter::default();

        filter.date_range = Some(DateRange::Today);
        assert_eq!(titles(&filter.apply(&tasks, today())), vec!["Schedule team meeting"]);

        filter.date_range = Some(DateRange::Tomorrow);
        assert_eq!(titles(&filter.apply(&tasks, today())), vec!["Buy groceries"]);

        // Week of Sunday 2025-07-20 .. Saturday 2025-07-26; undated tasks never match.
        filter.date_range = Some(DateRange::ThisWeek);
        assert_eq!(filter.apply(&tasks, today()).len(), 4);

        filter.date_range = Some(DateRange::Overdue);
        assert_eq!(titles(&filter.apply(&tasks, today())), vec!["Review quarterly reports"]);

        filter.date_range = Some(DateRange::Custom {
            from: Some(date(2025, 7, 24)),
            to: None,
        });
        assert_eq!(
            titles(&filter.apply(&tasks, today())),
            vec!["Complete project proposal", "Buy groceries"]
        );

        filter.date_range = Some(DateRange::Custom {
            from: None,
            to: Some(today()),
        });
        assert_eq!(
            titles(&filter.apply(&tasks, today())),
            vec!["Schedule team meeting", "Review quarterly reports"]
        );
    }

    #[test]
    fn tags_match_by_substring() {
        let tasks = sample();
        let filter = TaskFilter {
            tags: vec!["CLI".into()],
            ..TaskFilter::default()
        };
        assert_eq!(titles(&filter.apply(&tasks, today())), vec!["Complete project proposal"]);
    }

    #[test]
    fn chips_round_trip_through_remove() {
        let mut filter = TaskFilter::default();
        assert!(!filter.has_advanced());

        filter.toggle_priority(Priority::High);
        filter.toggle_category("Work");
        filter.toggle_date_range(DateRange::Today);
        filter.tags.push("client".into());
        assert!(filter.has_advanced());
        assert_eq!(filter.chips().len(), 4);

        for chip in filter.chips() {
            filter.remove(&chip);
        }
        assert!(!filter.has_advanced());
    }

    #[test]
    fn toggling_the_same_range_clears_it() {
        let mut filter = TaskFilter::default();
        filter.toggle_date_range(DateRange::Overdue);
        filter.toggle_date_range(DateRange::Overdue);
        assert_eq!(filter.date_range, None);
    }

    #[test]
    fn clear_keeps_the_tab() {
        let mut filter = TaskFilter {
            tab: Tab::Completed,
            query: "x".into(),
            priorities: vec![Priority::Low],
            ..TaskFilter::default()
        };
        filter.clear();
        assert_eq!(filter.tab, Tab::Completed);
        assert!(filter.query.is_empty());
        assert!(!filter.has_advanced());
    }

    #[test]
    fn sorts_by_due_date_with_missing_last() {
        let tasks = sample();
        let mut refs: Vec<&Task> = tasks.iter().collect();

        SortSpec::default().sort(&mut refs);
        assert_eq!(refs[0].title, "Review quarterly reports");
        assert_eq!(refs[4].title, "Learn the banjo");

        SortSpec {
            key: SortKey::DueDate,
            order: SortOrder::Desc,
        }
        .sort(&mut refs);
        assert_eq!(refs[0].title, "Complete project proposal");
        assert_eq!(refs[4].title, "Learn the banjo");
    }

    #[test]
    fn sorts_by_category_and_created_with_missing_last() {
        let mut tasks = sample();
        tasks[1].category_name = None;
        tasks[0].created_at = date(2025, 7, 20).and_hms_opt(9, 0, 0);
        tasks[2].created_at = date(2025, 7, 21).and_hms_opt(9, 0, 0);
        let mut refs: Vec<&Task> = tasks.iter().collect();

        for order in [SortOrder::Asc, SortOrder::Desc] {
            SortSpec {
                key: SortKey::Category,
                order,
            }
            .sort(&mut refs);
            assert_eq!(refs[4].title, "Buy groceries");
        }
        assert_eq!(refs[3].title, "Learn the banjo");

        SortSpec {
            key: SortKey::CreatedDate,
            order: SortOrder::Asc,
        }
        .sort(&mut refs);
        assert_eq!(titles(&refs[..2]), vec!["Complete project proposal", "Schedule team meeting"]);

        SortSpec {
            key: SortKey::CreatedDate,
            order: SortOrder::Desc,
        }
        .sort(&mut refs);
        assert_eq!(titles(&refs[..2]), vec!["Schedule team meeting", "Complete project proposal"]);
    }

    #[test]
    fn sorts_by_priority_and_title() {
        let tasks = sample();
        let mut refs: Vec<&Task> = tasks.iter().collect();

        SortSpec {
            key: SortKey::Priority,
            order: SortOrder::Desc,
        }
        .sort(&mut refs);
        assert_eq!(refs[0].priority, Priority::Urgent);
        assert_eq!(refs[1].priority, Priority::High);

        SortSpec {
            key: SortKey::Alphabetical,
            order: SortOrder::Asc,
        }
        .sort(&mut refs);
        assert_eq!(refs[0].title, "Buy groceries");
    }

    #[test]
    fn parses_cli_words() {
        assert_eq!("done".parse::<Tab>(), Ok(Tab::Completed));
        assert_eq!("title".parse::<SortKey>(), Ok(SortKey::Alphabetical));
        assert_eq!("week".parse::<DateRange>(), Ok(DateRange::ThisWeek));
        assert!("sometime".parse::<DateRange>().is_err());
    }
}
