//! Types and task-list logic shared by the todomaster server and its clients.

pub mod api;
pub mod draft;
pub mod filter;
mod lenient;
pub mod quick_add;
pub mod stats;
pub mod task;

pub use api::{ApiErrorResponse, TaskPatch};
pub use draft::{Field, FieldErrors, TaskDraft, REMINDER_OFFSETS, TITLE_MAX};
pub use filter::{Chip, DateRange, SortKey, SortOrder, SortSpec, StatusFilter, Tab, TaskFilter};
pub use quick_add::{QuickAdd, QuickAddDefaults, QuickAddError};
pub use stats::TaskCounts;
pub use task::{ParseEnumError, Priority, Status, Task, DEFAULT_CATEGORIES};
