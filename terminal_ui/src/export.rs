//! Exporting the task list to a file and importing it back.

use std::fmt::{self, Write as _};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use todomaster_shared::Task;

use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    Txt,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Json, ExportFormat::Csv, ExportFormat::Txt];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Txt => "txt",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON Format",
            ExportFormat::Csv => "CSV Format",
            ExportFormat::Txt => "Plain Text",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Error)]
#[error("unknown export format `{0}` (expected json, csv or txt)")]
pub struct UnknownFormat(String);

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "txt" | "text" => Ok(ExportFormat::Txt),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("invalid export data: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// What a JSON export holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub settings: Option<Settings>,
    #[serde(default)]
    pub export_date: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImportFile {
    Bundle(ExportBundle),
    Tasks(Vec<Task>),
}

pub fn file_name(format: ExportFormat, at: DateTime<Utc>) -> String {
    format!("todomaster-export-{}.{}", at.format("%Y-%m-%d"), format.extension())
}

/// Completed tasks are left out unless the backup settings ask for them.
pub fn render(format: ExportFormat, tasks: &[Task], settings: &Settings, at: DateTime<Utc>) -> Result<String> {
    let tasks: Vec<&Task> = tasks
        .iter()
        .filter(|task| settings.data.backup_completed || !task.is_completed())
        .collect();

    let rendered = match format {
        ExportFormat::Json => {
            let bundle = ExportBundle {
                tasks: tasks.into_iter().cloned().collect(),
                settings: Some(settings.clone()),
                export_date: Some(at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            };
            serde_json::to_string_pretty(&bundle)?
        }
        ExportFormat::Csv => {
            let mut out = String::from("ID,Title,Completed,Priority,Category,Due Date");
            for task in tasks {
                let _ = write!(
                    out,
                    "\n{},{},{},{},{},{}",
                    task.uuid,
                    csv_field(&task.title),
                    task.is_completed(),
                    task.priority.as_str().to_lowercase(),
                    csv_field(task.category_name.as_deref().unwrap_or("")),
                    task.due_date.map(|d| d.to_string()).unwrap_or_default(),
                );
            }
            out
        }
        ExportFormat::Txt => tasks
            .iter()
            .map(|task| {
                let state = if task.is_completed() { "Done" } else { "Pending" };
                format!("{} - {} - {}", task.title, task.priority.label(), state)
            })
            .collect::<Vec<_>>()
            .join("\n"),
    };
    Ok(rendered)
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Writes an export into `dir` and returns the file's path.
pub fn write(
    dir: &Path,
    format: ExportFormat,
    tasks: &[Task],
    settings: &Settings,
    at: DateTime<Utc>,
) -> Result<PathBuf> {
    let contents = render(format, tasks, settings, at)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name(format, at));
    fs::write(&path, contents)?;
    Ok(path)
}

/// Accepts a JSON export or a bare array of tasks.
pub fn parse_import(contents: &str) -> Result<Vec<Task>> {
    Ok(match serde_json::from_str(contents)? {
        ImportFile::Bundle(bundle) => bundle.tasks,
        ImportFile::Tasks(tasks) => tasks,
    })
}

pub fn read_import(path: &Path) -> Result<Vec<Task>> {
    parse_import(&fs::read_to_string(path)?)
}
