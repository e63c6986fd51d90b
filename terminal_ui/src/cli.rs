//! One-shot commands for scripting; without a subcommand the dashboard opens.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use log::warn;
use todomaster_shared::{DateRange, Priority, QuickAddDefaults, SortKey, SortOrder, SortSpec, Status, Tab, Task};
use uuid::Uuid;

use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::export::{self, ExportFormat};
use crate::service::TaskService;
use crate::settings::Settings;
use crate::storage::{LocalStorage, TOKEN_KEY};

#[derive(Debug, Parser)]
#[command(name = "todomaster", version, about = "Keyboard-driven task manager")]
pub struct Cli {
    /// Base URL of the task API, e.g. http://localhost:8080/api/v1
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Directory for local data and logs
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive dashboard
    Tui,

    /// Print tasks
    List {
        /// Match title, description or tags
        #[arg(short, long)]
        search: Option<String>,
        /// all, active or completed
        #[arg(short, long, default_value = "all")]
        tab: Tab,
        /// Only these priorities (repeatable)
        #[arg(short, long)]
        priority: Vec<Priority>,
        /// Only these categories (repeatable)
        #[arg(short, long)]
        category: Vec<String>,
        /// today, tomorrow, this-week or overdue
        #[arg(long, conflicts_with_all = ["from", "to"])]
        due: Option<DateRange>,
        /// Due on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Due on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// due-date, priority, created, title, category or status
        #[arg(long)]
        sort: Option<SortKey>,
        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,
        /// Use the local copy without asking the server
        #[arg(long)]
        offline: bool,
    },

    /// Add a task: `todomaster add Call mom !high @personal #family due:2025-08-01`
    Add {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Mark a task completed
    Done {
        /// Task uuid or a unique prefix of it
        id: String,
    },

    /// Delete a task
    Rm {
        /// Task uuid or a unique prefix of it
        id: String,
    },

    /// Write all tasks to a file
    Export {
        /// json, csv or txt (defaults to the format chosen in settings)
        #[arg(short, long)]
        format: Option<ExportFormat>,
        /// Target directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Load tasks from a JSON export
    Import { file: PathBuf },

    /// Store the bearer token sent with every request
    Login { token: String },

    /// Forget the stored token
    Logout,
}

/// Resolves a full uuid or an unambiguous prefix against the known tasks.
fn resolve(tasks: &[Task], id: &str) -> Result<Uuid> {
    if let Ok(uuid) = Uuid::parse_str(id) {
        return Ok(uuid);
    }
    let id = id.trim().to_ascii_lowercase();
    if id.is_empty() {
        bail!("Task id must not be empty");
    }
    let matches: Vec<&Task> = tasks
        .iter()
        .filter(|task| task.uuid.to_string().starts_with(&id))
        .collect();
    match matches.as_slice() {
        [task] => Ok(task.uuid),
        [] => bail!("No task matches `{id}`"),
        _ => bail!("`{id}` matches {} tasks, use more characters", matches.len()),
    }
}

fn format_task(task: &Task) -> String {
    let mut line = format!(
        "{} [{}] {} ({})",
        &task.uuid.to_string()[..8],
        if task.is_completed() { "x" } else { " " },
        task.title,
        task.priority.label()
    );
    if let Some(category) = &task.category_name {
        line.push_str(&format!(" @{category}"));
    }
    if let Some(due) = task.due_date {
        line.push_str(&format!(" due:{due}"));
    }
    for tag in &task.tags {
        line.push_str(&format!(" #{tag}"));
    }
    line
}

/// Local copy, refreshed from the server when it answers.
async fn load(dashboard: &mut Dashboard, service: &TaskService, offline: bool) {
    dashboard.load_local();
    if offline {
        return;
    }
    if let Err(err) = dashboard.sync(service).await {
        warn!("Using local tasks, sync failed: {}", err);
        eprintln!("warning: server unreachable, showing local tasks ({err})");
    }
}

pub async fn run(command: Command, service: TaskService, storage: LocalStorage, config: &Config) -> Result<()> {
    let mut dashboard = Dashboard::new(storage.clone());
    let settings = Settings::load(&storage);

    match command {
        Command::Tui => bail!("the dashboard is started from main"),
        Command::List {
            search,
            tab,
            priority,
            category,
            due,
            from,
            to,
            sort,
            desc,
            offline,
        } => {
            load(&mut dashboard, &service, offline).await;
            let filter = &mut dashboard.filter;
            filter.tab = tab;
            filter.query = search.unwrap_or_default();
            filter.priorities = priority;
            filter.categories = category;
            filter.date_range = due.or_else(|| (from.is_some() || to.is_some()).then_some(DateRange::Custom { from, to }));
            dashboard.sort = sort.map(|key| SortSpec {
                key,
                order: if desc { SortOrder::Desc } else { SortOrder::Asc },
            });

            let visible = dashboard.visible(Local::now().date_naive());
            for task in &visible {
                println!("{}", format_task(task));
            }
            let counts = dashboard.counts();
            println!(
                "{} shown, {} active, {} completed ({}%)",
                visible.len(),
                counts.active,
                counts.completed,
                counts.completion_percentage()
            );
        }
        Command::Add { text } => {
            load(&mut dashboard, &service, true).await;
            let input = text.join(" ");
            let defaults = QuickAddDefaults {
                priority: settings.tasks.default_priority,
                category: settings.default_category(),
                due_date: None,
            };
            let uuid = dashboard
                .add_quick(&input, &defaults, &service)
                .await
                .context("Failed to add task")?;
            if let Some(task) = dashboard.find(uuid) {
                println!("{}", format_task(task));
            }
        }
        Command::Done { id } => {
            load(&mut dashboard, &service, false).await;
            let uuid = resolve(dashboard.tasks(), &id)?;
            dashboard.set_status(uuid, Status::Done, &service).await?;
            println!("Completed {}", uuid);
        }
        Command::Rm { id } => {
            load(&mut dashboard, &service, false).await;
            let uuid = resolve(dashboard.tasks(), &id)?;
            dashboard.delete(uuid, &service).await?;
            println!("Deleted {}", uuid);
        }
        Command::Export { format, out } => {
            load(&mut dashboard, &service, false).await;
            let format = format.unwrap_or(settings.data.export_format);
            let dir = out.unwrap_or_else(|| config.export_dir());
            let path = export::write(&dir, format, dashboard.tasks(), &settings, Utc::now())
                .with_context(|| format!("Failed to export to {}", dir.display()))?;
            println!("Exported {} tasks to {}", dashboard.tasks().len(), path.display());
        }
        Command::Import { file } => {
            let tasks = export::read_import(&file).with_context(|| format!("Failed to read {}", file.display()))?;
            load(&mut dashboard, &service, false).await;
            let count = dashboard.import(tasks, &service).await?;
            println!("Imported {count} tasks");
        }
        Command::Login { token } => {
            storage.set(TOKEN_KEY, token.trim()).context("Failed to store token")?;
            println!("Token saved");
        }
        Command::Logout => {
            storage.remove(TOKEN_KEY).context("Failed to remove token")?;
            println!("Logged out");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_list_flags() {
        let cli = Cli::parse_from([
            "todomaster", "list", "--tab", "active", "--sort", "priority", "--desc", "-p", "high", "-p", "urgent",
        ]);
        match cli.command {
            Some(Command::List {
                tab, sort, desc, priority, ..
            }) => {
                assert_eq!(tab, Tab::Active);
                assert_eq!(sort, Some(SortKey::Priority));
                assert!(desc);
                assert_eq!(priority, [Priority::High, Priority::Urgent]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn quick_add_words_are_kept() {
        let cli = Cli::parse_from(["todomaster", "add", "Call", "mom", "!high", "@personal"]);
        match cli.command {
            Some(Command::Add { text }) => assert_eq!(text.join(" "), "Call mom !high @personal"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn no_subcommand_means_dashboard() {
        let cli = Cli::parse_from(["todomaster", "--api-url", "http://tasks:8080/api/v1"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.api_url.as_deref(), Some("http://tasks:8080/api/v1"));
    }

    #[test]
    fn ids_resolve_by_prefix() {
        let a = Task::new("a");
        let b = Task::new("b");
        let tasks = vec![a.clone(), b];
        let prefix = &a.uuid.to_string()[..8];

        assert_eq!(resolve(&tasks, prefix).unwrap(), a.uuid);
        assert_eq!(resolve(&tasks, &a.uuid.to_string()).unwrap(), a.uuid);
        assert!(resolve(&tasks, "zzzz").is_err());
        assert!(resolve(&tasks, "").is_err());
    }

    #[test]
    fn empty_id_never_matches_a_lone_task() {
        let tasks = vec![Task::new("only")];
        assert!(resolve(&tasks, "").is_err());
        assert!(resolve(&tasks, "  ").is_err());
    }

    struct Fixture {
        dir: tempfile::TempDir,
        server: MockServer,
        storage: LocalStorage,
    }

    impl Fixture {
        async fn new(tasks: &[Task]) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let server = MockServer::start().await;
            let storage = LocalStorage::open(dir.path().join("storage")).unwrap();
            storage.save(crate::storage::TODOS_KEY, tasks).unwrap();
            Fixture { dir, server, storage }
        }

        async fn run(&self, command: Command) -> Result<()> {
            let service = TaskService::new(&format!("{}/api/v1", self.server.uri()), self.storage.clone()).unwrap();
            let config = Config {
                export_dir: Some(self.dir.path().join("exports")),
                ..Config::default()
            };
            run(command, service, self.storage.clone(), &config).await
        }

        fn stored(&self) -> Vec<Task> {
            self.storage.load(crate::storage::TODOS_KEY).unwrap().unwrap_or_default()
        }
    }

    #[tokio::test]
    async fn done_by_prefix_puts_completed_task() {
        let task = Task::new("File taxes");
        let f = Fixture::new(&[task.clone()]).await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "uuid": task.uuid.to_string(), "title": "File taxes" }
            ])))
            .mount(&f.server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "uuid": task.uuid.to_string(), "title": "File taxes", "status": "DONE"
            })))
            .expect(1)
            .mount(&f.server)
            .await;

        f.run(Command::Done {
            id: task.uuid.to_string()[..8].to_string(),
        })
        .await
        .unwrap();
        assert!(f.stored()[0].is_completed());
    }

    #[tokio::test]
    async fn rm_works_from_local_copy_when_sync_fails() {
        let keep = Task::new("Keep");
        let gone = Task::new("Gone");
        let f = Fixture::new(&[keep.clone(), gone.clone()]).await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&f.server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&f.server)
            .await;

        f.run(Command::Rm {
            id: gone.uuid.to_string(),
        })
        .await
        .unwrap();
        let left = f.stored();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].uuid, keep.uuid);
    }

    #[tokio::test]
    async fn unknown_id_is_an_error() {
        let f = Fixture::new(&[Task::new("Only")]).await;
        let result = f
            .run(Command::Done {
                id: "zzzzzzzz".into(),
            })
            .await;
        assert!(result.is_err());
        assert!(!f.stored()[0].is_completed());
    }

    #[tokio::test]
    async fn export_then_import_round_trips_through_files() {
        let f = Fixture::new(&[Task::new("Water plants")]).await;
        f.run(Command::Export {
            format: Some(ExportFormat::Json),
            out: None,
        })
        .await
        .unwrap();
        let exported: Vec<_> = std::fs::read_dir(f.dir.path().join("exports"))
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(exported.len(), 1);

        let other = Fixture::new(&[]).await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&other.server)
            .await;
        assert!(other.run(Command::Import { file: exported[0].clone() }).await.is_err());
        assert_eq!(other.stored()[0].title, "Water plants");
    }

    #[tokio::test]
    async fn login_and_logout_manage_the_token() {
        let f = Fixture::new(&[]).await;
        f.run(Command::Login {
            token: " secret \n".into(),
        })
        .await
        .unwrap();
        assert_eq!(f.storage.get(TOKEN_KEY).unwrap().as_deref(), Some("secret"));

        f.run(Command::Logout).await.unwrap();
        assert_eq!(f.storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn add_uses_quick_add_syntax() {
        let f = Fixture::new(&[]).await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&f.server)
            .await;

        let result = f
            .run(Command::Add {
                text: vec!["Call".into(), "mom".into(), "!high".into()],
            })
            .await;
        assert!(result.is_err());
        let stored = f.stored();
        assert_eq!(stored[0].title, "Call mom");
        assert_eq!(stored[0].priority, Priority::High);
    }
}
