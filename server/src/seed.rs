use chrono::{Local, NaiveDate};
use log::{info, warn};
use todomaster_shared::{Priority, Status, Task, DEFAULT_CATEGORIES};

use crate::store::TaskStore;

pub fn categories(store: &TaskStore) {
    for name in DEFAULT_CATEGORIES {
        store.ensure_category(name);
    }
    info!("Sample categories inserted");
}

struct Sample {
    title: &'static str,
    description: &'static str,
    priority: Priority,
    category: &'static str,
    status: Status,
    due: (i32, u32, u32),
    reminder: (u32, u32, u32, u32),
}

const SAMPLES: [Sample; 6] = [
    Sample {
        title: "Finish project report",
        description: "Complete the final report and send it to the manager.",
        priority: Priority::High,
        category: "Work",
        status: Status::InProgress,
        due: (2025, 7, 28),
        reminder: (7, 27, 10, 0),
    },
    Sample {
        title: "Buy groceries",
        description: "Milk, eggs, bread, fruits.",
        priority: Priority::Medium,
        category: "Shopping",
        status: Status::Todo,
        due: (2025, 7, 26),
        reminder: (7, 25, 17, 0),
    },
    Sample {
        title: "Gym session",
        description: "Leg day workout at the gym.",
        priority: Priority::Low,
        category: "Health",
        status: Status::Todo,
        due: (2025, 7, 26),
        reminder: (7, 26, 7, 30),
    },
    Sample {
        title: "Read 'Clean Code'",
        description: "Read chapters 3 and 4 of Clean Code.",
        priority: Priority::Medium,
        category: "Learning",
        status: Status::InProgress,
        due: (2025, 7, 29),
        reminder: (7, 28, 21, 0),
    },
    Sample {
        title: "Call mom",
        description: "Catch up with mom this weekend.",
        priority: Priority::Low,
        category: "Personal",
        status: Status::Done,
        due: (2025, 7, 27),
        reminder: (7, 27, 18, 0),
    },
    Sample {
        title: "Organize digital files",
        description: "Clean up downloads folder and sort documents.",
        priority: Priority::Low,
        category: "Other",
        status: Status::Todo,
        due: (2025, 7, 30),
        reminder: (7, 29, 16, 0),
    },
];

impl Sample {
    fn to_task(&self) -> Task {
        let (year, month, day) = self.due;
        let (r_month, r_day, hour, minute) = self.reminder;

        let mut task = Task::new(self.title);
        task.description = self.description.to_string();
        task.priority = self.priority;
        task.category_name = Some(self.category.to_string());
        task.status = self.status;
        task.due_date = NaiveDate::from_ymd_opt(year, month, day);
        task.reminder_date_time =
            NaiveDate::from_ymd_opt(year, r_month, r_day).and_then(|d| d.and_hms_opt(hour, minute, 0));
        task
    }
}

/// Inserts the sample tasks whose titles are not taken yet.
pub fn tasks(store: &TaskStore) {
    for sample in &SAMPLES {
        if store.find_by_title(sample.title).is_some() {
            continue;
        }
        if let Err(err) = store.create(sample.to_task(), Local::now().naive_local()) {
            warn!("Skipping sample task {:?}: {}", sample.title, err);
        }
    }
    info!("Sample tasks inserted");
}
