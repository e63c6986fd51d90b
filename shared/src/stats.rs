use crate::task::Task;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub all: usize,
    pub active: usize,
    pub completed: usize,
}

impl TaskCounts {
    pub fn of(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|task| task.is_completed()).count();
        TaskCounts {
            all: tasks.len(),
            active: tasks.len() - completed,
            completed,
        }
    }

    /// Rounded to the nearest whole percent; an empty list is 0%.
    pub fn completion_percentage(&self) -> u16 {
        if self.all == 0 {
            return 0;
        }
        ((self.completed as f64 / self.all as f64) * 100.0).round() as u16
    }

    pub fn has_active(&self) -> bool {
        self.active > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Status;

    #[test]
    fn counts_and_percentage() {
        let mut tasks: Vec<Task> = (0..3).map(|i| Task::new(format!("task {i}"))).collect();
        tasks[0].status = Status::Done;
        tasks[1].status = Status::InProgress;

        let counts = TaskCounts::of(&tasks);
        assert_eq!(counts, TaskCounts { all: 3, active: 2, completed: 1 });
        assert_eq!(counts.completion_percentage(), 33);
        assert!(counts.has_active());
    }

    #[test]
    fn empty_list() {
        let counts = TaskCounts::of(&[]);
        assert_eq!(counts.completion_percentage(), 0);
        assert!(!counts.has_active());
    }
}
