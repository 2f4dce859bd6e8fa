use crate::runtime::scheduler::Job;

pub struct TimerTask {
    pub id: u64,
    pub due_at: u64,
    pub job: Job,
}

impl std::fmt::Debug for TimerTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerTask")
            .field("id", &self.id)
            .field("due_at", &self.due_at)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
pub struct TaskQueue {
    tasks: Vec<TimerTask>,
}

impl TaskQueue {
    pub fn add(&mut self, task: TimerTask) {
        self.tasks.push(task);
    }

    /// Drops the timer with `id`. Returns `false` if it already ran or never existed.
    pub fn clear(&mut self, id: u64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    /// Earliest due task at or before `now_ms`; ties go to the one added first.
    pub fn next_ready_index(&self, now_ms: u64) -> Option<usize> {
        let mut best: Option<(usize, u64)> = None;
        for (idx, task) in self.tasks.iter().enumerate() {
            if task.due_at > now_ms {
                continue;
            }
            match best {
                Some((_, best_due)) if task.due_at >= best_due => {}
                _ => best = Some((idx, task.due_at)),
            }
        }
        best.map(|(idx, _)| idx)
    }

    pub fn next_due_time(&self) -> Option<u64> {
        self.tasks.iter().map(|task| task.due_at).min()
    }

    pub fn take(&mut self, idx: usize) -> TimerTask {
        self.tasks.remove(idx)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: u64, due_at: u64) -> TimerTask {
        TimerTask {
            id,
            due_at,
            job: Box::new(|| {}),
        }
    }

    #[test]
    fn earliest_due_task_is_ready_first() {
        let mut queue = TaskQueue::default();
        queue.add(task(1, 20));
        queue.add(task(2, 5));
        assert_eq!(queue.next_due_time(), Some(5));
        assert_eq!(queue.next_ready_index(4), None);
        let idx = queue.next_ready_index(30).expect("a task is due");
        assert_eq!(queue.take(idx).id, 2);
    }

    #[test]
    fn equal_deadlines_keep_insertion_order() {
        let mut queue = TaskQueue::default();
        queue.add(task(1, 10));
        queue.add(task(2, 10));
        let idx = queue.next_ready_index(10).expect("a task is due");
        assert_eq!(queue.take(idx).id, 1);
    }

    #[test]
    fn cleared_tasks_are_gone() {
        let mut queue = TaskQueue::default();
        queue.add(task(7, 1));
        assert!(queue.clear(7));
        assert!(!queue.clear(7));
        assert!(queue.is_empty());
    }
}
