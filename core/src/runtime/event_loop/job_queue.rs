use std::collections::VecDeque;

use crate::runtime::scheduler::Job;

#[derive(Default)]
pub struct JobQueue {
    queue: VecDeque<Job>,
}

impl JobQueue {
    pub fn enqueue(&mut self, job: Job) {
        self.queue.push_back(job);
    }

    pub fn pop(&mut self) -> Option<Job> {
        self.queue.pop_front()
    }
}
