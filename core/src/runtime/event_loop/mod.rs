mod job_queue;
mod task_queue;

use std::cell::{Cell, RefCell};
use std::time::Duration;

use crate::errors::LoopError;
use crate::runtime::scheduler::{Job, Scheduler};
use crate::runtime::value::promise::Promise;

pub use job_queue::JobQueue;
pub use task_queue::{TaskQueue, TimerTask};

#[derive(Default)]
struct LoopState {
    now_ms: u64,
    next_timer_id: u64,
    steps: usize,
    jobs: JobQueue,
    timers: TaskQueue,
}

/// Single-threaded FIFO job queue with a timer wheel on the side.
///
/// Jobs queued through [`Scheduler::schedule`] always run before the clock
/// advances to the next timer. The clock is virtual unless realtime timers are
/// enabled, in which case the loop sleeps until a timer is due.
pub struct EventLoop {
    state: RefCell<LoopState>,
    realtime: bool,
    runtime: Option<tokio::runtime::Runtime>,
    max_steps: Cell<Option<usize>>,
}

impl EventLoop {
    pub fn new() -> Self {
        Self::new_with_realtime(false)
    }

    pub fn new_with_realtime(realtime: bool) -> Self {
        let runtime = if realtime {
            tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .ok()
        } else {
            None
        };

        Self {
            state: RefCell::new(LoopState {
                next_timer_id: 1,
                ..LoopState::default()
            }),
            realtime,
            runtime,
            max_steps: Cell::new(None),
        }
    }

    pub fn set_max_steps(&self, max: usize) {
        self.max_steps.set(Some(max));
    }

    pub fn now_ms(&self) -> u64 {
        self.state.borrow().now_ms
    }

    /// Number of jobs and timers run so far.
    pub fn steps(&self) -> usize {
        self.state.borrow().steps
    }

    /// Runs `job` once at least `delay_ms` have elapsed. Returns a timer id.
    pub fn set_timeout(&self, delay_ms: u64, job: Job) -> u64 {
        let mut state = self.state.borrow_mut();
        let id = state.next_timer_id;
        state.next_timer_id += 1;
        let due_at = state.now_ms.saturating_add(delay_ms);
        state.timers.add(TimerTask { id, due_at, job });
        id
    }

    pub fn clear_timeout(&self, id: u64) -> bool {
        self.state.borrow_mut().timers.clear(id)
    }

    pub fn run_until_idle(&self) -> Result<(), LoopError> {
        while self.run_next()? {}
        Ok(())
    }

    /// Runs work until `promise` settles or nothing is left to run.
    pub fn run_until_settled(&self, promise: &Promise) -> Result<(), LoopError> {
        while promise.is_pending() && self.run_next()? {}
        Ok(())
    }

    /// Runs exactly one queued job, or the next timer if the job queue is empty.
    /// Returns `false` when there was nothing to run.
    pub fn run_next(&self) -> Result<bool, LoopError> {
        let job = self.state.borrow_mut().jobs.pop();
        if let Some(job) = job {
            self.count_step()?;
            job();
            return Ok(true);
        }

        let timer = self.next_timer();
        if let Some(task) = timer {
            self.count_step()?;
            log::trace!("timer #{} fired at {}ms", task.id, task.due_at);
            (task.job)();
            return Ok(true);
        }
        Ok(false)
    }

    fn count_step(&self) -> Result<(), LoopError> {
        let mut state = self.state.borrow_mut();
        if let Some(limit) = self.max_steps.get()
            && state.steps >= limit
        {
            return Err(LoopError::StepLimitExceeded { limit });
        }
        state.steps += 1;
        Ok(())
    }

    fn next_timer(&self) -> Option<TimerTask> {
        let next_due = self.state.borrow().timers.next_due_time()?;
        self.sleep_until(next_due);

        let mut state = self.state.borrow_mut();
        state.now_ms = state.now_ms.max(next_due);
        let idx = state.timers.next_ready_index(state.now_ms)?;
        Some(state.timers.take(idx))
    }

    fn sleep_until(&self, due_at: u64) {
        let now_ms = self.now_ms();
        if !self.realtime || due_at <= now_ms {
            return;
        }
        let sleep_for = Duration::from_millis(due_at - now_ms);
        if let Some(rt) = &self.runtime {
            rt.block_on(async {
                tokio::time::sleep(sleep_for).await;
            });
        } else {
            std::thread::sleep(sleep_for);
        }
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for EventLoop {
    fn schedule(&self, job: Job) {
        self.state.borrow_mut().jobs.enqueue(job);
    }
}
