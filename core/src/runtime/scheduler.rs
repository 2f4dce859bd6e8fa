use std::rc::Rc;

/// A unit of deferred work.
pub type Job = Box<dyn FnOnce()>;

/// The "run this later" facility promises dispatch their callbacks through.
///
/// Implementations must queue jobs in FIFO order and must never run a job
/// inline from within `schedule`: callers rely on control returning to them
/// before any scheduled work starts.
pub trait Scheduler {
    fn schedule(&self, job: Job);
}

pub type SchedulerHandle = Rc<dyn Scheduler>;
