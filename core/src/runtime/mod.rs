pub mod event_loop;
pub mod scheduler;
pub mod value;
