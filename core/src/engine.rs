use serde::{Deserialize, Serialize};

use crate::context::Context;

/// Settings for new contexts. Serializable so harnesses can record or load
/// the configuration they ran with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Engine {
    max_steps: Option<usize>,
    realtime_timers: bool,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = Some(max);
        self
    }

    pub fn with_realtime_timers(mut self, realtime: bool) -> Self {
        self.realtime_timers = realtime;
        self
    }

    pub fn realtime_timers(&self) -> bool {
        self.realtime_timers
    }

    pub fn new_context(&self) -> Context {
        let ctx = Context::new_with_realtime(self.realtime_timers);
        if let Some(max) = self.max_steps {
            ctx.set_max_steps(max);
        }
        ctx
    }
}
