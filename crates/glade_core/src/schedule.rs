//! Timers driven by the caller's clock.
//!
//! Nothing here spawns threads or sleeps: the owner passes `Instant`s in from
//! its run loop, which keeps every timer deterministic under test.

use std::time::{Duration, Instant};

/// A one-shot gate that re-opens a fixed duration after it was triggered.
///
/// There is no way to re-open it early.
#[derive(Debug, Clone, Copy)]
pub struct Cooldown {
    duration: Duration,
    ready_at: Option<Instant>,
}

impl Cooldown {
    pub const fn new(duration: Duration) -> Self {
        Self {
            duration,
            ready_at: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_ready(&self, now: Instant) -> bool {
        self.ready_at.map_or(true, |ready_at| now >= ready_at)
    }

    /// Closes the gate and returns `true` if it was open, otherwise leaves it
    /// untouched and returns `false`.
    pub fn try_trigger(&mut self, now: Instant) -> bool {
        if !self.is_ready(now) {
            return false;
        }
        self.ready_at = Some(now + self.duration);
        true
    }
}

/// A repeating task with an explicit start/stop lifecycle.
///
/// `poll` reports how many intervals elapsed since the previous poll so the
/// owner can apply each one in order.
#[derive(Debug, Clone, Copy)]
pub struct RepeatingTask {
    interval: Duration,
    next_due: Option<Instant>,
}

impl RepeatingTask {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };

        let mut fired = 0;
        while now >= due {
            fired += 1;
            due += self.interval;
        }
        self.next_due = Some(due);
        fired
    }
}

/// Fixed-rate stepping for a variable-rate frame loop.
///
/// Frame time accumulates and is paid out in whole steps. At most
/// `max_steps` are paid per frame; any backlog beyond that is dropped so a
/// long stall does not turn into a burst of catch-up steps.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimestep {
    step: Duration,
    max_steps: u32,
    accumulated: Duration,
}

impl FixedTimestep {
    pub fn new(step: Duration, max_steps: u32) -> Self {
        Self {
            step: step.max(Duration::from_micros(100)),
            max_steps: max_steps.max(1),
            accumulated: Duration::ZERO,
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.accumulated += frame_time;

        let mut steps = 0;
        while self.accumulated >= self.step && steps < self.max_steps {
            self.accumulated -= self.step;
            steps += 1;
        }
        if steps == self.max_steps {
            self.accumulated = self.accumulated.min(self.step);
        }
        steps
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{Cooldown, FixedTimestep, RepeatingTask};

    #[test]
    fn cooldown_rejects_until_duration_elapses() {
        let start = Instant::now();
        let mut cooldown = Cooldown::new(Duration::from_millis(600));

        assert!(cooldown.try_trigger(start));
        assert!(!cooldown.try_trigger(start + Duration::from_millis(599)));
        assert!(cooldown.try_trigger(start + Duration::from_millis(600)));
        assert!(!cooldown.try_trigger(start + Duration::from_millis(601)));
    }

    #[test]
    fn stopped_task_never_fires() {
        let start = Instant::now();
        let mut task = RepeatingTask::new(Duration::from_secs(150));
        assert_eq!(task.poll(start + Duration::from_secs(1000)), 0);

        task.start(start);
        task.stop();
        assert!(!task.is_running());
        assert_eq!(task.poll(start + Duration::from_secs(1000)), 0);
    }

    #[test]
    fn task_counts_each_elapsed_interval() {
        let start = Instant::now();
        let mut task = RepeatingTask::new(Duration::from_secs(150));
        task.start(start);

        assert_eq!(task.poll(start + Duration::from_secs(149)), 0);
        assert_eq!(task.poll(start + Duration::from_secs(150)), 1);
        assert_eq!(task.poll(start + Duration::from_secs(299)), 0);
        assert_eq!(task.poll(start + Duration::from_secs(599)), 2);
    }

    #[test]
    fn fixed_timestep_carries_remainder() {
        let mut timestep = FixedTimestep::new(Duration::from_millis(10), 5);
        assert_eq!(timestep.advance(Duration::from_millis(25)), 2);
        assert_eq!(timestep.advance(Duration::from_millis(5)), 1);
        assert_eq!(timestep.advance(Duration::from_millis(9)), 0);
    }

    #[test]
    fn fixed_timestep_drops_backlog_after_max_steps() {
        let mut timestep = FixedTimestep::new(Duration::from_millis(10), 5);
        assert_eq!(timestep.advance(Duration::from_secs(2)), 5);
        assert_eq!(timestep.advance(Duration::ZERO), 1);
        assert_eq!(timestep.advance(Duration::ZERO), 0);
    }
}
