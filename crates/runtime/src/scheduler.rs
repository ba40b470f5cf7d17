use std::time::Duration;

use foundation::time::Time;

use crate::timer_queue::{TimerId, TimerQueue};

/// Deferred-callback capability handed to components that need delays.
///
/// Components never wait: they hand a payload to the scheduler and the host
/// feeds it back once the delay has elapsed. The browser host backs this with
/// `setTimeout`; tests use [`ManualScheduler`].
pub trait Scheduler<T> {
    fn now(&self) -> Time;

    fn schedule_after(&mut self, delay: Duration, task: T) -> TimerId;
}

/// Virtual-time scheduler. Time only moves when the caller advances it.
#[derive(Debug)]
pub struct ManualScheduler<T> {
    now: Time,
    timers: TimerQueue<T>,
}

impl<T> Default for ManualScheduler<T> {
    fn default() -> Self {
        Self {
            now: Time::ZERO,
            timers: TimerQueue::new(),
        }
    }
}

impl<T> ManualScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn is_idle(&self) -> bool {
        self.timers.is_empty()
    }

    /// Advances virtual time by `by`, running every task that falls due.
    ///
    /// `run` may schedule further tasks; those also run if they fall due
    /// before the end of the window. Returns the number of tasks run.
    pub fn advance<F>(&mut self, by: Duration, run: F) -> usize
    where
        F: FnMut(&mut Self, T),
    {
        let until = self.now.after(by);
        self.run_until(until, run)
    }

    pub fn run_until<F>(&mut self, until: Time, mut run: F) -> usize
    where
        F: FnMut(&mut Self, T),
    {
        let mut ran = 0usize;
        while let Some((id, due, task)) = self.timers.pop_due(until) {
            self.now = self.now.max(due);
            tracing::trace!(timer = id.0, at = self.now.0, "timer fired");
            run(self, task);
            ran += 1;
        }
        self.now = self.now.max(until);
        ran
    }

    /// Jumps from timer to timer until nothing is pending.
    pub fn run_until_idle<F>(&mut self, mut run: F) -> usize
    where
        F: FnMut(&mut Self, T),
    {
        let mut ran = 0usize;
        while let Some(due) = self.timers.next_due() {
            ran += self.run_until(due, &mut run);
        }
        ran
    }
}

impl<T> Scheduler<T> for ManualScheduler<T> {
    fn now(&self) -> Time {
        self.now
    }

    fn schedule_after(&mut self, delay: Duration, task: T) -> TimerId {
        self.timers.schedule(self.now.after(delay), task)
    }
}

#[cfg(test)]
mod tests {
    use super::{ManualScheduler, Scheduler};
    use foundation::time::Time;
    use std::time::Duration;

    #[test]
    fn tasks_wait_for_their_delay() {
        let mut sched = ManualScheduler::new();
        sched.schedule_after(Duration::from_millis(500), "mount");

        let mut ran = Vec::new();
        sched.advance(Duration::from_millis(499), |_, t| ran.push(t));
        assert!(ran.is_empty());

        sched.advance(Duration::from_millis(1), |_, t| ran.push(t));
        assert_eq!(ran, vec!["mount"]);
        assert_eq!(sched.now(), Time(500));
    }

    #[test]
    fn clock_reports_due_time_inside_callback() {
        let mut sched = ManualScheduler::new();
        sched.schedule_after(Duration::from_millis(200), 1);
        sched.schedule_after(Duration::from_millis(100), 2);

        let mut seen = Vec::new();
        sched.advance(Duration::from_secs(1), |s, t| seen.push((t, s.now())));
        assert_eq!(seen, vec![(2, Time(100)), (1, Time(200))]);
        assert_eq!(sched.now(), Time(1_000));
    }

    #[test]
    fn chained_tasks_run_within_window() {
        let mut sched = ManualScheduler::new();
        sched.schedule_after(Duration::from_millis(100), 0u32);

        let mut seen = Vec::new();
        sched.advance(Duration::from_millis(250), |s, t| {
            seen.push(t);
            if t < 5 {
                s.schedule_after(Duration::from_millis(100), t + 1);
            }
        });
        assert_eq!(seen, vec![0, 1]);
        assert_eq!(sched.pending(), 1);
    }

    #[test]
    fn run_until_idle_drains_everything() {
        let mut sched = ManualScheduler::new();
        sched.schedule_after(Duration::from_millis(1_500), "analysis");
        sched.schedule_after(Duration::from_millis(500), "mount");

        let mut seen = Vec::new();
        let ran = sched.run_until_idle(|_, t| seen.push(t));
        assert_eq!(ran, 2);
        assert_eq!(seen, vec!["mount", "analysis"]);
        assert!(sched.is_idle());
        assert_eq!(sched.now(), Time(1_500));
    }
}
