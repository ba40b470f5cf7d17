/// One-shot viewport trigger for the map section.
///
/// Fires the first time the visible ratio reaches the threshold, then
/// unsubscribes itself; later enter/leave events are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityTrigger {
    threshold: f64,
    subscribed: bool,
}

impl VisibilityTrigger {
    pub const DEFAULT_THRESHOLD: f64 = 0.5;

    /// `threshold` is clamped into `(0, 1]`.
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_finite() {
            threshold.clamp(f64::MIN_POSITIVE, 1.0)
        } else {
            Self::DEFAULT_THRESHOLD
        };
        Self {
            threshold,
            subscribed: true,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Feeds one intersection observation. Returns `true` exactly once.
    pub fn observe(&mut self, visible_ratio: f64) -> bool {
        if !self.subscribed {
            return false;
        }
        if visible_ratio > 0.0 && visible_ratio >= self.threshold {
            self.subscribed = false;
            return true;
        }
        false
    }
}

impl Default for VisibilityTrigger {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::VisibilityTrigger;

    #[test]
    fn fires_once_across_enter_exit_cycles() {
        let mut trigger = VisibilityTrigger::default();
        let ratios = [0.0, 0.2, 0.6, 0.0, 0.9, 1.0, 0.3, 0.75];
        let fired: usize = ratios.iter().filter(|r| trigger.observe(**r)).count();
        assert_eq!(fired, 1);
        assert!(!trigger.is_subscribed());
    }

    #[test]
    fn never_fires_below_threshold() {
        let mut trigger = VisibilityTrigger::new(0.5);
        for r in [0.0, 0.1, 0.49, 0.3] {
            assert!(!trigger.observe(r));
        }
        assert!(trigger.is_subscribed());
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut trigger = VisibilityTrigger::new(0.5);
        assert!(trigger.observe(0.5));
    }

    #[test]
    fn zero_threshold_still_needs_some_visibility() {
        let mut trigger = VisibilityTrigger::new(0.0);
        assert!(!trigger.observe(0.0));
        assert!(trigger.observe(0.01));
    }

    #[test]
    fn invalid_threshold_falls_back_to_default() {
        assert_eq!(VisibilityTrigger::new(f64::NAN).threshold(), 0.5);
        assert_eq!(VisibilityTrigger::new(3.0).threshold(), 1.0);
    }
}
