use std::time::Duration;

/// Virtual time since page load, in milliseconds.
///
/// Nothing in the workspace reads a wall clock; hosts map their own clock
/// onto this value so sequences can be replayed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(pub u64);

impl Time {
    pub const ZERO: Time = Time(0);

    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Saturates instead of wrapping so a huge delay never lands in the past.
    pub fn after(self, delay: Duration) -> Self {
        let ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        Time(self.0.saturating_add(ms))
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Time;
    use std::time::Duration;

    #[test]
    fn after_adds_millis() {
        let t = Time(100).after(Duration::from_millis(500));
        assert_eq!(t, Time(600));
        assert_eq!(t.as_millis(), 600);
    }

    #[test]
    fn after_saturates() {
        let t = Time(u64::MAX - 1).after(Duration::from_secs(10));
        assert_eq!(t, Time(u64::MAX));
    }
}
