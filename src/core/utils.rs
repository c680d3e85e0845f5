use std::time::{
    Duration,
    Instant,
};

/// Formats an integer with comma thousands separators, e.g. `22500` as `22,500`.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Fires at most once per `period`; the first check always fires.
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    last: Option<Instant>,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self { period, last: None }
    }

    pub fn due(&mut self, now: Instant) -> bool {
        let due = self.last.is_none_or(|last| now.duration_since(last) >= self.period);
        if due {
            self.last = Some(now);
        }
        due
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Time left until the next firing, for scheduling repaints.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.last.map_or(Duration::ZERO, |last| self.period.saturating_sub(now.duration_since(last)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(22_500), "22,500");
        assert_eq!(format_thousands(1_000_000), "1,000,000");
    }

    #[test]
    fn interval_fires_once_per_period() {
        let start = Instant::now();
        let mut interval = Interval::new(Duration::from_secs(2));

        assert!(interval.due(start));
        assert!(!interval.due(start + Duration::from_millis(1999)));
        assert_eq!(interval.remaining(start + Duration::from_millis(500)), Duration::from_millis(1500));
        assert!(interval.due(start + Duration::from_secs(2)));

        interval.reset();
        assert!(interval.due(start + Duration::from_secs(2)));
    }
}
