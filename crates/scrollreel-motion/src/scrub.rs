/// Exponential follower that lets displayed progress trail the scroll position.
///
/// `lag` is the time constant in seconds; after one `lag` the gap to the target
/// has closed by ~63%. A zero lag passes the target straight through.
#[derive(Debug, Clone)]
pub struct Scrub {
    lag: f64,
    current: Option<f64>,
}

/// Gaps smaller than this snap to the target.
const SETTLE_EPSILON: f64 = 1e-4;

impl Scrub {
    pub fn new(lag_seconds: f64) -> Self {
        Self {
            lag: if lag_seconds.is_finite() {
                lag_seconds.max(0.0)
            } else {
                0.0
            },
            current: None,
        }
    }

    pub fn passthrough() -> Self {
        Self::new(0.0)
    }

    /// Move toward `target` by `dt` seconds and return the displayed value.
    /// The first call snaps to the target.
    pub fn advance(&mut self, target: f64, dt: f64) -> f64 {
        let next = match self.current {
            None => target,
            Some(_) if self.lag == 0.0 => target,
            Some(current) => {
                let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
                let alpha = 1.0 - (-dt / self.lag).exp();
                let value = current + (target - current) * alpha;
                if (target - value).abs() < SETTLE_EPSILON {
                    target
                } else {
                    value
                }
            }
        };
        self.current = Some(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough() {
        let mut s = Scrub::passthrough();
        assert_eq!(s.advance(0.3, 0.0), 0.3);
        assert_eq!(s.advance(0.9, 0.0), 0.9);
    }

    #[test]
    fn test_lag_trails_then_settles() {
        let mut s = Scrub::new(0.5);
        assert_eq!(s.advance(0.0, 0.0), 0.0);
        let first = s.advance(1.0, 0.016);
        assert!(first > 0.0 && first < 0.1);
        let mut v = first;
        for _ in 0..2000 {
            v = s.advance(1.0, 0.016);
        }
        assert_eq!(v, 1.0);
    }

    #[test]
    fn test_zero_dt_holds_position() {
        let mut s = Scrub::new(1.5);
        s.advance(0.2, 0.0);
        assert_eq!(s.advance(0.8, 0.0), 0.2);
    }

    #[test]
    fn test_monotone_targets_give_monotone_output() {
        let mut s = Scrub::new(0.5);
        let mut prev = s.advance(0.0, 0.0);
        for i in 1..=100 {
            let v = s.advance(i as f64 / 100.0, 0.016);
            assert!(v >= prev);
            prev = v;
        }
    }
}
