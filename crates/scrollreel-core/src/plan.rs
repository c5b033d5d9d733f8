use std::time::Duration;

use serde::Serialize;

use crate::config::PrefetchConfig;
use crate::frame::FrameIndex;

/// The two prefetch tiers for a sequence of `total` frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrefetchPlan {
    /// Requested at mount, in index order.
    pub immediate: Vec<FrameIndex>,
    /// Requested once `delay` has elapsed.
    pub deferred: Vec<FrameIndex>,
    #[serde(rename = "delay_ms", serialize_with = "as_millis")]
    pub delay: Duration,
}

impl PrefetchPlan {
    /// `immediate` larger than `total` is clamped, leaving the deferred tier empty.
    pub fn new(total: u32, prefetch: &PrefetchConfig) -> Self {
        let split = prefetch.immediate.min(total);
        Self {
            immediate: (1..=split).map(|i| FrameIndex::clamped(i as i64, total)).collect(),
            deferred: (split + 1..=total)
                .map(|i| FrameIndex::clamped(i as i64, total))
                .collect(),
            delay: Duration::from_millis(prefetch.defer_ms),
        }
    }

    pub fn len(&self) -> usize {
        self.immediate.len() + self.deferred.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tiers() {
        let plan = PrefetchPlan::new(96, &PrefetchConfig::default());
        assert_eq!(plan.immediate.len(), 20);
        assert_eq!(plan.immediate.first().map(|f| f.get()), Some(1));
        assert_eq!(plan.immediate.last().map(|f| f.get()), Some(20));
        assert_eq!(plan.deferred.first().map(|f| f.get()), Some(21));
        assert_eq!(plan.deferred.last().map(|f| f.get()), Some(96));
        assert_eq!(plan.len(), 96);
        assert_eq!(plan.delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_immediate_larger_than_sequence() {
        let cfg = PrefetchConfig {
            immediate: 50,
            defer_ms: 10,
        };
        let plan = PrefetchPlan::new(8, &cfg);
        assert_eq!(plan.immediate.len(), 8);
        assert!(plan.deferred.is_empty());
    }

    #[test]
    fn test_plan_json_shape() {
        let cfg = PrefetchConfig {
            immediate: 2,
            defer_ms: 500,
        };
        let json = serde_json::to_value(PrefetchPlan::new(3, &cfg)).unwrap();
        assert_eq!(json["immediate"], serde_json::json!([1, 2]));
        assert_eq!(json["deferred"], serde_json::json!([3]));
        assert_eq!(json["delay_ms"], 500);
    }
}
