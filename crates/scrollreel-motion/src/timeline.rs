use scrollreel_core::types::lerp;
use scrollreel_core::Easing;
use serde::{Deserialize, Serialize};

/// Identifies the property being animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Opacity,
    Scale,
}

impl std::fmt::Display for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Property::Opacity => write!(f, "opacity"),
            Property::Scale => write!(f, "scale"),
        }
    }
}

/// A keyframe: a value at a position along the timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keyframe {
    /// Position in timeline progress units.
    pub at: f64,
    /// Target value at this keyframe.
    pub value: f64,
    /// Easing function to use when interpolating TO this keyframe.
    pub easing: Easing,
}

impl Keyframe {
    pub fn new(at: f64, value: f64) -> Self {
        Self {
            at,
            value,
            easing: Easing::Linear,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// One property driven by ordered keyframes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub property: Property,
    /// Ordered keyframes (kept sorted by position).
    pub keyframes: Vec<Keyframe>,
}

impl Track {
    pub fn new(property: Property) -> Self {
        Self {
            property,
            keyframes: Vec::new(),
        }
    }

    /// Add a keyframe. Keyframes are kept sorted by position.
    pub fn add_keyframe(&mut self, keyframe: Keyframe) {
        self.keyframes.push(keyframe);
        self.keyframes.sort_by(|a, b| a.at.total_cmp(&b.at));
    }

    pub fn with_keyframe(mut self, keyframe: Keyframe) -> Self {
        self.add_keyframe(keyframe);
        self
    }

    /// Value at `at`. Holds the first/last value outside the keyframe range.
    pub fn evaluate(&self, at: f64) -> Option<f64> {
        let first = self.keyframes.first()?;
        let last = self.keyframes.last()?;
        if at <= first.at {
            return Some(first.value);
        }
        if at >= last.at {
            return Some(last.value);
        }

        for pair in self.keyframes.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if at >= a.at && at <= b.at {
                let span = b.at - a.at;
                if span == 0.0 {
                    return Some(b.value);
                }
                let local = (at - a.at) / span;
                return Some(lerp(a.value, b.value, b.easing.apply(local)));
            }
        }

        Some(last.value)
    }
}

/// A set of tracks scrubbed by one progress value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timeline {
    pub tracks: Vec<Track>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_track(mut self, track: Track) -> Self {
        self.tracks.push(track);
        self
    }

    pub fn track(&self, property: Property) -> Option<&Track> {
        self.tracks.iter().find(|t| t.property == property)
    }

    /// Evaluate one property; `None` if no track animates it.
    pub fn value(&self, property: Property, at: f64) -> Option<f64> {
        self.track(property).and_then(|t| t.evaluate(at))
    }
}
