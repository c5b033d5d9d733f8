use scrollreel_core::ElementBox;
use serde::{Deserialize, Serialize};

/// A horizontal line on an element or on the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Top,
    Center,
    Bottom,
}

impl Edge {
    fn fraction(&self) -> f64 {
        match self {
            Edge::Top => 0.0,
            Edge::Center => 0.5,
            Edge::Bottom => 1.0,
        }
    }
}

/// "When `element` edge meets `viewport` edge".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerPoint {
    pub element: Edge,
    pub viewport: Edge,
}

impl TriggerPoint {
    pub const fn new(element: Edge, viewport: Edge) -> Self {
        Self { element, viewport }
    }

    /// Scroll offset at which this point is reached.
    pub fn offset(&self, element: &ElementBox, viewport_height: f64) -> f64 {
        element.top + self.element.fraction() * element.height
            - self.viewport.fraction() * viewport_height
    }
}

/// A scroll range between two trigger points, normalized to progress in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollTrigger {
    pub start: TriggerPoint,
    pub end: TriggerPoint,
}

impl ScrollTrigger {
    /// Element top at viewport top until element bottom at viewport bottom.
    pub const CONTAINER: ScrollTrigger = ScrollTrigger {
        start: TriggerPoint::new(Edge::Top, Edge::Top),
        end: TriggerPoint::new(Edge::Bottom, Edge::Bottom),
    };

    /// Element top at viewport center until element bottom at viewport center.
    pub const SECTION: ScrollTrigger = ScrollTrigger {
        start: TriggerPoint::new(Edge::Top, Edge::Center),
        end: TriggerPoint::new(Edge::Bottom, Edge::Center),
    };

    /// Clamped progress of `offset` through this trigger's range.
    ///
    /// An empty or inverted range behaves as a step at its start offset.
    /// Non-finite offsets yield 0.
    pub fn progress(&self, offset: f64, element: &ElementBox, viewport_height: f64) -> f64 {
        if !offset.is_finite() {
            return 0.0;
        }
        let start = self.start.offset(element, viewport_height);
        let end = self.end.offset(element, viewport_height);
        let span = end - start;
        if span <= 0.0 {
            return if offset >= start { 1.0 } else { 0.0 };
        }
        ((offset - start) / span).clamp(0.0, 1.0)
    }
}
