use serde::{Deserialize, Serialize};

/// Vertical extent of an element in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementBox {
    /// Distance from the document top to the element's top edge.
    pub top: f64,
    pub height: f64,
}

impl ElementBox {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            height: height.max(0.0),
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// A measurement of everything the scroll math depends on.
///
/// Any resize invalidates a `PageLayout`; it must be measured again before the
/// next progress computation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageLayout {
    /// The tall scroll container driving the frame sequence.
    pub container: ElementBox,
    pub viewport_height: f64,
    /// Content sections with their own reveal timelines, in document order.
    #[serde(default)]
    pub sections: Vec<ElementBox>,
}

impl PageLayout {
    pub fn new(container: ElementBox, viewport_height: f64) -> Self {
        Self {
            container,
            viewport_height: viewport_height.max(0.0),
            sections: Vec::new(),
        }
    }

    /// Stack full-viewport sections as on a typical parallax page: a hero
    /// screen, then `count` reveal sections separated by half-viewport spacers,
    /// then a closing screen. The container wraps all of them.
    pub fn stacked(viewport_height: f64, count: usize) -> Self {
        let vh = viewport_height.max(0.0);
        let mut cursor = vh;
        let mut sections = Vec::with_capacity(count);
        for i in 0..count {
            if i > 0 {
                cursor += vh * 0.5;
            }
            sections.push(ElementBox::new(cursor, vh));
            cursor += vh;
        }
        cursor += vh;
        Self {
            container: ElementBox::new(0.0, cursor),
            viewport_height: vh,
            sections,
        }
    }

    /// Largest meaningful scroll offset for this layout.
    pub fn max_scroll(&self) -> f64 {
        (self.container.bottom() - self.viewport_height).max(self.container.top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_box_bottom() {
        let b = ElementBox::new(100.0, 50.0);
        assert_eq!(b.bottom(), 150.0);
        assert_eq!(ElementBox::new(0.0, -5.0).height, 0.0);
    }

    #[test]
    fn test_stacked_layout_geometry() {
        let layout = PageLayout::stacked(800.0, 3);
        assert_eq!(layout.sections.len(), 3);
        assert_eq!(layout.sections[0].top, 800.0);
        assert_eq!(layout.sections[1].top, 800.0 + 800.0 + 400.0);
        assert_eq!(layout.sections[2].top, 800.0 + 2.0 * (800.0 + 400.0));
        // hero + 3 sections + 2 spacers + closing screen
        assert_eq!(layout.container.height, 800.0 * 5.0 + 400.0 * 2.0);
        assert_eq!(layout.max_scroll(), layout.container.height - 800.0);
    }
}
