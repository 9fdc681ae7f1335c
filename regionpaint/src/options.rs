//! Session configuration

use regionpaint_color::ThresholdMethod;
use regionpaint_core::Color;
use regionpaint_region::LabelOptions;

/// Options for a painting [`crate::Session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionOptions {
    /// How the loaded image is binarized
    pub threshold: ThresholdMethod,
    /// Background matching and label step size
    pub label: LabelOptions,
    /// Highlight color painted over the hovered region, if any
    pub hover: Option<Color>,
}

impl SessionOptions {
    /// Set the threshold strategy
    pub fn with_threshold(mut self, threshold: ThresholdMethod) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the labeling options
    pub fn with_label(mut self, label: LabelOptions) -> Self {
        self.label = label;
        self
    }

    /// Set the hover highlight color
    pub fn with_hover(mut self, hover: Option<Color>) -> Self {
        self.hover = hover;
        self
    }
}
