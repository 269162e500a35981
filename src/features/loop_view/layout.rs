//! Declarative placement of the caption and page indicator layers

use serde::{Deserialize, Serialize};

/// Height reserved for a caption bar
pub const CAPTION_HEIGHT: f32 = 36.0;
/// Gap between the indicator and the edge it is pinned to
pub const INDICATOR_MARGIN: f32 = 12.0;
/// Horizontal room kept free in an overlaid caption for a right-pinned indicator
pub const INDICATOR_RESERVED_WIDTH: f32 = 120.0;

/// Where the caption is shown relative to the pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CaptionPosition {
    /// No caption
    None,
    /// Caption bar drawn over the bottom of the pages
    #[default]
    Overlay,
    /// Caption bar stacked below the pages
    Split,
}

impl CaptionPosition {
    /// Next placement, wrapping around
    pub fn next(self) -> Self {
        match self {
            Self::None => Self::Overlay,
            Self::Overlay => Self::Split,
            Self::Split => Self::None,
        }
    }
}

impl std::fmt::Display for CaptionPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Overlay => write!(f, "overlay"),
            Self::Split => write!(f, "split"),
        }
    }
}

/// Where the page indicator is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorPosition {
    /// No indicator
    None,
    /// Centered over the bottom of the pages
    #[default]
    Center,
    /// Pinned to the bottom-right corner of the pages
    Right,
}

impl IndicatorPosition {
    /// Next placement, wrapping around
    pub fn next(self) -> Self {
        match self {
            Self::None => Self::Center,
            Self::Center => Self::Right,
            Self::Right => Self::None,
        }
    }
}

impl std::fmt::Display for IndicatorPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Center => write!(f, "center"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Caption layer placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaptionLayer {
    /// Stacked on top of the pages, aligned to their bottom edge
    Overlay {
        /// Space kept free on the trailing side of the bar
        trailing_inset: f32,
    },
    /// Below the pages, the widget grows by `CAPTION_HEIGHT`
    Below,
}

/// Indicator layer placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorLayer {
    Centered {
        /// Distance from the bottom edge of the pages
        bottom: f32,
    },
    BottomRight {
        bottom: f32,
        right: f32,
    },
}

/// The full set of layers the loop view renders
///
/// Recomputed from the two position settings whenever either changes;
/// the view builds its widget tree from this value only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSpec {
    pub caption: Option<CaptionLayer>,
    pub indicator: Option<IndicatorLayer>,
}

impl LayoutSpec {
    pub fn new(caption: CaptionPosition, indicator: IndicatorPosition) -> Self {
        let overlaid_caption = caption == CaptionPosition::Overlay;

        let caption_layer = match caption {
            CaptionPosition::None => None,
            CaptionPosition::Overlay => Some(CaptionLayer::Overlay {
                trailing_inset: if indicator == IndicatorPosition::Right {
                    INDICATOR_RESERVED_WIDTH
                } else {
                    0.0
                },
            }),
            CaptionPosition::Split => Some(CaptionLayer::Below),
        };

        let indicator_layer = match indicator {
            IndicatorPosition::None => None,
            // A centered indicator would collide with the caption text, lift it above the bar
            IndicatorPosition::Center => Some(IndicatorLayer::Centered {
                bottom: if overlaid_caption {
                    CAPTION_HEIGHT + INDICATOR_MARGIN / 2.0
                } else {
                    INDICATOR_MARGIN
                },
            }),
            // Right-pinned sits inside the caption bar, vertically centered in it
            IndicatorPosition::Right => Some(IndicatorLayer::BottomRight {
                bottom: if overlaid_caption {
                    (CAPTION_HEIGHT - 8.0) / 2.0
                } else {
                    INDICATOR_MARGIN
                },
                right: INDICATOR_MARGIN,
            }),
        };

        Self {
            caption: caption_layer,
            indicator: indicator_layer,
        }
    }
}

impl Default for LayoutSpec {
    fn default() -> Self {
        Self::new(CaptionPosition::default(), IndicatorPosition::default())
    }
}
