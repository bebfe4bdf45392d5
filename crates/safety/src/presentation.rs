//! What the rendering surface shows for an assessment: headline, advice text,
//! distance line, accent color and whether the compass is visible.

use bevy::color::palettes::css;
use bevy::color::Color;

use crate::compass::CompassGeometry;
use crate::config::{ARC_STROKE_WIDTH, NEEDLE_STROKE_WIDTH};
use crate::hazard::{DangerLevel, HazardAssessment};
use crate::zones::IncidentZones;

pub const NO_INCIDENTS_HEADLINE: &str = "No incidents";

impl DangerLevel {
    /// Fill for the unsafe half of the compass and other level accents.
    pub fn accent_color(self) -> Color {
        match self {
            DangerLevel::Safe => Color::from(css::GREEN),
            DangerLevel::Warning => Color::from(css::ORANGE),
            DangerLevel::Alert => Color::from(css::RED),
        }
    }

    /// Color of the advice text.
    pub fn message_color(self) -> Color {
        match self {
            DangerLevel::Safe => Color::srgb(0.2, 0.2, 0.2),
            DangerLevel::Warning | DangerLevel::Alert => Color::from(css::DARK_RED),
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            DangerLevel::Safe => "You are in a safe area.",
            DangerLevel::Warning => {
                "You are close to an area with a public safety warning. \
                 Keep the indicator in the green half of the circle to leave this area."
            }
            DangerLevel::Alert => {
                "You are inside an area with a public safety warning. \
                 Keep the indicator in the green half of the circle and immediately leave this area."
            }
        }
    }

    pub fn shows_compass(self) -> bool {
        !self.is_safe()
    }
}

/// Whole meters, as shown on screen.
pub fn format_distance(meters: f64) -> String {
    format!("{} meters", meters.round() as i64)
}

/// Everything the screen needs to draw the text and color parts of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenPresentation {
    pub headline: String,
    pub message: &'static str,
    /// "Distance from safe area" line; absent while safe.
    pub distance_text: Option<String>,
    pub accent: Color,
    pub message_color: Color,
    pub show_compass: bool,
}

pub fn present(assessment: &HazardAssessment, zones: &IncidentZones) -> ScreenPresentation {
    let level = assessment.danger_level;
    let headline = assessment
        .nearest_zone
        .and_then(|id| zones.get(id))
        .map_or_else(|| NO_INCIDENTS_HEADLINE.to_string(), |z| z.title.clone());

    ScreenPresentation {
        headline,
        message: level.message(),
        distance_text: level
            .shows_compass()
            .then(|| format_distance(assessment.distance_from_border_meters)),
        accent: level.accent_color(),
        message_color: level.message_color(),
        show_compass: level.shows_compass(),
    }
}

/// Standalone SVG document for one compass frame: the safe half filled green,
/// the other half in the level's accent color, and the heading needle.
pub fn compass_svg(glyph: &CompassGeometry, level: DangerLevel, viewport_size: f32) -> String {
    let safe_fill = css::GREEN.to_hex();
    let unsafe_fill = level.accent_color().to_srgba().to_hex();
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{size}\" height=\"{size}\">\
         <path d=\"{}\" stroke=\"black\" stroke-width=\"{arc}\" fill=\"{safe_fill}\"/>\
         <path d=\"{}\" stroke=\"black\" stroke-width=\"{arc}\" fill=\"{unsafe_fill}\"/>\
         <path d=\"{}\" stroke=\"black\" stroke-width=\"{needle}\"/>\
         </svg>",
        glyph.safe_arc_path(),
        glyph.unsafe_arc_path(),
        glyph.needle_path(),
        size = viewport_size,
        arc = ARC_STROKE_WIDTH,
        needle = NEEDLE_STROKE_WIDTH,
    )
}
