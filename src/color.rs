use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::filter::Marker;

// ---------------------------------------------------------------------------
// Marker colours
// ---------------------------------------------------------------------------

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

/// Colours used for the two marker kinds.
#[derive(Debug, Clone, Copy)]
pub struct MarkerPalette {
    pub neutral: Color32,
    pub highlight: Color32,
}

impl Default for MarkerPalette {
    fn default() -> Self {
        Self {
            neutral: hsl_to_color32(0.0, 0.0, 0.5),
            highlight: hsl_to_color32(120.0, 1.0, 0.25),
        }
    }
}

impl MarkerPalette {
    pub fn color_for(&self, marker: Marker) -> Color32 {
        match marker {
            Marker::Neutral => self.neutral,
            Marker::Highlight => self.highlight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_palette_is_grey_and_green() {
        let palette = MarkerPalette::default();
        let grey = palette.color_for(Marker::Neutral);
        assert_eq!(grey.r(), grey.g());
        assert_eq!(grey.g(), grey.b());
        assert!((127..=128).contains(&grey.r()));

        let green = palette.color_for(Marker::Highlight);
        assert_eq!((green.r(), green.b()), (0, 0));
        assert!((127..=128).contains(&green.g()));
    }
}
