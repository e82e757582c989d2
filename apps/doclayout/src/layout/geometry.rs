//! Page geometry in millimetres.
//!
//! Defaults describe an A4 portrait page: 210 × 297, 15 mm margins, content
//! starting at y = 35 (below the header band) and ending 20 mm above the
//! bottom edge (above the footer band).

use serde::{Deserialize, Serialize};

use crate::errors::LayoutError;

/// y-position of the rule separating the header band from content.
pub const HEADER_DIVIDER_Y: f32 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    /// First content baseline on every page.
    pub content_top: f32,
    /// Space kept clear at the bottom of every page for the footer band.
    pub footer_reserve: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin: 15.0,
            content_top: 35.0,
            footer_reserve: 20.0,
        }
    }
}

/// Partial geometry supplied per request; unset fields keep the configured value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryOverrides {
    pub page_width: Option<f32>,
    pub page_height: Option<f32>,
    pub margin: Option<f32>,
    pub content_top: Option<f32>,
    pub footer_reserve: Option<f32>,
}

impl PageGeometry {
    pub fn with_overrides(&self, overrides: &GeometryOverrides) -> Self {
        Self {
            page_width: overrides.page_width.unwrap_or(self.page_width),
            page_height: overrides.page_height.unwrap_or(self.page_height),
            margin: overrides.margin.unwrap_or(self.margin),
            content_top: overrides.content_top.unwrap_or(self.content_top),
            footer_reserve: overrides.footer_reserve.unwrap_or(self.footer_reserve),
        }
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// Content must end at or above this y.
    pub fn bottom_boundary(&self) -> f32 {
        self.page_height - self.footer_reserve
    }

    pub fn usable_height(&self) -> f32 {
        self.bottom_boundary() - self.content_top
    }

    /// Rejects geometries where no sane layout is possible.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let fields = [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("margin", self.margin),
            ("content_top", self.content_top),
            ("footer_reserve", self.footer_reserve),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(LayoutError::InvalidGeometry(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }

        if self.page_width <= 0.0 || self.page_height <= 0.0 {
            return Err(LayoutError::InvalidGeometry(format!(
                "page dimensions must be positive, got {}x{}",
                self.page_width, self.page_height
            )));
        }
        if self.margin < 0.0 || self.footer_reserve < 0.0 {
            return Err(LayoutError::InvalidGeometry(
                "margin and footer_reserve must not be negative".to_string(),
            ));
        }
        if self.margin * 2.0 >= self.page_width || self.margin * 2.0 >= self.page_height {
            return Err(LayoutError::InvalidGeometry(format!(
                "margin {} must be less than half of the page width and height",
                self.margin
            )));
        }
        if self.content_top <= HEADER_DIVIDER_Y {
            return Err(LayoutError::InvalidGeometry(format!(
                "content_top {} must sit below the header divider at {HEADER_DIVIDER_Y}",
                self.content_top
            )));
        }
        if self.content_top >= self.bottom_boundary() {
            return Err(LayoutError::InvalidGeometry(format!(
                "content_top {} leaves no room above the bottom boundary {}",
                self.content_top,
                self.bottom_boundary()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry_matches_a4_reference() {
        let g = PageGeometry::default();
        assert_eq!(g.content_width(), 180.0);
        assert_eq!(g.bottom_boundary(), 277.0);
        assert_eq!(g.usable_height(), 242.0);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn test_overrides_replace_only_set_fields() {
        let overrides = GeometryOverrides {
            page_height: Some(215.0),
            ..Default::default()
        };
        let g = PageGeometry::default().with_overrides(&overrides);
        assert_eq!(g.page_height, 215.0);
        assert_eq!(g.page_width, 210.0);
        assert_eq!(g.margin, 15.0);
    }

    #[test]
    fn test_validate_rejects_non_positive_dimensions() {
        let g = PageGeometry {
            page_width: 0.0,
            ..Default::default()
        };
        assert!(matches!(g.validate(), Err(LayoutError::InvalidGeometry(_))));
    }

    #[test]
    fn test_validate_rejects_margin_at_half_width() {
        let g = PageGeometry {
            margin: 105.0,
            ..Default::default()
        };
        assert!(g.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_nan() {
        let g = PageGeometry {
            page_height: f32::NAN,
            ..Default::default()
        };
        assert!(g.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_content_top_below_bottom_boundary() {
        let g = PageGeometry {
            content_top: 280.0,
            ..Default::default()
        };
        assert!(g.validate().is_err());
    }
}
