//! Static character-width table used to estimate rendered text width.
//!
//! Widths are in em units (relative to font size), taken from the standard
//! Helvetica metrics. This is an approximation: no kerning, no ligatures, and
//! bold text is modelled as a flat widening factor. What matters for
//! pagination is that the estimate is stable, so identical input always
//! wraps identically.
//!
//! The table covers ASCII 0x20..=0x7E. Index = (char as usize) - 32.

use crate::layout::style::StyleRef;

/// Millimetres per typographic point.
pub const PT_TO_MM: f32 = 25.4 / 72.0;

/// Bold glyphs are measured this much wider than regular ones.
const BOLD_WIDTH_FACTOR: f32 = 1.08;

pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for characters outside the table.
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Width of a string in em units.
    pub fn measure_em(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else if c.is_control() {
                    0.0
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }

    /// Width of a string in page millimetres when set in `style`.
    pub fn measure_mm(&self, s: &str, style: &StyleRef) -> f32 {
        self.measure_em(s) * em_to_mm(style)
    }

    pub fn space_mm(&self, style: &StyleRef) -> f32 {
        self.space_width * em_to_mm(style)
    }
}

fn em_to_mm(style: &StyleRef) -> f32 {
    let factor = if style.bold { BOLD_WIDTH_FACTOR } else { 1.0 };
    style.font_size_pt * PT_TO_MM * factor
}

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.55,
    space_width: 0.278,
};

/// The metric table every measurement in the engine goes through.
pub fn metrics() -> &'static FontMetricTable {
    &HELVETICA_TABLE
}
