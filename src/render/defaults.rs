//! Default sizes and settings (fractions are relative to the parent box)

/// Decimal places kept on serialized numbers.
pub const PRECISION: usize = 2;
/// Default output width in pixels when none is requested.
pub const SIZE: f64 = 500.0;

pub const STROKE: &str = "black";
pub const STROKE_WIDTH: f64 = 1.0;
pub const FILL: &str = "none";

pub const FONT_FAMILY: &str = "sans-serif";
pub const FONT_WEIGHT: &str = "normal";

/// Radius of a point marker, as a fraction of the enclosing coordinate range.
pub const POINT_RADIUS: f64 = 0.01;

/// Default number of parametric samples.
pub const SAMPLE_COUNT: usize = 100;
/// Ceiling on samples (and ticks) generated for a single node.
pub const MAX_SAMPLES: usize = 100_000;

/// Default number of evenly spaced ticks per axis.
pub const TICK_COUNT: usize = 5;
/// Tick mark length, as a fraction of the graph height.
pub const TICK_SIZE: f64 = 0.03;
/// Tick label height, as a fraction of the graph height.
pub const LABEL_SIZE: f64 = 0.05;
/// Gap between tick marks and their labels.
pub const LABEL_OFFSET: f64 = 0.015;
/// Axis title (xlabel/ylabel) height.
pub const AXIS_LABEL_SIZE: f64 = 0.06;
/// Gap between an axis and its title.
pub const AXIS_LABEL_OFFSET: f64 = 0.04;
pub const TITLE_SIZE: f64 = 0.08;
pub const TITLE_OFFSET: f64 = 0.04;

pub const MESH_STROKE: &str = "#dddddd";

/// Proportional character widths in hundredths of an average glyph.
#[rustfmt::skip]
pub const AW_CHAR: [u8; 95] = [
    45,  55,  62, 115,  90, 132, 125,  40,
    55,  55,  71, 115,  45,  48,  45,  50,
    91,  91,  91,  91,  91,  91,  91,  91,
    91,  91,  50,  50, 120, 120, 120,  78,
   142, 102, 105, 110, 115, 105,  98, 105,
   125,  58,  58, 107,  95, 145, 125, 115,
    95, 115, 107,  95,  97, 118, 102, 150,
   100,  93, 100,  58,  50,  58, 119,  72,
    72,  86,  92,  80,  92,  85,  52,  92,
    92,  47,  47,  88,  48, 135,  92,  86,
    92,  92,  69,  75,  58,  92,  80, 121,
    81,  80,  76,  91,  49,  91, 118,
];
/// Width of a 100-unit glyph in em.
pub const CHAR_EM: f64 = 0.08 / 0.14;
/// Ascent above the baseline in em.
pub const ASCENT_EM: f64 = 0.8;
/// Descent below the baseline in em.
pub const DESCENT_EM: f64 = 0.2;
