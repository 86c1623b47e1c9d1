//! Offline visualization of generated terrain fields.
//!
//! Renders a rectangular axial region to an RGBA image, one pixel per hex
//! cell, using a binned elevation ramp (deep ocean through coast, plains,
//! and mountains). This is a diagnostic surface, not the product renderer:
//! it exists so a generated world can be eyeballed without any GUI.

/// Number of discrete color bins the elevation ramp is quantized into.
pub const COLOR_BINS: usize = 32;

/// Upper bound on hexes drawn into one image. Rendering past this point
/// adds cost without adding legibility at the scales the diagnostic image
/// is viewed at, so drawing stops once the cap is hit.
pub const MAX_RENDER_HEXES: usize = 180_000;

/// Background color for cells with no generated data.
const BACKGROUND: [u8; 3] = [244, 247, 248];

/// Elevation ramp stops as `(position in [0,1], rgb)`.
const RAMP_STOPS: [(f64, [u8; 3]); 7] = [
    (0.00, [0x0b, 0x1f, 0x3a]), // abyss
    (0.22, [0x21, 0x66, 0xac]), // ocean
    (0.44, [0x67, 0xa9, 0xcf]), // shallows
    (0.58, [0xf7, 0xf7, 0xbf]), // coast
    (0.72, [0x5a, 0xae, 0x61]), // plains
    (0.86, [0xa6, 0x76, 0x1d]), // highlands
    (1.00, [0x6b, 0x3d, 0x2e]), // peaks
];

/// A rendered field image, stored as row-major RGBA pixels.
#[derive(Clone, Debug)]
pub struct FieldImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel data in row-major RGBA order. Length = `width * height * 4`.
    pub pixels: Vec<u8>,
}

impl FieldImage {
    /// Creates an image filled with the background color.
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            pixels.extend_from_slice(&BACKGROUND);
            pixels.push(0xff);
        }
        Self { width, height, pixels }
    }

    /// Sets one pixel's RGB value (alpha stays opaque).
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let idx = ((y * self.width + x) * 4) as usize;
        self.pixels[idx..idx + 3].copy_from_slice(&rgb);
    }

    /// Reads one pixel's RGB value.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = ((y * self.width + x) * 4) as usize;
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }

    /// Number of unique RGB colors in the image.
    pub fn unique_color_count(&self) -> usize {
        let mut colors = std::collections::HashSet::new();
        for px in self.pixels.chunks_exact(4) {
            colors.insert([px[0], px[1], px[2]]);
        }
        colors.len()
    }
}

/// Maps a field value in `[-1, 1]` to its binned ramp color.
pub fn elevation_color(v: f32) -> [u8; 3] {
    let normalized = ((f64::from(v) + 1.0) * 0.5).clamp(0.0, 1.0);
    let bin = ((normalized * COLOR_BINS as f64) as usize).min(COLOR_BINS - 1);
    ramp_color(bin as f64 / (COLOR_BINS - 1) as f64)
}

/// Renders the axial rectangle starting at `(q0, r0)` to an image, one
/// pixel per cell.
///
/// `sample` returns the field value for a cell, or `None` when that cell
/// has no data (not generated, or outside the world); missing cells render
/// as background.
pub fn render_region(
    q0: i32,
    r0: i32,
    width: u32,
    height: u32,
    sample: impl FnMut(i32, i32) -> Option<f32>,
) -> FieldImage {
    render_region_capped(q0, r0, width, height, usize::MAX, sample).0
}

/// Like [`render_region`], but stops drawing once `max_hexes` cells have
/// been rendered. Returns the image and the number of hexes drawn; cells
/// past the cap keep the background color.
pub fn render_region_capped(
    q0: i32,
    r0: i32,
    width: u32,
    height: u32,
    max_hexes: usize,
    mut sample: impl FnMut(i32, i32) -> Option<f32>,
) -> (FieldImage, usize) {
    let mut image = FieldImage::new(width, height);
    let mut drawn = 0usize;
    'rows: for y in 0..height {
        for x in 0..width {
            if drawn >= max_hexes {
                break 'rows;
            }
            if let Some(v) = sample(q0 + x as i32, r0 + y as i32) {
                image.set_pixel(x, y, elevation_color(v));
                drawn += 1;
            }
        }
    }
    (image, drawn)
}

/// Piecewise-linear interpolation over the ramp stops at `t` in `[0, 1]`.
fn ramp_color(t: f64) -> [u8; 3] {
    let (first_at, first_rgb) = RAMP_STOPS[0];
    if t <= first_at {
        return first_rgb;
    }

    for window in RAMP_STOPS.windows(2) {
        let (a_at, a_rgb) = window[0];
        let (b_at, b_rgb) = window[1];
        if t <= b_at {
            let local = (t - a_at) / (b_at - a_at);
            return [
                lerp_channel(a_rgb[0], b_rgb[0], local),
                lerp_channel(a_rgb[1], b_rgb[1], local),
                lerp_channel(a_rgb[2], b_rgb[2], local),
            ];
        }
    }

    RAMP_STOPS[RAMP_STOPS.len() - 1].1
}

fn lerp_channel(a: u8, b: u8, t: f64) -> u8 {
    (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8
}
