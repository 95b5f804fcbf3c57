//! # Program to PNG Preview
//!
//! Rasterizes a drawing [`Program`] into a grayscale image, for eyeballing
//! a bill without a PDF viewer.
//!
//! ```text
//! Program ──replay──► Rasterizer (Canvas) ──► GrayImage ──► PNG bytes
//!                      ├─ CTM + save/restore stack
//!                      ├─ rects, circles, dashed strokes
//!                      └─ text as boxes sized by font metrics
//! ```
//!
//! Colors are reduced to their luminance. Round caps are drawn square.
//!
//! Glyphs are not rasterized. No font program is bundled, so each text run
//! is painted as a mid-gray box with its metric advance width and ascent
//! height. The preview shows where text lands and whether it fits, not how
//! it reads. A [`FontMetrics`] passed to [`Rasterizer::with_metrics`] sizes
//! the boxes.
//!
//! ## Example
//!
//! ```
//! use qrbill::ir::{Op, Program};
//! use qrbill::preview;
//!
//! let mut program = Program::new();
//! program.push(Op::FillRect { x: 0.0, y: 0.0, width: 36.0, height: 36.0 });
//!
//! let image = preview::rasterize(&program, 72.0, 72.0, 72.0).unwrap();
//! assert_eq!(image.dimensions(), (72, 72));
//! assert_eq!(image.get_pixel(0, 71).0, [0]);
//! assert_eq!(image.get_pixel(0, 0).0, [255]);
//! ```

use image::{GrayImage, Luma};

use crate::color::Color;
use crate::error::{QrBillError, Result};
use crate::ir::{Canvas, LineCap, Point, Program, TextRun};
use crate::layout::{FontMetrics, StandardMetrics};

/// Resolution used by the CLI when none is given.
pub const DEFAULT_DPI: f64 = 150.0;

/// Largest image edge, in pixels.
const MAX_EDGE_PX: f64 = 20_000.0;

const IDENTITY: [f64; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// `m` applied first, then `ctm`.
fn concat(m: [f64; 6], ctm: [f64; 6]) -> [f64; 6] {
    [
        m[0] * ctm[0] + m[1] * ctm[2],
        m[0] * ctm[1] + m[1] * ctm[3],
        m[2] * ctm[0] + m[3] * ctm[2],
        m[2] * ctm[1] + m[3] * ctm[3],
        m[4] * ctm[0] + m[5] * ctm[2] + ctm[4],
        m[4] * ctm[1] + m[5] * ctm[3] + ctm[5],
    ]
}

fn gray(color: Color) -> u8 {
    (color.luminance() * 255.0).round() as u8
}

#[derive(Debug, Clone)]
struct State {
    ctm: [f64; 6],
    stroke: u8,
    fill: u8,
    line_width: f64,
    line_cap: LineCap,
    dash: Vec<f64>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            ctm: IDENTITY,
            stroke: 0,
            fill: 0,
            line_width: 1.0,
            line_cap: LineCap::Butt,
            dash: Vec::new(),
        }
    }
}

/// Walks a dash pattern along a path, carrying the phase across segments.
struct Dasher {
    pattern: Vec<f64>,
    index: usize,
    left: f64,
}

impl Dasher {
    fn new(dash: &[f64]) -> Option<Self> {
        if dash.iter().sum::<f64>() <= 0.0 || dash.iter().any(|d| *d < 0.0) {
            return None;
        }
        // An odd-length pattern repeats with on/off swapped
        let mut pattern = dash.to_vec();
        if pattern.len() % 2 == 1 {
            pattern.extend_from_slice(dash);
        }
        let left = pattern[0];
        Some(Self {
            pattern,
            index: 0,
            left,
        })
    }

    fn on(&self) -> bool {
        self.index % 2 == 0
    }

    /// Split `[0, length]` into the intervals that are drawn.
    fn intervals(&mut self, length: f64) -> Vec<(f64, f64)> {
        let mut out = Vec::new();
        let mut t = 0.0;
        while t < length {
            let step = self.left.min(length - t);
            if self.on() && step > 0.0 {
                out.push((t, t + step));
            }
            t += step;
            self.left -= step;
            if self.left <= 0.0 {
                self.index = (self.index + 1) % self.pattern.len();
                self.left = self.pattern[self.index];
            }
        }
        out
    }
}

/// A [`Canvas`] that paints into a grayscale bitmap.
pub struct Rasterizer<M: FontMetrics = StandardMetrics> {
    image: GrayImage,
    /// Device pixels per point.
    scale: f64,
    page_height: f64,
    state: State,
    saved: Vec<State>,
    metrics: M,
}

impl Rasterizer {
    /// A white page of `width` × `height` points at `dpi`.
    pub fn new(width: f64, height: f64, dpi: f64) -> Result<Self> {
        Self::with_metrics(width, height, dpi, StandardMetrics)
    }
}

impl<M: FontMetrics> Rasterizer<M> {
    pub fn with_metrics(width: f64, height: f64, dpi: f64, metrics: M) -> Result<Self> {
        if dpi.is_nan() || dpi <= 0.0 {
            return Err(QrBillError::Preview(format!(
                "resolution must be positive, got {} dpi",
                dpi
            )));
        }
        let scale = dpi / 72.0;
        let (w, h) = ((width * scale).round(), (height * scale).round());
        if !(w >= 1.0 && h >= 1.0) || w > MAX_EDGE_PX || h > MAX_EDGE_PX {
            return Err(QrBillError::Preview(format!(
                "page of {}×{}pt at {} dpi gives a {}×{}px image",
                width, height, dpi, w, h
            )));
        }
        Ok(Self {
            image: GrayImage::from_pixel(w as u32, h as u32, Luma([255])),
            scale,
            page_height: height,
            state: State::default(),
            saved: Vec::new(),
            metrics,
        })
    }

    pub fn into_image(self) -> GrayImage {
        self.image
    }

    /// User space to device pixels.
    fn device(&self, p: Point) -> (f64, f64) {
        let m = self.state.ctm;
        let x = m[0] * p.x + m[2] * p.y + m[4];
        let y = m[1] * p.x + m[3] * p.y + m[5];
        (x * self.scale, (self.page_height - y) * self.scale)
    }

    /// Length of a user-space unit in device pixels.
    fn unit(&self) -> f64 {
        let m = self.state.ctm;
        (m[0] * m[3] - m[1] * m[2]).abs().sqrt() * self.scale
    }

    /// Paint every pixel whose center lies inside the convex `polygon`.
    fn fill_polygon(&mut self, polygon: &[(f64, f64)], level: u8) {
        let (w, h) = self.image.dimensions();
        let min_x = polygon.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let max_x = polygon.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        let min_y = polygon.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let max_y = polygon.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        let x0 = min_x.floor().max(0.0) as u32;
        let x1 = (max_x.ceil().max(0.0) as u32).min(w);
        let y0 = min_y.floor().max(0.0) as u32;
        let y1 = (max_y.ceil().max(0.0) as u32).min(h);

        let n = polygon.len();
        for py in y0..y1 {
            for px in x0..x1 {
                let c = (px as f64 + 0.5, py as f64 + 0.5);
                let mut positive = false;
                let mut negative = false;
                for i in 0..n {
                    let a = polygon[i];
                    let b = polygon[(i + 1) % n];
                    let cross = (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0);
                    positive |= cross > 0.0;
                    negative |= cross < 0.0;
                }
                if !(positive && negative) {
                    self.image.put_pixel(px, py, Luma([level]));
                }
            }
        }
    }

    /// Fill a user-space rectangle.
    fn fill_box(&mut self, x: f64, y: f64, width: f64, height: f64, level: u8) {
        let corners = [
            self.device(Point::new(x, y)),
            self.device(Point::new(x + width, y)),
            self.device(Point::new(x + width, y + height)),
            self.device(Point::new(x, y + height)),
        ];
        self.fill_polygon(&corners, level);
    }

    fn stroke_segment(&mut self, from: (f64, f64), to: (f64, f64)) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let len = (dx * dx + dy * dy).sqrt();
        if len == 0.0 {
            return;
        }
        let (ux, uy) = (dx / len, dy / len);
        let hw = (self.state.line_width * self.unit() / 2.0).max(0.5);
        let ext = match self.state.line_cap {
            LineCap::Butt => 0.0,
            LineCap::Round | LineCap::Square => hw,
        };
        let a = (from.0 - ux * ext, from.1 - uy * ext);
        let b = (to.0 + ux * ext, to.1 + uy * ext);
        let (nx, ny) = (-uy * hw, ux * hw);
        let quad = [
            (a.0 + nx, a.1 + ny),
            (b.0 + nx, b.1 + ny),
            (b.0 - nx, b.1 - ny),
            (a.0 - nx, a.1 - ny),
        ];
        let level = self.state.stroke;
        self.fill_polygon(&quad, level);
    }

    fn stroke_path(&mut self, points: &[Point]) {
        let mut dasher = Dasher::new(&self.state.dash);
        for pair in points.windows(2) {
            let (p, q) = (pair[0], pair[1]);
            let (dx, dy) = (q.x - p.x, q.y - p.y);
            let length = (dx * dx + dy * dy).sqrt();
            let intervals = match dasher.as_mut() {
                Some(dasher) => dasher.intervals(length),
                None => vec![(0.0, length)],
            };
            for (t0, t1) in intervals {
                let at = |t: f64| {
                    let f = if length > 0.0 { t / length } else { 0.0 };
                    Point::new(p.x + dx * f, p.y + dy * f)
                };
                let (from, to) = (self.device(at(t0)), self.device(at(t1)));
                self.stroke_segment(from, to);
            }
        }
    }
}

impl<M: FontMetrics> Canvas for Rasterizer<M> {
    fn save_state(&mut self) {
        self.saved.push(self.state.clone());
    }

    fn restore_state(&mut self) {
        match self.saved.pop() {
            Some(state) => self.state = state,
            None => tracing::warn!("restore without matching save ignored"),
        }
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.transform([1.0, 0.0, 0.0, 1.0, x, y]);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.transform([sx, 0.0, 0.0, sy, 0.0, 0.0]);
    }

    fn transform(&mut self, matrix: [f64; 6]) {
        self.state.ctm = concat(matrix, self.state.ctm);
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.state.stroke = gray(color);
    }

    fn set_fill_color(&mut self, color: Color) {
        self.state.fill = gray(color);
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width;
    }

    fn set_line_cap_style(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    fn set_dash_pattern(&mut self, pattern: &[f64]) {
        self.state.dash = pattern.to_vec();
    }

    fn draw_line(&mut self, from: Point, to: Point) {
        self.stroke_path(&[from, to]);
    }

    fn stroke_polyline(&mut self, points: &[Point]) {
        self.stroke_path(points);
    }

    fn fill_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let level = self.state.fill;
        self.fill_box(x, y, width, height, level);
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64) {
        let (x, y) = self.device(Point::new(cx, cy));
        let r = (radius * self.unit()).max(0.5);
        let (w, h) = self.image.dimensions();
        let x0 = (x - r).floor().max(0.0) as u32;
        let x1 = ((x + r).ceil().max(0.0) as u32).min(w);
        let y0 = (y - r).floor().max(0.0) as u32;
        let y1 = ((y + r).ceil().max(0.0) as u32).min(h);
        let level = self.state.fill;
        for py in y0..y1 {
            for px in x0..x1 {
                let (dx, dy) = (px as f64 + 0.5 - x, py as f64 + 0.5 - y);
                if dx * dx + dy * dy <= r * r {
                    self.image.put_pixel(px, py, Luma([level]));
                }
            }
        }
    }

    fn draw_text(&mut self, run: &TextRun) {
        let width = self.metrics.text_width(&run.text, &run.font, run.size);
        let height = self.metrics.ascent(&run.font, run.size);
        // Placeholder box, mid-gray between the fill and white
        let level = self.state.fill.saturating_add((255 - self.state.fill) / 2);
        self.fill_box(run.x, run.y, width, height, level);
    }
}

/// Rasterize `program` onto a `width` × `height` point page.
pub fn rasterize(program: &Program, width: f64, height: f64, dpi: f64) -> Result<GrayImage> {
    let mut rasterizer = Rasterizer::new(width, height, dpi)?;
    program.replay(&mut rasterizer);
    let image = rasterizer.into_image();
    tracing::debug!(
        width = image.width(),
        height = image.height(),
        ops = program.len(),
        "rasterized preview"
    );
    Ok(image)
}

/// Encode a grayscale image as PNG.
pub fn encode_png(image: &GrayImage) -> Result<Vec<u8>> {
    use image::ImageEncoder;

    let mut png_bytes = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png_bytes)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::L8,
        )
        .map_err(|e| QrBillError::Preview(e.to_string()))?;
    Ok(png_bytes)
}

/// Rasterize `program` and encode it as PNG.
pub fn render_png(program: &Program, width: f64, height: f64, dpi: f64) -> Result<Vec<u8>> {
    encode_png(&rasterize(program, width, height, dpi)?)
}
