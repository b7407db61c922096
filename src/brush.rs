//! Brush painting: random scatter around the cursor and drag sampling.
use std::f64::consts::TAU;

use glam::DVec2;
use rand::{
    distr::{Distribution, StandardUniform},
    rngs::StdRng,
};

use crate::scatter_data::{Bounding, Point2d};

pub const MIN_BRUSH_SIZE: f64 = 0.01;
pub const MAX_BRUSH_SIZE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
/// A circular brush whose radius is a fraction of the bounds width.
pub struct Brush {
    pub size_ratio: f64,
}

impl Brush {
    pub fn new(size_ratio: f64) -> Self {
        Self { size_ratio }
    }

    /// Brush radius in logical units.
    pub fn radius(&self, bounding: &Bounding) -> f64 {
        bounding.width() * self.size_ratio
    }

    /// Brush radius in pixels for an image of the given width.
    pub fn radius_px(&self, image_width_px: f64) -> f64 {
        image_width_px * self.size_ratio
    }

    /// A random point within the brush disk centered on `center`.
    ///
    /// The radius is drawn uniformly, so points concentrate near the center.
    pub fn deviate(&self, center: Point2d, bounding: &Bounding, rng: &mut StdRng) -> Point2d {
        let u_angle: f64 = StandardUniform.sample(rng);
        let u_radius: f64 = StandardUniform.sample(rng);
        let angle = TAU * u_angle;
        let r = self.radius(bounding) * u_radius;
        let offset = DVec2::new(r * angle.cos(), r * angle.sin());
        (DVec2::from(center) + offset).to_array()
    }
}

#[derive(Debug, Clone, Default)]
/// Turns a press / move / release sequence into brush samples.
///
/// Every accepted sample is a pixel position where one point gets painted.
pub struct StrokeSampler {
    /// Minimum pixel distance between consecutive samples. Zero samples every move.
    pub min_spacing_px: f64,
    active: bool,
    last_sample: Option<DVec2>,
    samples_in_stroke: usize,
}

impl StrokeSampler {
    pub fn new(min_spacing_px: f64) -> Self {
        Self {
            min_spacing_px: min_spacing_px.max(0.0),
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of samples emitted since the stroke began.
    pub fn samples_in_stroke(&self) -> usize {
        self.samples_in_stroke
    }

    /// Start a stroke. The press position is always sampled.
    pub fn press(&mut self, pixel: Point2d) -> Option<Point2d> {
        self.active = true;
        self.samples_in_stroke = 0;
        self.last_sample = None;
        self.accept(DVec2::from(pixel))
    }

    /// Cursor moved. Sampled only while a stroke is active.
    pub fn move_to(&mut self, pixel: Point2d) -> Option<Point2d> {
        if !self.active {
            return None;
        }
        let p = DVec2::from(pixel);
        if let Some(last) = self.last_sample
            && self.min_spacing_px > 0.0
            && last.distance(p) < self.min_spacing_px
        {
            return None;
        }
        self.accept(p)
    }

    /// End the stroke. Returns true if a stroke was active.
    pub fn release(&mut self) -> bool {
        let was_active = self.active;
        self.active = false;
        self.last_sample = None;
        was_active
    }

    fn accept(&mut self, p: DVec2) -> Option<Point2d> {
        self.last_sample = Some(p);
        self.samples_in_stroke += 1;
        Some(p.to_array())
    }
}
