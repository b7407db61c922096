//! The scatter dataset: named, colored clusters of 2D points inside a bounding box.
use core::fmt;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// A point in logical (data) coordinates `[x, y]`.
pub type Point2d = [f64; 2];

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex_string(self) -> String {
        let [r, g, b] = self.0;
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl From<Rgb> for iced::Color {
    fn from(color: Rgb) -> Self {
        let [r, g, b] = color.0;
        iced::Color::from_rgb8(r, g, b)
    }
}

impl From<Rgb> for image::Rgba<u8> {
    fn from(color: Rgb) -> Self {
        let [r, g, b] = color.0;
        image::Rgba([r, g, b, 255])
    }
}

/// Axis-aligned bounding box in logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounding {
    pub min: Point2d,
    pub max: Point2d,
}

impl Default for Bounding {
    fn default() -> Self {
        Self {
            min: [0.0, 0.0],
            max: [1.0, 1.0],
        }
    }
}

impl Bounding {
    pub fn new(min: Point2d, max: Point2d) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    /// True when all corners are finite and the box has a positive span on both axes.
    pub fn is_valid(&self) -> bool {
        self.min.iter().chain(self.max.iter()).all(|v| v.is_finite())
            && self.min[0] < self.max[0]
            && self.min[1] < self.max[1]
    }
}

impl fmt::Display for Bounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(({}, {}), ({}, {}))",
            self.min[0], self.min[1], self.max[0], self.max[1]
        )
    }
}

/// A cluster of points in a scatter plot: one class label with its color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterCluster {
    pub name: String,
    pub color: Rgb,
    #[serde(default)]
    pub points: Vec<Point2d>,
}

impl ScatterCluster {
    pub fn new(name: impl Into<String>, color: Rgb) -> Self {
        Self {
            name: name.into(),
            color,
            points: Vec::new(),
        }
    }

    /// Set the initial points of the cluster.
    pub fn with_points(mut self, points: Vec<Point2d>) -> Self {
        self.points = points;
        self
    }

    /// Short summary, e.g. `a: (12)`.
    pub fn info(&self) -> String {
        format!("{}: ({})", self.name, self.points.len())
    }
}

/// One line of the flattened point table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterRow {
    pub x: f64,
    pub y: f64,
    pub class: String,
    /// Cluster color as `#rrggbb`.
    pub color: String,
}

/// Scatter plot data: a list of classes and a bounding box.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScatterData {
    #[serde(default)]
    pub classes: Vec<ScatterCluster>,
    #[serde(default)]
    pub bounding: Bounding,
}

impl ScatterData {
    /// Four empty classes (light blue, light orange, light green, light red)
    /// inside the unit square.
    pub fn make_default() -> Self {
        Self {
            classes: vec![
                ScatterCluster::new("a", Rgb::new(173, 216, 230)),
                ScatterCluster::new("b", Rgb::new(255, 165, 0)),
                ScatterCluster::new("c", Rgb::new(144, 238, 144)),
                ScatterCluster::new("d", Rgb::new(255, 192, 203)),
            ],
            bounding: Bounding::default(),
        }
    }

    /// One-line summary of classes and bounds.
    pub fn info(&self) -> String {
        let classes = self
            .classes
            .iter()
            .map(ScatterCluster::info)
            .collect::<Vec<_>>()
            .join(", ");
        format!("[{classes}], bounding box: {}", self.bounding)
    }

    pub fn total_points(&self) -> usize {
        self.classes.iter().map(|c| c.points.len()).sum()
    }

    /// Flatten all clusters into a table, in class order then insertion order.
    pub fn rows(&self) -> Vec<ScatterRow> {
        self.classes
            .iter()
            .flat_map(|cluster| {
                let color = cluster.color.to_hex_string();
                cluster.points.iter().map(move |p| ScatterRow {
                    x: p[0],
                    y: p[1],
                    class: cluster.name.clone(),
                    color: color.clone(),
                })
            })
            .collect()
    }

    /// The point table as CSV, with a leading unnamed index column.
    pub fn to_csv(&self) -> String {
        let mut out = String::from(",x,y,class,color\n");
        for (i, row) in self.rows().iter().enumerate() {
            // Writing into a String cannot fail.
            let _ = writeln!(
                out,
                "{i},{:?},{:?},{},{}",
                row.x,
                row.y,
                csv_field(&row.class),
                csv_field(&row.color)
            );
        }
        out
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ScatterData {
        let mut data = ScatterData::make_default();
        data.classes[0].points = vec![[0.25, 0.5], [0.75, 0.125]];
        data.classes[2].points = vec![[0.5, 0.5]];
        data
    }

    #[test]
    fn default_has_four_empty_classes() {
        let data = ScatterData::make_default();
        let names: Vec<_> = data.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c", "d"]);
        assert_eq!(data.total_points(), 0);
        assert_eq!(data.bounding, Bounding::new([0.0, 0.0], [1.0, 1.0]));
    }

    #[test]
    fn info_lists_counts_and_bounds() {
        assert_eq!(
            sample().info(),
            "[a: (2), b: (0), c: (1), d: (0)], bounding box: ((0, 0), (1, 1))"
        );
    }

    #[test]
    fn hex_color_is_lowercase_and_padded() {
        assert_eq!(Rgb::new(255, 165, 0).to_hex_string(), "#ffa500");
        assert_eq!(Rgb::new(1, 2, 3).to_hex_string(), "#010203");
    }

    #[test]
    fn rows_follow_class_then_insertion_order() {
        let rows = sample().rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].class, "a");
        assert_eq!(rows[1].x, 0.75);
        assert_eq!(rows[2].class, "c");
        assert_eq!(rows[2].color, "#90ee90");
    }

    #[test]
    fn csv_has_index_column_and_header() {
        let csv = sample().to_csv();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], ",x,y,class,color");
        assert_eq!(lines[1], "0,0.25,0.5,a,#add8e6");
        assert_eq!(lines[3], "2,0.5,0.5,c,#90ee90");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn csv_quotes_awkward_class_names() {
        let mut data = ScatterData::default();
        data.classes
            .push(ScatterCluster::new("x, \"y\"", Rgb::new(0, 0, 0)).with_points(vec![[1.0, 2.0]]));
        let csv = data.to_csv();
        assert!(csv.contains("0,1.0,2.0,\"x, \"\"y\"\"\",#000000"));
    }

    #[test]
    fn bounding_validity() {
        assert!(Bounding::default().is_valid());
        assert!(!Bounding::new([0.0, 0.0], [0.0, 1.0]).is_valid());
        assert!(!Bounding::new([1.0, 0.0], [0.0, 1.0]).is_valid());
        assert!(!Bounding::new([0.0, f64::NAN], [1.0, 1.0]).is_valid());
    }

    #[test]
    fn json_round_trip_keeps_points() {
        let data = sample();
        let json = serde_json::to_string(&data).unwrap();
        let back: ScatterData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
    }
}
