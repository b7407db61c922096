use iced::widget::image::Handle;
use image::RgbaImage;
use rand::{SeedableRng, rngs::StdRng};
use serde_json::Value;

use crate::{
    brush::{Brush, MAX_BRUSH_SIZE, MIN_BRUSH_SIZE, StrokeSampler},
    error::ScatterError,
    history::{EditKind, History},
    message::{BoundField, ScatterMessage},
    options::ScatterGuiOptions,
    raster::{self, DOT_SIZE_EM},
    scatter_data::{Bounding, Point2d, Rgb, ScatterCluster, ScatterData},
    transform::CoordinateTransformer,
    view,
};

/// Em size in logical pixels; matches Iced's default text size.
pub const DEFAULT_EM_SIZE: f64 = 16.0;

/// Colors handed out to classes created with [`ScatterPresenter::add_class`].
const CLASS_PALETTE: [Rgb; 6] = [
    Rgb::new(173, 216, 230),
    Rgb::new(255, 165, 0),
    Rgb::new(144, 238, 144),
    Rgb::new(255, 192, 203),
    Rgb::new(186, 152, 219),
    Rgb::new(240, 230, 140),
];

#[derive(Debug, Default)]
/// Raster of the scatter data plus the transform it was drawn with.
struct RenderCache {
    valid: bool,
    transformer: Option<CoordinateTransformer>,
    image: Option<RgbaImage>,
    handle: Option<Handle>,
    version: u64,
}

/// Interactive editor for a [`ScatterData`]: paint points with a brush,
/// edit classes and bounds, undo and redo.
///
/// The presenter keeps a cached raster of the data. Mutations only mark the
/// cache stale; [`update_cache`](Self::update_cache) rebuilds it, and
/// [`update`](Self::update) does so after every message.
pub struct ScatterPresenter {
    scatter: Option<ScatterData>,
    gui_options: ScatterGuiOptions,
    em_size: f64,
    cache: RenderCache,
    history: History,
    sampler: StrokeSampler,
    /// Points added by the current stroke.
    stroke_points: usize,
    rng: StdRng,
    hover_px: Option<Point2d>,
    edit_panel_open: bool,
}

impl Default for ScatterPresenter {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ScatterPresenter {
    pub fn new(scatter: Option<ScatterData>) -> Self {
        Self {
            scatter,
            gui_options: ScatterGuiOptions::default(),
            em_size: DEFAULT_EM_SIZE,
            cache: RenderCache::default(),
            history: History::default(),
            sampler: StrokeSampler::default(),
            stroke_points: 0,
            rng: StdRng::seed_from_u64(rand::random()),
            hover_px: None,
            edit_panel_open: false,
        }
    }

    pub(crate) fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub(crate) fn set_history(&mut self, history: History) {
        self.history = history;
    }

    pub(crate) fn set_sampler(&mut self, sampler: StrokeSampler) {
        self.sampler = sampler;
    }

    // ---------------------------------------------------------------------
    // Data access
    // ---------------------------------------------------------------------

    pub fn scatter(&self) -> Option<&ScatterData> {
        self.scatter.as_ref()
    }

    /// Replace the data, e.g. when it was changed outside the widget.
    ///
    /// Clears the undo history and invalidates the cache.
    pub fn set_scatter(&mut self, scatter: Option<ScatterData>) {
        self.scatter = scatter;
        self.history.clear();
        self.abort_stroke();
        self.clamp_selection();
        self.invalidate_cache();
    }

    /// Take the data out of the presenter.
    pub fn into_scatter(self) -> Option<ScatterData> {
        self.scatter
    }

    pub fn gui_options(&self) -> &ScatterGuiOptions {
        &self.gui_options
    }

    pub fn em_size(&self) -> f64 {
        self.em_size
    }

    pub fn selected_class_idx(&self) -> usize {
        self.gui_options.selected_class_idx
    }

    pub fn selected_class(&self) -> Option<&ScatterCluster> {
        self.scatter
            .as_ref()?
            .classes
            .get(self.gui_options.selected_class_idx)
    }

    pub fn brush(&self) -> Brush {
        Brush::new(self.gui_options.random_brush_size)
    }

    pub fn hover_position(&self) -> Option<Point2d> {
        self.hover_px
    }

    pub fn is_edit_panel_open(&self) -> bool {
        self.edit_panel_open
    }

    pub fn is_stroking(&self) -> bool {
        self.sampler.is_active()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ---------------------------------------------------------------------
    // Render cache
    // ---------------------------------------------------------------------

    pub fn invalidate_cache(&mut self) {
        self.cache.valid = false;
    }

    pub fn is_cache_valid(&self) -> bool {
        self.cache.valid
    }

    /// Rebuild the transformer and plot image if the cache is stale.
    ///
    /// Does nothing without data. If the bounds or image size are unusable
    /// the cache is emptied and painting is disabled until they are fixed.
    pub fn update_cache(&mut self) {
        if self.cache.valid {
            return;
        }
        let Some(scatter) = &self.scatter else {
            return;
        };
        self.cache.valid = true;

        let bounding = scatter.bounding;
        let image_size_em = self.gui_options.image_size_em;
        let stale = !self
            .cache
            .transformer
            .as_ref()
            .is_some_and(|t| t.matches(bounding, image_size_em, self.em_size));
        if stale {
            match CoordinateTransformer::new(bounding, image_size_em, self.em_size) {
                Ok(transformer) => self.cache.transformer = Some(transformer),
                Err(err) => {
                    tracing::warn!("cannot build scatter transform: {err}");
                    self.cache.transformer = None;
                    self.cache.image = None;
                    self.cache.handle = None;
                    return;
                }
            }
        }
        let Some(transformer) = &self.cache.transformer else {
            return;
        };

        let image = raster::render_scatter(scatter, transformer, DOT_SIZE_EM * self.em_size);
        let (width, height) = image.dimensions();
        self.cache.handle = Some(Handle::from_rgba(width, height, image.as_raw().clone()));
        self.cache.image = Some(image);
        self.cache.version = self.cache.version.wrapping_add(1);
        tracing::debug!(
            version = self.cache.version,
            width,
            height,
            points = scatter.total_points(),
            "scatter plot image rebuilt"
        );
    }

    pub fn transformer(&self) -> Option<&CoordinateTransformer> {
        self.cache.transformer.as_ref()
    }

    /// The cached plot image, if it has been rendered.
    pub fn plot_image(&self) -> Option<&RgbaImage> {
        self.cache.image.as_ref()
    }

    pub fn image_handle(&self) -> Option<&Handle> {
        self.cache.handle.as_ref()
    }

    /// Incremented every time the plot image is re-rendered.
    pub fn image_version(&self) -> u64 {
        self.cache.version
    }

    // ---------------------------------------------------------------------
    // Painting
    // ---------------------------------------------------------------------

    /// Add one point to the selected class, randomly placed within the brush
    /// around `point_pixel` (image pixel coordinates).
    ///
    /// Returns false, changing nothing, before the first render or when no
    /// class is selected.
    pub fn add_random_point_around(&mut self, point_pixel: Point2d) -> bool {
        let brush = self.brush();
        let (Some(transformer), Some(scatter)) = (&self.cache.transformer, &mut self.scatter)
        else {
            return false;
        };
        let center = transformer.to_bounds(point_pixel);
        let bounding = scatter.bounding;
        let Some(cluster) = scatter.classes.get_mut(self.gui_options.selected_class_idx) else {
            return false;
        };
        let point = brush.deviate(center, &bounding, &mut self.rng);
        cluster.points.push(point);
        self.invalidate_cache();
        true
    }

    /// Press the brush at `pixel`. The whole stroke undoes as one step.
    pub fn begin_stroke(&mut self, pixel: Point2d) -> bool {
        if self.sampler.is_active() {
            self.end_stroke();
        }
        if self.scatter.is_none() {
            return false;
        }
        if self.cache.transformer.is_none() {
            tracing::debug!("stroke ignored: plot not rendered yet");
            return false;
        }
        self.stroke_points = 0;
        match self.sampler.press(pixel) {
            Some(sample) => self.paint_sample(sample),
            None => false,
        }
    }

    /// Drag the brush to `pixel`.
    pub fn continue_stroke(&mut self, pixel: Point2d) -> bool {
        match self.sampler.move_to(pixel) {
            Some(sample) => self.paint_sample(sample),
            None => false,
        }
    }

    /// Release the brush. Returns true if the stroke added points.
    pub fn end_stroke(&mut self) -> bool {
        if !self.sampler.release() {
            return false;
        }
        let added = std::mem::take(&mut self.stroke_points);
        if added > 0 {
            tracing::debug!(points = added, "brush stroke finished");
        }
        added > 0
    }

    /// The stroke's undo checkpoint is taken with its first painted point, so
    /// a stroke that paints nothing leaves the history untouched.
    fn paint_sample(&mut self, sample: Point2d) -> bool {
        let before = if self.stroke_points == 0 && self.selected_class().is_some() {
            self.scatter.clone()
        } else {
            None
        };
        let added = self.add_random_point_around(sample);
        if added {
            if let Some(before) = &before {
                self.history.checkpoint(EditKind::Stroke, before);
            }
            self.stroke_points += 1;
        }
        added
    }

    fn abort_stroke(&mut self) {
        self.sampler.release();
        self.stroke_points = 0;
    }

    // ---------------------------------------------------------------------
    // Edits
    // ---------------------------------------------------------------------

    pub fn select_class(&mut self, index: usize) -> Result<(), ScatterError> {
        let scatter = self.scatter.as_ref().ok_or(ScatterError::NoData)?;
        check_index(scatter, index)?;
        self.gui_options.selected_class_idx = index;
        Ok(())
    }

    pub fn set_bounds(&mut self, bounding: Bounding) -> Result<(), ScatterError> {
        self.apply_bounds(EditKind::Bounds, bounding)
    }

    /// Change one corner coordinate of the bounds.
    pub fn set_bound(&mut self, field: BoundField, value: f64) -> Result<(), ScatterError> {
        let mut bounding = self.scatter.as_ref().ok_or(ScatterError::NoData)?.bounding;
        match field {
            BoundField::MinX => bounding.min[0] = value,
            BoundField::MinY => bounding.min[1] = value,
            BoundField::MaxX => bounding.max[0] = value,
            BoundField::MaxY => bounding.max[1] = value,
        }
        self.apply_bounds(EditKind::Bound(field), bounding)
    }

    fn apply_bounds(&mut self, kind: EditKind, bounding: Bounding) -> Result<(), ScatterError> {
        if !bounding.is_valid() {
            return Err(ScatterError::DegenerateBounds(bounding));
        }
        self.edit(kind, |scatter| {
            scatter.bounding = bounding;
            Ok(())
        })
    }

    pub fn rename_class(&mut self, index: usize, name: impl Into<String>) -> Result<(), ScatterError> {
        let name = name.into();
        self.edit(EditKind::Rename(index), |scatter| {
            check_index(scatter, index)?;
            scatter.classes[index].name = name;
            Ok(())
        })
    }

    pub fn set_class_color(&mut self, index: usize, color: Rgb) -> Result<(), ScatterError> {
        self.edit(EditKind::Recolor(index), |scatter| {
            check_index(scatter, index)?;
            scatter.classes[index].color = color;
            Ok(())
        })
    }

    /// Remove all points of a class.
    pub fn clear_class(&mut self, index: usize) -> Result<(), ScatterError> {
        self.edit(EditKind::ClearClass(index), |scatter| {
            check_index(scatter, index)?;
            scatter.classes[index].points.clear();
            Ok(())
        })
    }

    /// Remove a class. The selection moves one class up, stopping at the first.
    pub fn delete_class(&mut self, index: usize) -> Result<(), ScatterError> {
        self.edit(EditKind::DeleteClass(index), |scatter| {
            check_index(scatter, index)?;
            scatter.classes.remove(index);
            Ok(())
        })?;
        self.gui_options.selected_class_idx = self.gui_options.selected_class_idx.saturating_sub(1);
        Ok(())
    }

    /// Append an empty class with a generated name and color. Returns its index.
    pub fn add_class(&mut self) -> Result<usize, ScatterError> {
        let mut index = 0;
        self.edit(EditKind::AddClass, |scatter| {
            index = scatter.classes.len();
            let name = next_class_name(scatter);
            let color = CLASS_PALETTE[index % CLASS_PALETTE.len()];
            scatter.classes.push(ScatterCluster::new(name, color));
            Ok(())
        })?;
        Ok(index)
    }

    pub fn set_brush_size(&mut self, ratio: f64) {
        if ratio.is_finite() {
            self.gui_options.random_brush_size = ratio.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
        }
    }

    /// Resize the plot image. Rebuilds the transform on the next cache update.
    pub fn set_image_size_em(&mut self, size_em: [f64; 2]) {
        self.gui_options.image_size_em = size_em;
        self.gui_options = self.gui_options.clone().sanitized();
        self.invalidate_cache();
    }

    pub fn set_em_size(&mut self, em_size: f64) {
        if em_size.is_finite() && em_size > 0.0 && em_size != self.em_size {
            self.em_size = em_size;
            self.invalidate_cache();
        }
    }

    pub fn set_edit_panel_open(&mut self, open: bool) {
        self.edit_panel_open = open;
    }

    pub fn undo(&mut self) -> bool {
        self.abort_stroke();
        let Some(current) = &self.scatter else {
            return false;
        };
        let Some(previous) = self.history.undo(current) else {
            return false;
        };
        self.scatter = Some(previous);
        self.clamp_selection();
        self.invalidate_cache();
        true
    }

    pub fn redo(&mut self) -> bool {
        self.abort_stroke();
        let Some(current) = &self.scatter else {
            return false;
        };
        let Some(next) = self.history.redo(current) else {
            return false;
        };
        self.scatter = Some(next);
        self.clamp_selection();
        self.invalidate_cache();
        true
    }

    /// Apply an undoable edit to the data.
    fn edit<F>(&mut self, kind: EditKind, f: F) -> Result<(), ScatterError>
    where
        F: FnOnce(&mut ScatterData) -> Result<(), ScatterError>,
    {
        let scatter = self.scatter.as_mut().ok_or(ScatterError::NoData)?;
        let before = scatter.clone();
        f(scatter)?;
        if *scatter != before {
            self.history.checkpoint(kind, &before);
            self.invalidate_cache();
        }
        Ok(())
    }

    fn clamp_selection(&mut self) {
        let len = self.scatter.as_ref().map_or(0, |s| s.classes.len());
        if self.gui_options.selected_class_idx >= len {
            self.gui_options.selected_class_idx = len.saturating_sub(1);
        }
    }

    // ---------------------------------------------------------------------
    // Persistence and export
    // ---------------------------------------------------------------------

    pub fn save_gui_options_to_json(&self) -> Value {
        self.gui_options.save_to_json()
    }

    pub fn load_gui_options_from_json(&mut self, json: &Value) -> Result<(), ScatterError> {
        self.set_gui_options(ScatterGuiOptions::load_from_json(json)?);
        Ok(())
    }

    pub fn set_gui_options(&mut self, options: ScatterGuiOptions) {
        self.gui_options = options.sanitized();
        self.clamp_selection();
        self.invalidate_cache();
    }

    /// The point table as CSV, for the clipboard.
    pub fn clipboard_csv(&self) -> Option<String> {
        self.scatter.as_ref().map(ScatterData::to_csv)
    }

    // ---------------------------------------------------------------------
    // Iced plumbing
    // ---------------------------------------------------------------------

    /// Handle a message from [`view`](Self::view).
    ///
    /// Returns true when the scatter data changed.
    pub fn update(&mut self, message: ScatterMessage) -> bool {
        let result = match message {
            ScatterMessage::SelectClass(index) => self.select_class(index).map(|_| false),
            ScatterMessage::ToggleEditPanel => {
                self.edit_panel_open = !self.edit_panel_open;
                Ok(false)
            }
            ScatterMessage::SetBound(field, value) => self.set_bound(field, value).map(|_| true),
            ScatterMessage::RenameClass(index, name) => {
                self.rename_class(index, name).map(|_| true)
            }
            ScatterMessage::SetClassColor(index, color) => {
                self.set_class_color(index, color).map(|_| true)
            }
            ScatterMessage::ClearClass(index) => self.clear_class(index).map(|_| true),
            ScatterMessage::DeleteClass(index) => self.delete_class(index).map(|_| true),
            ScatterMessage::AddClass => self.add_class().map(|_| true),
            ScatterMessage::SetBrushSize(ratio) => {
                self.set_brush_size(ratio);
                Ok(false)
            }
            ScatterMessage::Undo => Ok(self.undo()),
            ScatterMessage::Redo => Ok(self.redo()),
            ScatterMessage::PlotMoved(pixel) => {
                self.hover_px = Some(pixel);
                Ok(self.continue_stroke(pixel))
            }
            ScatterMessage::PlotPressed => {
                let hover = self.hover_px;
                Ok(hover.is_some_and(|pixel| self.begin_stroke(pixel)))
            }
            ScatterMessage::PlotReleased => {
                self.end_stroke();
                Ok(false)
            }
            ScatterMessage::PlotExited => {
                self.hover_px = None;
                self.end_stroke();
                Ok(false)
            }
        };

        let changed = match result {
            Ok(changed) => changed,
            Err(err) => {
                tracing::warn!("scatter edit rejected: {err}");
                false
            }
        };
        self.update_cache();
        changed
    }

    pub fn view(&self) -> iced::Element<'_, ScatterMessage> {
        view::scatter_view(self)
    }
}

impl std::fmt::Debug for ScatterPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScatterPresenter")
            .field("scatter", &self.scatter.as_ref().map(ScatterData::info))
            .field("gui_options", &self.gui_options)
            .field("em_size", &self.em_size)
            .field("cache_valid", &self.cache.valid)
            .field("image_version", &self.cache.version)
            .finish()
    }
}

fn check_index(scatter: &ScatterData, index: usize) -> Result<(), ScatterError> {
    if index < scatter.classes.len() {
        Ok(())
    } else {
        Err(ScatterError::ClassIndexOutOfRange {
            index,
            len: scatter.classes.len(),
        })
    }
}

/// First unused single letter after the existing classes, else `class N`.
fn next_class_name(scatter: &ScatterData) -> String {
    let taken = |name: &str| scatter.classes.iter().any(|c| c.name == name);
    ('a'..='z')
        .map(String::from)
        .find(|name| !taken(name))
        .unwrap_or_else(|| format!("class {}", scatter.classes.len()))
}
