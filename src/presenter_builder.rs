use crate::{
    brush::StrokeSampler,
    error::ScatterError,
    history::History,
    options::ScatterGuiOptions,
    presenter::ScatterPresenter,
    scatter_data::ScatterData,
};

/// Builder for configuring and constructing a [`ScatterPresenter`].
///
/// # Example
///
/// ```no_run
/// use iced_scatter_brush::{ScatterData, ScatterPresenterBuilder};
///
/// let presenter = ScatterPresenterBuilder::new()
///     .with_scatter(ScatterData::make_default())
///     .with_image_size_em(24.0, 16.0)
///     .with_brush_size(0.05)
///     .build()
///     .unwrap();
/// ```
#[derive(Default)]
pub struct ScatterPresenterBuilder {
    scatter: Option<ScatterData>,
    gui_options: Option<ScatterGuiOptions>,
    image_size_em: Option<[f64; 2]>,
    brush_size: Option<f64>,
    em_size: Option<f64>,
    history_limit: Option<usize>,
    min_stroke_spacing_px: Option<f64>,
    seed: Option<u64>,
    edit_panel_open: Option<bool>,
}

impl ScatterPresenterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the data to edit.
    pub fn with_scatter(mut self, scatter: ScatterData) -> Self {
        self.scatter = Some(scatter);
        self
    }

    /// Start from previously saved GUI options.
    ///
    /// Individual settings below take precedence.
    pub fn with_gui_options(mut self, options: ScatterGuiOptions) -> Self {
        self.gui_options = Some(options);
        self
    }

    /// Plot image size in ems.
    pub fn with_image_size_em(mut self, width: f64, height: f64) -> Self {
        self.image_size_em = Some([width, height]);
        self
    }

    /// Brush radius as a ratio of the bounds width. Clamped to `[0.01, 0.5]`.
    pub fn with_brush_size(mut self, ratio: f64) -> Self {
        self.brush_size = Some(ratio);
        self
    }

    /// Pixel size of one em. Defaults to Iced's default text size.
    pub fn with_em_size(mut self, em_size: f64) -> Self {
        self.em_size = Some(em_size);
        self
    }

    /// Maximum number of undo steps kept.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    /// Minimum cursor travel, in pixels, between two painted points of a stroke.
    pub fn with_min_stroke_spacing_px(mut self, spacing: f64) -> Self {
        self.min_stroke_spacing_px = Some(spacing);
        self
    }

    /// Seed the brush randomness, for reproducible painting.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_edit_panel_open(mut self, open: bool) -> Self {
        self.edit_panel_open = Some(open);
        self
    }

    /// Build the presenter and render its first frame.
    pub fn build(self) -> Result<ScatterPresenter, ScatterError> {
        if let Some(scatter) = &self.scatter
            && !scatter.bounding.is_valid()
        {
            return Err(ScatterError::DegenerateBounds(scatter.bounding));
        }
        if let Some(em) = self.em_size
            && !(em.is_finite() && em > 0.0)
        {
            return Err(ScatterError::InvalidImageSize { width: em, height: em });
        }

        let mut p = ScatterPresenter::new(self.scatter);

        if let Some(options) = self.gui_options {
            p.set_gui_options(options);
        }
        if let Some([w, h]) = self.image_size_em {
            p.set_image_size_em([w, h]);
        }
        if let Some(ratio) = self.brush_size {
            p.set_brush_size(ratio);
        }
        if let Some(em) = self.em_size {
            p.set_em_size(em);
        }
        if let Some(limit) = self.history_limit {
            p.set_history(History::new(limit));
        }
        if let Some(spacing) = self.min_stroke_spacing_px {
            p.set_sampler(StrokeSampler::new(spacing));
        }
        if let Some(seed) = self.seed {
            p.set_rng_seed(seed);
        }
        if let Some(open) = self.edit_panel_open {
            p.set_edit_panel_open(open);
        }

        p.update_cache();
        Ok(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scatter_data::Bounding;

    #[test]
    fn builds_a_rendered_presenter() {
        let p = ScatterPresenterBuilder::new()
            .with_scatter(ScatterData::make_default())
            .with_image_size_em(10.0, 8.0)
            .with_em_size(10.0)
            .with_brush_size(3.0)
            .build()
            .unwrap();
        assert!(p.is_cache_valid());
        assert_eq!(p.plot_image().unwrap().dimensions(), (100, 80));
        assert_eq!(p.gui_options().random_brush_size, 0.5);
    }

    #[test]
    fn rejects_degenerate_bounds() {
        let mut data = ScatterData::make_default();
        data.bounding = Bounding::new([1.0, 0.0], [1.0, 1.0]);
        let err = ScatterPresenterBuilder::new().with_scatter(data).build();
        assert!(matches!(err, Err(ScatterError::DegenerateBounds(_))));
    }

    #[test]
    fn explicit_settings_override_saved_options() {
        let saved = ScatterGuiOptions {
            image_size_em: [5.0, 5.0],
            random_brush_size: 0.2,
            selected_class_idx: 1,
        };
        let p = ScatterPresenterBuilder::new()
            .with_scatter(ScatterData::make_default())
            .with_gui_options(saved)
            .with_brush_size(0.3)
            .build()
            .unwrap();
        assert_eq!(p.gui_options().image_size_em, [5.0, 5.0]);
        assert_eq!(p.gui_options().random_brush_size, 0.3);
        assert_eq!(p.selected_class_idx(), 1);
    }

    #[test]
    fn builds_without_data() {
        let p = ScatterPresenterBuilder::new().build().unwrap();
        assert!(p.scatter().is_none());
        assert!(p.plot_image().is_none());
    }
}
