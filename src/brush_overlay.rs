use iced::widget::canvas::{self, Frame, Geometry, Path};
use iced::{Color, Element, Length, Point, Rectangle, Renderer, Theme, mouse};

use crate::{message::ScatterMessage, scatter_data::Point2d};

/// Translucent blue, as a hint of where the brush will paint.
const BRUSH_COLOR: Color = Color::from_rgba(0.0, 0.0, 1.0, 60.0 / 255.0);

/// Canvas layer drawing the brush disk under the cursor.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BrushOverlay {
    /// Cursor position in image pixels, if hovering.
    pub center: Option<Point2d>,
    pub radius_px: f64,
}

impl BrushOverlay {
    pub(crate) fn view<'a>(self, width: Length, height: Length) -> Element<'a, ScatterMessage> {
        iced::widget::canvas(self).width(width).height(height).into()
    }
}

impl canvas::Program<ScatterMessage> for BrushOverlay {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let Some([x, y]) = self.center else {
            return Vec::new();
        };
        let mut frame = Frame::new(renderer, bounds.size());
        let circle = Path::circle(Point::new(x as f32, y as f32), self.radius_px as f32);
        frame.fill(&circle, BRUSH_COLOR);
        vec![frame.into_geometry()]
    }
}
