use crate::scatter_data::{Point2d, Rgb};

/// One corner coordinate of the scatter bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundField {
    MinX,
    MinY,
    MaxX,
    MaxY,
}

#[derive(Debug, Clone, PartialEq)]
/// Messages produced by the scatter widget's view.
///
/// Feed them back through [`ScatterPresenter::update`](crate::ScatterPresenter::update).
pub enum ScatterMessage {
    /// Make a class the target of the brush.
    SelectClass(usize),
    /// Show or hide the class and bounds editor.
    ToggleEditPanel,
    SetBound(BoundField, f64),
    RenameClass(usize, String),
    SetClassColor(usize, Rgb),
    ClearClass(usize),
    DeleteClass(usize),
    AddClass,
    SetBrushSize(f64),
    Undo,
    Redo,
    /// Cursor moved over the plot image, in image pixels.
    PlotMoved(Point2d),
    PlotPressed,
    PlotReleased,
    PlotExited,
}
