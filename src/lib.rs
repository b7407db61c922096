//! An interactive scatter-plot drawing widget for Iced.
//!
//! - Paint labeled 2D points into named, colored classes with a random brush
//! - Cached raster of the data, re-rendered only when it changes
//! - Undo/redo of whole brush strokes and class or bounds edits
//! - GUI options persisted as JSON, point table exported as CSV
//!
//! Quick start:
//!
//! ```no_run
//! use iced_scatter_brush::{ScatterData, ScatterPresenterBuilder};
//!
//! let presenter = ScatterPresenterBuilder::new()
//!     .with_scatter(ScatterData::make_default())
//!     .with_brush_size(0.1)
//!     .build()
//!     .unwrap();
//! // In your app: `presenter.view().map(Message::Scatter)` and
//! // `presenter.update(msg)` to handle its messages.
//! ```
//!
//! See `demos/` for a runnable application.
pub mod brush;
pub mod error;
pub mod history;
pub mod message;
pub mod options;
pub mod presenter;
pub mod presenter_builder;
pub mod raster;
pub mod scatter_data;
pub mod transform;

#[cfg(feature = "canvas")]
pub(crate) mod brush_overlay;
pub(crate) mod view;

// Re-exports of public types.
pub use brush::{Brush, StrokeSampler};
pub use error::ScatterError;
pub use history::{EditKind, History};
pub use message::{BoundField, ScatterMessage};
pub use options::ScatterGuiOptions;
pub use presenter::ScatterPresenter;
pub use presenter_builder::ScatterPresenterBuilder;
pub use scatter_data::{Bounding, Point2d, Rgb, ScatterCluster, ScatterData, ScatterRow};
pub use transform::{AffineTransform, CoordinateTransformer};
