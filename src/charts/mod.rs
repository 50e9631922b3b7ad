//! Charts module - chart builders, figure model, rendering and export

mod categorical;
mod export;
mod figure;
mod kind;
mod matrix;
pub mod palette;
mod plotter;
mod relational;
mod renderer;
mod table;

pub use categorical::{beeswarm_positions, STRIP_JITTER};
pub use export::{timestamp, OutputFormat};
pub use figure::{format_number, Axis, Colorbar, Figure, Mark, Panel, Scale, Style};
pub use kind::ChartKind;
pub use plotter::{ChartPlotter, ChartRequest};
pub use renderer::register_fonts;
pub use table::DEFAULT_SAMPLE;
