pub mod chart;

pub use chart::{open_in_viewer, ChartPreview};
