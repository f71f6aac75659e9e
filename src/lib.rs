pub mod chart;
pub mod data;
pub mod error;
pub mod layout;
pub mod output;
pub mod palette;
pub mod style;

pub use chart::{render, ChartContext, RenderSummary};
pub use data::ResultSet;
pub use error::ChartError;
pub use palette::Palette;
pub use style::ChartStyle;
