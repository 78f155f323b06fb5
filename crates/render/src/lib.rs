pub mod command;
pub mod heatmap;
pub mod renderer;
pub mod symbology;

pub use command::*;
pub use heatmap::*;
pub use renderer::*;
