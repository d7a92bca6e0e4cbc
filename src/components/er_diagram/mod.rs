//! Interactive ER diagram on a 2D canvas.

mod component;
pub mod export;
mod render;
pub mod state;
pub mod transition;
pub mod types;
pub mod viewport;

pub use component::ErDiagramCanvas;
pub use state::DiagramState;
pub use types::{AnalysisResponse, ExportFiles, Relationship};
