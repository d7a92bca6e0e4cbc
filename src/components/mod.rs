//! UI components.

pub mod er_diagram;
