//! Data module - CSV loading and column extraction

mod loader;
mod processor;

pub use loader::{DataLoader, LoaderError};
pub use processor::{AxisValues, DataProcessor};
