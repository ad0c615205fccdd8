//! Crawler/indexer subsystem (§4.4): walk, change-detect, extract, chunk,
//! persist, reconcile.

mod change_detector;
mod manager;
mod walker;

pub use manager::IndexManager;
