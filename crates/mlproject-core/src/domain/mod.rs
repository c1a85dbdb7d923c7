//! Domain types with no file system or logging dependencies.

pub mod config_box;

pub use config_box::ConfigBox;
