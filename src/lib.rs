// Pixel-sorting effect engine for in-memory RGBA frames.
// Decoding, encoding, and UI state stay with the caller: this crate takes a
// frame plus render parameters and returns a new frame.

pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod pixelsort;

pub use config::{Direction, ExcludeMode, SortConfig, SortMetric};
pub use error::SortError;
pub use frame::Frame;
pub use pixelsort::jobs::{render, RenderJobs, RenderProgress};
pub use pixelsort::preview::{downscale_rgba_nearest, render_preview, resolve_preview_size};
pub use pixelsort::{sort_frame, sort_frame_seeded};
