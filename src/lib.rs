//! cinecam — deterministic pan/zoom camera path engine for screen
//! recordings.
//!
//! The engine is a pure function of (effect timeline, mouse event log,
//! frame context, carried physics state) -> (camera transform, updated
//! physics state). It never touches the clock, the filesystem or any
//! randomness, so a full export pass is bit-reproducible and interactive
//! preview can share the same per-frame entry point with its own state.

pub mod algorithm;
pub mod error;
pub mod models;

pub use algorithm::camera_engine::{
    solve_frame, CameraPhysicsState, FrameInput, FrameSolution, RenderLayout,
};
pub use algorithm::path_calculator::{
    calculate_path, calculate_path_cancellable, CameraPathFrame, PathRequest, ZoomTransform,
};
pub use algorithm::zoom_blocks::{
    active_block_at, parse_zoom_blocks, BlockLookupCache, ParsedZoomBlock,
};
pub use error::ValidationError;
