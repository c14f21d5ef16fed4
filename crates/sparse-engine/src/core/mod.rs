//! Core engine-facing contracts.
//!
//! This module defines the stable interface between the frame loop and the
//! application it drives, plus the signals shared by the loop's stages.

mod app;
mod signals;

pub use app::{App, AppControl};
pub use signals::{ExitReason, LoopSignals};
