//! Platform layer: the winit event loop and the main window.

mod winit_loop;

pub use winit_loop::WinitPlatform;
