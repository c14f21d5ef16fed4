use std::sync::Arc;
use std::time::Duration;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::error::OsError;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::error::StartupError;
use crate::events::{EventSource, RawEvent, RawKey, WheelDelta};
use crate::input::MouseButton;
use crate::runtime::FrameHost;

/// Upper bound on pumps spent waiting for the platform to allow window creation.
const WINDOW_CREATE_ATTEMPTS: u32 = 100;
const WINDOW_CREATE_WAIT: Duration = Duration::from_millis(10);

/// winit event loop driven by polling, plus the single main window.
///
/// The loop never blocks: each [`EventSource::poll`] drains what is pending
/// with a zero timeout and returns.
pub struct WinitPlatform {
    event_loop: EventLoop<()>,
    handler: PlatformHandler,
}

#[derive(Default)]
struct PlatformHandler {
    pending_window: Option<WindowAttributes>,
    create_error: Option<OsError>,
    window: Option<Arc<Window>>,
    events: Vec<RawEvent>,
}

impl WinitPlatform {
    pub fn new() -> Result<Self, StartupError> {
        let event_loop = EventLoop::new()?;
        Ok(Self {
            event_loop,
            handler: PlatformHandler::default(),
        })
    }

    /// Creates the main window, hidden until [`WinitPlatform::show_window`].
    ///
    /// winit only hands out an active loop inside its callbacks, so this pumps
    /// until the resume callback has created the window.
    pub fn create_window(
        &mut self,
        title: &str,
        width: u32,
        height: u32,
    ) -> Result<Arc<Window>, StartupError> {
        self.handler.pending_window = Some(
            Window::default_attributes()
                .with_title(title)
                .with_inner_size(PhysicalSize::new(width, height))
                .with_visible(false),
        );

        for _ in 0..WINDOW_CREATE_ATTEMPTS {
            let status = self
                .event_loop
                .pump_app_events(Some(WINDOW_CREATE_WAIT), &mut self.handler);

            if let Some(err) = self.handler.create_error.take() {
                return Err(StartupError::WindowCreation(err));
            }
            if let Some(window) = self.handler.window.as_ref() {
                log::info!("window created ({width}x{height})");
                return Ok(window.clone());
            }
            if let PumpStatus::Exit(code) = status {
                log::error!("event loop exited with {code} before the window was created");
                break;
            }
        }

        Err(StartupError::WindowUnavailable)
    }

    pub fn show_window(&self) {
        if let Some(window) = self.handler.window.as_ref() {
            window.set_visible(true);
        }
    }

    /// Refresh rate of the monitor the window is on, in millihertz.
    pub fn refresh_rate_millihertz(&self) -> Option<u32> {
        self.handler
            .window
            .as_ref()
            .and_then(|w| w.current_monitor())
            .and_then(|m| m.refresh_rate_millihertz())
    }

    /// Drops the platform's handle to the window.
    pub fn release_window(&mut self) {
        if self.handler.window.take().is_some() {
            log::debug!("window released");
        }
    }
}

impl EventSource for WinitPlatform {
    fn poll(&mut self, out: &mut Vec<RawEvent>) {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.handler);

        out.append(&mut self.handler.events);
        if let PumpStatus::Exit(code) = status {
            log::debug!("platform event loop exited with {code}");
            out.push(RawEvent::PlatformExit);
        }
    }
}

impl FrameHost for WinitPlatform {
    fn client_size(&self) -> (u32, u32) {
        self.handler
            .window
            .as_ref()
            .map(|w| {
                let size = w.inner_size();
                (size.width, size.height)
            })
            .unwrap_or((0, 0))
    }
}

impl ApplicationHandler for PlatformHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(attrs) = self.pending_window.take() else {
            return;
        };

        match event_loop.create_window(attrs) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(err) => self.create_error = Some(err),
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(raw) = translate_window_event(&event) {
            self.events.push(raw);
        }
    }
}

fn translate_window_event(event: &WindowEvent) -> Option<RawEvent> {
    let raw = match event {
        WindowEvent::CloseRequested => RawEvent::CloseRequested,
        WindowEvent::Destroyed => RawEvent::Destroyed,

        WindowEvent::KeyboardInput { event, .. } => {
            let PhysicalKey::Code(code) = event.physical_key else {
                return None;
            };
            let is_down = event.state == ElementState::Pressed;
            RawEvent::Key(RawKey {
                code,
                was_down: event.repeat || !is_down,
                is_down,
            })
        }

        WindowEvent::ModifiersChanged(m) => RawEvent::ModifiersChanged {
            alt: m.state().alt_key(),
        },

        WindowEvent::MouseInput { state, button, .. } => RawEvent::MouseButton {
            button: map_mouse_button(*button)?,
            is_down: *state == ElementState::Pressed,
        },

        WindowEvent::CursorMoved { position, .. } => RawEvent::CursorMoved {
            x: position.x,
            y: position.y,
        },
        WindowEvent::CursorLeft { .. } => RawEvent::CursorLeft,

        WindowEvent::MouseWheel { delta, .. } => RawEvent::Wheel(match delta {
            MouseScrollDelta::LineDelta(_, y) => WheelDelta::Lines(*y),
            MouseScrollDelta::PixelDelta(p) => WheelDelta::Pixels(p.y),
        }),

        WindowEvent::Resized(size) => RawEvent::Resized {
            width: size.width,
            height: size.height,
        },
        WindowEvent::Focused(false) => RawEvent::FocusLost,

        _ => return None,
    };
    Some(raw)
}

fn map_mouse_button(b: WinitMouseButton) -> Option<MouseButton> {
    match b {
        WinitMouseButton::Left => Some(MouseButton::Left),
        WinitMouseButton::Right => Some(MouseButton::Right),
        WinitMouseButton::Middle => Some(MouseButton::Middle),
        WinitMouseButton::Back => Some(MouseButton::Back),
        WinitMouseButton::Forward => Some(MouseButton::Forward),
        WinitMouseButton::Other(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_mouse_buttons_are_dropped() {
        assert_eq!(map_mouse_button(WinitMouseButton::Forward), Some(MouseButton::Forward));
        assert_eq!(map_mouse_button(WinitMouseButton::Other(9)), None);
    }

    #[test]
    fn window_lifecycle_events_translate() {
        assert_eq!(
            translate_window_event(&WindowEvent::CloseRequested),
            Some(RawEvent::CloseRequested)
        );
        assert_eq!(
            translate_window_event(&WindowEvent::Focused(false)),
            Some(RawEvent::FocusLost)
        );
        assert_eq!(translate_window_event(&WindowEvent::Focused(true)), None);
        assert_eq!(
            translate_window_event(&WindowEvent::Resized(PhysicalSize::new(3, 4))),
            Some(RawEvent::Resized {
                width: 3,
                height: 4,
            })
        );
    }
}
