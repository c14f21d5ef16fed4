use std::fmt;

/// Why the loop is stopping.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ExitReason {
    /// The window's close button, or the window was destroyed.
    CloseRequested,
    /// Alt+F4.
    QuitAccelerator,
    /// [`super::AppControl::Exit`] from the application.
    Application,
    /// The platform event loop ended on its own.
    PlatformExit,
    /// The graphics backend could not continue.
    SurfaceLost,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::CloseRequested => "window closed",
            Self::QuitAccelerator => "quit accelerator",
            Self::Application => "application request",
            Self::PlatformExit => "platform exit",
            Self::SurfaceLost => "graphics surface lost",
        };
        f.write_str(text)
    }
}

/// Loop-wide flags threaded by `&mut` through each stage.
///
/// The first exit request wins; later ones are ignored so the logged reason
/// is the one that actually stopped the loop.
#[derive(Debug, Default, Clone)]
pub struct LoopSignals {
    exit: Option<ExitReason>,
}

impl LoopSignals {
    pub fn request_exit(&mut self, reason: ExitReason) {
        if self.exit.is_none() {
            log::debug!("exit requested: {reason}");
            self.exit = Some(reason);
        }
    }

    #[inline]
    pub fn exit_requested(&self) -> bool {
        self.exit.is_some()
    }

    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_exit_reason_wins() {
        let mut signals = LoopSignals::default();
        assert!(!signals.exit_requested());

        signals.request_exit(ExitReason::QuitAccelerator);
        signals.request_exit(ExitReason::CloseRequested);
        assert!(signals.exit_requested());
        assert_eq!(signals.exit_reason(), Some(ExitReason::QuitAccelerator));
    }
}
