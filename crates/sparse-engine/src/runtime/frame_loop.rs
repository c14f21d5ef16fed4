use crate::core::{App, AppControl, ExitReason, LoopSignals};
use crate::device::{GraphicsBackend, GraphicsContext, SubmitOutcome};
use crate::events::{EventPump, EventSource};
use crate::input::{InputBuffers, MouseButton};
use crate::memory::AppMemory;
use crate::render::RenderState;
use crate::telemetry::{stage, Telemetry};
use crate::time::{FramePacer, Timer};

/// Window side of the loop: the event queue plus the client-area size.
pub trait FrameHost: EventSource {
    /// Client-area size in physical pixels; `(0, 0)` while minimized.
    fn client_size(&self) -> (u32, u32);
}

/// Lifecycle of a [`FrameLoop`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopPhase {
    Initializing,
    Running,
    ShuttingDown,
    Terminated,
}

/// Summary returned once the loop has terminated.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LoopReport {
    pub phase: LoopPhase,
    pub frames: u64,
    pub missed_frames: u64,
    pub exit_reason: Option<ExitReason>,
}

/// Per-iteration sequencing of input, application, rendering and pacing.
///
/// Owns every piece of per-frame state; platform and graphics are passed in
/// so the loop runs the same against winit/wgpu and against test doubles.
pub struct FrameLoop<'m, T: Timer, M: Telemetry> {
    phase: LoopPhase,
    signals: LoopSignals,
    input: InputBuffers,
    pump: EventPump,
    pacer: FramePacer<T>,
    telemetry: M,
    render: RenderState<'m>,
    memory: AppMemory<'m>,
    frames: u64,
}

impl<'m, T: Timer, M: Telemetry> FrameLoop<'m, T, M> {
    pub fn new(
        render: RenderState<'m>,
        memory: AppMemory<'m>,
        pacer: FramePacer<T>,
        telemetry: M,
    ) -> Self {
        Self {
            phase: LoopPhase::Initializing,
            signals: LoopSignals::default(),
            input: InputBuffers::new(),
            pump: EventPump::new(),
            pacer,
            telemetry,
            render,
            memory,
            frames: 0,
        }
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn signals(&self) -> &LoopSignals {
        &self.signals
    }

    pub fn input(&self) -> &InputBuffers {
        &self.input
    }

    pub fn render(&self) -> &RenderState<'m> {
        &self.render
    }

    pub fn pacer(&self) -> &FramePacer<T> {
        &self.pacer
    }

    pub fn telemetry(&self) -> &M {
        &self.telemetry
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Hands the application its memory once and enters `Running`.
    pub fn init<A: App + ?Sized>(&mut self, app: &mut A) {
        debug_assert_eq!(self.phase, LoopPhase::Initializing);

        app.init(&mut self.memory);
        log::debug!(
            "application initialized; persistent arena {} / {} bytes used",
            self.memory.persistent.used(),
            self.memory.persistent.capacity()
        );

        self.phase = LoopPhase::Running;
        self.pacer.reset_baseline();
    }

    /// Iterates until an exit is requested.
    pub fn run<A, H, B>(&mut self, app: &mut A, host: &mut H, graphics: &mut GraphicsContext<B>)
    where
        A: App + ?Sized,
        H: FrameHost + ?Sized,
        B: GraphicsBackend,
    {
        while self.phase == LoopPhase::Running && !self.signals.exit_requested() {
            self.iterate(app, host, graphics);
        }
    }

    /// Runs exactly one iteration. It always completes; the exit flag is
    /// only consulted by the caller afterwards.
    pub fn iterate<A, H, B>(&mut self, app: &mut A, host: &mut H, graphics: &mut GraphicsContext<B>)
    where
        A: App + ?Sized,
        H: FrameHost + ?Sized,
        B: GraphicsBackend,
    {
        debug_assert_eq!(self.phase, LoopPhase::Running);

        let (width, height) = host.client_size();
        self.render.set_screen_size(width, height);

        self.telemetry.begin_block(stage::INPUT);
        self.input.begin_frame();
        self.pump.pump(host, self.input.new_state_mut(), &mut self.signals);
        if let Some((w, h)) = self.pump.take_resize() {
            graphics.resize(w, h);
        }
        self.capture_mouse();
        self.input.new_state_mut().delta_time = self.pacer.target_seconds() as f32;
        self.telemetry.end_block(stage::INPUT);

        self.telemetry.begin_block(stage::UPDATE);
        let control = app.update(&mut self.memory, &mut self.render, self.input.new_state());
        if control == AppControl::Exit {
            self.signals.request_exit(ExitReason::Application);
        }
        self.telemetry.end_block(stage::UPDATE);

        self.telemetry.begin_block(stage::RENDER);
        if graphics.submit(&self.render) == SubmitOutcome::Fatal {
            self.signals.request_exit(ExitReason::SurfaceLost);
        }
        self.telemetry.end_block(stage::RENDER);

        self.telemetry.begin_block(stage::SLEEP);
        self.pacer.pace(&mut self.telemetry);
        self.telemetry.end_block(stage::SLEEP);

        self.telemetry.begin_block(stage::PRESENT);
        graphics.present();
        self.telemetry.end_block(stage::PRESENT);

        self.render.reset();
        self.input.swap();

        let seconds = self.pacer.end_frame();
        self.telemetry.frame_marker(seconds);
        self.frames += 1;
    }

    /// Cursor into render space, then each button's live state as an edge.
    fn capture_mouse(&mut self) {
        let (x, y) = self.pump.cursor();
        let position = self.render.unproject(x, y);

        let mouse = &mut self.input.new_state_mut().mouse;
        mouse.position = position;
        for button in MouseButton::ALL {
            mouse
                .button_mut(button)
                .record_transition(self.pump.mouse_down(button));
        }
    }

    /// Releases the graphics context. Memory and window follow once the
    /// loop itself is dropped.
    pub fn shutdown<B: GraphicsBackend>(&mut self, graphics: &mut GraphicsContext<B>) {
        if self.phase == LoopPhase::ShuttingDown || self.phase == LoopPhase::Terminated {
            return;
        }
        self.phase = LoopPhase::ShuttingDown;

        log::info!(
            "shutting down after {} frames ({})",
            self.frames,
            self.signals
                .exit_reason()
                .map_or_else(|| "no exit reason".to_string(), |r| r.to_string())
        );
        graphics.destroy();
    }

    /// Ends the loop ([`LoopPhase::Terminated`]), giving its borrow of
    /// platform memory back.
    pub fn finish(self) -> LoopReport {
        log::debug!("frame loop terminated");
        LoopReport {
            phase: LoopPhase::Terminated,
            frames: self.frames,
            missed_frames: self.pacer.missed_frames(),
            exit_reason: self.signals.exit_reason(),
        }
    }
}
