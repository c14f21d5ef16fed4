use anyhow::{Context, Result};

use crate::config::PlatformConfig;
use crate::core::App;
use crate::device::{GraphicsContext, WgpuBackend};
use crate::memory::PlatformMemory;
use crate::platform::WinitPlatform;
use crate::render::RenderState;
use crate::telemetry::{LogTelemetry, Telemetry};
use crate::time::{target_seconds_per_frame, FramePacer, SystemTimer};

use super::{FrameLoop, LoopReport};

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs `app` until the window closes, with trace-level telemetry.
    pub fn run<A: App>(config: PlatformConfig, app: A) -> Result<LoopReport> {
        Self::run_with_telemetry(config, app, LogTelemetry)
    }

    /// Initializes the platform, runs the frame loop, then tears down in
    /// order: graphics context, memory, window.
    ///
    /// Any initialization failure is returned before the first frame.
    pub fn run_with_telemetry<A, M>(
        config: PlatformConfig,
        mut app: A,
        telemetry: M,
    ) -> Result<LoopReport>
    where
        A: App,
        M: Telemetry,
    {
        log::info!("starting {}", config.title);

        let render_needed = RenderState::storage_size(config.command_capacity);
        anyhow::ensure!(
            config.memory.render >= render_needed,
            "render region of {} bytes cannot hold {} commands ({render_needed} bytes)",
            config.memory.render,
            config.command_capacity
        );

        let timer = SystemTimer::new();

        let mut platform = WinitPlatform::new().context("failed to create winit EventLoop")?;
        let window = platform
            .create_window(&config.title, config.width, config.height)
            .context("failed to create window")?;

        let mut memory =
            PlatformMemory::reserve(config.memory).context("failed to reserve platform memory")?;

        let report = {
            let (render_arena, app_memory) = memory.partition().split();
            let render = RenderState::new(render_arena, config.command_capacity);

            let backend = WgpuBackend::create(window, &config.graphics)
                .context("failed to create graphics context")?;
            let mut graphics = GraphicsContext::new(backend);

            let refresh = platform.refresh_rate_millihertz();
            let target = target_seconds_per_frame(refresh, config.default_refresh_hz);
            log::info!(
                "monitor refresh {:?} mHz; targeting {:.2} ms per frame",
                refresh,
                target * 1000.0
            );
            let pacer = FramePacer::new(timer, target);

            let mut frame_loop = FrameLoop::new(render, app_memory, pacer, telemetry);
            frame_loop.init(&mut app);
            platform.show_window();

            frame_loop.run(&mut app, &mut platform, &mut graphics);

            frame_loop.shutdown(&mut graphics);
            frame_loop.finish()
        };

        drop(memory);
        platform.release_window();

        log::info!(
            "terminated after {} frames, {} missed",
            report.frames,
            report.missed_frames
        );
        Ok(report)
    }
}
