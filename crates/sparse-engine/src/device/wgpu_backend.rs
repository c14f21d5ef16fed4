use std::sync::Arc;

use winit::window::Window;

use crate::error::StartupError;
use crate::render::{RectRenderer, RenderState};

use super::surface::{self, SurfaceProbe};
use super::{GraphicsBackend, GraphicsConfig, SubmitOutcome, SurfaceErrorAction};

/// Depth attachment sized to the surface.
struct DepthTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthTarget {
    fn new(device: &wgpu::Device, format: wgpu::TextureFormat, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("sparse depth"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// wgpu implementation of [`GraphicsBackend`] bound to one window.
pub struct WgpuBackend {
    window: Arc<Window>,

    // Field order is drop order: the surface goes before the device.
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    depth_format: wgpu::TextureFormat,
    depth: DepthTarget,
    renderer: RectRenderer,

    /// Texture submitted this frame and waiting for `present`.
    frame: Option<wgpu::SurfaceTexture>,
}

impl WgpuBackend {
    /// Builds the context in two phases: a throwaway probe of the surface
    /// capabilities, then the real instance/device with the chosen formats.
    pub fn create(window: Arc<Window>, config: &GraphicsConfig) -> Result<Self, StartupError> {
        let probe = surface::probe(window.clone(), config)?;
        let color_format = surface::choose_color_format(&probe.formats, config.prefer_srgb)?;
        let depth_format = surface::choose_depth_format(&probe.depth_formats)?;
        let present_mode = surface::choose_present_mode(&probe.present_modes, config.present_mode);
        let alpha_mode = surface::choose_alpha_mode(&probe.alpha_modes, config.alpha_mode);

        log::info!(
            "graphics: adapter {:?}, color {:?}, depth {:?}, present {:?}",
            probe.adapter_name,
            color_format,
            depth_format,
            present_mode
        );

        pollster::block_on(Self::create_real(
            window,
            config,
            &probe,
            color_format,
            depth_format,
            present_mode,
            alpha_mode,
        ))
    }

    async fn create_real(
        window: Arc<Window>,
        config: &GraphicsConfig,
        probe: &SurfaceProbe,
        format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        present_mode: wgpu::PresentMode,
        alpha_mode: wgpu::CompositeAlphaMode,
    ) -> Result<Self, StartupError> {
        let size = window.inner_size();

        let instance = surface::new_instance(config);
        let surface = instance.create_surface(window.clone())?;
        let adapter = surface::request_adapter(&instance, &surface, config).await?;
        if adapter.get_info().name != probe.adapter_name {
            log::warn!(
                "adapter changed between probe ({:?}) and creation ({:?})",
                probe.adapter_name,
                adapter.get_info().name
            );
        }

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sparse-engine device"),
                required_features: config.required_features,
                required_limits: config.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: config.desired_maximum_frame_latency,
        };
        surface.configure(&device, &surface_config);

        let depth = DepthTarget::new(
            &device,
            depth_format,
            surface_config.width,
            surface_config.height,
        );
        let renderer = RectRenderer::new(&device, format, depth_format);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config: surface_config,
            depth_format,
            depth,
            renderer,
            frame: None,
        })
    }

    fn handle_surface_error(&mut self, err: wgpu::SurfaceError) -> SubmitOutcome {
        match SurfaceErrorAction::from_error(&err) {
            SurfaceErrorAction::Reconfigured => {
                log::debug!("surface {err:?}; reconfiguring and skipping frame");
                let size = self.window.inner_size();
                if size.width > 0 && size.height > 0 {
                    self.surface.configure(&self.device, &self.config);
                }
                SubmitOutcome::Skipped
            }
            SurfaceErrorAction::SkipFrame => {
                log::debug!("surface {err:?}; skipping frame");
                SubmitOutcome::Skipped
            }
            SurfaceErrorAction::Fatal => {
                log::error!("surface {err:?}; giving up");
                SubmitOutcome::Fatal
            }
        }
    }
}

impl GraphicsBackend for WgpuBackend {
    fn submit(&mut self, render: &RenderState<'_>) -> SubmitOutcome {
        // An unpresented texture would block acquisition.
        self.frame = None;

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(err) => return self.handle_surface_error(err),
        };
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sparse frame encoder"),
            });

        self.renderer.encode(
            &self.device,
            &self.queue,
            &mut encoder,
            &view,
            &self.depth.view,
            render,
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        self.frame = Some(surface_texture);
        SubmitOutcome::Submitted
    }

    fn present(&mut self) {
        if let Some(frame) = self.frame.take() {
            self.window.pre_present_notify();
            frame.present();
        }
    }

    /// wgpu does not support configuring a surface with a 0x0 size; in that
    /// case configuration is deferred to the next non-zero resize.
    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width == self.config.width && height == self.config.height {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth = DepthTarget::new(&self.device, self.depth_format, width, height);
        log::debug!("surface resized to {width}x{height}");
    }

    fn release(&mut self) {
        self.frame = None;
        log::debug!("releasing graphics backend");
    }
}
