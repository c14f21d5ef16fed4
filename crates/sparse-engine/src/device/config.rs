/// Graphics context configuration.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct GraphicsConfig {
    /// Prefer an sRGB color format when the surface offers one.
    pub prefer_srgb: bool,

    /// Requested present mode.
    ///
    /// FIFO is present interval 1 (vsync). When the surface does not offer the
    /// requested mode the first supported one is used and a warning logged.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Backends the instance may pick from.
    pub backends: wgpu::Backends,

    pub power_preference: wgpu::PowerPreference,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly necessary.
    pub required_features: wgpu::Features,

    pub required_limits: wgpu::Limits,

    /// Hint only; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
