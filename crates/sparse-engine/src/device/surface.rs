use std::sync::Arc;

use winit::window::Window;

use crate::error::StartupError;

use super::GraphicsConfig;

/// 8-bit-per-channel color formats with an 8-bit alpha channel, sRGB first.
const COLOR_FORMATS_SRGB_FIRST: [wgpu::TextureFormat; 4] = [
    wgpu::TextureFormat::Bgra8UnormSrgb,
    wgpu::TextureFormat::Rgba8UnormSrgb,
    wgpu::TextureFormat::Bgra8Unorm,
    wgpu::TextureFormat::Rgba8Unorm,
];

const COLOR_FORMATS_LINEAR_FIRST: [wgpu::TextureFormat; 4] = [
    wgpu::TextureFormat::Bgra8Unorm,
    wgpu::TextureFormat::Rgba8Unorm,
    wgpu::TextureFormat::Bgra8UnormSrgb,
    wgpu::TextureFormat::Rgba8UnormSrgb,
];

/// 24-bit depth formats, in preference order.
const DEPTH_FORMATS: [wgpu::TextureFormat; 2] = [
    wgpu::TextureFormat::Depth24Plus,
    wgpu::TextureFormat::Depth24PlusStencil8,
];

/// What the bootstrap probe learned about the window's surface.
#[derive(Debug, Clone, Default)]
pub struct SurfaceProbe {
    pub adapter_name: String,
    pub formats: Vec<wgpu::TextureFormat>,
    pub present_modes: Vec<wgpu::PresentMode>,
    pub alpha_modes: Vec<wgpu::CompositeAlphaMode>,
    /// Depth formats the adapter can render to.
    pub depth_formats: Vec<wgpu::TextureFormat>,
}

pub(crate) fn new_instance(config: &GraphicsConfig) -> wgpu::Instance {
    wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: config.backends,
        ..Default::default()
    })
}

pub(crate) async fn request_adapter(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface<'_>,
    config: &GraphicsConfig,
) -> Result<wgpu::Adapter, StartupError> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: config.power_preference,
            compatible_surface: Some(surface),
            force_fallback_adapter: false,
        })
        .await?;
    Ok(adapter)
}

/// Bootstrap phase: a throwaway instance, surface and adapter query what the
/// window can present, then are dropped before the real context is built.
pub fn probe(window: Arc<Window>, config: &GraphicsConfig) -> Result<SurfaceProbe, StartupError> {
    let instance = new_instance(config);
    let surface = instance.create_surface(window)?;
    let adapter = pollster::block_on(request_adapter(&instance, &surface, config))?;

    let caps = surface.get_capabilities(&adapter);
    let depth_formats = DEPTH_FORMATS
        .into_iter()
        .filter(|f| {
            adapter
                .get_texture_format_features(*f)
                .allowed_usages
                .contains(wgpu::TextureUsages::RENDER_ATTACHMENT)
        })
        .collect();

    let probe = SurfaceProbe {
        adapter_name: adapter.get_info().name,
        formats: caps.formats,
        present_modes: caps.present_modes,
        alpha_modes: caps.alpha_modes,
        depth_formats,
    };
    log::debug!("surface probe: {probe:?}");
    Ok(probe)
}

/// Picks a 32-bit RGBA/BGRA color format. Anything else is refused.
pub(crate) fn choose_color_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Result<wgpu::TextureFormat, StartupError> {
    let order = if prefer_srgb {
        COLOR_FORMATS_SRGB_FIRST
    } else {
        COLOR_FORMATS_LINEAR_FIRST
    };

    order
        .into_iter()
        .find(|f| formats.contains(f))
        .ok_or_else(|| StartupError::NoPixelFormat {
            found: formats.to_vec(),
        })
}

pub(crate) fn choose_depth_format(
    supported: &[wgpu::TextureFormat],
) -> Result<wgpu::TextureFormat, StartupError> {
    DEPTH_FORMATS
        .into_iter()
        .find(|f| supported.contains(f))
        .ok_or(StartupError::NoDepthFormat)
}

/// Uses `requested` when offered, otherwise the first supported mode.
pub(crate) fn choose_present_mode(
    modes: &[wgpu::PresentMode],
    requested: wgpu::PresentMode,
) -> wgpu::PresentMode {
    if modes.contains(&requested) {
        return requested;
    }

    // FIFO is the one mode every surface must support.
    let fallback = modes.first().copied().unwrap_or(wgpu::PresentMode::Fifo);
    log::warn!(
        "present mode {requested:?} unavailable; using {fallback:?}, frame pacing relies on sleeps"
    );
    fallback
}

pub(crate) fn choose_alpha_mode(
    modes: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| modes.contains(m))
        .or_else(|| modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat as F;

    #[test]
    fn color_format_prefers_srgb_when_asked() {
        let offered = [F::Rgba16Float, F::Bgra8Unorm, F::Bgra8UnormSrgb];
        assert_eq!(choose_color_format(&offered, true).unwrap(), F::Bgra8UnormSrgb);
        assert_eq!(choose_color_format(&offered, false).unwrap(), F::Bgra8Unorm);
    }

    #[test]
    fn color_format_without_eight_bit_rgba_is_refused() {
        let offered = [F::Rgba16Float, F::Rgb10a2Unorm];
        assert!(matches!(
            choose_color_format(&offered, true),
            Err(StartupError::NoPixelFormat { found }) if found.len() == 2
        ));
    }

    #[test]
    fn depth_format_requires_24_bit() {
        assert_eq!(choose_depth_format(&[F::Depth24PlusStencil8]).unwrap(), F::Depth24PlusStencil8);
        assert!(matches!(
            choose_depth_format(&[F::Depth16Unorm]),
            Err(StartupError::NoDepthFormat)
        ));
    }

    #[test]
    fn present_mode_falls_back_to_first_offered() {
        use wgpu::PresentMode as P;
        assert_eq!(choose_present_mode(&[P::Mailbox, P::Fifo], P::Fifo), P::Fifo);
        assert_eq!(choose_present_mode(&[P::Immediate, P::Mailbox], P::Fifo), P::Immediate);
        assert_eq!(choose_present_mode(&[], P::Fifo), P::Fifo);
    }

    #[test]
    fn alpha_mode_honours_supported_request() {
        use wgpu::CompositeAlphaMode as A;
        assert_eq!(
            choose_alpha_mode(&[A::Opaque, A::PreMultiplied], Some(A::PreMultiplied)),
            A::PreMultiplied
        );
        assert_eq!(choose_alpha_mode(&[A::Opaque], Some(A::PreMultiplied)), A::Opaque);
        assert_eq!(choose_alpha_mode(&[], None), A::Auto);
    }
}
