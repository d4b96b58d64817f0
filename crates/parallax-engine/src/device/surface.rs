use winit::dpi::{LogicalSize, PhysicalSize};

/// What the frame loop should do after failing to acquire a surface texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Lost or outdated; the surface was configured again.
    Reconfigured,
    /// Timeout or unspecified; try again next frame.
    SkipFrame,
    /// Out of memory. Stop rendering.
    Fatal,
}

/// Physical drawable size for a window, with the device pixel ratio capped.
///
/// High-DPI displays report scale factors of 3 or more; rendering at that
/// density costs fill rate for little visible gain, so the ratio is limited to
/// `max_ratio`. A non-positive `max_ratio` disables the cap.
pub fn clamp_pixel_size(
    logical: LogicalSize<f64>,
    scale_factor: f64,
    max_ratio: f64,
) -> PhysicalSize<u32> {
    let ratio = if max_ratio > 0.0 { scale_factor.min(max_ratio) } else { scale_factor };
    logical.to_physical::<u32>(ratio)
}

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if caps.formats.is_empty() {
        return None;
    }

    if prefer_srgb {
        if let Some(f) = caps.formats.iter().copied().find(|f| f.is_srgb()) {
            return Some(f);
        }
    }

    Some(caps.formats[0])
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            if size.width > 0 && size.height > 0 {
                surface.configure(device, config);
            }
            log::debug!("surface {err:?}; reconfigured");
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::OutOfMemory => {
            log::error!("surface out of memory");
            SurfaceErrorAction::Fatal
        }
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => {
            log::warn!("surface {err:?}; skipping frame");
            SurfaceErrorAction::SkipFrame
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_capped_at_two() {
        let size = clamp_pixel_size(LogicalSize::new(800.0, 600.0), 3.0, 2.0);
        assert_eq!(size, PhysicalSize::new(1600, 1200));
    }

    #[test]
    fn low_ratio_passes_through() {
        let size = clamp_pixel_size(LogicalSize::new(800.0, 600.0), 1.5, 2.0);
        assert_eq!(size, PhysicalSize::new(1200, 900));
    }

    #[test]
    fn non_positive_cap_disables_clamp() {
        let size = clamp_pixel_size(LogicalSize::new(100.0, 100.0), 3.0, 0.0);
        assert_eq!(size, PhysicalSize::new(300, 300));
    }
}
