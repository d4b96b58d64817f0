use std::fmt;
use std::path::{Path, PathBuf};

use parallax_engine::render::TextureData;

/// Failure to produce a texture from a file.
#[derive(Debug)]
pub enum AssetError {
    Decode { path: PathBuf, source: image::ImageError },
    Empty { path: PathBuf },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Decode { path, source } => {
                write!(f, "failed to load texture '{}': {source}", path.display())
            }
            AssetError::Empty { path } => write!(f, "texture '{}' has no pixels", path.display()),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Decode { source, .. } => Some(source),
            AssetError::Empty { .. } => None,
        }
    }
}

/// Reads and decodes an image file into RGBA8.
pub fn load_texture(path: impl AsRef<Path>) -> Result<TextureData, AssetError> {
    let path = path.as_ref();
    let img = image::open(path)
        .map_err(|source| AssetError::Decode { path: path.to_path_buf(), source })?
        .to_rgba8();
    let (width, height) = img.dimensions();
    TextureData::new(width, height, img.into_raw())
        .ok_or_else(|| AssetError::Empty { path: path.to_path_buf() })
}

/// Loads `path`, or logs a warning and returns `fallback()` instead.
pub fn load_or_else(path: impl AsRef<Path>, fallback: impl FnOnce() -> TextureData) -> TextureData {
    match load_texture(path) {
        Ok(tex) => {
            log::debug!("loaded texture {}x{}", tex.width, tex.height);
            tex
        }
        Err(e) => {
            log::warn!("{e}; using generated fallback");
            fallback()
        }
    }
}

/// A `steps`-texel horizontal brightness ramp for toon shading.
///
/// Texel `i` holds `(i + 1) / steps`, so the darkest band is never black.
pub fn toon_ramp(steps: u32) -> TextureData {
    let steps = steps.max(1);
    let rgba = (0..steps)
        .flat_map(|i| {
            let v = (((i + 1) as f32 / steps as f32) * 255.0).round() as u8;
            [v, v, v, 255]
        })
        .collect();
    TextureData { width: steps, height: 1, rgba }
}

/// A `size`×`size` grayscale disc fading quadratically to black at its rim.
pub fn soft_disc(size: u32) -> TextureData {
    let size = size.max(1);
    let half = size as f32 * 0.5;
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);

    for y in 0..size {
        for x in 0..size {
            let dx = (x as f32 + 0.5 - half) / half;
            let dy = (y as f32 + 0.5 - half) / half;
            let falloff = (1.0 - (dx * dx + dy * dy).sqrt()).clamp(0.0, 1.0);
            let v = (falloff * falloff * 255.0).round() as u8;
            rgba.extend_from_slice(&[v, v, v, 255]);
        }
    }

    TextureData { width: size, height: size, rgba }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_has_hard_increasing_steps() {
        let ramp = toon_ramp(3);
        assert_eq!((ramp.width, ramp.height), (3, 1));
        let levels: Vec<u8> = (0..3).map(|x| ramp.pixel(x, 0)[0]).collect();
        assert_eq!(levels, vec![85, 170, 255]);
    }

    #[test]
    fn disc_is_bright_in_center_dark_at_corners() {
        let disc = soft_disc(64);
        assert_eq!(disc.rgba.len(), 64 * 64 * 4);
        assert!(disc.pixel(32, 32)[1] > 240);
        assert_eq!(disc.pixel(0, 0)[1], 0);
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let err = load_texture("definitely/not/here.png").unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
        assert!(err.to_string().contains("definitely/not/here.png"));
    }

    #[test]
    fn missing_file_falls_back() {
        let tex = load_or_else("definitely/not/here.png", || toon_ramp(5));
        assert_eq!(tex.width, 5);
    }
}
