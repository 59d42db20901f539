// Image loading module
// Decodes image files and paints them scaled-to-fit onto a drawing surface

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use log::debug;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Background painted around letterboxed images
const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to read image file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Image {0} has no pixels")]
    Empty(PathBuf),
}

/// Loaded image data ready for display
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Decoded RGBA pixels
    pub pixels: RgbaImage,
}

/// Size of the drawing surface (the window's client area)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
}

/// Placement of the scaled image inside the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Load and decode an image file
pub fn load_image(path: &Path) -> Result<ImageData, RenderError> {
    let data = fs::read(path).map_err(|source| RenderError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let img = load_from_bytes(&data).map_err(|source| RenderError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let pixels = img.to_rgba8();
    let (width, height) = pixels.dimensions();
    if width == 0 || height == 0 {
        return Err(RenderError::Empty(path.to_path_buf()));
    }
    debug!("Decoded {}: {}x{} pixels", path.display(), width, height);
    Ok(ImageData {
        width,
        height,
        pixels,
    })
}

/// Load an image from raw bytes, auto-detecting the format
fn load_from_bytes(data: &[u8]) -> Result<DynamicImage, image::ImageError> {
    let format = image::guess_format(data)?;
    image::load(Cursor::new(data), format)
}

/// Largest aspect-preserving rectangle centred in the surface
pub fn fit_placement(image_width: u32, image_height: u32, surface: Surface) -> Placement {
    if image_width == 0 || image_height == 0 || surface.width == 0 || surface.height == 0 {
        return Placement {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        };
    }

    let image_ratio = image_width as f32 / image_height as f32;
    let surface_ratio = surface.width as f32 / surface.height as f32;

    let (width, height) = if surface_ratio > image_ratio {
        // Surface is wider than the image: fit to height
        let height = surface.height;
        ((height as f32 * image_ratio) as u32, height)
    } else {
        let width = surface.width;
        (width, (width as f32 / image_ratio) as u32)
    };
    let width = width.clamp(1, surface.width);
    let height = height.clamp(1, surface.height);

    Placement {
        x: (surface.width - width) / 2,
        y: (surface.height - height) / 2,
        width,
        height,
    }
}

/// Paint `image` scaled-to-fit and centred onto a fresh surface-sized canvas
pub fn render_fit(image: &ImageData, surface: Surface) -> (RgbaImage, Placement) {
    let mut canvas = RgbaImage::from_pixel(surface.width, surface.height, BACKGROUND);
    let placement = fit_placement(image.width, image.height, surface);
    if placement.width == 0 || placement.height == 0 {
        return (canvas, placement);
    }

    let scaled = if placement.width == image.width && placement.height == image.height {
        image.pixels.clone()
    } else {
        imageops::resize(&image.pixels, placement.width, placement.height, FilterType::Triangle)
    };
    imageops::overlay(&mut canvas, &scaled, placement.x as i64, placement.y as i64);
    (canvas, placement)
}

/// Get the appropriate image format from file extension
pub fn format_from_extension(ext: &str) -> Option<ImageFormat> {
    match ext.to_lowercase().as_str() {
        "png" => Some(ImageFormat::Png),
        "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
        "bmp" => Some(ImageFormat::Bmp),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SURFACE: Surface = Surface {
        width: 800,
        height: 600,
    };

    #[test]
    fn wide_images_fit_to_width() {
        assert_eq!(
            fit_placement(1600, 400, SURFACE),
            Placement {
                x: 0,
                y: 200,
                width: 800,
                height: 200
            }
        );
    }

    #[test]
    fn tall_images_fit_to_height() {
        assert_eq!(
            fit_placement(300, 600, SURFACE),
            Placement {
                x: 250,
                y: 0,
                width: 300,
                height: 600
            }
        );
    }

    #[test]
    fn degenerate_sizes_place_nothing() {
        let zero = Surface {
            width: 0,
            height: 600,
        };
        assert_eq!(fit_placement(10, 10, zero).width, 0);
        assert_eq!(fit_placement(0, 10, SURFACE).height, 0);
    }

    #[test]
    fn renders_centred_on_white() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("red.png");
        RgbaImage::from_pixel(40, 20, Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let image = load_image(&path).unwrap();
        assert_eq!((image.width, image.height), (40, 20));

        let (canvas, placement) = render_fit(&image, Surface { width: 80, height: 80 });
        assert_eq!(placement, Placement { x: 0, y: 20, width: 80, height: 40 });
        assert_eq!(canvas.get_pixel(40, 40), &Rgba([255, 0, 0, 255]));
        assert_eq!(canvas.get_pixel(40, 5), &BACKGROUND);
    }

    #[test]
    fn corrupt_files_fail_to_decode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"definitely not an image").unwrap();
        assert!(matches!(load_image(&path), Err(RenderError::Decode { .. })));
        assert!(matches!(
            load_image(&dir.path().join("missing.png")),
            Err(RenderError::Read { .. })
        ));
    }

    #[test]
    fn extension_formats() {
        assert_eq!(format_from_extension("JPEG"), Some(ImageFormat::Jpeg));
        assert_eq!(format_from_extension("gif"), None);
    }
}
