use crate::io::error::{Result, SceneError};
use image::{ImageBuffer, Rgb};
use std::path::Path;

/// Saves a packed 0RGB u32 buffer as an image; the format follows the extension.
pub fn save_buffer_to_image<P: AsRef<Path>>(
    buffer: &[u32],
    width: usize,
    height: usize,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let img_buf = ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        let color = buffer[y as usize * width + x as usize];
        Rgb([(color >> 16) as u8, (color >> 8) as u8, color as u8])
    });

    img_buf.save(path).map_err(|source| SceneError::Image {
        path: path.to_path_buf(),
        source,
    })
}
