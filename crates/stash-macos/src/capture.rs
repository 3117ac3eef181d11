use std::time::Duration;

use core_graphics::geometry::{CGPoint, CGRect, CGSize};
use core_graphics::image::CGImage;
use core_graphics::window::{
    create_image, kCGWindowImageBestResolution, kCGWindowImageBoundsIgnoreFraming,
    kCGWindowListOptionIncludingWindow,
};
use image::RgbaImage;
use stash_core::error::CaptureError;
use stash_core::platform::WindowId;

use crate::window_list;

/// Captures one window's pixels off the main thread.
///
/// The blocking capture keeps running if the timeout fires first; its
/// result is simply discarded.
pub async fn capture_window(id: WindowId, timeout: Duration) -> Result<RgbaImage, CaptureError> {
    let task = tokio::task::spawn_blocking(move || capture_blocking(id));
    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => Err(CaptureError::Malformed {
            id,
            reason: e.to_string(),
        }),
        Err(_) => Err(CaptureError::Timeout(id)),
    }
}

fn capture_blocking(id: WindowId) -> Result<RgbaImage, CaptureError> {
    let frame = window_list::window(id)
        .ok()
        .flatten()
        .ok_or(CaptureError::NoImage(id))?
        .frame;
    let bounds = CGRect::new(
        &CGPoint::new(frame.x, frame.y),
        &CGSize::new(frame.width, frame.height),
    );
    let image = create_image(
        bounds,
        kCGWindowListOptionIncludingWindow,
        id,
        kCGWindowImageBoundsIgnoreFraming | kCGWindowImageBestResolution,
    )
    .ok_or(CaptureError::NoImage(id))?;
    to_rgba(id, &image)
}

/// Converts a 32-bit BGRA window image to RGBA.
fn to_rgba(id: WindowId, image: &CGImage) -> Result<RgbaImage, CaptureError> {
    let malformed = |reason: String| CaptureError::Malformed { id, reason };

    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(CaptureError::NoImage(id));
    }
    if image.bits_per_pixel() != 32 {
        return Err(malformed(format!("{} bits per pixel", image.bits_per_pixel())));
    }

    let stride = image.bytes_per_row();
    let data = image.data();
    let bytes = data.bytes();
    let row_len = width * 4;

    let mut rgba = Vec::with_capacity(row_len * height);
    for row in bytes.chunks(stride).take(height) {
        let row = row
            .get(..row_len)
            .ok_or_else(|| malformed(format!("short row ({} bytes)", row.len())))?;
        for px in row.chunks_exact(4) {
            rgba.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
        }
    }

    let (w, h) = (
        u32::try_from(width).map_err(|e| malformed(e.to_string()))?,
        u32::try_from(height).map_err(|e| malformed(e.to_string()))?,
    );
    RgbaImage::from_raw(w, h, rgba).ok_or_else(|| malformed("truncated pixel data".into()))
}
