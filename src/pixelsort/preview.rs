// Preview sizing and downscaling for reduced-resolution renders.
// Interactive callers sort a bounded-size copy while dragging sliders and
// only run the full-resolution pass on commit.

use rand::Rng;

use super::algo::sort_frame;
use crate::config::SortConfig;
use crate::error::SortError;
use crate::frame::Frame;

const MAX_PREVIEW_DIMENSION: u32 = 1280;

// Caps the longest side at the preview bound, keeping the aspect ratio.
pub fn resolve_preview_size(width: u32, height: u32) -> (u32, u32) {
  let max_dim = width.max(height);
  if max_dim <= MAX_PREVIEW_DIMENSION {
    return (width, height);
  }

  let scale = MAX_PREVIEW_DIMENSION as f64 / max_dim as f64;
  let scaled_width = ((width as f64) * scale).round().max(1.0) as u32;
  let scaled_height = ((height as f64) * scale).round().max(1.0) as u32;
  (scaled_width, scaled_height)
}

// Simple nearest-neighbor resize for preview buffers.
pub fn downscale_rgba_nearest(
  src: &[u8],
  src_width: u32,
  src_height: u32,
  dst_width: u32,
  dst_height: u32,
) -> Vec<u8> {
  if src_width == dst_width && src_height == dst_height {
    return src.to_vec();
  }

  let (src_width, src_height) = (src_width as usize, src_height as usize);
  let (dst_width, dst_height) = (dst_width as usize, dst_height as usize);
  let mut dst = Vec::with_capacity(dst_width * dst_height * 4);
  for y in 0..dst_height {
    let src_y = y * src_height / dst_height;
    let src_row = src_y * src_width;
    for x in 0..dst_width {
      let src_x = x * src_width / dst_width;
      let src_idx = (src_row + src_x) * 4;
      dst.extend_from_slice(&src[src_idx..src_idx + 4]);
    }
  }
  dst
}

/// Downsizes the frame to the bounded preview resolution, then sorts at that
/// size. Frames already inside the bound sort directly.
pub fn render_preview<R: Rng>(
  frame: &Frame,
  config: &SortConfig,
  rng: &mut R,
) -> Result<Frame, SortError> {
  let (preview_width, preview_height) = resolve_preview_size(frame.width(), frame.height());
  if preview_width == frame.width() && preview_height == frame.height() {
    return sort_frame(frame, config, rng);
  }

  let scaled = downscale_rgba_nearest(
    frame.data(),
    frame.width(),
    frame.height(),
    preview_width,
    preview_height,
  );
  let preview = Frame::new(preview_width, preview_height, scaled)?;
  sort_frame(&preview, config, rng)
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::rngs::SmallRng;
  use rand::SeedableRng;

  #[test]
  fn small_frames_keep_their_size() {
    assert_eq!(resolve_preview_size(640, 480), (640, 480));
    assert_eq!(resolve_preview_size(1280, 720), (1280, 720));
  }

  #[test]
  fn large_frames_scale_down_proportionally() {
    assert_eq!(resolve_preview_size(4000, 2000), (1280, 640));
    assert_eq!(resolve_preview_size(2000, 4000), (640, 1280));
    // Extreme aspect ratios still floor at one pixel.
    let (_, height) = resolve_preview_size(100_000, 10);
    assert!(height >= 1);
  }

  #[test]
  fn downscale_picks_nearest_source_pixels() {
    // 4x1 image halved to 2x1: columns 0 and 2 survive.
    let src = [
      0u8, 0, 0, 255, //
      10, 10, 10, 255, //
      20, 20, 20, 255, //
      30, 30, 30, 255,
    ];
    let dst = downscale_rgba_nearest(&src, 4, 1, 2, 1);
    assert_eq!(dst, vec![0, 0, 0, 255, 20, 20, 20, 255]);
  }

  #[test]
  fn downscale_with_matching_size_is_a_copy() {
    let src = [1u8, 2, 3, 4, 5, 6, 7, 8];
    assert_eq!(downscale_rgba_nearest(&src, 2, 1, 2, 1), src.to_vec());
  }

  #[test]
  fn render_preview_sorts_at_the_source_size_when_small() {
    let frame = Frame::new(
      2,
      1,
      vec![
        200, 200, 200, 255, //
        10, 10, 10, 255,
      ],
    )
    .unwrap();
    let config = SortConfig {
      sort_algorithm: "lightness".to_string(),
      exclude_algorithm: "lightness_threshold".to_string(),
      intensity: 100.0,
      chunk_size: 100.0,
      direction: "horizontal".to_string(),
    };
    let mut rng = SmallRng::seed_from_u64(1);
    let preview = render_preview(&frame, &config, &mut rng).unwrap();
    assert_eq!(preview.width(), 2);
    assert_eq!(preview.height(), 1);
    assert_eq!(&preview.data()[..4], &[10, 10, 10, 255]);
  }
}
