// Core pixel-sorting algorithm.
// This module only works on in-memory RGBA frames to keep it reusable; the
// caller owns decoding, encoding, and any worker-thread plumbing.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::workspace::FrameWorkspace;
use crate::config::{parse_direction, Direction, ExcludeMode, SortConfig, SortMetric};
use crate::error::SortError;
use crate::frame::Frame;

// Resolved per-render parameters, in engine units.
struct SortPlan {
  metric: SortMetric,
  exclude: ExcludeMode,
  direction: Direction,
  intensity: f32,
  chunk_percent: f32,
  lower_threshold: f32,
  upper_threshold: f32,
}

impl SortPlan {
  // Fails on unrecognized algorithm identifiers before any pixel is touched.
  fn resolve(config: &SortConfig) -> Result<Self, SortError> {
    let metric = SortMetric::resolve(&config.sort_algorithm)?;
    let exclude = ExcludeMode::resolve(&config.exclude_algorithm)?;
    let intensity = (config.intensity / 100.0).clamp(0.0, 1.0);
    Ok(Self {
      metric,
      exclude,
      direction: parse_direction(&config.direction),
      intensity,
      chunk_percent: config.chunk_size.clamp(0.0, 100.0),
      // The band collapses to 0.5 at intensity 0 and spans [0, 1] at 1.
      lower_threshold: 0.5 - intensity * 0.5,
      upper_threshold: 0.5 + intensity * 0.5,
    })
  }

  fn chunk_len(&self, line_len: usize) -> usize {
    let len = (self.chunk_percent / 100.0 * line_len as f32).floor();
    len.max(1.0) as usize
  }

  fn in_band(&self, value: f32) -> bool {
    value >= self.lower_threshold && value <= self.upper_threshold
  }
}

// Maps positions within one line onto flat pixel indices. Rows step by one
// pixel, columns by the frame width.
#[derive(Clone, Copy)]
struct LineMap {
  origin: usize,
  stride: usize,
}

impl LineMap {
  fn index(&self, offset: usize) -> usize {
    self.origin + offset * self.stride
  }
}

/// Sorts one frame and returns a new frame of identical dimensions.
///
/// Random-exclude draws come from the supplied generator, so callers can pin
/// a seeded generator for reproducible output.
pub fn sort_frame<R: Rng>(
  frame: &Frame,
  config: &SortConfig,
  rng: &mut R,
) -> Result<Frame, SortError> {
  let mut workspace = FrameWorkspace::new(frame.width() as usize, frame.height() as usize);
  let output = sort_lines(frame, &mut workspace, config, rng, |_, _| true)?.to_vec();
  Frame::new(frame.width(), frame.height(), output)
}

/// Convenience wrapper that owns a generator seeded from `seed`.
pub fn sort_frame_seeded(frame: &Frame, config: &SortConfig, seed: u64) -> Result<Frame, SortError> {
  let mut rng = SmallRng::seed_from_u64(seed);
  sort_frame(frame, config, &mut rng)
}

// Processes every line of the frame into the workspace output buffer.
// `on_line` runs before each line with (line, line_count); returning false
// aborts the render with `SortError::Canceled` and no output.
pub(crate) fn sort_lines<'a, R: Rng, F: FnMut(usize, usize) -> bool>(
  frame: &Frame,
  workspace: &'a mut FrameWorkspace,
  config: &SortConfig,
  rng: &mut R,
  mut on_line: F,
) -> Result<&'a [u8], SortError> {
  let plan = SortPlan::resolve(config)?;
  workspace.prepare(frame.data(), plan.metric, plan.exclude);

  let width = workspace.width;
  let height = workspace.height;
  let (line_count, line_len) = match plan.direction {
    Direction::Horizontal => (height, width),
    Direction::Vertical => (width, height),
  };
  let chunk_len = plan.chunk_len(line_len);

  for line in 0..line_count {
    if !on_line(line, line_count) {
      return Err(SortError::Canceled);
    }
    let map = match plan.direction {
      Direction::Horizontal => LineMap {
        origin: line * width,
        stride: 1,
      },
      Direction::Vertical => LineMap {
        origin: line,
        stride: width,
      },
    };
    sort_line(frame.data(), workspace, &plan, map, line_len, chunk_len, rng);
  }

  Ok(workspace.output())
}

// Walks one line chunk by chunk, splitting each chunk into runs at every
// excluded pixel. Excluded pixels stay put as passthrough singletons.
fn sort_line<R: Rng>(
  input: &[u8],
  workspace: &mut FrameWorkspace,
  plan: &SortPlan,
  map: LineMap,
  line_len: usize,
  chunk_len: usize,
  rng: &mut R,
) {
  let FrameWorkspace {
    output,
    sort_keys,
    exclude_keys,
    run_indices,
    ..
  } = workspace;

  let mut chunk_start = 0;
  while chunk_start < line_len {
    // The final chunk may be shorter; it is never padded.
    let chunk_end = (chunk_start + chunk_len).min(line_len);

    let mut run_start = chunk_start;
    for offset in chunk_start..chunk_end {
      let eligible = match plan.exclude {
        ExcludeMode::Random => plan.in_band(rng.random::<f32>()),
        ExcludeMode::Threshold(_) => plan.in_band(exclude_keys[map.index(offset)]),
      };
      if !eligible {
        // Flush the run accumulated before the excluded pixel.
        sort_run(input, output, sort_keys, run_indices, plan, map, run_start, offset);
        run_start = offset + 1;
      }
    }
    sort_run(input, output, sort_keys, run_indices, plan, map, run_start, chunk_end);

    chunk_start = chunk_end;
  }
}

// Sorts one run of pixels stably ascending by the sort metric and writes the
// reordered RGB values back. The intensity split keeps the first
// floor(len * intensity) positions of the sorted order and appends the tail
// in the order the sort produced; the tail is not restored to source order.
fn sort_run(
  input: &[u8],
  output: &mut [u8],
  sort_keys: &[f32],
  run_indices: &mut Vec<usize>,
  plan: &SortPlan,
  map: LineMap,
  start: usize,
  end: usize,
) {
  let run_len = end.saturating_sub(start);
  if run_len <= 1 {
    return;
  }

  run_indices.clear();
  run_indices.extend((start..end).map(|offset| map.index(offset)));
  run_indices.sort_by(|a, b| sort_keys[*a].total_cmp(&sort_keys[*b]));

  let kept = (run_len as f32 * plan.intensity).floor() as usize;
  let (kept_sorted, remainder) = run_indices.split_at(kept);
  for (offset, source_pixel) in kept_sorted.iter().chain(remainder.iter()).enumerate() {
    let s_idx = source_pixel * 4;
    let d_idx = map.index(start + offset) * 4;
    output[d_idx] = input[s_idx];
    output[d_idx + 1] = input[s_idx + 1];
    output[d_idx + 2] = input[s_idx + 2];
    // Alpha keeps the source value already copied at this position.
  }
}
