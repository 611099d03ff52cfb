// Workspace buffers for per-render processing.
// Keeping these in a dedicated struct lets repeated renders (preview loops,
// parameter sweeps) reuse their allocations.

use crate::config::{ExcludeMode, SortMetric};

pub(crate) struct FrameWorkspace {
  pub(crate) width: usize,
  pub(crate) height: usize,
  pub(crate) pixel_count: usize,
  pub(crate) output: Vec<u8>,
  pub(crate) sort_keys: Vec<f32>,
  pub(crate) exclude_keys: Vec<f32>,
  pub(crate) run_indices: Vec<usize>,
}

impl FrameWorkspace {
  pub(crate) fn new(width: usize, height: usize) -> Self {
    let pixel_count = width.saturating_mul(height);
    Self {
      width,
      height,
      pixel_count,
      output: vec![0; pixel_count * 4],
      sort_keys: vec![0.0; pixel_count],
      exclude_keys: Vec::new(),
      run_indices: Vec::with_capacity(width.max(height)),
    }
  }

  // Copies input into the output buffer and precomputes metric keys for fast
  // access. Output starts as an exact copy, so passthrough pixels and every
  // alpha byte already hold their source values before any run is sorted.
  pub(crate) fn prepare(&mut self, input: &[u8], metric: SortMetric, exclude: ExcludeMode) {
    if self.output.len() != input.len() {
      self.output.resize(input.len(), 0);
    }
    self.output.copy_from_slice(input);

    if self.sort_keys.len() != self.pixel_count {
      self.sort_keys.resize(self.pixel_count, 0.0);
    }
    for i in 0..self.pixel_count {
      let idx = i * 4;
      self.sort_keys[i] = metric.key(input[idx], input[idx + 1], input[idx + 2]);
    }

    match exclude {
      ExcludeMode::Threshold(exclude_metric) => {
        if self.exclude_keys.len() != self.pixel_count {
          self.exclude_keys.resize(self.pixel_count, 0.0);
        }
        if exclude_metric == metric {
          let (sort_keys, exclude_keys) = (&self.sort_keys, &mut self.exclude_keys);
          exclude_keys.copy_from_slice(sort_keys);
        } else {
          for i in 0..self.pixel_count {
            let idx = i * 4;
            self.exclude_keys[i] = exclude_metric.key(input[idx], input[idx + 1], input[idx + 2]);
          }
        }
      }
      // Random exclusion never reads a metric map.
      ExcludeMode::Random => self.exclude_keys.clear(),
    }
  }

  pub(crate) fn output(&self) -> &[u8] {
    &self.output
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn prepare_copies_input_and_fills_key_maps() {
    let input = [
      255u8, 0, 0, 255, // red
      0, 0, 0, 10, // black
    ];
    let mut workspace = FrameWorkspace::new(2, 1);
    workspace.prepare(&input, SortMetric::Lightness, ExcludeMode::Threshold(SortMetric::Hue));

    assert_eq!(workspace.output(), &input);
    assert!((workspace.sort_keys[0] - 0.5).abs() < 1e-6);
    assert_eq!(workspace.sort_keys[1], 0.0);
    assert_eq!(workspace.exclude_keys.len(), 2);
    assert_eq!(workspace.exclude_keys[0], 0.0); // pure red hue
  }

  #[test]
  fn prepare_shares_keys_when_metrics_match() {
    let input = [10u8, 20, 30, 255, 200, 100, 50, 255];
    let mut workspace = FrameWorkspace::new(2, 1);
    workspace.prepare(
      &input,
      SortMetric::Saturation,
      ExcludeMode::Threshold(SortMetric::Saturation),
    );
    assert_eq!(workspace.sort_keys, workspace.exclude_keys);
  }

  #[test]
  fn prepare_skips_exclude_keys_for_random_mode() {
    let input = [1u8, 2, 3, 4];
    let mut workspace = FrameWorkspace::new(1, 1);
    workspace.prepare(&input, SortMetric::Hue, ExcludeMode::Random);
    assert!(workspace.exclude_keys.is_empty());
  }
}
