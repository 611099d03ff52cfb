// Job orchestration for caller-driven renders.
// The engine itself knows nothing about cancellation; this layer registers a
// cancel flag per job, checks it between lines, and reports progress.

use std::{
  collections::HashMap,
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
  },
  time::{Duration, Instant},
};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

use super::algo::sort_lines;
use super::workspace::FrameWorkspace;
use crate::config::{parse_direction, Direction, SortConfig};
use crate::error::SortError;
use crate::frame::Frame;

#[derive(Default)]
pub struct RenderJobs(Mutex<HashMap<String, Arc<AtomicBool>>>);

impl RenderJobs {
  pub fn register(&self, job_id: &str) -> Arc<AtomicBool> {
    let mut lock = self.0.lock().unwrap_or_else(|error| error.into_inner());
    let flag = Arc::new(AtomicBool::new(false));
    lock.insert(job_id.to_string(), flag.clone());
    flag
  }

  pub fn cancel(&self, job_id: &str) -> bool {
    let lock = self.0.lock().unwrap_or_else(|error| error.into_inner());
    if let Some(flag) = lock.get(job_id) {
      flag.store(true, Ordering::Relaxed);
      return true;
    }
    false
  }

  pub fn finish(&self, job_id: &str) {
    let mut lock = self.0.lock().unwrap_or_else(|error| error.into_inner());
    lock.remove(job_id);
  }
}

// Progress snapshot reported to the caller while a render runs.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RenderProgress {
  pub job_id: String,
  pub line: usize,
  pub total_lines: usize,
  pub percent: f64,
}

const PROGRESS_INTERVAL: Duration = Duration::from_millis(200);

/// Renders one job, checking its cancel flag between lines.
///
/// Progress reaches the callback for the first line, then at most once per
/// 200 ms, then once more on completion. A canceled job returns
/// `SortError::Canceled` and produces no frame. The job is removed from the
/// registry on every exit path, so superseded preview requests can be
/// canceled by id without leaking flags.
pub fn render<F>(
  jobs: &RenderJobs,
  job_id: &str,
  frame: &Frame,
  config: &SortConfig,
  seed: u64,
  mut on_progress: F,
) -> Result<Frame, SortError>
where
  F: FnMut(RenderProgress),
{
  let cancel_flag = jobs.register(job_id);
  log::info!("pixel sort started for job {job_id}");

  let total_lines = match parse_direction(&config.direction) {
    Direction::Horizontal => frame.height() as usize,
    Direction::Vertical => frame.width() as usize,
  };

  let mut workspace = FrameWorkspace::new(frame.width() as usize, frame.height() as usize);
  let mut rng = SmallRng::seed_from_u64(seed);
  let mut last_progress = Instant::now();

  let result = sort_lines(frame, &mut workspace, config, &mut rng, |line, line_count| {
    if cancel_flag.load(Ordering::Relaxed) {
      return false;
    }
    if line == 0 || last_progress.elapsed() > PROGRESS_INTERVAL {
      on_progress(progress_snapshot(job_id, line, line_count));
      last_progress = Instant::now();
    }
    true
  });

  let output = match result {
    Ok(output) => output.to_vec(),
    Err(error) => {
      match &error {
        SortError::Canceled => log::info!("pixel sort canceled for job {job_id}"),
        other => log::warn!("pixel sort failed for job {job_id}: {other}"),
      }
      jobs.finish(job_id);
      return Err(error);
    }
  };

  on_progress(progress_snapshot(job_id, total_lines, total_lines));
  log::info!("pixel sort completed for job {job_id}");
  jobs.finish(job_id);
  Frame::new(frame.width(), frame.height(), output)
}

fn progress_snapshot(job_id: &str, line: usize, total_lines: usize) -> RenderProgress {
  let percent = if total_lines > 0 {
    (line as f64 / total_lines as f64) * 100.0
  } else {
    0.0
  };
  RenderProgress {
    job_id: job_id.to_string(),
    line,
    total_lines,
    percent,
  }
}
