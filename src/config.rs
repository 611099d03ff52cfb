// Render parameters as they arrive from the UI layer, plus the strict
// identifier resolution the engine runs before touching any pixels.

use serde::Deserialize;

use crate::color;
use crate::error::SortError;

// One render's worth of parameters. Field names and ranges match the UI
// payload: intensity and chunk size are percents, algorithms are strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortConfig {
  pub sort_algorithm: String,
  pub exclude_algorithm: String,
  pub intensity: f32,
  pub chunk_size: f32,
  pub direction: String,
}

impl SortConfig {
  // Parses the JSON payload the UI sends for one render.
  pub fn from_json(payload: &str) -> Result<Self, SortError> {
    Ok(serde_json::from_str(payload)?)
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortMetric {
  Lightness,
  Saturation,
  Hue,
}

impl SortMetric {
  // Threshold exclude modes reuse the metric of the same name, so both
  // spellings resolve here. Anything else is a fatal input error.
  pub fn resolve(name: &str) -> Result<Self, SortError> {
    match name {
      "lightness" | "lightness_threshold" => Ok(Self::Lightness),
      "saturation" | "saturation_threshold" => Ok(Self::Saturation),
      "hue" | "hue_threshold" => Ok(Self::Hue),
      _ => Err(SortError::UnknownAlgorithm {
        name: name.to_string(),
      }),
    }
  }

  pub(crate) fn key(self, r: u8, g: u8, b: u8) -> f32 {
    match self {
      Self::Lightness => color::lightness(r, g, b),
      Self::Saturation => color::saturation(r, g, b),
      Self::Hue => color::hue(r, g, b),
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExcludeMode {
  // Pixels whose metric falls outside the threshold band become
  // passthrough singletons.
  Threshold(SortMetric),
  // Same band test against one uniform draw per pixel instead of a metric.
  Random,
}

impl ExcludeMode {
  pub fn resolve(name: &str) -> Result<Self, SortError> {
    if name == "random_exclude" {
      return Ok(Self::Random);
    }
    Ok(Self::Threshold(SortMetric::resolve(name)?))
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
  Horizontal,
  Vertical,
}

// The UI only sends known directions; anything else falls back to horizontal.
pub(crate) fn parse_direction(value: &str) -> Direction {
  match value {
    "vertical" => Direction::Vertical,
    _ => Direction::Horizontal,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn from_json_reads_the_camel_case_payload() {
    let config = SortConfig::from_json(
      r#"{
        "sortAlgorithm": "hue",
        "excludeAlgorithm": "saturation_threshold",
        "intensity": 80.0,
        "chunkSize": 25.0,
        "direction": "vertical"
      }"#,
    )
    .unwrap();
    assert_eq!(config.sort_algorithm, "hue");
    assert_eq!(config.exclude_algorithm, "saturation_threshold");
    assert_eq!(config.intensity, 80.0);
    assert_eq!(config.chunk_size, 25.0);
    assert_eq!(config.direction, "vertical");
  }

  #[test]
  fn from_json_rejects_malformed_payloads() {
    let error = SortConfig::from_json("{\"sortAlgorithm\": 5}").unwrap_err();
    assert!(matches!(error, SortError::Config(_)));
  }

  #[test]
  fn metric_names_resolve_with_and_without_threshold_suffix() {
    assert_eq!(SortMetric::resolve("lightness").unwrap(), SortMetric::Lightness);
    assert_eq!(
      SortMetric::resolve("lightness_threshold").unwrap(),
      SortMetric::Lightness
    );
    assert_eq!(SortMetric::resolve("saturation").unwrap(), SortMetric::Saturation);
    assert_eq!(SortMetric::resolve("hue_threshold").unwrap(), SortMetric::Hue);
  }

  #[test]
  fn unknown_metric_names_are_fatal() {
    let error = SortMetric::resolve("chroma").unwrap_err();
    match error {
      SortError::UnknownAlgorithm { name } => assert_eq!(name, "chroma"),
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn exclude_modes_resolve() {
    assert_eq!(ExcludeMode::resolve("random_exclude").unwrap(), ExcludeMode::Random);
    assert_eq!(
      ExcludeMode::resolve("hue_threshold").unwrap(),
      ExcludeMode::Threshold(SortMetric::Hue)
    );
    assert!(ExcludeMode::resolve("banded").is_err());
  }

  #[test]
  fn direction_falls_back_to_horizontal() {
    assert_eq!(parse_direction("vertical"), Direction::Vertical);
    assert_eq!(parse_direction("horizontal"), Direction::Horizontal);
    assert_eq!(parse_direction("diagonal"), Direction::Horizontal);
  }
}
