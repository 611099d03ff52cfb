// HSL-derived color metrics used as sort keys and exclusion tests.
// Every metric maps an RGB triple into [0, 1] and stays defined for pure
// grays, where the HSL formulas would otherwise divide by zero.

fn channel_extremes(r: u8, g: u8, b: u8) -> (f32, f32) {
  let min = r.min(g).min(b) as f32 / 255.0;
  let max = r.max(g).max(b) as f32 / 255.0;
  (min, max)
}

// HSL lightness: the midpoint of the channel extremes.
pub fn lightness(r: u8, g: u8, b: u8) -> f32 {
  let (min, max) = channel_extremes(r, g, b);
  (max + min) / 2.0
}

// HSL saturation. Achromatic pixels report zero saturation.
pub fn saturation(r: u8, g: u8, b: u8) -> f32 {
  let (min, max) = channel_extremes(r, g, b);
  if min == max {
    return 0.0;
  }
  let l = (min + max) / 2.0;
  if l > 0.5 {
    (max - min) / (2.0 - max - min)
  } else {
    (max - min) / (max + min)
  }
}

// HSL hue scaled from degrees into [0, 1). Achromatic pixels report zero.
pub fn hue(r: u8, g: u8, b: u8) -> f32 {
  let min = r.min(g).min(b);
  let max = r.max(g).max(b);
  if max == min {
    return 0.0;
  }

  let (rf, gf, bf) = (r as f32, g as f32, b as f32);
  let delta = (max - min) as f32;
  let h = if max == r {
    // The +6 wraps negative red-dominant hues back into range.
    (gf - bf) / delta + if g < b { 6.0 } else { 0.0 }
  } else if max == g {
    (bf - rf) / delta + 2.0
  } else {
    (rf - gf) / delta + 4.0
  };

  (h * 60.0) / 360.0
}
