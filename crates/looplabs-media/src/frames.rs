//! Solid-color background frames with a brightness schedule.

use image::{Rgb as Pixel, RgbImage};

use looplabs_models::{RenderConfig, Rgb};

use crate::motion::MotionEffect;

/// Iterator over packed RGB24 background frames, in presentation order.
pub struct BackgroundFrames {
    color: Rgb,
    config: RenderConfig,
    total: u64,
    next: u64,
    effect: Box<dyn MotionEffect>,
}

impl BackgroundFrames {
    pub fn new(color: Rgb, config: &RenderConfig, effect: Box<dyn MotionEffect>) -> Self {
        Self {
            color,
            total: config.frame_count(),
            config: config.clone(),
            next: 0,
            effect,
        }
    }

    /// Frames still to be produced.
    pub fn remaining(&self) -> u64 {
        self.total.saturating_sub(self.next)
    }

    /// Color of the next frame, advancing the schedule.
    fn next_color(&mut self) -> Option<Rgb> {
        if self.next >= self.total {
            return None;
        }
        let time = self.config.frame_time(self.next);
        self.next += 1;
        let factor = self.effect.brightness(time, self.config.duration_secs);
        Some(self.color.scaled(factor))
    }
}

impl Iterator for BackgroundFrames {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        let color = self.next_color()?;
        Some(RgbImage::from_pixel(self.config.width, self.config.height, Pixel(color.0)).into_raw())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining() as usize;
        (remaining, Some(remaining))
    }
}

/// Mean BT.601 luma of a packed RGB24 frame.
pub fn mean_luma(frame: &[u8]) -> f64 {
    let pixels = frame.len() / 3;
    if pixels == 0 {
        return 0.0;
    }
    let total: f64 = frame
        .chunks_exact(3)
        .map(|px| Rgb::new(px[0], px[1], px[2]).luma())
        .sum();
    total / pixels as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{Fade, Flicker, Still};

    fn small_config() -> RenderConfig {
        RenderConfig {
            width: 8,
            height: 8,
            fps: 24,
            duration_secs: 5.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_frame_count_and_size() {
        let config = small_config();
        let frames: Vec<_> = BackgroundFrames::new(Rgb::WHITE, &config, Box::new(Still)).collect();
        assert_eq!(frames.len() as u64, config.frame_count());
        assert!(frames.iter().all(|f| f.len() == (config.width * config.height * 3) as usize));
    }

    #[test]
    fn test_still_frames_match_base_color() {
        let base = Rgb::new(255, 200, 100);
        let frames = BackgroundFrames::new(base, &small_config(), Box::new(Still));
        for frame in frames.step_by(12) {
            assert!((mean_luma(&frame) - base.luma()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_pulse_luminance_varies() {
        let base = Rgb::new(255, 200, 100);
        let lumas: Vec<f64> = BackgroundFrames::new(base, &small_config(), Box::new(Flicker::seeded(42)))
            .step_by(6)
            .map(|frame| mean_luma(&frame))
            .collect();
        assert!(lumas.windows(2).any(|w| (w[0] - w[1]).abs() > 0.5));
        assert!(lumas.iter().all(|l| *l <= base.luma() + 1e-9));
        assert!(lumas.iter().all(|l| *l >= base.luma() * 0.5 - 3.0));
    }

    #[test]
    fn test_fade_starts_black() {
        let mut frames = BackgroundFrames::new(Rgb::WHITE, &small_config(), Box::new(Fade::default()));
        let first = frames.next().unwrap();
        assert_eq!(mean_luma(&first), 0.0);
        let middle = frames.nth(58).unwrap();
        assert!((mean_luma(&middle) - 255.0).abs() < 1e-6);
    }
}
