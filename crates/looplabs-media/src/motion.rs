//! Per-frame brightness strategies for the background layer.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use looplabs_models::encoding::MOTION_FADE_SECS;
use looplabs_models::Motion;

/// Brightness multiplier applied to the background at a given time.
///
/// Implementations may keep state (e.g. a random source), so frames must be
/// requested in presentation order.
pub trait MotionEffect: Send {
    /// Factor in `0.0..=1.0` for the frame shown at `time`.
    fn brightness(&mut self, time: f64, duration: f64) -> f64;
}

/// No transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct Still;

impl MotionEffect for Still {
    fn brightness(&mut self, _time: f64, _duration: f64) -> f64 {
        1.0
    }
}

/// Linear fade in from black and out to black.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    pub fade_secs: f64,
}

impl Default for Fade {
    fn default() -> Self {
        Self {
            fade_secs: MOTION_FADE_SECS,
        }
    }
}

impl MotionEffect for Fade {
    fn brightness(&mut self, time: f64, duration: f64) -> f64 {
        if self.fade_secs <= 0.0 {
            return 1.0;
        }
        let fade_in = time / self.fade_secs;
        let fade_out = (duration - time) / self.fade_secs;
        fade_in.min(fade_out).clamp(0.0, 1.0)
    }
}

/// Map a uniform draw in `0.0..1.0` to a pulse factor in `0.5..=1.0`.
pub fn pulse_factor(draw: f64) -> f64 {
    0.5 + 0.5 * draw.clamp(0.0, 1.0)
}

/// Independent random brightness for every frame.
#[derive(Debug, Clone)]
pub struct Flicker<R = StdRng> {
    rng: R,
}

impl Flicker<StdRng> {
    /// Flicker seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Flicker with a reproducible sequence of draws.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> Flicker<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> MotionEffect for Flicker<R> {
    fn brightness(&mut self, _time: f64, _duration: f64) -> f64 {
        pulse_factor(self.rng.random::<f64>())
    }
}

/// One-second sinusoidal pulse between 0.5 and 1.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmoothPulse;

impl MotionEffect for SmoothPulse {
    fn brightness(&mut self, time: f64, _duration: f64) -> f64 {
        0.75 + 0.25 * (2.0 * PI * time).cos()
    }
}

/// Which strategy backs `Motion::Pulse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PulseMode {
    /// Random per-frame brightness
    #[default]
    Flicker,
    /// Periodic sinusoid
    Smooth,
}

impl PulseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PulseMode::Flicker => "flicker",
            PulseMode::Smooth => "smooth",
        }
    }
}

impl fmt::Display for PulseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PulseMode {
    type Err = PulseModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flicker" | "random" => Ok(PulseMode::Flicker),
            "smooth" | "sine" => Ok(PulseMode::Smooth),
            _ => Err(PulseModeParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown pulse mode: {0}")]
pub struct PulseModeParseError(String);

/// Build the effect for a motion name.
pub fn motion_effect(motion: Motion, pulse: PulseMode, seed: Option<u64>) -> Box<dyn MotionEffect> {
    match motion {
        Motion::None => Box::new(Still),
        Motion::Fade => Box::new(Fade::default()),
        Motion::Pulse => match (pulse, seed) {
            (PulseMode::Smooth, _) => Box::new(SmoothPulse),
            (PulseMode::Flicker, Some(seed)) => Box::new(Flicker::seeded(seed)),
            (PulseMode::Flicker, None) => Box::new(Flicker::from_entropy()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_still_is_identity() {
        let mut effect = Still;
        for i in 0..10 {
            assert_eq!(effect.brightness(i as f64 * 0.5, 5.0), 1.0);
        }
    }

    #[test]
    fn test_fade_ramps() {
        let mut fade = Fade::default();
        assert_eq!(fade.brightness(0.0, 5.0), 0.0);
        assert!((fade.brightness(0.5, 5.0) - 0.5).abs() < 1e-9);
        assert_eq!(fade.brightness(2.5, 5.0), 1.0);
        assert!((fade.brightness(4.5, 5.0) - 0.5).abs() < 1e-9);
        assert_eq!(fade.brightness(5.0, 5.0), 0.0);
    }

    #[test]
    fn test_pulse_factor_range() {
        assert_eq!(pulse_factor(0.0), 0.5);
        assert_eq!(pulse_factor(1.0), 1.0);
        assert_eq!(pulse_factor(-3.0), 0.5);
        assert!((pulse_factor(0.5) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_seeded_flicker_is_reproducible() {
        let mut a = Flicker::seeded(7);
        let mut b = Flicker::seeded(7);
        let first: Vec<f64> = (0..20).map(|i| a.brightness(i as f64, 5.0)).collect();
        let second: Vec<f64> = (0..20).map(|i| b.brightness(i as f64, 5.0)).collect();
        assert_eq!(first, second);
        assert!(first.iter().all(|f| (0.5..=1.0).contains(f)));
        assert!(first.windows(2).any(|w| w[0] != w[1]));
    }

    /// Returns the same word forever.
    struct ConstRng(u64);

    impl rand::RngCore for ConstRng {
        fn next_u32(&mut self) -> u32 {
            self.0 as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            for (i, byte) in dst.iter_mut().enumerate() {
                *byte = self.0.to_le_bytes()[i % 8];
            }
        }
    }

    #[test]
    fn test_flicker_uses_injected_rng() {
        let mut dim = Flicker::with_rng(ConstRng(0));
        assert_eq!(dim.brightness(0.0, 5.0), 0.5);
        assert_eq!(dim.brightness(1.0, 5.0), 0.5);

        let mut bright = Flicker::with_rng(ConstRng(u64::MAX));
        assert!(bright.brightness(0.0, 5.0) > 0.999);
    }

    #[test]
    fn test_smooth_pulse_period() {
        let mut pulse = SmoothPulse;
        assert!((pulse.brightness(0.0, 5.0) - 1.0).abs() < 1e-9);
        assert!((pulse.brightness(0.5, 5.0) - 0.5).abs() < 1e-9);
        assert!((pulse.brightness(1.0, 5.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pulse_mode_parse() {
        assert_eq!("smooth".parse::<PulseMode>().unwrap(), PulseMode::Smooth);
        assert_eq!(" Flicker ".parse::<PulseMode>().unwrap(), PulseMode::Flicker);
        assert!("wobble".parse::<PulseMode>().is_err());
    }
}
