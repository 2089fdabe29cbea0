//! Animation Module
//!
//! Keyframed float clips handed to the scene host for playback, and the
//! bounce preview that generates them.

pub mod bounce;

use serde::{Deserialize, Serialize};

pub use bounce::{BounceSimulation, apply_bouncing, simulate_bounce};

/// Node property a clip drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimatedProperty {
    /// Local `position.y`
    PositionY,
}

/// A value at a frame. Frames are fractional; `frame / frame_rate` is seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: f32,
    pub value: f32,
}

impl Keyframe {
    pub fn new(frame: f32, value: f32) -> Self {
        Self { frame, value }
    }
}

/// Float animation with linear interpolation between keyframes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    pub property: AnimatedProperty,
    pub frame_rate: f32,
    /// Sorted by frame
    pub keyframes: Vec<Keyframe>,
    pub looping: bool,
}

impl AnimationClip {
    /// Playback length in seconds.
    pub fn duration(&self) -> f32 {
        match self.keyframes.last() {
            Some(last) if self.frame_rate > 0.0 => last.frame / self.frame_rate,
            _ => 0.0,
        }
    }

    /// Interpolated value at `seconds`, held at the ends.
    pub fn sample(&self, seconds: f32) -> Option<f32> {
        let first = self.keyframes.first()?;
        let last = self.keyframes.last()?;
        let mut frame = seconds * self.frame_rate;
        if self.looping && last.frame > 0.0 {
            frame = frame.rem_euclid(last.frame);
        }
        if frame <= first.frame {
            return Some(first.value);
        }
        if frame >= last.frame {
            return Some(last.value);
        }
        // First keyframe strictly after `frame`; never 0 since frame > first
        let next = self.keyframes.partition_point(|k| k.frame <= frame);
        let (a, b) = (self.keyframes[next - 1], self.keyframes[next]);
        let span = b.frame - a.frame;
        if span <= f32::EPSILON {
            return Some(b.value);
        }
        let t = (frame - a.frame) / span;
        Some(a.value + (b.value - a.value) * t)
    }
}
