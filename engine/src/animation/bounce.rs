//! Bounce Preview
//!
//! Fixed-step simulation of a point mass dropped onto a floor, recorded as
//! one keyframe per step. Two corrections keep a coarse step rate honest:
//!
//! - a velocity reversal inside a step (the apex) splits the step so the
//!   position does not overshoot by a whole step;
//! - a floor crossing computes the fraction of the step spent below the floor,
//!   reflects the velocity with the coefficient of restitution there and
//!   replays only the remaining fraction.
//!
//! The simulation stops when a bounce can no longer lift the mass, or after
//! `max_steps` (non-converging input such as `cor >= 1`).

use tracing::{debug, info};

use super::{AnimatedProperty, AnimationClip, Keyframe};
use crate::config::BounceSettings;
use crate::scene::{NodeId, SceneHost};

/// Result of a bounce simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct BounceSimulation {
    pub keyframes: Vec<Keyframe>,
    /// Steps simulated before settling or hitting the cap
    pub steps: u32,
    /// True when the mass came to rest before `max_steps`
    pub settled: bool,
}

/// Sign with `sign(0) == 0`, unlike `f32::signum`.
fn sign(value: f32) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Simulate a drop from `contact + amplitude` onto the contact height.
///
/// # Arguments
/// * `contact` - Height at which the node touches the floor
/// * `amplitude` - Drop height above `contact`
/// * `settings` - cor, gravity, frame rate, step cap and duration lock
pub fn simulate_bounce(contact: f32, amplitude: f32, settings: &BounceSettings) -> BounceSimulation {
    let frame_rate = settings.frame_rate;
    let mut position = contact + amplitude;
    let mut keyframes = vec![Keyframe::new(0.0, position)];
    if frame_rate <= 0.0 {
        return BounceSimulation {
            keyframes,
            steps: 0,
            settled: false,
        };
    }

    let step_velocity = settings.gravity / frame_rate;
    let mut velocity = 0.0_f32;
    let mut step = 0u32;
    let mut settled = false;

    while step < settings.max_steps {
        if sign(step_velocity) != sign(velocity) && step_velocity.abs() > velocity.abs() {
            // Direction changes inside this step
            let before = velocity.abs() / step_velocity.abs();
            position += velocity * before / frame_rate;
            velocity += step_velocity;
            position += velocity * (1.0 - before) / frame_rate;
        } else {
            velocity += step_velocity;
            position += velocity / frame_rate;
        }

        if position <= contact {
            let travel = (velocity / frame_rate).abs();
            let pct_below = if travel > 0.0 {
                (contact - position).abs() / travel
            } else {
                0.0
            };
            position = contact;
            velocity -= step_velocity * pct_below;
            velocity = -velocity * settings.cor;
            velocity += step_velocity * pct_below;
            position += velocity / frame_rate * pct_below;

            if velocity < 0.0 {
                step += 1;
                keyframes.push(Keyframe::new(step as f32, contact));
                settled = true;
                break;
            }
        }

        step += 1;
        keyframes.push(Keyframe::new(step as f32, position));
    }

    if settings.use_duration && step > 0 {
        let simulated = step as f32 / frame_rate;
        let scale = settings.duration / simulated;
        for keyframe in &mut keyframes {
            keyframe.frame *= scale;
        }
    }

    BounceSimulation {
        keyframes,
        steps: step,
        settled,
    }
}

/// Build the bounce clip for a node and start it once.
///
/// The node's current world height is the contact height. Returns the clip
/// length in seconds, `None` when the node does not exist.
pub fn apply_bouncing(host: &mut dyn SceneHost, node: NodeId, settings: &BounceSettings) -> Option<f32> {
    let world_y = host.world_position(node)?.y;
    let local_y = host.transform(node)?.position.y;
    let simulation = simulate_bounce(world_y, settings.amplitude, settings);

    // Keyframes drive the local position
    let offset = local_y - world_y;
    let keyframes = simulation
        .keyframes
        .iter()
        .map(|k| Keyframe::new(k.frame, k.value + offset))
        .collect();
    let clip = AnimationClip {
        name: "bounceAnimation".to_string(),
        property: AnimatedProperty::PositionY,
        frame_rate: settings.frame_rate,
        keyframes,
        looping: false,
    };
    let duration = clip.duration();

    debug!(
        steps = simulation.steps,
        settled = simulation.settled,
        "bounce simulated"
    );
    info!(?node, amplitude = settings.amplitude, duration, "bounce started");
    host.play_animation(node, clip);
    Some(duration)
}
