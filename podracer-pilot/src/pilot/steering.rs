use glam::DVec2;

use podracer_core::vector_math::{self, Point};
use podracer_core::GLOBAL_CONFIG;

// What the target selection needs to know about the leg we're on
#[derive(Clone, Copy, Debug)]
pub struct Approach {
    pub position: Point,
    pub checkpoint: Point,
    pub following_checkpoint: Point,
    pub distance: f64,
    pub first_leg: bool,
}

// Near a checkpoint, aim at a point beside it on the side facing the checkpoint
// after it, so we come out of this one already lined up for the next leg
pub fn select_target(approach: &Approach) -> Point {
    let radius = GLOBAL_CONFIG.checkpoint_radius;
    if approach.first_leg || approach.distance >= GLOBAL_CONFIG.approach_radius_factor * radius {
        return approach.checkpoint;
    }

    let direction = vector_math::normalize_or_zero(approach.checkpoint - approach.position);
    if direction == DVec2::ZERO {
        return approach.checkpoint;
    }
    let normal = DVec2::new(direction.y, -direction.x);
    let offset = normal * radius * GLOBAL_CONFIG.racing_line_offset_factor;

    let left = approach.checkpoint + offset;
    let right = approach.checkpoint - offset;
    if left.distance(approach.following_checkpoint) < right.distance(approach.following_checkpoint) {
        left
    } else {
        right
    }
}

// Full power by default, easing off inside the approach band, cutting the
// engine when we're drifting away from a checkpoint we're right next to. A
// sharp turn caps whatever is left.
pub fn select_thrust(distance: f64, previous_distance: Option<f64>, angle: f64) -> i32 {
    let radius = GLOBAL_CONFIG.checkpoint_radius;
    let mut thrust = GLOBAL_CONFIG.max_thrust;

    if distance < GLOBAL_CONFIG.approach_radius_factor * radius {
        thrust = GLOBAL_CONFIG.approach_thrust;
    }

    let receding = previous_distance.map_or(false, |previous| distance > previous);
    if receding && distance < GLOBAL_CONFIG.braking_radius_factor * radius {
        thrust = 0;
    }

    if angle.abs() > GLOBAL_CONFIG.sharp_turn_degrees {
        thrust = thrust.min(GLOBAL_CONFIG.sharp_turn_thrust);
    }

    thrust
}

pub fn boost_aligned(angle: f64) -> bool {
    let limit = GLOBAL_CONFIG.boost_alignment_degrees;
    -limit < angle && angle < limit
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;

    fn approach(distance_east: f64, following: DVec2) -> Approach {
        let checkpoint = DVec2::new(10000.0, 0.0);
        Approach {
            position: checkpoint - DVec2::new(distance_east, 0.0),
            checkpoint,
            following_checkpoint: following,
            distance: distance_east,
            first_leg: false,
        }
    }

    #[test]
    fn test_sharp_angle_caps_thrust() {
        assert_eq!(select_thrust(10000.0, None, 75.0), 20);
        assert_eq!(select_thrust(1000.0, None, -75.0), 20);
        assert_eq!(select_thrust(1000.0, Some(2000.0), 75.0), 20);
        assert_eq!(select_thrust(10000.0, None, 70.0), 100);
    }

    #[test]
    fn test_approach_band_eases_off() {
        assert_eq!(select_thrust(300.0, None, 10.0), 75);
        assert_eq!(select_thrust(300.0, Some(400.0), 10.0), 75);
        assert_eq!(select_thrust(2399.0, None, 0.0), 75);
        assert_eq!(select_thrust(2400.0, None, 0.0), 100);
    }

    #[test]
    fn test_brakes_when_receding_near_checkpoint() {
        assert_eq!(select_thrust(300.0, Some(250.0), 10.0), 0);
        // receding but still far enough out to come back around
        assert_eq!(select_thrust(1300.0, Some(1200.0), 10.0), 75);
        // a sharp angle never raises thrust back up
        assert_eq!(select_thrust(300.0, Some(250.0), 120.0), 0);
    }

    #[test]
    fn test_target_is_checkpoint_when_far_or_first_leg() {
        let far = approach(5000.0, DVec2::new(10000.0, 8000.0));
        assert_eq!(select_target(&far), far.checkpoint);

        let mut first = approach(1000.0, DVec2::new(10000.0, 8000.0));
        first.first_leg = true;
        assert_eq!(select_target(&first), first.checkpoint);
    }

    #[test]
    fn test_target_offsets_toward_following_checkpoint() {
        let offset = GLOBAL_CONFIG.checkpoint_radius * GLOBAL_CONFIG.racing_line_offset_factor;

        // heading east, next leg turns south
        let south = approach(1000.0, DVec2::new(10000.0, 8000.0));
        let target = select_target(&south);
        assert!(target.abs_diff_eq(DVec2::new(10000.0, offset), 1e-9));

        // next leg turns north
        let north = approach(1000.0, DVec2::new(10000.0, -8000.0));
        let target = select_target(&north);
        assert!(target.abs_diff_eq(DVec2::new(10000.0, -offset), 1e-9));
    }

    #[test]
    fn test_pod_on_checkpoint_keeps_raw_target() {
        let mut on_top = approach(0.0, DVec2::new(10000.0, 8000.0));
        on_top.position = on_top.checkpoint;
        assert_eq!(select_target(&on_top), on_top.checkpoint);
    }

    #[test]
    fn test_boost_alignment_is_exclusive() {
        assert!(boost_aligned(0.0));
        assert!(boost_aligned(-19.9));
        assert!(!boost_aligned(20.0));
        assert!(!boost_aligned(-20.0));
    }
}
