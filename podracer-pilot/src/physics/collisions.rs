use tracing::trace;

use podracer_core::GLOBAL_CONFIG;

use super::PodEntity;

// Earliest time in [0, max_time] at which the two pods' circles touch, given
// both keep their current velocity. Pods that already overlap only count when
// they are still closing on each other.
pub fn collision_time(a: &PodEntity, b: &PodEntity, max_time: f64) -> Option<f64> {
    let radii = 2.0 * GLOBAL_CONFIG.pod_radius;
    let offset = a.position() - b.position();
    let relative_velocity = a.velocity() - b.velocity();

    let closing = offset.dot(relative_velocity);
    let gap = offset.length_squared() - radii * radii;
    if gap < 0.0 {
        return if closing < 0.0 { Some(0.0) } else { None };
    }

    // |offset + relative_velocity * t| = radii, taking the first root
    let speed_squared = relative_velocity.length_squared();
    if speed_squared == 0.0 || closing >= 0.0 {
        return None;
    }
    let discriminant = closing * closing - speed_squared * gap;
    if discriminant < 0.0 {
        return None;
    }
    let t = (-closing - discriminant.sqrt()) / speed_squared;
    if (0.0..=max_time).contains(&t) {
        Some(t)
    } else {
        None
    }
}

// Elastic bounce with a floor on the impulse, so even grazing hits push the
// pods apart noticeably. The exchange is applied in two halves and only the
// second half is topped up to the minimum.
pub fn bounce(a: &mut PodEntity, b: &mut PodEntity) {
    let m1 = a.mass();
    let m2 = b.mass();
    let normal = a.position() - b.position();
    let distance_squared = normal.length_squared();
    if distance_squared == 0.0 {
        return;
    }

    // Uses the angle-free equation from
    // https://en.wikipedia.org/wiki/Elastic_collision#Two-dimensional
    // expressed as a momentum exchange so it applies to both pods at once
    let mass_coefficient = (m1 + m2) / (m1 * m2);
    let product = normal.dot(a.velocity() - b.velocity());
    let mut half_impulse = normal * (product / (distance_squared * mass_coefficient));

    a.state.velocity -= half_impulse / m1;
    b.state.velocity += half_impulse / m2;

    let impulse = half_impulse.length();
    let minimum = GLOBAL_CONFIG.min_collision_impulse;
    if impulse > 0.0 && impulse < minimum {
        half_impulse *= minimum / impulse;
    }

    a.state.velocity -= half_impulse / m1;
    b.state.velocity += half_impulse / m2;
}

fn split_pair(pods: &mut [PodEntity], i: usize, j: usize) -> (&mut PodEntity, &mut PodEntity) {
    let (left, right) = pods.split_at_mut(j);
    (&mut left[i], &mut right[0])
}

// Move every pod through one whole turn, stopping at each contact to bounce
// the pair involved
pub fn move_with_collisions(pods: &mut [PodEntity]) {
    let mut elapsed = 0.0;
    let mut last_pair: Option<(usize, usize)> = None;

    for _ in 0..GLOBAL_CONFIG.max_collisions_per_turn {
        let remaining = 1.0 - elapsed;
        let mut first: Option<(usize, usize, f64)> = None;

        for i in 0..pods.len() {
            for j in (i + 1)..pods.len() {
                let t = match collision_time(&pods[i], &pods[j], remaining) {
                    Some(t) => t,
                    None => continue,
                };
                // a pair we just bounced still touches at t = 0
                if t == 0.0 && last_pair == Some((i, j)) {
                    continue;
                }
                if first.map_or(true, |(_, _, best)| t < best) {
                    first = Some((i, j, t));
                }
            }
        }

        let (i, j, t) = match first {
            Some(collision) => collision,
            None => break,
        };

        for pod in pods.iter_mut() {
            pod.advance(t);
        }
        elapsed += t;

        let (a, b) = split_pair(pods, i, j);
        bounce(a, b);
        trace!(i, j, t = elapsed, "predicted collision");
        last_pair = Some((i, j));
    }

    let remaining = 1.0 - elapsed;
    for pod in pods.iter_mut() {
        pod.advance(remaining);
    }
}
