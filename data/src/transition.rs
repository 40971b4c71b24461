use std::time::{Duration, Instant};

use crate::view::Domains;

/// Fixed duration of every redraw animation.
pub const DURATION: Duration = Duration::from_millis(500);

/// Retargetable interpolation between two sets of scale domains.
///
/// An update landing mid-flight captures the current interpolated value as
/// the new starting point, so the animation bends toward the new target
/// instead of jumping.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    from: Domains,
    target: Domains,
    started: Instant,
}

impl Transition {
    pub fn idle(domains: Domains, now: Instant) -> Self {
        Self {
            from: domains,
            target: domains,
            started: now,
        }
    }

    pub fn retarget(&mut self, target: Domains, now: Instant) {
        self.from = self.at(now);
        self.target = target;
        self.started = now;
    }

    pub fn target(&self) -> Domains {
        self.target
    }

    /// Interpolated domains at `now`; pure in `now`, clamped past the end.
    pub fn at(&self, now: Instant) -> Domains {
        let elapsed = now.saturating_duration_since(self.started);
        let t = (elapsed.as_secs_f64() / DURATION.as_secs_f64()).min(1.0);
        if t >= 1.0 {
            return self.target;
        }

        let k = ease_in_out_cubic(t);
        Domains {
            x: (
                lerp(self.from.x.0, self.target.x.0, k),
                lerp(self.from.x.1, self.target.x.1, k),
            ),
            y_max: lerp(self.from.y_max, self.target.y_max, k),
        }
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.from != self.target && now.saturating_duration_since(self.started) < DURATION
    }
}

fn lerp(a: f64, b: f64, k: f64) -> f64 {
    a + (b - a) * k
}

fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domains(x0: f64, x1: f64, y: f64) -> Domains {
        Domains {
            x: (x0, x1),
            y_max: y,
        }
    }

    #[test]
    fn idle_transition_is_settled() {
        let now = Instant::now();
        let tr = Transition::idle(domains(0.0, 10.0, 5.0), now);
        assert!(!tr.is_animating(now));
        assert_eq!(tr.at(now + DURATION), domains(0.0, 10.0, 5.0));
    }

    #[test]
    fn interpolates_between_endpoints() {
        let now = Instant::now();
        let mut tr = Transition::idle(domains(0.0, 100.0, 10.0), now);
        tr.retarget(domains(100.0, 300.0, 50.0), now);

        assert_eq!(tr.at(now), domains(0.0, 100.0, 10.0));
        assert!(tr.is_animating(now + DURATION / 2));

        let mid = tr.at(now + DURATION / 2);
        assert!(mid.x.0 > 0.0 && mid.x.0 < 100.0);
        assert!(mid.y_max > 10.0 && mid.y_max < 50.0);

        assert_eq!(tr.at(now + DURATION), domains(100.0, 300.0, 50.0));
        assert!(!tr.is_animating(now + DURATION));
    }

    #[test]
    fn retarget_is_continuous() {
        let now = Instant::now();
        let mut tr = Transition::idle(domains(0.0, 100.0, 10.0), now);
        tr.retarget(domains(100.0, 300.0, 50.0), now);

        let midpoint = now + DURATION / 2;
        let in_flight = tr.at(midpoint);

        tr.retarget(domains(0.0, 50.0, 5.0), midpoint);
        assert_eq!(tr.at(midpoint), in_flight);
        assert_eq!(tr.at(midpoint + DURATION), domains(0.0, 50.0, 5.0));
    }

    #[test]
    fn easing_covers_the_unit_interval() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!(ease_in_out_cubic(0.25) < 0.25);
        assert!(ease_in_out_cubic(0.75) > 0.75);
        let half = ease_in_out_cubic(0.5);
        assert!((half - 0.5).abs() < 1e-9);
    }
}
