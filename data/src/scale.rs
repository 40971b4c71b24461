/// Continuous time scale mapping millisecond timestamps onto plot pixels,
/// invertible for hover hit-testing.
#[derive(Debug, Clone, Copy)]
pub struct TimeScale {
    domain: (f64, f64),
    range: (f32, f32),
}

impl TimeScale {
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        let mut domain = domain;
        if (domain.1 - domain.0).abs() < 1.0 {
            domain.1 = domain.0 + 1.0;
        }
        Self { domain, range }
    }

    pub fn map(&self, ts_ms: f64) -> f32 {
        let t = (ts_ms - self.domain.0) / (self.domain.1 - self.domain.0);
        self.range.0 + t as f32 * (self.range.1 - self.range.0)
    }

    pub fn invert(&self, px: f32) -> f64 {
        let span = self.range.1 - self.range.0;
        let t = if span.abs() < f32::EPSILON {
            0.0
        } else {
            (px - self.range.0) / span
        };
        self.domain.0 + f64::from(t) * (self.domain.1 - self.domain.0)
    }
}

/// Linear value scale over [0, max], mapping onto a top-down pixel range.
#[derive(Debug, Clone, Copy)]
pub struct ValueScale {
    max: f64,
    range: (f32, f32),
}

impl ValueScale {
    pub fn new(max: f64, range: (f32, f32)) -> Self {
        let max = if max > 0.0 { max } else { 1.0 };
        Self { max, range }
    }

    pub fn map(&self, value: f64) -> f32 {
        let t = value / self.max;
        self.range.0 + t as f32 * (self.range.1 - self.range.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_scale_maps_endpoints() {
        let x = TimeScale::new((1_000.0, 2_000.0), (0.0, 500.0));
        assert_eq!(x.map(1_000.0), 0.0);
        assert_eq!(x.map(2_000.0), 500.0);
        assert_eq!(x.map(1_500.0), 250.0);
    }

    #[test]
    fn time_scale_inverts() {
        let x = TimeScale::new((0.0, 86_400_000.0), (0.0, 720.0));
        for px in [0.0, 180.0, 360.0, 720.0] {
            let ts = x.invert(px);
            assert!((x.map(ts) - px).abs() < 1e-3);
        }
    }

    #[test]
    fn degenerate_time_domain_stays_finite() {
        let x = TimeScale::new((5_000.0, 5_000.0), (0.0, 100.0));
        assert!(x.map(5_000.0).is_finite());
        assert!(x.invert(50.0).is_finite());
    }

    #[test]
    fn value_scale_is_top_down() {
        let y = ValueScale::new(200.0, (350.0, 0.0));
        assert_eq!(y.map(0.0), 350.0);
        assert_eq!(y.map(200.0), 0.0);
        assert_eq!(y.map(100.0), 175.0);
    }

    #[test]
    fn empty_domain_falls_back_to_unit() {
        let y = ValueScale::new(0.0, (350.0, 0.0));
        assert_eq!(y.map(0.0), 350.0);
        assert!(y.map(0.5).is_finite());
    }
}
