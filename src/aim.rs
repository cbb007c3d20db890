use crate::geometry::{DartBoard, Point, Segment};
use tracing::warn;

/// What a simulated throw is aimed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AimTarget {
    Point(Point),
    Segment(Segment),
    /// Any segment worth this many points; the easiest one is picked.
    Score(u32),
}

impl From<Point> for AimTarget {
    fn from(p: Point) -> Self {
        AimTarget::Point(p)
    }
}

impl From<Segment> for AimTarget {
    fn from(s: Segment) -> Self {
        AimTarget::Segment(s)
    }
}

impl From<u32> for AimTarget {
    fn from(score: u32) -> Self {
        AimTarget::Score(score)
    }
}

/// Gaussian throwing-error model.
pub struct Aimer {
    pub rng: fastrand::Rng,
    board: &'static DartBoard,
}

impl Aimer {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = if let Some(s) = seed {
            fastrand::Rng::with_seed(s)
        } else {
            fastrand::Rng::new()
        };
        Self {
            rng,
            board: DartBoard::shared(),
        }
    }

    pub fn target_point(&self, target: AimTarget) -> Point {
        let segment = match target {
            AimTarget::Point(p) => return p,
            AimTarget::Segment(s) => s,
            AimTarget::Score(score) => self.board.easiest_segment_for(score),
        };
        self.board.center_of(segment).unwrap_or_else(|| {
            warn!("No aim point for {}, aiming at the center", segment);
            Point::ORIGIN
        })
    }

    /// Simulated impact for a throw at `target`. Never retried: the result
    /// may land in a neighbouring bed or off the board.
    pub fn aim_at<T: Into<AimTarget>>(&mut self, target: T, h_dev_mm: f64, v_dev_mm: f64) -> Point {
        let intended = self.target_point(target.into());
        let (nx, ny) = self.standard_normal_pair();
        intended + Point::new(nx * h_dev_mm, ny * v_dev_mm)
    }

    // Box-Muller: two independent N(0, 1) samples.
    fn standard_normal_pair(&mut self) -> (f64, f64) {
        // f64() is in [0, 1); shift to (0, 1] so ln() stays finite.
        let u1 = 1.0 - self.rng.f64();
        let u2 = self.rng.f64();
        let radius = (-2.0 * u1.ln()).sqrt();
        let theta = 2.0 * std::f64::consts::PI * u2;
        (radius * theta.cos(), radius * theta.sin())
    }
}

impl Default for Aimer {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bed;

    #[test]
    fn zero_deviation_hits_the_target_point() {
        let mut aimer = Aimer::new(Some(7));
        let hit = aimer.aim_at(Segment::new(20, Bed::Triple), 0.0, 0.0);
        assert_eq!(DartBoard::shared().resolve(hit), Segment::new(20, Bed::Triple));
    }

    #[test]
    fn seeded_aimers_agree() {
        let mut a = Aimer::new(Some(42));
        let mut b = Aimer::new(Some(42));
        for _ in 0..10 {
            assert_eq!(a.aim_at(60u32, 20.0, 20.0), b.aim_at(60u32, 20.0, 20.0));
        }
    }

    #[test]
    fn noise_has_roughly_the_requested_spread() {
        let mut aimer = Aimer::new(Some(1));
        let n = 20_000;
        let (mut sx, mut sy) = (0.0, 0.0);
        for _ in 0..n {
            let p = aimer.aim_at(Point::ORIGIN, 10.0, 30.0);
            sx += p.x * p.x;
            sy += p.y * p.y;
        }
        let sd_x = (sx / n as f64).sqrt();
        let sd_y = (sy / n as f64).sqrt();
        assert!((sd_x - 10.0).abs() < 1.0, "sd_x = {}", sd_x);
        assert!((sd_y - 30.0).abs() < 2.0, "sd_y = {}", sd_y);
    }
}
