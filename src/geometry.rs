use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Add;
use std::sync::OnceLock;
use strum_macros::{Display, EnumIter, EnumString};

// Regulation board, all radii in mm from the center.
pub const RADIUS_INNER_BULL_MM: f64 = 6.35;
pub const RADIUS_OUTER_BULL_MM: f64 = 15.9;
pub const RADIUS_INNER_TRIPLE_MM: f64 = 99.0;
pub const RADIUS_OUTER_TRIPLE_MM: f64 = 107.0;
pub const RADIUS_INNER_DOUBLE_MM: f64 = 162.0;
pub const RADIUS_OUTER_DOUBLE_MM: f64 = 170.0;

pub const BULL: u32 = 25;
pub const SECTOR_ANGLE_DEG: f64 = 360.0 / 20.0;

/// Sector numbers clockwise, starting with 20 at the top.
pub const SECTOR_ORDER: [u32; 20] = [
    20, 1, 18, 4, 13, 6, 10, 15, 2, 17, 3, 19, 7, 16, 8, 11, 14, 9, 12, 5,
];

/// Board-local coordinate in mm. Origin at the center, y pointing up.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn radius(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Clockwise angle from the positive y axis, in [0, 360).
    pub fn bearing_deg(&self) -> f64 {
        self.x.atan2(self.y).to_degrees().rem_euclid(360.0)
    }

    pub fn from_polar(radius: f64, bearing_deg: f64) -> Self {
        let rad = bearing_deg.to_radians();
        Self {
            x: radius * rad.sin(),
            y: radius * rad.cos(),
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Bed {
    None,
    Single,
    InnerSingle,
    OuterSingle,
    Double,
    Triple,
}

impl Bed {
    pub fn multiplier(&self) -> u32 {
        match self {
            Bed::None => 0,
            Bed::Single | Bed::InnerSingle | Bed::OuterSingle => 1,
            Bed::Double => 2,
            Bed::Triple => 3,
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, Bed::Single | Bed::InnerSingle | Bed::OuterSingle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Segment {
    #[serde(rename = "number")]
    pub sector: u32,
    pub bed: Bed,
}

impl Segment {
    pub const MISS: Segment = Segment {
        sector: 0,
        bed: Bed::None,
    };

    pub fn new(sector: u32, bed: Bed) -> Self {
        Self { sector, bed }
    }

    pub fn score(&self) -> u32 {
        self.sector * self.bed.multiplier()
    }

    pub fn is_miss(&self) -> bool {
        self.bed == Bed::None
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bed {
            Bed::None => write!(f, "MISS"),
            Bed::Triple => write!(f, "T{}", self.sector),
            Bed::Double => write!(f, "D{}", self.sector),
            _ => write!(f, "{}", self.sector),
        }
    }
}

/// A ring slice of the board. Half-open in radius and bearing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub segment: Segment,
    pub inner_mm: f64,
    pub outer_mm: f64,
    pub start_deg: f64,
    pub span_deg: f64,
}

impl Region {
    pub fn contains(&self, p: Point) -> bool {
        let r = p.radius();
        // NaN fails both bounds.
        if !(r >= self.inner_mm && r < self.outer_mm) {
            return false;
        }
        if self.span_deg >= 360.0 {
            return true;
        }
        (p.bearing_deg() - self.start_deg).rem_euclid(360.0) < self.span_deg
    }

    fn midpoint(&self) -> Point {
        let radius = (self.inner_mm + self.outer_mm) / 2.0;
        Point::from_polar(radius, self.start_deg + self.span_deg / 2.0)
    }
}

#[derive(Debug, Clone)]
pub struct DartBoard {
    regions: Vec<Region>,
    available_segments_for_score: BTreeMap<u32, Vec<Segment>>,
}

static STANDARD_BOARD: OnceLock<DartBoard> = OnceLock::new();

impl DartBoard {
    /// Process-wide standard board; the geometry never changes.
    pub fn shared() -> &'static DartBoard {
        STANDARD_BOARD.get_or_init(DartBoard::standard)
    }

    pub fn standard() -> Self {
        let mut regions = Vec::with_capacity(82);
        let mut available: BTreeMap<u32, Vec<Segment>> = BTreeMap::new();

        regions.push(Region {
            segment: Segment::new(BULL, Bed::Double),
            inner_mm: 0.0,
            outer_mm: RADIUS_INNER_BULL_MM,
            start_deg: 0.0,
            span_deg: 360.0,
        });
        regions.push(Region {
            segment: Segment::new(BULL, Bed::Single),
            inner_mm: RADIUS_INNER_BULL_MM,
            outer_mm: RADIUS_OUTER_BULL_MM,
            start_deg: 0.0,
            span_deg: 360.0,
        });
        available
            .entry(BULL)
            .or_default()
            .push(Segment::new(BULL, Bed::Single));
        available
            .entry(BULL * 2)
            .or_default()
            .push(Segment::new(BULL, Bed::Double));

        let rings = [
            (Bed::InnerSingle, RADIUS_OUTER_BULL_MM, RADIUS_INNER_TRIPLE_MM),
            (Bed::Triple, RADIUS_INNER_TRIPLE_MM, RADIUS_OUTER_TRIPLE_MM),
            (Bed::OuterSingle, RADIUS_OUTER_TRIPLE_MM, RADIUS_INNER_DOUBLE_MM),
            (Bed::Double, RADIUS_INNER_DOUBLE_MM, RADIUS_OUTER_DOUBLE_MM),
        ];

        for (i, &sector) in SECTOR_ORDER.iter().enumerate() {
            let start_deg = (i as f64 * SECTOR_ANGLE_DEG - SECTOR_ANGLE_DEG / 2.0).rem_euclid(360.0);
            for &(bed, inner_mm, outer_mm) in &rings {
                regions.push(Region {
                    segment: Segment::new(sector, bed),
                    inner_mm,
                    outer_mm,
                    start_deg,
                    span_deg: SECTOR_ANGLE_DEG,
                });
            }
            for bed in [Bed::OuterSingle, Bed::Double, Bed::Triple] {
                available
                    .entry(sector * bed.multiplier())
                    .or_default()
                    .push(Segment::new(sector, bed));
            }
        }

        DartBoard {
            regions,
            available_segments_for_score: available,
        }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Exact region lookup. Anything outside every region is a miss.
    pub fn resolve(&self, p: Point) -> Segment {
        self.regions
            .iter()
            .find(|region| region.contains(p))
            .map(|region| region.segment)
            .unwrap_or(Segment::MISS)
    }

    /// Representative aim point. The single bull aims above the center so
    /// that simulated throws do not drift into the double bull too often.
    pub fn center_of(&self, segment: Segment) -> Option<Point> {
        if segment.sector == BULL && segment.bed.is_single() {
            let half_ring =
                (RADIUS_OUTER_BULL_MM - RADIUS_INNER_BULL_MM) / 2.0 + RADIUS_INNER_BULL_MM;
            return Some(Point::new(0.0, half_ring));
        }
        if segment.sector == BULL && segment.bed == Bed::Double {
            return Some(Point::ORIGIN);
        }

        let bed = if segment.bed == Bed::Single {
            Bed::OuterSingle
        } else {
            segment.bed
        };
        let lookup = Segment::new(segment.sector, bed);
        self.regions
            .iter()
            .find(|region| region.segment == lookup)
            .map(Region::midpoint)
    }

    pub fn segments_scoring(&self, score: u32) -> &[Segment] {
        self.available_segments_for_score
            .get(&score)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_reachable(&self, score: u32) -> bool {
        !self.segments_scoring(score).is_empty()
    }

    pub fn available_scores(&self) -> impl Iterator<Item = u32> + '_ {
        self.available_segments_for_score.keys().copied()
    }

    pub fn easiest_segment_for(&self, score: u32) -> Segment {
        let candidates = self.segments_scoring(score);
        for bed in [
            Bed::OuterSingle,
            Bed::Single,
            Bed::InnerSingle,
            Bed::Double,
            Bed::Triple,
        ] {
            if let Some(segment) = candidates.iter().find(|s| s.bed == bed) {
                return *segment;
            }
        }
        candidates.first().copied().unwrap_or(Segment::MISS)
    }

    /// The two sectors left and right of `sector`. The bull has none.
    pub fn neighbors(&self, sector: u32) -> Option<(u32, u32)> {
        let idx = SECTOR_ORDER.iter().position(|&s| s == sector)?;
        let left = SECTOR_ORDER[(idx + SECTOR_ORDER.len() - 1) % SECTOR_ORDER.len()];
        let right = SECTOR_ORDER[(idx + 1) % SECTOR_ORDER.len()];
        Some((left, right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_count() {
        assert_eq!(DartBoard::standard().regions().len(), 82);
    }

    #[test]
    fn bearing_is_clockwise_from_top() {
        assert!((Point::new(0.0, 1.0).bearing_deg() - 0.0).abs() < 1e-9);
        assert!((Point::new(1.0, 0.0).bearing_deg() - 90.0).abs() < 1e-9);
        assert!((Point::new(-1.0, 0.0).bearing_deg() - 270.0).abs() < 1e-9);
    }

    #[test]
    fn neighbors_wrap_around() {
        let board = DartBoard::standard();
        assert_eq!(board.neighbors(20), Some((5, 1)));
        assert_eq!(board.neighbors(5), Some((12, 20)));
        assert_eq!(board.neighbors(BULL), None);
    }
}
