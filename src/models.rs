use imageproc::point::Point;

/// Closed boundary of a foreground region, as an ordered list of pixel coordinates.
/// The last point connects back to the first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    pub fn from_coords(coords: &[(i32, i32)]) -> Self {
        Self {
            points: coords.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Enclosed area of the polygon (shoelace formula, unsigned)
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }

        let twice_signed: i64 = (0..n)
            .map(|i| {
                let p = self.points[i];
                let q = self.points[(i + 1) % n];
                p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64
            })
            .sum();

        twice_signed.abs() as f64 / 2.0
    }

    /// Length of the closed boundary, including the closing segment
    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }

        (0..n)
            .map(|i| {
                let p = self.points[i];
                let q = self.points[(i + 1) % n];
                let dx = (q.x - p.x) as f64;
                let dy = (q.y - p.y) as f64;
                dx.hypot(dy)
            })
            .sum()
    }

    /// Isoperimetric ratio 4πA/P². 1.0 for a perfect circle; `None` when the perimeter is zero.
    pub fn circularity(&self) -> Option<f64> {
        let perimeter = self.perimeter();
        if perimeter == 0.0 {
            return None;
        }
        Some(4.0 * std::f64::consts::PI * self.area() / (perimeter * perimeter))
    }
}

/// Minimal enclosing circle of a contour, truncated to whole pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateCircle {
    pub center: (i32, i32),
    pub radius: i32,
}

/// A contour accepted as a domino pip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pip {
    pub center: (i32, i32),
    pub radius: i32,
}

impl From<CandidateCircle> for Pip {
    fn from(circle: CandidateCircle) -> Self {
        Self {
            center: circle.center,
            radius: circle.radius,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RejectReason {
    RadiusOutOfRange,
    ZeroPerimeter,
    NotCircular { circularity: f64 },
}

/// Verdict for a single contour
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification {
    Accepted {
        circle: CandidateCircle,
        circularity: f64,
    },
    Rejected {
        circle: CandidateCircle,
        reason: RejectReason,
    },
}

impl Classification {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Classification::Accepted { .. })
    }

    pub fn circle(&self) -> CandidateCircle {
        match self {
            Classification::Accepted { circle, .. } | Classification::Rejected { circle, .. } => {
                *circle
            }
        }
    }

    pub fn pip(&self) -> Option<Pip> {
        match self {
            Classification::Accepted { circle, .. } => Some(Pip::from(*circle)),
            Classification::Rejected { .. } => None,
        }
    }
}

/// Result of one detection pass over an image
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipDetection {
    pub pips: Vec<Pip>,
    pub contours_examined: usize,
}

impl PipDetection {
    pub fn count(&self) -> usize {
        self.pips.len()
    }
}
