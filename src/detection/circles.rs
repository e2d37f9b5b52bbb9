use imageproc::geometry::convex_hull;
use imageproc::point::Point;
use tracing::debug;
use crate::detection::PipThresholds;
use crate::models::{CandidateCircle, Classification, Contour, Pip, RejectReason};

const CONTAINS_EPS: f64 = 1e-7;
const SNAP_EPS: f64 = 1e-9;

/// Integer cast that first snaps values within rounding noise of a whole number
fn truncate_px(v: f64) -> i32 {
    let nearest = v.round();
    if (v - nearest).abs() < SNAP_EPS {
        nearest as i32
    } else {
        v as i32
    }
}

/// Exact circle in floating point, before truncation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl Circle {
    fn point(p: (f64, f64)) -> Self {
        Self { cx: p.0, cy: p.1, r: 0.0 }
    }

    fn diameter(a: (f64, f64), b: (f64, f64)) -> Self {
        let cx = (a.0 + b.0) / 2.0;
        let cy = (a.1 + b.1) / 2.0;
        Self {
            cx,
            cy,
            r: (a.0 - cx).hypot(a.1 - cy),
        }
    }

    /// Circle through three points; for collinear points, the widest pair's diameter circle
    fn through(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Self {
        let bx = b.0 - a.0;
        let by = b.1 - a.1;
        let cx = c.0 - a.0;
        let cy = c.1 - a.1;
        let d = 2.0 * (bx * cy - by * cx);

        if d.abs() < f64::EPSILON {
            return [Self::diameter(a, b), Self::diameter(a, c), Self::diameter(b, c)]
                .into_iter()
                .fold(Self::point(a), |best, circle| if circle.r > best.r { circle } else { best });
        }

        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (cy * b2 - by * c2) / d;
        let uy = (bx * c2 - cx * b2) / d;

        Self {
            cx: a.0 + ux,
            cy: a.1 + uy,
            r: ux.hypot(uy),
        }
    }

    fn contains(&self, p: (f64, f64)) -> bool {
        (p.0 - self.cx).hypot(p.1 - self.cy) <= self.r + CONTAINS_EPS * self.r.max(1.0)
    }

    /// Truncate toward zero, as an integer cast does
    pub fn truncate(&self) -> CandidateCircle {
        CandidateCircle {
            center: (truncate_px(self.cx), truncate_px(self.cy)),
            radius: truncate_px(self.r),
        }
    }
}

/// Smallest circle containing every point. Zero radius at the origin for an empty set.
pub fn min_enclosing_circle_exact(points: &[Point<i32>]) -> Circle {
    if points.is_empty() {
        return Circle { cx: 0.0, cy: 0.0, r: 0.0 };
    }

    // The enclosing circle is determined by hull vertices alone
    let hull = convex_hull(points);
    let source = if hull.is_empty() { points } else { &hull[..] };
    let pts: Vec<(f64, f64)> = source
        .iter()
        .map(|p| (p.x as f64, p.y as f64))
        .collect();

    let mut circle = Circle::point(pts[0]);
    for i in 1..pts.len() {
        if circle.contains(pts[i]) {
            continue;
        }
        circle = Circle::point(pts[i]);
        for j in 0..i {
            if circle.contains(pts[j]) {
                continue;
            }
            circle = Circle::diameter(pts[i], pts[j]);
            for k in 0..j {
                if !circle.contains(pts[k]) {
                    circle = Circle::through(pts[i], pts[j], pts[k]);
                }
            }
        }
    }

    circle
}

/// Minimal enclosing circle of a contour with center and radius truncated to whole pixels
pub fn min_enclosing_circle(contour: &Contour) -> CandidateCircle {
    min_enclosing_circle_exact(&contour.points).truncate()
}

/// Decide whether a single contour is a pip
pub fn classify(contour: &Contour, thresholds: &PipThresholds) -> Classification {
    let circle = min_enclosing_circle(contour);

    let radius = i64::from(circle.radius);
    if radius < i64::from(thresholds.min_radius) || radius > i64::from(thresholds.max_radius) {
        return Classification::Rejected {
            circle,
            reason: RejectReason::RadiusOutOfRange,
        };
    }

    let Some(circularity) = contour.circularity() else {
        return Classification::Rejected {
            circle,
            reason: RejectReason::ZeroPerimeter,
        };
    };

    if circularity > thresholds.circularity_threshold {
        Classification::Accepted { circle, circularity }
    } else {
        Classification::Rejected {
            circle,
            reason: RejectReason::NotCircular { circularity },
        }
    }
}

/// Filter contours down to the ones accepted as pips, preserving order
pub fn filter_pips(contours: &[Contour], thresholds: &PipThresholds) -> Vec<Pip> {
    contours
        .iter()
        .enumerate()
        .filter_map(|(i, contour)| {
            let verdict = classify(contour, thresholds);
            debug!(
                contour = i,
                points = contour.len(),
                center = ?verdict.circle().center,
                radius = verdict.circle().radius,
                ?verdict,
                "classified contour"
            );
            verdict.pip()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    /// Polygon of `n` vertices on a circle, rounded to the pixel grid
    fn circle_contour(cx: f64, cy: f64, r: f64, n: usize) -> Contour {
        let mut coords: Vec<(i32, i32)> = Vec::with_capacity(n);
        for i in 0..n {
            let t = 2.0 * PI * i as f64 / n as f64;
            let p = ((cx + r * t.cos()).round() as i32, (cy + r * t.sin()).round() as i32);
            if coords.last() != Some(&p) {
                coords.push(p);
            }
        }
        Contour::from_coords(&coords)
    }

    fn square(side: i32) -> Contour {
        Contour::from_coords(&[(0, 0), (side, 0), (side, side), (0, side)])
    }

    #[test]
    fn enclosing_circle_of_two_points() {
        let c = min_enclosing_circle_exact(&[Point::new(0, 0), Point::new(10, 0)]);
        assert_relative_eq!(c.cx, 5.0);
        assert_relative_eq!(c.cy, 0.0);
        assert_relative_eq!(c.r, 5.0);
    }

    #[test]
    fn enclosing_circle_of_right_triangle_uses_hypotenuse() {
        let c = min_enclosing_circle_exact(&[Point::new(0, 0), Point::new(6, 0), Point::new(0, 8)]);
        assert_relative_eq!(c.cx, 3.0, epsilon = 1e-9);
        assert_relative_eq!(c.cy, 4.0, epsilon = 1e-9);
        assert_relative_eq!(c.r, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn enclosing_circle_of_acute_triangle_is_circumcircle() {
        let c = min_enclosing_circle_exact(&[Point::new(0, 0), Point::new(10, 0), Point::new(5, 8)]);
        // Circumradius = abc / 4K
        let side = (25.0f64 + 64.0).sqrt();
        let expected = 10.0 * side * side / (4.0 * 40.0);
        assert_relative_eq!(c.r, expected, epsilon = 1e-9);
        assert_relative_eq!(c.cx, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn enclosing_circle_of_collinear_points() {
        let pts: Vec<Point<i32>> = (0..=8).map(|i| Point::new(i, 2 * i)).collect();
        let c = min_enclosing_circle_exact(&pts);
        assert_relative_eq!(c.cx, 4.0, epsilon = 1e-9);
        assert_relative_eq!(c.cy, 8.0, epsilon = 1e-9);
        assert_relative_eq!(c.r, (16.0f64 + 64.0).sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn enclosing_circle_contains_every_point() {
        let pts: Vec<Point<i32>> = (0..200)
            .map(|i| Point::new((i * 37) % 53 - 20, (i * 91) % 47 - 10))
            .collect();
        let c = min_enclosing_circle_exact(&pts);
        for p in &pts {
            let d = (p.x as f64 - c.cx).hypot(p.y as f64 - c.cy);
            assert!(d <= c.r + 1e-6, "{p:?} lies outside {c:?}");
        }
    }

    #[test]
    fn enclosing_circle_truncates_toward_zero() {
        let circle = Circle { cx: 12.9, cy: 7.2, r: 19.99 }.truncate();
        assert_eq!(circle, CandidateCircle { center: (12, 7), radius: 19 });

        let noisy = Circle { cx: 29.999_999_999_999_996, cy: 8.0, r: 13.999_999_999_999_998 }.truncate();
        assert_eq!(noisy, CandidateCircle { center: (30, 8), radius: 14 });
    }

    #[test]
    fn accepts_circle_of_radius_20() {
        let contour = circle_contour(50.0, 50.0, 20.0, 64);
        let verdict = classify(&contour, &PipThresholds::default());

        match verdict {
            Classification::Accepted { circle, circularity } => {
                assert_eq!(circle.radius, 20);
                assert!((49..=50).contains(&circle.center.0));
                assert!(circularity > 0.95, "circularity {circularity}");
            }
            other => panic!("expected acceptance, got {other:?}"),
        }
    }

    #[test]
    fn rejects_square_of_side_30() {
        let verdict = classify(&square(30), &PipThresholds::default());
        assert_eq!(verdict.circle().radius, 21);
        match verdict {
            Classification::Rejected { reason: RejectReason::NotCircular { circularity }, .. } => {
                assert_relative_eq!(circularity, PI / 4.0, epsilon = 1e-12);
            }
            other => panic!("expected circularity rejection, got {other:?}"),
        }
    }

    #[test]
    fn circularity_threshold_is_strict() {
        let c = square(30).circularity().unwrap();

        let at = PipThresholds::default().with_circularity_threshold(c);
        assert!(!classify(&square(30), &at).is_accepted());

        let just_below = PipThresholds::default().with_circularity_threshold(c - 1e-9);
        assert!(classify(&square(30), &just_below).is_accepted());

        let just_above = PipThresholds::default().with_circularity_threshold(c + 1e-9);
        assert!(!classify(&square(30), &just_above).is_accepted());
    }

    #[test]
    fn rejects_small_circle_regardless_of_shape() {
        let verdict = classify(&circle_contour(50.0, 50.0, 3.0, 16), &PipThresholds::default());
        assert_eq!(verdict.circle().radius, 3);
        assert!(matches!(
            verdict,
            Classification::Rejected { reason: RejectReason::RadiusOutOfRange, .. }
        ));
    }

    #[test]
    fn rejects_large_circle_regardless_of_shape() {
        let verdict = classify(&circle_contour(100.0, 100.0, 60.0, 64), &PipThresholds::default());
        assert_eq!(verdict.circle().radius, 60);
        assert!(matches!(
            verdict,
            Classification::Rejected { reason: RejectReason::RadiusOutOfRange, .. }
        ));
    }

    #[test]
    fn radius_bounds_are_inclusive() {
        // Radius exactly 5 and exactly 50 pass the size filter
        let small = Contour::from_coords(&[(0, 0), (10, 0)]);
        let large = Contour::from_coords(&[(0, 0), (100, 0)]);
        let loose = PipThresholds::default().with_circularity_threshold(-1.0);

        assert_eq!(classify(&small, &loose).circle().radius, 5);
        assert!(matches!(
            classify(&small, &loose),
            Classification::Accepted { .. }
        ));
        assert!(classify(&large, &loose).is_accepted());
    }

    #[test]
    fn huge_max_radius_does_not_wrap() {
        let contour = circle_contour(50.0, 50.0, 14.0, 8);
        let wide = PipThresholds::default().with_max_radius(3_000_000_000);
        assert!(wide.validate().is_ok());
        assert!(classify(&contour, &wide).is_accepted());

        let huge_min = PipThresholds::default()
            .with_min_radius(u32::MAX)
            .with_max_radius(u32::MAX);
        assert!(matches!(
            classify(&contour, &huge_min),
            Classification::Rejected { reason: RejectReason::RadiusOutOfRange, .. }
        ));
    }

    #[test]
    fn rejects_zero_perimeter_without_dividing() {
        let dot = Contour::from_coords(&[(7, 7), (7, 7), (7, 7)]);

        let verdict = classify(&dot, &PipThresholds::default());
        assert!(matches!(
            verdict,
            Classification::Rejected { reason: RejectReason::RadiusOutOfRange, .. }
        ));

        let no_min = PipThresholds::default().with_min_radius(0);
        assert_eq!(
            classify(&dot, &no_min),
            Classification::Rejected {
                circle: CandidateCircle { center: (7, 7), radius: 0 },
                reason: RejectReason::ZeroPerimeter,
            }
        );
    }

    #[test]
    fn empty_contour_is_rejected() {
        assert!(!classify(&Contour::default(), &PipThresholds::default()).is_accepted());
    }

    #[test]
    fn filter_keeps_only_pips_in_order() {
        let contours = vec![
            circle_contour(30.0, 30.0, 12.0, 48),
            square(30),
            circle_contour(100.0, 40.0, 3.0, 16),
            circle_contour(80.0, 80.0, 20.0, 64),
        ];

        let pips = filter_pips(&contours, &PipThresholds::default());
        let radii: Vec<i32> = pips.iter().map(|p| p.radius).collect();
        assert_eq!(radii, vec![12, 20]);
        assert!(pips[0].center.0 < pips[1].center.0);
    }
}
