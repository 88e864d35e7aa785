use kurbo::{CubicBez, ParamCurve};
use types::*;

pub mod types {
    pub struct CanvasSpace;
    pub type CanvasPoint = euclid::Point2D<f64, CanvasSpace>;
    pub type CanvasVector = euclid::Vector2D<f64, CanvasSpace>;
    pub type CanvasLength = euclid::Length<f64, CanvasSpace>;
    pub type CanvasBox = euclid::Box2D<f64, CanvasSpace>;
    pub type CanvasRotation = euclid::Rotation2D<f64, CanvasSpace, CanvasSpace>;

    pub fn point(x: f64, y: f64) -> CanvasPoint {
        CanvasPoint::new(x, y)
    }

    pub fn vector(x: f64, y: f64) -> CanvasVector {
        CanvasVector::new(x, y)
    }
}

/// Number of uniform samples taken before refining a closest-point search.
const CLOSEST_SAMPLES: usize = 100;
/// Refinement stops once the bracketing interval is narrower than this (in parameter space).
const CLOSEST_PARAM_TOLERANCE: f64 = 1e-9;

pub fn to_kurbo(p: CanvasPoint) -> kurbo::Point {
    kurbo::Point::new(p.x, p.y)
}

pub fn from_kurbo(p: kurbo::Point) -> CanvasPoint {
    point(p.x, p.y)
}

pub fn to_lyon(p: CanvasPoint) -> lyon::math::Point {
    lyon::math::point(p.x as f32, p.y as f32)
}

pub fn cubic(points: &[CanvasPoint; 4]) -> CubicBez {
    CubicBez::new(
        to_kurbo(points[0]),
        to_kurbo(points[1]),
        to_kurbo(points[2]),
        to_kurbo(points[3]),
    )
}

pub fn scale_about(p: CanvasPoint, factors: CanvasVector, anchor: CanvasPoint) -> CanvasPoint {
    anchor + (p - anchor).component_mul(factors)
}

pub fn rotate_about(p: CanvasPoint, angle: f64, center: CanvasPoint) -> CanvasPoint {
    let rotation = CanvasRotation::radians(angle);
    center + rotation.transform_vector(p - center)
}

/// Perpendicular of `v`, rotated a quarter turn counter-clockwise. Not normalized.
pub fn perpendicular(v: CanvasVector) -> CanvasVector {
    vector(-v.y, v.x)
}

/// Returns `(squared distance, parameter)` of the point on the curve closest to `p`.
///
/// The curve is sampled uniformly and the best sample is then refined by repeatedly
/// halving the bracket around it. This finds the global minimum as long as the curve
/// does not pass closer than the sample spacing to `p` twice, which is good enough for
/// picking and for projecting points that came from the curve itself.
pub fn sqr_distance_bezier_point(bezier: &CubicBez, p: CanvasPoint) -> (f64, f64) {
    let target = to_kurbo(p);
    let dist_at = |t: f64| (bezier.eval(t) - target).hypot2();

    let mut best_t = 0.0;
    let mut best_dist = std::f64::INFINITY;
    for i in 0..=CLOSEST_SAMPLES {
        let t = i as f64 / CLOSEST_SAMPLES as f64;
        let dist = dist_at(t);
        if dist < best_dist {
            best_dist = dist;
            best_t = t;
        }
    }

    let step = 1.0 / CLOSEST_SAMPLES as f64;
    let mut lo = (best_t - step).max(0.0);
    let mut hi = (best_t + step).min(1.0);
    while hi - lo > CLOSEST_PARAM_TOLERANCE {
        let m1 = lo + (hi - lo) / 3.0;
        let m2 = hi - (hi - lo) / 3.0;
        if dist_at(m1) < dist_at(m2) {
            hi = m2;
        } else {
            lo = m1;
        }
    }

    let refined_t = 0.5 * (lo + hi);
    let refined_dist = dist_at(refined_t);
    if refined_dist < best_dist {
        (refined_dist, refined_t)
    } else {
        (best_dist, best_t)
    }
}
