use crate::geometry_utilities::types::*;
use crate::geometry_utilities::{cubic, from_kurbo, perpendicular, sqr_distance_bezier_point};
use kurbo::{CubicBez, ParamCurve, ParamCurveArclen, ParamCurveDeriv, ParamCurveExtrema};
use serde::{Deserialize, Serialize};

/// Accuracy passed to kurbo's arc length routines.
pub const ARC_LENGTH_ACCURACY: f64 = 1e-6;

/// One of the four points of a cubic segment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointRole {
    Start,
    StartControl,
    EndControl,
    End,
}

impl PointRole {
    pub const ALL: [PointRole; 4] = [
        PointRole::Start,
        PointRole::StartControl,
        PointRole::EndControl,
        PointRole::End,
    ];

    pub fn index(self) -> usize {
        match self {
            PointRole::Start => 0,
            PointRole::StartControl => 1,
            PointRole::EndControl => 2,
            PointRole::End => 3,
        }
    }

    pub fn is_control(self) -> bool {
        matches!(self, PointRole::StartControl | PointRole::EndControl)
    }

    /// The control point that belongs to a joint point, if this is a joint point.
    pub fn paired_control(self) -> Option<PointRole> {
        match self {
            PointRole::Start => Some(PointRole::StartControl),
            PointRole::End => Some(PointRole::EndControl),
            _ => None,
        }
    }

    /// The joint point a control point hangs off, if this is a control point.
    pub fn joint(self) -> Option<PointRole> {
        match self {
            PointRole::StartControl => Some(PointRole::Start),
            PointRole::EndControl => Some(PointRole::End),
            _ => None,
        }
    }
}

/// A single cubic bezier segment with a cached arc length.
///
/// The cached length is only refreshed by [`CurveSegment::update_length`] (or by
/// [`CurveSegment::move_point`] when asked to), so callers that mutate points must
/// recompute it themselves. Deserializing computes it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CurvePoints")]
pub struct CurveSegment {
    pub start: CanvasPoint,
    pub start_control: CanvasPoint,
    pub end_control: CanvasPoint,
    pub end: CanvasPoint,
    #[serde(skip)]
    length: f64,
}

/// Serialized form of a [`CurveSegment`], without the cached length.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurvePoints {
    start: CanvasPoint,
    start_control: CanvasPoint,
    end_control: CanvasPoint,
    end: CanvasPoint,
}

impl From<CurvePoints> for CurveSegment {
    fn from(p: CurvePoints) -> Self {
        CurveSegment::new(p.start, p.start_control, p.end_control, p.end)
    }
}

impl CurveSegment {
    pub fn new(start: CanvasPoint, start_control: CanvasPoint, end_control: CanvasPoint, end: CanvasPoint) -> Self {
        Self::from_points([start, start_control, end_control, end])
    }

    pub fn from_points(points: [CanvasPoint; 4]) -> Self {
        let mut curve = CurveSegment {
            start: points[0],
            start_control: points[1],
            end_control: points[2],
            end: points[3],
            length: 0.0,
        };
        curve.update_length();
        curve
    }

    /// A straight segment with the controls placed at the thirds.
    pub fn line(start: CanvasPoint, end: CanvasPoint) -> Self {
        Self::new(start, start.lerp(end, 1.0 / 3.0), start.lerp(end, 2.0 / 3.0), end)
    }

    /// Decodes a single segment from its JSON object form.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn points(&self) -> [CanvasPoint; 4] {
        [self.start, self.start_control, self.end_control, self.end]
    }

    pub fn point(&self, role: PointRole) -> CanvasPoint {
        self.points()[role.index()]
    }

    pub fn point_mut(&mut self, role: PointRole) -> &mut CanvasPoint {
        match role {
            PointRole::Start => &mut self.start,
            PointRole::StartControl => &mut self.start_control,
            PointRole::EndControl => &mut self.end_control,
            PointRole::End => &mut self.end,
        }
    }

    pub fn bezier(&self) -> CubicBez {
        cubic(&self.points())
    }

    /// Cached arc length.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn update_length(&mut self) {
        self.length = self.bezier().arclen(ARC_LENGTH_ACCURACY);
    }

    /// Curve parameter at an arc length offset measured from the start of the segment.
    pub fn t_at_length(&self, offset: f64) -> f64 {
        if offset <= 0.0 {
            0.0
        } else if offset >= self.length {
            1.0
        } else {
            self.bezier().inv_arclen(offset, ARC_LENGTH_ACCURACY).max(0.0).min(1.0)
        }
    }

    /// Arc length from the start of the segment to parameter `t`.
    pub fn length_at_t(&self, t: f64) -> f64 {
        if t <= 0.0 {
            0.0
        } else if t >= 1.0 {
            self.length
        } else {
            self.bezier().subsegment(0.0..t).arclen(ARC_LENGTH_ACCURACY)
        }
    }

    pub fn eval(&self, t: f64) -> CanvasPoint {
        from_kurbo(self.bezier().eval(t))
    }

    pub fn derivative(&self, t: f64) -> CanvasVector {
        from_kurbo(self.bezier().deriv().eval(t)).to_vector()
    }

    pub fn point_at(&self, offset: f64) -> CanvasPoint {
        self.eval(self.t_at_length(offset))
    }

    /// Unnormalized tangent at an arc length offset.
    pub fn tangent_at(&self, offset: f64) -> CanvasVector {
        self.derivative(self.t_at_length(offset))
    }

    /// Unnormalized perpendicular at an arc length offset.
    pub fn perpendicular_at(&self, offset: f64) -> CanvasVector {
        perpendicular(self.tangent_at(offset))
    }

    pub fn closest_t(&self, p: CanvasPoint) -> f64 {
        sqr_distance_bezier_point(&self.bezier(), p).1
    }

    /// Extracts the part of the segment between two parameters.
    ///
    /// `t0 > t1` yields the reversed piece; `sub_curve(b, a)` is exactly the reverse of `sub_curve(a, b)`.
    pub fn sub_curve(&self, t0: f64, t1: f64) -> CurveSegment {
        let p0 = self.eval(t0);
        let p3 = self.eval(t1);
        let scale = (t1 - t0) * (1.0 / 3.0);
        let p1 = p0 + self.derivative(t0) * scale;
        let p2 = p3 - self.derivative(t1) * scale;
        CurveSegment::new(p0, p1, p2, p3)
    }

    pub fn reversed(&self) -> CurveSegment {
        CurveSegment {
            start: self.end,
            start_control: self.end_control,
            end_control: self.start_control,
            end: self.start,
            length: self.length,
        }
    }

    pub fn bounds(&self) -> CanvasBox {
        let rect = self.bezier().bounding_box();
        CanvasBox::new(point(rect.x0, rect.y0), point(rect.x1, rect.y1))
    }

    /// Moves the point with the given role by `delta`.
    ///
    /// Moving a joint point can drag its own control point along with it. Moving a
    /// control point never moves anything else.
    pub fn move_point(&mut self, role: PointRole, delta: CanvasVector, move_paired_control: bool, recompute: bool) {
        *self.point_mut(role) += delta;
        if move_paired_control {
            if let Some(control) = role.paired_control() {
                *self.point_mut(control) += delta;
            }
        }
        if recompute {
            self.update_length();
        }
    }

    /// Builds a segment whose length is already known, skipping the arc length computation.
    pub(crate) fn with_cached_length(points: [CanvasPoint; 4], length: f64) -> Self {
        CurveSegment {
            start: points[0],
            start_control: points[1],
            end_control: points[2],
            end: points[3],
            length,
        }
    }
}

impl PartialEq for CurveSegment {
    fn eq(&self, other: &Self) -> bool {
        self.points() == other.points()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn hook() -> CurveSegment {
        CurveSegment::new(point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0), point(0.0, 10.0))
    }

    #[test]
    fn test_line_length() {
        let line = CurveSegment::line(point(0.0, 0.0), point(3.0, 4.0));
        assert_relative_eq!(line.length(), 5.0, epsilon = 1e-6);
        let mid = line.point_at(2.5);
        assert_relative_eq!(mid.x, 1.5, epsilon = 1e-5);
        assert_relative_eq!(mid.y, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_offsets_at_ends_are_exact() {
        let curve = hook();
        assert_eq!(curve.point_at(0.0), point(0.0, 0.0));
        assert_eq!(curve.point_at(curve.length()), point(0.0, 10.0));
        assert_eq!(curve.point_at(curve.length() + 1.0), point(0.0, 10.0));
    }

    #[test]
    fn test_tangent_and_perpendicular() {
        let curve = hook();
        let tangent = curve.tangent_at(0.0);
        assert_relative_eq!(tangent.x, 30.0);
        assert_relative_eq!(tangent.y, 0.0);
        let normal = curve.perpendicular_at(0.0);
        assert_relative_eq!(normal.x, 0.0);
        assert_relative_eq!(normal.y, 30.0);
    }

    #[test]
    fn test_sub_curve_reverse_is_exact() {
        let curve = hook();
        let forward = curve.sub_curve(0.2, 0.7);
        let backward = curve.sub_curve(0.7, 0.2);
        assert_eq!(forward.reversed(), backward);
        assert_relative_eq!(forward.length(), backward.length(), epsilon = 1e-9);
    }

    #[test]
    fn test_sub_curve_full_range() {
        let curve = hook();
        let full = curve.sub_curve(0.0, 1.0);
        for (a, b) in full.points().iter().zip(curve.points().iter()) {
            assert_relative_eq!(a.x, b.x, epsilon = 1e-12);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_length_at_t_matches_t_at_length() {
        let curve = hook();
        let offset = curve.length() * 0.3;
        let t = curve.t_at_length(offset);
        assert_relative_eq!(curve.length_at_t(t), offset, epsilon = 1e-4);
    }

    #[test]
    fn test_move_point_with_paired_control() {
        let mut curve = hook();
        curve.move_point(PointRole::Start, vector(1.0, 1.0), true, true);
        assert_eq!(curve.start, point(1.0, 1.0));
        assert_eq!(curve.start_control, point(11.0, 1.0));
        assert_eq!(curve.end_control, point(10.0, 10.0));

        curve.move_point(PointRole::EndControl, vector(0.0, 5.0), true, false);
        assert_eq!(curve.end_control, point(10.0, 15.0));
        assert_eq!(curve.end, point(0.0, 10.0));
    }

    #[test]
    fn test_json_roundtrip_recomputes_length() {
        let curve = hook();
        let json = curve.to_json().unwrap();
        let decoded = CurveSegment::from_json(&json).unwrap();
        assert_eq!(decoded, curve);
        assert_relative_eq!(decoded.length(), curve.length());
    }

    #[test]
    fn test_deserialize_computes_length() {
        let line = CurveSegment::line(point(0.0, 0.0), point(10.0, 0.0));
        let json = serde_json::to_string(&line).unwrap();
        let decoded: CurveSegment = serde_json::from_str(&json).unwrap();
        assert_relative_eq!(decoded.length(), 10.0, epsilon = 1e-6);
        let mid = decoded.point_at(5.0);
        assert_relative_eq!(mid.x, 5.0, epsilon = 1e-5);
        assert_relative_eq!(mid.y, 0.0);

        let from_value: CurveSegment = serde_json::from_value(serde_json::json!({
            "start": [0.0, 0.0],
            "startControl": [0.0, 1.0],
            "endControl": [0.0, 2.0],
            "end": [0.0, 3.0]
        }))
        .unwrap();
        assert_relative_eq!(from_value.length(), 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_bounds_cover_extrema() {
        let bounds = hook().bounds();
        assert_relative_eq!(bounds.min.x, 0.0);
        assert_relative_eq!(bounds.min.y, 0.0);
        assert_relative_eq!(bounds.max.x, 7.5, epsilon = 1e-9);
        assert_relative_eq!(bounds.max.y, 10.0);
    }
}
