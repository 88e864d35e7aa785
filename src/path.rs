use crate::curve::{CurveSegment, PointRole, ARC_LENGTH_ACCURACY};
use crate::error::PathError;
use crate::geometry_utilities::types::*;
use crate::geometry_utilities::{cubic, rotate_about, scale_about, to_lyon};
use crate::path_editing::AdjustOptions;
use kurbo::ParamCurveArclen;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Index into the point storage of a [`Path`].
///
/// Two curves that share a joint store the same id for it.
pub type PointId = usize;

#[derive(Clone, Debug)]
pub(crate) struct CurveData {
    /// [start, start control, end control, end]
    pub(crate) ids: [PointId; 4],
    pub(crate) length: f64,
}

/// A sequence of connected cubic bezier curves.
///
/// Points live in a single storage vector and curves refer to them by index, so the end of
/// curve `i` and the start of curve `i + 1` are literally the same point. When the path is
/// circular the end of the last curve is also the start of the first one.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(into = "crate::serialization::PathDocument", try_from = "crate::serialization::PathDocument")]
pub struct Path {
    pub(crate) points: Vec<CanvasPoint>,
    /// Joints flagged for automatic handle adjustment. Parallel to `points`.
    pub(crate) auto_adjust: Vec<bool>,
    pub(crate) curves: Vec<CurveData>,
    pub(crate) total_length: f64,
    pub(crate) adjust_circular: bool,
}

/// Result of mapping an arc length onto the curves of a path.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CurveLocation {
    pub index: usize,
    /// Arc length offset inside the curve.
    pub offset: f64,
    /// Arc length of all curves before this one.
    pub accumulated: f64,
}

#[derive(Clone)]
pub struct ImmutableCurve<'a> {
    pub(crate) index: usize,
    pub(crate) data: &'a Path,
}

impl<'a> ImmutableCurve<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn point_id(&self, role: PointRole) -> PointId {
        self.data.curves[self.index].ids[role.index()]
    }

    pub fn point(&self, role: PointRole) -> CanvasPoint {
        self.data.points[self.point_id(role)]
    }

    pub fn start(&self) -> CanvasPoint {
        self.point(PointRole::Start)
    }

    pub fn start_control(&self) -> CanvasPoint {
        self.point(PointRole::StartControl)
    }

    pub fn end_control(&self) -> CanvasPoint {
        self.point(PointRole::EndControl)
    }

    pub fn end(&self) -> CanvasPoint {
        self.point(PointRole::End)
    }

    /// Cached arc length of this curve.
    pub fn length(&self) -> f64 {
        self.data.curves[self.index].length
    }

    /// Copies the curve out of the path.
    pub fn segment(&self) -> CurveSegment {
        self.data.segment(self.index)
    }

    pub fn prev(&self) -> Option<ImmutableCurve<'a>> {
        prev_index(self.data, self.index).map(|index| ImmutableCurve { index, data: self.data })
    }

    pub fn next(&self) -> Option<ImmutableCurve<'a>> {
        next_index(self.data, self.index).map(|index| ImmutableCurve { index, data: self.data })
    }
}

pub(crate) fn prev_index(data: &Path, index: usize) -> Option<usize> {
    if index > 0 {
        Some(index - 1)
    } else if data.adjust_circular && !data.curves.is_empty() {
        Some(data.curves.len() - 1)
    } else {
        None
    }
}

pub(crate) fn next_index(data: &Path, index: usize) -> Option<usize> {
    if index + 1 < data.curves.len() {
        Some(index + 1)
    } else if data.adjust_circular && !data.curves.is_empty() {
        Some(0)
    } else {
        None
    }
}

impl Path {
    pub fn new() -> Path {
        Path::default()
    }

    /// Builds a path from a list of curves in one go.
    ///
    /// The start of every curve after the first is replaced by the end of the curve before
    /// it. No handle smoothing is done. If `adjust_circular` is set the end of the last
    /// curve is replaced by the start of the first.
    pub fn from_curves(curves: Vec<CurveSegment>, adjust_circular: bool) -> Result<Path, PathError> {
        if curves.is_empty() {
            return Err(PathError::NoCurves);
        }

        let path = Path::welded(&curves, adjust_circular);
        debug!(
            "Built path with {} curves, length {}, circular {}",
            path.curve_count(),
            path.total_length,
            path.adjust_circular
        );
        Ok(path)
    }

    fn welded(curves: &[CurveSegment], adjust_circular: bool) -> Path {
        let mut path = Path::new();
        for curve in curves {
            path.push_welded(curve);
        }
        if adjust_circular && !path.curves.is_empty() {
            path.close_loop();
            path.update_curve_length(path.curves.len() - 1);
        }
        path.update_total_length();
        path
    }

    /// A closed path approximating a circle.
    pub fn circle(center: CanvasPoint, radius: f64) -> Path {
        let mut curves = vec![];
        lyon::geom::Arc::circle(lyon::geom::point(center.x, center.y), radius).for_each_cubic_bezier(
            &mut |bezier: &lyon::geom::CubicBezierSegment<f64>| {
                curves.push(CurveSegment::new(
                    point(bezier.from.x, bezier.from.y),
                    point(bezier.ctrl1.x, bezier.ctrl1.y),
                    point(bezier.ctrl2.x, bezier.ctrl2.y),
                    point(bezier.to.x, bezier.to.y),
                ));
            },
        );
        Path::welded(&curves, true)
    }

    fn push_point(&mut self, p: CanvasPoint) -> PointId {
        self.points.push(p);
        self.auto_adjust.push(false);
        self.points.len() - 1
    }

    /// Adds the curve to the end of the path, reusing the current end point as its start.
    /// Returns the index of the new curve. Does not touch the total length.
    pub(crate) fn push_welded(&mut self, curve: &CurveSegment) -> usize {
        let start = match self.curves.last() {
            Some(last) => last.ids[3],
            None => self.push_point(curve.start),
        };
        let start_control = self.push_point(curve.start_control);
        let end_control = self.push_point(curve.end_control);
        let end = self.push_point(curve.end);
        self.curves.push(CurveData {
            ids: [start, start_control, end_control, end],
            length: 0.0,
        });
        let index = self.curves.len() - 1;
        self.update_curve_length(index);
        index
    }

    /// Appends a curve and smooths the new joint.
    ///
    /// The start point of `curve` is discarded in favour of the current end point of the
    /// path. The start handle of the new curve is then turned to mirror the end handle of
    /// the previous curve while keeping its own length.
    pub fn append(&mut self, curve: CurveSegment) {
        if self.adjust_circular {
            warn!("Appending to a circular path, the loop is opened first");
            self.set_adjust_circular(false);
        }

        let index = self.push_welded(&curve);
        if index == 0 {
            self.total_length += self.curves[index].length;
        } else {
            self.adjust_neighbour_control(
                index - 1,
                PointRole::EndControl,
                AdjustOptions {
                    obtain_handle_length: true,
                    recompute_arc_lengths: true,
                },
            );
            self.update_total_length();
        }
    }

    /// Welds the end of the last curve onto the start of the first one.
    fn close_loop(&mut self) {
        let first_start = match self.curves.first() {
            Some(first) => first.ids[0],
            None => return,
        };
        let last = self.curves.len() - 1;
        let old_end = self.curves[last].ids[3];
        if old_end != first_start {
            self.curves[last].ids[3] = first_start;
            // The old end point is only referenced by the last curve, drop it if it is at the back
            if old_end == self.points.len() - 1 {
                self.points.pop();
                self.auto_adjust.pop();
            }
        }
        self.adjust_circular = true;
    }

    pub fn adjust_circular(&self) -> bool {
        self.adjust_circular
    }

    /// Opens or closes the path.
    ///
    /// Closing moves the end of the last curve onto the start of the first curve. Opening
    /// gives the last curve its own end point at the same position.
    pub fn set_adjust_circular(&mut self, circular: bool) {
        if circular == self.adjust_circular || self.curves.is_empty() {
            self.adjust_circular = circular;
            return;
        }

        let last = self.curves.len() - 1;
        if circular {
            self.close_loop();
            self.update_curve_length(last);
        } else {
            let shared = self.curves[last].ids[3];
            let end = self.push_point(self.points[shared]);
            self.auto_adjust[end] = self.auto_adjust[shared];
            self.curves[last].ids[3] = end;
            self.adjust_circular = false;
        }
        self.update_total_length();
    }

    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn curve_at(&self, index: usize) -> Option<ImmutableCurve> {
        if index < self.curves.len() {
            Some(ImmutableCurve { index, data: self })
        } else {
            None
        }
    }

    pub fn iter_curves(&self) -> impl Iterator<Item = ImmutableCurve<'_>> {
        (0..self.curves.len()).map(move |index| ImmutableCurve { index, data: self })
    }

    pub(crate) fn resolve(&self, ids: &[PointId; 4]) -> [CanvasPoint; 4] {
        [
            self.points[ids[0]],
            self.points[ids[1]],
            self.points[ids[2]],
            self.points[ids[3]],
        ]
    }

    pub(crate) fn point_id(&self, index: usize, role: PointRole) -> PointId {
        self.curves[index].ids[role.index()]
    }

    /// Copy of curve `index` including its cached length.
    pub(crate) fn segment(&self, index: usize) -> CurveSegment {
        let data = &self.curves[index];
        CurveSegment::with_cached_length(self.resolve(&data.ids), data.length)
    }

    /// Total arc length. Cached.
    pub fn length(&self) -> f64 {
        self.total_length
    }

    pub(crate) fn update_curve_length(&mut self, index: usize) {
        let ids = self.curves[index].ids;
        self.curves[index].length = cubic(&self.resolve(&ids)).arclen(ARC_LENGTH_ACCURACY);
    }

    pub(crate) fn update_total_length(&mut self) {
        self.total_length = self.curves.iter().map(|c| c.length).sum();
    }

    /// Recomputes the length of every curve and the total length.
    pub fn update_arc_lengths(&mut self) {
        for i in 0..self.curves.len() {
            self.update_curve_length(i);
        }
        self.update_total_length();
    }

    fn clamp_length(&self, u: f64) -> f64 {
        if u.is_nan() {
            warn!("Arc length query with NaN, using 0");
            0.0
        } else if u < 0.0 {
            warn!("Arc length {} is before the start of the path, clamping to 0", u);
            0.0
        } else if u > self.total_length {
            warn!(
                "Arc length {} is past the end of the path, clamping to {}",
                u, self.total_length
            );
            self.total_length
        } else {
            u
        }
    }

    /// Finds the curve containing arc length `u` and the offset into it.
    ///
    /// `u` outside of `[0, length]` is clamped. Returns `None` for an empty path.
    pub fn locate(&self, u: f64) -> Option<CurveLocation> {
        let last = self.curves.len().checked_sub(1)?;
        let u = self.clamp_length(u);

        let mut accumulated = 0.0;
        for (index, curve) in self.curves.iter().enumerate() {
            if index == last && u >= self.total_length {
                break;
            }
            if accumulated + curve.length >= u {
                return Some(CurveLocation {
                    index,
                    offset: u - accumulated,
                    accumulated,
                });
            }
            accumulated += curve.length;
        }

        // The very end of the path, or u just past the sum because of rounding
        let length = self.curves[last].length;
        Some(CurveLocation {
            index: last,
            offset: length,
            accumulated: self.total_length - length,
        })
    }

    /// Arc length corresponding to the fraction `t`.
    pub fn length_at(&self, t: f64) -> f64 {
        t * self.total_length
    }

    pub fn point_at_length(&self, u: f64) -> Option<CanvasPoint> {
        let location = self.locate(u)?;
        Some(self.segment(location.index).point_at(location.offset))
    }

    pub fn tangent_at_length(&self, u: f64) -> Option<CanvasVector> {
        let location = self.locate(u)?;
        Some(self.segment(location.index).tangent_at(location.offset))
    }

    pub fn perpendicular_at_length(&self, u: f64) -> Option<CanvasVector> {
        let location = self.locate(u)?;
        Some(self.segment(location.index).perpendicular_at(location.offset))
    }

    pub fn point_at(&self, t: f64) -> Option<CanvasPoint> {
        self.point_at_length(self.length_at(t))
    }

    pub fn tangent_at(&self, t: f64) -> Option<CanvasVector> {
        self.tangent_at_length(self.length_at(t))
    }

    pub fn perpendicular_at(&self, t: f64) -> Option<CanvasVector> {
        self.perpendicular_at_length(self.length_at(t))
    }

    /// Fraction along the path of the point closest to `p`.
    ///
    /// If several curves are equally close the first one wins.
    pub fn closest_t(&self, p: CanvasPoint) -> Option<f64> {
        let mut best: Option<(usize, f64)> = None;
        let mut min_dist = std::f64::INFINITY;
        for index in 0..self.curves.len() {
            let segment = self.segment(index);
            let t = segment.closest_t(p);
            let dist = (segment.eval(t) - p).square_length();
            if dist < min_dist {
                min_dist = dist;
                best = Some((index, t));
            }
        }

        let (index, t) = best?;
        if self.total_length <= 0.0 {
            return Some(0.0);
        }
        let accumulated: f64 = self.curves[..index].iter().map(|c| c.length).sum();
        let u = accumulated + self.segment(index).length_at_t(t);
        Some((u / self.total_length).max(0.0).min(1.0))
    }

    /// `count` points spread evenly by arc length, starting at the start of the path and
    /// ending at its end.
    pub fn even_distribution_vertices(&self, count: usize) -> Result<Vec<CanvasPoint>, PathError> {
        if count < 2 {
            return Err(PathError::TooFewPoints(count));
        }
        if self.is_empty() {
            return Err(PathError::NoCurves);
        }

        let step = self.total_length / (count - 1) as f64;
        let mut result = Vec::with_capacity(count);
        for i in 0..count {
            let u = if i == count - 1 { self.total_length } else { step * i as f64 };
            if let Some(p) = self.point_at_length(u) {
                result.push(p);
            }
        }
        Ok(result)
    }

    /// Applies `f` to every point of the path exactly once.
    ///
    /// Each curve contributes its start and both controls, the end of the last curve is
    /// visited separately unless it is the start of the first curve.
    fn for_each_point_once(&mut self, mut f: impl FnMut(&mut CanvasPoint)) {
        for curve in &self.curves {
            for &id in &curve.ids[..3] {
                f(&mut self.points[id]);
            }
        }
        if let Some(last) = self.curves.last() {
            if !self.adjust_circular {
                f(&mut self.points[last.ids[3]]);
            }
        }
    }

    pub fn translate(&mut self, delta: CanvasVector) {
        self.for_each_point_once(|p| *p += delta);
        self.update_arc_lengths();
    }

    pub fn scale_xy(&mut self, factors: CanvasVector, anchor: CanvasPoint) {
        self.for_each_point_once(|p| *p = scale_about(*p, factors, anchor));
        self.update_arc_lengths();
    }

    pub fn scale(&mut self, factor: f64, anchor: CanvasPoint) {
        self.scale_xy(vector(factor, factor), anchor);
    }

    /// Rotates the path `angle` radians around `center`. Lengths are unchanged so the
    /// cached lengths are kept.
    pub fn rotate(&mut self, angle: f64, center: CanvasPoint) {
        self.for_each_point_once(|p| *p = rotate_about(*p, angle, center));
    }

    /// Union of the bounds of every curve.
    pub fn bounds(&self) -> Option<CanvasBox> {
        // Box2D::union skips boxes with zero width or height, which straight lines have
        (0..self.curves.len()).map(|i| self.segment(i).bounds()).fold(None, |acc, b| {
            Some(match acc {
                Some(a) => CanvasBox::new(a.min.min(b.min), a.max.max(b.max)),
                None => b,
            })
        })
    }

    /// All points in drawing order: `[start, control, control, end, control, control, end, ...]`.
    pub fn to_points(&self) -> Vec<CanvasPoint> {
        let mut result = Vec::with_capacity(self.curves.len() * 3 + 1);
        if let Some(first) = self.curves.first() {
            result.push(self.points[first.ids[0]]);
        }
        for curve in &self.curves {
            for &id in &curve.ids[1..] {
                result.push(self.points[id]);
            }
        }
        result
    }

    /// Copies every curve out of the path.
    pub fn to_segments(&self) -> Vec<CurveSegment> {
        (0..self.curves.len()).map(|i| self.segment(i)).collect()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.auto_adjust.clear();
        self.curves.clear();
        self.total_length = 0.0;
        self.adjust_circular = false;
    }

    pub fn build(&self, builder: &mut lyon::path::path::Builder) {
        let first = match self.curves.first() {
            Some(first) => first,
            None => return,
        };

        builder.begin(to_lyon(self.points[first.ids[0]]));
        for curve in &self.curves {
            builder.cubic_bezier_to(
                to_lyon(self.points[curve.ids[1]]),
                to_lyon(self.points[curve.ids[2]]),
                to_lyon(self.points[curve.ids[3]]),
            );
        }
        builder.end(self.adjust_circular);
    }

    pub fn to_lyon_path(&self) -> lyon::path::Path {
        let mut builder = lyon::path::Path::builder();
        self.build(&mut builder);
        builder.build()
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.adjust_circular == other.adjust_circular
            && self.curves.len() == other.curves.len()
            && self
                .curves
                .iter()
                .zip(other.curves.iter())
                .all(|(a, b)| self.resolve(&a.ids) == other.resolve(&b.ids))
    }
}
