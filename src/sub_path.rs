use crate::curve::CurveSegment;
use crate::error::PathError;
use crate::path::Path;

impl Path {
    /// Curve index and curve parameter at the fraction `t` of the path.
    fn curve_param_at(&self, t: f64) -> Option<(usize, f64)> {
        let location = self.locate(self.length_at(t))?;
        let segment = self.segment(location.index);
        Some((location.index, segment.t_at_length(location.offset)))
    }

    /// Extracts the part of the path between the fractions `start_t` and `end_t` as a new path.
    ///
    /// If `start_t > end_t` the result runs backwards along this path. Fractions are clamped
    /// to `[0, 1]`. This path is not modified.
    pub fn sub_path(&self, start_t: f64, end_t: f64) -> Result<Path, PathError> {
        let start_t = start_t.max(0.0).min(1.0);
        let end_t = end_t.max(0.0).min(1.0);
        let (first, first_t) = self.curve_param_at(start_t).ok_or(PathError::NoCurves)?;
        let (last, last_t) = self.curve_param_at(end_t).ok_or(PathError::NoCurves)?;

        let mut curves: Vec<CurveSegment> = vec![];
        if first == last {
            curves.push(self.segment(first).sub_curve(first_t, last_t));
        } else if first > last {
            // Backwards. The tail piece is empty when it would end on the joint itself.
            curves.push(self.segment(first).sub_curve(first_t, 0.0));
            for i in (last + 1..first).rev() {
                curves.push(self.segment(i).reversed());
            }
            if last_t < 1.0 {
                curves.push(self.segment(last).sub_curve(1.0, last_t));
            }
        } else {
            if first_t < 1.0 {
                curves.push(self.segment(first).sub_curve(first_t, 1.0));
            }
            for i in first + 1..last {
                curves.push(self.segment(i));
            }
            curves.push(self.segment(last).sub_curve(0.0, last_t));
        }

        Path::from_curves(curves, false)
    }
}
