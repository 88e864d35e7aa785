use crate::curve::CurveSegment;
use crate::error::PathError;
use crate::geometry_utilities::types::*;
use crate::path::Path;
use log::debug;
use serde::{Deserialize, Serialize};

/// Fractional digits kept by [`Path::to_reduced_list`] when the caller has no preference.
pub const DEFAULT_REDUCED_DIGITS: u32 = 1;

/// One curve in the structured form.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CurveShape {
    /// `{"start": [x, y], "startControl": [x, y], "endControl": [x, y], "end": [x, y]}`
    Segment(CurveSegment),
    /// `[[x, y], [x, y], [x, y], [x, y]]`, every point must be present.
    Points(Vec<Option<CanvasPoint>>),
}

impl CurveShape {
    fn into_segment(self, curve: usize) -> Result<CurveSegment, PathError> {
        match self {
            CurveShape::Segment(segment) => Ok(segment),
            CurveShape::Points(points) => match points.as_slice() {
                [Some(a), Some(b), Some(c), Some(d)] => Ok(CurveSegment::new(*a, *b, *c, *d)),
                _ => Err(PathError::MissingPoint { curve }),
            },
        }
    }
}

/// Serialized shape of a [`Path`].
///
/// Written as an object; a bare list of curves is also accepted when reading.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathDocument {
    Full {
        curves: Vec<CurveShape>,
        #[serde(default, rename = "adjustCircular")]
        adjust_circular: bool,
    },
    Curves(Vec<CurveShape>),
}

impl From<Path> for PathDocument {
    fn from(path: Path) -> Self {
        PathDocument::Full {
            curves: path.to_segments().into_iter().map(CurveShape::Segment).collect(),
            adjust_circular: path.adjust_circular(),
        }
    }
}

impl TryFrom<PathDocument> for Path {
    type Error = PathError;

    fn try_from(document: PathDocument) -> Result<Self, Self::Error> {
        match document {
            PathDocument::Full { curves, adjust_circular } => Path::from_array(curves, adjust_circular),
            PathDocument::Curves(curves) => Path::from_array(curves, false),
        }
    }
}

fn round_to(v: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (v * factor).round() / factor
}

impl Path {
    /// Builds a path from structured curves.
    ///
    /// The encoded start point of every curve after the first is ignored, the curves are
    /// welded onto each other instead.
    pub fn from_array(curves: Vec<CurveShape>, adjust_circular: bool) -> Result<Path, PathError> {
        let segments = curves
            .into_iter()
            .enumerate()
            .map(|(i, shape)| shape.into_segment(i))
            .collect::<Result<Vec<_>, _>>()?;
        Path::from_curves(segments, adjust_circular)
    }

    pub fn from_json(json: &str) -> Result<Path, PathError> {
        let document: PathDocument = serde_json::from_str(json)?;
        Path::try_from(document)
    }

    pub fn to_json(&self) -> Result<String, PathError> {
        Ok(serde_json::to_string(&PathDocument::from(self.clone()))?)
    }

    /// Builds a path from a flat list of numbers.
    ///
    /// The list is a start point followed by one group of six numbers (start control, end
    /// control, end) per curve. Each curve starts where the previous one ended.
    pub fn from_reduced_list(values: &[f64], adjust_circular: bool) -> Result<Path, PathError> {
        if values.len() < 8 {
            return Err(PathError::ReducedListTooShort(values.len()));
        }
        if (values.len() - 2) % 6 != 0 {
            return Err(PathError::ReducedListMisaligned(values.len()));
        }

        let mut start = point(values[0], values[1]);
        let mut curves = Vec::with_capacity((values.len() - 2) / 6);
        for group in values[2..].chunks_exact(6) {
            let curve = CurveSegment::new(
                start,
                point(group[0], group[1]),
                point(group[2], group[3]),
                point(group[4], group[5]),
            );
            start = curve.end;
            curves.push(curve);
        }
        debug!("Decoded reduced list of {} numbers into {} curves", values.len(), curves.len());
        Path::from_curves(curves, adjust_circular)
    }

    /// Same as [`Path::from_reduced_list`] but reads the list from a JSON array.
    pub fn from_reduced_list_representation(json: &str, adjust_circular: bool) -> Result<Path, PathError> {
        let values: Vec<f64> = serde_json::from_str(json)?;
        Path::from_reduced_list(&values, adjust_circular)
    }

    /// Flattens the path into `[sx, sy, (scx, scy, ecx, ecy, ex, ey)*]`.
    ///
    /// Every coordinate is rounded to `digits` fractional digits, so this is lossy.
    pub fn to_reduced_list(&self, digits: u32) -> Vec<f64> {
        let points = self.to_points();
        let mut result = Vec::with_capacity(points.len() * 2);
        for p in points {
            result.push(round_to(p.x, digits));
            result.push(round_to(p.y, digits));
        }
        result
    }

    pub fn to_reduced_list_representation(&self, digits: u32) -> Result<String, PathError> {
        Ok(serde_json::to_string(&self.to_reduced_list(digits))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::tests::init_logging;
    use approx::assert_relative_eq;

    fn wave() -> Path {
        Path::from_curves(
            vec![
                CurveSegment::new(point(0.0, 0.0), point(5.0, 10.0), point(10.0, 10.0), point(15.0, 0.0)),
                CurveSegment::new(point(15.0, 0.0), point(20.0, -10.0), point(25.0, -10.0), point(30.0, 0.0)),
            ],
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_reduced_list_one_curve() {
        init_logging();
        let path = Path::from_reduced_list_representation("[0,0,10,0,10,10,0,10]", false).unwrap();
        assert_eq!(path.curve_count(), 1);
        let curve = path.curve_at(0).unwrap();
        assert_eq!(curve.start(), point(0.0, 0.0));
        assert_eq!(curve.start_control(), point(10.0, 0.0));
        assert_eq!(curve.end_control(), point(10.0, 10.0));
        assert_eq!(curve.end(), point(0.0, 10.0));
    }

    #[test]
    fn test_reduced_list_too_short() {
        assert!(matches!(
            Path::from_reduced_list_representation("[0,0,10,0]", false),
            Err(PathError::ReducedListTooShort(4))
        ));
        assert!(matches!(
            Path::from_reduced_list(&[0.0; 10], false),
            Err(PathError::ReducedListMisaligned(10))
        ));
        assert!(matches!(
            Path::from_reduced_list_representation("[0,0,", false),
            Err(PathError::Json(_))
        ));
    }

    #[test]
    fn test_reduced_list_welds_curves() {
        let path = Path::from_reduced_list(&[0.0, 0.0, 1.0, 1.0, 2.0, 1.0, 3.0, 0.0, 4.0, -1.0, 5.0, -1.0, 6.0, 0.0], false)
            .unwrap();
        assert_eq!(path.curve_count(), 2);
        assert_eq!(
            path.point_id(0, crate::curve::PointRole::End),
            path.point_id(1, crate::curve::PointRole::Start)
        );
        assert_eq!(path.curve_at(1).unwrap().end(), point(6.0, 0.0));
    }

    #[test]
    fn test_reduced_list_circular() {
        let values = [0.0, 0.0, 5.0, 5.0, 10.0, 5.0, 10.0, 0.0, 10.0, -5.0, 0.0, -5.0, 0.0, 0.0];
        let path = Path::from_reduced_list(&values, true).unwrap();
        assert!(path.adjust_circular());
        assert_eq!(
            path.point_id(1, crate::curve::PointRole::End),
            path.point_id(0, crate::curve::PointRole::Start)
        );
        assert_eq!(path.to_reduced_list(DEFAULT_REDUCED_DIGITS), values.to_vec());
    }

    #[test]
    fn test_reduced_list_rounding() {
        let path = Path::from_reduced_list(&[0.04, 0.0, 1.26, 1.0, 2.0, 1.0, 3.333, 0.0], false).unwrap();
        assert_eq!(path.to_reduced_list(1), vec![0.0, 0.0, 1.3, 1.0, 2.0, 1.0, 3.3, 0.0]);
        assert_eq!(path.to_reduced_list(2), vec![0.04, 0.0, 1.26, 1.0, 2.0, 1.0, 3.33, 0.0]);
    }

    #[test]
    fn test_reduced_representation_roundtrip() {
        let path = Path::from_reduced_list(&[0.123, 4.567, 1.0, 2.0, 3.0, 4.0, 5.5555, 6.0], false).unwrap();
        for digits in 0..4 {
            let text = path.to_reduced_list_representation(digits).unwrap();
            let decoded = Path::from_reduced_list_representation(&text, false).unwrap();
            let tolerance = 10f64.powi(-(digits as i32));
            for (a, b) in decoded.to_points().iter().zip(path.to_points().iter()) {
                assert!((a.x - b.x).abs() <= tolerance);
                assert!((a.y - b.y).abs() <= tolerance);
            }
        }
    }

    #[test]
    fn test_json_roundtrip() {
        let mut path = Path::circle(point(3.0, 4.0), 10.0);
        path.translate(vector(1.0, 0.5));
        let json = path.to_json().unwrap();
        let decoded = Path::from_json(&json).unwrap();
        assert_eq!(decoded, path);
        assert!(decoded.adjust_circular());
        assert_relative_eq!(decoded.length(), path.length(), epsilon = 1e-9);

        let open = wave();
        let decoded: Path = serde_json::from_str(&serde_json::to_string(&open).unwrap()).unwrap();
        assert_eq!(decoded, open);
        assert!(!decoded.adjust_circular());
    }

    #[test]
    fn test_structured_decode_reweld() {
        let json = r#"{"curves": [
            {"start": [0, 0], "startControl": [1, 1], "endControl": [2, 1], "end": [3, 0]},
            {"start": [99, 99], "startControl": [4, -1], "endControl": [5, -1], "end": [6, 0]}
        ]}"#;
        let path = Path::from_json(json).unwrap();
        assert_eq!(path.curve_count(), 2);
        assert_eq!(path.curve_at(1).unwrap().start(), point(3.0, 0.0));
        assert!(!path.adjust_circular());
    }

    #[test]
    fn test_decode_point_tuples() {
        let path = Path::from_json("[[[0, 0], [1, 1], [2, 1], [3, 0]], [[3, 0], [4, -1], [5, -1], [6, 0]]]").unwrap();
        assert_eq!(path.curve_count(), 2);
        assert_eq!(path.curve_at(1).unwrap().end(), point(6.0, 0.0));

        assert!(matches!(
            Path::from_json("[[[0, 0], [1, 1], [2, 1], [3, 0]], [[3, 0], null, [5, -1], [6, 0]]]"),
            Err(PathError::MissingPoint { curve: 1 })
        ));
        assert!(matches!(
            Path::from_json("[[[0, 0], [1, 1], [2, 1]]]"),
            Err(PathError::MissingPoint { curve: 0 })
        ));
        assert!(matches!(Path::from_json("[]"), Err(PathError::NoCurves)));
        assert!(matches!(Path::from_json(r#"{"curves": []}"#), Err(PathError::NoCurves)));
    }

    #[test]
    fn test_from_array_mixed_shapes() {
        let shapes = vec![
            CurveShape::Segment(CurveSegment::line(point(0.0, 0.0), point(3.0, 0.0))),
            CurveShape::Points(vec![
                Some(point(3.0, 0.0)),
                Some(point(3.0, 1.0)),
                Some(point(3.0, 2.0)),
                Some(point(3.0, 3.0)),
            ]),
        ];
        let path = Path::from_array(shapes, true).unwrap();
        assert_eq!(path.curve_count(), 2);
        assert!(path.adjust_circular());
        assert_eq!(path.curve_at(1).unwrap().end(), point(0.0, 0.0));
    }
}
