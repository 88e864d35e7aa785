use crate::curve::CurveSegment;
use crate::geometry_utilities::types::CanvasPoint;
use crate::path::Path;

/// Builds a smooth path passing through every point in `points`.
///
/// Two points give a straight line. Fewer than two points give no path.
pub fn catmull_rom_smooth(points: &[CanvasPoint]) -> Option<Path> {
    let curves = match points.len() {
        0 | 1 => return None,
        2 => vec![CurveSegment::line(points[0], points[1])],
        count => {
            let catmull_rom = |p0: CanvasPoint, p1: CanvasPoint, p2: CanvasPoint, p3: CanvasPoint| {
                let v0 = p0.to_vector();
                let v1 = p1.to_vector();
                let v2 = p2.to_vector();
                let v3 = p3.to_vector();
                let c1 = (-v0 + v1 * 6.0 + v2) * (1.0 / 6.0);
                let c2 = (v1 + v2 * 6.0 - v3) * (1.0 / 6.0);
                CurveSegment::new(p1, c1.to_point(), c2.to_point(), p2)
            };

            let mut curves = Vec::with_capacity(count - 1);
            // The first and last curves repeat their outer point
            curves.push(catmull_rom(points[0], points[0], points[1], points[2]));
            for i in 0..count - 3 {
                curves.push(catmull_rom(points[i], points[i + 1], points[i + 2], points[i + 3]));
            }
            curves.push(catmull_rom(
                points[count - 3],
                points[count - 2],
                points[count - 1],
                points[count - 1],
            ));
            curves
        }
    };

    Path::from_curves(curves, false).ok()
}
