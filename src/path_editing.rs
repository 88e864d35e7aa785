use crate::curve::PointRole;
use crate::geometry_utilities::types::*;
use crate::path::{next_index, prev_index, Path, PointId};
use log::{trace, warn};

/// Handles shorter than this have no reliable direction to mirror.
// TODO: Should probably scale with the zoom level of the canvas
pub const MIN_HANDLE_LENGTH: f64 = 0.1;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AdjustOptions {
    /// Keep the length of the adjusted handle and only mirror the direction.
    pub obtain_handle_length: bool,
    pub recompute_arc_lengths: bool,
}

impl Default for AdjustOptions {
    fn default() -> Self {
        AdjustOptions {
            obtain_handle_length: true,
            recompute_arc_lengths: true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DragOptions {
    /// Dragging a joint point also moves the control point of the same curve attached to it.
    pub move_paired_control: bool,
    /// Passed on to the neighbour adjustment when a control point next to an auto adjusted joint is dragged.
    pub obtain_handle_length: bool,
}

impl Default for DragOptions {
    fn default() -> Self {
        DragOptions {
            move_paired_control: true,
            obtain_handle_length: true,
        }
    }
}

impl Path {
    /// Curve and control role on the other side of the joint that `control` of curve `index` hangs off.
    fn neighbour_control(&self, index: usize, control: PointRole) -> Option<(usize, PointRole)> {
        match control {
            PointRole::EndControl => next_index(self, index).map(|next| (next, PointRole::StartControl)),
            PointRole::StartControl => prev_index(self, index).map(|prev| (prev, PointRole::EndControl)),
            _ => None,
        }
    }

    /// Turns the control point across the joint from `control` of curve `index` so that the
    /// two handles are collinear.
    ///
    /// The neighbour handle is set to the mirrored direction of the handle of `control`. With
    /// `obtain_handle_length` it keeps its own length, otherwise it becomes an exact mirror.
    /// Nothing happens if the handle of `control` is at most [`MIN_HANDLE_LENGTH`] long.
    /// Returns true if the neighbour was changed.
    pub fn adjust_neighbour_control(&mut self, index: usize, control: PointRole, options: AdjustOptions) -> bool {
        if !self.check_curve_index(index) {
            return false;
        }
        let joint_role = match control.joint() {
            Some(joint) => joint,
            None => return false,
        };
        let (neighbour, neighbour_control) = match self.neighbour_control(index, control) {
            Some(n) => n,
            None => return false,
        };
        let neighbour_joint = match neighbour_control.joint() {
            Some(joint) => joint,
            None => return false,
        };

        let joint = self.points[self.point_id(index, joint_role)];
        let handle = self.points[self.point_id(index, control)] - joint;
        let neighbour_joint = self.points[self.point_id(neighbour, neighbour_joint)];
        let neighbour_id = self.point_id(neighbour, neighbour_control);
        let neighbour_handle = self.points[neighbour_id] - neighbour_joint;

        let handle_length = handle.length();
        if handle_length <= MIN_HANDLE_LENGTH {
            trace!("Handle of curve {} too short to mirror ({})", index, handle_length);
            return false;
        }

        self.points[neighbour_id] = if options.obtain_handle_length {
            neighbour_joint - handle * (neighbour_handle.length() / handle_length)
        } else {
            neighbour_joint - handle
        };

        if options.recompute_arc_lengths {
            self.update_curve_length(neighbour);
            self.update_total_length();
        }
        true
    }

    fn check_curve_index(&self, index: usize) -> bool {
        if index < self.curves.len() {
            true
        } else {
            warn!("Curve index {} is out of range, the path has {} curves", index, self.curves.len());
            false
        }
    }

    fn joint_id(&self, index: usize, role: PointRole) -> Option<PointId> {
        if index >= self.curves.len() {
            return None;
        }
        match role {
            PointRole::Start | PointRole::End => Some(self.point_id(index, role)),
            _ => None,
        }
    }

    /// Flags the joint that `role` of curve `index` sits on for automatic handle adjustment.
    /// `role` must be the start or end point, control points are ignored.
    pub fn set_auto_adjust(&mut self, index: usize, role: PointRole, auto_adjust: bool) {
        if !self.check_curve_index(index) {
            return;
        }
        if let Some(id) = self.joint_id(index, role) {
            self.auto_adjust[id] = auto_adjust;
        }
    }

    pub fn is_auto_adjust(&self, index: usize, role: PointRole) -> bool {
        self.joint_id(index, role).map_or(false, |id| self.auto_adjust[id])
    }

    /// Moves one point of curve `index` by `delta` and keeps the neighbouring curves in shape.
    ///
    /// * Dragging a start point moves the end control of the previous curve along with it.
    /// * Dragging an end point moves the start control of the next curve along with it.
    /// * Dragging a control point next to an auto adjusted joint re-aims the control point on
    ///   the other side of the joint.
    ///
    /// The previous and next curves wrap around when the path is circular. An out of range
    /// `index` is logged and ignored.
    pub fn move_curve_point(&mut self, index: usize, role: PointRole, delta: CanvasVector, options: DragOptions) {
        if !self.check_curve_index(index) {
            return;
        }
        let ids = self.curves[index].ids;
        self.points[ids[role.index()]] += delta;
        if options.move_paired_control {
            if let Some(control) = role.paired_control() {
                self.points[ids[control.index()]] += delta;
            }
        }

        let mut touched = vec![index];
        match role {
            PointRole::Start => {
                if let Some(prev) = prev_index(self, index) {
                    let id = self.point_id(prev, PointRole::EndControl);
                    self.points[id] += delta;
                    touched.push(prev);
                }
            }
            PointRole::End => {
                if let Some(next) = next_index(self, index) {
                    let id = self.point_id(next, PointRole::StartControl);
                    self.points[id] += delta;
                    touched.push(next);
                }
            }
            PointRole::StartControl | PointRole::EndControl => {
                let flagged = role.joint().map_or(false, |joint| self.is_auto_adjust(index, joint));
                if flagged {
                    let adjust = AdjustOptions {
                        obtain_handle_length: options.obtain_handle_length,
                        recompute_arc_lengths: false,
                    };
                    if self.adjust_neighbour_control(index, role, adjust) {
                        if let Some((neighbour, _)) = self.neighbour_control(index, role) {
                            touched.push(neighbour);
                        }
                    }
                }
            }
        }

        // Only the dragged curve and at most one neighbour changed shape
        for i in touched {
            self.update_curve_length(i);
        }
        self.update_total_length();
    }

    /// Places both handles of a vertex along the line from the previous to the next vertex,
    /// each a quarter of that distance long.
    ///
    /// Vertex `i` is the start of curve `i`; vertex `curve_count()` is the end of the last
    /// curve of an open path.
    pub fn smooth_vertex(&mut self, vertex: usize) {
        let count = self.curves.len();
        if count == 0 || vertex > count || (vertex == count && self.adjust_circular) {
            return;
        }

        // Curve the vertex starts (after) and the curve it ends (before)
        let after = if vertex < count { Some(vertex) } else { None };
        let before = if vertex > 0 {
            Some(vertex - 1)
        } else if self.adjust_circular {
            Some(count - 1)
        } else {
            None
        };

        let pos = match after {
            Some(i) => self.points[self.point_id(i, PointRole::Start)],
            None => self.points[self.point_id(count - 1, PointRole::End)],
        };
        let prev = before.map(|i| self.points[self.point_id(i, PointRole::Start)]);
        let next = after.map(|i| self.points[self.point_id(i, PointRole::End)]);
        let dir = match (prev, next) {
            (Some(prev), Some(next)) => next - prev,
            (Some(prev), None) => pos - prev,
            (None, Some(next)) => next - pos,
            (None, None) => return,
        };

        if let Some(i) = before {
            let id = self.point_id(i, PointRole::EndControl);
            self.points[id] = pos - dir * 0.25;
            self.update_curve_length(i);
        }
        if let Some(i) = after {
            let id = self.point_id(i, PointRole::StartControl);
            self.points[id] = pos + dir * 0.25;
            self.update_curve_length(i);
        }
        self.update_total_length();
    }
}
