//! Pointer picking and drag tracking.
//!
//! Pointer coordinates arrive as NDC. A perspective [`Camera`] turns them
//! into world rays; the [`DragController`] tests the ray against the mascot's
//! box proxy on pointer-down and, while held, projects each move onto a
//! fixed-depth plane.

use tracing::debug;

use crate::config::CameraConfig;
use crate::math::{Aabb, Ray, Vector2, Vector3};
use crate::physics::PhysicsBody;
use crate::throw::ThrowResolver;

// ---------------------------------------------------------------------------
// Camera
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    position: Vector3,
    forward: Vector3,
    right: Vector3,
    up: Vector3,
    /// `tan(fov / 2)`.
    tan_half_fov: f64,
    aspect: f64,
}

impl Camera {
    /// Build a camera looking at `cfg.target` with world +y as up.
    pub fn new(cfg: &CameraConfig) -> Self {
        let forward = (cfg.target - cfg.position).normalize();
        let mut right = forward.cross(Vector3::new(0.0, 1.0, 0.0)).normalize();
        if right == Vector3::ZERO {
            // Looking straight up or down.
            right = Vector3::new(1.0, 0.0, 0.0);
        }
        let up = right.cross(forward);
        Self {
            position: cfg.position,
            forward,
            right,
            up,
            tan_half_fov: (cfg.fov_deg.to_radians() / 2.0).tan(),
            aspect: cfg.aspect,
        }
    }

    /// World ray from the eye through the pointer.
    pub fn ray_from_ndc(&self, ndc: Vector2) -> Ray {
        let dir = self
            .forward
            .add_scaled(self.right, ndc.x * self.tan_half_fov * self.aspect)
            .add_scaled(self.up, ndc.y * self.tan_half_fov);
        Ray::new(self.position, dir)
    }
}

// ---------------------------------------------------------------------------
// Drag controller
// ---------------------------------------------------------------------------

/// Data kept for one grab gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Body position minus ray hit point at grab time.
    pub grab_offset: Vector3,
    /// Most recent pointer sample, used for the throw.
    pub last_pointer_ndc: Vector2,
    /// Depth of the drag plane (`z`): the grabbed surface point, fixed at
    /// grab time so the body keeps its depth while held.
    pub plane_z: f64,
}

/// Observable drag phases. The armed step between pointer-down and the pick
/// result runs inside [`DragController::pointer_down`] and never outlives it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragPhase {
    Idle,
    Dragging(DragSession),
}

pub struct DragController {
    phase: DragPhase,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

impl DragController {
    pub fn new() -> Self {
        Self {
            phase: DragPhase::Idle,
        }
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.phase {
            DragPhase::Dragging(session) => Some(session),
            _ => None,
        }
    }

    /// Try to grab the body. A missing proxy counts as a miss.
    ///
    /// Returns `true` when a drag session started.
    pub fn pointer_down(
        &mut self,
        ray: &Ray,
        ndc: Vector2,
        proxy: Option<&Aabb>,
        body: &mut PhysicsBody,
    ) -> bool {
        let hit = proxy.and_then(|p| p.intersect_ray(ray));
        let Some(hit) = hit else {
            self.phase = DragPhase::Idle;
            return false;
        };

        body.stop();
        let position = body.position();
        let session = DragSession {
            grab_offset: position - hit,
            last_pointer_ndc: ndc,
            plane_z: hit.z,
        };
        debug!(x = hit.x, y = hit.y, z = hit.z, "picked mascot");
        self.phase = DragPhase::Dragging(session);
        true
    }

    /// Track the pointer while held. Returns the new body position, or
    /// `None` if not dragging or the ray cannot reach the drag plane.
    pub fn pointer_move(
        &mut self,
        ray: &Ray,
        ndc: Vector2,
        body: &mut PhysicsBody,
    ) -> Option<Vector3> {
        let DragPhase::Dragging(session) = &mut self.phase else {
            return None;
        };

        session.last_pointer_ndc = ndc;

        let Some(on_plane) = ray.intersect_z_plane(session.plane_z) else {
            debug!("drag ray does not reach the drag plane, skipping update");
            return None;
        };

        let mut target = on_plane + session.grab_offset;
        if target.y < 0.0 {
            target.y = 0.0;
        }
        body.set_position(target);
        Some(target)
    }

    /// Release the body. When a drag was active, hands a throw velocity
    /// back to physics and returns it.
    pub fn pointer_up(
        &mut self,
        ndc: Vector2,
        throw: &ThrowResolver,
        body: &mut PhysicsBody,
    ) -> Option<Vector3> {
        let phase = std::mem::replace(&mut self.phase, DragPhase::Idle);
        let DragPhase::Dragging(session) = phase else {
            return None;
        };

        let velocity = throw.apply(body.velocity(), session.last_pointer_ndc, ndc);
        body.set_velocity(velocity);
        Some(velocity)
    }

    /// Drop any gesture without throwing (model reload).
    pub fn cancel(&mut self) {
        self.phase = DragPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;

    fn camera() -> Camera {
        Camera::new(&CameraConfig {
            position: Vector3::new(0.0, 0.0, 5.0),
            target: Vector3::ZERO,
            fov_deg: 90.0,
            aspect: 1.0,
        })
    }

    fn body_at(position: Vector3) -> PhysicsBody {
        let mut body = PhysicsBody::new(&PhysicsConfig::default());
        body.set_position(position);
        body
    }

    fn proxy_for(body: &PhysicsBody) -> Aabb {
        Aabb::from_center_extents(body.position(), Vector3::splat(0.5))
    }

    #[test]
    fn test_center_ray_points_forward() {
        let ray = camera().ray_from_ndc(Vector2::ZERO);
        assert_eq!(ray.origin, Vector3::new(0.0, 0.0, 5.0));
        assert!((ray.direction.z + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_corner_ray_spans_fov() {
        // 90 degree fov: NDC (1, 1) leaves at 45 degrees on both axes.
        let ray = camera().ray_from_ndc(Vector2::new(1.0, 1.0));
        assert!((ray.direction.x - ray.direction.y).abs() < 1e-12);
        assert!((ray.direction.x + ray.direction.z).abs() < 1e-12);
    }

    #[test]
    fn test_pick_hit_starts_drag_and_zeroes_velocity() {
        let cam = camera();
        let mut body = body_at(Vector3::new(0.0, 0.2, 0.0));
        body.set_velocity(Vector3::new(0.3, 0.1, 0.0));
        let proxy = proxy_for(&body);
        let mut drag = DragController::new();

        let ndc = Vector2::ZERO;
        assert!(drag.pointer_down(&cam.ray_from_ndc(ndc), ndc, Some(&proxy), &mut body));
        assert!(matches!(drag.phase(), DragPhase::Dragging(_)));
        assert_eq!(body.velocity(), Vector3::ZERO);

        let session = drag.session().unwrap();
        // Hit on the front face at z = 0.5, straight ahead of the eye.
        assert!((session.grab_offset.z + 0.5).abs() < 1e-9);
        assert!((session.grab_offset.y - 0.2).abs() < 1e-9);
        assert!((session.plane_z - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_pick_miss_stays_idle() {
        let cam = camera();
        let mut body = body_at(Vector3::ZERO);
        body.set_velocity(Vector3::new(0.3, 0.0, 0.0));
        let proxy = proxy_for(&body);
        let mut drag = DragController::new();

        let ndc = Vector2::new(0.9, 0.9);
        assert!(!drag.pointer_down(&cam.ray_from_ndc(ndc), ndc, Some(&proxy), &mut body));
        assert_eq!(drag.phase(), &DragPhase::Idle);
        assert_eq!(body.velocity(), Vector3::new(0.3, 0.0, 0.0));
    }

    #[test]
    fn test_pick_without_proxy_is_a_miss() {
        let cam = camera();
        let mut body = body_at(Vector3::ZERO);
        let mut drag = DragController::new();
        assert!(!drag.pointer_down(&cam.ray_from_ndc(Vector2::ZERO), Vector2::ZERO, None, &mut body));
        assert!(drag.session().is_none());
    }

    #[test]
    fn test_move_tracks_plane_with_offset() {
        let cam = camera();
        let mut body = body_at(Vector3::new(0.0, 1.0, 0.0));
        let proxy = proxy_for(&body);
        let mut drag = DragController::new();
        let down = Vector2::new(0.0, 0.2);
        assert!(drag.pointer_down(&cam.ray_from_ndc(down), down, Some(&proxy), &mut body));
        let session = *drag.session().unwrap();

        let to = Vector2::new(0.2, 0.2);
        let ray = cam.ray_from_ndc(to);
        let expected = ray.intersect_z_plane(session.plane_z).unwrap() + session.grab_offset;
        let moved = drag.pointer_move(&ray, to, &mut body).unwrap();

        assert_eq!(moved, expected);
        // Depth is preserved while held.
        assert!(moved.z.abs() < 1e-9);
        assert_eq!(body.position(), expected);
        assert_eq!(drag.session().unwrap().last_pointer_ndc, to);
    }

    #[test]
    fn test_move_clamps_to_floor() {
        let cam = camera();
        let mut body = body_at(Vector3::ZERO);
        let proxy = proxy_for(&body);
        let mut drag = DragController::new();
        assert!(drag.pointer_down(&cam.ray_from_ndc(Vector2::ZERO), Vector2::ZERO, Some(&proxy), &mut body));

        let low = Vector2::new(0.0, -0.9);
        let moved = drag.pointer_move(&cam.ray_from_ndc(low), low, &mut body).unwrap();
        assert_eq!(moved.y, 0.0);
    }

    #[test]
    fn test_parallel_move_is_skipped() {
        let cam = camera();
        let mut body = body_at(Vector3::ZERO);
        let proxy = proxy_for(&body);
        let mut drag = DragController::new();
        assert!(drag.pointer_down(&cam.ray_from_ndc(Vector2::ZERO), Vector2::ZERO, Some(&proxy), &mut body));
        let before = body.position();

        let parallel = Ray::new(Vector3::new(0.0, 0.0, 5.0), Vector3::new(1.0, 0.0, 0.0));
        assert!(drag.pointer_move(&parallel, Vector2::new(0.5, 0.0), &mut body).is_none());
        assert_eq!(body.position(), before);
        assert!(body.position().is_finite());
        assert!(drag.is_dragging());
    }

    #[test]
    fn test_move_when_idle_is_ignored() {
        let cam = camera();
        let mut body = body_at(Vector3::ZERO);
        let mut drag = DragController::new();
        assert!(drag.pointer_move(&cam.ray_from_ndc(Vector2::ZERO), Vector2::ZERO, &mut body).is_none());
        assert_eq!(body.position(), Vector3::ZERO);
    }

    #[test]
    fn test_release_throws_and_returns_to_idle() {
        let cam = camera();
        let mut body = body_at(Vector3::ZERO);
        let proxy = proxy_for(&body);
        let mut drag = DragController::new();
        let throw = ThrowResolver::new(-3.0);

        assert!(drag.pointer_down(&cam.ray_from_ndc(Vector2::ZERO), Vector2::ZERO, Some(&proxy), &mut body));
        let last = Vector2::new(0.1, 0.1);
        drag.pointer_move(&cam.ray_from_ndc(last), last, &mut body);

        let velocity = drag.pointer_up(Vector2::new(0.2, 0.3), &throw, &mut body).unwrap();
        assert_eq!(velocity.x, (0.2 - 0.1) * -3.0);
        assert_eq!(velocity.y, (0.3 - 0.1) * -3.0);
        assert_eq!(body.velocity(), velocity);
        assert_eq!(drag.phase(), &DragPhase::Idle);

        // A second release is a no-op.
        assert!(drag.pointer_up(Vector2::ZERO, &throw, &mut body).is_none());
    }
}
