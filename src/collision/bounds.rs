use crate::bodies::{Point, WallMaterial};
use crate::core::room::Interior;
use crate::math::Vector2;

/// Keeps points inside the room and applies the wall response.
///
/// All speeds here are per-step displacements; the caller converts from
/// per-second config values with the sub-step length.
#[derive(Debug, Clone)]
pub struct BoundsResolver {
    /// Restitution and friction of the walls
    pub material: WallMaterial,

    /// Sub-steps a contact stays active after a hit
    pub contact_frames: u8,

    /// Largest speed a point may leave a wall with (px per step)
    pub max_impact_speed: f32,

    /// Distance from the floor inside which the resting rule applies (px)
    pub floor_band: f32,

    /// Horizontal speed below which a floor point stops sliding (px per step)
    pub floor_rest_speed: f32,

    /// Vertical velocity multiplier inside the floor band
    pub floor_vertical_damping: f32,
}

impl BoundsResolver {
    /// Clamps every free point into `bounds` and rewrites its velocity.
    ///
    /// Returns the number of points that hit a wall.
    pub fn apply_bounds(&self, points: &mut [Point], bounds: &Interior, pinned: Option<usize>) -> usize {
        let mut hits = 0;

        for (index, point) in points.iter_mut().enumerate() {
            if pinned == Some(index) {
                continue;
            }

            let incoming = point.velocity();
            let mut normal = Vector2::zero();

            if point.position.x < bounds.left {
                point.position.x = bounds.left;
                normal.x = 1.0;
            } else if point.position.x > bounds.right {
                point.position.x = bounds.right;
                normal.x = -1.0;
            }
            if point.position.y < bounds.top {
                point.position.y = bounds.top;
                normal.y = 1.0;
            } else if point.position.y > bounds.bottom {
                point.position.y = bounds.bottom;
                normal.y = -1.0;
            }

            if !normal.is_zero() {
                let normal = normal.normalize();
                let outgoing = self.respond(incoming, normal);
                point.set_velocity(outgoing);
                point.mark_contact(normal, self.contact_frames);
                hits += 1;
            }

            if (point.position.y - bounds.bottom).abs() < self.floor_band {
                self.rest_on_floor(point);
            }
        }

        hits
    }

    /// Counts every contact timer down by one sub-step
    pub fn decay_contacts(points: &mut [Point]) {
        for point in points {
            point.decay_contact();
        }
    }

    // Splits the velocity along the wall normal, bounces the part moving into
    // the wall and rubs off the tangential part. The result is never faster
    // than what came in.
    fn respond(&self, incoming: Vector2, normal: Vector2) -> Vector2 {
        let normal_speed = incoming.dot(&normal);
        let normal_part = normal * normal_speed;
        let tangent_part = incoming - normal_part;

        let bounced = if normal_speed < 0.0 {
            normal * (-normal_speed * self.material.restitution)
        } else {
            normal_part
        };
        let outgoing = bounced + tangent_part * self.material.tangential_retention();

        let limit = incoming.length().min(self.max_impact_speed);
        outgoing.clamp_length(limit)
    }

    fn rest_on_floor(&self, point: &mut Point) {
        let velocity = point.velocity();
        if velocity.x.abs() < self.floor_rest_speed {
            point.previous.x = point.position.x;
        } else {
            point.previous.x = point.position.x - velocity.x * 0.5;
        }
        point.previous.y = point.position.y - velocity.y * self.floor_vertical_damping;
    }
}
