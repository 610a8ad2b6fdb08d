use std::collections::HashMap;

use crate::bodies::{Point, SegmentFlags};
use crate::constraints::{DistanceConstraint, HingeConstraint};
use crate::core::PointStore;
use crate::error::PhysicsError;
use crate::math::{signed_angle, Vector2, LENGTH_EPSILON};
use crate::Result;

/// Assembles a named point graph.
///
/// Names only exist while building; `finish` hands back dense indices and
/// drops the lookup table.
#[derive(Debug, Default)]
pub struct SkeletonBuilder {
    points: PointStore,
    names: HashMap<String, usize>,
    distances: Vec<DistanceConstraint>,
    hinges: Vec<HingeConstraint>,
}

/// Output of a finished builder
#[derive(Debug, Clone)]
pub struct BuiltGraph {
    pub points: PointStore,
    pub distances: Vec<DistanceConstraint>,
    pub hinges: Vec<HingeConstraint>,
}

impl SkeletonBuilder {
    /// Creates a new empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named point, failing if the name is taken
    pub fn add_point(&mut self, name: &str, position: Vector2, mass: f32) -> Result<usize> {
        if self.names.contains_key(name) {
            return Err(PhysicsError::DuplicatePoint(name.to_string()));
        }
        let index = self.points.push(Point::new(position, mass));
        self.names.insert(name.to_string(), index);
        Ok(index)
    }

    /// Looks up a point index by name
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| PhysicsError::UnknownPoint(name.to_string()))
    }

    /// Current position of a named point
    pub fn position_of(&self, name: &str) -> Result<Vector2> {
        let index = self.index_of(name)?;
        Ok(self.points[index].position)
    }

    /// Links two named points at their current separation
    pub fn add_distance(&mut self, a: &str, b: &str, stiffness: f32, flags: SegmentFlags) -> Result<usize> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        let rest_length = self.points[i].position.distance(&self.points[j].position);
        if rest_length <= LENGTH_EPSILON {
            return Err(PhysicsError::InvalidParameter(format!(
                "segment {}-{} has zero rest length", a, b
            )));
        }
        self.distances.push(DistanceConstraint::new(i, j, rest_length, stiffness, flags));
        Ok(self.distances.len() - 1)
    }

    /// Limits the joint at `pivot`; the rest angle is read from the current layout
    pub fn add_hinge(
        &mut self,
        pivot: &str,
        anchor: &str,
        limb: &str,
        limits: (f32, f32),
        stiffness: f32,
    ) -> Result<usize> {
        let p = self.index_of(pivot)?;
        let a = self.index_of(anchor)?;
        let l = self.index_of(limb)?;
        let origin = self.points[p].position;
        let rest = signed_angle(self.points[a].position - origin, self.points[l].position - origin);
        let hinge = HingeConstraint::new(p, a, l, rest, limits.0, limits.1, stiffness)?;
        self.hinges.push(hinge);
        Ok(self.hinges.len() - 1)
    }

    /// Number of points added so far
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Consumes the builder, discarding the name table
    pub fn finish(self) -> BuiltGraph {
        BuiltGraph {
            points: self.points,
            distances: self.distances,
            hinges: self.hinges,
        }
    }
}
