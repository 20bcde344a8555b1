//! Vertices

use std::collections::BTreeMap;

use glam::{Vec2, Vec3, Vec4};

use super::{finite, fixed};
use crate::error::{Error, Result};

/// Raw weight-set index vertex tables use for "unassigned".
pub const NO_WEIGHT_SET_RAW: i64 = -1;

/// A mesh vertex.
///
/// Only the position is mandatory. Every other attribute is either absent
/// (`None` or an empty map) or fully specified.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vertex {
    id: Option<usize>,
    position: Vec3,
    uvs: BTreeMap<usize, Vec2>,
    normal: Option<Vec3>,
    colour: Option<Vec4>,
    weight_set_index: Option<usize>,
    weights: BTreeMap<usize, f32>,
}

impl Vertex {
    pub fn builder() -> VertexBuilder {
        VertexBuilder::default()
    }

    /// Sequence id, assigned by [`Mesh::reindex`](super::Mesh::reindex).
    pub fn id(&self) -> Option<usize> {
        self.id
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// UV coordinates keyed by layer.
    pub fn uvs(&self) -> &BTreeMap<usize, Vec2> {
        &self.uvs
    }

    pub fn uv(&self, layer: usize) -> Option<Vec2> {
        self.uvs.get(&layer).copied()
    }

    pub fn normal(&self) -> Option<Vec3> {
        self.normal
    }

    /// RGBA colour.
    pub fn colour(&self) -> Option<Vec4> {
        self.colour
    }

    /// Pre-bake weight set this vertex shares with others.
    pub fn weight_set_index(&self) -> Option<usize> {
        self.weight_set_index
    }

    /// Post-bake weights keyed by bone (group) index.
    pub fn weights(&self) -> &BTreeMap<usize, f32> {
        &self.weights
    }

    pub fn weight(&self, group: usize) -> Option<f32> {
        self.weights.get(&group).copied()
    }

    pub fn has_uvs(&self) -> bool {
        !self.uvs.is_empty()
    }

    pub fn has_normal(&self) -> bool {
        self.normal.is_some()
    }

    pub fn has_colour(&self) -> bool {
        self.colour.is_some()
    }

    pub fn has_weight_index(&self) -> bool {
        self.weight_set_index.is_some()
    }

    pub fn has_weights(&self) -> bool {
        !self.weights.is_empty()
    }

    /// Same vertex pointing at a different weight set.
    #[must_use]
    pub fn with_weight_set(mut self, index: Option<usize>) -> Self {
        self.weight_set_index = index;
        self
    }

    pub(crate) fn assign_id(&mut self, id: usize) {
        self.id = Some(id);
    }
}

/// Validating builder for [`Vertex`].
///
/// Setters record the first problem they hit; [`VertexBuilder::build`]
/// reports it, so a chain of setters never yields a half-valid vertex.
#[derive(Debug, Default)]
pub struct VertexBuilder {
    vertex: Vertex,
    error: Option<Error>,
}

impl VertexBuilder {
    fn check<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.error.get_or_insert(err);
                None
            }
        }
    }

    #[must_use]
    pub fn position(mut self, values: &[f32]) -> Self {
        if let Some(p) = self.check(fixed::<3>("Vertex.position", values)) {
            self.vertex.position = Vec3::from_array(p);
        }
        self
    }

    #[must_use]
    pub fn uv(mut self, layer: usize, values: &[f32]) -> Self {
        if let Some(uv) = self.check(fixed::<2>("Vertex.uv", values)) {
            self.vertex.uvs.insert(layer, Vec2::from_array(uv));
        }
        self
    }

    #[must_use]
    pub fn normal(mut self, values: &[f32]) -> Self {
        if let Some(n) = self.check(fixed::<3>("Vertex.normal", values)) {
            self.vertex.normal = Some(Vec3::from_array(n));
        }
        self
    }

    #[must_use]
    pub fn colour(mut self, values: &[f32]) -> Self {
        if let Some(c) = self.check(fixed::<4>("Vertex.colour", values)) {
            self.vertex.colour = Some(Vec4::from_array(c));
        }
        self
    }

    /// Pre-bake weight set index as stored in a vertex table.
    ///
    /// [`NO_WEIGHT_SET_RAW`] clears it; any other negative value is rejected.
    #[must_use]
    pub fn weight_set_index(mut self, raw: i64) -> Self {
        let index = if raw == NO_WEIGHT_SET_RAW {
            Ok(None)
        } else {
            usize::try_from(raw)
                .map(Some)
                .map_err(|_| {
                    Error::kind("Vertex.weight_set_index", format!("negative index {raw}"))
                })
        };
        if let Some(index) = self.check(index) {
            self.vertex.weight_set_index = index;
        }
        self
    }

    #[must_use]
    pub fn weight(mut self, group: usize, value: f32) -> Self {
        if self.check(finite("Vertex.weight", &[value])).is_some() {
            self.vertex.weights.insert(group, value);
        }
        self
    }

    /// # Errors
    /// The first [`Error::ShapeViolation`] or [`Error::TypeViolation`] any
    /// setter ran into.
    pub fn build(self) -> Result<Vertex> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.vertex),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_attributes_are_not_zero() {
        let vertex = Vertex::builder().position(&[1.0, 2.0, 3.0]).build().unwrap();
        assert_eq!(vertex.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(vertex.normal(), None);
        assert_eq!(vertex.colour(), None);
        assert_eq!(vertex.weight_set_index(), None);
        assert_eq!(vertex.id(), None);
        assert!(!vertex.has_uvs() && !vertex.has_weights());

        let at_origin = Vertex::builder().normal(&[0.0, 0.0, 0.0]).build().unwrap();
        assert!(at_origin.has_normal());
    }

    #[test]
    fn test_all_attributes() {
        let vertex = Vertex::builder()
            .position(&[0.0, 1.0, 0.0])
            .uv(0, &[0.25, 0.75])
            .uv(2, &[1.0, 0.0])
            .normal(&[0.0, 0.0, 1.0])
            .colour(&[1.0, 0.5, 0.0, 1.0])
            .weight_set_index(7)
            .weight(3, 0.6)
            .weight(4, 0.4)
            .build()
            .unwrap();
        assert_eq!(vertex.uv(2), Some(Vec2::new(1.0, 0.0)));
        assert_eq!(vertex.uv(1), None);
        assert_eq!(vertex.weight_set_index(), Some(7));
        assert_eq!(vertex.weight(4), Some(0.4));
        assert_eq!(vertex.colour(), Some(Vec4::new(1.0, 0.5, 0.0, 1.0)));
    }

    #[test]
    fn test_first_error_wins() {
        let result = Vertex::builder()
            .uv(0, &[0.5])
            .normal(&[0.0, 1.0])
            .build();
        assert!(matches!(
            result,
            Err(Error::ShapeViolation { field: "Vertex.uv", expected: 2, found: 1 })
        ));
    }

    #[test]
    fn test_weight_set_sentinel() {
        let vertex = Vertex::builder()
            .weight_set_index(4)
            .weight_set_index(NO_WEIGHT_SET_RAW)
            .build()
            .unwrap();
        assert!(!vertex.has_weight_index());

        let result = Vertex::builder().weight_set_index(-2).build();
        assert!(matches!(result, Err(Error::TypeViolation { .. })));
    }

    #[test]
    fn test_non_finite_weight() {
        let result = Vertex::builder().weight(0, f32::INFINITY).build();
        assert!(matches!(result, Err(Error::TypeViolation { field: "Vertex.weight", .. })));
    }
}
