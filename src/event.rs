//! Event graph: particle and vertex nodes owned by one [`GenEvent`].
//!
//! Nodes live in two insertion-ordered arenas. Edges are plain
//! [`ParticleId`]/[`VertexId`] handles into those arenas, and the event
//! keeps both directions of every edge in sync:
//!
//! ```text
//!   particles_in            particles_out
//!   p0 ──┐                 ┌──► p2  (production_vertex = v0)
//!        ├──►  Vertex v0  ─┤
//!   p1 ──┘                 └──► p3  (production_vertex = v0)
//!   (end_vertices ∋ v0)
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HepevtError, Result};
use crate::types::{FourVector, ParticleId, VertexId};

/// A particle node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Four-momentum `(px, py, pz, E)`
    pub momentum: FourVector,

    /// Generated mass
    pub generated_mass: f64,

    /// Status code
    pub status: i32,

    /// Particle-type code (PDG id)
    pub pid: i32,

    production_vertex: Option<VertexId>,
    end_vertices: Vec<VertexId>,
}

impl Particle {
    /// Create a detached particle.
    pub fn new(momentum: FourVector, generated_mass: f64, status: i32, pid: i32) -> Self {
        Self {
            momentum,
            generated_mass,
            status,
            pid,
            production_vertex: None,
            end_vertices: Vec::new(),
        }
    }

    /// Vertex this particle is outgoing from, if any.
    #[inline]
    pub fn production_vertex(&self) -> Option<VertexId> {
        self.production_vertex
    }

    /// Vertices this particle is incoming to.
    #[inline]
    pub fn end_vertices(&self) -> &[VertexId] {
        &self.end_vertices
    }
}

/// A vertex node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Vertex {
    /// Position `(x, y, z, t)`
    pub position: FourVector,

    particles_in: Vec<ParticleId>,
    particles_out: Vec<ParticleId>,
}

impl Vertex {
    /// Create an unconnected vertex at `position`.
    pub fn new(position: FourVector) -> Self {
        Self {
            position,
            particles_in: Vec::new(),
            particles_out: Vec::new(),
        }
    }

    #[inline]
    pub fn particles_in(&self) -> &[ParticleId] {
        &self.particles_in
    }

    #[inline]
    pub fn particles_out(&self) -> &[ParticleId] {
        &self.particles_out
    }
}

/// The owning container of all nodes of one event.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GenEvent {
    event_number: u64,
    particles: Vec<Particle>,
    vertices: Vec<Vertex>,
}

impl GenEvent {
    /// Create an empty event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty event with room for `particles` particles.
    pub fn with_capacity(particles: usize) -> Self {
        Self {
            event_number: 0,
            particles: Vec::with_capacity(particles),
            vertices: Vec::new(),
        }
    }

    #[inline]
    pub fn event_number(&self) -> u64 {
        self.event_number
    }

    #[inline]
    pub fn set_event_number(&mut self, event_number: u64) {
        self.event_number = event_number;
    }

    /// Append a particle, returning its handle.
    ///
    /// Any edges carried by `particle` are dropped; connect it through
    /// [`add_particle_in`](Self::add_particle_in) and
    /// [`add_particle_out`](Self::add_particle_out).
    pub fn add_particle(&mut self, mut particle: Particle) -> ParticleId {
        particle.production_vertex = None;
        particle.end_vertices.clear();
        let id = ParticleId(self.particles.len());
        self.particles.push(particle);
        id
    }

    /// Append a vertex, returning its handle.
    ///
    /// Edges carried by `vertex` are dropped, as for particles.
    pub fn add_vertex(&mut self, mut vertex: Vertex) -> VertexId {
        vertex.particles_in.clear();
        vertex.particles_out.clear();
        let id = VertexId(self.vertices.len());
        self.vertices.push(vertex);
        id
    }

    /// Attach `particle` as incoming to `vertex`. Re-attaching is a no-op.
    pub fn add_particle_in(&mut self, vertex: VertexId, particle: ParticleId) -> Result<()> {
        self.check_vertex(vertex)?;
        self.check_particle(particle)?;

        let v = &mut self.vertices[vertex.0];
        if v.particles_in.contains(&particle) {
            return Ok(());
        }
        v.particles_in.push(particle);
        self.particles[particle.0].end_vertices.push(vertex);
        Ok(())
    }

    /// Attach a run of particles as incoming to a vertex that has none yet.
    ///
    /// `parents` must be free of duplicates; no per-edge dedup is done so
    /// wide ranges stay linear.
    pub(crate) fn attach_incoming(
        &mut self,
        vertex: VertexId,
        parents: impl Iterator<Item = ParticleId> + Clone,
    ) -> Result<()> {
        self.check_vertex(vertex)?;
        for particle in parents.clone() {
            self.check_particle(particle)?;
        }

        debug_assert!(self.vertices[vertex.0].particles_in.is_empty());
        self.vertices[vertex.0].particles_in.extend(parents.clone());
        for particle in parents {
            self.particles[particle.0].end_vertices.push(vertex);
        }
        Ok(())
    }

    /// Attach `particle` as outgoing from `vertex`, making `vertex` its
    /// production vertex.
    ///
    /// # Errors
    /// `DuplicateProductionVertex` if the particle already has a different
    /// production vertex.
    pub fn add_particle_out(&mut self, vertex: VertexId, particle: ParticleId) -> Result<()> {
        self.check_vertex(vertex)?;
        self.check_particle(particle)?;

        match self.particles[particle.0].production_vertex {
            Some(existing) if existing == vertex => return Ok(()),
            Some(existing) => {
                return Err(HepevtError::DuplicateProductionVertex {
                    particle: particle.0,
                    existing: existing.0,
                    requested: vertex.0,
                })
            }
            None => {}
        }

        self.vertices[vertex.0].particles_out.push(particle);
        self.particles[particle.0].production_vertex = Some(vertex);
        Ok(())
    }

    #[inline]
    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id.0)
    }

    #[inline]
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.0)
    }

    /// Particles in insertion (input row) order.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Vertices in creation order.
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the event holds no nodes at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty() && self.vertices.is_empty()
    }

    #[inline]
    pub fn production_vertex(&self, particle: ParticleId) -> Option<VertexId> {
        self.particle(particle).and_then(Particle::production_vertex)
    }

    /// Incoming particles of the particle's production vertex.
    pub fn parents(&self, particle: ParticleId) -> &[ParticleId] {
        self.production_vertex(particle)
            .and_then(|v| self.vertex(v))
            .map(Vertex::particles_in)
            .unwrap_or(&[])
    }

    /// Outgoing particles of every vertex the particle is incoming to,
    /// in vertex order.
    pub fn children(&self, particle: ParticleId) -> Vec<ParticleId> {
        let Some(p) = self.particle(particle) else {
            return Vec::new();
        };
        let mut children = Vec::new();
        for vertex in p.end_vertices.iter().filter_map(|&v| self.vertex(v)) {
            for &child in vertex.particles_out() {
                if !children.contains(&child) {
                    children.push(child);
                }
            }
        }
        children
    }

    /// Particles without a production vertex (initial-state/beam particles).
    pub fn beam_particles(&self) -> impl Iterator<Item = ParticleId> + '_ {
        self.particles
            .iter()
            .enumerate()
            .filter(|(_, p)| p.production_vertex.is_none())
            .map(|(i, _)| ParticleId(i))
    }

    /// Remove all nodes and reset the event number.
    pub fn clear(&mut self) {
        self.event_number = 0;
        self.particles.clear();
        self.vertices.clear();
    }

    /// Save to JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from JSON file.
    ///
    /// # Errors
    /// `UnknownParticle`/`UnknownVertex` if any stored edge points outside
    /// the loaded arenas.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let event: GenEvent = serde_json::from_str(&json)?;
        event.check_handles()?;
        Ok(event)
    }

    /// Check that every edge handle refers to an existing node.
    fn check_handles(&self) -> Result<()> {
        for p in &self.particles {
            if let Some(v) = p.production_vertex {
                self.check_vertex(v)?;
            }
            for &v in &p.end_vertices {
                self.check_vertex(v)?;
            }
        }
        for v in &self.vertices {
            for &p in v.particles_in.iter().chain(&v.particles_out) {
                self.check_particle(p)?;
            }
        }
        Ok(())
    }

    #[inline]
    fn check_particle(&self, id: ParticleId) -> Result<()> {
        if id.0 >= self.particles.len() {
            return Err(HepevtError::UnknownParticle(id.0));
        }
        Ok(())
    }

    #[inline]
    fn check_vertex(&self, id: VertexId) -> Result<()> {
        if id.0 >= self.vertices.len() {
            return Err(HepevtError::UnknownVertex(id.0));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(e: f64) -> Particle {
        Particle::new(FourVector::new(0.0, 0.0, e, e), 0.0, 1, 22)
    }

    /// p0 + p1 -> v0 -> p2, p3
    fn two_to_two() -> GenEvent {
        let mut evt = GenEvent::new();
        let ids: Vec<_> = (0..4).map(|i| evt.add_particle(particle(i as f64))).collect();
        let v = evt.add_vertex(Vertex::new(FourVector::zero()));
        evt.add_particle_in(v, ids[0]).unwrap();
        evt.add_particle_in(v, ids[1]).unwrap();
        evt.add_particle_out(v, ids[2]).unwrap();
        evt.add_particle_out(v, ids[3]).unwrap();
        evt
    }

    #[test]
    fn test_new_event() {
        let evt = GenEvent::new();
        assert!(evt.is_empty());
        assert_eq!(evt.event_number(), 0);
        assert_eq!(evt.particle_count(), 0);
        assert_eq!(evt.vertex_count(), 0);
    }

    #[test]
    fn test_handles_follow_insertion_order() {
        let mut evt = GenEvent::new();
        assert_eq!(evt.add_particle(particle(1.0)), ParticleId(0));
        assert_eq!(evt.add_particle(particle(2.0)), ParticleId(1));
        assert_eq!(evt.add_vertex(Vertex::default()), VertexId(0));
        assert_eq!(evt.particle(ParticleId(1)).unwrap().momentum.e(), 2.0);
        assert!(evt.particle(ParticleId(2)).is_none());
    }

    #[test]
    fn test_edges_are_bidirectional() {
        let evt = two_to_two();
        let v = VertexId(0);

        assert_eq!(evt.vertex(v).unwrap().particles_in(), &[ParticleId(0), ParticleId(1)]);
        assert_eq!(evt.vertex(v).unwrap().particles_out(), &[ParticleId(2), ParticleId(3)]);
        assert_eq!(evt.particle(ParticleId(0)).unwrap().end_vertices(), &[v]);
        assert_eq!(evt.production_vertex(ParticleId(3)), Some(v));
        assert_eq!(evt.production_vertex(ParticleId(0)), None);
    }

    #[test]
    fn test_parents_and_children() {
        let evt = two_to_two();
        assert_eq!(evt.parents(ParticleId(2)), &[ParticleId(0), ParticleId(1)]);
        assert!(evt.parents(ParticleId(0)).is_empty());
        assert_eq!(evt.children(ParticleId(1)), vec![ParticleId(2), ParticleId(3)]);
        assert!(evt.children(ParticleId(3)).is_empty());
        assert!(evt.children(ParticleId(42)).is_empty());
    }

    #[test]
    fn test_beam_particles() {
        let evt = two_to_two();
        let beams: Vec<_> = evt.beam_particles().collect();
        assert_eq!(beams, vec![ParticleId(0), ParticleId(1)]);
    }

    #[test]
    fn test_duplicate_production_vertex_rejected() {
        let mut evt = two_to_two();
        let other = evt.add_vertex(Vertex::default());
        let err = evt.add_particle_out(other, ParticleId(2)).unwrap_err();
        assert_eq!(
            err,
            HepevtError::DuplicateProductionVertex {
                particle: 2,
                existing: 0,
                requested: 1
            }
        );
        // Same vertex again is a no-op
        evt.add_particle_out(VertexId(0), ParticleId(2)).unwrap();
        assert_eq!(evt.vertex(VertexId(0)).unwrap().particles_out().len(), 2);
    }

    #[test]
    fn test_reattaching_incoming_is_noop() {
        let mut evt = two_to_two();
        evt.add_particle_in(VertexId(0), ParticleId(0)).unwrap();
        assert_eq!(evt.vertex(VertexId(0)).unwrap().particles_in().len(), 2);
        assert_eq!(evt.particle(ParticleId(0)).unwrap().end_vertices().len(), 1);
    }

    #[test]
    fn test_unknown_handles() {
        let mut evt = two_to_two();
        assert_eq!(
            evt.add_particle_in(VertexId(9), ParticleId(0)),
            Err(HepevtError::UnknownVertex(9))
        );
        assert_eq!(
            evt.add_particle_out(VertexId(0), ParticleId(9)),
            Err(HepevtError::UnknownParticle(9))
        );
    }

    #[test]
    fn test_added_nodes_lose_foreign_edges() {
        let source = two_to_two();
        let mut evt = GenEvent::new();
        let id = evt.add_particle(source.particles()[2].clone());
        assert_eq!(evt.production_vertex(id), None);
        let v = evt.add_vertex(source.vertices()[0].clone());
        assert!(evt.vertex(v).unwrap().particles_in().is_empty());
    }

    #[test]
    fn test_clear() {
        let mut evt = two_to_two();
        evt.set_event_number(4);
        evt.clear();
        assert!(evt.is_empty());
        assert_eq!(evt.event_number(), 0);
    }

    #[test]
    fn test_json_persistence() {
        let mut evt = two_to_two();
        evt.set_event_number(4);

        let path = std::env::temp_dir().join(format!(
            "hepevt_event_test_{}_{:?}.json",
            std::process::id(),
            std::thread::current().id()
        ));
        evt.save_json(&path).unwrap();
        let loaded = GenEvent::load_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, evt);
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "hepevt_{name}_{}_{:?}.json",
            std::process::id(),
            std::thread::current().id()
        ))
    }

    #[test]
    fn test_load_json_rejects_dangling_vertex() {
        let path = temp_path("dangling_vertex");
        std::fs::write(
            &path,
            r#"{"event_number":1,"particles":[{"momentum":{"x":0.0,"y":0.0,"z":0.0,"t":0.0},"generated_mass":0.0,"status":1,"pid":22,"production_vertex":null,"end_vertices":[5]}],"vertices":[]}"#,
        )
        .unwrap();
        let result = GenEvent::load_json(&path);
        let _ = std::fs::remove_file(&path);

        assert_eq!(result.unwrap_err(), HepevtError::UnknownVertex(5));
    }

    #[test]
    fn test_load_json_rejects_dangling_particle() {
        let path = temp_path("dangling_particle");
        std::fs::write(
            &path,
            r#"{"event_number":0,"particles":[],"vertices":[{"position":{"x":0.0,"y":0.0,"z":0.0,"t":0.0},"particles_in":[],"particles_out":[3]}]}"#,
        )
        .unwrap();
        let result = GenEvent::load_json(&path);
        let _ = std::fs::remove_file(&path);

        assert_eq!(result.unwrap_err(), HepevtError::UnknownParticle(3));
    }

    #[test]
    fn test_attach_incoming_wide_range() {
        let mut evt = GenEvent::new();
        for i in 0..5_000 {
            evt.add_particle(particle(i as f64));
        }
        let v = evt.add_vertex(Vertex::default());
        evt.attach_incoming(v, (0..4_999).map(ParticleId)).unwrap();
        evt.add_particle_out(v, ParticleId(4_999)).unwrap();

        assert_eq!(evt.vertex(v).unwrap().particles_in().len(), 4_999);
        assert!(evt.particles()[..4_999]
            .iter()
            .all(|p| p.end_vertices() == [v]));
        assert_eq!(evt.children(ParticleId(17)), vec![ParticleId(4_999)]);

        assert_eq!(
            evt.attach_incoming(v, [ParticleId(9_999)].into_iter()),
            Err(HepevtError::UnknownParticle(9_999))
        );
    }

    #[test]
    fn test_load_json_missing_file() {
        let err = GenEvent::load_json("/nonexistent/hepevt/event.json").unwrap_err();
        assert!(matches!(err, HepevtError::Generic(_)));
    }
}
