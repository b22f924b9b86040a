//! Per-actor grab state machine: `Idle -> Grabbing -> Idle`

use horizon_core::{Frame, Vec3};
use std::collections::BTreeMap;

/// Identifier the collaborator layer assigns to a tracked hand/pointer
pub type ActorId = u32;

/// One actor's input for the current tick, in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorInput {
    pub position: Vec3,
    pub pinch: bool,
}

impl ActorInput {
    pub fn new(position: Vec3, pinch: bool) -> Self {
        Self { position, pinch }
    }
}

/// Binding of an actor to the vertex it pinched
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrabAnchor {
    pub vertex: usize,
    /// Actor position (shell local) at the moment of the pinch
    pub initial_actor_position: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrabPhase {
    Idle,
    Grabbing(GrabAnchor),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrabEvent {
    Grabbed { actor: ActorId, vertex: usize },
    Released { actor: ActorId, vertex: usize },
}

/// At most one anchor per live actor id
#[derive(Debug, Default)]
pub struct GrabTracker {
    anchors: BTreeMap<ActorId, GrabAnchor>,
}

impl GrabTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self, actor: ActorId) -> GrabPhase {
        match self.anchors.get(&actor) {
            Some(anchor) => GrabPhase::Grabbing(*anchor),
            None => GrabPhase::Idle,
        }
    }

    pub fn anchor(&self, actor: ActorId) -> Option<&GrabAnchor> {
        self.anchors.get(&actor)
    }

    pub fn anchors(&self) -> impl Iterator<Item = (&ActorId, &GrabAnchor)> {
        self.anchors.iter()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn clear(&mut self) {
        self.anchors.clear();
    }

    /// Advance every actor's state machine against this tick's input.
    ///
    /// Pinch-start binds the nearest vertex of `positions` when it lies
    /// within `touch_radius`; pinch-release or a vanished actor drops the
    /// anchor.
    pub fn sync(
        &mut self,
        actors: &BTreeMap<ActorId, ActorInput>,
        frame: &Frame,
        positions: &[Vec3],
        touch_radius: f32,
        events: &mut Vec<GrabEvent>,
    ) {
        self.anchors.retain(|id, anchor| {
            let keep = actors.get(id).is_some_and(|a| a.pinch);
            if !keep {
                events.push(GrabEvent::Released {
                    actor: *id,
                    vertex: anchor.vertex,
                });
            }
            keep
        });

        for (&id, actor) in actors {
            if !actor.pinch || self.anchors.contains_key(&id) {
                continue;
            }
            let local = frame.to_local(actor.position);
            if let Some((vertex, dist)) = nearest_vertex(positions, local) {
                if dist < touch_radius {
                    self.anchors.insert(
                        id,
                        GrabAnchor {
                            vertex,
                            initial_actor_position: local,
                        },
                    );
                    events.push(GrabEvent::Grabbed { actor: id, vertex });
                }
            }
        }
    }
}

fn nearest_vertex(positions: &[Vec3], point: Vec3) -> Option<(usize, f32)> {
    positions
        .iter()
        .enumerate()
        .map(|(i, p)| (i, p.distance(&point)))
        .filter(|(_, d)| d.is_finite())
        .min_by(|a, b| a.1.total_cmp(&b.1))
}
