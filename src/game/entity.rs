//! # Entities
//!
//! Game objects with lifecycle hooks, kept in a homogeneous, ordered collection.

use super::framework::FrameContext;
use serde::{Deserialize, Serialize};

/// Shortest lifetime a destroyed entity gets, so its destroy hook runs on the next update.
const MIN_DESTROY_DELAY: f32 = 0.0001;

/// Lifecycle hooks for a game object.
///
/// Every hook has an empty default. A closed set of entity kinds is best expressed as an
/// enum implementing this trait; `Box<dyn Entity>` works for open sets.
pub trait Entity {
    /// Group name used by tag-filtered rendering and [`EntityHandler::destroy_all`].
    fn tag(&self) -> &str {
        ""
    }

    /// Runs once, right before the first update.
    fn on_create(&mut self, _ctx: &mut FrameContext<'_>) {}

    fn on_update(&mut self, _ctx: &mut FrameContext<'_>, _dt: f32) {}

    fn on_draw(&mut self, _ctx: &mut FrameContext<'_>) {}

    /// Runs once, when the lifetime set by a destroy call runs out.
    fn on_destroy(&mut self, _ctx: &mut FrameContext<'_>) {}
}

impl<T: Entity + ?Sized> Entity for Box<T> {
    fn tag(&self) -> &str {
        (**self).tag()
    }

    fn on_create(&mut self, ctx: &mut FrameContext<'_>) {
        (**self).on_create(ctx)
    }

    fn on_update(&mut self, ctx: &mut FrameContext<'_>, dt: f32) {
        (**self).on_update(ctx, dt)
    }

    fn on_draw(&mut self, ctx: &mut FrameContext<'_>) {
        (**self).on_draw(ctx)
    }

    fn on_destroy(&mut self, ctx: &mut FrameContext<'_>) {
        (**self).on_destroy(ctx)
    }
}

/// Identifier handed out by [`EntityHandler::add`]. Never reused within a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

#[derive(Debug)]
struct Slot<E> {
    id: EntityId,
    entity: E,
    /// Remaining lifetime in seconds; `None` lives until destroyed.
    life: Option<f32>,
    created: bool,
    dead: bool,
}

/// Ordered collection of live entities.
#[derive(Debug)]
pub struct EntityHandler<E> {
    slots: Vec<Slot<E>>,
    next_id: u64,
}

impl<E> Default for EntityHandler<E> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E: Entity> EntityHandler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity. It is created on the next update and not drawn until then.
    pub fn add(&mut self, entity: E) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.slots.push(Slot {
            id,
            entity,
            life: None,
            created: false,
            dead: false,
        });
        id
    }

    /// Schedules an entity to die after `timeout` seconds. Returns false for unknown ids.
    pub fn destroy(&mut self, id: EntityId, timeout: f32) -> bool {
        match self.slots.iter_mut().find(|slot| slot.id == id) {
            Some(slot) => {
                slot.life = Some(timeout.max(MIN_DESTROY_DELAY));
                true
            }
            None => false,
        }
    }

    /// Schedules every entity with the given tag to die after `timeout` seconds.
    pub fn destroy_all(&mut self, tag: &str, timeout: f32) {
        for slot in self.slots.iter_mut().filter(|slot| slot.entity.tag() == tag) {
            slot.life = Some(timeout.max(MIN_DESTROY_DELAY));
        }
    }

    /// Runs one update for every entity, then removes the ones that died.
    pub fn update(&mut self, ctx: &mut FrameContext<'_>, dt: f32) {
        for slot in self.slots.iter_mut() {
            if !slot.created {
                slot.entity.on_create(ctx);
                slot.created = true;
            }
            slot.entity.on_update(ctx, dt);

            if let Some(life) = slot.life.as_mut() {
                *life -= dt;
                if *life <= 0.0 {
                    *life = 0.0;
                    slot.dead = true;
                    slot.entity.on_destroy(ctx);
                }
            }
        }

        let before = self.slots.len();
        self.slots.retain(|slot| !slot.dead);
        let removed = before - self.slots.len();
        if removed > 0 {
            log::trace!("Removed {} dead entities, {} remain", removed, self.slots.len());
        }
    }

    /// Draws every created entity, optionally only those with a matching tag.
    pub fn render(&mut self, ctx: &mut FrameContext<'_>, tag: Option<&str>) {
        for slot in self.slots.iter_mut() {
            if !slot.created {
                continue;
            }
            if let Some(tag) = tag {
                if slot.entity.tag() != tag {
                    continue;
                }
            }
            slot.entity.on_draw(ctx);
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&E> {
        self.slots
            .iter()
            .find(|slot| slot.id == id)
            .map(|slot| &slot.entity)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut E> {
        self.slots
            .iter_mut()
            .find(|slot| slot.id == id)
            .map(|slot| &mut slot.entity)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.slots.iter().any(|slot| slot.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &E)> {
        self.slots.iter().map(|slot| (slot.id, &slot.entity))
    }

    /// Number of entities with the given tag.
    pub fn count_tagged(&self, tag: &str) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.entity.tag() == tag)
            .count()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
