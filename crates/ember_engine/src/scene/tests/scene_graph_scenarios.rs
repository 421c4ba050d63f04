//! Scene graph scenarios
//!
//! Scene registry, component uniqueness and message routing through a whole
//! scene rather than a bare world.

use std::sync::{Arc, Mutex};

use crate::ecs::{Camera, Component, ComponentContext, GameObjectId, Transform, World};
use crate::events::{Message, MessageType};
use crate::scene::{EmptyScene, SceneBehavior, SceneError, SceneManager, MAIN_CAMERA_NAME};

type Journal = Arc<Mutex<Vec<String>>>;

/// Writes "<tag>:<owner name>" to the journal for every hook it sees
#[derive(Clone)]
struct Recorder {
    tag: &'static str,
    journal: Journal,
}

impl Recorder {
    fn new(tag: &'static str, journal: &Journal) -> Self {
        Self {
            tag,
            journal: journal.clone(),
        }
    }

    fn note(&self, ctx: &ComponentContext<'_>) {
        let name = ctx.game_object().map_or("?", |o| o.name()).to_string();
        if let Ok(mut journal) = self.journal.lock() {
            journal.push(format!("{}:{name}", self.tag));
        }
    }
}

impl Component for Recorder {
    fn update(&mut self, ctx: &mut ComponentContext<'_>, _delta_time: f32) {
        self.note(ctx);
    }

    fn on_message(&mut self, ctx: &mut ComponentContext<'_>, _message: &Message) {
        self.note(ctx);
    }
}

#[derive(Clone, Default, Debug, PartialEq)]
struct Health(i32);

impl Component for Health {}

/// Scene behavior that journals its own hooks
struct Hooks {
    journal: Journal,
}

impl SceneBehavior for Hooks {
    fn on_update(&mut self, _world: &mut World, _delta_time: f32) {
        self.journal.lock().unwrap().push("pre".to_string());
    }

    fn on_late_update(&mut self, _world: &mut World, _delta_time: f32) {
        self.journal.lock().unwrap().push("post".to_string());
    }
}

/// Destroys its own game object on the first update
#[derive(Clone, Default)]
struct SelfDestruct;

impl Component for SelfDestruct {
    fn update(&mut self, ctx: &mut ComponentContext<'_>, _delta_time: f32) {
        let owner = ctx.owner();
        ctx.commands().destroy(owner);
    }
}

fn chain(world: &mut World, names: &[&str]) -> Vec<GameObjectId> {
    let mut ids: Vec<GameObjectId> = Vec::new();
    for name in names {
        let parent = ids.last().copied();
        ids.push(world.create_game_object(*name, parent));
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_registry_with_main_camera() {
        let mut manager = SceneManager::new();
        let index = manager.create_scene::<EmptyScene>("S").unwrap();
        assert_eq!(manager.scene_count(), 1);

        let scene = manager.scene_by_name_mut("S").unwrap();
        assert_eq!(scene.build_index(), index);
        let g = scene.create_game_object("G", None);

        let world = scene.world_mut();
        assert!(world.get(g).unwrap().has_component::<Transform>());
        assert!(world.add_component(g, Transform::default()).is_none());

        let camera = world.main_camera().unwrap();
        assert_eq!(world.get(camera).unwrap().name(), MAIN_CAMERA_NAME);
        assert!(world.get_component::<Camera>(camera).is_some());
        assert!(world.add_component(camera, Camera::default()).is_none());
        assert_eq!(world.get(camera).unwrap().component_count(), 1);
    }

    #[test]
    fn test_duplicate_component_keeps_first() {
        let mut world = World::new(0);
        let id = world.create_game_object("G", None);

        assert!(world.add_component(id, Health(10)).is_some());
        assert!(world.add_component(id, Health(99)).is_none());

        assert_eq!(world.get_component::<Health>(id), Some(&Health(10)));
        assert_eq!(world.get(id).unwrap().component_count(), 1);
    }

    #[test]
    fn test_duplicate_scene_name_keeps_counter() {
        let mut manager = SceneManager::new();
        assert_eq!(manager.create_scene::<EmptyScene>("Level"), Ok(0));
        assert_eq!(
            manager.create_scene::<EmptyScene>("Level"),
            Err(SceneError::DuplicateName("Level".to_string()))
        );
        assert_eq!(manager.create_scene::<EmptyScene>("Other"), Ok(1));
        assert_eq!(manager.scene_count(), 2);
    }

    #[test]
    fn test_unsubscribed_type_never_delivered() {
        let journal = Journal::default();
        let mut world = World::new(0);
        let id = world.create_game_object("G", None);
        world.add_component(id, Recorder::new("msg", &journal));
        world.get_mut(id).unwrap().subscribe::<Recorder>(MessageType::Damage);

        for message_type in [MessageType::Collision, MessageType::Trigger, MessageType::Custom(7)] {
            assert_eq!(world.send_message(id, &Message::new(message_type)), 0);
            assert_eq!(world.broadcast_message(id, &Message::new(message_type)), 0);
            assert_eq!(world.send_message_upwards(id, &Message::new(message_type)), 0);
        }
        assert!(journal.lock().unwrap().is_empty());

        assert_eq!(world.send_message(id, &Message::new(MessageType::Damage)), 1);
        assert_eq!(*journal.lock().unwrap(), vec!["msg:G".to_string()]);
    }

    #[test]
    fn test_broadcast_skips_grandchild() {
        let journal = Journal::default();
        let mut world = World::new(0);
        let ids = chain(&mut world, &["Root", "A", "B"]);
        world.add_component(ids[2], Recorder::new("msg", &journal));
        world.get_mut(ids[2]).unwrap().subscribe::<Recorder>(MessageType::Trigger);

        let delivered = world.broadcast_message(ids[0], &Message::new(MessageType::Trigger));

        assert_eq!(delivered, 0);
        assert!(journal.lock().unwrap().is_empty());

        // One level down from A does reach B
        assert_eq!(world.broadcast_message(ids[1], &Message::new(MessageType::Trigger)), 1);
    }

    #[test]
    fn test_upwards_visits_ancestors_in_order() {
        let journal = Journal::default();
        let mut world = World::new(0);
        let ids = chain(&mut world, &["L0", "L1", "L2", "L3"]);
        for id in &ids {
            world.add_component(*id, Recorder::new("up", &journal));
            world.get_mut(*id).unwrap().subscribe::<Recorder>(MessageType::AnimationEvent);
        }

        let delivered = world.send_message_upwards(ids[3], &Message::new(MessageType::AnimationEvent));

        assert_eq!(delivered, 4);
        assert_eq!(*journal.lock().unwrap(), vec!["up:L3", "up:L2", "up:L1", "up:L0"]);
    }

    #[test]
    fn test_removed_component_loses_subscriptions() {
        let journal = Journal::default();
        let mut world = World::new(0);
        let id = world.create_game_object("G", None);
        world.add_component(id, Recorder::new("msg", &journal));
        let object = world.get_mut(id).unwrap();
        object.subscribe::<Recorder>(MessageType::Damage);

        assert!(object.remove_component::<Recorder>());
        assert!(!object.is_subscribed::<Recorder>(MessageType::Damage));
        assert!(!object.remove_component::<Recorder>());
        assert!(!object.remove_component::<Transform>());

        world.add_component(id, Recorder::new("msg", &journal));
        assert_eq!(world.send_message(id, &Message::new(MessageType::Damage)), 0);
    }

    #[test]
    fn test_typed_payload_reaches_handler() {
        #[derive(Clone, Default)]
        struct DamageTaken(f32);

        impl Component for DamageTaken {
            fn on_message(&mut self, _ctx: &mut ComponentContext<'_>, message: &Message) {
                self.0 += message.payload::<f32>().unwrap_or_default();
            }
        }

        let mut world = World::new(0);
        let id = world.create_game_object("Target", None);
        world.add_component(id, DamageTaken::default());
        world.get_mut(id).unwrap().subscribe::<DamageTaken>(MessageType::Damage);

        world.send_message(id, &Message::with_payload(MessageType::Damage, &12.5_f32));
        world.send_message(id, &Message::with_payload(MessageType::Damage, &2.5_f32));

        assert!((world.get_component::<DamageTaken>(id).unwrap().0 - 15.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_scene_update_order_and_deferred_destroy() {
        let journal = Journal::default();
        let mut manager = SceneManager::new();
        let index = manager
            .create_scene_with(
                "Main",
                Hooks {
                    journal: journal.clone(),
                },
            )
            .unwrap();
        manager.set_active_scene(index).unwrap();

        let scene = manager.active_scene_mut().unwrap();
        let first = scene.create_game_object("First", None);
        let second = scene.create_game_object("Second", None);
        let doomed = scene.create_game_object("Doomed", None);
        scene.world_mut().add_component(first, Recorder::new("update", &journal));
        scene.world_mut().add_component(second, Recorder::new("update", &journal));
        scene.world_mut().add_component(doomed, SelfDestruct);

        manager.update(0.016);

        assert_eq!(*journal.lock().unwrap(), vec!["pre", "update:First", "update:Second", "post"]);
        let world = manager.active_scene().unwrap().world();
        assert!(!world.contains(doomed));
        assert!(world.contains(first));
    }

    #[test]
    fn test_inactive_scene_is_not_updated() {
        let journal = Journal::default();
        let mut manager = SceneManager::new();
        let index = manager.create_scene::<EmptyScene>("Paused").unwrap();
        manager.set_active_scene(index).unwrap();
        let scene = manager.active_scene_mut().unwrap();
        let id = scene.create_game_object("G", None);
        scene.world_mut().add_component(id, Recorder::new("update", &journal));
        scene.set_active(false);

        manager.update(0.016);
        assert!(journal.lock().unwrap().is_empty());

        manager.active_scene_mut().unwrap().set_active(true);
        manager.update(0.016);
        assert_eq!(journal.lock().unwrap().len(), 1);
    }
}
