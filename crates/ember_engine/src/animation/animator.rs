//! Animator component: named clip states with a single current clip

use std::collections::HashMap;
use std::sync::Arc;

use crate::ecs::{Component, ComponentContext, GameObjectId};

use super::clip::{AnimationClip, BonePose, PoseSink};
use super::state::AnimationState;

/// Plays one of its named clips onto bound bone transforms
///
/// Bone indices in the clip curves are resolved to game objects through the
/// animator's bindings; unbound bones are skipped. Cloning deep-copies the
/// states while the clips themselves stay shared.
#[derive(Debug, Clone, Default)]
pub struct Animator {
    states: HashMap<String, AnimationState>,
    current: Option<String>,
    bindings: HashMap<usize, GameObjectId>,
}

impl Animator {
    /// Animator without clips or bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `clip` under `name`
    ///
    /// Fails if the name is taken. The clip does not start playing.
    pub fn add_clip(&mut self, clip: Arc<AnimationClip>, name: &str) -> bool {
        if self.states.contains_key(name) {
            log::warn!("Animator: clip '{name}' already registered");
            return false;
        }
        self.states.insert(name.to_string(), AnimationState::new(clip));
        true
    }

    /// Make `name` the current clip, restarting it from tick zero
    ///
    /// Playing the clip that is already current changes nothing.
    pub fn play(&mut self, name: &str) {
        if self.current.as_deref() == Some(name) {
            return;
        }
        let Some(state) = self.states.get_mut(name) else {
            log::warn!("Animator: cannot play unknown clip '{name}'");
            return;
        };
        state.reset();
        self.current = Some(name.to_string());
        log::debug!("Animator: playing '{name}'");
    }

    /// Stop playback without forgetting any clip
    pub fn stop(&mut self) {
        self.current = None;
    }

    /// Forget the clip registered under `name`
    ///
    /// Removing the current clip stops playback.
    pub fn remove_clip(&mut self, name: &str) -> bool {
        if self.states.remove(name).is_none() {
            return false;
        }
        if self.current.as_deref() == Some(name) {
            log::debug!("Animator: removed the playing clip '{name}'");
            self.current = None;
        }
        true
    }

    /// Whether a clip is current
    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }

    /// Name of the current clip
    pub fn current_clip(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Playback state of a registered clip
    pub fn state(&self, name: &str) -> Option<&AnimationState> {
        self.states.get(name)
    }

    /// Mutable playback state of a registered clip
    pub fn state_mut(&mut self, name: &str) -> Option<&mut AnimationState> {
        self.states.get_mut(name)
    }

    /// Number of registered clips
    pub fn clip_count(&self) -> usize {
        self.states.len()
    }

    /// Bind bone `index` to the game object whose transform it drives
    pub fn bind_bone(&mut self, index: usize, target: GameObjectId) {
        self.bindings.insert(index, target);
    }

    /// Replace all bone bindings
    pub fn set_bindings(&mut self, bindings: HashMap<usize, GameObjectId>) {
        self.bindings = bindings;
    }

    /// Current bone bindings
    pub fn bindings(&self) -> &HashMap<usize, GameObjectId> {
        &self.bindings
    }
}

struct TransformWriter<'a, 'w> {
    ctx: &'a mut ComponentContext<'w>,
    bindings: &'a HashMap<usize, GameObjectId>,
}

impl PoseSink for TransformWriter<'_, '_> {
    fn apply_pose(&mut self, pose: &BonePose) {
        let Some(target) = self.bindings.get(&pose.bone) else {
            log::trace!("Animator: bone {} is not bound", pose.bone);
            return;
        };
        let Some(transform) = self.ctx.transform_of_mut(*target) else {
            log::trace!("Animator: bone {} target {target:?} is gone", pose.bone);
            return;
        };
        if let Some(translation) = pose.translation {
            transform.position = translation;
        }
        if let Some(rotation) = pose.rotation {
            transform.rotation = rotation;
        }
        if let Some(scale) = pose.scale {
            transform.scale = scale;
        }
    }
}

impl Component for Animator {
    fn update(&mut self, ctx: &mut ComponentContext<'_>, delta_time: f32) {
        let Some(current) = self.current.as_deref() else {
            return;
        };
        let Some(state) = self.states.get_mut(current) else {
            return;
        };
        let mut writer = TransformWriter {
            ctx,
            bindings: &self.bindings,
        };
        state.update(delta_time, &mut writer);
    }

    fn remap_references(&mut self, mapping: &HashMap<GameObjectId, GameObjectId>) {
        for target in self.bindings.values_mut() {
            if let Some(copy) = mapping.get(target) {
                *target = *copy;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::clip::TransformCurve;
    use crate::animation::curve::{AnimationCurve, Interpolation, KeyFrame};
    use crate::ecs::World;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    fn translation_clip(name: &str, bone: usize, to: Vec3) -> Arc<AnimationClip> {
        let mut curve = TransformCurve::new(bone);
        curve.translation = AnimationCurve::from_keys(
            vec![KeyFrame::new(0.0, Vec3::zeros()), KeyFrame::new(1.0, to)],
            Interpolation::Linear,
        );
        Arc::new(AnimationClip::new(name, 0.0, 1.0, true, 1.0).with_curve(curve))
    }

    #[test]
    fn test_add_clip_rejects_duplicates() {
        let mut animator = Animator::new();
        assert!(animator.add_clip(translation_clip("A", 0, Vec3::x()), "A"));
        assert!(!animator.add_clip(translation_clip("A", 0, Vec3::y()), "A"));
        assert_eq!(animator.clip_count(), 1);
        assert!(!animator.is_playing());
    }

    #[test]
    fn test_play_same_clip_keeps_time() {
        let mut animator = Animator::new();
        animator.add_clip(translation_clip("A", 0, Vec3::x()), "A");
        animator.play("A");
        animator.state_mut("A").unwrap().set_time(0.4);

        animator.play("A");
        assert_relative_eq!(animator.state("A").unwrap().time(), 0.4);
    }

    #[test]
    fn test_play_unknown_clip_is_ignored() {
        let mut animator = Animator::new();
        animator.play("Missing");
        assert!(!animator.is_playing());
    }

    #[test]
    fn test_switching_resets_time() {
        let mut animator = Animator::new();
        animator.add_clip(translation_clip("A", 0, Vec3::x()), "A");
        animator.add_clip(translation_clip("B", 0, Vec3::y()), "B");
        animator.play("B");
        animator.state_mut("B").unwrap().set_time(0.7);
        animator.play("A");
        animator.play("B");
        assert_relative_eq!(animator.state("B").unwrap().time(), 0.0);
    }

    #[test]
    fn test_remove_current_clip_stops_playback() {
        let mut animator = Animator::new();
        animator.add_clip(translation_clip("A", 0, Vec3::x()), "A");
        animator.play("A");

        assert!(animator.remove_clip("A"));
        assert!(!animator.is_playing());
        assert!(!animator.remove_clip("A"));
    }

    #[test]
    fn test_only_current_clip_drives_bones() {
        let mut world = World::new(0);
        let rig = world.create_game_object("Rig", None);
        let bone_a = world.create_game_object("BoneA", Some(rig));
        let bone_b = world.create_game_object("BoneB", Some(rig));

        let mut animator = Animator::new();
        animator.add_clip(translation_clip("A", 0, Vec3::new(2.0, 0.0, 0.0)), "A");
        animator.add_clip(translation_clip("B", 1, Vec3::new(0.0, 4.0, 0.0)), "B");
        animator.bind_bone(0, bone_a);
        animator.bind_bone(1, bone_b);
        animator.play("A");
        animator.play("B");
        world.add_component(rig, animator);

        world.update(0.5);

        let a = world.get(bone_a).unwrap().transform().position;
        let b = world.get(bone_b).unwrap().transform().position;
        assert_relative_eq!(a, Vec3::zeros());
        assert_relative_eq!(b, Vec3::new(0.0, 2.0, 0.0), epsilon = 1e-6);
        let animator = world.get_component::<Animator>(rig).unwrap();
        assert_eq!(animator.current_clip(), Some("B"));
        assert_relative_eq!(animator.state("A").unwrap().time(), 0.0);
    }

    #[test]
    fn test_clone_preserves_current_and_shares_clips() {
        let mut animator = Animator::new();
        let clip = translation_clip("A", 0, Vec3::x());
        animator.add_clip(clip.clone(), "A");
        animator.play("A");
        animator.state_mut("A").unwrap().set_time(0.3);

        let copy = animator.clone();
        animator.state_mut("A").unwrap().set_time(0.9);

        assert_eq!(copy.current_clip(), Some("A"));
        assert_relative_eq!(copy.state("A").unwrap().time(), 0.3);
        assert!(Arc::ptr_eq(copy.state("A").unwrap().clip(), &clip));
    }
}
