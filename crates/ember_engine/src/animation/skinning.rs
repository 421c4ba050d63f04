//! Matrix-palette skinning
//!
//! The palette holds one matrix per bone, in pre-order of the bone hierarchy
//! below the root bone. Each entry is the bone's world-to-local matrix composed
//! with a single reference matrix; children are not chained through their
//! parents' entries.

use std::collections::HashMap;

use thiserror::Error;

use crate::ecs::{Component, ComponentContext, GameObjectId, RenderContext, World, WorldError};
use crate::foundation::math::Mat4;

/// Maximum number of bones a palette holds
pub const MAX_BONES: usize = 64;

/// Shader uniform receiving the palette
pub const BONE_PALETTE_UNIFORM: &str = "u_boneMatrices";

/// Palette construction failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkinningError {
    /// The hierarchy has more bones than the palette holds
    #[error("bone hierarchy exceeds palette capacity of {capacity}")]
    PaletteOverflow {
        /// Palette capacity
        capacity: usize,
    },

    /// A bone could not be resolved or inverted
    #[error(transparent)]
    World(#[from] WorldError),
}

/// Write the palette entries for `node` and its descendants
///
/// Entries go to `palette[*index..]` in pre-order and `index` is left one
/// past the last written slot. Every entry is
/// `world_to_local(bone) * parent_matrix` with the same `parent_matrix` at
/// every depth.
pub fn build_matrix_palette(
    world: &World,
    parent_matrix: &Mat4,
    node: GameObjectId,
    index: &mut usize,
    palette: &mut [Mat4],
) -> Result<(), SkinningError> {
    let object = world.get(node).ok_or(WorldError::UnknownGameObject(node))?;
    let capacity = palette.len();
    let slot = palette
        .get_mut(*index)
        .ok_or(SkinningError::PaletteOverflow { capacity })?;
    *slot = world.world_to_local_matrix(node)? * parent_matrix;
    *index += 1;

    for child in object.children() {
        build_matrix_palette(world, parent_matrix, *child, index, palette)?;
    }
    Ok(())
}

/// Uploads the bone palette of a skeleton every frame
///
/// The palette is rebuilt in `update` from the current bone transforms, using
/// the owner's local-to-world matrix as the reference. Place the animator on
/// an object created before this renderer's owner so bones are posed first.
#[derive(Debug, Clone)]
pub struct SkinnedMeshRenderer {
    root_bone: Option<GameObjectId>,
    palette: Box<[Mat4; MAX_BONES]>,
    bone_count: usize,
    uniform_name: String,
}

impl SkinnedMeshRenderer {
    /// Renderer for the skeleton rooted at `root_bone`
    pub fn new(root_bone: GameObjectId) -> Self {
        Self {
            root_bone: Some(root_bone),
            ..Self::default()
        }
    }

    /// Upload under a different uniform name
    pub fn with_uniform_name(mut self, name: impl Into<String>) -> Self {
        self.uniform_name = name.into();
        self
    }

    /// Root of the bone hierarchy
    pub fn root_bone(&self) -> Option<GameObjectId> {
        self.root_bone
    }

    /// Change the skeleton
    pub fn set_root_bone(&mut self, root_bone: Option<GameObjectId>) {
        self.root_bone = root_bone;
    }

    /// Number of valid palette entries
    pub fn bone_count(&self) -> usize {
        self.bone_count
    }

    /// The valid palette entries
    pub fn palette(&self) -> &[Mat4] {
        &self.palette[..self.bone_count]
    }

    /// Uniform the palette is uploaded under
    pub fn uniform_name(&self) -> &str {
        &self.uniform_name
    }

    /// Rebuild the palette against `reference`
    pub fn rebuild(&mut self, world: &World, reference: &Mat4) -> Result<usize, SkinningError> {
        self.bone_count = 0;
        let Some(root) = self.root_bone else {
            return Ok(0);
        };
        let mut index = 0;
        let result = build_matrix_palette(world, reference, root, &mut index, &mut self.palette[..]);
        self.bone_count = index;
        result.map(|()| index)
    }
}

impl Default for SkinnedMeshRenderer {
    fn default() -> Self {
        Self {
            root_bone: None,
            palette: Box::new([Mat4::identity(); MAX_BONES]),
            bone_count: 0,
            uniform_name: BONE_PALETTE_UNIFORM.to_string(),
        }
    }
}

impl Component for SkinnedMeshRenderer {
    fn update(&mut self, ctx: &mut ComponentContext<'_>, _delta_time: f32) {
        let Some(reference) = ctx.local_to_world_matrix(ctx.owner()) else {
            return;
        };
        if let Err(e) = self.rebuild(ctx.world(), &reference) {
            log::error!("SkinnedMeshRenderer: {e}");
        }
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>) {
        if self.bone_count == 0 {
            return;
        }
        if let Err(e) = ctx
            .renderer()
            .set_uniform_mat4_array(&self.uniform_name, &self.palette[..self.bone_count])
        {
            log::warn!("SkinnedMeshRenderer: palette upload failed: {e}");
        }
    }

    fn remap_references(&mut self, mapping: &HashMap<GameObjectId, GameObjectId>) {
        if let Some(root) = self.root_bone.as_mut() {
            if let Some(copy) = mapping.get(root) {
                *root = *copy;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Transform;
    use crate::foundation::math::{checked_inverse, Vec3};
    use crate::render::UniformRecorder;
    use approx::assert_relative_eq;

    fn place(world: &mut World, id: GameObjectId, position: Vec3) {
        if let Some(object) = world.get_mut(id) {
            *object.transform_mut() = Transform::from_position(position);
        }
    }

    /// Root -> ChildA -> ChildB, plus ChildC under Root
    fn skeleton(world: &mut World) -> [GameObjectId; 4] {
        let root = world.create_game_object("Root", None);
        let a = world.create_game_object("ChildA", Some(root));
        let b = world.create_game_object("ChildB", Some(a));
        let c = world.create_game_object("ChildC", Some(root));
        place(world, root, Vec3::new(1.0, 0.0, 0.0));
        place(world, a, Vec3::new(0.0, 2.0, 0.0));
        place(world, b, Vec3::new(0.0, 0.0, 3.0));
        place(world, c, Vec3::new(-4.0, 0.0, 0.0));
        [root, a, b, c]
    }

    #[test]
    fn test_palette_is_preorder() {
        let mut world = World::new(0);
        let [root, a, b, c] = skeleton(&mut world);
        let mut palette = [Mat4::identity(); MAX_BONES];
        let mut index = 0;

        build_matrix_palette(&world, &Mat4::identity(), root, &mut index, &mut palette).unwrap();

        assert_eq!(index, 4);
        for (slot, bone) in [root, a, b, c].into_iter().enumerate() {
            let expected = world.world_to_local_matrix(bone).unwrap();
            assert_relative_eq!(palette[slot], expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_every_depth_uses_the_same_reference() {
        let mut world = World::new(0);
        let [root, a, b, _] = skeleton(&mut world);
        let reference = Mat4::new_translation(&Vec3::new(0.0, 0.0, 10.0));
        let mut palette = [Mat4::identity(); MAX_BONES];
        let mut index = 0;

        build_matrix_palette(&world, &reference, root, &mut index, &mut palette).unwrap();

        let b_world = world.local_to_world_matrix(b).unwrap();
        let a_entry = world.world_to_local_matrix(a).unwrap() * reference;
        assert_relative_eq!(palette[1], a_entry, epsilon = 1e-6);
        assert_relative_eq!(palette[2], checked_inverse(&b_world).unwrap() * reference, epsilon = 1e-6);
    }

    #[test]
    fn test_overflow_is_reported() {
        let mut world = World::new(0);
        let [root, ..] = skeleton(&mut world);
        let mut palette = [Mat4::identity(); 2];
        let mut index = 0;

        let result = build_matrix_palette(&world, &Mat4::identity(), root, &mut index, &mut palette);

        assert_eq!(result, Err(SkinningError::PaletteOverflow { capacity: 2 }));
        assert_eq!(index, 2);
    }

    #[test]
    fn test_update_and_render_upload_palette() {
        let mut world = World::new(0);
        let [root, ..] = skeleton(&mut world);
        let mesh = world.create_game_object("Mesh", None);
        world.add_component(mesh, SkinnedMeshRenderer::new(root));

        world.update(0.016);
        let mut recorder = UniformRecorder::new();
        world.render(&mut recorder);

        let renderer = world.get_component::<SkinnedMeshRenderer>(mesh).unwrap();
        assert_eq!(renderer.bone_count(), 4);
        let uploaded = recorder.mat4_array(BONE_PALETTE_UNIFORM).unwrap();
        assert_eq!(uploaded.len(), 4);
        assert_relative_eq!(uploaded[0], world.world_to_local_matrix(root).unwrap(), epsilon = 1e-6);
    }

    #[test]
    fn test_without_root_nothing_is_uploaded() {
        let mut world = World::new(0);
        let mesh = world.create_game_object("Mesh", None);
        world.add_component(mesh, SkinnedMeshRenderer::default());

        world.update(0.016);
        let mut recorder = UniformRecorder::new();
        world.render(&mut recorder);

        assert_eq!(recorder.upload_count(), 0);
    }
}
