//! Skinned arm demo
//!
//! Builds a three-bone arm, imports a looping "Wave" clip and runs the engine
//! headless for a few seconds, logging the palette as the arm moves.
//!
//! Usage: `skinned_arm [config.toml|config.ron]`

use std::sync::Arc;

use ember_engine::animation::{SkinnedMeshRenderer, SkinningError};
use ember_engine::foundation::logging;
use ember_engine::prelude::*;
use thiserror::Error;

const WAVE_CLIP: &str = r#"
    (
        name: "Wave",
        end_time: 50.0,
        looping: true,
        channels: [
            (
                bone: "UpperArm",
                rotation: [
                    (time: 0.0, value: (0.0, 0.0, 0.0, 1.0)),
                    (time: 25.0, value: (0.0, 0.0, 0.3826834, 0.9238795)),
                    (time: 50.0, value: (0.0, 0.0, 0.0, 1.0)),
                ],
            ),
            (
                bone: "Forearm",
                translation: [
                    (time: 0.0, value: (0.0, 2.0, 0.0)),
                    (time: 50.0, value: (0.0, 2.0, 0.0)),
                ],
                rotation: [
                    (time: 0.0, value: (0.0, 0.0, 0.0, 1.0)),
                    (time: 25.0, value: (0.0, 0.0, 0.7071068, 0.7071068)),
                    (time: 50.0, value: (0.0, 0.0, 0.0, 1.0)),
                ],
            ),
            (
                bone: "Hand",
                translation: [
                    (time: 0.0, value: (0.0, 1.5, 0.0)),
                    (time: 50.0, value: (0.0, 1.5, 0.0)),
                ],
            ),
        ],
    )
"#;

const FRAMES: u64 = 180;
const FRAME_TIME: f32 = 1.0 / 60.0;

#[derive(Error, Debug)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] ember_engine::config::ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Logs the arm pose once a second
#[derive(Debug, Clone)]
struct PoseReporter {
    hand: GameObjectId,
    mesh: GameObjectId,
    elapsed: f32,
}

impl Component for PoseReporter {
    fn update(&mut self, ctx: &mut ComponentContext<'_>, delta_time: f32) {
        self.elapsed += delta_time;
        if self.elapsed < 1.0 {
            return;
        }
        self.elapsed -= 1.0;

        let world = ctx.world();
        let bones = world
            .get_component::<SkinnedMeshRenderer>(self.mesh)
            .map_or(0, SkinnedMeshRenderer::bone_count);
        if let Some(hand) = world.world_position(self.hand) {
            log::info!(
                "hand at ({:.2}, {:.2}, {:.2}), {bones} palette entries",
                hand.x,
                hand.y,
                hand.z
            );
        }
    }
}

#[derive(Default)]
struct SkinnedArmApp {
    hand: Option<GameObjectId>,
}

impl SkinnedArmApp {
    fn build_arm(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        let default_rate = engine.config().animation.default_ticks_per_second;
        let uniform = engine.config().animation.palette_uniform.clone();

        let index = engine.scenes_mut().create_scene::<EmptyScene>("SkinnedArm")?;
        engine.scenes_mut().set_active_scene(index)?;
        let scene = engine
            .scenes_mut()
            .active_scene_mut()
            .ok_or_else(|| AppError::Custom("active scene missing".to_string()))?;

        let rig = scene.create_game_object("ArmRig", None);
        let upper_arm = scene.create_game_object("UpperArm", Some(rig));
        let forearm = scene.create_game_object("Forearm", Some(upper_arm));
        let hand = scene.create_game_object("Hand", Some(forearm));
        let mesh = scene.create_game_object("ArmMesh", None);
        let monitor = scene.create_game_object("Monitor", None);

        let mut bones = BoneTable::new();
        let clip = ClipDescription::from_ron_str(WAVE_CLIP)?.build(&mut bones, default_rate)?;
        log::info!(
            "Loaded clip '{}' ({:.2}s, {} bones)",
            clip.name(),
            clip.duration() / clip.ticks_per_second(),
            bones.len()
        );

        let mut animator = Animator::new();
        animator.add_clip(Arc::new(clip), "Wave");
        animator.set_bindings(bones.bind_hierarchy(scene.world(), rig));
        animator.play("Wave");

        let world = scene.world_mut();
        world.add_component(rig, animator);
        world.add_component(mesh, SkinnedMeshRenderer::new(upper_arm).with_uniform_name(uniform));
        world.add_component(
            monitor,
            PoseReporter {
                hand,
                mesh,
                elapsed: 0.0,
            },
        );

        self.hand = Some(hand);
        Ok(())
    }
}

impl Application for SkinnedArmApp {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        self.build_arm(engine)
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        let Some(hand) = self.hand else {
            return;
        };
        let position = engine
            .scenes()
            .active_scene()
            .and_then(|scene| scene.world().world_position(hand));
        if let Some(position) = position {
            log::info!("Final hand position: {position:?}");
        }
        if let Err(e) = check_palette(engine) {
            log::error!("Palette check failed: {e}");
        }
    }
}

fn check_palette(engine: &Engine) -> Result<(), SkinningError> {
    let Some(scene) = engine.scenes().active_scene() else {
        return Ok(());
    };
    let world = scene.world();
    let Some(mesh) = world.find("ArmMesh") else {
        return Ok(());
    };
    let Some(renderer) = world.get_component::<SkinnedMeshRenderer>(mesh) else {
        return Ok(());
    };
    let Some(root) = renderer.root_bone() else {
        return Ok(());
    };
    let reference = world.local_to_world_matrix(mesh).unwrap_or_else(Mat4::identity);
    let mut palette = vec![Mat4::identity(); renderer.bone_count()];
    let mut index = 0;
    ember_engine::animation::build_matrix_palette(world, &reference, root, &mut index, &mut palette)?;
    log::debug!("Palette rebuilt with {index} entries");
    Ok(())
}

fn load_config() -> Result<ApplicationConfig, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => Ok(ApplicationConfig::load_from_file(&path)?),
        None => Ok(ApplicationConfig::default()),
    }
}

fn main() -> Result<(), DemoError> {
    let config = load_config()?;
    logging::init_with_level(&config.engine.log_level);

    log::info!("Starting skinned arm demo");
    let mut engine = Engine::headless(config)?;
    engine.run_frames(&mut SkinnedArmApp::default(), FRAMES, FRAME_TIME)?;
    Ok(())
}
