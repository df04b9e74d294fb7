use std::collections::VecDeque;

use glam::Vec2;
use jenga_common::{BlockId, Pose};
use jenga_input::{InputEvent, KeyBindings};
use jenga_physics::{BodyDesc, BodyHandle, BoxWorld, PhysicsBackend, RigidBody};
use jenga_render::{Intersection, Material, Node, NodeHandle, RenderView, Scene, TABLE_COLOR};
use jenga_tower::TowerConfig;
use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::config::{FIXED_TIMESTEP, JengaConfig, TABLE_HALF_EXTENT};
use crate::control::{ControlOutcome, ManualControl};
use crate::error::KernelError;
use crate::pick::{first_block, resolve_pick};
use crate::selection::Selection;
use crate::sync::{SyncDirection, reconcile};
use crate::tower::Tower;

/// A record of every selection change and frame, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// The tower was (re)built with this many blocks.
    TowerBuilt { blocks: usize },
    /// Manual control moved to `id`.
    Controlled {
        id: BlockId,
        previous: Option<BlockId>,
    },
    /// `id` was handed back to physics.
    Released { id: BlockId },
    HoverChanged {
        from: Option<BlockId>,
        to: Option<BlockId>,
    },
    /// A frame finished; `controlled` is the block held during it.
    FrameStepped {
        frame: u64,
        controlled: Option<BlockId>,
    },
}

/// What one call to [`JengaWorld::frame`] did.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Frame number after this frame.
    pub frame: u64,
    /// Controlled block at the start of the frame.
    pub controlled: Option<BlockId>,
    /// Sync direction per block, in tower order. `None` marks a block whose
    /// copy failed this frame.
    pub directions: Vec<Option<SyncDirection>>,
}

/// Owner of the tower, both engines and the selection.
///
/// Input is queued with [`push_input`](Self::push_input) and only takes effect
/// at the start of the next [`frame`](Self::frame), so the frame always sees a
/// settled selection.
#[derive(Debug)]
pub struct JengaWorld<P: PhysicsBackend = BoxWorld> {
    config: JengaConfig,
    physics: P,
    scene: Scene,
    tower: Tower,
    selection: Selection,
    control: ManualControl,
    view: RenderView,
    inputs: VecDeque<InputEvent>,
    frame: u64,
    ground: BodyHandle,
    table: NodeHandle,
    event_log: Vec<WorldEvent>,
}

impl JengaWorld<BoxWorld> {
    /// Set up everything: physics with ground, scene with table, tower, idle selection.
    pub fn new(config: JengaConfig) -> Self {
        Self::with_backend(config, BoxWorld::new(config.physics))
    }
}

impl<P: PhysicsBackend> JengaWorld<P> {
    /// Like [`JengaWorld::new`] on a caller-supplied physics backend. The
    /// backend is cleared first.
    pub fn with_backend(config: JengaConfig, mut physics: P) -> Self {
        physics.clear();
        let ground = physics.add_body(BodyDesc::ground(config.table_height));

        let mut scene = Scene::new(config.scene);
        let table = scene.add(Node::plane(
            TABLE_HALF_EXTENT,
            config.table_height,
            Material::new(TABLE_COLOR),
        ));

        let mut world = Self {
            config,
            physics,
            scene,
            tower: Tower::default(),
            selection: Selection::default(),
            control: ManualControl::default(),
            view: RenderView::default(),
            inputs: VecDeque::new(),
            frame: 0,
            ground,
            table,
            event_log: Vec::new(),
        };
        world.build_tower();
        world
    }

    fn build_tower(&mut self) {
        self.tower = Tower::build(&self.config.tower, &mut self.physics, &mut self.scene);
        tracing::info!(
            blocks = self.tower.len(),
            seed = self.config.tower.seed,
            "tower built"
        );
        self.event_log.push(WorldEvent::TowerBuilt {
            blocks: self.tower.len(),
        });
    }

    /// Tear the whole tower down and stack it again. Selection goes idle and
    /// queued input is dropped.
    pub fn reset(&mut self) {
        self.tower.teardown(&mut self.physics, &mut self.scene);
        self.selection.reset();
        self.inputs.clear();
        self.frame = 0;
        self.build_tower();
    }

    /// Reset with a different tower configuration.
    pub fn rebuild(&mut self, tower: TowerConfig) {
        self.config.tower = tower;
        self.reset();
    }

    pub fn config(&self) -> &JengaConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn tower(&self) -> &Tower {
        &self.tower
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.control.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.control.bindings
    }

    pub fn view(&self) -> &RenderView {
        &self.view
    }

    /// Camera used to resolve pointer input.
    pub fn set_view(&mut self, view: RenderView) {
        self.view = view;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn ground(&self) -> BodyHandle {
        self.ground
    }

    pub fn table(&self) -> NodeHandle {
        self.table
    }

    pub fn block(&self, id: BlockId) -> Result<&Block, KernelError> {
        self.tower.get(id).ok_or(KernelError::UnknownBlock(id))
    }

    pub fn visual_pose(&self, id: BlockId) -> Result<Pose, KernelError> {
        let block = self.block(id)?;
        block
            .visual_pose(&self.scene)
            .ok_or(KernelError::UnknownBlock(id))
    }

    pub fn body(&self, id: BlockId) -> Result<&RigidBody, KernelError> {
        let block = self.block(id)?;
        self.physics
            .body(block.body)
            .ok_or(KernelError::UnknownBlock(id))
    }

    /// Queue input for the next frame.
    pub fn push_input(&mut self, event: InputEvent) {
        self.inputs.push_back(event);
    }

    pub fn pending_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Block under the pointer at `ndc` with the current view.
    pub fn pick(&self, ndc: Vec2) -> Option<BlockId> {
        resolve_pick(&self.scene, &self.view, ndc, self.tower.len())
    }

    /// Take control of `id` directly, as a click on it would.
    pub fn select(&mut self, id: BlockId) -> Result<(), KernelError> {
        if !self.tower.contains(id) {
            return Err(KernelError::UnknownBlock(id));
        }
        self.apply_click(Some(id));
        Ok(())
    }

    /// Hand the controlled block back to physics. No-op while idle.
    pub fn release(&mut self) {
        let touched = self.selection.release();
        self.selection
            .apply_highlights(&touched, &self.tower, &mut self.scene);
        if let Some(&id) = touched.first() {
            self.event_log.push(WorldEvent::Released { id });
        }
    }

    /// Resolve a click from a hit list the host cast itself.
    pub fn click_hits(&mut self, hits: &[Intersection]) {
        let pick = first_block(hits, self.tower.len());
        self.apply_click(pick);
    }

    fn apply_click(&mut self, pick: Option<BlockId>) {
        let pick = pick.filter(|id| self.tower.contains(*id));
        let previous = self.selection.controlled();
        let touched = self.selection.click(pick);
        self.selection
            .apply_highlights(&touched, &self.tower, &mut self.scene);
        if let Some(id) = pick {
            self.event_log.push(WorldEvent::Controlled { id, previous });
        }
    }

    fn apply_hover(&mut self, pick: Option<BlockId>) {
        let pick = pick.filter(|id| self.tower.contains(*id));
        let from = self.selection.hovered();
        let touched = self.selection.hover(pick);
        if touched.is_empty() {
            return;
        }
        self.selection
            .apply_highlights(&touched, &self.tower, &mut self.scene);
        self.event_log.push(WorldEvent::HoverChanged { from, to: pick });
    }

    fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMoved(ndc) => self.apply_hover(self.pick(ndc)),
            InputEvent::PointerClicked(ndc) => self.apply_click(self.pick(ndc)),
            InputEvent::KeyDown(key) => self.selection.key_down(key),
            InputEvent::KeyUp(key) => self.selection.key_up(key),
        }
    }

    /// Run one frame of the sync loop.
    ///
    /// Order: queued input, snapshot of the controlled block, one fixed physics
    /// step, manual control (which may release), reconciliation against the
    /// snapshot.
    pub fn frame(&mut self) -> FrameReport {
        let _span = tracing::trace_span!("frame", frame = self.frame).entered();

        while let Some(event) = self.inputs.pop_front() {
            self.handle_input(event);
        }

        let controlled = self.selection.controlled();
        self.physics.step(FIXED_TIMESTEP);

        let outcome = self
            .control
            .apply(&self.selection, &self.tower, &mut self.scene);
        if outcome == ControlOutcome::ReleaseRequested {
            self.release();
        }

        let directions = reconcile(&self.tower, controlled, &mut self.physics, &mut self.scene);

        self.frame += 1;
        self.event_log.push(WorldEvent::FrameStepped {
            frame: self.frame,
            controlled,
        });
        FrameReport {
            frame: self.frame,
            controlled,
            directions,
        }
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Deterministic hash of the frame counter, selection and every block's
    /// node and body poses.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        let mix_pose = |h: &mut u64, pose: Pose| {
            for v in pose.position.to_array() {
                mix(h, &v.to_le_bytes());
            }
            for v in pose.rotation.to_array() {
                mix(h, &v.to_le_bytes());
            }
        };
        mix(&mut h, &self.frame.to_le_bytes());
        let controlled = self.selection.controlled().map_or(u64::MAX, |id| id.0 as u64);
        mix(&mut h, &controlled.to_le_bytes());
        for block in self.tower.iter() {
            mix(&mut h, &(block.id.0 as u64).to_le_bytes());
            if let Some(pose) = block.visual_pose(&self.scene) {
                mix_pose(&mut h, pose);
            }
            if let Some(pose) = block.physics_pose(&self.physics) {
                mix_pose(&mut h, pose);
            }
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use jenga_input::{ControlAction, Key};
    use jenga_render::HIGHLIGHT_EMISSIVE;
    use proptest::prelude::*;

    fn small() -> JengaWorld {
        JengaWorld::new(JengaConfig::default().with_blocks(9))
    }

    /// Camera looking at the middle of course 0 from the front.
    fn front_view() -> RenderView {
        RenderView {
            eye: Vec3::new(0.0, 0.0, 40.0),
            target: Vec3::new(0.0, 0.0, 2.4),
            ..RenderView::default()
        }
    }

    fn emissive(world: &JengaWorld, id: usize) -> [f32; 3] {
        let block = world.block(BlockId(id)).unwrap();
        world.scene().get(block.visual).unwrap().material.emissive
    }

    #[test]
    fn mount_sets_everything_up() {
        let world = JengaWorld::new(JengaConfig::default());
        assert_eq!(world.tower().len(), 54);
        // blocks plus ground
        assert_eq!(world.physics().body_count(), 55);
        // blocks plus table
        assert_eq!(world.scene().len(), 55);
        assert_eq!(world.selection().controlled(), None);
        assert_eq!(world.events(), &[WorldEvent::TowerBuilt { blocks: 54 }]);
    }

    #[test]
    fn zero_blocks_is_an_empty_tower() {
        let mut world = JengaWorld::new(JengaConfig::default().with_blocks(0));
        assert!(world.tower().is_empty());
        let report = world.frame();
        assert!(report.directions.is_empty());
    }

    #[test]
    fn click_through_the_view_takes_control() {
        let mut world = small();
        world.set_view(front_view());
        world.push_input(InputEvent::PointerClicked(Vec2::ZERO));
        assert_eq!(world.selection().controlled(), None);

        world.frame();
        assert_eq!(world.selection().controlled(), Some(BlockId(1)));
        assert_eq!(emissive(&world, 1), HIGHLIGHT_EMISSIVE);
    }

    #[test]
    fn click_on_nothing_changes_nothing() {
        let mut world = small();
        world.set_view(front_view());
        world.push_input(InputEvent::PointerClicked(Vec2::new(0.0, 0.95)));
        world.frame();
        assert_eq!(world.selection().controlled(), None);
        assert!(
            !world
                .events()
                .iter()
                .any(|e| matches!(e, WorldEvent::Controlled { .. }))
        );
    }

    #[test]
    fn block_zero_is_selectable() {
        let mut world = small();
        world.select(BlockId(0)).unwrap();
        assert_eq!(world.selection().controlled(), Some(BlockId(0)));
        assert!(matches!(
            world.select(BlockId(9)),
            Err(KernelError::UnknownBlock(BlockId(9)))
        ));
    }

    #[test]
    fn hover_lights_and_unlights() {
        let mut world = small();
        world.set_view(front_view());
        world.push_input(InputEvent::PointerMoved(Vec2::ZERO));
        world.frame();
        assert_eq!(world.selection().hovered(), Some(BlockId(1)));
        assert_eq!(emissive(&world, 1), HIGHLIGHT_EMISSIVE);

        world.push_input(InputEvent::PointerMoved(Vec2::new(0.0, 0.95)));
        world.frame();
        assert_eq!(world.selection().hovered(), None);
        assert_ne!(emissive(&world, 1), HIGHLIGHT_EMISSIVE);
    }

    #[test]
    fn held_key_moves_block_and_body_follows() {
        let mut world = small();
        world.select(BlockId(4)).unwrap();
        let start = world.visual_pose(BlockId(4)).unwrap();
        world.push_input(InputEvent::KeyDown(Key::Space));
        for _ in 0..10 {
            world.frame();
        }
        let visual = world.visual_pose(BlockId(4)).unwrap();
        assert!((visual.position.y - start.position.y - 1.0).abs() < 1e-4);
        let body = world.body(BlockId(4)).unwrap();
        assert_eq!(body.pose(), visual);
        assert_eq!(body.velocity, Vec3::ZERO);
    }

    #[test]
    fn release_mid_frame_keeps_this_frames_direction() {
        let mut world = small();
        world.select(BlockId(2)).unwrap();
        world.push_input(InputEvent::KeyDown(Key::Enter));

        let report = world.frame();
        assert_eq!(report.controlled, Some(BlockId(2)));
        assert_eq!(report.directions[2], Some(SyncDirection::VisualToPhysics));
        assert_eq!(world.selection().controlled(), None);
        assert_eq!(world.selection().active_key(), None);
        assert!(world.events().contains(&WorldEvent::Released { id: BlockId(2) }));

        let next = world.frame();
        assert_eq!(next.directions[2], Some(SyncDirection::PhysicsToVisual));
    }

    #[test]
    fn stale_key_up_does_not_stop_newer_key() {
        let mut world = small();
        world.select(BlockId(5)).unwrap();
        let start = world.visual_pose(BlockId(5)).unwrap();
        world.push_input(InputEvent::KeyDown(Key::W));
        world.push_input(InputEvent::KeyDown(Key::D));
        world.push_input(InputEvent::KeyUp(Key::W));
        world.frame();
        let pose = world.visual_pose(BlockId(5)).unwrap();
        assert!((pose.position.x - start.position.x - 0.1).abs() < 1e-5);
        assert!((pose.position.z - start.position.z).abs() < 1e-5);
    }

    #[test]
    fn reset_rebuilds_and_goes_idle() {
        let mut world = small();
        world.select(BlockId(3)).unwrap();
        world.push_input(InputEvent::KeyDown(Key::Space));
        for _ in 0..5 {
            world.frame();
        }
        let fresh = small().state_hash();
        world.reset();
        assert_eq!(world.selection().controlled(), None);
        assert_eq!(world.frame_count(), 0);
        assert_eq!(world.physics().body_count(), 10);
        assert_eq!(world.state_hash(), fresh);

        world.rebuild(TowerConfig {
            block_count: 3,
            ..TowerConfig::default()
        });
        assert_eq!(world.tower().len(), 3);
        assert_eq!(world.scene().len(), 4);
    }

    #[test]
    fn identical_runs_hash_identically() {
        let run = || {
            let mut world = small();
            world.select(BlockId(7)).unwrap();
            world.push_input(InputEvent::KeyDown(Key::E));
            for _ in 0..30 {
                world.frame();
            }
            world.state_hash()
        };
        assert_eq!(run(), run());
        assert_ne!(run(), small().state_hash());
    }

    #[test]
    fn click_hits_guards_empty_list() {
        let mut world = small();
        world.click_hits(&[]);
        assert_eq!(world.selection().controlled(), None);
    }

    #[test]
    fn rebound_key_drives_control() {
        let mut world = small();
        let previous = world.bindings_mut().bind(Key::W, ControlAction::Raise);
        assert_eq!(previous, Some(ControlAction::MoveZPos));
        assert_eq!(world.bindings().action_for(Key::W), Some(ControlAction::Raise));

        world.select(BlockId(4)).unwrap();
        let start = world.visual_pose(BlockId(4)).unwrap();
        world.push_input(InputEvent::KeyDown(Key::W));
        world.frame();
        let pose = world.visual_pose(BlockId(4)).unwrap();
        assert!((pose.position.y - start.position.y - 0.1).abs() < 1e-5);
        assert!((pose.position.z - start.position.z).abs() < 1e-5);
    }

    #[test]
    fn drain_events_clears_log() {
        let mut world = small();
        world.frame();
        let events = world.drain_events();
        assert_eq!(events.len(), 2);
        assert!(world.events().is_empty());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Select(usize),
        Release,
        KeyDown(Key),
        KeyUp(Key),
        Frames(u8),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        let key = prop::sample::select(vec![
            Key::W,
            Key::A,
            Key::S,
            Key::D,
            Key::Q,
            Key::E,
            Key::Space,
            Key::ControlLeft,
            Key::Enter,
        ]);
        prop_oneof![
            (0usize..9).prop_map(Op::Select),
            Just(Op::Release),
            key.clone().prop_map(Op::KeyDown),
            key.prop_map(Op::KeyUp),
            (1u8..4).prop_map(Op::Frames),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn every_frame_syncs_each_block_once(ops in prop::collection::vec(op_strategy(), 1..25)) {
            let mut world = small();
            for op in ops {
                match op {
                    Op::Select(i) => world.select(BlockId(i)).unwrap(),
                    Op::Release => world.release(),
                    Op::KeyDown(k) => world.push_input(InputEvent::KeyDown(k)),
                    Op::KeyUp(k) => world.push_input(InputEvent::KeyUp(k)),
                    Op::Frames(n) => {
                        for _ in 0..n {
                            let report = world.frame();
                            prop_assert_eq!(report.directions.len(), world.tower().len());
                            for (i, direction) in report.directions.iter().enumerate() {
                                let held = report.controlled == Some(BlockId(i));
                                let expected = if held {
                                    SyncDirection::VisualToPhysics
                                } else {
                                    SyncDirection::PhysicsToVisual
                                };
                                prop_assert_eq!(*direction, Some(expected));
                            }
                            if let Some(id) = report.controlled {
                                let body = world.body(id).unwrap();
                                prop_assert_eq!(body.velocity, Vec3::ZERO);
                                prop_assert_eq!(body.angular_velocity, Vec3::ZERO);
                            }
                        }
                    }
                }
            }
        }
    }
}
