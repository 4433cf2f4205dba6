use crate::config::{ConfigError, SessionConfig};
use crate::input::InputSnapshot;
use blockspace_common::{BlockPos, BlockTypeId};
use blockspace_kernel::{
    BlockRegistry, GridError, PhysicsError, PlayerState, RayHit, RegistryError, Solver, StepInput,
    StepReport, WorldGrid, cast_ray,
};
use blockspace_persist::{SaveStore, StoreError};
use glam::Vec3;
use serde::Serialize;
use std::sync::Arc;

/// Half-width of the starter slab; it covers `[-5, 5)` on x and y.
const STARTER_HALF_WIDTH: i32 = 5;

/// Errors that stop a tick or a session operation.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Physics(#[from] PhysicsError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Why a placement was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlacementRefusal {
    /// The target cell already holds a solid block.
    Occupied,
    /// The block would overlap the player's own box.
    InsidePlayer,
    /// The target cell is outside the grid's bounds.
    OutOfBounds,
}

/// Result of a break or place command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum InteractionOutcome {
    Broken {
        pos: BlockPos,
        block_type: BlockTypeId,
    },
    Placed {
        pos: BlockPos,
        block_type: BlockTypeId,
    },
    /// Nothing solid within reach.
    Missed,
    PlacementBlocked {
        pos: BlockPos,
        reason: PlacementRefusal,
    },
}

/// Camera placement derived from the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyePose {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// What one tick did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Index of the tick just run, starting at 1.
    pub tick: u64,
    pub step: StepReport,
    pub selection_changed: bool,
    pub interactions: Vec<InteractionOutcome>,
    /// Blocks written, if a save was requested.
    pub saved: Option<usize>,
    /// Blocks read, if a load was requested.
    pub loaded: Option<usize>,
}

/// A running game: the grid, the player, the block catalogue and the save
/// slot, advanced one fixed step per [`Session::tick`].
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    registry: BlockRegistry,
    grid: WorldGrid,
    player: PlayerState,
    solver: Solver,
    store: SaveStore,
    selected: BlockTypeId,
    ticks: u64,
}

impl Session {
    /// Session with an empty grid and the player at the configured spawn.
    pub fn new(config: SessionConfig, registry: BlockRegistry) -> Result<Self, SessionError> {
        config.validate()?;
        let selected = BlockTypeId::new(config.default_block.clone());
        registry.lookup(&selected)?;

        Ok(Self {
            player: PlayerState::new(config.spawn, config.half_extents),
            solver: Solver::new(config.physics),
            store: SaveStore::new(&config.save_dir),
            grid: WorldGrid::new(),
            registry,
            selected,
            ticks: 0,
            config,
        })
    }

    /// Session over the stock catalogue, restored from the configured save
    /// slot if present, otherwise seeded with the starter slab.
    ///
    /// A save that cannot be decoded or resolved is left on disk untouched and
    /// the starter slab is used instead. I/O errors are still returned.
    pub fn start(config: SessionConfig) -> Result<Self, SessionError> {
        let mut session = Self::new(config, BlockRegistry::with_defaults())?;
        if session.store.exists(&session.config.save_slot) {
            match session.load() {
                Ok(_) => return Ok(session),
                Err(SessionError::Store(e @ (StoreError::Codec(_) | StoreError::Load(_)))) => {
                    tracing::warn!(
                        slot = %session.config.save_slot,
                        error = %e,
                        "save unusable, starting from the starter world"
                    );
                }
                Err(e) => return Err(e),
            }
        }
        let placed = session.build_starter_world()?;
        tracing::info!(blocks = placed, "built starter world");
        Ok(session)
    }

    /// Replace the grid with a flat slab: grass on layer z=0 over two stone
    /// layers, x and y in `[-5, 5)`.
    pub fn build_starter_world(&mut self) -> Result<usize, SessionError> {
        let grass = self.registry.lookup(&"grass".into())?;
        let stone = self.registry.lookup(&"stone".into())?;

        let mut layout = Vec::new();
        for x in -STARTER_HALF_WIDTH..STARTER_HALF_WIDTH {
            for y in -STARTER_HALF_WIDTH..STARTER_HALF_WIDTH {
                layout.push((BlockPos::new(x, y, 0), &grass));
                layout.push((BlockPos::new(x, y, -1), &stone));
                layout.push((BlockPos::new(x, y, -2), &stone));
            }
        }
        for (pos, _) in &layout {
            self.grid.validate(*pos)?;
        }

        self.grid.clear();
        for (pos, block_type) in &layout {
            self.grid.set(*pos, Arc::clone(block_type))?;
        }
        Ok(layout.len())
    }

    /// Run one fixed step: look, selection, physics, break, place, save, load.
    ///
    /// A physics error aborts the tick before the grid is touched. A save or
    /// load error is returned after the tick's movement and interactions have
    /// been applied; a failed load leaves the grid as it was.
    pub fn tick(&mut self, input: &InputSnapshot) -> Result<TickReport, SessionError> {
        let span = tracing::debug_span!("tick", n = self.ticks + 1);
        let _enter = span.enter();

        let mut report = TickReport {
            tick: self.ticks + 1,
            ..TickReport::default()
        };

        let look = input.look_delta;
        if look != glam::Vec2::ZERO {
            self.player.apply_look(look.x, look.y, self.config.max_pitch);
        }

        if let Some(id) = &input.select {
            report.selection_changed = self.select_block(id.clone());
        }

        let step = StepInput {
            wish_velocity: self
                .player
                .wish_velocity(input.movement, self.solver.config().walk_speed),
            jump: input.jump,
        };
        report.step = self
            .solver
            .step(&mut self.player, &self.grid, &step, self.config.tick_dt)?;
        self.ticks += 1;

        if input.break_block {
            report.interactions.push(self.break_block());
        }
        if input.place_block {
            report.interactions.push(self.place_block());
        }

        if input.save {
            report.saved = Some(self.save()?);
        }
        if input.load {
            report.loaded = Some(self.load()?);
        }
        Ok(report)
    }

    /// Remove the solid block under the crosshair, if any is within reach.
    pub fn break_block(&mut self) -> InteractionOutcome {
        let Some(hit) = self.target() else {
            return InteractionOutcome::Missed;
        };
        match self.grid.remove(hit.block) {
            Some(block) => {
                tracing::debug!(pos = %hit.block, block = %block.type_id(), "block broken");
                InteractionOutcome::Broken {
                    pos: hit.block,
                    block_type: block.type_id().clone(),
                }
            }
            None => InteractionOutcome::Missed,
        }
    }

    /// Place the selected block against the face under the crosshair.
    pub fn place_block(&mut self) -> InteractionOutcome {
        let Some(hit) = self.target() else {
            return InteractionOutcome::Missed;
        };
        let pos = hit.face;
        if self.grid.is_solid(pos) {
            tracing::warn!(%pos, "placement refused: cell is solid");
            return InteractionOutcome::PlacementBlocked {
                pos,
                reason: PlacementRefusal::Occupied,
            };
        }
        if pos.aabb().intersects(&self.player.aabb()) {
            tracing::warn!(%pos, "placement refused: overlaps player");
            return InteractionOutcome::PlacementBlocked {
                pos,
                reason: PlacementRefusal::InsidePlayer,
            };
        }

        let block_type = match self.registry.lookup(&self.selected) {
            Ok(block_type) => block_type,
            Err(e) => {
                tracing::warn!(error = %e, "placement refused: selection not registered");
                return InteractionOutcome::Missed;
            }
        };
        match self.grid.set(pos, block_type) {
            Ok(_) => {
                tracing::debug!(%pos, block = %self.selected, "block placed");
                InteractionOutcome::Placed {
                    pos,
                    block_type: self.selected.clone(),
                }
            }
            Err(GridError::InvalidCoordinate(_)) => {
                tracing::warn!(%pos, "placement refused: outside grid bounds");
                InteractionOutcome::PlacementBlocked {
                    pos,
                    reason: PlacementRefusal::OutOfBounds,
                }
            }
        }
    }

    /// Make `id` the block used for placement. Unregistered ids are ignored;
    /// returns whether the selection changed.
    pub fn select_block(&mut self, id: BlockTypeId) -> bool {
        if !self.registry.contains(&id) {
            tracing::warn!(%id, "ignoring selection of unknown block type");
            return false;
        }
        if id == self.selected {
            return false;
        }
        tracing::debug!(%id, "selected block type");
        self.selected = id;
        true
    }

    /// Write the grid to the configured slot. Returns the block count.
    pub fn save(&self) -> Result<usize, SessionError> {
        let _span = tracing::info_span!("save", slot = %self.config.save_slot).entered();
        let doc = self.store.write(&self.config.save_slot, &self.grid)?;
        Ok(doc.len())
    }

    /// Replace the grid with the configured slot. The player is not moved.
    pub fn load(&mut self) -> Result<usize, SessionError> {
        let _span = tracing::info_span!("load", slot = %self.config.save_slot).entered();
        let count = self
            .store
            .load(&self.config.save_slot, &mut self.grid, &self.registry)?;
        Ok(count)
    }

    pub fn eye_pose(&self) -> EyePose {
        EyePose {
            origin: self.player.position + Vec3::Z * self.config.eye_offset,
            direction: self.player.look_direction(),
        }
    }

    /// First solid block along the view ray within reach.
    pub fn target(&self) -> Option<RayHit> {
        let eye = self.eye_pose();
        cast_ray(&self.grid, eye.origin, eye.direction, self.config.reach)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut WorldGrid {
        &mut self.grid
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }

    pub fn selected(&self) -> &BlockTypeId {
        &self.selected
    }

    pub fn store(&self) -> &SaveStore {
        &self.store
    }

    /// Ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockspace_kernel::{Appearance, BlockType, GridBounds, MotionState};
    use glam::Vec2;

    fn config_in(dir: &std::path::Path) -> SessionConfig {
        SessionConfig {
            save_dir: dir.join("saves"),
            ..SessionConfig::default()
        }
    }

    /// Starter world with the player settled on the grass.
    fn landed(dir: &std::path::Path) -> Session {
        let mut s = Session::start(config_in(dir)).unwrap();
        for _ in 0..120 {
            s.tick(&InputSnapshot::idle()).unwrap();
        }
        assert!(s.player().is_grounded());
        s
    }

    fn look_down(s: &mut Session) {
        s.tick(&InputSnapshot {
            look_delta: Vec2::new(0.0, -90.0),
            ..InputSnapshot::default()
        })
        .unwrap();
    }

    #[test]
    fn start_without_save_builds_starter_world() {
        let tmp = tempfile::tempdir().unwrap();
        let s = Session::start(config_in(tmp.path())).unwrap();
        assert_eq!(s.grid().len(), 300);
        assert_eq!(
            s.grid().get(BlockPos::new(-5, 4, 0)).unwrap().type_id().as_str(),
            "grass"
        );
        assert_eq!(
            s.grid().get(BlockPos::new(0, 0, -2)).unwrap().type_id().as_str(),
            "stone"
        );
        assert!(s.grid().get(BlockPos::new(5, 0, 0)).is_none());
        assert_eq!(s.selected().as_str(), "stone");
    }

    #[test]
    fn player_falls_and_lands_on_grass() {
        let tmp = tempfile::tempdir().unwrap();
        let s = landed(tmp.path());
        assert!((s.player().feet() - 1.0).abs() < 0.02);
        assert_eq!(s.player().velocity.z, 0.0);
        assert_eq!(s.player().motion, MotionState::Grounded);
    }

    #[test]
    fn pitch_is_clamped_by_look_input() {
        let tmp = tempfile::tempdir().unwrap();
        let mut s = landed(tmp.path());
        look_down(&mut s);
        assert_eq!(s.player().pitch, -85.0);
        assert!(s.eye_pose().direction.z < -0.99);
    }

    #[test]
    fn break_then_place_in_one_tick() {
        let tmp = tempfile::tempdir().unwrap();
        let mut s = landed(tmp.path());
        look_down(&mut s);

        let report = s
            .tick(&InputSnapshot {
                break_block: true,
                place_block: true,
                select: Some("red_block".into()),
                ..InputSnapshot::default()
            })
            .unwrap();
        assert!(report.selection_changed);
        assert_eq!(
            report.interactions,
            vec![
                InteractionOutcome::Broken {
                    pos: BlockPos::new(0, 0, 0),
                    block_type: "grass".into(),
                },
                InteractionOutcome::Placed {
                    pos: BlockPos::new(0, 0, 0),
                    block_type: "red_block".into(),
                },
            ]
        );
        assert_eq!(
            s.grid().get(BlockPos::ORIGIN).unwrap().type_id().as_str(),
            "red_block"
        );
    }

    #[test]
    fn placement_inside_player_is_refused() {
        let tmp = tempfile::tempdir().unwrap();
        let mut s = landed(tmp.path());
        let stone = s.registry().lookup(&"stone".into()).unwrap();
        s.grid_mut().set(BlockPos::new(1, 0, 2), stone).unwrap();
        // Face +x.
        s.player_mut().yaw = 270.0;
        let before = s.grid().state_hash();

        let outcome = s.place_block();
        assert_eq!(
            outcome,
            InteractionOutcome::PlacementBlocked {
                pos: BlockPos::new(0, 0, 2),
                reason: PlacementRefusal::InsidePlayer,
            }
        );
        assert_eq!(s.grid().state_hash(), before);
    }

    #[test]
    fn placement_overwrites_non_solid_face_cell() {
        let tmp = tempfile::tempdir().unwrap();
        let mut registry = BlockRegistry::with_defaults();
        let mist = registry
            .register(BlockType::new(
                "mist",
                Appearance::SolidColor([0.9, 0.9, 0.9, 0.3]),
                false,
            ))
            .unwrap();
        let stone = registry.lookup(&"stone".into()).unwrap();

        let mut s = Session::new(config_in(tmp.path()), registry).unwrap();
        // Eye at (0.5, 0.5, 0.5), facing +x.
        s.player_mut().position = Vec3::new(0.5, 0.5, 0.0);
        s.player_mut().yaw = 270.0;
        s.grid_mut().set(BlockPos::new(3, 0, 0), stone).unwrap();
        s.grid_mut().set(BlockPos::new(2, 0, 0), mist).unwrap();

        assert_eq!(
            s.place_block(),
            InteractionOutcome::Placed {
                pos: BlockPos::new(2, 0, 0),
                block_type: "stone".into(),
            }
        );
        assert!(s.grid().is_solid(BlockPos::new(2, 0, 0)));
        assert_eq!(
            s.grid().get(BlockPos::new(2, 0, 0)).unwrap().type_id().as_str(),
            "stone"
        );

        // The mist is gone, so breaking now takes the block just placed.
        assert_eq!(
            s.break_block(),
            InteractionOutcome::Broken {
                pos: BlockPos::new(2, 0, 0),
                block_type: "stone".into(),
            }
        );
    }

    #[test]
    fn non_solid_blocks_do_not_stop_the_ray() {
        let tmp = tempfile::tempdir().unwrap();
        let mut registry = BlockRegistry::with_defaults();
        let mist = registry
            .register(BlockType::new(
                "mist",
                Appearance::SolidColor([0.9, 0.9, 0.9, 0.3]),
                false,
            ))
            .unwrap();
        let stone = registry.lookup(&"stone".into()).unwrap();

        let mut s = Session::new(config_in(tmp.path()), registry).unwrap();
        s.player_mut().position = Vec3::new(0.5, 0.5, 0.0);
        s.player_mut().yaw = 270.0;
        s.grid_mut().set(BlockPos::new(3, 0, 0), stone).unwrap();
        s.grid_mut().set(BlockPos::new(2, 0, 0), mist).unwrap();

        assert_eq!(
            s.break_block(),
            InteractionOutcome::Broken {
                pos: BlockPos::new(3, 0, 0),
                block_type: "stone".into(),
            }
        );
    }

    #[test]
    fn placement_into_solid_face_cell_is_refused() {
        let tmp = tempfile::tempdir().unwrap();
        let mut s = Session::new(config_in(tmp.path()), BlockRegistry::with_defaults()).unwrap();
        let stone = s.registry().lookup(&"stone".into()).unwrap();
        // Eye inside a solid cell, facing +x at another one. The ray skips its
        // own cell, so the face it reports is solid.
        s.player_mut().position = Vec3::new(0.5, 0.5, 0.0);
        s.player_mut().yaw = 270.0;
        s.grid_mut().set(BlockPos::new(0, 0, 0), stone.clone()).unwrap();
        s.grid_mut().set(BlockPos::new(1, 0, 0), stone).unwrap();
        let before = s.grid().state_hash();

        assert_eq!(
            s.place_block(),
            InteractionOutcome::PlacementBlocked {
                pos: BlockPos::new(0, 0, 0),
                reason: PlacementRefusal::Occupied,
            }
        );
        assert_eq!(s.grid().state_hash(), before);
    }

    #[test]
    fn placement_outside_bounds_is_refused() {
        let tmp = tempfile::tempdir().unwrap();
        let mut s = Session::new(config_in(tmp.path()), BlockRegistry::with_defaults()).unwrap();
        let stone = s.registry().lookup(&"stone".into()).unwrap();
        *s.grid_mut() = WorldGrid::with_bounds(GridBounds {
            min: BlockPos::ORIGIN,
            max: BlockPos::ORIGIN,
        });
        s.grid_mut().set(BlockPos::ORIGIN, stone).unwrap();
        // Eye at (-2.5, 0.5, 0.5), facing +x.
        s.player_mut().position = Vec3::new(-2.5, 0.5, 0.0);
        s.player_mut().yaw = 270.0;

        assert_eq!(
            s.place_block(),
            InteractionOutcome::PlacementBlocked {
                pos: BlockPos::new(-1, 0, 0),
                reason: PlacementRefusal::OutOfBounds,
            }
        );
        assert_eq!(s.grid().len(), 1);
    }

    #[test]
    fn unusable_save_falls_back_to_starter_world() {
        let saves = [
            "{ broken",
            r#"{ "version": 7, "blocks": [] }"#,
            r#"[{ "x": 0, "y": 0, "z": 0, "type": "obsidian" }]"#,
        ];
        for contents in saves {
            let tmp = tempfile::tempdir().unwrap();
            let path = tmp.path().join("saves/world_save.json");
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, contents).unwrap();

            let s = Session::start(config_in(tmp.path())).unwrap();
            assert_eq!(s.grid().len(), 300, "fallback for {contents:?}");
            assert_eq!(std::fs::read_to_string(&path).unwrap(), contents);
        }
    }

    #[test]
    fn interactions_out_of_reach_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let mut s = landed(tmp.path());
        // Looking level across an empty world.
        let report = s
            .tick(&InputSnapshot {
                break_block: true,
                place_block: true,
                ..InputSnapshot::default()
            })
            .unwrap();
        assert_eq!(
            report.interactions,
            vec![InteractionOutcome::Missed, InteractionOutcome::Missed]
        );
    }

    #[test]
    fn unknown_selection_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let mut s = Session::start(config_in(tmp.path())).unwrap();
        let report = s
            .tick(&InputSnapshot {
                select: Some("obsidian".into()),
                ..InputSnapshot::default()
            })
            .unwrap();
        assert!(!report.selection_changed);
        assert_eq!(s.selected().as_str(), "stone");
        assert!(s.select_block("grass".into()));
        assert!(!s.select_block("grass".into()));
    }

    #[test]
    fn forward_movement_follows_yaw() {
        let tmp = tempfile::tempdir().unwrap();
        let mut s = landed(tmp.path());
        let start = s.player().position;
        for _ in 0..30 {
            s.tick(&InputSnapshot::moving(0.0, 1.0)).unwrap();
        }
        let moved = s.player().position - start;
        assert!(moved.y > 2.0, "moved {moved:?}");
        assert!(moved.x.abs() < 1e-4);
    }

    #[test]
    fn save_and_load_through_ticks() {
        let tmp = tempfile::tempdir().unwrap();
        let mut s = Session::start(config_in(tmp.path())).unwrap();
        let original = s.grid().state_hash();

        let report = s
            .tick(&InputSnapshot {
                save: true,
                ..InputSnapshot::default()
            })
            .unwrap();
        assert_eq!(report.saved, Some(300));
        assert!(tmp.path().join("saves/world_save.json").is_file());

        s.grid_mut().remove(BlockPos::ORIGIN);
        assert_ne!(s.grid().state_hash(), original);

        let report = s
            .tick(&InputSnapshot {
                load: true,
                ..InputSnapshot::default()
            })
            .unwrap();
        assert_eq!(report.loaded, Some(300));
        assert_eq!(s.grid().state_hash(), original);

        // A fresh session picks the save up instead of the starter slab.
        let mut resumed_config = config_in(tmp.path());
        resumed_config.default_block = "grass".into();
        let resumed = Session::start(resumed_config).unwrap();
        assert_eq!(resumed.grid().state_hash(), original);
    }

    #[test]
    fn failed_load_keeps_grid() {
        let tmp = tempfile::tempdir().unwrap();
        let mut s = Session::start(config_in(tmp.path())).unwrap();
        std::fs::create_dir_all(tmp.path().join("saves")).unwrap();
        std::fs::write(tmp.path().join("saves/world_save.json"), "{\"version\": 5}").unwrap();
        let before = s.grid().state_hash();

        let err = s
            .tick(&InputSnapshot {
                load: true,
                ..InputSnapshot::default()
            })
            .unwrap_err();
        assert!(matches!(err, SessionError::Store(_)));
        assert_eq!(s.grid().state_hash(), before);
        assert_eq!(s.ticks(), 1);
    }

    #[test]
    fn save_failure_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not_a_dir");
        std::fs::write(&blocker, "").unwrap();
        let config = SessionConfig {
            save_dir: blocker,
            ..SessionConfig::default()
        };
        let mut s = Session::new(config, BlockRegistry::with_defaults()).unwrap();
        let err = s
            .tick(&InputSnapshot {
                save: true,
                ..InputSnapshot::default()
            })
            .unwrap_err();
        assert!(matches!(err, SessionError::Store(StoreError::Io(_))));
    }

    #[test]
    fn invalid_input_halts_tick_before_mutation() {
        let tmp = tempfile::tempdir().unwrap();
        let mut s = landed(tmp.path());
        look_down(&mut s);
        let before = s.grid().state_hash();
        let ticks = s.ticks();

        let err = s
            .tick(&InputSnapshot {
                movement: Vec2::new(f32::NAN, 0.0),
                break_block: true,
                ..InputSnapshot::default()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Physics(PhysicsError::InvalidState(_))
        ));
        assert_eq!(s.grid().state_hash(), before);
        assert_eq!(s.ticks(), ticks);
    }

    #[test]
    fn unknown_default_block_is_rejected() {
        let config = SessionConfig {
            default_block: "obsidian".into(),
            ..SessionConfig::default()
        };
        assert!(matches!(
            Session::new(config, BlockRegistry::with_defaults()),
            Err(SessionError::Registry(RegistryError::UnknownBlockType(_)))
        ));
    }

    #[test]
    fn identical_inputs_give_identical_sessions() {
        let tmp = tempfile::tempdir().unwrap();
        let script: Vec<InputSnapshot> = (0..240)
            .map(|i| InputSnapshot {
                movement: Vec2::new(((i / 40) % 3) as f32 - 1.0, 1.0),
                look_delta: Vec2::new(if i % 50 == 0 { 45.0 } else { 0.0 }, -0.5),
                jump: i % 70 == 0,
                break_block: i % 33 == 0,
                place_block: i % 47 == 0,
                ..InputSnapshot::default()
            })
            .collect();

        let run = || {
            let mut s = Session::start(config_in(tmp.path())).unwrap();
            for input in &script {
                s.tick(input).unwrap();
            }
            (s.grid().state_hash(), *s.player())
        };
        assert_eq!(run(), run());
    }
}
