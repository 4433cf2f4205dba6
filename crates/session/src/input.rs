use blockspace_common::BlockTypeId;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Everything the input layer hands the session for one tick.
///
/// Movement is `(strafe, forward)` in `[-1, 1]`; look delta is `(yaw, pitch)`
/// in degrees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSnapshot {
    pub movement: Vec2,
    pub look_delta: Vec2,
    pub jump: bool,
    pub break_block: bool,
    pub place_block: bool,
    pub select: Option<BlockTypeId>,
    pub save: bool,
    pub load: bool,
}

impl InputSnapshot {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn moving(strafe: f32, forward: f32) -> Self {
        Self {
            movement: Vec2::new(strafe, forward),
            ..Self::default()
        }
    }
}

/// Number-key bindings for block selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotbar {
    slots: Vec<(u8, BlockTypeId)>,
}

impl Default for Hotbar {
    /// Keys 1-5 then 0.
    fn default() -> Self {
        Self {
            slots: [
                (1, "stone"),
                (2, "grass"),
                (3, "checkerboard"),
                (4, "red_block"),
                (5, "blue_block"),
                (0, "green_block"),
            ]
            .into_iter()
            .map(|(key, id)| (key, BlockTypeId::from(id)))
            .collect(),
        }
    }
}

impl Hotbar {
    /// Block bound to a number key, if any.
    pub fn get(&self, key: u8) -> Option<&BlockTypeId> {
        self.slots.iter().find(|(k, _)| *k == key).map(|(_, id)| id)
    }

    pub fn bind(&mut self, key: u8, id: BlockTypeId) {
        match self.slots.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = id,
            None => self.slots.push((key, id)),
        }
    }

    /// Selection input for a key press; idle if the key is unbound.
    pub fn select(&self, key: u8) -> InputSnapshot {
        InputSnapshot {
            select: self.get(key).cloned(),
            ..InputSnapshot::default()
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &BlockTypeId)> {
        self.slots.iter().map(|(k, id)| (*k, id))
    }
}
