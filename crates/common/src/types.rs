use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer coordinate of a grid cell.
///
/// The cell at `(x, y, z)` covers the unit cube `[x, x+1) × [y, y+1) × [z, z+1)`.
/// The world is Z-up.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The cell containing a continuous point.
    pub fn containing(point: Vec3) -> Self {
        Self::new(
            point.x.floor() as i32,
            point.y.floor() as i32,
            point.z.floor() as i32,
        )
    }

    /// The neighbouring cell across the given face, or `None` past the edge of
    /// the `i32` range.
    pub fn offset(self, face: Face) -> Option<Self> {
        self.checked_add(face.normal())
    }

    pub fn checked_add(self, delta: IVec3) -> Option<Self> {
        Some(Self::new(
            self.x.checked_add(delta.x)?,
            self.y.checked_add(delta.y)?,
            self.z.checked_add(delta.z)?,
        ))
    }

    /// Component along axis 0 (x), 1 (y) or 2 (z).
    pub fn axis(self, axis: usize) -> i32 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Lower corner of the cell in world space.
    pub fn min_corner(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }

    /// Bounding box of the cell.
    pub fn aabb(self) -> Aabb {
        let min = self.min_corner();
        Aabb::new(min, min + Vec3::ONE)
    }
}

impl From<IVec3> for BlockPos {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<BlockPos> for IVec3 {
    fn from(p: BlockPos) -> Self {
        IVec3::new(p.x, p.y, p.z)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Identifier of a registered block type, e.g. `"stone"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockTypeId(String);

impl BlockTypeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BlockTypeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for BlockTypeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for BlockTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One of the six faces of a cell, named by its outward normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];

    /// Face on `axis` (0 = x, 1 = y, 2 = z) whose normal points in the positive
    /// or negative direction.
    pub fn from_axis(axis: usize, positive: bool) -> Self {
        match (axis, positive) {
            (0, true) => Face::PosX,
            (0, false) => Face::NegX,
            (1, true) => Face::PosY,
            (1, false) => Face::NegY,
            (_, true) => Face::PosZ,
            (_, false) => Face::NegZ,
        }
    }

    pub fn normal(self) -> IVec3 {
        match self {
            Face::PosX => IVec3::X,
            Face::NegX => IVec3::NEG_X,
            Face::PosY => IVec3::Y,
            Face::NegY => IVec3::NEG_Y,
            Face::PosZ => IVec3::Z,
            Face::NegZ => IVec3::NEG_Z,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Face::PosX => Face::NegX,
            Face::NegX => Face::PosX,
            Face::PosY => Face::NegY,
            Face::NegY => Face::PosY,
            Face::PosZ => Face::NegZ,
            Face::NegZ => Face::PosZ,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Face::PosX => "+x",
            Face::NegX => "-x",
            Face::PosY => "+y",
            Face::NegY => "-y",
            Face::PosZ => "+z",
            Face::NegZ => "-z",
        };
        f.write_str(s)
    }
}

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn translated(&self, delta: Vec3) -> Self {
        Self::new(self.min + delta, self.max + delta)
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Strict overlap test: boxes that only touch on a face do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Inclusive range of cell indices the box overlaps on `axis`.
    ///
    /// A box edge lying exactly on a cell boundary does not count as overlapping
    /// the cell beyond it.
    pub fn cell_span(&self, axis: usize) -> (i32, i32) {
        let lo = self.min[axis].floor() as i32;
        let hi = (self.max[axis].ceil() as i32 - 1).max(lo);
        (lo, hi)
    }

    /// All cells the box overlaps.
    pub fn cells(&self) -> impl Iterator<Item = BlockPos> + use<> {
        let (x0, x1) = self.cell_span(0);
        let (y0, y1) = self.cell_span(1);
        let (z0, z1) = self.cell_span(2);
        (x0..=x1).flat_map(move |x| {
            (y0..=y1).flat_map(move |y| (z0..=z1).map(move |z| BlockPos::new(x, y, z)))
        })
    }
}

/// Splitmix64 step: a small deterministic generator for scripted input and
/// property-style test loops.
#[derive(Debug, Clone)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform value in `[lo, hi)`.
    pub fn next_f32(&mut self, lo: f32, hi: f32) -> f32 {
        let unit = (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32;
        lo + (hi - lo) * unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containing_floors_negative_coordinates() {
        assert_eq!(
            BlockPos::containing(Vec3::new(-0.5, 0.5, -1.0)),
            BlockPos::new(-1, 0, -1)
        );
    }

    #[test]
    fn face_offsets_are_unit_neighbours() {
        let p = BlockPos::new(3, -2, 7);
        for face in Face::ALL {
            let n = p.offset(face).unwrap();
            let d = IVec3::from(n) - IVec3::from(p);
            assert_eq!(d.abs().element_sum(), 1);
            assert_eq!(n.offset(face.opposite()), Some(p));
        }
    }

    #[test]
    fn offsets_past_the_coordinate_range_are_none() {
        let edge = BlockPos::new(i32::MAX, 0, i32::MIN);
        assert_eq!(edge.offset(Face::PosX), None);
        assert_eq!(edge.offset(Face::NegZ), None);
        assert_eq!(
            edge.offset(Face::NegX),
            Some(BlockPos::new(i32::MAX - 1, 0, i32::MIN))
        );
        assert_eq!(
            edge.checked_add(IVec3::new(0, 1, 1)),
            Some(BlockPos::new(i32::MAX, 1, i32::MIN + 1))
        );
    }

    #[test]
    fn touching_boxes_do_not_intersect() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(!a.intersects(&b));
        assert!(a.intersects(&a.translated(Vec3::splat(0.5))));
    }

    #[test]
    fn cell_span_excludes_boundary_cells() {
        let b = Aabb::new(Vec3::new(0.2, 0.0, -0.5), Vec3::new(1.0, 2.5, 0.5));
        assert_eq!(b.cell_span(0), (0, 0));
        assert_eq!(b.cell_span(1), (0, 2));
        assert_eq!(b.cell_span(2), (-1, 0));
        assert_eq!(b.cells().count(), 6);
    }

    #[test]
    fn block_type_id_serializes_as_plain_string() {
        let id = BlockTypeId::from("stone");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"stone\"");
    }

    #[test]
    fn splitmix_is_deterministic() {
        let mut a = SplitMix64::new(42);
        let mut b = SplitMix64::new(42);
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
        let v = a.next_f32(-1.0, 1.0);
        assert!((-1.0..1.0).contains(&v));
    }
}
