use strum::{EnumIter, IntoEnumIterator};

/// A die face value, always within 1..=6
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum FaceValue {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
}

impl FaceValue {
    /// Clamp an arbitrary numeric value into the valid face range.
    ///
    /// Out-of-range input from a value source is not an error, it is silently
    /// pulled to the nearest valid face.
    pub fn clamped(value: i64) -> Self {
        match value {
            i64::MIN..=1 => Self::One,
            2 => Self::Two,
            3 => Self::Three,
            4 => Self::Four,
            5 => Self::Five,
            _ => Self::Six,
        }
    }

    pub fn get(self) -> u8 {
        self as u8
    }

    /// Number of active pips on this face (equal to the face value).
    pub fn pip_count(self) -> usize {
        self as usize
    }
}

/// One of the six fixed positions a pip can occupy on a die face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum PipSlot {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl PipSlot {
    pub(crate) const COUNT: usize = 6;

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// A pip position normalized to the die surface, both axes in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The set of pip positions currently occupying a die face, keyed by slot.
///
/// Inactive slots are simply absent. Poses are cheap to copy around and are
/// always replaced wholesale, never mutated in place by the animation driver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pose {
    slots: [Option<Position>; PipSlot::COUNT],
}

impl Pose {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: PipSlot) -> Option<Position> {
        self.slots[slot.index()]
    }

    pub fn set(&mut self, slot: PipSlot, position: Position) {
        self.slots[slot.index()] = Some(position);
    }

    /// Iterate active slots in canonical a..f order.
    pub fn iter(&self) -> impl Iterator<Item = (PipSlot, Position)> + '_ {
        PipSlot::iter().filter_map(move |slot| self.get(slot).map(|position| (slot, position)))
    }

    pub fn active_slots(&self) -> impl Iterator<Item = PipSlot> + '_ {
        self.iter().map(|(slot, _)| slot)
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_none())
    }
}

impl FromIterator<(PipSlot, Position)> for Pose {
    fn from_iter<I: IntoIterator<Item = (PipSlot, Position)>>(iter: I) -> Self {
        let mut pose = Pose::empty();
        for (slot, position) in iter {
            pose.set(slot, position);
        }
        pose
    }
}

/// The fixed, hand-authored pip layout for each face value.
///
/// 1 sits in the center, 2 and 3 run along the main diagonal, 4 and 5 use the
/// corners (plus center), and 6 adds the left/right mid positions.
pub(crate) fn canonical_layout(value: FaceValue) -> &'static [(PipSlot, Position)] {
    use PipSlot::*;
    // Struct literals keep these arms promotable to 'static.
    match value {
        FaceValue::One => &[(A, Position { x: 0.5, y: 0.5 })],
        FaceValue::Two => &[(A, Position { x: 0.3, y: 0.3 }), (B, Position { x: 0.7, y: 0.7 })],
        FaceValue::Three => &[
            (A, Position { x: 0.25, y: 0.25 }),
            (B, Position { x: 0.5, y: 0.5 }),
            (C, Position { x: 0.75, y: 0.75 }),
        ],
        FaceValue::Four => &[
            (A, Position { x: 0.25, y: 0.25 }),
            (B, Position { x: 0.75, y: 0.25 }),
            (C, Position { x: 0.25, y: 0.75 }),
            (D, Position { x: 0.75, y: 0.75 }),
        ],
        FaceValue::Five => &[
            (A, Position { x: 0.25, y: 0.25 }),
            (B, Position { x: 0.75, y: 0.25 }),
            (C, Position { x: 0.25, y: 0.75 }),
            (D, Position { x: 0.75, y: 0.75 }),
            (E, Position { x: 0.5, y: 0.5 }),
        ],
        FaceValue::Six => &[
            (A, Position { x: 0.25, y: 0.25 }),
            (B, Position { x: 0.75, y: 0.25 }),
            (C, Position { x: 0.25, y: 0.75 }),
            (D, Position { x: 0.75, y: 0.75 }),
            (E, Position { x: 0.25, y: 0.5 }),
            (F, Position { x: 0.75, y: 0.5 }),
        ],
    }
}

/// The canonical resting pose for a face value
pub fn canonical_pose(value: FaceValue) -> Pose {
    canonical_layout(value).iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(FaceValue::One, 1)]
    #[case(FaceValue::Two, 2)]
    #[case(FaceValue::Three, 3)]
    #[case(FaceValue::Four, 4)]
    #[case(FaceValue::Five, 5)]
    #[case(FaceValue::Six, 6)]
    fn test_canonical_pose_pip_count(#[case] value: FaceValue, #[case] expected: usize) {
        let pose = canonical_pose(value);
        assert_eq!(pose.len(), expected);
        assert_eq!(value.pip_count(), expected);
    }

    #[test]
    fn test_canonical_layouts_live_forever() {
        // The layout slices must be usable beyond the lookup call.
        let layouts: Vec<&'static [(PipSlot, Position)]> =
            FaceValue::iter().map(canonical_layout).collect();
        assert_eq!(layouts.iter().map(|layout| layout.len()).sum::<usize>(), 21);
    }

    #[test]
    fn test_canonical_positions_within_unit_square() {
        for value in FaceValue::iter() {
            for (slot, position) in canonical_pose(value).iter() {
                assert!(
                    (0.0..=1.0).contains(&position.x) && (0.0..=1.0).contains(&position.y),
                    "{value:?}/{slot:?} out of bounds: {position:?}"
                );
            }
        }
    }

    #[test]
    fn test_clamping_pulls_into_face_range() {
        assert_eq!(FaceValue::clamped(-3), FaceValue::One);
        assert_eq!(FaceValue::clamped(0), FaceValue::One);
        assert_eq!(FaceValue::clamped(1), FaceValue::One);
        assert_eq!(FaceValue::clamped(4), FaceValue::Four);
        assert_eq!(FaceValue::clamped(6), FaceValue::Six);
        assert_eq!(FaceValue::clamped(42), FaceValue::Six);
    }

    #[test]
    fn test_pose_replaces_slot_entries() {
        let mut pose = Pose::empty();
        assert!(pose.is_empty());
        pose.set(PipSlot::A, Position::new(0.1, 0.2));
        pose.set(PipSlot::A, Position::new(0.9, 0.9));
        assert_eq!(pose.len(), 1);
        assert_eq!(pose.get(PipSlot::A), Some(Position::new(0.9, 0.9)));
    }
}
