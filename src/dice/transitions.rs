use super::face::{canonical_pose, FaceValue, PipSlot, Pose};

/// Where a pip travels when the face changes.
///
/// A pip either slides to a single destination slot or splits into several
/// pips that all depart from its current position. Slots with no entry in a
/// rule simply disappear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipFlow {
    To(PipSlot),
    Split(&'static [PipSlot]),
}

/// The render-relevant state of one die: which pips are where, whether the
/// drawing layer should slide them there, and which face the pose belongs to.
///
/// Replaced wholesale on every phase of the roll cycle, never patched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderPose {
    pub animate: bool,
    pub value: Option<FaceValue>,
    pub pose: Pose,
}

impl RenderPose {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Hand-curated pip correspondence for every ordered pair of face values.
///
/// The table is design data, not geometry: which old pip "becomes" which new
/// pip was chosen to minimize visual travel, so the pairs are asymmetric and
/// must not be derived algorithmically. Same-value entries are the
/// near-identity permutations used when a value is set without animation.
pub fn transition_rule(from: FaceValue, to: FaceValue) -> &'static [(PipSlot, PipFlow)] {
    use FaceValue::*;
    use PipFlow::*;
    use PipSlot::*;
    match (from, to) {
        (One, One) => &[(A, To(A))],
        (One, Two) => &[(A, Split(&[A, B]))],
        (One, Three) => &[(A, Split(&[A, B, C]))],
        (One, Four) => &[(A, Split(&[A, B, C, D]))],
        (One, Five) => &[(A, Split(&[A, B, C, D, E]))],
        (One, Six) => &[(A, Split(&[A, B, C, D, E, F]))],

        (Two, One) => &[(A, To(A)), (B, To(A))],
        (Two, Two) => &[(A, To(B)), (B, To(A))],
        (Two, Three) => &[(A, To(C)), (B, Split(&[A, B]))],
        (Two, Four) => &[(A, Split(&[B, C])), (B, Split(&[A, D]))],
        (Two, Five) => &[(A, Split(&[C, D])), (B, Split(&[A, B, E]))],
        (Two, Six) => &[(A, Split(&[D, E, F])), (B, Split(&[A, B, C]))],

        (Three, One) => &[(A, To(A)), (B, To(A)), (C, To(A))],
        (Three, Two) => &[(A, To(B)), (B, To(B)), (C, To(A))],
        (Three, Three) => &[(A, To(C)), (B, To(B)), (C, To(A))],
        (Three, Four) => &[(A, To(D)), (B, To(C)), (C, Split(&[A, B]))],
        (Three, Five) => &[(A, Split(&[C, E])), (B, To(D)), (C, Split(&[A, B]))],
        (Three, Six) => &[(A, Split(&[C, E])), (B, To(D)), (C, Split(&[A, B, F]))],

        (Four, One) => &[(A, To(A)), (B, To(A)), (C, To(A)), (D, To(A))],
        (Four, Two) => &[(A, To(A)), (B, To(B)), (C, To(B)), (D, To(A))],
        (Four, Three) => &[(A, To(C)), (B, To(B)), (C, To(A)), (D, To(A))],
        (Four, Four) => &[(A, To(D)), (B, To(C)), (C, To(B)), (D, To(A))],
        (Four, Five) => &[(A, Split(&[D, E])), (B, To(C)), (C, To(B)), (D, To(A))],
        (Four, Six) => &[(A, Split(&[D, E, F])), (B, To(C)), (C, To(B)), (D, To(A))],

        (Five, One) => &[(A, To(A)), (B, To(A)), (C, To(A)), (D, To(A)), (E, To(A))],
        (Five, Two) => &[(A, To(B)), (B, To(A)), (C, To(A)), (D, To(A)), (E, To(A))],
        (Five, Three) => &[(A, To(C)), (B, To(B)), (C, To(A)), (D, To(A)), (E, To(A))],
        (Five, Four) => &[(A, To(D)), (B, To(C)), (C, To(B)), (D, To(A)), (E, To(A))],
        (Five, Five) => &[(A, To(E)), (B, To(D)), (C, To(C)), (D, To(B)), (E, To(A))],
        (Five, Six) => &[(A, To(F)), (B, To(E)), (C, To(D)), (D, To(C)), (E, Split(&[A, B]))],

        (Six, One) => &[
            (A, To(A)),
            (B, To(A)),
            (C, To(A)),
            (D, To(A)),
            (E, To(A)),
            (F, To(A)),
        ],
        (Six, Two) => &[
            (A, To(B)),
            (B, To(A)),
            (C, To(A)),
            (D, To(B)),
            (E, To(B)),
            (F, To(A)),
        ],
        (Six, Three) => &[
            (A, To(C)),
            (B, To(B)),
            (C, To(A)),
            (D, To(C)),
            (E, To(B)),
            (F, To(A)),
        ],
        (Six, Four) => &[
            (A, To(D)),
            (B, To(C)),
            (C, To(B)),
            (D, To(A)),
            (E, To(B)),
            (F, To(D)),
        ],
        (Six, Five) => &[
            (A, To(E)),
            (B, To(D)),
            (C, To(C)),
            (D, To(B)),
            (E, To(A)),
            (F, To(A)),
        ],
        (Six, Six) => &[
            (A, To(F)),
            (B, To(E)),
            (C, To(D)),
            (D, To(C)),
            (E, To(B)),
            (F, To(A)),
        ],
    }
}

fn flow_for(rule: &'static [(PipSlot, PipFlow)], slot: PipSlot) -> Option<PipFlow> {
    rule.iter().find(|(source, _)| *source == slot).map(|(_, flow)| *flow)
}

/// Rearrange the current pips into the slots of the target face without moving
/// anything visually.
///
/// Every destination slot inherits the position of the pip it flows from, so a
/// split produces new pips stacked on top of their parent, ready to fan out in
/// the following animated phase. Used when the target face needs at least as
/// many pips as are currently showing; must be committed before the animated
/// phase so new pips exist at a stable coordinate first.
pub fn grow_pose(last: &RenderPose, to: FaceValue) -> Pose {
    let Some(from) = last.value else {
        return Pose::empty();
    };

    let rule = transition_rule(from, to);
    let mut next = Pose::empty();
    for (slot, position) in last.pose.iter() {
        match flow_for(rule, slot) {
            Some(PipFlow::To(destination)) => next.set(destination, position),
            Some(PipFlow::Split(destinations)) => {
                for destination in destinations {
                    next.set(*destination, position);
                }
            }
            None => {}
        }
    }
    next
}

/// Collapse the current pips toward the canonical slots of a smaller target
/// face.
///
/// Only single-destination flows converge; pips whose flow splits or is absent
/// are dropped, they disappear rather than merge. The surviving pips keep
/// their source slot identity but sit at the destination's canonical position,
/// which keeps drawable-object identity stable through the animated phase.
/// Deliberately asymmetric with [`grow_pose`]: per animation step the pip
/// count only ever moves in one direction, so shrink never has to resolve a
/// many-to-one split.
pub fn shrink_and_converge(last: &RenderPose, to: FaceValue) -> Pose {
    let Some(from) = last.value else {
        return Pose::empty();
    };

    let final_pose = canonical_pose(to);
    let rule = transition_rule(from, to);
    let mut next = Pose::empty();
    for (slot, _) in last.pose.iter() {
        if let Some(PipFlow::To(destination)) = flow_for(rule, slot) {
            if let Some(position) = final_pose.get(destination) {
                next.set(slot, position);
            }
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::face::Position;
    use std::collections::BTreeSet;
    use strum::IntoEnumIterator;

    fn resting(value: FaceValue) -> RenderPose {
        RenderPose { animate: false, value: Some(value), pose: canonical_pose(value) }
    }

    fn slot_set(pose: &Pose) -> BTreeSet<usize> {
        pose.active_slots().map(PipSlot::index).collect()
    }

    #[test]
    fn test_rule_defined_for_every_ordered_pair() {
        for from in FaceValue::iter() {
            for to in FaceValue::iter() {
                let rule = transition_rule(from, to);
                assert!(!rule.is_empty(), "empty rule for {from:?} -> {to:?}");
                // Every active slot of the source face must have a flow
                for (slot, _) in canonical_pose(from).iter() {
                    assert!(
                        flow_for(rule, slot).is_some(),
                        "no flow for {slot:?} in {from:?} -> {to:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_grow_covers_target_slots_exactly() {
        for from in FaceValue::iter() {
            for to in FaceValue::iter().filter(|to| to.pip_count() >= from.pip_count()) {
                let grown = grow_pose(&resting(from), to);
                assert_eq!(
                    slot_set(&grown),
                    slot_set(&canonical_pose(to)),
                    "grow {from:?} -> {to:?} misses target slots"
                );
            }
        }
    }

    #[test]
    fn test_grown_pips_depart_from_existing_positions() {
        let start = resting(FaceValue::Two);
        let grown = grow_pose(&start, FaceValue::Five);
        let origins: Vec<_> = start.pose.iter().map(|(_, position)| position).collect();
        for (slot, position) in grown.iter() {
            assert!(
                origins.contains(&position),
                "{slot:?} did not inherit a parent position: {position:?}"
            );
        }
    }

    #[test]
    fn test_shrink_converges_onto_target_positions() {
        for from in FaceValue::iter() {
            for to in FaceValue::iter().filter(|to| to.pip_count() < from.pip_count()) {
                let target = canonical_pose(to);
                let targets: Vec<_> = target.iter().map(|(_, position)| position).collect();
                let shrunk = shrink_and_converge(&resting(from), to);
                assert!(!shrunk.is_empty(), "shrink {from:?} -> {to:?} dropped every pip");
                for (slot, position) in shrunk.iter() {
                    assert!(
                        targets.contains(&position),
                        "shrink {from:?} -> {to:?}: {slot:?} landed off-face at {position:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_same_value_rules_are_involutions() {
        // Applying the near-identity rule twice must land back on the
        // canonical pose, so a value set without animation cannot drift.
        for value in FaceValue::iter() {
            let once = grow_pose(&resting(value), value);
            let twice = grow_pose(
                &RenderPose { animate: false, value: Some(value), pose: once },
                value,
            );
            assert_eq!(twice, canonical_pose(value), "{value:?} rule is not an involution");
        }
    }

    #[test]
    fn test_shrink_to_one_converges_on_center() {
        let shrunk = shrink_and_converge(&resting(FaceValue::Six), FaceValue::One);
        assert_eq!(slot_set(&shrunk), slot_set(&canonical_pose(FaceValue::Six)));
        let center = canonical_pose(FaceValue::One).get(PipSlot::A).unwrap();
        for (_, position) in shrunk.iter() {
            assert_eq!(position, center);
        }
    }

    #[test]
    fn test_shrink_ignores_split_flows() {
        // Shrink only follows single-destination flows. The 2 -> 4 rule is
        // all splits, so collapsing through it drops every pip.
        let shrunk = shrink_and_converge(&resting(FaceValue::Two), FaceValue::Four);
        assert!(shrunk.is_empty());
    }

    #[test]
    fn test_missing_flow_means_pip_disappears() {
        // A pose can carry slots the rule does not mention; those pips drop
        // out instead of failing.
        let mut pose = canonical_pose(FaceValue::One);
        pose.set(PipSlot::F, Position::new(0.9, 0.9));
        let last = RenderPose { animate: false, value: Some(FaceValue::One), pose };
        let grown = grow_pose(&last, FaceValue::Two);
        assert_eq!(slot_set(&grown), slot_set(&canonical_pose(FaceValue::Two)));
    }
}
