//! Terminal dice that roll by sliding their pips between faces.
//!
//! A die face never swaps wholesale: every pip slides, splits, or disappears
//! along a curated correspondence between the old face's pip layout and the
//! new one, and a roll animates through several intermediate faces before the
//! final value is committed and observers are notified.

pub mod dice;
pub mod render;
pub mod theme;

pub use dice::die::{
    Die, DieBuilder, RollError, SharedDie, ANIMATION_BUFFER_MILLIS, PIP_SLIDE_MILLIS,
    PIP_TAIL_DELAY_MILLIS, TOTAL_SLIDE_MILLIS,
};
pub use dice::face::{canonical_pose, FaceValue, PipSlot, Pose, Position};
pub use dice::group::{DiceGroup, RegistrationId, RollHandle};
pub use dice::roll::{FixedSource, RandomSource, ValueSource, ValueSourceError};
pub use dice::transitions::{
    grow_pose, shrink_and_converge, transition_rule, PipFlow, RenderPose,
};
pub use render::scheduler::{FrameScheduler, ImmediateScheduler, Scheduler};
pub use render::terminal::TerminalSurface;
pub use render::DrawSurface;
pub use theme::{DiceTheme, ThemeError};
