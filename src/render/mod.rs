pub mod scheduler;
pub mod terminal;

use crate::dice::transitions::RenderPose;
use std::io;

/// The drawing layer a die talks to.
///
/// A surface receives every committed pose wholesale. When the pose carries
/// the animate flag the surface is expected to slide pips from their previous
/// positions to the new ones over the pip-slide duration; otherwise it should
/// place them instantly.
pub trait DrawSurface {
    fn commit(&mut self, pose: &RenderPose) -> io::Result<()>;
}
