use crate::dice::die::{PIP_SLIDE_MILLIS, PIP_TAIL_DELAY_MILLIS, TOTAL_SLIDE_MILLIS};
use crate::dice::face::{Pose, Position};
use crate::dice::transitions::RenderPose;
use crate::render::DrawSurface;
use crate::theme::{DiceTheme, ThemeError};
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use std::io::{self, Stdout, Write};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Crossterm drawing surface for one die.
///
/// Draws a bordered box with pip glyphs at cell positions scaled from the
/// normalized pose. An animated commit is tweened: pips slide from their
/// previous positions along an eased curve, with a dimmer tail pip trailing
/// behind each one, mirroring the staggered two-layer pip the original visual
/// design uses. The stdout handle is shared and locked per frame so several
/// dice can animate concurrently without interleaving their escape sequences.
pub struct TerminalSurface {
    out: Arc<Mutex<Stdout>>,
    origin: (u16, u16),
    theme: DiceTheme,
    pip_color: Color,
    border_color: Color,
    last: Pose,
}

impl TerminalSurface {
    pub fn new(theme: DiceTheme, origin: (u16, u16)) -> Result<Self, ThemeError> {
        Self::with_writer(Arc::new(Mutex::new(io::stdout())), theme, origin)
    }

    /// Share one stdout handle between several surfaces.
    pub fn with_writer(
        out: Arc<Mutex<Stdout>>,
        theme: DiceTheme,
        origin: (u16, u16),
    ) -> Result<Self, ThemeError> {
        let pip_color = theme.pip_color()?;
        let border_color = theme.border_color()?;
        Ok(Self { out, origin, theme, pip_color, border_color, last: Pose::empty() })
    }

    /// Total footprint in cells, including the border.
    pub fn extent(theme: &DiceTheme) -> (u16, u16) {
        (theme.width + 2, theme.height + 2)
    }

    fn cell(&self, position: Position) -> (u16, u16) {
        let (ox, oy) = self.origin;
        let col = ox + 1 + (position.x * f32::from(self.theme.width.saturating_sub(1))).round() as u16;
        let row = oy + 1 + (position.y * f32::from(self.theme.height.saturating_sub(1))).round() as u16;
        (col, row)
    }

    /// Paint one frame: border, cleared interior, then pips. Tail pips come
    /// first in `pips` so a head pip overdraws its tail when they share a cell.
    fn draw(&self, pips: &[(Position, char)]) -> io::Result<()> {
        let (ox, oy) = self.origin;
        let width = usize::from(self.theme.width);
        let horizontal = "─".repeat(width);

        let mut out = self.out.lock().unwrap();
        queue!(out, SetForegroundColor(self.border_color))?;
        queue!(out, MoveTo(ox, oy), Print(format!("┌{horizontal}┐")))?;
        for row in 0..self.theme.height {
            queue!(
                out,
                MoveTo(ox, oy + 1 + row),
                Print(format!("│{}│", " ".repeat(width)))
            )?;
        }
        queue!(out, MoveTo(ox, oy + 1 + self.theme.height), Print(format!("└{horizontal}┘")))?;

        queue!(out, SetForegroundColor(self.pip_color))?;
        for (position, glyph) in pips {
            let (col, row) = self.cell(*position);
            queue!(out, MoveTo(col, row), Print(glyph))?;
        }
        queue!(out, ResetColor)?;
        out.flush()
    }

    fn draw_pose(&self, pose: &Pose) -> io::Result<()> {
        let pips: Vec<_> =
            pose.iter().map(|(_, position)| (position, self.theme.pip_glyph)).collect();
        self.draw(&pips)
    }

    fn tween(&self, target: &Pose) -> io::Result<()> {
        let start = Instant::now();
        let frame = Duration::from_millis(16);
        loop {
            let elapsed = start.elapsed().as_millis() as u64;
            let head = slide_progress(elapsed, 0);
            let tail = slide_progress(elapsed, PIP_TAIL_DELAY_MILLIS);

            let mut pips = Vec::new();
            for (slot, to) in target.iter() {
                // Pips without a previous position appear in place.
                let from = self.last.get(slot).unwrap_or(to);
                if tail < 1.0 {
                    pips.push((lerp(from, to, tail), self.theme.tail_glyph));
                }
                pips.push((lerp(from, to, head), self.theme.pip_glyph));
            }
            self.draw(&pips)?;

            if elapsed >= TOTAL_SLIDE_MILLIS {
                return Ok(());
            }
            thread::sleep(frame);
        }
    }
}

impl DrawSurface for TerminalSurface {
    fn commit(&mut self, pose: &RenderPose) -> io::Result<()> {
        if pose.animate {
            self.tween(&pose.pose)?;
        } else {
            self.draw_pose(&pose.pose)?;
        }
        self.last = pose.pose.clone();
        Ok(())
    }
}

/// Eased progress of a slide that started `delay` ms into the phase
fn slide_progress(elapsed_millis: u64, delay_millis: u64) -> f32 {
    let t = elapsed_millis.saturating_sub(delay_millis) as f32 / PIP_SLIDE_MILLIS as f32;
    ease(t.min(1.0))
}

/// Cubic ease-in-out
fn ease(t: f32) -> f32 {
    if t < 0.5 { 4.0 * t * t * t } else { 1.0 - (-2.0 * t + 2.0).powi(3) / 2.0 }
}

fn lerp(from: Position, to: Position, t: f32) -> Position {
    Position::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t)
}
