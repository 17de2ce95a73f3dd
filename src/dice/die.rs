use super::face::{canonical_pose, FaceValue};
use super::roll::{roll_path, RandomSource, ValueSource, ValueSourceError};
use super::transitions::{grow_pose, shrink_and_converge, RenderPose};
use crate::render::scheduler::{FrameScheduler, Scheduler};
use crate::render::DrawSurface;
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How long one pip takes to slide between positions, in milliseconds
pub const PIP_SLIDE_MILLIS: u64 = 240;
/// Stagger of the trailing tail pip behind the main pip
pub const PIP_TAIL_DELAY_MILLIS: u64 = PIP_SLIDE_MILLIS / 6;
/// Safety margin added to waits so scheduler jitter never truncates a slide
pub const ANIMATION_BUFFER_MILLIS: u64 = 2;
/// Full duration of one animated phase including the tail stagger
pub const TOTAL_SLIDE_MILLIS: u64 = PIP_SLIDE_MILLIS + PIP_TAIL_DELAY_MILLIS;

/// Errors a roll can surface to its caller
#[derive(thiserror::Error, Debug)]
pub enum RollError {
    #[error(transparent)]
    Source(#[from] ValueSourceError),

    #[error("failed to draw die: {0}")]
    Surface(#[from] io::Error),
}

/// A die shared across the group coordinator and an input loop
pub type SharedDie = Arc<Mutex<Die>>;

/// One animated die.
///
/// Owns the entire roll state machine: the committed value, the queue of
/// faces still to animate through, and the render pose the drawing layer
/// consumes. A roll drains the queue strictly sequentially; the committed
/// value changes and the change callback fires exactly once, after the final
/// queued face settles.
pub struct Die {
    value: FaceValue,
    disabled: bool,
    managed: bool,
    group_disabled: Option<Arc<AtomicBool>>,
    rolling: bool,
    cycle_running: bool,
    queue: VecDeque<FaceValue>,
    render_pose: RenderPose,
    source: Box<dyn ValueSource + Send>,
    scheduler: Box<dyn Scheduler + Send>,
    surface: Option<Box<dyn DrawSurface + Send>>,
    on_change: Option<Box<dyn FnMut(FaceValue) + Send>>,
    rng: fastrand::Rng,
}

impl Die {
    pub fn builder() -> DieBuilder {
        DieBuilder::default()
    }

    /// The committed face value. Stays at the pre-roll value until the whole
    /// roll animation has finished.
    pub fn value(&self) -> FaceValue {
        self.value
    }

    pub fn is_rolling(&self) -> bool {
        self.rolling
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
            || self
                .group_disabled
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Whether a group coordinator owns this die's roll trigger
    pub fn is_managed(&self) -> bool {
        self.managed
    }

    pub fn render_pose(&self) -> &RenderPose {
        &self.render_pose
    }

    pub(crate) fn set_managed(&mut self, managed: bool) {
        self.managed = managed;
    }

    pub(crate) fn attach_group_disabled(&mut self, flag: Arc<AtomicBool>) {
        self.group_disabled = Some(flag);
    }

    /// Redraw the current pose, e.g. after the surface was first attached or
    /// the screen was cleared.
    pub fn refresh(&mut self) -> io::Result<()> {
        if let Some(surface) = self.surface.as_mut() {
            surface.commit(&self.render_pose)?;
        }
        Ok(())
    }

    /// Set the face directly, without animation.
    pub fn set_value(&mut self, value: i64) -> io::Result<()> {
        let value = FaceValue::clamped(value);
        self.value = value;
        self.commit(RenderPose { animate: false, value: Some(value), pose: canonical_pose(value) })
    }

    /// Roll the die.
    ///
    /// No-ops with `Ok(None)` while disabled or mid-roll. Otherwise asks the
    /// value source for a target (clamped into range), animates through a
    /// generated multi-face path, and returns the target once the last step
    /// has settled and the change callback has fired. A value-source failure
    /// propagates before any state is touched.
    pub fn request_roll(&mut self) -> Result<Option<FaceValue>, RollError> {
        if self.is_disabled() || self.rolling {
            return Ok(None);
        }

        let target = FaceValue::clamped(self.source.next_value()?);
        self.queue = roll_path(self.value, target, &mut self.rng).into();

        self.rolling = true;
        let drained = self.drain_queue();
        self.rolling = false;
        drained?;

        Ok(Some(target))
    }

    /// Consume queued faces one animation cycle at a time. Cycles never
    /// overlap: the running flag blocks re-entry from surface callbacks.
    fn drain_queue(&mut self) -> Result<(), RollError> {
        while let Some(&step) = self.queue.front() {
            if self.cycle_running {
                break;
            }
            self.cycle_running = true;
            let cycle = self.run_cycle(step);
            self.cycle_running = false;
            cycle?;

            self.queue.pop_front();
            if self.queue.is_empty() {
                self.value = step;
                if let Some(notify) = self.on_change.as_mut() {
                    notify(step);
                }
            }
        }
        Ok(())
    }

    /// One queued face, in three committed phases:
    /// rearrange (new pips materialize on their parents, no motion), animate
    /// (pips slide to their destinations), settle (exact canonical layout,
    /// animation cleared).
    fn run_cycle(&mut self, step: FaceValue) -> Result<(), RollError> {
        let reduction = self.render_pose.value.is_some_and(|last| step < last);

        if !reduction {
            // New pips must exist at a stable coordinate for one frame before
            // a slide is applied, or the surface would see a same-frame
            // create-and-move it cannot tween.
            let pose = grow_pose(&self.render_pose, step);
            self.commit(RenderPose { animate: false, value: self.render_pose.value, pose })?;
        }
        // Reductions leave the pose untouched here but still spend the frame,
        // so every cycle paces identically.
        self.scheduler.next_frame();

        let pose = if reduction {
            shrink_and_converge(&self.render_pose, step)
        } else {
            canonical_pose(step)
        };
        self.commit(RenderPose { animate: true, value: Some(step), pose })?;
        self.scheduler
            .wait(Duration::from_millis(TOTAL_SLIDE_MILLIS + ANIMATION_BUFFER_MILLIS));
        self.scheduler.next_frame();

        self.commit(RenderPose { animate: false, value: Some(step), pose: canonical_pose(step) })?;
        self.scheduler.next_frame();
        Ok(())
    }

    fn commit(&mut self, pose: RenderPose) -> io::Result<()> {
        self.render_pose = pose;
        if let Some(surface) = self.surface.as_mut() {
            surface.commit(&self.render_pose)?;
        }
        Ok(())
    }

    pub fn into_shared(self) -> SharedDie {
        Arc::new(Mutex::new(self))
    }
}

/// Configures and builds a [`Die`]
pub struct DieBuilder {
    initial_value: Option<i64>,
    disabled: bool,
    seed: Option<u64>,
    source: Box<dyn ValueSource + Send>,
    scheduler: Box<dyn Scheduler + Send>,
    surface: Option<Box<dyn DrawSurface + Send>>,
    on_change: Option<Box<dyn FnMut(FaceValue) + Send>>,
}

impl Default for DieBuilder {
    fn default() -> Self {
        Self {
            initial_value: None,
            disabled: false,
            seed: None,
            source: Box::new(RandomSource::new()),
            scheduler: Box::new(FrameScheduler::new()),
            surface: None,
            on_change: None,
        }
    }
}

impl DieBuilder {
    /// Starting face; clamped into range, defaults to 1 when absent.
    pub fn initial_value(mut self, value: i64) -> Self {
        self.initial_value = Some(value);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Seed for the intermediate-path generator, for reproducible rolls.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn value_source(mut self, source: impl ValueSource + Send + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    pub fn scheduler(mut self, scheduler: impl Scheduler + Send + 'static) -> Self {
        self.scheduler = Box::new(scheduler);
        self
    }

    pub fn surface(mut self, surface: impl DrawSurface + Send + 'static) -> Self {
        self.surface = Some(Box::new(surface));
        self
    }

    /// Called exactly once per completed roll, with the committed value.
    pub fn on_change(mut self, notify: impl FnMut(FaceValue) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(notify));
        self
    }

    pub fn build(self) -> Die {
        let value = FaceValue::clamped(self.initial_value.unwrap_or(1));
        Die {
            value,
            disabled: self.disabled,
            managed: false,
            group_disabled: None,
            rolling: false,
            cycle_running: false,
            queue: VecDeque::new(),
            render_pose: RenderPose {
                animate: false,
                value: Some(value),
                pose: canonical_pose(value),
            },
            source: self.source,
            scheduler: self.scheduler,
            surface: self.surface,
            on_change: self.on_change,
            rng: self.seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed),
        }
    }
}
