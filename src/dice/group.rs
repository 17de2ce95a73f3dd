use super::die::{RollError, SharedDie};
use super::face::FaceValue;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Handle invoked by the group to roll one registered die
pub type RollHandle = Box<dyn FnMut() -> Result<Option<FaceValue>, RollError> + Send>;

/// Token returned by [`DiceGroup::register`]; hand it back to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationId(u64);

struct RegisteredDie {
    id: u64,
    handle: RollHandle,
}

/// Rolls a set of dice as one unit.
///
/// Dice register a roll handle and give up their independent trigger; the
/// group invokes every handle concurrently and reports the resolved values,
/// in registration order, once all of them have finished. The group's
/// disabled flag is shared read-only with every registered die.
pub struct DiceGroup {
    dice: Vec<RegisteredDie>,
    next_id: u64,
    disabled: Arc<AtomicBool>,
    rolling: bool,
    on_change: Option<Box<dyn FnMut(&[FaceValue]) + Send>>,
}

impl Default for DiceGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl DiceGroup {
    pub fn new() -> Self {
        Self {
            dice: Vec::new(),
            next_id: 0,
            disabled: Arc::new(AtomicBool::new(false)),
            rolling: false,
            on_change: None,
        }
    }

    /// Called once per completed group roll with all resolved values.
    pub fn on_change(mut self, notify: impl FnMut(&[FaceValue]) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(notify));
        self
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled.store(disabled, Ordering::Relaxed);
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.dice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    /// Register a raw roll handle.
    pub fn register(&mut self, handle: RollHandle) -> RegistrationId {
        let id = self.next_id;
        self.next_id += 1;
        self.dice.push(RegisteredDie { id, handle });
        RegistrationId(id)
    }

    /// Register a shared die: marks it group-managed (its own click trigger
    /// is suppressed) and wires it to the group's disabled flag.
    pub fn register_die(&mut self, die: &SharedDie) -> RegistrationId {
        {
            let mut die = die.lock().unwrap();
            die.set_managed(true);
            die.attach_group_disabled(self.disabled.clone());
        }
        let die = die.clone();
        self.register(Box::new(move || die.lock().unwrap().request_roll()))
    }

    pub fn unregister(&mut self, id: RegistrationId) {
        self.dice.retain(|die| die.id != id.0);
    }

    /// Roll every registered die at once.
    ///
    /// No-ops with `Ok(None)` while disabled or already rolling. Each die
    /// runs on its own thread; the results are collected in registration
    /// order once all of them are done, skipping dice that individually
    /// no-oped, and the change callback fires once with the full set.
    pub fn roll_all(&mut self) -> Result<Option<Vec<FaceValue>>, RollError> {
        if self.rolling || self.is_disabled() {
            return Ok(None);
        }

        self.rolling = true;
        let results: Vec<Result<Option<FaceValue>, RollError>> = thread::scope(|scope| {
            let handles: Vec<_> = self
                .dice
                .iter_mut()
                .map(|die| scope.spawn(move || (die.handle)()))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("die roll thread panicked"))
                .collect()
        });
        self.rolling = false;

        let mut values = Vec::with_capacity(results.len());
        for result in results {
            if let Some(value) = result? {
                values.push(value);
            }
        }

        if let Some(notify) = self.on_change.as_mut() {
            notify(&values);
        }
        Ok(Some(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::die::Die;
    use crate::dice::roll::FixedSource;
    use crate::render::scheduler::ImmediateScheduler;
    use std::sync::Mutex;

    fn quiet_die(initial: i64, target: i64) -> SharedDie {
        Die::builder()
            .initial_value(initial)
            .seed(5)
            .value_source(FixedSource(target))
            .scheduler(ImmediateScheduler)
            .build()
            .into_shared()
    }

    #[test]
    fn test_group_roll_collects_values_in_registration_order() {
        let notified: Arc<Mutex<Vec<Vec<FaceValue>>>> = Arc::new(Mutex::new(Vec::new()));
        let mut group = DiceGroup::new().on_change({
            let notified = notified.clone();
            move |values: &[FaceValue]| notified.lock().unwrap().push(values.to_vec())
        });

        let first = quiet_die(1, 2);
        let second = quiet_die(1, 5);
        group.register_die(&first);
        group.register_die(&second);

        let values = group.roll_all().unwrap().unwrap();
        assert_eq!(values, vec![FaceValue::Two, FaceValue::Five]);
        assert_eq!(first.lock().unwrap().value(), FaceValue::Two);
        assert_eq!(second.lock().unwrap().value(), FaceValue::Five);
        assert_eq!(*notified.lock().unwrap(), vec![vec![FaceValue::Two, FaceValue::Five]]);
    }

    #[test]
    fn test_registration_marks_die_as_managed() {
        let mut group = DiceGroup::new();
        let die = quiet_die(1, 4);
        assert!(!die.lock().unwrap().is_managed());
        group.register_die(&die);
        assert!(die.lock().unwrap().is_managed());
    }

    #[test]
    fn test_disabled_group_suppresses_member_rolls() {
        let mut group = DiceGroup::new();
        let die = quiet_die(3, 6);
        group.register_die(&die);
        group.set_disabled(true);

        // The group no-ops, and the shared flag also blocks a direct roll.
        assert_eq!(group.roll_all().unwrap(), None);
        assert_eq!(die.lock().unwrap().request_roll().unwrap(), None);
        assert_eq!(die.lock().unwrap().value(), FaceValue::Three);

        group.set_disabled(false);
        let values = group.roll_all().unwrap().unwrap();
        assert_eq!(values, vec![FaceValue::Six]);
    }

    #[test]
    fn test_unregister_removes_the_die() {
        let mut group = DiceGroup::new();
        let first = quiet_die(1, 2);
        let second = quiet_die(1, 3);
        let id = group.register_die(&first);
        group.register_die(&second);
        assert_eq!(group.len(), 2);

        group.unregister(id);
        assert_eq!(group.len(), 1);
        let values = group.roll_all().unwrap().unwrap();
        assert_eq!(values, vec![FaceValue::Three]);
    }

    #[test]
    fn test_individually_disabled_dice_are_skipped() {
        let mut group = DiceGroup::new();
        let active = quiet_die(1, 4);
        group.register_die(&active);
        group.register(Box::new(|| Ok(None)));

        let values = group.roll_all().unwrap().unwrap();
        assert_eq!(values, vec![FaceValue::Four]);
    }
}
