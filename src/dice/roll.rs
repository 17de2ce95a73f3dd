use super::face::FaceValue;

/// Failure reported by a pluggable value source
#[derive(thiserror::Error, Debug)]
#[error("value source failed: {0}")]
pub struct ValueSourceError(pub String);

/// Supplies the target value for a roll.
///
/// Sources are untrusted: a die clamps whatever comes back into the valid
/// face range. A source is consulted at most once per roll request, and a
/// failure aborts the roll before any animation state is touched.
pub trait ValueSource {
    fn next_value(&mut self) -> Result<i64, ValueSourceError>;
}

impl<F> ValueSource for F
where
    F: FnMut() -> Result<i64, ValueSourceError>,
{
    fn next_value(&mut self) -> Result<i64, ValueSourceError> {
        self()
    }
}

/// Uniform pseudorandom faces, the default source
#[derive(Debug, Default)]
pub struct RandomSource {
    rng: fastrand::Rng,
}

impl RandomSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { rng: fastrand::Rng::with_seed(seed) }
    }
}

impl ValueSource for RandomSource {
    fn next_value(&mut self) -> Result<i64, ValueSourceError> {
        Ok(self.rng.i64(1..=6))
    }
}

/// Always produces the same value; handy for scripted demos and tests
#[derive(Debug, Clone, Copy)]
pub struct FixedSource(pub i64);

impl ValueSource for FixedSource {
    fn next_value(&mut self) -> Result<i64, ValueSourceError> {
        Ok(self.0)
    }
}

fn random_face(rng: &mut fastrand::Rng) -> FaceValue {
    FaceValue::clamped(rng.i64(1..=6))
}

/// Build the sequence of faces one roll animates through.
///
/// The path starts at the current face (the pose already on screen), runs
/// through 3..=5 intermediate faces with no two adjacent entries equal, and
/// ends on the target. The intermediate right before the target is resampled
/// until it differs from it, so the final step always moves. When start and
/// target coincide the adjacency constraint already forces visible motion:
/// the first intermediate cannot equal the start.
pub(crate) fn roll_path(
    start: FaceValue,
    target: FaceValue,
    rng: &mut fastrand::Rng,
) -> Vec<FaceValue> {
    let steps = rng.usize(4..=6);
    let mut path = Vec::with_capacity(steps + 1);
    path.push(start);

    let mut previous = start;
    for index in 1..steps {
        let before_target = index == steps - 1;
        let mut next = random_face(rng);
        while next == previous || (before_target && next == target) {
            next = random_face(rng);
        }
        path.push(next);
        previous = next;
    }

    path.push(target);
    path
}
