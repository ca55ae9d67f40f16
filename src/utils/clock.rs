use chrono::{DateTime, Utc};

/// Source of "now". Production uses [`SystemClock`]; tests pin time with
/// [`StoppedClock`] so window decisions are reproducible.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
pub struct StoppedClock(pub DateTime<Utc>);

#[cfg(test)]
impl Clock for StoppedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
