//! Desktop implementations backed by the standard library.

use std::thread;
use std::time::Duration;

use crate::traits::Delay;

/// Wall-clock delay using [`std::thread::sleep`].
///
/// Blocks the calling thread for the full duration. Run choreographies on a
/// dedicated thread if the caller must stay responsive.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdDelay;

impl StdDelay {
    /// Creates a new wall-clock delay.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Delay for StdDelay {
    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn sleeps_at_least_requested_time() {
        let mut delay = StdDelay::new();
        let start = Instant::now();
        delay.delay_ms(20);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
