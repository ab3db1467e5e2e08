//! Blocking delay abstraction used by timed choreographies.
//!
//! Choreographies such as "begin service" sleep between steps. Routing every
//! sleep through [`Delay`] lets tests run a full script instantly with
//! [`MockDelay`] while a real application uses [`StdDelay`].
//!
//! # Example
//!
//! ```rust
//! use rs_lionchief::traits::Delay;
//! use rs_lionchief::hal::MockDelay;
//!
//! let mut delay = MockDelay::new();
//! delay.delay_secs(2);
//! delay.delay_ms(250);
//!
//! assert_eq!(delay.delays, vec![2000, 250]);
//! assert_eq!(delay.elapsed_ms(), 2250);
//! ```
//!
//! [`MockDelay`]: crate::hal::MockDelay
//! [`StdDelay`]: crate::hal::StdDelay

/// Blocking delay provider.
///
/// Calls block the caller for the full duration; there is no cancellation.
pub trait Delay {
    /// Block for the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Block for the specified number of whole seconds.
    fn delay_secs(&mut self, secs: u32) {
        self.delay_ms(secs.saturating_mul(1000));
    }
}

impl<T: Delay + ?Sized> Delay for &mut T {
    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }
}
