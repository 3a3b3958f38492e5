//! Cooperative cancellation for exponential searches.
//!
//! The enumerator, the well-foundedness check and the discrete-topology
//! check all walk search spaces that grow like `2^n` or worse. Each of
//! them polls a [`CancelToken`] through a [`Ticker`] every few thousand
//! steps and stops early when the token fires, reporting an explicitly
//! incomplete result instead of an error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default number of steps between two polls of the token.
pub const DEFAULT_CHECK_INTERVAL: u32 = 4096;

/// Shared cancellation flag with an optional deadline.
///
/// Clones share the flag: cancelling one clone cancels them all.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that only fires when [`cancel`][Self::cancel] is called.
    pub fn never() -> Self {
        Self::default()
    }

    /// Returns a token sharing this flag that also fires at `deadline`.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        Self {
            flag: Arc::clone(&self.flag),
            deadline: Some(deadline),
        }
    }

    /// Returns a token sharing this flag that also fires after `timeout`.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once cancellation was requested or the deadline passed.
    pub fn is_cancelled(&self) -> bool {
        if self.flag.load(Ordering::Relaxed) {
            return true;
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.flag.store(true, Ordering::Relaxed);
                true
            }
            _ => false,
        }
    }
}

/// Polls a [`CancelToken`] every `interval` steps.
///
/// Once the token has fired, the ticker stays fired.
#[derive(Debug)]
pub struct Ticker<'a> {
    token: Option<&'a CancelToken>,
    interval: u32,
    countdown: u32,
    fired: bool,
}

impl<'a> Ticker<'a> {
    pub fn new(token: &'a CancelToken, interval: u32) -> Self {
        let interval = interval.max(1);
        Self {
            token: Some(token),
            interval,
            countdown: interval,
            fired: false,
        }
    }

    /// A ticker without a token; it never fires.
    pub fn unbounded() -> Ticker<'static> {
        Ticker {
            token: None,
            interval: u32::MAX,
            countdown: u32::MAX,
            fired: false,
        }
    }

    /// Counts one step; returns `true` if the search must stop.
    #[inline]
    pub fn tick(&mut self) -> bool {
        let Some(token) = self.token else {
            return false;
        };
        if self.fired {
            return true;
        }
        self.countdown -= 1;
        if self.countdown == 0 {
            self.countdown = self.interval;
            self.fired = token.is_cancelled();
        }
        self.fired
    }

    /// Returns `true` if the token fired during one of the ticks.
    pub fn fired(&self) -> bool {
        self.fired
    }
}

/// Result of a predicate that may be interrupted.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Outcome<T> {
    /// The predicate ran to completion.
    Decided(T),
    /// The token fired before the predicate could decide.
    Cancelled,
}

impl<T> Outcome<T> {
    /// The decided value, if any.
    pub fn decided(self) -> Option<T> {
        match self {
            Outcome::Decided(value) => Some(value),
            Outcome::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Decided(value) => Outcome::Decided(f(value)),
            Outcome::Cancelled => Outcome::Cancelled,
        }
    }

    /// Unwraps an outcome computed with a token that never fires.
    pub(crate) fn settled(self) -> T {
        match self {
            Outcome::Decided(value) => value,
            Outcome::Cancelled => unreachable!("a token that never fires was cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_cancel_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_deadline() {
        let token = CancelToken::new();
        let expired = token.with_deadline(Instant::now());
        assert!(expired.is_cancelled());
        // The deadline flips the shared flag.
        assert!(token.is_cancelled());

        let relaxed = CancelToken::new().with_timeout(Duration::from_secs(3600));
        assert!(!relaxed.is_cancelled());
    }

    #[test]
    fn test_ticker_polls_every_interval() {
        let token = CancelToken::new();
        let mut ticker = Ticker::new(&token, 3);
        assert!(!ticker.tick());
        token.cancel();
        assert!(!ticker.tick());
        assert!(ticker.tick());
        assert!(ticker.fired());
        assert!(ticker.tick());

        let mut unbounded = Ticker::unbounded();
        assert!((0..10_000).all(|_| !unbounded.tick()));
    }

    #[test]
    fn test_outcome() {
        assert_eq!(Outcome::Decided(2).map(|x| x * 2), Outcome::Decided(4));
        assert_eq!(Outcome::<i32>::Cancelled.decided(), None);
        assert!(Outcome::<()>::Cancelled.is_cancelled());
        assert_eq!(Outcome::Decided(true).settled(), true);
    }
}
