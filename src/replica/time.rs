use tokio::time::Instant;

/// Clock is the replica's only source of time: lease validity and read deadlines are both
/// judged against it, so tests can drive time by hand.
#[async_trait::async_trait]
pub(crate) trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> Instant;
    async fn sleep_until(&mut self, deadline: Instant);
}

#[derive(Copy, Clone)]
pub(crate) struct RealClock;

#[async_trait::async_trait]
impl Clock for RealClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now()
    }

    async fn sleep_until(&mut self, deadline: Instant) {
        tokio::time::sleep_until(deadline).await;
    }
}

#[cfg(test)]
pub(crate) use manual::{manual_clock, ManualClock, ManualClockHandle};

/// A clock that only moves when its handle says so. Leases and read deadlines in tests are driven
/// through it.
#[cfg(test)]
mod manual {
    use super::Clock;
    use tokio::sync::watch;
    use tokio::time::{Duration, Instant};

    pub(crate) fn manual_clock() -> (ManualClock, ManualClockHandle) {
        let (tx, rx) = watch::channel(Instant::now());
        (ManualClock { now: rx }, ManualClockHandle { now: tx })
    }

    #[derive(Clone)]
    pub(crate) struct ManualClock {
        now: watch::Receiver<Instant>,
    }

    #[async_trait::async_trait]
    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            *self.now.borrow()
        }

        async fn sleep_until(&mut self, deadline: Instant) {
            while *self.now.borrow() < deadline {
                if self.now.changed().await.is_err() {
                    // Handle is gone, the deadline can't be reached.
                    std::future::pending::<()>().await;
                }
            }
        }
    }

    pub(crate) struct ManualClockHandle {
        now: watch::Sender<Instant>,
    }

    impl ManualClockHandle {
        pub(crate) fn now(&self) -> Instant {
            *self.now.borrow()
        }

        pub(crate) fn advance(&mut self, by: Duration) {
            let later = self.now() + by;
            // No clock may be listening anymore. `now()` still moves.
            let _ = self.now.send(later);
        }
    }
}
