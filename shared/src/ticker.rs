//! Live wall clock and its once-per-second ticker
//!
//! The ticker is owned by whichever view shows the clock: it starts when the
//! view is built and the background thread is stopped and joined when the
//! ticker is dropped.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use log::debug;

/// Default tick period for the live clock
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Source of local wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallClock {
    /// Follow the operating system's local zone
    System,
    /// A fixed IANA zone
    Zone(Tz),
}

impl WallClock {
    /// Parse an IANA zone name
    pub fn parse(name: &str) -> Result<Self, String> {
        name.parse::<Tz>()
            .map(WallClock::Zone)
            .map_err(|_| format!("Invalid timezone: {}", name))
    }

    pub fn now(&self) -> NaiveDateTime {
        match self {
            WallClock::System => Local::now().naive_local(),
            WallClock::Zone(tz) => Utc::now().with_timezone(tz).naive_local(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Background task sending the current wall-clock time at a fixed period
pub struct ClockTicker {
    ticks: Receiver<NaiveDateTime>,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    last: NaiveDateTime,
}

impl ClockTicker {
    pub fn start(clock: WallClock, interval: Duration) -> std::io::Result<Self> {
        let (tick_tx, tick_rx) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("clock-ticker".to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if tick_tx.send(clock.now()).is_err() {
                            break;
                        }
                    }
                    // Explicit stop or the owner went away
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        debug!("Clock ticker started ({:?})", interval);
        Ok(Self {
            ticks: tick_rx,
            stop: Some(stop_tx),
            handle: Some(handle),
            last: clock.now(),
        })
    }

    /// Newest time received since the last poll, if any
    pub fn poll(&mut self) -> Option<NaiveDateTime> {
        let newest = self.ticks.try_iter().last()?;
        self.last = newest;
        Some(newest)
    }

    /// Block until the next tick arrives or `timeout` passes
    pub fn next_tick(&mut self, timeout: Duration) -> Option<NaiveDateTime> {
        let tick = self.ticks.recv_timeout(timeout).ok()?;
        self.last = tick;
        Some(tick)
    }

    /// Most recent time seen
    pub fn now(&self) -> NaiveDateTime {
        self.last
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Stop the background thread and wait for it to exit
    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
            debug!("Clock ticker stopped");
        }
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_arrive() {
        let mut ticker = ClockTicker::start(WallClock::System, Duration::from_millis(10)).unwrap();
        let first = ticker.next_tick(Duration::from_secs(2)).unwrap();
        let second = ticker.next_tick(Duration::from_secs(2)).unwrap();
        assert!(second >= first);
        assert_eq!(ticker.now(), second);
    }

    #[test]
    fn test_stop_joins_thread() {
        let mut ticker = ClockTicker::start(WallClock::System, Duration::from_secs(60)).unwrap();
        assert!(ticker.is_running());
        // A long interval must not delay the stop
        let started = std::time::Instant::now();
        ticker.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!ticker.is_running());
        assert!(ticker.poll().is_none());
        // Stopping twice is harmless
        ticker.stop();
    }

    #[test]
    fn test_drop_joins_thread() {
        let ticker = ClockTicker::start(WallClock::System, Duration::from_secs(60)).unwrap();
        let started = std::time::Instant::now();
        {
            let _scoped = ticker;
        }
        // Dropping stops the worker without waiting out the interval
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_zone_clock() {
        let clock = WallClock::parse("Asia/Tokyo").unwrap();
        let tokyo = clock.now();
        let utc = Utc::now().naive_utc();
        let diff = (tokyo - utc).num_minutes();
        assert!((diff - 9 * 60).abs() <= 1);
        assert!(WallClock::parse("Nowhere/Special").is_err());
    }
}
