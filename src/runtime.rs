use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};
use tracing::debug;

/// Period of the timer tick while running
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Identity of one scheduled interval. Every tick carries the id of the interval that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickId(pub u64);

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum TimerEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    Tick(TickId),
}

/// Source of terminal and tick events
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<TimerEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    tx: Sender<TimerEvent>,
    rx: Receiver<TimerEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let reader_tx = tx.clone();

        thread::spawn(move || loop {
            let ev = match event::read() {
                Ok(CtEvent::Key(key)) => TimerEvent::Key(key),
                Ok(CtEvent::Mouse(mouse)) => TimerEvent::Mouse(mouse),
                Ok(CtEvent::Resize(_, _)) => TimerEvent::Resize,
                Ok(_) => continue,
                Err(_) => break,
            };
            if reader_tx.send(ev).is_err() {
                break;
            }
        });

        Self { tx, rx }
    }

    /// Sender feeding the same channel, used by the tick scheduler
    pub fn sender(&self) -> Sender<TimerEvent> {
        self.tx.clone()
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TimerEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<TimerEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<TimerEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TimerEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Handle to a running periodic tick. Dropping the handle cancels the interval.
pub trait TickHandle {
    fn id(&self) -> TickId;
    fn cancel(&mut self);
}

/// Starts periodic ticks
pub trait Scheduler {
    type Handle: TickHandle;

    fn every(&mut self, period: Duration) -> Self::Handle;
}

/// Posts `TimerEvent::Tick` into the event channel from one sleeper thread per interval
#[derive(Debug)]
pub struct ThreadScheduler {
    tx: Sender<TimerEvent>,
    next_id: u64,
}

impl ThreadScheduler {
    pub fn new(tx: Sender<TimerEvent>) -> Self {
        Self { tx, next_id: 0 }
    }
}

impl Scheduler for ThreadScheduler {
    type Handle = IntervalHandle;

    fn every(&mut self, period: Duration) -> IntervalHandle {
        let id = TickId(self.next_id);
        self.next_id += 1;

        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let tx = self.tx.clone();

        thread::spawn(move || {
            // deadline based so sleeps don't accumulate drift
            let mut next = Instant::now() + period;
            loop {
                let now = Instant::now();
                if next > now {
                    thread::sleep(next - now);
                }
                if flag.load(Ordering::Acquire) {
                    break;
                }
                if tx.send(TimerEvent::Tick(id)).is_err() {
                    break;
                }
                next += period;
            }
            debug!(tick = id.0, "interval thread exited");
        });

        IntervalHandle { id, cancelled }
    }
}

#[derive(Debug)]
pub struct IntervalHandle {
    id: TickId,
    cancelled: Arc<AtomicBool>,
}

impl TickHandle for IntervalHandle {
    fn id(&self) -> TickId {
        self.id
    }

    fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Debug, Default)]
struct ManualIntervals {
    next_id: u64,
    started: usize,
    live: Vec<(TickId, Duration)>,
}

/// Deterministic scheduler for tests: records intervals instead of spawning threads.
/// Ticks are delivered by the test itself.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<ManualIntervals>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of intervals that were started and not yet canceled
    pub fn live(&self) -> Vec<TickId> {
        self.inner.borrow().live.iter().map(|(id, _)| *id).collect()
    }

    /// The single live interval, if exactly one exists
    pub fn active(&self) -> Option<TickId> {
        match self.live().as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }

    pub fn period(&self, id: TickId) -> Option<Duration> {
        self.inner
            .borrow()
            .live
            .iter()
            .find(|(live, _)| *live == id)
            .map(|(_, period)| *period)
    }

    /// Total number of intervals ever started
    pub fn started(&self) -> usize {
        self.inner.borrow().started
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn every(&mut self, period: Duration) -> ManualHandle {
        let mut inner = self.inner.borrow_mut();
        let id = TickId(inner.next_id);
        inner.next_id += 1;
        inner.started += 1;
        inner.live.push((id, period));

        ManualHandle {
            id,
            inner: Rc::clone(&self.inner),
        }
    }
}

#[derive(Debug)]
pub struct ManualHandle {
    id: TickId,
    inner: Rc<RefCell<ManualIntervals>>,
}

impl TickHandle for ManualHandle {
    fn id(&self) -> TickId {
        self.id
    }

    fn cancel(&mut self) {
        self.inner.borrow_mut().live.retain(|(id, _)| *id != self.id);
    }
}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Runner that waits for the next event, bounded by a poll interval
pub struct Runner<E: EventSource> {
    event_source: E,
    poll_interval: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E, poll_interval: Duration) -> Self {
        Self {
            event_source,
            poll_interval,
        }
    }

    /// Blocks up to the poll interval and returns the next event, or None on timeout
    pub fn step(&self) -> Option<TimerEvent> {
        match self.event_source.recv_timeout(self.poll_interval) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn step_returns_none_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let runner = Runner::new(es, Duration::from_millis(1));

        assert!(runner.step().is_none());
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(TimerEvent::Resize).unwrap();
        tx.send(TimerEvent::Tick(TickId(7))).unwrap();
        let es = TestEventSource::new(rx);
        let runner = Runner::new(es, Duration::from_millis(10));

        assert_matches!(runner.step(), Some(TimerEvent::Resize));
        assert_matches!(runner.step(), Some(TimerEvent::Tick(TickId(7))));
    }

    #[test]
    fn manual_scheduler_tracks_live_intervals() {
        let mut scheduler = ManualScheduler::new();
        let first = scheduler.every(TICK_PERIOD);
        assert_eq!(scheduler.active(), Some(first.id()));
        assert_eq!(scheduler.period(first.id()), Some(Duration::from_secs(1)));

        let mut second = scheduler.every(TICK_PERIOD);
        assert_ne!(first.id(), second.id());
        assert_eq!(scheduler.live().len(), 2);
        assert_eq!(scheduler.active(), None);

        drop(first);
        assert_eq!(scheduler.active(), Some(second.id()));

        second.cancel();
        assert!(scheduler.live().is_empty());
        assert_eq!(scheduler.started(), 2);
    }

    #[test]
    fn thread_scheduler_delivers_ticks_with_interval_id() {
        let (tx, rx) = mpsc::channel();
        let mut scheduler = ThreadScheduler::new(tx);
        let handle = scheduler.every(Duration::from_millis(5));

        let ev = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_matches!(ev, TimerEvent::Tick(id) if id == handle.id());
    }

    #[test]
    fn thread_scheduler_stops_after_cancel() {
        let (tx, rx) = mpsc::channel();
        let mut scheduler = ThreadScheduler::new(tx);
        let mut handle = scheduler.every(Duration::from_millis(5));
        rx.recv_timeout(Duration::from_secs(2)).unwrap();

        handle.cancel();
        // at most one tick may already be in flight when the flag flips
        thread::sleep(Duration::from_millis(30));
        while rx.try_recv().is_ok() {}
        thread::sleep(Duration::from_millis(30));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn thread_scheduler_assigns_fresh_ids() {
        let (tx, _rx) = mpsc::channel();
        let mut scheduler = ThreadScheduler::new(tx);
        let a = scheduler.every(TICK_PERIOD);
        let b = scheduler.every(TICK_PERIOD);
        assert_ne!(a.id(), b.id());
    }
}
