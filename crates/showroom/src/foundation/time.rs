//! Time management utilities
//!
//! The showroom never reads the wall clock itself: the host passes a
//! monotonically increasing timestamp (time since session start) into every
//! input, timer and frame entry point. That keeps the whole session
//! reproducible under test.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

/// Frame timing driven by host presentation timestamps
#[derive(Debug, Clone, Default)]
pub struct FrameTimer {
    last_frame: Option<Duration>,
    delta_time: Duration,
    frame_count: u64,
}

impl FrameTimer {
    /// Create a new timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame presented at `now`
    pub fn advance(&mut self, now: Duration) {
        self.delta_time = self
            .last_frame
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.last_frame = Some(now);
        self.frame_count += 1;
    }

    /// Time between the last two frames
    pub fn delta_time(&self) -> Duration {
        self.delta_time
    }

    /// Timestamp of the most recent frame
    pub fn last_frame(&self) -> Option<Duration> {
        self.last_frame
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the current FPS (based on last frame time)
    pub fn current_fps(&self) -> f32 {
        let secs = self.delta_time.as_secs_f32();
        if secs > 0.0 {
            1.0 / secs
        } else {
            0.0
        }
    }
}

#[derive(Debug)]
struct Scheduled<T> {
    due: Duration,
    seq: u64,
    payload: T,
}

impl<T> PartialEq for Scheduled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Scheduled<T> {}

impl<T> PartialOrd for Scheduled<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Scheduled<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due.cmp(&other.due).then(self.seq.cmp(&other.seq))
    }
}

/// One-shot timers keyed by deadline.
///
/// Timers with equal deadlines fire in the order they were armed. Armed
/// timers cannot be cancelled.
#[derive(Debug)]
pub struct TimerQueue<T> {
    heap: BinaryHeap<Reverse<Scheduled<T>>>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a timer that fires at `due`
    pub fn schedule(&mut self, due: Duration, payload: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Scheduled { due, seq, payload }));
    }

    /// Pop the earliest timer whose deadline is `<= now`
    pub fn pop_due(&mut self, now: Duration) -> Option<T> {
        if self.heap.peek().is_some_and(|Reverse(next)| next.due <= now) {
            self.heap.pop().map(|Reverse(timer)| timer.payload)
        } else {
            None
        }
    }

    /// Deadline of the next timer, if any
    pub fn next_due(&self) -> Option<Duration> {
        self.heap.peek().map(|Reverse(next)| next.due)
    }

    /// Number of armed timers
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether no timers are armed
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
