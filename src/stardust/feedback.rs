//! Floating "+N" gain events and the planet's pressed pulse.
//!
//! Events live in a TTL-indexed queue. Expiry is a sweep against the clock,
//! not a per-event timer, so an event that was already removed (e.g. by a
//! reset) has nothing left to cancel.

use std::collections::VecDeque;

/// A floating text shown where the player clicked.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedbackEvent {
    /// Unique for the lifetime of the queue.
    pub id: u64,
    /// Terminal column at creation.
    pub x: u16,
    /// Terminal row at creation.
    pub y: u16,
    /// Formatted gain, without the leading `+`.
    pub text: String,
    pub created_at: f64,
    pub expires_at: f64,
}

impl FeedbackEvent {
    /// Fraction of the lifetime elapsed at `now_ms`, clamped to 0..=1.
    /// Drives the float-up animation.
    pub fn progress(&self, now_ms: f64) -> f64 {
        let span = self.expires_at - self.created_at;
        if span <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.created_at) / span).clamp(0.0, 1.0)
    }
}

/// Ordered queue of live feedback events.
#[derive(Debug)]
pub struct FeedbackQueue {
    events: VecDeque<FeedbackEvent>,
    ttl_ms: f64,
    next_id: u64,
}

impl FeedbackQueue {
    pub fn new(ttl_ms: f64) -> Self {
        Self {
            events: VecDeque::new(),
            ttl_ms,
            next_id: 1,
        }
    }

    /// Add an event at `now_ms` and return its id. Events only leave the
    /// queue through `sweep`, `remove` or `clear`; the TTL alone bounds its size.
    pub fn enqueue(&mut self, x: u16, y: u16, text: String, now_ms: f64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.events.push_back(FeedbackEvent {
            id,
            x,
            y,
            text,
            created_at: now_ms,
            expires_at: now_ms + self.ttl_ms,
        });
        id
    }

    /// Remove every event whose TTL has elapsed at `now_ms`.
    /// Returns how many were removed.
    pub fn sweep(&mut self, now_ms: f64) -> usize {
        let before = self.events.len();
        self.events.retain(|e| e.expires_at > now_ms);
        before - self.events.len()
    }

    /// Remove the event with `id`, if still present. Other events are untouched.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        self.events.len() != before
    }

    /// Drop all events. Ids keep counting up so a stale id from before the
    /// clear can never match a new event.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn events(&self) -> impl Iterator<Item = &FeedbackEvent> {
        self.events.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// `Idle → Pressed → Idle` visual state of the planet button.
#[derive(Debug, Clone, Default)]
pub struct ClickPulse {
    pressed_until: Option<f64>,
}

impl ClickPulse {
    /// Enter (or extend) the pressed state for `dwell_ms` from `now_ms`.
    pub fn press(&mut self, now_ms: f64, dwell_ms: f64) {
        self.pressed_until = Some(now_ms + dwell_ms);
    }

    /// Return to idle once the dwell has elapsed.
    pub fn update(&mut self, now_ms: f64) {
        if matches!(self.pressed_until, Some(until) if now_ms >= until) {
            self.pressed_until = None;
        }
    }

    pub fn is_pressed(&self, now_ms: f64) -> bool {
        matches!(self.pressed_until, Some(until) if now_ms < until)
    }

    pub fn reset(&mut self) {
        self.pressed_until = None;
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Each event disappears exactly once, never before its TTL.
        #[test]
        fn prop_removed_once_never_early(
            offsets in prop::collection::vec(0u32..5_000, 1..30),
            sweep_step in 1u32..400,
        ) {
            let ttl = 1_000.0;
            let mut created = offsets;
            created.sort_unstable();
            let mut q = FeedbackQueue::new(ttl);
            let mut pending: Vec<(u64, f64)> = Vec::new();
            let mut removed = 0usize;
            let mut now = 0.0;
            let end = *created.last().unwrap() as f64 + ttl + sweep_step as f64;
            let mut next = created.iter().peekable();
            while now <= end {
                while let Some(&&t) = next.peek() {
                    if t as f64 > now {
                        break;
                    }
                    let id = q.enqueue(0, 0, "1".into(), t as f64);
                    pending.push((id, t as f64));
                    next.next();
                }
                removed += q.sweep(now);
                let live: Vec<u64> = q.events().map(|e| e.id).collect();
                for (id, born) in &pending {
                    if now < born + ttl {
                        prop_assert!(live.contains(id), "event {} removed early", id);
                    } else {
                        prop_assert!(!live.contains(id), "event {} outlived its ttl", id);
                    }
                }
                now += sweep_step as f64;
            }
            prop_assert_eq!(removed, pending.len());
        }
    }
}
