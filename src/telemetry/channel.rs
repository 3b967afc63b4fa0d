//! Single-producer, single-consumer hand-off from the link thread to the
//! mapping runtime, served newest-first.
//!
//! The producer side is a plain `rtrb` push and never blocks: when the ring
//! is full the message is dropped and counted. The consumer moves whatever
//! has arrived into a bounded local stack and pops from its top, so the most
//! recent reading always comes out first. When the stack overflows, the
//! oldest readings are discarded.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rtrb::{Consumer, Producer, RingBuffer};

use super::message::{Message, MessageSource};

/// Create a channel holding at most `capacity` messages on each side.
pub fn channel(capacity: usize) -> (TelemetrySender, TelemetryReceiver) {
    let capacity = capacity.max(1);
    let (producer, consumer) = RingBuffer::new(capacity);
    let dropped = Arc::new(AtomicU64::new(0));

    (
        TelemetrySender {
            producer,
            dropped: dropped.clone(),
        },
        TelemetryReceiver {
            consumer,
            stack: VecDeque::with_capacity(capacity),
            capacity,
            dropped,
        },
    )
}

pub struct TelemetrySender {
    producer: Producer<Message>,
    dropped: Arc<AtomicU64>,
}

impl TelemetrySender {
    /// Push without blocking. Returns false if the message was dropped
    /// because the consumer has fallen behind.
    pub fn push(&mut self, message: Message) -> bool {
        match self.producer.push(message) {
            Ok(()) => true,
            Err(_) => {
                let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                log::warn!("telemetry channel full, dropping {:?} ({} dropped so far)", message, total);
                false
            }
        }
    }

    /// True once the receiver has been dropped.
    pub fn is_abandoned(&self) -> bool {
        self.producer.is_abandoned()
    }
}

pub struct TelemetryReceiver {
    consumer: Consumer<Message>,
    stack: VecDeque<Message>,
    capacity: usize,
    dropped: Arc<AtomicU64>,
}

impl TelemetryReceiver {
    fn refill(&mut self) {
        while let Ok(message) = self.consumer.pop() {
            if self.stack.len() == self.capacity {
                self.stack.pop_front();
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
            self.stack.push_back(message);
        }
    }

    /// Up to `max` messages, newest first.
    pub fn drain_latest(&mut self, max: usize) -> impl Iterator<Item = Message> + '_ {
        self.refill();
        let mut remaining = max;
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            remaining -= 1;
            self.stack.pop_back()
        })
    }

    /// Messages waiting on either side of the channel.
    pub fn pending(&self) -> usize {
        self.stack.len() + self.consumer.slots()
    }

    /// Messages lost to a full ring or an overflowing stack.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn clear(&mut self) {
        self.refill();
        self.stack.clear();
    }
}

impl MessageSource for TelemetryReceiver {
    fn pop_latest(&mut self) -> Option<Message> {
        self.refill();
        self.stack.pop_back()
    }
}
