//! Process-wide protocol counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::MessageType;

/// Process-wide counters for framed traffic and open sessions.
pub(crate) struct Metrics;

static TOTAL_MESSAGES: AtomicU64 = AtomicU64::new(0);
static SENT_MESSAGES: AtomicU64 = AtomicU64::new(0);
static RECEIVED_MESSAGES: AtomicU64 = AtomicU64::new(0);
static ERROR_COUNT: AtomicU64 = AtomicU64::new(0);
static ACTIVE_SESSIONS: AtomicU64 = AtomicU64::new(0);
static SEND_LATENCY_TOTAL_NS: AtomicU64 = AtomicU64::new(0);
static SEND_LATENCY_MAX_NS: AtomicU64 = AtomicU64::new(0);
static RECV_LATENCY_TOTAL_NS: AtomicU64 = AtomicU64::new(0);
static RECV_LATENCY_MAX_NS: AtomicU64 = AtomicU64::new(0);

const NANOSECONDS_PER_MICROSECOND: u128 = 1_000;

struct MessageTypeCounters {
    ping: AtomicU64,
    pong: AtomicU64,
    bye: AtomicU64,
    join: AtomicU64,
    query: AtomicU64,
    query_hit: AtomicU64,
    unknown: AtomicU64,
}

static MESSAGE_COUNTERS: MessageTypeCounters = MessageTypeCounters::new();

impl MessageTypeCounters {
    const fn new() -> Self {
        Self {
            ping: AtomicU64::new(0),
            pong: AtomicU64::new(0),
            bye: AtomicU64::new(0),
            join: AtomicU64::new(0),
            query: AtomicU64::new(0),
            query_hit: AtomicU64::new(0),
            unknown: AtomicU64::new(0),
        }
    }

    fn counter(&self, msg_type: Option<MessageType>) -> &AtomicU64 {
        match msg_type {
            Some(MessageType::Ping) => &self.ping,
            Some(MessageType::Pong) => &self.pong,
            Some(MessageType::Bye) => &self.bye,
            Some(MessageType::Join) => &self.join,
            Some(MessageType::Query) => &self.query,
            Some(MessageType::QueryHit) => &self.query_hit,
            None => &self.unknown,
        }
    }
}

/// Direction of message flow for counting.
#[derive(Clone, Copy)]
pub(crate) enum MessageDirection {
    Sent,
    Received,
}

impl Metrics {
    #[inline]
    pub(crate) fn record_message(
        direction: MessageDirection,
        msg_type: Option<MessageType>,
        elapsed: Duration,
    ) {
        TOTAL_MESSAGES.fetch_add(1, Ordering::Relaxed);
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        match direction {
            MessageDirection::Sent => {
                SENT_MESSAGES.fetch_add(1, Ordering::Relaxed);
                SEND_LATENCY_TOTAL_NS.fetch_add(nanos, Ordering::Relaxed);
                update_max(&SEND_LATENCY_MAX_NS, nanos);
            }
            MessageDirection::Received => {
                RECEIVED_MESSAGES.fetch_add(1, Ordering::Relaxed);
                RECV_LATENCY_TOTAL_NS.fetch_add(nanos, Ordering::Relaxed);
                update_max(&RECV_LATENCY_MAX_NS, nanos);
            }
        }
        MESSAGE_COUNTERS
            .counter(msg_type)
            .fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_error() {
        ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_session_open() {
        ACTIVE_SESSIONS.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_session_close() {
        ACTIVE_SESSIONS.fetch_sub(1, Ordering::Relaxed);
    }
}

fn update_max(target: &AtomicU64, candidate: u64) {
    let mut current = target.load(Ordering::Relaxed);
    while candidate > current {
        match target.compare_exchange_weak(
            current,
            candidate,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return,
            Err(old) => current = old,
        }
    }
}

/// Read the current counters.
#[must_use]
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        total_messages: TOTAL_MESSAGES.load(Ordering::Relaxed),
        sent_messages: SENT_MESSAGES.load(Ordering::Relaxed),
        received_messages: RECEIVED_MESSAGES.load(Ordering::Relaxed),
        query_messages: MESSAGE_COUNTERS.query.load(Ordering::Relaxed),
        query_hit_messages: MESSAGE_COUNTERS.query_hit.load(Ordering::Relaxed),
        join_messages: MESSAGE_COUNTERS.join.load(Ordering::Relaxed),
        ping_messages: MESSAGE_COUNTERS.ping.load(Ordering::Relaxed),
        pong_messages: MESSAGE_COUNTERS.pong.load(Ordering::Relaxed),
        bye_messages: MESSAGE_COUNTERS.bye.load(Ordering::Relaxed),
        unknown_messages: MESSAGE_COUNTERS.unknown.load(Ordering::Relaxed),
        total_errors: ERROR_COUNT.load(Ordering::Relaxed),
        active_sessions: ACTIVE_SESSIONS.load(Ordering::Relaxed),
        send_latency_total_ns: SEND_LATENCY_TOTAL_NS.load(Ordering::Relaxed),
        send_latency_max_ns: SEND_LATENCY_MAX_NS.load(Ordering::Relaxed),
        recv_latency_total_ns: RECV_LATENCY_TOTAL_NS.load(Ordering::Relaxed),
        recv_latency_max_ns: RECV_LATENCY_MAX_NS.load(Ordering::Relaxed),
    }
}

/// Lightweight snapshot of critical counters.
#[allow(missing_docs)]
#[derive(Default, Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub total_messages: u64,
    pub sent_messages: u64,
    pub received_messages: u64,
    pub query_messages: u64,
    pub query_hit_messages: u64,
    pub join_messages: u64,
    pub ping_messages: u64,
    pub pong_messages: u64,
    pub bye_messages: u64,
    pub unknown_messages: u64,
    pub total_errors: u64,
    pub active_sessions: u64,
    pub send_latency_total_ns: u64,
    pub send_latency_max_ns: u64,
    pub recv_latency_total_ns: u64,
    pub recv_latency_max_ns: u64,
}

impl MetricsSnapshot {
    /// Average send latency in microseconds.
    #[must_use]
    pub fn avg_send_latency_us(&self) -> Option<u64> {
        average_microseconds(self.send_latency_total_ns, self.sent_messages)
    }

    /// Average receive latency in microseconds.
    #[must_use]
    pub fn avg_receive_latency_us(&self) -> Option<u64> {
        average_microseconds(self.recv_latency_total_ns, self.received_messages)
    }
}

fn average_microseconds(total_ns: u64, count: u64) -> Option<u64> {
    if count == 0 {
        return None;
    }

    let total_ns_u128 = u128::from(total_ns);
    Some((total_ns_u128 / (u128::from(count) * NANOSECONDS_PER_MICROSECOND)) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_microseconds() {
        assert_eq!(average_microseconds(5_000, 0), None);
        assert_eq!(average_microseconds(6_000, 2), Some(3));
    }

    #[test]
    fn test_update_max_only_grows() {
        let target = AtomicU64::new(10);
        update_max(&target, 5);
        assert_eq!(target.load(Ordering::Relaxed), 10);
        update_max(&target, 42);
        assert_eq!(target.load(Ordering::Relaxed), 42);
    }

    #[test]
    fn test_record_message_counts() {
        let before = snapshot();
        Metrics::record_message(
            MessageDirection::Sent,
            Some(MessageType::Query),
            Duration::from_micros(3),
        );
        Metrics::record_message(MessageDirection::Received, None, Duration::ZERO);
        let after = snapshot();

        // Other tests run concurrently, so only lower bounds hold.
        assert!(after.sent_messages > before.sent_messages);
        assert!(after.received_messages > before.received_messages);
        assert!(after.query_messages > before.query_messages);
        assert!(after.unknown_messages > before.unknown_messages);
        assert!(after.send_latency_max_ns >= 3_000);
    }
}
