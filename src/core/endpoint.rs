use std::fmt;
use std::sync::Arc;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tracing::trace;

/// Outcome of a single handoff attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Handoff {
    /// The subscriber took the message.
    Accepted,
    /// Nobody will ever read this endpoint again.
    Unreadable,
}

#[derive(Debug, Default)]
struct Slot {
    pending: Option<String>,
    // messages the reader has taken so far
    taken: u64,
    closed: bool,
    receiver_gone: bool,
}

/// Capacity-zero conduit shared by both halves. The slot lock is never held across an await.
#[derive(Debug, Default)]
struct Conduit {
    slot: Mutex<Slot>,
    offered: Notify, // reader side
    taken: Notify,   // sender side
}

/// Sending half, owned by the registry until the topic is closed.
pub(crate) struct EndpointSender {
    id: u64,
    conduit: Arc<Conduit>,
}

/// Receiving half of an endpoint, handed to whoever called `subscribe`.
///
/// Dropping it marks the endpoint unreadable so a publisher never waits on it.
pub struct Subscription {
    id: u64,
    topic: String,
    conduit: Arc<Conduit>,
}

pub(crate) fn endpoint(id: u64, topic: &str) -> (EndpointSender, Subscription) {
    let conduit = Arc::new(Conduit::default());
    let sender = EndpointSender {
        id,
        conduit: Arc::clone(&conduit),
    };
    let subscription = Subscription {
        id,
        topic: topic.to_string(),
        conduit,
    };
    (sender, subscription)
}

// Takes the message back out of the slot if the send future is dropped mid-handoff.
struct RetractOnDrop<'a> {
    conduit: &'a Conduit,
    armed: bool,
}

impl Drop for RetractOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.conduit.slot.lock().pending = None;
        }
    }
}

impl EndpointSender {
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// How many messages the reader has taken from this endpoint.
    pub(crate) fn taken_count(&self) -> u64 {
        self.conduit.slot.lock().taken
    }

    /// Offers `message` and suspends until the reader takes it or goes away.
    ///
    /// Only one send may be in flight per endpoint; the registry lock guarantees that.
    pub(crate) async fn send(&self, message: String) -> Handoff {
        {
            let mut slot = self.conduit.slot.lock();
            if slot.receiver_gone || slot.closed {
                return Handoff::Unreadable;
            }
            debug_assert!(slot.pending.is_none(), "concurrent send on endpoint {}", self.id);
            slot.pending = Some(message);
        }
        self.conduit.offered.notify_one();

        let mut retract = RetractOnDrop {
            conduit: &self.conduit,
            armed: true,
        };
        loop {
            let taken = self.conduit.taken.notified();
            {
                let mut slot = self.conduit.slot.lock();
                if slot.pending.is_none() {
                    retract.armed = false;
                    trace!(endpoint = self.id, "handoff accepted");
                    return Handoff::Accepted;
                }
                if slot.receiver_gone {
                    slot.pending = None;
                    retract.armed = false;
                    trace!(endpoint = self.id, "receiver dropped during handoff");
                    return Handoff::Unreadable;
                }
            }
            taken.await;
        }
    }

    /// Permanently closes the endpoint. Consumes the sender so it can't be reused.
    pub(crate) fn close(self) {
        self.conduit.slot.lock().closed = true;
        self.conduit.offered.notify_one();
    }
}

impl Subscription {
    /// Waits for the next message. `None` once the endpoint is closed and drained.
    pub async fn recv(&mut self) -> Option<String> {
        loop {
            let offered = self.conduit.offered.notified();
            {
                let mut slot = self.conduit.slot.lock();
                if let Some(message) = slot.pending.take() {
                    slot.taken += 1;
                    drop(slot);
                    self.conduit.taken.notify_one();
                    return Some(message);
                }
                if slot.closed {
                    return None;
                }
            }
            offered.await;
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// True once the endpoint is closed and nothing is left to read.
    pub fn is_closed(&self) -> bool {
        let slot = self.conduit.slot.lock();
        slot.closed && slot.pending.is_none()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.conduit.slot.lock().receiver_gone = true;
        self.conduit.taken.notify_one();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn send_waits_for_reader() {
        let (sender, mut sub) = endpoint(1, "t");

        let send = tokio::spawn(async move {
            let outcome = sender.send("hello".to_string()).await;
            (sender, outcome)
        });

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!send.is_finished(), "unbuffered send returned before anyone read");

        assert_eq!(sub.recv().await.as_deref(), Some("hello"));
        let (_sender, outcome) = send.await.unwrap();
        assert_eq!(outcome, Handoff::Accepted);
    }

    #[tokio::test]
    async fn recv_after_close_is_end_of_stream() {
        let (sender, mut sub) = endpoint(2, "t");
        assert!(!sub.is_closed());
        sender.close();

        let got = timeout(Duration::from_millis(100), sub.recv()).await.unwrap();
        assert_eq!(got, None);
        assert!(sub.is_closed());
        // still end-of-stream on every later read
        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test]
    async fn blocked_reader_wakes_on_close() {
        let (sender, mut sub) = endpoint(3, "t");
        let reader = tokio::spawn(async move { sub.recv().await });

        tokio::time::sleep(Duration::from_millis(20)).await;
        sender.close();

        let got = timeout(Duration::from_millis(200), reader).await.unwrap().unwrap();
        assert_eq!(got, None);
    }

    #[tokio::test]
    async fn dropped_subscription_unblocks_sender() {
        let (sender, sub) = endpoint(4, "t");

        let send = tokio::spawn(async move { sender.send("lost".to_string()).await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(sub);

        let outcome = timeout(Duration::from_millis(200), send).await.unwrap().unwrap();
        assert_eq!(outcome, Handoff::Unreadable);
    }

    #[tokio::test]
    async fn send_to_dropped_subscription_returns_immediately() {
        let (sender, sub) = endpoint(5, "t");
        drop(sub);
        assert_eq!(sender.send("x".to_string()).await, Handoff::Unreadable);
    }

    #[tokio::test]
    async fn cancelled_send_retracts_message() {
        let (sender, mut sub) = endpoint(6, "t");

        let attempt = timeout(Duration::from_millis(20), sender.send("stale".to_string())).await;
        assert!(attempt.is_err());

        sender.close();
        assert_eq!(sub.recv().await, None, "retracted message must not be observed");
    }

    #[tokio::test]
    async fn message_taken_before_cancellation_is_counted() {
        let (sender, mut sub) = endpoint(8, "t");
        let before = sender.taken_count();

        {
            let send = sender.send("late".to_string());
            tokio::pin!(send);
            assert!(timeout(Duration::from_millis(20), &mut send).await.is_err());

            // reader grabs it after the deadline but before the send is dropped
            assert_eq!(sub.recv().await.as_deref(), Some("late"));
        }

        assert_eq!(sender.taken_count(), before + 1);
        sender.close();
        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test]
    async fn messages_arrive_in_send_order() {
        let (sender, mut sub) = endpoint(7, "t");
        let producer = tokio::spawn(async move {
            for i in 0..20 {
                assert_eq!(sender.send(format!("m{i}")).await, Handoff::Accepted);
            }
            sender.close();
        });

        let mut got = Vec::new();
        while let Some(m) = sub.recv().await {
            got.push(m);
        }
        producer.await.unwrap();

        let expected: Vec<String> = (0..20).map(|i| format!("m{i}")).collect();
        assert_eq!(got, expected);
    }
}
