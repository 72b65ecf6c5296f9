use crate::communication::messages::PreemptionSignal;
use tokio::sync::watch;

/// Creates the single-slot mailbox between the detector and the tick loop.
///
/// The slot starts out `Cleared`. Writers overwrite it; the reader only sees
/// the latest value and never blocks.
pub fn preemption_channel() -> (PreemptionPublisher, PreemptionReceiver) {
    let (tx, rx) = watch::channel(PreemptionSignal::Cleared);
    (PreemptionPublisher { tx }, PreemptionReceiver { rx })
}

/// Detector side of the channel.
#[derive(Debug)]
pub struct PreemptionPublisher {
    tx: watch::Sender<PreemptionSignal>,
}

impl PreemptionPublisher {
    /// Stores `signal` in the slot. Publishing the value already held is a
    /// no-op and does not wake the reader. Returns whether the slot changed.
    pub fn publish(&self, signal: PreemptionSignal) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == signal {
                false
            } else {
                *current = signal;
                true
            }
        })
    }

    pub fn emergency(&self, approach: u8) -> bool {
        self.publish(PreemptionSignal::Emergency { approach })
    }

    pub fn clear(&self) -> bool {
        self.publish(PreemptionSignal::Cleared)
    }

    /// The value currently held in the slot.
    pub fn current(&self) -> PreemptionSignal {
        *self.tx.borrow()
    }
}

/// Tick-loop side of the channel.
#[derive(Debug)]
pub struct PreemptionReceiver {
    rx: watch::Receiver<PreemptionSignal>,
}

impl PreemptionReceiver {
    /// Takes the slot's value if it changed since the last call.
    /// A value published just before the publisher went away is still delivered.
    pub fn try_recv(&mut self) -> Option<PreemptionSignal> {
        let latest = self.rx.borrow_and_update();
        if latest.has_changed() {
            Some(*latest)
        } else {
            None
        }
    }

    /// True once the publisher has been dropped.
    pub fn is_closed(&self) -> bool {
        self.rx.has_changed().is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot_yields_nothing() {
        let (_publisher, mut receiver) = preemption_channel();
        assert_eq!(receiver.try_recv(), None);
    }

    #[test]
    fn last_write_wins() {
        let (publisher, mut receiver) = preemption_channel();
        publisher.emergency(1);
        publisher.emergency(3);
        assert_eq!(receiver.try_recv(), Some(PreemptionSignal::emergency(3u8)));
        assert_eq!(receiver.try_recv(), None);
    }

    #[test]
    fn repeated_identical_signal_is_not_redelivered() {
        let (publisher, mut receiver) = preemption_channel();
        assert!(publisher.emergency(2));
        assert_eq!(receiver.try_recv(), Some(PreemptionSignal::emergency(2u8)));
        assert!(!publisher.emergency(2));
        assert_eq!(receiver.try_recv(), None);
        assert!(publisher.clear());
        assert_eq!(receiver.try_recv(), Some(PreemptionSignal::Cleared));
    }

    #[test]
    fn dropped_publisher_closes_channel() {
        let (publisher, mut receiver) = preemption_channel();
        publisher.emergency(1);
        drop(publisher);
        assert!(receiver.is_closed());
        assert_eq!(receiver.try_recv(), Some(PreemptionSignal::emergency(1u8)));
        assert_eq!(receiver.try_recv(), None);
    }

    #[tokio::test]
    async fn publishes_across_tasks() {
        let (publisher, mut receiver) = preemption_channel();
        let publisher = tokio::spawn(async move {
            publisher.emergency(0);
            publisher
        })
        .await
        .unwrap();
        assert_eq!(publisher.current(), PreemptionSignal::emergency(0u8));
        assert_eq!(receiver.try_recv(), Some(PreemptionSignal::emergency(0u8)));
    }
}
