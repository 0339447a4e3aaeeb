use std::sync::mpsc;

use tracing::trace;

pub struct EventSender<T> {
    tx: mpsc::Sender<T>,
}

pub struct EventReceiver<T> {
    rx: mpsc::Receiver<T>,
}

pub fn channel<T>() -> (EventSender<T>, EventReceiver<T>) {
    let (tx, rx) = mpsc::channel();
    (EventSender { tx }, EventReceiver { rx })
}

impl<T> Clone for EventSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> EventSender<T> {
    /// Queues an event for the next drain. Events sent after the receiver is
    /// gone are dropped.
    pub fn emit(&self, event: T) {
        if self.tx.send(event).is_err() {
            trace!("event receiver dropped; discarding event");
        }
    }
}

impl<T> EventReceiver<T> {
    pub fn try_recv(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Yields every queued event without blocking.
    pub fn drain(&self) -> mpsc::TryIter<'_, T> {
        self.rx.try_iter()
    }
}
