//! Single-consumer display queue.
//!
//! [`ConsoleQueue`] owns one blocking consumer that applies every display
//! request to the sink in arrival order. Connections hold cheap
//! [`ConsoleHandle`] clones and never touch the sink directly.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::ConsoleSink;

/// Producer side of the display queue.
#[derive(Debug, Clone)]
pub struct ConsoleHandle {
    tx: mpsc::UnboundedSender<String>,
}

impl ConsoleHandle {
    /// Queues `text` to be shown on a freshly cleared display.
    ///
    /// Never waits: the queue is unbounded, so a stalled terminal cannot
    /// hold up the caller. Returns `false` if the consumer has already
    /// stopped.
    pub fn show(&self, text: impl Into<String>) -> bool {
        self.tx.send(text.into()).is_ok()
    }

    /// Returns `true` once the consumer has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// The display queue and its consumer.
///
/// Dropping every handle (including the one held here, via
/// [`ConsoleQueue::shutdown`]) lets the consumer drain what is queued and
/// exit.
#[derive(Debug)]
pub struct ConsoleQueue {
    handle: ConsoleHandle,
    worker: JoinHandle<u64>,
}

impl ConsoleQueue {
    /// Starts the consumer for `sink`.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn<S: ConsoleSink>(sink: S) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::task::spawn_blocking(move || drain(sink, rx));
        Self {
            handle: ConsoleHandle { tx },
            worker,
        }
    }

    /// Returns a new producer handle.
    #[must_use]
    pub fn handle(&self) -> ConsoleHandle {
        self.handle.clone()
    }

    /// Releases this queue's own handle and waits for the consumer to
    /// finish. Returns how many messages were displayed.
    ///
    /// The consumer only exits after every outstanding [`ConsoleHandle`]
    /// is dropped.
    pub async fn shutdown(self) -> u64 {
        let Self { handle, worker } = self;
        drop(handle);
        match worker.await {
            Ok(shown) => shown,
            Err(e) => {
                tracing::error!(error = %e, "console consumer terminated abnormally");
                0
            }
        }
    }
}

fn drain<S: ConsoleSink>(mut sink: S, mut rx: mpsc::UnboundedReceiver<String>) -> u64 {
    let mut shown = 0;
    while let Some(text) = rx.blocking_recv() {
        match sink.clear().and_then(|()| sink.write(&text)) {
            Ok(()) => shown += 1,
            Err(e) => tracing::warn!(error = %e, "console display failed"),
        }
    }
    tracing::debug!(shown, "console consumer stopped");
    shown
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::console::{ConsoleEvent, MemoryConsole};

    #[tokio::test]
    async fn messages_are_shown_in_order_each_after_a_clear() {
        let observer = MemoryConsole::new();
        let queue = ConsoleQueue::spawn(observer.clone());
        let handle = queue.handle();

        assert!(handle.show("first"));
        assert!(handle.show("second"));
        drop(handle);

        assert_eq!(queue.shutdown().await, 2);
        assert_eq!(
            observer.events(),
            vec![
                ConsoleEvent::Clear,
                ConsoleEvent::Write("first".to_string()),
                ConsoleEvent::Clear,
                ConsoleEvent::Write("second".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn concurrent_producers_never_split_clear_from_write() {
        let observer = MemoryConsole::new();
        let queue = ConsoleQueue::spawn(observer.clone());

        let mut tasks = Vec::new();
        for producer in 0..4 {
            let handle = queue.handle();
            tasks.push(tokio::spawn(async move {
                for n in 0..25 {
                    handle.show(format!("{producer}-{n}"));
                    tokio::task::yield_now().await;
                }
            }));
        }
        for task in tasks {
            let Ok(()) = task.await else {
                panic!("producer task failed");
            };
        }

        assert_eq!(queue.shutdown().await, 100);
        let events = observer.events();
        assert_eq!(events.len(), 200);
        for pair in events.chunks(2) {
            assert!(matches!(
                pair,
                [ConsoleEvent::Clear, ConsoleEvent::Write(_)]
            ));
        }
    }

    struct BrokenSink {
        attempts: std::sync::Arc<std::sync::atomic::AtomicUsize>,
    }

    impl ConsoleSink for BrokenSink {
        fn clear(&mut self) -> std::io::Result<()> {
            Ok(())
        }

        fn write(&mut self, _text: &str) -> std::io::Result<()> {
            self.attempts
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Err(std::io::Error::other("terminal gone"))
        }
    }

    #[tokio::test]
    async fn sink_failures_do_not_stop_the_consumer() {
        let attempts = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let queue = ConsoleQueue::spawn(BrokenSink {
            attempts: std::sync::Arc::clone(&attempts),
        });
        let handle = queue.handle();
        assert!(handle.show("a"));
        assert!(handle.show("b"));
        drop(handle);

        assert_eq!(queue.shutdown().await, 0);
        assert_eq!(attempts.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn shutdown_waits_for_outstanding_handles() {
        let queue = ConsoleQueue::spawn(MemoryConsole::new());
        let handle = queue.handle();
        let worker = tokio::spawn(queue.shutdown());
        tokio::task::yield_now().await;
        assert!(!handle.is_closed());
        assert!(!worker.is_finished());
        drop(handle);
        let Ok(shown) = worker.await else {
            panic!("shutdown task failed");
        };
        assert_eq!(shown, 0);
    }

    /// Sink whose writes block until the test drops the release sender.
    struct StalledSink {
        release: std::sync::mpsc::Receiver<()>,
    }

    impl ConsoleSink for StalledSink {
        fn clear(&mut self) -> std::io::Result<()> {
            Ok(())
        }

        fn write(&mut self, _text: &str) -> std::io::Result<()> {
            let _ = self.release.recv();
            Ok(())
        }
    }

    #[tokio::test]
    async fn show_never_waits_on_a_stalled_sink() {
        let (release, stalled) = std::sync::mpsc::channel::<()>();
        let queue = ConsoleQueue::spawn(StalledSink { release: stalled });
        let handle = queue.handle();

        let queued = tokio::time::timeout(std::time::Duration::from_secs(1), async {
            (0..1_000).all(|n| handle.show(format!("line {n}")))
        })
        .await;
        let Ok(all_queued) = queued else {
            panic!("show blocked behind the stalled sink");
        };
        assert!(all_queued);

        drop(release);
        drop(handle);
        assert_eq!(queue.shutdown().await, 1_000);
    }
}
