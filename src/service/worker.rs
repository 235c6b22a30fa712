//! Background worker that runs a `WordService` off the UI thread

use super::{Dispatcher, Envelope, Reply, ServiceError, WordService};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

/// Owns the service thread and the channels to it
pub struct ServiceWorker {
    /// Channel to send envelopes to the service thread
    tx: Sender<Envelope>,
    /// Channel to receive replies from the service thread
    rx: Receiver<Reply>,
    /// Replies produced locally because the thread was gone
    undelivered: Vec<Reply>,
}

impl ServiceWorker {
    /// Start a thread that answers envelopes in order, one at a time.
    pub fn spawn(mut service: Box<dyn WordService>) -> Self {
        let (envelope_tx, envelope_rx) = channel::<Envelope>();
        let (reply_tx, reply_rx) = channel::<Reply>();

        thread::spawn(move || {
            while let Ok(envelope) = envelope_rx.recv() {
                let label = envelope.request.label();
                let outcome = envelope.request.execute(service.as_mut());
                if let Err(e) = &outcome {
                    log::warn!("{} failed: {}", label, e);
                }
                let reply = Reply {
                    generation: envelope.generation,
                    outcome,
                };
                if reply_tx.send(reply).is_err() {
                    break;
                }
            }
            log::info!("service worker stopped");
        });

        ServiceWorker {
            tx: envelope_tx,
            rx: reply_rx,
            undelivered: Vec::new(),
        }
    }
}

impl Dispatcher for ServiceWorker {
    fn dispatch(&mut self, envelope: Envelope) {
        if let Err(returned) = self.tx.send(envelope) {
            log::error!("service thread is gone");
            self.undelivered.push(Reply {
                generation: returned.0.generation,
                outcome: Err(ServiceError::Unavailable),
            });
        }
    }

    fn poll(&mut self) -> Vec<Reply> {
        let mut replies = std::mem::take(&mut self.undelivered);
        while let Ok(reply) = self.rx.try_recv() {
            replies.push(reply);
        }
        replies
    }
}
