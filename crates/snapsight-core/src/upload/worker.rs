use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};

use super::{UploadCompletion, UploadTicket, UploadTransport};
use crate::{print_debug, print_err};

/// Background dispatcher for uploads.
///
/// Tickets go in through [UploadWorker::enqueue], completions come back through
/// [UploadWorker::try_completion] / [UploadWorker::wait_completion]. Every
/// ticket runs on its own request thread, so a request that never returns
/// cannot hold back the ones enqueued after it. Completions arrive in the
/// order requests finish.
#[derive(Debug)]
pub struct UploadWorker {
    jobs: Option<Sender<UploadTicket>>,
    completions: Receiver<UploadCompletion>,
    handle: Option<JoinHandle<()>>,
}

impl UploadWorker {
    pub fn spawn<T: UploadTransport>(transport: T) -> Self {
        let (job_sender, job_receiver) = channel::unbounded::<UploadTicket>();
        let (completion_sender, completion_receiver) = channel::unbounded();
        let transport = Arc::new(transport);

        let handle = std::thread::spawn(move || {
            for ticket in job_receiver {
                run_request(ticket, Arc::clone(&transport), completion_sender.clone());
            }
        });

        Self {
            jobs: Some(job_sender),
            completions: completion_receiver,
            handle: Some(handle),
        }
    }

    /// Hand a ticket to the worker. Gives the ticket back if the worker is closed.
    pub fn enqueue(&self, ticket: UploadTicket) -> Result<(), UploadTicket> {
        match &self.jobs {
            Some(jobs) => jobs.send(ticket).map_err(|e| {
                print_err!("Upload worker is not running");
                e.into_inner()
            }),
            None => Err(ticket),
        }
    }

    pub fn try_completion(&self) -> Option<UploadCompletion> {
        self.completions.try_recv().ok()
    }

    pub fn wait_completion(&self, timeout: Duration) -> Option<UploadCompletion> {
        match self.completions.recv_timeout(timeout) {
            Ok(completion) => Some(completion),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Stop accepting tickets. Requests already running still report back.
    pub fn close(&mut self) {
        self.jobs.take();
    }

    pub fn is_closed(&self) -> bool {
        self.jobs.is_none()
    }

    /// Close the worker and wait for the dispatcher to exit. Request threads
    /// are not waited for.
    pub fn shutdown(mut self) {
        self.close();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                print_err!("Upload worker panicked");
            }
        }
    }
}

fn run_request<T: UploadTransport>(
    ticket: UploadTicket,
    transport: Arc<T>,
    completions: Sender<UploadCompletion>,
) {
    let generation = ticket.generation();
    let spawned = std::thread::Builder::new()
        .name(format!("snapsight-upload-{}", generation.value()))
        .spawn(move || {
            print_debug!("Uploading '{}' under {generation}", ticket.image().name());
            let completion = ticket.perform(transport.as_ref());
            if completions.send(completion).is_err() {
                print_debug!("Completion of {generation} dropped, worker is gone");
            }
        });

    if let Err(e) = spawned {
        print_err!("Failed to start upload thread for {generation}: {e}");
    }
}

impl Drop for UploadWorker {
    fn drop(&mut self) {
        // The dispatcher exits once the queue is closed; it is not joined here.
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::{FileInput, FileValidator, SelectedImage};
    use crate::outcome::UploadOutcome;
    use crate::upload::{Generation, UploadController};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoTransport {
        calls: Arc<AtomicUsize>,
    }

    impl UploadTransport for EchoTransport {
        fn upload(&self, image: &SelectedImage) -> UploadOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            UploadOutcome::failure(image.name())
        }
    }

    /// Never answers `hang.png`; echoes everything else.
    struct HangingTransport {
        hang: Receiver<()>,
    }

    impl UploadTransport for HangingTransport {
        fn upload(&self, image: &SelectedImage) -> UploadOutcome {
            if image.name() == "hang.png" {
                let _ = self.hang.recv();
            }
            UploadOutcome::failure(image.name())
        }
    }

    fn image(name: &str) -> SelectedImage {
        FileValidator::validate(Some(FileInput::new(vec![1], "image/png", name))).unwrap()
    }

    #[test]
    fn every_ticket_completes_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let worker = UploadWorker::spawn(EchoTransport {
            calls: Arc::clone(&calls),
        });
        let mut uploads = UploadController::new();

        let first = uploads.begin(image("a.png"));
        let second = uploads.begin(image("b.png"));
        let (g1, g2) = (first.generation(), second.generation());
        worker.enqueue(first).unwrap();
        worker.enqueue(second).unwrap();

        let timeout = Duration::from_secs(5);
        let received: HashMap<Generation, UploadOutcome> = (0..2)
            .map(|_| worker.wait_completion(timeout).unwrap())
            .map(|c| (c.generation, c.outcome))
            .collect();

        assert_eq!(received[&g1], UploadOutcome::failure("a.png"));
        assert_eq!(received[&g2], UploadOutcome::failure("b.png"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(worker.try_completion().is_none());

        worker.shutdown();
    }

    #[test]
    fn hanging_request_does_not_hold_back_later_tickets() {
        let (release, hang) = channel::unbounded();
        let worker = UploadWorker::spawn(HangingTransport { hang });
        let mut uploads = UploadController::new();

        worker.enqueue(uploads.begin(image("hang.png"))).unwrap();
        let next = uploads.begin(image("next.png"));
        let generation = next.generation();
        worker.enqueue(next).unwrap();

        let completion = worker.wait_completion(Duration::from_secs(5)).unwrap();
        assert_eq!(completion.generation, generation);
        assert_eq!(completion.outcome, UploadOutcome::failure("next.png"));

        drop(release);
    }

    #[test]
    fn closed_worker_hands_tickets_back() {
        let mut worker = UploadWorker::spawn(EchoTransport {
            calls: Arc::new(AtomicUsize::new(0)),
        });
        worker.close();

        let ticket = UploadController::new().begin(image("a.png"));
        let generation = ticket.generation();
        let returned = worker.enqueue(ticket).unwrap_err();

        assert!(worker.is_closed());
        assert_eq!(returned.generation(), generation);
    }

    #[test]
    fn wait_times_out_without_work() {
        let worker = UploadWorker::spawn(EchoTransport {
            calls: Arc::new(AtomicUsize::new(0)),
        });
        assert!(worker.wait_completion(Duration::from_millis(20)).is_none());
    }
}
