// ── Scan driver ──
//
// Async glue between a code source, the scan session, and the guest
// book: lookups and check-ins run against the book, their results are
// handed back to the session.

use std::future::Future;

use tracing::{debug, warn};

use super::{Detection, ScanSession, ScanState};
use crate::book::GuestBook;
use crate::error::CoreError;

/// Something that yields already-decoded code text: a keyboard-wedge
/// scanner on stdin, a camera decoder, a test fixture.
pub trait CodeSource {
    /// Next scanned text; `Ok(None)` once the source is exhausted.
    fn next_code(&mut self) -> impl Future<Output = std::io::Result<Option<String>>> + Send;
}

/// Runs a [`ScanSession`] against a [`GuestBook`].
pub struct ScanDriver {
    book: GuestBook,
    session: ScanSession,
}

impl ScanDriver {
    pub fn new(book: GuestBook) -> Self {
        Self {
            book,
            session: ScanSession::new(),
        }
    }

    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    pub fn book(&self) -> &GuestBook {
        &self.book
    }

    /// Pull the next code from `source`.
    ///
    /// A read error moves the session to `SourceFailed` and ends the
    /// stream, like an exhausted source.
    pub async fn read_code<S: CodeSource>(&self, source: &mut S) -> Option<String> {
        match source.next_code().await {
            Ok(code) => code,
            Err(e) => {
                warn!(error = %e, "code source failed");
                if let Err(transition) = self.session.source_failed(e.to_string()) {
                    debug!(error = %transition, "source failure not recorded");
                }
                None
            }
        }
    }

    /// Run scanned text through detection and guest lookup.
    ///
    /// An idle session is started first. A finished session stays
    /// finished until [`scan_next`](Self::scan_next), so a code read
    /// twice in a row is `Dropped` the second time. On `Accepted`, the
    /// session ends up in `Verifying`, `AlreadyCheckedIn`,
    /// `GuestNotFound`, or `CheckInFailed` (lookup error).
    pub async fn process(&self, text: &str) -> Result<Detection, CoreError> {
        if matches!(self.session.state(), ScanState::Idle) {
            self.session.start()?;
        }

        let detection = self.session.detect(text);
        if let Detection::Accepted(payload) = &detection {
            match self.book.find(&payload.id).await {
                Ok(found) => self.session.resolve(found)?,
                Err(e) => self.session.lookup_failed(e.to_string())?,
            }
        }
        Ok(detection)
    }

    /// Leave a finished scan and accept the next code.
    ///
    /// A no-op while already scanning.
    pub fn scan_next(&self) -> Result<(), CoreError> {
        match self.session.state() {
            ScanState::Scanning => Ok(()),
            ScanState::Idle => self.session.start(),
            _ => self.session.retry(),
        }
    }

    /// Check in the guest being verified and return the resulting state.
    pub async fn check_in(&self) -> Result<ScanState, CoreError> {
        let (id, party_size) = self.session.confirm()?;
        let result = self.book.check_in(&id, Some(party_size)).await;
        self.session.complete(result)?;
        Ok(self.session.state())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::io;

    use super::*;
    use crate::qr;
    use crate::requests::NewGuest;

    struct Scripted(VecDeque<io::Result<Option<String>>>);

    impl CodeSource for Scripted {
        async fn next_code(&mut self) -> io::Result<Option<String>> {
            self.0.pop_front().unwrap_or(Ok(None))
        }
    }

    async fn book_with_alice() -> (GuestBook, String) {
        let book = GuestBook::in_memory();
        let alice = book
            .create(NewGuest::named("Alice").vip(true).party_size(2))
            .await
            .unwrap();
        (book, qr::encode(&alice))
    }

    #[tokio::test]
    async fn scan_verify_and_check_in() {
        let (book, code) = book_with_alice().await;
        let driver = ScanDriver::new(book.clone());

        let detection = driver.process(&code).await.unwrap();
        assert!(matches!(detection, Detection::Accepted(_)));
        assert_eq!(driver.session().state().name(), "verifying");

        let state = driver.check_in().await.unwrap();
        assert_eq!(state.name(), "welcomed");
        assert_eq!(book.stats().checked_in, 1);

        // The same code again after "scan next" finds the guest present.
        driver.scan_next().unwrap();
        driver.process(&code).await.unwrap();
        assert_eq!(driver.session().state().name(), "already-checked-in");
        assert_eq!(book.scan_history().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_duplicate_scan_is_dropped() {
        let (book, code) = book_with_alice().await;
        let driver = ScanDriver::new(book);
        driver.session().start().unwrap();

        let (first, second) = tokio::join!(driver.process(&code), driver.process(&code));
        let mut outcomes = [first.unwrap(), second.unwrap()];
        outcomes.sort_by_key(|d| matches!(d, Detection::Dropped));

        assert!(matches!(outcomes[0], Detection::Accepted(_)));
        assert_eq!(outcomes[1], Detection::Dropped);
    }

    #[tokio::test]
    async fn repeated_code_after_a_result_is_dropped() {
        let (book, code) = book_with_alice().await;
        book.check_in(&qr::decode(&code).unwrap().id, None)
            .await
            .unwrap();
        let driver = ScanDriver::new(book);

        driver.process(&code).await.unwrap();
        assert_eq!(driver.session().state().name(), "already-checked-in");
        assert_eq!(driver.process(&code).await.unwrap(), Detection::Dropped);
        assert_eq!(driver.session().state().name(), "already-checked-in");

        driver.scan_next().unwrap();
        assert_eq!(driver.process("garbage").await.unwrap(), Detection::Rejected);
        assert_eq!(driver.process("garbage").await.unwrap(), Detection::Dropped);
        assert_eq!(driver.session().state().name(), "invalid-payload");
    }

    #[tokio::test]
    async fn unknown_guest_code() {
        let book = GuestBook::in_memory();
        let stranger = crate::model::Guest {
            id: crate::model::GuestId::new("nonexistent-id"),
            name: "Mallory".into(),
            is_vip: false,
            group: None,
            attendance_count: 1,
            checked_in: false,
            checked_in_at: None,
            created_at: chrono::Utc::now(),
        };
        let driver = ScanDriver::new(book);

        driver.process(&qr::encode(&stranger)).await.unwrap();
        assert_eq!(driver.session().state().name(), "guest-not-found");
    }

    #[tokio::test]
    async fn source_errors_end_the_stream() {
        let (book, code) = book_with_alice().await;
        let driver = ScanDriver::new(book);
        let mut source = Scripted(VecDeque::from([
            Ok(Some(code)),
            Err(io::Error::other("scanner unplugged")),
        ]));

        let text = driver.read_code(&mut source).await.unwrap();
        driver.process(&text).await.unwrap();
        driver.session().cancel().unwrap();

        assert!(driver.read_code(&mut source).await.is_none());
        match driver.session().state() {
            ScanState::SourceFailed { message } => assert!(message.contains("unplugged")),
            other => panic!("expected SourceFailed, got: {other:?}"),
        }
    }
}
