//! Form controller: owns the values and errors of one application and moves
//! it through editing, validation and submission.

use crate::form::{Field, FormErrors, FormValues, Level, Photo, TextField};
use crate::transport::{Payload, Transport, TransportError};
use log::{debug, info, warn};
use std::cell::RefCell;

/// Where the form currently is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Editing,
    Submitting,
    Done,
    Failed,
}

/// Result of asking the controller to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// At least one field failed validation; errors are now populated.
    Rejected,
    /// Every field passed; the payload should be handed to a transport.
    Accepted(Payload),
    /// A submission is already in flight.
    Busy,
}

/// Identifies one photo read. Only the most recently issued token may
/// complete; anything older is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoToken(u64);

#[derive(Debug, Clone, Default)]
pub struct FormController {
    values: FormValues,
    errors: FormErrors,
    phase: Phase,
    loading: bool,
    photo_generation: u64,
    pending_photo: Option<(PhotoToken, String)>,
    submitted: Option<FormValues>,
    transport_error: Option<TransportError>,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Snapshot that was accepted by the last successful submission.
    pub fn confirmation(&self) -> Option<&FormValues> {
        match self.phase {
            Phase::Done => self.submitted.as_ref(),
            _ => None,
        }
    }

    pub fn transport_error(&self) -> Option<&TransportError> {
        self.transport_error.as_ref()
    }

    /// File name shown by the photo widget: the one still being read, or the
    /// attached photo.
    pub fn attachment_name(&self) -> Option<&str> {
        self.pending_photo
            .as_ref()
            .map(|(_, name)| name.as_str())
            .or_else(|| self.values.photo.as_ref().map(|p| p.name.as_str()))
    }

    /// Size of the attached photo, unknown while a read is in flight.
    pub fn attachment_size(&self) -> Option<usize> {
        match self.pending_photo {
            Some(_) => None,
            None => self.values.photo.as_ref().map(|p| p.bytes.len()),
        }
    }

    pub fn set_text(&mut self, field: TextField, value: String) {
        self.values.set_text(field, value);
    }

    pub fn set_age(&mut self, age: u8) {
        self.values.set_age(age);
    }

    pub fn set_level(&mut self, level: Level) {
        self.values.level = level;
    }

    /// Entering a field hides its error until the next submit.
    pub fn focus(&mut self, field: Field) {
        self.errors.clear(field);
    }

    /// Start attaching `file_name`. The previous attachment is dropped right
    /// away so it can never be submitted in place of the new one.
    pub fn begin_photo_read(&mut self, file_name: impl Into<String>) -> PhotoToken {
        self.photo_generation += 1;
        let token = PhotoToken(self.photo_generation);
        self.errors.clear(Field::Photo);
        self.values.photo = None;
        self.pending_photo = Some((token, file_name.into()));
        debug!("Photo read {:?} started", token);
        token
    }

    /// Apply a finished read. Returns `false` if the read was superseded by a
    /// newer selection or a removal.
    pub fn complete_photo_read(&mut self, token: PhotoToken, photo: Photo) -> bool {
        match &self.pending_photo {
            Some((current, _)) if *current == token => {
                debug!("Photo read {:?} attached {} bytes", token, photo.bytes.len());
                self.pending_photo = None;
                self.values.photo = Some(photo);
                true
            }
            _ => {
                debug!("Discarding stale photo read {:?}", token);
                false
            }
        }
    }

    /// Give up on a read that could not finish.
    pub fn abandon_photo_read(&mut self, token: PhotoToken) {
        if matches!(&self.pending_photo, Some((current, _)) if *current == token) {
            warn!("Photo read {:?} failed", token);
            self.pending_photo = None;
            self.values.photo = None;
        }
    }

    pub fn remove_photo(&mut self) {
        self.photo_generation += 1;
        self.pending_photo = None;
        self.values.photo = None;
    }

    /// Validate everything and, if it all passes, enter `Submitting`.
    pub fn begin_submit(&mut self) -> SubmitOutcome {
        if self.phase == Phase::Submitting {
            debug!("Submit ignored, submission already in flight");
            return SubmitOutcome::Busy;
        }

        self.errors = FormErrors::validate(&self.values);
        if !self.errors.is_empty() {
            info!("Submission rejected, failing fields: {:?}", self.errors.failing());
            self.loading = false;
            self.phase = Phase::Editing;
            return SubmitOutcome::Rejected;
        }

        self.loading = true;
        self.phase = Phase::Submitting;
        self.transport_error = None;
        self.submitted = Some(self.values.clone());
        SubmitOutcome::Accepted(Payload::from_values(&self.values))
    }

    pub fn finish_submission(&mut self, result: Result<(), TransportError>) {
        self.loading = false;
        match result {
            Ok(()) => {
                info!("Application submitted");
                self.phase = Phase::Done;
            }
            Err(e) => {
                warn!("Application could not be sent: {}", e);
                self.transport_error = Some(e);
                self.phase = Phase::Failed;
            }
        }
    }

    /// Close the confirmation or the error banner and keep editing.
    pub fn dismiss_result(&mut self) {
        if self.phase == Phase::Submitting {
            return;
        }
        self.transport_error = None;
        self.phase = Phase::Editing;
    }
}

/// Run one submit attempt end to end. `notify` is called after every state
/// change so a view can re-render; the controller is never borrowed across
/// the transport await.
pub async fn submit_application(
    form: &RefCell<FormController>,
    transport: &dyn Transport,
    notify: impl Fn(),
) -> Phase {
    let outcome = form.borrow_mut().begin_submit();
    notify();

    let payload = match outcome {
        SubmitOutcome::Accepted(payload) => payload,
        SubmitOutcome::Rejected | SubmitOutcome::Busy => return form.borrow().phase(),
    };

    let result = transport.submit(payload).await;
    form.borrow_mut().finish_submission(result);
    notify();
    form.borrow().phase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::future::{FutureExt, LocalBoxFuture};
    use std::cell::Cell;

    struct FakeTransport {
        result: Result<(), TransportError>,
        seen: RefCell<Vec<Payload>>,
    }

    impl FakeTransport {
        fn new(result: Result<(), TransportError>) -> Self {
            Self {
                result,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for FakeTransport {
        fn submit(&self, payload: Payload) -> LocalBoxFuture<'_, Result<(), TransportError>> {
            self.seen.borrow_mut().push(payload);
            futures::future::ready(self.result.clone()).boxed_local()
        }
    }

    fn photo(name: &str) -> Photo {
        Photo::new(name, "image/png", vec![7u8; 4])
    }

    fn filled() -> FormController {
        let mut form = FormController::new();
        form.set_text(TextField::FirstName, "Jan".into());
        form.set_text(TextField::LastName, "Kowalski".into());
        form.set_text(TextField::Email, "jan@example.com".into());
        form.set_text(TextField::PhoneNumber, "+48 123 456 789".into());
        let token = form.begin_photo_read("me.png");
        assert!(form.complete_photo_read(token, photo("me.png")));
        form.set_age(35);
        form
    }

    #[test]
    fn test_valid_submit_reaches_done() {
        let form = RefCell::new(filled());
        let transport = FakeTransport::new(Ok(()));
        let phases = RefCell::new(Vec::new());

        let end = block_on(submit_application(&form, &transport, || {
            let f = form.borrow();
            phases.borrow_mut().push((f.phase(), f.is_loading()));
        }));

        assert_eq!(end, Phase::Done);
        assert_eq!(
            *phases.borrow(),
            vec![(Phase::Submitting, true), (Phase::Done, false)]
        );
        let form = form.borrow();
        assert!(form.errors().is_empty());
        assert_eq!(form.confirmation(), Some(form.values()));
        assert_eq!(transport.seen.borrow().len(), 1);
        assert!(transport.seen.borrow()[0].part("photo").is_some());
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let mut controller = filled();
        controller.set_text(TextField::LastName, String::new());
        controller.remove_photo();
        let form = RefCell::new(controller);
        let transport = FakeTransport::new(Ok(()));
        let notified = Cell::new(0);

        let end = block_on(submit_application(&form, &transport, || {
            notified.set(notified.get() + 1)
        }));

        assert_eq!(end, Phase::Editing);
        assert_eq!(notified.get(), 1);
        assert!(transport.seen.borrow().is_empty());
        let form = form.borrow();
        assert!(!form.is_loading());
        assert_eq!(form.errors().failing(), vec![Field::LastName, Field::Photo]);
        assert_eq!(form.errors().message(Field::Photo), "Photo is required");
    }

    #[test]
    fn test_all_failing_fields_reported_at_once() {
        let mut form = FormController::new();
        assert_eq!(form.begin_submit(), SubmitOutcome::Rejected);
        assert_eq!(form.errors().failing(), Field::ALL.to_vec());
        assert_eq!(form.phase(), Phase::Editing);
    }

    #[test]
    fn test_transport_failure_sets_banner() {
        let form = RefCell::new(filled());
        let transport = FakeTransport::new(Err(TransportError::Status(500)));

        let end = block_on(submit_application(&form, &transport, || {}));

        assert_eq!(end, Phase::Failed);
        let mut form = form.borrow_mut();
        assert!(!form.is_loading());
        assert_eq!(form.transport_error(), Some(&TransportError::Status(500)));
        assert!(form.confirmation().is_none());

        form.dismiss_result();
        assert_eq!(form.phase(), Phase::Editing);
        assert!(form.transport_error().is_none());
    }

    #[test]
    fn test_submit_while_submitting_is_ignored() {
        let mut form = filled();
        assert!(matches!(form.begin_submit(), SubmitOutcome::Accepted(_)));
        assert_eq!(form.begin_submit(), SubmitOutcome::Busy);
        assert_eq!(form.phase(), Phase::Submitting);
        assert!(form.is_loading());
    }

    #[test]
    fn test_focus_clears_only_that_field() {
        let mut form = FormController::new();
        form.begin_submit();
        form.focus(Field::Email);
        assert!(form.errors().get(Field::Email).is_none());
        assert_eq!(
            form.errors().failing(),
            vec![
                Field::FirstName,
                Field::LastName,
                Field::PhoneNumber,
                Field::Photo,
                Field::Age
            ]
        );
        // Still invalid: the next submit brings the error back.
        form.begin_submit();
        assert!(form.errors().get(Field::Email).is_some());
    }

    #[test]
    fn test_age_error_follows_slider() {
        let mut form = filled();
        form.set_age(0);
        form.begin_submit();
        assert_eq!(form.errors().message(Field::Age), "Age cannot be less than 1");

        form.set_age(1);
        assert!(matches!(form.begin_submit(), SubmitOutcome::Accepted(_)));
        assert!(form.errors().get(Field::Age).is_none());
    }

    #[test]
    fn test_level_selection_is_exclusive() {
        let mut form = FormController::new();
        assert_eq!(form.values().level, Level::Beginner);
        form.set_level(Level::Advanced);
        let selected: Vec<_> = Level::ALL
            .into_iter()
            .filter(|l| *l == form.values().level)
            .collect();
        assert_eq!(selected, vec![Level::Advanced]);
    }

    #[test]
    fn test_selecting_photo_clears_its_error() {
        let mut form = FormController::new();
        form.begin_submit();
        assert!(form.errors().get(Field::Photo).is_some());
        form.begin_photo_read("a.png");
        assert!(form.errors().get(Field::Photo).is_none());
        assert_eq!(form.attachment_name(), Some("a.png"));
        assert_eq!(form.attachment_size(), None);
    }

    #[test]
    fn test_remove_photo_regenerates_required_error() {
        let mut form = filled();
        form.remove_photo();
        assert!(form.values().photo.is_none());
        assert_eq!(form.attachment_name(), None);
        assert_eq!(form.begin_submit(), SubmitOutcome::Rejected);
        assert_eq!(form.errors().message(Field::Photo), "Photo is required");
    }

    #[test]
    fn test_new_selection_replaces_attached_photo_immediately() {
        let mut form = filled();
        form.begin_photo_read("new.png");

        assert_eq!(form.attachment_name(), Some("new.png"));
        assert!(form.values().photo.is_none());
        assert_eq!(form.begin_submit(), SubmitOutcome::Rejected);
        assert_eq!(form.errors().message(Field::Photo), "Photo is required");
    }

    #[test]
    fn test_stale_read_after_removal_is_discarded() {
        let mut form = FormController::new();
        let token = form.begin_photo_read("slow.png");
        form.remove_photo();
        assert!(!form.complete_photo_read(token, photo("slow.png")));
        assert!(form.values().photo.is_none());
    }

    #[test]
    fn test_stale_read_after_replacement_is_discarded() {
        let mut form = FormController::new();
        let first = form.begin_photo_read("first.png");
        let second = form.begin_photo_read("second.png");

        assert!(form.complete_photo_read(second, photo("second.png")));
        assert!(!form.complete_photo_read(first, photo("first.png")));
        assert_eq!(form.attachment_name(), Some("second.png"));
        assert_eq!(form.attachment_size(), Some(4));
    }

    #[test]
    fn test_failed_read_leaves_photo_absent() {
        let mut form = FormController::new();
        let token = form.begin_photo_read("broken.png");
        form.abandon_photo_read(token);
        assert_eq!(form.attachment_name(), None);
        assert!(form.values().photo.is_none());
    }

    #[test]
    fn test_confirmation_is_snapshot_at_submit_time() {
        let mut form = filled();
        form.begin_submit();
        form.set_text(TextField::FirstName, "Changed".into());
        form.finish_submission(Ok(()));
        assert_eq!(
            form.confirmation().map(|v| v.first_name.as_str()),
            Some("Jan")
        );
        form.dismiss_result();
        assert!(form.confirmation().is_none());
    }
}
