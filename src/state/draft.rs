/// Add-product form state
///
/// The flow owns the draft, its image preview and the submission lifecycle:
///
/// ```text
/// Editing -> Submitting -> Succeeded -> (confirmation delay) -> Editing, cleared
///                       \-> Editing, draft kept, error shown
/// ```
///
/// Every reset bumps a generation counter. Submission and image tickets carry
/// the generation they were issued under, so a response or file read arriving
/// after the modal was closed is recognised and ignored. A confirmed add still
/// owes the catalog one refresh even if the modal is closed during the banner.

use iced::widget::image::Handle;
use tracing::{debug, info, warn};

use super::data::{DraftField, NewProduct, SelectedImage};
use super::preview::{PreviewId, PreviewStore};
use crate::error::{ApiError, ValidationError};

/// Largest image accepted for upload (5 MiB)
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// User-facing message for any failed add-product request
pub const SUBMIT_FAILED: &str = "Failed to add product";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Editing,
    Submitting,
    /// Showing the confirmation banner before closing
    Succeeded,
}

/// In-progress form contents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub name: String,
    pub description: String,
    pub price_text: String,
    pub image: Option<SelectedImage>,
    preview: Option<PreviewId>,
}

impl Draft {
    pub fn is_empty(&self) -> bool {
        *self == Draft::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket {
    generation: u64,
}

/// Issued when an image pick starts; a read that outlives its form is dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTicket {
    generation: u64,
}

/// What happened to an image that finished loading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOutcome {
    Accepted,
    /// Rejected with the message now on display
    Rejected(ValidationError),
    /// The form was closed or reset since the pick
    Ignored,
}

/// A validated submission, to be sent by the caller
#[derive(Debug, Clone)]
pub struct Submission {
    pub ticket: SubmitTicket,
    pub product: NewProduct,
}

/// What the caller should do after a submission resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The form was closed or reset in the meantime and the request failed
    Ignored,
    /// The form was closed or reset in the meantime but the product was added;
    /// refresh the catalog right away
    Detached,
    /// Error shown, draft kept for a retry
    Failed,
    /// Wait the confirmation delay, then call `finish_confirmation`
    Confirm(SubmitTicket),
}

#[derive(Debug)]
pub struct AddProductFlow {
    open: bool,
    draft: Draft,
    state: FlowState,
    error: Option<String>,
    previews: PreviewStore,
    generation: u64,
    /// Confirmed adds whose catalog refresh has not been handed out yet
    owed_refreshes: Vec<SubmitTicket>,
}

impl Default for AddProductFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl AddProductFlow {
    pub fn new() -> Self {
        Self {
            open: false,
            draft: Draft::default(),
            state: FlowState::Editing,
            error: None,
            previews: PreviewStore::new(),
            generation: 0,
            owed_refreshes: Vec::new(),
        }
    }

    /// Show the modal
    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Submission-level or validation message currently shown
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn succeeded(&self) -> bool {
        self.state == FlowState::Succeeded
    }

    /// Whether the submit button should be enabled
    pub fn can_submit(&self) -> bool {
        self.state == FlowState::Editing
    }

    /// Display handle for the selected image, if any
    pub fn preview(&self) -> Option<&Handle> {
        self.draft.preview.and_then(|id| self.previews.get(id))
    }

    /// Number of preview resources currently held
    pub fn live_previews(&self) -> usize {
        self.previews.live_count()
    }

    /// Update one text field. Clears any error on display.
    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::Name => self.draft.name = value,
            DraftField::Description => self.draft.description = value,
            DraftField::Price => self.draft.price_text = value,
        }
        self.error = None;
    }

    /// Accept a picked image, replacing (and releasing) any previous preview.
    /// A rejected image leaves the current selection untouched.
    pub fn set_image(&mut self, image: SelectedImage) -> Result<(), ValidationError> {
        if let Err(err) = validate_image(&image) {
            debug!("Rejected image {}: {err}", image.file_name);
            self.error = Some(err.to_string());
            return Err(err);
        }

        self.release_preview();
        self.draft.preview = Some(self.previews.create(&image));
        self.draft.image = Some(image);
        self.error = None;
        Ok(())
    }

    /// Ticket for an image read about to start
    pub fn image_ticket(&self) -> ImageTicket {
        ImageTicket {
            generation: self.generation,
        }
    }

    /// Apply a finished image read, unless the form it was picked for is gone
    pub fn apply_image(&mut self, ticket: ImageTicket, image: SelectedImage) -> ImageOutcome {
        if !self.open || ticket.generation != self.generation {
            debug!("Ignoring image {} picked for a closed form", image.file_name);
            return ImageOutcome::Ignored;
        }
        match self.set_image(image) {
            Ok(()) => ImageOutcome::Accepted,
            Err(err) => ImageOutcome::Rejected(err),
        }
    }

    /// Drop the selected image and its preview
    pub fn clear_image(&mut self) {
        self.release_preview();
        self.draft.image = None;
    }

    /// Validate the draft and move to `Submitting`.
    /// On error nothing is sent and the draft stays as it is.
    pub fn submit(&mut self) -> Result<Submission, ValidationError> {
        if self.state != FlowState::Editing {
            return Err(ValidationError::SubmissionInFlight);
        }

        let product = match self.validated_product() {
            Ok(product) => product,
            Err(err) => {
                self.error = Some(err.to_string());
                return Err(err);
            }
        };

        info!("Submitting product {:?}", product.name);
        self.state = FlowState::Submitting;
        self.error = None;

        Ok(Submission {
            ticket: SubmitTicket {
                generation: self.generation,
            },
            product,
        })
    }

    /// Apply the backend's answer to a submission
    pub fn apply_submit(
        &mut self,
        ticket: SubmitTicket,
        result: Result<(), ApiError>,
    ) -> SubmitOutcome {
        if ticket.generation != self.generation {
            debug!("Submission result arrived for a closed form");
            return match result {
                Ok(()) => SubmitOutcome::Detached,
                Err(err) => {
                    warn!("Error adding product after its form closed: {err}");
                    SubmitOutcome::Ignored
                }
            };
        }
        if self.state != FlowState::Submitting {
            return SubmitOutcome::Ignored;
        }

        match result {
            Ok(()) => {
                info!("Product added");
                self.state = FlowState::Succeeded;
                self.owed_refreshes.push(ticket);
                SubmitOutcome::Confirm(ticket)
            }
            Err(err) => {
                warn!("Error adding product: {err}");
                self.state = FlowState::Editing;
                self.error = Some(SUBMIT_FAILED.to_string());
                SubmitOutcome::Failed
            }
        }
    }

    /// Called once the confirmation delay has elapsed. Closes and clears the
    /// form if it is still showing this success; returns true exactly once per
    /// confirmed submission, which is the caller's cue to refresh the catalog.
    /// The refresh is owed even when the modal was closed in the meantime.
    pub fn finish_confirmation(&mut self, ticket: SubmitTicket) -> bool {
        let Some(index) = self.owed_refreshes.iter().position(|owed| *owed == ticket) else {
            return false;
        };
        self.owed_refreshes.swap_remove(index);

        if ticket.generation == self.generation && self.state == FlowState::Succeeded {
            self.close();
        }
        true
    }

    /// Clear the draft, error and success state, and release the preview.
    /// Any submission still in flight no longer touches the form when it resolves.
    pub fn reset(&mut self) {
        self.release_preview();
        self.draft = Draft::default();
        self.state = FlowState::Editing;
        self.error = None;
        self.generation += 1;
    }

    /// Reset and hide the modal
    pub fn close(&mut self) {
        if !self.draft.is_empty() {
            debug!("Discarding unsubmitted draft");
        }
        self.reset();
        self.open = false;
    }

    fn release_preview(&mut self) {
        if let Some(id) = self.draft.preview.take() {
            self.previews.release(id);
        }
    }

    fn validated_product(&self) -> Result<NewProduct, ValidationError> {
        let draft = &self.draft;
        let image = match &draft.image {
            Some(image)
                if !draft.name.trim().is_empty()
                    && !draft.description.trim().is_empty()
                    && !draft.price_text.trim().is_empty() =>
            {
                image
            }
            _ => return Err(ValidationError::MissingFields),
        };

        let price = draft.price_text.trim();
        match price.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => {}
            _ => return Err(ValidationError::InvalidPrice),
        }

        Ok(NewProduct {
            name: draft.name.clone(),
            description: draft.description.clone(),
            price: price.to_string(),
            image: image.clone(),
        })
    }
}

/// Size first, then type
fn validate_image(image: &SelectedImage) -> Result<(), ValidationError> {
    if image.size() > MAX_IMAGE_BYTES {
        return Err(ValidationError::ImageTooLarge);
    }
    if !image.mime.starts_with("image/") {
        return Err(ValidationError::InvalidImageType);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str, size: usize) -> SelectedImage {
        SelectedImage {
            file_name: name.to_string(),
            mime: "image/png".to_string(),
            bytes: vec![0u8; size],
        }
    }

    fn filled_flow() -> AddProductFlow {
        let mut flow = AddProductFlow::new();
        flow.open();
        flow.set_field(DraftField::Name, "Pulse Oximeter");
        flow.set_field(DraftField::Description, "Fingertip SpO2 monitor");
        flow.set_field(DraftField::Price, "1499");
        flow.set_image(png("oximeter.png", 1024)).unwrap();
        flow
    }

    #[test]
    fn test_submit_requires_every_field() {
        let cases: [fn(&mut AddProductFlow); 4] = [
            |f| f.set_field(DraftField::Name, ""),
            |f| f.set_field(DraftField::Description, "   "),
            |f| f.set_field(DraftField::Price, ""),
            |f| f.clear_image(),
        ];

        for blank_out in cases {
            let mut flow = filled_flow();
            blank_out(&mut flow);

            assert_eq!(flow.submit().unwrap_err(), ValidationError::MissingFields);
            assert_eq!(flow.state(), FlowState::Editing);
            assert_eq!(flow.error(), Some("All fields + Image required"));
        }
    }

    #[test]
    fn test_submit_rejects_bad_prices() {
        for price in ["-5", "abc", "NaN", "inf", "12..5"] {
            let mut flow = filled_flow();
            flow.set_field(DraftField::Price, price);

            assert_eq!(
                flow.submit().unwrap_err(),
                ValidationError::InvalidPrice,
                "price {price:?}"
            );
            assert_eq!(flow.state(), FlowState::Editing);
        }
    }

    #[test]
    fn test_submit_builds_payload() {
        let mut flow = filled_flow();
        flow.set_field(DraftField::Price, " 0 ");

        let submission = flow.submit().unwrap();
        assert_eq!(flow.state(), FlowState::Submitting);
        assert!(!flow.can_submit());
        assert_eq!(submission.product.name, "Pulse Oximeter");
        assert_eq!(submission.product.price, "0");
        assert_eq!(submission.product.image.file_name, "oximeter.png");
    }

    #[test]
    fn test_double_submit_is_rejected() {
        let mut flow = filled_flow();
        flow.submit().unwrap();

        assert_eq!(
            flow.submit().unwrap_err(),
            ValidationError::SubmissionInFlight
        );
    }

    #[test]
    fn test_editing_clears_error() {
        let mut flow = AddProductFlow::new();
        assert!(flow.submit().is_err());
        assert!(flow.error().is_some());

        flow.set_field(DraftField::Name, "G");
        assert!(flow.error().is_none());
    }

    #[test]
    fn test_oversized_image_keeps_current_preview() {
        let mut flow = filled_flow();
        let before = flow.draft().clone();

        let err = flow.set_image(png("huge.png", 6 * 1024 * 1024)).unwrap_err();

        assert_eq!(err, ValidationError::ImageTooLarge);
        assert_eq!(flow.error(), Some("Image must be less than 5MB"));
        // Same image, same preview resource
        assert_eq!(flow.draft(), &before);
        assert!(flow.preview().is_some());
        assert_eq!(flow.live_previews(), 1);
    }

    #[test]
    fn test_image_exactly_at_limit_is_accepted() {
        let mut flow = AddProductFlow::new();
        assert!(flow.set_image(png("edge.png", MAX_IMAGE_BYTES)).is_ok());
    }

    #[test]
    fn test_non_image_is_rejected() {
        let mut flow = AddProductFlow::new();
        let pdf = SelectedImage {
            file_name: "leaflet.pdf".to_string(),
            mime: "application/pdf".to_string(),
            bytes: vec![0u8; 10],
        };

        assert_eq!(
            flow.set_image(pdf).unwrap_err(),
            ValidationError::InvalidImageType
        );
        assert!(flow.preview().is_none());
        assert_eq!(flow.live_previews(), 0);
    }

    #[test]
    fn test_replacing_image_releases_old_preview() {
        let mut flow = filled_flow();
        flow.set_image(png("second.png", 10)).unwrap();
        flow.set_image(png("third.png", 10)).unwrap();

        assert_eq!(flow.live_previews(), 1);

        flow.clear_image();
        assert_eq!(flow.live_previews(), 0);
        assert!(flow.preview().is_none());
    }

    #[test]
    fn test_failed_submit_keeps_draft() {
        let mut flow = filled_flow();
        let submission = flow.submit().unwrap();
        let draft_before = flow.draft().clone();

        let outcome = flow.apply_submit(submission.ticket, Err(ApiError::Server { status: 500 }));

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(flow.state(), FlowState::Editing);
        assert_eq!(flow.error(), Some(SUBMIT_FAILED));
        assert_eq!(flow.draft(), &draft_before);
        assert!(flow.can_submit());
    }

    #[test]
    fn test_success_confirms_then_resets_once() {
        let mut flow = filled_flow();
        let submission = flow.submit().unwrap();

        let outcome = flow.apply_submit(submission.ticket, Ok(()));
        let SubmitOutcome::Confirm(ticket) = outcome else {
            panic!("expected confirmation, got {outcome:?}");
        };
        assert!(flow.succeeded());
        assert!(flow.is_open());

        assert!(flow.finish_confirmation(ticket));
        assert!(!flow.finish_confirmation(ticket));

        assert!(!flow.is_open());
        assert!(flow.draft().is_empty());
        assert_eq!(flow.live_previews(), 0);
        assert_eq!(flow.state(), FlowState::Editing);
    }

    #[test]
    fn test_close_mid_submission_ignores_late_result() {
        let cases = [
            (Ok(()), SubmitOutcome::Detached),
            (
                Err(ApiError::Transport("reset by peer".into())),
                SubmitOutcome::Ignored,
            ),
        ];
        for (result, expected) in cases {
            let mut flow = filled_flow();
            let submission = flow.submit().unwrap();

            flow.close();
            let outcome = flow.apply_submit(submission.ticket, result);

            assert_eq!(outcome, expected);
            assert!(!flow.is_open());
            assert!(flow.draft().is_empty());
            assert!(flow.error().is_none());
            assert!(!flow.succeeded());
        }
    }

    #[test]
    fn test_close_during_confirmation_still_refreshes_once() {
        let mut flow = filled_flow();
        let submission = flow.submit().unwrap();
        let SubmitOutcome::Confirm(ticket) = flow.apply_submit(submission.ticket, Ok(())) else {
            panic!("expected confirmation");
        };

        flow.close();
        assert!(!flow.is_open());

        assert!(flow.finish_confirmation(ticket));
        assert!(!flow.finish_confirmation(ticket));
        assert!(!flow.is_open());
        assert!(flow.draft().is_empty());
    }

    #[test]
    fn test_confirmation_for_old_form_leaves_new_form_alone() {
        let mut flow = filled_flow();
        let submission = flow.submit().unwrap();
        let SubmitOutcome::Confirm(ticket) = flow.apply_submit(submission.ticket, Ok(())) else {
            panic!("expected confirmation");
        };

        flow.close();
        flow.open();
        flow.set_field(DraftField::Name, "Crepe bandage");

        assert!(flow.finish_confirmation(ticket));
        assert!(flow.is_open());
        assert_eq!(flow.draft().name, "Crepe bandage");
    }

    #[test]
    fn test_failed_submit_owes_no_refresh() {
        let mut flow = filled_flow();
        let submission = flow.submit().unwrap();
        flow.apply_submit(submission.ticket, Err(ApiError::Server { status: 400 }));

        assert!(!flow.finish_confirmation(submission.ticket));
    }

    #[test]
    fn test_image_for_current_form_is_applied() {
        let mut flow = AddProductFlow::new();
        flow.open();
        let ticket = flow.image_ticket();

        assert_eq!(
            flow.apply_image(ticket, png("swab.png", 10)),
            ImageOutcome::Accepted
        );
        assert_eq!(flow.live_previews(), 1);

        assert_eq!(
            flow.apply_image(ticket, png("huge.png", MAX_IMAGE_BYTES + 1)),
            ImageOutcome::Rejected(ValidationError::ImageTooLarge)
        );
        assert_eq!(flow.live_previews(), 1);
    }

    #[test]
    fn test_image_picked_before_reopen_is_dropped() {
        let mut flow = AddProductFlow::new();
        flow.open();
        let ticket = flow.image_ticket();

        flow.close();
        flow.open();

        assert_eq!(
            flow.apply_image(ticket, png("late.png", 10)),
            ImageOutcome::Ignored
        );
        assert!(flow.draft().image.is_none());
        assert!(flow.error().is_none());
        assert_eq!(flow.live_previews(), 0);
    }

    #[test]
    fn test_reset_releases_everything() {
        let mut flow = filled_flow();
        flow.reset();

        assert!(flow.draft().is_empty());
        assert_eq!(flow.live_previews(), 0);
        assert!(flow.is_open());
    }
}
