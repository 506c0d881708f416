/// Form state for every submit surface
///
/// Each form owns its field values plus one tagged submit state, so
/// "submitting with an error showing" or similar illegal combinations
/// cannot be represented. Validation runs before any network call;
/// a form that fails validation never produces a request.

use crate::api::endpoints::{NewWork, PhotoUpdate};
use crate::state::data::Photo;

/// Lifecycle of one submission
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmitState {
    /// Editable, nothing in flight
    #[default]
    Idle,
    /// A request is in flight; inputs and the submit button are locked
    Submitting,
    /// The last submit failed; the form is editable and resubmittable
    Failed(String),
}

impl SubmitState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmitState::Submitting)
    }

    /// Message of a failed submit, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            SubmitState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Structural email check: something@domain.tld.
///
/// Not RFC parsing, just enough to catch obviously malformed input
/// before it reaches the server.
pub fn is_valid_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let Some(domain) = parts.next() else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // The domain needs at least one dot with content on both sides
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !host.starts_with('.'),
        None => false,
    }
}

// ========== Login ==========

/// Admin login form: idle -> submitting -> authenticated (navigates
/// away) | rejected | network_error (stays, resubmittable).
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub show_password: bool,
    pub state: SubmitState,
}

impl LoginForm {
    /// Check fields before submitting.
    pub fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err("Enter your username and password.".to_string());
        }
        Ok(())
    }

    /// Enter `Submitting` unless a submit is already in flight.
    /// Returns whether the caller may issue the request.
    pub fn begin_submit(&mut self) -> bool {
        if self.state.is_submitting() {
            return false;
        }
        match self.validate() {
            Ok(()) => {
                self.state = SubmitState::Submitting;
                true
            }
            Err(message) => {
                self.state = SubmitState::Failed(message);
                false
            }
        }
    }

    /// Record a rejected login or network failure. Fields keep their
    /// values so a typo can be corrected and resubmitted.
    pub fn fail(&mut self, message: String) {
        self.state = SubmitState::Failed(message);
    }
}

// ========== Contact ==========

/// Public contact form
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    pub state: SubmitState,
    /// Confirmation from the server after a successful send
    pub sent: Option<String>,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.message.trim().is_empty()
        {
            return Err("Fill in your name, email and message.".to_string());
        }
        if !is_valid_email(self.email.trim()) {
            return Err("That email address doesn't look right.".to_string());
        }
        Ok(())
    }

    pub fn begin_submit(&mut self) -> bool {
        if self.state.is_submitting() {
            return false;
        }
        match self.validate() {
            Ok(()) => {
                self.sent = None;
                self.state = SubmitState::Submitting;
                true
            }
            Err(message) => {
                self.state = SubmitState::Failed(message);
                false
            }
        }
    }

    /// Record a failed send. Fields keep their values so the message
    /// can be corrected and resubmitted.
    pub fn fail(&mut self, message: String) {
        self.state = SubmitState::Failed(message);
    }

    /// Clear the fields after a successful send, keeping the
    /// confirmation visible.
    pub fn succeed(&mut self, confirmation: String) {
        self.name.clear();
        self.email.clear();
        self.message.clear();
        self.state = SubmitState::Idle;
        self.sent = Some(confirmation);
    }
}

// ========== Create work ==========

/// "Create new work" form on the manage tab
#[derive(Debug, Clone, Default)]
pub struct WorkForm {
    pub title: String,
    pub description: String,
    pub category_id: Option<i64>,
    pub is_featured: bool,
    pub state: SubmitState,
}

impl WorkForm {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("The work needs a title.".to_string());
        }
        Ok(())
    }

    pub fn begin_submit(&mut self) -> bool {
        if self.state.is_submitting() {
            return false;
        }
        match self.validate() {
            Ok(()) => {
                self.state = SubmitState::Submitting;
                true
            }
            Err(message) => {
                self.state = SubmitState::Failed(message);
                false
            }
        }
    }

    /// Record a failed create. Fields keep their values so they can be
    /// corrected and resubmitted.
    pub fn fail(&mut self, message: String) {
        self.state = SubmitState::Failed(message);
    }

    pub fn to_request(&self) -> NewWork {
        NewWork {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            category_id: self.category_id,
            is_featured: self.is_featured,
        }
    }

    /// Reset the fields after a successful create.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// ========== Edit photo ==========

/// Per-photo edit dialog on the manage tab
#[derive(Debug, Clone)]
pub struct PhotoEditForm {
    pub photo_id: i64,
    pub title: String,
    pub description: String,
    pub category_id: Option<i64>,
    pub work_id: Option<i64>,
    pub is_featured: bool,
    pub state: SubmitState,
}

impl PhotoEditForm {
    pub fn from_photo(photo: &Photo) -> Self {
        Self {
            photo_id: photo.id,
            title: photo.title.clone(),
            description: photo.description.clone().unwrap_or_default(),
            category_id: photo.category_id,
            work_id: photo.work_id,
            is_featured: photo.is_featured,
            state: SubmitState::Idle,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("The photo needs a title.".to_string());
        }
        Ok(())
    }

    pub fn begin_submit(&mut self) -> bool {
        if self.state.is_submitting() {
            return false;
        }
        match self.validate() {
            Ok(()) => {
                self.state = SubmitState::Submitting;
                true
            }
            Err(message) => {
                self.state = SubmitState::Failed(message);
                false
            }
        }
    }

    /// Record a failed update. Fields keep their values so they can be
    /// corrected and resubmitted.
    pub fn fail(&mut self, message: String) {
        self.state = SubmitState::Failed(message);
    }

    pub fn to_request(&self) -> PhotoUpdate {
        PhotoUpdate {
            id: self.photo_id,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            category_id: self.category_id,
            work_id: self.work_id,
            is_featured: self.is_featured,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("someone@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.co"));

        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("someone@"));
        assert!(!is_valid_email("someone@example"));
        assert!(!is_valid_email("someone@.com"));
        assert!(!is_valid_email("someone@example."));
        assert!(!is_valid_email("two words@example.com"));
        assert!(!is_valid_email("a@@example.com"));
    }

    #[test]
    fn test_login_requires_both_fields() {
        let mut form = LoginForm {
            username: "admin".to_string(),
            ..Default::default()
        };
        assert!(!form.begin_submit());
        assert!(form.state.error().is_some());

        form.password = "hunter2".to_string();
        assert!(form.begin_submit());
        assert!(form.state.is_submitting());
    }

    #[test]
    fn test_second_submit_is_blocked_while_in_flight() {
        let mut form = LoginForm {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
            ..Default::default()
        };
        assert!(form.begin_submit());
        // A second click while submitting must not start another request
        assert!(!form.begin_submit());
    }

    #[test]
    fn test_rejected_login_is_resubmittable_with_message() {
        let mut form = LoginForm {
            username: "admin".to_string(),
            password: "wrong".to_string(),
            ..Default::default()
        };
        assert!(form.begin_submit());
        form.fail("invalid credentials".to_string());

        assert_eq!(form.state.error(), Some("invalid credentials"));
        assert!(form.begin_submit());
    }

    #[test]
    fn test_contact_rejects_bad_email_before_any_request() {
        let mut form = ContactForm {
            name: "Ana".to_string(),
            email: "not-an-email".to_string(),
            message: "Hello!".to_string(),
            ..Default::default()
        };
        assert!(!form.begin_submit());
        assert!(form.state.error().is_some());
        assert!(!form.state.is_submitting());
    }

    #[test]
    fn test_contact_success_clears_fields_keeps_confirmation() {
        let mut form = ContactForm {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            message: "Hello!".to_string(),
            ..Default::default()
        };
        assert!(form.begin_submit());
        form.succeed("Message sent".to_string());

        assert!(form.name.is_empty());
        assert!(form.message.is_empty());
        assert_eq!(form.sent.as_deref(), Some("Message sent"));
        assert_eq!(form.state, SubmitState::Idle);
    }

    #[test]
    fn test_photo_edit_round_trip() {
        let photo = Photo {
            id: 9,
            title: "Dunes".to_string(),
            description: Some("evening light".to_string()),
            url: "https://cdn.example/9.jpg".to_string(),
            category_id: Some(2),
            category_name: None,
            category_slug: None,
            work_id: Some(4),
            is_featured: true,
            order: 0,
            created_at: None,
        };

        let form = PhotoEditForm::from_photo(&photo);
        let update = form.to_request();
        assert_eq!(update.id, 9);
        assert_eq!(update.title, "Dunes");
        assert_eq!(update.category_id, Some(2));
        assert_eq!(update.work_id, Some(4));
        assert!(update.is_featured);
    }

    #[test]
    fn test_work_form_requires_title() {
        let mut form = WorkForm::default();
        assert!(!form.begin_submit());

        form.title = "  Spring Session ".to_string();
        assert!(form.begin_submit());
        assert_eq!(form.to_request().title, "Spring Session");
    }
}
