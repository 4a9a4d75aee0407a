use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

use crate::capabilities::TimerId;
use crate::classifier::{FieldMessage, FieldOwner};
use crate::{BANNER_HEIGHT_PHONE, BANNER_HEIGHT_TABLET, DEFAULT_SERVER};

/// Wrapper for credential material: redacts Debug output and zeroizes the
/// buffer on drop. Serializable because it has to cross the shell boundary
/// inside capability operations.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    #[default]
    Login,
    SignUp,
}

impl AuthMode {
    #[must_use]
    pub const fn is_login(self) -> bool {
        matches!(self, Self::Login)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::SignUp => "sign_up",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServerKind {
    #[default]
    Official,
    Private,
}

impl ServerKind {
    #[must_use]
    pub const fn is_private(self) -> bool {
        matches!(self, Self::Private)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Official => "official",
            Self::Private => "private",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    #[default]
    Phone,
    Tablet,
}

impl DeviceClass {
    #[must_use]
    pub const fn banner_height(self) -> f64 {
        match self {
            Self::Phone => BANNER_HEIGHT_PHONE,
            Self::Tablet => BANNER_HEIGHT_TABLET,
        }
    }
}

/// Snapshot of the session the screen was presented over, taken by the
/// shell at presentation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSession {
    pub user_id: String,
    /// The account exists on-device only and has never been backed by the
    /// cloud.
    pub is_local_only: bool,
}

/// Field values and per-field error slots. At most one message per field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub user_id: String,
    pub password: Secret,
    pub server_url: String,
    pub user_id_error: Option<FieldMessage>,
    pub password_error: Option<FieldMessage>,
    pub server_error: Option<FieldMessage>,
}

impl FormState {
    /// Clears all three error slots. Runs before every validation pass so no
    /// stale message survives into a new submission attempt.
    pub fn reset_errors(&mut self) {
        self.user_id_error = None;
        self.password_error = None;
        self.server_error = None;
    }

    pub fn set_error(&mut self, owner: FieldOwner, message: FieldMessage) {
        match owner {
            FieldOwner::UserId => self.user_id_error = Some(message),
            FieldOwner::Password => self.password_error = Some(message),
            FieldOwner::Server => self.server_error = Some(message),
        }
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.user_id_error.is_some()
            || self.password_error.is_some()
            || self.server_error.is_some()
    }
}

/// A scheduled scroll step, keyed by the timer that completes it.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingScroll {
    pub timer: TimerId,
    pub duration_ms: u64,
}

/// Keyboard-driven viewport state. The pending slots remember which timer is
/// allowed to complete each deferred step; a firing that matches neither is
/// stale and ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewportState {
    pub keyboard_height: f64,
    pub pending_scroll: Option<PendingScroll>,
    pub pending_clear: Option<TimerId>,
}

pub struct Model {
    pub mode: AuthMode,
    pub server_kind: ServerKind,
    pub device_class: DeviceClass,
    pub closable: bool,
    pub app_version: String,
    pub local_session: Option<LocalSession>,
    pub form: FormState,
    /// One submission in flight per screen instance; the sole concurrency
    /// guard.
    pub busy: bool,
    pub active_notice: Option<String>,
    pub fatal_error: Option<String>,
    pub viewport: ViewportState,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            mode: AuthMode::Login,
            server_kind: ServerKind::Official,
            device_class: DeviceClass::Phone,
            closable: false,
            app_version: String::new(),
            local_session: None,
            form: FormState::default(),
            busy: false,
            active_notice: None,
            fatal_error: None,
            viewport: ViewportState::default(),
        }
    }
}

impl Model {
    /// The backend should fold the on-device account into the cloud account
    /// exactly when the screen was opened over a local-only session.
    #[must_use]
    pub fn merge_local_account(&self) -> bool {
        self.local_session
            .as_ref()
            .map_or(false, |session| session.is_local_only)
    }

    /// Effective target for the next exchange. Private URLs go out exactly
    /// as typed; normalization is the transport's job.
    #[must_use]
    pub fn effective_server(&self) -> String {
        match self.server_kind {
            ServerKind::Official => DEFAULT_SERVER.to_string(),
            ServerKind::Private => self.form.server_url.clone(),
        }
    }

    /// Offset the form scrolls to while the keyboard is up: the banner plus
    /// the title and form-card top margins.
    #[must_use]
    pub fn scroll_target_offset(&self) -> f64 {
        self.device_class.banner_height() + crate::TITLE_TOP_MARGIN + crate::FORM_CARD_TOP_MARGIN
    }
}
