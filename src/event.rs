use serde::{Deserialize, Serialize};

use crate::capabilities::{ExchangeResult, SessionInitResult, TimerId, TimerOutput};
use crate::classifier::FieldOwner;
use crate::model::{DeviceClass, LocalSession, Secret, ServerKind};

/// Everything that can happen to the account screen: shell input, keyboard
/// notifications, and capability completions. Large results are boxed to
/// keep the enum small.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Lifecycle
    ScreenPresented {
        device_class: DeviceClass,
        closable: bool,
        app_version: String,
        prior_session: Option<LocalSession>,
    },
    ScreenUnmounted,

    // Mode selection
    SwitchToLogin,
    SwitchToSignUp,
    ServerKindSelected {
        kind: ServerKind,
    },

    // Form input
    UserIdChanged {
        value: String,
    },
    PasswordChanged {
        value: Secret,
    },
    ServerUrlChanged {
        value: String,
    },
    ReturnKeyPressed {
        field: FieldOwner,
    },

    // Submission
    SubmitRequested,
    ExchangeCompleted(Box<ExchangeResult>),
    SessionInitialized(Box<SessionInitResult>),
    NoticeDismissed,

    // Auxiliary actions
    ForgotPasswordPressed,
    ClosePressed,

    // Keyboard-driven viewport adjustment
    KeyboardWillShow {
        height: f64,
        duration_ms: u64,
    },
    KeyboardWillHide {
        duration_ms: u64,
    },
    ViewportTimerFired {
        id: TimerId,
        output: TimerOutput,
    },
}

impl Event {
    /// Short name for telemetry counters.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ScreenPresented { .. } => "screen_presented",
            Self::ScreenUnmounted => "screen_unmounted",
            Self::SwitchToLogin => "switch_to_login",
            Self::SwitchToSignUp => "switch_to_sign_up",
            Self::ServerKindSelected { .. } => "server_kind_selected",
            Self::UserIdChanged { .. } => "user_id_changed",
            Self::PasswordChanged { .. } => "password_changed",
            Self::ServerUrlChanged { .. } => "server_url_changed",
            Self::ReturnKeyPressed { .. } => "return_key_pressed",
            Self::SubmitRequested => "submit_requested",
            Self::ExchangeCompleted(_) => "exchange_completed",
            Self::SessionInitialized(_) => "session_initialized",
            Self::NoticeDismissed => "notice_dismissed",
            Self::ForgotPasswordPressed => "forgot_password_pressed",
            Self::ClosePressed => "close_pressed",
            Self::KeyboardWillShow { .. } => "keyboard_will_show",
            Self::KeyboardWillHide { .. } => "keyboard_will_hide",
            Self::ViewportTimerFired { .. } => "viewport_timer_fired",
        }
    }
}
