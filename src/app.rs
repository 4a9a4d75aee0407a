//! The account screen app: update loop, submission orchestration, viewport
//! coordination, and the view projection.

use serde::{Deserialize, Serialize};

use crate::capabilities::{
    Capabilities, ExchangeOptions, ExchangeResult, SessionInitResult, TimerId, TimerOutput,
};
use crate::classifier::{classify, Classified, FieldMessage, FieldOwner};
use crate::event::Event;
use crate::model::{AuthMode, Model, PendingScroll, ServerKind};

/// Zero-delay settle before the keyboard-show scroll, so the shell applies
/// the new keyboard padding before the offset is measured against it.
const SCROLL_SETTLE_MS: u64 = 0;

// Literal validation messages, matching the account service's own wording.
const MSG_ENTER_USER_ID: &str = "Please enter user id";
const MSG_ENTER_PASSWORD: &str = "Please enter password";
const MSG_ENTER_SERVER: &str = "Please enter server address";

#[derive(Default)]
pub struct App;

impl App {
    /// Fixed-order, short-circuiting precondition check. Never reaches the
    /// network.
    fn validate(model: &Model) -> Result<(), (FieldOwner, &'static str)> {
        if model.form.user_id.is_empty() {
            return Err((FieldOwner::UserId, MSG_ENTER_USER_ID));
        }
        if model.form.password.is_empty() {
            return Err((FieldOwner::Password, MSG_ENTER_PASSWORD));
        }
        if model.server_kind.is_private() && model.form.server_url.is_empty() {
            return Err((FieldOwner::Server, MSG_ENTER_SERVER));
        }
        Ok(())
    }

    fn submit(model: &mut Model, caps: &Capabilities) {
        if model.busy {
            // Re-entrancy guard: at most one exchange in flight per screen
            // instance. No new error state, no duplicate call.
            return;
        }

        model.form.reset_errors();

        if let Err((owner, text)) = Self::validate(model) {
            model.form.set_error(owner, FieldMessage::plain(text));
            caps.telemetry()
                .event("submit_rejected", &[("field", owner.as_str())]);
            caps.render().render();
            return;
        }

        model.busy = true;

        let server = model.effective_server();
        let options = ExchangeOptions {
            auto_login: true,
            merge_local_account: model.merge_local_account(),
        };
        let user_id = model.form.user_id.clone();
        let password = model.form.password.clone();

        tracing::debug!(mode = ?model.mode, server = %server, "starting credential exchange");

        match model.mode {
            AuthMode::Login => caps.auth().login(server, user_id, password, options, |result| {
                Event::ExchangeCompleted(Box::new(result))
            }),
            AuthMode::SignUp => caps
                .auth()
                .sign_up(server, user_id, password, options, |result| {
                    Event::ExchangeCompleted(Box::new(result))
                }),
        }

        caps.telemetry()
            .event("exchange_started", &[("mode", model.mode.as_str())]);
        caps.render().render();
    }

    fn handle_exchange_completed(model: &mut Model, caps: &Capabilities, result: ExchangeResult) {
        match result {
            Ok(session) => {
                // Busy stays on: the session must be initialized before the
                // screen is handed off.
                tracing::debug!(user_id = %session.user_id, "credential exchange succeeded");
                caps.telemetry()
                    .event("exchange_succeeded", &[("mode", model.mode.as_str())]);
                caps.session()
                    .initialize_user_data(|result| Event::SessionInitialized(Box::new(result)));
            }
            Err(failure) => {
                model.busy = false;
                caps.telemetry()
                    .event("exchange_failed", &[("mode", model.mode.as_str())]);

                match classify(model.mode, model.server_kind.is_private(), &failure) {
                    Classified::Field { owner, message } => model.form.set_error(owner, message),
                    Classified::Notice { message } => model.active_notice = Some(message),
                }
                caps.render().render();
            }
        }
    }

    fn handle_session_initialized(
        model: &mut Model,
        caps: &Capabilities,
        result: SessionInitResult,
    ) {
        // Reset the guard before branching so no path can leave the screen
        // stuck busy.
        model.busy = false;

        match result {
            Ok(()) => {
                caps.telemetry().event("session_initialized", &[]);
                caps.navigate().replace_with_main();
            }
            Err(failure) => {
                // Credentials were accepted upstream; a local initialization
                // failure is not a user-input problem and bypasses the
                // classifier.
                tracing::warn!(error = %failure, "user data initialization failed");
                caps.telemetry().error("session_init_failed", &failure.message);
                model.fatal_error = Some(failure.message);
            }
        }

        caps.render().render();
    }

    /// The return key submits only from the terminal field of the current
    /// layout: the password field under the official server, the server-url
    /// field under a private one.
    fn should_submit_on_return(model: &Model, field: FieldOwner) -> bool {
        match field {
            FieldOwner::UserId => false,
            FieldOwner::Password => !model.server_kind.is_private(),
            FieldOwner::Server => model.server_kind.is_private(),
        }
    }

    fn forgot_password_url(model: &Model) -> String {
        format!(
            "{}?p=wiz&v={}&c=forgot_password",
            crate::FORGOT_PASSWORD_URL,
            model.app_version
        )
    }

    fn handle_keyboard_will_show(
        model: &mut Model,
        caps: &Capabilities,
        height: f64,
        duration_ms: u64,
    ) {
        model.viewport.keyboard_height = height;

        // A pending height reset from an earlier hide would zero the fresh
        // height; drop it.
        if let Some(id) = model.viewport.pending_clear.take() {
            caps.timer().cancel(id);
        }

        let id = TimerId::generate();
        model.viewport.pending_scroll = Some(PendingScroll {
            timer: id.clone(),
            duration_ms,
        });
        let event_id = id.clone();
        caps.timer()
            .start(id, SCROLL_SETTLE_MS, move |output| Event::ViewportTimerFired {
                id: event_id.clone(),
                output,
            });

        caps.render().render();
    }

    fn handle_keyboard_will_hide(model: &mut Model, caps: &Capabilities, duration_ms: u64) {
        // The show-side settle may not have fired yet; it must not scroll a
        // layout whose keyboard is already going away.
        if let Some(pending) = model.viewport.pending_scroll.take() {
            caps.timer().cancel(pending.timer);
        }

        caps.viewport().scroll_to(0.0, duration_ms);

        // The keyboard padding stays until the scroll-back animation has
        // finished, otherwise the content jumps.
        let id = TimerId::generate();
        model.viewport.pending_clear = Some(id.clone());
        let event_id = id.clone();
        caps.timer()
            .start(id, duration_ms, move |output| Event::ViewportTimerFired {
                id: event_id.clone(),
                output,
            });
    }

    fn handle_viewport_timer(
        model: &mut Model,
        caps: &Capabilities,
        id: &TimerId,
        output: TimerOutput,
    ) {
        if !matches!(output, TimerOutput::Elapsed) {
            return;
        }

        let is_pending_scroll = model
            .viewport
            .pending_scroll
            .as_ref()
            .map_or(false, |pending| &pending.timer == id);
        if is_pending_scroll {
            if let Some(pending) = model.viewport.pending_scroll.take() {
                caps.viewport()
                    .scroll_to(model.scroll_target_offset(), pending.duration_ms);
            }
            return;
        }

        if model.viewport.pending_clear.as_ref() == Some(id) {
            model.viewport.pending_clear = None;
            model.viewport.keyboard_height = 0.0;
            caps.render().render();
        }
        // Anything else is a timer from a superseded show/hide; ignore it.
    }

    fn handle_screen_unmounted(model: &mut Model, caps: &Capabilities) {
        if let Some(pending) = model.viewport.pending_scroll.take() {
            caps.timer().cancel(pending.timer);
        }
        if let Some(id) = model.viewport.pending_clear.take() {
            caps.timer().cancel(id);
        }
        model.viewport.keyboard_height = 0.0;
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        caps.telemetry().counter(&format!("event.{}", event.name()), 1);

        match event {
            Event::ScreenPresented {
                device_class,
                closable,
                app_version,
                prior_session,
            } => {
                model.device_class = device_class;
                model.closable = closable;
                model.app_version = app_version;
                model.local_session = prior_session;
                caps.render().render();
            }

            Event::ScreenUnmounted => Self::handle_screen_unmounted(model, caps),

            Event::SwitchToLogin => {
                if model.mode != AuthMode::Login {
                    model.mode = AuthMode::Login;
                    caps.render().render();
                }
            }

            Event::SwitchToSignUp => {
                if model.mode != AuthMode::SignUp {
                    model.mode = AuthMode::SignUp;
                    caps.render().render();
                }
            }

            Event::ServerKindSelected { kind } => {
                // Switching kinds never touches the stored server URL; it is
                // simply ignored until Private is selected again.
                if model.server_kind != kind {
                    model.server_kind = kind;
                    caps.render().render();
                }
            }

            Event::UserIdChanged { value } => {
                model.form.user_id = value;
                caps.render().render();
            }

            Event::PasswordChanged { value } => {
                model.form.password = value;
                caps.render().render();
            }

            Event::ServerUrlChanged { value } => {
                model.form.server_url = value;
                caps.render().render();
            }

            Event::ReturnKeyPressed { field } => {
                if Self::should_submit_on_return(model, field) {
                    Self::submit(model, caps);
                }
            }

            Event::SubmitRequested => Self::submit(model, caps),

            Event::ExchangeCompleted(result) => {
                Self::handle_exchange_completed(model, caps, *result);
            }

            Event::SessionInitialized(result) => {
                Self::handle_session_initialized(model, caps, *result);
            }

            Event::NoticeDismissed => {
                model.active_notice = None;
                caps.render().render();
            }

            Event::ForgotPasswordPressed => {
                caps.navigate().open_external(Self::forgot_password_url(model));
            }

            Event::ClosePressed => {
                if model.closable {
                    caps.navigate().dismiss_modal();
                } else {
                    caps.navigate().replace_with_main();
                }
            }

            Event::KeyboardWillShow {
                height,
                duration_ms,
            } => Self::handle_keyboard_will_show(model, caps, height, duration_ms),

            Event::KeyboardWillHide { duration_ms } => {
                Self::handle_keyboard_will_hide(model, caps, duration_ms);
            }

            Event::ViewportTimerFired { id, output } => {
                Self::handle_viewport_timer(model, caps, &id, output);
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel {
            mode: model.mode,
            server_kind: model.server_kind,
            user_id: model.form.user_id.clone(),
            server_url: model.form.server_url.clone(),
            user_id_error: model.form.user_id_error.clone(),
            password_error: model.form.password_error.clone(),
            server_error: model.form.server_error.clone(),
            busy: model.busy,
            controls_enabled: !model.busy,
            show_server_field: model.server_kind.is_private(),
            show_forgot_password: model.mode.is_login(),
            show_close_button: model.closable,
            banner_height: model.device_class.banner_height(),
            keyboard_padding: model.viewport.keyboard_height,
            notice: model.active_notice.clone(),
            fatal_error: model.fatal_error.clone(),
        }
    }
}

/// Projection the shell renders. The password never crosses this surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub mode: AuthMode,
    pub server_kind: ServerKind,
    pub user_id: String,
    pub server_url: String,
    pub user_id_error: Option<FieldMessage>,
    pub password_error: Option<FieldMessage>,
    pub server_error: Option<FieldMessage>,
    pub busy: bool,
    pub controls_enabled: bool,
    pub show_server_field: bool,
    pub show_forgot_password: bool,
    pub show_close_button: bool,
    pub banner_height: f64,
    pub keyboard_padding: f64,
    pub notice: Option<String>,
    pub fatal_error: Option<String>,
}
