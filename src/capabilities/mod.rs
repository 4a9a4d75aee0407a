mod auth;
mod navigate;
mod session;
mod telemetry;
mod timer;
mod viewport;

pub use self::auth::{
    Auth, AuthOperation, ExchangeFailure, ExchangeOptions, ExchangeResult, FailureCode, Session,
};
pub use self::navigate::{Navigate, NavigateOperation};
pub use self::session::{SessionInit, SessionInitFailure, SessionInitResult, SessionOperation};
pub use self::telemetry::{Telemetry, TelemetryOperation};
pub use self::timer::{Timer, TimerId, TimerOperation, TimerOutput};
pub use self::viewport::{Viewport, ViewportOperation};

// We use Crux's built-in Render capability directly because it provides
// all necessary functionality for triggering view updates.
pub use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

pub type AppAuth = Auth<Event>;
pub type AppNavigate = Navigate<Event>;
pub type AppRender = Render<Event>;
pub type AppSessionInit = SessionInit<Event>;
pub type AppTelemetry = Telemetry<Event>;
pub type AppTimer = Timer<Event>;
pub type AppViewport = Viewport<Event>;

#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    auth: Auth<Event>,
    navigate: Navigate<Event>,
    render: Render<Event>,
    session: SessionInit<Event>,
    telemetry: Telemetry<Event>,
    timer: Timer<Event>,
    viewport: Viewport<Event>,
}

impl Capabilities {
    #[must_use]
    pub fn auth(&self) -> &AppAuth {
        &self.auth
    }

    #[must_use]
    pub fn navigate(&self) -> &AppNavigate {
        &self.navigate
    }

    #[must_use]
    pub fn render(&self) -> &AppRender {
        &self.render
    }

    #[must_use]
    pub fn session(&self) -> &AppSessionInit {
        &self.session
    }

    #[must_use]
    pub fn telemetry(&self) -> &AppTelemetry {
        &self.telemetry
    }

    #[must_use]
    pub fn timer(&self) -> &AppTimer {
        &self.timer
    }

    #[must_use]
    pub fn viewport(&self) -> &AppViewport {
        &self.viewport
    }
}
