use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of the post-exchange data setup. Never routed through the error
/// classifier; the screen treats it as fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("user data initialization failed: {message}")]
pub struct SessionInitFailure {
    pub message: String,
}

impl SessionInitFailure {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type SessionInitResult = Result<(), SessionInitFailure>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionOperation {
    /// Prepare the freshly authenticated account's local data for use. Must
    /// complete before the main screen takes over.
    InitializeUserData,
}

impl Operation for SessionOperation {
    type Output = SessionInitResult;
}

pub struct SessionInit<Ev> {
    context: CapabilityContext<SessionOperation, Ev>,
}

impl<Ev> Capability<Ev> for SessionInit<Ev> {
    type Operation = SessionOperation;
    type MappedSelf<MappedEv> = SessionInit<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        SessionInit::new(self.context.map_event(f))
    }
}

impl<Ev> SessionInit<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<SessionOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn initialize_user_data<F>(&self, callback: F)
    where
        F: Fn(SessionInitResult) -> Ev + Send + Sync + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let response = context
                .request_from_shell(SessionOperation::InitializeUserData)
                .await;
            context.update_app(callback(response));
        });
    }
}
