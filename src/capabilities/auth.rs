//! Credential-exchange capability.
//!
//! The core never talks to the account service itself. It describes a login
//! or sign-up exchange as an operation; the shell owns the transport, runs
//! the exchange (including any URL normalization for private servers), and
//! answers with a session or a failure signal.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Secret;

/// Options forwarded with every exchange call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeOptions {
    /// Persist the credentials shell-side so the next launch skips this
    /// screen.
    pub auto_login: bool,
    /// Fold the on-device account's data into the authenticated cloud
    /// account instead of discarding it.
    pub merge_local_account: bool,
}

/// Authenticated session returned by a successful exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub token: Secret,
}

/// The code slot of a failure signal. The account service reports numeric
/// protocol codes; the transport layer reports string tags in the same
/// position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FailureCode {
    Protocol(i64),
    Tag(String),
}

/// Failure signal produced by the shell when an exchange does not yield a
/// session. Consumed exactly once by the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("credential exchange failed: {message}")]
pub struct ExchangeFailure {
    #[serde(default)]
    pub code: Option<FailureCode>,
    #[serde(default)]
    pub extern_code: Option<String>,
    #[serde(default)]
    pub is_network_error: bool,
    #[serde(default)]
    pub message: String,
}

impl ExchangeFailure {
    #[must_use]
    pub fn protocol(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(FailureCode::Protocol(code)),
            extern_code: None,
            is_network_error: false,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn tagged(tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(FailureCode::Tag(tag.into())),
            extern_code: None,
            is_network_error: false,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_extern_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: None,
            extern_code: Some(code.into()),
            is_network_error: false,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            code: None,
            extern_code: None,
            is_network_error: true,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn protocol_code(&self) -> Option<i64> {
        match &self.code {
            Some(FailureCode::Protocol(code)) => Some(*code),
            _ => None,
        }
    }

    #[must_use]
    pub fn code_tag(&self) -> Option<&str> {
        match &self.code {
            Some(FailureCode::Tag(tag)) => Some(tag),
            _ => None,
        }
    }

    #[must_use]
    pub fn extern_code(&self) -> Option<&str> {
        self.extern_code.as_deref()
    }
}

pub type ExchangeResult = Result<Session, ExchangeFailure>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AuthOperation {
    Login {
        server: String,
        user_id: String,
        password: Secret,
        options: ExchangeOptions,
    },
    SignUp {
        server: String,
        user_id: String,
        password: Secret,
        options: ExchangeOptions,
    },
}

impl Operation for AuthOperation {
    type Output = ExchangeResult;
}

pub struct Auth<Ev> {
    context: CapabilityContext<AuthOperation, Ev>,
}

impl<Ev> Capability<Ev> for Auth<Ev> {
    type Operation = AuthOperation;
    type MappedSelf<MappedEv> = Auth<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Auth::new(self.context.map_event(f))
    }
}

impl<Ev> Auth<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<AuthOperation, Ev>) -> Self {
        Self { context }
    }

    /// Exchange credentials for a session against `server`.
    pub fn login<F>(
        &self,
        server: String,
        user_id: String,
        password: Secret,
        options: ExchangeOptions,
        callback: F,
    ) where
        F: Fn(ExchangeResult) -> Ev + Send + Sync + 'static,
    {
        self.request(
            AuthOperation::Login {
                server,
                user_id,
                password,
                options,
            },
            callback,
        );
    }

    /// Create an account on `server` and exchange the new credentials for a
    /// session.
    pub fn sign_up<F>(
        &self,
        server: String,
        user_id: String,
        password: Secret,
        options: ExchangeOptions,
        callback: F,
    ) where
        F: Fn(ExchangeResult) -> Ev + Send + Sync + 'static,
    {
        self.request(
            AuthOperation::SignUp {
                server,
                user_id,
                password,
                options,
            },
            callback,
        );
    }

    fn request<F>(&self, operation: AuthOperation, callback: F)
    where
        F: Fn(ExchangeResult) -> Ev + Send + Sync + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let response = context.request_from_shell(operation).await;
            context.update_app(callback(response));
        });
    }
}
