//! Maps credential-exchange failures onto the form.
//!
//! The dispatch is an ordered list of predicate/outcome pairs; the first
//! match wins. Licence and server-policy codes deliberately precede the
//! generic network rows so the operator-facing diagnosis is never shadowed
//! by a connectivity message. Failures no rule owns fall back by mode: login
//! raises a blocking notice with the raw message, sign-up pins the message
//! to the password field.

use serde::{Deserialize, Serialize};

use crate::capabilities::ExchangeFailure;
use crate::model::AuthMode;

pub const CODE_INVALID_USER_ID: i64 = 31001;
pub const CODE_INVALID_PASSWORD: i64 = 31002;
/// Account states the backend wants resolved out-of-band; each code has its
/// own string-table entry.
pub const CODES_ACCOUNT_NEEDS_ACTION: [i64; 2] = [31004, 31005];
pub const CODE_IP_RATE_LIMITED: i64 = 332;
pub const CODE_TOO_MANY_REQUESTS: i64 = 429;
pub const CODE_USER_EXISTS: i64 = 31000;
pub const CODE_USER_ID_FORMAT: i64 = 322;

// Both spellings ship in the wild.
pub const EXTERN_LICENSE_SEAT_LIMIT: [&str; 2] = ["WizErrorLicenceCount", "WizErrorLicenseCount"];
pub const EXTERN_LICENSE_EXPIRED: &str = "WizErrorLicenceYear";
pub const EXTERN_DISABLE_REGISTER: &str = "WizErrorDisableRegister";
pub const EXTERN_UPDATE_SERVER: &str = "WizErrorUpdateServer";
pub const EXTERN_UNKNOWN_SERVER_VERSION: &str = "WizErrorUnknownServerVersion";
/// Transport-level failure tag, reported in the code slot.
pub const TAG_NETWORK: &str = "WizErrorNetwork";

/// Form field a message is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldOwner {
    UserId,
    Password,
    Server,
}

impl FieldOwner {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserId => "user_id",
            Self::Password => "password",
            Self::Server => "server",
        }
    }
}

/// Keys understood by the shell's string table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKey {
    ErrorInvalidUserId,
    ErrorInvalidPassword,
    Error31004,
    Error31005,
    #[serde(rename = "errorMaxTimesForIP")]
    ErrorMaxTimesForIp,
    ErrorFrequentOverflow,
    ErrorUserExists,
    ErrorUserIdFormat,
    ErrorLicenseUserLimit,
    ErrorLicenseExpired,
    ErrorDisableRegister,
    ErrorUpdateServer,
    ErrorUnknownServerVersion,
    ErrorNetwork,
    ErrorServer,
    ErrorSignUp,
}

impl MessageKey {
    #[must_use]
    pub const fn as_key(self) -> &'static str {
        match self {
            Self::ErrorInvalidUserId => "errorInvalidUserId",
            Self::ErrorInvalidPassword => "errorInvalidPassword",
            Self::Error31004 => "error31004",
            Self::Error31005 => "error31005",
            Self::ErrorMaxTimesForIp => "errorMaxTimesForIP",
            Self::ErrorFrequentOverflow => "errorFrequentOverflow",
            Self::ErrorUserExists => "errorUserExists",
            Self::ErrorUserIdFormat => "errorUserIdFormat",
            Self::ErrorLicenseUserLimit => "errorLicenseUserLimit",
            Self::ErrorLicenseExpired => "errorLicenseExpired",
            Self::ErrorDisableRegister => "errorDisableRegister",
            Self::ErrorUpdateServer => "errorUpdateServer",
            Self::ErrorUnknownServerVersion => "errorUnknownServerVersion",
            Self::ErrorNetwork => "errorNetwork",
            Self::ErrorServer => "errorServer",
            Self::ErrorSignUp => "errorSignUp",
        }
    }
}

/// A message destined for a form field: literal text for local validation,
/// or a string-table key with an optional interpolation value for classified
/// failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldMessage {
    Plain {
        text: String,
    },
    Localized {
        key: MessageKey,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl FieldMessage {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain { text: text.into() }
    }

    #[must_use]
    pub const fn key(key: MessageKey) -> Self {
        Self::Localized { key, message: None }
    }

    #[must_use]
    pub fn key_with_message(key: MessageKey, message: impl Into<String>) -> Self {
        Self::Localized {
            key,
            message: Some(message.into()),
        }
    }
}

/// Where a classified failure lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// Attached to one form field.
    Field {
        owner: FieldOwner,
        message: FieldMessage,
    },
    /// No field can be blamed; shown as a blocking notice.
    Notice { message: String },
}

struct Ctx<'a> {
    mode: AuthMode,
    private_server: bool,
    failure: &'a ExchangeFailure,
}

struct Rule {
    applies: fn(&Ctx) -> bool,
    outcome: fn(&Ctx) -> Classified,
}

fn field(owner: FieldOwner, message: FieldMessage) -> Classified {
    Classified::Field { owner, message }
}

/// Ordered dispatch table; earlier rows win.
static RULES: &[Rule] = &[
    Rule {
        applies: |c| c.failure.protocol_code() == Some(CODE_INVALID_USER_ID),
        outcome: |_| {
            field(
                FieldOwner::UserId,
                FieldMessage::key(MessageKey::ErrorInvalidUserId),
            )
        },
    },
    Rule {
        applies: |c| c.failure.protocol_code() == Some(CODE_INVALID_PASSWORD),
        outcome: |_| {
            field(
                FieldOwner::Password,
                FieldMessage::key(MessageKey::ErrorInvalidPassword),
            )
        },
    },
    Rule {
        applies: |c| {
            matches!(c.failure.protocol_code(), Some(code) if CODES_ACCOUNT_NEEDS_ACTION.contains(&code))
        },
        outcome: |c| {
            // Per-code string-table entry, mirroring the backend's numbering.
            let key = match c.failure.protocol_code() {
                Some(31005) => MessageKey::Error31005,
                _ => MessageKey::Error31004,
            };
            field(FieldOwner::Password, FieldMessage::key(key))
        },
    },
    Rule {
        applies: |c| c.failure.protocol_code() == Some(CODE_IP_RATE_LIMITED),
        outcome: |_| {
            field(
                FieldOwner::Password,
                FieldMessage::key(MessageKey::ErrorMaxTimesForIp),
            )
        },
    },
    Rule {
        applies: |c| c.failure.protocol_code() == Some(CODE_TOO_MANY_REQUESTS),
        outcome: |_| {
            field(
                FieldOwner::Password,
                FieldMessage::key(MessageKey::ErrorFrequentOverflow),
            )
        },
    },
    Rule {
        applies: |c| c.failure.protocol_code() == Some(CODE_USER_EXISTS),
        outcome: |_| {
            field(
                FieldOwner::UserId,
                FieldMessage::key(MessageKey::ErrorUserExists),
            )
        },
    },
    Rule {
        applies: |c| c.failure.protocol_code() == Some(CODE_USER_ID_FORMAT),
        outcome: |_| {
            field(
                FieldOwner::UserId,
                FieldMessage::key(MessageKey::ErrorUserIdFormat),
            )
        },
    },
    Rule {
        applies: |c| {
            matches!(c.failure.extern_code(), Some(code) if EXTERN_LICENSE_SEAT_LIMIT.contains(&code))
        },
        outcome: |_| {
            field(
                FieldOwner::Server,
                FieldMessage::key(MessageKey::ErrorLicenseUserLimit),
            )
        },
    },
    Rule {
        applies: |c| c.failure.extern_code() == Some(EXTERN_LICENSE_EXPIRED),
        outcome: |_| {
            field(
                FieldOwner::Server,
                FieldMessage::key(MessageKey::ErrorLicenseExpired),
            )
        },
    },
    Rule {
        applies: |c| c.failure.extern_code() == Some(EXTERN_DISABLE_REGISTER),
        outcome: |_| {
            field(
                FieldOwner::Server,
                FieldMessage::key(MessageKey::ErrorDisableRegister),
            )
        },
    },
    Rule {
        applies: |c| c.failure.extern_code() == Some(EXTERN_UPDATE_SERVER),
        outcome: |_| {
            field(
                FieldOwner::Server,
                FieldMessage::key(MessageKey::ErrorUpdateServer),
            )
        },
    },
    Rule {
        applies: |c| c.failure.extern_code() == Some(EXTERN_UNKNOWN_SERVER_VERSION),
        outcome: |c| {
            field(
                FieldOwner::Server,
                FieldMessage::key_with_message(
                    MessageKey::ErrorUnknownServerVersion,
                    c.failure.message.clone(),
                ),
            )
        },
    },
    Rule {
        applies: |c| c.failure.code_tag() == Some(TAG_NETWORK),
        outcome: |c| {
            field(
                FieldOwner::UserId,
                FieldMessage::key_with_message(MessageKey::ErrorNetwork, c.failure.message.clone()),
            )
        },
    },
    Rule {
        applies: |c| c.failure.is_network_error && c.private_server,
        outcome: |c| {
            field(
                FieldOwner::Server,
                FieldMessage::key_with_message(MessageKey::ErrorServer, c.failure.message.clone()),
            )
        },
    },
];

/// Total over every failure shape: every signal maps to exactly one field
/// message or one notice.
#[must_use]
pub fn classify(mode: AuthMode, private_server: bool, failure: &ExchangeFailure) -> Classified {
    let ctx = Ctx {
        mode,
        private_server,
        failure,
    };

    for (index, rule) in RULES.iter().enumerate() {
        if (rule.applies)(&ctx) {
            let outcome = (rule.outcome)(&ctx);
            tracing::debug!(rule = index, ?outcome, "classified exchange failure");
            return outcome;
        }
    }

    tracing::debug!(mode = ?mode, "exchange failure fell through to mode fallback");
    match mode {
        AuthMode::Login => Classified::Notice {
            message: failure.message.clone(),
        },
        AuthMode::SignUp => Classified::Field {
            owner: FieldOwner::Password,
            message: FieldMessage::key_with_message(
                MessageKey::ErrorSignUp,
                failure.message.clone(),
            ),
        },
    }
}
