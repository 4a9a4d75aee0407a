//! Shell-side analytics channel. Fire-and-forget; the shell decides where
//! the measurements go.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TelemetryOperation {
    Counter {
        name: String,
        value: u64,
    },
    Event {
        name: String,
        attributes: Vec<(String, String)>,
    },
    Warn {
        name: String,
        detail: String,
    },
    Error {
        name: String,
        detail: String,
    },
}

impl Operation for TelemetryOperation {
    type Output = ();
}

pub struct Telemetry<Ev> {
    context: CapabilityContext<TelemetryOperation, Ev>,
}

impl<Ev> Capability<Ev> for Telemetry<Ev> {
    type Operation = TelemetryOperation;
    type MappedSelf<MappedEv> = Telemetry<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Telemetry::new(self.context.map_event(f))
    }
}

impl<Ev> Telemetry<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<TelemetryOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn counter(&self, name: &str, value: u64) {
        self.notify(TelemetryOperation::Counter {
            name: name.to_string(),
            value,
        });
    }

    pub fn event(&self, name: &str, attributes: &[(&str, &str)]) {
        let attributes = attributes
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        self.notify(TelemetryOperation::Event {
            name: name.to_string(),
            attributes,
        });
    }

    pub fn warn(&self, name: &str, detail: &str) {
        self.notify(TelemetryOperation::Warn {
            name: name.to_string(),
            detail: detail.to_string(),
        });
    }

    pub fn error(&self, name: &str, detail: &str) {
        self.notify(TelemetryOperation::Error {
            name: name.to_string(),
            detail: detail.to_string(),
        });
    }

    fn notify(&self, operation: TelemetryOperation) {
        let context = self.context.clone();
        self.context.spawn(async move {
            context.notify_shell(operation).await;
        });
    }
}
