use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigateOperation {
    /// Replace the navigation root with the main screen. One-way; the
    /// account screen is gone afterwards.
    ReplaceWithMain,
    /// Dismiss the screen when it was presented as a closable modal.
    DismissModal,
    /// Hand a URL to the system browser.
    OpenExternal { url: String },
}

impl Operation for NavigateOperation {
    type Output = ();
}

pub struct Navigate<Ev> {
    context: CapabilityContext<NavigateOperation, Ev>,
}

impl<Ev> Capability<Ev> for Navigate<Ev> {
    type Operation = NavigateOperation;
    type MappedSelf<MappedEv> = Navigate<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Navigate::new(self.context.map_event(f))
    }
}

impl<Ev> Navigate<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<NavigateOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn replace_with_main(&self) {
        self.notify(NavigateOperation::ReplaceWithMain);
    }

    pub fn dismiss_modal(&self) {
        self.notify(NavigateOperation::DismissModal);
    }

    pub fn open_external(&self, url: String) {
        self.notify(NavigateOperation::OpenExternal { url });
    }

    fn notify(&self, operation: NavigateOperation) {
        let context = self.context.clone();
        self.context.spawn(async move {
            context.notify_shell(operation).await;
        });
    }
}
