use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewportOperation {
    /// Scroll the form container to a vertical offset, animated over
    /// `duration_ms`.
    ScrollTo { y: f64, duration_ms: u64 },
}

impl Operation for ViewportOperation {
    type Output = ();
}

pub struct Viewport<Ev> {
    context: CapabilityContext<ViewportOperation, Ev>,
}

impl<Ev> Capability<Ev> for Viewport<Ev> {
    type Operation = ViewportOperation;
    type MappedSelf<MappedEv> = Viewport<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Viewport::new(self.context.map_event(f))
    }
}

impl<Ev> Viewport<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<ViewportOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn scroll_to(&self, y: f64, duration_ms: u64) {
        let context = self.context.clone();
        self.context.spawn(async move {
            context
                .notify_shell(ViewportOperation::ScrollTo { y, duration_ms })
                .await;
        });
    }
}
