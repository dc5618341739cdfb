use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// A one-shot batch job run by [`crate::EtlEngine`].
pub trait Pipeline {
    type Summary;

    fn name(&self) -> &str;

    fn run(&self, monitor: &SystemMonitor) -> Result<Self::Summary>;
}
