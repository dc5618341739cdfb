use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn run(&self) -> Result<P::Summary> {
        let started = Instant::now();
        tracing::info!("🚀 Starting {}", self.pipeline.name());
        self.monitor.log_stats("Start");

        let result = self.pipeline.run(&self.monitor);
        match &result {
            Ok(_) => tracing::info!(
                "✅ {} finished in {:?}",
                self.pipeline.name(),
                started.elapsed()
            ),
            Err(e) => tracing::error!("❌ {} failed: {}", self.pipeline.name(), e),
        }

        self.monitor.log_final_stats();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::PrepError;
    use std::cell::Cell;

    struct CountingPipeline {
        runs: Cell<usize>,
        fail: bool,
    }

    impl Pipeline for CountingPipeline {
        type Summary = usize;

        fn name(&self) -> &str {
            "counting"
        }

        fn run(&self, _monitor: &SystemMonitor) -> Result<usize> {
            self.runs.set(self.runs.get() + 1);
            if self.fail {
                return Err(PrepError::ConfigError {
                    message: "boom".to_string(),
                });
            }
            Ok(self.runs.get())
        }
    }

    #[test]
    fn test_engine_returns_pipeline_summary() {
        let engine = EtlEngine::new(CountingPipeline {
            runs: Cell::new(0),
            fail: false,
        });
        assert_eq!(engine.run().unwrap(), 1);
        assert_eq!(engine.run().unwrap(), 2);
    }

    #[test]
    fn test_engine_propagates_errors() {
        let engine = EtlEngine::new(CountingPipeline {
            runs: Cell::new(0),
            fail: true,
        });
        assert!(matches!(engine.run(), Err(PrepError::ConfigError { .. })));
    }
}
