//! Keeps only the `question` and `answer` fields of a JSONL dataset, optionally
//! writing a subset limited by each record's `instance`.
//!
//! ```text
//! keep-qa-fields --input_file data/GSM8k_p2.jsonl --output_file data/GSM8k_p2_only_q_a.jsonl \
//!     --subset_file data/GSM8k_p2_subset_only_q_a_250.jsonl --limit 5
//! ```

use clap::Parser;
use dataset_prep::utils::error::PrepError;
use dataset_prep::utils::{logger, validation::Validate};
use dataset_prep::{EtlEngine, ProjectConfig, ProjectPipeline};

fn main() -> anyhow::Result<()> {
    let config = ProjectConfig::parse();

    logger::init(config.verbose, config.log_json);
    tracing::debug!("CLI config: {:?}", config);

    let options = match config.validate().and_then(|_| config.to_options()) {
        Ok(options) => options,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    let engine = EtlEngine::new_with_monitoring(ProjectPipeline::new(options), config.monitor);

    match engine.run() {
        Ok(report) => {
            // 逐行錯誤不影響結束碼
            for issue in &report.issues {
                println!("{}", issue.error);
            }
            println!(
                "Successfully processed {} to {}",
                config.input_file.display(),
                config.output_file.display()
            );
            if let Some(subset) = &config.subset_file {
                println!(
                    "Subset ({} records) written to {}",
                    report.subset_records,
                    subset.display()
                );
            }
            if report.skipped() > 0 {
                tracing::warn!("⚠️ {} lines skipped", report.skipped());
            }
        }
        Err(e @ PrepError::InputNotFound { .. }) => {
            println!("{}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
        Err(e) => {
            tracing::error!(
                "❌ Processing failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            println!("An error occurred: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
