use clap::Parser;
use dataset_prep::utils::{logger, validation::Validate};
use dataset_prep::{ConvertConfig, ConvertPipeline, EtlEngine};

fn main() -> anyhow::Result<()> {
    let config = ConvertConfig::parse();

    // 初始化日誌
    logger::init(config.verbose, config.log_json);
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    let pipeline = ConvertPipeline::new(config.to_options());
    let engine = EtlEngine::new_with_monitoring(pipeline, config.monitor);

    match engine.run() {
        Ok(summary) => {
            for column in &summary.columns {
                tracing::debug!("column {}: {}", column.name, column.data_type);
            }
            tracing::debug!("{} bytes written", summary.bytes_written);
            println!(
                "Conversion complete. File saved to: {}",
                summary.output_path.display()
            );
            println!("Number of records processed: {}", summary.rows);
        }
        Err(e) => {
            tracing::error!(
                "❌ Conversion failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
