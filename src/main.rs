use clap::Parser;
use thousandchars_etl::core::ConfigProvider;
use thousandchars_etl::utils::{logger, validation::Validate};
use thousandchars_etl::{CliConfig, EtlEngine, EtlError, LocalStorage, TomlConfig, VocabularyPipeline};

fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting thousandchars-etl");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let exit_code = match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(&path) {
                Ok(config) => run(config.with_dry_run(cli.dry_run)),
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    1
                }
            }
        }
        None => run(cli),
    };

    std::process::exit(exit_code);
}

fn run<C: ConfigProvider + Validate>(config: C) -> i32 {
    // 驗證配置
    if let Err(e) = config.validate() {
        report_failure("Configuration validation failed", &e);
        return 1;
    }

    let storage = LocalStorage::new(config.root().to_string());
    let pipeline = VocabularyPipeline::new(storage, config);
    let engine = EtlEngine::new(pipeline);

    match engine.run() {
        Ok(outcome) => {
            tracing::info!("✅ Build finished: {:?}", outcome);
            println!("{}", outcome);
            0
        }
        Err(e) => {
            report_failure("Build failed", &e);
            1
        }
    }
}

fn report_failure(context: &str, e: &EtlError) {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}
