use shadowbox::{
    logging::{init_logging, LoggingConfig},
    DemoConfig, ShadowboxApp,
};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = DemoConfig::from_env();
    log::info!("Starting shadowbox with model {}", config.model_path.display());

    ShadowboxApp::new(config).run()
}
