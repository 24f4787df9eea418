use std::sync::Once;

/// Filter used when neither the config nor `RUST_LOG` names one. The GPU
/// stack is held to warnings so backdrop lifecycle lines stay readable.
const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` uses the `env_logger` filter syntax, e.g.
/// `"blacklabel_page=debug,wgpu_core=warn"`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { env_filter: None, write_style: env_logger::WriteStyle::Auto }
    }
}

impl LoggingConfig {
    /// Debug output for the page and engine crates.
    pub fn verbose() -> Self {
        Self {
            env_filter: Some(format!("{DEFAULT_FILTER},blacklabel_engine=debug,blacklabel_page=debug")),
            ..Self::default()
        }
    }

    /// Explicit filter first, then the environment, then [`DEFAULT_FILTER`].
    fn resolve_filter(&self, from_env: Option<String>) -> String {
        self.env_filter
            .clone()
            .or(from_env.filter(|f| !f.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_FILTER.to_string())
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.resolve_filter(std::env::var("RUST_LOG").ok());
        env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .format_timestamp_millis()
            .init();
        log::debug!("logger ready ({filter})");
    });
}
