#![allow(non_snake_case)]

mod config {
    use serde::Deserialize;

    #[derive(Deserialize, Clone, Debug, PartialEq)]
    #[serde(default)]
    pub struct Config {
        pub server: ServerConfig,
    }

    #[derive(Deserialize, Clone, Debug, PartialEq)]
    #[serde(default)]
    pub struct ServerConfig {
        pub bind: String,
        pub port: u16,
    }

    impl Default for Config {
        fn default() -> Self {
            Self {
                server: ServerConfig::default(),
            }
        }
    }

    impl Default for ServerConfig {
        fn default() -> Self {
            Self {
                bind: "127.0.0.1".into(),
                port: 8000,
            }
        }
    }

    impl Config {
        pub fn addr(&self) -> String {
            format!("{}:{}", self.server.bind, self.server.port)
        }
    }

    /// Without `--config` the fixed loopback defaults apply.
    pub fn load(path: Option<&str>) -> Config {
        let Some(path) = path else {
            return Config::default();
        };
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("failed to parse config {path}: {e}, using defaults");
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("failed to read config {path}: {e}, using defaults");
                Config::default()
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn defaults_to_loopback_8000() {
            assert_eq!(load(None).addr(), "127.0.0.1:8000");
        }

        #[test]
        fn partial_file_keeps_other_defaults() {
            let config: Config = toml::from_str("[server]\nport = 9100\n").unwrap();
            assert_eq!(config.server.bind, "127.0.0.1");
            assert_eq!(config.server.port, 9100);
        }

        #[test]
        fn unreadable_file_falls_back_to_defaults() {
            assert_eq!(load(Some("/nonexistent/sysinsight.toml")), Config::default());
        }
    }
}

fn config_path_from_args() -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    let idx = args.iter().position(|a| a == "--config")?;
    args.get(idx + 1).cloned()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

#[tokio::main]
async fn main() {
    use sysinsight_api::AppState;
    use tower_http::trace::TraceLayer;
    use tracing_subscriber::{fmt, EnvFilter};

    // Initialize tracing
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let configPath = config_path_from_args();
    let appConfig = config::load(configPath.as_deref());
    let addr = appConfig.addr();

    let app = sysinsight_api::api_router(AppState::default()).layer(TraceLayer::new_for_http());

    tracing::info!("starting SysInsight API server");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    tracing::info!("listening on http://{addr}");
    tracing::info!("dashboard should poll http://{addr}/api/system");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap_or_else(|e| panic!("server exited with error: {e}"));
}
