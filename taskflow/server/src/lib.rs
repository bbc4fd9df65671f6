pub mod config {
    use serde::Deserialize;

    #[derive(Deserialize, Debug, Clone)]
    pub struct Config {
        pub db_url: String,
        #[serde(default = "default_port")]
        pub port: u16,
        /// Shared secret expected as `Authorization: Bearer <api_token>`.
        pub api_token: String,
        /// Title enhancement webhook. Enhancement is disabled when unset.
        #[serde(default)]
        pub enhancement_url: Option<String>,
        #[serde(default = "default_enhancement_timeout_secs")]
        pub enhancement_timeout_secs: u64,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(config::Environment::default())
                .build()?;

            let config: Config = settings.try_deserialize()?;
            config.validate()?;
            Ok(config)
        }

        fn validate(&self) -> anyhow::Result<()> {
            if self.api_token.trim().is_empty() {
                anyhow::bail!("API_TOKEN must not be empty");
            }
            Ok(())
        }
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_enhancement_timeout_secs() -> u64 {
        10
    }

}
pub mod auth;
pub mod enhancement;
pub mod entities;
pub mod note;
pub mod session;
pub mod store;
pub mod task;
pub mod web;
