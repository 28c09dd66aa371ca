use std::path::Path;

use crate::{
    conf::{LoaderConfig, SessionConfig},
    core::QuarryError::{self, ConfigParsingError},
};
use config::{Config as CConfig, Map};
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "QUARRY";
const ENV_SECTIONS: &[&str] = &["SESSION", "LOADER"];
const ENV_LIST_KEYS: &[&str] = &["loader.null_values", "loader.datetime_formats"];

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
}

impl Config {
    pub fn from_str(toml_str: &str) -> Result<Config, QuarryError> {
        let config = CConfig::builder()
            .add_source(config::File::from_str(toml_str, config::FileFormat::Toml))
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))?;
        return Ok(config);
    }

    /// Reads a TOML file (when given) and applies `QUARRY_SECTION__KEY`
    /// overrides from the process environment on top.
    pub fn from_file(path: Option<&Path>) -> Result<Config, QuarryError> {
        Self::from_file_and_env(path, std::env::vars())
    }

    /// Like [`Config::from_file`] with an explicit set of environment variables.
    ///
    /// Only variables addressing a known section are read, so unrelated
    /// `QUARRY_*` variables never trip `deny_unknown_fields`. List settings
    /// take comma-separated values.
    pub fn from_file_and_env<I>(path: Option<&Path>, vars: I) -> Result<Config, QuarryError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let overrides: Map<String, String> = vars
            .into_iter()
            .filter(|(key, _)| {
                let key = key.to_ascii_uppercase();
                ENV_SECTIONS
                    .iter()
                    .any(|section| key.starts_with(&format!("{ENV_PREFIX}_{section}__")))
            })
            .collect();

        let mut builder = CConfig::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path).format(config::FileFormat::Toml),
            );
        }
        let mut env = config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",");
        for key in ENV_LIST_KEYS {
            env = env.with_list_parse_key(key);
        }
        let config = builder
            .add_source(env.source(Some(overrides)))
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))?;
        Ok(config)
    }
}
