use crate::model::Boundary;
use color_eyre::eyre::eyre;
use config::{Config, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
#[allow(unused)]
pub(crate) struct Configuration {
    pub(crate) physical: PhysicalConfiguration,
    pub(crate) sweep: SweepConfiguration,
    pub(crate) output: OutputConfiguration,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PhysicalConfiguration {
    pub(crate) t: f64,
    pub(crate) t2: f64,
    pub(crate) phi: f64,
    pub(crate) boundary: Boundary,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SweepConfiguration {
    pub(crate) onsite_limit: f64,
    pub(crate) momentum_scale: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OutputConfiguration {
    pub(crate) directory: PathBuf,
}

impl Configuration {
    pub(crate) fn build() -> color_eyre::Result<Self> {
        // If I am running it here we should automatically be more debuggy
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // The default settings for the sweep which we use in the general case
            .add_source(File::with_name(".config/default"))
            // The override settings which may be set by the user, optional
            .add_source(File::with_name(&format!(".config/{}", run_mode)).required(false))
            .build()?;

        s.try_deserialize()
            .map_err(|e| eyre!(format!("Failed to deserialize the config file: {:?}", e)))
    }
}
