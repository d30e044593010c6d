use crate::app::RunOptions;
use anyhow::{anyhow, bail, Context, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CliOverrides {
    assets: Option<PathBuf>,
    run_seconds: Option<f32>,
    seed: Option<u64>,
}

impl CliOverrides {
    pub fn parse_from_env() -> Result<Self> {
        Self::parse(env::args())
    }

    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = CliOverrides::default();
        let mut iter = args.into_iter();
        let _ = iter.next(); // skip program name if present
        while let Some(raw_flag) = iter.next() {
            let flag = raw_flag.as_ref();
            if !flag.starts_with("--") {
                bail!("Unexpected argument '{flag}'. Use --assets/--run-seconds/--seed with values.");
            }
            let key = &flag[2..];
            let value =
                iter.next().ok_or_else(|| anyhow!("Expected a value after '{flag}'"))?.as_ref().to_string();
            match key {
                "assets" => {
                    overrides.assets = Some(PathBuf::from(value));
                }
                "run-seconds" => {
                    let seconds = value
                        .parse::<f32>()
                        .with_context(|| format!("Invalid run-seconds '{value}'"))?;
                    if seconds <= 0.0 {
                        bail!("run-seconds must be positive, got '{value}'");
                    }
                    overrides.run_seconds = Some(seconds);
                }
                "seed" => {
                    overrides.seed =
                        Some(value.parse::<u64>().with_context(|| format!("Invalid seed '{value}'"))?);
                }
                _ => bail!("Unknown flag '{flag}'. Supported flags: --assets, --run-seconds, --seed."),
            }
        }
        Ok(overrides)
    }

    pub fn into_run_options(self) -> RunOptions {
        RunOptions {
            assets_dir: self.assets.unwrap_or_else(|| PathBuf::from("public")),
            run_seconds: self.run_seconds,
            seed: self.seed,
        }
    }

    #[cfg(test)]
    fn as_tuple(&self) -> (Option<&PathBuf>, Option<f32>, Option<u64>) {
        (self.assets.as_ref(), self.run_seconds, self.seed)
    }
}
