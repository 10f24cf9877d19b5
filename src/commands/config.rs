use crate::config::Config;
use anyhow::Result;

/// Print the resolved configuration, defaults included, as YAML
pub fn cmd_config(config: &Config) -> Result<()> {
    print!("{}", serde_yaml::to_string(config)?);
    Ok(())
}
