use crate::config::generate::{default_config_path, SAMPLE_CONFIG};
use std::fs;

/// Write a sample config, to stdout or to the default user location.
/// Refuses to overwrite an existing file.
pub fn init(stdout: bool) -> Result<(), Box<dyn std::error::Error>> {
    if stdout {
        print!("{}", SAMPLE_CONFIG);
        return Ok(());
    }

    let path = default_config_path()
        .ok_or("could not determine home directory; use --stdout and redirect instead")?;

    if path.exists() {
        return Err(format!(
            "config file already exists at {} (remove it first, or use --stdout)",
            path.display()
        )
        .into());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, SAMPLE_CONFIG)?;

    println!("Wrote sample config to {}", path.display());
    Ok(())
}
