use std::path::PathBuf;
use std::str::FromStr;

use anyhow::anyhow;
use rrsave::LookupTables;

pub const DATA_DIR_ENV: &str = "RRTOOLS_DATA_DIR";

/// Directory holding the JSON name tables. An explicit flag wins over the
/// environment, which wins over the platform's local data directory.
pub fn get_data_dir(data_dir_arg: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(data_dir) = data_dir_arg {
        Ok(data_dir)
    } else if let Ok(Ok(env_data_dir)) =
        std::env::var(DATA_DIR_ENV).map(|path_str| PathBuf::from_str(&path_str))
    {
        Ok(env_data_dir)
    } else if let Some(base_dirs) = directories::BaseDirs::new() {
        let mut data_dir = base_dirs.data_local_dir().to_path_buf();
        data_dir.push("rrtools");
        Ok(data_dir)
    } else {
        Err(anyhow!("No suitable data directory found"))
    }
}

pub fn load_lookup(data_dir_arg: Option<PathBuf>) -> anyhow::Result<LookupTables> {
    let data_dir = get_data_dir(data_dir_arg)?;
    log::info!("Reading name tables from {}", data_dir.display());
    Ok(LookupTables::load(data_dir))
}
