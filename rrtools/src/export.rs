use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use rrsave::SaveFile;

use crate::{data_paths, showdown::ShowdownFormatter};

#[derive(Debug, Args)]
pub struct Opts {
    #[arg(short, long)]
    pub sav: PathBuf,
    /// Write the team text here instead of stdout.
    #[arg(long)]
    pub dest: Option<PathBuf>,
    /// Export every Pokemon at this level.
    #[arg(long)]
    pub level: Option<u8>,
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

pub fn run(opts: Opts) -> anyhow::Result<()> {
    let save_data = std::fs::read(&opts.sav)
        .with_context(|| format!("Failed to read {}", opts.sav.display()))?;
    let save_file = SaveFile::open(&save_data)?;
    let lookup = data_paths::load_lookup(opts.data_dir)?;

    let party_pkmn = save_file.get_party()?;
    let boxed_pkmn = save_file.get_boxes(&lookup)?;
    log::info!(
        "Exporting {} party and {} boxed Pokemon",
        party_pkmn.len(),
        boxed_pkmn.len()
    );

    let formatter = ShowdownFormatter::new(&lookup, opts.level);
    let team = party_pkmn
        .iter()
        .chain(boxed_pkmn.iter().map(|(_, pkmn)| pkmn));
    let mut text = formatter.format_team(team);
    text.push('\n');

    match opts.dest {
        Some(dest) => {
            println!("Saving to {}", dest.display());
            std::fs::write(&dest, text)
                .with_context(|| format!("Failed to write {}", dest.display()))?;
        }
        None => print!("{text}"),
    }

    Ok(())
}
