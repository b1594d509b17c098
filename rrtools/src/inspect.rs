use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Args;
use rrsave::SaveFile;

use crate::data_paths;

#[derive(Debug, Args)]
pub struct Opts {
    #[arg(short, long)]
    pub sav: PathBuf,
    /// `party`, `boxes` or `boxN` for a single box.
    #[arg(short, long, default_value = "party")]
    pub location: String,
    #[arg(long)]
    pub json: bool,
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

pub fn run(opts: Opts) -> anyhow::Result<()> {
    let save_data = std::fs::read(&opts.sav)
        .with_context(|| format!("Failed to read {}", opts.sav.display()))?;
    let save_file = SaveFile::open(&save_data)?;
    println!("Active save block: {:?}", save_file.active_slot());

    if opts.location == "party" {
        let party_pkmn = save_file.get_party()?;
        if opts.json {
            println!("{}", serde_json::to_string_pretty(&party_pkmn)?);
        } else {
            for pkmn in party_pkmn {
                println!("{pkmn:?}");
            }
        }
    } else if opts.location == "boxes" {
        let lookup = data_paths::load_lookup(opts.data_dir)?;
        let boxed_pkmn = save_file.get_boxes(&lookup)?;
        if opts.json {
            println!("{}", serde_json::to_string_pretty(&boxed_pkmn)?);
        } else {
            for (slot, pkmn) in boxed_pkmn {
                println!("{slot}: {pkmn:?}");
            }
        }
    } else if let Some(box_number) = opts.location.strip_prefix("box") {
        let box_number = box_number
            .parse::<u8>()
            .with_context(|| format!("Invalid box number in {}", opts.location))?;
        let lookup = data_paths::load_lookup(opts.data_dir)?;
        let boxed_pkmn = save_file.get_box(box_number, &lookup)?;
        if opts.json {
            println!("{}", serde_json::to_string_pretty(&boxed_pkmn)?);
        } else {
            for (slot, pkmn) in boxed_pkmn {
                println!("Slot {slot}: {pkmn:?}");
            }
        }
    } else {
        bail!("Unknown location {}", opts.location);
    }

    Ok(())
}
