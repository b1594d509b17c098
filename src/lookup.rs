//! Human-readable names for the ids stored in a save.
//!
//! Decoding only ever produces numeric ids. Anything that wants names goes
//! through a [`Lookup`], which never fails on an unknown id: it hands back a
//! placeholder instead.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Deserialize};

use crate::{error::SaveError, growth::GrowthRate, pokemon::AbilitySlot};

pub const SPECIES_FILE: &str = "species.json";
pub const MOVES_FILE: &str = "moves.json";
pub const ITEMS_FILE: &str = "items.json";
pub const ABILITIES_FILE: &str = "abilities.json";
pub const GROWTH_RATES_FILE: &str = "growth_rates.json";

pub const NO_ITEM: &str = "None";

pub trait Lookup {
    fn species_name(&self, species: u16) -> String;
    /// `None` for an empty move slot.
    fn move_name(&self, move_id: u16) -> Option<String>;
    fn item_name(&self, item: u16) -> String;
    /// A set hidden ability flag takes precedence over `slot` when the species
    /// has a hidden ability.
    fn ability_name(&self, slot: AbilitySlot, species_name: &str, has_hidden_ability: bool)
        -> String;
    /// Species without an entry use the medium curve.
    fn growth_rate(&self, species: u16) -> Result<GrowthRate, SaveError>;
}

#[derive(Clone, Debug, Default, Deserialize)]
struct SpeciesAbilities {
    primary_ability: Option<String>,
    secondary_ability: Option<String>,
    hidden_ability: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct GrowthEntry {
    growth_rate: Option<String>,
}

/// Name tables loaded from a directory of JSON files. Each list is indexed by
/// id - 1; abilities are keyed by species name.
#[derive(Clone, Debug, Default)]
pub struct LookupTables {
    species: Vec<String>,
    moves: Vec<String>,
    items: Vec<String>,
    abilities: HashMap<String, SpeciesAbilities>,
    growth_rates: Vec<GrowthEntry>,
}

impl LookupTables {
    /// Load every table from `data_dir`. Missing or unreadable tables are
    /// logged and left empty so that lookups fall back to placeholders.
    pub fn load(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        log::debug!("Loading lookup tables from {}", data_dir.display());
        LookupTables {
            species: load_table(data_dir.join(SPECIES_FILE)),
            moves: load_table(data_dir.join(MOVES_FILE)),
            items: load_table(data_dir.join(ITEMS_FILE)),
            abilities: load_table(data_dir.join(ABILITIES_FILE)),
            growth_rates: load_table(data_dir.join(GROWTH_RATES_FILE)),
        }
    }
}

fn load_table<T: DeserializeOwned + Default>(path: PathBuf) -> T {
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) => {
            log::error!("Error loading data from {}: {err}", path.display());
            return T::default();
        }
    };
    serde_json::from_str(&contents).unwrap_or_else(|err| {
        log::error!("Error parsing data from {}: {err}", path.display());
        T::default()
    })
}

fn by_id<T>(table: &[T], id: u16) -> Option<&T> {
    usize::from(id).checked_sub(1).and_then(|idx| table.get(idx))
}

impl Lookup for LookupTables {
    fn species_name(&self, species: u16) -> String {
        by_id(&self.species, species)
            .cloned()
            .unwrap_or_else(|| format!("Unknown ({species})"))
    }

    fn move_name(&self, move_id: u16) -> Option<String> {
        if move_id == 0 {
            return None;
        }
        Some(
            by_id(&self.moves, move_id)
                .cloned()
                .unwrap_or_else(|| format!("Unknown ({move_id})")),
        )
    }

    fn item_name(&self, item: u16) -> String {
        if item == 0 {
            return String::from(NO_ITEM);
        }
        by_id(&self.items, item)
            .cloned()
            .unwrap_or_else(|| format!("Unknown Item ({item})"))
    }

    fn ability_name(
        &self,
        slot: AbilitySlot,
        species_name: &str,
        has_hidden_ability: bool,
    ) -> String {
        let Some(abilities) = self.abilities.get(species_name) else {
            log::warn!("No abilities listed for {species_name}");
            return format!("Unknown Ability (for {species_name})");
        };

        let hidden = abilities.hidden_ability.as_ref().filter(|_| has_hidden_ability);
        let chosen = match slot {
            AbilitySlot::Primary => abilities.primary_ability.as_ref(),
            // Species with a single ability use it in both slots
            AbilitySlot::Secondary => abilities
                .secondary_ability
                .as_ref()
                .or(abilities.primary_ability.as_ref()),
        };
        hidden
            .or(chosen)
            .cloned()
            .unwrap_or_else(|| format!("Unknown Ability (for {species_name})"))
    }

    fn growth_rate(&self, species: u16) -> Result<GrowthRate, SaveError> {
        match by_id(&self.growth_rates, species).and_then(|entry| entry.growth_rate.as_deref()) {
            Some(growth_rate) => growth_rate.parse(),
            None => {
                log::debug!("No growth rate for species {species}, assuming medium");
                Ok(GrowthRate::Medium)
            }
        }
    }
}
