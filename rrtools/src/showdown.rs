//! Renders decoded Pokemon as Pokemon Showdown team text.

use rrsave::{lookup::NO_ITEM, Lookup, Pokemon};

const MAX_IV: u8 = 31;
const DEFAULT_LEVEL: u8 = 100;

pub struct ShowdownFormatter<'a> {
    lookup: &'a dyn Lookup,
    /// Overrides every Pokemon's level when set.
    export_level: Option<u8>,
}

impl<'a> ShowdownFormatter<'a> {
    pub fn new(lookup: &'a dyn Lookup, export_level: Option<u8>) -> Self {
        ShowdownFormatter {
            lookup,
            export_level,
        }
    }

    pub fn format(&self, pkmn: &Pokemon) -> String {
        let mut lines = Vec::new();

        let species = self.lookup.species_name(pkmn.species);
        let held_item = self.lookup.item_name(pkmn.held_item);
        let item_text = if held_item == NO_ITEM {
            String::new()
        } else {
            format!(" @ {held_item}")
        };
        if pkmn.nickname.is_empty() || pkmn.nickname == species {
            lines.push(format!("{species}{item_text}"));
        } else {
            lines.push(format!("{} ({species}){item_text}", pkmn.nickname));
        }

        // Showdown assumes level 100 when the line is missing
        let level = self.export_level.unwrap_or(pkmn.level);
        if level != DEFAULT_LEVEL {
            lines.push(format!("Level: {level}"));
        }

        lines.push(format!("{} Nature", pkmn.nature));
        lines.push(format!(
            "Ability: {}",
            self.lookup
                .ability_name(pkmn.ability_slot, &species, pkmn.has_hidden_ability)
        ));

        let evs = stat_list(pkmn.evs.labeled().into_iter().filter(|(_, ev)| *ev > 0));
        if !evs.is_empty() {
            lines.push(format!("EVs: {evs}"));
        }
        let ivs = stat_list(pkmn.ivs.labeled().into_iter().filter(|(_, iv)| *iv < MAX_IV));
        if !ivs.is_empty() {
            lines.push(format!("IVs: {ivs}"));
        }

        for move_name in pkmn.moves.iter().filter_map(|id| self.lookup.move_name(*id)) {
            lines.push(format!("- {move_name}"));
        }

        lines.join("\n")
    }

    /// Every Pokemon as one team, separated by blank lines.
    pub fn format_team<'p>(&self, team: impl IntoIterator<Item = &'p Pokemon>) -> String {
        team.into_iter()
            .map(|pkmn| self.format(pkmn))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn stat_list(stats: impl Iterator<Item = (&'static str, u8)>) -> String {
    stats
        .map(|(label, value)| format!("{value} {label}"))
        .collect::<Vec<_>>()
        .join(" / ")
}
