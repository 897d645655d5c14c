//! Unit alias table - free-text unit tokens to canonical unit names

use std::collections::HashMap;
use std::sync::LazyLock;

/// Global alias table
pub static ALIASES: LazyLock<AliasTable> = LazyLock::new(AliasTable::new);

/// Maps abbreviations, singulars and symbols to canonical unit names
pub struct AliasTable {
    aliases: HashMap<&'static str, &'static str>,
}

impl AliasTable {
    pub fn new() -> Self {
        let mut table = AliasTable {
            aliases: HashMap::new(),
        };
        table.register_all_aliases();
        table
    }

    /// Canonical name for an already-lowercased token
    pub fn get(&self, token: &str) -> Option<&'static str> {
        self.aliases.get(token).copied()
    }

    /// All (alias, canonical) pairs, sorted by alias
    pub fn entries(&self) -> Vec<(&'static str, &'static str)> {
        let mut entries: Vec<_> = self.aliases.iter().map(|(a, c)| (*a, *c)).collect();
        entries.sort_unstable();
        entries
    }

    /// Aliases that resolve to `canonical`, sorted
    pub fn aliases_of(&self, canonical: &str) -> Vec<&'static str> {
        let mut found: Vec<_> = self.aliases.iter()
            .filter(|(_, c)| **c == canonical)
            .map(|(a, _)| *a)
            .collect();
        found.sort_unstable();
        found
    }

    fn alias(&mut self, alias: &'static str, canonical: &'static str) {
        self.aliases.insert(alias, canonical);
    }

    fn register_all_aliases(&mut self) {
        self.register_length_aliases();
        self.register_mass_aliases();
        self.register_temperature_aliases();
        self.register_volume_aliases();
    }

    fn register_length_aliases(&mut self) {
        self.alias("km", "kilometers");
        self.alias("kilometer", "kilometers");
        self.alias("mile", "miles");
        self.alias("m", "meters");
        self.alias("meter", "meters");
        self.alias("cm", "centimeters");
        self.alias("centimeter", "centimeters");
        self.alias("in", "inches");
        self.alias("inch", "inches");
        self.alias("\"", "inches");
        self.alias("ft", "feet");
        self.alias("foot", "feet");
        self.alias("'", "feet");
        self.alias("yd", "yards");
        self.alias("yard", "yards");
    }

    fn register_mass_aliases(&mut self) {
        self.alias("kg", "kilograms");
        self.alias("kilogram", "kilograms");
        self.alias("lb", "pounds");
        self.alias("lbs", "pounds");
        self.alias("pound", "pounds");
        self.alias("g", "grams");
        self.alias("gram", "grams");
        self.alias("oz", "ounces");
        self.alias("ounce", "ounces");
    }

    fn register_temperature_aliases(&mut self) {
        self.alias("c", "celsius");
        self.alias("°c", "celsius");
        self.alias("celsius", "celsius");
        self.alias("centigrade", "celsius");
        self.alias("f", "fahrenheit");
        self.alias("°f", "fahrenheit");
        self.alias("fahrenheit", "fahrenheit");
    }

    fn register_volume_aliases(&mut self) {
        self.alias("l", "liters");
        self.alias("liter", "liters");
        self.alias("gal", "gallons");
        self.alias("gallon", "gallons");
        self.alias("ml", "milliliters");
        self.alias("milliliter", "milliliters");
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a free-text unit token to its canonical name.
///
/// The token is lowercased first. Unknown tokens come back lowercased and
/// otherwise unchanged; they are treated as already canonical.
pub fn normalize(token: &str) -> String {
    let lower = token.to_lowercase();
    match ALIASES.get(&lower) {
        Some(canonical) => canonical.to_string(),
        None => lower,
    }
}
