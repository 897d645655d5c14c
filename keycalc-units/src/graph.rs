//! Conversion graph - directed edges between canonical units
//!
//! Every edge is an independently authored formula. The graph is neither
//! symmetric nor transitively closed: kilometers -> feet needs its own edge
//! even though kilometers -> meters and meters -> feet both exist.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Conversion formula for one edge
pub type ConvertFn = fn(f64) -> f64;

/// Global conversion graph
pub static GRAPH: LazyLock<ConversionGraph> = LazyLock::new(ConversionGraph::new);

pub struct ConversionGraph {
    edges: HashMap<&'static str, HashMap<&'static str, ConvertFn>>,
    categories: HashMap<&'static str, &'static str>,
}

impl ConversionGraph {
    pub fn new() -> Self {
        let mut graph = ConversionGraph {
            edges: HashMap::new(),
            categories: HashMap::new(),
        };
        graph.register_all_edges();
        graph
    }

    /// Formula for the direct edge `from -> to`, if one is authored
    pub fn edge(&self, from: &str, to: &str) -> Option<ConvertFn> {
        self.edges.get(from)?.get(to).copied()
    }

    /// Units reachable from `from` in one hop, sorted
    pub fn targets(&self, from: &str) -> Vec<&'static str> {
        let mut targets: Vec<_> = self.edges.get(from)
            .map(|m| m.keys().copied().collect())
            .unwrap_or_default();
        targets.sort_unstable();
        targets
    }

    /// Every (from, to) pair with an authored edge, sorted
    pub fn pairs(&self) -> Vec<(&'static str, &'static str)> {
        let mut pairs: Vec<_> = self.edges.iter()
            .flat_map(|(from, targets)| targets.keys().map(move |to| (*from, *to)))
            .collect();
        pairs.sort_unstable();
        pairs
    }

    /// All canonical units, sorted
    pub fn units(&self) -> Vec<&'static str> {
        let mut units: Vec<_> = self.categories.keys().copied().collect();
        units.sort_unstable();
        units
    }

    /// Units in a category, sorted
    pub fn by_category(&self, category: &str) -> Vec<&'static str> {
        let mut units: Vec<_> = self.categories.iter()
            .filter(|(_, c)| **c == category)
            .map(|(u, _)| *u)
            .collect();
        units.sort_unstable();
        units
    }

    pub fn category(&self, unit: &str) -> Option<&'static str> {
        self.categories.get(unit).copied()
    }

    /// True if `unit` has at least one inbound or outbound edge
    pub fn has_edges(&self, unit: &str) -> bool {
        self.edges.get(unit).is_some_and(|m| !m.is_empty())
            || self.edges.values().any(|m| m.contains_key(unit))
    }

    fn unit(&mut self, name: &'static str, category: &'static str) {
        self.categories.insert(name, category);
    }

    fn connect(&mut self, from: &'static str, to: &'static str, convert: ConvertFn) {
        self.edges.entry(from).or_default().insert(to, convert);
    }

    fn register_all_edges(&mut self) {
        self.register_length_edges();
        self.register_mass_edges();
        self.register_temperature_edges();
        self.register_volume_edges();
    }

    fn register_length_edges(&mut self) {
        for name in ["kilometers", "miles", "meters", "centimeters", "feet", "inches", "yards"] {
            self.unit(name, "length");
        }

        self.connect("kilometers", "miles", |v| v * 0.621371);
        self.connect("kilometers", "meters", |v| v * 1000.0);
        self.connect("kilometers", "feet", |v| v * 3280.84);
        self.connect("kilometers", "inches", |v| v * 39370.1);
        self.connect("kilometers", "yards", |v| v * 1093.61);

        self.connect("miles", "kilometers", |v| v * 1.60934);
        self.connect("miles", "meters", |v| v * 1609.34);
        self.connect("miles", "feet", |v| v * 5280.0);
        self.connect("miles", "inches", |v| v * 63360.0);
        self.connect("miles", "yards", |v| v * 1760.0);

        self.connect("meters", "kilometers", |v| v / 1000.0);
        self.connect("meters", "miles", |v| v / 1609.34);
        self.connect("meters", "feet", |v| v * 3.28084);
        self.connect("meters", "inches", |v| v * 39.3701);
        self.connect("meters", "yards", |v| v / 0.9144);
        self.connect("meters", "centimeters", |v| v * 100.0);

        self.connect("centimeters", "meters", |v| v / 100.0);
        self.connect("centimeters", "inches", |v| v / 2.54);

        self.connect("feet", "kilometers", |v| v / 3280.84);
        self.connect("feet", "miles", |v| v / 5280.0);
        self.connect("feet", "meters", |v| v / 3.28084);
        self.connect("feet", "inches", |v| v * 12.0);
        self.connect("feet", "yards", |v| v / 3.0);

        self.connect("inches", "kilometers", |v| v / 39370.1);
        self.connect("inches", "miles", |v| v / 63360.0);
        self.connect("inches", "meters", |v| v / 39.3701);
        self.connect("inches", "feet", |v| v / 12.0);
        self.connect("inches", "yards", |v| v / 36.0);
        self.connect("inches", "centimeters", |v| v * 2.54);

        self.connect("yards", "kilometers", |v| v / 1093.61);
        self.connect("yards", "miles", |v| v / 1760.0);
        self.connect("yards", "meters", |v| v * 0.9144);
        self.connect("yards", "feet", |v| v * 3.0);
        self.connect("yards", "inches", |v| v * 36.0);
    }

    fn register_mass_edges(&mut self) {
        for name in ["kilograms", "pounds", "grams", "ounces"] {
            self.unit(name, "mass");
        }

        self.connect("kilograms", "pounds", |v| v * 2.20462);
        self.connect("kilograms", "grams", |v| v * 1000.0);
        self.connect("kilograms", "ounces", |v| v * 35.274);

        self.connect("pounds", "kilograms", |v| v / 2.20462);
        self.connect("pounds", "grams", |v| v * 453.592);
        self.connect("pounds", "ounces", |v| v * 16.0);

        self.connect("grams", "kilograms", |v| v / 1000.0);
        self.connect("grams", "pounds", |v| v / 453.592);
        self.connect("grams", "ounces", |v| v / 28.3495);

        self.connect("ounces", "kilograms", |v| v / 35.274);
        self.connect("ounces", "pounds", |v| v / 16.0);
        self.connect("ounces", "grams", |v| v * 28.3495);
    }

    fn register_temperature_edges(&mut self) {
        self.unit("celsius", "temperature");
        self.unit("fahrenheit", "temperature");

        self.connect("celsius", "fahrenheit", |v| (v * 9.0 / 5.0) + 32.0);
        self.connect("fahrenheit", "celsius", |v| (v - 32.0) * 5.0 / 9.0);
    }

    fn register_volume_edges(&mut self) {
        for name in ["liters", "gallons", "milliliters"] {
            self.unit(name, "volume");
        }

        self.connect("liters", "gallons", |v| v * 0.264172);
        self.connect("liters", "milliliters", |v| v * 1000.0);

        self.connect("gallons", "liters", |v| v / 0.264172);
        self.connect("gallons", "milliliters", |v| v * 3785.41);

        self.connect("milliliters", "liters", |v| v / 1000.0);
        self.connect("milliliters", "gallons", |v| v / 3785.41);
    }
}

impl Default for ConversionGraph {
    fn default() -> Self {
        Self::new()
    }
}
