//! Unit listing

use serde::Serialize;
use crate::{ALIASES, GRAPH};

pub const CATEGORIES: [&str; 4] = ["length", "mass", "temperature", "volume"];

/// One canonical unit, how it can be typed, and where it converts to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitInfo {
    pub name: &'static str,
    pub category: &'static str,
    pub aliases: Vec<&'static str>,
    pub converts_to: Vec<&'static str>,
}

/// Canonical units, optionally limited to one category, sorted by name
pub fn list_units(category: Option<&str>) -> Vec<UnitInfo> {
    let names = match category {
        Some(c) => GRAPH.by_category(&c.to_lowercase()),
        None => GRAPH.units(),
    };

    names
        .into_iter()
        .map(|name| UnitInfo {
            name,
            category: GRAPH.category(name).unwrap_or_default(),
            aliases: ALIASES.aliases_of(name).into_iter().filter(|a| *a != name).collect(),
            converts_to: GRAPH.targets(name),
        })
        .collect()
}
