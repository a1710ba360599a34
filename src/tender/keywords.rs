use std::collections::BTreeMap;

use crate::models::{KeywordSpec, Unit};

const IOT: &[&str] = &[
    "Connectivity",
    "Monitoring",
    "remote Monitoring",
    "Sensor",
    "Management",
    "Controlling",
    "IoT",
    "Smart City",
    "Integration",
    "Predictive Maintenance",
    "Telemetry",
    "Network",
    "Asset Tracking",
    "Building Automation",
    "Fleet Management",
    "Tracking",
    "Smart Infrastructure",
    "Energy management systems",
    "Larda resource management",
];

const EXPERIENCE: &[&str] = &[
    "Experience",
    "Immersive",
    "Interactive",
    "Exhibition",
    "Digital Content",
    "Technology",
    "AV Systems",
    "Digital",
    "Thematic",
    "Design",
    "Projection Mapping",
    "Smart Display",
    "Visitor Journey",
    "Cultural Innovation",
];

const MARINE: &[&str] = &[
    "Antifouling",
    "Marine Technology",
    "Marine Systems",
    "Vessel Operations",
    "Vessel Maintenance",
];

const TARGET: &[&str] = &[
    "Target systems",
    "Simulator",
    "Aerial target",
    "Sea target",
    "Naval target",
    "ground target",
    "Unmanned surface vessels",
    "Drone",
    "Asia",
    "Europe",
    "Southeast Asia",
    "Africa",
    "Middle east",
];

const BISAN_EMIRA: &[&str] = &[
    "museum fit-out",
    "immersive experience",
    "immersive installation",
    "experience design",
    "digital experience",
    "interactive exhibition",
    "projection mapping",
    "360° projection",
    "interactive wall",
    "interactive floor",
    "interactive sphere",
    "interactive room system",
    "flexible LED",
    "LED wall",
    "LED screen",
    "curved LED",
    "transparent LED",
    "digital signage",
    "video wall",
    "ScrollUp display",
    "smart sensors",
    "smart infrastructure",
    "connected devices",
    "interactive IoT",
    "augmented reality",
    "virtual reality",
    "extended reality",
    "AR/VR solutions",
    "AR/VR application",
    "XR system",
    "simulation system",
    "interactive simulation",
    "interactive museum",
    "science museum",
    "technology",
    "experience center",
    "theme park technology",
    "digital planetarium",
];

/// Built-in keyword list for a unit. `Other` has none.
pub fn default_keywords(unit: Unit) -> &'static [&'static str] {
    match unit {
        Unit::IoT => IOT,
        Unit::Experience => EXPERIENCE,
        Unit::Marine => MARINE,
        Unit::Target => TARGET,
        Unit::BisanEmira => BISAN_EMIRA,
        Unit::Other => &[],
    }
}

/// Normalize a keyword spec into trimmed, non-empty keywords, keeping order.
///
/// Delimited strings are split on `,`, `|` and newlines. A missing spec
/// yields an empty list.
pub fn split_keywords(spec: Option<&KeywordSpec>) -> Vec<String> {
    match spec {
        None => Vec::new(),
        Some(KeywordSpec::List(items)) => items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(KeywordSpec::Delimited(raw)) => raw
            .split(|c: char| matches!(c, ',' | '|' | '\n'))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

/// Custom keywords followed by the unit's built-in defaults.
///
/// This is a concatenation, not a replacement: custom keywords only ever add
/// evidence. Duplicates are kept and score once per list entry.
pub fn merge_with_defaults(unit: Unit, custom: Option<&KeywordSpec>) -> Vec<String> {
    let mut merged = split_keywords(custom);
    merged.extend(default_keywords(unit).iter().map(|kw| kw.to_string()));
    merged
}

/// Concatenate custom keyword specs per unit, in iteration order.
///
/// Used to layer command-line, config-file and server keywords before they
/// are put in front of the defaults.
pub fn combine_custom<'a>(
    entries: impl IntoIterator<Item = (&'a Unit, &'a KeywordSpec)>,
) -> BTreeMap<Unit, KeywordSpec> {
    let mut combined: BTreeMap<Unit, Vec<String>> = BTreeMap::new();
    for (unit, spec) in entries {
        combined
            .entry(*unit)
            .or_default()
            .extend(split_keywords(Some(spec)));
    }
    combined
        .into_iter()
        .map(|(unit, list)| (unit, KeywordSpec::List(list)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_delimited_string() {
        let spec = KeywordSpec::from(" boat, harbour |ferry\n\n dock ,");
        assert_eq!(
            split_keywords(Some(&spec)),
            vec!["boat", "harbour", "ferry", "dock"]
        );
    }

    #[test]
    fn test_split_list_trims_and_drops_empty() {
        let spec = KeywordSpec::List(vec!["  Smart City ".into(), "".into(), "  ".into()]);
        assert_eq!(split_keywords(Some(&spec)), vec!["Smart City"]);
    }

    #[test]
    fn test_split_missing_is_empty() {
        assert!(split_keywords(None).is_empty());
    }

    #[test]
    fn test_merge_prepends_custom() {
        let spec = KeywordSpec::from("boat");
        let merged = merge_with_defaults(Unit::Marine, Some(&spec));
        assert_eq!(merged.len(), MARINE.len() + 1);
        assert_eq!(merged[0], "boat");
        assert_eq!(merged[1], "Antifouling");
    }

    #[test]
    fn test_combine_custom_layers_in_order() {
        let mut config = BTreeMap::new();
        config.insert(Unit::Marine, KeywordSpec::from("boat|harbour"));
        let mut server = BTreeMap::new();
        server.insert(Unit::Marine, KeywordSpec::List(vec!["ferry".into()]));
        server.insert(Unit::Target, KeywordSpec::List(vec!["decoy".into()]));

        let combined = combine_custom(config.iter().chain(server.iter()));
        assert_eq!(
            combined[&Unit::Marine],
            KeywordSpec::List(vec!["boat".into(), "harbour".into(), "ferry".into()])
        );
        assert_eq!(combined[&Unit::Target], KeywordSpec::List(vec!["decoy".into()]));
        assert!(!combined.contains_key(&Unit::IoT));
    }

    #[test]
    fn test_other_has_no_defaults() {
        assert!(default_keywords(Unit::Other).is_empty());
        for unit in Unit::SCORABLE {
            assert!(!default_keywords(unit).is_empty(), "{unit} has no defaults");
        }
    }
}
