use std::collections::BTreeMap;

use log::debug;

use crate::models::{ClassificationInput, ClassificationResult, Unit};
use crate::tender::keywords::merge_with_defaults;

/// Keywords at least this many characters long score double.
const LONG_KEYWORD_CHARS: usize = 10;

/// Classify a tender into a business unit from its title and summary.
///
/// Every scorable unit is scored against its merged keyword list (custom
/// keywords from `input` followed by the built-in defaults). The highest
/// score wins; ties go to the unit whose matched keywords are longest in
/// total, then to [`Unit::TIE_BREAK_PRIORITY`]. No score above zero means
/// [`Unit::Other`].
pub fn classify(input: &ClassificationInput) -> ClassificationResult {
    let text = format!("{}\n{}", input.title, input.summary);
    let text = text.trim();

    let mut scores = BTreeMap::new();
    let mut matched = BTreeMap::new();

    for unit in Unit::SCORABLE {
        let keywords = merge_with_defaults(unit, input.keywords.get(&unit));
        let (score, hits) = score_unit(text, &keywords);
        scores.insert(unit, score);
        matched.insert(unit, hits);
    }

    let unit = resolve_winner(&scores, &matched);
    debug!("classified as {} (scores: {:?})", unit, scores);

    ClassificationResult {
        unit,
        scores,
        matched,
    }
}

/// Score one unit's keyword list against `text`.
///
/// Returns the summed weighted occurrences and the keywords that matched at
/// least once, in list order.
pub fn score_unit(text: &str, keywords: &[String]) -> (u32, Vec<String>) {
    let mut score = 0;
    let mut matched = Vec::new();

    for kw in keywords {
        let count = count_occurrences(text, kw);
        if count > 0 {
            score += count * keyword_weight(kw);
            matched.push(kw.clone());
        }
    }

    (score, matched)
}

/// 2 for phrases and long keywords, 1 for short single words.
pub fn keyword_weight(keyword: &str) -> u32 {
    if keyword.contains(' ') || keyword.chars().count() >= LONG_KEYWORD_CHARS {
        2
    } else {
        1
    }
}

/// Count case-insensitive occurrences of `needle` in `haystack`.
///
/// After each hit the scan resumes one character past the start of the
/// match, so overlapping hits count: `"aa"` occurs 3 times in `"aaaa"`.
/// An empty needle never matches.
pub fn count_occurrences(haystack: &str, needle: &str) -> u32 {
    let hay = haystack.to_lowercase();
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return 0;
    }

    let mut count = 0;
    let mut start = 0;
    while let Some(offset) = hay[start..].find(&needle) {
        let pos = start + offset;
        count += 1;
        // advance by one character, not one byte
        let step = hay[pos..].chars().next().map_or(1, char::len_utf8);
        start = pos + step;
    }
    count
}

/// Pick the winning unit from complete score and match maps.
fn resolve_winner(
    scores: &BTreeMap<Unit, u32>,
    matched: &BTreeMap<Unit, Vec<String>>,
) -> Unit {
    let max = scores.values().copied().max().unwrap_or(0);
    if max == 0 {
        return Unit::Other;
    }

    let tied: Vec<Unit> = Unit::SCORABLE
        .into_iter()
        .filter(|u| scores.get(u).copied().unwrap_or(0) == max)
        .collect();

    if let [only] = tied.as_slice() {
        return *only;
    }

    let matched_len = |unit: &Unit| -> usize {
        matched
            .get(unit)
            .map(|kws| kws.iter().map(|kw| kw.chars().count()).sum())
            .unwrap_or(0)
    };

    let winner = tied
        .iter()
        .copied()
        .min_by(|a, b| {
            matched_len(b)
                .cmp(&matched_len(a))
                .then_with(|| a.priority_rank().cmp(&b.priority_rank()))
        })
        .unwrap_or(Unit::Other);

    debug!(
        "tie at score {} between {:?}; {} wins on matched length / priority",
        max, tied, winner
    );
    winner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeywordSpec;

    const EXAMPLE_TITLE: &str = "Remote Asset Monitoring Solution";
    const EXAMPLE_SUMMARY: &str = "We are looking for a solution to monitor our remote assets using smart sensors and IoT technology. The system should provide real-time data and predictive maintenance capabilities.";

    #[test]
    fn test_empty_input_is_other() {
        let result = classify(&ClassificationInput::default());
        assert_eq!(result.unit, Unit::Other);
        assert!(result.scores.values().all(|s| *s == 0));
        assert!(result.matched.values().all(|m| m.is_empty()));
    }

    #[test]
    fn test_result_covers_every_scorable_unit() {
        let inputs = [
            ClassificationInput::default(),
            ClassificationInput::new(EXAMPLE_TITLE, EXAMPLE_SUMMARY),
            ClassificationInput::new("", "drone").with_keywords(Unit::Marine, "boat"),
        ];
        for input in &inputs {
            let result = classify(input);
            let keys: Vec<Unit> = result.scores.keys().copied().collect();
            assert_eq!(keys, Unit::SCORABLE.to_vec());
            let keys: Vec<Unit> = result.matched.keys().copied().collect();
            assert_eq!(keys, Unit::SCORABLE.to_vec());
        }
    }

    #[test]
    fn test_classify_is_idempotent() {
        let input = ClassificationInput::new(EXAMPLE_TITLE, EXAMPLE_SUMMARY);
        assert_eq!(classify(&input), classify(&input));
    }

    #[test]
    fn test_overlapping_occurrences_count() {
        assert_eq!(count_occurrences("aaaa", "aa"), 3);
        assert_eq!(count_occurrences("aaa", "aa"), 2);
        assert_eq!(count_occurrences("IoT iot IOT", "iot"), 3);
        assert_eq!(count_occurrences("anything", ""), 0);
        assert_eq!(count_occurrences("", "drone"), 0);
    }

    #[test]
    fn test_count_handles_multibyte_text() {
        assert_eq!(count_occurrences("a 360° Projection room", "360° projection"), 1);
        assert_eq!(count_occurrences("ééé", "éé"), 2);
    }

    #[test]
    fn test_keyword_weights() {
        assert_eq!(keyword_weight("IoT"), 1);
        assert_eq!(keyword_weight("Smart City"), 2);
        assert_eq!(keyword_weight("Monitoring"), 2);
        assert_eq!(keyword_weight("Telemetry"), 1);

        let iot = classify(&ClassificationInput::new("IoT", ""));
        assert_eq!(iot.score(Unit::IoT), 1);
        let city = classify(&ClassificationInput::new("Smart City", ""));
        assert_eq!(city.score(Unit::IoT), 2);
    }

    #[test]
    fn test_tie_equal_lengths_falls_to_priority() {
        let input =
            ClassificationInput::new("Africa", "harbor").with_keywords(Unit::Marine, "harbor");
        let result = classify(&input);
        assert_eq!(result.score(Unit::Target), 1);
        assert_eq!(result.score(Unit::Marine), 1);
        assert_eq!(result.unit, Unit::Target);
    }

    #[test]
    fn test_tie_prefers_longer_matched_keywords() {
        // "Drone" (5 chars) vs "harbor" (6 chars), both scoring 1
        let input =
            ClassificationInput::new("Drone", "harbor").with_keywords(Unit::Marine, "harbor");
        let result = classify(&input);
        assert_eq!(result.score(Unit::Target), 1);
        assert_eq!(result.score(Unit::Marine), 1);
        assert_eq!(result.unit, Unit::Marine);
    }

    #[test]
    fn test_example_tender_is_iot() {
        let result = classify(&ClassificationInput::new(EXAMPLE_TITLE, EXAMPLE_SUMMARY));
        assert_eq!(result.unit, Unit::IoT);
        assert_eq!(result.score(Unit::IoT), 6);
        assert_eq!(result.score(Unit::Experience), 2);
        assert_eq!(result.score(Unit::Marine), 0);
        assert_eq!(result.score(Unit::Target), 0);
        assert_eq!(result.score(Unit::BisanEmira), 4);
        assert_eq!(
            result.matched(Unit::IoT),
            ["Monitoring", "Sensor", "IoT", "Predictive Maintenance"]
        );
    }

    #[test]
    fn test_result_json_shape() {
        let result = classify(&ClassificationInput::new(EXAMPLE_TITLE, EXAMPLE_SUMMARY));

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["unit"], "IoT");
        assert_eq!(value["scores"]["Bisan_Emira"], 4);
        assert_eq!(value["matched"]["Marine"], serde_json::json!([]));
        assert!(value["matched"]["Bisan_Emira"].is_array());
        assert_eq!(value["matched"].as_object().unwrap().len(), 5);

        // units serialize in declaration order
        assert_eq!(
            serde_json::to_string(&result.scores).unwrap(),
            r#"{"IoT":6,"Experience":2,"Marine":0,"Target":0,"Bisan_Emira":4}"#
        );
    }

    #[test]
    fn test_custom_keywords_add_to_defaults() {
        let title = "Marine Systems refit";
        let summary = "boat hull, boat engine and boat deck";

        let plain = classify(&ClassificationInput::new(title, summary));
        assert_eq!(plain.score(Unit::Marine), 2);

        let custom = classify(
            &ClassificationInput::new(title, summary).with_keywords(Unit::Marine, "boat"),
        );
        assert_eq!(custom.score(Unit::Marine), 2 + 3);
        assert_eq!(custom.matched(Unit::Marine), ["boat", "Marine Systems"]);
        assert_eq!(custom.unit, Unit::Marine);
    }

    #[test]
    fn test_custom_list_spec() {
        let input = ClassificationInput::new("Harbour dredging", "").with_keywords(
            Unit::Marine,
            KeywordSpec::List(vec!["dredging".into(), " harbour ".into()]),
        );
        let result = classify(&input);
        assert_eq!(result.score(Unit::Marine), 2);
        assert_eq!(result.matched(Unit::Marine), ["dredging", "harbour"]);
    }

    #[test]
    fn test_repeated_keyword_counts_each_entry() {
        let input = ClassificationInput::new("Antifouling paint", "")
            .with_keywords(Unit::Marine, "antifouling");
        let result = classify(&input);
        // custom "antifouling" plus default "Antifouling", weight 2 each
        assert_eq!(result.score(Unit::Marine), 4);
    }
}
