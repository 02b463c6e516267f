//! Autocomplete suggestion ranking
//!
//! Takes the raw candidate batch from the geocoding provider and turns it
//! into a bounded, ordered suggestion list: low-quality entries are dropped
//! by a set of named filter rules, survivors are scored by additive weight
//! rules, duplicates collapse on a name+country key, and at most
//! [`MAX_SUGGESTIONS`] entries are returned. Scores are intermediate and
//! never leak into the returned candidates.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::GeoCandidate;

/// Upper bound on returned suggestions
pub const MAX_SUGGESTIONS: usize = 5;

/// Countries that typically have good geocoding and weather coverage
const MAJOR_COUNTRIES: &[&str] = &[
    "US", "CA", "GB", "AU", "DE", "FR", "IT", "ES", "NL", "JP", "KR", "IN", "CN", "BR", "MX", "AR",
];

/// Countries whose geocoding data is sparse enough that only candidates
/// with a state and a substantial name are worth suggesting
const PROBLEMATIC_COUNTRIES: &[&str] = &[
    "NG", "CD", "CF", "TD", "SO", "SS", "ER", "DJ", "KM", "ST", "CV", "GW", "GM", "SL", "LR", "ML",
    "BF", "NE", "MR", "GN", "SN",
];

/// Well-known 3-letter airport/city codes allowed through the short-query
/// strictness rule
const WELL_KNOWN_CODES: &[&str] = &[
    "NYC", "LAX", "SFO", "DFW", "ORD", "JFK", "LGA", "BOS", "ATL", "DEN", "SEA", "LAS", "MIA",
    "PHX", "CLT", "MSP", "DTW", "PHL", "BWI", "DCA", "IAD", "SLC", "PDX", "SAN", "TPA", "STL",
    "PIT", "CLE", "MCI", "OAK", "SNA", "BUR", "MDW", "HOU", "IAH", "MSY", "RDU", "BNA", "CVG",
    "CMH", "IND", "MKE", "BUF", "ROC", "SYR", "ALB", "BDL", "PVD", "BGR",
];

/// Major city names that get a relevance boost on a whole-word match
const WELL_KNOWN_CITIES: &[&str] = &[
    "new york",
    "los angeles",
    "chicago",
    "houston",
    "phoenix",
    "philadelphia",
    "san antonio",
    "san diego",
    "dallas",
    "san jose",
    "austin",
    "jacksonville",
    "fort worth",
    "columbus",
    "charlotte",
    "san francisco",
    "indianapolis",
    "seattle",
    "denver",
    "washington",
    "boston",
    "el paso",
    "detroit",
    "nashville",
    "portland",
    "oklahoma city",
    "las vegas",
    "louisville",
    "baltimore",
    "milwaukee",
    "albuquerque",
    "tucson",
    "fresno",
    "sacramento",
    "kansas city",
    "mesa",
    "atlanta",
    "omaha",
    "colorado springs",
    "raleigh",
    "miami",
    "oakland",
    "minneapolis",
    "tulsa",
    "cleveland",
    "wichita",
    "arlington",
    "tampa",
    "bakersfield",
    "new orleans",
    "honolulu",
    "anaheim",
    "santa ana",
    "corpus christi",
    "riverside",
    "lexington",
    "stockton",
    "toledo",
    "st. paul",
    "newark",
    "greensboro",
    "buffalo",
    "plano",
    "lincoln",
    "henderson",
    "fort wayne",
    "jersey city",
    "st. petersburg",
    "chula vista",
    "norfolk",
    "orlando",
    "chandler",
    "laredo",
    "madison",
    "lubbock",
    "winston salem",
    "garland",
    "glendale",
    "hialeah",
    "reno",
    "baton rouge",
    "irvine",
    "chesapeake",
    "irving",
    "scottsdale",
    "north las vegas",
    "fremont",
    "gilbert",
    "san bernardino",
    "boise",
    "birmingham",
];

/// Terms that indicate a non-city point of interest rather than a
/// populated place
const OBSCURE_WORDS: &[&str] = &[
    "railway",
    "station",
    "airport",
    "hospital",
    "school",
    "farm",
    "ranch",
    "creek",
    "river",
    "road",
    "street",
    "avenue",
    "lane",
    "district",
    "ward",
    "quarter",
    "sector",
    "zone",
    "area",
    "region",
    "subdivision",
    "hamlet",
    "village",
    "settlement",
    "camp",
    "base",
    "facility",
    "center",
    "centre",
];

static GARBAGE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\W]+$").expect("valid garbage-name pattern"));

static OBSCURE_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b({})\b", OBSCURE_WORDS.join("|")))
        .expect("valid obscure-word pattern")
});

static WELL_KNOWN_CITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b({})\b", WELL_KNOWN_CITIES.join("|")))
        .expect("valid well-known-city pattern")
});

/// A named exclusion rule: a candidate is dropped when any rule matches
pub struct FilterRule {
    /// Rule identifier, for tests and trace output
    pub name: &'static str,
    /// Returns true when the candidate should be excluded
    pub excludes: fn(&GeoCandidate, &str) -> bool,
}

/// Exclusion rules, each independently testable
pub const FILTER_RULES: &[FilterRule] = &[
    FilterRule {
        name: "short_name",
        excludes: |candidate, _| candidate.name.chars().count() < 3,
    },
    FilterRule {
        name: "garbage_name",
        excludes: |candidate, _| GARBAGE_NAME.is_match(&candidate.name),
    },
    // Short queries surface many junk matches, so short names only pass
    // when they are a recognized airport/city code
    FilterRule {
        name: "short_query_strictness",
        excludes: |candidate, query| {
            query.chars().count() <= 3
                && candidate.name.chars().count() <= 3
                && !WELL_KNOWN_CODES
                    .iter()
                    .any(|code| code.eq_ignore_ascii_case(&candidate.name))
        },
    },
    FilterRule {
        name: "sparse_coverage_country",
        excludes: |candidate, _| {
            PROBLEMATIC_COUNTRIES.contains(&candidate.country.as_str())
                && (candidate.state.is_none() || candidate.name.chars().count() < 4)
        },
    },
    FilterRule {
        name: "obscure_word",
        excludes: |candidate, _| OBSCURE_WORD.is_match(&candidate.name),
    },
];

/// A named additive scoring rule
pub struct ScoreRule {
    /// Rule identifier, for tests and trace output
    pub name: &'static str,
    /// Weight added when the rule applies
    pub weight: i32,
    /// Returns true when the candidate earns this rule's weight
    pub applies: fn(&GeoCandidate) -> bool,
}

/// Relevance weights, each independently testable. Higher totals sort first.
pub const SCORE_RULES: &[ScoreRule] = &[
    ScoreRule {
        name: "major_country",
        weight: 10,
        applies: |candidate| MAJOR_COUNTRIES.contains(&candidate.country.as_str()),
    },
    ScoreRule {
        name: "us_boost",
        weight: 5,
        applies: |candidate| candidate.country == "US",
    },
    // A state usually indicates a larger, established city
    ScoreRule {
        name: "has_state",
        weight: 5,
        applies: |candidate| candidate.state.is_some(),
    },
    ScoreRule {
        name: "established_name",
        weight: 3,
        applies: |candidate| candidate.name.chars().count() >= 5,
    },
    ScoreRule {
        name: "well_known_city",
        weight: 15,
        applies: |candidate| WELL_KNOWN_CITY.is_match(&candidate.name),
    },
];

/// Compute the relevance score for a surviving candidate
#[must_use]
pub fn score(candidate: &GeoCandidate) -> i32 {
    SCORE_RULES
        .iter()
        .filter(|rule| (rule.applies)(candidate))
        .map(|rule| rule.weight)
        .sum()
}

fn passes_filters(candidate: &GeoCandidate, query: &str) -> bool {
    match FILTER_RULES
        .iter()
        .find(|rule| (rule.excludes)(candidate, query))
    {
        Some(rule) => {
            debug!("Dropping candidate '{}' ({})", candidate.name, rule.name);
            false
        }
        None => true,
    }
}

/// Filter, score, deduplicate, and truncate a batch of raw candidates.
///
/// The sort is stable, so ties keep their original provider order, and the
/// first (highest-scored) occurrence of a `(lowercase name, country)` pair
/// wins deduplication. An empty or fully-filtered batch yields an empty
/// list, never an error.
#[must_use]
pub fn rank_suggestions(candidates: Vec<GeoCandidate>, query: &str) -> Vec<GeoCandidate> {
    let query = query.trim();

    let mut scored: Vec<(i32, GeoCandidate)> = candidates
        .into_iter()
        .filter(|candidate| passes_filters(candidate, query))
        .map(|candidate| (score(&candidate), candidate))
        .collect();

    // sort_by is stable; descending by score
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let mut seen = HashSet::new();
    scored
        .into_iter()
        .filter(|(_, candidate)| {
            seen.insert(format!(
                "{}-{}",
                candidate.name.to_lowercase(),
                candidate.country
            ))
        })
        .take(MAX_SUGGESTIONS)
        .map(|(_, candidate)| candidate)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn candidate(name: &str, country: &str, state: Option<&str>) -> GeoCandidate {
        GeoCandidate {
            name: name.to_string(),
            country: country.to_string(),
            state: state.map(String::from),
            lat: 0.0,
            lon: 0.0,
        }
    }

    fn rule(name: &str) -> &'static FilterRule {
        FILTER_RULES
            .iter()
            .find(|rule| rule.name == name)
            .expect("known rule name")
    }

    #[rstest]
    #[case("12")]
    #[case("ab")]
    fn test_short_name_rule(#[case] name: &str) {
        let rule = rule("short_name");
        assert!((rule.excludes)(&candidate(name, "US", None), "london"));
        assert!(!(rule.excludes)(&candidate("London", "GB", None), "london"));
    }

    #[rstest]
    #[case("123")]
    #[case("---")]
    #[case("12-34")]
    fn test_garbage_name_rule(#[case] name: &str) {
        let rule = rule("garbage_name");
        assert!((rule.excludes)(&candidate(name, "US", None), "query"));
        assert!(!(rule.excludes)(&candidate("Rio", "BR", None), "query"));
    }

    #[test]
    fn test_short_query_strictness_allows_known_codes() {
        let rule = rule("short_query_strictness");
        // Generic 3-letter name on a 3-letter query is dropped
        assert!((rule.excludes)(&candidate("Aba", "NG", None), "aba"));
        // Well-known codes survive, case-insensitively
        assert!(!(rule.excludes)(&candidate("NYC", "US", None), "nyc"));
        assert!(!(rule.excludes)(&candidate("lax", "US", None), "lax"));
        // Long queries are unaffected
        assert!(!(rule.excludes)(&candidate("Aba", "NG", None), "abastr"));
    }

    #[test]
    fn test_sparse_coverage_country_rule() {
        let rule = rule("sparse_coverage_country");
        // No state: dropped
        assert!((rule.excludes)(&candidate("Lagos", "NG", None), "lagos"));
        // Short name even with state: dropped
        assert!((rule.excludes)(&candidate("Aba", "NG", Some("Abia")), "aba"));
        // State and substantial name: kept
        assert!(!(rule.excludes)(&candidate("Lagos", "NG", Some("Lagos")), "lagos"));
        // Other countries unaffected
        assert!(!(rule.excludes)(&candidate("Paris", "FR", None), "paris"));
    }

    #[rstest]
    #[case("Central Station")]
    #[case("Springfield Airport")]
    #[case("Old Farm")]
    fn test_obscure_word_rule(#[case] name: &str) {
        let rule = rule("obscure_word");
        assert!((rule.excludes)(&candidate(name, "US", None), "query"));
    }

    #[test]
    fn test_obscure_word_matches_whole_words_only() {
        let rule = rule("obscure_word");
        // "Farmington" contains "farm" but not as a whole word
        assert!(!(rule.excludes)(&candidate("Farmington", "US", None), "query"));
    }

    #[test]
    fn test_score_accumulates_weights() {
        // US + state + long name, not on the well-known list: 10 + 5 + 5 + 3
        assert_eq!(score(&candidate("Tacoma", "US", Some("Washington"))), 23);
        // Major country, short name, no state: 10
        assert_eq!(score(&candidate("Rome", "IT", None)), 10);
        // Nothing applies
        assert_eq!(score(&candidate("Suva", "FJ", None)), 0);
    }

    #[test]
    fn test_score_well_known_name_outscores_plain_name() {
        // "seattle" is on the well-known list, "tacoma" is not; same
        // country and state, so the +15 boost is the only difference
        let boosted = score(&candidate("Seattle", "US", Some("Washington")));
        let plain = score(&candidate("Tacoma", "US", Some("Washington")));
        assert_eq!(boosted, 38);
        assert_eq!(boosted - plain, 15);
    }

    #[test]
    fn test_score_well_known_city_boost() {
        // US + state + long name + well-known: 10 + 5 + 5 + 3 + 15
        assert_eq!(score(&candidate("Chicago", "US", Some("Illinois"))), 38);
    }

    #[test]
    fn test_rank_filters_garbage_regardless_of_score() {
        let suggestions = rank_suggestions(
            vec![
                candidate("12", "US", Some("New York")),
                candidate("---", "US", Some("California")),
                candidate("Boston", "US", Some("Massachusetts")),
            ],
            "bost",
        );
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].name, "Boston");
    }

    #[test]
    fn test_rank_orders_by_score() {
        let suggestions = rank_suggestions(
            vec![
                candidate("Suva", "FJ", None),
                candidate("Seattle", "US", Some("Washington")),
            ],
            "se",
        );
        assert_eq!(suggestions[0].name, "Seattle");
        assert_eq!(suggestions[1].name, "Suva");
    }

    #[test]
    fn test_rank_deduplicates_keeping_first_after_sort() {
        let suggestions = rank_suggestions(
            vec![
                candidate("portland", "US", None),
                candidate("Portland", "US", Some("Oregon")),
                candidate("Portland", "AU", None),
            ],
            "portland",
        );
        // The higher-scored US entry wins; the AU one is a different key
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].state.as_deref(), Some("Oregon"));
        assert_eq!(suggestions[1].country, "AU");
    }

    #[test]
    fn test_rank_bounds_output_length() {
        let candidates: Vec<GeoCandidate> = (0..50)
            .map(|i| candidate(&format!("Springfield{i}"), "US", Some("IL")))
            .collect();
        let suggestions = rank_suggestions(candidates, "springfield");
        assert_eq!(suggestions.len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn test_rank_stable_for_equal_scores() {
        let suggestions = rank_suggestions(
            vec![
                candidate("Milano", "IT", None),
                candidate("Torino", "IT", None),
            ],
            "italy",
        );
        assert_eq!(suggestions[0].name, "Milano");
        assert_eq!(suggestions[1].name, "Torino");
    }

    #[test]
    fn test_rank_empty_input_yields_empty_output() {
        assert!(rank_suggestions(Vec::new(), "anything").is_empty());
    }
}
