//! Flavor profile classification
//!
//! Maps a (possibly partial) tasting questionnaire to one of seven named
//! profile labels, falling back to a default when nothing matches.
//!
//! The rule set is an ordered first-match-wins table: each entry pairs a
//! predicate over the answers with the label it produces. Absent numeric
//! answers make a rule fail; they are never coerced to 0. The "balanced"
//! rule tests strict equality to 3, not a band.

use crate::models::FlavorAnswers;

/// Label returned when no rule matches
pub const DEFAULT_LABEL: &str = "Unique Profile";

/// One entry of the classification table
struct Rule {
    matches: fn(&FlavorAnswers) -> bool,
    label: &'static str,
}

fn has_note(a: &FlavorAnswers, note: &str) -> bool {
    a.flavor_notes
        .as_ref()
        .is_some_and(|notes| notes.iter().any(|n| n == note))
}

fn bright_fruity(a: &FlavorAnswers) -> bool {
    a.acidity_level.is_some_and(|v| v >= 4) && has_note(a, "Fruity")
}

fn dark_bold(a: &FlavorAnswers) -> bool {
    a.bitterness_level.is_some_and(|v| v >= 4) && a.acidity_level.is_some_and(|v| v <= 2)
}

fn sweet_smooth(a: &FlavorAnswers) -> bool {
    a.sweetness_level.is_some_and(|v| v >= 4)
        && (has_note(a, "Chocolate") || has_note(a, "Caramel"))
}

fn rich_nutty(a: &FlavorAnswers) -> bool {
    a.body_weight.is_some_and(|v| v >= 4) && (has_note(a, "Nutty") || has_note(a, "Earthy"))
}

fn light_delicate(a: &FlavorAnswers) -> bool {
    a.body_weight.is_some_and(|v| v <= 2) && has_note(a, "Floral")
}

fn balanced_classic(a: &FlavorAnswers) -> bool {
    a.acidity_level == Some(3) && a.bitterness_level == Some(3) && a.sweetness_level == Some(3)
}

/// Ordered rule table; evaluation order is the precedence order
const RULES: &[Rule] = &[
    Rule { matches: bright_fruity, label: "Bright & Fruity" },
    Rule { matches: dark_bold, label: "Dark & Bold" },
    Rule { matches: sweet_smooth, label: "Sweet & Smooth" },
    Rule { matches: rich_nutty, label: "Rich & Nutty" },
    Rule { matches: light_delicate, label: "Light & Delicate" },
    Rule { matches: balanced_classic, label: "Balanced & Classic" },
];

/// Classify a questionnaire into a profile label.
///
/// Total and pure: any combination of present/absent answers yields a label.
/// The first rule whose predicate holds wins; no scoring across matches.
pub fn classify(answers: &FlavorAnswers) -> &'static str {
    RULES
        .iter()
        .find(|rule| (rule.matches)(answers))
        .map(|rule| rule.label)
        .unwrap_or(DEFAULT_LABEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers() -> FlavorAnswers {
        FlavorAnswers::default()
    }

    fn notes(list: &[&str]) -> Option<Vec<String>> {
        Some(list.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn empty_questionnaire_falls_back_to_default() {
        assert_eq!(classify(&answers()), DEFAULT_LABEL);
    }

    #[test]
    fn high_acidity_with_fruity_note() {
        let a = FlavorAnswers {
            acidity_level: Some(4),
            flavor_notes: notes(&["Fruity"]),
            ..answers()
        };
        assert_eq!(classify(&a), "Bright & Fruity");
    }

    #[test]
    fn bright_fruity_takes_precedence_over_all_later_rules() {
        // Also satisfies the sweet, nutty and balanced predicates
        let a = FlavorAnswers {
            acidity_level: Some(5),
            sweetness_level: Some(5),
            bitterness_level: Some(3),
            body_weight: Some(5),
            flavor_notes: notes(&["Fruity", "Chocolate", "Nutty"]),
            ..answers()
        };
        assert_eq!(classify(&a), "Bright & Fruity");
    }

    #[test]
    fn high_bitterness_low_acidity_is_dark_bold() {
        let a = FlavorAnswers {
            bitterness_level: Some(5),
            acidity_level: Some(1),
            ..answers()
        };
        assert_eq!(classify(&a), "Dark & Bold");
    }

    #[test]
    fn dark_bold_requires_acidity_answer() {
        // Absent acidity must not be treated as 0
        let a = FlavorAnswers {
            bitterness_level: Some(5),
            ..answers()
        };
        assert_eq!(classify(&a), DEFAULT_LABEL);
    }

    #[test]
    fn sweet_smooth_matches_chocolate_or_caramel() {
        let chocolate = FlavorAnswers {
            sweetness_level: Some(4),
            flavor_notes: notes(&["Chocolate"]),
            ..answers()
        };
        let caramel = FlavorAnswers {
            sweetness_level: Some(5),
            flavor_notes: notes(&["Caramel"]),
            ..answers()
        };
        assert_eq!(classify(&chocolate), "Sweet & Smooth");
        assert_eq!(classify(&caramel), "Sweet & Smooth");
    }

    #[test]
    fn sweet_note_without_sweetness_rating_does_not_match() {
        let a = FlavorAnswers {
            flavor_notes: notes(&["Chocolate"]),
            ..answers()
        };
        assert_eq!(classify(&a), DEFAULT_LABEL);
    }

    #[test]
    fn heavy_body_with_nutty_note_is_rich_nutty() {
        let a = FlavorAnswers {
            body_weight: Some(5),
            flavor_notes: notes(&["Nutty"]),
            ..answers()
        };
        assert_eq!(classify(&a), "Rich & Nutty");
    }

    #[test]
    fn light_body_with_floral_note_is_light_delicate() {
        let a = FlavorAnswers {
            body_weight: Some(2),
            flavor_notes: notes(&["Floral"]),
            ..answers()
        };
        assert_eq!(classify(&a), "Light & Delicate");
    }

    #[test]
    fn balanced_requires_exact_threes() {
        let balanced = FlavorAnswers {
            acidity_level: Some(3),
            bitterness_level: Some(3),
            sweetness_level: Some(3),
            ..answers()
        };
        assert_eq!(classify(&balanced), "Balanced & Classic");

        // Any drift off 3 breaks the rule; it is equality, not a band
        let off_by_one = FlavorAnswers {
            acidity_level: Some(3),
            bitterness_level: Some(3),
            sweetness_level: Some(4),
            ..answers()
        };
        assert_eq!(classify(&off_by_one), DEFAULT_LABEL);
    }

    #[test]
    fn classify_is_total_over_sparse_inputs() {
        // Every single-field questionnaire still yields a label
        let cases = [
            FlavorAnswers { strength_intensity: Some(5), ..answers() },
            FlavorAnswers { aroma_intensity: Some(1), ..answers() },
            FlavorAnswers { acidity_level: Some(5), ..answers() },
            FlavorAnswers { bitterness_level: Some(4), ..answers() },
            FlavorAnswers { body_weight: Some(1), ..answers() },
            FlavorAnswers { aftertaste_length: Some(3), ..answers() },
            FlavorAnswers { aftertaste_pleasant: Some(3), ..answers() },
            FlavorAnswers { flavor_notes: notes(&["Fruity", "Floral"]), ..answers() },
        ];
        for a in &cases {
            assert!(!classify(a).is_empty());
        }
    }
}
