//! The tiered matching cascade.
//!
//! [`resolve`] turns a [`MatchRequest`] into an [`AssetReference`] by
//! running eight steps in strict order; the first step that finds a rule
//! wins. Within a step, the first rule in table order wins.
//!
//! | # | Step | Rules consulted | Comparison |
//! |---|------|-----------------|------------|
//! | 1 | exact | Exact | `name == pattern` |
//! | 2 | case-insensitive | Exact, CaseInsensitive | lowercase equality |
//! | 3 | normalized | every tier | [`normalize`] equality |
//! | 4 | partial-word | name tiers | word ⊂ pattern, or pattern ⊂ word |
//! | 5 | keyword | Keyword, then name tiers | expanded keyword ⊂ pattern |
//! | 6 | category fallback | CategoryFallback | hint candidates vs pattern forms |
//! | 7 | category keyword | CategoryKeyword | pattern ⊂ name |
//! | 8 | last resort | none | shape of the name |
//!
//! "Name tiers" are Exact, CaseInsensitive, Normalized and PartialWord.
//! Every comparison after step 2 runs on canonical forms.
//!
//! The cascade is total: step 8 always produces a non-empty reference, so
//! there is no error path. It never performs I/O.

pub mod category;

use tracing::debug;

use crate::normalize::{normalize, significant_words};
use crate::rules::lexicon::{is_stop_word, synonyms_for};
use crate::rules::{IndexedRule, LastResort, RuleTable};
use crate::telemetry;
use crate::types::{AssetReference, MatchRequest, MatchTier, Resolution, Tier};

/// Resolve a request to a reference. Never fails.
///
/// ```rust
/// # use sigil::{matcher, MatchRequest, RuleTable};
/// let rules = RuleTable::with_embedded_seed();
/// let reference = matcher::resolve(&MatchRequest::new("FLEUR DE LYS"), &rules);
/// assert_eq!(reference.location, "/assets/symbols/european/fleur-de-lys.svg");
/// ```
pub fn resolve(request: &MatchRequest, rules: &RuleTable) -> AssetReference {
    explain(request, rules).reference
}

/// Resolve a request and report which step produced the reference.
pub fn explain(request: &MatchRequest, rules: &RuleTable) -> Resolution {
    let resolution = cascade(request, rules);
    metrics::counter!(telemetry::RESOLUTIONS_TOTAL, "tier" => resolution.tier.as_str())
        .increment(1);
    debug!(
        name = %request.name,
        category = request.category_hint.as_deref().unwrap_or(""),
        tier = %resolution.tier,
        pattern = resolution.pattern.as_deref().unwrap_or(""),
        location = %resolution.reference.location,
        "resolved asset reference"
    );
    resolution
}

fn cascade(request: &MatchRequest, rules: &RuleTable) -> Resolution {
    let name = request.name.as_str();
    let canonical = normalize(name);

    if let Some(hit) = exact(name, rules) {
        return hit.into_resolution(Tier::Exact);
    }
    if let Some(hit) = case_insensitive(name, rules) {
        return hit.into_resolution(Tier::CaseInsensitive);
    }
    if let Some(hit) = normalized(&canonical, rules) {
        return hit.into_resolution(Tier::Normalized);
    }
    if let Some(hit) = partial_word(&canonical, rules) {
        return hit.into_resolution(Tier::PartialWord);
    }
    if let Some(hit) = keyword(&canonical, rules) {
        return hit.into_resolution(Tier::Keyword);
    }
    if let Some(hint) = request.category_hint.as_deref() {
        if let Some(hit) = category_fallback(hint, rules) {
            return hit.into_resolution(Tier::CategoryFallback);
        }
    }
    if let Some(hit) = category_keyword(&canonical, rules) {
        return hit.into_resolution(Tier::CategoryKeyword);
    }
    last_resort(&canonical, rules.last_resort())
}

/// A matched rule, before it is tagged with the step that found it.
struct Hit<'a>(&'a IndexedRule);

impl Hit<'_> {
    fn into_resolution(self, tier: Tier) -> Resolution {
        Resolution {
            reference: self.0.rule.reference.clone(),
            tier: MatchTier::Rule(tier),
            pattern: Some(self.0.rule.pattern.clone()),
        }
    }
}

// ============================================================================
// Steps 1-3: whole-name equality
// ============================================================================

fn exact<'a>(name: &str, rules: &'a RuleTable) -> Option<Hit<'a>> {
    rules
        .indexed(Tier::Exact)
        .iter()
        .find(|r| r.rule.pattern == name)
        .map(Hit)
}

fn case_insensitive<'a>(name: &str, rules: &'a RuleTable) -> Option<Hit<'a>> {
    let folded = name.to_lowercase();
    rules
        .indexed_in(&[Tier::Exact, Tier::CaseInsensitive])
        .find(|r| r.folded == folded)
        .map(Hit)
}

fn normalized<'a>(canonical: &str, rules: &'a RuleTable) -> Option<Hit<'a>> {
    if canonical.is_empty() {
        return None;
    }
    rules
        .indexed_in(&Tier::ALL)
        .find(|r| r.canonical == canonical)
        .map(Hit)
}

// ============================================================================
// Steps 4-5: word and keyword containment
// ============================================================================

fn partial_word<'a>(canonical: &str, rules: &'a RuleTable) -> Option<Hit<'a>> {
    let words: Vec<&str> = significant_words(canonical).collect();
    if words.is_empty() {
        return None;
    }
    rules
        .indexed_in(&Tier::NAME)
        .find(|r| {
            // Canonical patterns are never empty, so `w.contains` cannot match vacuously.
            let pattern = r.canonical.as_str();
            words
                .iter()
                .any(|w| pattern.contains(w) || w.contains(pattern))
        })
        .map(Hit)
}

/// Significant non-stop words of the name plus triggered synonyms.
fn keyword_set(canonical: &str) -> Vec<&str> {
    let mut keywords: Vec<&str> = significant_words(canonical)
        .filter(|w| !is_stop_word(w))
        .collect();
    for synonym in synonyms_for(canonical) {
        if !keywords.contains(&synonym) {
            keywords.push(synonym);
        }
    }
    keywords
}

const KEYWORD_SCAN: [Tier; 5] = [
    Tier::Keyword,
    Tier::Exact,
    Tier::CaseInsensitive,
    Tier::Normalized,
    Tier::PartialWord,
];

fn keyword<'a>(canonical: &str, rules: &'a RuleTable) -> Option<Hit<'a>> {
    let keywords = keyword_set(canonical);
    if keywords.is_empty() {
        return None;
    }
    rules
        .indexed_in(&KEYWORD_SCAN)
        .find(|r| {
            !r.canonical.is_empty() && keywords.iter().any(|k| r.canonical.contains(k))
        })
        .map(Hit)
}

// ============================================================================
// Steps 6-7: category
// ============================================================================

fn category_fallback<'a>(hint: &str, rules: &'a RuleTable) -> Option<Hit<'a>> {
    let table = rules.indexed(Tier::CategoryFallback);

    if let Some(r) = table.iter().find(|r| r.rule.pattern == hint) {
        return Some(Hit(r));
    }

    let candidates = category::hint_candidates(hint);
    if candidates.is_empty() {
        return None;
    }
    let forms: Vec<Vec<String>> = table
        .iter()
        .map(|r| category::pattern_forms(&r.canonical))
        .collect();
    candidates.iter().find_map(|candidate| {
        table
            .iter()
            .zip(&forms)
            .find(|(r, f)| !r.canonical.is_empty() && f.contains(candidate))
            .map(|(r, _)| Hit(r))
    })
}

fn category_keyword<'a>(canonical: &str, rules: &'a RuleTable) -> Option<Hit<'a>> {
    if canonical.is_empty() {
        return None;
    }
    rules
        .indexed(Tier::CategoryKeyword)
        .iter()
        .find(|r| !r.canonical.is_empty() && canonical.contains(r.canonical.as_str()))
        .map(Hit)
}

// ============================================================================
// Step 8: last resort
// ============================================================================

fn last_resort(canonical: &str, fallback: &LastResort) -> Resolution {
    let chosen = if canonical.is_empty() {
        &fallback.default
    } else if canonical.chars().count() <= fallback.short_name_max_chars {
        &fallback.short_name
    } else if canonical.contains(' ') {
        &fallback.multi_word
    } else {
        &fallback.default
    };
    // Tables validate their last-resort slots; this guards hand-built ones.
    let reference = if chosen.location.trim().is_empty() {
        LastResort::default().default
    } else {
        chosen.clone()
    };
    Resolution {
        reference,
        tier: MatchTier::LastResort,
        pattern: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(path: &str) -> AssetReference {
        AssetReference::local(path)
    }

    fn table(rules: &[(Tier, &str, &str)]) -> RuleTable {
        let mut t = RuleTable::new();
        for (tier, pattern, location) in rules {
            t = t.with_rule(*tier, pattern, local(location)).unwrap();
        }
        t
    }

    fn explain_name(name: &str, rules: &RuleTable) -> Resolution {
        explain(&MatchRequest::new(name), rules)
    }

    #[test]
    fn exact_is_verbatim() {
        let rules = table(&[(Tier::Exact, "Ankh", "/ankh.svg")]);
        let r = explain_name("Ankh", &rules);
        assert_eq!(r.tier, MatchTier::Rule(Tier::Exact));
        assert_eq!(r.reference, local("/ankh.svg"));
    }

    #[test]
    fn case_insensitive_consults_exact_rules() {
        let rules = table(&[(Tier::Exact, "Fleur de Lys", "/fleur.svg")]);
        let upper = explain_name("FLEUR DE LYS", &rules);
        let title = explain_name("Fleur de Lys", &rules);
        assert_eq!(upper.tier, MatchTier::Rule(Tier::CaseInsensitive));
        assert_eq!(upper.reference, title.reference);
    }

    #[test]
    fn normalized_ignores_accents_and_punctuation() {
        let rules = table(&[(Tier::Exact, "Triskèle Celtique", "/triskele.svg")]);
        let r = explain_name("triskele-celtique!", &rules);
        assert_eq!(r.tier, MatchTier::Rule(Tier::Normalized));
        assert_eq!(r.reference, local("/triskele.svg"));
    }

    #[test]
    fn normalized_scans_every_tier() {
        let rules = table(&[(Tier::CategoryKeyword, "Dragón", "/dragon.svg")]);
        let r = explain_name("DRAGON", &rules);
        assert_eq!(r.tier, MatchTier::Rule(Tier::Normalized));
    }

    #[test]
    fn partial_word_matches_word_inside_pattern() {
        let rules = table(&[(Tier::PartialWord, "Arbre de vie", "/tree.svg")]);
        let r = explain_name("Grand arbre sacré", &rules);
        assert_eq!(r.tier, MatchTier::Rule(Tier::PartialWord));
        assert_eq!(r.pattern.as_deref(), Some("Arbre de vie"));
    }

    #[test]
    fn partial_word_matches_pattern_inside_word() {
        let rules = table(&[(Tier::PartialWord, "Lotus", "/lotus.svg")]);
        let r = explain_name("White-Lotuses", &rules);
        assert_eq!(r.tier, MatchTier::Rule(Tier::PartialWord));
    }

    #[test]
    fn partial_word_matches_short_pattern_inside_word() {
        let rules = table(&[(Tier::PartialWord, "Ra", "/ra.svg")]);
        let r = explain_name("Aura", &rules);
        assert_eq!(r.tier, MatchTier::Rule(Tier::PartialWord));
        assert_eq!(r.reference, local("/ra.svg"));
    }

    #[test]
    fn partial_word_skips_short_request_words() {
        let rules = table(&[(Tier::PartialWord, "Ra", "/ra.svg")]);
        // "ra" and "of" are too short to count as request words.
        let r = explain_name("Ra of Egypt", &rules);
        assert_ne!(r.tier, MatchTier::Rule(Tier::PartialWord));
    }

    #[test]
    fn partial_word_first_rule_in_table_order_wins() {
        let rules = table(&[
            (Tier::Exact, "Sun Disc", "/disc.svg"),
            (Tier::PartialWord, "Sun Wheel", "/wheel.svg"),
        ]);
        let r = explain_name("Sun Totem", &rules);
        assert_eq!(r.reference, local("/disc.svg"));
    }

    #[test]
    fn keyword_expands_synonyms() {
        let rules = table(&[(Tier::Keyword, "croix", "/cross.svg")]);
        let r = explain_name("Celtic Cross", &rules);
        assert_eq!(r.tier, MatchTier::Rule(Tier::Keyword));
        assert_eq!(r.reference, local("/cross.svg"));
    }

    #[test]
    fn keyword_skips_stop_words() {
        let rules = table(&[(Tier::Keyword, "symbolism", "/sym.svg")]);
        let r = explain_name("Symbol", &rules);
        assert_eq!(r.tier, MatchTier::LastResort);
    }

    #[test]
    fn category_fallback_tries_hint_verbatim() {
        let rules = table(&[(Tier::CategoryFallback, "Celtique", "/celtic.svg")]);
        let r = explain(&MatchRequest::new("Unknown Glyph").category("Celtique"), &rules);
        assert_eq!(r.tier, MatchTier::Rule(Tier::CategoryFallback));
    }

    #[test]
    fn category_fallback_uses_suffix_variants() {
        let rules = table(&[(Tier::CategoryFallback, "Egypt", "/egypt.svg")]);
        let r = explain(&MatchRequest::new("Unknown Glyph").category("Égyptienne"), &rules);
        assert_eq!(r.reference, local("/egypt.svg"));
    }

    #[test]
    fn category_fallback_is_candidate_major() {
        // "celtique" (the hint itself) must beat "celti" (a stripped variant),
        // even though the stem rule comes first in the table.
        let rules = table(&[
            (Tier::CategoryFallback, "Celti", "/stem.svg"),
            (Tier::CategoryFallback, "Celtique", "/full.svg"),
        ]);
        let r = explain(&MatchRequest::new("Unknown Glyph").category("celtique"), &rules);
        assert_eq!(r.reference, local("/full.svg"));
    }

    #[test]
    fn category_keyword_searches_inside_name() {
        let rules = table(&[
            (Tier::CategoryKeyword, "temple", "/temple.svg"),
            (Tier::CategoryKeyword, "dragon", "/dragon.svg"),
        ]);
        let r = explain_name("Sacred Dragon Mark", &rules);
        assert_eq!(r.tier, MatchTier::Rule(Tier::CategoryKeyword));
        assert_eq!(r.reference, local("/dragon.svg"));
    }

    #[test]
    fn last_resort_by_shape() {
        let rules = RuleTable::new();
        let fallback = LastResort::default();
        assert_eq!(explain_name("", &rules).reference, fallback.default);
        assert_eq!(explain_name("?!", &rules).reference, fallback.default);
        assert_eq!(explain_name("Xi", &rules).reference, fallback.short_name);
        assert_eq!(explain_name("Unknown Glyph", &rules).reference, fallback.multi_word);
        assert_eq!(explain_name("Zzyzx", &rules).reference, fallback.default);
    }

    #[test]
    fn last_resort_guards_blank_locations() {
        let fallback = LastResort {
            multi_word: local(""),
            ..LastResort::default()
        };
        let r = last_resort("two words", &fallback);
        assert!(!r.reference.location.is_empty());
    }
}
