//! Category hint variants.
//!
//! A hint like "Japanese" has to reach a table written as "Japonaise",
//! and "Celtique" has to reach "Celtic" or "Celtiq". Candidates are
//! generated in a fixed order so the first hit is deterministic.

use crate::normalize::normalize;
use crate::rules::lexicon::{CATEGORY_SUFFIXES, translations_of};

/// Minimum length (in chars) a stem must keep after suffix stripping.
const MIN_STEM_CHARS: usize = 3;

/// Morphological variants of a canonical category name, excluding the
/// name itself: trailing "e" stripped, then one known suffix stripped.
pub fn morphological_variants(canonical: &str) -> Vec<String> {
    let mut variants = Vec::new();
    if let Some(stem) = strip(canonical, "e") {
        variants.push(stem.to_string());
    }
    for suffix in CATEGORY_SUFFIXES {
        if let Some(stem) = strip(canonical, suffix) {
            variants.push(stem.to_string());
            break;
        }
    }
    variants.dedup();
    variants
}

/// Canonical comparison candidates for a hint, in trial order:
/// the canonical hint, its demonym translations, then the morphological
/// variants of each of those. Duplicates are removed, first one wins.
pub fn hint_candidates(hint: &str) -> Vec<String> {
    let canonical = normalize(hint);
    if canonical.is_empty() {
        return Vec::new();
    }

    let mut bases = vec![canonical.clone()];
    bases.extend(translations_of(&canonical).map(str::to_string));

    let mut candidates: Vec<String> = Vec::new();
    let mut add = |c: String| {
        if !candidates.contains(&c) {
            candidates.push(c);
        }
    };
    for base in &bases {
        add(base.clone());
    }
    for base in &bases {
        for variant in morphological_variants(base) {
            add(variant);
        }
    }
    candidates
}

/// Comparison forms of a canonical category pattern: itself plus its
/// morphological variants.
pub fn pattern_forms(canonical: &str) -> Vec<String> {
    let mut forms = vec![canonical.to_string()];
    forms.extend(morphological_variants(canonical));
    forms
}

fn strip<'a>(word: &'a str, suffix: &str) -> Option<&'a str> {
    let stem = word.strip_suffix(suffix)?;
    (stem.chars().count() >= MIN_STEM_CHARS).then_some(stem)
}
