//! Name normalization.
//!
//! [`normalize`] reduces a raw name to the canonical form every
//! non-verbatim comparison runs on: lowercase, no diacritics, ligatures
//! spelled out, punctuation replaced by single spaces, trimmed.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Minimum length (in chars) of a word considered by word-level matching.
pub const MIN_WORD_CHARS: usize = 3;

/// Canonical comparison form of `raw`.
///
/// Pure, total and idempotent:
///
/// ```rust
/// # use sigil::normalize;
/// assert_eq!(normalize("  Triskèle — Celtique!! "), "triskele celtique");
/// assert_eq!(normalize(&normalize("Fleur-de-Lys")), normalize("Fleur-de-Lys"));
/// ```
pub fn normalize(raw: &str) -> String {
    // Lowercase first: some uppercase letters lowercase into a base letter
    // plus a combining mark (e.g. U+0130), which the decomposition drops.
    let lowered = raw.to_lowercase();
    let mut unfolded = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        match spell_ligature(ch) {
            Some(letters) => unfolded.push_str(letters),
            None => unfolded.push(ch),
        }
    }
    let mut out = String::with_capacity(unfolded.len());
    let mut pending_space = false;
    for ch in unfolded.nfd().filter(|c| !is_combining_mark(*c)) {
        if ch.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else {
            pending_space = true;
        }
    }
    out
}

/// Plain spelling of a lowercase ligature. Canonical decomposition leaves
/// these intact, so "nœud" and "noeud" would otherwise never compare equal.
fn spell_ligature(ch: char) -> Option<&'static str> {
    let letters = match ch {
        'œ' => "oe",
        'æ' => "ae",
        'ß' => "ss",
        'ĳ' => "ij",
        'ﬀ' => "ff",
        'ﬁ' => "fi",
        'ﬂ' => "fl",
        'ﬃ' => "ffi",
        'ﬄ' => "ffl",
        _ => return None,
    };
    Some(letters)
}

/// Words of a canonical string that are long enough to match on.
pub fn significant_words(canonical: &str) -> impl Iterator<Item = &str> {
    canonical
        .split(' ')
        .filter(|w| w.chars().count() >= MIN_WORD_CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_diacritics() {
        assert_eq!(normalize("Triskèle Celtique"), "triskele celtique");
        assert_eq!(normalize("ÉGYPTIENNE"), "egyptienne");
        assert_eq!(normalize("Ñandú"), "nandu");
    }

    #[test]
    fn punctuation_becomes_single_space() {
        assert_eq!(normalize("Fleur-de-Lys"), "fleur de lys");
        assert_eq!(normalize("yin_yang"), "yin yang");
        assert_eq!(normalize("l'arbre   de   vie"), "l arbre de vie");
        assert_eq!(normalize("Eye of Horus (Wadjet)"), "eye of horus wadjet");
    }

    #[test]
    fn trims_leading_and_trailing_separators() {
        assert_eq!(normalize("  --ankh--  "), "ankh");
        assert_eq!(normalize("\t\nvegvisir\r\n"), "vegvisir");
    }

    #[test]
    fn empty_and_symbol_only_inputs_normalize_to_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("?!—…"), "");
    }

    #[test]
    fn keeps_non_latin_letters_and_digits() {
        assert_eq!(normalize("卍 Symbol 2"), "卍 symbol 2");
        assert_eq!(normalize("Ωmega"), "ωmega");
    }

    #[test]
    fn dotted_capital_i_folds_to_plain_i() {
        assert_eq!(normalize("İzmir"), "izmir");
    }

    #[test]
    fn ligatures_are_spelled_out() {
        assert_eq!(normalize("Œil d'Horus"), "oeil d horus");
        assert_eq!(normalize("Nœud sans fin"), normalize("Noeud sans fin"));
        assert_eq!(normalize("Ægishjálmur"), "aegishjalmur");
        assert_eq!(normalize("Straße"), "strasse");
        assert_eq!(normalize("ẞ"), "ss");
        assert_eq!(normalize("ﬁligree"), "filigree");
    }

    #[test]
    fn idempotent_over_varied_inputs() {
        let samples = [
            "",
            "Fleur de Lys",
            "  Triskèle — Celtique!! ",
            "İSTANBUL",
            "ǅemal",
            "Ångström ﬁ ligature",
            "Σίσυφος",
            "a--b__c  d",
            "卍",
            "Straße",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn significant_words_drop_short_tokens() {
        let words: Vec<_> = significant_words("eye of horus").collect();
        assert_eq!(words, vec!["eye", "horus"]);
        assert_eq!(significant_words("").count(), 0);
    }
}
