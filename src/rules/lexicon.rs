//! Fixed lexicon used by the keyword and category steps.
//!
//! Unlike rule tables these lists are part of the matching algorithm and
//! are not loaded from configuration. All entries are in canonical
//! (normalized) form.

/// Words ignored when building the keyword set.
pub const STOP_WORDS: &[&str] = &[
    "the", "and", "with", "for", "from", "des", "les", "une", "aux", "del", "los", "las", "der",
    "die", "das", "und", "symbol", "symbole", "sign", "signe", "mark",
];

/// Synonym groups: when the trigger occurs in a canonical name, every
/// expansion is added to the keyword set.
pub const SYNONYMS: &[(&str, &[&str])] = &[
    ("cross", &["croix", "cruz", "kreuz", "crux"]),
    ("croix", &["cross", "cruz"]),
    ("cruz", &["cross", "croix"]),
    ("sun", &["soleil", "sol", "solar"]),
    ("soleil", &["sun", "solar"]),
    ("moon", &["lune", "luna", "lunar", "crescent"]),
    ("lune", &["moon", "luna", "croissant"]),
    ("star", &["etoile", "estrella", "stella"]),
    ("etoile", &["star", "estrella"]),
    ("tree", &["arbre", "arbol", "yggdrasil"]),
    ("arbre", &["tree", "arbol"]),
    ("eye", &["oeil", "ojo", "horus"]),
    ("oeil", &["eye", "ojo"]),
    ("knot", &["noeud", "nudo", "entrelac"]),
    ("noeud", &["knot", "nudo"]),
    ("snake", &["serpent", "serpiente", "ouroboros"]),
    ("serpent", &["snake", "serpiente"]),
    ("wheel", &["roue", "rueda", "chakra", "dharma"]),
    ("roue", &["wheel", "rueda"]),
    ("lotus", &["padma", "lotos"]),
    ("hand", &["main", "mano", "hamsa"]),
    ("lion", &["leon", "lowe"]),
    ("eagle", &["aigle", "aguila"]),
    ("bird", &["oiseau", "pajaro", "phoenix"]),
    ("fish", &["poisson", "pez", "ichthys"]),
    ("heart", &["coeur", "corazon"]),
    ("spiral", &["spirale", "triskele"]),
    ("spirale", &["spiral", "triskele"]),
];

/// Demonym translations between English and French category names.
///
/// Both directions are listed so either spelling of a hint reaches a
/// table written in the other language.
pub const DEMONYMS: &[(&str, &str)] = &[
    ("japanese", "japonaise"),
    ("chinese", "chinoise"),
    ("celtic", "celtique"),
    ("egyptian", "egyptienne"),
    ("greek", "grecque"),
    ("norse", "nordique"),
    ("nordic", "nordique"),
    ("viking", "viking"),
    ("african", "africaine"),
    ("indian", "indienne"),
    ("hindu", "hindoue"),
    ("aztec", "azteque"),
    ("mayan", "maya"),
    ("roman", "romaine"),
    ("persian", "persane"),
    ("tibetan", "tibetaine"),
    ("arabic", "arabe"),
    ("hebrew", "hebraique"),
    ("slavic", "slave"),
    ("aboriginal", "aborigene"),
    ("native american", "amerindienne"),
    ("polynesian", "polynesienne"),
    ("mesopotamian", "mesopotamienne"),
    ("christian", "chretienne"),
    ("buddhist", "bouddhiste"),
    ("islamic", "islamique"),
];

/// Suffixes stripped to form morphological variants of a category name,
/// tried longest first.
pub const CATEGORY_SUFFIXES: &[&str] = &["ienne", "aise", "que"];

/// Whether `word` is a stop word.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Expansions for every synonym group triggered by `canonical`.
pub fn synonyms_for(canonical: &str) -> impl Iterator<Item = &'static str> + '_ {
    SYNONYMS
        .iter()
        .filter(move |(trigger, _)| canonical.contains(trigger))
        .flat_map(|(_, expansions)| expansions.iter().copied())
}

/// Translations of a canonical demonym, in either direction.
pub fn translations_of(canonical: &str) -> impl Iterator<Item = &'static str> + '_ {
    DEMONYMS.iter().filter_map(move |(en, fr)| {
        if *en == canonical {
            Some(*fr)
        } else if *fr == canonical {
            Some(*en)
        } else {
            None
        }
    })
}
