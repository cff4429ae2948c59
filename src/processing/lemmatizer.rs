//! Rule-based English lemmatizer
//!
//! Reduces inflected nouns and verbs to a dictionary base form
//! (`studies` -> `study`, `running` -> `run`, `managed` -> `manage`) using an
//! irregular-form table, a list of words that only look inflected, and suffix
//! rules that restore the silent `e` or undo consonant doubling. Comparatives
//! and other derivational forms are left alone.
//!
//! `lemmatize` is idempotent: a rewrite is only accepted when its result is
//! itself a fixed point of the rules.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

static SHARED: Lazy<Lemmatizer> = Lazy::new(Lemmatizer::new);

const IRREGULAR_FORMS: &[(&str, &str)] = &[
    ("apis", "api"),
    ("analyses", "analysis"),
    ("bases", "basis"),
    ("caches", "cache"),
    ("niches", "niche"),
    ("movies", "movie"),
    ("cookies", "cookie"),
    ("goes", "go"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("lives", "life"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("ran", "run"),
    ("led", "lead"),
    ("built", "build"),
    ("wrote", "write"),
    ("written", "write"),
    ("taught", "teach"),
    ("bought", "buy"),
    ("brought", "bring"),
    ("thought", "think"),
    ("sought", "seek"),
    ("made", "make"),
    ("went", "go"),
    ("gone", "go"),
    ("began", "begin"),
    ("begun", "begin"),
    ("knew", "know"),
    ("known", "know"),
    ("grew", "grow"),
    ("grown", "grow"),
    ("held", "hold"),
    ("spoke", "speak"),
    ("spoken", "speak"),
    ("chose", "choose"),
    ("chosen", "choose"),
    ("drove", "drive"),
    ("driven", "drive"),
    ("took", "take"),
    ("taken", "take"),
    ("gave", "give"),
    ("given", "give"),
    ("felt", "feel"),
    ("kept", "keep"),
    ("met", "meet"),
    ("paid", "pay"),
    ("sent", "send"),
    ("spent", "spend"),
    ("lost", "lose"),
    ("oversaw", "oversee"),
    ("overseen", "oversee"),
    ("understood", "understand"),
    ("undertook", "undertake"),
    ("undertaken", "undertake"),
];

/// Words whose endings look like inflections but are base forms
const INVARIANT_WORDS: &[&str] = &[
    "this", "has", "was", "does", "always", "perhaps", "news", "series", "species",
    "physics", "mathematics", "statistics", "economics", "analytics", "graphics",
    "robotics", "ethics", "logistics", "electronics", "linguistics", "kubernetes",
    "jenkins", "pandas", "rails", "devops", "macos", "sass", "less", "express",
    "thing", "something", "nothing", "anything", "everything", "morning", "evening",
    "ceiling", "during", "string", "spring", "embed", "hundred", "bias", "alias",
    "canvas", "atlas", "plus", "minus", "bonus", "lens", "wireless", "sales",
];

/// Verb stems that need a restored `e` but escape the general rules
const STEMS_NEEDING_E: &[&str] = &["creat", "restor", "ignor", "explor", "ador"];

pub struct Lemmatizer {
    irregular: HashMap<&'static str, &'static str>,
    invariant: HashSet<&'static str>,
    stems_needing_e: HashSet<&'static str>,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lemmatizer {
    pub fn new() -> Self {
        Self {
            irregular: IRREGULAR_FORMS.iter().copied().collect(),
            invariant: INVARIANT_WORDS.iter().copied().collect(),
            stems_needing_e: STEMS_NEEDING_E.iter().copied().collect(),
        }
    }

    /// Process-wide instance; its tables are never mutated
    pub fn shared() -> &'static Lemmatizer {
        &SHARED
    }

    /// Base form of a lowercase word. Tokens that are not purely alphabetic
    /// (numbers, `node.js`, `c++`) are returned unchanged.
    pub fn lemmatize(&self, word: &str) -> String {
        let lemma = self.apply_rules(word);
        if lemma == word || self.apply_rules(&lemma) == lemma {
            lemma
        } else {
            word.to_string()
        }
    }

    fn apply_rules(&self, word: &str) -> String {
        if let Some(base) = self.irregular.get(word) {
            return (*base).to_string();
        }
        if word.len() <= 3
            || !word.chars().all(|c| c.is_ascii_lowercase())
            || self.invariant.contains(word)
        {
            return word.to_string();
        }

        if word.ends_with('s') {
            return Self::strip_plural(word);
        }
        if word.ends_with("eed") {
            return word.to_string();
        }
        if word.ends_with("ied") {
            return if word.len() > 4 {
                format!("{}y", &word[..word.len() - 3])
            } else {
                word[..word.len() - 1].to_string()
            };
        }
        if let Some(stem) = word.strip_suffix("ed").or_else(|| word.strip_suffix("ing")) {
            if stem.len() >= 2 && has_vowel(stem) {
                return self.restore_stem(stem);
            }
        }

        word.to_string()
    }

    fn strip_plural(word: &str) -> String {
        if word.ends_with("ies") && word.len() > 4 {
            return format!("{}y", &word[..word.len() - 3]);
        }
        if ["sses", "xes", "ches", "shes", "zzes"].iter().any(|suffix| word.ends_with(suffix)) {
            return word[..word.len() - 2].to_string();
        }
        if ["ss", "us", "is"].iter().any(|suffix| word.ends_with(suffix)) {
            return word.to_string();
        }
        word[..word.len() - 1].to_string()
    }

    /// Turn the stem left by removing `-ed`/`-ing` back into a base form
    fn restore_stem(&self, stem: &str) -> String {
        let bytes = stem.as_bytes();
        let last = bytes[bytes.len() - 1];
        let before_last = bytes[bytes.len() - 2];

        // running -> run, planned -> plan; skilled, passed and buzzed keep the pair
        if last == before_last && is_consonant(bytes, bytes.len() - 1) && !b"lsz".contains(&last) {
            if stem.len() > 3 {
                return stem[..stem.len() - 1].to_string();
            }
            return stem.to_string();
        }

        if self.stems_needing_e.contains(stem) || needs_silent_e(stem) {
            return format!("{}e", stem);
        }

        stem.to_string()
    }
}

fn needs_silent_e(stem: &str) -> bool {
    let bytes = stem.as_bytes();
    let n = bytes.len();
    let last = bytes[n - 1];
    let before_last = bytes[n - 2];

    if stem.ends_with("bl") || stem.ends_with("iz") || stem.ends_with("yz") {
        return true;
    }
    match last {
        b'v' | b'u' => return true,
        // automat-e, negotiat-e, evaluat-e; treat and float stay
        b't' if before_last == b'a' => return n < 3 || !b"eo".contains(&bytes[n - 3]),
        b'c' => return is_vowel_byte(before_last) || b"nr".contains(&before_last),
        b'g' => {
            return before_last == b'a'
                || before_last == b'd'
                || before_last == b'r'
                || stem.ends_with("eng")
                || (stem.ends_with("ang") && n >= 5)
        }
        b'z' => return before_last != b'z',
        b's' => {
            if before_last == b's' {
                return false;
            }
            // focus and status keep their bare form
            if before_last == b'u' && n > 2 && !is_vowel_byte(bytes[n - 3]) {
                return false;
            }
            return true;
        }
        b'r' => {
            if stem.ends_with("ir") {
                return true;
            }
            if stem.ends_with("ur") {
                return !stem.ends_with("our");
            }
            if stem.ends_with("ar") {
                return !stem.ends_with("ear") && !stem.ends_with("oar");
            }
            if stem.ends_with("or") {
                return measure(stem) == 1;
            }
            return false;
        }
        _ => {}
    }

    // Short consonant-vowel-consonant stems: mak-e, cod-e, writ-e
    measure(stem) == 1 && ends_cvc(bytes)
}

fn is_vowel_byte(b: u8) -> bool {
    b"aeiou".contains(&b)
}

/// `y` counts as a vowel after a consonant
fn is_consonant(bytes: &[u8], i: usize) -> bool {
    match bytes[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => i == 0 || !is_consonant(bytes, i - 1),
        _ => true,
    }
}

fn has_vowel(stem: &str) -> bool {
    let bytes = stem.as_bytes();
    (0..bytes.len()).any(|i| !is_consonant(bytes, i))
}

/// Number of vowel-consonant sequences in the stem
fn measure(stem: &str) -> usize {
    let bytes = stem.as_bytes();
    let mut count = 0;
    let mut previous_vowel = false;
    for i in 0..bytes.len() {
        let consonant = is_consonant(bytes, i);
        if consonant && previous_vowel {
            count += 1;
        }
        previous_vowel = !consonant;
    }
    count
}

fn ends_cvc(bytes: &[u8]) -> bool {
    let n = bytes.len();
    n >= 3
        && is_consonant(bytes, n - 3)
        && !is_consonant(bytes, n - 2)
        && is_consonant(bytes, n - 1)
        && !b"wxy".contains(&bytes[n - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lemma(word: &str) -> String {
        Lemmatizer::shared().lemmatize(word)
    }

    #[test]
    fn test_plural_nouns() {
        assert_eq!(lemma("studies"), "study");
        assert_eq!(lemma("skills"), "skill");
        assert_eq!(lemma("databases"), "database");
        assert_eq!(lemma("processes"), "process");
        assert_eq!(lemma("matches"), "match");
        assert_eq!(lemma("apis"), "api");
        assert_eq!(lemma("technologies"), "technology");
    }

    #[test]
    fn test_words_that_only_look_plural() {
        assert_eq!(lemma("business"), "business");
        assert_eq!(lemma("status"), "status");
        assert_eq!(lemma("analysis"), "analysis");
        assert_eq!(lemma("kubernetes"), "kubernetes");
        assert_eq!(lemma("aws"), "aws");
    }

    #[test]
    fn test_verb_forms() {
        assert_eq!(lemma("running"), "run");
        assert_eq!(lemma("planned"), "plan");
        assert_eq!(lemma("skilled"), "skill");
        assert_eq!(lemma("testing"), "test");
        assert_eq!(lemma("developing"), "develop");
        assert_eq!(lemma("studied"), "study");
        assert_eq!(lemma("adding"), "add");
    }

    #[test]
    fn test_silent_e_restoration() {
        assert_eq!(lemma("experienced"), "experience");
        assert_eq!(lemma("managed"), "manage");
        assert_eq!(lemma("making"), "make");
        assert_eq!(lemma("used"), "use");
        assert_eq!(lemma("automated"), "automate");
        assert_eq!(lemma("optimizing"), "optimize");
        assert_eq!(lemma("solving"), "solve");
        assert_eq!(lemma("coded"), "code");
        assert_eq!(lemma("created"), "create");
        assert_eq!(lemma("required"), "require");
        assert_eq!(lemma("secured"), "secure");
    }

    #[test]
    fn test_no_spurious_e() {
        assert_eq!(lemma("opened"), "open");
        assert_eq!(lemma("focused"), "focus");
        assert_eq!(lemma("treated"), "treat");
        assert_eq!(lemma("mentored"), "mentor");
        assert_eq!(lemma("engineered"), "engineer");
        assert_eq!(lemma("hosted"), "host");
    }

    #[test]
    fn test_irregular_forms() {
        assert_eq!(lemma("built"), "build");
        assert_eq!(lemma("led"), "lead");
        assert_eq!(lemma("children"), "child");
    }

    #[test]
    fn test_non_alphabetic_tokens_untouched() {
        assert_eq!(lemma("node.js"), "node.js");
        assert_eq!(lemma("2020s"), "2020s");
        assert_eq!(lemma("c++"), "c++");
    }

    #[test]
    fn test_idempotent() {
        let words = [
            "embedded", "running", "studies", "managed", "exceeded", "configured",
            "something", "agreed", "ties", "caching", "changing", "boxes", "used",
        ];
        for word in words {
            let once = lemma(word);
            assert_eq!(lemma(&once), once, "lemma of {} is not stable", word);
        }
    }
}
