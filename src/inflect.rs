//! Singular/plural inflection of property and collection names.
//!
//! The compiler only asks for a plural or a singular form; linguistic
//! correctness is up to the [`Inflector`] implementation plugged in.

/// Turns names into their singular or plural form.
pub trait Inflector {
    fn pluralize(&self, word: &str) -> String;
    fn singularize(&self, word: &str) -> String;
}

/// Suffix-rule English inflector.
///
/// Both directions are idempotent: pluralizing a word that already ends in
/// `s` leaves it alone, and singularizing a word without a plural suffix
/// returns it unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishInflector;

const ES_SUFFIXES: &[&str] = &["ch", "sh", "x", "z"];
const NON_PLURAL_S_ENDINGS: &[&str] = &["ss", "us", "is"];

impl Inflector for EnglishInflector {
    fn pluralize(&self, word: &str) -> String {
        if word.is_empty() || word.ends_with('s') {
            return word.to_string();
        }
        if let Some(stem) = word.strip_suffix('y') {
            if !stem.ends_with(is_vowel) && !stem.is_empty() {
                return format!("{}ies", stem);
            }
        }
        if ES_SUFFIXES.iter().any(|s| word.ends_with(s)) {
            return format!("{}es", word);
        }
        format!("{}s", word)
    }

    fn singularize(&self, word: &str) -> String {
        if let Some(stem) = word.strip_suffix("ies") {
            if !stem.is_empty() {
                return format!("{}y", stem);
            }
        }
        if let Some(stem) = word.strip_suffix("es") {
            if ES_SUFFIXES.iter().any(|s| stem.ends_with(s)) || stem.ends_with("ss") {
                return stem.to_string();
            }
        }
        if NON_PLURAL_S_ENDINGS.iter().any(|s| word.ends_with(s)) {
            return word.to_string();
        }
        match word.strip_suffix('s') {
            Some(stem) if !stem.is_empty() => stem.to_string(),
            _ => word.to_string(),
        }
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pluralize_rules() {
        let inflector = EnglishInflector;
        assert_eq!(inflector.pluralize("author"), "authors");
        assert_eq!(inflector.pluralize("category"), "categories");
        assert_eq!(inflector.pluralize("day"), "days");
        assert_eq!(inflector.pluralize("box"), "boxes");
        assert_eq!(inflector.pluralize("branch"), "branches");
        assert_eq!(inflector.pluralize("authors"), "authors");
        assert_eq!(inflector.pluralize(""), "");
    }

    #[test]
    fn singularize_rules() {
        let inflector = EnglishInflector;
        assert_eq!(inflector.singularize("authors"), "author");
        assert_eq!(inflector.singularize("categories"), "category");
        assert_eq!(inflector.singularize("boxes"), "box");
        assert_eq!(inflector.singularize("addresses"), "address");
        assert_eq!(inflector.singularize("status"), "status");
        assert_eq!(inflector.singularize("address"), "address");
        assert_eq!(inflector.singularize("name"), "name");
    }

    #[test]
    fn inflection_is_idempotent() {
        let inflector = EnglishInflector;
        for word in ["author", "category", "box", "hasName", "status"] {
            let plural = inflector.pluralize(word);
            assert_eq!(inflector.pluralize(&plural), plural);
            let singular = inflector.singularize(word);
            assert_eq!(inflector.singularize(&singular), singular);
        }
    }
}
