use serde::{Deserialize, Serialize};

/// Display language for locale-aware fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

/// Picks the localized override only for Arabic and only when it is present
/// and non-empty; otherwise the default value.
pub fn localized<'a>(default: &'a str, localized: Option<&'a str>, locale: Locale) -> &'a str {
    match (locale, localized) {
        (Locale::Ar, Some(value)) if !value.is_empty() => value,
        _ => default,
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    #[serde(default)]
    pub lang: Locale,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arabic_uses_override() {
        assert_eq!(localized("Hotels", Some("فنادق"), Locale::Ar), "فنادق");
    }

    #[test]
    fn test_arabic_without_override_falls_back() {
        assert_eq!(localized("Hotels", None, Locale::Ar), "Hotels");
        assert_eq!(localized("Hotels", Some(""), Locale::Ar), "Hotels");
    }

    #[test]
    fn test_english_ignores_override() {
        assert_eq!(localized("Hotels", Some("فنادق"), Locale::En), "Hotels");
    }

    #[test]
    fn test_lang_query_parses_lowercase() {
        let q: LangQuery = serde_json::from_str(r#"{"lang":"ar"}"#).unwrap();
        assert_eq!(q.lang, Locale::Ar);
        let q: LangQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.lang, Locale::En);
    }
}
