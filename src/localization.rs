use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

/// Looks up translated text by key.
pub trait LocalTextRegistry {
    fn try_get(&self, key: &str) -> Option<String>;
}

impl LocalTextRegistry for HashMap<String, String> {
    fn try_get(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Caption text of a field: either fixed text or a key resolved at display time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalText {
    Literal(String),
    Key(String),
}

impl LocalText {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    /// Text to display. An unknown key displays as itself.
    pub fn resolve(&self, registry: &dyn LocalTextRegistry) -> String {
        match self {
            Self::Literal(text) => text.clone(),
            Self::Key(key) => registry.try_get(key).unwrap_or_else(|| key.clone()),
        }
    }
}

impl fmt::Display for LocalText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => write!(f, "{}", text),
            Self::Key(key) => write!(f, "{}", key),
        }
    }
}

impl From<&str> for LocalText {
    fn from(text: &str) -> Self {
        Self::Literal(text.to_string())
    }
}

/// In-memory translations grouped by language, with a switchable current
/// language.
///
/// Lookups fall back from a regional language to its parent (`fr-CA` to
/// `fr`) and finally to the invariant language (`""`).
///
/// # Example
/// ```
/// use rowschema::localization::{LocalTextCatalog, LocalTextRegistry};
///
/// let catalog = LocalTextCatalog::new("en");
/// catalog.add("en", "Db.Invoice.Amount", "Amount");
/// catalog.add("fr", "Db.Invoice.Amount", "Montant");
///
/// assert_eq!(catalog.try_get("Db.Invoice.Amount").as_deref(), Some("Amount"));
/// catalog.set_language("fr-CA");
/// assert_eq!(catalog.try_get("Db.Invoice.Amount").as_deref(), Some("Montant"));
/// ```
#[derive(Debug, Default)]
pub struct LocalTextCatalog {
    language: RwLock<String>,
    texts: RwLock<HashMap<String, HashMap<String, String>>>,
}

impl LocalTextCatalog {
    pub fn new(language: &str) -> Self {
        Self {
            language: RwLock::new(language.to_string()),
            texts: RwLock::new(HashMap::new()),
        }
    }

    pub fn language(&self) -> String {
        match self.language.read() {
            Ok(language) => language.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Switch the current language; later lookups see the new texts.
    pub fn set_language(&self, language: &str) {
        let mut current = match self.language.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        tracing::debug!(from = current.as_str(), to = language, "switching local text language");
        *current = language.to_string();
    }

    pub fn add(&self, language: &str, key: impl Into<String>, text: impl Into<String>) {
        let mut texts = match self.texts.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        texts
            .entry(language.to_string())
            .or_default()
            .insert(key.into(), text.into());
    }

    pub fn get_in(&self, language: &str, key: &str) -> Option<String> {
        let texts = match self.texts.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let mut candidate = Some(language);
        while let Some(lang) = candidate {
            if let Some(text) = texts.get(lang).and_then(|t| t.get(key)) {
                return Some(text.clone());
            }
            candidate = parent_language(lang);
        }
        None
    }
}

fn parent_language(language: &str) -> Option<&str> {
    if language.is_empty() {
        return None;
    }
    match language.rfind('-') {
        Some(pos) => Some(&language[..pos]),
        None => Some(""),
    }
}

impl LocalTextRegistry for LocalTextCatalog {
    fn try_get(&self, key: &str) -> Option<String> {
        self.get_in(&self.language(), key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_ignores_registry() {
        let catalog = LocalTextCatalog::new("en");
        catalog.add("en", "Total", "Grand total");
        assert_eq!(LocalText::literal("Total").resolve(&catalog), "Total");
    }

    #[test]
    fn test_key_falls_back_to_itself() {
        let catalog = LocalTextCatalog::new("en");
        assert_eq!(LocalText::key("Site.Missing").resolve(&catalog), "Site.Missing");
    }

    #[test]
    fn test_language_fallback_chain() {
        let catalog = LocalTextCatalog::new("de-AT");
        catalog.add("", "Greeting", "Hello");
        catalog.add("de", "Farewell", "Tschüss");

        assert_eq!(catalog.try_get("Farewell").as_deref(), Some("Tschüss"));
        assert_eq!(catalog.try_get("Greeting").as_deref(), Some("Hello"));
        assert_eq!(catalog.try_get("Unknown"), None);
    }

    #[test]
    fn test_parent_language() {
        assert_eq!(parent_language("pt-BR"), Some("pt"));
        assert_eq!(parent_language("pt"), Some(""));
        assert_eq!(parent_language(""), None);
    }
}
