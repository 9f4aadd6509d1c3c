//! Message lookup with culture fallback and caching.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::{MessageCollection, NO_CONTEXT};
use crate::locale::{CurrentCulture, resolve_culture};

/// Looks up message formats.
pub trait TranslationService {
    /// The format for `key` in `context`. `lang` of `None` means the
    /// current culture. Never fails: unknown keys yield a readable fallback.
    fn message_string(&self, lang: Option<&str>, key: &str, context: &str) -> String;
}

type CacheKey = (String, String, String);

/// Translation over in-memory [`MessageCollection`]s.
///
/// Lookups try the requested culture, then the first supported culture,
/// then fall back to the sentence-cased key (`firstName` becomes
/// `First name`). Results are cached per `(culture, context, key)`; the
/// cache is dropped whenever the tracked culture changes.
pub struct DefaultTranslationService {
    cultures: Vec<String>,
    messages: HashMap<CacheKey, String>,
    current: Option<Rc<CurrentCulture>>,
    cache: Rc<RefCell<HashMap<CacheKey, String>>>,
}

impl DefaultTranslationService {
    /// A service over the given cultures (the first one is the fallback)
    /// and message collections. Later collections override earlier ones.
    pub fn new(cultures: &[&str], collections: impl IntoIterator<Item = MessageCollection>) -> Self {
        let cultures: Vec<String> = cultures.iter().map(|c| c.to_string()).collect();
        let mut messages = HashMap::new();
        for collection in collections {
            let lang = resolve_culture(&cultures, &collection.lang)
                .unwrap_or(collection.lang.as_str())
                .to_string();
            let context = if collection.context.is_empty() {
                NO_CONTEXT.to_string()
            } else {
                collection.context.clone()
            };
            for (key, format) in collection.messages {
                messages.insert((lang.clone(), context.clone(), key), format);
            }
        }
        Self {
            cultures,
            messages,
            current: None,
            cache: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// A service with the built-in validation messages registered for the
    /// fallback culture, followed by `collections`.
    pub fn with_default_messages(
        cultures: &[&str],
        collections: impl IntoIterator<Item = MessageCollection>,
    ) -> Self {
        let fallback = cultures.first().copied().unwrap_or("en");
        let defaults = std::iter::once(MessageCollection::default_validation(fallback));
        Self::new(cultures, defaults.chain(collections))
    }

    /// Track a current culture: `None` lookups use it, and changes to it
    /// invalidate the cache.
    pub fn track_culture(mut self, culture: Rc<CurrentCulture>) -> Self {
        let cache = Rc::downgrade(&self.cache);
        culture.subscribe(move |_| {
            if let Some(cache) = cache.upgrade() {
                cache.borrow_mut().clear();
            }
        });
        self.current = Some(culture);
        self
    }

    /// Supported culture names; the first is the fallback.
    pub fn cultures(&self) -> &[String] {
        &self.cultures
    }

    /// Drop all cached lookups.
    pub fn invalidate(&self) {
        self.cache.borrow_mut().clear();
    }

    /// Number of cached lookups.
    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }

    fn supported(&self, lang: &str) -> String {
        resolve_culture(&self.cultures, lang)
            .unwrap_or(lang)
            .to_string()
    }

    fn lookup(&self, lang: &str, key: &str, context: &str) -> String {
        let lookup_key = (lang.to_string(), context.to_string(), key.to_string());
        if let Some(format) = self.messages.get(&lookup_key) {
            return format.clone();
        }
        match self.cultures.first() {
            Some(fallback) if fallback != lang => self.lookup(fallback, key, context),
            _ => sentence_case(key),
        }
    }
}

impl TranslationService for DefaultTranslationService {
    fn message_string(&self, lang: Option<&str>, key: &str, context: &str) -> String {
        let requested = match (lang, &self.current) {
            (Some(lang), _) if !lang.is_empty() => lang.to_string(),
            (_, Some(current)) => current.get(),
            _ => self.cultures.first().cloned().unwrap_or_default(),
        };
        let lang = self.supported(&requested);
        let cache_key = (lang.clone(), context.to_string(), key.to_string());
        if let Some(hit) = self.cache.borrow().get(&cache_key) {
            return hit.clone();
        }
        let format = self.lookup(&lang, key, context);
        tracing::trace!(%lang, context, key, "Translation cache miss");
        self.cache.borrow_mut().insert(cache_key, format.clone());
        format
    }
}

impl fmt::Debug for DefaultTranslationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultTranslationService")
            .field("cultures", &self.cultures)
            .field("messages", &self.messages.len())
            .field("cached", &self.cached_len())
            .finish()
    }
}

/// Turn an identifier into a sentence: `emailAddress` becomes
/// `Email address`, `postal_code` becomes `Postal code`.
pub fn sentence_case(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut word = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !word.is_empty() {
                words.push(std::mem::take(&mut word));
            }
            continue;
        }
        let prev = i.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(i + 1).copied();
        let boundary = c.is_uppercase()
            && match prev {
                Some(p) if p.is_lowercase() || p.is_numeric() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                _ => false,
            };
        if boundary && !word.is_empty() {
            words.push(std::mem::take(&mut word));
        }
        word.push(c);
    }
    if !word.is_empty() {
        words.push(word);
    }

    let sentence = words
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    let mut out = sentence.chars();
    match out.next() {
        Some(first) => first.to_uppercase().chain(out).collect(),
        None => String::new(),
    }
}
