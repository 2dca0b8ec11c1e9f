//! Translations for page copy
//!
//! English and Indonesian tables are built in. A site can override or add
//! languages with `languages/<lang>.yml` files next to `_config.yml`.
//! Lookups use dotted keys (`blog.read_more`); templates get the same
//! strings flattened with `_` (`t.blog_read_more`).

use anyhow::Result;
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Language every lookup falls back to
pub const FALLBACK_LANGUAGE: &str = "en";

const BUILTIN: [(&str, &str); 2] = [("en", include_str!("en.yml")), ("id", include_str!("id.yml"))];

/// Translation tables plus the site language
#[derive(Debug, Clone)]
pub struct I18n {
    language: String,
    tables: HashMap<String, Mapping>,
}

impl I18n {
    /// Handler with no tables; every lookup returns its key
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
            tables: HashMap::new(),
        }
    }

    pub fn with_builtin(language: &str) -> Result<Self> {
        let mut i18n = Self::new(language);
        for (lang, raw) in BUILTIN {
            i18n.merge(lang, serde_yaml::from_str(raw)?);
        }
        Ok(i18n)
    }

    /// Merge every `*.yml`/`*.yaml` in `dir` over the loaded tables
    ///
    /// A missing directory is fine. A file that fails to parse is skipped
    /// with a warning.
    pub fn load_languages<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_yaml = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yml" | "yaml")
            );
            let lang = path.file_stem().and_then(|s| s.to_str());
            let Some(lang) = lang.filter(|_| is_yaml && path.is_file()) else {
                continue;
            };

            match serde_yaml::from_str::<Mapping>(&fs::read_to_string(&path)?) {
                Ok(table) => {
                    self.merge(lang, table);
                    tracing::debug!("Loaded translations for {:?} from {:?}", lang, path);
                }
                Err(e) => tracing::warn!("Skipping language file {:?}: {}", path, e),
            }
        }

        Ok(())
    }

    fn merge(&mut self, lang: &str, table: Mapping) {
        let target = self.tables.entry(lang.to_string()).or_default();
        deep_merge(target, table);
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Translation for `key` in the site language
    pub fn get(&self, key: &str) -> String {
        self.get_for_lang(&self.language, key)
    }

    /// Translation for `key` in `lang`, then English, then the key itself
    pub fn get_for_lang(&self, lang: &str, key: &str) -> String {
        [lang, FALLBACK_LANGUAGE]
            .iter()
            .filter_map(|l| self.tables.get(*l))
            .find_map(|table| lookup(table, key))
            .map_or_else(|| key.to_string(), |v| text(v).unwrap_or_default())
    }

    /// Translation with `%d` replaced by `count`
    pub fn get_count(&self, key: &str, count: usize) -> String {
        self.get(key).replace("%d", &count.to_string())
    }

    /// Whether the site language defines `key` itself
    pub fn has(&self, key: &str) -> bool {
        self.tables
            .get(&self.language)
            .and_then(|table| lookup(table, key))
            .and_then(text)
            .is_some()
    }

    /// Every string of the site language, English filling the gaps,
    /// keyed `section_name`
    pub fn get_all_translations(&self) -> HashMap<String, String> {
        let mut out = HashMap::new();
        for lang in [self.language.as_str(), FALLBACK_LANGUAGE] {
            if let Some(table) = self.tables.get(lang) {
                flatten_into(table, None, &mut out);
            }
        }
        out
    }
}

fn deep_merge(target: &mut Mapping, source: Mapping) {
    for (key, value) in source {
        match value {
            Value::Mapping(nested) if target.get(&key).is_some_and(Value::is_mapping) => {
                if let Some(Value::Mapping(existing)) = target.get_mut(&key) {
                    deep_merge(existing, nested);
                }
            }
            value => {
                target.insert(key, value);
            }
        }
    }
}

fn lookup<'a>(table: &'a Mapping, key: &str) -> Option<&'a Value> {
    let mut parts = key.split('.');
    let first = table.get(parts.next()?)?;
    parts.try_fold(first, |value, part| value.as_mapping()?.get(part))
}

/// Scalar as display text; mappings and sequences have none
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

/// Insert `_`-joined keys; keys already present win
fn flatten_into(table: &Mapping, prefix: Option<&str>, out: &mut HashMap<String, String>) {
    for (key, value) in table {
        let Some(key) = key.as_str() else { continue };
        let key = match prefix {
            Some(prefix) => format!("{}_{}", prefix, key),
            None => key.to_string(),
        };

        if let Value::Mapping(nested) = value {
            flatten_into(nested, Some(&key), out);
        } else if let Some(s) = text(value) {
            out.entry(key).or_insert(s);
        }
    }
}
