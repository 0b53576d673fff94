//! Template placeholder detection and substitution.
//!
//! WhatsApp templates mark variables as `{{1}}`, `{{2}}`, ... The keys are
//! kept as the literal digit strings found in the text so they can be sent
//! back to the backend exactly as written.

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashMap;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(\d+)\}\}").expect("Invalid regex"));

/// Compares two digit strings by numeric value without parsing them.
fn numeric_cmp(a: &str, b: &str) -> Ordering {
    let a_trim = a.trim_start_matches('0');
    let b_trim = b.trim_start_matches('0');
    a_trim
        .len()
        .cmp(&b_trim.len())
        .then_with(|| a_trim.cmp(b_trim))
        .then_with(|| a.cmp(b))
}

/// Returns the distinct placeholder keys in `text`, ascending numerically.
///
/// ```
/// use varta_core::extract_placeholder_keys;
///
/// assert_eq!(extract_placeholder_keys("{{2}} and {{1}} and {{2}}"), vec!["1", "2"]);
/// ```
#[must_use]
pub fn extract_placeholder_keys(text: &str) -> Vec<String> {
    let mut keys: Vec<String> = PLACEHOLDER
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect();
    keys.sort_by(|a, b| numeric_cmp(a, b));
    keys.dedup();
    keys
}

/// The sample used for `key` when the operator has not supplied one.
#[must_use]
pub fn default_sample(key: &str) -> String {
    format!("sample_{key}")
}

/// Replaces every `{{key}}` in `text` with its sample value.
///
/// Keys without a non-empty sample fall back to [`default_sample`].
#[must_use]
pub fn render_placeholders(text: &str, samples: &SampleValues) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &regex::Captures<'_>| samples.value_or_default(&caps[1]))
        .into_owned()
}

/// Like [`render_placeholders`], but only for the listed `keys`.
///
/// Any other `{{n}}` is left as written.
#[must_use]
pub fn render_keys(text: &str, keys: &[String], samples: &SampleValues) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &regex::Captures<'_>| {
            if keys.iter().any(|k| k == &caps[1]) {
                samples.value_or_default(&caps[1])
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Per-key sample values kept in step with the detected placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleValues {
    values: HashMap<String, String>,
}

impl SampleValues {
    /// Creates an empty set of samples.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-keys the samples to exactly `keys`.
    ///
    /// Existing values are kept, new keys get [`default_sample`], and keys
    /// no longer present are dropped.
    pub fn sync(&mut self, keys: &[String]) {
        let mut next = HashMap::with_capacity(keys.len());
        for key in keys {
            let value = self
                .values
                .remove(key)
                .unwrap_or_else(|| default_sample(key));
            next.insert(key.clone(), value);
        }
        self.values = next;
    }

    /// Sets the sample for `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// The stored sample for `key`, possibly empty.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// The sample for `key`, or its default when missing or empty.
    #[must_use]
    pub fn value_or_default(&self, key: &str) -> String {
        match self.values.get(key) {
            Some(v) if !v.is_empty() => v.clone(),
            _ => default_sample(key),
        }
    }

    /// Samples for `keys` in the given order, defaults filled in.
    #[must_use]
    pub fn ordered(&self, keys: &[String]) -> Vec<String> {
        keys.iter().map(|k| self.value_or_default(k)).collect()
    }

    /// Removes all samples.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Number of keys tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no keys are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
