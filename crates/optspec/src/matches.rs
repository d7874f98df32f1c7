use indexmap::IndexMap;
use serde::Serialize;

/// Values collected by one call to [`Registry::parse`](crate::Registry::parse).
///
/// Values are keyed by canonical option name; names appear in the order they
/// were first seen and each name's values keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Matches {
    values: IndexMap<String, Vec<String>>,
    positionals: Vec<String>,
    consumed: Vec<usize>,
}

impl Matches {
    /// Whether the option was seen.
    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of stored values: occurrences for flags, elements for lists.
    pub fn count(&self, name: &str) -> usize {
        self.values.get(name).map_or(0, Vec::len)
    }

    /// First value stored for the option.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|v| v.first().map(String::as_str))
    }

    /// First value stored for the option, or `default` when it was not seen.
    pub fn value_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.value(name).unwrap_or(default)
    }

    /// Every value stored for the option, in order.
    pub fn values(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Tokens that were not consumed as options or option values.
    pub fn positionals(&self) -> &[String] {
        self.positionals.as_slice()
    }

    /// Indices of the input tokens consumed as options or option values.
    pub fn consumed(&self) -> &[usize] {
        self.consumed.as_slice()
    }

    /// `(name, values)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.positionals.is_empty()
    }
}

impl Matches {
    pub(crate) fn push_value(&mut self, name: &str, value: impl Into<String>) {
        match self.values.get_mut(name) {
            Some(values) => values.push(value.into()),
            None => {
                self.values.insert(name.to_string(), vec![value.into()]);
            }
        }
    }

    pub(crate) fn push_positional(&mut self, token: &str) {
        self.positionals.push(token.to_string());
    }

    pub(crate) fn push_consumed(&mut self, index: usize) {
        self.consumed.push(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_on_absent_names() {
        let m = Matches::default();
        assert!(!m.has("x"));
        assert_eq!(m.count("x"), 0);
        assert_eq!(m.value("x"), None);
        assert_eq!(m.value_or("x", "fallback"), "fallback");
        assert!(m.values("x").is_empty());
        assert!(m.is_empty());
    }

    #[test]
    fn names_keep_first_seen_order() {
        let mut m = Matches::default();
        m.push_value("zeta", "1");
        m.push_value("alpha", "a");
        m.push_value("zeta", "2");
        m.push_positional("rest");

        let order: Vec<&str> = m.iter().map(|(k, _)| k).collect();
        assert_eq!(order, ["zeta", "alpha"]);
        assert_eq!(m.values("zeta"), ["1", "2"]);
        assert_eq!(m.value("zeta"), Some("1"));
        assert_eq!(m.count("zeta"), 2);
        assert_eq!(m.positionals(), ["rest"]);
    }

    #[test]
    fn serializes_to_json() {
        let mut m = Matches::default();
        m.push_value("age", "42");
        m.push_positional("data");
        m.push_consumed(1);
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "values": { "age": ["42"] },
                "positionals": ["data"],
                "consumed": [1],
            })
        );
    }
}
