//! URL-encoded form fields.

use url::form_urlencoded;

/// Ordered list of decoded form fields.
///
/// Keys may repeat; [`FormData::get`] returns the last value, matching how
/// a repeated field overrides an earlier one in the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    /// Decode `application/x-www-form-urlencoded` input.
    pub fn parse(input: &[u8]) -> Self {
        Self {
            pairs: form_urlencoded::parse(input).into_owned().collect(),
        }
    }

    /// Append the fields of another form.
    pub fn extend(&mut self, other: FormData) {
        self.pairs.extend(other.pairs);
    }

    /// Last value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Last value for `name`, or `default` when absent.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decodes() {
        let form = FormData::parse(b"name=J%C3%A9r%C3%B4me&note=a+b");
        assert_eq!(form.get("name"), Some("Jérôme"));
        assert_eq!(form.get("note"), Some("a b"));
        assert_eq!(form.pairs.len(), 2);
    }

    #[test]
    fn test_last_value_wins() {
        let form = FormData::parse(b"type=html&type=json");
        assert_eq!(form.get("type"), Some("json"));
        assert_eq!(form.pairs.len(), 2);
    }

    #[test]
    fn test_get_or_default() {
        let form = FormData::parse(b"");
        assert!(form.pairs.is_empty());
        assert_eq!(form.get_or("type", "text"), "text");
    }

    #[test]
    fn test_key_without_value() {
        let form = FormData::parse(b"flag&x=1");
        assert_eq!(form.get("flag"), Some(""));
        assert_eq!(form.get("x"), Some("1"));
    }
}
