//! One-shot helpers for programs that only care about a single option.

use crate::config::Config;
use crate::error::Result;
use crate::registry::RegistryBuilder;

fn extract<S: AsRef<str>>(spec: &str, tokens: &[S]) -> Result<Vec<String>> {
    let mut builder = RegistryBuilder::with_config(Config::new().error_on_unknown(false));
    let name = builder.option(spec)?.name().to_string();
    let matches = builder.freeze()?.parse(tokens)?;
    Ok(matches.values(&name).to_vec())
}

/// Declare `spec` on its own and return the first value it matches in `tokens`.
///
/// Every other token is treated as positional, so unrelated options do not
/// cause an error.
///
/// ```
/// let out = optspec::value_of("-o|--output=?s", &["build", "--output", "a.out"]).unwrap();
/// assert_eq!(out.as_deref(), Some("a.out"));
/// ```
pub fn value_of<S: AsRef<str>>(spec: &str, tokens: &[S]) -> Result<Option<String>> {
    Ok(extract(spec, tokens)?.into_iter().next())
}

/// Like [`value_of`], returning every value (list elements or repeated occurrences).
pub fn values_of<S: AsRef<str>>(spec: &str, tokens: &[S]) -> Result<Vec<String>> {
    extract(spec, tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_other_options() {
        let tokens = ["--other", "-n=3", "file"];
        assert_eq!(value_of("-n=i", &tokens).unwrap().as_deref(), Some("3"));
        assert_eq!(value_of("-m=i", &tokens).unwrap(), None);
    }

    #[test]
    fn collects_lists_and_repeats() {
        let tokens = ["-I=a,b", "x", "-I=c"];
        assert_eq!(values_of("-I*=[s]", &tokens).unwrap(), ["a", "b", "c"]);
    }

    #[test]
    fn surfaces_errors() {
        assert!(value_of("-n=i", &["-n=x"]).unwrap_err().is_parse());
        assert!(value_of("-n=q", &["-n=1"]).unwrap_err().is_specification());
    }
}
