//! Matching engine: consume an argument sequence against a frozen registry.

use crate::compiler::is_prefix_char;
use crate::config::InputMode;
use crate::descriptor::{Assignment, Cardinality, Collection, Descriptor};
use crate::error::{Error, Result};
use crate::matches::Matches;
use crate::registry::Registry;

/// Value stored for options that take no argument.
const PRESENT: &str = "1";

impl Registry {
    /// Match `tokens` against the declared options.
    ///
    /// Tokens are processed left to right. The first invalid token aborts the
    /// whole call; no partial result is returned.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Matches> {
        let mut matcher = Matcher {
            registry: self,
            out: Matches::default(),
        };
        let mut i = 0;
        while i < tokens.len() {
            i = matcher.token(tokens, i)?;
        }
        tracing::debug!(
            tokens = tokens.len(),
            positionals = matcher.out.positionals().len(),
            "matched argument sequence"
        );
        Ok(matcher.out)
    }
}

struct Matcher<'r> {
    registry: &'r Registry,
    out: Matches,
}

impl<'r> Matcher<'r> {
    /// Handle the token at `i` and return the index of the next unprocessed token.
    fn token<S: AsRef<str>>(&mut self, tokens: &[S], i: usize) -> Result<usize> {
        let registry = self.registry;
        let config = registry.config();
        let token = tokens[i].as_ref();
        let (handle, inline) = match token.split_once('=') {
            Some((handle, value)) => (handle, Some(value)),
            None => (token, None),
        };

        if i == 0 && config.input_mode.is_bundled() && inline.is_none() && self.bundle(token)? {
            self.out.push_consumed(0);
            return Ok(1);
        }

        if i == 0 && config.input_mode.claims_first_token() && inline.is_some() {
            return Err(Error::parse(format!(
                "special options may not take arguments: {token}"
            )));
        }

        let Some(desc) = registry.get(handle) else {
            if config.error_on_unknown && token.starts_with(is_prefix_char) {
                return Err(Error::parse(format!("unknown option: {token}")));
            }
            tracing::trace!(index = i, token, "positional");
            self.out.push_positional(token);
            return Ok(i + 1);
        };

        if desc.is_subcommand() && i != 0 {
            return Err(Error::parse(format!(
                "subcommand '{handle}' must be the first argument"
            )));
        }
        if desc.cardinality() == Cardinality::AtMostOne && self.out.has(desc.name()) {
            return Err(Error::parse(format!(
                "repeated option: '{handle}' may appear at most once"
            )));
        }

        tracing::trace!(index = i, handle, name = desc.name(), "option");
        self.out.push_consumed(i);
        let mut next = i + 1;

        let raw = match desc.assignment() {
            Assignment::Forbidden => {
                if inline.is_some() {
                    return Err(Error::parse(format!(
                        "option '{handle}' does not take an argument"
                    )));
                }
                self.out.push_value(desc.name(), PRESENT);
                return Ok(next);
            }
            Assignment::RequiredInline => inline.ok_or_else(|| {
                Error::parse(format!("option '{handle}' is missing equals sign"))
            })?,
            Assignment::OptionalInline => match inline {
                Some(value) => value,
                None => self.following(tokens, &mut next, handle)?,
            },
            Assignment::ForbiddenInline => {
                if inline.is_some() {
                    return Err(Error::parse(format!(
                        "option '{handle}' should not use an equals sign"
                    )));
                }
                self.following(tokens, &mut next, handle)?
            }
        };

        self.store(desc, handle, raw)?;
        Ok(next)
    }

    /// Take the token at `*next` as an option value.
    fn following<'t, S: AsRef<str>>(
        &mut self,
        tokens: &'t [S],
        next: &mut usize,
        handle: &str,
    ) -> Result<&'t str> {
        let Some(value) = tokens.get(*next) else {
            return Err(Error::parse(format!(
                "option '{handle}' is missing an argument"
            )));
        };
        self.out.push_consumed(*next);
        *next += 1;
        Ok(value.as_ref())
    }

    fn store(&mut self, desc: &Descriptor, handle: &str, raw: &str) -> Result<()> {
        match desc.collection() {
            Collection::Scalar => {
                if self.out.has(desc.name()) {
                    return Err(Error::parse(format!("handle repeated: {handle}")));
                }
                validate(desc, raw)?;
                self.out.push_value(desc.name(), raw);
            }
            Collection::List => {
                for item in split_list(raw) {
                    validate(desc, item)?;
                    self.out.push_value(desc.name(), item);
                }
            }
        }
        Ok(())
    }

    /// Try to read the first token as a run of one-letter flags.
    ///
    /// Returns `Ok(false)` when not a single character could be decoded, in
    /// which case the token is handled like any other.
    fn bundle(&mut self, token: &str) -> Result<bool> {
        let registry = self.registry;
        let config = registry.config();
        let prefix_len = token
            .chars()
            .take(2)
            .take_while(|c| is_prefix_char(*c))
            .count();

        match config.input_mode {
            InputMode::Bsd if prefix_len > 0 => {
                return Err(Error::parse(format!(
                    "bsd-style options may not use a prefix: {token}"
                )));
            }
            InputMode::Merged if prefix_len == 0 => return Ok(false),
            _ => {}
        }

        // Prefix characters are ASCII, so `prefix_len` is also a byte offset.
        // Each remaining character resolves by itself, without the prefix.
        let flags = &token[prefix_len..];
        let mut accepted = 0usize;
        for ch in flags.chars() {
            let desc = registry
                .get(&ch.to_string())
                .filter(|d| d.assignment() == Assignment::Forbidden);
            let Some(desc) = desc else {
                if accepted == 0 {
                    return Ok(false);
                }
                return Err(Error::parse(format!(
                    "all or none of the characters in '{token}' must be special"
                )));
            };

            if desc.cardinality() == Cardinality::AtMostOne && self.out.has(desc.name()) {
                return Err(Error::parse(format!(
                    "repeated option: '{ch}' may appear at most once"
                )));
            }
            self.out.push_value(desc.name(), PRESENT);
            accepted += 1;
        }

        tracing::trace!(token, flags = accepted, "bundled flags");
        Ok(accepted > 0)
    }
}

/// Split a list value on `,`. A trailing empty element is dropped, so `""`
/// yields nothing and `"a,"` yields `["a"]`.
fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    let body = if raw.is_empty() {
        None
    } else {
        Some(raw.strip_suffix(',').unwrap_or(raw))
    };
    body.into_iter().flat_map(|b| b.split(','))
}

fn validate(desc: &Descriptor, value: &str) -> Result<()> {
    if desc.value_type().accepts(value) {
        return Ok(());
    }
    Err(Error::parse(format!(
        "data '{value}' is not a valid {} argument for '{}'",
        desc.value_type().describe(),
        desc.name()
    )))
}
