//! Option declaration compiler.
//!
//! A declaration looks like `[&]-w|--wife*=?[i]`:
//!
//! ```text
//! option_spec  := modifier? handle_list cardinality? assign_spec?
//! modifier     := '[' ( '&' | ('<'|'>'|'!') handle ) ']'
//! handle_list  := handle ('|' handle)*
//! handle       := prefix? word_chars
//! prefix       := '-' | '--' | '+' | '++' | '.' | ':' | '/'
//! cardinality  := '?' | '*'
//! assign_spec  := '=' eq_modifier? value_spec | '[' value_type? ']'
//! eq_modifier  := '?' | '!'
//! value_spec   := value_type | '[' value_type? ']'
//! value_type   := 's' | 'i' | 'f'
//! ```
//!
//! The compiler is a character-at-a-time state machine; the end of input is fed
//! as a final `None` so that every state decides for itself whether it may end
//! there.

use crate::config::InputMode;
use crate::descriptor::{Assignment, Cardinality, Collection, Descriptor, Modifier, ValueType};
use crate::error::{Error, Result};

pub(crate) fn is_prefix_char(ch: char) -> bool {
    matches!(ch, '-' | '+' | '.' | ':' | '/')
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Strip up to two leading prefix characters from a handle.
pub(crate) fn strip_prefix(handle: &str) -> &str {
    let skip = handle
        .chars()
        .take(2)
        .take_while(|c| is_prefix_char(*c))
        .count();
    // Prefix characters are ASCII, so `skip` is also a byte offset.
    &handle[skip..]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    ModifierKind,
    ModifierArg,
    ModifierEnd,
    Handle,
    MinusPrefix,
    PlusPrefix,
    PrefixEnd,
    Name,
    Cardinality,
    Eq,
    Arg,
    ArgList,
    ArgListEnd,
    Done,
}

struct Compiler {
    state: State,
    subcommands: bool,
    buf: String,
    handles: Vec<String>,
    relation: char,
    modifier: Modifier,
    cardinality: Cardinality,
    assignment: Assignment,
    collection: Collection,
    value_type: ValueType,
}

impl Compiler {
    fn new(mode: InputMode) -> Self {
        Self {
            state: State::Start,
            subcommands: mode == InputMode::Subcommand,
            buf: String::new(),
            handles: Vec::new(),
            relation: '&',
            modifier: Modifier::None,
            cardinality: Cardinality::AtMostOne,
            assignment: Assignment::Forbidden,
            collection: Collection::Scalar,
            value_type: ValueType::String,
        }
    }

    fn end_handle(&mut self) {
        self.handles.push(std::mem::take(&mut self.buf));
    }

    fn value_type(&mut self, ch: char, next: State) -> Result<()> {
        match ValueType::from_spec_char(ch) {
            Some(ty) => {
                self.value_type = ty;
                self.state = next;
                Ok(())
            }
            None => Err(Error::spec(format!(
                "expected value type 's', 'i' or 'f', found '{ch}'"
            ))),
        }
    }

    fn feed(&mut self, ch: Option<char>) -> Result<()> {
        match self.state {
            State::Start => match ch {
                Some('[') => self.state = State::ModifierKind,
                _ => {
                    self.state = State::Handle;
                    return self.feed(ch);
                }
            },
            State::ModifierKind => match ch {
                Some('&') => {
                    // Subcommand declarations are inert outside subcommand mode.
                    if self.subcommands {
                        self.modifier = Modifier::Subcommand;
                    }
                    self.state = State::ModifierEnd;
                }
                Some(c @ ('<' | '>' | '!')) => {
                    self.relation = c;
                    self.state = State::ModifierArg;
                }
                Some(c) => {
                    return Err(Error::spec(format!(
                        "expected modifier '&', '<', '>' or '!', found '{c}'"
                    )));
                }
                None => return Err(Error::spec("input ended inside modifier")),
            },
            State::ModifierArg => match ch {
                Some(']') if self.buf.is_empty() => {
                    return Err(Error::spec("modifier requires a handle argument"));
                }
                Some(']') => {
                    // Ordering and exclusion constraints are reserved syntax.
                    return Err(Error::spec(format!(
                        "unimplemented modifier '[{}{}]'",
                        self.relation, self.buf
                    )));
                }
                Some(c) if is_prefix_char(c) || is_word_char(c) => self.buf.push(c),
                Some(c) => {
                    return Err(Error::spec(format!(
                        "invalid character '{c}' in modifier argument"
                    )));
                }
                None => return Err(Error::spec("input ended inside modifier")),
            },
            State::ModifierEnd => match ch {
                Some(']') => self.state = State::Handle,
                Some(c) => return Err(Error::spec(format!("expected ']', found '{c}'"))),
                None => return Err(Error::spec("input ended inside modifier")),
            },
            State::Handle => {
                let Some(c) = ch else {
                    if self.handles.is_empty() {
                        return Err(Error::spec("no handles found in option spec"));
                    }
                    return Err(Error::spec("input ended before handle complete"));
                };
                self.state = match c {
                    '/' | '.' | ':' => State::PrefixEnd,
                    '+' => State::PlusPrefix,
                    '-' => State::MinusPrefix,
                    c if is_word_char(c) => State::Name,
                    c => {
                        return Err(Error::spec(format!(
                            "expected prefix or word character, found '{c}'"
                        )));
                    }
                };
                self.buf.push(c);
            }
            State::MinusPrefix | State::PlusPrefix => {
                let doubled = if self.state == State::MinusPrefix { '-' } else { '+' };
                match ch {
                    Some(c) if c == doubled => self.state = State::PrefixEnd,
                    Some(c) if is_word_char(c) => self.state = State::Name,
                    Some(c) => {
                        return Err(Error::spec(format!(
                            "invalid character '{c}' in handle '{}'",
                            self.buf
                        )));
                    }
                    None => return Err(Error::spec("input ended before handle complete")),
                }
                if let Some(c) = ch {
                    self.buf.push(c);
                }
            }
            State::PrefixEnd => match ch {
                Some(c) if is_word_char(c) => {
                    self.buf.push(c);
                    self.state = State::Name;
                }
                Some(c) => {
                    return Err(Error::spec(format!(
                        "invalid character '{c}' in handle '{}': expected word character",
                        self.buf
                    )));
                }
                None => return Err(Error::spec("input ended before handle complete")),
            },
            State::Name => match ch {
                None => {
                    self.end_handle();
                    self.state = State::Done;
                }
                Some('|') => {
                    self.end_handle();
                    self.state = State::Handle;
                }
                Some('=') => {
                    self.end_handle();
                    self.assignment = Assignment::RequiredInline;
                    self.state = State::Eq;
                }
                Some('?') => {
                    self.end_handle();
                    self.cardinality = Cardinality::AtMostOne;
                    self.state = State::Cardinality;
                }
                Some('*') => {
                    self.end_handle();
                    self.cardinality = Cardinality::AnyCount;
                    self.state = State::Cardinality;
                }
                Some('[') => {
                    self.end_handle();
                    self.collection = Collection::List;
                    self.state = State::ArgList;
                }
                Some(c) if is_word_char(c) || c == '-' => self.buf.push(c),
                Some(c) => {
                    return Err(Error::spec(format!(
                        "invalid character '{c}' in handle '{}'",
                        self.buf
                    )));
                }
            },
            State::Cardinality => match ch {
                None => self.state = State::Done,
                Some('=') => {
                    self.assignment = Assignment::RequiredInline;
                    self.state = State::Eq;
                }
                Some('[') => {
                    self.collection = Collection::List;
                    self.state = State::ArgList;
                }
                Some(c) => {
                    return Err(Error::spec(format!(
                        "expected '=' or '[' after cardinality, found '{c}'"
                    )));
                }
            },
            State::Eq => match ch {
                None => self.state = State::Done,
                Some('?') => {
                    self.assignment = Assignment::OptionalInline;
                    self.state = State::Arg;
                }
                Some('!') => {
                    self.assignment = Assignment::ForbiddenInline;
                    self.state = State::Arg;
                }
                Some('[') => {
                    self.collection = Collection::List;
                    self.state = State::ArgList;
                }
                Some(c) => self.value_type(c, State::Done)?,
            },
            State::Arg => match ch {
                None => self.state = State::Done,
                Some('[') => {
                    self.collection = Collection::List;
                    self.state = State::ArgList;
                }
                Some(c) => self.value_type(c, State::Done)?,
            },
            State::ArgList => match ch {
                Some(']') => self.state = State::Done,
                Some(c) => self.value_type(c, State::ArgListEnd)?,
                None => return Err(Error::spec("input ended inside value list")),
            },
            State::ArgListEnd => match ch {
                Some(']') => self.state = State::Done,
                Some(c) => {
                    return Err(Error::spec(format!(
                        "expected ']' to close value list, found '{c}'"
                    )));
                }
                None => return Err(Error::spec("input ended inside value list")),
            },
            State::Done => {
                if let Some(c) = ch {
                    return Err(Error::spec(format!(
                        "unexpected '{c}' after end of option spec"
                    )));
                }
            }
        }
        Ok(())
    }

    fn finish(self, explicit_name: &str) -> Result<Descriptor> {
        debug_assert_eq!(self.state, State::Done);
        let Some(last) = self.handles.last() else {
            return Err(Error::spec("no handles found in option spec"));
        };

        let name = if explicit_name.is_empty() {
            let stripped = strip_prefix(last);
            if stripped.is_empty() {
                return Err(Error::spec(format!(
                    "handle '{last}' minus its prefix is empty"
                )));
            }
            stripped.to_string()
        } else {
            explicit_name.to_string()
        };

        Ok(Descriptor {
            name,
            handles: self.handles,
            modifier: self.modifier,
            cardinality: self.cardinality,
            assignment: self.assignment,
            collection: self.collection,
            value_type: self.value_type,
        })
    }
}

/// Compile one declaration without registering it anywhere.
///
/// `explicit_name` overrides the canonical name derived from the last handle
/// when non-empty. `mode` only matters for `[&]`, which is ignored unless the
/// mode is [`InputMode::Subcommand`].
pub fn compile(spec: &str, explicit_name: &str, mode: InputMode) -> Result<Descriptor> {
    let mut compiler = Compiler::new(mode);
    for ch in spec.chars().map(Some).chain(std::iter::once(None)) {
        compiler.feed(ch)?;
    }
    let descriptor = compiler.finish(explicit_name)?;
    tracing::trace!(
        spec,
        name = descriptor.name(),
        handles = ?descriptor.handles(),
        "compiled option spec"
    );
    Ok(descriptor)
}
