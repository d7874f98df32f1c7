//! Declare command-line options in a compact mini-language and match argument
//! vectors against them.
//!
//! Options are declared with strings such as `-w|--wife=!s` or `--nums*=[i]`.
//! Each declaration compiles to a [`Descriptor`] registered on a
//! [`RegistryBuilder`]; freezing the builder yields a [`Registry`] that matches
//! argument sequences into [`Matches`]:
//!
//! ```
//! use optspec::RegistryBuilder;
//!
//! let mut builder = RegistryBuilder::new();
//! builder.option("-age=?i")?;
//! builder.option("-w|--wife=!s")?;
//! let registry = builder.freeze()?;
//!
//! let m = registry.parse(&["data", "-age", "42", "--wife", "ellen"])?;
//! assert_eq!(m.value("age"), Some("42"));
//! assert_eq!(m.value("wife"), Some("ellen"));
//! assert_eq!(m.positionals(), ["data"]);
//! # Ok::<(), optspec::Error>(())
//! ```
//!
//! Declaration syntax, in order:
//! - optional modifier: `[&]` marks a subcommand (subcommand mode only)
//! - one or more handles separated by `|`, each with an optional prefix
//!   (`-`, `--`, `+`, `++`, `.`, `:`, `/`)
//! - optional cardinality: `?` (at most once, the default) or `*` (any count)
//! - optional value: `=` (inline value required), `=?` (inline or next token),
//!   `=!` (next token only), followed by a type `s`/`i`/`f`, or `[type]` for a
//!   comma separated list

mod compiler;
mod config;
mod descriptor;
mod error;
mod extract;
mod matcher;
mod matches;
mod registry;

pub use compiler::compile;
pub use config::{Config, InputMode};
pub use descriptor::{Assignment, Cardinality, Collection, Descriptor, Modifier, ValueType};
pub use error::{Error, ErrorKind, Result};
pub use extract::{value_of, values_of};
pub use matches::Matches;
pub use registry::{Registry, RegistryBuilder};
