use serde::{Deserialize, Serialize};

/// How the first token of an argument sequence is interpreted.
///
/// The modes are mutually exclusive: bundled flags and subcommands both claim
/// the first position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputMode {
    #[default]
    Standard,
    /// The first token may be a run of one-letter flags without a prefix (`tar xvf`).
    #[serde(alias = "bsd-bundled")]
    Bsd,
    /// Like [`InputMode::Bsd`], but the run starts with a prefix (`-xvf`).
    #[serde(alias = "merged-bundled")]
    Merged,
    /// The first token must be a declared subcommand (`[&]name`).
    Subcommand,
}

impl InputMode {
    pub fn is_bundled(self) -> bool {
        matches!(self, Self::Bsd | Self::Merged)
    }

    /// Modes that reserve the first token for something other than a plain option.
    pub fn claims_first_token(self) -> bool {
        self != Self::Standard
    }
}

/// Parser configuration, fixed before the first option is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub case_sensitive: bool,
    pub input_mode: InputMode,
    /// Reject prefixed tokens that match no handle instead of treating them as positional.
    pub error_on_unknown: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            input_mode: InputMode::Standard,
            error_on_unknown: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    pub fn input_mode(mut self, mode: InputMode) -> Self {
        self.input_mode = mode;
        self
    }

    pub fn error_on_unknown(mut self, yes: bool) -> Self {
        self.error_on_unknown = yes;
        self
    }
}
