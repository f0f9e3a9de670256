//! Parser configuration

use serde::{Deserialize, Serialize};
use std::fmt;

/// ECMAScript edition the input is expected to conform to.
///
/// Modes are ordered; a later mode accepts every feature of the earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LanguageMode {
    /// ES3
    Ecmascript3,
    /// ES5
    Ecmascript5,
    /// ES2015
    Ecmascript2015,
    /// ES2016
    Ecmascript2016,
    /// ES2017
    Ecmascript2017,
    /// ES2018
    Ecmascript2018,
    /// ES2019
    Ecmascript2019,
    /// ES2020
    Ecmascript2020,
    /// ES2021
    Ecmascript2021,
    /// Finished proposals newer than the last named edition
    EcmascriptNext,
    /// Everything the parser understands
    Unsupported,
}

impl LanguageMode {
    /// All modes in ascending order.
    pub const ALL: [LanguageMode; 11] = [
        LanguageMode::Ecmascript3,
        LanguageMode::Ecmascript5,
        LanguageMode::Ecmascript2015,
        LanguageMode::Ecmascript2016,
        LanguageMode::Ecmascript2017,
        LanguageMode::Ecmascript2018,
        LanguageMode::Ecmascript2019,
        LanguageMode::Ecmascript2020,
        LanguageMode::Ecmascript2021,
        LanguageMode::EcmascriptNext,
        LanguageMode::Unsupported,
    ];

    /// Name used in diagnostics, e.g. `ECMASCRIPT_2015`.
    pub fn name(self) -> &'static str {
        match self {
            LanguageMode::Ecmascript3 => "ECMASCRIPT3",
            LanguageMode::Ecmascript5 => "ECMASCRIPT5",
            LanguageMode::Ecmascript2015 => "ECMASCRIPT_2015",
            LanguageMode::Ecmascript2016 => "ECMASCRIPT_2016",
            LanguageMode::Ecmascript2017 => "ECMASCRIPT_2017",
            LanguageMode::Ecmascript2018 => "ECMASCRIPT_2018",
            LanguageMode::Ecmascript2019 => "ECMASCRIPT_2019",
            LanguageMode::Ecmascript2020 => "ECMASCRIPT_2020",
            LanguageMode::Ecmascript2021 => "ECMASCRIPT_2021",
            LanguageMode::EcmascriptNext => "ES_NEXT",
            LanguageMode::Unsupported => "ES_UNSUPPORTED",
        }
    }
}

impl fmt::Display for LanguageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether the input is treated as strict-mode code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrictMode {
    /// Strict mode rules apply
    Strict,
    /// Sloppy mode
    Sloppy,
}

/// Which comments are kept and attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommentParsing {
    /// Comments are dropped
    None,
    /// Only `/** */` blocks are parsed and attached
    JsDocOnly,
    /// JSDoc plus every plain comment (editor mode)
    All,
}

/// What happens after a syntax error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunMode {
    /// Report and return no tree
    StopOnError,
    /// Substitute placeholders and report everything
    KeepGoing,
}

/// Options for one parse.
///
/// # Examples
///
/// ```
/// use js_parser::{CommentParsing, Config, LanguageMode, RunMode};
///
/// let config = Config::default()
///     .with_language_mode(LanguageMode::Ecmascript2015)
///     .with_comment_parsing(CommentParsing::All)
///     .with_run_mode(RunMode::KeepGoing);
/// assert_eq!(config.language_mode, LanguageMode::Ecmascript2015);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Edition the source targets
    pub language_mode: LanguageMode,
    /// Strict or sloppy code
    pub strict_mode: StrictMode,
    /// Comment handling
    pub comment_parsing: CommentParsing,
    /// Error policy
    pub run_mode: RunMode,
    /// Whether `@closureUnaware` is accepted
    pub closure_unaware_code_allowed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            language_mode: LanguageMode::Unsupported,
            strict_mode: StrictMode::Strict,
            comment_parsing: CommentParsing::JsDocOnly,
            run_mode: RunMode::StopOnError,
            closure_unaware_code_allowed: false,
        }
    }
}

impl Config {
    /// Sets the language mode.
    pub fn with_language_mode(mut self, mode: LanguageMode) -> Self {
        self.language_mode = mode;
        self
    }

    /// Sets strict or sloppy mode.
    pub fn with_strict_mode(mut self, strict: StrictMode) -> Self {
        self.strict_mode = strict;
        self
    }

    /// Sets the comment parsing mode.
    pub fn with_comment_parsing(mut self, mode: CommentParsing) -> Self {
        self.comment_parsing = mode;
        self
    }

    /// Sets the run mode.
    pub fn with_run_mode(mut self, mode: RunMode) -> Self {
        self.run_mode = mode;
        self
    }

    /// Allows or forbids `@closureUnaware`.
    pub fn with_closure_unaware_code(mut self, allowed: bool) -> Self {
        self.closure_unaware_code_allowed = allowed;
        self
    }

    /// True in strict mode.
    pub fn is_strict(&self) -> bool {
        self.strict_mode == StrictMode::Strict
    }

    /// True when syntax errors are recovered from.
    pub fn keep_going(&self) -> bool {
        self.run_mode == RunMode::KeepGoing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_are_ordered() {
        assert!(LanguageMode::Ecmascript3 < LanguageMode::Ecmascript5);
        assert!(LanguageMode::Ecmascript2021 < LanguageMode::EcmascriptNext);
        assert!(LanguageMode::EcmascriptNext < LanguageMode::Unsupported);
        assert!(LanguageMode::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.language_mode, LanguageMode::Unsupported);
        assert!(config.is_strict());
        assert_eq!(config.comment_parsing, CommentParsing::JsDocOnly);
        assert!(!config.keep_going());
        assert!(!config.closure_unaware_code_allowed);
    }

    #[test]
    fn test_config_serde_names() {
        let config = Config::default().with_language_mode(LanguageMode::Ecmascript2015);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"ECMASCRIPT2015\""));
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(LanguageMode::Ecmascript2020.to_string(), "ECMASCRIPT_2020");
        assert_eq!(LanguageMode::EcmascriptNext.to_string(), "ES_NEXT");
    }
}
