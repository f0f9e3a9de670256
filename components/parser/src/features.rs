//! Language features and the set of features seen in a parse

use crate::config::LanguageMode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// An edition-gated language construct.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Feature {
    // ES5
    Es3KeywordsAsIdentifiers,
    Getter,
    KeywordsAsProperties,
    Setter,
    StringContinuation,
    TrailingComma,

    // ES2015
    ArrayDestructuring,
    ArrayPatternRest,
    ArrowFunctions,
    BinaryLiterals,
    BlockScopedFunctionDeclaration,
    Classes,
    ComputedProperties,
    ConstDeclarations,
    DefaultParameters,
    ExtendedObjectLiterals,
    ForOf,
    Generators,
    LetDeclarations,
    MemberDeclarations,
    Modules,
    NewTarget,
    ObjectDestructuring,
    OctalLiterals,
    RegexpFlagU,
    RegexpFlagY,
    RestParameters,
    SpreadExpressions,
    Super,
    TemplateLiterals,

    // ES2016
    ExponentOp,

    // ES2017
    AsyncFunctions,
    TrailingCommaInParamList,

    // ES2018
    AsyncGenerators,
    ForAwaitOf,
    ObjectLiteralsWithSpread,
    ObjectPatternRest,
    RegexpFlagS,

    // ES2019
    OptionalCatchBinding,
    UnescapedUnicodeLineOrParagraphSep,

    // ES2020
    Bigint,
    DynamicImport,
    ImportMeta,
    NullCoalesceOp,
    OptionalChaining,

    // ES2021
    LogicalAssignment,
    NumericSeparator,

    // Newer than the last named edition
    ClassStaticBlock,
    PrivateClassProperties,
    PublicClassFields,
    RegexpFlagD,

    // Not supported by any named mode
    RegexpFlagV,
}

impl Feature {
    /// Every feature, in declaration order.
    pub const ALL: [Feature; 52] = [
        Feature::Es3KeywordsAsIdentifiers,
        Feature::Getter,
        Feature::KeywordsAsProperties,
        Feature::Setter,
        Feature::StringContinuation,
        Feature::TrailingComma,
        Feature::ArrayDestructuring,
        Feature::ArrayPatternRest,
        Feature::ArrowFunctions,
        Feature::BinaryLiterals,
        Feature::BlockScopedFunctionDeclaration,
        Feature::Classes,
        Feature::ComputedProperties,
        Feature::ConstDeclarations,
        Feature::DefaultParameters,
        Feature::ExtendedObjectLiterals,
        Feature::ForOf,
        Feature::Generators,
        Feature::LetDeclarations,
        Feature::MemberDeclarations,
        Feature::Modules,
        Feature::NewTarget,
        Feature::ObjectDestructuring,
        Feature::OctalLiterals,
        Feature::RegexpFlagU,
        Feature::RegexpFlagY,
        Feature::RestParameters,
        Feature::SpreadExpressions,
        Feature::Super,
        Feature::TemplateLiterals,
        Feature::ExponentOp,
        Feature::AsyncFunctions,
        Feature::TrailingCommaInParamList,
        Feature::AsyncGenerators,
        Feature::ForAwaitOf,
        Feature::ObjectLiteralsWithSpread,
        Feature::ObjectPatternRest,
        Feature::RegexpFlagS,
        Feature::OptionalCatchBinding,
        Feature::UnescapedUnicodeLineOrParagraphSep,
        Feature::Bigint,
        Feature::DynamicImport,
        Feature::ImportMeta,
        Feature::NullCoalesceOp,
        Feature::OptionalChaining,
        Feature::LogicalAssignment,
        Feature::NumericSeparator,
        Feature::ClassStaticBlock,
        Feature::PrivateClassProperties,
        Feature::PublicClassFields,
        Feature::RegexpFlagD,
        Feature::RegexpFlagV,
    ];

    /// Human-readable name used in diagnostics.
    pub fn description(self) -> &'static str {
        match self {
            Feature::Es3KeywordsAsIdentifiers => "ES3 keywords as identifiers",
            Feature::Getter => "getters",
            Feature::KeywordsAsProperties => "reserved words as properties",
            Feature::Setter => "setters",
            Feature::StringContinuation => "string continuation",
            Feature::TrailingComma => "trailing comma",
            Feature::ArrayDestructuring => "array destructuring",
            Feature::ArrayPatternRest => "array pattern rest",
            Feature::ArrowFunctions => "arrow function",
            Feature::BinaryLiterals => "binary literal",
            Feature::BlockScopedFunctionDeclaration => "block-scoped function declaration",
            Feature::Classes => "class",
            Feature::ComputedProperties => "computed property",
            Feature::ConstDeclarations => "const declaration",
            Feature::DefaultParameters => "default parameter",
            Feature::ExtendedObjectLiterals => "extended object literal",
            Feature::ForOf => "for-of loop",
            Feature::Generators => "generator",
            Feature::LetDeclarations => "let declaration",
            Feature::MemberDeclarations => "member declaration",
            Feature::Modules => "modules",
            Feature::NewTarget => "new.target",
            Feature::ObjectDestructuring => "object destructuring",
            Feature::OctalLiterals => "octal literal",
            Feature::RegexpFlagU => "RegExp flag 'u'",
            Feature::RegexpFlagY => "RegExp flag 'y'",
            Feature::RestParameters => "rest parameter",
            Feature::SpreadExpressions => "spread expression",
            Feature::Super => "super",
            Feature::TemplateLiterals => "template literal",
            Feature::ExponentOp => "exponent operator (**)",
            Feature::AsyncFunctions => "async function",
            Feature::TrailingCommaInParamList => "trailing comma in param list",
            Feature::AsyncGenerators => "async generator functions",
            Feature::ForAwaitOf => "for-await-of",
            Feature::ObjectLiteralsWithSpread => "object literals with spread",
            Feature::ObjectPatternRest => "object pattern rest",
            Feature::RegexpFlagS => "RegExp flag 's'",
            Feature::OptionalCatchBinding => "Optional catch binding",
            Feature::UnescapedUnicodeLineOrParagraphSep => {
                "Unescaped unicode line or paragraph separator"
            }
            Feature::Bigint => "bigint",
            Feature::DynamicImport => "Dynamic module import",
            Feature::ImportMeta => "import.meta",
            Feature::NullCoalesceOp => "Nullish coalescing",
            Feature::OptionalChaining => "Optional chaining",
            Feature::LogicalAssignment => "Logical assignments",
            Feature::NumericSeparator => "numeric separator",
            Feature::ClassStaticBlock => "Class static blocks",
            Feature::PrivateClassProperties => "Private class properties",
            Feature::PublicClassFields => "Public class fields",
            Feature::RegexpFlagD => "RegExp flag 'd'",
            Feature::RegexpFlagV => "RegExp flag 'v'",
        }
    }

    /// Earliest mode that accepts the feature.
    pub fn minimum_mode(self) -> LanguageMode {
        use Feature::*;
        match self {
            Es3KeywordsAsIdentifiers | Getter | KeywordsAsProperties | Setter
            | StringContinuation | TrailingComma => LanguageMode::Ecmascript5,
            ArrayDestructuring | ArrayPatternRest | ArrowFunctions | BinaryLiterals
            | BlockScopedFunctionDeclaration | Classes | ComputedProperties
            | ConstDeclarations | DefaultParameters | ExtendedObjectLiterals | ForOf
            | Generators | LetDeclarations | MemberDeclarations | Modules | NewTarget
            | ObjectDestructuring | OctalLiterals | RegexpFlagU | RegexpFlagY
            | RestParameters | SpreadExpressions | Super | TemplateLiterals => {
                LanguageMode::Ecmascript2015
            }
            ExponentOp => LanguageMode::Ecmascript2016,
            AsyncFunctions | TrailingCommaInParamList => LanguageMode::Ecmascript2017,
            AsyncGenerators | ForAwaitOf | ObjectLiteralsWithSpread | ObjectPatternRest
            | RegexpFlagS => LanguageMode::Ecmascript2018,
            OptionalCatchBinding | UnescapedUnicodeLineOrParagraphSep => {
                LanguageMode::Ecmascript2019
            }
            Bigint | DynamicImport | ImportMeta | NullCoalesceOp | OptionalChaining => {
                LanguageMode::Ecmascript2020
            }
            LogicalAssignment | NumericSeparator => LanguageMode::Ecmascript2021,
            ClassStaticBlock | PrivateClassProperties | PublicClassFields | RegexpFlagD => {
                LanguageMode::EcmascriptNext
            }
            RegexpFlagV => LanguageMode::Unsupported,
        }
    }

    /// The diagnostic raised when the feature is used below its mode.
    pub fn unsupported_message(self) -> String {
        format!(
            "This language feature is only supported for {} mode or better: {}",
            self.minimum_mode(),
            self.description()
        )
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Features observed during a parse. Only ever grows.
///
/// # Examples
///
/// ```
/// use js_parser::{Feature, FeatureSet, LanguageMode};
///
/// let mut seen = FeatureSet::new();
/// seen.add(Feature::LetDeclarations);
/// assert!(FeatureSet::for_mode(LanguageMode::Ecmascript2015).contains_all(&seen));
/// assert!(!FeatureSet::for_mode(LanguageMode::Ecmascript5).contains_all(&seen));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSet {
    features: BTreeSet<Feature>,
}

impl FeatureSet {
    /// An empty set.
    pub fn new() -> Self {
        FeatureSet::default()
    }

    /// Every feature a mode accepts.
    pub fn for_mode(mode: LanguageMode) -> Self {
        FeatureSet {
            features: Feature::ALL
                .iter()
                .copied()
                .filter(|f| f.minimum_mode() <= mode)
                .collect(),
        }
    }

    /// Records a feature; returns true when it was new.
    pub fn add(&mut self, feature: Feature) -> bool {
        self.features.insert(feature)
    }

    /// Membership test.
    pub fn contains(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    /// True when every feature of `other` is in `self`.
    pub fn contains_all(&self, other: &FeatureSet) -> bool {
        self.features.is_superset(&other.features)
    }

    /// True when `self` has everything `other` has and more.
    pub fn is_strict_superset(&self, other: &FeatureSet) -> bool {
        self.contains_all(other) && self.features.len() > other.features.len()
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Features in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = Feature> + '_ {
        self.features.iter().copied()
    }

    /// The earliest mode accepting every feature in the set.
    pub fn minimum_mode(&self) -> LanguageMode {
        self.iter()
            .map(Feature::minimum_mode)
            .max()
            .unwrap_or(LanguageMode::Ecmascript3)
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        FeatureSet {
            features: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_complete_and_unique() {
        let set: BTreeSet<_> = Feature::ALL.iter().collect();
        assert_eq!(set.len(), Feature::ALL.len());
    }

    #[test]
    fn test_message_format() {
        assert_eq!(
            Feature::Bigint.unsupported_message(),
            "This language feature is only supported for ECMASCRIPT_2020 mode or better: bigint"
        );
        assert_eq!(
            Feature::PublicClassFields.unsupported_message(),
            "This language feature is only supported for ES_NEXT mode or better: Public class fields"
        );
    }

    #[test]
    fn test_mode_sets_grow() {
        for pair in LanguageMode::ALL.windows(2) {
            let lower = FeatureSet::for_mode(pair[0]);
            let higher = FeatureSet::for_mode(pair[1]);
            assert!(higher.is_strict_superset(&lower), "{:?}", pair);
        }
        assert!(FeatureSet::for_mode(LanguageMode::Ecmascript3).is_empty());
    }

    #[test]
    fn test_add_is_grow_only() {
        let mut set = FeatureSet::new();
        assert!(set.add(Feature::ForOf));
        assert!(!set.add(Feature::ForOf));
        assert_eq!(set.len(), 1);
        assert_eq!(set.minimum_mode(), LanguageMode::Ecmascript2015);
    }
}
