//! Merging of file-level documentation blocks.

use crate::JsDocInfo;

/// Folds a newly found file-level block into the one already recorded.
///
/// The first block keeps its prose (`@fileoverview` text and description)
/// even when it had none; suppressions, license text and the
/// externs/type-summary markers accumulate from every block.
///
/// # Examples
///
/// ```
/// use jsdoc::{merge_file_overview, JsDocInfo};
///
/// let first = JsDocInfo {
///     file_overview: Some("First".to_string()),
///     has_file_overview: true,
///     ..JsDocInfo::default()
/// };
/// let second = JsDocInfo {
///     file_overview: Some("Second".to_string()),
///     has_file_overview: true,
///     is_externs: true,
///     ..JsDocInfo::default()
/// };
/// let merged = merge_file_overview(Some(first), second);
/// assert_eq!(merged.file_overview.as_deref(), Some("First"));
/// assert!(merged.is_externs);
/// ```
pub fn merge_file_overview(existing: Option<JsDocInfo>, new: JsDocInfo) -> JsDocInfo {
    let Some(mut merged) = existing else {
        return new;
    };
    for suppression in &new.suppressions {
        merged.add_suppression(suppression);
    }
    if let Some(license) = &new.license {
        merged.add_license(license);
    }
    merged.is_externs |= new.is_externs;
    merged.is_type_summary |= new.is_type_summary;
    merged.has_file_overview |= new.has_file_overview;
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overview(text: Option<&str>) -> JsDocInfo {
        JsDocInfo {
            file_overview: text.map(str::to_string),
            has_file_overview: true,
            ..JsDocInfo::default()
        }
    }

    #[test]
    fn test_first_block_is_taken_as_is() {
        let merged = merge_file_overview(None, overview(Some("Hi mom!")));
        assert_eq!(merged.file_overview.as_deref(), Some("Hi mom!"));
    }

    #[test]
    fn test_first_prose_wins_even_when_empty() {
        let first = JsDocInfo {
            is_type_summary: true,
            ..JsDocInfo::default()
        };
        let merged = merge_file_overview(Some(first), overview(Some("Second")));
        assert!(merged.is_type_summary);
        assert_eq!(merged.file_overview, None);
    }

    #[test]
    fn test_suppressions_accumulate_in_order() {
        let mut a = overview(None);
        a.add_suppression("const");
        let mut b = overview(None);
        b.add_suppression("checkTypes");
        b.add_suppression("const");
        let merged = merge_file_overview(Some(a), b);
        assert_eq!(merged.suppressions, vec!["const", "checkTypes"]);
    }

    #[test]
    fn test_merge_is_pure() {
        let a = overview(Some("A"));
        let b = overview(Some("B"));
        let once = merge_file_overview(Some(a.clone()), b.clone());
        let twice = merge_file_overview(Some(a), b);
        assert_eq!(once, twice);
    }
}
