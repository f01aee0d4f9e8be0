//! Precedence-merge combinators.
//!
//! Small helpers for "prefer source A, fall back to source B" merges so the
//! rule lives in one place instead of bespoke field-by-field code.

/// Field-precedence merge: keep `primary` where present, otherwise fall back.
#[must_use]
pub fn prefer<T>(primary: Option<T>, fallback: Option<T>) -> Option<T> {
    primary.or(fallback)
}

/// First record of the first non-empty candidate list.
///
/// Models a lookup chain where earlier sources are more authoritative and
/// each source returns its matches ranked best-first.
#[must_use]
pub fn first_non_empty<T>(candidates: impl IntoIterator<Item = Vec<T>>) -> Option<T> {
    candidates
        .into_iter()
        .find(|list| !list.is_empty())
        .and_then(|list| list.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefer_keeps_primary() {
        assert_eq!(prefer(Some(1), Some(2)), Some(1));
        assert_eq!(prefer(None, Some(2)), Some(2));
        assert_eq!(prefer::<u32>(None, None), None);
    }

    #[test]
    fn first_non_empty_skips_empty_lists() {
        let result = first_non_empty([vec![], vec![], vec!["generic", "other"], vec!["brand"]]);
        assert_eq!(result, Some("generic"));
    }

    #[test]
    fn first_non_empty_all_empty_is_none() {
        let result: Option<u32> = first_non_empty([vec![], vec![]]);
        assert_eq!(result, None);
    }
}
