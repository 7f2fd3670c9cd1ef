//! Perspective field kinds and conjunctive filter matching.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// The value type of a perspective field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerspectiveKind {
    Number,
    String,
    YesNo,
    Options,
}

impl PerspectiveKind {
    /// The stored wire name (`number`, `string`, `yes/no`, `options`).
    pub fn as_str(self) -> &'static str {
        match self {
            PerspectiveKind::Number => "number",
            PerspectiveKind::String => "string",
            PerspectiveKind::YesNo => "yes/no",
            PerspectiveKind::Options => "options",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "number" => PerspectiveKind::Number,
            "string" => PerspectiveKind::String,
            "yes/no" => PerspectiveKind::YesNo,
            "options" => PerspectiveKind::Options,
            _ => return None,
        })
    }
}

/// One recorded perspective value: (member, perspective, value).
#[derive(Debug, Clone)]
pub struct MemberValue {
    pub member_id: DbId,
    pub perspective_id: DbId,
    pub value: String,
}

/// Members matching ALL of the requested perspective filters.
///
/// A member matches when, among the rows whose (perspective, value) pair is
/// in the requested set, it covers every distinct requested perspective id
/// (conjunctive, not disjunctive). A member with only some of the requested
/// perspectives set is excluded.
pub fn members_matching_all(
    rows: &[MemberValue],
    perspective_ids: &[DbId],
    values: &[String],
) -> Vec<DbId> {
    let wanted_ids: HashSet<DbId> = perspective_ids.iter().copied().collect();
    let wanted_values: HashSet<&str> = values.iter().map(String::as_str).collect();

    let mut matched: HashMap<DbId, HashSet<DbId>> = HashMap::new();
    for row in rows {
        if wanted_ids.contains(&row.perspective_id) && wanted_values.contains(row.value.as_str()) {
            matched
                .entry(row.member_id)
                .or_default()
                .insert(row.perspective_id);
        }
    }

    let mut members: Vec<DbId> = matched
        .into_iter()
        .filter(|(_, ids)| ids.len() == wanted_ids.len())
        .map(|(member_id, _)| member_id)
        .collect();
    members.sort_unstable();
    members
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(member_id: DbId, perspective_id: DbId, value: &str) -> MemberValue {
        MemberValue {
            member_id,
            perspective_id,
            value: value.to_string(),
        }
    }

    #[test]
    fn kind_wire_names_round_trip() {
        for kind in [
            PerspectiveKind::Number,
            PerspectiveKind::String,
            PerspectiveKind::YesNo,
            PerspectiveKind::Options,
        ] {
            assert_eq!(PerspectiveKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(PerspectiveKind::parse("boolean"), None);
    }

    #[test]
    fn conjunctive_requires_every_perspective() {
        // Filter: A(=1) must be "1" AND B(=2) must be "2".
        let rows = vec![
            row(10, 1, "1"),
            row(10, 2, "2"),
            row(11, 1, "1"), // only A set, excluded
            row(12, 2, "2"), // only B set, excluded
        ];
        let matched = members_matching_all(&rows, &[1, 2], &["1".into(), "2".into()]);
        assert_eq!(matched, vec![10]);
    }

    #[test]
    fn value_must_be_in_requested_set() {
        let rows = vec![row(10, 1, "yes"), row(11, 1, "no")];
        let matched = members_matching_all(&rows, &[1], &["yes".into()]);
        assert_eq!(matched, vec![10]);
    }

    #[test]
    fn duplicate_requested_ids_do_not_inflate_the_requirement() {
        let rows = vec![row(10, 1, "x")];
        let matched = members_matching_all(&rows, &[1, 1], &["x".into()]);
        assert_eq!(matched, vec![10]);
    }

    #[test]
    fn empty_rows_match_nobody() {
        let matched = members_matching_all(&[], &[1], &["x".into()]);
        assert!(matched.is_empty());
    }
}
