//! Rule-vote state machine and sweep decisions.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// What a vote request should do given the voter's existing vote.
///
/// Voting is an idempotent toggle: casting the same direction twice removes
/// the vote, casting the opposite direction flips it, a first vote creates
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOp {
    Create,
    Remove,
    Flip,
}

/// Decide the operation for a vote of direction `is_upvote` when the voter's
/// existing vote (if any) is `existing`.
pub fn toggle_vote(existing: Option<bool>, is_upvote: bool) -> VoteOp {
    match existing {
        None => VoteOp::Create,
        Some(prev) if prev == is_upvote => VoteOp::Remove,
        Some(_) => VoteOp::Flip,
    }
}

/// Upvote percentage of all votes, defined as 0 when there are no votes.
pub fn vote_percentage(upvotes: i64, downvotes: i64) -> f64 {
    let total = upvotes + downvotes;
    if total == 0 {
        return 0.0;
    }
    upvotes as f64 / total as f64 * 100.0
}

/// Whether a rule's voting window has expired at `now`.
///
/// A rule with no end date never expires. A rule with an end date but no end
/// time closes once the date is past (i.e. at the end of that day). A rule
/// with both closes once the date is past, or when the date is today and the
/// end time has been reached.
pub fn voting_expired(
    end_date: Option<NaiveDate>,
    end_time: Option<NaiveTime>,
    now: NaiveDateTime,
) -> bool {
    let Some(date) = end_date else {
        return false;
    };
    if date < now.date() {
        return true;
    }
    if date > now.date() {
        return false;
    }
    match end_time {
        Some(t) => t <= now.time(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn first_vote_creates() {
        assert_matches!(toggle_vote(None, true), VoteOp::Create);
        assert_matches!(toggle_vote(None, false), VoteOp::Create);
    }

    #[test]
    fn same_direction_removes() {
        assert_matches!(toggle_vote(Some(true), true), VoteOp::Remove);
        assert_matches!(toggle_vote(Some(false), false), VoteOp::Remove);
    }

    #[test]
    fn opposite_direction_flips() {
        assert_matches!(toggle_vote(Some(true), false), VoteOp::Flip);
        assert_matches!(toggle_vote(Some(false), true), VoteOp::Flip);
    }

    #[test]
    fn percentage_of_no_votes_is_zero() {
        assert_eq!(vote_percentage(0, 0), 0.0);
    }

    #[test]
    fn percentage_reflects_upvote_share() {
        assert_eq!(vote_percentage(3, 1), 75.0);
        assert_eq!(vote_percentage(0, 4), 0.0);
        assert_eq!(vote_percentage(2, 2), 50.0);
    }

    fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hh, mm, 0)
            .unwrap()
    }

    #[test]
    fn no_end_date_never_expires() {
        assert!(!voting_expired(None, None, at(2026, 8, 28, 12, 0)));
        assert!(!voting_expired(
            None,
            NaiveTime::from_hms_opt(9, 0, 0),
            at(2026, 8, 28, 12, 0)
        ));
    }

    #[test]
    fn past_date_expires() {
        let yesterday = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();
        assert!(voting_expired(Some(yesterday), None, at(2026, 8, 28, 0, 1)));
    }

    #[test]
    fn today_without_time_does_not_expire_yet() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 28).unwrap();
        assert!(!voting_expired(Some(today), None, at(2026, 8, 28, 23, 59)));
    }

    #[test]
    fn today_with_time_expires_at_that_time() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 28).unwrap();
        let nine = NaiveTime::from_hms_opt(9, 0, 0);
        assert!(!voting_expired(Some(today), nine, at(2026, 8, 28, 8, 59)));
        assert!(voting_expired(Some(today), nine, at(2026, 8, 28, 9, 0)));
        assert!(voting_expired(Some(today), nine, at(2026, 8, 28, 18, 30)));
    }

    #[test]
    fn future_date_does_not_expire() {
        let tomorrow = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let nine = NaiveTime::from_hms_opt(9, 0, 0);
        assert!(!voting_expired(Some(tomorrow), nine, at(2026, 8, 28, 23, 0)));
    }
}
