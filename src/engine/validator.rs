//! Record validation: raw scraped rows → dated matches with usable odds.
//!
//! Every raw record gets an explicit verdict so rejections can be counted
//! and inspected instead of silently vanishing.

use tracing::{debug, info, warn};

use super::error::InsufficientData;
use crate::records::{parse_match_date, MatchRecord, OddsField, RawMatchRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingDate,
    BadDate,
    MissingOdds,
    NonPositiveOdds,
    /// Positive but so small that the implied probabilities overflow.
    UnusableOdds,
}

impl RejectReason {
    fn is_date(self) -> bool {
        matches!(self, RejectReason::MissingDate | RejectReason::BadDate)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    Valid(MatchRecord),
    Rejected(RejectReason),
}

/// Tally of validator decisions for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub total: usize,
    pub valid: usize,
    pub bad_date: usize,
    pub bad_odds: usize,
}

/// Matches that passed validation, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidMatchSet {
    matches: Vec<MatchRecord>,
}

impl ValidMatchSet {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Oldest first.
    pub fn chronological(&self) -> &[MatchRecord] {
        &self.matches
    }

    /// Newest first: index 0 is the most recent match (recency rank 0).
    pub fn by_recency(&self) -> Vec<MatchRecord> {
        let mut out = self.matches.clone();
        out.reverse();
        out
    }
}

fn decimal(field: &Option<OddsField>) -> Result<f64, RejectReason> {
    let v = field
        .as_ref()
        .and_then(OddsField::as_decimal)
        .ok_or(RejectReason::MissingOdds)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(RejectReason::NonPositiveOdds)
    }
}

fn odds_triple(raw: &RawMatchRecord) -> Result<(f64, f64, f64), RejectReason> {
    let (w, d, l) = (decimal(&raw.win)?, decimal(&raw.draw)?, decimal(&raw.loss)?);
    if !(1.0 / w + 1.0 / d + 1.0 / l).is_finite() {
        return Err(RejectReason::UnusableOdds);
    }
    Ok((w, d, l))
}

/// Judge a single raw record. The date is checked before the odds.
pub fn validate_record(raw: &RawMatchRecord) -> Validation {
    let date = match raw.date.as_deref() {
        None => return Validation::Rejected(RejectReason::MissingDate),
        Some(s) => match parse_match_date(s) {
            Some(d) => d,
            None => return Validation::Rejected(RejectReason::BadDate),
        },
    };
    match odds_triple(raw) {
        Ok((host_win_odds, draw_odds, guest_win_odds)) => Validation::Valid(MatchRecord {
            date,
            host_win_odds,
            draw_odds,
            guest_win_odds,
        }),
        Err(reason) => Validation::Rejected(reason),
    }
}

/// Validate every raw record and build the ascending-by-date valid set.
///
/// Fails with `NoValidDates` when nothing carries a usable date (including
/// empty input) and `NoValidOdds` when dates parse but no record has three
/// positive odds.
pub fn validate_records(
    raw: &[RawMatchRecord],
) -> Result<(ValidMatchSet, ValidationReport), InsufficientData> {
    let mut report = ValidationReport {
        total: raw.len(),
        ..Default::default()
    };
    let mut matches = Vec::with_capacity(raw.len());

    for (i, record) in raw.iter().enumerate() {
        match validate_record(record) {
            Validation::Valid(m) => matches.push(m),
            Validation::Rejected(reason) => {
                debug!("Rejected record #{}: {:?}", i, reason);
                if reason.is_date() {
                    report.bad_date += 1;
                } else {
                    report.bad_odds += 1;
                }
            }
        }
    }
    report.valid = matches.len();

    if report.total == report.bad_date {
        return Err(InsufficientData::NoValidDates);
    }
    if matches.is_empty() {
        return Err(InsufficientData::NoValidOdds);
    }

    matches.sort_by_key(|m| m.date);
    if report.bad_date + report.bad_odds > 0 {
        warn!(
            "Excluded {} of {} records ({} bad dates, {} bad odds)",
            report.bad_date + report.bad_odds,
            report.total,
            report.bad_date,
            report.bad_odds
        );
    }
    info!(
        "Analyzing {} valid matches out of {} total matches ({} bad dates, {} bad odds)",
        report.valid, report.total, report.bad_date, report.bad_odds
    );
    Ok((ValidMatchSet { matches }, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_valid_record() {
        let v = validate_record(&RawMatchRecord::new("10.01.2022", 2.0, "3.2", 4.0));
        match v {
            Validation::Valid(m) => {
                assert_eq!(m.date, NaiveDate::from_ymd_opt(2022, 1, 10).unwrap());
                assert_eq!(m.draw_odds, 3.2);
            }
            other => panic!("expected valid, got {:?}", other),
        }
    }

    #[test]
    fn test_reject_reasons() {
        let missing_date = RawMatchRecord {
            date: None,
            ..RawMatchRecord::new("", 2.0, 3.0, 4.0)
        };
        assert_eq!(
            validate_record(&missing_date),
            Validation::Rejected(RejectReason::MissingDate)
        );
        assert_eq!(
            validate_record(&RawMatchRecord::new("not a date", 2.0, 3.0, 4.0)),
            Validation::Rejected(RejectReason::BadDate)
        );
        assert_eq!(
            validate_record(&RawMatchRecord::new("01.01.2020", 2.0, "-", 4.0)),
            Validation::Rejected(RejectReason::MissingOdds)
        );
        assert_eq!(
            validate_record(&RawMatchRecord::new("01.01.2020", 0.0, 3.0, 4.0)),
            Validation::Rejected(RejectReason::NonPositiveOdds)
        );
        assert_eq!(
            validate_record(&RawMatchRecord::new("01.01.2020", 2.0, 3.0, -1.5)),
            Validation::Rejected(RejectReason::NonPositiveOdds)
        );
    }

    #[test]
    fn test_subnormal_odds_are_unusable() {
        assert_eq!(
            validate_record(&RawMatchRecord::new("01.01.2020", 1e-320, 3.0, 4.0)),
            Validation::Rejected(RejectReason::UnusableOdds)
        );
        // each reciprocal is finite but their sum overflows
        assert_eq!(
            validate_record(&RawMatchRecord::new("01.01.2020", 1e-308, 1e-308, 1e-308)),
            Validation::Rejected(RejectReason::UnusableOdds)
        );
        let raw = vec![
            RawMatchRecord::new("01.01.2020", 1e-320, 3.0, 4.0),
            RawMatchRecord::new("02.01.2020", 2.0, 3.0, 4.0),
        ];
        let (set, report) = validate_records(&raw).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(report.bad_odds, 1);
    }

    #[test]
    fn test_empty_input_has_no_dates() {
        assert_eq!(validate_records(&[]), Err(InsufficientData::NoValidDates));
    }

    #[test]
    fn test_all_bad_dates() {
        let raw = vec![
            RawMatchRecord::new("??", 2.0, 3.0, 4.0),
            RawMatchRecord::new("", 2.0, 3.0, 4.0),
        ];
        assert_eq!(validate_records(&raw), Err(InsufficientData::NoValidDates));
    }

    #[test]
    fn test_dates_ok_but_no_odds() {
        let raw = vec![
            RawMatchRecord::new("01.01.2020", 0.0, 3.0, 4.0),
            RawMatchRecord::new("02.01.2020", 2.0, -3.0, 4.0),
        ];
        assert_eq!(validate_records(&raw), Err(InsufficientData::NoValidOdds));
    }

    #[test]
    fn test_sorted_ascending_and_counted() {
        let raw = vec![
            RawMatchRecord::new("15.03.2021", 2.0, 3.0, 4.0),
            RawMatchRecord::new("bad", 2.0, 3.0, 4.0),
            RawMatchRecord::new("01.03.2021", 1.8, 3.2, 4.5),
            RawMatchRecord::new("10.03.2021", 2.2, "x", 3.8),
        ];
        let (set, report) = validate_records(&raw).unwrap();
        assert_eq!(
            report,
            ValidationReport {
                total: 4,
                valid: 2,
                bad_date: 1,
                bad_odds: 1
            }
        );
        let dates: Vec<_> = set.chronological().iter().map(|m| m.date).collect();
        assert!(dates[0] < dates[1]);
        assert_eq!(set.by_recency()[0].date, dates[1]);
    }
}
