//! Report renderers and ordering for classified tenders.
//!
//! - [`terminal`] — colored tables for tenders, per-unit evidence, deadline
//!   statistics and keyword lists.

pub mod terminal;

use std::cmp::Ordering;

use crate::models::ClassifiedTender;
use crate::stats::parse_deadline;

/// Column a tender table can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortField {
    None,
    Score,
    Deadline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Order tenders in place. `None` keeps server order; tenders with an
/// unparseable deadline always sort after dated ones.
pub fn sort_tenders(rows: &mut [ClassifiedTender], field: SortField, direction: SortDirection) {
    let directed = |ord: Ordering| match direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    };

    match field {
        SortField::None => {}
        SortField::Score => rows.sort_by(|a, b| {
            directed(a.tender.score.total_cmp(&b.tender.score))
        }),
        SortField::Deadline => rows.sort_by(|a, b| {
            match (parse_deadline(&a.tender.deadline), parse_deadline(&b.tender.deadline)) {
                (Some(x), Some(y)) => directed(x.cmp(&y)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }),
    }
}
