//! CSV reports for one hashtag run.
//!
//! `users_<tag>.csv` holds every record followed by a `RUNTIME` row;
//! `users_<tag>_influencers.csv` holds the rows that pass the follower and
//! contact filter.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use igscout_core::{Field, ProfileRecord};
use igscout_scraper::HashtagRun;

pub(crate) const HEADER: [&str; 7] = [
    "User",
    "Followers",
    "Following",
    "Posts",
    "Email",
    "URL",
    "Hashtag",
];

const RUNTIME_LABEL: &str = "RUNTIME";

/// Paths written for one run.
#[derive(Debug)]
pub(crate) struct ReportPaths {
    pub users: PathBuf,
    pub influencers: PathBuf,
}

/// Write both reports for `run` into `dir`.
///
/// # Errors
///
/// Returns an error if either file cannot be written.
pub(crate) fn write_reports(
    dir: &Path,
    run: &HashtagRun,
    min_followers: f64,
    max_followers: f64,
) -> anyhow::Result<ReportPaths> {
    let stem = file_stem(&run.hashtag);
    let users = dir.join(format!("users_{stem}.csv"));
    let influencers = dir.join(format!("users_{stem}_influencers.csv"));

    std::fs::write(&users, render_users(&run.records, run.elapsed))
        .with_context(|| format!("writing {}", users.display()))?;

    let selected = select_influencers(&run.records, min_followers, max_followers);
    std::fs::write(&influencers, render_rows(selected))
        .with_context(|| format!("writing {}", influencers.display()))?;

    Ok(ReportPaths { users, influencers })
}

/// Every record plus the trailing runtime row.
pub(crate) fn render_users(records: &[ProfileRecord], elapsed: Duration) -> String {
    let mut out = render_rows(records);
    let seconds = format_number(elapsed.as_secs_f64());
    let runtime = [RUNTIME_LABEL, seconds.as_str(), "0", "0", "0", "0", "0"];
    push_row(&mut out, runtime);
    out
}

/// Header followed by one row per record.
pub(crate) fn render_rows<'a>(records: impl IntoIterator<Item = &'a ProfileRecord>) -> String {
    let mut out = String::new();
    push_row(&mut out, HEADER);
    for record in records {
        push_row(&mut out, record_fields(record));
    }
    out
}

/// Records with followers strictly inside `(min, max)` and at least one
/// contact address.
pub(crate) fn select_influencers(
    records: &[ProfileRecord],
    min_followers: f64,
    max_followers: f64,
) -> Vec<&ProfileRecord> {
    records
        .iter()
        .filter(|record| {
            let in_range = record
                .followers
                .as_value()
                .is_some_and(|f| *f > min_followers && *f < max_followers);
            in_range && !record.email_list().is_empty()
        })
        .collect()
}

fn record_fields(record: &ProfileRecord) -> [String; 7] {
    [
        text_field(&record.username),
        count_field(&record.followers),
        count_field(&record.following),
        count_field(&record.posts),
        text_field(&record.emails),
        text_field(&record.profile_url),
        text_field(&record.hashtag),
    ]
}

fn text_field(field: &Field<String>) -> String {
    field.to_string()
}

fn count_field(field: &Field<f64>) -> String {
    match field {
        Field::Value(v) => format_number(*v),
        Field::Unavailable => field.to_string(),
    }
}

/// Floats always carry a fractional part (`2500.0`, `1.25`).
fn format_number(value: f64) -> String {
    format!("{value:?}")
}

fn push_row<S: AsRef<str>>(out: &mut String, fields: impl IntoIterator<Item = S>) {
    for (index, field) in fields.into_iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(&quote(field.as_ref()));
    }
    out.push('\n');
}

fn quote(field: &str) -> std::borrow::Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\"")).into()
    } else {
        field.into()
    }
}

/// Hashtag made safe for use inside a file name.
fn file_stem(hashtag: &str) -> String {
    hashtag
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
