//! Free-text import of leave requests.
//!
//! Staff paste loosely formatted blocks like
//!
//! ```text
//! Situs : TYVOTO
//! Perihal : Pengajuan Cuti Ambil Paspor
//! No Paspor : C0629TTR
//! Tanggal Pengajuan : 2 December - 16 December 2025
//! Keterangan : CUTI INDONESIA
//! ACC LDR : BUFON
//! ```
//!
//! Each line runs through a set of independent label rules. Lines carrying a date span are
//! collected separately and merged into one overall range once all lines are seen.

pub mod date_range;
pub mod division;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::division::Division;
use date_range::{is_dash, parse_staged_range};
use division::infer_division;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParsedLeaveData {
    pub situs: Option<String>,
    pub perihal: Option<String>,
    pub no_paspor: Option<String>,
    /// staff name
    pub nama: Option<String>,
    /// raw date span as written, possibly merged from several lines
    pub tanggal_pengajuan: Option<String>,
    #[schema(value_type = Option<String>, format = "date")]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = "date")]
    pub end_date: Option<NaiveDate>,
    pub keterangan: Option<String>,
    pub acc_ldr: Option<String>,
    pub division: Option<Division>,
}

impl ParsedLeaveData {
    /// Enough was recognised to treat the text as a leave template.
    pub fn is_recognised(&self) -> bool {
        self.situs.is_some() || self.perihal.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Situs,
    Perihal,
    NoPaspor,
    Nama,
    Keterangan,
    AccLdr,
}

struct LineRule {
    field: Field,
    applies: fn(&str) -> bool,
    pattern: Regex,
}

impl LineRule {
    fn new(field: Field, applies: fn(&str) -> bool, pattern: &str) -> Self {
        Self {
            field,
            applies,
            pattern: Regex::new(pattern).expect("valid line rule regex"),
        }
    }

    fn extract(&self, line: &str, lower: &str) -> Option<String> {
        if !(self.applies)(lower) {
            return None;
        }
        let value = self.pattern.captures(line)?.get(1)?.as_str().trim();
        self.accepts(value).then(|| value.to_string())
    }

    fn accepts(&self, value: &str) -> bool {
        match self.field {
            // templates often echo the label or a dash instead of a number
            Field::NoPaspor => {
                let lower = value.to_lowercase();
                !value.is_empty() && lower != "-" && lower != "no paspor"
            }
            Field::AccLdr => !value.to_lowercase().contains("acc"),
            _ => true,
        }
    }
}

static LINE_RULES: Lazy<Vec<LineRule>> = Lazy::new(|| {
    vec![
        LineRule::new(
            Field::Situs,
            |l| l.contains("situs"),
            r"(?i)situs\s*:\s*(.+?)$",
        ),
        LineRule::new(
            Field::Perihal,
            |l| l.contains("perihal"),
            r"(?i)perihal\s*:\s*(.+?)$",
        ),
        LineRule::new(
            Field::NoPaspor,
            |l| l.contains("no paspor") || l.contains("no.paspor"),
            r"(?i)(?:no\.?\s*paspor|nomor\s*paspor)\s*:\s*(.+?)$",
        ),
        LineRule::new(
            Field::Nama,
            |l| l.contains("nama staff"),
            r"(?i)nama\s*staff\s*:\s*(.+?)$",
        ),
        LineRule::new(
            Field::Keterangan,
            |l| l.contains("keterangan"),
            r"(?i)keterangan\s*:\s*(.+?)$",
        ),
        LineRule::new(
            Field::AccLdr,
            |l| l.contains("acc ldr") || (l.contains("acc") && !l.contains("cuti")),
            r"(?i)acc\s*(?:ldr)?\s*:\s*(.+?)$",
        ),
    ]
});

static CUTI_TYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)cuti\s+(\w+)").expect("valid cuti type regex"));

static DATE_TEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":\s*(.+?)(?:\s*\(|$)").expect("valid date text regex"));

static DAY_COUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*\(\s*\d+\s*(?:hari|day)s?\s*\)\s*").expect("valid day count regex")
});

static RANGE_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s+(\w+)(?:\s+(\d{4}))?$").expect("valid range end regex"));

/// One "CUTI <TYPE> ... : <range>" line.
#[derive(Debug, Clone, PartialEq)]
struct DateSegment {
    kind: String,
    text: String,
}

impl DateSegment {
    fn label(&self) -> String {
        format!("CUTI {}", self.kind)
    }
}

fn date_segment(line: &str, lower: &str) -> Option<DateSegment> {
    if !(lower.contains("tanggal") || lower.contains("pada")) || !line.contains(is_dash) {
        return None;
    }

    let kind = CUTI_TYPE_RE
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_uppercase())
        .unwrap_or_else(|| "CUTI".to_string());

    let raw = DATE_TEXT_RE.captures(line)?.get(1)?.as_str().trim();
    let text = DAY_COUNT_RE.replace_all(raw, "").trim().to_string();

    (!text.is_empty()).then_some(DateSegment { kind, text })
}

/// Overall range text and the default remarks for the collected segments.
fn consolidate(segments: &[DateSegment]) -> Option<(String, String)> {
    let (first, last) = match segments {
        [] => return None,
        [only] => return Some((only.text.clone(), only.label())),
        [first, .., last] => (first, last),
    };

    let range = if RANGE_END_RE.is_match(&last.text) {
        let start = first.text.split(is_dash).next().unwrap_or_default().trim();
        let end = last
            .text
            .split(is_dash)
            .nth(1)
            .map(str::trim)
            .unwrap_or(last.text.as_str());
        format!("{} - {}", start, end)
    } else {
        first.text.clone()
    };

    let mut labels: Vec<String> = Vec::new();
    for label in segments.iter().map(DateSegment::label) {
        if !labels.contains(&label) {
            labels.push(label);
        }
    }

    Some((range, labels.join(", ")))
}

/// Extract whatever leave fields can be recognised in `text`. Never fails; fields that were not
/// found stay `None`. `today` supplies the year for dates written without one.
pub fn parse_leave_text(text: &str, today: NaiveDate) -> ParsedLeaveData {
    let mut data = ParsedLeaveData::default();
    let mut segments = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let lower = line.to_lowercase();

        for rule in LINE_RULES.iter() {
            if let Some(value) = rule.extract(line, &lower) {
                let slot = match rule.field {
                    Field::Situs => &mut data.situs,
                    Field::Perihal => &mut data.perihal,
                    Field::NoPaspor => &mut data.no_paspor,
                    Field::Nama => &mut data.nama,
                    Field::Keterangan => &mut data.keterangan,
                    Field::AccLdr => &mut data.acc_ldr,
                };
                *slot = Some(value);
            }
        }

        if let Some(segment) = date_segment(line, &lower) {
            segments.push(segment);
        }
    }

    if let Some((range, remarks)) = consolidate(&segments) {
        if data.keterangan.is_none() {
            data.keterangan = Some(remarks);
        }
        if let Some((start, end)) = parse_staged_range(&range, today) {
            data.start_date = Some(start);
            data.end_date = Some(end);
        }
        data.tanggal_pengajuan = Some(range);
    }

    data.division = infer_division(text);

    tracing::debug!(
        date_lines = segments.len(),
        recognised = data.is_recognised(),
        division = ?data.division,
        "Parsed pasted leave text"
    );

    data
}
