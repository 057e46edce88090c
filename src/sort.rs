use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::invoice::Invoice;

/// Columns a listing may be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortField {
    Number,
    Client,
    Cnpj,
    IssueDate,
    DueDate,
    Value,
    Status,
    PaymentStatus,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Number => "number",
            SortField::Client => "client",
            SortField::Cnpj => "cnpj",
            SortField::IssueDate => "issue-date",
            SortField::DueDate => "due-date",
            SortField::Value => "value",
            SortField::Status => "status",
            SortField::PaymentStatus => "payment-status",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        match normalized.as_str() {
            "number" => Ok(SortField::Number),
            "client" => Ok(SortField::Client),
            "cnpj" => Ok(SortField::Cnpj),
            "issue-date" | "issuedate" => Ok(SortField::IssueDate),
            "due-date" | "duedate" => Ok(SortField::DueDate),
            "value" => Ok(SortField::Value),
            "status" => Ok(SortField::Status),
            "payment-status" | "paymentstatus" => Ok(SortField::PaymentStatus),
            other => Err(format!("unknown sort field '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Current sort column and direction of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: SortField::IssueDate,
            direction: SortDirection::Desc,
        }
    }
}

impl SortState {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Clicking the active column flips it; any other column starts ascending.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Asc;
        }
    }
}

/// A field value as seen by the comparator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    Text(&'a str),
    Number(f64),
    Missing,
}

/// Records that can be ordered by a `SortField`
pub trait Sortable {
    fn sort_value(&self, field: SortField) -> SortValue<'_>;
}

impl Sortable for Invoice {
    fn sort_value(&self, field: SortField) -> SortValue<'_> {
        match field {
            SortField::Number => SortValue::Text(&self.invoice_number),
            SortField::Client => SortValue::Text(&self.client),
            SortField::DueDate => SortValue::Text(&self.due_date),
            SortField::Value => SortValue::Number(self.value),
            SortField::Status => SortValue::Text(self.status.as_str()),
            SortField::Cnpj | SortField::IssueDate | SortField::PaymentStatus => SortValue::Missing,
        }
    }
}

/// Compare two records by one field.
///
/// Text compares with `locale_compare`, numbers numerically. Mixed or missing
/// values compare equal, so the stable sort keeps their input order.
pub fn compare<T: Sortable>(a: &T, b: &T, state: SortState) -> Ordering {
    let ordering = match (a.sort_value(state.field), b.sort_value(state.field)) {
        (SortValue::Text(x), SortValue::Text(y)) => locale_compare(x, y),
        (SortValue::Number(x), SortValue::Number(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    };
    match state.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

pub fn sort_records<T: Sortable>(items: &mut [T], state: SortState) {
    items.sort_by(|a, b| compare(a, b, state));
}

/// Collation close to a pt-BR `localeCompare`: letters first ignoring accents
/// and case, then accents, then lowercase before uppercase.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let primary = |s: &str| -> Vec<char> {
        s.chars()
            .flat_map(char::to_lowercase)
            .map(strip_accent)
            .collect()
    };
    let secondary = |s: &str| -> Vec<char> { s.chars().flat_map(char::to_lowercase).collect() };
    let tertiary = |s: &str| -> Vec<bool> { s.chars().map(char::is_uppercase).collect() };

    primary(a)
        .cmp(&primary(b))
        .then_with(|| secondary(a).cmp(&secondary(b)))
        .then_with(|| tertiary(a).cmp(&tertiary(b)))
}

fn strip_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}
