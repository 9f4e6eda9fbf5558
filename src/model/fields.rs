// File: src/model/fields.rs
// Ordered candidate-field lookup. P6 exporters disagree on field names, so
// every semantic read goes through a fixed priority list and takes the first
// present, non-null value. The lists themselves live next to the row views.
use crate::scalar::{Row, Scalar};
use chrono::NaiveDateTime;

/// First present, non-null scalar among `names`, in order.
pub fn first_scalar<'a>(row: &'a Row, names: &[&str]) -> Option<&'a Scalar> {
    names
        .iter()
        .filter_map(|n| row.get(*n))
        .find(|s| !s.is_null())
}

pub fn first_str(row: &Row, names: &[&str]) -> Option<String> {
    first_scalar(row, names).and_then(|s| match s {
        Scalar::Str(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        Scalar::Num(n) => Some(format_num(*n)),
        _ => None,
    })
}

pub fn first_num(row: &Row, names: &[&str]) -> Option<f64> {
    names.iter().find_map(|n| row.get(*n).and_then(Scalar::as_num))
}

pub fn first_id(row: &Row, names: &[&str]) -> Option<i64> {
    names.iter().find_map(|n| row.get(*n).and_then(Scalar::as_id))
}

pub fn first_date(row: &Row, names: &[&str]) -> Option<NaiveDateTime> {
    names.iter().find_map(|n| row.get(*n).and_then(Scalar::as_date))
}

fn format_num(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_first_non_null() {
        let mut row = Row::new();
        row.insert("a".into(), Scalar::Null);
        row.insert("b".into(), Scalar::Num(2.0));
        row.insert("c".into(), Scalar::Num(3.0));
        assert_eq!(first_num(&row, &["a", "b", "c"]), Some(2.0));
        assert_eq!(first_id(&row, &["missing", "c"]), Some(3));
        assert_eq!(first_num(&row, &["missing"]), None);
    }

    #[test]
    fn string_views_skip_blank() {
        let mut row = Row::new();
        row.insert("name".into(), Scalar::Str("  ".into()));
        row.insert("code".into(), Scalar::Str(" A1000 ".into()));
        assert_eq!(first_str(&row, &["name", "code"]), Some("A1000".into()));
    }
}
