//! Diagnostic rendering for mismatched outcomes.

use aotconform_core::{ArrayValue, Outcome};

/// One-line rendering of an outcome for failure messages.
#[must_use]
pub fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Unit => String::from("void"),
        Outcome::Scalar(s) => s.to_string(),
        Outcome::Array(a) => render_array(a),
        Outcome::Text(t) => format!("{t:?}"),
        Outcome::Fault(f) => format!("fault {f}"),
        Outcome::Liveness(l) => l.to_string(),
        Outcome::Weak(w) => format!("weak#{}", w.0),
    }
}

const ARRAY_PREVIEW: usize = 8;

fn render_array(array: &ArrayValue) -> String {
    if array.len() <= ARRAY_PREVIEW {
        return array.to_string();
    }
    let shown: Vec<String> = (0..ARRAY_PREVIEW).map(|i| array.render_at(i)).collect();
    format!(
        "{}{{{}, ... ({} elements)}}",
        array.descriptor(),
        shown.join(", "),
        array.len()
    )
}

/// Where two arrays of the same type first disagree.
#[must_use]
pub fn array_mismatch(expected: &ArrayValue, actual: &ArrayValue) -> String {
    if expected.len() != actual.len() {
        return format!(
            "length: expected {}, got {}",
            expected.len(),
            actual.len()
        );
    }
    match expected.first_difference(actual) {
        Some(i) => format!(
            "element {i}: expected {}, got {}",
            expected.render_at(i),
            actual.render_at(i)
        ),
        None => String::from("[identical]"),
    }
}

/// Line diff between two strings.
#[must_use]
pub fn render_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::from("[identical]");
    }

    let mut out = String::new();
    out.push_str("--- expected\n");
    out.push_str("+++ actual\n");
    let exp: Vec<&str> = expected.lines().collect();
    let act: Vec<&str> = actual.lines().collect();
    for i in 0..exp.len().max(act.len()) {
        let (e, a) = (exp.get(i), act.get(i));
        if e != a {
            out.push_str(&format!("@@ line {} @@\n", i + 1));
            if let Some(e) = e {
                out.push_str(&format!("-{e}\n"));
            }
            if let Some(a) = a {
                out.push_str(&format!("+{a}\n"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_differing_element_is_named() {
        let e = ArrayValue::Int(vec![1, 2, 3]);
        let a = ArrayValue::Int(vec![1, 5, 3]);
        assert_eq!(array_mismatch(&e, &a), "element 1: expected 2, got 5");
        assert_eq!(
            array_mismatch(&e, &ArrayValue::Int(vec![1])),
            "length: expected 3, got 1"
        );
    }

    #[test]
    fn long_arrays_are_abbreviated() {
        let rendered = render_outcome(&Outcome::Array(ArrayValue::Int((0..20).collect())));
        assert!(rendered.ends_with("... (20 elements)}"));
    }

    #[test]
    fn text_diff_reports_extra_lines() {
        let d = render_diff("a\nb", "a\nc\nd");
        assert!(d.contains("-b\n+c"));
        assert!(d.contains("@@ line 3 @@\n+d"));
        assert_eq!(render_diff("x", "x"), "[identical]");
    }
}
