//! Interned strings: identity, and liveness across a full collection.

use aotconform_abi::Arg;
use aotconform_core::{Outcome, Scalar};
use aotconform_core::interning::{self, COMPUTED_HALF, StringOrigin};

use crate::case::{TestCase, TestSuite};

pub(super) fn suite() -> TestSuite {
    let mut s = TestSuite::new("interning");

    // Only the intern table refers to a computed string once the routine
    // returns, so it must not survive a collection.
    s.push(
        TestCase::observe("weak_computed_collected", "Interned.weakComputed")
            .expect(|| interning::expected_liveness(StringOrigin::Computed).into()),
    );
    s.push(
        TestCase::observe("weak_literal_survives", "Interned.weakLiteral")
            .expect(|| interning::expected_liveness(StringOrigin::Literal).into()),
    );

    s.push(
        TestCase::call("intern_twice_same", "Interned.internTwiceSame", Vec::new())
            .expect(|| Scalar::Bool(true).into()),
    );
    s.push(
        TestCase::call("intern_matches_literal", "Interned.internMatchesLiteral", Vec::new())
            .expect(|| Scalar::Bool(true).into()),
    );

    for (name, a, b) in [
        ("concat_halves", COMPUTED_HALF, COMPUTED_HALF),
        ("concat_empty", "", "tail"),
        ("concat_non_ascii", "gr\u{fc}\u{df}", " \u{3b1}\u{3b2}"),
    ] {
        s.push(
            TestCase::call(
                name,
                "Interned.concat",
                vec![Arg::Text(a.into()), Arg::Text(b.into())],
            )
            .expect(move || Outcome::Text(interning::concat(a, b))),
        );
    }
    s
}
