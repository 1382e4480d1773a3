//! Testable property 7 (spec section 8): every emitted MAW `aVb` satisfies
//! "V right-maximal, aV occurs, Vb occurs, aVb absent" against the
//! original text, checked by brute-force substring search.

mod support;

use support::run_maws;

fn occurs(text: &str, pattern: &str) -> bool {
    pattern.is_empty() || text.contains(pattern)
}

#[test]
fn every_emitted_maw_satisfies_the_absent_word_property() {
    for text in ["acacaca", "acgtacgt", "aaaatttt", "acgtnacgtn"] {
        let text_upper = text.to_uppercase();
        let maws = run_maws(text);
        assert!(!maws.is_empty(), "expected at least one MAW for {text}");
        for (a, v, b) in &maws {
            let av = format!("{a}{v}");
            let vb = format!("{v}{b}");
            let avb = format!("{a}{v}{b}");
            assert!(occurs(&text_upper, &av), "{av} (= a.V) should occur in {text}");
            assert!(occurs(&text_upper, &vb), "{vb} (= V.b) should occur in {text}");
            assert!(!text_upper.contains(&avb), "{avb} should be absent from {text}");
        }
    }
}

#[test]
fn acgt_text_has_no_maw_shorter_than_two() {
    let maws = run_maws("acgt");
    for (a, v, b) in &maws {
        assert!(a.len() == 1 && b.len() == 1);
        assert!(v.len() + 2 >= 2);
    }
}
