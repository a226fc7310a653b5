//! Property tests for the severity classifier

use anxiety_core::{classify, Classifier, ClassifierError, Severity, ThresholdTable};
use proptest::prelude::*;

fn baseline() -> impl Strategy<Value = f64> {
    30.0f64..200.0
}

fn reading() -> impl Strategy<Value = f64> {
    -50.0f64..400.0
}

proptest! {
    #[test]
    fn classification_is_total_for_positive_baseline(r in reading(), b in baseline()) {
        let severity = classify(r, b).unwrap();
        prop_assert!(severity.rank() <= 4);
        prop_assert_eq!(severity.as_str().parse::<Severity>().unwrap(), severity);
    }

    #[test]
    fn severity_is_monotonic_in_reading(a in reading(), d in 0.0f64..200.0, b in baseline()) {
        let lower = classify(a, b).unwrap();
        let higher = classify(a + d, b).unwrap();
        prop_assert!(lower <= higher, "{} -> {:?}, {} -> {:?}", a, lower, a + d, higher);
    }

    #[test]
    fn non_positive_baseline_always_fails(r in reading(), b in -200.0f64..=0.0) {
        let err = classify(r, b).unwrap_err();
        prop_assert!(matches!(err, ClassifierError::InvalidBaseline { .. }), "{:?}", err);
    }

    #[test]
    fn readings_at_or_below_baseline_are_normal(b in baseline(), f in 0.0f64..=1.0) {
        prop_assert_eq!(classify(b * f, b).unwrap(), Severity::Normal);
    }

    #[test]
    fn event_iff_deviation_reaches_mild(r in reading(), b in baseline()) {
        let classifier = Classifier::default();
        let assessment = classifier.assess(r, b).unwrap();
        let mild = classifier.thresholds().mild;
        prop_assert_eq!(assessment.severity.is_event(), assessment.deviation >= mild);
    }

    #[test]
    fn valid_tables_keep_monotonicity(
        start in 0.01f64..0.5,
        steps in prop::array::uniform3(0.01f64..0.5),
        a in reading(),
        d in 0.0f64..200.0,
        b in baseline(),
    ) {
        let mild = start;
        let moderate = mild + steps[0];
        let severe = moderate + steps[1];
        let critical = severe + steps[2];
        let table = ThresholdTable::new(mild, moderate, severe, critical).unwrap();
        let classifier = Classifier::new(table).unwrap();

        let lower = classifier.classify(a, b).unwrap();
        let higher = classifier.classify(a + d, b).unwrap();
        prop_assert!(lower <= higher);
    }
}
