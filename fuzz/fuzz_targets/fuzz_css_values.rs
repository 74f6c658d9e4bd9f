#![no_main]

use paneview_backend::parse_px;
use paneview_core::animation::{Easing, Transform, TransitionSpec};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 512 {
        return;
    }

    // Parsers must never panic, and whatever they accept must survive a
    // render / parse cycle.
    if let Some(transform) = Transform::parse(text) {
        let again = Transform::parse(&transform.to_css());
        if !matches!(transform, Transform::Translate(_, v) if v.is_nan()) {
            assert_eq!(again, Some(transform), "transform {text:?}");
        }
    }

    if let Some(easing) = Easing::parse(text) {
        assert!(Easing::parse(&easing.to_css()).is_some(), "easing {text:?}");
        for t in [0.0, 0.25, 0.5, 1.0] {
            let _ = easing.apply(t);
        }
    }

    if let Some(spec) = TransitionSpec::parse(text) {
        let again = TransitionSpec::parse(&spec.to_css());
        assert_eq!(
            again.map(|s| s.property),
            Some(spec.property),
            "transition {text:?}"
        );
    }

    let _ = parse_px(text);
});
