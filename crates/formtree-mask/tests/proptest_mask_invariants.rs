//! Property-based invariant tests for mask formatting.
//!
//! 1. Formatting is idempotent: re-formatting formatted output is a no-op.
//! 2. `consumed` holds exactly when the output fills the mask.
//! 3. The caret never lands past the end of the formatted text.
//! 4. Digit-only masks never emit a non-digit.

use formtree_mask::{Mask, format};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn mask_strategy() -> impl Strategy<Value = Mask> {
    prop::collection::vec(
        prop_oneof![
            Just("{d}"),
            Just("{D}"),
            Just("{w}"),
            Just("{W}"),
            Just("-"),
            Just(" "),
            Just("/"),
        ],
        0..12,
    )
    .prop_map(|parts| Mask::parse(&parts.concat()))
}

fn input_strategy() -> impl Strategy<Value = String> {
    "[0-9a-zA-Z _/!-]{0,20}"
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn formatting_is_idempotent(mask in mask_strategy(), input in input_strategy()) {
        let once = format(&mask, &input, input.chars().count());
        let twice = format(&mask, &once.formatted, once.formatted.chars().count());
        prop_assert_eq!(&twice.formatted, &once.formatted);
        prop_assert_eq!(twice.consumed, once.consumed);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Consumed means filled
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn consumed_iff_filled(mask in mask_strategy(), input in input_strategy()) {
        let out = format(&mask, &input, 0);
        prop_assert_eq!(out.consumed, out.formatted.chars().count() == mask.len());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Caret bounds
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cursor_within_output(
        mask in mask_strategy(),
        input in input_strategy(),
        cursor in 0usize..25,
    ) {
        let out = format(&mask, &input, cursor);
        prop_assert!(out.cursor <= out.formatted.chars().count());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Digit masks emit digits
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn digit_masks_emit_digits(len in 0usize..10, input in input_strategy()) {
        let mask = Mask::parse(&"{d}".repeat(len));
        let out = format(&mask, &input, 0);
        prop_assert!(out.formatted.chars().all(|c| c.is_ascii_digit()));
    }
}
