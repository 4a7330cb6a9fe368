//! Copy-count extraction from free-text captions.
//!
//! The first run of ASCII digits wins. A `copies`/`copies:`/`copies=`/`x`
//! label in front or a `copy`/`copies` word after it is tolerated but not
//! required, so `3 copies`, `copies: 5`, `x3`, `copies=5` and `7` all parse.
//! Anything above the ceiling is reduced to the ceiling; [`apply_policy`]
//! turns that into a rejection when the reject policy is configured.

use once_cell::sync::Lazy;
use regex::Regex;
use telefax_core::{CopyLimitPolicy, TelefaxError};

/// Label and suffix contain no digits, so group 1 is always the first digit run.
static COPIES_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:\bcopies\s*[:=]?\s*|\bx\s*)?([0-9]+)(?:\s*cop(?:y|ies)\b)?").unwrap()
});

/// How a caption was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyResolution {
    /// Number found in the caption, saturated at `u64::MAX`. `None` if there was none.
    pub requested: Option<u64>,
    /// Final count, `1..=max_copies`.
    pub copies: u32,
    /// The request exceeded the ceiling and was reduced.
    pub clamped: bool,
}

/// Read a copy count from `caption`, clamped to `1..=max_copies`.
pub fn resolve(caption: Option<&str>, max_copies: u32) -> CopyResolution {
    let max_copies = max_copies.max(1);
    let requested = caption
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .and_then(|c| COPIES_PATTERN.captures(c))
        .and_then(|caps| caps.get(1))
        // Only overflow can fail here.
        .map(|digits| digits.as_str().parse::<u64>().unwrap_or(u64::MAX));

    let Some(value) = requested else {
        return CopyResolution {
            requested: None,
            copies: 1,
            clamped: false,
        };
    };

    let clamped = value > max_copies as u64;
    let copies = value.clamp(1, max_copies as u64) as u32;
    CopyResolution {
        requested: Some(value),
        copies,
        clamped,
    }
}

/// Copy count for `caption`. Never fails.
pub fn resolve_copies(caption: Option<&str>, max_copies: u32) -> u32 {
    resolve(caption, max_copies).copies
}

/// Enforce the configured policy on a resolution.
pub fn apply_policy(
    resolution: &CopyResolution,
    policy: CopyLimitPolicy,
    max_copies: u32,
) -> Result<u32, TelefaxError> {
    match (policy, resolution.clamped, resolution.requested) {
        (CopyLimitPolicy::Reject, true, Some(requested)) => Err(TelefaxError::CopyLimitExceeded {
            requested,
            max: max_copies,
        }),
        _ => Ok(resolution.copies),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_caption_is_one() {
        assert_eq!(resolve_copies(None, 100), 1);
        assert_eq!(resolve_copies(Some(""), 100), 1);
        assert_eq!(resolve_copies(Some("   "), 100), 1);
    }

    #[test]
    fn captions_without_digits_are_one() {
        for caption in ["copies", "print this please", "x", "copies: many", "🖨️", "٣ copies"] {
            assert_eq!(resolve_copies(Some(caption), 100), 1, "caption {caption:?}");
        }
    }

    #[test]
    fn accepts_common_formats() {
        assert_eq!(resolve_copies(Some("3 copies"), 100), 3);
        assert_eq!(resolve_copies(Some("copies: 5"), 100), 5);
        assert_eq!(resolve_copies(Some("Copies=6"), 100), 6);
        assert_eq!(resolve_copies(Some("x4"), 100), 4);
        assert_eq!(resolve_copies(Some("7"), 100), 7);
        assert_eq!(resolve_copies(Some("1 copy"), 100), 1);
        assert_eq!(resolve_copies(Some("please make 2 copies for the fridge"), 100), 2);
    }

    #[test]
    fn n_copies_returns_n_up_to_ceiling() {
        for n in 1..=25u32 {
            assert_eq!(resolve_copies(Some(&format!("{n} copies")), 25), n);
        }
    }

    #[test]
    fn first_digit_run_wins() {
        assert_eq!(resolve_copies(Some("2 copies of 4x6"), 100), 2);
        assert_eq!(resolve_copies(Some("trip 2024, 3 copies"), 10_000), 2024);
    }

    #[test]
    fn zero_is_raised_to_one() {
        let res = resolve(Some("0 copies"), 100);
        assert_eq!(res.copies, 1);
        assert_eq!(res.requested, Some(0));
        assert!(!res.clamped);
    }

    #[test]
    fn above_ceiling_is_clamped() {
        let res = resolve(Some("copies: 150"), 100);
        assert_eq!(res.copies, 100);
        assert!(res.clamped);
        assert_eq!(res.requested, Some(150));

        for n in [101u64, 1_000, 4_294_967_296] {
            assert_eq!(resolve_copies(Some(&format!("{n} copies")), 100), 100);
        }
    }

    #[test]
    fn huge_digit_runs_saturate() {
        let res = resolve(Some("99999999999999999999999999 copies"), 50);
        assert_eq!(res.requested, Some(u64::MAX));
        assert_eq!(res.copies, 50);
    }

    #[test]
    fn clamp_policy_keeps_reduced_count() {
        let res = resolve(Some("20 copies"), 10);
        assert_eq!(apply_policy(&res, CopyLimitPolicy::Clamp, 10).unwrap(), 10);
    }

    #[test]
    fn reject_policy_refuses_oversized_requests() {
        let res = resolve(Some("20 copies"), 10);
        assert!(matches!(
            apply_policy(&res, CopyLimitPolicy::Reject, 10),
            Err(TelefaxError::CopyLimitExceeded { requested: 20, max: 10 })
        ));

        let within = resolve(Some("10 copies"), 10);
        assert_eq!(apply_policy(&within, CopyLimitPolicy::Reject, 10).unwrap(), 10);
    }
}
