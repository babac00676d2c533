//! Correlating a volume's attachment handle with node attachment records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Decides whether a node attachment record refers to a volume.
pub trait AttachmentMatcher {
    /// Whether `record` (an entry of a node's attached volumes) refers to the
    /// volume identified by `handle`.
    fn matches(&self, handle: &str, record: &str) -> bool;
}

impl<F> AttachmentMatcher for F
where
    F: Fn(&str, &str) -> bool,
{
    fn matches(&self, handle: &str, record: &str) -> bool {
        self(handle, record)
    }
}

/// Built-in matching policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// The record contains the handle anywhere.
    ///
    /// CSI attachment records are named `kubernetes.io/csi/<driver>^<handle>`,
    /// so containment finds them without knowing the driver. A handle that is
    /// a substring of another volume's handle also matches that volume.
    #[default]
    Substring,

    /// The record is the handle itself, or `<prefix>^<handle>`.
    ///
    /// The prefix ends at the first `^`; driver names never contain one, but
    /// handles may.
    Exact,
}

impl AttachmentMatcher for MatchPolicy {
    fn matches(&self, handle: &str, record: &str) -> bool {
        match self {
            Self::Substring => record.contains(handle),
            Self::Exact => {
                record == handle
                    || record
                        .split_once('^')
                        .is_some_and(|(_, tail)| tail == handle)
            }
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Substring => write!(f, "substring"),
            Self::Exact => write!(f, "exact"),
        }
    }
}

impl FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "substring" => Ok(Self::Substring),
            "exact" => Ok(Self::Exact),
            other => Err(format!(
                "unknown attach match policy '{other}', expected 'substring' or 'exact'"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const CSI_RECORD: &str = "kubernetes.io/csi/ebs.csi.aws.com^vol-0abc";
    const CARET_RECORD: &str = "kubernetes.io/csi/rbd.csi.ceph.com^pool^img-1";

    #[test_case(MatchPolicy::Substring, "vol-0abc", CSI_RECORD, true ; "substring csi record")]
    #[test_case(MatchPolicy::Substring, "vol-0", CSI_RECORD, true ; "substring prefix false positive")]
    #[test_case(MatchPolicy::Substring, "vol-9", CSI_RECORD, false ; "substring miss")]
    #[test_case(MatchPolicy::Exact, "vol-0abc", CSI_RECORD, true ; "exact csi record")]
    #[test_case(MatchPolicy::Exact, "vol-0", CSI_RECORD, false ; "exact rejects prefix")]
    #[test_case(MatchPolicy::Exact, "vol-0abc", "vol-0abc", true ; "exact bare handle")]
    #[test_case(MatchPolicy::Exact, "vol-0abc", "vol-0abcd", false ; "exact rejects longer")]
    #[test_case(MatchPolicy::Exact, "pool^img-1", CARET_RECORD, true ; "exact handle containing caret")]
    #[test_case(MatchPolicy::Exact, "img-1", CARET_RECORD, false ; "exact rejects tail after last caret")]
    #[test_case(MatchPolicy::Substring, "pool^img-1", CARET_RECORD, true ; "substring handle containing caret")]
    fn policy_matches(policy: MatchPolicy, handle: &str, record: &str, expected: bool) {
        assert_eq!(policy.matches(handle, record), expected);
    }

    #[test]
    fn closure_is_a_matcher() {
        let starts_with = |handle: &str, record: &str| record.starts_with(handle);
        assert!(starts_with.matches("vol", "vol-1"));
        assert!(!starts_with.matches("vol", "x-vol"));
    }

    #[test]
    fn policy_default_is_substring() {
        assert_eq!(MatchPolicy::default(), MatchPolicy::Substring);
    }

    #[test]
    fn policy_parse() {
        assert_eq!("exact".parse::<MatchPolicy>().ok(), Some(MatchPolicy::Exact));
        assert_eq!("Substring".parse::<MatchPolicy>().ok(), Some(MatchPolicy::Substring));
        assert!("fuzzy".parse::<MatchPolicy>().is_err());
    }

    #[test]
    fn policy_display_round_trips() {
        for policy in [MatchPolicy::Substring, MatchPolicy::Exact] {
            assert_eq!(policy.to_string().parse::<MatchPolicy>().ok(), Some(policy));
        }
    }
}
