use serde::{Deserialize, Serialize};
use std::fmt;

/// SdpType describes which half of an offer/answer exchange a description is.
#[derive(Default, Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub enum SdpType {
    #[default]
    Unspecified = 0,

    /// indicates that a description MUST be treated as an SDP offer.
    Offer,

    /// indicates that a description MUST be treated as an
    /// SDP answer, but not a final answer. A description used as an SDP
    /// pranswer may be applied as a response to an SDP offer, or an update to
    /// a previously sent SDP pranswer.
    Pranswer,

    /// indicates that a description MUST be treated as an SDP
    /// final answer, and the offer-answer exchange MUST be considered complete.
    Answer,
}

const SDP_TYPE_OFFER_STR: &str = "offer";
const SDP_TYPE_PRANSWER_STR: &str = "pranswer";
const SDP_TYPE_ANSWER_STR: &str = "answer";

impl SdpType {
    /// Answers and provisional answers are treated alike by role selection.
    pub fn is_answer(&self) -> bool {
        matches!(self, SdpType::Pranswer | SdpType::Answer)
    }
}

/// creates an SdpType from a string
impl From<&str> for SdpType {
    fn from(raw: &str) -> Self {
        match raw {
            SDP_TYPE_OFFER_STR => SdpType::Offer,
            SDP_TYPE_PRANSWER_STR => SdpType::Pranswer,
            SDP_TYPE_ANSWER_STR => SdpType::Answer,
            _ => SdpType::Unspecified,
        }
    }
}

impl fmt::Display for SdpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SdpType::Offer => write!(f, "{SDP_TYPE_OFFER_STR}"),
            SdpType::Pranswer => write!(f, "{SDP_TYPE_PRANSWER_STR}"),
            SdpType::Answer => write!(f, "{SDP_TYPE_ANSWER_STR}"),
            SdpType::Unspecified => write!(f, "{}", crate::UNSPECIFIED_STR),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_new_sdp_type() {
        let tests = vec![
            ("Unspecified", SdpType::Unspecified),
            ("offer", SdpType::Offer),
            ("pranswer", SdpType::Pranswer),
            ("answer", SdpType::Answer),
            ("rollback", SdpType::Unspecified),
        ];

        for (sdp_type_string, expected_sdp_type) in tests {
            assert_eq!(expected_sdp_type, SdpType::from(sdp_type_string));
        }
    }

    #[test]
    fn test_sdp_type_string() {
        let tests = vec![
            (SdpType::Unspecified, "Unspecified"),
            (SdpType::Offer, "offer"),
            (SdpType::Pranswer, "pranswer"),
            (SdpType::Answer, "answer"),
        ];

        for (sdp_type, expected_string) in tests {
            assert_eq!(expected_string, sdp_type.to_string());
        }
    }

    #[test]
    fn test_sdp_type_is_answer() {
        assert!(!SdpType::Offer.is_answer());
        assert!(SdpType::Pranswer.is_answer());
        assert!(SdpType::Answer.is_answer());
        assert!(!SdpType::Unspecified.is_answer());
    }
}
