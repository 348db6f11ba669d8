//! # Error Tests
//!
//! Verifies error classification and the rendered messages.

use ftbsim_core::common::{FrontendError, InstSeqNum, StreamId};

#[test]
fn sequencing_errors_are_classified() {
    let stream = StreamId::new(1);
    let sequencing = [
        FrontendError::UnsetSequence,
        FrontendError::FetchOutOfOrder {
            stream,
            seq: InstSeqNum(3),
            last: InstSeqNum(4),
        },
        FrontendError::CommitOutOfOrder {
            stream,
            seq: InstSeqNum(4),
            last: InstSeqNum(4),
        },
        FrontendError::UnknownStream(stream),
        FrontendError::DuplicateStream(stream),
    ];
    for err in &sequencing {
        assert!(err.is_sequencing(), "{err:?} should be a sequencing error");
    }
}

#[test]
fn construction_errors_are_not_sequencing() {
    let construction = [
        FrontendError::InvalidSlotCount,
        FrontendError::TooManyBranches {
            count: 3,
            capacity: 2,
        },
        FrontendError::InvertedRange {
            start: 0x20,
            end: 0x10,
        },
        FrontendError::InvalidFetchBlock,
        FrontendError::RangeTooWide {
            start: 0,
            end: u64::MAX,
            limit: 34,
        },
        FrontendError::Config("bad".into()),
    ];
    for err in &construction {
        assert!(!err.is_sequencing(), "{err:?} should not be a sequencing error");
    }
}

#[test]
fn messages_name_the_offenders() {
    let err = FrontendError::CommitOutOfOrder {
        stream: StreamId(7),
        seq: InstSeqNum(5),
        last: InstSeqNum(6),
    };
    assert_eq!(err.to_string(), "stream#7: commit of sn:5 does not follow sn:6");

    let err = FrontendError::InvertedRange {
        start: 0x2000,
        end: 0x1000,
    };
    assert_eq!(err.to_string(), "inverted fetch range [0x2000, 0x1000)");

    let err = FrontendError::TooManyBranches {
        count: 3,
        capacity: 2,
    };
    assert!(err.to_string().contains("3 branches"));

    let err = FrontendError::RangeTooWide {
        start: 0x1000,
        end: 0x1040,
        limit: 34,
    };
    assert_eq!(err.to_string(), "fetch range [0x1000, 0x1040) exceeds 34 bytes");
}

#[test]
fn json_errors_become_config_errors() {
    let json_err = serde_json::from_str::<u64>("not json").unwrap_err();
    let err = FrontendError::from(json_err);
    assert!(matches!(err, FrontendError::Config(_)));
}
