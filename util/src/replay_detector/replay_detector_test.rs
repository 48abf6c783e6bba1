use super::*;

use ReplayCheck::*;

#[test]
fn test_sliding_window_detector() {
    const LARGE_SEQ: u64 = 0x100000000000;
    const MAX_SRTP_INDEX: u64 = 0x0000FFFFFFFFFFFF;

    #[allow(clippy::type_complexity)]
    let tests: Vec<(&str, usize, u64, Vec<u64>, Vec<ReplayCheck>)> = vec![
        (
            "Continuous",
            16,
            MAX_SRTP_INDEX,
            (0..21).collect(),
            vec![Valid; 21],
        ),
        (
            "LargeJump",
            16,
            MAX_SRTP_INDEX,
            vec![0, 1, 2, 3, LARGE_SEQ, 11, LARGE_SEQ + 1, LARGE_SEQ + 2],
            vec![Valid, Valid, Valid, Valid, Valid, TooOld, Valid, Valid],
        ),
        (
            "Reordered",
            128,
            MAX_SRTP_INDEX,
            vec![
                96, 64, 16, 80, 32, 48, 8, 24, 88, 40, 128, 56, 72, 112, 104, 120,
            ],
            vec![Valid; 16],
        ),
        (
            "Old",
            100,
            MAX_SRTP_INDEX,
            vec![
                24, 32, 40, 48, 56, 64, 72, 80, 88, 96, 104, 112, 120, 128, 8, 16,
            ],
            [vec![Valid; 14], vec![TooOld, TooOld]].concat(),
        ),
        (
            "Replayed",
            8,
            MAX_SRTP_INDEX,
            vec![16, 17, 18, 19, 20, 16, 17, 25, 18, 17],
            vec![
                Valid, Valid, Valid, Valid, Valid, Duplicated, Duplicated, Valid, Duplicated,
                TooOld,
            ],
        ),
        (
            "Strict",
            0,
            MAX_SRTP_INDEX,
            vec![1, 3, 2, 4, 5],
            vec![Valid, Valid, TooOld, Valid, Valid],
        ),
        (
            "Overflow",
            128,
            MAX_SRTP_INDEX,
            vec![
                0x0000FFFFFFFFFFFE,
                0x0000FFFFFFFFFFFF,
                0x0001000000000000,
                0x0000FFFFFFFFFFFE,
            ],
            vec![Valid, Valid, TooOld, Duplicated],
        ),
        (
            "SrtcpIndexLimit",
            64,
            0x7FFFFFFF,
            vec![1, 2, 0x7FFFFFFF, 0x80000000, 2],
            vec![Valid, Valid, Valid, TooOld, TooOld],
        ),
    ];

    for (name, window_size, max_seq, input, expected) in tests {
        let mut det = SlidingWindowDetector::new(window_size, max_seq);
        let mut out = vec![];
        for seq in input {
            let res = det.check(seq);
            if res.is_valid() {
                det.accept();
            }
            out.push(res);
        }

        assert_eq!(out, expected, "{name} failed");
    }
}

#[test]
fn test_check_without_accept_leaves_window_untouched() {
    let mut det = SlidingWindowDetector::new(64, u64::MAX);

    assert_eq!(det.check(10), Valid);
    // Not accepted, so the same index is still fresh.
    assert_eq!(det.check(10), Valid);
    det.accept();
    assert_eq!(det.latest_seq(), 10);
    assert_eq!(det.check(10), Duplicated);

    // A second accept() without a fresh check is ignored.
    det.accept();
    assert_eq!(det.check(9), Valid);
}

#[test]
fn test_no_op_detector() {
    let mut det = NoOpReplayDetector;
    for _ in 0..3 {
        assert_eq!(det.check(7), Valid);
        det.accept();
    }
}
