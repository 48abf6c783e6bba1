use super::*;

#[test]
fn test_fixed_big_int_shift_and_set() {
    let mut bi = FixedBigInt::new(224);

    let steps: Vec<(&str, usize, &str)> = vec![
        (
            "set",
            0,
            "0000000000000000000000000000000000000000000000000000000000000001",
        ),
        (
            "lsh",
            1,
            "0000000000000000000000000000000000000000000000000000000000000002",
        ),
        (
            "lsh",
            0,
            "0000000000000000000000000000000000000000000000000000000000000002",
        ),
        (
            "set",
            10,
            "0000000000000000000000000000000000000000000000000000000000000402",
        ),
        (
            "lsh",
            20,
            "0000000000000000000000000000000000000000000000000000000040200000",
        ),
        (
            "set",
            80,
            "0000000000000000000000000000000000000000000100000000000040200000",
        ),
        (
            "lsh",
            4,
            "0000000000000000000000000000000000000000001000000000000402000000",
        ),
        (
            "set",
            130,
            "0000000000000000000000000000000400000000001000000000000402000000",
        ),
        (
            "lsh",
            64,
            "0000000000000004000000000010000000000004020000000000000000000000",
        ),
        (
            "set",
            7,
            "0000000000000004000000000010000000000004020000000000000000000080",
        ),
        (
            "lsh",
            129,
            "0000000004000000000000000000010000000000000000000000000000000000",
        ),
    ];

    for (op, arg, expected) in steps {
        match op {
            "set" => bi.set_bit(arg),
            _ => bi.lsh(arg),
        }
        assert_eq!(bi.to_string(), expected, "{op}({arg})");
    }

    for _ in 0..256 {
        bi.lsh(1);
        bi.set_bit(0);
    }
    assert_eq!(
        bi.to_string(),
        "00000000FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF"
    );
}

#[test]
fn test_fixed_big_int_shift_past_width_clears() {
    let mut bi = FixedBigInt::new(64);
    bi.set_bit(0);
    bi.set_bit(63);
    assert_eq!(bi.bit(63), 1);

    bi.lsh(64);
    assert_eq!(bi.to_string(), "0000000000000000");
    assert_eq!(bi.bit(0), 0);
}

#[test]
fn test_fixed_big_int_out_of_range_bits() {
    let mut bi = FixedBigInt::new(100);
    bi.set_bit(100);
    assert_eq!(bi.bit(100), 0);
    assert_eq!(bi.to_string(), "00000000000000000000000000000000");

    bi.set_bit(99);
    bi.lsh(1);
    assert_eq!(bi.bit(99), 0);
}
