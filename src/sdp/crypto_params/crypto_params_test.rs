use super::*;

const KEY_40: &str = "inline:WVNfX19zZW1jdGwgKCkgewkyMjA7fQp9CnVubGVz";
const KEY_40_OTHER: &str = "inline:d0RmdmcmVCspeEc3QGZiNWpVLFJhQX1cfHAwJSoj";

#[test]
fn test_parse_crypto_line() {
    let line =
        "a=crypto:1 AES_CM_128_HMAC_SHA1_80 inline:WVNfX19zZW1jdGwgKCkgewkyMjA7fQp9CnVubGVz|2^20|1:4 KDR=1 UNENCRYPTED_SRTCP";
    let params: CryptoParams = line.parse().unwrap();

    assert_eq!(params.tag, 1);
    assert_eq!(params.cipher_suite, "AES_CM_128_HMAC_SHA1_80");
    assert_eq!(
        params.key_params,
        "inline:WVNfX19zZW1jdGwgKCkgewkyMjA7fQp9CnVubGVz|2^20|1:4"
    );
    assert_eq!(params.session_params, "KDR=1 UNENCRYPTED_SRTCP");
    assert_eq!(
        params.to_string(),
        line.trim_start_matches("a=crypto:"),
        "formatting gives back the attribute value"
    );

    let bare: CryptoParams = format!("2 AES_CM_128_HMAC_SHA1_32 {KEY_40}").parse().unwrap();
    assert_eq!(bare.tag, 2);
    assert!(bare.session_params.is_empty());
}

#[test]
fn test_parse_crypto_line_errors() {
    let tests = vec![
        ("missing key", "a=crypto:1 AES_CM_128_HMAC_SHA1_80"),
        ("bad tag", "a=crypto:x AES_CM_128_HMAC_SHA1_80 inline:AAAA"),
        ("negative tag", "a=crypto:-1 AES_CM_128_HMAC_SHA1_80 inline:AAAA"),
        ("not inline", "a=crypto:1 AES_CM_128_HMAC_SHA1_80 uri:https://key"),
    ];

    for (name, line) in tests {
        assert!(
            matches!(
                line.parse::<CryptoParams>(),
                Err(Error::InvalidCryptoParams(_))
            ),
            "{name} should be rejected"
        );
    }
}

#[test]
fn test_decode_key_params() {
    let params = CryptoParams::new(1, "AES_CM_128_HMAC_SHA1_80", &format!("{KEY_40_OTHER}|2^31"));
    let (profile, key, salt) = params.decode_key_params().unwrap();

    assert_eq!(profile, ProtectionProfile::Aes128CmHmacSha1_80);
    assert_eq!(key, b"wDfvg&T+)xG7@fb5".to_vec());
    assert_eq!(salt, b"jU,RaA}\\|p0%*#".to_vec());
}

#[test]
fn test_decode_key_params_errors() {
    let tests = vec![
        (
            "unknown suite",
            CryptoParams::new(1, "NULL_HMAC_SHA1_80", KEY_40),
        ),
        (
            "missing inline prefix",
            CryptoParams::new(1, "AES_CM_128_HMAC_SHA1_80", &KEY_40[7..]),
        ),
        (
            "too short",
            CryptoParams::new(1, "AES_CM_128_HMAC_SHA1_80", "inline:WVNfX19zZW1jdGwgKCkgewkyMjA7fQp9"),
        ),
        (
            "too long",
            CryptoParams::new(
                1,
                "AES_CM_128_HMAC_SHA1_80",
                "inline:WVNfX19zZW1jdGwgKCkgewkyMjA7fQp9CnVubGVzAAAA",
            ),
        ),
        (
            "non alphabet character",
            CryptoParams::new(
                1,
                "AES_CM_128_HMAC_SHA1_80",
                "inline:WVNfX19zZW1jdGwgKCkgewkyMjA7fQp9CnVub*Vz",
            ),
        ),
        (
            "gcm needs a longer key",
            CryptoParams::new(1, "AEAD_AES_256_GCM", KEY_40),
        ),
    ];

    for (name, params) in tests {
        assert!(
            matches!(
                params.decode_key_params(),
                Err(Error::InvalidCryptoParams(_))
            ),
            "{name} should be rejected"
        );
    }
}

#[test]
fn test_crypto_params_matches() {
    let offered = CryptoParams::new(1, "AES_CM_128_HMAC_SHA1_80", KEY_40);

    assert!(offered.matches(&CryptoParams::new(1, "AES_CM_128_HMAC_SHA1_80", KEY_40_OTHER)));
    assert!(!offered.matches(&CryptoParams::new(2, "AES_CM_128_HMAC_SHA1_80", KEY_40_OTHER)));
    assert!(!offered.matches(&CryptoParams::new(1, "AES_CM_128_HMAC_SHA1_32", KEY_40_OTHER)));
    assert!(!offered.matches(&CryptoParams::new(1, "AES_CM_128_HMAC_SHA1_80", "inline:AAAA")));
}

#[test]
fn test_generate_crypto_params() {
    for profile in ProtectionProfile::ALL {
        let params = CryptoParams::generate(7, profile);
        assert_eq!(params.tag, 7);
        assert_eq!(params.profile(), Some(profile));

        let (decoded_profile, key, salt) = params.decode_key_params().unwrap();
        assert_eq!(decoded_profile, profile);
        assert_eq!(key.len(), profile.key_len(), "{profile}");
        assert_eq!(salt.len(), profile.salt_len(), "{profile}");
    }

    let a = CryptoParams::generate(1, ProtectionProfile::Aes128CmHmacSha1_80);
    let b = CryptoParams::generate(1, ProtectionProfile::Aes128CmHmacSha1_80);
    assert_ne!(a.key_params, b.key_params);
}
