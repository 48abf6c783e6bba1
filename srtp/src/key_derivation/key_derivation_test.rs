use super::*;
use crate::protection_profile::ProtectionProfile;

// Key Derivation Test Vectors from https://tools.ietf.org/html/rfc3711#appendix-B.3
const MASTER_KEY: [u8; 16] = [
    0xE1, 0xF9, 0x7A, 0x0D, 0x3E, 0x01, 0x8B, 0xE0, 0xD6, 0x4F, 0xA3, 0x2C, 0x06, 0xDE, 0x41, 0x39,
];
const MASTER_SALT: [u8; 14] = [
    0x0E, 0xC6, 0x75, 0xAD, 0x49, 0x8A, 0xFE, 0xEB, 0xB6, 0x96, 0x0B, 0x3A, 0xAB, 0xE6,
];

#[test]
fn test_valid_session_keys() -> Result<()> {
    let expected_session_key = vec![
        0xC6, 0x1E, 0x7A, 0x93, 0x74, 0x4F, 0x39, 0xEE, 0x10, 0x73, 0x4A, 0xFE, 0x3F, 0xF7, 0xA0,
        0x87,
    ];
    let expected_session_salt = vec![
        0x30, 0xCB, 0xBC, 0x08, 0x86, 0x3D, 0x8C, 0x85, 0xD4, 0x9D, 0xB3, 0x4A, 0x9A, 0xE1,
    ];
    let expected_session_auth_tag = vec![
        0xCE, 0xBE, 0x32, 0x1F, 0x6F, 0xF7, 0x71, 0x6B, 0x6F, 0xD4, 0xAB, 0x49, 0xAF, 0x25, 0x6A,
        0x15, 0x6D, 0x38, 0xBA, 0xA4,
    ];

    let session_key = aes_cm_key_derivation(
        LABEL_SRTP_ENCRYPTION,
        &MASTER_KEY,
        &MASTER_SALT,
        0,
        MASTER_KEY.len(),
    )?;
    assert_eq!(session_key, expected_session_key, "session key");

    let session_salt = aes_cm_key_derivation(
        LABEL_SRTP_SALT,
        &MASTER_KEY,
        &MASTER_SALT,
        0,
        MASTER_SALT.len(),
    )?;
    assert_eq!(session_salt, expected_session_salt, "session salt");

    let auth_key_len = ProtectionProfile::Aes128CmHmacSha1_80.auth_key_len();
    let session_auth_tag = aes_cm_key_derivation(
        LABEL_SRTP_AUTHENTICATION_TAG,
        &MASTER_KEY,
        &MASTER_SALT,
        0,
        auth_key_len,
    )?;
    assert_eq!(session_auth_tag, expected_session_auth_tag, "auth key");

    Ok(())
}

#[test]
fn test_labels_produce_distinct_keys() -> Result<()> {
    let rtp = aes_cm_key_derivation(LABEL_SRTP_ENCRYPTION, &MASTER_KEY, &MASTER_SALT, 0, 16)?;
    let rtcp = aes_cm_key_derivation(LABEL_SRTCP_ENCRYPTION, &MASTER_KEY, &MASTER_SALT, 0, 16)?;
    let hdr = aes_cm_key_derivation(
        LABEL_SRTP_HEADER_ENCRYPTION,
        &MASTER_KEY,
        &MASTER_SALT,
        0,
        16,
    )?;
    assert_ne!(rtp, rtcp);
    assert_ne!(rtp, hdr);
    assert_ne!(rtcp, hdr);

    Ok(())
}

#[test]
fn test_aes_256_key_derivation_lengths() -> Result<()> {
    let master_key = [0x42u8; 32];
    let master_salt = [0x17u8; 12];

    let key = aes_256_cm_key_derivation(LABEL_SRTP_ENCRYPTION, &master_key, &master_salt, 0, 32)?;
    assert_eq!(key.len(), 32);
    let salt = aes_256_cm_key_derivation(LABEL_SRTP_SALT, &master_key, &master_salt, 0, 12)?;
    assert_eq!(salt.len(), 12);

    // A longer derivation extends the same keystream.
    let long = aes_256_cm_key_derivation(LABEL_SRTP_ENCRYPTION, &master_key, &master_salt, 0, 48)?;
    assert_eq!(&long[..32], &key[..]);

    assert_eq!(
        aes_256_cm_key_derivation(LABEL_SRTP_ENCRYPTION, &MASTER_KEY, &master_salt, 0, 32),
        Err(Error::SrtpMasterKeyLength(32, 16))
    );

    Ok(())
}

// Calling the derivation with a non-zero index_over_kdr fails.
// Currently this isn't supported, but the API makes sure we can add this in the future.
#[test]
fn test_index_over_kdr() {
    let result = aes_cm_key_derivation(LABEL_SRTP_AUTHENTICATION_TAG, &MASTER_KEY, &[], 1, 0);
    assert_eq!(result, Err(Error::UnsupportedIndexOverKdr));
}

// AES-CM keystream IV layout from https://tools.ietf.org/html/rfc3711#appendix-B.2
#[test]
fn test_generate_counter() {
    let session_salt = [
        0xF0, 0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, 0xF8, 0xF9, 0xFA, 0xFB, 0xFC, 0xFD,
    ];
    let counter = generate_counter(0, 0, 0, &session_salt);
    assert_eq!(
        counter,
        [
            0xF0, 0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, 0xF8, 0xF9, 0xFA, 0xFB, 0xFC, 0xFD,
            0x00, 0x00
        ]
    );

    let counter = generate_counter(0x0102, 0x03040506, 0xCAFEBABE, &[0u8; 14]);
    assert_eq!(
        counter,
        [0, 0, 0, 0, 0xCA, 0xFE, 0xBA, 0xBE, 0x03, 0x04, 0x05, 0x06, 0x01, 0x02, 0x00, 0x00]
    );
}
