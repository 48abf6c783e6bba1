use super::*;

const CIPHER_CONTEXT_ALGO: ProtectionProfile = ProtectionProfile::Aes128CmHmacSha1_80;
const DEFAULT_SSRC: u32 = 0xDEADBEEF;

const MASTER_KEY: [u8; 16] = [
    0x0d, 0xcd, 0x21, 0x3e, 0x4c, 0xbc, 0xf2, 0x8f, 0x01, 0x7f, 0x69, 0x94, 0x40, 0x1e, 0x28, 0x89,
];
const MASTER_SALT: [u8; 14] = [
    0x62, 0x77, 0x60, 0x38, 0xc0, 0x6d, 0xc9, 0x41, 0x9f, 0x6d, 0xd9, 0x43, 0x3e, 0x7c,
];

fn rtp_packet(seq: u16, payload: &[u8]) -> Vec<u8> {
    let mut pkt = vec![0x80, 0x00];
    pkt.extend_from_slice(&seq.to_be_bytes());
    pkt.extend_from_slice(&[0, 0, 0, 1]);
    pkt.extend_from_slice(&DEFAULT_SSRC.to_be_bytes());
    pkt.extend_from_slice(payload);
    pkt
}

fn rtcp_packet() -> Vec<u8> {
    let mut pkt = vec![0x81, 0xC9, 0x00, 0x07];
    pkt.extend_from_slice(&DEFAULT_SSRC.to_be_bytes());
    pkt.extend_from_slice(&[0xBC, 0x5E, 0x9A, 0x40, 0, 0, 0, 0, 0, 0, 0x46, 0x2C]);
    pkt.extend_from_slice(&[0; 12]);
    pkt
}

fn pair(profile: ProtectionProfile) -> (Context, Context) {
    let key = vec![0x11; profile.key_len()];
    let salt = vec![0x22; profile.salt_len()];
    let encrypt = Context::new(&key, &salt, profile, None, None).unwrap();
    let decrypt = Context::new(
        &key,
        &salt,
        profile,
        Some(srtp_replay_protection(DEFAULT_REPLAY_WINDOW_SIZE)),
        Some(srtcp_replay_protection(DEFAULT_REPLAY_WINDOW_SIZE)),
    )
    .unwrap();
    (encrypt, decrypt)
}

fn protect(ctx: &mut Context, plain: &[u8]) -> Vec<u8> {
    let mut buf = plain.to_vec();
    buf.resize(plain.len() + 16, 0);
    let (n, _) = ctx.encrypt_rtp(&mut buf, plain.len()).unwrap();
    buf.truncate(n);
    buf
}

#[test]
fn test_key_len() {
    let result = Context::new(&[], &[0; 14], CIPHER_CONTEXT_ALGO, None, None);
    assert_eq!(
        result.err(),
        Some(Error::SrtpMasterKeyLength(16, 0)),
        "CreateContext accepted a 0 length key"
    );

    let result = Context::new(&[0; 16], &[], CIPHER_CONTEXT_ALGO, None, None);
    assert_eq!(
        result.err(),
        Some(Error::SrtpSaltLength(14, 0)),
        "CreateContext accepted a 0 length salt"
    );

    let result = Context::new(&[0; 16], &[0; 14], CIPHER_CONTEXT_ALGO, None, None);
    assert!(
        result.is_ok(),
        "CreateContext failed with a valid length key and salt"
    );
}

#[test]
fn test_rollover_count() {
    let mut s = SrtpSsrcState::default();

    // Set initial seqnum
    s.update_rollover_count(65530);

    // We hit exactly MAX_SEQUENCE_NUMBER
    s.update_rollover_count(0);
    assert_eq!(
        s.rollover_counter, 1,
        "rolloverCounter was not updated after it crossed 0"
    );

    // We skipped a ROC
    s.update_rollover_count(65530);
    assert_eq!(
        s.rollover_counter, 0,
        "rolloverCounter was not updated when it rolled back, failed to handle out of order"
    );

    // We went back to ROC 1
    s.update_rollover_count(5);
    assert_eq!(
        s.rollover_counter, 1,
        "rolloverCounter was not updated when it rolled over initial, to handle out of order"
    );

    s.update_rollover_count(6);
    s.update_rollover_count(7);
    s.update_rollover_count(8);
    assert_eq!(
        s.rollover_counter, 1,
        "rolloverCounter was improperly updated for non-significant packets"
    );
}

#[test]
fn test_rollover_count_never_underflows() {
    let mut s = SrtpSsrcState::default();
    s.update_rollover_count(10);
    // Looks like a late packet from the previous cycle, but there is none.
    assert_eq!(s.next_rollover_count(65530), 0);
    s.update_rollover_count(65530);
    assert_eq!(s.rollover_counter, 0);
}

#[test]
fn test_rtp_round_trip_all_profiles() {
    for profile in ProtectionProfile::ALL {
        let (mut encrypt, mut decrypt) = pair(profile);
        let plain = rtp_packet(1, &[0u8; 100]);

        let protected = protect(&mut encrypt, &plain);
        assert_eq!(
            protected.len(),
            plain.len() + profile.rtp_overhead(),
            "{profile}"
        );
        assert_ne!(&protected[12..plain.len()], &plain[12..], "{profile}");

        let mut buf = protected.clone();
        let n = decrypt.decrypt_rtp(&mut buf).unwrap();
        assert_eq!(&buf[..n], &plain[..], "{profile}");
    }
}

#[test]
fn test_rtp_replay_is_rejected() {
    let (mut encrypt, mut decrypt) = pair(CIPHER_CONTEXT_ALGO);
    let protected = protect(&mut encrypt, &rtp_packet(7, &[1, 2, 3, 4]));

    let mut first = protected.clone();
    assert!(decrypt.decrypt_rtp(&mut first).is_ok());

    let mut second = protected.clone();
    assert_eq!(
        decrypt.decrypt_rtp(&mut second),
        Err(Error::ReplayFail(DEFAULT_SSRC, 7))
    );
}

#[test]
fn test_rtp_too_old_is_rejected() {
    let (mut encrypt, mut decrypt) = pair(CIPHER_CONTEXT_ALGO);
    let old = protect(&mut encrypt, &rtp_packet(1, &[0; 8]));
    let new = protect(&mut encrypt, &rtp_packet(2000, &[0; 8]));

    let mut buf = new.clone();
    decrypt.decrypt_rtp(&mut buf).unwrap();

    let mut buf = old.clone();
    assert_eq!(
        decrypt.decrypt_rtp(&mut buf),
        Err(Error::ReplayOld(DEFAULT_SSRC, 1))
    );
}

#[test]
fn test_rtp_tampered_fails_without_poisoning_window() {
    let (mut encrypt, mut decrypt) = pair(CIPHER_CONTEXT_ALGO);
    let protected = protect(&mut encrypt, &rtp_packet(3, &[9; 16]));

    let mut tampered = protected.clone();
    tampered[14] ^= 0xFF;
    assert_eq!(
        decrypt.decrypt_rtp(&mut tampered),
        Err(Error::RtpFailedToVerifyAuthTag)
    );

    // The genuine packet is still accepted afterwards.
    let mut buf = protected.clone();
    assert!(decrypt.decrypt_rtp(&mut buf).is_ok());
}

#[test]
fn test_encrypt_rtp_buffer_too_small_leaves_packet() {
    let (mut encrypt, _) = pair(CIPHER_CONTEXT_ALGO);
    let plain = rtp_packet(1, &[5; 20]);
    let mut buf = plain.clone();
    buf.resize(plain.len() + 9, 0);

    assert_eq!(
        encrypt.encrypt_rtp(&mut buf, plain.len()),
        Err(Error::BufferTooSmall(plain.len() + 10, plain.len() + 9))
    );
    assert_eq!(&buf[..plain.len()], &plain[..]);
    assert_eq!(encrypt.get_roc(DEFAULT_SSRC), None);
}

#[test]
fn test_encrypt_rtp_reports_extended_index() {
    let (mut encrypt, _) = pair(CIPHER_CONTEXT_ALGO);
    encrypt.set_roc(DEFAULT_SSRC, 3);

    let plain = rtp_packet(0x0102, &[0; 4]);
    let mut buf = plain.clone();
    buf.resize(plain.len() + 10, 0);
    let (_, index) = encrypt.encrypt_rtp(&mut buf, plain.len()).unwrap();
    assert_eq!(index, (3 << 16) | 0x0102);
    assert_eq!(encrypt.last_sequence_number(DEFAULT_SSRC), Some(0x0102));
}

#[test]
fn test_rtcp_round_trip_and_index() {
    for profile in ProtectionProfile::ALL {
        let (mut encrypt, mut decrypt) = pair(profile);
        let plain = rtcp_packet();

        for expected_index in 1..=3usize {
            let mut buf = plain.clone();
            buf.resize(plain.len() + profile.rtcp_overhead(), 0);
            let n = encrypt.encrypt_rtcp(&mut buf, plain.len()).unwrap();
            assert_eq!(n, plain.len() + profile.rtcp_overhead(), "{profile}");
            assert_eq!(encrypt.get_index(DEFAULT_SSRC), Some(expected_index));

            let replay = buf.clone();
            let n = decrypt.decrypt_rtcp(&mut buf).unwrap();
            assert_eq!(&buf[..n], &plain[..], "{profile}");

            let mut replay = replay;
            assert_eq!(
                decrypt.decrypt_rtcp(&mut replay),
                Err(Error::ReplayFail(DEFAULT_SSRC, expected_index as u64)),
                "{profile}"
            );
        }
    }
}

#[test]
fn test_rtcp_index_exhaustion() {
    let (mut encrypt, _) = pair(CIPHER_CONTEXT_ALGO);
    encrypt.set_index(DEFAULT_SSRC, MAX_SRTCP_INDEX as usize - 1);

    let plain = rtcp_packet();
    let mut buf = plain.clone();
    buf.resize(plain.len() + 14, 0);
    assert!(encrypt.encrypt_rtcp(&mut buf, plain.len()).is_ok());
    assert_eq!(encrypt.get_index(DEFAULT_SSRC), Some(MAX_SRTCP_INDEX as usize));

    let mut buf = plain.clone();
    buf.resize(plain.len() + 14, 0);
    assert_eq!(
        encrypt.encrypt_rtcp(&mut buf, plain.len()),
        Err(Error::ErrKeyExpired)
    );
}

#[test]
fn test_rekey_keeps_rollover_and_replay_state() {
    let (mut encrypt, mut decrypt) = pair(CIPHER_CONTEXT_ALGO);
    let protected = protect(&mut encrypt, &rtp_packet(10, &[0; 10]));
    let mut buf = protected.clone();
    decrypt.decrypt_rtp(&mut buf).unwrap();

    encrypt.rekey(&MASTER_KEY, &MASTER_SALT).unwrap();
    decrypt.rekey(&MASTER_KEY, &MASTER_SALT).unwrap();

    // Same sequence number under the new key is still a replay.
    let protected = protect(&mut encrypt, &rtp_packet(10, &[0; 10]));
    let mut buf = protected.clone();
    assert_eq!(
        decrypt.decrypt_rtp(&mut buf),
        Err(Error::ReplayFail(DEFAULT_SSRC, 10))
    );

    let protected = protect(&mut encrypt, &rtp_packet(11, &[0; 10]));
    let mut buf = protected.clone();
    assert!(decrypt.decrypt_rtp(&mut buf).is_ok());

    assert_eq!(
        encrypt.rekey(&MASTER_KEY[..8], &MASTER_SALT),
        Err(Error::SrtpMasterKeyLength(16, 8))
    );
}

#[test]
fn test_header_extension_encryption() {
    let (mut encrypt, mut decrypt) = pair(CIPHER_CONTEXT_ALGO);
    encrypt.set_encrypted_header_extension_ids(&[1]);
    decrypt.set_encrypted_header_extension_ids(&[1]);

    let mut plain = vec![0x90, 0x00, 0x00, 0x01, 0, 0, 0, 1];
    plain.extend_from_slice(&DEFAULT_SSRC.to_be_bytes());
    plain.extend_from_slice(&[0xBE, 0xDE, 0x00, 0x02]);
    // id 1 (len 2) encrypted, id 2 (len 1) left alone, then padding.
    plain.extend_from_slice(&[0x11, 0xAA, 0xBB, 0x20, 0xCC, 0x00, 0x00, 0x00]);
    plain.extend_from_slice(&[0x55; 8]);

    let protected = protect(&mut encrypt, &plain);
    assert_ne!(&protected[17..19], &plain[17..19], "id 1 must be encrypted");
    assert_eq!(protected[20], plain[20], "id 2 must stay in the clear");
    assert_eq!(&protected[..17], &plain[..17]);

    let mut buf = protected.clone();
    let n = decrypt.decrypt_rtp(&mut buf).unwrap();
    assert_eq!(&buf[..n], &plain[..]);
}

#[test]
fn test_external_auth_reserves_tag() {
    let (mut encrypt, _) = pair(ProtectionProfile::Aes128CmHmacSha1_32);
    assert!(encrypt.enable_external_auth());
    assert_eq!(encrypt.rtp_auth_key().map(|k| k.len()), Some(20));

    let plain = rtp_packet(1, &[0; 10]);
    let protected = protect(&mut encrypt, &plain);
    assert_eq!(protected.len(), plain.len() + 4);
    assert_eq!(&protected[plain.len()..], &[0, 0, 0, 0]);

    let (mut gcm, _) = pair(ProtectionProfile::AeadAes128Gcm);
    assert!(!gcm.enable_external_auth());
    assert!(!gcm.is_external_auth_active());
    assert_eq!(gcm.rtp_auth_key(), None);
}
