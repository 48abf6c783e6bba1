use super::*;

#[test]
fn test_set_replay_protection_windows() -> Result<()> {
    let mut s = SettingEngine::default();

    assert_eq!(s.replay_protection, ReplayProtection::default());
    assert_eq!(s.srtp_replay_window(), DEFAULT_REPLAY_WINDOW_SIZE);
    assert_eq!(s.srtcp_replay_window(), DEFAULT_REPLAY_WINDOW_SIZE);

    s.set_srtp_replay_protection_window(128)?;
    s.set_srtcp_replay_protection_window(64)?;
    assert_eq!(s.srtp_replay_window(), 128);
    assert_eq!(s.srtcp_replay_window(), 64);

    assert_eq!(
        s.set_srtp_replay_protection_window(32),
        Err(Error::ErrReplayWindowSize(64, 32768))
    );
    assert!(s.set_srtcp_replay_protection_window(32769).is_err());
    assert_eq!(s.srtp_replay_window(), 128, "rejected window leaves the old one");

    s.set_srtp_replay_protection_window(0)?;
    assert_eq!(s.srtp_replay_window(), DEFAULT_REPLAY_WINDOW_SIZE);

    Ok(())
}

#[test]
fn test_replay_window_resets_disable_flag() -> Result<()> {
    let mut s = SettingEngine::default();

    s.disable_srtp_replay_protection(true);
    s.disable_srtcp_replay_protection(true);
    assert!(s.disable_srtp_replay_protection && s.disable_srtcp_replay_protection);

    s.set_srtp_replay_protection_window(256)?;
    assert!(!s.disable_srtp_replay_protection);
    assert!(s.disable_srtcp_replay_protection);

    Ok(())
}

#[test]
fn test_disable_certificate_fingerprint_verification() {
    let mut s = SettingEngine::default();
    assert!(!s.disable_certificate_fingerprint_verification);

    s.disable_certificate_fingerprint_verification(true);
    assert!(s.disable_certificate_fingerprint_verification);
}

#[test]
fn test_srtp_protection_profiles() {
    let mut s = SettingEngine::default();
    assert_eq!(s.srtp_protection_profiles().len(), 4);

    s.set_srtp_protection_profiles(vec![ProtectionProfile::Aes128CmHmacSha1_32]);
    assert_eq!(
        s.srtp_protection_profiles(),
        vec![ProtectionProfile::Aes128CmHmacSha1_32]
    );
}

#[test]
fn test_srtp_key_limits_and_silent_time() {
    let mut s = SettingEngine::default();
    assert_eq!(s.key_limits, KeyLimits::default());
    assert_eq!(s.srtp_error_silent_time, DEFAULT_SRTP_ERROR_SILENT_TIME);

    s.set_srtp_key_limits(200, 100);
    assert_eq!(s.key_limits, KeyLimits { soft: 100, hard: 100 });

    s.set_srtp_error_silent_time(Duration::from_millis(10));
    assert_eq!(s.srtp_error_silent_time, Duration::from_millis(10));
}

#[test]
fn test_new_srtp_session_carries_settings() -> Result<()> {
    let mut s = SettingEngine::default();
    s.set_srtp_replay_protection_window(128)?;
    s.set_srtcp_replay_protection_window(256)?;

    let session = s.new_srtp_session()?;
    assert_eq!(session.replay_window_size(), 128);
    assert_eq!(session.srtcp_replay_window_size(), 256);
    assert!(!session.is_configured());

    Ok(())
}
