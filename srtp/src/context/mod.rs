#[cfg(test)]
mod context_test;

use std::collections::HashMap;

use aes::{Aes128, Aes256};
use util::replay_detector::*;

use crate::cipher::cipher_aead_aes_gcm::*;
use crate::cipher::cipher_aes_cm_hmac_sha1::*;
use crate::cipher::*;
use crate::error::{Error, Result};
use crate::key_derivation::*;
use crate::option::*;
use crate::protection_profile::*;

pub mod srtcp;
pub mod srtp;

const MAX_ROC_DISORDER: u16 = 100;

/// Encrypt/Decrypt state for a single SRTP SSRC
#[derive(Default)]
pub(crate) struct SrtpSsrcState {
    ssrc: u32,
    rollover_counter: u32,
    rollover_has_processed: bool,
    last_sequence_number: u16,
    replay_detector: Option<Box<dyn ReplayDetector + Send + 'static>>,
}

/// Encrypt/Decrypt state for a single SRTCP SSRC
#[derive(Default)]
pub(crate) struct SrtcpSsrcState {
    srtcp_index: usize,
    ssrc: u32,
    replay_detector: Option<Box<dyn ReplayDetector + Send + 'static>>,
}

impl SrtpSsrcState {
    pub fn next_rollover_count(&self, sequence_number: u16) -> u32 {
        let mut roc = self.rollover_counter;

        if !self.rollover_has_processed {
        } else if sequence_number == 0 {
            // We exactly hit the rollover count

            // Only update rolloverCounter if lastSequenceNumber is greater then MAX_ROCDISORDER
            // otherwise we already incremented for disorder
            if self.last_sequence_number > MAX_ROC_DISORDER {
                roc = roc.wrapping_add(1);
            }
        } else if self.last_sequence_number < MAX_ROC_DISORDER
            && sequence_number > (MAX_SEQUENCE_NUMBER - MAX_ROC_DISORDER)
        {
            // Our last sequence number incremented because we crossed 0, but then our current number was within MAX_ROCDISORDER of the max
            // So we fell behind, drop to account for jitter
            roc = roc.saturating_sub(1);
        } else if sequence_number < MAX_ROC_DISORDER
            && self.last_sequence_number > (MAX_SEQUENCE_NUMBER - MAX_ROC_DISORDER)
        {
            // our current is within a MAX_ROCDISORDER of 0
            // and our last sequence number was a high sequence number, increment to account for jitter
            roc = roc.wrapping_add(1);
        }

        roc
    }

    /// https://tools.ietf.org/html/rfc3550#appendix-A.1
    pub fn update_rollover_count(&mut self, sequence_number: u16) {
        self.rollover_counter = self.next_rollover_count(sequence_number);
        self.rollover_has_processed = true;
        self.last_sequence_number = sequence_number;
    }
}

/// Context represents a SRTP cryptographic context
/// Context can only be used for one-way operations
/// it must either used ONLY for encryption or ONLY for decryption
pub struct Context {
    cipher: Box<dyn Cipher + Send>,
    profile: ProtectionProfile,

    srtp_ssrc_states: HashMap<u32, SrtpSsrcState>,
    srtcp_ssrc_states: HashMap<u32, SrtcpSsrcState>,

    new_srtp_replay_detector: ContextOption,
    new_srtcp_replay_detector: ContextOption,

    encrypted_header_extension_ids: Vec<u8>,
    external_auth: bool,
}

fn new_cipher(
    profile: ProtectionProfile,
    master_key: &[u8],
    master_salt: &[u8],
) -> Result<Box<dyn Cipher + Send>> {
    let key_len = profile.key_len();
    let salt_len = profile.salt_len();

    if master_key.len() != key_len {
        return Err(Error::SrtpMasterKeyLength(key_len, master_key.len()));
    } else if master_salt.len() != salt_len {
        return Err(Error::SrtpSaltLength(salt_len, master_salt.len()));
    }

    let cipher: Box<dyn Cipher + Send> = match profile {
        ProtectionProfile::Aes128CmHmacSha1_32 | ProtectionProfile::Aes128CmHmacSha1_80 => {
            Box::new(CipherAesCmHmacSha1::new(profile, master_key, master_salt)?)
        }
        ProtectionProfile::AeadAes128Gcm => Box::new(CipherAeadAesGcm::<Aes128>::new(
            profile,
            master_key,
            master_salt,
        )?),
        ProtectionProfile::AeadAes256Gcm => Box::new(CipherAeadAesGcm::<Aes256>::new(
            profile,
            master_key,
            master_salt,
        )?),
    };

    Ok(cipher)
}

impl Context {
    /// CreateContext creates a new SRTP Context
    pub fn new(
        master_key: &[u8],
        master_salt: &[u8],
        profile: ProtectionProfile,
        srtp_ctx_opt: Option<ContextOption>,
        srtcp_ctx_opt: Option<ContextOption>,
    ) -> Result<Context> {
        let cipher = new_cipher(profile, master_key, master_salt)?;

        let srtp_ctx_opt = if let Some(ctx_opt) = srtp_ctx_opt {
            ctx_opt
        } else {
            srtp_no_replay_protection()
        };

        let srtcp_ctx_opt = if let Some(ctx_opt) = srtcp_ctx_opt {
            ctx_opt
        } else {
            srtcp_no_replay_protection()
        };

        Ok(Context {
            cipher,
            profile,
            srtp_ssrc_states: HashMap::new(),
            srtcp_ssrc_states: HashMap::new(),
            new_srtp_replay_detector: srtp_ctx_opt,
            new_srtcp_replay_detector: srtcp_ctx_opt,
            encrypted_header_extension_ids: vec![],
            external_auth: false,
        })
    }

    /// Replaces the master key and salt. Rollover counters, SRTCP indexes and
    /// replay windows carry over to the new key.
    pub fn rekey(&mut self, master_key: &[u8], master_salt: &[u8]) -> Result<()> {
        let mut cipher = new_cipher(self.profile, master_key, master_salt)?;
        cipher.set_external_auth(self.external_auth);
        self.cipher = cipher;
        Ok(())
    }

    pub fn profile(&self) -> ProtectionProfile {
        self.profile
    }

    /// Header extension ids to protect with RFC 6904. Ignored by AEAD profiles.
    pub fn set_encrypted_header_extension_ids(&mut self, ids: &[u8]) {
        self.encrypted_header_extension_ids = ids.to_vec();
    }

    /// Leave the RTP auth tag to the caller. Returns false if the profile has
    /// no separate MAC to hand out.
    pub fn enable_external_auth(&mut self) -> bool {
        self.external_auth = self.cipher.set_external_auth(true);
        self.external_auth
    }

    pub fn is_external_auth_active(&self) -> bool {
        self.external_auth
    }

    pub fn rtp_auth_key(&self) -> Option<&[u8]> {
        self.cipher.rtp_auth_key()
    }

    pub fn rtp_auth_tag_len(&self) -> usize {
        self.cipher.rtp_auth_tag_len()
    }

    fn get_srtp_ssrc_state(&mut self, ssrc: u32) -> &mut SrtpSsrcState {
        let new_replay_detector = &self.new_srtp_replay_detector;
        self.srtp_ssrc_states
            .entry(ssrc)
            .or_insert_with(|| SrtpSsrcState {
                ssrc,
                replay_detector: Some(new_replay_detector()),
                ..Default::default()
            })
    }

    fn get_srtcp_ssrc_state(&mut self, ssrc: u32) -> &mut SrtcpSsrcState {
        let new_replay_detector = &self.new_srtcp_replay_detector;
        self.srtcp_ssrc_states
            .entry(ssrc)
            .or_insert_with(|| SrtcpSsrcState {
                ssrc,
                replay_detector: Some(new_replay_detector()),
                ..Default::default()
            })
    }

    /// roc returns SRTP rollover counter value of specified SSRC.
    pub fn get_roc(&self, ssrc: u32) -> Option<u32> {
        self.srtp_ssrc_states.get(&ssrc).map(|s| s.rollover_counter)
    }

    /// set_roc sets SRTP rollover counter value of specified SSRC.
    pub fn set_roc(&mut self, ssrc: u32, roc: u32) {
        self.get_srtp_ssrc_state(ssrc).rollover_counter = roc;
    }

    /// index returns SRTCP index value of specified SSRC.
    pub fn get_index(&self, ssrc: u32) -> Option<usize> {
        self.srtcp_ssrc_states.get(&ssrc).map(|s| s.srtcp_index)
    }

    /// set_index sets SRTCP index value of specified SSRC.
    pub fn set_index(&mut self, ssrc: u32, index: usize) {
        self.get_srtcp_ssrc_state(ssrc).srtcp_index = index;
    }

    /// Sequence number of the last packet processed for `ssrc`, if any.
    pub fn last_sequence_number(&self, ssrc: u32) -> Option<u16> {
        self.srtp_ssrc_states
            .get(&ssrc)
            .filter(|s| s.rollover_has_processed)
            .map(|s| s.last_sequence_number)
    }
}
