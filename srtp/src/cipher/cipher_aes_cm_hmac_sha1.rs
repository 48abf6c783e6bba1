use aes::cipher::generic_array::GenericArray;
use aes::cipher::{KeyIvInit, StreamCipher};
use byteorder::{BigEndian, ByteOrder};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;

use super::Cipher;
use crate::error::{Error, Result};
use crate::header::*;
use crate::key_derivation::*;
use crate::protection_profile::ProtectionProfile;

type HmacSha1 = Hmac<Sha1>;
type Aes128Ctr = ctr::Ctr128BE<aes::Aes128>;

pub const CIPHER_AES_CM_HMAC_SHA1AUTH_TAG_LEN: usize = 10;

const RTCP_ENCRYPTION_FLAG: u32 = 1 << 31;

pub(crate) struct CipherAesCmHmacSha1 {
    profile: ProtectionProfile,
    srtp_session_key: Vec<u8>,
    srtp_session_salt: Vec<u8>,
    srtp_session_auth_key: Vec<u8>,
    srtp_session_auth: HmacSha1,
    srtcp_session_key: Vec<u8>,
    srtcp_session_salt: Vec<u8>,
    srtcp_session_auth: HmacSha1,
    header_session_key: Vec<u8>,
    header_session_salt: Vec<u8>,
    external_auth: bool,
}

impl CipherAesCmHmacSha1 {
    pub fn new(profile: ProtectionProfile, master_key: &[u8], master_salt: &[u8]) -> Result<Self> {
        let derive = |label: u8, len: usize| {
            aes_cm_key_derivation(label, master_key, master_salt, 0, len)
        };

        let auth_key_len = profile.auth_key_len();

        let srtp_session_auth_key = derive(LABEL_SRTP_AUTHENTICATION_TAG, auth_key_len)?;
        let srtcp_session_auth_key = derive(LABEL_SRTCP_AUTHENTICATION_TAG, auth_key_len)?;

        let srtp_session_auth = HmacSha1::new_from_slice(&srtp_session_auth_key)
            .map_err(|e| Error::InternalCrypto(e.to_string()))?;
        let srtcp_session_auth = HmacSha1::new_from_slice(&srtcp_session_auth_key)
            .map_err(|e| Error::InternalCrypto(e.to_string()))?;

        Ok(CipherAesCmHmacSha1 {
            profile,
            srtp_session_key: derive(LABEL_SRTP_ENCRYPTION, master_key.len())?,
            srtp_session_salt: derive(LABEL_SRTP_SALT, master_salt.len())?,
            srtp_session_auth_key,
            srtp_session_auth,
            srtcp_session_key: derive(LABEL_SRTCP_ENCRYPTION, master_key.len())?,
            srtcp_session_salt: derive(LABEL_SRTCP_SALT, master_salt.len())?,
            srtcp_session_auth,
            header_session_key: derive(LABEL_SRTP_HEADER_ENCRYPTION, master_key.len())?,
            header_session_salt: derive(LABEL_SRTP_HEADER_SALT, master_salt.len())?,
            external_auth: false,
        })
    }

    /// https://tools.ietf.org/html/rfc3711#section-4.2
    /// In the case of SRTP, M SHALL consist of the Authenticated
    /// Portion of the packet (as specified in Figure 1) concatenated with
    /// the roc, M = Authenticated Portion || roc;
    ///
    /// The pre-defined authentication transform for SRTP is HMAC-SHA1
    /// [RFC2104].  With HMAC-SHA1, the SRTP_PREFIX_LENGTH (Figure 3) SHALL
    /// be 0.  For SRTP (respectively SRTCP), the HMAC SHALL be applied to
    /// the session authentication key and M as specified above, i.e.,
    /// HMAC(k_a, M).  The HMAC output SHALL then be truncated to the n_tag
    /// left-most bits.
    fn generate_srtp_auth_tag(&self, buf: &[u8], roc: u32) -> [u8; 20] {
        let mut signer = self.srtp_session_auth.clone();

        signer.update(buf);

        // For SRTP only, we need to hash the rollover counter as well.
        signer.update(&roc.to_be_bytes());

        signer.finalize().into_bytes().into()
    }

    /// Same transform as SRTP, over the whole packet up to and including the
    /// E|index word and without a rollover counter.
    fn generate_srtcp_auth_tag(&self, buf: &[u8]) -> [u8; 20] {
        let mut signer = self.srtcp_session_auth.clone();

        signer.update(buf);

        signer.finalize().into_bytes().into()
    }

    fn keystream(key: &[u8], counter: &[u8; 16]) -> Aes128Ctr {
        Aes128Ctr::new(
            GenericArray::from_slice(key),
            GenericArray::from_slice(counter),
        )
    }
}

impl Cipher for CipherAesCmHmacSha1 {
    fn rtp_auth_tag_len(&self) -> usize {
        self.profile.rtp_auth_tag_len()
    }

    fn rtcp_auth_tag_len(&self) -> usize {
        self.profile.rtcp_auth_tag_len()
    }

    fn aead_auth_tag_len(&self) -> usize {
        self.profile.aead_auth_tag_len()
    }

    fn get_rtcp_index(&self, input: &[u8]) -> usize {
        let tail_offset = input.len() - (self.rtcp_auth_tag_len() + SRTCP_INDEX_SIZE);
        (BigEndian::read_u32(&input[tail_offset..tail_offset + SRTCP_INDEX_SIZE])
            & !RTCP_ENCRYPTION_FLAG) as usize
    }

    fn encrypt_rtp(
        &mut self,
        buf: &mut [u8],
        len: usize,
        header: &RtpHeader,
        roc: u32,
    ) -> Result<usize> {
        let tag_len = self.rtp_auth_tag_len();
        let out_len = len + tag_len;
        if buf.len() < out_len {
            return Err(Error::BufferTooSmall(out_len, buf.len()));
        }

        // Encrypt the payload
        let counter = generate_counter(
            header.sequence_number,
            roc,
            header.ssrc,
            &self.srtp_session_salt,
        );
        let mut stream = Self::keystream(&self.srtp_session_key, &counter);
        stream.apply_keystream(&mut buf[header.payload_offset..len]);

        if self.external_auth {
            // The caller signs the packet and fills in the reserved bytes.
            buf[len..out_len].fill(0);
        } else {
            let auth_tag = self.generate_srtp_auth_tag(&buf[..len], roc);
            buf[len..out_len].copy_from_slice(&auth_tag[..tag_len]);
        }

        Ok(out_len)
    }

    fn decrypt_rtp(&mut self, buf: &mut [u8], header: &RtpHeader, roc: u32) -> Result<usize> {
        let tag_len = self.rtp_auth_tag_len();
        let encrypted_len = buf.len();
        if encrypted_len < header.payload_offset + tag_len {
            return Err(Error::SrtpTooSmall(
                encrypted_len,
                header.payload_offset + tag_len,
            ));
        }
        let cipher_text_len = encrypted_len - tag_len;

        // Split the auth tag and the cipher text into two parts.
        let (cipher_text, actual_tag) = buf.split_at(cipher_text_len);

        // Generate the auth tag we expect to see from the ciphertext.
        let expected_tag = &self.generate_srtp_auth_tag(cipher_text, roc)[..tag_len];

        // See if the auth tag actually matches.
        // We use a constant time comparison to prevent timing attacks.
        if actual_tag.ct_eq(expected_tag).unwrap_u8() != 1 {
            return Err(Error::RtpFailedToVerifyAuthTag);
        }

        let counter = generate_counter(
            header.sequence_number,
            roc,
            header.ssrc,
            &self.srtp_session_salt,
        );
        let mut stream = Self::keystream(&self.srtp_session_key, &counter);
        stream.apply_keystream(&mut buf[header.payload_offset..cipher_text_len]);

        Ok(cipher_text_len)
    }

    fn encrypt_rtcp(
        &mut self,
        buf: &mut [u8],
        len: usize,
        srtcp_index: usize,
        ssrc: u32,
    ) -> Result<usize> {
        let tag_len = self.rtcp_auth_tag_len();
        let out_len = len + SRTCP_INDEX_SIZE + tag_len;
        if buf.len() < out_len {
            return Err(Error::BufferTooSmall(out_len, buf.len()));
        }

        // Encrypt everything after header
        let counter = generate_counter(
            (srtcp_index & 0xFFFF) as u16,
            (srtcp_index >> 16) as u32,
            ssrc,
            &self.srtcp_session_salt,
        );
        let mut stream = Self::keystream(&self.srtcp_session_key, &counter);
        stream.apply_keystream(&mut buf[RTCP_HEADER_LENGTH + SSRC_LENGTH..len]);

        // Add SRTCP index and set Encryption bit
        BigEndian::write_u32(
            &mut buf[len..len + SRTCP_INDEX_SIZE],
            srtcp_index as u32 | RTCP_ENCRYPTION_FLAG,
        );

        // Generate the auth tag.
        let auth_tag = self.generate_srtcp_auth_tag(&buf[..len + SRTCP_INDEX_SIZE]);
        buf[len + SRTCP_INDEX_SIZE..out_len].copy_from_slice(&auth_tag[..tag_len]);

        Ok(out_len)
    }

    fn decrypt_rtcp(&mut self, buf: &mut [u8], srtcp_index: usize, ssrc: u32) -> Result<usize> {
        let tag_len = self.rtcp_auth_tag_len();
        let encrypted_len = buf.len();
        let min_len = RTCP_HEADER_LENGTH + SSRC_LENGTH + SRTCP_INDEX_SIZE + tag_len;
        if encrypted_len < min_len {
            return Err(Error::SrtcpTooSmall(encrypted_len, min_len));
        }

        let tail_offset = encrypted_len - (tag_len + SRTCP_INDEX_SIZE);

        let (cipher_text, actual_tag) = buf.split_at(encrypted_len - tag_len);
        let expected_tag = &self.generate_srtcp_auth_tag(cipher_text)[..tag_len];
        if actual_tag.ct_eq(expected_tag).unwrap_u8() != 1 {
            return Err(Error::RtcpFailedToVerifyAuthTag);
        }

        let is_encrypted = buf[tail_offset] >> 7;
        if is_encrypted == 0 {
            return Ok(tail_offset);
        }

        let counter = generate_counter(
            (srtcp_index & 0xFFFF) as u16,
            (srtcp_index >> 16) as u32,
            ssrc,
            &self.srtcp_session_salt,
        );
        let mut stream = Self::keystream(&self.srtcp_session_key, &counter);
        stream.apply_keystream(&mut buf[RTCP_HEADER_LENGTH + SSRC_LENGTH..tail_offset]);

        Ok(tail_offset)
    }

    /// https://tools.ietf.org/html/rfc6904#section-4
    /// The keystream is generated exactly as for the payload, with the
    /// header encryption key and salt, and consumed element by element.
    fn xor_header_extensions(
        &mut self,
        buf: &mut [u8],
        header: &RtpHeader,
        roc: u32,
        ids: &[u8],
    ) -> Result<()> {
        let elements = extension_elements(buf, header)?;
        if elements.is_empty() {
            return Ok(());
        }

        let counter = generate_counter(
            header.sequence_number,
            roc,
            header.ssrc,
            &self.header_session_salt,
        );
        let mut stream = Self::keystream(&self.header_session_key, &counter);

        for element in elements {
            let mut keystream = vec![0u8; element.prefix_len + element.data.len()];
            stream.apply_keystream(&mut keystream);

            if ids.contains(&element.id) {
                for (b, k) in buf[element.data].iter_mut().zip(&keystream[element.prefix_len..]) {
                    *b ^= k;
                }
            }
        }

        Ok(())
    }

    fn set_external_auth(&mut self, enabled: bool) -> bool {
        self.external_auth = enabled;
        true
    }

    fn rtp_auth_key(&self) -> Option<&[u8]> {
        Some(&self.srtp_session_auth_key)
    }
}
