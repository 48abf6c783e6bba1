use std::marker::PhantomData;

use aead::consts::U12;
use aead::generic_array::GenericArray;
use aead::AeadInPlace;
use aes_gcm::{AesGcm, KeyInit, Nonce};
use byteorder::{BigEndian, ByteOrder};

use super::Cipher;
use crate::error::{Error, Result};
use crate::header::*;
use crate::key_derivation::*;
use crate::protection_profile::ProtectionProfile;

pub const CIPHER_AEAD_AES_GCM_AUTH_TAG_LEN: usize = 16;

const RTCP_ENCRYPTION_FLAG: u8 = 0x80;

/// AEAD Cipher based on AES.
pub(crate) struct CipherAeadAesGcm<AES> {
    profile: ProtectionProfile,
    srtp_cipher: AesGcm<AES, U12>,
    srtcp_cipher: AesGcm<AES, U12>,
    srtp_session_salt: Vec<u8>,
    srtcp_session_salt: Vec<u8>,
    _tag: PhantomData<AES>,
}

impl<AES> Cipher for CipherAeadAesGcm<AES>
where
    AesGcm<AES, U12>: AeadInPlace + KeyInit,
{
    fn rtp_auth_tag_len(&self) -> usize {
        self.profile.rtp_auth_tag_len()
    }

    /// Get RTCP authenticated tag length.
    fn rtcp_auth_tag_len(&self) -> usize {
        self.profile.rtcp_auth_tag_len()
    }

    /// Get AEAD auth key length of the cipher.
    fn aead_auth_tag_len(&self) -> usize {
        self.profile.aead_auth_tag_len()
    }

    fn encrypt_rtp(
        &mut self,
        buf: &mut [u8],
        len: usize,
        header: &RtpHeader,
        roc: u32,
    ) -> Result<usize> {
        let tag_len = self.aead_auth_tag_len();
        let out_len = len + tag_len;
        if buf.len() < out_len {
            return Err(Error::BufferTooSmall(out_len, buf.len()));
        }

        let nonce = self.rtp_initialization_vector(header, roc);

        // The header stays in the clear and is authenticated as AAD.
        let (aad, payload) = buf[..len].split_at_mut(header.payload_offset);
        let tag = self
            .srtp_cipher
            .encrypt_in_place_detached(Nonce::from_slice(&nonce), aad, payload)
            .map_err(|e| Error::InternalCrypto(e.to_string()))?;

        buf[len..out_len].copy_from_slice(&tag);
        Ok(out_len)
    }

    fn decrypt_rtp(&mut self, buf: &mut [u8], header: &RtpHeader, roc: u32) -> Result<usize> {
        let tag_len = self.aead_auth_tag_len();
        let encrypted_len = buf.len();
        if encrypted_len < header.payload_offset + tag_len {
            return Err(Error::SrtpTooSmall(
                encrypted_len,
                header.payload_offset + tag_len,
            ));
        }
        let cipher_text_len = encrypted_len - tag_len;

        let nonce = self.rtp_initialization_vector(header, roc);
        let tag = GenericArray::clone_from_slice(&buf[cipher_text_len..]);
        let (aad, payload) = buf[..cipher_text_len].split_at_mut(header.payload_offset);

        self.srtp_cipher
            .decrypt_in_place_detached(Nonce::from_slice(&nonce), aad, payload, &tag)
            .map_err(|_| Error::RtpFailedToVerifyAuthTag)?;

        Ok(cipher_text_len)
    }

    fn encrypt_rtcp(
        &mut self,
        buf: &mut [u8],
        len: usize,
        srtcp_index: usize,
        ssrc: u32,
    ) -> Result<usize> {
        let tag_len = self.aead_auth_tag_len();
        let out_len = len + tag_len + SRTCP_INDEX_SIZE;
        if buf.len() < out_len {
            return Err(Error::BufferTooSmall(out_len, buf.len()));
        }

        let iv = self.rtcp_initialization_vector(srtcp_index, ssrc);
        let aad = self.rtcp_additional_authenticated_data(buf, srtcp_index);

        let tag = self
            .srtcp_cipher
            .encrypt_in_place_detached(
                Nonce::from_slice(&iv),
                &aad,
                &mut buf[RTCP_HEADER_LENGTH + SSRC_LENGTH..len],
            )
            .map_err(|e| Error::InternalCrypto(e.to_string()))?;

        buf[len..len + tag_len].copy_from_slice(&tag);
        buf[len + tag_len..out_len].copy_from_slice(&aad[8..]);

        Ok(out_len)
    }

    fn decrypt_rtcp(&mut self, buf: &mut [u8], srtcp_index: usize, ssrc: u32) -> Result<usize> {
        let tag_len = self.aead_auth_tag_len();
        let encrypted_len = buf.len();
        let min_len = RTCP_HEADER_LENGTH + SSRC_LENGTH + tag_len + SRTCP_INDEX_SIZE;
        if encrypted_len < min_len {
            return Err(Error::SrtcpTooSmall(encrypted_len, min_len));
        }

        let tail_offset = encrypted_len - SRTCP_INDEX_SIZE;
        let cipher_text_len = tail_offset - tag_len;
        let nonce = self.rtcp_initialization_vector(srtcp_index, ssrc);
        let tag = GenericArray::clone_from_slice(&buf[cipher_text_len..tail_offset]);

        if buf[tail_offset] & RTCP_ENCRYPTION_FLAG == 0 {
            // https://tools.ietf.org/html/rfc7714#section-9.3
            // Unencrypted SRTCP: everything but the tag is authenticated only.
            let mut aad = buf[..cipher_text_len].to_vec();
            aad.extend_from_slice(&buf[tail_offset..]);
            self.srtcp_cipher
                .decrypt_in_place_detached(Nonce::from_slice(&nonce), &aad, &mut [], &tag)
                .map_err(|_| Error::RtcpFailedToVerifyAuthTag)?;
            return Ok(cipher_text_len);
        }

        let aad = self.rtcp_additional_authenticated_data(buf, srtcp_index);
        self.srtcp_cipher
            .decrypt_in_place_detached(
                Nonce::from_slice(&nonce),
                &aad,
                &mut buf[RTCP_HEADER_LENGTH + SSRC_LENGTH..cipher_text_len],
                &tag,
            )
            .map_err(|_| Error::RtcpFailedToVerifyAuthTag)?;

        Ok(cipher_text_len)
    }

    fn get_rtcp_index(&self, input: &[u8]) -> usize {
        let pos = input.len() - SRTCP_INDEX_SIZE;
        let val = BigEndian::read_u32(&input[pos..]);

        (val & !((RTCP_ENCRYPTION_FLAG as u32) << 24)) as usize
    }

    fn xor_header_extensions(
        &mut self,
        _buf: &mut [u8],
        _header: &RtpHeader,
        _roc: u32,
        _ids: &[u8],
    ) -> Result<()> {
        // RFC 6904 is only defined for the AES-CM transforms here.
        Ok(())
    }

    fn set_external_auth(&mut self, _enabled: bool) -> bool {
        false
    }

    fn rtp_auth_key(&self) -> Option<&[u8]> {
        None
    }
}

impl<AES> CipherAeadAesGcm<AES>
where
    AesGcm<AES, U12>: AeadInPlace + KeyInit,
{
    /// Create a new AEAD instance.
    pub(crate) fn new(
        profile: ProtectionProfile,
        master_key: &[u8],
        master_salt: &[u8],
    ) -> Result<CipherAeadAesGcm<AES>> {
        type Kdf = fn(u8, &[u8], &[u8], usize, usize) -> Result<Vec<u8>>;
        let kdf: Kdf = match profile {
            ProtectionProfile::AeadAes128Gcm => aes_cm_key_derivation,
            // AES_256_GCM must use AES_256_CM_PRF as per https://datatracker.ietf.org/doc/html/rfc7714#section-11
            ProtectionProfile::AeadAes256Gcm => aes_256_cm_key_derivation,
            other => return Err(Error::UnsupportedSuite(other.to_string())),
        };

        let srtp_session_key = kdf(
            LABEL_SRTP_ENCRYPTION,
            master_key,
            master_salt,
            0,
            master_key.len(),
        )?;
        let srtcp_session_key = kdf(
            LABEL_SRTCP_ENCRYPTION,
            master_key,
            master_salt,
            0,
            master_key.len(),
        )?;
        let srtp_session_salt = kdf(
            LABEL_SRTP_SALT,
            master_key,
            master_salt,
            0,
            master_salt.len(),
        )?;
        let srtcp_session_salt = kdf(
            LABEL_SRTCP_SALT,
            master_key,
            master_salt,
            0,
            master_salt.len(),
        )?;

        Self::from_session_keys(
            profile,
            &srtp_session_key,
            srtp_session_salt,
            &srtcp_session_key,
            srtcp_session_salt,
        )
    }

    /// Builds the cipher from already derived session keys and salts.
    pub(crate) fn from_session_keys(
        profile: ProtectionProfile,
        srtp_session_key: &[u8],
        srtp_session_salt: Vec<u8>,
        srtcp_session_key: &[u8],
        srtcp_session_salt: Vec<u8>,
    ) -> Result<CipherAeadAesGcm<AES>> {
        let srtp_cipher = AesGcm::<AES, U12>::new_from_slice(srtp_session_key)
            .map_err(|e| Error::InternalCrypto(e.to_string()))?;
        let srtcp_cipher = AesGcm::<AES, U12>::new_from_slice(srtcp_session_key)
            .map_err(|e| Error::InternalCrypto(e.to_string()))?;

        Ok(CipherAeadAesGcm {
            profile,
            srtp_cipher,
            srtcp_cipher,
            srtp_session_salt,
            srtcp_session_salt,
            _tag: PhantomData,
        })
    }

    /// The 12-octet IV used by AES-GCM SRTP is formed by first concatenating
    /// 2 octets of zeroes, the 4-octet SSRC, the 4-octet rollover counter
    /// (ROC), and the 2-octet sequence number (SEQ).  The resulting 12-octet
    /// value is then XORed to the 12-octet salt to form the 12-octet IV.
    ///
    /// https://tools.ietf.org/html/rfc7714#section-8.1
    pub(crate) fn rtp_initialization_vector(&self, header: &RtpHeader, roc: u32) -> [u8; 12] {
        let mut iv = [0u8; 12];
        BigEndian::write_u32(&mut iv[2..], header.ssrc);
        BigEndian::write_u32(&mut iv[6..], roc);
        BigEndian::write_u16(&mut iv[10..], header.sequence_number);

        for (i, v) in iv.iter_mut().enumerate() {
            *v ^= self.srtp_session_salt[i];
        }

        iv
    }

    /// The 12-octet IV used by AES-GCM SRTCP is formed by first
    /// concatenating 2 octets of zeroes, the 4-octet SSRC identifier,
    /// 2 octets of zeroes, a single "0" bit, and the 31-bit SRTCP index.
    /// The resulting 12-octet value is then XORed to the 12-octet salt to
    /// form the 12-octet IV.
    ///
    /// https://tools.ietf.org/html/rfc7714#section-9.1
    pub(crate) fn rtcp_initialization_vector(&self, srtcp_index: usize, ssrc: u32) -> [u8; 12] {
        let mut iv = [0u8; 12];

        BigEndian::write_u32(&mut iv[2..], ssrc);
        BigEndian::write_u32(&mut iv[8..], srtcp_index as u32);

        for (i, v) in iv.iter_mut().enumerate() {
            *v ^= self.srtcp_session_salt[i];
        }

        iv
    }

    /// In an SRTCP packet, a 1-bit Encryption flag is prepended to the
    /// 31-bit SRTCP index to form a 32-bit value we shall call the
    /// "ESRTCP word"
    ///
    /// https://tools.ietf.org/html/rfc7714#section-17
    pub(crate) fn rtcp_additional_authenticated_data(
        &self,
        rtcp_packet: &[u8],
        srtcp_index: usize,
    ) -> [u8; 12] {
        let mut aad = [0u8; 12];

        aad[..8].copy_from_slice(&rtcp_packet[..8]);

        BigEndian::write_u32(&mut aad[8..], srtcp_index as u32);

        aad[8] |= RTCP_ENCRYPTION_FLAG;
        aad
    }
}
