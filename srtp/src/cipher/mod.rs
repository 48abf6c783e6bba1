pub(crate) mod cipher_aead_aes_gcm;
pub(crate) mod cipher_aes_cm_hmac_sha1;

use crate::error::Result;
use crate::header::RtpHeader;

///NOTE: Auth tag and AEAD auth tag are placed at the different position in SRTCP
///
///In non-AEAD cipher, the authentication tag is placed *after* the ESRTCP word
///(Encrypted-flag and SRTCP index).
///
///> AES_128_CM_HMAC_SHA1_80
///> | RTCP Header | Encrypted payload |E| SRTCP Index | Auth tag |
///>                                   ^               |----------|
///>                                   |                ^
///>                                   |                authTagLen=10
///>                                   aeadAuthTagLen=0
///
///In AEAD cipher, the AEAD authentication tag is embedded in the ciphertext.
///It is *before* the ESRTCP word (Encrypted-flag and SRTCP index).
///
///> AEAD_AES_128_GCM
///> | RTCP Header | Encrypted payload | AEAD auth tag |E| SRTCP Index |
///>                                   |---------------|               ^
///>                                    ^                              authTagLen=0
///>                                    aeadAuthTagLen=16
///
///See https://tools.ietf.org/html/rfc7714 for the full specifications.

/// Cipher represents a implementation of one
/// of the SRTP Specific ciphers.
///
/// All transforms work in place. Encryption takes the plaintext in
/// `buf[..len]` and returns the protected length; the caller has already
/// checked that `buf` can hold it. Decryption takes the whole protected packet
/// in `buf` and returns the plaintext length.
pub(crate) trait Cipher {
    /// Get RTP authenticated tag length.
    fn rtp_auth_tag_len(&self) -> usize;

    /// Get RTCP authenticated tag length.
    fn rtcp_auth_tag_len(&self) -> usize;

    /// Get AEAD auth key length of the cipher.
    fn aead_auth_tag_len(&self) -> usize;

    /// Retrieved RTCP index.
    fn get_rtcp_index(&self, input: &[u8]) -> usize;

    /// Encrypt RTP payload.
    fn encrypt_rtp(
        &mut self,
        buf: &mut [u8],
        len: usize,
        header: &RtpHeader,
        roc: u32,
    ) -> Result<usize>;

    /// Decrypt RTP payload.
    fn decrypt_rtp(&mut self, buf: &mut [u8], header: &RtpHeader, roc: u32) -> Result<usize>;

    /// Encrypt RTCP payload.
    fn encrypt_rtcp(
        &mut self,
        buf: &mut [u8],
        len: usize,
        srtcp_index: usize,
        ssrc: u32,
    ) -> Result<usize>;

    /// Decrypt RTCP payload.
    fn decrypt_rtcp(&mut self, buf: &mut [u8], srtcp_index: usize, ssrc: u32) -> Result<usize>;

    /// RFC 6904 header extension encryption for the listed ids. The
    /// transform is an XOR, so the same call encrypts and decrypts.
    fn xor_header_extensions(
        &mut self,
        buf: &mut [u8],
        header: &RtpHeader,
        roc: u32,
        ids: &[u8],
    ) -> Result<()>;

    /// Leave the RTP auth tag to the caller. Returns whether the cipher
    /// supports it.
    fn set_external_auth(&mut self, enabled: bool) -> bool;

    /// The RTP session authentication key, for ciphers with a separate MAC.
    fn rtp_auth_key(&self) -> Option<&[u8]>;
}
