#[cfg(test)]
mod key_derivation_test;

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::{Aes128, Aes256};
use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Result};

pub const LABEL_SRTP_ENCRYPTION: u8 = 0x00;
pub const LABEL_SRTP_AUTHENTICATION_TAG: u8 = 0x01;
pub const LABEL_SRTP_SALT: u8 = 0x02;
pub const LABEL_SRTCP_ENCRYPTION: u8 = 0x03;
pub const LABEL_SRTCP_AUTHENTICATION_TAG: u8 = 0x04;
pub const LABEL_SRTCP_SALT: u8 = 0x05;
pub const LABEL_SRTP_HEADER_ENCRYPTION: u8 = 0x06;
pub const LABEL_SRTP_HEADER_SALT: u8 = 0x07;

pub const MAX_SEQUENCE_NUMBER: u16 = 65535;
pub const MAX_SRTCP_INDEX: u64 = 0x7FFF_FFFF;
/// Extended SRTP packet index is 48 bits wide (ROC << 16 | SEQ).
pub const MAX_SRTP_INDEX: u64 = 0x0000_FFFF_FFFF_FFFF;

pub const SRTCP_INDEX_SIZE: usize = 4;

const PRF_BLOCK_SIZE: usize = 16;

/// Key derivation with the AES-128 counter mode PRF.
///
/// https://tools.ietf.org/html/rfc3711#section-4.3.1
/// x = (label || r) XOR master_salt, where r = index DIV key_derivation_rate,
/// and the output is the AES-CM keystream started at IV = x * 2^16.
pub(crate) fn aes_cm_key_derivation(
    label: u8,
    master_key: &[u8],
    master_salt: &[u8],
    index_over_kdr: usize,
    out_len: usize,
) -> Result<Vec<u8>> {
    if index_over_kdr != 0 {
        // 24-bit "index DIV kdr" must be xored to prf input.
        return Err(Error::UnsupportedIndexOverKdr);
    }
    let cipher = Aes128::new_from_slice(master_key)
        .map_err(|_| Error::SrtpMasterKeyLength(16, master_key.len()))?;

    prf_keystream(&cipher, label, master_salt, out_len)
}

/// Key derivation with the AES-256 counter mode PRF, as AEAD_AES_256_GCM
/// requires (https://datatracker.ietf.org/doc/html/rfc7714#section-11).
pub(crate) fn aes_256_cm_key_derivation(
    label: u8,
    master_key: &[u8],
    master_salt: &[u8],
    index_over_kdr: usize,
    out_len: usize,
) -> Result<Vec<u8>> {
    if index_over_kdr != 0 {
        return Err(Error::UnsupportedIndexOverKdr);
    }
    let cipher = Aes256::new_from_slice(master_key)
        .map_err(|_| Error::SrtpMasterKeyLength(32, master_key.len()))?;

    prf_keystream(&cipher, label, master_salt, out_len)
}

fn prf_keystream<C: BlockEncrypt>(
    cipher: &C,
    label: u8,
    master_salt: &[u8],
    out_len: usize,
) -> Result<Vec<u8>> {
    if master_salt.len() > PRF_BLOCK_SIZE - 2 {
        return Err(Error::SrtpSaltLength(PRF_BLOCK_SIZE - 2, master_salt.len()));
    }

    let mut prf_in = [0u8; PRF_BLOCK_SIZE];
    prf_in[..master_salt.len()].copy_from_slice(master_salt);
    prf_in[7] ^= label;

    let mut out = Vec::with_capacity(out_len.div_ceil(PRF_BLOCK_SIZE) * PRF_BLOCK_SIZE);
    let mut i = 0u16;
    while out.len() < out_len {
        BigEndian::write_u16(&mut prf_in[PRF_BLOCK_SIZE - 2..], i);
        let mut block = GenericArray::clone_from_slice(&prf_in);
        cipher.encrypt_block(&mut block);
        out.extend_from_slice(&block);
        i += 1;
    }
    out.truncate(out_len);

    Ok(out)
}

/// Generate IV https://tools.ietf.org/html/rfc3711#section-4.1.1
/// where the 128-bit integer value IV SHALL be defined by the SSRC, the
/// SRTP packet index i, and the SRTP session salting key k_s, as below.
/// - ROC = a 32-bit unsigned rollover counter (roc), which records how many
///   times the 16-bit RTP sequence number has been reset to zero after
///   passing through 65,535
/// ```nobuild
/// i = 2^16 * roc + SEQ
/// IV = (salt*2 ^ 16) | (ssrc*2 ^ 64) | (i*2 ^ 16)
/// ```
pub(crate) fn generate_counter(
    sequence_number: u16,
    rollover_counter: u32,
    ssrc: u32,
    session_salt: &[u8],
) -> [u8; 16] {
    assert!(session_salt.len() <= 16);

    let mut counter = [0u8; 16];
    BigEndian::write_u32(&mut counter[4..8], ssrc);
    BigEndian::write_u32(&mut counter[8..12], rollover_counter);
    BigEndian::write_u16(&mut counter[12..14], sequence_number);

    for (c, s) in counter.iter_mut().zip(session_salt) {
        *c ^= s;
    }

    counter
}
