use super::*;
use crate::header::RtpHeader;

impl Context {
    /// Decrypts the SRTP packet held in `buf` in place and returns the
    /// length of the resulting RTP packet.
    pub fn decrypt_rtp(&mut self, buf: &mut [u8]) -> Result<usize> {
        let header = RtpHeader::parse(buf)?;

        let (roc, index) = {
            let state = self.get_srtp_ssrc_state(header.ssrc);
            let roc = state.next_rollover_count(header.sequence_number);
            let index = ((roc as u64) << 16) | header.sequence_number as u64;
            if let Some(replay_detector) = &mut state.replay_detector {
                match replay_detector.check(index) {
                    ReplayCheck::Valid => {}
                    ReplayCheck::Duplicated => return Err(Error::ReplayFail(header.ssrc, index)),
                    ReplayCheck::TooOld => return Err(Error::ReplayOld(header.ssrc, index)),
                }
            }
            (roc, index)
        };

        let n = self.cipher.decrypt_rtp(buf, &header, roc)?;
        if !self.encrypted_header_extension_ids.is_empty() {
            self.cipher.xor_header_extensions(
                &mut buf[..n],
                &header,
                roc,
                &self.encrypted_header_extension_ids,
            )?;
        }

        {
            let state = self.get_srtp_ssrc_state(header.ssrc);
            if let Some(replay_detector) = &mut state.replay_detector {
                replay_detector.accept();
            }
            state.update_rollover_count(header.sequence_number);
        }
        log::trace!("srtp: unprotected ssrc={} index={index}", header.ssrc);

        Ok(n)
    }

    /// Encrypts the RTP packet in `buf[..len]` in place. Returns the SRTP
    /// length and the 48 bit extended index the packet was sent with.
    /// Nothing is written when `buf` can not hold the result.
    pub fn encrypt_rtp(&mut self, buf: &mut [u8], len: usize) -> Result<(usize, u64)> {
        let needed = len + self.cipher.rtp_auth_tag_len() + self.cipher.aead_auth_tag_len();
        if buf.len() < needed {
            return Err(Error::BufferTooSmall(needed, buf.len()));
        }
        let header = RtpHeader::parse(&buf[..len])?;

        let roc = self
            .get_srtp_ssrc_state(header.ssrc)
            .next_rollover_count(header.sequence_number);

        if !self.encrypted_header_extension_ids.is_empty() {
            self.cipher.xor_header_extensions(
                &mut buf[..len],
                &header,
                roc,
                &self.encrypted_header_extension_ids,
            )?;
        }
        let n = self.cipher.encrypt_rtp(buf, len, &header, roc)?;

        self.get_srtp_ssrc_state(header.ssrc)
            .update_rollover_count(header.sequence_number);

        Ok((n, ((roc as u64) << 16) | header.sequence_number as u64))
    }
}
