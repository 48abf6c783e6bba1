use super::*;
use crate::header::*;

impl Context {
    /// Decrypts the SRTCP packet held in `buf` in place and returns the
    /// length of the resulting RTCP packet.
    pub fn decrypt_rtcp(&mut self, buf: &mut [u8]) -> Result<usize> {
        let min_len = RTCP_HEADER_LENGTH
            + SSRC_LENGTH
            + SRTCP_INDEX_SIZE
            + self.cipher.rtcp_auth_tag_len()
            + self.cipher.aead_auth_tag_len();
        if buf.len() < min_len {
            return Err(Error::SrtcpTooSmall(buf.len(), min_len));
        }

        let index = self.cipher.get_rtcp_index(buf);
        let ssrc = rtcp_sender_ssrc(buf)?;

        {
            let state = self.get_srtcp_ssrc_state(ssrc);
            if let Some(replay_detector) = &mut state.replay_detector {
                match replay_detector.check(index as u64) {
                    ReplayCheck::Valid => {}
                    ReplayCheck::Duplicated => return Err(Error::ReplayFail(ssrc, index as u64)),
                    ReplayCheck::TooOld => return Err(Error::ReplayOld(ssrc, index as u64)),
                }
            }
        }

        let n = self.cipher.decrypt_rtcp(buf, index, ssrc)?;

        {
            let state = self.get_srtcp_ssrc_state(ssrc);
            if let Some(replay_detector) = &mut state.replay_detector {
                replay_detector.accept();
            }
        }

        Ok(n)
    }

    /// Encrypts the RTCP packet in `buf[..len]` in place and returns the
    /// SRTCP length. The first packet of an SSRC is sent with index 1; once
    /// the 31 bit index is used up every call fails with ErrKeyExpired.
    pub fn encrypt_rtcp(&mut self, buf: &mut [u8], len: usize) -> Result<usize> {
        let needed = len
            + SRTCP_INDEX_SIZE
            + self.cipher.rtcp_auth_tag_len()
            + self.cipher.aead_auth_tag_len();
        if buf.len() < needed {
            return Err(Error::BufferTooSmall(needed, buf.len()));
        }
        let ssrc = rtcp_sender_ssrc(&buf[..len])?;

        let index = {
            let state = self.get_srtcp_ssrc_state(ssrc);
            if state.srtcp_index as u64 >= MAX_SRTCP_INDEX {
                return Err(Error::ErrKeyExpired);
            }
            state.srtcp_index + 1
        };

        let n = self.cipher.encrypt_rtcp(buf, len, index, ssrc)?;
        self.get_srtcp_ssrc_state(ssrc).srtcp_index = index;

        Ok(n)
    }
}
