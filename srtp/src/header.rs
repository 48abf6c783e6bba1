use std::ops::Range;

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Result};

pub const RTP_HEADER_LENGTH: usize = 12;
pub const RTCP_HEADER_LENGTH: usize = 4;
pub const SSRC_LENGTH: usize = 4;
pub const CSRC_LENGTH: usize = 4;

const VERSION_SHIFT: u8 = 6;
const VERSION_MASK: u8 = 0x3;
const EXTENSION_SHIFT: u8 = 4;
const EXTENSION_MASK: u8 = 0x1;
const CC_MASK: u8 = 0xF;

pub const EXTENSION_PROFILE_ONE_BYTE: u16 = 0xBEDE;
pub const EXTENSION_PROFILE_TWO_BYTE: u16 = 0x1000;

/// The parts of a fixed RTP header SRTP needs, plus where the header ends.
/// Offsets refer to the packet buffer the header was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtpHeader {
    pub sequence_number: u16,
    pub ssrc: u32,
    pub extension_profile: Option<u16>,
    /// Body of the header extension, excluding its 4 byte preamble.
    pub extension: Range<usize>,
    pub payload_offset: usize,
}

impl RtpHeader {
    /// Parses the header at the start of `buf`. `buf` is the packet as
    /// currently held: plaintext or protected, the header is clear in both.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < RTP_HEADER_LENGTH {
            return Err(Error::ErrTooShortRtp);
        }
        if (buf[0] >> VERSION_SHIFT) & VERSION_MASK != 2 {
            return Err(Error::ErrTooShortRtp);
        }

        let cc = (buf[0] & CC_MASK) as usize;
        let has_extension = (buf[0] >> EXTENSION_SHIFT) & EXTENSION_MASK != 0;
        let sequence_number = BigEndian::read_u16(&buf[2..4]);
        let ssrc = BigEndian::read_u32(&buf[8..12]);

        let mut offset = RTP_HEADER_LENGTH + cc * CSRC_LENGTH;
        let mut extension_profile = None;
        let mut extension = offset..offset;
        if has_extension {
            if buf.len() < offset + 4 {
                return Err(Error::ErrTooShortRtp);
            }
            extension_profile = Some(BigEndian::read_u16(&buf[offset..offset + 2]));
            let extension_len = BigEndian::read_u16(&buf[offset + 2..offset + 4]) as usize * 4;
            extension = offset + 4..offset + 4 + extension_len;
            offset = extension.end;
        }

        if buf.len() < offset {
            return Err(Error::ErrTooShortRtp);
        }

        Ok(RtpHeader {
            sequence_number,
            ssrc,
            extension_profile,
            extension,
            payload_offset: offset,
        })
    }
}

/// The SSRC of the packet sender, following the 4 byte common RTCP header.
pub fn rtcp_sender_ssrc(buf: &[u8]) -> Result<u32> {
    if buf.len() < RTCP_HEADER_LENGTH + SSRC_LENGTH {
        return Err(Error::ErrTooShortRtcp);
    }
    Ok(BigEndian::read_u32(
        &buf[RTCP_HEADER_LENGTH..RTCP_HEADER_LENGTH + SSRC_LENGTH],
    ))
}

/// One element of a RFC 8285 header extension block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExtensionElement {
    pub id: u8,
    /// Length of the element's own id/len prefix, 1 or 2.
    pub prefix_len: usize,
    pub data: Range<usize>,
}

/// Walks the header extension elements in wire order, the way RFC 6904
/// consumes keystream: each element takes prefix_len + data.len() bytes of
/// keystream and padding between elements takes none. Unknown extension
/// profiles yield no elements.
pub(crate) fn extension_elements(buf: &[u8], header: &RtpHeader) -> Result<Vec<ExtensionElement>> {
    let mut elements = vec![];
    let profile = match header.extension_profile {
        Some(p) => p,
        None => return Ok(elements),
    };
    let end = header.extension.end;
    let mut pos = header.extension.start;

    if profile == EXTENSION_PROFILE_ONE_BYTE {
        while pos < end {
            let id = buf[pos] >> 4;
            let len = (buf[pos] & 0x0F) as usize + 1;
            pos += 1;
            if pos + len > end {
                return Err(Error::ErrHeaderExtensionMalformed);
            }
            if id == 15 {
                break;
            }
            elements.push(ExtensionElement {
                id,
                prefix_len: 1,
                data: pos..pos + len,
            });
            pos += len;
            while pos < end && buf[pos] == 0 {
                pos += 1;
            }
        }
    } else if profile & 0xFFF0 == EXTENSION_PROFILE_TWO_BYTE {
        while pos + 1 < end {
            let id = buf[pos];
            let len = buf[pos + 1] as usize;
            pos += 2;
            if pos + len > end {
                return Err(Error::ErrHeaderExtensionMalformed);
            }
            elements.push(ExtensionElement {
                id,
                prefix_len: 2,
                data: pos..pos + len,
            });
            pos += len;
            while pos < end && buf[pos] == 0 {
                pos += 1;
            }
        }
    }

    Ok(elements)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_plain_header() {
        let pkt = [
            0x80, 0x60, 0x00, 0x05, 0x00, 0x00, 0x00, 0x10, 0xDE, 0xAD, 0xBE, 0xEF, 0xAA, 0xBB,
        ];
        let header = RtpHeader::parse(&pkt).unwrap();
        assert_eq!(header.sequence_number, 5);
        assert_eq!(header.ssrc, 0xDEADBEEF);
        assert_eq!(header.extension_profile, None);
        assert_eq!(header.payload_offset, 12);
    }

    #[test]
    fn test_parse_csrc_and_extension() {
        let mut pkt = vec![0x91, 0x60, 0x00, 0x01, 0, 0, 0, 0, 0, 0, 0, 1];
        pkt.extend_from_slice(&[0x11, 0x22, 0x33, 0x44]); // csrc
        pkt.extend_from_slice(&[0xBE, 0xDE, 0x00, 0x01]);
        pkt.extend_from_slice(&[0x11, 0xAA, 0xBB, 0x00]);
        pkt.extend_from_slice(&[0x01, 0x02]);

        let header = RtpHeader::parse(&pkt).unwrap();
        assert_eq!(header.extension_profile, Some(EXTENSION_PROFILE_ONE_BYTE));
        assert_eq!(header.extension, 20..24);
        assert_eq!(header.payload_offset, 24);

        let elements = extension_elements(&pkt, &header).unwrap();
        assert_eq!(
            elements,
            vec![ExtensionElement {
                id: 1,
                prefix_len: 1,
                data: 21..23
            }]
        );
    }

    #[test]
    fn test_parse_truncated() {
        assert_eq!(RtpHeader::parse(&[0x80; 11]), Err(Error::ErrTooShortRtp));

        // Extension bit set with the extension cut short.
        let pkt = [0x90, 0x60, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0xBE, 0xDE, 0x00, 0x02, 0x10];
        assert_eq!(RtpHeader::parse(&pkt), Err(Error::ErrTooShortRtp));

        assert_eq!(rtcp_sender_ssrc(&[0x80, 0xC8, 0x00]), Err(Error::ErrTooShortRtcp));
    }

    #[test]
    fn test_two_byte_elements_and_stop_id() {
        let mut pkt = vec![0x90, 0x60, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1];
        pkt.extend_from_slice(&[0x10, 0x00, 0x00, 0x02]);
        pkt.extend_from_slice(&[0x05, 0x02, 0xAA, 0xBB, 0x00, 0x07, 0x01, 0xCC]);
        let header = RtpHeader::parse(&pkt).unwrap();
        let elements = extension_elements(&pkt, &header).unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].id, 5);
        assert_eq!(elements[0].data, 18..20);
        assert_eq!(elements[1].id, 7);
        assert_eq!(elements[1].data, 23..24);

        // id 15 terminates one-byte processing.
        let mut pkt = vec![0x90, 0x60, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1];
        pkt.extend_from_slice(&[0xBE, 0xDE, 0x00, 0x01, 0xF0, 0x00, 0x20, 0xAA]);
        let header = RtpHeader::parse(&pkt).unwrap();
        assert!(extension_elements(&pkt, &header).unwrap().is_empty());
    }
}
