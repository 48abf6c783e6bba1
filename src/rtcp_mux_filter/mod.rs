
use crate::error::{Error, Result};
use crate::sdp::transport_description::ContentSource;

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
enum MuxState {
    #[default]
    Init,
    SentOffer,
    ReceivedOffer,
    SentPranswer,
    ReceivedPranswer,
    /// Mux is in use. Nothing can turn it off again.
    Active,
}

/// RtcpMuxFilter runs the offer/answer exchange for `a=rtcp-mux` and tells
/// whether RTCP shares the RTP transport.
#[derive(Default, Debug, Clone)]
pub struct RtcpMuxFilter {
    state: MuxState,
    offer_enable: bool,
}

impl RtcpMuxFilter {
    pub fn new() -> Self {
        RtcpMuxFilter::default()
    }

    /// Mux is used, at least provisionally.
    pub fn is_active(&self) -> bool {
        matches!(
            self.state,
            MuxState::SentPranswer | MuxState::ReceivedPranswer | MuxState::Active
        )
    }

    /// Mux is used and the exchange that enabled it is complete.
    pub fn is_fully_active(&self) -> bool {
        self.state == MuxState::Active
    }

    /// Forces mux on, for transports that require it.
    pub fn set_active(&mut self) {
        self.state = MuxState::Active;
    }

    pub fn set_offer(&mut self, offer_enable: bool, source: ContentSource) -> Result<()> {
        if self.state == MuxState::Active {
            return self.keep_active(offer_enable);
        }

        if !self.expect_offer(offer_enable, source) {
            log::warn!("rtcp mux: unexpected {source} offer in state {:?}", self.state);
            return Err(Error::InvalidState(format!(
                "rtcp mux does not expect a {source} offer"
            )));
        }

        self.offer_enable = offer_enable;
        self.state = match source {
            ContentSource::Local => MuxState::SentOffer,
            ContentSource::Remote => MuxState::ReceivedOffer,
        };
        Ok(())
    }

    pub fn set_provisional_answer(
        &mut self,
        answer_enable: bool,
        source: ContentSource,
    ) -> Result<()> {
        if self.state == MuxState::Active {
            return self.keep_active(answer_enable);
        }
        self.check_answer(answer_enable, source)?;

        if self.offer_enable {
            self.state = match (answer_enable, source) {
                (true, ContentSource::Remote) => MuxState::ReceivedPranswer,
                (true, ContentSource::Local) => MuxState::SentPranswer,
                // Back to waiting for a later answer.
                (false, ContentSource::Remote) => MuxState::SentOffer,
                (false, ContentSource::Local) => MuxState::ReceivedOffer,
            };
        }
        Ok(())
    }

    pub fn set_answer(&mut self, answer_enable: bool, source: ContentSource) -> Result<()> {
        if self.state == MuxState::Active {
            return self.keep_active(answer_enable);
        }
        self.check_answer(answer_enable, source)?;

        self.state = if self.offer_enable && answer_enable {
            MuxState::Active
        } else {
            MuxState::Init
        };
        Ok(())
    }

    fn keep_active(&self, enable: bool) -> Result<()> {
        if enable {
            Ok(())
        } else {
            Err(Error::InvalidState(
                "rtcp mux can not be disabled once active".to_owned(),
            ))
        }
    }

    fn check_answer(&self, answer_enable: bool, source: ContentSource) -> Result<()> {
        if !self.expect_answer(source) {
            log::warn!("rtcp mux: unexpected {source} answer in state {:?}", self.state);
            return Err(Error::InvalidState(format!(
                "rtcp mux does not expect a {source} answer"
            )));
        }
        if answer_enable && !self.offer_enable {
            return Err(Error::InvalidParameter(
                "answer enables rtcp mux but the offer did not".to_owned(),
            ));
        }
        Ok(())
    }

    fn expect_offer(&self, offer_enable: bool, source: ContentSource) -> bool {
        match self.state {
            MuxState::Init => true,
            MuxState::Active => offer_enable == self.offer_enable,
            MuxState::SentOffer => source == ContentSource::Local,
            MuxState::ReceivedOffer => source == ContentSource::Remote,
            _ => false,
        }
    }

    fn expect_answer(&self, source: ContentSource) -> bool {
        matches!(
            (self.state, source),
            (MuxState::SentOffer, ContentSource::Remote)
                | (MuxState::ReceivedOffer, ContentSource::Local)
                | (MuxState::SentPranswer, ContentSource::Local)
                | (MuxState::ReceivedPranswer, ContentSource::Remote)
        )
    }
}
