use crate::dtls_transport::dtls_role::DtlsRole;
use crate::error::RoleRejection;
use crate::sdp::connection_role::ConnectionRole;
use crate::sdp::sdp_type::SdpType;

/// choose_role derives the local DTLS role from the `setup:` attributes of
/// an offer/answer pair ([RFC 5763] section 5, [RFC 4145] section 4.1).
///
/// Whichever side is active sends the ClientHello, so an active local side
/// is the client and a passive or actpass one the server. An answer without
/// the attribute comes from a legacy endpoint that always connects, which
/// makes an actpass offerer the server.
///
/// [RFC 5763]: https://tools.ietf.org/html/rfc5763#section-5
/// [RFC 4145]: https://tools.ietf.org/html/rfc4145#section-4.1
pub fn choose_role(
    local_role: ConnectionRole,
    remote_role: ConnectionRole,
    local_type: SdpType,
    remote_type: SdpType,
) -> Result<DtlsRole, RoleRejection> {
    let local_offered = match (local_type, remote_type) {
        (SdpType::Offer, t) if t.is_answer() => true,
        (t, SdpType::Offer) if t.is_answer() => false,
        _ => return Err(RoleRejection::NoOfferer),
    };

    if local_role == remote_role && local_role != ConnectionRole::Unspecified {
        return Err(RoleRejection::DuplicateRole);
    }

    if local_offered {
        match local_role {
            ConnectionRole::Actpass => {}
            ConnectionRole::Unspecified => return Err(RoleRejection::LegacyPeer),
            _ => return Err(RoleRejection::OffererNotActpass),
        }
        match remote_role {
            ConnectionRole::Passive => Ok(DtlsRole::Client),
            ConnectionRole::Active | ConnectionRole::Unspecified => Ok(DtlsRole::Server),
            _ => Err(RoleRejection::AnswererNotConcrete),
        }
    } else {
        match remote_role {
            ConnectionRole::Actpass => {}
            ConnectionRole::Unspecified => return Err(RoleRejection::LegacyPeer),
            _ => return Err(RoleRejection::OffererNotActpass),
        }
        answerer_role(local_role)
    }
}

fn answerer_role(local_role: ConnectionRole) -> Result<DtlsRole, RoleRejection> {
    match local_role {
        ConnectionRole::Active => Ok(DtlsRole::Client),
        ConnectionRole::Passive => Ok(DtlsRole::Server),
        _ => Err(RoleRejection::AnswererNotConcrete),
    }
}

/// negotiate_role runs choose_role against the role already in place.
///
/// A remote offer may restate the negotiated role with a concrete `setup:`
/// value instead of actpass (draft-ietf-mmusic-dtls-sdp section 5.5). Any
/// outcome that differs from `current` is a RoleChange.
pub fn negotiate_role(
    local_role: ConnectionRole,
    remote_role: ConnectionRole,
    local_type: SdpType,
    remote_type: SdpType,
    current: Option<DtlsRole>,
) -> Result<DtlsRole, RoleRejection> {
    let restated_offer = remote_type == SdpType::Offer
        && local_type.is_answer()
        && remote_role.is_concrete()
        && current.is_some();

    let role = if restated_offer {
        if let Some(current) = current {
            if remote_role != current.opposite().connection_role() {
                return Err(RoleRejection::RoleChange);
            }
        }
        answerer_role(local_role)?
    } else {
        choose_role(local_role, remote_role, local_type, remote_type)?
    };

    match current {
        Some(current) if current != role => Err(RoleRejection::RoleChange),
        _ => Ok(role),
    }
}
