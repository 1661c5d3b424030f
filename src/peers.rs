// Peer addressing: final-octet keys and lookup

use crate::error::CheckError;
use crate::models::WgPeer;

/// Derives a peer's addressing key: the final dotted octet of its internal
/// address, base-10. `10.0.0.7/32` keys as 7. Anything without a numeric
/// final octet in 0-255 is malformed; that includes v6-only addresses,
/// which this scheme does not cover.
pub fn peer_key(internal_ip: &str) -> Result<u8, CheckError> {
    let addr = internal_ip
        .split_once('/')
        .map_or(internal_ip, |(ip, _mask)| ip);
    let octet = addr.rsplit('.').next().unwrap_or(addr);
    octet.parse().map_err(|_| CheckError::MalformedPeerAddress {
        addr: internal_ip.to_string(),
    })
}

/// Looks a peer up by key with a linear scan. Every row's key is derived
/// along the way, so a malformed address or two peers sharing a final octet
/// is reported as data drift instead of silently resolving.
pub fn resolve(peers: &[WgPeer], key: u8) -> Result<&WgPeer, CheckError> {
    let mut seen: Vec<(u8, &str)> = Vec::with_capacity(peers.len());
    let mut found = None;

    for peer in peers {
        let k = peer_key(&peer.internal_ip)?;
        if let Some((_, first)) = seen.iter().find(|(existing, _)| *existing == k) {
            return Err(CheckError::DuplicatePeerKey {
                first: (*first).to_string(),
                second: peer.internal_ip.clone(),
                key: k,
            });
        }
        seen.push((k, peer.internal_ip.as_str()));
        if k == key {
            found = Some(peer);
        }
    }

    found.ok_or(CheckError::PeerNotFound(key))
}
