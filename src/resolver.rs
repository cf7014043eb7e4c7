// BgpConf: BGP Policy Compiler for Emulated Networks
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! # Peer Address Resolver
//!
//! Finds the address a router should dial to reach an abstract peer: a cost-ordered frontier
//! search over the interface graph, restricted to routers that share the base router's ASN (or
//! have no ASN at all, treated as internal fabric). The first interface of the target router
//! discovered at minimal accumulated IGP cost provides the session address.
//!
//! A failed resolution is not an error: callers treat `None` as "no session possible over this
//! address family" and omit the peer.

use crate::topology::Topology;
use crate::types::{AfKind, IfaceId, LinkWeight, RouterId};

use log::{debug, trace};
use ordered_float::NotNan;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::net::{IpAddr, Ipv6Addr};

/// A successful peer address resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The address the base router should dial.
    pub addr: IpAddr,
    /// The router owning that address.
    pub router: RouterId,
    /// Accumulated IGP cost of the discovered path.
    pub cost: LinkWeight,
}

/// Resolve the address that `base` should dial to establish a BGP session with the router named
/// `target`, for one address family.
///
/// Every interface enters the frontier labeled with the sum of IGP costs of all interfaces
/// traversed so far (including itself). The search pops the cheapest unvisited interface and
/// inspects every router on its broadcast domain: if the target is found there, its interface
/// address on that domain is returned immediately (for IPv6 only if the address is not
/// link-local; there is no fallback to another path). Any other in-ASN or ASN-less router has its
/// interfaces enqueued for further exploration. Equal-cost entries keep their discovery order.
///
/// Returns `None` if the target is the base router itself, is unreachable without leaving the
/// ASN, or has no usable address of the requested family on the discovered domain.
pub fn resolve(
    topo: &Topology,
    base: RouterId,
    target: &str,
    family: AfKind,
) -> Option<Resolution> {
    if topo.name(base).ok()? == target {
        return None;
    }
    let base_asn = topo.asn(base).ok()?;

    let mut visited: HashSet<IfaceId> = HashSet::new();
    let mut frontier: BinaryHeap<Reverse<(NotNan<LinkWeight>, u64, IfaceId)>> = BinaryHeap::new();
    let mut seq: u64 = 0;

    for (iface, _, data) in topo.interfaces(base) {
        frontier.push(Reverse((NotNan::new(data.cost).unwrap(), seq, iface)));
        seq += 1;
    }

    while let Some(Reverse((cost, _, iface))) = frontier.pop() {
        if !visited.insert(iface) {
            continue;
        }
        let lan = topo.iface_lan(iface)?;
        trace!("exploring domain {lan:?} at cost {cost}");
        for (router, member_iface) in topo.lan_members(lan) {
            if topo.name(router).map(|n| n == target).unwrap_or(false) {
                let addr = match family {
                    AfKind::Ipv4 => member_iface.addr4.map(IpAddr::V4),
                    AfKind::Ipv6 => member_iface
                        .addr6
                        .filter(|a| !is_link_local(a))
                        .map(IpAddr::V6),
                };
                debug!(
                    "resolved {target} ({family}) at cost {cost}: {:?}",
                    addr
                );
                return addr.map(|addr| Resolution {
                    addr,
                    router,
                    cost: cost.into_inner(),
                });
            }
            let in_fabric = topo
                .asn(router)
                .map(|asn| asn.is_none() || asn == base_asn)
                .unwrap_or(false);
            if in_fabric {
                for (next, _, data) in topo.interfaces(router) {
                    if !visited.contains(&next) {
                        frontier.push(Reverse((
                            cost + NotNan::new(data.cost).unwrap(),
                            seq,
                            next,
                        )));
                        seq += 1;
                    }
                }
            }
        }
    }
    debug!("no path to {target} ({family}) within {base_asn:?}");
    None
}

/// Link-local IPv6 addresses (`fe80::/10`) cannot be dialed from a remote segment.
fn is_link_local(addr: &Ipv6Addr) -> bool {
    (addr.segments()[0] & 0xffc0) == 0xfe80
}
