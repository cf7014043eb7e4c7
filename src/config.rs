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

//! # Assembled Configuration
//!
//! The output side of the compiler: one [`RouterConfig`] per router, fully resolved and
//! self-contained. Everything here is plain data, ready for a daemon-specific text emitter or for
//! serialization.

use crate::filters::{AccessList, Community, CommunityList};
use crate::route_map::RouteMap;
use crate::types::{AfKind, AsId, CompileError};

use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// A fully resolved BGP neighbor of one router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peer {
    /// Name of the neighboring router.
    pub node: String,
    /// The address the session dials.
    pub addr: IpAddr,
    /// ASN of the neighbor.
    pub asn: AsId,
    /// Address family of the session.
    pub family: AfKind,
    /// Port of the neighbor's BGP daemon.
    pub port: u16,
    /// Whether the router announces itself as next hop on routes sent to this neighbor. Always set
    /// on emulated sessions, where the IGP may not cover the eBGP link.
    pub next_hop_self: bool,
    /// Whether the session may span more than one IGP hop.
    pub ebgp_multihop: bool,
    /// Human-readable session description.
    pub description: String,
}

/// Per-family activation block: the networks advertised and the neighbors activated for one
/// address family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressFamily {
    /// The address family.
    pub kind: AfKind,
    /// Networks advertised in this family.
    pub networks: Vec<IpNet>,
    /// Neighbors activated in this family.
    pub neighbors: Vec<Peer>,
}

/// # Assembled configuration of one router
///
/// The final product of compilation. Community lists arrive here already qualified with the
/// router's ASN, and route maps are sorted into their deterministic apply sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Name of the router.
    pub name: String,
    /// ASN of the router.
    pub asn: AsId,
    /// All resolved neighbors, across both address families.
    pub neighbors: Vec<Peer>,
    /// Per-family activation blocks.
    pub address_families: Vec<AddressFamily>,
    /// Access lists registered on the router.
    pub access_lists: Vec<AccessList>,
    /// Community lists registered on the router, qualified with the router's ASN.
    pub community_lists: Vec<CommunityList>,
    /// Resolved route maps in apply order.
    pub route_maps: Vec<RouteMap>,
    /// Whether the router acts as a route reflector.
    pub route_reflector: bool,
    /// Shared session secret, if configured.
    pub password: Option<String>,
    /// Maximum number of prefixes accepted per neighbor.
    pub max_prefixes: u32,
}

impl RouterConfig {
    /// Serialize the configuration as a JSON string.
    pub fn to_json(&self) -> Result<String, CompileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Qualify every community list with the router's ASN: numbered communities become
/// `<asn>:<number>` literals, literal tags pass through unchanged.
pub(crate) fn qualify_community_lists(lists: &[CommunityList], asn: AsId) -> Vec<CommunityList> {
    lists
        .iter()
        .map(|cl| CommunityList {
            name: cl.name.clone(),
            community: cl.community.qualify(asn),
            action: cl.action,
        })
        .collect()
}

/// Qualify a single community value with the router's ASN.
pub(crate) fn qualify_community(community: &Community, asn: AsId) -> Community {
    community.qualify(asn)
}
