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

//! # Compiler
//!
//! The pure build phase: given a finished [`PolicyIntent`] and a [`Topology`], produce one
//! [`RouterConfig`] per declared router. Compilation never mutates its inputs, so compiling twice
//! yields identical output.
//!
//! Per router, the compiler (1) resolves every abstract peering into concrete per-family
//! neighbors, (2) instantiates every raw declaration once per matching neighbor and direction,
//! (3) merges instances sharing the same identity `(name, neighbor, direction, order)`, (4) sorts the
//! result into the deterministic apply sequence, (5) validates that every match condition
//! references a registered filter, and (6) qualifies numbered communities with the router's ASN.

use crate::config::{qualify_community, qualify_community_lists, AddressFamily, Peer, RouterConfig};
use crate::filters::Filter;
use crate::intent::{PolicyIntent, RouterIntent, DEFAULT_MAX_PREFIXES};
use crate::resolver;
use crate::route_map::{
    NeighborRef, PeerRef, RouteMap, RouteMapDirection, RouteMapKey, RouteMapMatch, RouteMapSet,
};
use crate::topology::Topology;
use crate::types::{AfKind, CompileError, BGP_DEFAULT_PORT};

use log::{debug, warn};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Compile every router that carries declarations. The result is keyed by router name, so
/// iteration order (and serialization) is deterministic.
pub fn compile(
    intent: &PolicyIntent,
    topo: &Topology,
) -> Result<BTreeMap<String, RouterConfig>, CompileError> {
    let mut configs = BTreeMap::new();
    for (name, _) in intent.routers() {
        configs.insert(name.clone(), compile_router(intent, topo, name)?);
    }
    Ok(configs)
}

/// Compile a single router.
pub fn compile_router(
    intent: &PolicyIntent,
    topo: &Topology,
    name: &str,
) -> Result<RouterConfig, CompileError> {
    let rid = topo
        .get_router(name)
        .ok_or_else(|| CompileError::RouterNotFound(name.to_string()))?;
    let asn = topo
        .asn(rid)?
        .ok_or_else(|| CompileError::NotBgpSpeaker(name.to_string()))?;
    let empty = RouterIntent::default();
    let ri = intent.get(name).unwrap_or(&empty);

    debug!("compiling {name} ({asn})");

    // resolve every abstract peering into concrete per-family neighbors
    let mut neighbors: Vec<Peer> = Vec::new();
    for peer in &ri.peers {
        let Some(peer_rid) = topo.get_router(peer) else {
            return Err(CompileError::RouterNotFound(peer.clone()));
        };
        let Some(peer_asn) = topo.asn(peer_rid)? else {
            warn!("{name}: peer {peer} is not a BGP speaker, skipping the session");
            continue;
        };
        let port = intent
            .get(peer)
            .and_then(|r| r.port)
            .unwrap_or(BGP_DEFAULT_PORT);
        let ebgp = peer_asn != asn;
        for family in [AfKind::Ipv4, AfKind::Ipv6] {
            if let Some(res) = resolver::resolve(topo, rid, peer, family) {
                neighbors.push(Peer {
                    node: peer.clone(),
                    addr: res.addr,
                    asn: peer_asn,
                    family,
                    port,
                    next_hop_self: true,
                    ebgp_multihop: ebgp,
                    description: format!("{peer} ({}BGP)", if ebgp { 'e' } else { 'i' }),
                });
            }
        }
    }

    // instantiate declarations per matching neighbor and direction, merging on identity
    let mut route_maps: Vec<RouteMap> = Vec::new();
    let mut by_key: HashMap<RouteMapKey, usize> = HashMap::new();
    let mut push = |rm: RouteMap, route_maps: &mut Vec<RouteMap>| match by_key.entry(rm.key()) {
        std::collections::hash_map::Entry::Occupied(e) => {
            route_maps[*e.get()].merge_from(rm);
        }
        std::collections::hash_map::Entry::Vacant(e) => {
            e.insert(route_maps.len());
            route_maps.push(rm);
        }
    };
    for decl in &ri.route_maps {
        match &decl.peer {
            PeerRef::Local => {
                push(
                    RouteMap {
                        name: decl.name.clone(),
                        policy: decl.policy,
                        neighbor: None,
                        direction: decl.direction.unwrap_or(RouteMapDirection::Incoming),
                        conds: decl.conds.clone(),
                        set: decl.set.clone(),
                        call: decl.call.clone(),
                        flow: decl.flow,
                        order: decl.order,
                    },
                    &mut route_maps,
                );
            }
            PeerRef::Node(peer) => {
                let directions = match decl.direction {
                    Some(d) => vec![d],
                    None => vec![RouteMapDirection::Incoming, RouteMapDirection::Outgoing],
                };
                for neighbor in neighbors.iter().filter(|p| &p.node == peer) {
                    for direction in &directions {
                        push(
                            RouteMap {
                                name: decl.name.clone(),
                                policy: decl.policy,
                                neighbor: Some(NeighborRef {
                                    node: neighbor.node.clone(),
                                    family: neighbor.family,
                                    addr: neighbor.addr,
                                }),
                                direction: *direction,
                                conds: decl.conds.clone(),
                                set: decl.set.clone(),
                                call: decl.call.clone(),
                                flow: decl.flow,
                                order: decl.order,
                            },
                            &mut route_maps,
                        );
                    }
                }
            }
        }
    }

    // deterministic apply sequence
    route_maps.sort_by(|a, b| a.chain_key().cmp(&b.chain_key()));

    validate_filters(name, ri, &route_maps)?;

    // qualify numbered communities with the router's ASN
    let community_lists = qualify_community_lists(&ri.community_lists, asn);
    for rm in &mut route_maps {
        for action in &mut rm.set {
            if let RouteMapSet::Community(c) = action {
                *c = qualify_community(c, asn);
            }
        }
    }

    let address_families = vec![
        AddressFamily {
            kind: AfKind::Ipv4,
            networks: ri.networks_v4.iter().map(|n| (*n).into()).collect(),
            neighbors: neighbors
                .iter()
                .filter(|p| p.family == AfKind::Ipv4)
                .cloned()
                .collect(),
        },
        AddressFamily {
            kind: AfKind::Ipv6,
            networks: ri.networks_v6.iter().map(|n| (*n).into()).collect(),
            neighbors: neighbors
                .iter()
                .filter(|p| p.family == AfKind::Ipv6)
                .cloned()
                .collect(),
        },
    ];

    Ok(RouterConfig {
        name: name.to_string(),
        asn,
        neighbors,
        address_families,
        access_lists: ri.access_lists.clone(),
        community_lists,
        route_maps,
        route_reflector: ri.route_reflector,
        password: ri.password.clone(),
        max_prefixes: ri.max_prefixes.unwrap_or(DEFAULT_MAX_PREFIXES),
    })
}

/// Check that filter names are unambiguous on the router and that every match condition of every
/// resolved route map references a registered filter.
fn validate_filters(
    router: &str,
    ri: &RouterIntent,
    route_maps: &[RouteMap],
) -> Result<(), CompileError> {
    let mut seen: HashMap<&str, Filter> = HashMap::new();
    let mut acl_names: HashSet<&str> = HashSet::new();
    let mut cl_names: HashSet<&str> = HashSet::new();
    for acl in &ri.access_lists {
        let filter = Filter::Access(acl.clone());
        if let Some(prev) = seen.insert(&acl.name, filter.clone()) {
            if prev != filter {
                return Err(CompileError::DuplicateFilter {
                    router: router.to_string(),
                    filter: acl.name.clone(),
                });
            }
        }
        acl_names.insert(&acl.name);
    }
    for cl in &ri.community_lists {
        let filter = Filter::Community(cl.clone());
        if let Some(prev) = seen.insert(&cl.name, filter.clone()) {
            if prev != filter {
                return Err(CompileError::DuplicateFilter {
                    router: router.to_string(),
                    filter: cl.name.clone(),
                });
            }
        }
        cl_names.insert(&cl.name);
    }
    for rm in route_maps {
        for cond in &rm.conds {
            let (registered, name) = match cond {
                RouteMapMatch::AccessList(name) => (acl_names.contains(name.as_str()), name),
                RouteMapMatch::Community(name) => (cl_names.contains(name.as_str()), name),
            };
            if !registered {
                return Err(CompileError::UnknownFilter {
                    router: router.to_string(),
                    map: rm.name.clone(),
                    filter: name.clone(),
                });
            }
        }
    }
    Ok(())
}
