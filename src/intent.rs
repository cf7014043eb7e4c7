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

//! # Policy Intent
//!
//! The declaration side of the compiler: an explicit, per-router accumulation of peerings, raw
//! route-map declarations, filters, and session settings, built by the composition helpers below
//! and read immutably by [`crate::compiler::compile`]. The whole declaration phase must complete
//! before any router is compiled; nothing in this module touches the topology graph.
//!
//! The composition helpers encode the standard policy patterns of the emulated provider network:
//! customer and peer sessions calling into canonical per-region chains, route-reflector
//! hierarchies, anycast suppression, and inter-region community filtering. The low-level
//! [`SessionPolicy`] builder exposes the raw primitives the helpers are made of.

use crate::filters::{AccessList, Community, CommunityList, Filter};
use crate::route_map::{
    MatchPolicy, RouteMapDecl, RouteMapDeclBuilder, RouteMapDirection, RouteMapMatch, RouteMapSet,
};
use crate::types::AsId;

use ipnet::{Ipv4Net, Ipv6Net};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Community number tagging routes learned from peers.
pub const COMMUNITY_FROM_PEERS: u32 = 1;
/// Community number tagging routes learned from upstream providers.
pub const COMMUNITY_FROM_UP: u32 = 2;
/// Community number requesting global no-export treatment.
pub const COMMUNITY_SET_NO_EXPORT: u32 = 95;
/// Community number requesting AS-path prepending on export.
pub const COMMUNITY_AS_PREPEND: u32 = 9;
/// Community number tagging routes that must stay within Europe.
pub const COMMUNITY_EU_ONLY: u32 = 11;
/// Community number tagging routes that must stay within North America.
pub const COMMUNITY_NA_ONLY: u32 = 31;
/// Community number tagging routes that must stay within Asia-Pacific.
pub const COMMUNITY_APAC_ONLY: u32 = 51;
/// Community number requesting a raised local preference.
pub const COMMUNITY_LOCAL_PREF_HIGH: u32 = 10;
/// Community number requesting a lowered local preference.
pub const COMMUNITY_LOCAL_PREF_LOW: u32 = 20;

/// Default maximum number of prefixes accepted from one neighbor.
pub const DEFAULT_MAX_PREFIXES: u32 = 100;

/// The region a router belongs to, driving the canonical community vocabulary and the
/// inter-region filtering chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// North America
    NorthAmerica,
    /// Europe
    Europe,
    /// Asia-Pacific
    AsiaPacific,
}

impl Region {
    /// Name of the community list tagging routes that must stay in this region.
    pub fn list_name(&self) -> &'static str {
        match self {
            Region::NorthAmerica => "NA-Only",
            Region::Europe => "EU-Only",
            Region::AsiaPacific => "APAC-Only",
        }
    }

    /// Community number of the region-only tag.
    pub fn only_community(&self) -> u32 {
        match self {
            Region::NorthAmerica => COMMUNITY_NA_ONLY,
            Region::Europe => COMMUNITY_EU_ONLY,
            Region::AsiaPacific => COMMUNITY_APAC_ONLY,
        }
    }

    /// Community number stamped on routes imported from customers and peers in this region.
    pub fn session_community(&self) -> u32 {
        match self {
            Region::NorthAmerica => 10,
            Region::Europe => 30,
            Region::AsiaPacific => 50,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::NorthAmerica => write!(f, "NA"),
            Region::Europe => write!(f, "EU"),
            Region::AsiaPacific => write!(f, "APAC"),
        }
    }
}

/// The commercial type of an eBGP link, selecting the import/export policy built by
/// [`PolicyIntent::ebgp_session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkType {
    /// A settlement-free peering: routes learned there are not re-exported to other peers or
    /// providers.
    Share,
    /// A customer/provider relationship: the customer prefers the provider's routes, the provider
    /// prefers the customer's.
    ClientProvider,
}

/// All declarations accumulated for one router.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouterIntent {
    /// Names of the routers this router wants a BGP session with, in registration order.
    pub peers: Vec<String>,
    /// Raw route-map declarations, in declaration order.
    pub route_maps: Vec<RouteMapDecl>,
    /// Registered access lists.
    pub access_lists: Vec<AccessList>,
    /// Registered community lists.
    pub community_lists: Vec<CommunityList>,
    /// Whether this router acts as a route reflector.
    pub route_reflector: bool,
    /// IPv4 networks advertised by this router.
    pub networks_v4: Vec<Ipv4Net>,
    /// IPv6 networks advertised by this router.
    pub networks_v6: Vec<Ipv6Net>,
    /// Listening port of the BGP daemon, if configured.
    pub port: Option<u16>,
    /// Shared session secret, if configured.
    pub password: Option<String>,
    /// Maximum number of prefixes accepted per neighbor ([`DEFAULT_MAX_PREFIXES`] if unset).
    pub max_prefixes: Option<u32>,
}

impl RouterIntent {
    /// Register an access list. Registering an already-present list (by name) is a no-op.
    pub fn register_access_list(&mut self, acl: AccessList) {
        if !self.access_lists.iter().any(|a| a.name == acl.name) {
            self.access_lists.push(acl);
        }
    }

    /// Register a community list. Registering an already-present list (by name) is a no-op.
    pub fn register_community_list(&mut self, cl: CommunityList) {
        if !self.community_lists.iter().any(|c| c.name == cl.name) {
            self.community_lists.push(cl);
        }
    }

    /// Register a pending peering with the named router.
    pub fn register_peer(&mut self, peer: impl Into<String>) {
        let peer = peer.into();
        if !self.peers.contains(&peer) {
            self.peers.push(peer);
        }
    }

    /// Translate filters into match conditions, registering every unseen filter along the way.
    pub fn match_conds(&mut self, matching: &[Filter]) -> Vec<RouteMapMatch> {
        let mut conds = Vec::with_capacity(matching.len());
        for filter in matching {
            match filter {
                Filter::Access(acl) => {
                    conds.push(RouteMapMatch::AccessList(acl.name.clone()));
                    self.register_access_list(acl.clone());
                }
                Filter::Community(cl) => {
                    conds.push(RouteMapMatch::Community(cl.name.clone()));
                    self.register_community_list(cl.clone());
                }
            }
        }
        conds
    }
}

/// # Policy intent for the whole topology
///
/// One [`RouterIntent`] per router (keyed by name, so iteration is deterministic), plus the set of
/// links excluded from IGP adjacency formation. Built during the declaration phase, consumed
/// immutably by the compiler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyIntent {
    routers: BTreeMap<String, RouterIntent>,
    passive_links: BTreeSet<(String, String)>,
}

impl PolicyIntent {
    /// Create an empty intent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Access the declarations of one router, if any were made.
    pub fn get(&self, router: &str) -> Option<&RouterIntent> {
        self.routers.get(router)
    }

    /// Iterate over all routers with declarations, in name order.
    pub fn routers(&self) -> impl Iterator<Item = (&String, &RouterIntent)> {
        self.routers.iter()
    }

    /// Mutable access to the declarations of one router, creating the entry if needed.
    pub fn router_mut(&mut self, router: &str) -> &mut RouterIntent {
        self.routers.entry(router.to_string()).or_default()
    }

    /// Open the fluent rule builder for one router.
    pub fn session(&mut self, router: &str) -> SessionPolicy<'_> {
        SessionPolicy {
            router: self.router_mut(router),
        }
    }

    /// Register a symmetric BGP peering intent between two routers. Carries no policy by itself.
    pub fn peering(&mut self, a: &str, b: &str) {
        self.router_mut(a).register_peer(b);
        self.router_mut(b).register_peer(a);
    }

    /// Establish a full mesh of BGP peerings between the given routers.
    pub fn full_mesh<'a>(&mut self, routers: impl IntoIterator<Item = &'a str>) {
        let routers: Vec<&str> = routers.into_iter().collect();
        for (a, b) in routers.into_iter().tuple_combinations() {
            self.peering(a, b);
        }
    }

    /// Return `true` if the link between `a` and `b` was marked IGP-passive (excluded from IGP
    /// adjacency formation).
    pub fn is_igp_passive(&self, a: &str, b: &str) -> bool {
        self.passive_links.contains(&link_key(a, b))
    }

    fn mark_igp_passive(&mut self, a: &str, b: &str) {
        self.passive_links.insert(link_key(a, b));
    }

    /// Suppress re-advertisement of an anycast prefix from the route reflector `rr` back toward
    /// the anycast participant: a single deny-all export rule scoped to the participant.
    pub fn anycast(&mut self, rr: &str, participant: &str) {
        let ri = self.router_mut(rr);
        ri.register_access_list(AccessList::any("all"));
        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name("rm-anycast_out")
                .deny()
                .peer(participant)
                .direction(RouteMapDirection::Outgoing)
                .match_access_list("all")
                .order(10)
                .build(),
        );
    }

    /// Declare `rr` as route reflector for the given clients: one peering per client, and the
    /// reflector flag on `rr` (consumed by the text emitter).
    pub fn route_reflector<'a>(&mut self, rr: &str, clients: impl IntoIterator<Item = &'a str>) {
        for client in clients {
            self.peering(rr, client);
        }
        self.router_mut(rr).route_reflector = true;
    }

    /// Seed the standard community vocabulary and the canonical route-map chains for one router of
    /// the given region. `asn` is the AS prepended by the `rm-AS_prepend` chain.
    pub fn region_setup(&mut self, router: &str, region: Region, asn: AsId) {
        let ri = self.router_mut(router);

        ri.register_access_list(AccessList::any("all"));
        for (name, community) in [
            ("from-peers", Community::Numbered(COMMUNITY_FROM_PEERS)),
            ("from-up", Community::Numbered(COMMUNITY_FROM_UP)),
            ("set_no_exportG", Community::Numbered(COMMUNITY_SET_NO_EXPORT)),
            ("AS_prepend", Community::Numbered(COMMUNITY_AS_PREPEND)),
            ("EU-Only", Community::Numbered(COMMUNITY_EU_ONLY)),
            ("APAC-Only", Community::Numbered(COMMUNITY_APAC_ONLY)),
            ("NA-Only", Community::Numbered(COMMUNITY_NA_ONLY)),
            ("blackhole", Community::Literal("blackhole".to_string())),
            ("localPrefH", Community::Numbered(COMMUNITY_LOCAL_PREF_HIGH)),
            ("localPrefL", Community::Numbered(COMMUNITY_LOCAL_PREF_LOW)),
        ] {
            ri.register_community_list(CommunityList::new(name, community, MatchPolicy::Permit));
        }

        // single-purpose chains invoked via call from the policy chains below
        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name("rm-set_no_export")
                .permit()
                .set_community("no-export")
                .order(8)
                .build(),
        );
        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name("rm-blackhole")
                .permit()
                .set_community("no-export")
                .set_community("no-advertise")
                .order(8)
                .build(),
        );
        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name("rm-AS_prepend")
                .permit()
                .prepend_as(asn)
                .order(8)
                .build(),
        );

        // inter-region filters: deny the tags of the two other regions, then permit
        if matches!(region, Region::NorthAmerica | Region::AsiaPacific) {
            ri.route_maps.push(
                RouteMapDeclBuilder::new()
                    .name("rm-continent_filters")
                    .deny()
                    .match_community("EU-Only")
                    .order(8)
                    .build(),
            );
        }
        if matches!(region, Region::NorthAmerica | Region::Europe) {
            ri.route_maps.push(
                RouteMapDeclBuilder::new()
                    .name("rm-continent_filters")
                    .deny()
                    .match_community("APAC-Only")
                    .order(12)
                    .build(),
            );
        }
        if matches!(region, Region::AsiaPacific | Region::Europe) {
            ri.route_maps.push(
                RouteMapDeclBuilder::new()
                    .name("rm-continent_filters")
                    .deny()
                    .match_community("NA-Only")
                    .order(14)
                    .build(),
            );
        }
        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name("rm-continent_filters")
                .permit()
                .order(15)
                .build(),
        );

        // customer import: blackhole escape hatch, then community-driven local preference
        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name("rm-cust-in")
                .permit()
                .match_community("blackhole")
                .call("rm-blackhole")
                .order(8)
                .build(),
        );
        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name("rm-cust-in")
                .permit()
                .match_community("localPrefL")
                .set_local_pref(175)
                .order(12)
                .build(),
        );
        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name("rm-cust-in")
                .permit()
                .match_community("localPrefH")
                .set_local_pref(225)
                .order(16)
                .build(),
        );
        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name("rm-cust-in")
                .permit()
                .set_local_pref(200)
                .order(20)
                .build(),
        );

        // customer export
        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name("rm-cust-out")
                .permit()
                .match_community("set_no_exportG")
                .call("rm-set_no_export")
                .continue_next()
                .order(8)
                .build(),
        );
        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name("rm-cust-out")
                .permit()
                .match_community("AS_prepend")
                .call("rm-AS_prepend")
                .continue_next()
                .order(9)
                .build(),
        );
        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name("rm-cust-out")
                .permit()
                .order(12)
                .build(),
        );

        // peer import
        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name("rm-peer-in")
                .permit()
                .match_community("blackhole")
                .call("rm-blackhole")
                .order(8)
                .build(),
        );
        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name("rm-peer-in")
                .permit()
                .match_community("localPrefL")
                .set_local_pref(75)
                .order(12)
                .build(),
        );
        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name("rm-peer-in")
                .permit()
                .match_community("localPrefH")
                .set_local_pref(125)
                .order(16)
                .build(),
        );
        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name("rm-peer-in")
                .permit()
                .set_local_pref(100)
                .order(20)
                .build(),
        );

        // peer export: never re-export what peers or providers gave us
        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name("rm-peer-out")
                .deny()
                .match_community("from-peers")
                .order(8)
                .build(),
        );
        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name("rm-peer-out")
                .deny()
                .match_community("from-up")
                .order(12)
                .build(),
        );
        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name("rm-peer-out")
                .permit()
                .match_community("set_no_exportG")
                .call("rm-set_no_export")
                .continue_next()
                .order(14)
                .build(),
        );
        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name("rm-peer-out")
                .permit()
                .match_community("AS_prepend")
                .call("rm-AS_prepend")
                .continue_next()
                .order(16)
                .build(),
        );
        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name("rm-peer-out")
                .permit()
                .order(20)
                .build(),
        );
    }

    /// Declare an eBGP session toward a customer: `cust-<client>-in/out` chains on the provider
    /// that call into the canonical `rm-cust-*` chains, plus the region community pair stamped on
    /// inbound routes. Registers the peering and marks the link IGP-passive.
    pub fn customer_session(&mut self, provider: &str, client: &str, region: Region) {
        self.edge_session(provider, client, region, "cust", 3);
    }

    /// Declare an eBGP session toward a settlement-free peer: like a customer session, but calling
    /// the `rm-peer-*` chains and stamping the from-peers tag.
    pub fn peer_session(&mut self, router: &str, peer: &str, region: Region) {
        self.edge_session(router, peer, region, "peer", COMMUNITY_FROM_PEERS);
    }

    fn edge_session(&mut self, router: &str, other: &str, region: Region, kind: &str, tag: u32) {
        let ri = self.router_mut(router);
        ri.register_access_list(AccessList::any("all"));

        let name_in = format!("{kind}-{other}-in");
        let name_out = format!("{kind}-{other}-out");

        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name(&name_in)
                .permit()
                .peer(other)
                .direction(RouteMapDirection::Incoming)
                .match_access_list("all")
                .call(format!("rm-{kind}-in"))
                .continue_next()
                .order(10)
                .build(),
        );
        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name(&name_in)
                .permit()
                .peer(other)
                .direction(RouteMapDirection::Incoming)
                .match_access_list("all")
                .set_community(region.session_community())
                .set_community(tag)
                .order(20)
                .build(),
        );
        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name(&name_out)
                .permit()
                .peer(other)
                .direction(RouteMapDirection::Outgoing)
                .match_access_list("all")
                .call(format!("rm-{kind}-out"))
                .continue_next()
                .order(10)
                .build(),
        );
        ri.route_maps.push(
            RouteMapDeclBuilder::new()
                .name(&name_out)
                .permit()
                .peer(other)
                .direction(RouteMapDirection::Outgoing)
                .match_access_list("all")
                .order(20)
                .build(),
        );

        self.peering(router, other);
        self.mark_igp_passive(router, other);
    }

    /// Declare a symmetric session between two border routers of different regions, applying the
    /// continent-filter chain on import in both directions.
    pub fn inter_region_session(&mut self, a: &str, b: &str) {
        for (this, other) in [(a, b), (b, a)] {
            let ri = self.router_mut(this);
            ri.register_access_list(AccessList::any("all"));
            let name_in = format!("inter_region-{other}-in");
            ri.route_maps.push(
                RouteMapDeclBuilder::new()
                    .name(&name_in)
                    .permit()
                    .peer(other)
                    .direction(RouteMapDirection::Incoming)
                    .match_access_list("all")
                    .call("rm-continent_filters")
                    .continue_next()
                    .order(10)
                    .build(),
            );
            ri.route_maps.push(
                RouteMapDeclBuilder::new()
                    .name(&name_in)
                    .permit()
                    .peer(other)
                    .direction(RouteMapDirection::Incoming)
                    .match_access_list("all")
                    .order(20)
                    .build(),
            );
            ri.route_maps.push(
                RouteMapDeclBuilder::new()
                    .name(format!("inter_region-{other}-out"))
                    .permit()
                    .peer(other)
                    .direction(RouteMapDirection::Outgoing)
                    .match_access_list("all")
                    .order(10)
                    .build(),
            );
        }
        self.peering(a, b);
    }

    /// Register an eBGP peering between two nodes and disable IGP adjacencies between them. If
    /// `link_type` is given, also build the import community/local-pref rules and the
    /// deny/deny/permit export chain for the commercial relationship.
    pub fn ebgp_session(&mut self, a: &str, b: &str, link_type: Option<LinkType>) {
        if let Some(link_type) = link_type {
            let all = Filter::from(AccessList::any("all"));
            let peers_link = Filter::from(CommunityList::new(
                "from-peers",
                COMMUNITY_FROM_PEERS,
                MatchPolicy::Permit,
            ));
            let up_link = Filter::from(CommunityList::new(
                "from-up",
                COMMUNITY_FROM_UP,
                MatchPolicy::Permit,
            ));

            match link_type {
                LinkType::Share => {
                    for (this, other) in [(a, b), (b, a)] {
                        self.session(this)
                            .set_community(
                                COMMUNITY_FROM_PEERS,
                                Some(other),
                                None,
                                std::slice::from_ref(&all),
                            )
                            .set_local_pref(150, other, std::slice::from_ref(&all))
                            .deny(
                                &format!("export-to-peer-{other}"),
                                other,
                                RouteMapDirection::Outgoing,
                                std::slice::from_ref(&up_link),
                                10,
                            )
                            .deny(
                                &format!("export-to-peer-{other}"),
                                other,
                                RouteMapDirection::Outgoing,
                                std::slice::from_ref(&peers_link),
                                15,
                            )
                            .permit(
                                &format!("export-to-peer-{other}"),
                                other,
                                RouteMapDirection::Outgoing,
                                &[],
                                20,
                            );
                    }
                }
                LinkType::ClientProvider => {
                    // a is the customer, b the provider
                    self.session(a)
                        .set_community(COMMUNITY_FROM_UP, Some(b), None, std::slice::from_ref(&all))
                        .set_local_pref(100, b, std::slice::from_ref(&all))
                        .deny(
                            &format!("export-to-up-{b}"),
                            b,
                            RouteMapDirection::Outgoing,
                            std::slice::from_ref(&up_link),
                            10,
                        )
                        .deny(
                            &format!("export-to-up-{b}"),
                            b,
                            RouteMapDirection::Outgoing,
                            std::slice::from_ref(&peers_link),
                            15,
                        )
                        .permit(
                            &format!("export-to-up-{b}"),
                            b,
                            RouteMapDirection::Outgoing,
                            &[],
                            20,
                        );
                    self.session(b)
                        .set_community(
                            COMMUNITY_FROM_UP,
                            Some(a),
                            None,
                            std::slice::from_ref(&all),
                        )
                        .set_local_pref(200, a, std::slice::from_ref(&all));
                }
            }
        }
        self.peering(a, b);
        self.mark_igp_passive(a, b);
    }

    /// Advertise an IPv4 network from the given router.
    pub fn advertise_v4(&mut self, router: &str, net: Ipv4Net) {
        self.router_mut(router).networks_v4.push(net);
    }

    /// Advertise an IPv6 network from the given router.
    pub fn advertise_v6(&mut self, router: &str, net: Ipv6Net) {
        self.router_mut(router).networks_v6.push(net);
    }

    /// Configure the listening port of the router's BGP daemon.
    pub fn set_port(&mut self, router: &str, port: u16) {
        self.router_mut(router).port = Some(port);
    }

    /// Configure the shared session secret of the router.
    pub fn set_password(&mut self, router: &str, password: impl Into<String>) {
        self.router_mut(router).password = Some(password.into());
    }

    /// Configure the per-neighbor maximum prefix limit of the router.
    pub fn set_max_prefixes(&mut self, router: &str, limit: u32) {
        self.router_mut(router).max_prefixes = Some(limit);
    }
}

fn link_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// # Fluent rule builder
///
/// Low-level primitives appending one declaration each to a single router's intent. Every method
/// translates the given filters into match conditions (auto-registering unseen filters) and
/// returns `self`, so multiple clauses can be chained declaratively:
///
/// ```
/// # use bgpconf::prelude::*;
/// # use bgpconf::filters::{AccessList, Filter};
/// # use bgpconf::route_map::RouteMapDirection;
/// let mut intent = PolicyIntent::new();
/// let all = Filter::from(AccessList::any("all"));
/// intent
///     .session("par")
///     .set_local_pref(150, "lon", std::slice::from_ref(&all))
///     .permit("export-to-peer-lon", "lon", RouteMapDirection::Outgoing, &[], 20);
/// ```
#[derive(Debug)]
pub struct SessionPolicy<'a> {
    router: &'a mut RouterIntent,
}

impl<'a> SessionPolicy<'a> {
    /// Set the local preference on routes received from `from`, restricted to routes matching all
    /// the given filters.
    pub fn set_local_pref(&mut self, local_pref: u32, from: &str, matching: &[Filter]) -> &mut Self {
        self.add_set_action(
            from,
            RouteMapSet::LocalPref(local_pref),
            matching,
            Some(RouteMapDirection::Incoming),
        )
    }

    /// Set the MED on routes sent to `to`, restricted to routes matching all the given filters.
    pub fn set_med(&mut self, med: u32, to: &str, matching: &[Filter]) -> &mut Self {
        self.add_set_action(
            to,
            RouteMapSet::Med(med),
            matching,
            Some(RouteMapDirection::Outgoing),
        )
    }

    /// Attach a community to routes received from `from` and/or sent to `to`.
    pub fn set_community(
        &mut self,
        community: impl Into<Community>,
        from: Option<&str>,
        to: Option<&str>,
        matching: &[Filter],
    ) -> &mut Self {
        let community = community.into();
        if let Some(to) = to {
            self.add_set_action(
                to,
                RouteMapSet::Community(community.clone()),
                matching,
                Some(RouteMapDirection::Outgoing),
            );
        }
        if let Some(from) = from {
            self.add_set_action(
                from,
                RouteMapSet::Community(community.clone()),
                matching,
                Some(RouteMapDirection::Incoming),
            );
        }
        self
    }

    /// Deny all routes exchanged with `peer` in the given direction that match all the given
    /// filters.
    pub fn deny(
        &mut self,
        name: &str,
        peer: &str,
        direction: RouteMapDirection,
        matching: &[Filter],
        order: i16,
    ) -> &mut Self {
        self.filter(name, MatchPolicy::Deny, peer, direction, matching, order)
    }

    /// Permit all routes exchanged with `peer` in the given direction that match all the given
    /// filters.
    pub fn permit(
        &mut self,
        name: &str,
        peer: &str,
        direction: RouteMapDirection,
        matching: &[Filter],
        order: i16,
    ) -> &mut Self {
        self.filter(name, MatchPolicy::Permit, peer, direction, matching, order)
    }

    /// Append one permit/deny rule for `peer` in the given direction. Lower orders are applied
    /// first.
    pub fn filter(
        &mut self,
        name: &str,
        policy: MatchPolicy,
        peer: &str,
        direction: RouteMapDirection,
        matching: &[Filter],
        order: i16,
    ) -> &mut Self {
        let conds = self.router.match_conds(matching);
        let mut builder = RouteMapDeclBuilder::new();
        builder
            .name(name)
            .peer(peer)
            .direction(direction)
            .order(order);
        match policy {
            MatchPolicy::Permit => builder.permit(),
            MatchPolicy::Deny => builder.deny(),
        };
        for cond in conds {
            builder.cond(cond);
        }
        self.router.route_maps.push(builder.build());
        self
    }

    /// Append one set-action rule for `peer`. A `None` direction applies the action in both
    /// directions. Rules added this way share one route map per (peer, direction), so chained
    /// actions merge into a single rule at build time.
    pub fn add_set_action(
        &mut self,
        peer: &str,
        action: RouteMapSet,
        matching: &[Filter],
        direction: Option<RouteMapDirection>,
    ) -> &mut Self {
        let conds = self.router.match_conds(matching);
        let mut builder = RouteMapDeclBuilder::new();
        builder
            .name(format!("rm-{peer}"))
            .permit()
            .peer(peer)
            .add_set(action)
            .order(10);
        if let Some(direction) = direction {
            builder.direction(direction);
        }
        for cond in conds {
            builder.cond(cond);
        }
        self.router.route_maps.push(builder.build());
        self
    }
}
