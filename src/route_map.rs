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

//! # Route-Maps
//!
//! This module contains the structures describing route-map rules, both in their raw, declared
//! form ([`RouteMapDecl`], referencing peers by name) and in their resolved form ([`RouteMap`],
//! attached to a concrete neighbor). Use the [`RouteMapDeclBuilder`] type to conveniently build a
//! declaration:
//!
//! ```
//! # use bgpconf::route_map::*;
//! let decl = RouteMapDeclBuilder::new()
//!     .name("cust-zrh-in")
//!     .permit()
//!     .peer("zrh")
//!     .direction(RouteMapDirection::Incoming)
//!     .match_access_list("all")
//!     .call("rm-cust-in")
//!     .continue_next()
//!     .order(10)
//!     .build();
//! ```

use crate::filters::Community;
use crate::types::{AfKind, AsId};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// Match policy of a route-map rule (or the action of a community list), which can either be
/// permit or deny.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchPolicy {
    /// Matching routes are accepted.
    Permit,
    /// Matching routes are rejected.
    Deny,
}

impl MatchPolicy {
    /// Returns `true` if the policy is set to `Permit`.
    pub fn is_permit(&self) -> bool {
        self == &Self::Permit
    }

    /// Returns `true` if the policy is set to `Deny`.
    pub fn is_deny(&self) -> bool {
        self == &Self::Deny
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPolicy::Permit => write!(f, "permit"),
            MatchPolicy::Deny => write!(f, "deny"),
        }
    }
}

/// Direction of the Route Map
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum RouteMapDirection {
    /// Incoming Route Map
    Incoming,
    /// Outgoing Route Map
    Outgoing,
}

impl fmt::Display for RouteMapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteMapDirection::Incoming => write!(f, "in"),
            RouteMapDirection::Outgoing => write!(f, "out"),
        }
    }
}

impl RouteMapDirection {
    /// Return `true` if `self` is `RouteMapDirection::Incoming`.
    pub fn incoming(&self) -> bool {
        matches!(self, Self::Incoming)
    }

    /// Return `true` if `self` is `RouteMapDirection::Outgoing`.
    pub fn outgoing(&self) -> bool {
        matches!(self, Self::Outgoing)
    }
}

/// What happens after a rule of the chain has matched and its set actions were applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteMapFlow {
    /// Stop evaluating the chain. This is the default.
    Exit,
    /// Continue with the next rule of the chain.
    Next,
}

impl Default for RouteMapFlow {
    fn default() -> Self {
        Self::Exit
    }
}

impl fmt::Display for RouteMapFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteMapFlow::Exit => write!(f, "break"),
            RouteMapFlow::Next => write!(f, "next"),
        }
    }
}

/// Match condition of a route-map rule. Conditions reference a filter registered on the same
/// router by name; the compiler verifies the reference at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteMapMatch {
    /// Matches routes permitted by the named access list.
    AccessList(String),
    /// Matches routes carrying the community of the named community list.
    Community(String),
}

impl fmt::Display for RouteMapMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteMapMatch::AccessList(name) => write!(f, "access-list {name}"),
            RouteMapMatch::Community(name) => write!(f, "community {name}"),
        }
    }
}

/// Set action of a route-map rule, applied when the rule matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteMapSet {
    /// Overwrite the local preference.
    LocalPref(u32),
    /// Overwrite the MED (metric).
    Med(u32),
    /// Attach a community to the route.
    Community(Community),
    /// Prepend the given AS to the AS path.
    AsPathPrepend(AsId),
}

impl fmt::Display for RouteMapSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteMapSet::LocalPref(lp) => write!(f, "local-preference {lp}"),
            RouteMapSet::Med(med) => write!(f, "metric {med}"),
            RouteMapSet::Community(c) => write!(f, "community {c}"),
            RouteMapSet::AsPathPrepend(asn) => write!(f, "as-path prepend {}", asn.0),
        }
    }
}

/// Peer reference of a raw declaration. `Node` declarations are instantiated once per concrete
/// resolved peer (one per address family); `Local` declarations describe canonical chains that are
/// copied through once per router, independent of any neighbor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeerRef {
    /// A canonical, neighbor-independent chain.
    Local,
    /// An abstract peer, referenced by router name and resolved at build time.
    Node(String),
}

/// # Raw route-map declaration
///
/// A single rule template, accumulated on a router during the declaration phase. The peer
/// reference is abstract (a router name); the compiler substitutes every concrete resolved peer at
/// build time. A missing direction means the rule applies in both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMapDecl {
    /// Name of the route map this rule belongs to.
    pub name: String,
    /// Either permit or deny.
    pub policy: MatchPolicy,
    /// Which neighbor(s) the rule applies to.
    pub peer: PeerRef,
    /// Direction of the rule. `None` means both directions for `Node` declarations.
    pub direction: Option<RouteMapDirection>,
    /// Match conditions, connected in an and.
    pub conds: Vec<RouteMapMatch>,
    /// Set actions applied on a match.
    pub set: Vec<RouteMapSet>,
    /// Name of another route map to invoke on a match.
    pub call: Option<String>,
    /// Whether to stop or continue evaluation after a match.
    pub flow: RouteMapFlow,
    /// Sequence key. Lower values are evaluated earlier; ties keep declaration order.
    pub order: i16,
}

/// # Route-Map Declaration Builder
///
/// Convenience type to build a [`RouteMapDecl`]. You are required to at least call [`Self::name`],
/// [`Self::order`], and one of [`Self::permit`] or [`Self::deny`] before calling [`Self::build`].
#[derive(Debug, Default)]
pub struct RouteMapDeclBuilder {
    name: Option<String>,
    policy: Option<MatchPolicy>,
    peer: Option<PeerRef>,
    direction: Option<RouteMapDirection>,
    conds: Vec<RouteMapMatch>,
    set: Vec<RouteMapSet>,
    call: Option<String>,
    flow: RouteMapFlow,
    order: Option<i16>,
}

impl RouteMapDeclBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name of the route map.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Set the match policy to permit.
    pub fn permit(&mut self) -> &mut Self {
        self.policy = Some(MatchPolicy::Permit);
        self
    }

    /// Set the match policy to deny.
    pub fn deny(&mut self) -> &mut Self {
        self.policy = Some(MatchPolicy::Deny);
        self
    }

    /// Scope the rule to the named peer. Without this call, the declaration describes a canonical
    /// (neighbor-independent) chain.
    pub fn peer(&mut self, peer: impl Into<String>) -> &mut Self {
        self.peer = Some(PeerRef::Node(peer.into()));
        self
    }

    /// Set the direction of the rule. Without this call, `Node` declarations apply in both
    /// directions.
    pub fn direction(&mut self, direction: RouteMapDirection) -> &mut Self {
        self.direction = Some(direction);
        self
    }

    /// Add a match condition.
    pub fn cond(&mut self, cond: RouteMapMatch) -> &mut Self {
        self.conds.push(cond);
        self
    }

    /// Add a match condition on the named access list.
    pub fn match_access_list(&mut self, name: impl Into<String>) -> &mut Self {
        self.conds.push(RouteMapMatch::AccessList(name.into()));
        self
    }

    /// Add a match condition on the named community list.
    pub fn match_community(&mut self, name: impl Into<String>) -> &mut Self {
        self.conds.push(RouteMapMatch::Community(name.into()));
        self
    }

    /// Add a set action.
    pub fn add_set(&mut self, set: RouteMapSet) -> &mut Self {
        self.set.push(set);
        self
    }

    /// Add a set action, overwriting the local preference.
    pub fn set_local_pref(&mut self, local_pref: u32) -> &mut Self {
        self.set.push(RouteMapSet::LocalPref(local_pref));
        self
    }

    /// Add a set action, overwriting the MED.
    pub fn set_med(&mut self, med: u32) -> &mut Self {
        self.set.push(RouteMapSet::Med(med));
        self
    }

    /// Add a set action, attaching a community.
    pub fn set_community(&mut self, community: impl Into<Community>) -> &mut Self {
        self.set.push(RouteMapSet::Community(community.into()));
        self
    }

    /// Add a set action, prepending the given AS to the AS path.
    pub fn prepend_as(&mut self, asn: AsId) -> &mut Self {
        self.set.push(RouteMapSet::AsPathPrepend(asn));
        self
    }

    /// On a match, invoke the named route map before applying the flow policy.
    pub fn call(&mut self, name: impl Into<String>) -> &mut Self {
        self.call = Some(name.into());
        self
    }

    /// On a match, continue evaluating the chain instead of terminating.
    pub fn continue_next(&mut self) -> &mut Self {
        self.flow = RouteMapFlow::Next;
        self
    }

    /// On a match, terminate chain evaluation. This is the default behavior.
    pub fn exit(&mut self) -> &mut Self {
        self.flow = RouteMapFlow::Exit;
        self
    }

    /// Set the sequence key of the rule.
    pub fn order(&mut self, order: i16) -> &mut Self {
        self.order = Some(order);
        self
    }

    /// Build the declaration.
    ///
    /// # Panics
    /// The function panics if the name, the order, or the match policy was not set.
    pub fn build(&self) -> RouteMapDecl {
        let name = match &self.name {
            Some(n) => n.clone(),
            None => panic!("Name was not set for a route-map declaration!"),
        };
        let order = match self.order {
            Some(o) => o,
            None => panic!("Order was not set for a route-map declaration!"),
        };
        let policy = match self.policy {
            Some(p) => p,
            None => panic!("Match policy was not set for a route-map declaration!"),
        };
        RouteMapDecl {
            name,
            policy,
            peer: self.peer.clone().unwrap_or(PeerRef::Local),
            direction: self.direction,
            conds: self.conds.clone(),
            set: self.set.clone(),
            call: self.call.clone(),
            flow: self.flow,
            order,
        }
    }
}

/// The concrete neighbor a resolved route map is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborRef {
    /// Name of the neighboring router.
    pub node: String,
    /// Address family of the session.
    pub family: AfKind,
    /// The address the session dials.
    pub addr: IpAddr,
}

/// # Resolved route map
///
/// A single mergeable rule of the final configuration, attached to a concrete neighbor (or to no
/// neighbor for canonical chains). Two resolved rules sharing the same identity `(name, neighbor,
/// direction, order)` are merged by [`RouteMap::merge_from`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMap {
    /// Name of the route map this rule belongs to.
    pub name: String,
    /// Either permit or deny.
    pub policy: MatchPolicy,
    /// The concrete neighbor, or `None` for a canonical chain.
    pub neighbor: Option<NeighborRef>,
    /// Direction in which the rule applies.
    pub direction: RouteMapDirection,
    /// Match conditions, connected in an and.
    pub conds: Vec<RouteMapMatch>,
    /// Set actions applied on a match.
    pub set: Vec<RouteMapSet>,
    /// Name of another route map to invoke on a match.
    pub call: Option<String>,
    /// Whether to stop or continue evaluation after a match.
    pub flow: RouteMapFlow,
    /// Sequence key within the chain.
    pub order: i16,
}

/// Merge identity of a resolved route map. `RouteMap` itself carries values that must not take
/// part in the identity, so a separate key type implements `Hash` and `Eq` over the identifying
/// fields only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteMapKey {
    /// Name of the route map.
    pub name: String,
    /// Neighbor identity (node name and address family), or `None` for canonical chains.
    pub neighbor: Option<(String, AfKind)>,
    /// Direction of the rule.
    pub direction: RouteMapDirection,
    /// Sequence key within the chain. Rules at different positions never merge.
    pub order: i16,
}

impl RouteMap {
    /// Return the merge identity of this route map.
    pub fn key(&self) -> RouteMapKey {
        RouteMapKey {
            name: self.name.clone(),
            neighbor: self
                .neighbor
                .as_ref()
                .map(|n| (n.node.clone(), n.family)),
            direction: self.direction,
            order: self.order,
        }
    }

    /// Merge another resolved rule with the same identity into `self`. Match conditions and set
    /// actions are unioned, preserving the first-seen order and dropping duplicates. The policy
    /// and flow of `self` take precedence; a missing call target is filled in from `other`.
    pub fn merge_from(&mut self, other: RouteMap) {
        debug_assert_eq!(self.key(), other.key());
        for cond in other.conds {
            if !self.conds.contains(&cond) {
                self.conds.push(cond);
            }
        }
        for action in other.set {
            if !self.set.contains(&action) {
                self.set.push(action);
            }
        }
        if self.call.is_none() {
            self.call = other.call;
        }
    }

    /// Sort key establishing the deterministic apply sequence: chains are grouped by neighbor,
    /// direction and name, and rules within one chain are ordered by ascending `order`.
    pub(crate) fn chain_key(&self) -> (Option<(&str, AfKind)>, RouteMapDirection, &str, i16) {
        (
            self.neighbor.as_ref().map(|n| (n.node.as_str(), n.family)),
            self.direction,
            self.name.as_str(),
            self.order,
        )
    }
}
