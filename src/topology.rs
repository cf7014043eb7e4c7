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

//! # Topology
//!
//! Read-only view of the emulated network used by the resolver: routers, broadcast domains
//! (LANs), and the interfaces connecting them. The topology is stored on a single undirected
//! graph (see [Petgraph](https://docs.rs/petgraph/latest/petgraph/index.html)): nodes are either
//! routers or broadcast domains, and every edge is one interface of a router, carrying its IGP
//! cost and its addresses. A point-to-point link is a broadcast domain with exactly two members.
//!
//! The topology is assembled before the declaration phase and must not change once compilation
//! starts.

use crate::types::{AsId, IfaceId, IndexType, LinkWeight, RouterId, TopologyError};

use petgraph::stable_graph::StableGraph;
use petgraph::visit::EdgeRef;
use petgraph::Undirected;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::{Ipv4Addr, Ipv6Addr};

/// A single interface: the edge connecting a router to a broadcast domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    /// IGP cost of the interface.
    pub cost: LinkWeight,
    /// IPv4 address, if assigned.
    pub addr4: Option<Ipv4Addr>,
    /// IPv6 address, if assigned.
    pub addr6: Option<Ipv6Addr>,
}

impl Interface {
    /// Create a new interface with the given IGP cost and no addresses.
    pub fn new(cost: LinkWeight) -> Self {
        Self {
            cost,
            addr4: None,
            addr6: None,
        }
    }

    /// Assign an IPv4 address.
    pub fn with_v4(mut self, addr: Ipv4Addr) -> Self {
        self.addr4 = Some(addr);
        self
    }

    /// Assign an IPv6 address.
    pub fn with_v6(mut self, addr: Ipv6Addr) -> Self {
        self.addr6 = Some(addr);
        self
    }
}

/// A node of the topology graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    /// A router, with an optional ASN. Routers without an ASN are pure IGP fabric.
    Router { name: String, asn: Option<AsId> },
    /// A broadcast domain.
    Lan { name: Option<String> },
}

/// # Topology graph accessor
///
/// Owns the graph of routers, broadcast domains, and interfaces. All accessors are read-only
/// except for the `add_*`/`attach` constructors used during topology assembly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Topology {
    graph: StableGraph<Node, Interface, Undirected, IndexType>,
    routers: HashMap<String, RouterId>,
}

impl Topology {
    /// Create an empty topology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a router to the topology. Router names must be unique; `asn` is `None` for routers that
    /// only participate in the IGP.
    pub fn add_router(&mut self, name: impl Into<String>, asn: Option<AsId>) -> RouterId {
        let name = name.into();
        let id = self.graph.add_node(Node::Router {
            name: name.clone(),
            asn,
        });
        self.routers.insert(name, id);
        id
    }

    /// Add a named broadcast domain.
    pub fn add_lan(&mut self, name: impl Into<String>) -> RouterId {
        self.graph.add_node(Node::Lan {
            name: Some(name.into()),
        })
    }

    /// Attach a router to a broadcast domain with the given interface.
    pub fn attach(
        &mut self,
        router: RouterId,
        lan: RouterId,
        iface: Interface,
    ) -> Result<IfaceId, TopologyError> {
        match self.graph.node_weight(router) {
            Some(Node::Router { .. }) => {}
            Some(Node::Lan { .. }) => return Err(TopologyError::NotARouter(router)),
            None => return Err(TopologyError::DeviceNotFound(router)),
        }
        match self.graph.node_weight(lan) {
            Some(Node::Lan { .. }) => {}
            Some(Node::Router { .. }) => return Err(TopologyError::NotALan(lan)),
            None => return Err(TopologyError::DeviceNotFound(lan)),
        }
        Ok(self.graph.add_edge(router, lan, iface))
    }

    /// Connect two routers with a point-to-point link: an anonymous broadcast domain with exactly
    /// the two given interfaces. Returns the id of the created domain.
    pub fn add_link(
        &mut self,
        a: RouterId,
        b: RouterId,
        iface_a: Interface,
        iface_b: Interface,
    ) -> Result<RouterId, TopologyError> {
        let lan = self.graph.add_node(Node::Lan { name: None });
        if let Err(e) = self.attach(a, lan, iface_a) {
            self.graph.remove_node(lan);
            return Err(e);
        }
        if let Err(e) = self.attach(b, lan, iface_b) {
            self.graph.remove_node(lan);
            return Err(e);
        }
        Ok(lan)
    }

    /// Look up a router by name.
    pub fn get_router(&self, name: &str) -> Option<RouterId> {
        self.routers.get(name).copied()
    }

    /// The name of a router.
    pub fn name(&self, router: RouterId) -> Result<&str, TopologyError> {
        match self.graph.node_weight(router) {
            Some(Node::Router { name, .. }) => Ok(name),
            Some(Node::Lan { .. }) => Err(TopologyError::NotARouter(router)),
            None => Err(TopologyError::DeviceNotFound(router)),
        }
    }

    /// The ASN of a router, or `None` for pure IGP fabric.
    pub fn asn(&self, router: RouterId) -> Result<Option<AsId>, TopologyError> {
        match self.graph.node_weight(router) {
            Some(Node::Router { asn, .. }) => Ok(*asn),
            Some(Node::Lan { .. }) => Err(TopologyError::NotARouter(router)),
            None => Err(TopologyError::DeviceNotFound(router)),
        }
    }

    /// Iterate over all routers of the topology.
    pub fn routers(&self) -> impl Iterator<Item = RouterId> + '_ {
        self.graph
            .node_indices()
            .filter(|id| matches!(self.graph.node_weight(*id), Some(Node::Router { .. })))
    }

    /// Iterate over all interfaces of a router: the interface id, the broadcast domain it belongs
    /// to, and the interface data.
    pub fn interfaces(
        &self,
        router: RouterId,
    ) -> impl Iterator<Item = (IfaceId, RouterId, &Interface)> + '_ {
        self.graph.edges(router).map(move |e| {
            let lan = if e.source() == router {
                e.target()
            } else {
                e.source()
            };
            (e.id(), lan, e.weight())
        })
    }

    /// Iterate over all members of a broadcast domain: each router on the domain together with the
    /// interface it uses there.
    pub fn lan_members(
        &self,
        lan: RouterId,
    ) -> impl Iterator<Item = (RouterId, &Interface)> + '_ {
        self.graph.edges(lan).map(move |e| {
            let router = if e.source() == lan {
                e.target()
            } else {
                e.source()
            };
            (router, e.weight())
        })
    }

    /// The broadcast domain an interface belongs to.
    pub fn iface_lan(&self, iface: IfaceId) -> Option<RouterId> {
        let (a, b) = self.graph.edge_endpoints(iface)?;
        match self.graph.node_weight(a) {
            Some(Node::Lan { .. }) => Some(a),
            _ => Some(b),
        }
    }
}
