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

//! Module containing all type definitions shared across the crate.

use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub(crate) type IndexType = u32;

/// Router Identification (and index into the topology graph). Broadcast domains share the same
/// index space.
pub type RouterId = NodeIndex<IndexType>;

/// Interface identification (an edge of the topology graph, connecting a router to a broadcast
/// domain).
pub type IfaceId = EdgeIndex<IndexType>;

/// Link weight (IGP metric) of a single interface.
pub type LinkWeight = f64;

/// The port on which a BGP daemon listens if no other port was configured.
pub const BGP_DEFAULT_PORT: u16 = 179;

/// AS Number
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AsId(pub u32);

impl std::fmt::Display for AsId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AS{}", self.0)
    }
}

impl From<u32> for AsId {
    fn from(x: u32) -> Self {
        Self(x)
    }
}

impl From<u64> for AsId {
    fn from(x: u64) -> Self {
        Self(x as u32)
    }
}

impl From<usize> for AsId {
    fn from(x: usize) -> Self {
        Self(x as u32)
    }
}

/// Address family of a BGP session or an advertised network.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum AfKind {
    /// IPv4 unicast
    Ipv4,
    /// IPv6 unicast
    Ipv6,
}

impl AfKind {
    /// Return `true` if `self` is `AfKind::Ipv6`.
    pub fn is_ipv6(&self) -> bool {
        matches!(self, Self::Ipv6)
    }
}

impl std::fmt::Display for AfKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AfKind::Ipv4 => write!(f, "ipv4"),
            AfKind::Ipv6 => write!(f, "ipv6"),
        }
    }
}

/// Topology Errors
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum TopologyError {
    /// Device is not present in the topology
    #[error("Device was not found in the topology: {0:?}")]
    DeviceNotFound(RouterId),
    /// Device must be a router, but a broadcast domain was passed
    #[error("Device {0:?} is not a router")]
    NotARouter(RouterId),
    /// Device must be a broadcast domain, but a router was passed
    #[error("Device {0:?} is not a broadcast domain")]
    NotALan(RouterId),
}

/// Compilation Errors
#[derive(Error, Debug)]
pub enum CompileError {
    /// Topology lookup failed
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),
    /// A router referenced by the policy intent does not exist in the topology.
    #[error("Router {0} was not found in the topology")]
    RouterNotFound(String),
    /// The router has no ASN assigned and can therefore not speak BGP.
    #[error("Router {0} has no ASN assigned and cannot run BGP")]
    NotBgpSpeaker(String),
    /// A route-map condition references a filter that was never registered on that router.
    #[error("Route map {map} on {router} references the unknown filter {filter}")]
    UnknownFilter {
        /// Router on which the route map is declared
        router: String,
        /// Name of the offending route map
        map: String,
        /// Name of the missing filter
        filter: String,
    },
    /// Two different filters were registered under the same name on one router.
    #[error("Router {router} declares two different filters named {filter}")]
    DuplicateFilter {
        /// Router on which the clash occurred
        router: String,
        /// The clashing filter name
        filter: String,
    },
    /// Json error
    #[error("{0}")]
    JsonError(Box<serde_json::Error>),
}

impl From<serde_json::Error> for CompileError {
    fn from(value: serde_json::Error) -> Self {
        Self::JsonError(Box::new(value))
    }
}

impl PartialEq for CompileError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Topology(l0), Self::Topology(r0)) => l0 == r0,
            (Self::RouterNotFound(l0), Self::RouterNotFound(r0)) => l0 == r0,
            (Self::NotBgpSpeaker(l0), Self::NotBgpSpeaker(r0)) => l0 == r0,
            (
                Self::UnknownFilter {
                    router: lr,
                    map: lm,
                    filter: lf,
                },
                Self::UnknownFilter {
                    router: rr,
                    map: rm,
                    filter: rf,
                },
            ) => lr == rr && lm == rm && lf == rf,
            (
                Self::DuplicateFilter {
                    router: lr,
                    filter: lf,
                },
                Self::DuplicateFilter {
                    router: rr,
                    filter: rf,
                },
            ) => lr == rr && lf == rf,
            (Self::JsonError(l), Self::JsonError(r)) => l.to_string() == r.to_string(),
            _ => false,
        }
    }
}
