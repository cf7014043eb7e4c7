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

//! Convenience re-export of common members.

pub use crate::compiler::{compile, compile_router};
pub use crate::config::{AddressFamily, Peer, RouterConfig};
pub use crate::filters::{AccessList, Community, CommunityList, Filter};
pub use crate::intent::{LinkType, PolicyIntent, Region, RouterIntent, SessionPolicy};
pub use crate::resolver::{resolve, Resolution};
pub use crate::route_map::{
    MatchPolicy, RouteMap, RouteMapDecl, RouteMapDeclBuilder, RouteMapDirection,
};
pub use crate::topology::{Interface, Topology};
pub use crate::types::{AfKind, AsId, CompileError, RouterId, TopologyError};
