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

//! # BgpConf
//!
//! BgpConf compiles abstract BGP policy for emulated networks. You describe the network as a
//! [`topology::Topology`] (routers, broadcast domains, and addressed interfaces), accumulate
//! policy on a [`intent::PolicyIntent`] (peerings, route-map declarations, filters, and session
//! settings, referencing peers by router name), and then call [`compiler::compile`] to obtain one
//! self-contained [`config::RouterConfig`] per router. Compilation resolves every abstract peering
//! to a concrete session address with a cost-ordered search over the interface graph, instantiates
//! and merges route-map declarations per neighbor, and qualifies numbered communities with the
//! router's ASN.
//!
//! The declaration and build phases are strictly separated: the intent is immutable during
//! compilation, so compiling the same inputs twice yields byte-identical output.
//!
//! # Example
//!
//! The following example builds two routers of one AS connected by a single link, seeds the
//! canonical policy chains on both, and compiles the result:
//!
//! ```
//! use bgpconf::prelude::*;
//!
//! fn main() -> Result<(), CompileError> {
//!     let mut topo = Topology::new();
//!     let atl = topo.add_router("atl", Some(AsId(65001)));
//!     let mia = topo.add_router("mia", Some(AsId(65001)));
//!     topo.add_link(
//!         atl,
//!         mia,
//!         Interface::new(10.0).with_v4("10.0.0.1".parse().unwrap()),
//!         Interface::new(10.0).with_v4("10.0.0.2".parse().unwrap()),
//!     )?;
//!
//!     let mut intent = PolicyIntent::new();
//!     intent.region_setup("atl", Region::NorthAmerica, AsId(65001));
//!     intent.region_setup("mia", Region::NorthAmerica, AsId(65001));
//!     intent.peering("atl", "mia");
//!
//!     let configs = compile(&intent, &topo)?;
//!     assert_eq!(configs["atl"].neighbors.len(), 1);
//!     assert_eq!(configs["atl"].neighbors[0].node, "mia");
//!     Ok(())
//! }
//! ```

#![deny(missing_docs, missing_debug_implementations)]

pub mod compiler;
pub mod config;
pub mod filters;
pub mod intent;
pub mod prelude;
pub mod resolver;
pub mod route_map;
pub mod topology;
pub mod types;

#[cfg(test)]
mod test;
