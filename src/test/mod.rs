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

use crate::topology::{Interface, Topology};
use crate::types::AsId;

/// The shared test fixture: `atl` and `mia` in AS 65001, connected through the pure IGP fabric
/// router `sw`, with a direct eBGP link from `atl` to `lon` in AS 65002.
///
/// ```text
///   atl --5-- sw --5-- mia       atl --10-- lon
/// ```
///
/// Addresses: `atl`/`sw` share 10.0.0.0/24, `sw`/`mia` share 10.0.1.0/24 (where `mia` also has a
/// global IPv6 address), and `atl`/`lon` share 10.1.0.0/24 (where `lon` also has a global IPv6
/// address).
fn backbone() -> Topology {
    let mut topo = Topology::new();
    let atl = topo.add_router("atl", Some(AsId(65001)));
    let mia = topo.add_router("mia", Some(AsId(65001)));
    let sw = topo.add_router("sw", None);
    let lon = topo.add_router("lon", Some(AsId(65002)));
    topo.add_link(
        atl,
        sw,
        Interface::new(5.0).with_v4("10.0.0.1".parse().unwrap()),
        Interface::new(5.0).with_v4("10.0.0.2".parse().unwrap()),
    )
    .unwrap();
    topo.add_link(
        sw,
        mia,
        Interface::new(5.0).with_v4("10.0.1.1".parse().unwrap()),
        Interface::new(5.0)
            .with_v4("10.0.1.2".parse().unwrap())
            .with_v6("2001:db8:1::2".parse().unwrap()),
    )
    .unwrap();
    topo.add_link(
        atl,
        lon,
        Interface::new(10.0).with_v4("10.1.0.1".parse().unwrap()),
        Interface::new(10.0)
            .with_v4("10.1.0.2".parse().unwrap())
            .with_v6("2001:db8::2".parse().unwrap()),
    )
    .unwrap();
    topo
}

mod test_intent;
mod test_route_map;
