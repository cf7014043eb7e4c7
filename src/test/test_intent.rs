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

use crate::filters::{AccessList, Community};
use crate::intent::*;
use crate::route_map::{
    MatchPolicy, PeerRef, RouteMapDecl, RouteMapDirection, RouteMapMatch, RouteMapSet,
};
use crate::types::AsId;

use pretty_assertions::assert_eq;

fn decls<'a>(ri: &'a RouterIntent, name: &str) -> Vec<&'a RouteMapDecl> {
    ri.route_maps.iter().filter(|d| d.name == name).collect()
}

#[test]
fn peering_is_symmetric_and_idempotent() {
    let mut intent = PolicyIntent::new();
    intent.peering("atl", "mia");
    intent.peering("mia", "atl");
    assert_eq!(intent.get("atl").unwrap().peers, vec!["mia".to_string()]);
    assert_eq!(intent.get("mia").unwrap().peers, vec!["atl".to_string()]);
}

#[test]
fn full_mesh() {
    let mut intent = PolicyIntent::new();
    intent.full_mesh(["atl", "mia", "chi"]);
    for r in ["atl", "mia", "chi"] {
        assert_eq!(intent.get(r).unwrap().peers.len(), 2);
    }
}

#[test]
fn full_mesh_from_iterator() {
    let names: Vec<String> = (0..4).map(|i| format!("r{i}")).collect();
    let mut intent = PolicyIntent::new();
    intent.full_mesh(names.iter().map(String::as_str).filter(|n| *n != "r3"));
    for r in ["r0", "r1", "r2"] {
        assert_eq!(intent.get(r).unwrap().peers.len(), 2);
    }
    assert!(intent.get("r3").is_none());
}

#[test]
fn registry_is_idempotent() {
    let mut intent = PolicyIntent::new();
    let ri = intent.router_mut("atl");
    ri.register_access_list(AccessList::any("all"));
    ri.register_access_list(AccessList::any("all"));
    assert_eq!(ri.access_lists.len(), 1);
}

#[test]
fn continent_filters_for_north_america() {
    let mut intent = PolicyIntent::new();
    intent.region_setup("atl", Region::NorthAmerica, AsId(65001));
    let chain = decls(intent.get("atl").unwrap(), "rm-continent_filters");

    // deny the tags of the other two regions, then permit everything else
    assert_eq!(chain.len(), 3);
    assert_eq!(chain[0].policy, MatchPolicy::Deny);
    assert_eq!(
        chain[0].conds,
        vec![RouteMapMatch::Community("EU-Only".to_string())]
    );
    assert_eq!(chain[0].order, 8);
    assert_eq!(chain[1].policy, MatchPolicy::Deny);
    assert_eq!(
        chain[1].conds,
        vec![RouteMapMatch::Community("APAC-Only".to_string())]
    );
    assert_eq!(chain[1].order, 12);
    assert_eq!(chain[2].policy, MatchPolicy::Permit);
    assert!(chain[2].conds.is_empty());
    assert_eq!(chain[2].order, 15);
    assert!(!chain
        .iter()
        .any(|d| d.conds.contains(&RouteMapMatch::Community("NA-Only".to_string()))));
}

#[test]
fn region_setup_vocabulary() {
    let mut intent = PolicyIntent::new();
    intent.region_setup("par", Region::Europe, AsId(65002));
    let ri = intent.get("par").unwrap();
    for name in [
        "from-peers",
        "from-up",
        "set_no_exportG",
        "AS_prepend",
        "EU-Only",
        "APAC-Only",
        "NA-Only",
        "blackhole",
        "localPrefH",
        "localPrefL",
    ] {
        assert!(
            ri.community_lists.iter().any(|c| c.name == name),
            "missing community list {name}"
        );
    }
    // the blackhole tag is a literal value, the rest are ASN-relative numbers
    let blackhole = ri
        .community_lists
        .iter()
        .find(|c| c.name == "blackhole")
        .unwrap();
    assert_eq!(
        blackhole.community,
        Community::Literal("blackhole".to_string())
    );
    let prepend = decls(ri, "rm-AS_prepend");
    assert_eq!(prepend[0].set, vec![RouteMapSet::AsPathPrepend(AsId(65002))]);
}

#[test]
fn customer_import_preferences() {
    let mut intent = PolicyIntent::new();
    intent.region_setup("atl", Region::NorthAmerica, AsId(65001));
    let chain = decls(intent.get("atl").unwrap(), "rm-cust-in");
    assert_eq!(chain.len(), 4);
    assert_eq!(chain[0].call, Some("rm-blackhole".to_string()));
    assert_eq!(chain[1].set, vec![RouteMapSet::LocalPref(175)]);
    assert_eq!(chain[2].set, vec![RouteMapSet::LocalPref(225)]);
    // the unconditional default
    assert_eq!(chain[3].set, vec![RouteMapSet::LocalPref(200)]);
    assert!(chain[3].conds.is_empty());
}

#[test]
fn customer_session() {
    let mut intent = PolicyIntent::new();
    intent.customer_session("atl", "cust1", Region::NorthAmerica);
    let ri = intent.get("atl").unwrap();

    let chain_in = decls(ri, "cust-cust1-in");
    assert_eq!(chain_in.len(), 2);
    assert_eq!(chain_in[0].call, Some("rm-cust-in".to_string()));
    assert_eq!(chain_in[0].peer, PeerRef::Node("cust1".to_string()));
    assert_eq!(chain_in[0].direction, Some(RouteMapDirection::Incoming));
    // the NA session tag plus the customer relationship tag
    assert_eq!(
        chain_in[1].set,
        vec![
            RouteMapSet::Community(Community::Numbered(10)),
            RouteMapSet::Community(Community::Numbered(3)),
        ]
    );

    let chain_out = decls(ri, "cust-cust1-out");
    assert_eq!(chain_out.len(), 2);
    assert_eq!(chain_out[0].call, Some("rm-cust-out".to_string()));
    assert_eq!(chain_out[0].direction, Some(RouteMapDirection::Outgoing));

    assert_eq!(ri.peers, vec!["cust1".to_string()]);
    assert!(intent.is_igp_passive("atl", "cust1"));
    assert!(intent.is_igp_passive("cust1", "atl"));
}

#[test]
fn peer_session_tags_from_peers() {
    let mut intent = PolicyIntent::new();
    intent.peer_session("par", "peer1", Region::Europe);
    let ri = intent.get("par").unwrap();
    let chain_in = decls(ri, "peer-peer1-in");
    assert_eq!(chain_in[0].call, Some("rm-peer-in".to_string()));
    assert_eq!(
        chain_in[1].set,
        vec![
            RouteMapSet::Community(Community::Numbered(30)),
            RouteMapSet::Community(Community::Numbered(COMMUNITY_FROM_PEERS)),
        ]
    );
}

#[test]
fn anycast_single_suppression_rule() {
    let mut intent = PolicyIntent::new();
    intent.anycast("rr", "anycast1");
    let ri = intent.get("rr").unwrap();
    let chain = decls(ri, "rm-anycast_out");
    assert_eq!(chain.len(), 1);
    assert_eq!(chain[0].policy, MatchPolicy::Deny);
    assert_eq!(chain[0].peer, PeerRef::Node("anycast1".to_string()));
    assert_eq!(chain[0].direction, Some(RouteMapDirection::Outgoing));
    assert_eq!(chain[0].order, 10);
    // the referenced access list is registered alongside
    assert!(ri.access_lists.iter().any(|a| a.name == "all"));
    // only the reflector's declarations change
    assert!(intent.get("anycast1").is_none());
}

#[test]
fn route_reflector() {
    let mut intent = PolicyIntent::new();
    intent.route_reflector("rr", ["atl", "mia"]);
    assert!(intent.get("rr").unwrap().route_reflector);
    assert_eq!(intent.get("rr").unwrap().peers.len(), 2);
    assert_eq!(intent.get("atl").unwrap().peers, vec!["rr".to_string()]);
    assert!(!intent.get("atl").unwrap().route_reflector);
}

#[test]
fn inter_region_session() {
    let mut intent = PolicyIntent::new();
    intent.inter_region_session("atl", "par");
    for (this, other) in [("atl", "par"), ("par", "atl")] {
        let ri = intent.get(this).unwrap();
        let chain = decls(ri, &format!("inter_region-{other}-in"));
        assert_eq!(chain[0].call, Some("rm-continent_filters".to_string()));
        assert_eq!(ri.peers, vec![other.to_string()]);
    }
    assert!(!intent.is_igp_passive("atl", "par"));
}

#[test]
fn ebgp_session_share() {
    let mut intent = PolicyIntent::new();
    intent.ebgp_session("atl", "lon", Some(LinkType::Share));
    for (this, other) in [("atl", "lon"), ("lon", "atl")] {
        let ri = intent.get(this).unwrap();
        let chain = decls(ri, &format!("export-to-peer-{other}"));
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0].policy, MatchPolicy::Deny);
        assert_eq!(
            chain[0].conds,
            vec![RouteMapMatch::Community("from-up".to_string())]
        );
        assert_eq!(chain[0].order, 10);
        assert_eq!(chain[1].policy, MatchPolicy::Deny);
        assert_eq!(
            chain[1].conds,
            vec![RouteMapMatch::Community("from-peers".to_string())]
        );
        assert_eq!(chain[1].order, 15);
        assert_eq!(chain[2].policy, MatchPolicy::Permit);
        assert_eq!(chain[2].order, 20);
        // the referenced community lists were auto-registered
        assert!(ri.community_lists.iter().any(|c| c.name == "from-up"));
        assert!(ri.community_lists.iter().any(|c| c.name == "from-peers"));
    }
    assert!(intent.is_igp_passive("atl", "lon"));
}

#[test]
fn ebgp_session_client_provider() {
    let mut intent = PolicyIntent::new();
    intent.ebgp_session("cust", "prov", Some(LinkType::ClientProvider));
    // the customer prefers the provider moderately and marks its routes as upstream-learned
    let cust = intent.get("cust").unwrap();
    let set_maps = decls(cust, "rm-prov");
    assert!(set_maps
        .iter()
        .any(|d| d.set.contains(&RouteMapSet::LocalPref(100))));
    assert!(!decls(cust, "export-to-up-prov").is_empty());
    // the tag stamped on provider-learned routes is the one the export deny matches
    let from_up = cust
        .community_lists
        .iter()
        .find(|c| c.name == "from-up")
        .unwrap();
    assert_eq!(from_up.community, Community::Numbered(COMMUNITY_FROM_UP));
    assert!(set_maps
        .iter()
        .any(|d| d.set
            .contains(&RouteMapSet::Community(from_up.community.clone()))));
    // the provider strongly prefers customer routes
    let prov = intent.get("prov").unwrap();
    let set_maps = decls(prov, "rm-cust");
    assert!(set_maps
        .iter()
        .any(|d| d.set.contains(&RouteMapSet::LocalPref(200))));
    assert!(decls(prov, "export-to-up-cust").is_empty());
}

#[test]
fn ebgp_session_without_link_type() {
    let mut intent = PolicyIntent::new();
    intent.ebgp_session("atl", "lon", None);
    assert!(intent.get("atl").unwrap().route_maps.is_empty());
    assert_eq!(intent.get("atl").unwrap().peers, vec!["lon".to_string()]);
    assert!(intent.is_igp_passive("atl", "lon"));
}
