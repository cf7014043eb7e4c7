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

use crate::filters::Community;
use crate::route_map::*;
use crate::types::AfKind;

use pretty_assertions::assert_eq;

fn neighbor() -> NeighborRef {
    NeighborRef {
        node: "lon".to_string(),
        family: AfKind::Ipv4,
        addr: "10.1.0.2".parse().unwrap(),
    }
}

fn base_map() -> RouteMap {
    RouteMap {
        name: "export-to-peer-lon".to_string(),
        policy: MatchPolicy::Permit,
        neighbor: Some(neighbor()),
        direction: RouteMapDirection::Outgoing,
        conds: vec![RouteMapMatch::AccessList("all".to_string())],
        set: vec![RouteMapSet::LocalPref(150)],
        call: None,
        flow: RouteMapFlow::Exit,
        order: 10,
    }
}

#[test]
fn builder() {
    let decl = RouteMapDeclBuilder::new()
        .name("cust-zrh-in")
        .permit()
        .peer("zrh")
        .direction(RouteMapDirection::Incoming)
        .match_access_list("all")
        .call("rm-cust-in")
        .continue_next()
        .order(10)
        .build();
    assert_eq!(
        decl,
        RouteMapDecl {
            name: "cust-zrh-in".to_string(),
            policy: MatchPolicy::Permit,
            peer: PeerRef::Node("zrh".to_string()),
            direction: Some(RouteMapDirection::Incoming),
            conds: vec![RouteMapMatch::AccessList("all".to_string())],
            set: vec![],
            call: Some("rm-cust-in".to_string()),
            flow: RouteMapFlow::Next,
            order: 10,
        }
    );
}

#[test]
fn builder_defaults() {
    let decl = RouteMapDeclBuilder::new()
        .name("rm-set_no_export")
        .permit()
        .set_community("no-export")
        .order(8)
        .build();
    assert_eq!(decl.peer, PeerRef::Local);
    assert_eq!(decl.direction, None);
    assert_eq!(decl.flow, RouteMapFlow::Exit);
    assert_eq!(
        decl.set,
        vec![RouteMapSet::Community(Community::Literal(
            "no-export".to_string()
        ))]
    );
}

#[test]
#[should_panic]
fn builder_requires_policy() {
    RouteMapDeclBuilder::new().name("x").order(10).build();
}

#[test]
fn merge_unions_and_dedups() {
    let mut a = base_map();
    let mut b = base_map();
    b.set = vec![
        RouteMapSet::LocalPref(150),
        RouteMapSet::Community(Community::Numbered(1)),
    ];
    b.conds = vec![
        RouteMapMatch::AccessList("all".to_string()),
        RouteMapMatch::Community("from-peers".to_string()),
    ];
    a.merge_from(b);
    assert_eq!(
        a.conds,
        vec![
            RouteMapMatch::AccessList("all".to_string()),
            RouteMapMatch::Community("from-peers".to_string()),
        ]
    );
    assert_eq!(
        a.set,
        vec![
            RouteMapSet::LocalPref(150),
            RouteMapSet::Community(Community::Numbered(1)),
        ]
    );
}

#[test]
fn merge_keeps_own_policy_and_fills_call() {
    let mut a = base_map();
    let mut b = base_map();
    b.policy = MatchPolicy::Deny;
    b.flow = RouteMapFlow::Next;
    b.call = Some("rm-cust-in".to_string());
    a.merge_from(b);
    assert_eq!(a.policy, MatchPolicy::Permit);
    assert_eq!(a.flow, RouteMapFlow::Exit);
    assert_eq!(a.call, Some("rm-cust-in".to_string()));
}

#[test]
fn key_identity() {
    let a = base_map();
    let mut b = base_map();
    b.set = vec![];
    b.order = 10;
    assert_eq!(a.key(), b.key());

    let mut c = base_map();
    c.direction = RouteMapDirection::Incoming;
    assert_ne!(a.key(), c.key());

    let mut d = base_map();
    d.neighbor = Some(NeighborRef {
        family: AfKind::Ipv6,
        ..neighbor()
    });
    assert_ne!(a.key(), d.key());
}
