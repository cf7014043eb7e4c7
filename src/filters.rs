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

//! # Filters
//!
//! Named, per-router predicate objects that route-map match conditions refer to: access lists and
//! community lists. Filters are registered on a router (idempotently, keyed by name) during the
//! declaration phase, and route maps reference them by name only. The compiler checks at build
//! time that every referenced filter is registered.

use crate::route_map::MatchPolicy;
use crate::types::AsId;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single entry of an [`AccessList`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessListEntry {
    /// Matches every route.
    Any,
}

impl fmt::Display for AccessListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessListEntry::Any => write!(f, "any"),
        }
    }
}

/// A named access list: an ordered sequence of match entries. The name must be unique within one
/// router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessList {
    /// Name of the access list, referenced by route-map match conditions.
    pub name: String,
    /// Ordered match entries.
    pub entries: Vec<AccessListEntry>,
}

impl AccessList {
    /// Create a new access list with the given entries.
    pub fn new(name: impl Into<String>, entries: impl IntoIterator<Item = AccessListEntry>) -> Self {
        Self {
            name: name.into(),
            entries: entries.into_iter().collect(),
        }
    }

    /// Create an access list with a single permissive `any` entry.
    pub fn any(name: impl Into<String>) -> Self {
        Self::new(name, [AccessListEntry::Any])
    }
}

/// A community value. Numbered communities are namespaced as `<asn>:<number>` when the
/// configuration is assembled; literal values (like `no-export` or `blackhole`) pass through
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Community {
    /// A literal, well-known community tag.
    Literal(String),
    /// A bare number, qualified with the router's ASN at build time.
    Numbered(u32),
}

impl Community {
    /// Qualify the community with the given ASN. Numbered communities become
    /// `Literal("<asn>:<number>")`, literal communities are returned unchanged.
    pub fn qualify(&self, asn: AsId) -> Community {
        match self {
            Community::Literal(s) => Community::Literal(s.clone()),
            Community::Numbered(n) => Community::Literal(format!("{}:{}", asn.0, n)),
        }
    }
}

impl fmt::Display for Community {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Community::Literal(s) => write!(f, "{s}"),
            Community::Numbered(n) => write!(f, "{n}"),
        }
    }
}

impl From<u32> for Community {
    fn from(x: u32) -> Self {
        Self::Numbered(x)
    }
}

impl From<&str> for Community {
    fn from(x: &str) -> Self {
        Self::Literal(x.to_string())
    }
}

impl From<String> for Community {
    fn from(x: String) -> Self {
        Self::Literal(x)
    }
}

/// A named community list, matching routes that carry (or do not carry) a community value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityList {
    /// Name of the community list, referenced by route-map match conditions.
    pub name: String,
    /// The community value to match on.
    pub community: Community,
    /// Whether matching routes are permitted or denied by the list itself.
    pub action: MatchPolicy,
}

impl CommunityList {
    /// Create a new community list.
    pub fn new(
        name: impl Into<String>,
        community: impl Into<Community>,
        action: MatchPolicy,
    ) -> Self {
        Self {
            name: name.into(),
            community: community.into(),
            action,
        }
    }
}

/// A filter passed to the match-condition translator of the fluent policy builder. The translator
/// registers unseen filters on the router and emits the corresponding match condition. The set of
/// filter kinds is closed by construction, so an unknown kind cannot reach the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    /// An access list.
    Access(AccessList),
    /// A community list.
    Community(CommunityList),
}

impl Filter {
    /// The name under which the filter is registered.
    pub fn name(&self) -> &str {
        match self {
            Filter::Access(acl) => &acl.name,
            Filter::Community(cl) => &cl.name,
        }
    }
}

impl From<AccessList> for Filter {
    fn from(x: AccessList) -> Self {
        Self::Access(x)
    }
}

impl From<CommunityList> for Filter {
    fn from(x: CommunityList) -> Self {
        Self::Community(x)
    }
}
