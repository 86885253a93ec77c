//! Target resolution: configured repos/orgs/users -> owner -> selectors.
//!
//! All three target kinds share one resolution path. Organizations and users
//! get the wildcard selector (enumerate everything they own); repositories
//! given as `owner/name` get a literal selector under their owner.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{ExporterError, Result};

/// Which listing endpoint enumerates an owner's repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKind {
    Org,
    User,
    /// Only literal repositories were configured for this owner.
    Unlisted,
}

/// Either one repository or all repositories of an owner.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Selector {
    Repo(String),
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerTargets {
    pub kind: OwnerKind,
    pub selectors: BTreeSet<Selector>,
}

impl OwnerTargets {
    fn new(kind: OwnerKind) -> Self {
        Self {
            kind,
            selectors: BTreeSet::new(),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.selectors.contains(&Selector::All)
    }

    /// Literal repository names (empty when the wildcard subsumes them).
    pub fn repos(&self) -> impl Iterator<Item = &str> {
        self.selectors.iter().filter_map(|s| match s {
            Selector::Repo(name) => Some(name.as_str()),
            Selector::All => None,
        })
    }

    fn add(&mut self, sel: Selector) {
        if self.is_wildcard() {
            return;
        }
        if sel == Selector::All {
            self.selectors.clear();
        }
        self.selectors.insert(sel);
    }
}

/// Owner name -> what to fetch for it. Built once, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetMap {
    owners: BTreeMap<String, OwnerTargets>,
}

impl TargetMap {
    pub fn get(&self, owner: &str) -> Option<&OwnerTargets> {
        self.owners.get(owner)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OwnerTargets)> {
        self.owners.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Owners that must be enumerated via a listing endpoint.
    pub fn wildcard_owners(&self) -> impl Iterator<Item = (&str, OwnerKind)> {
        self.iter()
            .filter(|(_, t)| t.is_wildcard())
            .map(|(owner, t)| (owner, t.kind))
    }

    /// `(owner, repo)` pairs fetched one by one.
    pub fn literal_repos(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .flat_map(|(owner, t)| t.repos().map(move |repo| (owner, repo)))
    }

    fn entry(&mut self, owner: &str, kind: OwnerKind) -> &mut OwnerTargets {
        let t = self
            .owners
            .entry(owner.to_string())
            .or_insert_with(|| OwnerTargets::new(kind));
        // orgs are resolved first, so an existing Org kind is never downgraded
        if t.kind == OwnerKind::Unlisted {
            t.kind = kind;
        }
        t
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Resolve comma-separated target lists into a [`TargetMap`].
///
/// Fails with [`ExporterError::NoTargetsConfigured`] when all three lists are
/// empty and with [`ExporterError::InvalidTarget`] for a repository entry
/// that is not `owner/name`.
pub fn resolve_targets(repos: &str, orgs: &str, users: &str) -> Result<TargetMap> {
    let mut map = TargetMap::default();

    for org in split_list(orgs) {
        map.entry(org, OwnerKind::Org).add(Selector::All);
    }

    for user in split_list(users) {
        map.entry(user, OwnerKind::User).add(Selector::All);
    }

    for repo in split_list(repos) {
        let (owner, name) = repo
            .split_once('/')
            .map(|(o, n)| (o.trim(), n.trim()))
            .filter(|(o, n)| !o.is_empty() && !n.is_empty() && !n.contains('/'))
            .ok_or_else(|| ExporterError::InvalidTarget(repo.to_string()))?;
        map.entry(owner, OwnerKind::Unlisted)
            .add(Selector::Repo(name.to_string()));
    }

    if map.is_empty() {
        return Err(ExporterError::NoTargetsConfigured);
    }
    Ok(map)
}
