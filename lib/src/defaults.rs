//! Front-matter defaults: fallback metadata values scoped by page kind and
//! directory, consulted when a key is absent from a page's own metadata.

use serde::{Deserialize, Serialize};

use crate::value::{Dict, Value};

/// An ordered table of defaults rules. Later rules take precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Defaults {
    rules: Vec<Rule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub scope: Scope,
    pub values: Dict,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scope {
    /// Directory prefix the rule applies to. `None` matches every page.
    #[serde(default)]
    pub path: Option<String>,
    /// Page kind the rule applies to, e.g. `redirects`. `None` matches every
    /// kind.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl Scope {
    /// Whether the scope applies to a page at `dir` of kind `kind`. Path
    /// scoping matches whole leading segments, so `learn` covers
    /// `/learn/program` but not `/learnings`.
    pub fn matches(&self, dir: &str, kind: &str) -> bool {
        if let Some(scoped) = &self.kind {
            if scoped != kind {
                return false;
            }
        }

        if let Some(prefix) = &self.path {
            let (dir, prefix) = (dir.trim_matches('/'), prefix.trim_matches('/'));
            if !prefix.is_empty() {
                let boundary = dir.len() == prefix.len()
                    || dir.as_bytes().get(prefix.len()) == Some(&b'/');

                if !dir.starts_with(prefix) || !boundary {
                    return false;
                }
            }
        }

        true
    }
}

impl Defaults {
    pub fn new(rules: Vec<Rule>) -> Defaults {
        Defaults { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Looks up `key` for a page at `dir` of kind `kind`. The most recently
    /// declared matching rule that carries the key wins.
    pub fn find(&self, dir: &str, kind: &str, key: &str) -> Option<Value> {
        self.rules.iter().rev()
            .filter(|rule| rule.scope.matches(dir, kind))
            .find_map(|rule| rule.values.get(key).cloned())
    }
}
