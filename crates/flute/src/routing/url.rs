// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Extra URL parts appended after reverse mapping.

use crate::error::{FluteError, Result};

/// Ordered chain of path parts, query parameters and fragment.
///
/// ```rust
/// use flute::UrlChain;
///
/// let chain = UrlChain::new()
///     .more_url(["list", "3"])
///     .params(["sort", "name", "page", "2"])
///     .unwrap()
///     .hash("top");
/// assert_eq!(chain.append_to("/member/"), "/member/list/3/?sort=name&page=2#top");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlChain {
    more_url: Vec<String>,
    params: Vec<(String, String)>,
    hash: Option<String>,
}

impl UrlChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends path parts (path-variable values).
    pub fn more_url<I, S>(mut self, parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.more_url.extend(parts.into_iter().map(|p| p.to_string()));
        self
    }

    /// Appends query parameters from an alternating key/value list.
    pub fn params<I, S>(mut self, list: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let items: Vec<String> = list.into_iter().map(|s| s.to_string()).collect();
        if items.len() % 2 != 0 {
            return Err(FluteError::contract(format!(
                "URL parameters must be key/value pairs, got {} element(s): {:?}",
                items.len(),
                items
            )));
        }
        for pair in items.chunks(2) {
            self.params.push((pair[0].clone(), pair[1].clone()));
        }
        Ok(self)
    }

    /// Appends one query parameter.
    pub fn param(mut self, key: impl ToString, value: impl ToString) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    /// Sets the fragment.
    pub fn hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    /// Returns true if nothing would be appended.
    pub fn is_empty(&self) -> bool {
        self.more_url.is_empty() && self.params.is_empty() && self.hash.is_none()
    }

    /// Appends the chain to an action URL that ends with `/`.
    pub fn append_to(&self, base: &str) -> String {
        let mut url = base.to_string();
        for part in &self.more_url {
            if !url.ends_with('/') {
                url.push('/');
            }
            url.push_str(part.trim_matches('/'));
            url.push('/');
        }
        if !self.params.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.params.iter())
                .finish();
            url.push('?');
            url.push_str(&query);
        }
        if let Some(hash) = &self.hash {
            url.push('#');
            url.push_str(hash);
        }
        url
    }
}
