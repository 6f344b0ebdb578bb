use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use super::domain::{base_domain, extract_host};
use super::TARGET_SUPPLIER;

/// Set of domains we are actively hunting for. Each configured entry is
/// stored both as its full host and as its base domain, so a crawl that
/// found `products.roxul.com` still matches a target list that says
/// `roxul.com`.
#[derive(Debug, Default)]
pub struct TargetDomainSet {
    domains: HashSet<String>,
}

impl TargetDomainSet {
    /// Read a target list: one URL or domain per line, blank lines and
    /// `#` comments ignored. A configured path that cannot be read is an
    /// error; a readable file with no usable entries just matches nothing.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read target list {}", path.display()))?;

        let mut set = TargetDomainSet::default();
        for line in data.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if !set.insert_domain(line) {
                debug!(
                    target: TARGET_SUPPLIER,
                    "Ignoring target list line with no usable domain: {:?}", line
                );
            }
        }

        if set.is_empty() {
            warn!(
                target: TARGET_SUPPLIER,
                "Target list {} contains no usable domains", path.display()
            );
        } else {
            info!(
                target: TARGET_SUPPLIER,
                "Loaded {} target domains from {}",
                set.len(),
                path.display()
            );
        }
        Ok(set)
    }

    /// Add one entry, indexing both its host and base-domain forms.
    /// Returns false when no host could be extracted.
    pub fn insert_domain(&mut self, entry: &str) -> bool {
        let host = match extract_host(entry) {
            Some(host) => host,
            None => return false,
        };
        if let Some(base) = base_domain(&host) {
            self.domains.insert(base);
        }
        self.domains.insert(host);
        true
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// True when the website's host, or its base domain, is on the list.
    /// Records without a parseable website never match.
    pub fn matches_website(&self, website: Option<&str>) -> bool {
        if self.domains.is_empty() {
            return false;
        }
        let host = match website.and_then(extract_host) {
            Some(host) => host,
            None => return false,
        };
        if self.domains.contains(&host) {
            return true;
        }
        base_domain(&host).map_or(false, |base| self.domains.contains(&base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_match_ignores_www_and_path() {
        let mut targets = TargetDomainSet::default();
        targets.insert_domain("roxul.com");

        assert!(targets.matches_website(Some("https://www.roxul.com/products/stone-wool")));
        assert!(targets.matches_website(Some("roxul.com")));
        assert!(!targets.matches_website(Some("https://rockwool.com")));
    }

    #[test]
    fn test_subdomain_matches_via_base_domain() {
        let mut targets = TargetDomainSet::default();
        targets.insert_domain("https://roxul.com");

        assert!(targets.matches_website(Some("https://products.roxul.com/catalog")));
    }

    #[test]
    fn test_target_entry_with_subdomain_also_indexes_base() {
        let mut targets = TargetDomainSet::default();
        targets.insert_domain("https://epd.armstrong.com/library");

        // Both the exact host and the stripped base are on the list.
        assert!(targets.matches_website(Some("https://epd.armstrong.com")));
        assert!(targets.matches_website(Some("https://armstrong.com")));
    }

    #[test]
    fn test_missing_or_garbage_website_never_matches() {
        let mut targets = TargetDomainSet::default();
        targets.insert_domain("roxul.com");

        assert!(!targets.matches_website(None));
        assert!(!targets.matches_website(Some("not a url")));
        assert!(!targets.matches_website(Some("")));
    }

    #[test]
    fn test_load_skips_comments_and_blanks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# hunted suppliers").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "https://www.roxul.com").unwrap();
        writeln!(file, "vulcanmaterials.com").unwrap();
        file.flush().unwrap();

        let targets = TargetDomainSet::load(file.path()).unwrap();
        assert_eq!(targets.len(), 2);
        assert!(targets.matches_website(Some("https://roxul.com")));
        assert!(targets.matches_website(Some("https://www.vulcanmaterials.com")));
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        assert!(TargetDomainSet::load(&missing).is_err());
    }
}
