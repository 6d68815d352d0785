//! Site catalog and classification configuration.
//!
//! `known` lists every site expected in the report, so a site with no
//! movement on a given day still shows up with all-zero figures. The site
//! catalog is advisory: records from unlisted sites are still aggregated.
//! `slaughterhouses` names the sites using the alternate percentage formula.

use crate::entities::SiteCategory;
use serde::Deserialize;
use std::collections::HashSet;

/// The `[sites]` section of config.toml.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SitesConfig {
    /// Every site expected to appear in reports, in display order
    #[serde(default)]
    pub known: Vec<String>,
    /// Sites using the slaughterhouse formula
    #[serde(default)]
    pub slaughterhouses: Vec<String>,
}

/// Immutable site classification lookup built from `SitesConfig`.
///
/// Classification defaults to `Retail` for any site not listed, so records
/// from sites outside the catalog still reconcile with the standard formula.
#[derive(Debug, Clone, Default)]
pub struct SiteClassifier {
    known: Vec<String>,
    slaughterhouses: HashSet<String>,
}

impl SiteClassifier {
    /// Builds a classifier from the `[sites]` configuration section.
    #[must_use]
    pub fn from_config(config: &SitesConfig) -> Self {
        Self {
            known: config.known.clone(),
            slaughterhouses: config.slaughterhouses.iter().cloned().collect(),
        }
    }

    /// Returns the category for a site, defaulting to `Retail` when the
    /// site is not in the slaughterhouse set.
    #[must_use]
    pub fn classify(&self, site: &str) -> SiteCategory {
        if self.slaughterhouses.contains(site) {
            SiteCategory::Slaughterhouse
        } else {
            SiteCategory::Retail
        }
    }

    /// Configured sites in display order, used to surface zero-activity
    /// sites in the report.
    #[must_use]
    pub fn known_sites(&self) -> &[String] {
        &self.known
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> SiteClassifier {
        SiteClassifier::from_config(&SitesConfig {
            known: vec![
                "Main Counter".to_string(),
                "Harbour Stall".to_string(),
                "Abattoir".to_string(),
            ],
            slaughterhouses: vec!["Abattoir".to_string()],
        })
    }

    #[test]
    fn test_classify_listed_slaughterhouse() {
        assert_eq!(
            classifier().classify("Abattoir"),
            SiteCategory::Slaughterhouse
        );
    }

    #[test]
    fn test_classify_retail_site() {
        assert_eq!(classifier().classify("Main Counter"), SiteCategory::Retail);
    }

    #[test]
    fn test_unrecognized_site_defaults_to_retail() {
        assert_eq!(
            classifier().classify("Pop-up Stand"),
            SiteCategory::Retail
        );
    }

    #[test]
    fn test_known_sites_preserve_config_order() {
        let sites = classifier().known_sites().to_vec();
        assert_eq!(sites, vec!["Main Counter", "Harbour Stall", "Abattoir"]);
    }
}
