//! Custom jurisdiction files under `{data_dir}/jurisdictions/`.

use std::path::PathBuf;

use licnav_core::jurisdiction::validate::normalize_code;
use licnav_types::error::JurisdictionError;
use licnav_types::jurisdiction::{GENERIC_CODE, JurisdictionProfile};

use super::parse_profile;

/// Reads and writes custom profile TOML files.
pub struct ProfileStore {
    base_dir: PathBuf,
}

impl ProfileStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn jurisdictions_dir(&self) -> PathBuf {
        self.base_dir.join("jurisdictions")
    }

    pub fn profile_path(&self, code: &str) -> PathBuf {
        self.jurisdictions_dir()
            .join(format!("{}.toml", code.to_ascii_lowercase()))
    }

    /// Every parseable custom profile, sorted by code. Invalid files are skipped.
    pub fn list_custom(&self) -> Result<Vec<JurisdictionProfile>, JurisdictionError> {
        let dir = self.jurisdictions_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&dir)
            .map_err(|e| JurisdictionError::FileSystem(format!("{}: {e}", dir.display())))?;

        let mut profiles = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| JurisdictionError::FileSystem(e.to_string()))?
                .path();
            if path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }

            let origin = path.display().to_string();
            let loaded = std::fs::read_to_string(&path)
                .map_err(|e| JurisdictionError::FileSystem(format!("{origin}: {e}")))
                .and_then(|content| parse_profile(&origin, &content));
            match loaded {
                Ok(profile) => profiles.push(profile),
                Err(e) => {
                    tracing::warn!(path = %origin, error = %e, "Skipping invalid jurisdiction profile");
                }
            }
        }

        profiles.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(profiles)
    }

    /// Write a starter profile for `code`. Returns the new file's path.
    ///
    /// The template parses and validates as-is; fill in records, mappings
    /// and resources before enabling it.
    pub fn scaffold(&self, code: &str, name: &str) -> Result<PathBuf, JurisdictionError> {
        let code = normalize_code(code)?;
        if code == GENERIC_CODE {
            return Err(JurisdictionError::AlreadyExists(code));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(JurisdictionError::InvalidProfile {
                code,
                reason: "name must not be empty".to_string(),
            });
        }

        let path = self.profile_path(&code);
        if path.exists() {
            return Err(JurisdictionError::AlreadyExists(code));
        }

        let content = template(&code, name);
        // Never write a file that would be skipped on load.
        parse_profile(&path.display().to_string(), &content)?;

        let dir = self.jurisdictions_dir();
        std::fs::create_dir_all(&dir)
            .map_err(|e| JurisdictionError::FileSystem(format!("{}: {e}", dir.display())))?;
        std::fs::write(&path, content)
            .map_err(|e| JurisdictionError::FileSystem(format!("{}: {e}", path.display())))?;

        tracing::info!(code = %code, path = %path.display(), "jurisdiction scaffolded");
        Ok(path)
    }
}

fn template(code: &str, name: &str) -> String {
    let lower = code.to_ascii_lowercase();
    let name = name.replace('"', "");
    format!(
        r#"code = "{code}"
name = "{name}"
nicknames = []
general_requirements = ["{name} business registration", "{name} tax registration"]
next_steps = ["Register your business entity", "Apply for required licenses"]
sources = ["{name} Secretary of State"]
official_links = []

[license_categories]
general_business = ["{name} Business License"]

[[records]]
id = "{lower}-business-registration"
title = "{name} Business Registration"
text = "Required for all businesses operating in {name}."
category = "Business Registration"
license_type = "Business Registration"
requirements = ["Articles of incorporation or organization", "Registered agent"]
source_url = "https://www.sba.gov/business-guide/launch-your-business/register-your-business"

[[steps]]
title = "Register Your Business"
description = "File formation documents with the {name} Secretary of State."

[[resources]]
category = "main"
name = "SBA Licenses and Permits"
url = "https://www.sba.gov/business-guide/launch-your-business/apply-licenses-permits"
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_store(tmpdir: &TempDir) -> ProfileStore {
        ProfileStore::new(tmpdir.path().to_path_buf())
    }

    #[test]
    fn scaffold_writes_loadable_profile() {
        let tmp = TempDir::new().unwrap();
        let store = make_store(&tmp);

        let path = store.scaffold("tx", "Texas").unwrap();
        assert_eq!(path, tmp.path().join("jurisdictions").join("tx.toml"));

        let profiles = store.list_custom().unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].code, "TX");
        assert_eq!(profiles[0].name, "Texas");
        assert_eq!(profiles[0].records[0].id, "tx-business-registration");
    }

    #[test]
    fn scaffold_twice_is_already_exists() {
        let tmp = TempDir::new().unwrap();
        let store = make_store(&tmp);
        store.scaffold("TX", "Texas").unwrap();
        assert!(matches!(
            store.scaffold("tx", "Texas"),
            Err(JurisdictionError::AlreadyExists(code)) if code == "TX"
        ));
    }

    #[test]
    fn scaffold_rejects_bad_code_and_generic() {
        let tmp = TempDir::new().unwrap();
        let store = make_store(&tmp);
        assert!(matches!(
            store.scaffold("Texas", "Texas"),
            Err(JurisdictionError::InvalidCode(_))
        ));
        assert!(matches!(
            store.scaffold("generic", "General"),
            Err(JurisdictionError::AlreadyExists(_))
        ));
    }

    #[test]
    fn list_custom_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(make_store(&tmp).list_custom().unwrap().is_empty());
    }

    #[test]
    fn list_custom_skips_invalid_files() {
        let tmp = TempDir::new().unwrap();
        let store = make_store(&tmp);
        store.scaffold("ny", "New York").unwrap();
        std::fs::write(store.jurisdictions_dir().join("bad.toml"), "not = [valid").unwrap();
        std::fs::write(store.jurisdictions_dir().join("notes.txt"), "ignored").unwrap();

        let profiles = store.list_custom().unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].code, "NY");
    }
}
