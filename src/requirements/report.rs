//! Human and machine readable views of a store.

use crate::requirements::store::{Origins, RequiredVersion, RequirementStore};
use crate::version::LooseVersion;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Everything known about one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSummary {
    pub version: Option<LooseVersion>,
    pub pinned: bool,
    pub runtime: bool,
    pub origins: Origins,
}

/// Summaries keyed by language, then package.
pub fn summarize(store: &RequirementStore) -> BTreeMap<String, BTreeMap<String, PackageSummary>> {
    let mut summary = BTreeMap::new();
    for language in store.languages() {
        let Some(packages) = store.packages(language) else {
            continue;
        };
        let runtime = store.runtime(language);
        let entries = packages
            .iter()
            .filter_map(|(name, origins)| {
                let required = store.version(language, name)?;
                Some((
                    name.clone(),
                    PackageSummary {
                        version: required.version,
                        pinned: required.pinned,
                        runtime: runtime.contains_key(name),
                        origins: origins.clone(),
                    },
                ))
            })
            .collect();
        summary.insert(language.to_string(), entries);
    }
    summary
}

fn write_line(out: &mut String, name: &str, required: &RequiredVersion, tag: &str) {
    let version = required.to_string();
    writeln!(out, " -{:<20}{:<20}{}", name, version, tag).ok();
}

/// Render the store as text, one block per language.
///
/// Build-only packages come first, then runtime ones. Pinned versions
/// carry a leading `=`, unset versions print as `*`.
pub fn render_report(store: &RequirementStore) -> String {
    let mut out = String::new();
    for language in store.languages() {
        writeln!(out, "{} {}", "=".repeat(15), language).ok();
        for (name, required) in store.build_only(language) {
            write_line(&mut out, &name, &required, "build");
        }
        for (name, required) in store.runtime(language) {
            write_line(&mut out, &name, &required, "runtime");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> RequirementStore {
        let mut store = RequirementStore::new();
        store.require("python", Some("numpy"), Some("1.18"), true, "core").unwrap();
        store.require("python", Some("numpy"), Some("1.16"), false, "viewer").unwrap();
        store.require("python", None, Some("=3.6"), true, "core").unwrap();
        store.require("python", Some("pylint"), None, false, "lint").unwrap();
        store.require("cpp", Some("boost_system"), Some("1.60"), false, "core").unwrap();
        store
    }

    #[test]
    fn text_report_groups_build_before_runtime() {
        let report = render_report(&sample_store());
        insta::assert_snapshot!(report, @r"
        =============== cpp
         -boost_system        1.60                build

        =============== python
         -pylint              *                   build
         -numpy               1.18                runtime
         -python              =3.6                runtime
        ");
    }

    #[test]
    fn empty_store_renders_nothing() {
        assert_eq!(render_report(&RequirementStore::new()), "");
    }

    #[test]
    fn summary_carries_origins() {
        let summary = summarize(&sample_store());
        let numpy = &summary["python"]["numpy"];
        assert_eq!(numpy.version, Some(LooseVersion::parse("1.18")));
        assert!(numpy.runtime);
        assert!(!numpy.pinned);
        assert_eq!(numpy.origins.len(), 2);

        let python = &summary["python"]["python"];
        assert!(python.pinned);
        assert!(!summary["cpp"]["boost_system"].runtime);
    }

    #[test]
    fn summary_serializes_to_json() {
        let json = serde_json::to_value(summarize(&sample_store())).unwrap();
        assert_eq!(json["python"]["numpy"]["version"], "1.18");
        assert_eq!(json["python"]["numpy"]["origins"]["viewer"]["runtime"], false);
        assert_eq!(json["python"]["pylint"]["version"], serde_json::Value::Null);
    }
}
