//! Export map and type-resolution map construction.

use serde_json::{json, Map, Value};

use crate::entry::EntryVariant;
use crate::scan::Component;

/// Resolved build outputs for one subpath export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    pub import: String,
    pub require: String,
    pub types: String,
}

impl ExportTarget {
    /// Target for a fixed bundle named `stem` directly in the output directory.
    fn bundle(out_dir: &str, stem: &str) -> Self {
        Self {
            import: format!("./{}/{}.js", out_dir, stem),
            require: format!("./{}/{}.cjs", out_dir, stem),
            types: format!("./{}/{}.d.ts", out_dir, stem),
        }
    }

    /// Target for an entry directory at `subpath` below the output directory.
    ///
    /// Output names keep the source extension (`index.tsx.js`) because the
    /// library build keys entries by their source file name.
    fn entry(out_dir: &str, subpath: &str, variant: EntryVariant) -> Self {
        let suffix = variant.suffix();
        Self {
            import: format!("./{}/{}/index{}.js", out_dir, subpath, suffix),
            require: format!("./{}/{}/index{}.cjs", out_dir, subpath, suffix),
            types: format!("./{}/{}/index.d.ts", out_dir, subpath),
        }
    }
}

/// The `exports` and `typesVersions` contents, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportMaps {
    exports: Vec<(String, ExportTarget)>,
    types_versions: Vec<(String, Vec<String>)>,
}

impl ExportMaps {
    /// Seed the maps with the package root and the shared utilities entry.
    pub fn seeded(out_dir: &str) -> Self {
        let mut maps = Self::default();
        maps.register(".", ".", ExportTarget::bundle(out_dir, "index"));
        maps.register("./utils", "utils", ExportTarget::bundle(out_dir, "utils"));
        maps
    }

    /// Build the full maps for a list of scanned components.
    pub fn build(out_dir: &str, components: &[Component]) -> Self {
        let mut maps = Self::seeded(out_dir);
        for component in components {
            maps.add_component(out_dir, component);
        }
        maps
    }

    /// Register a component and its sub-entries.
    pub fn add_component(&mut self, out_dir: &str, component: &Component) {
        let name = &component.name;
        if self.contains(&format!("./{}", name)) {
            tracing::warn!("Component {} replaces an existing export entry", name);
        }
        self.register(
            &format!("./{}", name),
            name,
            ExportTarget::entry(out_dir, name, component.variant),
        );

        for sub in &component.sub_entries {
            let subpath = format!("{}/{}", name, sub.name);
            self.register(
                &format!("./{}", subpath),
                &subpath,
                ExportTarget::entry(out_dir, &subpath, sub.variant),
            );
        }
    }

    /// Insert both map entries. An existing key keeps its position.
    fn register(&mut self, export_key: &str, types_key: &str, target: ExportTarget) {
        let types = vec![target.types.clone()];
        upsert(&mut self.exports, export_key, target);
        upsert(&mut self.types_versions, types_key, types);
    }

    pub fn contains(&self, export_key: &str) -> bool {
        self.exports.iter().any(|(k, _)| k == export_key)
    }

    pub fn get(&self, export_key: &str) -> Option<&ExportTarget> {
        self.exports
            .iter()
            .find(|(k, _)| k == export_key)
            .map(|(_, v)| v)
    }

    /// Export keys in insertion order.
    pub fn export_keys(&self) -> impl Iterator<Item = &str> {
        self.exports.iter().map(|(k, _)| k.as_str())
    }

    /// Type-resolution keys in insertion order.
    pub fn types_keys(&self) -> impl Iterator<Item = &str> {
        self.types_versions.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.exports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exports.is_empty()
    }

    /// The manifest `exports` value.
    pub fn exports_value(&self) -> Value {
        let map: Map<String, Value> = self
            .exports
            .iter()
            .map(|(k, target)| {
                let value = json!({
                    "import": target.import,
                    "require": target.require,
                    "types": target.types,
                });
                (k.clone(), value)
            })
            .collect();
        Value::Object(map)
    }

    /// The manifest `typesVersions` value, wrapped in the `*` range.
    pub fn types_versions_value(&self) -> Value {
        let inner: Map<String, Value> = self
            .types_versions
            .iter()
            .map(|(k, paths)| {
                let paths = paths.iter().cloned().map(Value::String).collect();
                (k.clone(), Value::Array(paths))
            })
            .collect();

        let mut outer = Map::new();
        outer.insert("*".to_string(), Value::Object(inner));
        Value::Object(outer)
    }
}

fn upsert<T>(entries: &mut Vec<(String, T)>, key: &str, value: T) {
    match entries.iter_mut().find(|(k, _)| k == key) {
        Some(slot) => slot.1 = value,
        None => entries.push((key.to_string(), value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::SubEntry;
    use pretty_assertions::assert_eq;

    fn component(name: &str, variant: EntryVariant, subs: &[(&str, EntryVariant)]) -> Component {
        Component {
            name: name.to_string(),
            variant,
            sub_entries: subs
                .iter()
                .map(|(n, v)| SubEntry {
                    name: n.to_string(),
                    variant: *v,
                })
                .collect(),
        }
    }

    #[test]
    fn seeds_root_and_utils() {
        assert!(ExportMaps::default().is_empty());

        let maps = ExportMaps::seeded("dist");
        assert!(!maps.is_empty());
        assert_eq!(maps.len(), 2);

        assert_eq!(
            maps.exports_value(),
            json!({
                ".": {
                    "import": "./dist/index.js",
                    "require": "./dist/index.cjs",
                    "types": "./dist/index.d.ts"
                },
                "./utils": {
                    "import": "./dist/utils.js",
                    "require": "./dist/utils.cjs",
                    "types": "./dist/utils.d.ts"
                }
            })
        );
        assert_eq!(
            maps.types_versions_value(),
            json!({ "*": { ".": ["./dist/index.d.ts"], "utils": ["./dist/utils.d.ts"] } })
        );
    }

    #[test]
    fn component_paths_embed_source_extension() {
        let maps = ExportMaps::build(
            "dist",
            &[component(
                "banner",
                EntryVariant::Tsx,
                &[("hooks", EntryVariant::Ts)],
            )],
        );

        assert_eq!(
            maps.get("./banner"),
            Some(&ExportTarget {
                import: "./dist/banner/index.tsx.js".to_string(),
                require: "./dist/banner/index.tsx.cjs".to_string(),
                types: "./dist/banner/index.d.ts".to_string(),
            })
        );
        assert_eq!(
            maps.get("./banner/hooks"),
            Some(&ExportTarget {
                import: "./dist/banner/hooks/index.ts.js".to_string(),
                require: "./dist/banner/hooks/index.ts.cjs".to_string(),
                types: "./dist/banner/hooks/index.d.ts".to_string(),
            })
        );
    }

    #[test]
    fn keys_follow_discovery_order() {
        let maps = ExportMaps::build(
            "dist",
            &[
                component(
                    "alpha",
                    EntryVariant::Tsx,
                    &[("hooks", EntryVariant::Ts), ("utils", EntryVariant::Ts)],
                ),
                component("beta", EntryVariant::Ts, &[]),
            ],
        );

        let keys: Vec<&str> = maps.export_keys().collect();
        assert_eq!(
            keys,
            vec![".", "./utils", "./alpha", "./alpha/hooks", "./alpha/utils", "./beta"]
        );

        let types: Vec<&str> = maps.types_keys().collect();
        assert_eq!(
            types,
            vec![".", "utils", "alpha", "alpha/hooks", "alpha/utils", "beta"]
        );
    }

    #[test]
    fn every_export_key_has_a_types_key() {
        let maps = ExportMaps::build(
            "dist",
            &[component("card", EntryVariant::Tsx, &[("types", EntryVariant::Ts)])],
        );

        for (export_key, types_key) in maps.export_keys().zip(maps.types_keys()) {
            let expected = export_key.strip_prefix("./").unwrap_or(export_key);
            assert_eq!(types_key, expected);
        }
    }

    #[test]
    fn colliding_component_replaces_in_place() {
        let maps = ExportMaps::build("dist", &[component("utils", EntryVariant::Ts, &[])]);

        let keys: Vec<&str> = maps.export_keys().collect();
        assert_eq!(keys, vec![".", "./utils"]);
        assert_eq!(
            maps.get("./utils").map(|t| t.import.as_str()),
            Some("./dist/utils/index.ts.js")
        );
    }
}
