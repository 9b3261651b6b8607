//! Package manifest (`package.json`) loading and rewriting.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::GenerateError;
use crate::exports::ExportMaps;

/// A parsed package manifest with its fields in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    path: PathBuf,
    fields: Map<String, Value>,
}

impl Manifest {
    /// Read and parse the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self, GenerateError> {
        let content = fs::read_to_string(path).map_err(|e| GenerateError::ManifestRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(path, &content)
    }

    /// Parse manifest text. The root must be a JSON object.
    pub fn parse(path: &Path, content: &str) -> Result<Self, GenerateError> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| GenerateError::ManifestParse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let Value::Object(fields) = value else {
            return Err(GenerateError::ManifestParse {
                path: path.display().to_string(),
                message: "manifest root must be an object".to_string(),
            });
        };

        Ok(Self {
            path: path.to_path_buf(),
            fields,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace `exports` and `typesVersions` wholesale.
    ///
    /// Existing fields keep their position; missing ones are appended.
    pub fn apply(&mut self, maps: &ExportMaps) {
        self.fields
            .insert("exports".to_string(), maps.exports_value());
        self.fields
            .insert("typesVersions".to_string(), maps.types_versions_value());
    }

    /// Serialize with two-space indentation and a trailing newline.
    pub fn render(&self) -> Result<String, GenerateError> {
        let mut text = serde_json::to_string_pretty(&self.fields)
            .map_err(|e| GenerateError::Serialize(e.to_string()))?;
        text.push('\n');
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryVariant;
    use crate::scan::Component;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    const MANIFEST: &str = r#"{
  "name": "kapwa",
  "version": "0.3.1",
  "exports": {
    "./stale": "./dist/stale.js"
  },
  "dependencies": {
    "clsx": "^2.1.1"
  }
}
"#;

    #[test]
    fn rejects_missing_manifest() {
        let temp = tempdir().unwrap();

        let result = Manifest::load(&temp.path().join("package.json"));

        assert!(matches!(result, Err(GenerateError::ManifestRead { .. })));
    }

    #[test]
    fn rejects_malformed_manifest() {
        let result = Manifest::parse(Path::new("package.json"), "{ \"name\": ");

        assert!(matches!(result, Err(GenerateError::ManifestParse { .. })));
    }

    #[test]
    fn rejects_non_object_manifest() {
        let result = Manifest::parse(Path::new("package.json"), "[1, 2]");

        assert!(matches!(result, Err(GenerateError::ManifestParse { .. })));
    }

    #[test]
    fn remembers_source_path() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("package.json");
        fs::write(&path, MANIFEST).unwrap();

        let manifest = Manifest::load(&path).unwrap();

        assert_eq!(manifest.path(), path.as_path());
    }

    #[test]
    fn untouched_manifest_round_trips() {
        let manifest = Manifest::parse(Path::new("package.json"), MANIFEST).unwrap();

        assert_eq!(manifest.render().unwrap(), MANIFEST);
    }

    #[test]
    fn replaces_exports_in_place_and_appends_types_versions() {
        let mut manifest = Manifest::parse(Path::new("package.json"), MANIFEST).unwrap();
        let maps = ExportMaps::build(
            "dist",
            &[Component {
                name: "label".to_string(),
                variant: EntryVariant::Ts,
                sub_entries: vec![],
            }],
        );

        manifest.apply(&maps);
        let rendered = manifest.render().unwrap();

        let expected = r#"{
  "name": "kapwa",
  "version": "0.3.1",
  "exports": {
    ".": {
      "import": "./dist/index.js",
      "require": "./dist/index.cjs",
      "types": "./dist/index.d.ts"
    },
    "./utils": {
      "import": "./dist/utils.js",
      "require": "./dist/utils.cjs",
      "types": "./dist/utils.d.ts"
    },
    "./label": {
      "import": "./dist/label/index.ts.js",
      "require": "./dist/label/index.ts.cjs",
      "types": "./dist/label/index.d.ts"
    }
  },
  "dependencies": {
    "clsx": "^2.1.1"
  },
  "typesVersions": {
    "*": {
      ".": [
        "./dist/index.d.ts"
      ],
      "utils": [
        "./dist/utils.d.ts"
      ],
      "label": [
        "./dist/label/index.d.ts"
      ]
    }
  }
}
"#;
        assert_eq!(rendered, expected);
    }
}
