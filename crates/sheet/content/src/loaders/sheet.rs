//! Sheet settings loader (attribute definitions).

use std::path::Path;

use sheet_core::{Fingerprint, SheetSettings};

use crate::loaders::{LoadResult, read_file, write_file};

/// Loader for sheet settings from RON files.
///
/// ```ron
/// (
///     attributes: [
///         (id: "st", kind: integer, name: "ST", base: Constant(10),
///          cost: (per_point: 10)),
///     ],
/// )
/// ```
pub struct SheetLoader;

impl SheetLoader {
    /// Load sheet settings from a RON file.
    ///
    /// Definition IDs are sanitized; duplicates and thresholds on non-pool
    /// attributes fail the load.
    pub fn load(path: &Path) -> LoadResult<SheetSettings> {
        let content = read_file(path)?;
        let sheet = Self::parse(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse sheet settings {}: {}", path.display(), e)
        })?;
        tracing::info!(
            "Loaded {} attribute definitions from {} (fingerprint {:016x})",
            sheet.attributes.len(),
            path.display(),
            sheet.fingerprint()
        );
        Ok(sheet)
    }

    pub fn parse(content: &str) -> LoadResult<SheetSettings> {
        let sheet: SheetSettings = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse sheet RON: {}", e))?;
        Ok(sheet)
    }

    pub fn save(sheet: &SheetSettings, path: &Path) -> LoadResult<()> {
        let content = ron::ser::to_string_pretty(sheet, ron::ser::PrettyConfig::default())
            .map_err(|e| anyhow::anyhow!("Failed to serialize sheet settings: {}", e))?;
        write_file(path, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheet_core::{AttributeKind, Fxp};

    #[test]
    fn parses_definitions_in_order() {
        let sheet = SheetLoader::parse(
            r#"(
                attributes: [
                    (id: "DX", kind: integer, name: "DX", base: Constant(10), cost: (per_point: 20)),
                    (id: "fp", kind: pool, name: "FP", base: Attr("dx"), cost: (per_point: 3),
                     thresholds: [(state: "Tired", boundary: Quotient(SelfValue, Constant(3)), ops: [halve_move])]),
                ],
            )"#,
        )
        .unwrap();
        let list = sheet.attributes.list();
        assert_eq!(list[0].id(), "dx");
        assert_eq!(list[1].kind, AttributeKind::Pool);
        assert_eq!(list[1].cost.per_point, Fxp::from_int(3));
        assert_eq!(list[1].thresholds[0].state, "Tired");
    }

    #[test]
    fn rejects_invalid_definitions() {
        let duplicate = r#"(attributes: [
            (id: "st", kind: integer, name: "ST", base: Constant(10), cost: (per_point: 10)),
            (id: "ST", kind: integer, name: "ST", base: Constant(10), cost: (per_point: 10)),
        ])"#;
        assert!(SheetLoader::parse(duplicate).is_err());

        let thresholds = r#"(attributes: [
            (id: "st", kind: integer, name: "ST", base: Constant(10), cost: (per_point: 10),
             thresholds: [(state: "Weak", boundary: Constant(0))]),
        ])"#;
        assert!(SheetLoader::parse(thresholds).is_err());
    }

    #[test]
    fn save_then_load_keeps_fingerprint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.ron");
        let sheet = SheetLoader::parse(
            r#"(attributes: [
                (id: "ht", kind: integer, name: "HT", base: Constant(10), cost: (per_point: 10)),
                (id: "basic_speed", kind: decimal, name: "Basic Speed",
                 base: Quotient(Sum([Attr("dx"), Attr("ht")]), Constant(4)), cost: (per_point: 20)),
            ])"#,
        )
        .unwrap();
        SheetLoader::save(&sheet, &path).unwrap();
        let loaded = SheetLoader::load(&path).unwrap();
        assert_eq!(loaded, sheet);
        assert_eq!(loaded.fingerprint(), sheet.fingerprint());
    }
}
