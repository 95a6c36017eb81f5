//! Static checks of a snapshot against its catalog.
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use cache_core::{ItemCatalog, LayerMask, Tier};
use runtime::SnapshotEntry;

use crate::document::CacheDocument;

/// Check that every snapshot entry resolves against the catalog
#[derive(Parser, Debug)]
pub struct Validate {
    /// JSON document with `catalog` and `snapshot` sections
    pub document: PathBuf,
}

impl Validate {
    pub fn execute(self) -> Result<()> {
        let document = CacheDocument::load(&self.document)?;
        let problems = find_problems(&document);

        if problems.is_empty() {
            println!("{} snapshot entries OK", document.snapshot.len());
            return Ok(());
        }
        for problem in &problems {
            println!("  {problem}");
        }
        anyhow::bail!("{} snapshot entries would be skipped", problems.len())
    }
}

fn find_problems(document: &CacheDocument) -> Vec<String> {
    let catalog = &document.catalog;
    let snapshot = &document.snapshot;
    let mut problems = Vec::new();

    for entry in &snapshot.restraints {
        match catalog.restraint_set(&entry.item) {
            None => problems.push(unknown(Tier::RestraintSet, entry)),
            Some(set) if entry.layer > 0 => {
                let index = usize::from(entry.layer - 1);
                if LayerMask::from_index(index).is_none() || set.layer(index).is_err() {
                    problems.push(format!(
                        "{}: layer {} out of range ({} layers)",
                        entry.item,
                        entry.layer,
                        set.layers.len()
                    ));
                }
            }
            Some(_) => {}
        }
    }
    for entry in &snapshot.restrictions {
        if catalog.restriction(&entry.item).is_none() {
            problems.push(unknown(Tier::Restriction, entry));
        }
    }
    for entry in &snapshot.gags {
        if catalog.gag(&entry.item).is_none() {
            problems.push(unknown(Tier::Gag, entry));
        }
    }
    problems
}

fn unknown(tier: Tier, entry: &SnapshotEntry) -> String {
    format!("{tier} #{}: unknown item {}", entry.layer, entry.item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_unknown_items_and_layers() {
        let document = CacheDocument::parse(
            r#"{
                "catalog": {
                    "restraint_sets": [
                        { "id": "harness", "label": "Harness", "layers": [ { "label": "Straps" } ] }
                    ]
                },
                "snapshot": {
                    "restraints": [
                        { "layer": 0, "item": "harness", "enabler": "a" },
                        { "layer": 1, "item": "harness", "enabler": "a" },
                        { "layer": 3, "item": "harness", "enabler": "a" }
                    ],
                    "gags": [ { "layer": 0, "item": "ball", "enabler": "a" } ]
                }
            }"#,
        )
        .unwrap();

        let problems = find_problems(&document);
        assert_eq!(problems.len(), 2);
        assert!(problems[0].contains("layer 3"));
        assert!(problems[1].contains("unknown item ball"));
    }
}
