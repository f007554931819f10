use crate::agents::{CatalogStore, UpdateReport, apply_release};
use crate::cli::Variant;
use crate::config::ReleaseInput;
use crate::error::Result;
use crate::utils::is_verbose;
use colored::Colorize;
use std::path::Path;

/// Execute the update workflow: read the release from the environment and
/// merge it into the sources file.
pub fn execute_update<P: AsRef<Path>>(
    catalog_path: P,
    variant: Variant,
    dry_run: bool,
) -> Result<()> {
    let catalog_path = catalog_path.as_ref();
    println!("{}", "Updating sources file...".cyan().bold());
    println!("Input File: {}", catalog_path.display());

    // Step 1: Collect release parameters
    println!("\n{}", "1. Reading release parameters...".yellow());
    if is_verbose() {
        println!("   Variant: {:?}", variant);
    }
    print_parameters(&ReleaseInput::parameter_list_from_env(variant));
    let input = ReleaseInput::from_env(variant)?;
    if let Some(warning) = input.version_date_warning() {
        println!("{}", format!("⚠ Warning: {}", warning).yellow());
    }

    let report = update_catalog_file(catalog_path, &input, dry_run)?;

    print_update_report(&report);
    println!("\n{}", "✨ Sources file update completed!".green().bold());
    Ok(())
}

/// Load, merge, render and (unless `dry_run`) write back the sources file.
///
/// Nothing is written when any step fails.
pub fn update_catalog_file(
    catalog_path: &Path,
    input: &ReleaseInput,
    dry_run: bool,
) -> Result<UpdateReport> {
    // Step 2: Load the catalog
    println!("\n{}", "2. Reading sources file...".yellow());
    let store = CatalogStore::new(catalog_path);
    let mut catalog = store.load()?;
    println!("{}", "✓ Sources file loaded".green());
    if is_verbose() {
        let schema = catalog
            .schema_version()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!("   Schema version: {}, apps: {}", schema, catalog.apps().len());
    }

    // Step 3: Merge the release
    println!(
        "\n{}",
        format!(
            "3. Merging release into '{}'...",
            input.bundle_identifier.as_deref().unwrap_or("<unset>")
        )
        .yellow()
    );
    let report = apply_release(&mut catalog, input)?;
    println!("{}", format!("✓ {}", report.history).green());

    // Step 4: Render and persist
    println!("\n{}", "4. Writing sources file...".yellow());
    let rendered = catalog.render()?;
    println!("\nUpdated Sources File:\n");
    println!("{}", rendered);

    if dry_run {
        println!(
            "\n{}",
            format!("Dry run: {} was not modified", store.path().display()).yellow()
        );
    } else {
        store.save(&rendered)?;
        println!("{}", "✓ JSON successfully updated.".green());
    }

    Ok(report)
}

fn print_parameters(parameters: &[(&'static str, Option<String>)]) {
    println!("  ====> Required parameter list <====");
    for (label, value) in parameters {
        println!("{}: {}", label, value.as_deref().unwrap_or("None"));
    }
}

fn print_update_report(report: &UpdateReport) {
    println!("\n{}", "Update Summary:".cyan().bold());
    println!(
        "  • {} {}",
        report.bundle_identifier.white().bold(),
        report.version.green()
    );
    let growth = if report.grew_history() {
        "new entry"
    } else {
        "overwritten in place"
    };
    println!(
        "  • History: {} ({}, {} entries)",
        report.history, growth, report.history_len
    );
    if report.metadata_updated {
        println!("  • Front page metadata updated");
    } else {
        println!("  • {}", "Front page metadata unchanged".dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::update::report::HistoryChange;
    use crate::config::ReleaseTrack;
    use crate::error::UpdaterError;
    use serde_json::{Value, json};
    use std::fs;
    use tempfile::tempdir;

    const SOURCES: &str = r#"{
  "name": "Foo Source",
  "version": 2,
  "apps": [
    {
      "name": "Bar",
      "bundleIdentifier": "com.Foo.Bar",
      "version": "1.1.0",
      "versions": []
    }
  ]
}"#;

    fn beta_input(version: &str, beta: bool, bundle_identifier: &str) -> ReleaseInput {
        ReleaseInput {
            version: version.into(),
            version_date: "2024-09-09T09:00:00Z".into(),
            track: ReleaseTrack::BetaFlag {
                beta,
                commit_id: "9f8e7d6".into(),
            },
            size: 31_457_280,
            sha256: "e3b0c44298fc1c149afbf4c8996fb924".into(),
            localized_description: "• Nouvelle version".into(),
            download_url: format!("https://example.com/{version}/Bar.ipa"),
            bundle_identifier: Some(bundle_identifier.into()),
        }
    }

    fn channel_input(channel: &str, commit_id: Option<&str>) -> ReleaseInput {
        ReleaseInput {
            track: ReleaseTrack::Channel {
                name: channel.into(),
                commit_id: commit_id.map(str::to_string),
            },
            ..beta_input("1.3.0", false, "com.Foo.Bar")
        }
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn beta_release_lands_at_top_of_versions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apps.json");
        fs::write(&path, SOURCES).unwrap();

        update_catalog_file(&path, &beta_input("1.2.0", false, "com.Foo.Bar"), false).unwrap();

        let written = read_json(&path);
        assert_eq!(written["apps"][0]["versions"][0]["version"], json!("1.2.0"));
        assert_eq!(written["apps"][0]["versions"][0]["beta"], json!(false));
        assert_eq!(written["apps"][0]["version"], json!("1.2.0"));
    }

    #[test]
    fn rerunning_same_build_keeps_single_entry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apps.json");
        fs::write(&path, SOURCES).unwrap();
        let input = beta_input("1.2.0", true, "com.Foo.Bar");

        update_catalog_file(&path, &input, false).unwrap();
        let first = fs::read_to_string(&path).unwrap();
        let report = update_catalog_file(&path, &input, false).unwrap();

        assert_eq!(report.history, HistoryChange::ReplacedSameBuild);
        assert_eq!(fs::read_to_string(&path).unwrap(), first);
        assert_eq!(read_json(&path)["apps"][0]["versions"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn written_file_is_indented_and_unescaped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apps.json");
        fs::write(&path, SOURCES).unwrap();

        update_catalog_file(&path, &beta_input("1.2.0", true, "com.Foo.Bar"), false).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("{\n  \"name\": \"Foo Source\",\n  \"version\": 2,"));
        assert!(written.contains("\"localizedDescription\": \"• Nouvelle version\""));
    }

    #[test]
    fn unknown_app_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apps.json");
        fs::write(&path, SOURCES).unwrap();

        let err = update_catalog_file(&path, &beta_input("1.2.0", true, "com.Nope.App"), false)
            .unwrap_err();

        assert!(matches!(err, UpdaterError::AppNotFound(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), SOURCES);
    }

    #[test]
    fn unset_bundle_identifier_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apps.json");
        fs::write(&path, SOURCES).unwrap();
        let input = ReleaseInput {
            bundle_identifier: None,
            ..channel_input("stable", None)
        };

        let err = update_catalog_file(&path, &input, false).unwrap_err();

        assert!(matches!(err, UpdaterError::AppNotFound(None)));
        assert_eq!(fs::read_to_string(&path).unwrap(), SOURCES);
    }

    #[test]
    fn empty_commit_id_is_written_for_channel_release() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apps.json");
        fs::write(&path, SOURCES).unwrap();

        update_catalog_file(&path, &channel_input("nightly", Some("")), false).unwrap();

        let written = read_json(&path);
        assert_eq!(
            written["apps"][0]["releaseChannels"]["nightly"][0]["commitID"],
            json!("")
        );
    }

    #[test]
    fn dry_run_does_not_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apps.json");
        fs::write(&path, SOURCES).unwrap();

        let report =
            update_catalog_file(&path, &beta_input("2.0.0", false, "com.Foo.Bar"), true).unwrap();

        assert_eq!(report.history, HistoryChange::Inserted);
        assert_eq!(fs::read_to_string(&path).unwrap(), SOURCES);
    }

    #[test]
    fn channel_release_only_touches_metadata_when_stable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apps.json");
        fs::write(&path, SOURCES).unwrap();

        update_catalog_file(&path, &channel_input("nightly", Some("abc1234")), false).unwrap();
        let after_nightly = read_json(&path);
        assert_eq!(after_nightly["apps"][0]["version"], json!("1.1.0"));
        assert_eq!(
            after_nightly["apps"][0]["releaseChannels"]["nightly"][0]["commitID"],
            json!("abc1234")
        );

        update_catalog_file(&path, &channel_input("stable", None), false).unwrap();
        let after_stable = read_json(&path);
        assert_eq!(after_stable["apps"][0]["version"], json!("1.3.0"));
        assert_eq!(after_stable["apps"][0]["size"], json!(31_457_280));
        assert_eq!(
            after_stable["apps"][0]["releaseChannels"]["nightly"],
            after_nightly["apps"][0]["releaseChannels"]["nightly"]
        );
    }

    #[test]
    fn schema_v1_is_not_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apps.json");
        let legacy = SOURCES.replace("\"version\": 2", "\"version\": 1");
        fs::write(&path, &legacy).unwrap();

        let err = update_catalog_file(&path, &channel_input("stable", None), false).unwrap_err();

        assert!(matches!(err, UpdaterError::UnsupportedSchema(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), legacy);
    }

    #[test]
    fn invalid_json_is_not_rewritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apps.json");
        fs::write(&path, "not json").unwrap();

        let input = beta_input("1.0.0", true, "com.Foo.Bar");
        let err = update_catalog_file(&path, &input, false).unwrap_err();

        assert!(matches!(err, UpdaterError::Parse(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "not json");
    }
}
