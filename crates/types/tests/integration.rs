//! Integration tests for types

#[cfg(test)]
mod tests {
    use xcfetch_types::*;

    #[test]
    fn test_package_serialization() {
        let package = Package::new(
            PackageKind::CommandLineTools,
            Some("15.1".into()),
            "/Developer_Tools/CLT_15.1/Command_Line_Tools_for_Xcode_15.1.dmg",
        );
        let json = serde_json::to_value(&package).unwrap();
        assert_eq!(json["kind"], "command-line-tools");
        assert_eq!(json["version"], "15.1");

        let back: Package = serde_json::from_value(json).unwrap();
        assert_eq!(back, package);
    }

    #[test]
    fn test_download_report_duration() {
        let started_at = chrono::DateTime::parse_from_rfc3339("2024-01-01T10:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        let report = DownloadReport {
            package: Package::from_path("/a/b.xip"),
            path: "b.xip".into(),
            bytes: 10,
            started_at,
            finished_at: started_at + chrono::Duration::seconds(90),
        };
        assert_eq!(report.duration().num_seconds(), 90);
    }
}
