mod common;

use common::*;
use pbxsplice::engine;
use pbxsplice::models::*;
use speculate2::speculate;

fn addition(path: &str, group: &str) -> FileAddition {
    FileAddition {
        group: Some(group.to_string()),
        ..FileAddition::new(path)
    }
}

speculate! {
    before {
        let mut doc = document(PROJECT);
    }

    describe "apply" {
        it "adds a source file to its group and the Sources phase" {
            let changes = ChangeSet {
                add: vec![addition("AI/Core/Agent2.swift", "Core")],
                ..Default::default()
            };
            let outcomes = engine::apply(&mut doc, &changes).expect("Failed to apply");

            assert_eq!(outcomes.len(), 1);
            assert_eq!(outcomes[0].status, OperationStatus::Applied);
            assert_eq!(outcomes[0].ids, vec![new_id(1), new_id(2)]);

            let children = doc.reference_list("Core", "children").expect("Core missing");
            assert_eq!(children.ids().last().copied(), Some(new_id(1).as_str()));
            let sources = doc.reference_list("Sources", "files").expect("Sources missing");
            assert_eq!(sources.ids().last().copied(), Some(new_id(2).as_str()));
            assert!(doc.text().contains("/* Agent2.swift in Sources */ = {isa = PBXBuildFile; fileRef ="));
        }

        it "keeps headers out of the build phase" {
            let changes = ChangeSet {
                add: vec![addition("Bridge/AIBridge.h", "Core")],
                ..Default::default()
            };
            engine::apply(&mut doc, &changes).expect("Failed to apply");

            let record = doc.record(&new_id(1)).expect("parse").expect("missing");
            assert_eq!(record.value("lastKnownFileType").as_deref(), Some("sourcecode.c.h"));
            assert_eq!(count_kind(&doc, &ObjectKind::BuildFile), 3);
        }

        it "rolls back a composite add whose group is missing" {
            let changes = ChangeSet {
                add: vec![addition("Y.swift", "Networking")],
                ..Default::default()
            };
            let outcomes = engine::apply(&mut doc, &changes).expect("Failed to apply");

            assert_eq!(outcomes[0].status, OperationStatus::Failed);
            assert!(outcomes[0].detail.as_deref().unwrap_or_default().contains("Networking"));
            assert_eq!(doc.text(), PROJECT);
        }

        it "finds the phase through the requested target" {
            let mut in_demo = addition("Y.swift", "Core");
            in_demo.target = Some("Demo".to_string());
            let mut in_widget = addition("Z.swift", "Core");
            in_widget.target = Some("Widget".to_string());
            let changes = ChangeSet { add: vec![in_demo, in_widget], ..Default::default() };

            let outcomes = engine::apply(&mut doc, &changes).expect("Failed to apply");

            assert_eq!(outcomes[0].status, OperationStatus::Applied);
            assert_eq!(outcomes[1].status, OperationStatus::Failed);
            assert!(outcomes[1].detail.as_deref().unwrap_or_default().contains("Widget"));
            let sources = doc.reference_list("Sources", "files").expect("Sources missing");
            assert_eq!(sources.len(), 3);
            assert!(!doc.text().contains("Z.swift"));
        }

        it "keeps going after a failed operation" {
            let changes = ChangeSet {
                add: vec![addition("Y.swift", "Networking"), addition("Z.swift", "Core")],
                relocate: vec![Relocation {
                    from: "Missing.swift".to_string(),
                    to: "Elsewhere/Missing.swift".to_string(),
                    group: None,
                }],
                remove: vec!["LaunchAtLogin".to_string()],
                ..Default::default()
            };
            let outcomes = engine::apply(&mut doc, &changes).expect("Failed to apply");

            let statuses: Vec<OperationStatus> = outcomes.iter().map(|o| o.status).collect();
            assert_eq!(statuses, vec![
                OperationStatus::Failed,
                OperationStatus::Applied,
                OperationStatus::Unchanged,
                OperationStatus::Applied,
            ]);
            assert!(!doc.text().contains("LaunchAtLogin"));
            assert!(doc.text().contains("path = Z.swift;"));
        }

        it "treats a repeated idempotent add as unchanged" {
            let mut add = addition("Y.swift", "Core");
            add.idempotent = true;
            let changes = ChangeSet { add: vec![add], ..Default::default() };

            engine::apply(&mut doc, &changes).expect("Failed to apply");
            let once = doc.text().to_string();
            let outcomes = engine::apply(&mut doc, &changes).expect("Failed to apply");

            assert_eq!(outcomes[0].status, OperationStatus::Unchanged);
            assert_eq!(doc.text(), once);
        }

        it "reports removal of an absent dependency as unchanged" {
            let changes = ChangeSet {
                remove: vec!["Sparkle".to_string()],
                ..Default::default()
            };
            let outcomes = engine::apply(&mut doc, &changes).expect("Failed to apply");
            assert_eq!(outcomes[0].status, OperationStatus::Unchanged);
        }

        it "flags ambiguous relocations as failures" {
            let mut doc = document(DUPLICATE_PATHS);
            let changes = ChangeSet {
                relocate: vec![Relocation {
                    from: "Foo.swift".to_string(),
                    to: "Bar/Foo.swift".to_string(),
                    group: None,
                }],
                ..Default::default()
            };
            let outcomes = engine::apply(&mut doc, &changes).expect("Failed to apply");
            assert_eq!(outcomes[0].status, OperationStatus::Failed);
            assert_eq!(doc.text(), DUPLICATE_PATHS);
        }
    }

    describe "run" {
        before {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("project.pbxproj");
            std::fs::write(&path, PROJECT).expect("Failed to seed manifest");
            let changes = ChangeSet {
                add: vec![addition("Y.swift", "Core")],
                remove: vec!["LaunchAtLogin".to_string()],
                ..Default::default()
            };
        }

        it "writes the result back to the manifest" {
            let report = engine::run(&path, &changes, false).expect("Failed to run");

            assert!(report.changed);
            assert!(report.written);
            assert!(!report.has_failures());
            let on_disk = std::fs::read_to_string(&path).expect("Failed to read back");
            assert!(on_disk.contains("path = Y.swift;"));
            assert!(!on_disk.contains("LaunchAtLogin"));
            assert!(braces_balanced(&on_disk));
        }

        it "leaves the manifest untouched on a dry run" {
            let report = engine::run(&path, &changes, true).expect("Failed to run");

            assert!(report.changed);
            assert!(!report.written);
            let on_disk = std::fs::read_to_string(&path).expect("Failed to read back");
            assert_eq!(on_disk, PROJECT);
        }

        it "does not rewrite an unchanged manifest" {
            let nothing = ChangeSet {
                remove: vec!["Sparkle".to_string()],
                ..Default::default()
            };
            let report = engine::run(&path, &nothing, false).expect("Failed to run");

            assert!(!report.changed);
            assert!(!report.written);
        }

        it "fails on a missing manifest" {
            let missing = dir.path().join("nope.pbxproj");
            let result = engine::run(&missing, &changes, false);
            assert!(matches!(result, Err(pbxsplice::Error::Io(_))));
        }
    }
}
