mod common;

use std::collections::HashSet;

use common::*;
use pbxsplice::document::graph;
use pbxsplice::models::*;
use pbxsplice::mutation;
use pbxsplice::Error;
use speculate2::speculate;

const PRODUCT: &str = "7065EBBE2CDB8C2B008C0A74";
const PACKAGE: &str = "7065EBBD2CDB8C2B008C0A74";
const FRAMEWORK_BUILD_FILE: &str = "7065EBBF2CDB8C2B008C0A74";
const SCRIPT_PHASE: &str = "B10000000000000000000003";

speculate! {
    before {
        let mut doc = document(PROJECT);
    }

    describe "remove_dependency" {
        it "removes the whole reference chain" {
            let removed = mutation::remove_dependency(&mut doc, "LaunchAtLogin").expect("Failed to remove");

            let removed: HashSet<&str> = removed.iter().map(String::as_str).collect();
            let expected: HashSet<&str> = [PRODUCT, PACKAGE, FRAMEWORK_BUILD_FILE, SCRIPT_PHASE].into_iter().collect();
            assert_eq!(removed, expected);

            let text = doc.text();
            for id in expected {
                assert!(!text.contains(id), "{} still present", id);
            }
            assert!(!text.contains("LaunchAtLogin"));
        }

        it "leaves no dangling ids in any reference list" {
            mutation::remove_dependency(&mut doc, "LaunchAtLogin").expect("Failed to remove");

            let ids: HashSet<String> = doc
                .records()
                .expect("Failed to parse")
                .into_iter()
                .map(|r| r.id)
                .collect();
            for list in graph::all_reference_lists(doc.text()).expect("Failed to parse lists") {
                for entry in &list.entries {
                    assert!(ids.contains(&entry.id), "{} in {} is dangling", entry.id, list.field);
                }
            }
        }

        it "keeps unrelated entries and their order" {
            mutation::remove_dependency(&mut doc, "LaunchAtLogin").expect("Failed to remove");

            let phases = doc.reference_list("Demo", "buildPhases").expect("Failed to find target");
            assert_eq!(phases.ids(), vec![SOURCES_PHASE, "B10000000000000000000001"]);
            let frameworks = doc.reference_list("Frameworks", "files").expect("Failed to find phase");
            assert!(frameworks.is_empty());
            assert!(doc.text().contains("\t\t\tfiles = (\n\t\t\t);"));
            assert_eq!(count_kind(&doc, &ObjectKind::FileReference), 3);
            assert_eq!(count_kind(&doc, &ObjectKind::BuildFile), 2);
        }

        it "strips build settings that name the product" {
            mutation::remove_dependency(&mut doc, "LaunchAtLogin").expect("Failed to remove");

            let text = doc.text();
            assert!(text.contains("\t\t\t\t\"OTHER_LDFLAGS[arch=*]\" = (\n\t\t\t\t\t\"$(inherited)\",\n\t\t\t\t);"));
            assert!(!text.contains("-framework"));
            assert!(!text.contains("OTHER_SWIFT_FLAGS"));
            assert!(text.contains("PRODUCT_NAME = \"$(TARGET_NAME)\";"));
            assert!(doc.record("D20000000000000000000001").expect("Failed to parse").is_some());
            assert!(text.lines().all(|line| !line.contains("LaunchAtLogin")));
        }

        it "keeps the document well formed" {
            mutation::remove_dependency(&mut doc, "LaunchAtLogin").expect("Failed to remove");

            assert!(braces_balanced(doc.text()));
            assert!(!doc.text().contains("\n\n\n"));
            assert!(doc.sections().is_ok());
        }

        it "is idempotent" {
            mutation::remove_dependency(&mut doc, "LaunchAtLogin").expect("Failed to remove");
            let once = doc.text().to_string();

            let again = mutation::remove_dependency(&mut doc, "LaunchAtLogin");
            assert!(matches!(again, Err(Error::ReferenceNotFound(_))));
            assert_eq!(doc.text(), once);
        }

        it "treats an unknown product as nothing to do" {
            let result = mutation::remove_dependency(&mut doc, "Sparkle");
            assert!(matches!(result, Err(Error::ReferenceNotFound(name)) if name == "Sparkle"));
            assert_eq!(doc.text(), PROJECT);
        }

        it "keeps a package another product still uses" {
            let shared = PROJECT.replace(
                "/* End XCSwiftPackageProductDependency section */",
                "\t\tFEED00000000000000000001 /* LaunchAtLoginUI */ = {\n\t\t\tisa = XCSwiftPackageProductDependency;\n\t\t\tpackage = 7065EBBD2CDB8C2B008C0A74 /* XCRemoteSwiftPackageReference \"LaunchAtLogin-Modern\" */;\n\t\t\tproductName = LaunchAtLoginUI;\n\t\t};\n/* End XCSwiftPackageProductDependency section */",
            );
            let mut doc = document(&shared);
            let removed = mutation::remove_dependency(&mut doc, "LaunchAtLogin").expect("Failed to remove");

            assert!(!removed.contains(&PACKAGE.to_string()));
            assert!(doc.record(PACKAGE).expect("Failed to parse").is_some());
            assert!(doc.record("FEED00000000000000000001").expect("Failed to parse").is_some());
            assert!(doc.record(PRODUCT).expect("Failed to parse").is_none());
        }
    }
}
