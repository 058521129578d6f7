/// A `lastKnownFileType` value plus what the build system does with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileKind {
    pub file_type: String,
}

impl FileKind {
    pub fn new(file_type: impl Into<String>) -> Self {
        Self {
            file_type: file_type.into(),
        }
    }

    /// Guess the file type from the path's extension.
    pub fn infer(path: &str) -> Self {
        let ext = path
            .rsplit('/')
            .next()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let file_type = match ext.as_str() {
            "swift" => "sourcecode.swift",
            "h" => "sourcecode.c.h",
            "m" => "sourcecode.c.objc",
            "mm" => "sourcecode.cpp.objcpp",
            "c" => "sourcecode.c.c",
            "cc" | "cpp" | "cxx" => "sourcecode.cpp.cpp",
            "hh" | "hpp" | "hxx" => "sourcecode.cpp.h",
            "metal" => "sourcecode.metal",
            "plist" => "text.plist.xml",
            "json" => "text.json",
            "strings" => "text.plist.strings",
            "entitlements" => "text.plist.entitlements",
            "xcassets" => "folder.assetcatalog",
            "storyboard" => "file.storyboard",
            "xib" => "file.xib",
            _ => "text",
        };
        Self::new(file_type)
    }

    /// Whether files of this type belong in a Sources build phase.
    ///
    /// Headers are referenced from groups only.
    pub fn is_compiled(&self) -> bool {
        self.file_type.starts_with("sourcecode.") && !self.file_type.ends_with(".h")
    }
}
