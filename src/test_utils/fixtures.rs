//! Test fixtures for archives, configs, and catalog documents
//!
//! This module provides builders for the sample data the test suites share:
//! gzip-compressed tar archives shaped like vendor installer downloads,
//! `toolup.json` product lists, and canned catalog responses.

use anyhow::Result;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tar::{EntryType, Header};

enum FixtureEntry {
    Dir { name: String, mode: u32 },
    File { name: String, content: Vec<u8>, mode: u32 },
    Symlink { name: String, target: String },
}

/// Builder for small tar.gz archives with exact control over entry names.
///
/// Entry names are written into the header byte-for-byte, so directory
/// entries keep the trailing slash real vendor archives store (path-based
/// tar APIs normalize it away).
///
/// # Example
///
/// ```rust,no_run
/// use toolup::test_utils::TarGzFixture;
///
/// TarGzFixture::new()
///     .dir("ideaIU-231.9414/")
///     .file("ideaIU-231.9414/build.txt", b"IIU-231.9414")
///     .write(std::path::Path::new("/tmp/installation.tar.gz"))
///     .unwrap();
/// ```
pub struct TarGzFixture {
    entries: Vec<FixtureEntry>,
}

impl TarGzFixture {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds a directory entry (mode 0755).
    #[must_use]
    pub fn dir(self, name: &str) -> Self {
        self.dir_with_mode(name, 0o755)
    }

    #[must_use]
    pub fn dir_with_mode(mut self, name: &str, mode: u32) -> Self {
        self.entries.push(FixtureEntry::Dir {
            name: name.to_string(),
            mode,
        });
        self
    }

    /// Adds a regular file entry (mode 0644).
    #[must_use]
    pub fn file(self, name: &str, content: &[u8]) -> Self {
        self.file_with_mode(name, content, 0o644)
    }

    #[must_use]
    pub fn file_with_mode(mut self, name: &str, content: &[u8], mode: u32) -> Self {
        self.entries.push(FixtureEntry::File {
            name: name.to_string(),
            content: content.to_vec(),
            mode,
        });
        self
    }

    /// Adds a symlink entry, which the extractor is expected to reject.
    #[must_use]
    pub fn symlink(mut self, name: &str, target: &str) -> Self {
        self.entries.push(FixtureEntry::Symlink {
            name: name.to_string(),
            target: target.to_string(),
        });
        self
    }

    /// Writes the archive to `path`.
    pub fn write(&self, path: &Path) -> Result<()> {
        let file = fs::File::create(path)?;
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);

        for entry in &self.entries {
            match entry {
                FixtureEntry::Dir {
                    name,
                    mode,
                } => {
                    let mut header = raw_header(name, EntryType::Directory, 0, *mode);
                    header.set_cksum();
                    builder.append(&header, io::empty())?;
                }
                FixtureEntry::File {
                    name,
                    content,
                    mode,
                } => {
                    let mut header =
                        raw_header(name, EntryType::Regular, content.len() as u64, *mode);
                    header.set_cksum();
                    builder.append(&header, content.as_slice())?;
                }
                FixtureEntry::Symlink {
                    name,
                    target,
                } => {
                    let mut header = raw_header(name, EntryType::Symlink, 0, 0o777);
                    header.set_link_name(target)?;
                    header.set_cksum();
                    builder.append(&header, io::empty())?;
                }
            }
        }

        let encoder = builder.into_inner()?;
        encoder.finish()?;
        Ok(())
    }
}

impl Default for TarGzFixture {
    fn default() -> Self {
        Self::new()
    }
}

fn raw_header(name: &str, kind: EntryType, size: u64, mode: u32) -> Header {
    assert!(name.len() < 100, "fixture entry name too long for the header name field: {name}");
    let mut header = Header::new_gnu();
    {
        let gnu = header.as_gnu_mut().expect("new_gnu produces a GNU header");
        gnu.name[..name.len()].copy_from_slice(name.as_bytes());
    }
    header.set_entry_type(kind);
    header.set_size(size);
    header.set_mode(mode);
    header
}

/// Test fixture for creating sample toolup.json files
#[derive(Clone, Debug)]
pub struct ConfigFixture {
    pub content: String,
    pub name: String,
}

impl ConfigFixture {
    /// Basic config with a feed-backed product and a disabled releases-backed one
    pub fn basic() -> Self {
        Self {
            name: "basic".to_string(),
            content: r#"
[
  {
    "name": "IntelliJ IDEA Ultimate",
    "download_url": "https://download.jetbrains.com/idea/ideaIU-{build}.tar.gz",
    "parent_dir": "/opt/jetbrains",
    "dir": "idea",
    "chmod": "0755"
  },
  {
    "name": "CLion",
    "code": "CL",
    "parent_dir": "/opt/jetbrains",
    "dir": "clion",
    "channel": "release",
    "enabled": false
  }
]
"#
            .trim()
            .to_string(),
        }
    }

    /// Single product with only the required fields
    pub fn minimal() -> Self {
        Self {
            name: "minimal".to_string(),
            content: r#"
[
  {
    "name": "WebStorm",
    "download_url": "https://download.jetbrains.com/webstorm/WebStorm-{build}.tar.gz",
    "parent_dir": "/opt/jetbrains",
    "dir": "webstorm"
  }
]
"#
            .trim()
            .to_string(),
        }
    }

    /// Config with invalid JSON syntax
    pub fn invalid_syntax() -> Self {
        Self {
            name: "invalid_syntax".to_string(),
            content: r#"
[
  {
    "name": "IntelliJ IDEA Ultimate",
    "parent_dir": "/opt/jetbrains"
"#
            .trim()
            .to_string(),
        }
    }

    /// Valid JSON that is not a product array
    pub fn wrong_shape() -> Self {
        Self {
            name: "wrong_shape".to_string(),
            content: r#"{"products": "not an array"}"#.to_string(),
        }
    }

    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let config_path = dir.join("toolup.json");
        fs::write(&config_path, &self.content)?;
        Ok(config_path)
    }
}

/// Combined update feed covering two products with mixed channel statuses.
///
/// IntelliJ's EAP channel carries builds `231.8770.17` and `231.9414.13`;
/// its release channel carries `231.8109.175`.
#[must_use]
pub fn sample_feed_xml() -> String {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<products>
  <product name="IntelliJ IDEA Ultimate">
    <channel id="IC-IU-RELEASE" status="release">
      <build number="231.8109" fullNumber="231.8109.175"/>
    </channel>
    <channel id="IC-IU-EAP" status="EAP">
      <build number="231.8770" fullNumber="231.8770.17"/>
      <build number="231.9414" fullNumber="231.9414.13"/>
    </channel>
  </product>
  <product name="CLion">
    <channel id="CL-EAP" status="eap">
      <build number="231.9011" fullNumber="231.9011.20"/>
    </channel>
  </product>
</products>"#
        .to_string()
}

/// Releases endpoint response with the dynamic top-level product key.
#[must_use]
pub fn sample_releases_json() -> String {
    r#"{
  "CL": [
    {
      "date": "2023-04-11",
      "type": "eap",
      "version": "2023.1.2",
      "build": "231.9011.20",
      "downloads": {
        "linux": {
          "link": "https://download.jetbrains.com/cpp/CLion-231.9011.20.tar.gz",
          "size": 707154223
        },
        "mac": {
          "link": "https://download.jetbrains.com/cpp/CLion-231.9011.20.dmg",
          "size": 656173040
        }
      }
    }
  ]
}"#
    .to_string()
}
