//! Reading harness settings from an ini manifest
//!
//! ## Format
//! The manifest *MAY* contain any of the following sections:
//!
//! ### Logging Section
//! - `level` which names the maximum log level (`off`, `error`, `warn`, `info`, `debug` or `trace`).
//!
//! ### Input Section
//! - `path` which points to the file from which the request script is read.
//!
//! ```ini
//! [logging]
//! level=debug
//!
//! [input]
//! path=cases.txt
//! ```

use ini_core::{Item, Parser};

pub struct HarnessManifest<'src> {
    pub src: &'src str,
}

impl<'src> HarnessManifest<'src> {
    pub fn from(src: &'src str) -> Self {
        Self { src }
    }

    fn parser(&self) -> Parser<'src> {
        Parser::new(self.src).auto_trim(true)
    }

    fn section(&self, name: &str) -> Option<Section<'src>> {
        let mut parser = self.parser();
        let _ = parser.find(|item| matches!(item, Item::Section(section) if *section == name))?;
        Some(Section { parser })
    }

    pub fn logging(&self) -> Option<Logging<'src>> {
        self.section("logging").map(|section| Logging { section })
    }

    pub fn input(&self) -> Option<Input<'src>> {
        self.section("input").map(|section| Input { section })
    }
}

/// The properties of one manifest section, positioned right after its header
struct Section<'src> {
    parser: Parser<'src>,
}

impl<'src> Section<'src> {
    fn property(&self, key: &str) -> Option<&'src str> {
        self.parser
            .clone()
            .take_while(|item| !matches!(item, Item::SectionEnd))
            .find_map(|item| match item {
                Item::Property(k, Some(value)) if k == key => Some(value),
                _ => None,
            })
    }
}

pub struct Logging<'src> {
    section: Section<'src>,
}

impl<'src> Logging<'src> {
    pub fn level(&self) -> Option<&'src str> {
        self.section.property("level")
    }
}

pub struct Input<'src> {
    section: Section<'src>,
}

impl<'src> Input<'src> {
    pub fn path(&self) -> Option<&'src str> {
        self.section.property("path")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const MANIFEST: &str = "
[logging]
level=debug

[input]
path=cases/fragmentation.txt
";

    #[test]
    fn test_logging_level() {
        let m = HarnessManifest::from(MANIFEST);
        assert_eq!(m.logging().unwrap().level().unwrap(), "debug")
    }

    #[test]
    fn test_input_path() {
        let m = HarnessManifest::from(MANIFEST);
        assert_eq!(m.input().unwrap().path().unwrap(), "cases/fragmentation.txt")
    }

    #[test]
    fn test_properties_do_not_leak_across_sections() {
        let m = HarnessManifest::from("[logging]\n\n[input]\nlevel=trace\n");
        assert_eq!(m.logging().unwrap().level(), None);
    }

    #[test]
    fn test_missing_sections() {
        let m = HarnessManifest::from("[other]\nkey=value\n");
        assert!(m.logging().is_none());
        assert!(m.input().is_none());
    }
}
