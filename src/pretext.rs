//! Pretext templates bundled with the binary.
//!
//! A pretext is text prepended to the prompt to set the tone of the
//! completion. The `--pretext` flag either inspects the bundled set
//! (`list`, `view:<name>`), selects a bundled template by name, or supplies
//! literal text.

use crate::error::{Error, Result};
use std::io::Write;
use tracing::debug;

/// A named, immutable template compiled into the binary.
#[derive(Debug, PartialEq, Eq)]
pub struct PretextTemplate {
    pub name: &'static str,
    pub contents: &'static str,
}

macro_rules! bundled {
    ($($name:literal),* $(,)?) => {
        &[$(PretextTemplate {
            name: $name,
            contents: include_str!(concat!("../pretexts/", $name, ".txt")),
        }),*]
    };
}

/// Bundled templates, kept in sorted order.
static BUNDLED: &[PretextTemplate] = bundled![
    "coder",
    "cynic",
    "optimistic",
    "poet",
    "teacher",
    "thoughtful",
];

/// All bundled templates in sorted order.
pub fn templates() -> &'static [PretextTemplate] {
    BUNDLED
}

/// Look up a bundled template by name (without extension).
pub fn find(name: &str) -> Option<&'static PretextTemplate> {
    BUNDLED.iter().find(|t| t.name == name)
}

const VIEW_PREFIX: &str = "view:";

/// The decoded `--pretext` value.
#[derive(Debug, PartialEq, Eq)]
pub enum PretextSelector<'a> {
    /// Print all template names and stop.
    List,
    /// Print one template's contents and stop.
    View(&'a str),
    /// Prepend a bundled template.
    UseNamed(&'static PretextTemplate),
    /// Prepend the flag value itself.
    UseLiteral(&'a str),
}

impl<'a> PretextSelector<'a> {
    /// Decode a raw flag value.
    pub fn parse(raw: &'a str) -> Self {
        if raw == "list" {
            return Self::List;
        }
        if let Some(name) = raw.strip_prefix(VIEW_PREFIX) {
            return Self::View(name);
        }
        match find(raw) {
            Some(template) => Self::UseNamed(template),
            None => Self::UseLiteral(raw),
        }
    }
}

/// Outcome of acting on a selector.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// An informational command ran; the process should exit successfully.
    Finished,
    /// Text to prepend to the prompt.
    Prefix(&'a str),
}

/// Act on a selector, writing `list`/`view:` output to `out`.
pub fn resolve<'a, W: Write>(selector: PretextSelector<'a>, out: &mut W) -> Result<Resolution<'a>> {
    match selector {
        PretextSelector::List => {
            for template in templates() {
                writeln!(out, "{}", template.name).map_err(stdout_error)?;
            }
            Ok(Resolution::Finished)
        }
        PretextSelector::View(name) => {
            let template = find(name).ok_or_else(|| Error::UnknownPretext(name.to_string()))?;
            out.write_all(template.contents.as_bytes())
                .map_err(stdout_error)?;
            Ok(Resolution::Finished)
        }
        PretextSelector::UseNamed(template) => {
            debug!("Using bundled pretext '{}'", template.name);
            Ok(Resolution::Prefix(template.contents))
        }
        PretextSelector::UseLiteral(text) => {
            debug!("Using literal pretext ({} bytes)", text.len());
            Ok(Resolution::Prefix(text))
        }
    }
}

fn stdout_error(source: std::io::Error) -> Error {
    Error::WriteOutput {
        target: "stdout".to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_templates_sorted_and_unique() {
        let names: Vec<_> = templates().iter().map(|t| t.name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_parse_selector() {
        assert_eq!(PretextSelector::parse("list"), PretextSelector::List);
        assert_eq!(PretextSelector::parse("view:cynic"), PretextSelector::View("cynic"));
        assert_eq!(PretextSelector::parse("view:"), PretextSelector::View(""));
        assert!(matches!(
            PretextSelector::parse("optimistic"),
            PretextSelector::UseNamed(t) if t.name == "optimistic"
        ));
        assert_eq!(
            PretextSelector::parse("Talk like a pirate."),
            PretextSelector::UseLiteral("Talk like a pirate.")
        );
    }

    #[test]
    fn test_name_with_extension_is_literal() {
        assert_eq!(
            PretextSelector::parse("cynic.txt"),
            PretextSelector::UseLiteral("cynic.txt")
        );
    }

    #[test]
    fn test_list_prints_each_name_once() {
        let mut out = Vec::new();
        let resolution = resolve(PretextSelector::List, &mut out).unwrap();
        assert_eq!(resolution, Resolution::Finished);

        let printed = String::from_utf8(out).unwrap();
        let lines: Vec<_> = printed.lines().collect();
        assert_eq!(lines.len(), templates().len());
        for template in templates() {
            assert_eq!(lines.iter().filter(|l| **l == template.name).count(), 1);
        }
    }

    #[test]
    fn test_view_prints_contents_unmodified() {
        for template in templates() {
            let mut out = Vec::new();
            let raw = format!("view:{}", template.name);
            resolve(PretextSelector::parse(&raw), &mut out).unwrap();
            assert_eq!(out, template.contents.as_bytes());
        }
    }

    #[test]
    fn test_view_unknown_is_error() {
        let mut out = Vec::new();
        let err = resolve(PretextSelector::View("nope"), &mut out).unwrap_err();
        assert!(matches!(err, Error::UnknownPretext(ref name) if name == "nope"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_named_and_literal_resolve_to_prefix() {
        let mut out = Vec::new();
        let named = resolve(PretextSelector::parse("teacher"), &mut out).unwrap();
        assert_eq!(named, Resolution::Prefix(find("teacher").unwrap().contents));

        let literal = resolve(PretextSelector::parse("be brief"), &mut out).unwrap();
        assert_eq!(literal, Resolution::Prefix("be brief"));
        assert!(out.is_empty());
    }
}
