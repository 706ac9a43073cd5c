//! Source-language tags observed per compilation unit.

use serde::{Deserialize, Serialize};

/// A source language counted in usage reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// C (C99 mode)
    C,
    /// C++
    Cpp,
    /// Objective-C
    ObjC,
}

impl Language {
    /// Every tracked language, in counter order.
    pub const ALL: [Language; 3] = [Language::C, Language::Cpp, Language::ObjC];

    /// Wire tag used as the segment key.
    pub fn tag(self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::ObjC => "objc",
        }
    }

    /// Parse a wire tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.tag() == tag)
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    fn bit(self) -> u8 {
        1 << self.index()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// The set of language facets enabled for one compilation unit.
///
/// Facets are independent: a unit compiled as Objective-C++ carries both
/// [`Language::Cpp`] and [`Language::ObjC`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LanguageMode {
    facets: u8,
}

impl LanguageMode {
    /// A mode with no facets enabled.
    pub const fn empty() -> Self {
        Self { facets: 0 }
    }

    /// Build a mode from the front-end's per-unit language flags.
    pub fn from_flags(objc: bool, cplusplus: bool, c99: bool) -> Self {
        let mut mode = Self::empty();
        if objc {
            mode = mode.with(Language::ObjC);
        }
        if cplusplus {
            mode = mode.with(Language::Cpp);
        }
        if c99 {
            mode = mode.with(Language::C);
        }
        mode
    }

    /// Return this mode with `lang` enabled.
    #[must_use]
    pub fn with(self, lang: Language) -> Self {
        Self {
            facets: self.facets | lang.bit(),
        }
    }

    /// Check whether `lang` is enabled.
    pub fn contains(&self, lang: Language) -> bool {
        self.facets & lang.bit() != 0
    }

    /// Check whether no facet is enabled.
    pub fn is_empty(&self) -> bool {
        self.facets == 0
    }

    /// Iterate the enabled languages.
    pub fn iter(&self) -> impl Iterator<Item = Language> + '_ {
        Language::ALL.into_iter().filter(|lang| self.contains(*lang))
    }
}

impl FromIterator<Language> for LanguageMode {
    fn from_iter<I: IntoIterator<Item = Language>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), LanguageMode::with)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        assert_eq!(Language::C.tag(), "c");
        assert_eq!(Language::Cpp.tag(), "cpp");
        assert_eq!(Language::ObjC.tag(), "objc");
        assert_eq!(Language::from_tag("objc"), Some(Language::ObjC));
        assert_eq!(Language::from_tag("rust"), None);
    }

    #[test]
    fn test_from_flags() {
        let mode = LanguageMode::from_flags(true, true, false);
        assert!(mode.contains(Language::ObjC));
        assert!(mode.contains(Language::Cpp));
        assert!(!mode.contains(Language::C));
        assert_eq!(mode.iter().collect::<Vec<_>>(), vec![Language::Cpp, Language::ObjC]);

        assert!(LanguageMode::from_flags(false, false, false).is_empty());
    }

    #[test]
    fn test_collect_mode() {
        let mode: LanguageMode = [Language::C, Language::C].into_iter().collect();
        assert_eq!(mode, LanguageMode::empty().with(Language::C));
    }
}
