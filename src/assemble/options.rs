//! Assembly options.

/// How unit headings are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStyle {
    /// `## 🖼 Slide N`, `## 📄 Page N`, `### 📊 Tables`
    #[default]
    Decorated,
    /// `## Slide N`, `## Page N`, `### Tables`
    Plain,
}

/// Language of generated placeholder text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Korean,
    English,
}

impl Locale {
    /// Body placeholder for a unit with no content.
    pub fn no_content(&self) -> &'static str {
        match self {
            Locale::Korean => "_(내용 없음)_",
            Locale::English => "_(no content)_",
        }
    }

    /// Caption for a chart without a title.
    pub fn chart_placeholder(&self) -> &'static str {
        match self {
            Locale::Korean => "차트/다이어그램",
            Locale::English => "chart or diagram",
        }
    }

    /// Caption for a generic graphic frame.
    pub fn smartart_placeholder(&self) -> &'static str {
        match self {
            Locale::Korean => "SmartArt/다이어그램",
            Locale::English => "SmartArt/diagram",
        }
    }

    /// Parse a locale name (`ko`, `korean`, `en`, `english`).
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "ko" | "kr" | "korean" => Some(Locale::Korean),
            "en" | "english" => Some(Locale::English),
            _ => None,
        }
    }
}

/// Options for unit assembly.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Heading decoration
    pub heading_style: HeadingStyle,

    /// Placeholder language
    pub locale: Locale,

    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Assemble units on the rayon pool
    pub parallel: bool,
}

impl AssembleOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heading style.
    pub fn with_heading_style(mut self, style: HeadingStyle) -> Self {
        self.heading_style = style;
        self
    }

    /// Set the placeholder locale.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Enable or disable NFC normalization.
    pub fn with_unicode_normalization(mut self, enabled: bool) -> Self {
        self.normalize_unicode = enabled;
        self
    }

    /// Enable or disable parallel assembly.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Decorated,
            locale: Locale::Korean,
            normalize_unicode: true,
            parallel: true,
        }
    }
}
