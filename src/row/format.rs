/// Culture settings used when text is converted to a field's kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatProvider {
    pub decimal_separator: char,
    pub group_separator: Option<char>,
    pub date_time_formats: Vec<String>,
    pub time_formats: Vec<String>,
}

impl FormatProvider {
    /// ISO formats, `.` as the decimal separator, no grouping.
    pub fn invariant() -> Self {
        Self {
            decimal_separator: '.',
            group_separator: None,
            date_time_formats: vec![
                "%Y-%m-%dT%H:%M:%S%.f".to_string(),
                "%Y-%m-%d %H:%M:%S%.f".to_string(),
                "%Y-%m-%dT%H:%M:%S".to_string(),
                "%Y-%m-%d %H:%M:%S".to_string(),
            ],
            time_formats: vec!["%H:%M:%S%.f".to_string(), "%H:%M".to_string()],
        }
    }

    pub fn decimal_separator(mut self, separator: char) -> Self {
        self.decimal_separator = separator;
        self
    }

    pub fn group_separator(mut self, separator: char) -> Self {
        self.group_separator = Some(separator);
        self
    }

    /// Tried before the built-in formats.
    pub fn date_time_format(mut self, format: &str) -> Self {
        self.date_time_formats.insert(0, format.to_string());
        self
    }

    pub fn time_format(mut self, format: &str) -> Self {
        self.time_formats.insert(0, format.to_string());
        self
    }

    /// Rewrite a culture-formatted number into invariant form.
    pub fn normalize_number(&self, text: &str) -> String {
        let text = text.trim();
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            if Some(c) == self.group_separator {
                continue;
            }
            if c == self.decimal_separator {
                out.push('.');
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl Default for FormatProvider {
    fn default() -> Self {
        Self::invariant()
    }
}
