//! Field annotation parsing.

/// Special handling requested for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldOption {
    /// Quote the field's `Display` output.
    Stringer,
    /// Let the field's `EncodeJson` impl write it.
    Encoder,
    /// Write the content verbatim.
    Raw,
    /// JSON-escape text.
    Escape,
}

impl FieldOption {
    /// Name as written in annotations.
    pub(crate) const fn name(self) -> &'static str {
        match self {
            FieldOption::Stringer => "stringer",
            FieldOption::Encoder => "encoder",
            FieldOption::Raw => "raw",
            FieldOption::Escape => "escape",
        }
    }
}

/// A parsed `"key,option,..."` annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldTag {
    pub(crate) key: &'static str,
    pub(crate) option: Option<FieldOption>,
}

impl FieldTag {
    /// Parses an annotation. Returns `None` for fields that are not encoded:
    /// those without an annotation or with an empty key.
    ///
    /// Unknown options are ignored. When several known options are present,
    /// the first of `stringer`, `encoder`, `raw`, `escape` wins.
    pub(crate) fn parse(tag: Option<&'static str>) -> Option<Self> {
        let tag = tag?;
        let (key, options) = match tag.split_once(',') {
            Some((key, options)) => (key, options),
            None => (tag, ""),
        };
        if key.is_empty() {
            return None;
        }

        let has = |wanted: FieldOption| options.split(',').any(|opt| opt.trim() == wanted.name());
        let option = [
            FieldOption::Stringer,
            FieldOption::Encoder,
            FieldOption::Raw,
            FieldOption::Escape,
        ]
        .into_iter()
        .find(|&opt| has(opt));

        Some(Self { key, option })
    }
}
