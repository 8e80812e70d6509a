// Optional metadata attached to error / warning / notice annotations.

/// Source location and title metadata for an annotation command. Each
/// present field is flattened into the command's property map under its own
/// name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationProperties {
    /// A title for the annotation.
    pub title: Option<String>,
    /// The path of the file the annotation refers to.
    pub file: Option<String>,
    /// The start line, 1-based.
    pub start_line: Option<u32>,
    /// The end line; defaults to `start_line` in the runner when absent.
    pub end_line: Option<u32>,
    /// The start column. Not supported by the runner when the annotation
    /// spans multiple lines.
    pub start_column: Option<u32>,
    /// The end column; defaults to `start_column` in the runner when absent.
    pub end_column: Option<u32>,
}

impl AnnotationProperties {
    /// Flatten the present fields into ordered command properties.
    pub fn to_command_properties(&self) -> Vec<(String, String)> {
        let mut properties = Vec::new();

        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                properties.push((key.to_string(), value));
            }
        };

        push("title", self.title.clone());
        push("file", self.file.clone());
        push("startLine", self.start_line.map(|line| line.to_string()));
        push("endLine", self.end_line.map(|line| line.to_string()));
        push("startColumn", self.start_column.map(|col| col.to_string()));
        push("endColumn", self.end_column.map(|col| col.to_string()));

        properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_present_fields_in_order() {
        let properties = AnnotationProperties {
            title: Some("Oops".to_string()),
            file: Some("app.js".to_string()),
            start_line: Some(10),
            end_line: Some(12),
            start_column: None,
            end_column: None,
        };

        assert_eq!(
            properties.to_command_properties(),
            vec![
                ("title".to_string(), "Oops".to_string()),
                ("file".to_string(), "app.js".to_string()),
                ("startLine".to_string(), "10".to_string()),
                ("endLine".to_string(), "12".to_string()),
            ]
        );
    }

    #[test]
    fn default_flattens_to_nothing() {
        assert!(AnnotationProperties::default()
            .to_command_properties()
            .is_empty());
    }
}
