//! YAML front-matter rendering.

use docsite_shared::FrontMatter;

/// Render a `---`-delimited block followed by a newline.
///
/// Field order is fixed. Absent or empty optional fields are left out, and
/// `tags:` only appears when there is at least one tag.
pub fn render_frontmatter(data: &FrontMatter) -> String {
    let mut fm = String::from("---\n");
    fm.push_str(&format!("title: \"{}\"\n", escape_yaml_string(&data.title)));

    if let Some(position) = data.sidebar_position {
        fm.push_str(&format!("sidebar_position: {position}\n"));
    }

    if let Some(label) = data.sidebar_label.as_deref().filter(|l| !l.is_empty()) {
        fm.push_str(&format!("sidebar_label: \"{}\"\n", escape_yaml_string(label)));
    }

    if let Some(description) = data.description.as_deref() {
        let clean = escape_yaml_string(description);
        if !clean.is_empty() {
            fm.push_str(&format!("description: \"{clean}\"\n"));
        }
    }

    if !data.tags.is_empty() {
        fm.push_str("tags:\n");
        for tag in &data.tags {
            fm.push_str(&format!("  - \"{}\"\n", escape_yaml_string(tag)));
        }
    }

    fm.push_str("---\n");
    fm
}

/// Escape a value for a double-quoted YAML scalar on a single line.
pub fn escape_yaml_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', " ")
        .replace('\r', "")
        .replace('\t', " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str) -> FrontMatter {
        FrontMatter {
            title: title.into(),
            ..Default::default()
        }
    }

    #[test]
    fn title_only() {
        assert_eq!(render_frontmatter(&titled("Hello")), "---\ntitle: \"Hello\"\n---\n");
    }

    #[test]
    fn all_fields_in_order() {
        let fm = FrontMatter {
            title: "T".into(),
            sidebar_position: Some(3),
            sidebar_label: Some("Label".into()),
            description: Some("Desc".into()),
            tags: vec!["a".into(), "b".into()],
        };
        assert_eq!(
            render_frontmatter(&fm),
            "---\ntitle: \"T\"\nsidebar_position: 3\nsidebar_label: \"Label\"\ndescription: \"Desc\"\ntags:\n  - \"a\"\n  - \"b\"\n---\n"
        );
    }

    #[test]
    fn empty_optionals_omitted() {
        let fm = FrontMatter {
            title: "T".into(),
            sidebar_position: None,
            sidebar_label: Some(String::new()),
            description: Some(" \t\r\n ".into()),
            tags: vec![],
        };
        let out = render_frontmatter(&fm);
        assert!(!out.contains("sidebar_label"));
        assert!(!out.contains("description"));
        assert!(!out.contains("tags"));
        assert!(!out.contains("sidebar_position"));
    }

    #[test]
    fn escapes_quotes_and_whitespace() {
        assert_eq!(escape_yaml_string("say \"hi\"\tnow\r\nok"), "say \\\"hi\\\" now ok");
    }

    #[test]
    fn escapes_backslashes() {
        assert_eq!(escape_yaml_string(r"C:\path"), r"C:\\path");
    }
}
