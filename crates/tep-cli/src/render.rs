//! Index rendering

use anyhow::Context;
use minijinja::Environment;
use tep_registry::Index;

/// Render the index template with `{ teps: [...] }`
///
/// Rows expose `link`, `number`, `title`, `status`, `creation-date` and
/// `last-updated`; dashed keys are reached as `tep['last-updated']`.
pub(crate) fn render_index(template: &str, index: &Index) -> anyhow::Result<String> {
    let env = Environment::new();
    env.render_str(template, index)
        .context("failed to render index template")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tep_document::{BodyMode, DocumentParser};
    use tep_registry::IndexBuilder;

    fn index() -> Index {
        let parser = DocumentParser::default();
        let docs: Vec<_> = [("0002-b.md", "TEP-0002", "B"), ("0001-a.md", "TEP-0001", "A")]
            .into_iter()
            .map(|(link, number, title)| {
                let text = format!(
                    "---\ntitle: {title}\nstatus: implementable\ncreation-date: 2020-06-01\n---\n# {number}: {title}\n"
                );
                parser.parse_str(link, &text, BodyMode::HeaderOnly).document
            })
            .collect();
        IndexBuilder::from_documents(&docs)
    }

    #[test]
    fn rows_follow_index_order() {
        let template = "{% for tep in teps %}{{ tep.number }} {{ tep.title }} {{ tep['last-updated'] }}\n{% endfor %}";
        let rendered = render_index(template, &index()).unwrap();
        assert_eq!(
            rendered,
            "TEP-0001 A 2020-06-01\nTEP-0002 B 2020-06-01\n"
        );
    }

    #[test]
    fn syntax_errors_are_reported() {
        assert!(render_index("{% for tep in teps %}", &index()).is_err());
    }
}
