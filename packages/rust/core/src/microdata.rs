//! schema.org Dataset microdata for search-indexing consumption.
//!
//! Microdata rather than JSON-LD: Markdown rendering engines strip
//! `<script>` tags, so the block must survive as plain markup.

use url::Url;

use datacat_shared::BuilderRef;

/// Build the structured-metadata block prepended to one dataset's
/// document.
///
/// Fields whose value is empty after trimming are omitted entirely —
/// never emitted as an empty attribute.
pub fn dataset_block(builder: &BuilderRef, base_url: &Url, catalog_name: &str) -> String {
    let mut out = String::new();
    out.push_str("<div itemscope itemtype=\"http://schema.org/Dataset\">\n");
    out.push_str(
        "  <div itemscope itemprop=\"includedInDataCatalog\" itemtype=\"http://schema.org/DataCatalog\">\n",
    );
    push_meta(&mut out, "    ", "name", catalog_name);
    out.push_str("  </div>\n");

    push_meta(&mut out, "  ", "name", &builder.name);
    push_meta(&mut out, "  ", "description", &builder.description);
    push_meta(&mut out, "  ", "url", &catalog_url(base_url, &builder.name));
    let same_as = builder.urls.first().map(String::as_str).unwrap_or("");
    push_meta(&mut out, "  ", "sameAs", same_as);

    out.push_str("</div>\n");
    out
}

/// Canonical catalog URL for a dataset name.
pub fn catalog_url(base_url: &Url, name: &str) -> String {
    format!("{}/{name}", base_url.as_str().trim_end_matches('/'))
}

/// Escape a value for embedding in a markup attribute. Literal
/// newlines become `&#10;` so multi-line descriptions stay valid
/// within a single attribute.
pub fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
        .replace("\r\n", "\n")
        .replace(['\n', '\r'], "&#10;")
}

fn push_meta(out: &mut String, indent: &str, itemprop: &str, value: &str) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return;
    }
    out.push_str(indent);
    out.push_str(&format!(
        "<meta itemprop=\"{itemprop}\" content=\"{}\" />\n",
        escape_attribute(trimmed)
    ));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://datasets.example.org/catalog").unwrap()
    }

    fn builder(name: &str, description: &str, urls: &[&str]) -> BuilderRef {
        BuilderRef {
            name: name.into(),
            category: vec!["image".into()],
            description: description.into(),
            urls: urls.iter().map(|s| s.to_string()).collect(),
            config_keys: vec![],
            config: None,
        }
    }

    #[test]
    fn block_carries_all_populated_fields() {
        let b = builder("mnist", "Digits.", &["http://yann.lecun.com/exdb/mnist/"]);
        let block = dataset_block(&b, &base_url(), "Dataset Catalog");

        assert!(block.starts_with("<div itemscope itemtype=\"http://schema.org/Dataset\">"));
        assert!(block.contains("itemprop=\"includedInDataCatalog\""));
        assert!(block.contains("<meta itemprop=\"name\" content=\"mnist\" />"));
        assert!(block.contains("<meta itemprop=\"description\" content=\"Digits.\" />"));
        assert!(block.contains(
            "<meta itemprop=\"url\" content=\"https://datasets.example.org/catalog/mnist\" />"
        ));
        assert!(block.contains(
            "<meta itemprop=\"sameAs\" content=\"http://yann.lecun.com/exdb/mnist/\" />"
        ));
        assert!(block.ends_with("</div>\n"));
    }

    #[test]
    fn empty_fields_are_omitted_not_emitted_empty() {
        let b = builder("bare", "   ", &[]);
        let block = dataset_block(&b, &base_url(), "Dataset Catalog");

        assert!(!block.contains("itemprop=\"description\""));
        assert!(!block.contains("itemprop=\"sameAs\""));
        assert!(!block.contains("content=\"\""));
        // Name and canonical URL are always present for a named dataset.
        assert!(block.contains("<meta itemprop=\"name\" content=\"bare\" />"));
    }

    #[test]
    fn attribute_values_are_escaped() {
        let b = builder("tricky", "a & b <c> \"quoted\" 'single'", &[]);
        let block = dataset_block(&b, &base_url(), "Dataset Catalog");

        assert!(block.contains("a &amp; b &lt;c&gt; &quot;quoted&quot; &#39;single&#39;"));
    }

    #[test]
    fn newlines_become_break_entities() {
        let b = builder("multiline", "line one\nline two\r\nline three", &[]);
        let block = dataset_block(&b, &base_url(), "Dataset Catalog");

        assert!(block.contains("line one&#10;line two&#10;line three"));
        // The description meta itself stays on one physical line.
        let desc_line = block
            .lines()
            .find(|l| l.contains("itemprop=\"description\""))
            .unwrap();
        assert!(desc_line.ends_with("/>"));
    }

    #[test]
    fn only_first_source_url_is_same_as() {
        let b = builder("multi", "d", &["https://one.example", "https://two.example"]);
        let block = dataset_block(&b, &base_url(), "Dataset Catalog");

        assert!(block.contains("content=\"https://one.example\""));
        assert!(!block.contains("two.example"));
    }

    #[test]
    fn catalog_url_handles_trailing_slash() {
        let base = Url::parse("https://datasets.example.org/catalog/").unwrap();
        assert_eq!(
            catalog_url(&base, "mnist"),
            "https://datasets.example.org/catalog/mnist"
        );
    }
}
