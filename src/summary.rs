//! Corpus-wide aggregation of scan results.
//!
//! An [`Aggregator`] accumulates one partial [`CorpusSummary`]. Partial
//! summaries from different workers are combined with
//! [`CorpusSummary::merge`], which is associative and commutative, so the
//! final report does not depend on the order documents were processed in.

use crate::code_blocks::{ClassifiedBlock, Language, MalformedBlock};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A document that could not be read.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, thiserror::Error)]
#[error("{path}: unreadable document: {error}")]
pub struct UnreadableDocument {
    pub path: String,
    pub error: String,
}

/// Retained listing entry for a single block (`--blocks`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    pub language: Language,
    pub tag: String,
    pub start_line: usize,
    pub end_line: usize,
}

impl From<&ClassifiedBlock<'_>> for BlockRecord {
    fn from(classified: &ClassifiedBlock<'_>) -> Self {
        Self {
            language: classified.language,
            tag: classified.block.tag.to_string(),
            start_line: classified.block.start_line,
            end_line: classified.block.end_line,
        }
    }
}

/// Aggregated counts for a set of documents.
///
/// All collections are ordered, so serializing the same summary always
/// produces the same bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusSummary {
    /// Documents read successfully.
    pub total_documents: usize,
    pub total_blocks: usize,
    pub by_language: BTreeMap<Language, usize>,
    pub by_document: BTreeMap<String, usize>,
    pub malformed: BTreeSet<MalformedBlock>,
    pub unreadable: BTreeSet<UnreadableDocument>,
    /// Per-document block listings, only filled when retention is enabled.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub blocks: BTreeMap<String, Vec<BlockRecord>>,
}

impl CorpusSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Combine another partial summary into this one.
    pub fn merge(&mut self, other: CorpusSummary) {
        self.total_documents += other.total_documents;
        self.total_blocks += other.total_blocks;
        for (language, count) in other.by_language {
            *self.by_language.entry(language).or_insert(0) += count;
        }
        for (path, count) in other.by_document {
            *self.by_document.entry(path).or_insert(0) += count;
        }
        self.malformed.extend(other.malformed);
        self.unreadable.extend(other.unreadable);
        for (path, records) in other.blocks {
            let entry = self.blocks.entry(path).or_default();
            entry.extend(records);
            entry.sort_by_key(|r| r.start_line);
        }
    }

    /// Documents that were discovered, whether or not they could be read.
    pub fn documents_processed(&self) -> usize {
        self.total_documents + self.unreadable.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.malformed.is_empty() || !self.unreadable.is_empty()
    }

    pub fn blocks_for(&self, language: Language) -> usize {
        self.by_language.get(&language).copied().unwrap_or(0)
    }

    /// Pretty-printed JSON report.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Accumulates classified blocks into a [`CorpusSummary`].
///
/// Each worker owns its own aggregator; there is no shared state between
/// them until their summaries are merged.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    summary: CorpusSummary,
    retain_blocks: bool,
}

impl Aggregator {
    pub fn new(retain_blocks: bool) -> Self {
        Self {
            summary: CorpusSummary::new(),
            retain_blocks,
        }
    }

    /// Start a document. It is listed in `byDocument` even if it has no blocks.
    pub fn begin_document(&mut self, path: &str) {
        self.summary.total_documents += 1;
        self.summary.by_document.entry(path.to_string()).or_insert(0);
        if self.retain_blocks {
            self.summary.blocks.entry(path.to_string()).or_default();
        }
    }

    pub fn record_block(&mut self, classified: &ClassifiedBlock<'_>) {
        let path = classified.block.path;
        self.summary.total_blocks += 1;
        *self.summary.by_language.entry(classified.language).or_insert(0) += 1;
        *self.summary.by_document.entry(path.to_string()).or_insert(0) += 1;
        if self.retain_blocks {
            self.summary
                .blocks
                .entry(path.to_string())
                .or_default()
                .push(BlockRecord::from(classified));
        }
    }

    pub fn record_malformed(&mut self, malformed: MalformedBlock) {
        self.summary.malformed.insert(malformed);
    }

    /// Record a document whose read failed. It is not counted in
    /// `total_documents`.
    pub fn record_unreadable(&mut self, unreadable: UnreadableDocument) {
        self.summary.unreadable.insert(unreadable);
    }

    /// Record a whole document from the scanner's output.
    pub fn record_document<'a, I>(&mut self, path: &str, items: I)
    where
        I: IntoIterator<Item = Result<ClassifiedBlock<'a>, MalformedBlock>>,
    {
        self.begin_document(path);
        for item in items {
            match item {
                Ok(classified) => self.record_block(&classified),
                Err(malformed) => self.record_malformed(malformed),
            }
        }
    }

    /// Merge another worker's partial results into this one.
    pub fn merge(&mut self, other: Aggregator) {
        self.retain_blocks |= other.retain_blocks;
        self.summary.merge(other.summary);
    }

    /// Consuming variant of [`Aggregator::merge`], for use as a reducer.
    pub fn merged(mut self, other: Aggregator) -> Aggregator {
        self.merge(other);
        self
    }

    pub fn summary(&self) -> &CorpusSummary {
        &self.summary
    }

    pub fn finish(self) -> CorpusSummary {
        self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_blocks::{BlockScanner, LanguageClassifier};
    use pretty_assertions::assert_eq;

    fn aggregate(docs: &[(&str, &str)], retain: bool) -> CorpusSummary {
        let classifier = LanguageClassifier::new();
        let mut aggregator = Aggregator::new(retain);
        for (path, content) in docs {
            let items = BlockScanner::new(path, content).map(|item| item.map(|b| classifier.classify_block(b)));
            aggregator.record_document(path, items);
        }
        aggregator.finish()
    }

    fn partial(path: &str, content: &str) -> CorpusSummary {
        aggregate(&[(path, content)], false)
    }

    #[test]
    fn test_single_css_block() {
        let summary = aggregate(&[("card.md", "```css\n.card{}\n```\n")], false);
        assert_eq!(summary.total_documents, 1);
        assert_eq!(summary.total_blocks, 1);
        assert_eq!(summary.by_language, BTreeMap::from([(Language::Css, 1)]));
        assert_eq!(summary.by_document, BTreeMap::from([("card.md".to_string(), 1)]));
        assert!(summary.malformed.is_empty());
    }

    #[test]
    fn test_aliases_share_a_language_key() {
        let summary = aggregate(
            &[("a.md", "```js\nlet a;\n```\n"), ("b.md", "```JavaScript\nlet b;\n```\n")],
            false,
        );
        assert_eq!(summary.by_language, BTreeMap::from([(Language::Javascript, 2)]));
    }

    #[test]
    fn test_document_without_blocks() {
        let summary = aggregate(&[("prose.md", "# Just prose\n")], false);
        assert_eq!(summary.total_documents, 1);
        assert_eq!(summary.total_blocks, 0);
        assert_eq!(summary.by_document.get("prose.md"), Some(&0));
        assert!(summary.malformed.is_empty());
        assert!(!summary.has_errors());
    }

    #[test]
    fn test_unterminated_fence_is_recorded() {
        let summary = aggregate(&[("broken.md", "intro\n```js\nlet a;\n")], false);
        assert_eq!(summary.total_blocks, 0);
        assert_eq!(
            summary.malformed.into_iter().collect::<Vec<_>>(),
            vec![MalformedBlock {
                path: "broken.md".to_string(),
                line: 2
            }]
        );
    }

    #[test]
    fn test_unreadable_is_not_a_document() {
        let mut aggregator = Aggregator::new(false);
        aggregator.record_unreadable(UnreadableDocument {
            path: "locked.md".to_string(),
            error: "permission denied".to_string(),
        });
        let summary = aggregator.finish();
        assert_eq!(summary.total_documents, 0);
        assert_eq!(summary.documents_processed(), 1);
        assert!(summary.has_errors());
        assert!(summary.by_document.is_empty());
    }

    #[test]
    fn test_merge_is_commutative() {
        let a = partial("a.md", "```css\na{}\n```\n");
        let b = partial("b.md", "```ts\nlet b;\n```\n```\nplain\n```\n");
        let c = partial("c.md", "```bash\nls\n```\n```html\n");

        let mut abc = CorpusSummary::new();
        for s in [a.clone(), b.clone(), c.clone()] {
            abc.merge(s);
        }
        let mut cab = CorpusSummary::new();
        for s in [c, a, b] {
            cab.merge(s);
        }

        assert_eq!(abc, cab);
        assert_eq!(abc.to_json().unwrap(), cab.to_json().unwrap());
        assert_eq!(abc.total_documents, 3);
        assert_eq!(abc.total_blocks, 4);
        assert_eq!(abc.malformed.len(), 1);
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let docs = [("x.md", "```json\n{}\n```\n"), ("y.md", "```jsx\n<A/>\n```\n")];
        let single = aggregate(&docs, true);

        let mut merged = aggregate(&docs[1..], true);
        merged.merge(aggregate(&docs[..1], true));

        assert_eq!(single, merged);
    }

    #[test]
    fn test_json_shape_and_order() {
        let summary = aggregate(
            &[
                ("z.md", "```ts\nx\n```\n"),
                ("a.md", "```css\nx\n```\n```bash\nx\n```\n"),
                ("m.md", "```\nunclosed\n"),
            ],
            false,
        );
        let json = summary.to_json().unwrap();
        let expected = r#"{
  "totalDocuments": 3,
  "totalBlocks": 3,
  "byLanguage": {
    "bash": 1,
    "css": 1,
    "typescript": 1
  },
  "byDocument": {
    "a.md": 2,
    "m.md": 0,
    "z.md": 1
  },
  "malformed": [
    {
      "path": "m.md",
      "line": 1
    }
  ],
  "unreadable": []
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_retained_blocks_are_listed_in_source_order() {
        let summary = aggregate(&[("doc.md", "```js\na\n```\n\n```tsx\n<B/>\n```\n")], true);
        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        let blocks = json["blocks"]["doc.md"].as_array().unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0]["language"], "javascript");
        assert_eq!(blocks[0]["tag"], "js");
        assert_eq!(blocks[0]["startLine"], 1);
        assert_eq!(blocks[0]["endLine"], 3);
        assert_eq!(blocks[1]["language"], "jsx");
        assert_eq!(blocks[1]["startLine"], 5);
    }

    #[test]
    fn test_blocks_for() {
        let summary = aggregate(&[("a.md", "```sh\nx\n```\n```zsh\ny\n```\n")], false);
        assert_eq!(summary.blocks_for(Language::Bash), 2);
        assert_eq!(summary.blocks_for(Language::Css), 0);
    }
}
