//! Completion for class names, ids and custom properties
//!
//! Context detection runs on the raw text around the cursor rather than on
//! parsed parts, since the token being completed is usually half typed.
//! Candidates come from definition sites across the workspace; the replace
//! range always covers the partial word so accepting an item never leaves
//! stray characters behind.

use std::collections::BTreeSet;

use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, CompletionTextEdit, Position, Range, TextEdit, Url,
};

use crate::config::LanguageFamily;
use crate::css::parser::{self as css_parser, CssCompletionContext};
use crate::error::NavResult;
use crate::html::parser::{self as html_parser, HtmlCompletionContext};
use crate::language::part::{Part, PartCategory, PartMode};
use crate::workspace::Workspace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CandidateKind {
    Class,
    Id,
    Variable,
}

impl Workspace {
    /// Completion items at `position`, or `Ok(None)` when the cursor is not
    /// in a completable context.
    pub async fn completion(
        &mut self,
        uri: &Url,
        position: Position,
    ) -> NavResult<Option<Vec<CompletionItem>>> {
        let Some(family) = self.config.family_of_url(uri) else {
            return Ok(None);
        };
        let context = {
            let document = self.store.get(uri).await?;
            let offset = document.position_to_offset(position);
            detect_context(family, document.text(), offset)
                .map(|(kind, start, end)| (kind, document.range(start, end)))
        };
        let Some((kind, range)) = context else {
            return Ok(None);
        };
        let names = self.candidates(family, uri, kind).await?;
        Ok(Some(to_items(kind, range, names)))
    }

    async fn candidates(
        &mut self,
        family: LanguageFamily,
        uri: &Url,
        kind: CandidateKind,
    ) -> NavResult<BTreeSet<String>> {
        let pick: fn(&Part) -> Option<String> = match kind {
            CandidateKind::Class => class_candidate,
            CandidateKind::Id => id_candidate,
            CandidateKind::Variable => variable_candidate,
        };
        let mut names = BTreeSet::new();
        self.css_map
            .collect_texts(&mut self.store, pick, &mut names)
            .await?;
        // a page always completes against its own style blocks; the
        // style-tag switch only widens definition lookup
        if family == LanguageFamily::Html {
            self.html_map
                .collect_texts_in(&mut self.store, uri, pick, &mut names)
                .await?;
        }
        Ok(names)
    }
}

/// Map the cursor surroundings to what gets completed there. Markup tries
/// the attribute shapes first and falls back to the stylesheet probe, which
/// covers `var(` inside `<style>` blocks.
fn detect_context(
    family: LanguageFamily,
    text: &str,
    offset: usize,
) -> Option<(CandidateKind, usize, usize)> {
    match family {
        LanguageFamily::Html => match html_parser::completion_context(text, offset) {
            Some(HtmlCompletionContext::ClassValue { start, end }) => {
                Some((CandidateKind::Class, start, end))
            }
            Some(HtmlCompletionContext::IdValue { start, end }) => {
                Some((CandidateKind::Id, start, end))
            }
            None => css_variable_context(text, offset),
        },
        LanguageFamily::Css => css_variable_context(text, offset),
    }
}

fn css_variable_context(text: &str, offset: usize) -> Option<(CandidateKind, usize, usize)> {
    let CssCompletionContext::VariableName { start, end } =
        css_parser::completion_context(text, offset)?;
    Some((CandidateKind::Variable, start, end))
}

fn to_items(kind: CandidateKind, range: Range, names: BTreeSet<String>) -> Vec<CompletionItem> {
    let item_kind = match kind {
        CandidateKind::Class | CandidateKind::Id => CompletionItemKind::VALUE,
        CandidateKind::Variable => CompletionItemKind::VARIABLE,
    };
    names
        .into_iter()
        .map(|name| CompletionItem {
            label: name.clone(),
            kind: Some(item_kind),
            text_edit: Some(CompletionTextEdit::Edit(TextEdit {
                range,
                new_text: name,
            })),
            ..CompletionItem::default()
        })
        .collect()
}

fn class_candidate(part: &Part) -> Option<String> {
    if part.category != PartCategory::Selector || part.mode != PartMode::Definition {
        return None;
    }
    part.text.strip_prefix('.').map(str::to_string)
}

fn id_candidate(part: &Part) -> Option<String> {
    if part.category != PartCategory::Selector || part.mode != PartMode::Definition {
        return None;
    }
    part.text.strip_prefix('#').map(str::to_string)
}

fn variable_candidate(part: &Part) -> Option<String> {
    if part.category != PartCategory::CssVariable || part.mode != PartMode::Definition {
        return None;
    }
    Some(format!("--{}", part.text))
}
