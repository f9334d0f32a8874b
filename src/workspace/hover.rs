//! Hover content for class, id and custom property usages
//!
//! Hover reuses the goto-definition lookup and renders the first matching
//! definition lines as a small markdown card: symbol header, up to three
//! stylesheet excerpts, and the file each came from. No definitions means no
//! hover, so the editor can fall back to other providers.

use tower_lsp::lsp_types::{
    Hover, HoverContents, Location, MarkupContent, MarkupKind, Position, Url,
};

use crate::error::NavResult;
use crate::language::part::{Part, PartCategory, PartMode};
use crate::workspace::Workspace;

/// How many definition excerpts one hover card shows.
const MAX_EXCERPTS: usize = 3;

impl Workspace {
    pub async fn hover(&mut self, uri: &Url, position: Position) -> NavResult<Option<Hover>> {
        let Some((family, part)) = self.part_at_position(uri, position).await? else {
            return Ok(None);
        };
        if part.mode != PartMode::Reference {
            return Ok(None);
        }
        let Some(locations) = self.definition_locations(family, uri, &part).await? else {
            return Ok(None);
        };
        if locations.is_empty() {
            return Ok(None);
        }
        let value = self.render_card(&part, &locations).await?;
        let range = {
            let document = self.store.get(uri).await?;
            document.range(part.start, part.end)
        };
        Ok(Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value,
            }),
            range: Some(range),
        }))
    }

    async fn render_card(&mut self, part: &Part, locations: &[Location]) -> NavResult<String> {
        let mut card = format!("### {}\n", symbol_heading(part));
        for location in locations.iter().take(MAX_EXCERPTS) {
            let excerpt = {
                let document = self.store.get(&location.uri).await?;
                let offset = document.position_to_offset(location.range.start);
                document.line_text_at(offset).trim().to_string()
            };
            card.push_str(&format!(
                "\n```css\n{}\n```\n*{}*\n",
                excerpt,
                file_label(&location.uri)
            ));
        }
        if locations.len() > MAX_EXCERPTS {
            card.push_str(&format!(
                "\n*{} more definitions*\n",
                locations.len() - MAX_EXCERPTS
            ));
        }
        Ok(card)
    }
}

/// The hover header, showing the symbol the way it is written in CSS.
fn symbol_heading(part: &Part) -> String {
    match part.category {
        PartCategory::ClassName => format!("Class `.{}`", part.text),
        PartCategory::Id => format!("Id `#{}`", part.text),
        PartCategory::CssVariable => format!("Variable `--{}`", part.text),
        PartCategory::Selector => format!("Selector `{}`", part.text),
    }
}

fn file_label(uri: &Url) -> String {
    uri.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .unwrap_or("unknown")
        .to_string()
}
